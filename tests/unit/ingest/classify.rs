use super::*;

fn doc(body: &str) -> SvgDocument {
    SvgDocument::parse(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:i="urn:tool" viewBox="0 0 10 10">{body}</svg>"#
    ))
    .unwrap()
}

const NESTED_PAGE: &str = r#"<g><g><g><defs/><rect width="1" height="1"/></g></g></g>"#;

#[test]
fn switch_with_deep_pages_is_multi() {
    let d = doc(&format!(
        r#"<switch><foreignObject/><g i:extraneous="self">{NESTED_PAGE}{NESTED_PAGE}</g></switch>"#
    ));
    let c = classify(&d);
    assert_eq!(c.wrapper, Wrapper::Switch);
    assert_eq!(c.layout, PageLayout::Multi);
    assert_eq!(c.depth_to_defs, Some(3));
    assert_eq!(c.pages, vec![vec![0, 1, 0], vec![0, 1, 1]]);
}

#[test]
fn shallow_switch_is_single_page() {
    let d = doc(r#"<switch><g i:extraneous="self"><g><defs/></g><g/></g></switch>"#);
    let c = classify(&d);
    assert_eq!(c.layout, PageLayout::Single);
    assert_eq!(c.depth_to_defs, Some(1));
    assert_eq!(c.pages, vec![vec![0, 0]]);
}

#[test]
fn switch_without_extraneous_uses_first_group() {
    let d = doc(r#"<switch><g id="only"><defs/></g></switch>"#);
    let c = classify(&d);
    assert_eq!(c.wrapper, Wrapper::Switch);
    assert_eq!(d.at_path(&c.pages[0]).unwrap().id(), Some("only"));
}

#[test]
fn flat_unclipped_groups_are_pages() {
    let d = doc(r#"<defs/><g id="p1"/><g id="bg" clip-path="url(#c)"/><g id="p2"/>"#);
    let c = classify(&d);
    assert_eq!(c.wrapper, Wrapper::Flat);
    assert_eq!(c.layout, PageLayout::Multi);
    assert_eq!(c.pages, vec![vec![1], vec![3]]);
    assert_eq!(c.depth_to_defs, Some(0));
}

#[test]
fn flat_single_group_is_whole_document() {
    let d = doc(r#"<g id="p1"/><g clip-path="url(#c)"/>"#);
    let c = classify(&d);
    assert_eq!(c.layout, PageLayout::Single);
    assert_eq!(c.pages, vec![Vec::<usize>::new()]);
    assert_eq!(c.depth_to_defs, None);
}
