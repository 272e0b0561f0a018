use super::*;

const DOC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <rect id="r" width="10" height="10"/>
    <clipPath id="c1"><use xlink:href="#r"/></clipPath>
    <clipPath id="c2" clip-path="url(#c1)"><use xlink:href="#r"/></clipPath>
    <clipPath id="loop" clip-path="url( '#loop' )"><rect width="1" height="1"/></clipPath>
  </defs>
  <g id="page">
    <g id="plain"/>
    <g><g id="bg" clip-path="url(#c2)"/></g>
    <g id="late" clip-path="url(#loop)"/>
    <path id="p" clip-path="url(#nope)"/>
  </g>
</svg>"##;

#[test]
fn url_ref_accepts_quoting_variants() {
    assert_eq!(url_ref("url(#a)"), Some("a"));
    assert_eq!(url_ref("url( \"#b\" )"), Some("b"));
    assert_eq!(url_ref("url(#)"), None);
    assert_eq!(url_ref("#a"), None);
}

#[test]
fn background_is_first_clipped_group_in_document_order() {
    let doc = SvgDocument::parse(DOC).unwrap();
    let page = doc.find_by_id("page").unwrap();
    assert_eq!(find_background(page).and_then(XmlElement::id), Some("bg"));
    assert!(find_background(doc.find_by_id("plain").unwrap()).is_none());
}

#[test]
fn chain_resolves_nested_references_once() {
    let doc = SvgDocument::parse(DOC).unwrap();
    let index = IdIndex::new(&doc);
    let bg = doc.find_by_id("bg").unwrap();
    let chain = resolve_chain(&index, &[bg]);
    assert_eq!(chain.ids, vec!["c2", "c1", "r"]);
    assert!(chain.missing.is_empty());
}

#[test]
fn cycles_terminate_and_missing_ids_are_skipped() {
    let doc = SvgDocument::parse(DOC).unwrap();
    let index = IdIndex::new(&doc);
    let page = doc.find_by_id("page").unwrap();
    let chain = resolve_chain(&index, &[page]);
    assert_eq!(chain.ids, vec!["c2", "loop", "c1", "r"]);
    assert_eq!(chain.missing, vec!["nope"]);
}
