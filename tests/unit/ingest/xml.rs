use super::*;

const EXPORT: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE svg [
  <!ENTITY ns_ai "http://ns.adobe.com/AdobeIllustrator/10.0/">
]>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     xmlns:i="&ns_ai;" viewBox="0 0 100 50" i:viewOrigin="0 0">
  <metadata><i:pgf>blob</i:pgf></metadata>
  <g id="a" i:extraneous="self">
    <use xlink:href="#r"/>
    <text id="t"><tspan>Hi</tspan> <tspan>there</tspan></text>
  </g>
</svg>"##;

#[test]
fn parse_rejects_empty_and_foreign_roots() {
    let err = SvgDocument::parse("  \n").unwrap_err();
    assert!(err.to_string().contains("empty"));

    let err = SvgDocument::parse("<html/>").unwrap_err();
    assert!(err.to_string().contains("expected <svg>"));

    assert!(SvgDocument::parse("<svg").is_err());
}

#[test]
fn entity_namespaces_are_recognized_as_foreign() {
    let doc = SvgDocument::parse(EXPORT).unwrap();
    let g = doc.find_by_id("a").unwrap();
    assert_eq!(g.attr("extraneous"), None);
    assert_eq!(g.attr_any_ns("extraneous"), Some("self"));
    assert!(g.attrs.iter().any(|a| a.ns.is_foreign()));
}

#[test]
fn href_reads_xlink_form() {
    let doc = SvgDocument::parse(EXPORT).unwrap();
    let use_el = doc.at_path(&[1, 0]).unwrap();
    assert!(use_el.is("use"));
    assert_eq!(use_el.href(), Some("#r"));
}

#[test]
fn whitespace_survives_inside_text_only() {
    let doc = SvgDocument::parse(EXPORT).unwrap();
    let g = doc.find_by_id("a").unwrap();
    assert!(g.children.iter().all(|c| matches!(c, XmlNode::Element(_))));
    let text = doc.find_by_id("t").unwrap();
    assert_eq!(text.children.len(), 3);
    assert_eq!(text.text(), " ");
}

#[test]
fn write_skips_foreign_names() {
    let doc = SvgDocument::parse(EXPORT).unwrap();
    let mut out = String::new();
    doc.root.write_to(&mut out);
    assert!(!out.contains("extraneous"));
    assert!(!out.contains("pgf"));
    assert!(out.contains("xlink:href=\"#r\""));
    assert!(out.contains("<metadata></metadata>"));
}

#[test]
fn set_attr_replaces_or_appends() {
    let mut el = XmlElement::new("rect");
    el.set_attr("id", "a");
    el.set_attr("id", "b");
    el.set_attr("x", "1 & 2");
    assert_eq!(el.id(), Some("b"));
    assert_eq!(el.attrs.len(), 2);
    let mut out = String::new();
    el.write_to(&mut out);
    assert_eq!(out, r#"<rect id="b" x="1 &amp; 2"/>"#);
}

#[test]
fn descendants_walk_in_document_order() {
    let doc = SvgDocument::parse(EXPORT).unwrap();
    let names: Vec<&str> = doc
        .root
        .descendants()
        .into_iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["svg", "metadata", "pgf", "g", "use", "text", "tspan", "tspan"]
    );
    assert!(doc.at_path(&[9]).is_none());
}
