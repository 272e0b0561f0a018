use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::ingest::clip::{IdIndex, ReferenceChain};
use crate::ingest::xml::{XmlElement, XmlNode};

const SVG_NS_URI: &str = "http://www.w3.org/2000/svg";
const XLINK_NS_URI: &str = "http://www.w3.org/1999/xlink";

const LEAF_ELEMENTS: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon", "text", "image", "use",
];
const NON_RENDERED: &[&str] = &[
    "defs", "clipPath", "mask", "pattern", "symbol", "marker", "style", "linearGradient",
    "radialGradient",
];

/// Where a flattened object came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Provenance {
    /// Ids of enclosing groups, outermost first.
    pub ancestors: Vec<String>,
    /// Image reference, for `<image>` leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// The id was generated because the source element had none.
    #[serde(default)]
    pub synthetic: bool,
}

/// Undo the exporting tool's id escaping (`_x5F_` for `_`, `_x2D_` for `-`).
pub fn decode_tool_id(id: &str) -> String {
    id.replace("_x5F_", "_").replace("_x2D_", "-")
}

/// Remove tool-private markup in place and decode escaped ids.
///
/// Drops elements and attributes in foreign namespaces plus `<metadata>` and
/// `<foreignObject>`. Ids, `href` targets and `url(#..)` references are decoded together so
/// references keep resolving.
pub fn strip_tool_markup(el: &mut XmlElement) {
    el.attrs.retain(|a| !a.ns.is_foreign());
    for attr in &mut el.attrs {
        if attr.name == "id" || attr.value.starts_with('#') || attr.value.contains("url(#") {
            attr.value = decode_tool_id(&attr.value);
        }
    }
    el.children.retain(|c| match c {
        XmlNode::Element(e) => !e.ns.is_foreign() && !e.is("metadata") && !e.is("foreignObject"),
        XmlNode::Text(_) => true,
    });
    for child in &mut el.children {
        if let XmlNode::Element(e) = child {
            strip_tool_markup(e);
        }
    }
}

/// `<style>` elements anywhere in `root`.
pub fn style_blocks(root: &XmlElement) -> Vec<&XmlElement> {
    root.descendants()
        .into_iter()
        .filter(|e| e.is("style"))
        .collect()
}

/// Map of CSS class name to its `font-family`, from every `<style>` block.
pub fn class_font_families(root: &XmlElement) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for style in style_blocks(root) {
        parse_css_font_classes(&style.text(), &mut out);
    }
    out
}

fn parse_css_font_classes(css: &str, out: &mut HashMap<String, String>) {
    for rule in css.split('}') {
        let Some((selectors, body)) = rule.split_once('{') else {
            continue;
        };
        let Some(family) = declaration(body, "font-family").and_then(first_family) else {
            continue;
        };
        for sel in selectors.split(',') {
            if let Some(class) = sel.trim().strip_prefix('.')
                && !class.is_empty()
            {
                out.insert(class.to_string(), family.clone());
            }
        }
    }
}

fn declaration<'a>(body: &'a str, prop: &str) -> Option<&'a str> {
    body.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim() == prop).then(|| value.trim())
    })
}

/// First family of a `font-family` list, unquoted.
pub fn first_family(list: &str) -> Option<String> {
    let first = list.split(',').next()?.trim();
    let name = first.trim_matches(|c| c == '"' || c == '\'').trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Font families used by text in `page`: `font-family` attributes, inline styles and classes.
pub fn font_families(page: &XmlElement, classes: &HashMap<String, String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for el in page.descendants() {
        if !(el.is("text") || el.is("tspan")) {
            continue;
        }
        if let Some(f) = el.attr("font-family").and_then(first_family) {
            out.insert(f);
        }
        if let Some(f) = el
            .attr("style")
            .and_then(|s| declaration(s, "font-family"))
            .and_then(first_family)
        {
            out.insert(f);
        }
        for class in el.attr("class").unwrap_or_default().split_whitespace() {
            if let Some(f) = classes.get(class) {
                out.insert(f.clone());
            }
        }
    }
    out
}

/// Give every unnamed rendered leaf a stable id and record provenance for all leaves.
///
/// Generated ids are `{prefix}-{n}` and never collide with ids in `taken`, which is updated.
pub fn assign_leaf_ids(
    page: &mut XmlElement,
    prefix: &str,
    taken: &mut HashSet<String>,
) -> BTreeMap<String, Provenance> {
    let mut out = BTreeMap::new();
    let mut counter = 0usize;
    let mut ancestors = Vec::new();
    walk_leaves(page, prefix, taken, &mut counter, &mut ancestors, &mut out);
    out
}

fn walk_leaves(
    el: &mut XmlElement,
    prefix: &str,
    taken: &mut HashSet<String>,
    counter: &mut usize,
    ancestors: &mut Vec<String>,
    out: &mut BTreeMap<String, Provenance>,
) {
    if NON_RENDERED.iter().any(|n| el.is(n)) {
        return;
    }
    if LEAF_ELEMENTS.iter().any(|n| el.is(n)) {
        let (id, synthetic) = match el.id() {
            Some(id) => (id.to_string(), false),
            None => {
                let id = loop {
                    *counter += 1;
                    let candidate = format!("{prefix}-{counter}");
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                el.set_attr("id", id.clone());
                (id, true)
            }
        };
        taken.insert(id.clone());
        let href = el.is("image").then(|| el.href().map(str::to_string)).flatten();
        out.insert(
            id,
            Provenance {
                ancestors: ancestors.clone(),
                href,
                synthetic,
            },
        );
        return;
    }

    let pushed = el.id().map(str::to_string);
    if let Some(id) = &pushed {
        ancestors.push(id.clone());
    }
    for child in &mut el.children {
        if let XmlNode::Element(e) = child {
            walk_leaves(e, prefix, taken, counter, ancestors, out);
        }
    }
    if pushed.is_some() {
        ancestors.pop();
    }
}

/// Standalone SVG for one page: the page plus the definitions and styles it needs from
/// elsewhere in the document.
pub fn page_markup(
    root: &XmlElement,
    page: &XmlElement,
    chain: &ReferenceChain,
    index: &IdIndex<'_>,
) -> String {
    let local: HashSet<&str> = page.descendants().into_iter().filter_map(|e| e.id()).collect();
    let candidates: Vec<&XmlElement> = chain
        .ids
        .iter()
        .filter(|id| !local.contains(id.as_str()))
        .filter_map(|id| index.get(id))
        .collect();
    let nested: HashSet<&str> = candidates
        .iter()
        .flat_map(|e| e.descendants().into_iter().skip(1))
        .filter_map(|e| e.id())
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="{SVG_NS_URI}" xmlns:xlink="{XLINK_NS_URI}""#
    ));
    for name in ["viewBox", "width", "height"] {
        if let Some(v) = root.attr(name) {
            out.push_str(&format!(
                r#" {name}="{}""#,
                crate::render::svg_export::escape(v)
            ));
        }
    }
    out.push('>');

    let defs: Vec<&XmlElement> = candidates
        .into_iter()
        .filter(|e| e.id().is_none_or(|id| !nested.contains(id)))
        .collect();
    if !defs.is_empty() {
        out.push_str("<defs>");
        for d in defs {
            d.write_to(&mut out);
        }
        out.push_str("</defs>");
    }

    if page.is("svg") {
        for child in page.elements() {
            child.write_to(&mut out);
        }
    } else {
        for style in style_blocks(root) {
            style.write_to(&mut out);
        }
        page.write_to(&mut out);
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/clean.rs"]
mod tests;
