use std::fmt::Write as _;

use usvg::roxmltree;

use crate::foundation::error::{QuireError, QuireResult};
use crate::render::svg_export::escape;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of an element or attribute name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// SVG, or no namespace at all.
    Svg,
    /// `xlink:`.
    XLink,
    /// `xml:`.
    Xml,
    /// Anything else, typically an illustration tool's private namespace.
    Foreign(String),
}

impl Namespace {
    fn from_uri(uri: Option<&str>) -> Self {
        match uri {
            None | Some(SVG_NS) => Namespace::Svg,
            Some(XLINK_NS) => Namespace::XLink,
            Some(XML_NS) => Namespace::Xml,
            Some(other) => Namespace::Foreign(other.to_string()),
        }
    }

    /// `true` for namespaces other than SVG, XLink and XML.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Namespace::Foreign(_))
    }
}

/// One attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttr {
    /// Namespace.
    pub ns: Namespace,
    /// Local name.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

/// Element or text child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    /// Nested element.
    Element(XmlElement),
    /// Character data.
    Text(String),
}

/// Owned, mutable copy of an SVG element.
///
/// Parsing goes through roxmltree; the owned form lets the pipeline strip, slice and
/// re-serialize page markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace.
    pub ns: Namespace,
    /// Local name (`g`, `defs`, `clipPath`, ...).
    pub name: String,
    /// Attributes in source order.
    pub attrs: Vec<XmlAttr>,
    /// Children in source order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Empty SVG-namespace element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ns: Namespace::Svg,
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `true` for the SVG element `name`.
    pub fn is(&self, name: &str) -> bool {
        self.ns == Namespace::Svg && self.name == name
    }

    /// Value of the SVG (un-prefixed) attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns == Namespace::Svg && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of the first attribute with local name `name`, in any namespace.
    pub fn attr_any_ns(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// `href` or `xlink:href`.
    pub fn href(&self) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == "href" && matches!(a.ns, Namespace::Svg | Namespace::XLink))
            .map(|a| a.value.as_str())
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Set or replace an SVG attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|a| a.ns == Namespace::Svg && a.name == name)
        {
            Some(a) => a.value = value,
            None => self.attrs.push(XmlAttr {
                ns: Namespace::Svg,
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Child elements.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Child element at element-index `i`.
    pub fn element_at(&self, i: usize) -> Option<&XmlElement> {
        self.elements().nth(i)
    }

    /// Pre-order walk of this element and every descendant element.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            out.push(e);
            let children: Vec<&XmlElement> = e.elements().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Serialize as XML. Elements and attributes in foreign namespaces are skipped.
    pub fn write_to(&self, out: &mut String) {
        let Some(tag) = qualified(&self.ns, &self.name) else {
            return;
        };
        let _ = write!(out, "<{tag}");
        for a in &self.attrs {
            if let Some(name) = qualified(&a.ns, &a.name) {
                let _ = write!(out, " {name}=\"{}\"", escape(&a.value));
            }
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(out),
                XmlNode::Text(t) => out.push_str(&escape(t)),
            }
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn qualified(ns: &Namespace, name: &str) -> Option<String> {
    match ns {
        Namespace::Svg => Some(name.to_string()),
        Namespace::XLink => Some(format!("xlink:{name}")),
        Namespace::Xml => Some(format!("xml:{name}")),
        Namespace::Foreign(_) => None,
    }
}

/// A parsed SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    /// The `<svg>` root element.
    pub root: XmlElement,
}

impl SvgDocument {
    /// Parse SVG text. Internal DTD entities (common in tool exports) are expanded.
    pub fn parse(text: &str) -> QuireResult<Self> {
        if text.trim().is_empty() {
            return Err(QuireError::ingest("vector document is empty"));
        }
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, opts)
            .map_err(|e| QuireError::ingest(format!("parse vector document: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(QuireError::ingest(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }
        Ok(Self {
            root: convert(root),
        })
    }

    /// Element at an element-index path from the root.
    pub fn at_path(&self, path: &[usize]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(&self.root, |e, i| e.element_at(*i))
    }

    /// First element carrying `id`, searched in document order.
    pub fn find_by_id(&self, id: &str) -> Option<&XmlElement> {
        self.root
            .descendants()
            .into_iter()
            .find(|e| e.id() == Some(id))
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> XmlElement {
    let tag = node.tag_name();
    let attrs = node
        .attributes()
        .map(|a| XmlAttr {
            ns: Namespace::from_uri(a.namespace()),
            name: a.name().to_string(),
            value: a.value().to_string(),
        })
        .collect();
    let keep_blank = matches!(tag.name(), "text" | "tspan");
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(XmlNode::Element(convert(child)));
        } else if child.is_text()
            && let Some(t) = child.text()
            && (keep_blank || !t.trim().is_empty())
        {
            children.push(XmlNode::Text(t.to_string()));
        }
    }
    XmlElement {
        ns: Namespace::from_uri(tag.namespace()),
        name: tag.name().to_string(),
        attrs,
        children,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/xml.rs"]
mod tests;
