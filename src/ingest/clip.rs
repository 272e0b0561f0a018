use std::collections::{HashMap, HashSet, VecDeque};

use crate::ingest::xml::{SvgDocument, XmlElement};

/// Definitions reachable from a page through `url(#..)` and `href="#.."` references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceChain {
    /// Resolved ids in discovery order, each listed once.
    pub ids: Vec<String>,
    /// Referenced ids with no matching element.
    pub missing: Vec<String>,
}

/// Id lookup over a whole document.
pub struct IdIndex<'a> {
    by_id: HashMap<&'a str, &'a XmlElement>,
}

impl<'a> IdIndex<'a> {
    /// Index every element that carries an id. The first occurrence wins.
    pub fn new(doc: &'a SvgDocument) -> Self {
        let mut by_id = HashMap::new();
        for el in doc.root.descendants() {
            if let Some(id) = el.id() {
                by_id.entry(id).or_insert(el);
            }
        }
        Self { by_id }
    }

    /// Element with `id`.
    pub fn get(&self, id: &str) -> Option<&'a XmlElement> {
        self.by_id.get(id).copied()
    }
}

/// First group below `page`, in document order, that carries a `clip-path`.
///
/// A nested clipped group that precedes a clipped sibling of its ancestor wins.
pub fn find_background(page: &XmlElement) -> Option<&XmlElement> {
    page.descendants()
        .into_iter()
        .skip(1)
        .find(|e| e.is("g") && e.attr("clip-path").is_some())
}

/// Id inside `url(#id)`, tolerating quotes and whitespace.
pub fn url_ref(value: &str) -> Option<&str> {
    let start = value.find("url(")? + 4;
    let rest = &value[start..];
    let end = rest.find(')')?;
    let inner = rest[..end].trim().trim_matches(|c| c == '"' || c == '\'');
    inner.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Ids referenced directly by one element's attributes.
pub fn element_refs(el: &XmlElement) -> Vec<&str> {
    let mut out = Vec::new();
    if let Some(id) = el.href().and_then(|h| h.strip_prefix('#'))
        && !id.is_empty()
    {
        out.push(id);
    }
    for attr in &el.attrs {
        if let Some(id) = url_ref(&attr.value) {
            out.push(id);
        }
    }
    out
}

/// Resolve every definition `roots` depend on, following references transitively.
///
/// Walks a worklist with a visited set, so self- and mutually-referencing clip paths
/// terminate. Missing ids are logged and skipped.
pub fn resolve_chain(index: &IdIndex<'_>, roots: &[&XmlElement]) -> ReferenceChain {
    let mut chain = ReferenceChain::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    for root in roots {
        enqueue(root, &mut queue);
    }

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        match index.get(&id) {
            Some(el) => {
                enqueue(el, &mut queue);
                chain.ids.push(id);
            }
            None => {
                tracing::warn!(id = %id, "unresolved reference skipped");
                chain.missing.push(id);
            }
        }
    }
    chain
}

fn enqueue(el: &XmlElement, queue: &mut VecDeque<String>) {
    for d in el.descendants() {
        queue.extend(element_refs(d).into_iter().map(str::to_string));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/clip.rs"]
mod tests;
