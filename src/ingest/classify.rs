use crate::ingest::xml::{SvgDocument, XmlElement};

/// Nested group levels between the content root and `defs` at which a document is multi-page.
pub const MULTI_PAGE_DEPTH: usize = 3;

/// How the exporting tool wrapped the artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Wrapper {
    /// `<switch>` holding an `extraneous` group.
    Switch,
    /// Top-level groups directly under `<svg>`.
    Flat,
}

/// Page structure detected in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    /// One page.
    Single,
    /// Several pages, one per group.
    Multi,
}

/// Result of structural classification.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Classification {
    /// Wrapper idiom.
    pub wrapper: Wrapper,
    /// Single or multi page.
    pub layout: PageLayout,
    /// Group levels from the content root down to the first `defs`, when there is one.
    pub depth_to_defs: Option<usize>,
    /// Element-index path of each page's root element.
    pub pages: Vec<Vec<usize>>,
}

/// Detect the wrapper idiom and split the document into pages.
pub fn classify(doc: &SvgDocument) -> Classification {
    match switch_content_root(&doc.root) {
        Some(content_path) => classify_switch(doc, content_path),
        None => classify_flat(doc),
    }
}

fn classify_switch(doc: &SvgDocument, content_path: Vec<usize>) -> Classification {
    let content = doc.at_path(&content_path).unwrap_or(&doc.root);
    let depth = group_depth_to_defs(content);
    let page_groups = child_groups(content, |_| true);
    let multi = depth.is_some_and(|d| d >= MULTI_PAGE_DEPTH) && !page_groups.is_empty();

    let pages = if multi {
        page_groups
            .into_iter()
            .map(|i| with_index(&content_path, i))
            .collect()
    } else {
        vec![content_path]
    };
    Classification {
        wrapper: Wrapper::Switch,
        layout: if multi {
            PageLayout::Multi
        } else {
            PageLayout::Single
        },
        depth_to_defs: depth,
        pages,
    }
}

fn classify_flat(doc: &SvgDocument) -> Classification {
    let unclipped = child_groups(&doc.root, |g| g.attr("clip-path").is_none());
    let multi = unclipped.len() >= 2;
    Classification {
        wrapper: Wrapper::Flat,
        layout: if multi {
            PageLayout::Multi
        } else {
            PageLayout::Single
        },
        depth_to_defs: group_depth_to_defs(&doc.root),
        pages: if multi {
            unclipped.into_iter().map(|i| vec![i]).collect()
        } else {
            vec![Vec::new()]
        },
    }
}

/// Path of the `extraneous` group inside the top-level `<switch>`, if the document has one.
fn switch_content_root(root: &XmlElement) -> Option<Vec<usize>> {
    let (si, switch) = root.elements().enumerate().find(|(_, e)| e.is("switch"))?;
    let mut groups = switch.elements().enumerate().filter(|(_, e)| e.is("g"));
    let extraneous = switch
        .elements()
        .enumerate()
        .find(|(_, e)| e.is("g") && e.attr_any_ns("extraneous").is_some());
    let (gi, _) = extraneous.or_else(|| groups.next())?;
    Some(vec![si, gi])
}

/// Count of nested `<g>` levels below `start` on the way to the first `<defs>`, in document
/// order. Only group chains are followed.
pub(crate) fn group_depth_to_defs(start: &XmlElement) -> Option<usize> {
    let mut stack = vec![(start, 0usize)];
    while let Some((el, depth)) = stack.pop() {
        let children: Vec<&XmlElement> = el.elements().collect();
        if children.iter().any(|c| c.is("defs")) {
            return Some(depth);
        }
        for child in children.into_iter().rev().filter(|c| c.is("g")) {
            stack.push((child, depth + 1));
        }
    }
    None
}

fn child_groups(parent: &XmlElement, keep: impl Fn(&XmlElement) -> bool) -> Vec<usize> {
    parent
        .elements()
        .enumerate()
        .filter(|(_, e)| e.is("g") && keep(e))
        .map(|(i, _)| i)
        .collect()
}

fn with_index(path: &[usize], i: usize) -> Vec<usize> {
    let mut out = path.to_vec();
    out.push(i);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/classify.rs"]
mod tests;
