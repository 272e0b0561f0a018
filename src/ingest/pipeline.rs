use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::foundation::error::{QuireError, QuireResult};
use crate::ingest::classify::{Classification, classify};
use crate::ingest::clean::{
    Provenance, assign_leaf_ids, class_font_families, font_families, page_markup,
    strip_tool_markup,
};
use crate::ingest::clip::{IdIndex, find_background, resolve_chain};
use crate::ingest::flatten::flatten;
use crate::ingest::fonts::{FontCache, FontProvider, SystemFontProvider};
use crate::ingest::import::{ImportedPage, UsvgImporter, VectorImporter};
use crate::ingest::xml::SvgDocument;
use crate::plugin::kernel::Editor;
use crate::scene::arena::ObjectKey;
use crate::scene::object::{ClipRegion, ObjectKind, SceneObject};
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// One flattened page, ready to merge into a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatePage {
    /// Zero-based page number.
    pub index: usize,
    /// Element-index path of the page root in the source document.
    pub source_path: Vec<usize>,
    /// Id of the page root, if it had one.
    pub source_id: Option<String>,
    /// Id of the group designated as background art.
    pub background_id: Option<String>,
    /// Font families the page's text needs.
    pub fonts: BTreeSet<String>,
    /// Objects in paint order, in workspace coordinates.
    pub objects: Vec<SceneObject>,
    /// Source information per object id.
    pub provenance: BTreeMap<String, Provenance>,
    /// References that could not be resolved and were skipped.
    pub missing_refs: Vec<String>,
}

/// Everything one ingestion run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct IngestedTemplate {
    /// Structural classification of the source.
    pub classification: Classification,
    /// Pages in document order.
    pub pages: Vec<TemplatePage>,
}

struct PreparedPage {
    source_path: Vec<usize>,
    source_id: Option<String>,
    background_id: Option<String>,
    fonts: BTreeSet<String>,
    markup: String,
    provenance: BTreeMap<String, Provenance>,
    missing_refs: Vec<String>,
}

/// Turns illustration-tool SVG exports into flat, editable page object lists.
///
/// The importer and font cache are injected so tests and hosts can substitute their own.
pub struct TemplateIngestor {
    importer: Box<dyn VectorImporter>,
    fonts: FontCache,
}

impl TemplateIngestor {
    /// Ingestor with an explicit importer and font provider.
    pub fn new(importer: Box<dyn VectorImporter>, provider: Arc<dyn FontProvider>) -> Self {
        Self {
            importer,
            fonts: FontCache::new(provider),
        }
    }

    /// usvg import with fonts from the host system.
    pub fn with_defaults() -> Self {
        Self::new(Box::new(UsvgImporter), Arc::new(SystemFontProvider::new()))
    }

    /// Fonts loaded by previous runs.
    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Parse, classify, clean and flatten `svg` into pages sized for `workspace`.
    ///
    /// All fonts of all pages are loaded, in parallel, before any page is imported so text
    /// boxes are measured with the real faces. Font and parse failures abort the run.
    #[tracing::instrument(skip(self, svg, workspace), fields(bytes = svg.len()))]
    pub fn ingest(
        &mut self,
        svg: &str,
        workspace: &WorkspaceOptions,
    ) -> QuireResult<IngestedTemplate> {
        workspace.validate()?;
        let mut doc = SvgDocument::parse(svg)?;
        strip_tool_markup(&mut doc.root);
        let classification = classify(&doc);

        let prepared = prepare_pages(&doc, &classification)?;

        let needed: BTreeSet<String> = prepared
            .iter()
            .flat_map(|p| p.fonts.iter().cloned())
            .collect();
        self.fonts.ensure(&needed)?;

        let mut pages = Vec::with_capacity(prepared.len());
        for (index, page) in prepared.into_iter().enumerate() {
            let mut imported = self.importer.import(&page.markup, &self.fonts)?;
            let mut provenance = page.provenance;
            attach_provenance(&mut imported, &mut provenance);
            let flat = flatten(imported, workspace);
            tracing::debug!(
                page = index,
                objects = flat.objects.len(),
                scale = flat.scale,
                "page flattened"
            );
            pages.push(TemplatePage {
                index,
                source_path: page.source_path,
                source_id: page.source_id,
                background_id: page.background_id,
                fonts: page.fonts,
                objects: flat.objects,
                provenance,
                missing_refs: page.missing_refs,
            });
        }

        tracing::info!(
            layout = ?classification.layout,
            wrapper = ?classification.wrapper,
            pages = pages.len(),
            objects = pages.iter().map(|p| p.objects.len()).sum::<usize>(),
            fonts = needed.len(),
            "template ingested"
        );
        Ok(IngestedTemplate {
            classification,
            pages,
        })
    }
}

fn prepare_pages(
    doc: &SvgDocument,
    classification: &Classification,
) -> QuireResult<Vec<PreparedPage>> {
    let index = IdIndex::new(doc);
    let classes = class_font_families(&doc.root);
    let mut taken: HashSet<String> = doc
        .root
        .descendants()
        .into_iter()
        .filter_map(|e| e.id().map(str::to_string))
        .collect();

    let mut out = Vec::with_capacity(classification.pages.len());
    for (i, path) in classification.pages.iter().enumerate() {
        let source = doc
            .at_path(path)
            .ok_or_else(|| QuireError::ingest(format!("page {} not found at {path:?}", i + 1)))?;
        let mut page = source.clone();
        let provenance = assign_leaf_ids(&mut page, &format!("page{}", i + 1), &mut taken);
        let chain = resolve_chain(&index, &[&page]);
        out.push(PreparedPage {
            source_path: path.clone(),
            source_id: page.id().map(str::to_string),
            background_id: find_background(&page)
                .and_then(|g| g.id())
                .map(str::to_string),
            fonts: font_families(&page, &classes),
            markup: page_markup(&doc.root, &page, &chain, &index),
            provenance,
            missing_refs: chain.missing,
        });
    }
    Ok(out)
}

/// Fill image sources from the markup and record ancestry for objects the importer created.
fn attach_provenance(page: &mut ImportedPage, provenance: &mut BTreeMap<String, Provenance>) {
    for imported in &mut page.objects {
        let entry = provenance
            .entry(imported.object.id.clone())
            .or_insert_with(|| Provenance {
                ancestors: imported.ancestors.clone(),
                ..Provenance::default()
            });
        if let ObjectKind::Image { src, .. } = &mut imported.object.kind
            && src.is_none()
        {
            src.clone_from(&entry.href);
        }
    }
}

// Appends `objects` in order; on the first failure the ones already added are removed again.
fn add_all_or_none(
    scene: &mut Scene,
    objects: impl IntoIterator<Item = SceneObject>,
) -> QuireResult<Vec<ObjectKey>> {
    let mut keys = Vec::new();
    for obj in objects {
        match scene.add(obj) {
            Ok(key) => keys.push(key),
            Err(e) => {
                for key in keys.into_iter().rev() {
                    scene.remove(key);
                }
                return Err(e);
            }
        }
    }
    Ok(keys)
}

impl Editor {
    /// Merge one ingested page into the scene as a single undo step.
    ///
    /// Ids that clash with existing objects are renamed, and clip and parent references are
    /// rewritten to follow. Rendering is paused for the batch and resumes with one render.
    #[tracing::instrument(
        skip(self, page),
        fields(page = page.index, objects = page.objects.len())
    )]
    pub fn add_template(&mut self, page: &TemplatePage) -> QuireResult<Vec<ObjectKey>> {
        if !self.ensure_live("add_template") {
            return Err(QuireError::surface("editor is torn down"));
        }
        if let Some(bad) = page.objects.iter().find(|o| o.id.is_empty() || !o.is_finite()) {
            return Err(QuireError::validation(format!(
                "template object '{}' is not a valid scene object",
                bad.id
            )));
        }

        let mut planned: HashSet<String> = HashSet::new();
        let mut renames: HashMap<&str, String> = HashMap::new();
        let mut new_ids = Vec::with_capacity(page.objects.len());
        for obj in &page.objects {
            let mut id = self.ctx.scene.unique_id(&obj.id);
            let mut n = 0u64;
            while planned.contains(&id) {
                n += 1;
                id = self.ctx.scene.unique_id(&format!("{}_{n}", obj.id));
            }
            planned.insert(id.clone());
            if id != obj.id {
                renames.entry(obj.id.as_str()).or_insert_with(|| id.clone());
            }
            new_ids.push(id);
        }
        let rename = |id: &str| renames.get(id).cloned().unwrap_or_else(|| id.to_string());

        let objects = page.objects.iter().zip(new_ids).map(|(obj, id)| {
            let mut obj = obj.clone();
            obj.id = id;
            if let Some(ClipRegion::Object { id }) = &mut obj.clip {
                *id = rename(id.as_str());
            }
            if let Some(parent) = &mut obj.parent_id {
                *parent = rename(parent.as_str());
            }
            obj
        });
        let result = self.ctx.bulk(|ctx| add_all_or_none(&mut ctx.scene, objects));
        self.dispatch();
        let keys = result?;
        tracing::info!(added = keys.len(), renamed = renames.len(), "template page added");
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/pipeline.rs"]
mod tests;
