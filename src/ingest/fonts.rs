use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use usvg::fontdb;

use crate::foundation::error::{QuireError, QuireResult};

const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "cursive",
    "fantasy",
    "monospace",
    "system-ui",
];

/// `true` for CSS generic family keywords, which never need loading.
pub fn is_generic_family(family: &str) -> bool {
    GENERIC_FAMILIES
        .iter()
        .any(|g| g.eq_ignore_ascii_case(family.trim()))
}

/// Resolves a font family name to font file data.
///
/// Implementations may block (disk, network); [`FontCache`] calls them from a rayon pool.
pub trait FontProvider: Send + Sync {
    /// Raw font files (TTF/OTF/TTC) for `family`, or a [`QuireError::Font`] when unknown.
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>>;
}

/// Face lookup shared by the directory and system providers.
struct FaceIndex {
    db: fontdb::Database,
}

impl FaceIndex {
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>> {
        let ids: Vec<fontdb::ID> = self
            .db
            .faces()
            .filter(|face| {
                face.families
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case(family))
                    || face.post_script_name.eq_ignore_ascii_case(family)
            })
            .map(|face| face.id)
            .collect();

        let mut out: Vec<Vec<u8>> = Vec::new();
        for id in ids {
            if let Some(data) = self.db.with_face_data(id, |data, _| data.to_vec())
                && !out.contains(&data)
            {
                out.push(data);
            }
        }
        if out.is_empty() {
            return Err(QuireError::font(format!("font family '{family}' not found")));
        }
        Ok(out)
    }
}

/// Serves fonts from `.ttf`, `.otf` and `.ttc` files in a set of directories.
pub struct DirectoryFontProvider {
    faces: FaceIndex,
}

impl DirectoryFontProvider {
    /// Scan `dirs` (non-recursively). Missing directories are skipped.
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut db = fontdb::Database::new();
        for dir in dirs {
            load_fonts_from_dir(&mut db, &dir);
        }
        tracing::debug!(faces = db.len(), "font directory provider ready");
        Self {
            faces: FaceIndex { db },
        }
    }

    /// Number of faces found.
    pub fn face_count(&self) -> usize {
        self.faces.db.len()
    }
}

impl FontProvider for DirectoryFontProvider {
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>> {
        self.faces.load(family)
    }
}

/// Serves fonts installed on the host.
pub struct SystemFontProvider {
    faces: FaceIndex,
}

impl SystemFontProvider {
    /// Query the system font directories once.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self {
            faces: FaceIndex { db },
        }
    }
}

impl Default for SystemFontProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FontProvider for SystemFontProvider {
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>> {
        self.faces.load(family)
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| matches!(ext.as_str(), "ttf" | "otf" | "ttc"));
        if is_font && let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

/// Families loaded so far plus the font database built from them.
///
/// Owned by the ingestion pipeline and handed to the importer; nothing is global, so
/// separate editors never share loaded fonts.
pub struct FontCache {
    provider: Arc<dyn FontProvider>,
    db: Arc<fontdb::Database>,
    loaded: BTreeSet<String>,
}

impl FontCache {
    /// Empty cache backed by `provider`.
    pub fn new(provider: Arc<dyn FontProvider>) -> Self {
        Self {
            provider,
            db: Arc::new(fontdb::Database::new()),
            loaded: BTreeSet::new(),
        }
    }

    /// `true` once `family` has been loaded.
    pub fn is_loaded(&self, family: &str) -> bool {
        self.loaded.contains(family)
    }

    /// Loaded family names, sorted.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(String::as_str)
    }

    /// Snapshot of the database for vector import and rasterization.
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Load every family in `families` that is not loaded yet.
    ///
    /// Provider calls run in parallel and are all joined before this returns. Families that
    /// loaded are kept even when another one fails; the first failure is returned.
    #[tracing::instrument(skip_all)]
    pub fn ensure<'a>(
        &mut self,
        families: impl IntoIterator<Item = &'a String>,
    ) -> QuireResult<usize> {
        let missing: BTreeSet<&String> = families
            .into_iter()
            .filter(|f| !is_generic_family(f) && !self.loaded.contains(*f))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }
        tracing::debug!(missing = missing.len(), "loading font families");

        let provider = &self.provider;
        let results: Vec<(&String, QuireResult<Vec<Vec<u8>>>)> = missing
            .into_par_iter()
            .map(|family| (family, provider.load(family)))
            .collect();

        let mut first_err = None;
        let mut added = 0usize;
        let db = Arc::make_mut(&mut self.db);
        for (family, result) in results {
            match result {
                Ok(blobs) => {
                    for blob in blobs {
                        db.load_font_data(blob);
                    }
                    self.loaded.insert(family.clone());
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!(family = %family, error = %e, "font load failed");
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(added),
        }
    }
}

/// usvg font selection against a database: named families first, then generic fallbacks,
/// then any face at all.
pub(crate) fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families: Vec<fontdb::Family<'_>> =
                font.families().iter().map(query_family).collect();
            families.extend([
                fontdb::Family::SansSerif,
                fontdb::Family::Serif,
                fontdb::Family::Monospace,
            ]);
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: query_stretch(font.stretch()),
                style: query_style(font.style()),
            };
            db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn query_family(family: &usvg::FontFamily) -> fontdb::Family<'_> {
    match family {
        usvg::FontFamily::Serif => fontdb::Family::Serif,
        usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
        usvg::FontFamily::Cursive => fontdb::Family::Cursive,
        usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
        usvg::FontFamily::Monospace => fontdb::Family::Monospace,
        usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
    }
}

fn query_stretch(stretch: usvg::FontStretch) -> fontdb::Stretch {
    match stretch {
        usvg::FontStretch::UltraCondensed => fontdb::Stretch::UltraCondensed,
        usvg::FontStretch::ExtraCondensed => fontdb::Stretch::ExtraCondensed,
        usvg::FontStretch::Condensed => fontdb::Stretch::Condensed,
        usvg::FontStretch::SemiCondensed => fontdb::Stretch::SemiCondensed,
        usvg::FontStretch::Normal => fontdb::Stretch::Normal,
        usvg::FontStretch::SemiExpanded => fontdb::Stretch::SemiExpanded,
        usvg::FontStretch::Expanded => fontdb::Stretch::Expanded,
        usvg::FontStretch::ExtraExpanded => fontdb::Stretch::ExtraExpanded,
        usvg::FontStretch::UltraExpanded => fontdb::Stretch::UltraExpanded,
    }
}

fn query_style(style: usvg::FontStyle) -> fontdb::Style {
    match style {
        usvg::FontStyle::Normal => fontdb::Style::Normal,
        usvg::FontStyle::Italic => fontdb::Style::Italic,
        usvg::FontStyle::Oblique => fontdb::Style::Oblique,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/fonts.rs"]
mod tests;
