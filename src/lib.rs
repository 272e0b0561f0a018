//! Quire is the canvas core of a print-template editor.
//!
//! It owns the editable scene behind book covers, spreads and inner pages: a page-sized
//! workspace with bleed and safe-zone guides, a z-ordered object list, rulers with
//! unit-aware snapping, and a coalescing render scheduler. Vendor SVG templates are
//! ingested and flattened into plain scene objects.
//!
//! # Architecture
//!
//! 1. **Kernel**: [`Editor`] owns the [`Scene`] and runs [`Plugin`] lifecycle hooks in
//!    registration order (reverse order for `after_*` and `destroyed`). Plugins talk to each
//!    other through the [`EventBus`].
//! 2. **Workspace**: [`WorkspacePlugin`] keeps the page object, its clip region and the
//!    cut/safe print guides in sync with [`WorkspaceOptions`].
//! 3. **Layers**: reorder, delete, lock, group and move operations on [`Editor`] that keep
//!    z-order bands and companion objects intact.
//! 4. **Ingestion**: [`TemplateIngestor`] classifies, cleans, imports and flattens SVG
//!    templates; [`Editor::add_template`] merges a page into the scene.
//! 5. **Rulers**: [`RulerPlugin`] produces tick frames and drives guideline drags and
//!    center/grid/angle snapping.
//! 6. **Rendering**: [`RenderScheduler`] coalesces requests into one render per frame and
//!    [`CacheManager`] evicts per-object rasters under a byte ceiling.
//!
//! The engine is single-threaded; only font loading fans out to a rayon pool.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod ingest;
mod layers;
mod plugin;
mod render;
mod ruler;
mod scene;
mod workspace;

pub use foundation::core::{
    Affine, BezPath, MM_PER_INCH, OriginX, OriginY, Point, Rect, Rgba8, Size, Unit, Vec2,
    approx_eq, mm_to_px, px_to_mm,
};
pub use foundation::error::{QuireError, QuireResult};
pub use ingest::classify::{Classification, MULTI_PAGE_DEPTH, PageLayout, Wrapper, classify};
pub use ingest::clean::{Provenance, decode_tool_id, strip_tool_markup};
pub use ingest::clip::{IdIndex, ReferenceChain, find_background, resolve_chain, url_ref};
pub use ingest::flatten::{
    DEFAULT_ID, FIXED_MARK, FLOATING_MARK, FlattenedPage, SYNTHETIC_BACKGROUND_ID, flatten,
};
pub use ingest::fonts::{
    DirectoryFontProvider, FontCache, FontProvider, SystemFontProvider, is_generic_family,
};
pub use ingest::import::{ImportedObject, ImportedPage, UsvgImporter, VectorImporter};
pub use ingest::pipeline::{IngestedTemplate, TemplateIngestor, TemplatePage};
pub use ingest::xml::{Namespace, SvgDocument, XmlAttr, XmlElement, XmlNode};
pub use layers::command::HostCommand;
pub use layers::engine::{LayerMove, MOLD_ICON_SUFFIX, OUTLINE_SUFFIX};
pub use plugin::bus::{EventBus, PluginId};
pub use plugin::event::{EditorEvent, EventKind};
pub use plugin::kernel::{Editor, EditorContext, Hook, HookFailure, Plugin, TickReport};
pub use plugin::options::EditorOptions;
pub use render::cache::{CacheEntry, CacheManager, CacheOpts, CacheStats};
pub use render::plugin::CachePlugin;
pub use render::scheduler::{RenderScheduler, SchedulerStats};
pub use render::surface::{CachedRaster, RenderOutcome, RenderSurface, SvgSurface};
pub use render::svg_export::{SvgExportOpts, scene_to_svg};
pub use ruler::guideline::{GUIDE_ID_PREFIX, RULER_SIZE};
pub use ruler::plugin::{Centerlines, RulerFrame, RulerPlugin};
pub use ruler::snap::{CenterSnap, SnapConfig, snap_angle, snap_to_grid, snap_to_unit};
pub use ruler::ticks::{Tick, ruler_ticks, tick_gap};
pub use ruler::viewport::Viewport;
pub use scene::arena::ObjectKey;
pub use scene::document::{DOCUMENT_VERSION, SceneDocument};
pub use scene::history::{History, Snapshot};
pub use scene::object::{
    Band, ClipRegion, ExtensionType, GuideAxis, ObjectFlags, ObjectKind, ObjectTransform, Paint,
    SceneObject,
};
pub use scene::store::{Scene, SceneEvent, SceneId};
pub use workspace::guides::{CUT_BORDER_ID, GuideVisibility, PrintGuideKind, SAFE_BORDER_ID};
pub use workspace::plugin::WorkspacePlugin;
pub use workspace::settings::{RenderProfile, WORKSPACE_ID, WorkspaceOptions};
pub use workspace::zorder::{band_range, enforce_layering, is_layered, layered_order};
