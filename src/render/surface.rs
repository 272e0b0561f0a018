use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{QuireError, QuireResult};
use crate::render::svg_export::{SvgExportOpts, scene_to_svg};
use crate::scene::arena::ObjectKey;
use crate::scene::object::ObjectKind;
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// A per-object raster the surface created while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedRaster {
    /// Object the raster belongs to.
    pub key: ObjectKey,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
}

/// Result of one render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Object caches created by this render; registered with the cache manager.
    pub cached: Vec<CachedRaster>,
}

/// The 2D drawing surface the editor renders into.
///
/// The engine never draws pixels itself; it hands the scene to this collaborator and tracks
/// the per-object caches it reports.
pub trait RenderSurface {
    /// `false` once the surface has been torn down by the host.
    fn is_alive(&self) -> bool;

    /// Draw `scene` and report which object rasters were cached.
    fn render(&mut self, scene: &Scene, workspace: &WorkspaceOptions) -> QuireResult<RenderOutcome>;
}

/// Raster surface that exports the scene to SVG and rasterizes it with resvg.
pub struct SvgSurface {
    scale: f32,
    fontdb: Arc<usvg::fontdb::Database>,
    frame: Option<image::RgbaImage>,
    min_cache_area: f64,
    alive: bool,
}

impl SvgSurface {
    /// Surface rendering at `scale` device pixels per workspace pixel.
    pub fn new(scale: f32, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            scale,
            fontdb,
            frame: None,
            min_cache_area: 64.0 * 64.0,
            alive: true,
        }
    }

    /// Last rendered frame.
    pub fn frame(&self) -> Option<&image::RgbaImage> {
        self.frame.as_ref()
    }

    /// Take ownership of the last rendered frame.
    pub fn take_frame(&mut self) -> Option<image::RgbaImage> {
        self.frame.take()
    }

    /// Mark the surface as gone; subsequent renders fail.
    pub fn tear_down(&mut self) {
        self.alive = false;
        self.frame = None;
    }

    fn cache_candidates(&self, scene: &Scene) -> Vec<CachedRaster> {
        let scale = f64::from(self.scale);
        scene
            .iter()
            .filter(|(_, o)| o.flags.visible)
            .filter(|(_, o)| matches!(o.kind, ObjectKind::Group { .. } | ObjectKind::Image { .. }))
            .filter_map(|(key, o)| {
                let r = o.bounding_rect();
                let (w, h) = (r.width() * scale, r.height() * scale);
                (w * h >= self.min_cache_area).then(|| CachedRaster {
                    key,
                    width: w.ceil() as u32,
                    height: h.ceil() as u32,
                })
            })
            .collect()
    }
}

impl RenderSurface for SvgSurface {
    fn is_alive(&self) -> bool {
        self.alive
    }

    #[tracing::instrument(skip(self, scene, workspace), fields(objects = scene.len()))]
    fn render(
        &mut self,
        scene: &Scene,
        workspace: &WorkspaceOptions,
    ) -> QuireResult<RenderOutcome> {
        if !self.alive {
            return Err(QuireError::surface("render on a torn-down surface"));
        }
        let svg = scene_to_svg(scene, workspace, SvgExportOpts::default());
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: crate::ingest::fonts::font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse exported scene svg")?;

        let w = ((workspace.width as f32) * self.scale).ceil().max(1.0) as u32;
        let h = ((workspace.height as f32) * self.scale).ceil().max(1.0) as u32;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| QuireError::surface(format!("failed to allocate {w}x{h} pixmap")))?;
        let xform = resvg::tiny_skia::Transform::from_scale(self.scale, self.scale);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        let mut rgba = pixmap.take();
        unpremultiply_rgba8_in_place(&mut rgba);
        let frame = image::RgbaImage::from_raw(w, h, rgba)
            .ok_or_else(|| QuireError::surface("rendered buffer has unexpected size"))?;
        self.frame = Some(frame);

        Ok(RenderOutcome {
            cached: self.cache_candidates(scene),
        })
    }
}

fn unpremultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
