use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{QuireError, QuireResult};

const MIN_ZOOM: f64 = 0.01;
const MAX_ZOOM: f64 = 100.0;

/// Zoom and pan of the canvas over the scene.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Screen pixels per scene pixel.
    pub zoom: f64,
    /// Screen offset of the scene origin.
    pub pan: Vec2,
    /// Canvas width in screen pixels.
    pub canvas_width: f64,
    /// Canvas height in screen pixels.
    pub canvas_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            canvas_width: 1280.0,
            canvas_height: 800.0,
        }
    }
}

impl Viewport {
    /// Check zoom and canvas size.
    pub fn validate(&self) -> QuireResult<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(QuireError::validation("viewport zoom must be finite and > 0"));
        }
        if !self.pan.x.is_finite() || !self.pan.y.is_finite() {
            return Err(QuireError::validation("viewport pan must be finite"));
        }
        if !self.canvas_width.is_finite()
            || !self.canvas_height.is_finite()
            || self.canvas_width <= 0.0
            || self.canvas_height <= 0.0
        {
            return Err(QuireError::validation("viewport canvas size must be > 0"));
        }
        Ok(())
    }

    /// Scene-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Map a scene point to screen space.
    pub fn scene_to_screen(&self, p: Point) -> Point {
        self.transform() * p
    }

    /// Map a screen point to scene space.
    pub fn screen_to_scene(&self, p: Point) -> Point {
        self.transform().inverse() * p
    }

    /// Portion of the scene currently on screen.
    pub fn visible_scene_rect(&self) -> Rect {
        self.transform()
            .inverse()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.canvas_width, self.canvas_height))
    }

    /// Set the zoom, keeping the scene point under `anchor` (screen space) fixed.
    ///
    /// The zoom is clamped to the supported range; non-finite input is rejected.
    pub fn zoom_at(&mut self, zoom: f64, anchor: Point) -> QuireResult<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(QuireError::validation("viewport zoom must be finite and > 0"));
        }
        if !anchor.is_finite() {
            return Err(QuireError::validation("zoom anchor must be finite"));
        }
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let scene_pt = self.screen_to_scene(anchor);
        self.zoom = zoom;
        self.pan = anchor.to_vec2() - scene_pt.to_vec2() * zoom;
        Ok(())
    }

    /// Zoom and pan so `rect` fits the canvas with `padding` screen pixels around it.
    pub fn fit(&mut self, rect: Rect, padding: f64) {
        let avail_w = (self.canvas_width - 2.0 * padding).max(1.0);
        let avail_h = (self.canvas_height - 2.0 * padding).max(1.0);
        let zoom = crate::foundation::math::uniform_fit_scale(
            avail_w,
            avail_h,
            rect.width(),
            rect.height(),
        )
        .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.pan = Vec2::new(
            (self.canvas_width - rect.width() * zoom) / 2.0 - rect.x0 * zoom,
            (self.canvas_height - rect.height() * zoom) / 2.0 - rect.y0 * zoom,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ruler/viewport.rs"]
mod tests;
