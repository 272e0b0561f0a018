use crate::foundation::core::{Point, Rect, Unit};
use crate::foundation::error::{QuireError, QuireResult};

/// Thresholds used while dragging, scaling and rotating.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Center distance below which a centerline is shown, in scene pixels.
    pub display_threshold: f64,
    /// Center distance below which the object is pulled onto the centerline.
    pub snap_threshold: f64,
    /// Optional grid pitch in scene pixels.
    pub grid: Option<f64>,
    /// Rotation snap step in degrees.
    pub angle_step: f64,
    /// Rotation snap tolerance in degrees.
    pub angle_threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            display_threshold: 10.0,
            snap_threshold: 5.0,
            grid: None,
            angle_step: 45.0,
            angle_threshold: 5.0,
        }
    }
}

impl SnapConfig {
    /// Check thresholds; the snap threshold must not exceed the display threshold.
    pub fn validate(&self) -> QuireResult<()> {
        for (name, v) in [
            ("display_threshold", self.display_threshold),
            ("snap_threshold", self.snap_threshold),
            ("angle_threshold", self.angle_threshold),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(QuireError::validation(format!(
                    "snap {name} must be finite and >= 0"
                )));
            }
        }
        if self.snap_threshold > self.display_threshold {
            return Err(QuireError::validation(
                "snap threshold must not exceed display threshold",
            ));
        }
        if !self.angle_step.is_finite() || self.angle_step <= 0.0 {
            return Err(QuireError::validation("snap angle_step must be finite and > 0"));
        }
        if let Some(g) = self.grid
            && (!g.is_finite() || g <= 0.0)
        {
            return Err(QuireError::validation("snap grid must be finite and > 0"));
        }
        Ok(())
    }
}

/// Outcome of a centerline evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterSnap {
    /// Object center after snapping.
    pub center: Point,
    /// Show the vertical centerline (`x = workspace center`).
    pub show_vertical: bool,
    /// Show the horizontal centerline (`y = workspace center`).
    pub show_horizontal: bool,
    /// The x coordinate was pulled onto the centerline.
    pub snapped_x: bool,
    /// The y coordinate was pulled onto the centerline.
    pub snapped_y: bool,
}

impl CenterSnap {
    fn unchanged(center: Point) -> Self {
        Self {
            center,
            show_vertical: false,
            show_horizontal: false,
            snapped_x: false,
            snapped_y: false,
        }
    }
}

/// Evaluate centerline display and snapping for an object occupying `bounds`.
///
/// Axes are independent: a diagonal drag can snap on one axis only. An object whose bounds
/// reach outside the workspace gets neither lines nor snapping.
pub fn snap_center(bounds: Rect, workspace: Rect, cfg: &SnapConfig) -> CenterSnap {
    let center = bounds.center();
    let inside = bounds.x0 >= workspace.x0
        && bounds.x1 <= workspace.x1
        && bounds.y0 >= workspace.y0
        && bounds.y1 <= workspace.y1;
    if !inside {
        return CenterSnap::unchanged(center);
    }

    let target = workspace.center();
    let dx = (center.x - target.x).abs();
    let dy = (center.y - target.y).abs();
    let mut out = CenterSnap::unchanged(center);
    out.show_vertical = dx < cfg.display_threshold;
    out.show_horizontal = dy < cfg.display_threshold;
    if dx < cfg.snap_threshold {
        out.center.x = target.x;
        out.snapped_x = true;
    }
    if dy < cfg.snap_threshold {
        out.center.y = target.y;
        out.snapped_y = true;
    }
    out
}

/// Round `p` to the nearest grid intersection.
pub fn snap_to_grid(p: Point, pitch: f64) -> Point {
    if !pitch.is_finite() || pitch <= 0.0 {
        return p;
    }
    Point::new((p.x / pitch).round() * pitch, (p.y / pitch).round() * pitch)
}

/// Snap a rotation to the nearest multiple of `angle_step` when within tolerance.
///
/// The result is normalized to `[0, 360)`.
pub fn snap_angle(angle_deg: f64, cfg: &SnapConfig) -> f64 {
    let a = angle_deg.rem_euclid(360.0);
    let nearest = (a / cfg.angle_step).round() * cfg.angle_step;
    let snapped = if (a - nearest).abs() < cfg.angle_threshold {
        nearest
    } else {
        a
    };
    snapped.rem_euclid(360.0)
}

/// Round a scene-pixel coordinate to the nearest whole display unit.
pub fn snap_to_unit(value_px: f64, unit: Unit, dpi: f64) -> f64 {
    unit.to_px(unit.from_px(value_px, dpi).round(), dpi)
}

#[cfg(test)]
#[path = "../../tests/unit/ruler/snap.rs"]
mod tests;
