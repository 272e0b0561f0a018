use crate::foundation::core::{Rect, Unit, mm_to_px};
use crate::foundation::error::{QuireError, QuireResult};

/// Id of the workspace scene object.
pub const WORKSPACE_ID: &str = "workspace";

/// Which clip and framing rules the editor applies to the workspace.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderProfile {
    /// Content is clipped to the page.
    #[default]
    Bounded,
    /// Content may extend past the page; ingested pages get a white backing rectangle.
    Unbounded,
    /// Presentation view for mockups; no clipping.
    Mockup,
    /// Envelope layouts; clipped like `Bounded`.
    Envelope,
}

impl RenderProfile {
    /// `true` when content is clipped to the workspace.
    pub fn clips_content(self) -> bool {
        match self {
            RenderProfile::Bounded | RenderProfile::Envelope => true,
            RenderProfile::Unbounded | RenderProfile::Mockup => false,
        }
    }
}

/// Page geometry and print margins.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkspaceOptions {
    /// Page width in device pixels.
    pub width: f64,
    /// Page height in device pixels.
    pub height: f64,
    /// Device pixels per inch.
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    /// Bleed margin trimmed off at the cut line, in device pixels.
    #[serde(default)]
    pub cut_size: f64,
    /// Additional inset from the cut line that content should respect, in device pixels.
    #[serde(default)]
    pub safe_size: f64,
    /// Unit shown to the user.
    #[serde(default)]
    pub unit: Unit,
    /// Clip and framing profile.
    #[serde(default)]
    pub profile: RenderProfile,
}

fn default_dpi() -> f64 {
    300.0
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            width: 2480.0,
            height: 3508.0,
            dpi: default_dpi(),
            cut_size: 0.0,
            safe_size: 0.0,
            unit: Unit::Px,
            profile: RenderProfile::Bounded,
        }
    }
}

impl WorkspaceOptions {
    /// Page of `width_mm` x `height_mm` with `bleed_mm` cut margin at `dpi`.
    pub fn from_mm(width_mm: f64, height_mm: f64, bleed_mm: f64, dpi: f64) -> Self {
        Self {
            width: mm_to_px(width_mm, dpi),
            height: mm_to_px(height_mm, dpi),
            dpi,
            cut_size: mm_to_px(bleed_mm, dpi),
            unit: Unit::Mm,
            ..Self::default()
        }
    }

    /// Check sizes and margins.
    pub fn validate(&self) -> QuireResult<()> {
        for (name, v) in [("width", self.width), ("height", self.height), ("dpi", self.dpi)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(QuireError::validation(format!(
                    "workspace {name} must be finite and > 0"
                )));
            }
        }
        for (name, v) in [("cut_size", self.cut_size), ("safe_size", self.safe_size)] {
            if !v.is_finite() || v < 0.0 {
                return Err(QuireError::validation(format!(
                    "workspace {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Page rectangle in scene coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/settings.rs"]
mod tests;
