use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Rect, Rgba8, Vec2};
use crate::foundation::error::QuireResult;
use crate::scene::object::{ExtensionType, ObjectKind, SceneObject};
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// Id of the cut-border guide object.
pub const CUT_BORDER_ID: &str = "cut-border";
/// Id of the safe-border guide object.
pub const SAFE_BORDER_ID: &str = "safe-border";

/// Relative area difference above which a background outline is treated as non-rectangular.
const NON_RECT_TOLERANCE: f64 = 0.01;

/// The two print guides drawn over the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrintGuideKind {
    /// Where the sheet is trimmed.
    CutBorder,
    /// Inner limit for important content.
    SafeBorder,
}

impl PrintGuideKind {
    /// Both guides, bottom first.
    pub const ALL: [PrintGuideKind; 2] = [PrintGuideKind::CutBorder, PrintGuideKind::SafeBorder];

    /// Scene object id.
    pub fn id(self) -> &'static str {
        match self {
            PrintGuideKind::CutBorder => CUT_BORDER_ID,
            PrintGuideKind::SafeBorder => SAFE_BORDER_ID,
        }
    }

    /// Inset from the page edge in device pixels.
    pub fn inset(self, opts: &WorkspaceOptions) -> f64 {
        match self {
            PrintGuideKind::CutBorder => opts.cut_size,
            PrintGuideKind::SafeBorder => opts.cut_size + opts.safe_size,
        }
    }

    fn color(self) -> Rgba8 {
        match self {
            PrintGuideKind::CutBorder => Rgba8::rgb(0xe5, 0x39, 0x35),
            PrintGuideKind::SafeBorder => Rgba8::rgb(0x43, 0xa0, 0x47),
        }
    }
}

/// Visibility state of one guide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuideVisibility {
    /// Drawn.
    #[default]
    Visible,
    /// Not drawn.
    Hidden,
}

impl GuideVisibility {
    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            GuideVisibility::Visible => GuideVisibility::Hidden,
            GuideVisibility::Hidden => GuideVisibility::Visible,
        }
    }
}

/// Visibility state machine for the cut and safe borders.
///
/// Guides are temporarily suppressed around a save; suppression does not change the user's
/// visibility choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrintGuides {
    cut: GuideVisibility,
    safe: GuideVisibility,
    suppressed: bool,
}

impl PrintGuides {
    /// Both guides visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `kind`.
    pub fn visibility(&self, kind: PrintGuideKind) -> GuideVisibility {
        match kind {
            PrintGuideKind::CutBorder => self.cut,
            PrintGuideKind::SafeBorder => self.safe,
        }
    }

    /// Set the state of `kind`.
    pub fn set(&mut self, kind: PrintGuideKind, visible: bool) {
        let v = if visible {
            GuideVisibility::Visible
        } else {
            GuideVisibility::Hidden
        };
        match kind {
            PrintGuideKind::CutBorder => self.cut = v,
            PrintGuideKind::SafeBorder => self.safe = v,
        }
    }

    /// Flip the state of `kind` and return the new state.
    pub fn toggle(&mut self, kind: PrintGuideKind) -> GuideVisibility {
        let next = self.visibility(kind).toggled();
        self.set(kind, next == GuideVisibility::Visible);
        next
    }

    /// Hide every guide until [`PrintGuides::restore`].
    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    /// End a [`PrintGuides::suppress`].
    pub fn restore(&mut self) {
        self.suppressed = false;
    }

    /// `true` when `kind` should be present in the scene.
    pub fn is_drawn(&self, kind: PrintGuideKind) -> bool {
        !self.suppressed && self.visibility(kind) == GuideVisibility::Visible
    }

    /// Remove and recreate both guide objects from the current workspace and background.
    ///
    /// Returns the number of guides drawn. A guide whose inset is zero, or whose remaining
    /// width or height is not positive, is skipped.
    pub fn regenerate(&self, scene: &mut Scene, opts: &WorkspaceOptions) -> QuireResult<usize> {
        for kind in PrintGuideKind::ALL {
            scene.remove_by_id(kind.id());
        }
        if !scene.is_alive() {
            return Ok(0);
        }

        let background = scene
            .iter()
            .find(|(_, o)| o.extension == ExtensionType::Background)
            .and_then(|(_, o)| o.scene_outline());

        let mut drawn = 0;
        for kind in PrintGuideKind::ALL {
            if !self.is_drawn(kind) {
                continue;
            }
            let inset = kind.inset(opts);
            if inset <= 0.0 {
                continue;
            }
            let Some(path) = guide_path(opts, inset, background.as_ref()) else {
                tracing::debug!(guide = kind.id(), "guide skipped: no room left after margin");
                continue;
            };
            scene.add(guide_object(kind, path))?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

/// Closed path `inset` pixels inside the page or inside a non-rectangular background outline.
///
/// Returns `None` when the remaining width or height is not positive.
pub fn guide_path(
    opts: &WorkspaceOptions,
    inset: f64,
    background: Option<&BezPath>,
) -> Option<BezPath> {
    if let Some(outline) = background
        && is_non_rectangular(outline)
    {
        return inset_outline(outline, inset);
    }
    let page = opts.rect();
    let w = page.width() - 2.0 * inset;
    let h = page.height() - 2.0 * inset;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Rect::new(inset, inset, inset + w, inset + h).to_path(0.1))
}

/// `true` when the outline's enclosed area differs noticeably from its bounding box.
pub fn is_non_rectangular(outline: &BezPath) -> bool {
    if outline.elements().is_empty() {
        return false;
    }
    let bbox = outline.bounding_box();
    let bbox_area = bbox.area();
    if bbox_area <= 0.0 {
        return false;
    }
    let area = outline.area().abs();
    (bbox_area - area).abs() / bbox_area > NON_RECT_TOLERANCE
}

/// Scale `outline` about its bounding-box center so the box shrinks by `inset` on each side.
fn inset_outline(outline: &BezPath, inset: f64) -> Option<BezPath> {
    let bbox = outline.bounding_box();
    let w = bbox.width() - 2.0 * inset;
    let h = bbox.height() - 2.0 * inset;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let c = bbox.center().to_vec2();
    let xf = Affine::translate(c)
        * Affine::scale_non_uniform(w / bbox.width(), h / bbox.height())
        * Affine::translate(-c);
    let mut path = outline.clone();
    path.apply_affine(xf);
    Some(path)
}

fn guide_object(kind: PrintGuideKind, path: BezPath) -> SceneObject {
    let bbox = path.bounding_box();
    let local = {
        let mut p = path;
        p.apply_affine(Affine::translate(Vec2::new(-bbox.x0, -bbox.y0)));
        p
    };
    let mut obj = SceneObject::new(kind.id(), ObjectKind::Path { path: local })
        .at(bbox.x0, bbox.y0)
        .with_extension(ExtensionType::PrintGuide);
    obj.flags.selectable = false;
    obj.flags.locked = true;
    obj.flags.lock_layer_order = true;
    obj.paint.fill = None;
    obj.paint.stroke = Some(kind.color());
    obj.paint.stroke_width = 1.0;
    obj.paint.stroke_dash = vec![6.0, 4.0];
    obj
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/guides.rs"]
mod tests;
