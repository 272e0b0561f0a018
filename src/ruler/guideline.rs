use crate::foundation::core::{Point, Rgba8, Unit};
use crate::ruler::snap::snap_to_unit;
use crate::scene::object::{ExtensionType, GuideAxis, ObjectKind, SceneObject};

/// Thickness of each ruler strip in screen pixels.
pub const RULER_SIZE: f64 = 20.0;

/// Guides extend this far past the origin on both sides, in scene pixels.
const GUIDE_EXTENT: f64 = 100_000.0;

/// Id prefix of guide line objects.
pub const GUIDE_ID_PREFIX: &str = "guide";

/// A guide line object at `position` (scene y for horizontal guides, scene x for vertical).
pub fn guideline_object(id: impl Into<String>, axis: GuideAxis, position: f64) -> SceneObject {
    let mut obj = SceneObject::new(
        id,
        ObjectKind::Line {
            axis,
            length: 2.0 * GUIDE_EXTENT,
        },
    )
    .with_extension(ExtensionType::Guideline);
    obj.paint.fill = None;
    obj.paint.stroke = Some(Rgba8::rgb(0x1e, 0x88, 0xe5));
    obj.paint.stroke_width = 1.0;
    set_guide_position(&mut obj, axis, position);
    obj
}

/// Scene coordinate a guide sits at, `None` for non-guide objects.
pub fn guide_position(obj: &SceneObject) -> Option<(GuideAxis, f64)> {
    if obj.extension != ExtensionType::Guideline {
        return None;
    }
    match obj.kind {
        ObjectKind::Line {
            axis: GuideAxis::Horizontal,
            ..
        } => Some((GuideAxis::Horizontal, obj.transform.top)),
        ObjectKind::Line {
            axis: GuideAxis::Vertical,
            ..
        } => Some((GuideAxis::Vertical, obj.transform.left)),
        _ => None,
    }
}

pub(crate) fn set_guide_position(obj: &mut SceneObject, axis: GuideAxis, position: f64) {
    match axis {
        GuideAxis::Horizontal => {
            obj.transform.left = -GUIDE_EXTENT;
            obj.transform.top = position;
        }
        GuideAxis::Vertical => {
            obj.transform.left = position;
            obj.transform.top = -GUIDE_EXTENT;
        }
    }
}

/// Scene coordinate along the guide's moving axis, rounded to a whole display unit.
pub fn snapped_guide_position(axis: GuideAxis, scene: Point, unit: Unit, dpi: f64) -> f64 {
    let raw = match axis {
        GuideAxis::Horizontal => scene.y,
        GuideAxis::Vertical => scene.x,
    };
    snap_to_unit(raw, unit, dpi)
}

/// `true` when `screen` lies over the ruler strip a guide of `axis` is dragged out of.
///
/// Horizontal guides come from the top strip, vertical guides from the left one.
pub fn over_origin_ruler(axis: GuideAxis, screen: Point) -> bool {
    match axis {
        GuideAxis::Horizontal => screen.y < RULER_SIZE,
        GuideAxis::Vertical => screen.x < RULER_SIZE,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ruler/guideline.rs"]
mod tests;
