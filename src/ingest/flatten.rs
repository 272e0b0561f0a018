use crate::foundation::core::{Rect, Rgba8, Vec2};
use crate::foundation::math::uniform_fit_scale;
use crate::ingest::import::{ImportedObject, ImportedPage};
use crate::scene::object::{ExtensionType, SceneObject};
use crate::workspace::settings::{RenderProfile, WorkspaceOptions};

/// Id marker for template elements the user may not touch.
pub const FIXED_MARK: &str = "fixed";
/// Id marker for objects kept above ordinary content.
pub const FLOATING_MARK: &str = "floating";
/// Id of a lone object that needs no synthetic background.
pub const DEFAULT_ID: &str = "default";
/// Id given to the inserted white background.
pub const SYNTHETIC_BACKGROUND_ID: &str = "template-background";

/// Page objects remapped into workspace coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedPage {
    /// Objects in paint order, ready to add to a scene.
    pub objects: Vec<SceneObject>,
    /// Uniform page-to-workspace scale.
    pub scale: f64,
    /// Workspace position of the page's top-left corner.
    pub offset: Vec2,
}

/// Remap an imported page into `workspace` and assign template roles.
pub fn flatten(page: ImportedPage, workspace: &WorkspaceOptions) -> FlattenedPage {
    let g = page.bounds;
    let scale = uniform_fit_scale(workspace.width, workspace.height, g.width(), g.height());
    let offset = Vec2::new(
        (workspace.width - g.width() * scale) / 2.0,
        (workspace.height - g.height() * scale) / 2.0,
    );

    let needs_background = needs_synthetic_background(&page.objects, workspace.profile);
    let mut objects: Vec<SceneObject> = page
        .objects
        .into_iter()
        .map(|imported| place(imported, g, scale, offset))
        .collect();

    if needs_background {
        objects.insert(0, synthetic_background(workspace));
    } else if let Some(first) = objects.iter_mut().find(|o| o.flags.visible) {
        first.extension = ExtensionType::Background;
        first.flags.always_top = false;
    }

    FlattenedPage {
        objects,
        scale,
        offset,
    }
}

fn place(imported: ImportedObject, g: Rect, scale: f64, offset: Vec2) -> SceneObject {
    let ImportedObject {
        object: mut obj,
        ancestors,
    } = imported;
    let t = &mut obj.transform;
    t.left = offset.x + (t.left - g.x0) * scale;
    t.top = offset.y + (t.top - g.y0) * scale;
    t.scale_x *= scale;
    t.scale_y *= scale;

    let names = || std::iter::once(obj.id.as_str()).chain(ancestors.iter().map(String::as_str));
    let marked = |mark: &str| names().any(|n| n.to_ascii_lowercase().contains(mark));
    let fixed = marked(FIXED_MARK);
    let floating = marked(FLOATING_MARK);

    if fixed {
        obj.extension = ExtensionType::TemplateElement;
        obj.flags.locked = true;
        obj.flags.selectable = false;
    }
    if floating {
        obj.flags.always_top = true;
    }
    obj
}

/// A lone non-`default` object, or any unbounded page, gets a white backdrop.
fn needs_synthetic_background(objects: &[ImportedObject], profile: RenderProfile) -> bool {
    if profile == RenderProfile::Unbounded {
        return true;
    }
    let mut visible = objects.iter().filter(|o| o.object.flags.visible);
    match (visible.next(), visible.next()) {
        (Some(only), None) => only.object.id != DEFAULT_ID,
        _ => false,
    }
}

fn synthetic_background(workspace: &WorkspaceOptions) -> SceneObject {
    let mut bg = SceneObject::rect(SYNTHETIC_BACKGROUND_ID, workspace.width, workspace.height)
        .with_extension(ExtensionType::Background);
    bg.paint.fill = Some(Rgba8::WHITE);
    bg
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/flatten.rs"]
mod tests;
