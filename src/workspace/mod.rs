pub(crate) mod guides;
pub(crate) mod plugin;
pub(crate) mod settings;
pub(crate) mod zorder;

use crate::foundation::core::Rgba8;
use crate::foundation::error::QuireResult;
use crate::scene::arena::ObjectKey;
use crate::scene::object::{ExtensionType, ObjectKind, SceneObject};
use crate::scene::store::Scene;
use settings::{WORKSPACE_ID, WorkspaceOptions};

/// Create the workspace object at the bottom of `scene`, or resize the existing one.
///
/// Resizing goes through `get_mut` and emits no event; callers publish
/// [`crate::EditorEvent::WorkspaceResized`] themselves.
pub(crate) fn sync_workspace_object(
    scene: &mut Scene,
    opts: &WorkspaceOptions,
) -> QuireResult<ObjectKey> {
    let kind = ObjectKind::Rect {
        width: opts.width,
        height: opts.height,
        rx: 0.0,
    };
    if let Some(key) = scene.workspace_key() {
        if let Some(obj) = scene.get_mut(key) {
            obj.kind = kind;
            obj.transform = Default::default();
        }
        scene.move_to(key, 0);
        return Ok(key);
    }

    let mut obj = SceneObject::new(WORKSPACE_ID, kind).with_extension(ExtensionType::Workspace);
    obj.flags.selectable = false;
    obj.flags.locked = true;
    obj.flags.lock_layer_order = true;
    obj.paint.fill = Some(Rgba8::WHITE);
    scene.insert_at(0, obj)
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/mod.rs"]
mod tests;
