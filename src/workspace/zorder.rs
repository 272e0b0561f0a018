use crate::scene::arena::ObjectKey;
use crate::scene::object::{Band, ExtensionType, SceneObject};
use crate::scene::store::Scene;

/// Paint order that satisfies the layering invariants, computed without mutating the scene.
///
/// 1. Objects are stably grouped by [`Band`]: workspace, background, content, top.
/// 2. Every `FillImage` whose parent exists is placed directly above that parent.
pub fn layered_order(scene: &Scene) -> Vec<ObjectKey> {
    let mut entries: Vec<(ObjectKey, &SceneObject)> = scene.iter().collect();
    entries.sort_by_key(|(_, o)| o.band());

    let mut order: Vec<ObjectKey> = entries.iter().map(|(k, _)| *k).collect();
    let fills: Vec<(ObjectKey, ObjectKey)> = entries
        .iter()
        .filter(|(_, o)| o.extension == ExtensionType::FillImage)
        .filter_map(|(k, o)| {
            let parent = scene.key_of(o.parent_id.as_deref()?)?;
            (parent != *k).then_some((*k, parent))
        })
        .collect();

    for (fill, parent) in fills {
        order.retain(|k| *k != fill);
        let Some(at) = order.iter().position(|k| *k == parent) else {
            continue;
        };
        order.insert(at + 1, fill);
    }
    order
}

/// Re-assert the layering invariants. Returns `true` when the paint order changed.
pub fn enforce_layering(scene: &mut Scene) -> bool {
    let order = layered_order(scene);
    if order.as_slice() == scene.order() {
        return false;
    }
    scene.set_order(order)
}

/// `true` when the current paint order already satisfies the layering invariants.
pub fn is_layered(scene: &Scene) -> bool {
    let objects: Vec<&SceneObject> = scene.iter().map(|(_, o)| o).collect();
    let bands_sorted = objects.windows(2).all(|w| w[0].band() <= w[1].band());
    let fills_adjacent = scene.iter().all(|(k, o)| {
        if o.extension != ExtensionType::FillImage {
            return true;
        }
        let Some(parent) = o.parent_id.as_deref().and_then(|p| scene.key_of(p)) else {
            return true;
        };
        match (scene.index_of(parent), scene.index_of(k)) {
            (Some(p), Some(i)) => i == p + 1 || fill_stacked_above(scene, parent, i),
            _ => true,
        }
    });
    bands_sorted && fills_adjacent
}

// Several fill images bound to one parent stack directly above it.
fn fill_stacked_above(scene: &Scene, parent: ObjectKey, index: usize) -> bool {
    let Some(p) = scene.index_of(parent) else {
        return false;
    };
    let Some(parent_id) = scene.get(parent).map(|o| o.id.as_str()) else {
        return false;
    };
    scene.order()[p + 1..index].iter().all(|k| {
        scene.get(*k).is_some_and(|o| {
            o.extension == ExtensionType::FillImage && o.parent_id.as_deref() == Some(parent_id)
        })
    })
}

/// Band bounds `[start, end)` of `band` in the current paint order.
pub fn band_range(scene: &Scene, band: Band) -> (usize, usize) {
    let mut start = None;
    let mut end = 0;
    for (i, (_, o)) in scene.iter().enumerate() {
        if o.band() == band {
            start.get_or_insert(i);
            end = i + 1;
        }
    }
    match start {
        Some(s) => (s, end),
        None => {
            let at = scene.iter().take_while(|(_, o)| o.band() < band).count();
            (at, at)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/zorder.rs"]
mod tests;
