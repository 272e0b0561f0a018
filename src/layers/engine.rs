use std::collections::{BTreeSet, HashSet};

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::QuireResult;
use crate::plugin::kernel::Editor;
use crate::scene::arena::ObjectKey;
use crate::scene::object::{Band, ClipRegion, ExtensionType, ObjectKind, SceneObject};
use crate::scene::store::Scene;
use crate::workspace::zorder;

/// Suffix of the outline companion id.
pub const OUTLINE_SUFFIX: &str = "_outline";
/// Suffix of the "add content" icon companion id.
pub const MOLD_ICON_SUFFIX: &str = "_moldIcon";

/// Direction of a single-object reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerMove {
    /// One step up within the object's band.
    Raise,
    /// To the top of the object's band.
    RaiseToTop,
    /// One step down within the object's band.
    Lower,
    /// To the bottom of the object's band.
    LowerToBottom,
}

/// Keys bound to `key`: fill images, outline and mold icon, by parent id or id convention.
pub fn companions(scene: &Scene, key: ObjectKey) -> Vec<ObjectKey> {
    let Some(obj) = scene.get(key) else {
        return Vec::new();
    };
    let outline = format!("{}{OUTLINE_SUFFIX}", obj.id);
    let icon = format!("{}{MOLD_ICON_SUFFIX}", obj.id);
    scene
        .iter()
        .filter(|(k, _)| *k != key)
        .filter(|(_, o)| {
            o.id == outline
                || o.id == icon
                || (o.parent_id.as_deref() == Some(obj.id.as_str())
                    && matches!(
                        o.extension,
                        ExtensionType::FillImage | ExtensionType::Outline | ExtensionType::MoldIcon
                    ))
        })
        .map(|(k, _)| k)
        .collect()
}

// A fill image is reordered through its parent.
fn reorder_target(scene: &Scene, key: ObjectKey) -> ObjectKey {
    scene
        .get(key)
        .filter(|o| o.extension == ExtensionType::FillImage)
        .and_then(|o| o.parent_id.as_deref())
        .and_then(|p| scene.key_of(p))
        .unwrap_or(key)
}

// `key` plus the fill images stacked directly above it.
fn unit_len(scene: &Scene, order: &[ObjectKey], start: usize) -> usize {
    let Some(head) = scene.get(order[start]) else {
        return 1;
    };
    1 + order[start + 1..]
        .iter()
        .take_while(|k| {
            scene.get(**k).is_some_and(|o| {
                o.extension == ExtensionType::FillImage
                    && o.parent_id.as_deref() == Some(head.id.as_str())
            })
        })
        .count()
}

/// Reorder `key` within its band, carrying its fill-image companions along.
///
/// Returns `false` when the object is missing, layer-order locked or already at the limit.
pub fn reorder(scene: &mut Scene, key: ObjectKey, step: LayerMove) -> bool {
    let key = reorder_target(scene, key);
    let Some(obj) = scene.get(key) else {
        return false;
    };
    if obj.flags.lock_layer_order {
        tracing::debug!(id = %obj.id, "layer order is locked");
        return false;
    }
    let band = obj.band();
    let band_of = |k: &ObjectKey| scene.get(*k).map(SceneObject::band);

    let mut order = scene.order().to_vec();
    let Some(start) = order.iter().position(|k| *k == key) else {
        return false;
    };
    let len = unit_len(scene, &order, start);
    let unit: Vec<ObjectKey> = order.drain(start..start + len).collect();

    let at = match step {
        LayerMove::Raise => {
            if !order.get(start).is_some_and(|k| band_of(k) == Some(band)) {
                return false;
            }
            start + unit_len(scene, &order, start)
        }
        LayerMove::Lower => {
            if start == 0 {
                return false;
            }
            let mut at = start - 1;
            if band_of(&order[at]) != Some(band) {
                return false;
            }
            // Step over a whole unit: back up to the parent of a fill image run.
            while at > 0
                && scene.get(order[at]).is_some_and(|o| {
                    o.extension == ExtensionType::FillImage && o.parent_id.is_some()
                })
                && band_of(&order[at - 1]) == Some(band)
            {
                at -= 1;
            }
            at
        }
        LayerMove::RaiseToTop => {
            let end = order
                .iter()
                .rposition(|k| band_of(k) == Some(band))
                .map_or(start, |i| i + 1);
            if end <= start {
                return false;
            }
            end
        }
        LayerMove::LowerToBottom => {
            let first = order
                .iter()
                .position(|k| band_of(k) == Some(band))
                .unwrap_or(start);
            if first >= start {
                return false;
            }
            first
        }
    };

    for (i, k) in unit.into_iter().enumerate() {
        order.insert(at + i, k);
    }
    let changed = scene.set_order(order);
    zorder::enforce_layering(scene);
    changed
}

/// Delete `key` with its companions.
///
/// Clip references to removed objects are cleared first. When the removed object filled a
/// mold, the mold's "add content" icon is shown again. Returns the removed ids.
pub fn delete_cascade(scene: &mut Scene, key: ObjectKey) -> Vec<String> {
    let Some(obj) = scene.get(key) else {
        return Vec::new();
    };
    if obj.flags.lock_layer_order {
        tracing::debug!(id = %obj.id, "refusing to delete a layer-order locked object");
        return Vec::new();
    }
    let filled_mold = (obj.extension == ExtensionType::FillImage)
        .then(|| obj.parent_id.clone())
        .flatten();

    let mut doomed = vec![key];
    doomed.extend(companions(scene, key));
    let doomed_ids: BTreeSet<String> = doomed
        .iter()
        .filter_map(|k| scene.get(*k).map(|o| o.id.clone()))
        .collect();

    let dangling: Vec<ObjectKey> = scene
        .iter()
        .filter(|(k, o)| {
            doomed.contains(k)
                || matches!(&o.clip, Some(ClipRegion::Object { id }) if doomed_ids.contains(id))
        })
        .map(|(k, _)| k)
        .collect();
    for k in dangling {
        if let Some(o) = scene.get_mut(k) {
            o.clip = None;
        }
    }

    let mut removed = Vec::with_capacity(doomed.len());
    for k in doomed {
        if let Some(o) = scene.remove(k) {
            removed.push(o.id);
        }
    }

    if let Some(parent) = filled_mold {
        let icon = format!("{parent}{MOLD_ICON_SUFFIX}");
        if let Some(icon_key) = scene.key_of(&icon) {
            scene.modify(icon_key, |o| o.flags.visible = true);
        }
    }
    removed
}

/// Shift `key` and its companions by `delta`. Template elements and locked objects refuse.
pub fn move_by(scene: &mut Scene, key: ObjectKey, delta: Vec2) -> bool {
    let Some(obj) = scene.get(key) else {
        return false;
    };
    if !obj.is_user_movable() {
        tracing::debug!(id = %obj.id, "object is not movable");
        return false;
    }
    let mut keys = vec![key];
    keys.extend(companions(scene, key));
    for k in keys {
        scene.modify(k, |o| o.translate(delta));
    }
    true
}

/// Move several objects by `delta`, each companion exactly once.
///
/// Keys that are companions of another movable key in `keys` follow that key instead of
/// moving on their own.
pub fn move_many(scene: &mut Scene, keys: &[ObjectKey], delta: Vec2) -> bool {
    let followers: HashSet<ObjectKey> = keys
        .iter()
        .filter(|k| scene.get(**k).is_some_and(SceneObject::is_user_movable))
        .flat_map(|k| companions(scene, *k))
        .collect();
    let mut moved = false;
    for &key in keys.iter().filter(|k| !followers.contains(k)) {
        moved |= move_by(scene, key, delta);
    }
    moved
}

/// Wrap two or more selected content objects in a group placed at their joint bounding box.
///
/// Fill-image companions of the members join the group. Returns the group's key.
pub fn group(scene: &mut Scene, keys: &[ObjectKey]) -> QuireResult<Option<ObjectKey>> {
    let groupable = |o: &SceneObject| {
        o.band() == Band::Content
            && o.extension == ExtensionType::Ordinary
            && !o.flags.locked
            && !o.flags.lock_layer_order
    };
    let mut members: Vec<ObjectKey> = keys
        .iter()
        .copied()
        .filter(|k| scene.get(*k).is_some_and(groupable))
        .collect();
    if members.len() < 2 || members.len() != keys.len() {
        tracing::debug!(selected = keys.len(), "grouping needs two or more content objects");
        return Ok(None);
    }
    let extra: Vec<ObjectKey> = members
        .iter()
        .flat_map(|k| companions(scene, *k))
        .filter(|k| {
            scene
                .get(*k)
                .is_some_and(|o| o.extension == ExtensionType::FillImage)
        })
        .collect();
    members.extend(extra);
    members.sort_by_key(|k| scene.index_of(*k));
    members.dedup();

    let Some(bounds) = members
        .iter()
        .filter_map(|k| scene.get(*k).map(SceneObject::bounding_rect))
        .reduce(|a, b| a.union(b))
    else {
        return Ok(None);
    };
    let index = members
        .iter()
        .filter_map(|k| scene.index_of(*k))
        .min()
        .unwrap_or(scene.len());

    let origin = Vec2::new(bounds.x0, bounds.y0);
    let mut children = Vec::with_capacity(members.len());
    for k in members {
        if let Some(mut o) = scene.remove(k) {
            o.translate(-origin);
            children.push(o);
        }
    }
    let id = scene.unique_id("group");
    let group = SceneObject::new(id, ObjectKind::Group { children }).at(bounds.x0, bounds.y0);
    let key = scene.insert_at(index, group)?;
    zorder::enforce_layering(scene);
    Ok(Some(key))
}

/// Dissolve a group, placing its children back into the scene at their absolute positions.
///
/// Rotated groups, and non-uniformly scaled groups holding rotated children, are refused.
pub fn ungroup(scene: &mut Scene, key: ObjectKey) -> QuireResult<Vec<ObjectKey>> {
    let Some(obj) = scene.get(key) else {
        return Ok(Vec::new());
    };
    let ObjectKind::Group { children } = &obj.kind else {
        tracing::debug!(id = %obj.id, "not a group");
        return Ok(Vec::new());
    };
    let t = obj.transform;
    let uniform = (t.scale_x - t.scale_y).abs() < 1e-12;
    if t.angle.rem_euclid(360.0) != 0.0
        || (!uniform && children.iter().any(|c| c.transform.angle != 0.0))
    {
        tracing::debug!(id = %obj.id, "cannot ungroup a rotated or skewing group");
        return Ok(Vec::new());
    }
    let affine: Affine = obj.affine();
    let clip = obj.clip.clone();
    let index = scene.index_of(key).unwrap_or(scene.len());
    let children = children.clone();

    scene.remove(key);
    let mut keys = Vec::with_capacity(children.len());
    for (i, mut child) in children.into_iter().enumerate() {
        let anchor = affine * Point::new(child.transform.left, child.transform.top);
        child.transform.left = anchor.x;
        child.transform.top = anchor.y;
        child.transform.scale_x *= t.scale_x;
        child.transform.scale_y *= t.scale_y;
        if child.clip.is_none() {
            child.clip = clip.clone();
        }
        if scene.key_of(&child.id).is_some() {
            child.id = scene.unique_id(&child.id);
        }
        keys.push(scene.insert_at(index + i, child)?);
    }
    zorder::enforce_layering(scene);
    Ok(keys)
}

impl Editor {
    fn reorder_selected(&mut self, op: &'static str, step: LayerMove) -> bool {
        if !self.ensure_live(op) {
            return false;
        }
        let Some(key) = self.ctx.scene.single_selection() else {
            tracing::debug!(
                op,
                selected = self.ctx.scene.selection().len(),
                "reorder needs exactly one selected object"
            );
            return false;
        };
        let changed = self.transact(|ctx| reorder(&mut ctx.scene, key, step));
        if changed {
            self.ctx.request_render();
        }
        changed
    }

    /// Move the selected object one step up.
    pub fn raise_selected(&mut self) -> bool {
        self.reorder_selected("raise", LayerMove::Raise)
    }

    /// Move the selected object to the top of its band.
    pub fn raise_selected_to_top(&mut self) -> bool {
        self.reorder_selected("raise_to_top", LayerMove::RaiseToTop)
    }

    /// Move the selected object one step down.
    pub fn lower_selected(&mut self) -> bool {
        self.reorder_selected("lower", LayerMove::Lower)
    }

    /// Move the selected object to the bottom of its band.
    pub fn lower_selected_to_bottom(&mut self) -> bool {
        self.reorder_selected("lower_to_bottom", LayerMove::LowerToBottom)
    }

    /// Delete every selected object with its companions as one undo step.
    pub fn delete_selected(&mut self) -> Vec<String> {
        if !self.ensure_live("delete_selected") {
            return Vec::new();
        }
        let keys = self.ctx.scene.selection().to_vec();
        if keys.is_empty() {
            tracing::debug!("nothing selected to delete");
            return Vec::new();
        }
        self.transact(|ctx| {
            keys.into_iter()
                .flat_map(|k| delete_cascade(&mut ctx.scene, k))
                .collect()
        })
    }

    /// Delete the object `id` with its companions. Unknown ids are a no-op.
    pub fn delete_object(&mut self, id: &str) -> Vec<String> {
        if !self.ensure_live("delete_object") {
            return Vec::new();
        }
        let Some(key) = self.ctx.scene.key_of(id) else {
            tracing::debug!(id, "delete of unknown object");
            return Vec::new();
        };
        self.transact(|ctx| delete_cascade(&mut ctx.scene, key))
    }

    fn update_selected(&mut self, op: &'static str, f: impl Fn(&mut SceneObject)) -> usize {
        if !self.ensure_live(op) {
            return 0;
        }
        let keys = self.ctx.scene.selection().to_vec();
        if keys.is_empty() {
            tracing::debug!(op, "nothing selected");
            return 0;
        }
        self.transact(|ctx| keys.iter().filter(|k| ctx.scene.modify(**k, &f)).count())
    }

    fn update_single(&mut self, op: &'static str, f: impl Fn(&mut SceneObject)) -> usize {
        if !self.ensure_live(op) {
            return 0;
        }
        let Some(key) = self.ctx.scene.single_selection() else {
            tracing::debug!(
                op,
                selected = self.ctx.scene.selection().len(),
                "needs exactly one selected object"
            );
            return 0;
        };
        usize::from(self.transact(|ctx| ctx.scene.modify(key, &f)))
    }

    /// Lock movement of the single selected object. Returns how many were updated.
    ///
    /// Zero or several selected objects leave the scene untouched.
    pub fn lock_selected(&mut self) -> usize {
        self.update_single("lock", |o| o.flags.locked = true)
    }

    /// Unlock the single selected object.
    pub fn unlock_selected(&mut self) -> usize {
        self.update_single("unlock", |o| o.flags.locked = false)
    }

    /// Show or hide the selected objects.
    pub fn set_selected_visible(&mut self, visible: bool) -> usize {
        self.update_selected("set_visible", move |o| o.flags.visible = visible)
    }

    /// Move `key` and its companions by `delta` as one undo step.
    pub fn move_by(&mut self, key: ObjectKey, delta: Vec2) -> bool {
        if !self.ensure_live("move_by") {
            return false;
        }
        self.transact(|ctx| move_by(&mut ctx.scene, key, delta))
    }

    /// Move the whole selection by `delta` as one undo step.
    pub fn nudge_selected(&mut self, delta: Vec2) -> bool {
        if !self.ensure_live("nudge_selected") {
            return false;
        }
        let keys = self.ctx.scene.selection().to_vec();
        if keys.is_empty() {
            tracing::debug!("nothing selected to nudge");
            return false;
        }
        self.transact(|ctx| move_many(&mut ctx.scene, &keys, delta))
    }

    /// Group the selection. Returns the new group's key.
    pub fn group_selected(&mut self) -> QuireResult<Option<ObjectKey>> {
        if !self.ensure_live("group_selected") {
            return Ok(None);
        }
        let keys = self.ctx.scene.selection().to_vec();
        let key = self.transact(|ctx| group(&mut ctx.scene, &keys))?;
        if let Some(k) = key {
            self.select(&[k]);
        }
        Ok(key)
    }

    /// Dissolve the selected group. Returns the keys of its former children.
    pub fn ungroup_selected(&mut self) -> QuireResult<Vec<ObjectKey>> {
        if !self.ensure_live("ungroup_selected") {
            return Ok(Vec::new());
        }
        let Some(key) = self.ctx.scene.single_selection() else {
            tracing::debug!("ungroup needs exactly one selected group");
            return Ok(Vec::new());
        };
        let keys = self.transact(|ctx| ungroup(&mut ctx.scene, key))?;
        if !keys.is_empty() {
            self.select(&keys);
        }
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/engine.rs"]
mod tests;
