use std::collections::HashMap;

use smallvec::SmallVec;

use crate::foundation::error::{QuireError, QuireResult};
use crate::scene::arena::{Arena, ObjectKey};
use crate::scene::object::{ExtensionType, SceneObject};

/// Identity of a scene, used to key render requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

/// Mutation notification recorded by the scene and forwarded to plugins by the kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// An object was inserted.
    Added {
        /// Arena key of the new object.
        key: ObjectKey,
        /// Object id.
        id: String,
        /// Role tag.
        extension: ExtensionType,
    },
    /// An object was removed; its key is already stale.
    Removed {
        /// Object id.
        id: String,
        /// Role tag.
        extension: ExtensionType,
        /// Parent association of the removed object.
        parent_id: Option<String>,
    },
    /// An object's properties changed through [`Scene::modify`].
    Modified {
        /// Arena key of the object.
        key: ObjectKey,
        /// Role tag.
        extension: ExtensionType,
    },
    /// The active selection changed.
    SelectionChanged,
}

/// Ordered object store backing one editor.
///
/// Objects live in a generation-checked arena; `order` holds paint order from bottom to top.
/// The scene records [`SceneEvent`]s into an outbox instead of calling listeners; the kernel
/// drains it after each operation.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    objects: Arena<SceneObject>,
    order: Vec<ObjectKey>,
    keys_by_id: HashMap<String, ObjectKey>,
    selection: SmallVec<[ObjectKey; 4]>,
    outbox: Vec<SceneEvent>,
    revision: u64,
    alive: bool,
}

impl Scene {
    /// Create an empty, live scene.
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            objects: Arena::new(),
            order: Vec::new(),
            keys_by_id: HashMap::new(),
            selection: SmallVec::new(),
            outbox: Vec::new(),
            revision: 0,
            alive: true,
        }
    }

    /// Scene identity.
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// `false` once the scene has been torn down.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Release every object and refuse further mutation.
    pub fn tear_down(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.keys_by_id.clear();
        self.selection.clear();
        self.outbox.clear();
        self.alive = false;
    }

    fn ensure_alive(&self, op: &str) -> bool {
        if !self.alive {
            tracing::warn!(op, "scene is torn down; ignoring mutation");
        }
        self.alive
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// `true` when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }

    /// Append `obj` at the top of the paint order.
    pub fn add(&mut self, obj: SceneObject) -> QuireResult<ObjectKey> {
        let index = self.order.len();
        self.insert_at(index, obj)
    }

    /// Insert `obj` at paint position `index` (clamped).
    pub fn insert_at(&mut self, index: usize, obj: SceneObject) -> QuireResult<ObjectKey> {
        if !self.ensure_alive("insert") {
            return Err(QuireError::surface("scene is torn down"));
        }
        if obj.id.is_empty() {
            return Err(QuireError::validation("object id must be non-empty"));
        }
        if self.keys_by_id.contains_key(&obj.id) {
            return Err(QuireError::validation(format!(
                "duplicate object id '{}'",
                obj.id
            )));
        }
        if !obj.is_finite() {
            return Err(QuireError::validation(format!(
                "object '{}' has non-finite geometry",
                obj.id
            )));
        }

        let id = obj.id.clone();
        let extension = obj.extension;
        let key = self.objects.insert(obj);
        self.keys_by_id.insert(id.clone(), key);
        self.order.insert(index.min(self.order.len()), key);
        self.revision += 1;
        self.outbox.push(SceneEvent::Added { key, id, extension });
        Ok(key)
    }

    /// Remove an object. Stale keys are a no-op.
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        if !self.ensure_alive("remove") {
            return None;
        }
        let obj = self.objects.remove(key)?;
        self.keys_by_id.remove(&obj.id);
        self.order.retain(|k| *k != key);
        let was_selected = self.selection.contains(&key);
        self.selection.retain(|k| *k != key);
        self.revision += 1;
        self.outbox.push(SceneEvent::Removed {
            id: obj.id.clone(),
            extension: obj.extension,
            parent_id: obj.parent_id.clone(),
        });
        if was_selected {
            self.outbox.push(SceneEvent::SelectionChanged);
        }
        Some(obj)
    }

    /// Remove by id. Unknown ids are a no-op.
    pub fn remove_by_id(&mut self, id: &str) -> Option<SceneObject> {
        let key = self.key_of(id)?;
        self.remove(key)
    }

    /// Borrow an object.
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Borrow an object mutably without emitting a [`SceneEvent::Modified`].
    ///
    /// The id must not be changed through this reference.
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        if !self.ensure_alive("get_mut") {
            return None;
        }
        let obj = self.objects.get_mut(key)?;
        self.revision += 1;
        Some(obj)
    }

    /// Mutate an object and emit [`SceneEvent::Modified`].
    pub fn modify(&mut self, key: ObjectKey, f: impl FnOnce(&mut SceneObject)) -> bool {
        let Some(obj) = self.get_mut(key) else {
            return false;
        };
        let id = obj.id.clone();
        f(obj);
        obj.id = id;
        let extension = obj.extension;
        self.outbox.push(SceneEvent::Modified { key, extension });
        true
    }

    /// Resolve an id to its key.
    pub fn key_of(&self, id: &str) -> Option<ObjectKey> {
        self.keys_by_id.get(id).copied()
    }

    /// Borrow an object by id.
    pub fn get_by_id(&self, id: &str) -> Option<&SceneObject> {
        self.key_of(id).and_then(|k| self.get(k))
    }

    /// Paint position of `key`, bottom is `0`.
    pub fn index_of(&self, key: ObjectKey) -> Option<usize> {
        self.order.iter().position(|k| *k == key)
    }

    /// Keys in paint order.
    pub fn order(&self) -> &[ObjectKey] {
        &self.order
    }

    /// Objects in paint order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.order
            .iter()
            .filter_map(|k| self.objects.get(*k).map(|o| (*k, o)))
    }

    /// Move `key` to paint position `index` (clamped).
    pub fn move_to(&mut self, key: ObjectKey, index: usize) -> bool {
        if !self.ensure_alive("move_to") {
            return false;
        }
        let Some(from) = self.index_of(key) else {
            return false;
        };
        self.order.remove(from);
        let to = index.min(self.order.len());
        self.order.insert(to, key);
        if from != to {
            self.revision += 1;
        }
        true
    }

    /// Replace the paint order with a permutation of the current keys.
    pub(crate) fn set_order(&mut self, order: Vec<ObjectKey>) -> bool {
        if !self.ensure_alive("set_order") {
            return false;
        }
        if order.len() != self.order.len() || !order.iter().all(|k| self.objects.contains(*k)) {
            tracing::warn!("rejecting paint order that is not a permutation of the scene");
            return false;
        }
        if order != self.order {
            self.order = order;
            self.revision += 1;
        }
        true
    }

    /// Replace the active selection.
    pub fn select(&mut self, keys: &[ObjectKey]) {
        if !self.ensure_alive("select") {
            return;
        }
        let next: SmallVec<[ObjectKey; 4]> = keys
            .iter()
            .copied()
            .filter(|k| self.objects.get(*k).is_some_and(|o| o.flags.selectable))
            .collect();
        if next != self.selection {
            self.selection = next;
            self.outbox.push(SceneEvent::SelectionChanged);
        }
    }

    /// Drop the active selection.
    pub fn clear_selection(&mut self) {
        self.select(&[]);
    }

    /// Active selection in selection order.
    pub fn selection(&self) -> &[ObjectKey] {
        &self.selection
    }

    /// The single selected object, when exactly one is selected.
    pub fn single_selection(&self) -> Option<ObjectKey> {
        match self.selection.as_slice() {
            [key] => Some(*key),
            _ => None,
        }
    }

    /// Key of the workspace object, if present.
    pub fn workspace_key(&self) -> Option<ObjectKey> {
        self.iter()
            .find(|(_, o)| o.extension == ExtensionType::Workspace)
            .map(|(k, _)| k)
    }

    /// First id derived from `base` that is not yet taken.
    pub fn unique_id(&self, base: &str) -> String {
        if !self.keys_by_id.contains_key(base) {
            return base.to_string();
        }
        (1u64..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.keys_by_id.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// `true` when events are waiting to be dispatched.
    pub fn has_pending_events(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Clones of all persisted objects in paint order.
    pub fn persisted_objects(&self) -> Vec<SceneObject> {
        self.iter()
            .filter(|(_, o)| !o.extension.is_transient())
            .map(|(_, o)| o.clone())
            .collect()
    }

    /// Remove every persisted object, keeping workspace, guides and print guides.
    pub fn clear_persisted(&mut self) -> usize {
        let keys: Vec<ObjectKey> = self
            .iter()
            .filter(|(_, o)| !o.extension.is_transient())
            .map(|(k, _)| k)
            .collect();
        let n = keys.len();
        for key in keys {
            self.remove(key);
        }
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
