use std::collections::VecDeque;

use crate::scene::object::SceneObject;
use crate::scene::store::Scene;

/// Persisted scene content at one point in history.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    objects: Vec<SceneObject>,
}

impl Snapshot {
    /// Capture the persisted objects of `scene`.
    pub fn capture(scene: &Scene) -> Self {
        Self {
            objects: scene.persisted_objects(),
        }
    }

    /// Objects in paint order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }
}

/// Bounded undo/redo log with nestable suspension.
///
/// While suspended, [`History::record`] only notes that something changed; the outermost
/// [`History::resume`] then commits a single entry. Multi-step cascades therefore undo as one.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    current: Option<Snapshot>,
    limit: usize,
    suspended: u32,
    pending: bool,
}

impl History {
    /// Create an empty history keeping at most `limit` undo entries.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            current: None,
            limit: limit.max(1),
            suspended: 0,
            pending: false,
        }
    }

    /// Forget all entries and take `scene` as the new baseline.
    pub fn reset(&mut self, scene: &Scene) {
        self.undo.clear();
        self.redo.clear();
        self.current = Some(Snapshot::capture(scene));
        self.pending = false;
    }

    /// Pause recording. Calls nest.
    pub fn suspend(&mut self) {
        self.suspended += 1;
    }

    /// Undo one [`History::suspend`]; the outermost call commits pending changes.
    pub fn resume(&mut self, scene: &Scene) {
        if self.suspended == 0 {
            tracing::debug!("history resume without matching suspend");
            return;
        }
        self.suspended -= 1;
        if self.suspended == 0 && self.pending {
            self.pending = false;
            self.commit(scene);
        }
    }

    /// `true` while at least one suspension is active.
    pub fn is_suspended(&self) -> bool {
        self.suspended > 0
    }

    /// Record the current state of `scene` as a history entry.
    pub fn record(&mut self, scene: &Scene) {
        if self.is_suspended() {
            self.pending = true;
            return;
        }
        self.commit(scene);
    }

    fn commit(&mut self, scene: &Scene) {
        let snap = Snapshot::capture(scene);
        if self.current.as_ref() == Some(&snap) {
            return;
        }
        if let Some(prev) = self.current.replace(snap) {
            self.undo.push_back(prev);
            if self.undo.len() > self.limit {
                self.undo.pop_front();
            }
        }
        self.redo.clear();
    }

    /// Number of undoable entries.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable entries.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Step back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        if let Some(cur) = self.current.replace(prev.clone()) {
            self.redo.push(cur);
        }
        Some(prev)
    }

    /// Step forward one entry, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        if let Some(cur) = self.current.replace(next.clone()) {
            self.undo.push_back(cur);
        }
        Some(next)
    }
}

/// Replace the persisted content of `scene` with `snapshot`, keeping transient objects.
pub fn restore_snapshot(scene: &mut Scene, snapshot: &Snapshot) {
    scene.clear_persisted();
    let transient_top = scene
        .iter()
        .position(|(_, o)| o.band() == crate::scene::object::Band::Top)
        .unwrap_or(scene.len());
    for (i, obj) in snapshot.objects().iter().enumerate() {
        if let Err(e) = scene.insert_at(transient_top + i, obj.clone()) {
            tracing::warn!(id = %obj.id, error = %e, "failed to restore object from history");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/history.rs"]
mod tests;
