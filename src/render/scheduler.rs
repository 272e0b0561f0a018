use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::scene::store::SceneId;

/// Counters exposed for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Calls to `request` and `request_immediate`.
    pub requested: u64,
    /// Requests absorbed by an already pending render or an active pause.
    pub coalesced: u64,
    /// Renders handed out by `poll`.
    pub rendered: u64,
}

/// Coalescing render scheduler keyed by scene.
///
/// Requests landing within one frame window collapse into a single render. Time is injected by
/// the caller so the scheduler stays deterministic; the kernel feeds it from `Editor::tick`.
#[derive(Debug)]
pub struct RenderScheduler {
    window: Duration,
    due: BTreeMap<SceneId, Instant>,
    paused: BTreeMap<SceneId, u32>,
    stats: SchedulerStats,
}

impl RenderScheduler {
    /// Scheduler whose requests fire `window` after the first request.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            due: BTreeMap::new(),
            paused: BTreeMap::new(),
            stats: SchedulerStats::default(),
        }
    }

    /// Frame window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Ask for a render of `scene` within the frame window.
    ///
    /// Returns `false` when the request was coalesced into an existing one.
    pub fn request(&mut self, scene: SceneId, now: Instant) -> bool {
        self.stats.requested += 1;
        if self.paused.contains_key(&scene) {
            self.stats.coalesced += 1;
            return false;
        }
        if self.due.contains_key(&scene) {
            self.stats.coalesced += 1;
            return false;
        }
        self.due.insert(scene, now + self.window);
        true
    }

    /// Ask for a render of `scene` at the next poll, bypassing the frame window.
    pub fn request_immediate(&mut self, scene: SceneId, now: Instant) {
        self.stats.requested += 1;
        if self.paused.contains_key(&scene) {
            self.stats.coalesced += 1;
            return;
        }
        let slot = self.due.entry(scene).or_insert(now);
        if *slot > now {
            *slot = now;
        } else {
            self.stats.coalesced += 1;
        }
    }

    /// Suspend rendering of `scene` for a bulk mutation. Calls nest.
    pub fn pause(&mut self, scene: SceneId) {
        *self.paused.entry(scene).or_default() += 1;
        self.due.remove(&scene);
    }

    /// Undo one [`RenderScheduler::pause`]; the outermost call schedules exactly one
    /// immediate render.
    pub fn resume(&mut self, scene: SceneId, now: Instant) {
        let Some(depth) = self.paused.get_mut(&scene) else {
            tracing::debug!(scene = scene.0, "render resume without matching pause");
            return;
        };
        *depth = depth.saturating_sub(1);
        if *depth == 0 {
            self.paused.remove(&scene);
            self.due.insert(scene, now);
        }
    }

    /// `true` while `scene` is paused.
    pub fn is_paused(&self, scene: SceneId) -> bool {
        self.paused.contains_key(&scene)
    }

    /// `true` when a render of `scene` is waiting.
    pub fn is_pending(&self, scene: SceneId) -> bool {
        self.due.contains_key(&scene)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.due.values().min().copied()
    }

    /// Take every scene whose render is due at `now`, in scene-id order.
    pub fn poll(&mut self, now: Instant) -> Vec<SceneId> {
        let ready: Vec<SceneId> = self
            .due
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &ready {
            self.due.remove(id);
        }
        self.stats.rendered += ready.len() as u64;
        ready
    }

    /// Forget everything about `scene`.
    pub fn cancel(&mut self, scene: SceneId) {
        self.due.remove(&scene);
        self.paused.remove(&scene);
    }

    /// Counters since construction.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
