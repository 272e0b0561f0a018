use crate::foundation::error::QuireResult;
use crate::plugin::event::{EditorEvent, EventKind};
use crate::plugin::kernel::{EditorContext, Plugin};
use crate::scene::store::SceneEvent;

/// Keeps raster-cache bookkeeping in step with the scene.
///
/// Selected objects count as accessed; modified objects lose their stale raster; removed
/// objects lose theirs immediately instead of waiting for a sweep.
#[derive(Debug, Default)]
pub struct CachePlugin {
    touched: u64,
    invalidated: u64,
}

impl CachePlugin {
    /// Fresh plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access stamps refreshed so far.
    pub fn touched(&self) -> u64 {
        self.touched
    }

    /// Caches dropped because their object changed or disappeared.
    pub fn invalidated(&self) -> u64 {
        self.invalidated
    }
}

const SUBSCRIPTIONS: &[EventKind] = &[
    EventKind::SelectionChanged,
    EventKind::ObjectModified,
    EventKind::ObjectRemoved,
];

impl Plugin for CachePlugin {
    fn name(&self) -> &'static str {
        "render-cache"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        SUBSCRIPTIONS
    }

    fn destroyed(&mut self, ctx: &mut EditorContext) -> QuireResult<()> {
        ctx.caches.clear();
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut EditorContext, event: &EditorEvent) -> QuireResult<()> {
        let EditorEvent::Scene(ev) = event else {
            return Ok(());
        };
        match ev {
            SceneEvent::SelectionChanged => {
                let now = ctx.now();
                for key in ctx.scene.selection() {
                    if ctx.caches.touch(*key, now) {
                        self.touched += 1;
                    }
                }
            }
            SceneEvent::Modified { key, .. } => {
                if ctx.caches.remove(*key) {
                    self.invalidated += 1;
                }
            }
            SceneEvent::Removed { .. } => {
                let scene = &ctx.scene;
                let dropped = ctx.caches.retain(|k| scene.get(k).is_some());
                self.invalidated += dropped as u64;
            }
            SceneEvent::Added { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plugin.rs"]
mod tests;
