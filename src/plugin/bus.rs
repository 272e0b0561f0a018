use std::collections::{BTreeMap, VecDeque};

use crate::plugin::event::{EditorEvent, EventKind};

/// Handle of a registered plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId(pub(crate) u32);

/// Typed publish/subscribe queues shared by all plugins.
///
/// Each [`EventKind`] has its own FIFO queue; a global sequence number keeps delivery in
/// publication order across kinds. Plugins never hold references to each other, only
/// subscriptions.
#[derive(Debug, Default)]
pub struct EventBus {
    queues: BTreeMap<EventKind, VecDeque<(u64, EditorEvent)>>,
    subscribers: BTreeMap<EventKind, Vec<PluginId>>,
    next_seq: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event on its kind's queue.
    pub fn publish(&mut self, event: EditorEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queues
            .entry(event.kind())
            .or_default()
            .push_back((seq, event));
    }

    /// Dequeue the oldest event across all kinds.
    pub fn pop(&mut self) -> Option<EditorEvent> {
        let kind = self
            .queues
            .iter()
            .filter_map(|(kind, q)| q.front().map(|(seq, _)| (*seq, *kind)))
            .min()
            .map(|(_, kind)| kind)?;
        self.queues
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
            .map(|(_, ev)| ev)
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Number of queued events of one kind.
    pub fn pending_of(&self, kind: EventKind) -> usize {
        self.queues.get(&kind).map_or(0, VecDeque::len)
    }

    /// Drop every queued event.
    pub fn clear(&mut self) {
        self.queues.clear();
    }

    pub(crate) fn subscribe(&mut self, plugin: PluginId, kinds: &[EventKind]) {
        for kind in kinds {
            let subs = self.subscribers.entry(*kind).or_default();
            if !subs.contains(&plugin) {
                subs.push(plugin);
            }
        }
    }

    pub(crate) fn unsubscribe_all(&mut self, plugin: PluginId) {
        for subs in self.subscribers.values_mut() {
            subs.retain(|p| *p != plugin);
        }
    }

    /// Plugins subscribed to `kind`, in registration order.
    pub fn subscribers(&self, kind: EventKind) -> &[PluginId] {
        self.subscribers.get(&kind).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/bus.rs"]
mod tests;
