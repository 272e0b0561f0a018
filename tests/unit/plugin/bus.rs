use super::*;
use crate::scene::store::SceneEvent;

#[test]
fn pop_preserves_publication_order_across_kinds() {
    let mut bus = EventBus::new();
    bus.publish(EditorEvent::ViewportChanged);
    bus.publish(EditorEvent::Scene(SceneEvent::SelectionChanged));
    bus.publish(EditorEvent::RulerToggled { enabled: false });
    bus.publish(EditorEvent::ViewportChanged);

    assert_eq!(bus.pending(), 4);
    assert_eq!(bus.pending_of(EventKind::ViewportChanged), 2);

    let kinds: Vec<_> = std::iter::from_fn(|| bus.pop()).map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ViewportChanged,
            EventKind::SelectionChanged,
            EventKind::RulerToggled,
            EventKind::ViewportChanged,
        ]
    );
    assert!(bus.pop().is_none());
}

#[test]
fn subscriptions_are_deduplicated_and_removable() {
    let mut bus = EventBus::new();
    let a = PluginId(0);
    let b = PluginId(1);
    bus.subscribe(a, &[EventKind::ObjectAdded, EventKind::ObjectAdded]);
    bus.subscribe(b, &[EventKind::ObjectAdded]);
    assert_eq!(bus.subscribers(EventKind::ObjectAdded), &[a, b]);

    bus.unsubscribe_all(a);
    assert_eq!(bus.subscribers(EventKind::ObjectAdded), &[b]);
    assert!(bus.subscribers(EventKind::RulerToggled).is_empty());
}
