use crate::scene::object::ExtensionType;
use crate::scene::store::SceneEvent;
use crate::workspace::guides::PrintGuideKind;

/// Message delivered to plugins through the [`crate::EventBus`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A scene mutation forwarded from the scene outbox.
    Scene(SceneEvent),
    /// The workspace options changed size, margins or profile.
    WorkspaceResized {
        /// New width in device pixels.
        width: f64,
        /// New height in device pixels.
        height: f64,
    },
    /// Request to show or hide a print guide.
    GuideToggled {
        /// Which guide.
        guide: PrintGuideKind,
        /// Requested visibility.
        visible: bool,
    },
    /// Zoom, pan or canvas size changed.
    ViewportChanged,
    /// The ruler subsystem was switched on or off.
    RulerToggled {
        /// New state.
        enabled: bool,
    },
}

/// Discriminant of [`EditorEvent`]; each kind has its own queue on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// [`SceneEvent::Added`].
    ObjectAdded,
    /// [`SceneEvent::Removed`].
    ObjectRemoved,
    /// [`SceneEvent::Modified`].
    ObjectModified,
    /// [`SceneEvent::SelectionChanged`].
    SelectionChanged,
    /// [`EditorEvent::WorkspaceResized`].
    WorkspaceResized,
    /// [`EditorEvent::GuideToggled`].
    GuideToggled,
    /// [`EditorEvent::ViewportChanged`].
    ViewportChanged,
    /// [`EditorEvent::RulerToggled`].
    RulerToggled,
}

impl EditorEvent {
    /// Queue this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::Scene(SceneEvent::Added { .. }) => EventKind::ObjectAdded,
            EditorEvent::Scene(SceneEvent::Removed { .. }) => EventKind::ObjectRemoved,
            EditorEvent::Scene(SceneEvent::Modified { .. }) => EventKind::ObjectModified,
            EditorEvent::Scene(SceneEvent::SelectionChanged) => EventKind::SelectionChanged,
            EditorEvent::WorkspaceResized { .. } => EventKind::WorkspaceResized,
            EditorEvent::GuideToggled { .. } => EventKind::GuideToggled,
            EditorEvent::ViewportChanged => EventKind::ViewportChanged,
            EditorEvent::RulerToggled { .. } => EventKind::RulerToggled,
        }
    }

    /// Role tag of the object a scene event refers to.
    pub fn extension(&self) -> Option<ExtensionType> {
        match self {
            EditorEvent::Scene(SceneEvent::Added { extension, .. })
            | EditorEvent::Scene(SceneEvent::Removed { extension, .. })
            | EditorEvent::Scene(SceneEvent::Modified { extension, .. }) => Some(*extension),
            _ => None,
        }
    }
}
