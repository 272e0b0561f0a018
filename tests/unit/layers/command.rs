use super::*;
use crate::plugin::options::EditorOptions;
use crate::scene::object::{ExtensionType, SceneObject};

#[test]
fn hotkeys_map_to_commands() {
    assert_eq!(HostCommand::from_hotkey("Ctrl+]"), Some(HostCommand::Raise));
    assert_eq!(
        HostCommand::from_hotkey("shift+ctrl+]"),
        Some(HostCommand::RaiseToTop)
    );
    assert_eq!(
        HostCommand::from_hotkey("shift+ctrl+z"),
        Some(HostCommand::Redo)
    );
    assert_eq!(
        HostCommand::from_hotkey("Shift+ArrowLeft"),
        Some(HostCommand::Nudge(Vec2::new(-10.0, 0.0)))
    );
    assert_eq!(HostCommand::from_hotkey("ctrl+q"), None);
}

#[test]
fn command_names_parse() {
    assert_eq!(
        "toggle-safe-border".parse::<HostCommand>().unwrap(),
        HostCommand::ToggleGuide(PrintGuideKind::SafeBorder)
    );
    let err = "fly".parse::<HostCommand>().unwrap_err();
    assert!(err.to_string().contains("unknown command"));
}

#[test]
fn execute_drives_editor_operations() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let a = ed.add_object(SceneObject::rect("a", 1.0, 1.0)).unwrap();
    let b = ed.add_object(SceneObject::rect("b", 1.0, 1.0)).unwrap();

    assert!(!ed.execute(HostCommand::Nudge(Vec2::new(1.0, 0.0))));
    ed.select(&[a]);
    assert!(ed.execute(HostCommand::Nudge(Vec2::new(1.0, 0.0))));
    assert_eq!(ed.scene().get(a).unwrap().transform.left, 1.0);

    assert!(ed.execute(HostCommand::RaiseToTop));
    assert!(ed.scene().index_of(a) > ed.scene().index_of(b));

    assert!(ed.execute(HostCommand::Delete));
    assert!(ed.scene().get(a).is_none());
    assert!(ed.execute(HostCommand::Undo));
    assert!(ed.scene().get_by_id("a").is_some());

    assert!(ed.execute(HostCommand::ToggleRuler));
    assert!(!ed.ruler_enabled());
}

#[test]
fn nudge_moves_a_selected_fill_once_with_its_parent() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let shape = ed
        .add_object(SceneObject::rect("shape", 20.0, 20.0).at(50.0, 50.0))
        .unwrap();
    let fill = ed
        .add_object(
            SceneObject::rect("shape_fill", 20.0, 20.0)
                .at(50.0, 50.0)
                .with_extension(ExtensionType::FillImage)
                .with_parent("shape"),
        )
        .unwrap();
    let before = ed.context().history.undo_len();

    ed.select(&[shape, fill]);
    assert!(ed.execute(HostCommand::Nudge(Vec2::new(1.0, 0.0))));
    assert_eq!(ed.scene().get(shape).unwrap().transform.left, 51.0);
    assert_eq!(ed.scene().get(fill).unwrap().transform.left, 51.0);
    assert_eq!(ed.context().history.undo_len(), before + 1);
}
