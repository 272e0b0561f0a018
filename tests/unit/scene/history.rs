use super::*;
use crate::scene::object::ExtensionType;
use crate::scene::store::SceneId;

fn ids(scene: &Scene) -> Vec<String> {
    scene.iter().map(|(_, o)| o.id.clone()).collect()
}

#[test]
fn nested_suspension_commits_one_entry() {
    let mut scene = Scene::new(SceneId(1));
    let mut history = History::new(10);
    history.reset(&scene);

    history.suspend();
    scene.add(SceneObject::rect("a", 1.0, 1.0)).unwrap();
    history.record(&scene);
    history.suspend();
    scene.add(SceneObject::rect("b", 1.0, 1.0)).unwrap();
    history.record(&scene);
    history.resume(&scene);
    assert_eq!(history.undo_len(), 0);
    history.resume(&scene);

    assert_eq!(history.undo_len(), 1);
}

#[test]
fn undo_redo_restore_content_and_keep_transient_objects() {
    let mut scene = Scene::new(SceneId(1));
    scene
        .add(SceneObject::rect("workspace", 100.0, 100.0).with_extension(ExtensionType::Workspace))
        .unwrap();
    scene
        .add(SceneObject::rect("cut-border", 1.0, 1.0).with_extension(ExtensionType::PrintGuide))
        .unwrap();
    let mut history = History::new(10);
    history.reset(&scene);

    scene.insert_at(1, SceneObject::rect("a", 1.0, 1.0)).unwrap();
    history.record(&scene);
    assert_eq!(ids(&scene), vec!["workspace", "a", "cut-border"]);

    let snap = history.undo().unwrap();
    restore_snapshot(&mut scene, &snap);
    assert_eq!(ids(&scene), vec!["workspace", "cut-border"]);

    let snap = history.redo().unwrap();
    restore_snapshot(&mut scene, &snap);
    assert_eq!(ids(&scene), vec!["workspace", "a", "cut-border"]);
    assert!(history.redo().is_none());
}

#[test]
fn unchanged_state_is_not_recorded_and_limit_is_enforced() {
    let mut scene = Scene::new(SceneId(1));
    let mut history = History::new(2);
    history.reset(&scene);
    history.record(&scene);
    assert_eq!(history.undo_len(), 0);

    for i in 0..5 {
        scene.add(SceneObject::rect(format!("o{i}"), 1.0, 1.0)).unwrap();
        history.record(&scene);
    }
    assert_eq!(history.undo_len(), 2);
}
