use super::*;
use crate::scene::store::SceneId;

#[test]
fn workspace_object_is_created_once_and_resized_in_place() {
    let mut scene = Scene::new(SceneId(1));
    scene.add(SceneObject::rect("a", 1.0, 1.0)).unwrap();

    let opts = WorkspaceOptions {
        width: 100.0,
        height: 50.0,
        ..WorkspaceOptions::default()
    };
    let key = sync_workspace_object(&mut scene, &opts).unwrap();
    assert_eq!(scene.index_of(key), Some(0));
    assert!(!scene.get(key).unwrap().flags.selectable);

    let bigger = WorkspaceOptions {
        width: 300.0,
        ..opts
    };
    let again = sync_workspace_object(&mut scene, &bigger).unwrap();
    assert_eq!(key, again);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.get(key).unwrap().intrinsic_size().width, 300.0);
}
