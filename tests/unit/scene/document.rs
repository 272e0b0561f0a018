use super::*;
use crate::scene::object::ExtensionType;
use crate::scene::store::SceneId;

#[test]
fn capture_skips_guides_and_workspace() {
    let mut scene = Scene::new(SceneId(7));
    scene
        .add(SceneObject::rect("workspace", 10.0, 10.0).with_extension(ExtensionType::Workspace))
        .unwrap();
    scene.add(SceneObject::rect("photo", 5.0, 5.0)).unwrap();
    scene
        .add(SceneObject::rect("guide-1", 0.0, 0.0).with_extension(ExtensionType::Guideline))
        .unwrap();
    scene
        .add(SceneObject::rect("safe-border", 1.0, 1.0).with_extension(ExtensionType::PrintGuide))
        .unwrap();

    let doc = SceneDocument::capture(&scene, &WorkspaceOptions::default());
    assert_eq!(doc.objects.len(), 1);
    assert_eq!(doc.objects[0].id, "photo");

    let json = doc.to_json().unwrap();
    assert_eq!(SceneDocument::from_json(&json).unwrap(), doc);
}

#[test]
fn from_json_rejects_bad_documents() {
    assert!(SceneDocument::from_json("{").is_err());

    let mut doc = SceneDocument {
        version: DOCUMENT_VERSION.to_string(),
        workspace: WorkspaceOptions::default(),
        objects: vec![SceneObject::rect("a", 1.0, 1.0), SceneObject::rect("a", 1.0, 1.0)],
    };
    assert!(doc.validate().is_err());

    doc.objects = vec![SceneObject::rect("g", 1.0, 1.0).with_extension(ExtensionType::Guideline)];
    assert!(doc.validate().is_err());

    doc.objects.clear();
    doc.version = "0".to_string();
    assert!(doc.validate().is_err());
}
