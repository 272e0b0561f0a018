use super::*;
use crate::plugin::options::EditorOptions;
use crate::scene::store::SceneId;

fn ids(scene: &Scene) -> Vec<&str> {
    scene.iter().map(|(_, o)| o.id.as_str()).collect()
}

fn scene_with(names: &[&str]) -> Scene {
    let mut scene = Scene::new(SceneId(7));
    for n in names {
        scene.add(SceneObject::rect(*n, 10.0, 10.0)).unwrap();
    }
    scene
}

fn fill_of(id: &str, parent: &str) -> SceneObject {
    let mut fill = SceneObject::rect(id, 5.0, 5.0)
        .with_extension(ExtensionType::FillImage)
        .with_parent(parent);
    fill.clip = Some(ClipRegion::Object {
        id: parent.to_string(),
    });
    fill
}

#[test]
fn raise_and_lower_step_over_whole_units() {
    let mut scene = scene_with(&["a", "b", "c"]);
    scene.insert_at(2, fill_of("b_fill", "b")).unwrap();
    assert_eq!(ids(&scene), vec!["a", "b", "b_fill", "c"]);

    let a = scene.key_of("a").unwrap();
    assert!(reorder(&mut scene, a, LayerMove::Raise));
    assert_eq!(ids(&scene), vec!["b", "b_fill", "a", "c"]);

    let b = scene.key_of("b").unwrap();
    assert!(reorder(&mut scene, b, LayerMove::RaiseToTop));
    assert_eq!(ids(&scene), vec!["a", "c", "b", "b_fill"]);

    assert!(reorder(&mut scene, b, LayerMove::Lower));
    assert_eq!(ids(&scene), vec!["a", "b", "b_fill", "c"]);

    let fill = scene.key_of("b_fill").unwrap();
    assert!(reorder(&mut scene, fill, LayerMove::LowerToBottom));
    assert_eq!(ids(&scene), vec!["b", "b_fill", "a", "c"]);
    assert!(!reorder(&mut scene, b, LayerMove::LowerToBottom));
}

#[test]
fn reorder_stays_inside_band_and_respects_lock() {
    let mut scene = scene_with(&["a"]);
    scene
        .add(SceneObject::rect("ov", 1.0, 1.0).with_extension(ExtensionType::Overlay))
        .unwrap();
    let a = scene.key_of("a").unwrap();
    assert!(!reorder(&mut scene, a, LayerMove::Raise));
    assert!(!reorder(&mut scene, a, LayerMove::RaiseToTop));

    let mut locked = SceneObject::rect("l", 1.0, 1.0);
    locked.flags.lock_layer_order = true;
    let l = scene.insert_at(0, locked).unwrap();
    assert!(!reorder(&mut scene, l, LayerMove::Raise));
}

#[test]
fn delete_cascades_to_companions_and_reveals_icon() {
    let mut scene = scene_with(&["shape"]);
    scene.add(fill_of("img", "shape")).unwrap();
    scene
        .add(SceneObject::rect("shape_outline", 10.0, 10.0).with_extension(ExtensionType::Outline))
        .unwrap();
    let mut icon =
        SceneObject::rect("shape_moldIcon", 2.0, 2.0).with_extension(ExtensionType::MoldIcon);
    icon.flags.visible = false;
    scene.add(icon).unwrap();

    let img = scene.key_of("img").unwrap();
    assert_eq!(delete_cascade(&mut scene, img), vec!["img".to_string()]);
    assert!(scene.get_by_id("shape_moldIcon").unwrap().flags.visible);

    let shape = scene.key_of("shape").unwrap();
    let mut removed = delete_cascade(&mut scene, shape);
    removed.sort();
    assert_eq!(removed, vec!["shape", "shape_moldIcon", "shape_outline"]);
    assert!(scene.is_empty());
    assert!(delete_cascade(&mut scene, shape).is_empty());
}

#[test]
fn delete_clears_clips_pointing_at_removed_objects() {
    let mut scene = scene_with(&["mask", "other"]);
    scene.modify(scene.key_of("other").unwrap(), |o| {
        o.clip = Some(ClipRegion::Object { id: "mask".into() });
    });
    let mask = scene.key_of("mask").unwrap();
    delete_cascade(&mut scene, mask);
    assert_eq!(scene.get_by_id("other").unwrap().clip, None);
}

#[test]
fn move_by_carries_companions_and_refuses_template_elements() {
    let mut scene = scene_with(&["shape"]);
    scene.add(fill_of("img", "shape")).unwrap();
    let shape = scene.key_of("shape").unwrap();
    assert!(move_by(&mut scene, shape, Vec2::new(3.0, 4.0)));
    assert_eq!(scene.get_by_id("img").unwrap().transform.left, 3.0);
    assert_eq!(scene.get_by_id("img").unwrap().transform.top, 4.0);

    let tpl = scene
        .add(SceneObject::rect("tpl", 1.0, 1.0).with_extension(ExtensionType::TemplateElement))
        .unwrap();
    assert!(!move_by(&mut scene, tpl, Vec2::new(1.0, 0.0)));
}

#[test]
fn group_then_ungroup_restores_positions() {
    let mut scene = Scene::new(SceneId(8));
    let a = scene.add(SceneObject::rect("a", 10.0, 10.0).at(20.0, 30.0)).unwrap();
    let b = scene.add(SceneObject::rect("b", 10.0, 10.0).at(50.0, 60.0)).unwrap();

    let g = group(&mut scene, &[a, b]).unwrap().unwrap();
    assert_eq!(scene.len(), 1);
    let bounds = scene.get(g).unwrap().bounding_rect();
    assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (20.0, 30.0, 60.0, 70.0));

    let keys = ungroup(&mut scene, g).unwrap();
    assert_eq!(keys.len(), 2);
    let b = scene.get_by_id("b").unwrap();
    assert_eq!((b.transform.left, b.transform.top), (50.0, 60.0));
}

#[test]
fn group_needs_two_content_objects() {
    let mut scene = scene_with(&["a"]);
    let a = scene.key_of("a").unwrap();
    assert_eq!(group(&mut scene, &[a]).unwrap(), None);
}

#[test]
fn editor_reorder_requires_single_selection() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let a = ed.add_object(SceneObject::rect("a", 1.0, 1.0)).unwrap();
    let b = ed.add_object(SceneObject::rect("b", 1.0, 1.0)).unwrap();

    assert!(!ed.raise_selected());
    ed.select(&[a, b]);
    assert!(!ed.raise_selected());
    ed.select(&[a]);
    assert!(ed.raise_selected());
    assert!(ed.scene().index_of(a) > ed.scene().index_of(b));
}

#[test]
fn editor_delete_is_one_undo_step() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let shape = ed.add_object(SceneObject::rect("shape", 10.0, 10.0)).unwrap();
    let outline =
        SceneObject::rect("shape_outline", 10.0, 10.0).with_extension(ExtensionType::Outline);
    ed.add_object(outline).unwrap();
    let before = ed.context().history.undo_len();

    ed.select(&[shape]);
    assert_eq!(ed.delete_selected().len(), 2);
    assert_eq!(ed.context().history.undo_len(), before + 1);

    assert!(ed.undo());
    assert!(ed.scene().get_by_id("shape").is_some());
    assert!(ed.scene().get_by_id("shape_outline").is_some());
    assert!(ed.delete_object("missing").is_empty());
}

#[test]
fn editor_lock_and_visibility_apply_to_selection() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let a = ed.add_object(SceneObject::rect("a", 1.0, 1.0)).unwrap();
    assert_eq!(ed.lock_selected(), 0);
    ed.select(&[a]);
    assert_eq!(ed.lock_selected(), 1);
    assert!(!ed.move_by(a, Vec2::new(1.0, 1.0)));
    assert_eq!(ed.unlock_selected(), 1);
    assert!(ed.move_by(a, Vec2::new(1.0, 1.0)));
    assert_eq!(ed.set_selected_visible(false), 1);
    assert!(!ed.scene().get(a).unwrap().flags.visible);
}

#[test]
fn lock_with_several_selected_changes_nothing() {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    let a = ed.add_object(SceneObject::rect("a", 1.0, 1.0)).unwrap();
    let b = ed.add_object(SceneObject::rect("b", 1.0, 1.0)).unwrap();
    let before = ed.context().history.undo_len();

    ed.select(&[a, b]);
    assert_eq!(ed.lock_selected(), 0);
    assert!(!ed.scene().get(a).unwrap().flags.locked);
    assert!(!ed.scene().get(b).unwrap().flags.locked);
    assert_eq!(ed.unlock_selected(), 0);
    assert_eq!(ed.context().history.undo_len(), before);
}
