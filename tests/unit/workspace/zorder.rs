use super::*;
use crate::scene::store::SceneId;

fn ids(scene: &Scene) -> Vec<&str> {
    scene.iter().map(|(_, o)| o.id.as_str()).collect()
}

fn tagged(id: &str, ext: ExtensionType) -> SceneObject {
    SceneObject::rect(id, 1.0, 1.0).with_extension(ext)
}

#[test]
fn bands_are_sorted_stably() {
    let mut scene = Scene::new(SceneId(1));
    scene.add(tagged("guide", ExtensionType::Guideline)).unwrap();
    scene.add(tagged("a", ExtensionType::Ordinary)).unwrap();
    scene.add(tagged("bg", ExtensionType::Background)).unwrap();
    let mut top = tagged("sticker", ExtensionType::Ordinary);
    top.flags.always_top = true;
    scene.add(top).unwrap();
    scene.add(tagged("b", ExtensionType::TemplateElement)).unwrap();
    scene.add(tagged("workspace", ExtensionType::Workspace)).unwrap();

    assert!(!is_layered(&scene));
    assert!(enforce_layering(&mut scene));
    assert_eq!(ids(&scene), vec!["workspace", "bg", "a", "b", "guide", "sticker"]);
    assert!(is_layered(&scene));
    assert!(!enforce_layering(&mut scene));
}

#[test]
fn fill_image_lands_directly_above_parent() {
    let mut scene = Scene::new(SceneId(1));
    scene.add(tagged("fill", ExtensionType::FillImage).with_parent("mold")).unwrap();
    scene.add(tagged("mold", ExtensionType::Ordinary)).unwrap();
    scene.add(tagged("other", ExtensionType::Ordinary)).unwrap();
    scene.add(tagged("orphan", ExtensionType::FillImage).with_parent("gone")).unwrap();

    enforce_layering(&mut scene);
    assert_eq!(ids(&scene), vec!["mold", "fill", "other", "orphan"]);
    assert!(is_layered(&scene));
}

#[test]
fn band_range_reports_insertion_point_for_empty_band() {
    let mut scene = Scene::new(SceneId(1));
    scene.add(tagged("workspace", ExtensionType::Workspace)).unwrap();
    scene.add(tagged("a", ExtensionType::Ordinary)).unwrap();
    scene.add(tagged("b", ExtensionType::Ordinary)).unwrap();
    scene.add(tagged("cut-border", ExtensionType::PrintGuide)).unwrap();

    assert_eq!(band_range(&scene, Band::Content), (1, 3));
    assert_eq!(band_range(&scene, Band::Background), (1, 1));
    assert_eq!(band_range(&scene, Band::Top), (3, 4));
}
