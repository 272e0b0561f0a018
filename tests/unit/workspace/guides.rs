use super::*;
use crate::foundation::core::Point;
use crate::scene::store::SceneId;

fn assert_rect(a: Rect, b: Rect) {
    let close = |x: f64, y: f64| (x - y).abs() < 1e-9;
    assert!(
        close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1),
        "{a:?} != {b:?}"
    );
}

fn opts(cut: f64, safe: f64) -> WorkspaceOptions {
    WorkspaceOptions {
        width: 200.0,
        height: 100.0,
        cut_size: cut,
        safe_size: safe,
        ..WorkspaceOptions::default()
    }
}

#[test]
fn rectangular_guides_are_inset_from_page() {
    let mut scene = Scene::new(SceneId(1));
    let guides = PrintGuides::new();
    assert_eq!(guides.regenerate(&mut scene, &opts(10.0, 5.0)).unwrap(), 2);

    let cut = scene.get_by_id(CUT_BORDER_ID).unwrap();
    assert_eq!(cut.extension, ExtensionType::PrintGuide);
    assert!(!cut.flags.selectable);
    assert_rect(cut.bounding_rect(), Rect::new(10.0, 10.0, 190.0, 90.0));

    let safe = scene.get_by_id(SAFE_BORDER_ID).unwrap();
    assert_rect(safe.bounding_rect(), Rect::new(15.0, 15.0, 185.0, 85.0));

    // Regeneration replaces instead of duplicating.
    guides.regenerate(&mut scene, &opts(20.0, 0.0)).unwrap();
    assert_eq!(scene.len(), 2);
    assert_rect(
        scene.get_by_id(SAFE_BORDER_ID).unwrap().bounding_rect(),
        Rect::new(20.0, 20.0, 180.0, 80.0),
    );
}

#[test]
fn guides_are_skipped_when_margin_consumes_page() {
    let mut scene = Scene::new(SceneId(1));
    let guides = PrintGuides::new();
    assert_eq!(guides.regenerate(&mut scene, &opts(50.0, 10.0)).unwrap(), 0);
    assert!(scene.is_empty());
    assert_eq!(guides.regenerate(&mut scene, &opts(0.0, 0.0)).unwrap(), 0);
}

#[test]
fn toggle_and_suppress_drive_visibility() {
    let mut guides = PrintGuides::new();
    assert_eq!(guides.toggle(PrintGuideKind::CutBorder), GuideVisibility::Hidden);
    assert!(!guides.is_drawn(PrintGuideKind::CutBorder));
    assert!(guides.is_drawn(PrintGuideKind::SafeBorder));

    guides.suppress();
    assert!(!guides.is_drawn(PrintGuideKind::SafeBorder));
    guides.restore();
    assert!(guides.is_drawn(PrintGuideKind::SafeBorder));

    let mut scene = Scene::new(SceneId(1));
    assert_eq!(guides.regenerate(&mut scene, &opts(10.0, 5.0)).unwrap(), 1);
    assert!(scene.get_by_id(CUT_BORDER_ID).is_none());
}

#[test]
fn non_rectangular_background_outline_is_scaled_inward() {
    let mut diamond = BezPath::new();
    diamond.move_to(Point::new(100.0, 0.0));
    diamond.line_to(Point::new(200.0, 50.0));
    diamond.line_to(Point::new(100.0, 100.0));
    diamond.line_to(Point::new(0.0, 50.0));
    diamond.close_path();
    assert!(is_non_rectangular(&diamond));
    assert!(!is_non_rectangular(&Rect::new(0.0, 0.0, 5.0, 5.0).to_path(0.1)));

    let path = guide_path(&opts(10.0, 0.0), 10.0, Some(&diamond)).unwrap();
    assert_rect(path.bounding_box(), Rect::new(10.0, 10.0, 190.0, 90.0));

    let rect_bg = Rect::new(0.0, 0.0, 200.0, 100.0).to_path(0.1);
    let fallback = guide_path(&opts(10.0, 0.0), 10.0, Some(&rect_bg)).unwrap();
    assert_rect(fallback.bounding_box(), Rect::new(10.0, 10.0, 190.0, 90.0));
    assert!(!is_non_rectangular(&fallback));
}

#[test]
fn background_object_drives_guide_shape() {
    let mut scene = Scene::new(SceneId(1));
    let mut tri = BezPath::new();
    tri.move_to(Point::new(0.0, 0.0));
    tri.line_to(Point::new(200.0, 0.0));
    tri.line_to(Point::new(100.0, 100.0));
    tri.close_path();
    let bg = SceneObject::new("bg", ObjectKind::Path { path: tri })
        .with_extension(ExtensionType::Background);
    scene.add(bg).unwrap();

    PrintGuides::new()
        .regenerate(&mut scene, &opts(10.0, 0.0))
        .unwrap();
    let cut = scene.get_by_id(CUT_BORDER_ID).unwrap().scene_outline().unwrap();
    assert!(is_non_rectangular(&cut));
}
