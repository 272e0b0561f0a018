use super::*;

#[test]
fn guide_position_follows_axis() {
    let h = guideline_object("guide-1", GuideAxis::Horizontal, 42.0);
    assert_eq!(guide_position(&h), Some((GuideAxis::Horizontal, 42.0)));

    let v = guideline_object("guide-2", GuideAxis::Vertical, 7.0);
    assert_eq!(guide_position(&v), Some((GuideAxis::Vertical, 7.0)));
    assert!(v.extension.is_transient());

    assert_eq!(guide_position(&SceneObject::rect("r", 1.0, 1.0)), None);
}

#[test]
fn positions_snap_to_whole_units() {
    let p = Point::new(10.4, 33.6);
    assert_eq!(snapped_guide_position(GuideAxis::Vertical, p, Unit::Px, 300.0), 10.0);
    assert_eq!(snapped_guide_position(GuideAxis::Horizontal, p, Unit::Px, 300.0), 34.0);

    // 1 mm at 254 DPI is exactly 10 px.
    let mm = snapped_guide_position(GuideAxis::Vertical, Point::new(26.0, 0.0), Unit::Mm, 254.0);
    assert!((mm - 30.0).abs() < 1e-9);
}

#[test]
fn origin_strip_detection() {
    assert!(over_origin_ruler(GuideAxis::Horizontal, Point::new(300.0, 5.0)));
    assert!(!over_origin_ruler(GuideAxis::Horizontal, Point::new(5.0, 300.0)));
    assert!(over_origin_ruler(GuideAxis::Vertical, Point::new(5.0, 300.0)));
}
