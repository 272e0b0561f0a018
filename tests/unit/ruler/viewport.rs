use super::*;
use crate::foundation::core::approx_eq;

#[test]
fn screen_and_scene_mappings_are_inverse() {
    let vp = Viewport {
        zoom: 2.0,
        pan: Vec2::new(30.0, -10.0),
        ..Viewport::default()
    };
    let p = Point::new(12.5, 40.0);
    let s = vp.scene_to_screen(p);
    assert_eq!(s, Point::new(55.0, 70.0));
    let back = vp.screen_to_scene(s);
    assert!(approx_eq(back.x, p.x, 1e-9) && approx_eq(back.y, p.y, 1e-9));
}

#[test]
fn zoom_at_keeps_anchor_fixed_and_clamps() {
    let mut vp = Viewport::default();
    let anchor = Point::new(400.0, 300.0);
    let before = vp.screen_to_scene(anchor);
    vp.zoom_at(3.0, anchor).unwrap();
    let after = vp.screen_to_scene(anchor);
    assert!(approx_eq(before.x, after.x, 1e-9) && approx_eq(before.y, after.y, 1e-9));

    vp.zoom_at(1e9, anchor).unwrap();
    assert_eq!(vp.zoom, 100.0);
}

#[test]
fn zoom_at_rejects_non_finite_input() {
    let mut vp = Viewport::default();
    let anchor = Point::new(10.0, 10.0);
    assert!(vp.zoom_at(f64::NAN, anchor).is_err());
    assert!(vp.zoom_at(f64::INFINITY, anchor).is_err());
    assert!(vp.zoom_at(-2.0, anchor).is_err());
    assert!(vp.zoom_at(2.0, Point::new(f64::NAN, 0.0)).is_err());
    assert_eq!(vp, Viewport::default());
    assert!(vp.validate().is_ok());
}

#[test]
fn fit_centers_rect_in_canvas() {
    let mut vp = Viewport {
        canvas_width: 1000.0,
        canvas_height: 500.0,
        ..Viewport::default()
    };
    vp.fit(Rect::new(0.0, 0.0, 2000.0, 2000.0), 50.0);
    assert!(approx_eq(vp.zoom, 0.2, 1e-12));
    let center = vp.scene_to_screen(Point::new(1000.0, 1000.0));
    assert!(approx_eq(center.x, 500.0, 1e-9) && approx_eq(center.y, 250.0, 1e-9));
    assert!(vp.validate().is_ok());
    vp.zoom = 0.0;
    assert!(vp.validate().is_err());
}
