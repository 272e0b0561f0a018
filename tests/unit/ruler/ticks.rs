use super::*;
use crate::foundation::core::Vec2;

#[test]
fn pixel_gaps_follow_zoom_table() {
    assert_eq!(tick_gap(1.0, Unit::Px, 300.0), 50.0);
    assert_eq!(tick_gap(0.75, Unit::Px, 300.0), 100.0);
    assert_eq!(tick_gap(5.0, Unit::Px, 300.0), 10.0);
    assert_eq!(tick_gap(40.0, Unit::Px, 300.0), 10.0);
    assert_eq!(tick_gap(0.001, Unit::Px, 300.0), 5000.0);
}

#[test]
fn millimeter_gaps_get_coarser_at_low_dpi() {
    assert_eq!(tick_gap(1.0, Unit::Mm, 300.0), 5.0);
    assert_eq!(tick_gap(1.0, Unit::Mm, 200.0), 10.0);
    assert_eq!(tick_gap(1.0, Unit::Mm, 72.0), 20.0);
}

#[test]
fn ticks_cover_strip_with_labeled_majors() {
    let vp = Viewport {
        zoom: 1.0,
        pan: Vec2::new(0.0, 0.0),
        canvas_width: 200.0,
        canvas_height: 100.0,
    };
    let ticks = ruler_ticks(GuideAxis::Horizontal, &vp, Unit::Px, 300.0);
    // 50 px majors, 10 px minors from 0 to 200 inclusive.
    assert_eq!(ticks.len(), 21);
    let majors: Vec<_> = ticks.iter().filter(|t| t.major).collect();
    assert_eq!(majors.len(), 5);
    assert_eq!(majors[1].label.as_deref(), Some("50"));
    assert!(ticks.iter().filter(|t| !t.major).all(|t| t.label.is_none()));

    let vertical = ruler_ticks(GuideAxis::Vertical, &vp, Unit::Px, 300.0);
    assert_eq!(vertical.len(), 11);
}

#[test]
fn pan_shifts_tick_values() {
    let vp = Viewport {
        zoom: 2.0,
        pan: Vec2::new(-100.0, 0.0),
        canvas_width: 100.0,
        canvas_height: 100.0,
    };
    let ticks = ruler_ticks(GuideAxis::Horizontal, &vp, Unit::Px, 300.0);
    let first = &ticks[0];
    assert_eq!(first.value, 52.0);
    assert!((first.screen - 4.0).abs() < 1e-9);
}
