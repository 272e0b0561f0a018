use super::*;
use crate::foundation::core::approx_eq;

#[test]
fn validate_rejects_bad_sizes_and_margins() {
    assert!(WorkspaceOptions::default().validate().is_ok());

    let mut o = WorkspaceOptions::default();
    o.width = 0.0;
    assert!(o.validate().is_err());

    let mut o = WorkspaceOptions::default();
    o.cut_size = -1.0;
    assert!(o.validate().is_err());

    let mut o = WorkspaceOptions::default();
    o.dpi = f64::INFINITY;
    assert!(o.validate().is_err());
}

#[test]
fn from_mm_uses_dpi() {
    let o = WorkspaceOptions::from_mm(25.4, 50.8, 2.54, 300.0);
    assert!(approx_eq(o.width, 300.0, 1e-9));
    assert!(approx_eq(o.height, 600.0, 1e-9));
    assert!(approx_eq(o.cut_size, 30.0, 1e-9));
    assert_eq!(o.unit, Unit::Mm);
}

#[test]
fn profiles_decide_clipping() {
    assert!(RenderProfile::Bounded.clips_content());
    assert!(RenderProfile::Envelope.clips_content());
    assert!(!RenderProfile::Unbounded.clips_content());
    assert!(!RenderProfile::Mockup.clips_content());
}

#[test]
fn options_deserialize_with_defaults() {
    let o: WorkspaceOptions =
        serde_json::from_str(r#"{"width": 800, "height": 600, "unit": "mm"}"#).unwrap();
    assert_eq!(o.dpi, 300.0);
    assert_eq!(o.unit, Unit::Mm);
    assert_eq!(o.profile, RenderProfile::Bounded);
}
