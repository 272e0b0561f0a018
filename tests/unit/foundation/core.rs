use super::*;

#[test]
fn mm_px_conversion_roundtrips_at_print_dpi() {
    let px = mm_to_px(210.0, 300.0);
    assert!(approx_eq(px, 2480.314_960_629_921, 1e-9));
    assert!(approx_eq(px_to_mm(px, 300.0), 210.0, 1e-9));
    assert!(approx_eq(Unit::Mm.from_px(300.0, 300.0), 25.4, 1e-9));
    assert_eq!(Unit::Px.to_px(12.5, 72.0), 12.5);
}

#[test]
fn hex_colors_parse_short_long_and_alpha_forms() {
    assert_eq!(Rgba8::from_hex("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex("#102030").unwrap(),
        Rgba8::rgb(0x10, 0x20, 0x30)
    );
    let c = Rgba8::from_hex("#00000080").unwrap();
    assert_eq!(c.a, 0x80);
    assert!(Rgba8::from_hex("fff").is_err());
    assert!(Rgba8::from_hex("#ggg").is_err());
    assert_eq!(Rgba8::rgb(1, 2, 255).to_hex_rgb(), "#0102ff");
}

#[test]
fn origin_factors() {
    assert_eq!(OriginX::Center.factor(), 0.5);
    assert_eq!(OriginY::Bottom.factor(), 1.0);
}
