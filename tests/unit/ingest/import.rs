use std::sync::Arc;

use super::*;
use crate::foundation::core::approx_eq;
use crate::ingest::fonts::FontProvider;

struct NoFonts;

impl FontProvider for NoFonts {
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>> {
        Err(QuireError::font(format!("font family '{family}' not found")))
    }
}

fn import(body: &str) -> ImportedPage {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">{body}</svg>"#
    );
    UsvgImporter
        .import(&svg, &FontCache::new(Arc::new(NoFonts)))
        .unwrap()
}

#[test]
fn paths_are_stored_relative_to_their_bounds() {
    let page = import(r##"<rect id="r" x="10" y="5" width="20" height="10" fill="#ff0000"/>"##);
    assert_eq!(page.objects.len(), 1);
    let obj = &page.objects[0].object;
    assert_eq!(obj.id, "r");
    assert!(approx_eq(obj.transform.left, 10.0, 1e-4));
    assert!(approx_eq(obj.transform.top, 5.0, 1e-4));
    let local = obj.local_rect();
    assert!(approx_eq(local.x0, 0.0, 1e-4) && approx_eq(local.width(), 20.0, 1e-4));
    assert_eq!(obj.paint.fill, Some(Rgba8 { r: 255, g: 0, b: 0, a: 255 }));
    assert!(approx_eq(page.bounds.x1, 30.0, 1e-4));
}

#[test]
fn clipped_groups_emit_a_hidden_clip_outline() {
    let page = import(
        r##"<defs><clipPath id="c"><rect width="50" height="50"/></clipPath></defs>
        <g id="bg" clip-path="url(#c)"><rect id="big" x="-10" y="-10" width="200" height="200"/></g>
        <g id="art" transform="translate(5 5)"><path d="M0 0 L10 0 L10 10 Z"/></g>"##,
    );
    let ids: Vec<&str> = page.objects.iter().map(|o| o.object.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[..2], &["big", "c"]);

    let big = &page.objects[0].object;
    assert_eq!(
        big.clip,
        Some(ClipRegion::Object {
            id: "c".to_string()
        })
    );
    let clip = &page.objects[1].object;
    assert!(!clip.flags.visible && !clip.flags.selectable);
    assert_eq!(clip.extension, ExtensionType::TemplateElement);

    let art = &page.objects[2].object;
    assert!(!art.id.is_empty());
    assert!(approx_eq(art.transform.left, 5.0, 1e-4));
    assert!(art.clip.is_none());

    // The oversized background only counts inside its clip.
    assert!(approx_eq(page.bounds.x0, 0.0, 1e-4));
    assert!(approx_eq(page.bounds.x1, 50.0, 1e-4));
}

#[test]
fn duplicate_and_missing_ids_get_fresh_names() {
    let mut w = Walker::default();
    assert_eq!(w.claim_id("a", &[]), "a");
    assert_eq!(w.claim_id("a", &[]), "a-1");
    assert_eq!(w.claim_id("", &["grp".to_string()]), "grp-2");
    assert_eq!(w.claim_id("", &[]), "shape-3");
}

#[test]
fn broken_markup_is_an_ingest_error() {
    let err = UsvgImporter
        .import("<svg", &FontCache::new(Arc::new(NoFonts)))
        .unwrap_err();
    assert!(matches!(err, QuireError::Ingest(_)));
}
