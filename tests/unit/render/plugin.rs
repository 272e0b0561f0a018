use std::time::{Duration, Instant};

use super::*;
use crate::plugin::kernel::Editor;
use crate::plugin::options::EditorOptions;
use crate::render::surface::{CachedRaster, RenderOutcome, RenderSurface};
use crate::scene::object::{Band, SceneObject};
use crate::scene::store::Scene;
use crate::workspace::settings::WorkspaceOptions;

/// Reports one cached raster per content object.
struct CachingSurface;

impl RenderSurface for CachingSurface {
    fn is_alive(&self) -> bool {
        true
    }

    fn render(&mut self, scene: &Scene, _ws: &WorkspaceOptions) -> QuireResult<RenderOutcome> {
        let cached = scene
            .iter()
            .filter(|(_, o)| o.band() == Band::Content)
            .map(|(key, _)| CachedRaster {
                key,
                width: 10,
                height: 10,
            })
            .collect();
        Ok(RenderOutcome { cached })
    }
}

fn rendered_editor() -> (Editor, Instant) {
    let mut ed = Editor::with_default_plugins(EditorOptions::default()).unwrap();
    ed.set_surface(Box::new(CachingSurface));
    ed.add_object(SceneObject::rect("a", 10.0, 10.0)).unwrap();
    ed.add_object(SceneObject::rect("b", 10.0, 10.0)).unwrap();
    let t0 = Instant::now() + Duration::from_secs(1);
    let report = ed.tick(t0);
    assert!(report.rendered);
    assert_eq!(ed.context().caches.len(), 2);
    (ed, t0)
}

#[test]
fn selection_refreshes_access_stamps() {
    let (mut ed, t0) = rendered_editor();
    let t1 = t0 + Duration::from_millis(500);
    ed.tick(t1);
    let a = ed.scene().key_of("a").unwrap();
    ed.select(&[a]);
    assert_eq!(ed.context().caches.entry(a).unwrap().last_access, t1);
    assert_eq!(ed.plugin::<CachePlugin>().unwrap().touched(), 1);
}

#[test]
fn each_rendered_frame_restamps_the_selection() {
    let (mut ed, t0) = rendered_editor();
    let a = ed.scene().key_of("a").unwrap();
    let b = ed.scene().key_of("b").unwrap();
    ed.select(&[a]);

    let later = t0 + Duration::from_secs(5);
    assert!(ed.tick(later).rendered);
    assert_eq!(ed.context().caches.entry(a).unwrap().last_access, later);
    assert_eq!(ed.context().caches.entry(b).unwrap().last_access, t0);
}

#[test]
fn modified_and_removed_objects_lose_their_cache() {
    let (mut ed, _) = rendered_editor();
    let a = ed.scene().key_of("a").unwrap();
    let b = ed.scene().key_of("b").unwrap();

    ed.move_by(a, crate::foundation::core::Vec2::new(1.0, 0.0));
    assert!(ed.context().caches.entry(a).is_none());

    ed.delete_object("b");
    assert!(ed.context().caches.entry(b).is_none());
    assert!(ed.context().caches.is_empty());
    assert_eq!(ed.plugin::<CachePlugin>().unwrap().invalidated(), 2);
}

#[test]
fn destroy_clears_caches() {
    let (mut ed, _) = rendered_editor();
    ed.destroy();
    assert!(ed.context().caches.is_empty());
}
