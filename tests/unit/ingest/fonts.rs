use std::sync::Mutex;

use super::*;

#[derive(Default)]
struct FakeProvider {
    calls: Mutex<Vec<String>>,
}

impl FontProvider for FakeProvider {
    fn load(&self, family: &str) -> QuireResult<Vec<Vec<u8>>> {
        self.calls.lock().unwrap().push(family.to_string());
        if family == "Missing" {
            return Err(QuireError::font(format!("font family '{family}' not found")));
        }
        // Not a parseable font; the database ignores it, but the family counts as loaded.
        Ok(vec![vec![0u8; 4]])
    }
}

fn families(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn generic_keywords_are_recognized() {
    assert!(is_generic_family("Sans-Serif"));
    assert!(is_generic_family(" monospace "));
    assert!(!is_generic_family("Helvetica"));
}

#[test]
fn ensure_loads_each_family_once() {
    let provider = Arc::new(FakeProvider::default());
    let mut cache = FontCache::new(provider.clone());

    let added = cache.ensure(&families(&["Alpha", "Beta", "serif"])).unwrap();
    assert_eq!(added, 2);
    assert!(cache.is_loaded("Alpha"));
    assert_eq!(cache.loaded().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);

    let added = cache.ensure(&families(&["Alpha", "Gamma"])).unwrap();
    assert_eq!(added, 1);

    let mut calls = provider.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn failures_propagate_but_keep_successful_loads() {
    let provider = Arc::new(FakeProvider::default());
    let mut cache = FontCache::new(provider);

    let err = cache
        .ensure(&families(&["Missing", "Present"]))
        .unwrap_err();
    assert!(matches!(err, QuireError::Font(_)));
    assert!(cache.is_loaded("Present"));
    assert!(!cache.is_loaded("Missing"));
}

#[test]
fn directory_provider_reports_unknown_families() {
    let dir = std::env::temp_dir().join(format!("quire_fonts_empty_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("notes.txt"), b"not a font").unwrap();

    let provider = DirectoryFontProvider::new([dir.clone(), dir.join("absent")]);
    assert_eq!(provider.face_count(), 0);
    let err = provider.load("Nope").unwrap_err();
    assert!(err.to_string().contains("'Nope' not found"));

    std::fs::remove_dir_all(&dir).ok();
}
