use super::*;
use crate::scene::arena::Arena;

fn keys(n: usize) -> Vec<ObjectKey> {
    let mut arena = Arena::new();
    (0..n).map(|_| arena.insert(())).collect()
}

#[test]
fn sweep_evicts_oldest_down_to_target_ratio() {
    // 400x250x4 = 400_000 bytes per entry, a quarter of the ceiling.
    let ceiling = 1_600_000;
    let mut m = CacheManager::new(CacheOpts {
        ceiling_bytes: ceiling,
        ..CacheOpts::default()
    });
    let t0 = Instant::now();
    let ks = keys(8);
    for (i, k) in ks.iter().enumerate() {
        m.on_created(*k, 400, 250, t0 + Duration::from_millis(i as u64));
    }
    assert_eq!(m.total_bytes(), 8 * 400_000);

    let evicted = m.sweep(t0 + Duration::from_secs(1), None);
    assert!(m.total_bytes() as f64 <= 0.8 * ceiling as f64);
    assert_eq!(evicted, ks[..5].to_vec());
    assert_eq!(m.len(), 3);
    assert_eq!(m.stats().evicted, 5);
}

#[test]
fn touched_entries_survive_and_protected_key_is_never_evicted() {
    let mut m = CacheManager::new(CacheOpts {
        ceiling_bytes: 1_000,
        ..CacheOpts::default()
    });
    let t0 = Instant::now();
    let ks = keys(3);
    m.on_created(ks[0], 10, 10, t0); // workspace
    m.on_created(ks[1], 10, 10, t0 + Duration::from_millis(1));
    m.on_created(ks[2], 10, 10, t0 + Duration::from_millis(2));
    assert!(m.touch(ks[1], t0 + Duration::from_millis(10)));

    let evicted = m.sweep(t0 + Duration::from_millis(20), Some(ks[0]));
    assert_eq!(evicted, vec![ks[2]]);
    assert!(m.entry(ks[0]).is_some());
    assert!(m.entry(ks[1]).is_some());
}

#[test]
fn under_ceiling_sweep_is_noop_and_interval_is_respected() {
    let mut m = CacheManager::new(CacheOpts::default());
    let t0 = Instant::now();
    let ks = keys(1);
    m.on_created(ks[0], 64, 64, t0);
    assert!(m.sweep_due(t0));
    assert!(m.sweep(t0, None).is_empty());
    assert!(!m.sweep_due(t0 + Duration::from_millis(500)));
    assert!(m.sweep_due(t0 + Duration::from_millis(1000)));
    assert!(m.remove(ks[0]));
    assert!(!m.touch(ks[0], t0));
    assert!(m.is_empty());
}
