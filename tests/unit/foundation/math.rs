use super::*;

#[test]
fn state_hasher_is_stable_and_order_sensitive() {
    let mut a = StateHasher::new();
    a.write_f64(1.0);
    a.write_f64(2.0);
    let mut b = StateHasher::new();
    b.write_f64(1.0);
    b.write_f64(2.0);
    let mut c = StateHasher::new();
    c.write_f64(2.0);
    c.write_f64(1.0);

    let (a, b, c) = (a.finish(), b.finish(), c.finish());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn uniform_fit_picks_the_tighter_axis() {
    assert_eq!(uniform_fit_scale(1000.0, 500.0, 100.0, 100.0), 5.0);
    assert_eq!(uniform_fit_scale(1000.0, 500.0, 0.0, 100.0), 1.0);
}
