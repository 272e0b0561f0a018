use super::*;

const WINDOW: Duration = Duration::from_millis(16);

#[test]
fn requests_within_one_window_render_once() {
    let t0 = Instant::now();
    let scene = SceneId(1);
    let mut s = RenderScheduler::new(WINDOW);

    assert!(s.request(scene, t0));
    assert!(!s.request(scene, t0 + Duration::from_millis(3)));
    assert!(!s.request(scene, t0 + Duration::from_millis(9)));

    assert!(s.poll(t0 + Duration::from_millis(10)).is_empty());
    assert_eq!(s.poll(t0 + WINDOW), vec![scene]);
    assert!(s.poll(t0 + WINDOW * 2).is_empty());

    let st = s.stats();
    assert_eq!(st.requested, 3);
    assert_eq!(st.coalesced, 2);
    assert_eq!(st.rendered, 1);
}

#[test]
fn immediate_request_pulls_deadline_forward() {
    let t0 = Instant::now();
    let scene = SceneId(7);
    let mut s = RenderScheduler::new(WINDOW);
    s.request(scene, t0);
    s.request_immediate(scene, t0 + Duration::from_millis(1));
    assert_eq!(s.poll(t0 + Duration::from_millis(1)), vec![scene]);
}

#[test]
fn nested_pause_yields_exactly_one_render_after_outer_resume() {
    let t0 = Instant::now();
    let scene = SceneId(2);
    let mut s = RenderScheduler::new(WINDOW);

    s.request(scene, t0);
    s.pause(scene);
    s.pause(scene);
    for i in 0..200 {
        s.request(scene, t0 + Duration::from_micros(i));
    }
    assert!(s.poll(t0 + WINDOW * 4).is_empty());

    s.resume(scene, t0 + WINDOW * 4);
    assert!(s.is_paused(scene));
    assert!(s.poll(t0 + WINDOW * 4).is_empty());

    s.resume(scene, t0 + WINDOW * 5);
    assert!(!s.is_paused(scene));
    assert_eq!(s.poll(t0 + WINDOW * 5), vec![scene]);
    assert!(s.poll(t0 + WINDOW * 10).is_empty());
}

#[test]
fn scenes_are_scheduled_independently() {
    let t0 = Instant::now();
    let mut s = RenderScheduler::new(WINDOW);
    s.request(SceneId(2), t0);
    s.request(SceneId(1), t0 + Duration::from_millis(4));
    assert_eq!(s.poll(t0 + WINDOW), vec![SceneId(2)]);
    assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(4) + WINDOW));
    s.cancel(SceneId(1));
    assert!(!s.is_pending(SceneId(1)));
}
