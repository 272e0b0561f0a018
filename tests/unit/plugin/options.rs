use super::*;

#[test]
fn partial_json_fills_defaults() {
    let opts = EditorOptions::from_json(
        r#"{ "workspace": { "width": 1000, "height": 500, "cut_size": 12 }, "frame_window_ms": 8 }"#,
    )
    .unwrap();
    assert_eq!(opts.workspace.width, 1000.0);
    assert_eq!(opts.workspace.dpi, 300.0);
    assert_eq!(opts.workspace.cut_size, 12.0);
    assert_eq!(opts.frame_window(), Duration::from_millis(8));
    assert_eq!(opts.history_limit, 50);
    assert_eq!(opts.cache_opts().ceiling_bytes, 256 * 1024 * 1024);
    assert!(opts.ruler_enabled);
}

#[test]
fn invalid_options_are_rejected_with_prefix() {
    let err = EditorOptions::from_json(r#"{ "history_limit": 0 }"#).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));

    let err = EditorOptions::from_json("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));

    let err = EditorOptions::from_json(r#"{ "workspace": { "width": -1, "height": 5 } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("width"));
}

#[test]
fn from_path_reports_missing_file() {
    let err = EditorOptions::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read editor options"));
}
