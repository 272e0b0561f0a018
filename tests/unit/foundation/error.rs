use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuireError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(QuireError::ingest("x").to_string().contains("ingest error:"));
    assert!(QuireError::font("x").to_string().contains("font error:"));
    assert!(
        QuireError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        QuireError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuireError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
