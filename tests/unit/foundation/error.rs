use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LayerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LayerError::geometry("x")
            .to_string()
            .contains("invalid layer geometry:")
    );
    assert!(
        LayerError::unsupported_overlay("x")
            .to_string()
            .contains("unsupported overlay kind:")
    );
    assert!(LayerError::export("x").to_string().contains("export failed:"));
    assert!(
        LayerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LayerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
