//! Fixture loading shared by the integration tests.

use std::path::PathBuf;

pub fn fixture_path(area: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(area)
        .join("fixtures")
        .join(name)
}

pub fn fixture(area: &str, name: &str) -> String {
    let path = fixture_path(area, name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}
