//! Test fixture loading utilities

use std::path::PathBuf;

use journal_scout::Catalog;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Path of the sample catalog as a data-source string
#[allow(dead_code)]
pub fn catalog_source() -> String {
    fixture_path("search_index.json").to_string_lossy().into_owned()
}

/// Parse the sample catalog
#[allow(dead_code)]
pub fn sample_catalog() -> Catalog {
    Catalog::from_json(&load_fixture("search_index.json"), "search_index.json")
        .expect("sample catalog parses")
}
