//! Shared fixture loading for workspace tests.
//!
//! Scene documents live under the repository's `fixtures/` directory and are
//! listed in `fixtures/manifest.json`; tests address them by manifest name so
//! paths stay in one place.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

/// Names of all scene fixtures in the manifest.
pub fn scene_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.scenes.keys().cloned().collect();
    names.sort();
    names
}

/// Raw JSON text of a scene fixture.
pub fn scene_text(name: &str) -> Result<String> {
    let rel = MANIFEST
        .scenes
        .get(name)
        .ok_or_else(|| anyhow!("unknown scene fixture '{name}'"))?;
    read_to_string(rel)
}

/// Parsed document tree of a scene fixture.
pub fn scene_document(name: &str) -> Result<serde_json::Value> {
    let text = scene_text(name)?;
    serde_json::from_str(&text).with_context(|| format!("fixture '{name}' is not valid json"))
}
