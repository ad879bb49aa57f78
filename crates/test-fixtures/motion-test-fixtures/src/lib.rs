use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    projects: HashMap<String, String>,
    #[serde(default)]
    samples: HashMap<String, SampleEntry>,
}

/// Expected sampler output for a stored project.
#[derive(Debug, Deserialize)]
struct SampleEntry {
    project: String,
    expected: String,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Stored project documents in the persistence shape.
pub mod projects {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.projects.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.projects, "project", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.projects, "project", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.projects, "project", name)?;
        Ok(resolve_path(rel))
    }
}

/// Expected sampling results paired with the project they were taken from.
pub mod samples {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.samples.keys().cloned().collect()
    }

    /// Project JSON the expectations refer to.
    pub fn project_json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.samples, "sample", name)?;
        let rel = lookup(&MANIFEST.projects, "project", &entry.project)?;
        read_to_string(rel)
    }

    pub fn expected<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.samples, "sample", name)?;
        super::load_json(&entry.expected)
    }
}
