//! Loads the full resource set from the JSON store in one call.
//!
//! The store is a single file shaped as `{ "resources": [ ... ] }`. Loading
//! is all-or-nothing: a missing file, a missing `resources` key, a record
//! with a missing field or a duplicate id all fail the whole call with
//! `Error::Load`, before anything reaches the index.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::types::Resource;

#[derive(Debug, Deserialize)]
struct ResourceFile {
    resources: Vec<Resource>,
}

/// Read every resource from `path`, preserving file order.
pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Load(format!("cannot read {}: {}", path.display(), e)))?;
    let file: ResourceFile = serde_json::from_str(&raw)
        .map_err(|e| Error::Load(format!("malformed {}: {}", path.display(), e)))?;

    let mut seen = HashSet::new();
    for resource in &file.resources {
        if !seen.insert(resource.id.clone()) {
            return Err(Error::Load(format!("duplicate resource id '{}'", resource.id)).into());
        }
    }
    Ok(file.resources)
}
