//! Domain types shared by the loader, formatter and vector engine.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub type ResourceId = String;
pub type Meta = HashMap<String, String>;

/// One Citizens' Assembly resource record as it appears in the input file.
///
/// Records are read-only input: loaded once, never mutated. `id` must be
/// unique across the whole set; the JSON may carry it as a string or an
/// integer and both normalize to `String`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(deserialize_with = "id_to_string")]
    pub id: ResourceId,
    pub title: String,
    pub author: String,
    pub geographic_focus: String,
    pub publication_date: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub topics: Vec<String>,
    pub summary: String,
}

/// A resource prepared for indexing: the embeddable text blob plus the
/// flat metadata kept for retrieval-time display.
///
/// `text` is the sole embedding input; `metadata` holds scalar fields only
/// (topics joined into one string) because the index stores flat values.
/// The vector is produced later, at the embed stage, and stays aligned with
/// this document by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: ResourceId,
    pub text: String,
    pub metadata: Meta,
}

/// One ranked similarity-search result. `distance` is the index's raw
/// distance metric, lower is more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ResourceId,
    pub title: String,
    pub geographic_focus: String,
    pub url: String,
    pub document: String,
    pub distance: f32,
}

fn id_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
