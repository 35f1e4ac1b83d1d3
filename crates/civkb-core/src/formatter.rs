//! Turns a `Resource` into the text blob and flat metadata that get indexed.

use crate::types::{IndexedDocument, Meta, Resource};

/// Delimiter used to flatten `topics` into a single metadata value.
pub const TOPIC_DELIMITER: &str = ", ";

/// Build the `IndexedDocument` for one resource. Pure and deterministic.
///
/// The label order of the text blob (Title, Author, Geographic Focus,
/// Topics, Summary) is fixed: it is what the embedding model sees, so
/// changing it changes every vector and invalidates existing indexes.
pub fn format_resource(resource: &Resource) -> IndexedDocument {
    let topics = resource.topics.join(TOPIC_DELIMITER);
    let text = format!(
        "Title: {}\nAuthor: {}\nGeographic Focus: {}\nTopics: {}\nSummary: {}",
        resource.title, resource.author, resource.geographic_focus, topics, resource.summary
    );

    let mut metadata = Meta::new();
    metadata.insert("title".to_string(), resource.title.clone());
    metadata.insert("author".to_string(), resource.author.clone());
    metadata.insert("publication_date".to_string(), resource.publication_date.clone());
    metadata.insert("url".to_string(), resource.url.clone());
    metadata.insert("type".to_string(), resource.resource_type.clone());
    metadata.insert("geographic_focus".to_string(), resource.geographic_focus.clone());
    metadata.insert("topics".to_string(), topics);

    IndexedDocument { id: resource.id.clone(), text, metadata }
}
