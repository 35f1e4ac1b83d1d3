use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const EMBEDDING_DIM: i32 = civkb_embed::EMBEDDING_DIM as i32;

/// Arrow schema of a resource collection. One row per resource: the full
/// embeddable text in `document`, the flat display metadata as scalar
/// columns, and the fixed-size embedding vector.
pub fn build_collection_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("author", DataType::Utf8, false),
        Field::new("publication_date", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("geographic_focus", DataType::Utf8, false),
        Field::new("topics", DataType::Utf8, false),
        Field::new("document", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), EMBEDDING_DIM),
            true,
        ),
    ]))
}
