pub mod collection;
pub mod schema;
pub mod search;
pub mod writer;

pub use collection::open_db;
pub use search::VectorSearchEngine;
pub use writer::CollectionWriter;
