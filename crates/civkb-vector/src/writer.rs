//! Batch writer for a resource collection.
//!
//! All documents of a run go into the collection through a single
//! `RecordBatch` add, so from the caller's point of view the insert is
//! all-or-nothing: either every row lands or none do.

use anyhow::{bail, Result};
use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};
use futures::TryStreamExt;
use lancedb::query::ExecutableQuery;
use lancedb::Connection;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use civkb_core::error::Error;
use civkb_core::types::IndexedDocument;

use crate::collection::{create_collection, open_db};
use crate::schema::{build_collection_schema, EMBEDDING_DIM};

pub struct CollectionWriter {
    db: Connection,
    collection: String,
}

impl std::fmt::Debug for CollectionWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionWriter").field("collection", &self.collection).finish_non_exhaustive()
    }
}

impl CollectionWriter {
    /// Open the database at `db_path` and create a fresh collection.
    /// Fails with `Error::AlreadyExists` if `collection` is already present.
    pub async fn create(db_path: &Path, collection: &str, description: &str) -> Result<Self> {
        let db = open_db(db_path.to_string_lossy().as_ref()).await?;
        create_collection(&db, collection, description).await?;
        Ok(Self { db, collection: collection.to_string() })
    }

    /// Insert all documents with their index-aligned embeddings in one batch.
    ///
    /// Preconditions checked here: equal lengths, ids unique within the
    /// call and against rows already in the collection, and every vector
    /// of the collection's dimensionality (`Error::DimensionMismatch`
    /// otherwise).
    pub async fn insert(&self, docs: &[IndexedDocument], embeddings: &[Vec<f32>]) -> Result<()> {
        if docs.is_empty() {
            println!("No documents to insert");
            return Ok(());
        }
        if docs.len() != embeddings.len() {
            bail!("{} documents but {} embeddings; sequences must be index-aligned", docs.len(), embeddings.len());
        }
        let mut seen = HashSet::new();
        for doc in docs {
            if !seen.insert(doc.id.as_str()) {
                bail!("duplicate document id '{}' in insert batch", doc.id);
            }
        }
        for id in self.existing_ids().await? {
            if seen.contains(id.as_str()) {
                bail!("document id '{}' already exists in collection '{}'", id, self.collection);
            }
        }
        for (doc, vector) in docs.iter().zip(embeddings.iter()) {
            if vector.len() != EMBEDDING_DIM as usize {
                return Err(Error::DimensionMismatch {
                    id: doc.id.clone(),
                    expected: EMBEDDING_DIM as usize,
                    actual: vector.len(),
                }
                .into());
            }
        }

        let record_batch = docs_to_record_batch(docs, embeddings)?;
        let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        self.db
            .open_table(&self.collection)
            .execute()
            .await?
            .add(reader)
            .execute()
            .await?;
        println!("📊 Inserted {} documents into '{}'", docs.len(), self.collection);
        Ok(())
    }

    pub async fn count(&self) -> Result<usize> {
        let table = self.db.open_table(&self.collection).execute().await?;
        Ok(table.count_rows(None).await?)
    }

    async fn existing_ids(&self) -> Result<Vec<String>> {
        let table = self.db.open_table(&self.collection).execute().await?;
        if table.count_rows(None).await? == 0 {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let mut stream = table.query().execute().await?;
        while let Some(batch) = stream.try_next().await? {
            let id_col = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow::anyhow!("id column missing"))?;
            for i in 0..batch.num_rows() {
                ids.push(id_col.value(i).to_string());
            }
        }
        Ok(ids)
    }
}

fn docs_to_record_batch(docs: &[IndexedDocument], embeddings: &[Vec<f32>]) -> Result<RecordBatch> {
    let schema = build_collection_schema();
    let meta = |doc: &IndexedDocument, key: &str| -> String {
        doc.metadata.get(key).cloned().unwrap_or_default()
    };
    let mut ids = Vec::new();
    let mut titles = Vec::new();
    let mut authors = Vec::new();
    let mut dates = Vec::new();
    let mut urls = Vec::new();
    let mut types = Vec::new();
    let mut focuses = Vec::new();
    let mut topics = Vec::new();
    let mut documents = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (doc, vector) in docs.iter().zip(embeddings.iter()) {
        ids.push(doc.id.clone());
        titles.push(meta(doc, "title"));
        authors.push(meta(doc, "author"));
        dates.push(meta(doc, "publication_date"));
        urls.push(meta(doc, "url"));
        types.push(meta(doc, "type"));
        focuses.push(meta(doc, "geographic_focus"));
        topics.push(meta(doc, "topics"));
        documents.push(doc.text.clone());
        vectors.push(Some(vector.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(authors)),
            Arc::new(StringArray::from(dates)),
            Arc::new(StringArray::from(urls)),
            Arc::new(StringArray::from(types)),
            Arc::new(StringArray::from(focuses)),
            Arc::new(StringArray::from(topics)),
            Arc::new(StringArray::from(documents)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                EMBEDDING_DIM,
            )),
        ],
    )?;
    Ok(record_batch)
}
