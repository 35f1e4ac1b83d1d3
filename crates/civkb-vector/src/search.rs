//! Nearest-neighbor retrieval over a resource collection.

use anyhow::Result;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Connection;

use civkb_core::error::Error;
use civkb_core::traits::Embedder;
use civkb_core::types::SearchHit;

use crate::collection::{collection_exists, open_db};

pub struct VectorSearchEngine {
    db: Connection,
    collection: String,
    embedder: Box<dyn Embedder>,
}

impl VectorSearchEngine {
    pub async fn new(db_path: std::path::PathBuf, collection: &str, embedder: Box<dyn Embedder>) -> Result<Self> {
        let db = open_db(db_path.to_string_lossy().as_ref()).await?;
        Ok(Self { db, collection: collection.to_string(), embedder })
    }

    /// Embed `query_text` with the same model used at ingest and return the
    /// `k` nearest documents, ordered by ascending distance. Returns fewer
    /// than `k` hits only when the collection holds fewer documents.
    pub async fn search(&self, query_text: &str, k: usize) -> Result<Vec<SearchHit>> {
        if !collection_exists(&self.db, &self.collection).await? {
            return Err(Error::Query(format!("collection '{}' does not exist", self.collection)).into());
        }
        let query_embedding = self.embedder.embed_batch(&[query_text.to_string()])?.remove(0);
        let table = self.db.open_table(&self.collection).execute().await?;
        let mut results = table
            .vector_search(query_embedding)
            .map_err(|e| Error::Query(e.to_string()))?
            .limit(k)
            .execute()
            .await
            .map_err(|e| Error::Query(e.to_string()))?;

        let mut hits = Vec::new();
        while let Some(batch) = results.try_next().await.map_err(|e| Error::Query(e.to_string()))? {
            let id_col = str_col(&batch, "id")?;
            let title_col = str_col(&batch, "title")?;
            let focus_col = str_col(&batch, "geographic_focus")?;
            let url_col = str_col(&batch, "url")?;
            let document_col = str_col(&batch, "document")?;
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>())
                .ok_or_else(|| Error::Query("_distance column missing from results".to_string()))?;
            for i in 0..batch.num_rows() {
                hits.push(SearchHit {
                    id: id_col.value(i).to_string(),
                    title: title_col.value(i).to_string(),
                    geographic_focus: focus_col.value(i).to_string(),
                    url: url_col.value(i).to_string(),
                    document: document_col.value(i).to_string(),
                    distance: distance_col.value(i),
                });
            }
        }
        // LanceDB already returns ascending distance; a stable sort keeps
        // ties in insertion order across batches.
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

fn str_col<'a>(batch: &'a arrow_array::RecordBatch, name: &str) -> Result<&'a arrow_array::StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::StringArray>())
        .ok_or_else(|| Error::Query(format!("{} column missing from results", name)).into())
}
