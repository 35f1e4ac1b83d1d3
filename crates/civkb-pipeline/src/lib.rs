//! The ingestion orchestrator and the demo query.
//!
//! One linear pass: load resources, format them into indexed documents,
//! embed every document, then write the whole batch into a freshly created
//! collection. Each stage operates on the full set; the first failure
//! aborts the run before anything reaches the index (the insert itself is
//! a single all-or-nothing batch).

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use civkb_core::formatter::format_resource;
use civkb_core::loader::load_resources;
use civkb_core::traits::Embedder;
use civkb_core::types::IndexedDocument;
use civkb_vector::{CollectionWriter, VectorSearchEngine};

/// What a successful run indexed.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub loaded: usize,
    pub indexed: usize,
}

pub struct IngestionPipeline {
    db_path: PathBuf,
    collection: String,
    description: String,
    embedder: Box<dyn Embedder>,
}

impl IngestionPipeline {
    pub fn new(db_path: PathBuf, collection: &str, description: &str, embedder: Box<dyn Embedder>) -> Self {
        Self {
            db_path,
            collection: collection.to_string(),
            description: description.to_string(),
            embedder,
        }
    }

    pub async fn run(&self, resources_path: &Path) -> Result<IngestReport> {
        let resources = load_resources(resources_path).context("loading resources")?;
        println!("📚 Loaded {} resources from {}", resources.len(), resources_path.display());

        let docs: Vec<IndexedDocument> = resources.iter().map(format_resource).collect();

        let pb = ProgressBar::new(docs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} resources ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut embeddings = Vec::with_capacity(docs.len());
        for doc in &docs {
            let vector = self
                .embedder
                .embed_batch(std::slice::from_ref(&doc.text))
                .with_context(|| format!("embedding resource '{}'", doc.id))?
                .remove(0);
            embeddings.push(vector);
            pb.inc(1);
        }
        pb.finish_with_message("embeddings computed");

        let writer = CollectionWriter::create(&self.db_path, &self.collection, &self.description)
            .await
            .context("creating collection")?;
        writer.insert(&docs, &embeddings).await.context("inserting documents")?;

        let indexed = writer.count().await?;
        println!("✅ Created collection '{}' with {} resources", self.collection, indexed);
        Ok(IngestReport { loaded: resources.len(), indexed })
    }
}

/// Run one illustrative similarity query and print the ranked hits.
pub async fn run_demo(engine: &VectorSearchEngine, query_text: &str, k: usize) -> Result<()> {
    let hits = engine.search(query_text, k).await?;
    println!("\nSample Query Results for \"{}\":", query_text);
    for (i, hit) in hits.iter().enumerate() {
        println!("\nResult {}:", i + 1);
        println!("ID: {}", hit.id);
        println!("Title: {}", hit.title);
        println!("Geographic Focus: {}", hit.geographic_focus);
        println!("URL: {}", hit.url);
    }
    Ok(())
}
