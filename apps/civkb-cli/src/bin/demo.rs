//! One-shot demo: build the knowledge base from the bundled resource file,
//! then run a single sample similarity query against it.

use civkb_core::config::{expand_path, Config};
use civkb_embed::get_default_embedder;
use civkb_pipeline::{run_demo, IngestionPipeline};
use civkb_vector::VectorSearchEngine;

const DEFAULT_RESOURCES: &str = "data/resources.json";
const DEFAULT_DB_DIR: &str = "data/lancedb";
const DEFAULT_COLLECTION: &str = "citizens_assemblies";
const COLLECTION_DESCRIPTION: &str = "Citizens' Assembly resources worldwide";
const SAMPLE_QUERY: &str = "climate change initiatives in Europe";
const SAMPLE_K: usize = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let resources_path = expand_path(
        config.get::<String>("data.resources_path").unwrap_or_else(|_| DEFAULT_RESOURCES.to_string()),
    );
    let db_path = expand_path(
        config.get::<String>("data.lancedb_dir").unwrap_or_else(|_| DEFAULT_DB_DIR.to_string()),
    );
    let collection: String =
        config.get("data.collection").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());

    println!("Creating Citizens' Assembly Knowledge Base...");
    let pipeline = IngestionPipeline::new(
        db_path.clone(),
        &collection,
        COLLECTION_DESCRIPTION,
        get_default_embedder()?,
    );
    let report = pipeline.run(&resources_path).await?;
    println!("Created database with {} resources.", report.indexed);

    let engine = VectorSearchEngine::new(db_path, &collection, get_default_embedder()?).await?;
    run_demo(&engine, SAMPLE_QUERY, SAMPLE_K).await?;

    println!("\nDatabase setup complete!");
    Ok(())
}
