use std::fs;
use tempfile::TempDir;

use civkb_core::error::Error;
use civkb_embed::get_default_embedder;
use civkb_pipeline::{run_demo, IngestionPipeline};
use civkb_vector::VectorSearchEngine;

const COLLECTION: &str = "citizens_assemblies";
const DESCRIPTION: &str = "Citizens' Assembly resources worldwide";

fn write_resources(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("resources.json");
    fs::write(
        &path,
        r#"{
          "resources": [
            {
              "id": 1,
              "title": "Citizens' Assembly on Climate Change",
              "author": "Assembly Secretariat",
              "geographic_focus": "Ireland",
              "publication_date": "2018-04-01",
              "url": "https://example.org/ie-climate",
              "type": "report",
              "topics": ["climate change", "deliberation"],
              "summary": "Deliberations and recommendations on climate change policy."
            },
            {
              "id": 2,
              "title": "Electoral Reform Assembly",
              "author": "Civic Office",
              "geographic_focus": "Canada",
              "publication_date": "2005-12-01",
              "url": "https://example.org/bc-electoral",
              "type": "report",
              "topics": ["electoral reform"],
              "summary": "A randomly selected body reviewing the voting system."
            }
          ]
        }"#,
    )
    .unwrap();
    path
}

#[tokio::test]
async fn ingest_then_query_end_to_end() -> anyhow::Result<()> {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let tmp = TempDir::new()?;
    let resources_path = write_resources(&tmp);
    let db_path = tmp.path().join("lancedb");

    let pipeline = IngestionPipeline::new(db_path.clone(), COLLECTION, DESCRIPTION, get_default_embedder()?);
    let report = pipeline.run(&resources_path).await?;
    assert_eq!(report.loaded, 2);
    assert_eq!(report.indexed, 2);

    let engine = VectorSearchEngine::new(db_path, COLLECTION, get_default_embedder()?).await?;
    let hits = engine.search("climate change deliberation", 1).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "1", "climate resource ranks first for a climate query");
    assert_eq!(hits[0].title, "Citizens' Assembly on Climate Change");
    assert_eq!(hits[0].geographic_focus, "Ireland");
    // The stored document is the formatter's labeled text blob, intact
    assert!(hits[0].document.starts_with("Title: Citizens' Assembly on Climate Change\nAuthor: "));
    assert!(hits[0].document.contains("Topics: climate change, deliberation"));

    // Demo rendering path runs against the same engine without error
    run_demo(&engine, "climate change initiatives in Europe", 3).await?;
    Ok(())
}

#[tokio::test]
async fn rerun_against_same_path_fails_before_touching_data() -> anyhow::Result<()> {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let tmp = TempDir::new()?;
    let resources_path = write_resources(&tmp);
    let db_path = tmp.path().join("lancedb");

    let pipeline = IngestionPipeline::new(db_path.clone(), COLLECTION, DESCRIPTION, get_default_embedder()?);
    pipeline.run(&resources_path).await?;

    let pipeline = IngestionPipeline::new(db_path.clone(), COLLECTION, DESCRIPTION, get_default_embedder()?);
    let err = pipeline.run(&resources_path).await.expect_err("re-run must fail");
    assert!(matches!(err.root_cause().downcast_ref::<Error>(), Some(Error::AlreadyExists(_))));

    // First run's data is still there and queryable
    let engine = VectorSearchEngine::new(db_path, COLLECTION, get_default_embedder()?).await?;
    let hits = engine.search("electoral reform", 5).await?;
    assert_eq!(hits.len(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_store_aborts_load() -> anyhow::Result<()> {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let tmp = TempDir::new()?;
    let pipeline = IngestionPipeline::new(tmp.path().join("lancedb"), COLLECTION, DESCRIPTION, get_default_embedder()?);
    let err = pipeline.run(&tmp.path().join("absent.json")).await.expect_err("must fail");
    assert!(matches!(err.root_cause().downcast_ref::<Error>(), Some(Error::Load(_))));
    // Nothing was created
    assert!(!tmp.path().join("lancedb").exists());
    Ok(())
}
