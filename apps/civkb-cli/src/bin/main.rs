use std::env;
use std::fs;
use std::path::PathBuf;

use civkb_core::config::{expand_path, Config};
use civkb_embed::get_default_embedder;
use civkb_pipeline::{run_demo, IngestionPipeline};
use civkb_vector::VectorSearchEngine;

const DEFAULT_RESOURCES: &str = "data/resources.json";
const DEFAULT_DB_DIR: &str = "data/lancedb";
const DEFAULT_COLLECTION: &str = "citizens_assemblies";
const COLLECTION_DESCRIPTION: &str = "Citizens' Assembly resources worldwide";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|query> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let db_path = expand_path(
        config.get::<String>("data.lancedb_dir").unwrap_or_else(|_| DEFAULT_DB_DIR.to_string()),
    );
    let collection: String =
        config.get("data.collection").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());

    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ingest" => {
            let mut fresh = false;
            let mut resources_path = None;
            for arg in &args {
                match arg.as_str() {
                    "--fresh" | "-f" => fresh = true,
                    _ if !arg.starts_with('-') => resources_path = Some(PathBuf::from(arg)),
                    _ => {}
                }
            }
            let resources_path = resources_path.unwrap_or_else(|| {
                let p: String = config
                    .get("data.resources_path")
                    .unwrap_or_else(|_| DEFAULT_RESOURCES.to_string());
                expand_path(p)
            });
            println!("Ingesting from {}", resources_path.display());
            if fresh && db_path.exists() {
                println!("♻️  --fresh: removing existing index at {}", db_path.display());
                fs::remove_dir_all(&db_path)?;
            }
            let embedder = get_default_embedder()?;
            let pipeline =
                IngestionPipeline::new(db_path.clone(), &collection, COLLECTION_DESCRIPTION, embedder);
            let report = tokio::runtime::Runtime::new()?
                .block_on(async { pipeline.run(&resources_path).await })?;
            println!("✅ Ingest complete ({} resources indexed)", report.indexed);
        }
        "query" => {
            let mut limit = 3usize;
            let mut query_text = None;
            let mut i = 0;
            while i < args.len() {
                match args[i].as_str() {
                    "--limit" => {
                        if let Some(l) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                            limit = l;
                            i += 1;
                        } else {
                            eprintln!("Error: --limit requires a number");
                            std::process::exit(1);
                        }
                    }
                    _ if !args[i].starts_with('-') => query_text = Some(args[i].clone()),
                    _ => {}
                }
                i += 1;
            }
            let query_text = query_text.unwrap_or_else(|| {
                eprintln!("Usage: civkb query \"<query>\" [--limit N]");
                std::process::exit(1)
            });
            let embedder = get_default_embedder()?;
            tokio::runtime::Runtime::new()?.block_on(async {
                let engine = VectorSearchEngine::new(db_path, &collection, embedder).await?;
                run_demo(&engine, &query_text, limit).await
            })?;
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
