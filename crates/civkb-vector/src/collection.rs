//! LanceDB connection and collection housekeeping.
//!
//! Collections are created fresh and exactly once per storage path: creating
//! a name that already exists fails with `Error::AlreadyExists` and leaves
//! the existing collection untouched. A small key/value meta table keeps the
//! collection description alongside the data.

use anyhow::Result;
use arrow_array::{RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use std::sync::Arc;

use civkb_core::error::Error;

use crate::schema::build_collection_schema;

pub const META_TABLE: &str = "meta";

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn collection_exists(conn: &Connection, name: &str) -> Result<bool> {
    let names = conn.table_names().execute().await?;
    Ok(names.contains(&name.to_string()))
}

/// Create an empty collection with the resource schema. Never overwrites:
/// an existing collection of the same name is an error, per the
/// create-fresh contract.
pub async fn create_collection(conn: &Connection, name: &str, description: &str) -> Result<()> {
    if collection_exists(conn, name).await? {
        return Err(Error::AlreadyExists(name.to_string()).into());
    }
    let schema = build_collection_schema();
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema);
    conn.create_table(name, Box::new(iter)).execute().await?;
    set_meta(conn, &format!("description:{}", name), description).await?;
    Ok(())
}

fn build_meta_schema() -> Arc<arrow_schema::Schema> {
    Arc::new(arrow_schema::Schema::new(vec![
        arrow_schema::Field::new("key", arrow_schema::DataType::Utf8, false),
        arrow_schema::Field::new("value", arrow_schema::DataType::Utf8, false),
        arrow_schema::Field::new(
            "updated_at",
            arrow_schema::DataType::Timestamp(arrow_schema::TimeUnit::Millisecond, None),
            false,
        ),
    ]))
}

async fn ensure_meta_table(conn: &Connection) -> Result<()> {
    if collection_exists(conn, META_TABLE).await? {
        return Ok(());
    }
    let iter = RecordBatchIterator::new(vec![].into_iter(), build_meta_schema());
    conn.create_table(META_TABLE, Box::new(iter)).execute().await?;
    Ok(())
}

pub async fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    ensure_meta_table(conn).await?;
    let t = conn.open_table(META_TABLE).execute().await?;
    let rb = RecordBatch::try_new(
        build_meta_schema(),
        vec![
            Arc::new(StringArray::from(vec![key.to_string()])),
            Arc::new(StringArray::from(vec![value.to_string()])),
            Arc::new(TimestampMillisecondArray::from(vec![Utc::now().timestamp_millis()])),
        ],
    )?;
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(rb)].into_iter(), build_meta_schema()));
    // Upsert behavior via merge_insert: key is unique
    let mut mi = t.merge_insert(&["key"]);
    mi.when_matched_update_all(None).when_not_matched_insert_all();
    let _ = mi.execute(reader).await?;
    Ok(())
}

pub async fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    if !collection_exists(conn, META_TABLE).await? {
        return Ok(None);
    }
    let t = conn.open_table(META_TABLE).execute().await?;
    let mut stream = t
        .query()
        .only_if(format!("key = '{}'", key.replace('\'', "''")))
        .execute()
        .await?;
    while let Some(batch) = stream.try_next().await? {
        if batch.num_rows() == 0 {
            continue;
        }
        let val = batch
            .column_by_name("value")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| anyhow::anyhow!("meta.value column missing"))?;
        return Ok(Some(val.value(0).to_string()));
    }
    Ok(None)
}
