use crate::utils::parquet_io::{decode_batches, encode_batches, metadata_entry};
use crate::utils::paths::TablePathBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::Utc;
use common::config::WarehouseConfig;
use common::{Error, Result};
use futures::TryStreamExt;
use object_store::ObjectStore;
use object_store::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one table replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWrite {
    pub table: String,
    pub location: String,
    pub rows: usize,
    pub row_groups: usize,
    pub bytes: usize,
    /// Objects from the previous version of the table that were removed.
    pub replaced: usize,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Writes `batches` as the full contents of `table`; whatever the table
    /// held before is gone afterwards. All batches share `schema`, which is
    /// also used when there are none.
    async fn replace_table(
        &self,
        table: &str,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<TableWrite>;

    async fn read_table(&self, table: &str) -> Result<Vec<RecordBatch>>;

    async fn table_exists(&self, table: &str) -> Result<bool>;
}

/// Warehouse kept as parquet objects in any object store, one directory per
/// table under the dataset prefix.
pub struct ObjectStoreWarehouse {
    store: Arc<dyn ObjectStore>,
    paths: TablePathBuilder,
}

impl ObjectStoreWarehouse {
    pub fn new(store: Arc<dyn ObjectStore>, root: Path, prefix: &str) -> Self {
        Self {
            store,
            paths: TablePathBuilder::with_prefix(root, prefix),
        }
    }

    pub fn from_config(config: &WarehouseConfig) -> Result<Self> {
        let (store, root) = super::open_store(config)?;
        Ok(Self::new(store, root, &config.prefix))
    }

    async fn list_table_objects(&self, table: &str) -> Result<Vec<Path>> {
        let dir = self.paths.table_dir(table);
        let objects = self
            .store
            .list(Some(&dir))
            .map_ok(|meta| meta.location)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(objects)
    }
}

#[async_trait]
impl Warehouse for ObjectStoreWarehouse {
    async fn replace_table(
        &self,
        table: &str,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<TableWrite> {
        if let Some(batch) = batches.iter().find(|b| b.schema() != schema) {
            return Err(Error::InvalidInput(format!(
                "Batch for table '{}' does not match its schema: {:?}",
                table,
                batch.schema()
            )));
        }

        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        let metadata = vec![
            metadata_entry("table_name", table),
            metadata_entry("record_count", rows.to_string()),
            metadata_entry("written_at", Utc::now().to_rfc3339()),
        ];
        let (data, row_groups) = encode_batches(schema, batches, metadata)?;
        let bytes = data.len();

        // The new data file overwrites in place; anything else left under the
        // table directory belongs to an older version.
        let data_file = self.paths.data_file(table);
        self.store.put(&data_file, data.into()).await?;

        let mut replaced = 0;
        for object in self.list_table_objects(table).await? {
            if object != data_file {
                debug!(table, object = %object, "Removing stale table object");
                self.store.delete(&object).await?;
                replaced += 1;
            }
        }

        info!(table, rows, row_groups, bytes, location = %data_file, "Replaced table");
        Ok(TableWrite {
            table: table.to_string(),
            location: data_file.to_string(),
            rows,
            row_groups,
            bytes,
            replaced,
        })
    }

    async fn read_table(&self, table: &str) -> Result<Vec<RecordBatch>> {
        let data_file = self.paths.data_file(table);
        let data = match self.store.get(&data_file).await {
            Ok(result) => result.bytes().await?,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(Error::Storage(format!("Table '{}' does not exist", table)));
            }
            Err(e) => return Err(e.into()),
        };
        decode_batches(data)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        match self.store.head(&self.paths.data_file(table)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
