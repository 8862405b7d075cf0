pub mod loader;
pub mod source;
pub mod storage;
pub mod utils;

use common::Result;
use common::config::Settings;
use loader::{Destinations, load_star_schema};
use source::TripSource;
use starschema::{LookupTables, StarSchemaBuilder};
use storage::{ObjectStoreWarehouse, TableWrite};
use tracing::info;

/// Runs the complete pipeline: read raw trips, build the star schema and
/// replace the warehouse tables with it.
pub async fn run_pipeline(config_path: &str) -> Result<Vec<TableWrite>> {
    let settings = Settings::new(config_path)?;
    run_with_settings(&settings).await
}

pub async fn run_with_settings(settings: &Settings) -> Result<Vec<TableWrite>> {
    // Fail on bad settings before touching any data
    let lookups = LookupTables::try_from(&settings.lookups)?;
    let destinations = Destinations::from_config(&settings.warehouse)?;
    let warehouse = ObjectStoreWarehouse::from_config(&settings.warehouse)?;
    let builder = StarSchemaBuilder::new(lookups).with_chunk_size(settings.transform.chunk_size);

    info!(
        source = %settings.source.path,
        warehouse = %settings.warehouse.url,
        "Starting star schema pipeline"
    );
    let raw = TripSource::new().load(&settings.source.path).await?;
    let batches = starschema::transform_batches(&raw, &builder)?;

    load_star_schema(&warehouse, &destinations, batches).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::write_trip_csv;
    use crate::storage::Warehouse;
    use crate::storage::tests::warehouse_config;
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;
    use arrow::record_batch::RecordBatch;
    use common::config::{LookupSettings, SourceConfig, TransformConfig};
    use std::fs;
    use std::path::Path;

    fn settings(source: &str, warehouse_dir: &Path, chunk_size: usize) -> Settings {
        Settings {
            source: SourceConfig {
                path: source.to_string(),
            },
            warehouse: warehouse_config(&warehouse_dir.to_string_lossy()),
            transform: TransformConfig { chunk_size },
            lookups: LookupSettings::default(),
        }
    }

    fn rows(batches: &[RecordBatch]) -> usize {
        batches.iter().map(RecordBatch::num_rows).sum()
    }

    #[tokio::test]
    async fn test_pipeline_writes_star_schema() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let source = write_trip_csv(input.path());
        let settings = settings(&source, output.path(), 2);

        let writes = run_with_settings(&settings).await.unwrap();
        assert_eq!(writes.len(), 8);

        let fact = writes.iter().find(|w| w.table == "fact_table").unwrap();
        assert_eq!(fact.rows, 3);
        assert_eq!(fact.row_groups, 2);

        let warehouse = ObjectStoreWarehouse::from_config(&settings.warehouse).unwrap();
        // first and third trips share pickup/dropoff times and locations
        assert_eq!(rows(&warehouse.read_table("datetime_dim").await.unwrap()), 2);
        assert_eq!(rows(&warehouse.read_table("pickup_location_dim").await.unwrap()), 2);
        assert_eq!(rows(&warehouse.read_table("passenger_count_dim").await.unwrap()), 2);

        let facts = warehouse.read_table("fact_table").await.unwrap();
        let datetime_ids: Vec<i64> = facts
            .iter()
            .flat_map(|b| {
                b.column_by_name("datetime_id")
                    .unwrap()
                    .as_primitive::<Int64Type>()
                    .values()
                    .to_vec()
            })
            .collect();
        assert_eq!(datetime_ids, vec![0, 1, 0]);
    }

    #[tokio::test]
    async fn test_rerun_replaces_tables() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let source = write_trip_csv(input.path());
        let settings = settings(&source, output.path(), 10_000);

        run_with_settings(&settings).await.unwrap();
        let writes = run_with_settings(&settings).await.unwrap();

        assert!(writes.iter().all(|w| w.replaced == 0));
        let warehouse = ObjectStoreWarehouse::from_config(&settings.warehouse).unwrap();
        assert_eq!(rows(&warehouse.read_table("fact_table").await.unwrap()), 3);
    }

    #[tokio::test]
    async fn test_run_pipeline_from_config_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let source = write_trip_csv(input.path());
        let config_path = input.path().join("warehouse.toml");
        fs::write(
            &config_path,
            format!(
                r#"
[source]
path = {:?}

[warehouse]
url = {:?}
prefix = "taxi"

[warehouse.tables]
fact_table = "fact_trips"
"#,
                source,
                output.path().to_string_lossy()
            ),
        )
        .unwrap();

        let writes = run_pipeline(&config_path.to_string_lossy()).await.unwrap();

        assert!(writes.iter().any(|w| w.table == "fact_trips"));
        assert!(output.path().join("taxi/fact_trips/part-0.parquet").is_file());
        assert!(output.path().join("taxi/rate_code_dim/part-0.parquet").is_file());
    }

    #[tokio::test]
    async fn test_bad_settings_fail_before_loading() {
        let output = tempfile::tempdir().unwrap();
        let mut settings = settings("/does/not/exist.csv", output.path(), 10);
        settings.transform.chunk_size = 0;

        // missing source and zero chunk size both stop the run
        assert!(run_with_settings(&settings).await.is_err());

        settings.warehouse.tables.insert("bogus".to_string(), "x".to_string());
        let err = run_with_settings(&settings).await.unwrap_err();
        assert!(matches!(err, common::Error::InvalidInput(msg) if msg.contains("bogus")));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let err = run_pipeline("/does/not/exist/warehouse").await.unwrap_err();
        assert!(matches!(err, common::Error::Config(_)));
    }
}
