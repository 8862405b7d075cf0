use arrow::record_batch::RecordBatch;
use chrono::Utc;
use common::Result;
use datafusion::execution::context::SessionContext;
use datafusion::prelude::{CsvReadOptions, ParquetReadOptions, SessionConfig};
use tracing::{debug, info};

/// On-disk layouts the trip source can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Parquet,
    Csv,
}

impl SourceFormat {
    /// CSV files are recognised by extension; everything else (including
    /// directories of part files) is read as parquet.
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".csv") {
            SourceFormat::Csv
        } else {
            SourceFormat::Parquet
        }
    }
}

/// Reads raw trip tables into arrow batches through a DataFusion session.
pub struct TripSource {
    ctx: SessionContext,
}

impl TripSource {
    pub fn new() -> Self {
        // One partition keeps batches in file row order.
        let mut config = SessionConfig::new().with_target_partitions(1);
        config.options_mut().execution.parquet.schema_force_view_types = false;
        Self {
            ctx: SessionContext::new_with_config(config),
        }
    }

    pub async fn load(&self, source_path: &str) -> Result<Vec<RecordBatch>> {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let temp_table = format!("trip_source_{}", timestamp);
        let format = SourceFormat::from_path(source_path);

        debug!(path = source_path, ?format, table = %temp_table, "Registering trip source");
        match format {
            SourceFormat::Parquet => {
                self.ctx
                    .register_parquet(&temp_table, source_path, ParquetReadOptions::default())
                    .await?
            }
            SourceFormat::Csv => {
                self.ctx
                    .register_csv(&temp_table, source_path, CsvReadOptions::new().has_header(true))
                    .await?
            }
        }

        let df = self.ctx.table(&temp_table).await?;
        let batches = df.collect_partitioned().await?.into_iter().flatten().collect::<Vec<_>>();
        self.ctx.deregister_table(&temp_table)?;

        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        info!(path = source_path, rows, batches = batches.len(), "Loaded trip records");
        Ok(batches)
    }
}

impl Default for TripSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use parquet::arrow::ArrowWriter;
    use starschema::read_trip_records;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;

    const CSV_HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,\
trip_distance,pickup_longitude,pickup_latitude,RatecodeID,store_and_fwd_flag,dropoff_longitude,\
dropoff_latitude,payment_type,fare_amount,extra,mta_tax,tip_amount,tolls_amount,\
improvement_surcharge,total_amount";

    /// Three trips; the first and third share pickup datetime and location.
    pub(crate) fn write_trip_csv(dir: &Path) -> String {
        let path = dir.join("trips.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", CSV_HEADER).unwrap();
        writeln!(file, "1,2016-03-01 00:00:00,2016-03-01 00:07:55,1,2.5,-73.97,40.76,1,N,-73.95,40.77,1,9.0,0.5,0.5,2.05,0.0,0.3,12.35").unwrap();
        writeln!(file, "2,2016-03-01 00:00:00,2016-03-01 00:11:06,2,1.2,-73.98,40.73,2,N,-73.99,40.75,2,52.0,0.0,0.5,0.0,5.54,0.3,58.34").unwrap();
        writeln!(file, ",2016-03-01 00:00:00,2016-03-01 00:07:55,1,2.5,-73.97,40.76,1,,-73.95,40.77,1,9.0,0.5,0.5,,0.0,0.3,10.3").unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path("data/trips.csv"), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path("data/TRIPS.CSV"), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path("data/trips.parquet"), SourceFormat::Parquet);
        assert_eq!(SourceFormat::from_path("data/trips/"), SourceFormat::Parquet);
    }

    #[tokio::test]
    async fn test_load_csv_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trip_csv(dir.path());

        let batches = TripSource::new().load(&path).await.unwrap();
        let records = read_trip_records(&batches).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].vendor_id, Some(1));
        assert_eq!(records[2].vendor_id, None);
        assert_eq!(records[1].passenger_count, 2);
        assert_eq!(records[1].fares.tolls_amount, Some(5.54));
        assert_eq!(records[2].fares.tip_amount, None);
        assert_eq!(
            records[0].pickup_datetime.to_string(),
            "2016-03-01 00:00:00"
        );
    }

    #[tokio::test]
    async fn test_load_parquet_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.parquet");

        // Minimal raw table: a single trip, every column present.
        let text = |name: &str| Field::new(name, DataType::Utf8, true);
        let ts = |name: &str| {
            Field::new(name, DataType::Timestamp(TimeUnit::Microsecond, None), false)
        };
        let float = |name: &str| Field::new(name, DataType::Float64, true);
        let int = |name: &str| Field::new(name, DataType::Int64, true);
        let schema = Arc::new(Schema::new(vec![
            int("VendorID"),
            ts("tpep_pickup_datetime"),
            ts("tpep_dropoff_datetime"),
            int("passenger_count"),
            float("trip_distance"),
            float("pickup_longitude"),
            float("pickup_latitude"),
            int("RatecodeID"),
            text("store_and_fwd_flag"),
            float("dropoff_longitude"),
            float("dropoff_latitude"),
            int("payment_type"),
            float("fare_amount"),
            float("extra"),
            float("mta_tax"),
            float("tip_amount"),
            float("tolls_amount"),
            float("improvement_surcharge"),
            float("total_amount"),
        ]));
        let one_float = |v: f64| Arc::new(Float64Array::from(vec![v])) as ArrayRef;
        let one_int = |v: i64| Arc::new(Int64Array::from(vec![v])) as ArrayRef;
        let one_text = |v: &str| Arc::new(StringArray::from(vec![v])) as ArrayRef;
        let one_ts = |v: i64| Arc::new(TimestampMicrosecondArray::from(vec![v])) as ArrayRef;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                one_int(2),
                // 2024-01-15 08:30:00 and 08:45:10
                one_ts(1_705_307_400_000_000),
                one_ts(1_705_308_310_000_000),
                one_int(3),
                one_float(4.25),
                one_float(-73.9),
                one_float(40.7),
                one_int(5),
                one_text("Y"),
                one_float(-73.8),
                one_float(40.6),
                one_int(4),
                one_float(20.0),
                one_float(1.0),
                one_float(0.5),
                one_float(3.0),
                one_float(0.0),
                one_float(0.3),
                one_float(24.8),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let batches = TripSource::new()
            .load(&path.to_string_lossy())
            .await
            .unwrap();
        let records = read_trip_records(&batches).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rate_code, 5);
        assert_eq!(records[0].trip_distance, 4.25);
        assert_eq!(records[0].store_and_fwd_flag.as_deref(), Some("Y"));
        assert_eq!(records[0].fares.total_amount, Some(24.8));
        assert_eq!(records[0].dropoff_datetime.to_string(), "2024-01-15 08:45:10");
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(TripSource::new().load(&path.to_string_lossy()).await.is_err());
    }
}
