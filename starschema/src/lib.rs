//! Star-schema builder for raw taxi trip records.
//!
//! Raw trips are turned into seven deduplicated, surrogate-keyed dimension
//! tables and one fact table whose rows reference them. Keys are substituted
//! by direct lookup in a per-dimension index; no joins are involved.

pub mod builder;
pub mod index;
pub mod ingest;
pub mod lookup;
pub mod models;
pub mod output;
pub mod schema;
pub mod types;
pub mod utils;

pub use builder::{DEFAULT_CHUNK_SIZE, StarSchema, StarSchemaBuilder};
pub use index::KeyedIndex;
pub use ingest::read_trip_records;
pub use lookup::LookupTables;
pub use output::NamedBatches;
pub use types::StarTable;

use arrow::record_batch::RecordBatch;
use common::Result;

/// Runs the whole transform: raw batches in, eight named batch groups out.
pub fn transform_batches(
    batches: &[RecordBatch],
    builder: &StarSchemaBuilder,
) -> Result<NamedBatches> {
    let records = read_trip_records(batches)?;
    builder.build(&records)?.into_named_batches()
}
