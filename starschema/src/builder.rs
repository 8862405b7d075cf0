use crate::index::KeyedIndex;
use crate::lookup::LookupTables;
use crate::models::*;
use crate::types::StarTable;
use crate::utils::chunk_rows;
use common::{Error, Result};
use std::hash::Hash;
use tracing::{debug, info};

pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Seven dimension tables plus the chunked fact table of one build.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarSchema {
    pub datetime_dim: Vec<DatetimeDim>,
    pub passenger_count_dim: Vec<PassengerCountDim>,
    pub trip_distance_dim: Vec<TripDistanceDim>,
    pub rate_code_dim: Vec<RateCodeDim>,
    pub pickup_location_dim: Vec<LocationDim>,
    pub dropoff_location_dim: Vec<LocationDim>,
    pub payment_type_dim: Vec<PaymentTypeDim>,
    pub fact_table: Vec<Vec<FactRow>>,
}

impl StarSchema {
    pub fn table_names() -> [&'static str; 8] {
        StarTable::ALL.map(|table| table.as_str())
    }

    pub fn fact_row_count(&self) -> usize {
        self.fact_table.iter().map(Vec::len).sum()
    }

    /// Row count of one output; for the fact table, across all chunks.
    pub fn row_count(&self, table: StarTable) -> usize {
        match table {
            StarTable::DatetimeDim => self.datetime_dim.len(),
            StarTable::PassengerCountDim => self.passenger_count_dim.len(),
            StarTable::TripDistanceDim => self.trip_distance_dim.len(),
            StarTable::RateCodeDim => self.rate_code_dim.len(),
            StarTable::PickupLocationDim => self.pickup_location_dim.len(),
            StarTable::DropoffLocationDim => self.dropoff_location_dim.len(),
            StarTable::PaymentTypeDim => self.payment_type_dim.len(),
            StarTable::FactTable => self.fact_row_count(),
        }
    }
}

/// Natural-key indexes of all seven dimensions, built from one raw table.
struct DimensionIndexes {
    datetime: KeyedIndex<(chrono::NaiveDateTime, chrono::NaiveDateTime)>,
    passenger_count: KeyedIndex<i64>,
    trip_distance: KeyedIndex<FloatKey>,
    rate_code: KeyedIndex<i64>,
    pickup_location: KeyedIndex<(FloatKey, FloatKey)>,
    dropoff_location: KeyedIndex<(FloatKey, FloatKey)>,
    payment_type: KeyedIndex<i64>,
}

impl DimensionIndexes {
    fn build(records: &[TripRecord]) -> Self {
        Self {
            datetime: KeyedIndex::first_occurrence(records.iter().map(TripRecord::datetime_key)),
            // categorical encoding: ids follow the sorted distinct values
            passenger_count: KeyedIndex::sorted_distinct(
                records.iter().map(|r| r.passenger_count),
            ),
            trip_distance: KeyedIndex::sorted_distinct(
                records.iter().map(TripRecord::trip_distance_key),
            ),
            rate_code: KeyedIndex::first_occurrence(records.iter().map(|r| r.rate_code)),
            pickup_location: KeyedIndex::first_occurrence(records.iter().map(|r| r.pickup.key())),
            dropoff_location: KeyedIndex::first_occurrence(records.iter().map(|r| r.dropoff.key())),
            payment_type: KeyedIndex::first_occurrence(records.iter().map(|r| r.payment_type)),
        }
    }
}

fn resolve<K: Hash + Eq + Clone>(
    index: &KeyedIndex<K>,
    key: &K,
    dimension: StarTable,
    row: usize,
) -> Result<i64> {
    index.surrogate(key).ok_or_else(|| Error::KeyConsistency {
        dimension: dimension.to_string(),
        row,
    })
}

fn location_rows(index: &KeyedIndex<(FloatKey, FloatKey)>) -> Vec<LocationDim> {
    index
        .iter()
        .map(|(location_id, (latitude, longitude))| LocationDim {
            location_id,
            latitude: latitude.into_inner(),
            longitude: longitude.into_inner(),
        })
        .collect()
}

/// Builds a star schema from raw trip records: one deduplicated, surrogate
/// keyed table per dimension and a fact table whose rows carry those keys in
/// place of the raw attributes.
#[derive(Debug, Clone)]
pub struct StarSchemaBuilder {
    lookups: LookupTables,
    chunk_size: usize,
}

impl Default for StarSchemaBuilder {
    fn default() -> Self {
        Self::new(LookupTables::default())
    }
}

impl StarSchemaBuilder {
    pub fn new(lookups: LookupTables) -> Self {
        Self {
            lookups,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn build(&self, records: &[TripRecord]) -> Result<StarSchema> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidInput(
                "Fact table chunk size must be positive".to_string(),
            ));
        }

        let indexes = DimensionIndexes::build(records);
        debug!(
            datetimes = indexes.datetime.len(),
            passenger_counts = indexes.passenger_count.len(),
            trip_distances = indexes.trip_distance.len(),
            rate_codes = indexes.rate_code.len(),
            pickup_locations = indexes.pickup_location.len(),
            dropoff_locations = indexes.dropoff_location.len(),
            payment_types = indexes.payment_type.len(),
            "Built dimension indexes"
        );

        let fact_rows = Self::substitute_keys(&indexes, records)?;

        let schema = StarSchema {
            datetime_dim: indexes
                .datetime
                .iter()
                .map(|(id, (pickup, dropoff))| DatetimeDim::new(id, *pickup, *dropoff))
                .collect(),
            passenger_count_dim: indexes
                .passenger_count
                .iter()
                .map(|(passenger_count_id, count)| PassengerCountDim {
                    passenger_count_id,
                    passenger_count: *count,
                })
                .collect(),
            trip_distance_dim: indexes
                .trip_distance
                .iter()
                .map(|(trip_distance_id, distance)| TripDistanceDim {
                    trip_distance_id,
                    trip_distance: distance.into_inner(),
                })
                .collect(),
            rate_code_dim: indexes
                .rate_code
                .iter()
                .map(|(rate_code_id, code)| RateCodeDim {
                    rate_code_id,
                    rate_code: *code,
                    rate_code_name: self.lookups.rate_code_name(*code).map(str::to_string),
                })
                .collect(),
            pickup_location_dim: location_rows(&indexes.pickup_location),
            dropoff_location_dim: location_rows(&indexes.dropoff_location),
            payment_type_dim: indexes
                .payment_type
                .iter()
                .map(|(payment_type_id, code)| PaymentTypeDim {
                    payment_type_id,
                    payment_type: *code,
                    payment_type_name: self.lookups.payment_type_name(*code).map(str::to_string),
                })
                .collect(),
            fact_table: chunk_rows(fact_rows, self.chunk_size)?,
        };

        info!(
            trips = records.len(),
            fact_chunks = schema.fact_table.len(),
            "Star schema built"
        );

        Ok(schema)
    }

    fn substitute_keys(
        indexes: &DimensionIndexes,
        records: &[TripRecord],
    ) -> Result<Vec<FactRow>> {
        records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                Ok(FactRow {
                    vendor_id: record.vendor_id,
                    datetime_id: resolve(
                        &indexes.datetime,
                        &record.datetime_key(),
                        StarTable::DatetimeDim,
                        row,
                    )?,
                    passenger_count_id: resolve(
                        &indexes.passenger_count,
                        &record.passenger_count,
                        StarTable::PassengerCountDim,
                        row,
                    )?,
                    trip_distance_id: resolve(
                        &indexes.trip_distance,
                        &record.trip_distance_key(),
                        StarTable::TripDistanceDim,
                        row,
                    )?,
                    rate_code_id: resolve(
                        &indexes.rate_code,
                        &record.rate_code,
                        StarTable::RateCodeDim,
                        row,
                    )?,
                    store_and_fwd_flag: record.store_and_fwd_flag.clone(),
                    pickup_location_id: resolve(
                        &indexes.pickup_location,
                        &record.pickup.key(),
                        StarTable::PickupLocationDim,
                        row,
                    )?,
                    dropoff_location_id: resolve(
                        &indexes.dropoff_location,
                        &record.dropoff.key(),
                        StarTable::DropoffLocationDim,
                        row,
                    )?,
                    payment_type_id: resolve(
                        &indexes.payment_type,
                        &record.payment_type,
                        StarTable::PaymentTypeDim,
                        row,
                    )?,
                    fares: record.fares,
                })
            })
            .collect()
    }
}
