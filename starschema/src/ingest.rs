use crate::models::{Coordinates, FareComponents, TripRecord};
use crate::schema::*;
use crate::utils::arrow::{coerce_column, non_null, primitive, timestamp_micros_to_naive};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimestampMicrosecondType};
use arrow::record_batch::RecordBatch;
use common::{Error, Result};
use tracing::debug;

/// Every input column coerced to the type the builder works with.
struct TripColumns {
    vendor_id: ArrayRef,
    pickup: ArrayRef,
    dropoff: ArrayRef,
    passenger_count: ArrayRef,
    trip_distance: ArrayRef,
    rate_code: ArrayRef,
    pickup_latitude: ArrayRef,
    pickup_longitude: ArrayRef,
    dropoff_latitude: ArrayRef,
    dropoff_longitude: ArrayRef,
    payment_type: ArrayRef,
    store_and_fwd_flag: ArrayRef,
    fares: Vec<ArrayRef>,
}

impl TripColumns {
    fn coerce(batch: &RecordBatch) -> Result<Self> {
        let fares = FARE_COLUMNS
            .iter()
            .map(|name| coerce_column(batch, name, &DataType::Float64))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vendor_id: coerce_column(batch, VENDOR_ID, &DataType::Int64)?,
            pickup: coerce_column(batch, PICKUP_DATETIME, &timestamp_type())?,
            dropoff: coerce_column(batch, DROPOFF_DATETIME, &timestamp_type())?,
            passenger_count: coerce_column(batch, PASSENGER_COUNT, &DataType::Int64)?,
            trip_distance: coerce_column(batch, TRIP_DISTANCE, &DataType::Float64)?,
            rate_code: coerce_column(batch, RATE_CODE, &DataType::Int64)?,
            pickup_latitude: coerce_column(batch, PICKUP_LATITUDE, &DataType::Float64)?,
            pickup_longitude: coerce_column(batch, PICKUP_LONGITUDE, &DataType::Float64)?,
            dropoff_latitude: coerce_column(batch, DROPOFF_LATITUDE, &DataType::Float64)?,
            dropoff_longitude: coerce_column(batch, DROPOFF_LONGITUDE, &DataType::Float64)?,
            payment_type: coerce_column(batch, PAYMENT_TYPE, &DataType::Int64)?,
            store_and_fwd_flag: coerce_column(batch, STORE_AND_FWD_FLAG, &DataType::Utf8)?,
            fares,
        })
    }
}

fn value_at<T: arrow::datatypes::ArrowPrimitiveType>(
    array: &ArrayRef,
    column: &str,
    idx: usize,
) -> Result<Option<T::Native>> {
    let values = primitive::<T>(array, column)?;
    Ok(values.is_valid(idx).then(|| values.value(idx)))
}

fn required<T: arrow::datatypes::ArrowPrimitiveType>(
    array: &ArrayRef,
    column: &str,
    idx: usize,
    row: usize,
) -> Result<T::Native> {
    non_null(value_at::<T>(array, column, idx)?, column, row)
}

impl TripRecord {
    /// Extracts trip records from one batch. Row numbers in errors are
    /// relative to the batch.
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<TripRecord>> {
        records_from_batch(batch, 0)
    }
}

/// Extracts trip records from every batch, in order. Row numbers in errors
/// count across batches.
pub fn read_trip_records(batches: &[RecordBatch]) -> Result<Vec<TripRecord>> {
    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut records = Vec::with_capacity(total);
    for batch in batches {
        let offset = records.len();
        records.extend(records_from_batch(batch, offset)?);
    }
    debug!(
        batches = batches.len(),
        rows = records.len(),
        "Read trip records"
    );
    Ok(records)
}

fn records_from_batch(batch: &RecordBatch, offset: usize) -> Result<Vec<TripRecord>> {
    let columns = TripColumns::coerce(batch)?;
    let flags = columns
        .store_and_fwd_flag
        .as_string_opt::<i32>()
        .ok_or_else(|| Error::ColumnType {
            column: STORE_AND_FWD_FLAG.to_string(),
            expected: DataType::Utf8.to_string(),
            found: columns.store_and_fwd_flag.data_type().to_string(),
        })?;

    (0..batch.num_rows())
        .map(|idx| {
            let row = offset + idx;
            let pickup =
                required::<TimestampMicrosecondType>(&columns.pickup, PICKUP_DATETIME, idx, row)?;
            let dropoff =
                required::<TimestampMicrosecondType>(&columns.dropoff, DROPOFF_DATETIME, idx, row)?;

            let mut fares = [None; 7];
            for (slot, (array, name)) in fares
                .iter_mut()
                .zip(columns.fares.iter().zip(FARE_COLUMNS.iter()))
            {
                *slot = value_at::<Float64Type>(array, name, idx)?;
            }

            Ok(TripRecord {
                vendor_id: value_at::<Int64Type>(&columns.vendor_id, VENDOR_ID, idx)?,
                pickup_datetime: timestamp_micros_to_naive(pickup, PICKUP_DATETIME)?,
                dropoff_datetime: timestamp_micros_to_naive(dropoff, DROPOFF_DATETIME)?,
                passenger_count: required::<Int64Type>(
                    &columns.passenger_count,
                    PASSENGER_COUNT,
                    idx,
                    row,
                )?,
                trip_distance: required::<Float64Type>(
                    &columns.trip_distance,
                    TRIP_DISTANCE,
                    idx,
                    row,
                )?,
                rate_code: required::<Int64Type>(&columns.rate_code, RATE_CODE, idx, row)?,
                pickup: Coordinates::new(
                    required::<Float64Type>(&columns.pickup_latitude, PICKUP_LATITUDE, idx, row)?,
                    required::<Float64Type>(&columns.pickup_longitude, PICKUP_LONGITUDE, idx, row)?,
                ),
                dropoff: Coordinates::new(
                    required::<Float64Type>(&columns.dropoff_latitude, DROPOFF_LATITUDE, idx, row)?,
                    required::<Float64Type>(
                        &columns.dropoff_longitude,
                        DROPOFF_LONGITUDE,
                        idx,
                        row,
                    )?,
                ),
                payment_type: required::<Int64Type>(&columns.payment_type, PAYMENT_TYPE, idx, row)?,
                store_and_fwd_flag: flags.is_valid(idx).then(|| flags.value(idx).to_string()),
                fares: FareComponents::from_array(fares),
            })
        })
        .collect()
}
