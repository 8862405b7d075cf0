use crate::builder::StarSchema;
use crate::models::{CalendarParts, DatetimeDim, FactRow, LocationDim};
use crate::schema::get_table_schema;
use crate::types::StarTable;
use crate::utils::arrow::naive_to_timestamp_micros;
use arrow::array::{
    ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::record_batch::RecordBatch;
use common::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The eight outputs of a build as arrow record batches, keyed by table.
/// Each dimension holds exactly one batch; the fact table holds one batch per
/// chunk (none for an empty input).
pub type NamedBatches = BTreeMap<StarTable, Vec<RecordBatch>>;

fn ids<T>(rows: &[T], id: impl Fn(&T) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(rows.iter().map(id)))
}

fn calendar_columns(
    rows: &[DatetimeDim],
    parts: impl Fn(&DatetimeDim) -> CalendarParts,
) -> Vec<ArrayRef> {
    (0..5)
        .map(|field| {
            Arc::new(Int32Array::from_iter_values(
                rows.iter().map(|row| parts(row).to_array()[field]),
            )) as ArrayRef
        })
        .collect()
}

fn datetime_batch(rows: &[DatetimeDim]) -> Result<RecordBatch> {
    let mut columns = vec![
        ids(rows, |r| r.datetime_id),
        Arc::new(TimestampMicrosecondArray::from_iter_values(
            rows.iter().map(|r| naive_to_timestamp_micros(&r.pickup_datetime)),
        )) as ArrayRef,
    ];
    columns.extend(calendar_columns(rows, |r| r.pick));
    columns.push(Arc::new(TimestampMicrosecondArray::from_iter_values(
        rows.iter().map(|r| naive_to_timestamp_micros(&r.dropoff_datetime)),
    )));
    columns.extend(calendar_columns(rows, |r| r.drop));

    Ok(RecordBatch::try_new(get_table_schema(StarTable::DatetimeDim), columns)?)
}

fn location_batch(table: StarTable, rows: &[LocationDim]) -> Result<RecordBatch> {
    Ok(RecordBatch::try_new(
        get_table_schema(table),
        vec![
            ids(rows, |r| r.location_id),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
        ],
    )?)
}

fn fact_batch(rows: &[FactRow]) -> Result<RecordBatch> {
    let mut columns = vec![
        Arc::new(rows.iter().map(|r| r.vendor_id).collect::<Int64Array>()) as ArrayRef,
        ids(rows, |r| r.datetime_id),
        ids(rows, |r| r.passenger_count_id),
        ids(rows, |r| r.trip_distance_id),
        ids(rows, |r| r.rate_code_id),
        Arc::new(
            rows.iter()
                .map(|r| r.store_and_fwd_flag.as_deref())
                .collect::<StringArray>(),
        ),
        ids(rows, |r| r.pickup_location_id),
        ids(rows, |r| r.dropoff_location_id),
        ids(rows, |r| r.payment_type_id),
    ];
    columns.extend((0..7).map(|field| {
        Arc::new(
            rows.iter()
                .map(|r| r.fares.to_array()[field])
                .collect::<Float64Array>(),
        ) as ArrayRef
    }));

    Ok(RecordBatch::try_new(get_table_schema(StarTable::FactTable), columns)?)
}

impl StarSchema {
    /// Converts every output into arrow batches matching the declared table
    /// schemas.
    pub fn into_named_batches(self) -> Result<NamedBatches> {
        let mut batches = NamedBatches::new();

        batches.insert(StarTable::DatetimeDim, vec![datetime_batch(&self.datetime_dim)?]);
        batches.insert(
            StarTable::PassengerCountDim,
            vec![RecordBatch::try_new(
                get_table_schema(StarTable::PassengerCountDim),
                vec![
                    ids(&self.passenger_count_dim, |r| r.passenger_count_id),
                    ids(&self.passenger_count_dim, |r| r.passenger_count),
                ],
            )?],
        );
        batches.insert(
            StarTable::TripDistanceDim,
            vec![RecordBatch::try_new(
                get_table_schema(StarTable::TripDistanceDim),
                vec![
                    ids(&self.trip_distance_dim, |r| r.trip_distance_id),
                    Arc::new(Float64Array::from_iter_values(
                        self.trip_distance_dim.iter().map(|r| r.trip_distance),
                    )),
                ],
            )?],
        );
        batches.insert(
            StarTable::RateCodeDim,
            vec![RecordBatch::try_new(
                get_table_schema(StarTable::RateCodeDim),
                vec![
                    ids(&self.rate_code_dim, |r| r.rate_code_id),
                    ids(&self.rate_code_dim, |r| r.rate_code),
                    Arc::new(
                        self.rate_code_dim
                            .iter()
                            .map(|r| r.rate_code_name.as_deref())
                            .collect::<StringArray>(),
                    ),
                ],
            )?],
        );
        batches.insert(
            StarTable::PickupLocationDim,
            vec![location_batch(StarTable::PickupLocationDim, &self.pickup_location_dim)?],
        );
        batches.insert(
            StarTable::DropoffLocationDim,
            vec![location_batch(StarTable::DropoffLocationDim, &self.dropoff_location_dim)?],
        );
        batches.insert(
            StarTable::PaymentTypeDim,
            vec![RecordBatch::try_new(
                get_table_schema(StarTable::PaymentTypeDim),
                vec![
                    ids(&self.payment_type_dim, |r| r.payment_type_id),
                    ids(&self.payment_type_dim, |r| r.payment_type),
                    Arc::new(
                        self.payment_type_dim
                            .iter()
                            .map(|r| r.payment_type_name.as_deref())
                            .collect::<StringArray>(),
                    ),
                ],
            )?],
        );
        batches.insert(
            StarTable::FactTable,
            self.fact_table
                .iter()
                .map(|chunk| fact_batch(chunk))
                .collect::<Result<Vec<_>>>()?,
        );

        Ok(batches)
    }
}
