use crate::types::StarTable;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use lazy_static::lazy_static;
use std::sync::Arc;

// Raw trip record columns
pub const VENDOR_ID: &str = "VendorID";
pub const PICKUP_DATETIME: &str = "tpep_pickup_datetime";
pub const DROPOFF_DATETIME: &str = "tpep_dropoff_datetime";
pub const PASSENGER_COUNT: &str = "passenger_count";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const RATE_CODE: &str = "RatecodeID";
pub const PICKUP_LATITUDE: &str = "pickup_latitude";
pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
pub const PAYMENT_TYPE: &str = "payment_type";
pub const STORE_AND_FWD_FLAG: &str = "store_and_fwd_flag";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const EXTRA: &str = "extra";
pub const MTA_TAX: &str = "mta_tax";
pub const TIP_AMOUNT: &str = "tip_amount";
pub const TOLLS_AMOUNT: &str = "tolls_amount";
pub const IMPROVEMENT_SURCHARGE: &str = "improvement_surcharge";
pub const TOTAL_AMOUNT: &str = "total_amount";

/// Fare component columns, in fact-table order.
pub const FARE_COLUMNS: [&str; 7] = [
    FARE_AMOUNT,
    EXTRA,
    MTA_TAX,
    TIP_AMOUNT,
    TOLLS_AMOUNT,
    IMPROVEMENT_SURCHARGE,
    TOTAL_AMOUNT,
];

pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, None)
}

fn id(name: &str) -> Field {
    Field::new(name, DataType::Int64, false)
}

fn calendar_fields(prefix: &str) -> Vec<Field> {
    ["hour", "day", "month", "year", "weekday"]
        .iter()
        .map(|part| Field::new(format!("{}_{}", prefix, part), DataType::Int32, false))
        .collect()
}

// Star schema output schemas
pub fn datetime_dim_schema() -> Schema {
    let mut fields = vec![id("datetime_id"), Field::new(PICKUP_DATETIME, timestamp_type(), false)];
    fields.extend(calendar_fields("pick"));
    fields.push(Field::new(DROPOFF_DATETIME, timestamp_type(), false));
    fields.extend(calendar_fields("drop"));
    Schema::new(fields)
}

pub fn passenger_count_dim_schema() -> Schema {
    Schema::new(vec![
        id("passenger_count_id"),
        Field::new(PASSENGER_COUNT, DataType::Int64, false),
    ])
}

pub fn trip_distance_dim_schema() -> Schema {
    Schema::new(vec![
        id("trip_distance_id"),
        Field::new(TRIP_DISTANCE, DataType::Float64, false),
    ])
}

pub fn rate_code_dim_schema() -> Schema {
    Schema::new(vec![
        id("rate_code_id"),
        Field::new(RATE_CODE, DataType::Int64, false),
        Field::new("rate_code_name", DataType::Utf8, true),
    ])
}

pub fn location_dim_schema(prefix: &str) -> Schema {
    Schema::new(vec![
        id(&format!("{}_location_id", prefix)),
        Field::new(format!("{}_latitude", prefix), DataType::Float64, false),
        Field::new(format!("{}_longitude", prefix), DataType::Float64, false),
    ])
}

pub fn payment_type_dim_schema() -> Schema {
    Schema::new(vec![
        id("payment_type_id"),
        Field::new(PAYMENT_TYPE, DataType::Int64, false),
        Field::new("payment_type_name", DataType::Utf8, true),
    ])
}

pub fn fact_table_schema() -> Schema {
    let mut fields = vec![
        Field::new(VENDOR_ID, DataType::Int64, true),
        id("datetime_id"),
        id("passenger_count_id"),
        id("trip_distance_id"),
        id("rate_code_id"),
        Field::new(STORE_AND_FWD_FLAG, DataType::Utf8, true),
        id("pickup_location_id"),
        id("dropoff_location_id"),
        id("payment_type_id"),
    ];
    fields.extend(
        FARE_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true)),
    );
    Schema::new(fields)
}

pub fn get_table_schema(table: StarTable) -> SchemaRef {
    match table {
        StarTable::DatetimeDim => DATETIME_DIM_SCHEMA.clone(),
        StarTable::PassengerCountDim => PASSENGER_COUNT_DIM_SCHEMA.clone(),
        StarTable::TripDistanceDim => TRIP_DISTANCE_DIM_SCHEMA.clone(),
        StarTable::RateCodeDim => RATE_CODE_DIM_SCHEMA.clone(),
        StarTable::PickupLocationDim => PICKUP_LOCATION_DIM_SCHEMA.clone(),
        StarTable::DropoffLocationDim => DROPOFF_LOCATION_DIM_SCHEMA.clone(),
        StarTable::PaymentTypeDim => PAYMENT_TYPE_DIM_SCHEMA.clone(),
        StarTable::FactTable => FACT_TABLE_SCHEMA.clone(),
    }
}

// Lazy-loaded static schemas
lazy_static! {
    static ref DATETIME_DIM_SCHEMA: SchemaRef = Arc::new(datetime_dim_schema());
    static ref PASSENGER_COUNT_DIM_SCHEMA: SchemaRef = Arc::new(passenger_count_dim_schema());
    static ref TRIP_DISTANCE_DIM_SCHEMA: SchemaRef = Arc::new(trip_distance_dim_schema());
    static ref RATE_CODE_DIM_SCHEMA: SchemaRef = Arc::new(rate_code_dim_schema());
    static ref PICKUP_LOCATION_DIM_SCHEMA: SchemaRef = Arc::new(location_dim_schema("pickup"));
    static ref DROPOFF_LOCATION_DIM_SCHEMA: SchemaRef = Arc::new(location_dim_schema("dropoff"));
    static ref PAYMENT_TYPE_DIM_SCHEMA: SchemaRef = Arc::new(payment_type_dim_schema());
    static ref FACT_TABLE_SCHEMA: SchemaRef = Arc::new(fact_table_schema());
}
