use super::trip::FareComponents;

/// One fact row: raw measures plus a surrogate key per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub vendor_id: Option<i64>,
    pub datetime_id: i64,
    pub passenger_count_id: i64,
    pub trip_distance_id: i64,
    pub rate_code_id: i64,
    pub store_and_fwd_flag: Option<String>,
    pub pickup_location_id: i64,
    pub dropoff_location_id: i64,
    pub payment_type_id: i64,
    pub fares: FareComponents,
}
