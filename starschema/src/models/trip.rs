use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;

/// Hashable, totally ordered form of a float attribute.
pub type FloatKey = OrderedFloat<f64>;

/// One raw taxi trip, after column coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub vendor_id: Option<i64>,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    pub passenger_count: i64,
    pub trip_distance: f64,
    pub rate_code: i64,
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    pub payment_type: i64,
    pub store_and_fwd_flag: Option<String>,
    pub fares: FareComponents,
}

impl TripRecord {
    pub fn datetime_key(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.pickup_datetime, self.dropoff_datetime)
    }

    pub fn trip_distance_key(&self) -> FloatKey {
        OrderedFloat(self.trip_distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn key(&self) -> (FloatKey, FloatKey) {
        (OrderedFloat(self.latitude), OrderedFloat(self.longitude))
    }
}

/// Monetary measures carried unchanged into the fact table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FareComponents {
    pub fare_amount: Option<f64>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tip_amount: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub improvement_surcharge: Option<f64>,
    pub total_amount: Option<f64>,
}

impl FareComponents {
    /// Values in fact-table column order.
    pub fn to_array(&self) -> [Option<f64>; 7] {
        [
            self.fare_amount,
            self.extra,
            self.mta_tax,
            self.tip_amount,
            self.tolls_amount,
            self.improvement_surcharge,
            self.total_amount,
        ]
    }

    pub fn from_array(values: [Option<f64>; 7]) -> Self {
        let [
            fare_amount,
            extra,
            mta_tax,
            tip_amount,
            tolls_amount,
            improvement_surcharge,
            total_amount,
        ] = values;
        Self {
            fare_amount,
            extra,
            mta_tax,
            tip_amount,
            tolls_amount,
            improvement_surcharge,
            total_amount,
        }
    }
}
