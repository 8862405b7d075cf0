use std::fmt;

/// The eight outputs of one star-schema build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StarTable {
    DatetimeDim,
    PassengerCountDim,
    TripDistanceDim,
    RateCodeDim,
    PickupLocationDim,
    DropoffLocationDim,
    PaymentTypeDim,
    FactTable,
}

impl StarTable {
    pub const ALL: [StarTable; 8] = [
        StarTable::DatetimeDim,
        StarTable::PassengerCountDim,
        StarTable::TripDistanceDim,
        StarTable::RateCodeDim,
        StarTable::PickupLocationDim,
        StarTable::DropoffLocationDim,
        StarTable::PaymentTypeDim,
        StarTable::FactTable,
    ];

    pub const DIMENSIONS: [StarTable; 7] = [
        StarTable::DatetimeDim,
        StarTable::PassengerCountDim,
        StarTable::TripDistanceDim,
        StarTable::RateCodeDim,
        StarTable::PickupLocationDim,
        StarTable::DropoffLocationDim,
        StarTable::PaymentTypeDim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatetimeDim => "datetime_dim",
            Self::PassengerCountDim => "passenger_count_dim",
            Self::TripDistanceDim => "trip_distance_dim",
            Self::RateCodeDim => "rate_code_dim",
            Self::PickupLocationDim => "pickup_location_dim",
            Self::DropoffLocationDim => "dropoff_location_dim",
            Self::PaymentTypeDim => "payment_type_dim",
            Self::FactTable => "fact_table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.as_str() == name)
    }

    pub fn is_dimension(&self) -> bool {
        !matches!(self, Self::FactTable)
    }
}

impl fmt::Display for StarTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
