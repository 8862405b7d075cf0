mod dimension;
mod fact;
mod trip;

pub use dimension::{
    CalendarParts, DatetimeDim, LocationDim, PassengerCountDim, PaymentTypeDim, RateCodeDim,
    TripDistanceDim,
};
pub use fact::FactRow;
pub use trip::{Coordinates, FareComponents, FloatKey, TripRecord};
