use chrono::{Datelike, NaiveDateTime, Timelike};

/// Calendar attributes derived from one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub hour: i32,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    /// Monday = 0
    pub weekday: i32,
}

impl CalendarParts {
    pub fn from_datetime(ts: &NaiveDateTime) -> Self {
        Self {
            hour: ts.hour() as i32,
            day: ts.day() as i32,
            month: ts.month() as i32,
            year: ts.year(),
            weekday: ts.weekday().num_days_from_monday() as i32,
        }
    }

    pub fn to_array(&self) -> [i32; 5] {
        [self.hour, self.day, self.month, self.year, self.weekday]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatetimeDim {
    pub datetime_id: i64,
    pub pickup_datetime: NaiveDateTime,
    pub pick: CalendarParts,
    pub dropoff_datetime: NaiveDateTime,
    pub drop: CalendarParts,
}

impl DatetimeDim {
    pub fn new(
        datetime_id: i64,
        pickup_datetime: NaiveDateTime,
        dropoff_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            datetime_id,
            pickup_datetime,
            pick: CalendarParts::from_datetime(&pickup_datetime),
            dropoff_datetime,
            drop: CalendarParts::from_datetime(&dropoff_datetime),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassengerCountDim {
    pub passenger_count_id: i64,
    pub passenger_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripDistanceDim {
    pub trip_distance_id: i64,
    pub trip_distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateCodeDim {
    pub rate_code_id: i64,
    pub rate_code: i64,
    pub rate_code_name: Option<String>,
}

/// Row of either the pickup or the dropoff location dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDim {
    pub location_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTypeDim {
    pub payment_type_id: i64,
    pub payment_type: i64,
    pub payment_type_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_calendar_parts_monday_morning() {
        let parts = CalendarParts::from_datetime(&at(2024, 1, 15, 8, 30));
        assert_eq!(
            parts,
            CalendarParts {
                hour: 8,
                day: 15,
                month: 1,
                year: 2024,
                weekday: 0,
            }
        );
    }

    #[test]
    fn test_calendar_parts_sunday_is_six() {
        let parts = CalendarParts::from_datetime(&at(2024, 1, 21, 23, 59));
        assert_eq!(parts.weekday, 6);
        assert_eq!(parts.hour, 23);
    }

    #[test]
    fn test_datetime_dim_derives_both_sides() {
        let row = DatetimeDim::new(3, at(2016, 2, 29, 23, 50), at(2016, 3, 1, 0, 10));
        assert_eq!(row.datetime_id, 3);
        assert_eq!(row.pick.to_array(), [23, 29, 2, 2016, 0]);
        assert_eq!(row.drop.to_array(), [0, 1, 3, 2016, 1]);
    }
}
