use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{CastOptions, can_cast_types, cast_with_options};
use arrow::datatypes::{ArrowPrimitiveType, DataType};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use common::{Error, Result};

pub fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| Error::MissingColumn {
        column: name.to_string(),
    })
}

/// Casts a column to `to`. Values that cannot be converted are an error, not
/// a silent null.
pub fn coerce_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let column = required_column(batch, name)?;
    if column.data_type() == to {
        return Ok(column.clone());
    }

    if !can_cast_types(column.data_type(), to) {
        return Err(Error::ColumnType {
            column: name.to_string(),
            expected: to.to_string(),
            found: column.data_type().to_string(),
        });
    }

    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(column, to, &options)?)
}

/// Downcast for a column already coerced to `T`.
pub fn primitive<'a, T: ArrowPrimitiveType>(
    array: &'a ArrayRef,
    name: &str,
) -> Result<&'a arrow::array::PrimitiveArray<T>> {
    array
        .as_primitive_opt::<T>()
        .ok_or_else(|| Error::ColumnType {
            column: name.to_string(),
            expected: T::DATA_TYPE.to_string(),
            found: array.data_type().to_string(),
        })
}

pub fn non_null<T>(value: Option<T>, column: &str, row: usize) -> Result<T> {
    value.ok_or_else(|| Error::NullValue {
        column: column.to_string(),
        row,
    })
}

pub fn timestamp_micros_to_naive(micros: i64, column: &str) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Timestamp {}us in column '{}' is out of range",
                micros, column
            ))
        })
}

pub fn naive_to_timestamp_micros(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Fields, Int64Type, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("count", DataType::Int32, true),
            Field::new("label", DataType::Utf8, true),
            Field::new("distance", DataType::Float64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int32Array::from(vec![Some(1), None])),
                Arc::new(StringArray::from(vec!["7", "x"])),
                Arc::new(Float64Array::from(vec![1.5, 2.0])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_column() {
        let err = required_column(&batch(), "nope").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column } if column == "nope"));
    }

    #[test]
    fn test_coerce_widens_integers() {
        let batch = batch();
        let column = coerce_column(&batch, "count", &DataType::Int64).unwrap();
        let values = primitive::<Int64Type>(&column, "count").unwrap();
        assert_eq!(values.value(0), 1);
        assert!(values.is_null(1));
    }

    #[test]
    fn test_unparseable_strings_fail() {
        assert!(coerce_column(&batch(), "label", &DataType::Int64).is_err());
    }

    #[test]
    fn test_uncastable_type_is_column_type_error() {
        let err = coerce_column(&batch(), "distance", &DataType::Struct(Fields::empty()))
            .unwrap_err();
        assert!(matches!(err, Error::ColumnType { .. }));
    }

    #[test]
    fn test_timestamp_round_trip() {
        let micros = 1_705_307_400_000_000;
        let ts = timestamp_micros_to_naive(micros, "ts").unwrap();
        assert_eq!(ts.to_string(), "2024-01-15 08:30:00");
        assert_eq!(naive_to_timestamp_micros(&ts), micros);
    }

    #[test]
    fn test_non_null() {
        let err = non_null::<i64>(None, "passenger_count", 4).unwrap_err();
        assert!(matches!(err, Error::NullValue { row: 4, .. }));
    }
}
