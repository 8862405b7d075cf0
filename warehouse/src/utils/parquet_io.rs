use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use common::Result;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;

/// Serialises `batches` into one parquet file. Each batch is flushed as its
/// own row group, so fact chunks stay visible in the file layout.
pub fn encode_batches(
    schema: SchemaRef,
    batches: &[RecordBatch],
    metadata: Vec<KeyValue>,
) -> Result<(Bytes, usize)> {
    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(metadata))
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props))?;
    for batch in batches {
        writer.write(batch)?;
        writer.flush()?;
    }
    let file_metadata = writer.close()?;

    Ok((Bytes::from(buffer), file_metadata.row_groups.len()))
}

pub fn decode_batches(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}

pub fn metadata_entry(key: &str, value: impl Into<String>) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(value.into()),
    }
}
