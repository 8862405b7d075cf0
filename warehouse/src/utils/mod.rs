pub mod parquet_io;
pub mod paths;
