use object_store::path::Path;

/// Builds object paths for warehouse tables under a dataset prefix, e.g.
/// `uber_dataset/fact_table/part-0.parquet`.
#[derive(Debug, Clone)]
pub struct TablePathBuilder {
    base: Path,
}

pub const DATA_FILE_NAME: &str = "part-0.parquet";

impl TablePathBuilder {
    pub fn with_prefix(base: Path, prefix: &str) -> Self {
        let base = prefix
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(base, |path, part| path.child(part));
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory-like prefix holding every object of `table`.
    pub fn table_dir(&self, table: &str) -> Path {
        self.base.child(table)
    }

    pub fn data_file(&self, table: &str) -> Path {
        self.table_dir(table).child(DATA_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_paths() {
        let paths = TablePathBuilder::with_prefix(Path::from("warehouse"), "uber_dataset");
        assert_eq!(paths.table_dir("datetime_dim").as_ref(), "warehouse/uber_dataset/datetime_dim");
        assert_eq!(
            paths.data_file("fact_table").as_ref(),
            "warehouse/uber_dataset/fact_table/part-0.parquet"
        );
    }

    #[test]
    fn test_nested_and_empty_prefix() {
        let nested = TablePathBuilder::with_prefix(Path::default(), "/taxi/2024/");
        assert_eq!(nested.table_dir("t").as_ref(), "taxi/2024/t");

        let bare = TablePathBuilder::with_prefix(Path::default(), "");
        assert_eq!(bare.data_file("t").as_ref(), "t/part-0.parquet");
        assert_eq!(bare.base().as_ref(), "");
    }
}
