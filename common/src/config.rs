use config::{Config, ConfigError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub lookups: LookupSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Parquet file/directory or CSV file holding the raw trip records.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseConfig {
    /// `file:///...`, a plain directory path, `s3://bucket` or `memory://`.
    pub url: String,
    #[serde(default = "default_dataset_prefix")]
    pub prefix: String,
    /// Destination overrides keyed by output name, e.g. `fact_table = "fact_trips"`.
    #[serde(default)]
    pub tables: HashMap<String, String>,
    pub endpoint: Option<String>,
    #[serde(default = "default_s3_region")]
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub allow_http: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Code -> name tables as they appear in the settings file. Keys stay strings
/// here because configuration tables are always string-keyed.
#[derive(Debug, Deserialize, Clone)]
pub struct LookupSettings {
    #[serde(default = "default_rate_codes")]
    pub rate_codes: BTreeMap<String, String>,
    #[serde(default = "default_payment_types")]
    pub payment_types: BTreeMap<String, String>,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            rate_codes: default_rate_codes(),
            payment_types: default_payment_types(),
        }
    }
}

fn default_dataset_prefix() -> String {
    "uber_dataset".to_string()
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

fn default_chunk_size() -> usize {
    10_000
}

fn numbered(names: &[&str]) -> BTreeMap<String, String> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| ((idx + 1).to_string(), name.to_string()))
        .collect()
}

fn default_rate_codes() -> BTreeMap<String, String> {
    numbered(&[
        "Standard rate",
        "JFK",
        "Newark",
        "Nassau or Westchester",
        "Negotiated fare",
        "Group ride",
    ])
}

fn default_payment_types() -> BTreeMap<String, String> {
    numbered(&[
        "Credit card",
        "Cash",
        "No charge",
        "Dispute",
        "Unknown",
        "Voided trip",
    ])
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path))
            // APP_WAREHOUSE__SECRET_KEY -> warehouse.secret_key
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        // Build the configuration
        let config = builder.build()?;

        let settings: Settings = config.try_deserialize()?;

        debug!(
            source = %settings.source.path,
            warehouse = %settings.warehouse.url,
            chunk_size = settings.transform.chunk_size,
            "Loaded settings"
        );

        Ok(settings)
    }
}
