pub mod warehouse;

use common::config::WarehouseConfig;
use common::{Error, Result};
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub use warehouse::{ObjectStoreWarehouse, TableWrite, Warehouse};

/// Where the warehouse lives, parsed from `warehouse.url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Local(std::path::PathBuf),
    S3 { bucket: String, root: Path },
    Memory,
}

impl StoreLocation {
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            // Plain filesystem paths have no scheme.
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Ok(StoreLocation::Local(url.into()));
            }
            Err(e) => return Err(e.into()),
        };

        match parsed.scheme() {
            "file" => parsed
                .to_file_path()
                .map(StoreLocation::Local)
                .map_err(|_| Error::InvalidUri(format!("Not a local file url: {}", url))),
            "s3" => {
                let bucket = parsed
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .ok_or_else(|| Error::InvalidUri(format!("Missing bucket in {}", url)))?;
                Ok(StoreLocation::S3 {
                    bucket: bucket.to_string(),
                    root: Path::parse(parsed.path())?,
                })
            }
            "memory" => Ok(StoreLocation::Memory),
            other => Err(Error::InvalidUri(format!(
                "Unsupported warehouse scheme '{}' in {}",
                other, url
            ))),
        }
    }
}

/// Opens the object store behind `config.url`. Returns the store and the
/// root path inside it under which dataset tables are written.
pub fn open_store(config: &WarehouseConfig) -> Result<(Arc<dyn ObjectStore>, Path)> {
    let location = StoreLocation::parse(&config.url)?;
    debug!(url = %config.url, ?location, "Opening warehouse store");

    match location {
        StoreLocation::Local(dir) => {
            std::fs::create_dir_all(&dir)?;
            let store = LocalFileSystem::new_with_prefix(&dir)?;
            Ok((Arc::new(store), Path::default()))
        }
        StoreLocation::S3 { bucket, root } => {
            let mut builder = AmazonS3Builder::new()
                .with_bucket_name(&bucket)
                .with_region(&config.region)
                .with_allow_http(config.allow_http);
            if let Some(endpoint) = &config.endpoint {
                builder = builder.with_endpoint(endpoint);
            }
            if let Some(access_key) = &config.access_key {
                builder = builder.with_access_key_id(access_key);
            }
            if let Some(secret_key) = &config.secret_key {
                builder = builder.with_secret_access_key(secret_key);
            }
            Ok((Arc::new(builder.build()?), root))
        }
        StoreLocation::Memory => Ok((Arc::new(InMemory::new()), Path::default())),
    }
}
