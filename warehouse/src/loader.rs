use crate::storage::{TableWrite, Warehouse};
use common::config::WarehouseConfig;
use common::{Error, Result};
use starschema::schema::get_table_schema;
use starschema::{NamedBatches, StarTable};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Maps each output table to its destination name in the warehouse.
/// Tables without an override keep their own name.
#[derive(Debug, Clone, PartialEq)]
pub struct Destinations {
    names: BTreeMap<StarTable, String>,
}

impl Destinations {
    pub fn identity() -> Self {
        Self {
            names: StarTable::ALL
                .iter()
                .map(|table| (*table, table.as_str().to_string()))
                .collect(),
        }
    }

    pub fn from_config(config: &WarehouseConfig) -> Result<Self> {
        let mut destinations = Self::identity();
        for (output, destination) in &config.tables {
            let table = StarTable::from_name(output).ok_or_else(|| {
                Error::InvalidInput(format!("warehouse.tables: unknown output table '{}'", output))
            })?;
            if destination.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "warehouse.tables: empty destination for '{}'",
                    output
                )));
            }
            destinations.names.insert(table, destination.clone());
        }

        let mut claimed: HashMap<&str, StarTable> = HashMap::new();
        for (table, destination) in &destinations.names {
            if let Some(other) = claimed.insert(destination.as_str(), *table) {
                return Err(Error::InvalidInput(format!(
                    "warehouse.tables: '{}' and '{}' both load into '{}'",
                    other, table, destination
                )));
            }
        }
        Ok(destinations)
    }

    pub fn name(&self, table: StarTable) -> &str {
        self.names
            .get(&table)
            .map(String::as_str)
            .unwrap_or_else(|| table.as_str())
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self::identity()
    }
}

/// Replaces every destination table with the matching output. The fact
/// table's chunks are written together as one relation.
pub async fn load_star_schema(
    warehouse: &dyn Warehouse,
    destinations: &Destinations,
    mut batches: NamedBatches,
) -> Result<Vec<TableWrite>> {
    if let Some(missing) = StarTable::ALL.iter().find(|t| !batches.contains_key(*t)) {
        return Err(Error::InvalidInput(format!(
            "Output '{}' is missing from the star schema",
            missing
        )));
    }

    let mut writes = Vec::with_capacity(StarTable::ALL.len());
    for table in StarTable::ALL {
        let table_batches = batches.remove(&table).unwrap_or_default();
        let destination = destinations.name(table);
        let write = warehouse
            .replace_table(destination, get_table_schema(table), &table_batches)
            .await?;
        writes.push(write);
    }

    let rows: usize = writes.iter().map(|w| w.rows).sum();
    info!(tables = writes.len(), rows, "Loaded star schema");
    Ok(writes)
}
