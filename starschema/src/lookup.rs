use common::config::LookupSettings;
use common::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Code -> descriptive name tables for the rate code and payment type
/// dimensions. Codes without an entry get no name.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTables {
    rate_codes: HashMap<i64, String>,
    payment_types: HashMap<i64, String>,
}

impl LookupTables {
    pub fn new(rate_codes: HashMap<i64, String>, payment_types: HashMap<i64, String>) -> Self {
        Self {
            rate_codes,
            payment_types,
        }
    }

    /// Tables with no entries; every code maps to no name.
    pub fn empty() -> Self {
        Self::new(HashMap::new(), HashMap::new())
    }

    pub fn rate_code_name(&self, code: i64) -> Option<&str> {
        self.rate_codes.get(&code).map(String::as_str)
    }

    pub fn payment_type_name(&self, code: i64) -> Option<&str> {
        self.payment_types.get(&code).map(String::as_str)
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        // Same defaults as the settings file.
        Self::try_from(&LookupSettings::default()).unwrap_or_else(|_| Self::empty())
    }
}

impl TryFrom<&LookupSettings> for LookupTables {
    type Error = Error;

    fn try_from(settings: &LookupSettings) -> Result<Self> {
        Ok(Self {
            rate_codes: parse_codes("rate_codes", &settings.rate_codes)?,
            payment_types: parse_codes("payment_types", &settings.payment_types)?,
        })
    }
}

fn parse_codes(table: &str, entries: &BTreeMap<String, String>) -> Result<HashMap<i64, String>> {
    entries
        .iter()
        .map(|(code, name)| {
            let code = code.trim().parse::<i64>().map_err(|_| {
                Error::InvalidInput(format!(
                    "lookups.{}: '{}' is not an integer code",
                    table, code
                ))
            })?;
            Ok((code, name.clone()))
        })
        .collect()
}
