//! IP geolocation seam for the geo-consistency check.
//!
//! Real resolution belongs to an external collaborator; this core only
//! defines the trait and a table-backed implementation fed from config.

use std::collections::HashMap;

/// Resolves a source IP to an ISO country code. `None` means unknown, which
/// the evaluator treats as no evidence of a mismatch.
pub trait GeoResolver: Send + Sync {
    fn country_of(&self, ip: &str) -> Option<String>;
}

/// Exact-match lookup table. Used both for the config-driven default and as
/// a test double.
pub struct TableGeoResolver {
    entries: HashMap<String, String>,
}

impl TableGeoResolver {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Resolver that knows no addresses.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, ip: impl Into<String>, country: impl Into<String>) -> Self {
        self.entries.insert(ip.into(), country.into());
        self
    }
}

impl GeoResolver for TableGeoResolver {
    fn country_of(&self, ip: &str) -> Option<String> {
        self.entries.get(ip).cloned()
    }
}
