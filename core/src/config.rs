//! Checkout configuration: fraud rules, processor settings, and the IP
//! geolocation table.
//!
//! Loaded from JSON files under a data/ directory. Processor mock flags and
//! credential identifiers can be overridden from the environment; they are
//! opaque strings, never validated by this core.
//! In tests, use CheckoutConfig::default_test().

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ── Fraud rules ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRulesConfig {
    /// ISO country codes whose shipping destinations force a high verdict.
    pub high_risk_countries: HashSet<String>,
    /// Blocked 6-digit card BINs.
    pub bin_blocklist: HashSet<String>,
    /// Order totals above this are flagged (aggravating signal only).
    pub high_value_threshold: f64,
    /// Rolling velocity window, in hours. Exclusive at exactly this bound.
    pub velocity_window_hours: i64,
    /// Prior submissions inside the window at which velocity fires.
    pub velocity_max_orders: usize,
}

impl FraudRulesConfig {
    /// Country comparison is case-insensitive and ignores surrounding
    /// whitespace.
    pub fn is_high_risk_country(&self, country: &str) -> bool {
        let country = country.trim();
        self.high_risk_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }

    pub fn is_blocked_bin(&self, bin: &str) -> bool {
        self.bin_blocklist.contains(bin.trim())
    }
}

// ── Payment processors ───────────────────────────────────────────────────────

/// Settings for one processor family. Credentials are opaque identifiers
/// passed through to the (absent) integration layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default)]
    pub mock_mode: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorsConfig {
    pub primary_card: ProcessorConfig,
    pub wallet: ProcessorConfig,
    pub regional: ProcessorConfig,
}

impl ProcessorsConfig {
    /// Apply environment overrides. Recognized, per family FAMILY in
    /// {PRIMARY_CARD, WALLET, REGIONAL}:
    ///   STOREFRONT_{FAMILY}_MOCK
    ///   STOREFRONT_{FAMILY}_API_KEY
    ///   STOREFRONT_{FAMILY}_MERCHANT_ID
    pub fn apply_env(&mut self) {
        apply_family_env(&mut self.primary_card, "PRIMARY_CARD");
        apply_family_env(&mut self.wallet, "WALLET");
        apply_family_env(&mut self.regional, "REGIONAL");
    }
}

fn apply_family_env(cfg: &mut ProcessorConfig, family: &str) {
    if let Ok(v) = std::env::var(format!("STOREFRONT_{family}_MOCK")) {
        cfg.mock_mode = matches!(v.trim(), "1" | "true" | "yes");
    }
    if let Ok(v) = std::env::var(format!("STOREFRONT_{family}_API_KEY")) {
        cfg.api_key = Some(v);
    }
    if let Ok(v) = std::env::var(format!("STOREFRONT_{family}_MERCHANT_ID")) {
        cfg.merchant_id = Some(v);
    }
}

// ── Top-level config ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub fraud: FraudRulesConfig,
    pub payments: ProcessorsConfig,
    /// Exact-match IP to ISO country table backing the default geo resolver.
    pub geo_table: HashMap<String, String>,
}

impl CheckoutConfig {
    /// Load from the data/ directory.
    /// In tests, use CheckoutConfig::default_test().
    pub fn load(data_dir: &str) -> CheckoutResult<Self> {
        let fraud: FraudRulesConfig = read_json(&format!("{data_dir}/risk/fraud_rules.json"))?;
        let payments: ProcessorsConfig =
            read_json(&format!("{data_dir}/payments/processors.json"))?;
        let geo_table: HashMap<String, String> =
            read_json(&format!("{data_dir}/risk/geo_table.json"))?;

        Ok(Self {
            fraud,
            payments,
            geo_table,
        })
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            fraud: FraudRulesConfig {
                high_risk_countries: ["KP".to_string(), "IR".to_string(), "SY".to_string()]
                    .into(),
                bin_blocklist: ["123456".to_string(), "654321".to_string()].into(),
                high_value_threshold: 2000.0,
                velocity_window_hours: 24,
                velocity_max_orders: 3,
            },
            payments: ProcessorsConfig {
                primary_card: ProcessorConfig {
                    mock_mode: true,
                    ..ProcessorConfig::default()
                },
                wallet: ProcessorConfig {
                    mock_mode: true,
                    ..ProcessorConfig::default()
                },
                regional: ProcessorConfig {
                    mock_mode: true,
                    ..ProcessorConfig::default()
                },
            },
            geo_table: [
                ("203.0.113.7".to_string(), "US".to_string()),
                ("198.51.100.22".to_string(), "GB".to_string()),
            ]
            .into(),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> CheckoutResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckoutError::ConfigRead {
        path: path.to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_matches_documented_thresholds() {
        let config = CheckoutConfig::default_test();
        assert_eq!(config.fraud.high_value_threshold, 2000.0);
        assert_eq!(config.fraud.velocity_window_hours, 24);
        assert_eq!(config.fraud.velocity_max_orders, 3);
        assert!(config.payments.primary_card.mock_mode);
    }

    #[test]
    fn country_match_ignores_case_and_whitespace() {
        let config = CheckoutConfig::default_test();
        assert!(config.fraud.is_high_risk_country("kp"));
        assert!(config.fraud.is_high_risk_country(" KP "));
        assert!(!config.fraud.is_high_risk_country("US"));
    }

    #[test]
    fn bin_blocklist_is_exact_match() {
        let config = CheckoutConfig::default_test();
        assert!(config.fraud.is_blocked_bin("123456"));
        assert!(!config.fraud.is_blocked_bin("123457"));
    }
}
