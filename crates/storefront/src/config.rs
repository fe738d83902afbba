//! Storefront state configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `YASIRA_STATE_DIR` - Directory for persisted state files (default: .yasira)
//! - `YASIRA_STORAGE_NAMESPACE` - Prefix for storage keys (default: yasira)
//! - `YASIRA_CATALOG_PATH` - Product catalog JSON file (default: catalog.json)
//! - `YASIRA_COMPARE_CAPACITY` - Maximum products in the compare list (default: 4)
//! - `YASIRA_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 50.00)
//! - `YASIRA_FLAT_SHIPPING` - Shipping below the threshold (default: 5.99)
//! - `YASIRA_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.20)
//! - `YASIRA_CURRENCY` - ISO 4217 display currency (default: EUR)

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::PricingPolicy;
use crate::collections::DEFAULT_COMPARE_CAPACITY;
use crate::persistence::DEFAULT_NAMESPACE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront state configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one JSON file per storage key
    pub state_dir: PathBuf,
    /// Prefix for storage keys
    pub namespace: String,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Compare list bound
    pub compare_capacity: usize,
    /// Shipping, tax and currency rules
    pub pricing: PricingPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".yasira"),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            catalog_path: PathBuf::from("catalog.json"),
            compare_capacity: DEFAULT_COMPARE_CAPACITY,
            pricing: PricingPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed, or if a numeric value is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = Env(lookup);

        let compare_capacity = env.parse_or("YASIRA_COMPARE_CAPACITY", defaults.compare_capacity)?;
        if compare_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "YASIRA_COMPARE_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let pricing = PricingPolicy {
            free_shipping_threshold: env.parse_or(
                "YASIRA_FREE_SHIPPING_THRESHOLD",
                defaults.pricing.free_shipping_threshold,
            )?,
            flat_shipping: env.parse_or("YASIRA_FLAT_SHIPPING", defaults.pricing.flat_shipping)?,
            tax_rate: env.parse_or("YASIRA_TAX_RATE", defaults.pricing.tax_rate)?,
            currency: env.parse_or("YASIRA_CURRENCY", defaults.pricing.currency)?,
        };
        for (key, value) in [
            ("YASIRA_FREE_SHIPPING_THRESHOLD", pricing.free_shipping_threshold),
            ("YASIRA_FLAT_SHIPPING", pricing.flat_shipping),
            ("YASIRA_TAX_RATE", pricing.tax_rate),
        ] {
            validate_non_negative(key, value)?;
        }

        Ok(Self {
            state_dir: env
                .get_optional("YASIRA_STATE_DIR")
                .map_or(defaults.state_dir, PathBuf::from),
            namespace: env.get_or_default("YASIRA_STORAGE_NAMESPACE", &defaults.namespace),
            catalog_path: env
                .get_optional("YASIRA_CATALOG_PATH")
                .map_or(defaults.catalog_path, PathBuf::from),
            compare_capacity,
            pricing,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_owned())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get_optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Reject negative money amounts and rates.
fn validate_non_negative(key: &str, value: Decimal) -> Result<(), ConfigError> {
    if value.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use yasira_core::CurrencyCode;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StoreConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.compare_capacity, 4);
        assert_eq!(config.pricing.tax_rate, Decimal::new(20, 2));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("YASIRA_STATE_DIR", "/tmp/state"),
            ("YASIRA_STORAGE_NAMESPACE", "staging"),
            ("YASIRA_COMPARE_CAPACITY", "3"),
            ("YASIRA_FREE_SHIPPING_THRESHOLD", "75"),
            ("YASIRA_CURRENCY", "gbp"),
        ])
        .unwrap();

        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.compare_capacity, 3);
        assert_eq!(config.pricing.free_shipping_threshold, Decimal::new(75, 0));
        assert_eq!(config.pricing.currency, CurrencyCode::GBP);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = load(&[("YASIRA_STORAGE_NAMESPACE", "  ")]).unwrap();
        assert_eq!(config.namespace, "yasira");
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("YASIRA_COMPARE_CAPACITY", "four")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(key, _) if key == "YASIRA_COMPARE_CAPACITY"
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(load(&[("YASIRA_COMPARE_CAPACITY", "0")]).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = load(&[("YASIRA_TAX_RATE", "-0.1")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable YASIRA_TAX_RATE: must not be negative"
        );
    }
}
