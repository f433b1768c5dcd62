//! Application configuration.
//!
//! Every setting has a built-in default and may be overridden through a
//! `MEDIMART_*` environment variable. A value that is present but malformed
//! is an error rather than a silent fallback.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use medimart_ai::{DEFAULT_GEMINI_MODEL, GeminiConfig};
use medimart_auth::SESSION_STORAGE_KEY;
use medimart_core::Money;
use medimart_orders::{DEFAULT_FREE_DELIVERY_THRESHOLD, PricingPolicy};

pub const DEFAULT_DELIVERY_CHARGE: i64 = 250;
pub const DEFAULT_BUSINESS_NAME: &str = "MediMart Pro (Harsh Enterprises)";
pub const DEFAULT_LOGO_URL: &str = "https://cdn-icons-png.flaticon.com/512/822/822118.png";

pub const ENV_BUSINESS_NAME: &str = "MEDIMART_BUSINESS_NAME";
pub const ENV_LOGO_URL: &str = "MEDIMART_LOGO_URL";
pub const ENV_FREE_DELIVERY_THRESHOLD: &str = "MEDIMART_FREE_DELIVERY_THRESHOLD";
pub const ENV_DEFAULT_DELIVERY_CHARGE: &str = "MEDIMART_DEFAULT_DELIVERY_CHARGE";
pub const ENV_SESSION_PATH: &str = "MEDIMART_SESSION_PATH";
pub const ENV_GEMINI_API_KEY: &str = "MEDIMART_GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "MEDIMART_GEMINI_MODEL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub business_name: String,
    pub logo_url: String,
    pub free_delivery_threshold: Money,
    /// Charge offered to staff when accepting an order below the threshold.
    pub default_delivery_charge: Money,
    pub session_path: PathBuf,
    /// `None` leaves the assistant unconfigured; every query then gets the
    /// fallback reply.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            free_delivery_threshold: Money::from_units(DEFAULT_FREE_DELIVERY_THRESHOLD),
            default_delivery_charge: Money::from_units(DEFAULT_DELIVERY_CHARGE),
            session_path: PathBuf::from(format!("{SESSION_STORAGE_KEY}.json")),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (blank values count as unset).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get(ENV_BUSINESS_NAME) {
            config.business_name = v;
        }
        if let Some(v) = get(ENV_LOGO_URL) {
            config.logo_url = v;
        }
        if let Some(v) = get(ENV_FREE_DELIVERY_THRESHOLD) {
            config.free_delivery_threshold = parse_amount(ENV_FREE_DELIVERY_THRESHOLD, &v)?;
        }
        if let Some(v) = get(ENV_DEFAULT_DELIVERY_CHARGE) {
            config.default_delivery_charge = parse_amount(ENV_DEFAULT_DELIVERY_CHARGE, &v)?;
        }
        if let Some(v) = get(ENV_SESSION_PATH) {
            config.session_path = PathBuf::from(v);
        }
        config.gemini_api_key = get(ENV_GEMINI_API_KEY);
        if let Some(v) = get(ENV_GEMINI_MODEL) {
            config.gemini_model = v;
        }

        Ok(config)
    }

    pub fn pricing(&self) -> PricingPolicy {
        PricingPolicy::new(self.free_delivery_threshold)
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig::new(self.gemini_api_key.clone().unwrap_or_default())
            .with_model(self.gemini_model.clone())
    }
}

fn parse_amount(key: &'static str, value: &str) -> Result<Money, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    };

    let amount = Money::from_str(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if amount.is_negative() {
        return Err(invalid("amount cannot be negative".to_string()));
    }
    Ok(amount)
}
