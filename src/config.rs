use std::path::PathBuf;

use serde::Deserialize;

use crate::services::DiagnosisSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON bean catalog; the bundled catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Minimum stock on hand, in grams, for a bean to be recommended
    #[serde(default = "default_min_stock_grams")]
    pub min_stock_grams: u32,

    /// Maximum bean age in days tried first
    #[serde(default = "default_freshness_primary_days")]
    pub freshness_primary_days: i64,

    /// Maximum bean age in days when nothing is fresh enough for the primary window
    #[serde(default = "default_freshness_fallback_days")]
    pub freshness_fallback_days: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_min_stock_grams() -> u32 {
    150
}

fn default_freshness_primary_days() -> i64 {
    30
}

fn default_freshness_fallback_days() -> i64 {
    60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.freshness_primary_days < 0 {
            anyhow::bail!(
                "FRESHNESS_PRIMARY_DAYS must not be negative (got {})",
                self.freshness_primary_days
            );
        }
        if self.freshness_fallback_days < self.freshness_primary_days {
            anyhow::bail!(
                "FRESHNESS_FALLBACK_DAYS ({}) must be at least FRESHNESS_PRIMARY_DAYS ({})",
                self.freshness_fallback_days,
                self.freshness_primary_days
            );
        }
        Ok(())
    }

    /// Thresholds handed to the diagnosis engine
    pub fn diagnosis_settings(&self) -> DiagnosisSettings {
        DiagnosisSettings {
            min_stock_grams: self.min_stock_grams,
            primary_max_age_days: self.freshness_primary_days,
            fallback_max_age_days: self.freshness_fallback_days,
        }
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
