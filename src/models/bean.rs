use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::TasteVector;

/// Roast level of a bean (descriptive only, not used in matching)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoastLevel {
    Light,
    Medium,
    Dark,
}

/// Processing method of a bean (descriptive only, not used in matching)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    Washed,
    Natural,
    Honey,
}

/// A coffee bean SKU in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bean {
    /// Unique SKU identifier (e.g., "SKU-001")
    pub sku_id: String,
    /// Name of the roaster
    pub roaster_name: String,
    /// Display name of the bean
    pub bean_name: String,
    /// Taste attributes, each on the 1-5 scale
    #[serde(flatten)]
    pub profile: TasteVector,
    pub roast_level: RoastLevel,
    pub process: Process,
    /// Stock on hand in grams
    pub stock_grams: u32,
    /// Roast date, taken as midnight UTC
    pub roast_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Bean {
    /// The instant the bean was roasted
    pub fn roasted_at(&self) -> DateTime<Utc> {
        self.roast_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Roaster and bean name joined for display
    pub fn display_name(&self) -> String {
        format!("{} {}", self.roaster_name, self.bean_name)
    }
}
