use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::{Axis, Bean};

const BUILTIN_CATALOG: &str = include_str!("../../data/beans.json");

/// Errors raised while loading a bean catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{sku_id}: {axis} value {value} is outside 1-5")]
    AttributeOutOfRange { sku_id: String, axis: Axis, value: u8 },

    #[error("Duplicate SKU id: {0}")]
    DuplicateSku(String),
}

/// Immutable, validated list of beans in catalog order
#[derive(Debug, Clone)]
pub struct Catalog {
    beans: Vec<Bean>,
}

impl Catalog {
    /// Validates a list of beans. Every axis must be within 1-5 and SKU ids must be unique.
    pub fn from_beans(beans: Vec<Bean>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for bean in &beans {
            if let Some((axis, value)) = bean.profile.out_of_range_axis() {
                return Err(CatalogError::AttributeOutOfRange {
                    sku_id: bean.sku_id.clone(),
                    axis,
                    value,
                });
            }
            if !seen.insert(bean.sku_id.as_str()) {
                return Err(CatalogError::DuplicateSku(bean.sku_id.clone()));
            }
        }
        Ok(Self { beans })
    }

    /// Parses a JSON array of beans
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let beans: Vec<Bean> = serde_json::from_str(json)?;
        Self::from_beans(beans)
    }

    /// Loads a catalog from a JSON file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            beans = catalog.len(),
            "Loaded bean catalog"
        );
        Ok(catalog)
    }

    /// The catalog bundled with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn beans(&self) -> &[Bean] {
        &self.beans
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    pub fn get(&self, sku_id: &str) -> Option<&Bean> {
        self.beans.iter().find(|b| b.sku_id == sku_id)
    }
}
