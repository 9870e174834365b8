use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::taxes::TaxEngine;

/// Tax regime selection: which region's brackets apply, and whether those
/// brackets are re-indexed each year by cumulative inflation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub adjust_brackets_with_inflation: bool,
}

fn default_country() -> String {
    "none".to_string()
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            region: String::new(),
            adjust_brackets_with_inflation: false,
        }
    }
}

impl TaxConfig {
    pub fn build(&self) -> Result<TaxEngine, ConfigError> {
        TaxEngine::new(&self.country, &self.region, self.adjust_brackets_with_inflation)
    }
}
