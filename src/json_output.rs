//! JSON output format for result tables

use crate::table::TitledTable;
use serde::{Deserialize, Serialize};

/// Top-level JSON document for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Version of the stepwise binary that produced the report
    pub version: String,
    pub tables: Vec<TitledTable>,
}

impl JsonReport {
    pub fn new(tables: Vec<TitledTable>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tables,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
