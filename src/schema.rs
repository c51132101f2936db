use serde::{Deserialize, Serialize};

use crate::analysis::{
    build_ratios, per_operation_costs, summarize, CostTable, RatioSeries, Summary,
    BASELINE_BUILD, CANDIDATE_BUILD,
};
use crate::error::{Error, Result};
use crate::normalize::RecordTable;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    /// Human-readable description of where the records came from.
    pub source: String,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

impl RunMeta {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
            timestamp_utc: now_utc(),
            git_sha: git_sha_short(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub run: RunMeta,
    pub summary: Summary,
    pub records: RecordTable,
    pub build_ratios: Vec<RatioSeries>,
    pub per_operation_costs: Option<CostTable>,
}

impl IngestReport {
    /// Assemble the report. An empty table is refused.
    pub fn from_table(table: RecordTable, source: impl Into<String>) -> Result<Self> {
        table.require_non_empty()?;

        Ok(Self {
            run: RunMeta::new(source),
            summary: summarize(&table),
            build_ratios: build_ratios(&table, BASELINE_BUILD, CANDIDATE_BUILD),
            per_operation_costs: per_operation_costs(&table),
            records: table,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Report)
    }
}

fn now_utc() -> String {
    // Seconds since the epoch; enough to order reports without a date crate.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Set by CI or build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::extract_console;
    use crate::normalize::normalize;

    #[test]
    fn test_empty_table_refused() {
        let err = IngestReport::from_table(normalize(Vec::new()), "nothing").unwrap_err();
        assert!(matches!(err, Error::NoRecords));
    }

    #[test]
    fn test_report_json_shape() {
        let native = extract_console(
            ["BM_AddOrders_MapFifo/256   1000 ns   1000 ns   100"],
            "native",
        );
        let portable = extract_console(
            ["BM_AddOrders_MapFifo/256   1500 ns   1500 ns   100"],
            "portable",
        );
        let table = normalize(native.into_iter().chain(portable));

        let report = IngestReport::from_table(table, "unit test").unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["run"]["schema_version"], 1);
        assert_eq!(value["run"]["source"], "unit test");
        assert_eq!(value["summary"]["samples"], 2);
        assert_eq!(value["records"][1]["display_implementation"], "MapFifo (portable)");
        assert_eq!(value["records"][0]["source"], "console");
        assert_eq!(value["build_ratios"][0]["mean_ratio"], 1.5);
        assert_eq!(value["per_operation_costs"]["size"], 256);
    }
}
