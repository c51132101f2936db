//! Extraction from Google Benchmark JSON output (`--benchmark_format=json`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::identifier::parse_identifier;
use crate::record::{PartialRecord, Source, DEFAULT_TIME_UNIT};

/// `run_type` of an individual sample. Aggregates (mean, median, stddev, BigO, RMS)
/// carry `"aggregate"`.
pub const SAMPLE_RUN_TYPE: &str = "iteration";

/// One element of the `benchmarks` array. Every field is optional; absent timings
/// default to zero nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub run_type: Option<String>,
    #[serde(default)]
    pub real_time: Option<f64>,
    #[serde(default)]
    pub cpu_time: Option<f64>,
    #[serde(default)]
    pub time_unit: Option<String>,
    #[serde(default)]
    pub iterations: Option<u64>,
}

impl DumpEntry {
    pub fn is_sample(&self) -> bool {
        self.run_type.as_deref() == Some(SAMPLE_RUN_TYPE)
    }
}

/// Top-level dump. Entries stay untyped until [`parse_dump`] decodes them one by one,
/// so a single malformed entry cannot sink the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
struct Dump {
    #[serde(default)]
    benchmarks: Vec<serde_json::Value>,
}

/// Extract records from already-decoded entries, in input order.
pub fn extract_structured(entries: &[DumpEntry], build_label: &str) -> Vec<PartialRecord> {
    entries
        .iter()
        .filter_map(|entry| entry_to_record(entry, build_label))
        .collect()
}

fn entry_to_record(entry: &DumpEntry, build_label: &str) -> Option<PartialRecord> {
    if !entry.is_sample() {
        return None;
    }

    let name = entry.name.as_deref().filter(|n| !n.is_empty())?;
    let Some(id) = parse_identifier(name) else {
        tracing::debug!(benchmark = name, "skipping entry with unparsable name");
        return None;
    };

    let unit = entry
        .time_unit
        .clone()
        .unwrap_or_else(|| DEFAULT_TIME_UNIT.to_string());

    let mut record = PartialRecord::from_id(id, Source::Structured);
    record.real_time = entry.real_time.unwrap_or(0.0);
    record.real_time_unit = Some(unit.clone());
    record.cpu_time = entry.cpu_time.unwrap_or(0.0);
    record.cpu_time_unit = Some(unit);
    record.iterations = entry.iterations.unwrap_or(0);
    record.build = Some(build_label.to_string());
    Some(record)
}

/// Decode a JSON dump. Only a document that is not a JSON object with an optional
/// `benchmarks` array is an error.
pub fn parse_dump(text: &str, build_label: &str) -> Result<Vec<PartialRecord>> {
    let dump: Dump = serde_json::from_str(text).map_err(Error::MalformedDump)?;

    let entries: Vec<DumpEntry> = dump
        .benchmarks
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(index, error = %err, "skipping malformed benchmark entry");
                None
            }
        })
        .collect();

    Ok(extract_structured(&entries, build_label))
}

/// Read and decode a JSON dump from disk.
pub fn load_dump_file(path: &Path, build_label: &str) -> Result<Vec<PartialRecord>> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let records = parse_dump(&text, build_label)?;
    tracing::debug!(
        path = %path.display(),
        build = build_label,
        records = records.len(),
        "parsed structured results"
    );
    Ok(records)
}
