//! Cross-implementation and cross-build comparisons over a [`RecordTable`].
//!
//! Only ratios and means; nothing here fits or tests anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::cost::per_operation_time;
use crate::normalize::RecordTable;
use crate::record::BenchmarkRecord;

pub const BASELINE_BUILD: &str = "native";
pub const CANDIDATE_BUILD: &str = "portable";

/// Scale a Google Benchmark time to nanoseconds. `None` for units it never emits.
pub fn to_nanos(value: f64, unit: &str) -> Option<f64> {
    let scale = match unit {
        "ns" => 1.0,
        "us" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        _ => return None,
    };
    Some(value * scale)
}

fn cpu_nanos(record: &BenchmarkRecord) -> Option<f64> {
    let nanos = to_nanos(record.cpu_time, &record.cpu_time_unit);
    if nanos.is_none() {
        tracing::debug!(
            operation = %record.operation_label,
            implementation = %record.implementation,
            unit = %record.cpu_time_unit,
            "unknown time unit, row left out of comparisons"
        );
    }
    nanos
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub samples: usize,
    pub operations: Vec<String>,
    pub implementations: Vec<String>,
    pub builds: Vec<String>,
}

pub fn summarize(table: &RecordTable) -> Summary {
    Summary {
        samples: table.len(),
        operations: table.operations(),
        implementations: table.implementations(),
        builds: table.builds(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    pub size: u64,
    pub ratio: f64,
}

/// Candidate-over-baseline CPU time for one implementation of one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSeries {
    pub operation_label: String,
    pub implementation: String,
    pub baseline: String,
    pub candidate: String,
    pub points: Vec<RatioPoint>,
    pub mean_ratio: f64,
}

/// Pair baseline and candidate rows on size and report `candidate / baseline` CPU time.
///
/// Only operation labels measured under both builds are considered. Duplicate sizes
/// pair every baseline row with every candidate row. Both sides are compared in
/// nanoseconds; rows in an unknown unit are left out. Ratios against a zero baseline
/// are dropped, and series left without points are omitted.
pub fn build_ratios(table: &RecordTable, baseline: &str, candidate: &str) -> Vec<RatioSeries> {
    let mut out = Vec::new();

    for label in table.operations() {
        let rows: Vec<&BenchmarkRecord> = table
            .iter()
            .filter(|r| r.operation_label == label)
            .collect();

        let builds: BTreeSet<&str> = rows.iter().map(|r| r.build.as_str()).collect();
        if !builds.contains(baseline) || !builds.contains(candidate) {
            continue;
        }

        let implementations: BTreeSet<&str> =
            rows.iter().map(|r| r.implementation.as_str()).collect();

        for implementation in implementations {
            let base_rows = rows_for(&rows, implementation, baseline);
            let cand_rows = rows_for(&rows, implementation, candidate);

            let mut points = Vec::new();
            for b in &base_rows {
                let Some(base) = cpu_nanos(b) else { continue };
                for c in cand_rows.iter().filter(|c| c.size == b.size) {
                    let Some(cand) = cpu_nanos(c) else { continue };
                    let ratio = cand / base;
                    if ratio.is_finite() {
                        points.push(RatioPoint {
                            size: b.size,
                            ratio,
                        });
                    }
                }
            }
            if points.is_empty() {
                continue;
            }
            points.sort_by_key(|p| p.size);

            let mean_ratio = points.iter().map(|p| p.ratio).sum::<f64>() / points.len() as f64;
            out.push(RatioSeries {
                operation_label: label.clone(),
                implementation: implementation.to_string(),
                baseline: baseline.to_string(),
                candidate: candidate.to_string(),
                points,
                mean_ratio,
            });
        }
    }

    out
}

fn rows_for<'a>(
    rows: &[&'a BenchmarkRecord],
    implementation: &str,
    build: &str,
) -> Vec<&'a BenchmarkRecord> {
    rows.iter()
        .copied()
        .filter(|r| r.implementation == implementation && r.build == build)
        .collect()
}

/// Per-operation CPU time of one implementation/build across all operation labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub implementation: String,
    pub build: String,
    /// Nanoseconds, aligned with [`CostTable::operations`]. `None` where nothing was
    /// measured or the row's unit is unknown.
    pub per_operation_cpu_time: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    pub size: u64,
    pub operations: Vec<String>,
    pub rows: Vec<CostRow>,
}

/// Per-operation CPU cost at the largest benchmarked size.
pub fn per_operation_costs(table: &RecordTable) -> Option<CostTable> {
    let size = table.max_size()?;
    let at_size: Vec<&BenchmarkRecord> = table.iter().filter(|r| r.size == size).collect();

    let operations: Vec<String> = at_size
        .iter()
        .map(|r| r.operation_label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let combos: BTreeSet<(&str, &str)> = at_size
        .iter()
        .map(|r| (r.implementation.as_str(), r.build.as_str()))
        .collect();

    let rows = combos
        .into_iter()
        .map(|(implementation, build)| {
            let per_operation_cpu_time = operations
                .iter()
                .map(|label| {
                    let row = at_size.iter().find(|r| {
                        r.implementation == implementation
                            && r.build == build
                            && &r.operation_label == label
                    })?;
                    per_operation_time(cpu_nanos(row)?, &row.operation, row.size)
                })
                .collect();
            CostRow {
                implementation: implementation.to_string(),
                build: build.to_string(),
                per_operation_cpu_time,
            }
        })
        .collect();

    Some(CostTable {
        size,
        operations,
        rows,
    })
}
