use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::record::{
    display_implementation, operation_label, BenchmarkRecord, PartialRecord, DEFAULT_BUILD,
    DEFAULT_FIXTURE, DEFAULT_TIME_UNIT,
};

/// The canonical record set. Row order follows extractor output order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordTable {
    records: Vec<BenchmarkRecord>,
}

impl RecordTable {
    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkRecord> {
        self.records.iter()
    }

    /// Sorted, unique operation labels.
    pub fn operations(&self) -> Vec<String> {
        self.unique(|r| &r.operation_label)
    }

    pub fn implementations(&self) -> Vec<String> {
        self.unique(|r| &r.implementation)
    }

    pub fn builds(&self) -> Vec<String> {
        self.unique(|r| &r.build)
    }

    pub fn max_size(&self) -> Option<u64> {
        self.records.iter().map(|r| r.size).max()
    }

    /// An empty table is a terminal condition for callers, not "nothing to report".
    pub fn require_non_empty(&self) -> Result<&Self> {
        if self.is_empty() {
            Err(Error::NoRecords)
        } else {
            Ok(self)
        }
    }

    fn unique(&self, key: impl Fn(&BenchmarkRecord) -> &String) -> Vec<String> {
        self.records
            .iter()
            .map(|r| key(r).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a BenchmarkRecord;
    type IntoIter = std::slice::Iter<'a, BenchmarkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Apply defaults and derive label columns. Never drops a row.
pub fn normalize<I>(records: I) -> RecordTable
where
    I: IntoIterator<Item = PartialRecord>,
{
    RecordTable {
        records: records.into_iter().map(canonicalize).collect(),
    }
}

fn canonicalize(partial: PartialRecord) -> BenchmarkRecord {
    let fixture = partial
        .fixture
        .unwrap_or_else(|| DEFAULT_FIXTURE.to_string());
    let build = partial.build.unwrap_or_else(|| DEFAULT_BUILD.to_string());

    BenchmarkRecord {
        operation_label: operation_label(&fixture, &partial.operation),
        display_implementation: display_implementation(&partial.implementation, &build),
        fixture,
        operation: partial.operation,
        implementation: partial.implementation,
        size: partial.size,
        real_time: partial.real_time,
        real_time_unit: partial
            .real_time_unit
            .unwrap_or_else(|| DEFAULT_TIME_UNIT.to_string()),
        cpu_time: partial.cpu_time,
        cpu_time_unit: partial
            .cpu_time_unit
            .unwrap_or_else(|| DEFAULT_TIME_UNIT.to_string()),
        iterations: partial.iterations,
        build,
        source: partial.source,
    }
}
