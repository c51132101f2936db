use serde::{Deserialize, Serialize};

use crate::identifier::{BenchmarkId, RESERVED_PREFIX};

/// Fixture recorded when the naming grammar carries none.
pub const DEFAULT_FIXTURE: &str = RESERVED_PREFIX;
pub const DEFAULT_TIME_UNIT: &str = "ns";
pub const DEFAULT_BUILD: &str = "native";

/// Where a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Console,
    Structured,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Console => "console",
            Source::Structured => "structured",
        }
    }
}

/// A record as an extractor produces it. Optional fields are filled by
/// [`crate::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    pub fixture: Option<String>,
    pub operation: String,
    pub implementation: String,
    pub size: u64,

    pub real_time: f64,
    pub real_time_unit: Option<String>,
    pub cpu_time: f64,
    pub cpu_time_unit: Option<String>,
    pub iterations: u64,

    pub build: Option<String>,
    pub source: Source,
}

impl PartialRecord {
    /// Start a record from a parsed identifier with zeroed measurements.
    pub fn from_id(id: BenchmarkId, source: Source) -> Self {
        Self {
            fixture: Some(id.fixture),
            operation: id.operation,
            implementation: id.implementation,
            size: id.size,
            real_time: 0.0,
            real_time_unit: None,
            cpu_time: 0.0,
            cpu_time_unit: None,
            iterations: 0,
            build: None,
            source,
        }
    }
}

/// The canonical row consumed by analytics and the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub fixture: String,
    pub operation: String,
    pub implementation: String,
    pub size: u64,

    pub real_time: f64,
    pub real_time_unit: String,
    pub cpu_time: f64,
    pub cpu_time_unit: String,
    pub iterations: u64,

    pub build: String,
    pub source: Source,

    pub operation_label: String,
    pub display_implementation: String,
}

/// `fixture/operation`, or just `operation` for the sentinel fixture.
pub fn operation_label(fixture: &str, operation: &str) -> String {
    if fixture.is_empty() || fixture == DEFAULT_FIXTURE {
        operation.to_string()
    } else {
        format!("{fixture}/{operation}")
    }
}

pub fn display_implementation(implementation: &str, build: &str) -> String {
    format!("{implementation} ({build})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_label() {
        assert_eq!(operation_label("BM", "AddOrders"), "AddOrders");
        assert_eq!(
            operation_label("OrderBookFixture", "AddOrders"),
            "OrderBookFixture/AddOrders"
        );
    }

    #[test]
    fn test_display_implementation() {
        assert_eq!(
            display_implementation("MapFifo", "portable"),
            "MapFifo (portable)"
        );
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Source::Structured).unwrap(),
            "\"structured\""
        );
        assert_eq!(Source::Console.as_str(), "console");
    }
}
