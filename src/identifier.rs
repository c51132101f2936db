//! Benchmark identifier grammar.
//!
//! Google Benchmark names encode what was measured. Two naming schemes appear in the
//! order book suites:
//!
//! ```text
//! flat:    BM_<operation tokens>_<implementation>/<size>
//! fixture: <fixture>/<operation>_<implementation>/<size>
//! ```
//!
//! The harness also emits summary rows (`BM_AddOrders_MapFifo_BigO`, `..._RMS`) whose
//! names share the same shape. Those are not samples and never parse.

use serde::{Deserialize, Serialize};

/// Separator between identifier segments.
pub const SEGMENT_DELIMITER: char = '/';

/// Leading token that selects the flat grammar. Also the fixture recorded for it.
pub const RESERVED_PREFIX: &str = "BM";

/// Suffixes of harness-computed growth-order and RMS summary rows.
pub const AGGREGATE_SUFFIXES: [&str; 2] = ["_BigO", "_RMS"];

/// The structured tuple recovered from a benchmark name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkId {
    pub fixture: String,
    pub operation: String,
    pub implementation: String,
    pub size: u64,
}

/// Naming scheme of an identifier, decided by its first base segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Flat,
    Fixture,
}

impl Grammar {
    pub fn classify(first_segment: &str) -> Self {
        if first_segment.starts_with(RESERVED_PREFIX) {
            Grammar::Flat
        } else {
            Grammar::Fixture
        }
    }

    /// Recover (fixture, operation, implementation) from the segments preceding the size.
    fn decode(self, base: &[&str]) -> Option<(String, String, String)> {
        match self {
            Grammar::Flat => parse_flat(base),
            Grammar::Fixture => parse_fixture(base),
        }
    }
}

/// Parse a benchmark name. `None` means the name is not a data sample.
pub fn parse_identifier(name: &str) -> Option<BenchmarkId> {
    let segments: Vec<&str> = name.split(SEGMENT_DELIMITER).collect();

    // Rightmost numeric segment wins; earlier segments may look numeric too.
    let size_index = segments.iter().rposition(|s| is_size_literal(s))?;
    let size: u64 = segments[size_index].parse().ok()?;
    if size == 0 {
        return None;
    }

    let base = &segments[..size_index];
    let first = base.first()?;

    let (fixture, operation, implementation) = Grammar::classify(first).decode(base)?;
    if operation.is_empty() || implementation.is_empty() {
        return None;
    }

    Some(BenchmarkId {
        fixture,
        operation,
        implementation,
        size,
    })
}

/// `BM_<operation tokens>_<implementation>`; later base segments are ignored.
pub fn parse_flat(base: &[&str]) -> Option<(String, String, String)> {
    let first = base.first()?;
    if is_aggregate(first) {
        return None;
    }

    let tokens: Vec<&str> = first.split('_').collect();
    if tokens.len() < 3 {
        return None;
    }

    let implementation = tokens[tokens.len() - 1];
    let operation = tokens[1..tokens.len() - 1].join("_");

    Some((
        RESERVED_PREFIX.to_string(),
        operation,
        implementation.to_string(),
    ))
}

/// `<fixture>/<operation>_<implementation...>`.
pub fn parse_fixture(base: &[&str]) -> Option<(String, String, String)> {
    let [fixture, op_impl, ..] = base else {
        return None;
    };
    if is_aggregate(op_impl) {
        return None;
    }

    let (operation, implementation) = op_impl.split_once('_')?;

    Some((
        fixture.to_string(),
        operation.to_string(),
        implementation.to_string(),
    ))
}

pub fn is_aggregate(segment: &str) -> bool {
    AGGREGATE_SUFFIXES
        .iter()
        .any(|suffix| segment.ends_with(suffix))
}

fn is_size_literal(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(fixture: &str, operation: &str, implementation: &str, size: u64) -> BenchmarkId {
        BenchmarkId {
            fixture: fixture.to_string(),
            operation: operation.to_string(),
            implementation: implementation.to_string(),
            size,
        }
    }

    #[test]
    fn test_fixture_grammar() {
        assert_eq!(
            parse_identifier("OrderBookFixture/AddOrders_JazzyVector/1024"),
            Some(id("OrderBookFixture", "AddOrders", "JazzyVector", 1024))
        );
    }

    #[test]
    fn test_fixture_grammar_keeps_underscores_in_implementation() {
        assert_eq!(
            parse_identifier("OrderBookFixture/MixedOps_Jazzy_Vector_Fifo/64"),
            Some(id("OrderBookFixture", "MixedOps", "Jazzy_Vector_Fifo", 64))
        );
    }

    #[test]
    fn test_flat_grammar() {
        assert_eq!(
            parse_identifier("BM_AddOrders_MapFifo/256"),
            Some(id("BM", "AddOrders", "MapFifo", 256))
        );
    }

    #[test]
    fn test_flat_grammar_joins_operation_tokens() {
        assert_eq!(
            parse_identifier("BM_Get_Level_Snapshot_JazzyVectorAggregate/8"),
            Some(id("BM", "Get_Level_Snapshot", "JazzyVectorAggregate", 8))
        );
    }

    #[test]
    fn test_aggregate_rows_rejected() {
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo_BigO"), None);
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo_RMS"), None);
        // Even with a trailing number the summary prefix disqualifies the row.
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo_BigO/4096"), None);
        assert_eq!(
            parse_identifier("OrderBookFixture/AddOrders_JazzyVector_RMS/16"),
            None
        );
    }

    #[test]
    fn test_rightmost_numeric_segment_is_size() {
        assert_eq!(
            parse_identifier("BM_AddOrders_MapFifo/8/1024"),
            Some(id("BM", "AddOrders", "MapFifo", 1024))
        );
        assert_eq!(
            parse_identifier("BM_AddOrders_MapFifo/512/real_time"),
            Some(id("BM", "AddOrders", "MapFifo", 512))
        );
    }

    #[test]
    fn test_missing_size_rejected() {
        assert_eq!(parse_identifier(""), None);
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo"), None);
        assert_eq!(parse_identifier("OrderBookFixture/AddOrders_JazzyVector"), None);
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo/-5"), None);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(parse_identifier("BM_AddOrders_MapFifo/0"), None);
    }

    #[test]
    fn test_empty_base_rejected() {
        assert_eq!(parse_identifier("1024"), None);
        assert_eq!(parse_identifier("1024/real_time"), None);
    }

    #[test]
    fn test_short_names_rejected() {
        // Flat grammar needs prefix, operation and implementation tokens.
        assert_eq!(parse_identifier("BM_AddOrders/64"), None);
        // Fixture grammar needs a second segment holding operation_implementation.
        assert_eq!(parse_identifier("OrderBookFixture/64"), None);
        assert_eq!(parse_identifier("OrderBookFixture/AddOrders/64"), None);
    }

    #[test]
    fn test_empty_tokens_rejected() {
        assert_eq!(parse_identifier("BM__MapFifo/64"), None);
        assert_eq!(parse_identifier("BM_AddOrders_/64"), None);
        assert_eq!(parse_identifier("OrderBookFixture/_JazzyVector/64"), None);
    }

    #[test]
    fn test_grammar_classification() {
        assert_eq!(Grammar::classify("BM_AddOrders_MapFifo"), Grammar::Flat);
        assert_eq!(Grammar::classify("BMFixture"), Grammar::Flat);
        assert_eq!(Grammar::classify("OrderBookFixture"), Grammar::Fixture);
    }
}
