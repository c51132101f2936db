//! Logical operation counts per benchmark run.
//!
//! A benchmark reports the time for the whole run, but runs of different operations
//! do different amounts of work for the same input size. Dividing by the logical
//! operation count gives a per-operation cost that can be compared across operations.

/// Price levels visited per side by the level and snapshot benchmarks.
pub const LEVEL_CAP: u64 = 20;

/// How an operation's work scales with the benchmark input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostClass {
    /// One logical operation per input element.
    Linear,
    /// One bid probe and one ask probe per tick.
    BidAskProbe,
    /// At most [`LEVEL_CAP`] levels on each of the bid and ask sides.
    CappedLevels,
}

impl CostClass {
    pub fn of(operation: &str) -> Self {
        match operation {
            "VolumeLookup" => CostClass::BidAskProbe,
            "GetLevelSnapshot" | "GetOrderAtLevel" | "FrontOrderPeek" => CostClass::CappedLevels,
            // AddOrders, UpdateOrders, DeleteOrders, MixedOps and anything unknown.
            _ => CostClass::Linear,
        }
    }

    pub fn count(self, size: u64) -> u64 {
        match self {
            CostClass::Linear => size,
            CostClass::BidAskProbe => size.saturating_mul(2),
            CostClass::CappedLevels => size.min(LEVEL_CAP) * 2,
        }
    }
}

/// Number of logical operations a run of `operation` at `size` performs.
pub fn operation_count(operation: &str, size: u64) -> u64 {
    CostClass::of(operation).count(size)
}

/// [`operation_count`] for sizes typed in by hand; zero and negative sizes count nothing.
pub fn operation_count_signed(operation: &str, size: i64) -> u64 {
    u64::try_from(size).map_or(0, |size| operation_count(operation, size))
}

/// Divide an aggregate time by the logical operation count. `None` when the run
/// performs no operations.
pub fn per_operation_time(total: f64, operation: &str, size: u64) -> Option<f64> {
    match operation_count(operation, size) {
        0 => None,
        count => Some(total / count as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_operations() {
        assert_eq!(operation_count("AddOrders", 0), 0);
        assert_eq!(operation_count("AddOrders", 500), 500);
        assert_eq!(operation_count("UpdateOrders", 64), 64);
        assert_eq!(operation_count("DeleteOrders", 64), 64);
        assert_eq!(operation_count("MixedOps", 7), 7);
    }

    #[test]
    fn test_volume_lookup_probes_both_sides() {
        assert_eq!(operation_count("VolumeLookup", 100), 200);
    }

    #[test]
    fn test_level_operations_are_capped() {
        assert_eq!(operation_count("GetOrderAtLevel", 5), 10);
        assert_eq!(operation_count("GetOrderAtLevel", 1000), 40);
        assert_eq!(operation_count("GetLevelSnapshot", 20), 40);
        assert_eq!(operation_count("FrontOrderPeek", 21), 40);
    }

    #[test]
    fn test_unknown_operation_falls_back_to_size() {
        assert_eq!(operation_count("Rebalance", 300), 300);
    }

    #[test]
    fn test_non_positive_size_is_zero() {
        for op in ["AddOrders", "VolumeLookup", "GetOrderAtLevel", "Rebalance"] {
            assert_eq!(operation_count(op, 0), 0);
            assert_eq!(operation_count_signed(op, 0), 0);
            assert_eq!(operation_count_signed(op, -4), 0);
            assert_eq!(operation_count_signed(op, i64::MIN), 0);
        }
    }

    #[test]
    fn test_sizes_beyond_signed_range() {
        let size = i64::MAX as u64 + 1;
        assert_eq!(operation_count("AddOrders", size), size);
        assert_eq!(operation_count("VolumeLookup", u64::MAX), u64::MAX);
        assert_eq!(operation_count("FrontOrderPeek", size), 40);
        assert_eq!(operation_count_signed("AddOrders", i64::MAX), i64::MAX as u64);
        assert_eq!(
            per_operation_time(1000.0, "AddOrders", size),
            Some(1000.0 / size as f64)
        );
    }

    #[test]
    fn test_per_operation_time() {
        assert_eq!(per_operation_time(4000.0, "VolumeLookup", 100), Some(20.0));
        assert_eq!(per_operation_time(4000.0, "GetOrderAtLevel", 4096), Some(100.0));
        assert_eq!(per_operation_time(4000.0, "AddOrders", 0), None);
    }
}
