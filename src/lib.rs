//! Ingest Google Benchmark output from the order book suites into a canonical
//! record table for cross-implementation and cross-build comparison.
//!
//! ```text
//! console text ─► console::extract_console ─┐
//!                                           ├─► normalize::normalize ─► RecordTable ─► analysis
//! JSON dump ───► structured::parse_dump ────┘
//! ```

use clap::ValueEnum;
use std::path::Path;

pub mod analysis;
pub mod best_runs;
pub mod console;
pub mod cost;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod runner;
pub mod schema;
pub mod structured;

pub use error::{Error, Result};
pub use identifier::{parse_identifier, BenchmarkId};
pub use normalize::{normalize, RecordTable};
pub use record::{BenchmarkRecord, PartialRecord, Source};

/// Shape of a benchmark result file.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum InputFormat {
    /// `--benchmark_format=json` output.
    Json,
    /// Human-readable console output, e.g. stored best runs.
    Console,
}

impl InputFormat {
    /// `.json` files are structured dumps; anything else is treated as console text.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Console,
        }
    }
}

/// Load one result file into partial records.
pub fn load_file(path: &Path, format: InputFormat, build_label: &str) -> Result<Vec<PartialRecord>> {
    match format {
        InputFormat::Json => structured::load_dump_file(path, build_label),
        InputFormat::Console => console::parse_console_file(path, build_label),
    }
}
