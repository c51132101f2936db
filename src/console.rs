//! Extraction from Google Benchmark console output.
//!
//! Data rows look like
//!
//! ```text
//! BM_AddOrders_MapFifo/256        12345 ns        12340 ns        56789
//! ```
//!
//! Everything else (context banner, column header, separator rule, summary rows
//! without an iteration count) is noise and is skipped.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::identifier::parse_identifier;
use crate::record::{PartialRecord, Source};

static CONSOLE_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>\S+)\s+(?P<real>[\d.]+)\s+(?P<real_unit>\w+)\s+(?P<cpu>[\d.]+)\s+(?P<cpu_unit>\w+)\s+(?P<iterations>\d+)",
    )
    .ok()
});

/// Extract records from console lines in input order.
pub fn extract_console<I, S>(lines: I, build_label: &str) -> Vec<PartialRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_console_line(line.as_ref(), build_label))
        .collect()
}

/// Parse a single console line. `None` for noise, aggregate rows and bad names.
pub fn parse_console_line(line: &str, build_label: &str) -> Option<PartialRecord> {
    let line = line.trim();
    let caps = CONSOLE_LINE.as_ref()?.captures(line)?;

    let name = &caps["name"];
    let Some(id) = parse_identifier(name) else {
        tracing::trace!(benchmark = name, "skipping console row with unparsable name");
        return None;
    };

    let (Ok(real_time), Ok(cpu_time), Ok(iterations)) = (
        caps["real"].parse::<f64>(),
        caps["cpu"].parse::<f64>(),
        caps["iterations"].parse::<u64>(),
    ) else {
        tracing::trace!(line, "skipping console row with malformed numbers");
        return None;
    };

    let mut record = PartialRecord::from_id(id, Source::Console);
    record.real_time = real_time;
    record.real_time_unit = Some(caps["real_unit"].to_string());
    record.cpu_time = cpu_time;
    record.cpu_time_unit = Some(caps["cpu_unit"].to_string());
    record.iterations = iterations;
    record.build = Some(build_label.to_string());
    Some(record)
}

/// Read a console dump from disk. A missing file is an error; noise inside it is not.
pub fn parse_console_file(path: &Path, build_label: &str) -> Result<Vec<PartialRecord>> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let records = extract_console(text.lines(), build_label);
    tracing::debug!(
        path = %path.display(),
        build = build_label,
        records = records.len(),
        "parsed console results"
    );
    Ok(records)
}
