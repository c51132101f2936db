//! Stored best-run console outputs for native and portable builds.
//!
//! A results directory holds one pair of files per machine class:
//!
//! ```text
//! <hardware-key>_best.txt            native build
//! <hardware-key>_portable_best.txt   portable build
//! ```

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::console::parse_console_file;
use crate::error::{Error, Result};
use crate::record::PartialRecord;
use crate::runner::detect_hardware_key;

pub const NATIVE_BUILD: &str = "native";
pub const PORTABLE_BUILD: &str = "portable";

const NATIVE_SUFFIX: &str = "_best.txt";
const PORTABLE_SUFFIX: &str = "_portable_best.txt";

/// Where to look for best-run files.
#[derive(Clone, Debug, Default)]
pub struct BestRunSources {
    pub results_dir: PathBuf,
    /// Explicit native file; together with `portable` this bypasses key resolution.
    pub native: Option<PathBuf>,
    pub portable: Option<PathBuf>,
    pub hardware_key: Option<String>,
    /// Helper printing the hardware key when none is given.
    pub detect_script: Option<PathBuf>,
}

pub fn native_file_name(key: &str) -> String {
    format!("{key}{NATIVE_SUFFIX}")
}

pub fn portable_file_name(key: &str) -> String {
    format!("{key}{PORTABLE_SUFFIX}")
}

impl BestRunSources {
    /// Resolve (build label, path) pairs in native, portable order.
    pub fn resolve(&self) -> Result<Vec<(&'static str, PathBuf)>> {
        let explicit: Vec<(&'static str, PathBuf)> = [
            (NATIVE_BUILD, self.native.as_ref()),
            (PORTABLE_BUILD, self.portable.as_ref()),
        ]
        .into_iter()
        .filter_map(|(build, path)| path.map(|p| (build, p.clone())))
        .collect();
        if !explicit.is_empty() {
            return Ok(explicit);
        }

        let key = self.resolve_key()?;
        Ok(vec![
            (NATIVE_BUILD, self.results_dir.join(native_file_name(&key))),
            (PORTABLE_BUILD, self.results_dir.join(portable_file_name(&key))),
        ])
    }

    /// Explicit key, then the detection helper, then a lone `*_best.txt` in the
    /// results directory.
    pub fn resolve_key(&self) -> Result<String> {
        if let Some(key) = &self.hardware_key {
            return Ok(key.clone());
        }

        if let Some(script) = &self.detect_script {
            match detect_hardware_key(script) {
                Ok(key) => return Ok(key),
                Err(err) => tracing::debug!(error = %err, "falling back to results directory scan"),
            }
        }

        let mut candidates = native_candidates(&self.results_dir);
        if candidates.len() == 1 {
            if let Some(key) = candidates.pop() {
                return Ok(key);
            }
        }
        Err(Error::HardwareKeyUnresolved)
    }
}

/// Keys of `<key>_best.txt` files directly inside `dir`, sorted.
fn native_candidates(dir: &Path) -> Vec<String> {
    let mut keys: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            if name.ends_with(PORTABLE_SUFFIX) {
                return None;
            }
            name.strip_suffix(NATIVE_SUFFIX).map(str::to_string)
        })
        .collect();
    keys.sort();
    keys
}

/// Load every resolvable best-run file. Missing or empty files are skipped with a
/// warning; loading nothing at all is an error.
pub fn load_best_runs(sources: &BestRunSources) -> Result<Vec<PartialRecord>> {
    let mut records = Vec::new();

    for (build, path) in sources.resolve()? {
        if !path.exists() {
            tracing::warn!(build, path = %path.display(), "skipping missing best results");
            continue;
        }

        let parsed = parse_console_file(&path, build)?;
        if parsed.is_empty() {
            tracing::warn!(build, path = %path.display(), "no benchmark data parsed");
            continue;
        }

        tracing::info!(build, path = %path.display(), records = parsed.len(), "loaded best results");
        records.extend(parsed);
    }

    if records.is_empty() {
        return Err(Error::NoBestRuns);
    }
    Ok(records)
}
