//! Blocking calls into external tools: the benchmark executable and the
//! hardware-detection helper. No retries and no timeouts of our own.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Run the benchmark executable, asking it to write JSON results to `output_json`.
pub fn run_benchmarks(executable: &Path, output_json: &Path) -> Result<()> {
    tracing::info!(executable = %executable.display(), "running benchmarks");

    let output = Command::new(executable)
        .arg("--benchmark_format=json")
        .arg(format!("--benchmark_out={}", output_json.display()))
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ExecutableNotFound {
                path: executable.to_path_buf(),
            },
            _ => Error::io(executable, e),
        })?;

    if !output.status.success() {
        return Err(Error::BenchmarkFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::info!(results = %output_json.display(), "benchmarks completed");
    Ok(())
}

/// Run the hardware-detection helper and return the key it prints.
pub fn detect_hardware_key(helper: &Path) -> Result<String> {
    if !helper.exists() {
        return Err(Error::HardwareDetection {
            reason: format!("helper not found at {}", helper.display()),
        });
    }

    let output = Command::new(helper)
        .output()
        .map_err(|e| Error::HardwareDetection {
            reason: format!("could not run {}: {e}", helper.display()),
        })?;

    if !output.status.success() {
        return Err(Error::HardwareDetection {
            reason: format!("{} exited with {}", helper.display(), output.status),
        });
    }

    let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if key.is_empty() {
        return Err(Error::HardwareDetection {
            reason: format!("{} printed no key", helper.display()),
        });
    }

    tracing::debug!(key = %key, "detected hardware key");
    Ok(key)
}

/// Held by tests that write a script and then exec it. A child forked by another test
/// thread while the script is still open for writing makes the exec fail with
/// `ETXTBSY`.
#[cfg(test)]
pub(crate) static SPAWN_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn spawn_guard() -> std::sync::MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_missing_executable() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let err = run_benchmarks(&dir.path().join("benchmarks"), &dir.path().join("out.json"))
            .unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_missing_helper() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let err = detect_hardware_key(&dir.path().join("detect_hardware.sh")).unwrap_err();
        assert!(matches!(err, Error::HardwareDetection { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_benchmark_receives_output_flags() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.json");
        // Stand-in executable: write the --benchmark_out target like Google Benchmark would.
        let exe = write_script(
            dir.path(),
            "benchmarks",
            r#"[ "$1" = "--benchmark_format=json" ] || exit 3
echo '{"benchmarks": []}' > "${2#--benchmark_out=}""#,
        );

        run_benchmarks(&exe, &out).unwrap();
        assert!(out.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_benchmark_failure_reports_stderr() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let exe = write_script(dir.path(), "benchmarks", "echo boom >&2\nexit 2");

        match run_benchmarks(&exe, &dir.path().join("out.json")) {
            Err(Error::BenchmarkFailed { status, stderr }) => {
                assert_eq!(status.code(), Some(2));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected BenchmarkFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_hardware_key() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let helper = write_script(dir.path(), "detect_hardware.sh", "echo '  zen4_16c  '");
        assert_eq!(detect_hardware_key(&helper).unwrap(), "zen4_16c");
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_hardware_key_rejects_empty_and_failure() {
        let _guard = spawn_guard();
        let dir = tempdir().unwrap();
        let silent = write_script(dir.path(), "silent.sh", "exit 0");
        assert!(matches!(
            detect_hardware_key(&silent),
            Err(Error::HardwareDetection { .. })
        ));

        let failing = write_script(dir.path(), "failing.sh", "echo key\nexit 1");
        assert!(matches!(
            detect_hardware_key(&failing),
            Err(Error::HardwareDetection { .. })
        ));
    }
}
