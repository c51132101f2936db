use clap::{Parser, Subcommand};
use jazzy_bench_ingest::best_runs::{load_best_runs, BestRunSources};
use jazzy_bench_ingest::cost::{operation_count_signed, CostClass};
use jazzy_bench_ingest::logging::init_tracing;
use jazzy_bench_ingest::schema::IngestReport;
use jazzy_bench_ingest::{load_file, normalize, runner, Error, InputFormat, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the benchmark executable, then ingest the JSON it writes.
    Run {
        #[arg(long, value_name = "FILE", default_value = "./build/benchmarks/benchmarks")]
        benchmark_path: PathBuf,

        /// Where the executable writes its JSON results.
        #[arg(long, value_name = "FILE", default_value = "./benchmark_results/benchmark_results.json")]
        json_out: PathBuf,

        /// Build variant label attached to every record.
        #[arg(long, default_value = "native")]
        build: String,
    },

    /// Ingest an existing result file.
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Input format; inferred from the extension when omitted (.json = json).
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        #[arg(long, default_value = "native")]
        build: String,
    },

    /// Ingest stored native and portable best runs.
    Best {
        /// Directory holding <key>_best.txt and <key>_portable_best.txt.
        #[arg(long, value_name = "DIR", default_value = "./benchmark_results")]
        results_dir: PathBuf,

        /// Hardware key used to locate the files (default: auto-detect).
        #[arg(long)]
        hardware_key: Option<String>,

        #[arg(long, value_name = "FILE")]
        native_best: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        portable_best: Option<PathBuf>,

        /// Helper that prints the hardware key.
        #[arg(long, value_name = "FILE", default_value = "./scripts/detect_hardware.sh")]
        detect_script: PathBuf,
    },

    /// Print the logical operation count used for per-operation costs.
    Cost {
        operation: String,

        /// Benchmark input size; zero or negative counts nothing.
        #[arg(allow_negative_numbers = true)]
        size: i64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "jazzy-bench-ingest")]
#[command(about = "Normalize order book benchmark output into a comparable record table (JSON output)")]
struct Args {
    /// Where to write the JSON report. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

fn write_stdout(stdout: &mut impl Write, text: &str) -> Result<()> {
    writeln!(stdout, "{text}").map_err(|e| Error::Io {
        path: PathBuf::from("<stdout>"),
        source: e,
    })
}

fn run(args: Args, stdout: &mut impl Write) -> Result<()> {
    let (records, source) = match args.cmd {
        Command::Run {
            benchmark_path,
            json_out,
            build,
        } => {
            ensure_parent_dir(&json_out)?;
            runner::run_benchmarks(&benchmark_path, &json_out)?;
            let records = load_file(&json_out, InputFormat::Json, &build)?;
            (records, json_out.display().to_string())
        }
        Command::Parse {
            input,
            format,
            build,
        } => {
            let format = format.unwrap_or_else(|| InputFormat::infer(&input));
            let records = load_file(&input, format, &build)?;
            (records, input.display().to_string())
        }
        Command::Best {
            results_dir,
            hardware_key,
            native_best,
            portable_best,
            detect_script,
        } => {
            let source = format!("best runs ({})", results_dir.display());
            let sources = BestRunSources {
                results_dir,
                native: native_best,
                portable: portable_best,
                hardware_key,
                detect_script: Some(detect_script),
            };
            (load_best_runs(&sources)?, source)
        }
        Command::Cost { operation, size } => {
            let line = format!(
                "{operation} @ {size}: {} logical operations ({:?})",
                operation_count_signed(&operation, size),
                CostClass::of(&operation)
            );
            return write_stdout(stdout, &line);
        }
    };

    let table = normalize(records);
    let report = IngestReport::from_table(table, source)?;
    tracing::info!(
        samples = report.summary.samples,
        operations = %report.summary.operations.join(", "),
        implementations = %report.summary.implementations.join(", "),
        builds = %report.summary.builds.join(", "),
        "loaded benchmark samples"
    );

    let json = report.to_json()?;
    if let Some(out) = args.out {
        ensure_parent_dir(&out)?;
        fs::write(&out, json).map_err(|e| Error::Io {
            path: out.clone(),
            source: e,
        })?;
        tracing::info!(report = %out.display(), "report written");
    } else {
        write_stdout(stdout, &json)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse(), &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
