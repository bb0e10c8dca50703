use std::path::{Path, PathBuf};
use std::sync::Once;

static SUBSCRIBER_INSTALLED: Once = Once::new();
/// Harness per-run events are `debug`; suite and export events are `info`.
const DEFAULT_TRACE_FILTER: &str = "warn,algobench_core::harness=debug,algobench_core=info,algobench_cli=info";

use algobench_core::{
    config::{SuiteConfig, parse_size_list},
    report::{compare, format_comparison, format_table, read_csv},
    suite::run_suite,
    workloads::WorkloadKind,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod console;

use console::ConsoleObserver;

#[derive(Debug, Parser)]
#[command(
    name = "algobench",
    author,
    version,
    about = "Time recursive Fibonacci, quicksort and naive matrix multiplication",
    long_about = None,
    args_conflicts_with_subcommands = true,
    after_help = "Without a subcommand the full suite runs with the given options."
)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the benchmark suite and write one CSV per workload.
    Run(RunArgs),
    /// Print a results CSV as a table.
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Compare two results CSVs size by size.
    Compare {
        #[arg(value_name = "BASELINE")]
        baseline: PathBuf,
        #[arg(value_name = "CANDIDATE")]
        candidate: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct RunArgs {
    /// Load settings from a TOML, YAML or JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Timed runs per input size
    #[arg(long, value_name = "N")]
    runs: Option<usize>,

    /// Directory receiving the CSV files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// File name prefix, e.g. `rust` -> rust_quicksort_results.csv
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Seed for input generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Comma separated workloads to run (quicksort, fibonacci, matrix_mult)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    only: Vec<WorkloadKind>,

    /// Comma separated array lengths for quicksort
    #[arg(long, value_name = "SIZES")]
    quicksort_sizes: Option<String>,

    /// Comma separated indices for fibonacci
    #[arg(long, value_name = "SIZES")]
    fibonacci_sizes: Option<String>,

    /// Comma separated matrix dimensions
    #[arg(long, value_name = "SIZES")]
    matrix_sizes: Option<String>,

    /// Also write a JSON record of the whole run
    #[arg(long)]
    json: bool,
}

/// What `ALGOBENCH_TRACE` asks for.
#[derive(Debug, PartialEq, Eq)]
enum TraceRequest {
    Off,
    /// `1`, `true` or `on`: `RUST_LOG` if set, else [`DEFAULT_TRACE_FILTER`].
    Default,
    /// Anything else is taken as an `EnvFilter` directive.
    Filter(String),
}

impl TraceRequest {
    fn parse(raw: &str) -> Self {
        let value = raw.trim();
        let is_any = |words: &[&str]| words.iter().any(|w| value.eq_ignore_ascii_case(w));
        if value.is_empty() || is_any(&["0", "false", "off"]) {
            TraceRequest::Off
        } else if is_any(&["1", "true", "on"]) {
            TraceRequest::Default
        } else {
            TraceRequest::Filter(value.to_string())
        }
    }
}

/// Installs a stderr subscriber when `ALGOBENCH_TRACE` is set. Stdout stays
/// reserved for the progress lines.
fn maybe_init_tracing() {
    let request = match std::env::var("ALGOBENCH_TRACE") {
        Ok(raw) => TraceRequest::parse(&raw),
        Err(_) => return,
    };
    if request == TraceRequest::Off {
        return;
    }

    SUBSCRIBER_INSTALLED.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = match request {
            TraceRequest::Off | TraceRequest::Default => std::env::var("RUST_LOG")
                .ok()
                .and_then(|expr| EnvFilter::try_new(expr).ok())
                .unwrap_or_else(|| EnvFilter::new(DEFAULT_TRACE_FILTER)),
            TraceRequest::Filter(expr) => EnvFilter::try_new(&expr).unwrap_or_else(|err| {
                eprintln!("ignoring ALGOBENCH_TRACE filter '{}': {}", expr, err);
                EnvFilter::new(DEFAULT_TRACE_FILTER)
            }),
        };

        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}

/// Config file (or defaults) with command line overrides applied on top.
fn build_config(args: &RunArgs) -> anyhow::Result<SuiteConfig> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };

    if let Some(runs) = args.runs {
        config.num_runs = runs;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.file_prefix = prefix.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.json {
        config.write_json = true;
    }

    let overrides = [
        (WorkloadKind::Quicksort, &args.quicksort_sizes, "--quicksort-sizes"),
        (WorkloadKind::Fibonacci, &args.fibonacci_sizes, "--fibonacci-sizes"),
        (WorkloadKind::Matrix, &args.matrix_sizes, "--matrix-sizes"),
    ];
    for (kind, raw, flag) in overrides {
        if let Some(raw) = raw {
            *config.sizes_for_mut(kind) = parse_size_list(raw).with_context(|| format!("parse {}", flag))?;
        }
    }

    if !args.only.is_empty() {
        config.restrict_to(&args.only);
    }

    Ok(config)
}

fn run_command(args: &RunArgs) -> anyhow::Result<()> {
    let config = build_config(args)?;
    tracing::debug!(?config, "resolved suite config");
    let mut console = ConsoleObserver::stdout();
    let outcome = run_suite(&config, &mut console)?;

    for path in &outcome.written {
        println!("Results saved to {}", path.display());
    }
    if let Some(path) = &outcome.json_path {
        println!("Run record saved to {}", path.display());
    }
    for err in &outcome.failed {
        eprintln!("Error: {}", err);
    }

    if outcome.failed.is_empty() {
        println!("\nAll benchmarks completed successfully.");
    } else {
        println!(
            "\nAll benchmarks completed; {} result file(s) could not be written.",
            outcome.failed.len()
        );
    }
    Ok(())
}

fn show_command(file: &Path) -> anyhow::Result<()> {
    let result = read_csv(file)?;
    print!("{}", format_table(&result));
    Ok(())
}

fn compare_command(baseline: &Path, candidate: &Path) -> anyhow::Result<()> {
    let base = read_csv(baseline)?;
    let cand = read_csv(candidate)?;
    let rows = compare(&base, &cand);
    if rows.is_empty() {
        anyhow::bail!(
            "{} and {} share no input sizes",
            baseline.display(),
            candidate.display()
        );
    }
    println!("Baseline:  {}", baseline.display());
    println!("Candidate: {}", candidate.display());
    print!("{}", format_comparison(&rows));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command, run } = CliArgs::parse();

    match command {
        None => run_command(&run),
        Some(Commands::Run(args)) => run_command(&args),
        Some(Commands::Show { file }) => show_command(&file),
        Some(Commands::Compare { baseline, candidate }) => compare_command(&baseline, &candidate),
    }
}
