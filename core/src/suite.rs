//! Runs every enabled workload from a [`SuiteConfig`] and exports the tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use crate::config::SuiteConfig;
use crate::error::BenchError;
use crate::harness::{BenchmarkResult, RunObserver, Workload, run_benchmark_with};
use crate::input::InputGenerator;
use crate::report::{CategoryRecord, RunRecord, write_csv, write_json};
use crate::workloads::{FibonacciWorkload, MatrixWorkload, QuicksortWorkload, WorkloadKind};

/// Observer that also hears when a whole workload starts.
pub trait SuiteObserver: RunObserver {
    fn on_workload_start(&mut self, _kind: WorkloadKind) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSuite;

impl RunObserver for SilentSuite {}

impl SuiteObserver for SilentSuite {}

#[derive(Debug)]
pub struct CategoryOutcome {
    pub kind: WorkloadKind,
    pub results: BenchmarkResult,
    pub csv_path: PathBuf,
}

#[derive(Debug, Default)]
pub struct SuiteOutcome {
    pub categories: Vec<CategoryOutcome>,
    /// CSV files successfully written.
    pub written: Vec<PathBuf>,
    /// Exports that failed; the matching file is absent.
    pub failed: Vec<BenchError>,
    pub json_path: Option<PathBuf>,
}

impl SuiteOutcome {
    pub fn results_for(&self, kind: WorkloadKind) -> Option<&BenchmarkResult> {
        self.categories
            .iter()
            .find(|category| category.kind == kind)
            .map(|category| &category.results)
    }
}

/// Builds the workload for `kind`, each with its own generator derived from
/// the suite seed so runs stay reproducible per category.
pub fn build_workload(config: &SuiteConfig, kind: WorkloadKind) -> Box<dyn Workload> {
    let generator = InputGenerator::from_seed(config.seed.map(|seed| seed.wrapping_add(kind as u64)));
    match kind {
        WorkloadKind::Quicksort => Box::new(QuicksortWorkload::with_range(
            generator,
            config.quicksort.min_value,
            config.quicksort.max_value,
        )),
        WorkloadKind::Fibonacci => Box::new(FibonacciWorkload),
        WorkloadKind::Matrix => Box::new(MatrixWorkload::new(generator)),
    }
}

/// Runs all benchmarks first, then exports. A failed export is logged and
/// recorded without stopping the others; a failed workload aborts the suite.
pub fn run_suite<O>(config: &SuiteConfig, observer: &mut O) -> Result<SuiteOutcome>
where
    O: SuiteObserver + ?Sized,
{
    config.validate()?;

    let mut outcome = SuiteOutcome::default();
    for kind in config.enabled_workloads() {
        observer.on_workload_start(kind);
        info!(workload = kind.name(), runs = config.num_runs, "starting benchmark");
        let mut workload = build_workload(config, kind);
        let results = run_benchmark_with(workload.as_mut(), config.sizes_for(kind), config.num_runs, observer)
            .with_context(|| format!("{} benchmark failed", kind.title()))?;
        outcome.categories.push(CategoryOutcome {
            kind,
            results,
            csv_path: config.csv_path(kind),
        });
    }

    for category in &outcome.categories {
        match write_csv(&category.results, &category.csv_path) {
            Ok(()) => {
                info!(path = %category.csv_path.display(), "results saved");
                outcome.written.push(category.csv_path.clone());
            }
            Err(err) => {
                error!(workload = category.kind.name(), error = %err, "failed to save results");
                outcome.failed.push(err);
            }
        }
    }

    if config.write_json {
        let mut record = RunRecord::new(Utc::now(), config.num_runs, config.seed);
        record.categories = outcome
            .categories
            .iter()
            .map(|category| CategoryRecord {
                workload: category.kind,
                results: category.results.clone(),
            })
            .collect();
        let path = config.json_path();
        match write_json(&path, &record) {
            Ok(()) => outcome.json_path = Some(path),
            Err(err) => {
                error!(path = %path.display(), error = %format!("{:#}", err), "failed to save run record");
                let source = err
                    .downcast::<std::io::Error>()
                    .unwrap_or_else(|e| std::io::Error::other(format!("{:#}", e)));
                outcome.failed.push(BenchError::io(path, source));
            }
        }
    }

    Ok(outcome)
}
