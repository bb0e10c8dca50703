//! Measurement-and-aggregation loop shared by every workload.
//!
//! The harness owns the timing: inputs are prepared and reset outside the
//! timed region, each run is measured with a monotonic clock, and only the
//! per-size mean is kept once a size finishes.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BenchError;

pub const DEFAULT_NUM_RUNS: usize = 5;

/// A unit of work timed by [`run_benchmark`].
pub trait Workload {
    /// Called once per size before any run; never timed.
    fn prepare(&mut self, _size: usize) -> Result<()> {
        Ok(())
    }

    /// Called before every run; never timed. Restores whatever state the
    /// previous run consumed.
    fn reset(&mut self, _size: usize) -> Result<()> {
        Ok(())
    }

    /// The timed operation.
    fn run(&mut self, size: usize) -> Result<()>;
}

impl<F> Workload for F
where
    F: FnMut(usize) -> Result<()>,
{
    fn run(&mut self, size: usize) -> Result<()> {
        self(size)
    }
}

/// Progress hooks invoked while a benchmark is running.
pub trait RunObserver {
    fn on_size_start(&mut self, _size: usize) {}

    fn on_run(&mut self, _size: usize, _run: usize, _elapsed_secs: f64) {}

    fn on_size_complete(&mut self, _size: usize, _average_secs: f64, _num_runs: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTiming {
    pub size: usize,
    pub average_secs: f64,
}

/// Averaged timings, one entry per tested size in testing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkResult {
    entries: Vec<SizeTiming>,
}

impl BenchmarkResult {
    pub fn from_entries(entries: Vec<SizeTiming>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SizeTiming] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SizeTiming> {
        self.entries.iter()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.size).collect()
    }

    /// Average for `size`, first match wins when a size was tested twice.
    pub fn average_for(&self, size: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.size == size)
            .map(|entry| entry.average_secs)
    }
}

impl<'a> IntoIterator for &'a BenchmarkResult {
    type Item = &'a SizeTiming;
    type IntoIter = std::slice::Iter<'a, SizeTiming>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Rejects plans the harness refuses to start.
pub fn validate_plan(sizes: &[usize], num_runs: usize) -> Result<(), BenchError> {
    if sizes.is_empty() {
        return Err(BenchError::invalid_input("at least one input size is required"));
    }
    if let Some(pos) = sizes.iter().position(|&size| size == 0) {
        return Err(BenchError::invalid_input(format!(
            "input sizes must be positive (entry {} is 0)",
            pos
        )));
    }
    if num_runs < 1 {
        return Err(BenchError::invalid_input("num_runs must be at least 1"));
    }
    Ok(())
}

pub fn run_benchmark<W>(workload: &mut W, sizes: &[usize], num_runs: usize) -> Result<BenchmarkResult>
where
    W: Workload + ?Sized,
{
    run_benchmark_with(workload, sizes, num_runs, &mut NoopObserver)
}

/// Times `workload` for every size and averages `num_runs` runs per size.
///
/// Fails before the first run when the plan is invalid. A failing run aborts
/// the remaining sizes and is returned with the size and run attached.
pub fn run_benchmark_with<W, O>(
    workload: &mut W,
    sizes: &[usize],
    num_runs: usize,
    observer: &mut O,
) -> Result<BenchmarkResult>
where
    W: Workload + ?Sized,
    O: RunObserver + ?Sized,
{
    validate_plan(sizes, num_runs)?;

    let mut entries = Vec::with_capacity(sizes.len());
    for &size in sizes {
        observer.on_size_start(size);
        workload
            .prepare(size)
            .with_context(|| format!("prepare input for size {}", size))?;

        let mut total_secs = 0.0_f64;
        for run in 1..=num_runs {
            workload
                .reset(size)
                .with_context(|| format!("reset input before run {} for size {}", run, size))?;

            let start = Instant::now();
            let outcome = workload.run(size);
            let elapsed_secs = start.elapsed().as_secs_f64();
            outcome.with_context(|| format!("run {} of {} failed for size {}", run, num_runs, size))?;

            debug!(size, run, elapsed_secs, "benchmark run finished");
            observer.on_run(size, run, elapsed_secs);
            total_secs += elapsed_secs;
        }

        let average_secs = total_secs / num_runs as f64;
        info!(size, num_runs, average_secs, "benchmark size finished");
        observer.on_size_complete(size, average_secs, num_runs);
        entries.push(SizeTiming { size, average_secs });
    }

    Ok(BenchmarkResult { entries })
}
