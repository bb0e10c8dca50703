use std::io::{self, Write};

use algobench_core::{harness::RunObserver, suite::SuiteObserver, workloads::WorkloadKind};

/// Prints per-run and per-size progress as the suite advances.
///
/// Write failures are ignored; losing progress output must not abort a run.
pub(crate) struct ConsoleObserver<W: Write> {
    out: W,
    kind: Option<WorkloadKind>,
}

impl ConsoleObserver<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, kind: None }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

fn testing_label(kind: Option<WorkloadKind>, size: usize) -> String {
    match kind {
        Some(WorkloadKind::Quicksort) => format!("Testing array size {}...", size),
        Some(WorkloadKind::Fibonacci) => format!("Testing Fibonacci({})...", size),
        Some(WorkloadKind::Matrix) => format!("Testing Matrix Size {0}x{0}...", size),
        None => format!("Testing size {}...", size),
    }
}

impl<W: Write> RunObserver for ConsoleObserver<W> {
    fn on_size_start(&mut self, size: usize) {
        let _ = writeln!(self.out, "{}", testing_label(self.kind, size));
    }

    fn on_run(&mut self, _size: usize, run: usize, elapsed_secs: f64) {
        let _ = writeln!(self.out, "  Run {}: {:.6} seconds", run, elapsed_secs);
    }

    fn on_size_complete(&mut self, size: usize, average_secs: f64, num_runs: usize) {
        let label = match self.kind {
            Some(kind) => kind.describe_size(size),
            None => format!("Size {}", size),
        };
        let _ = writeln!(
            self.out,
            "{}: Average {:.6} seconds over {} runs",
            label, average_secs, num_runs
        );
        let _ = self.out.flush();
    }
}

impl<W: Write> SuiteObserver for ConsoleObserver<W> {
    fn on_workload_start(&mut self, kind: WorkloadKind) {
        self.kind = Some(kind);
        let _ = writeln!(self.out, "\nRunning {} Benchmark...", kind.title());
    }
}
