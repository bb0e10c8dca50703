pub mod config;
pub mod error;
pub mod harness;
pub mod input;
pub mod report;
pub mod suite;
pub mod workloads;

#[cfg(test)]
mod report_test;
#[cfg(test)]
mod workloads_test;

pub use error::BenchError;
pub use harness::{
    BenchmarkResult, DEFAULT_NUM_RUNS, NoopObserver, RunObserver, SizeTiming, Workload, run_benchmark,
    run_benchmark_with,
};
pub use input::InputGenerator;
