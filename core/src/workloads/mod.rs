//! The three algorithms under measurement and their harness adapters.

pub mod fibonacci;
pub mod matrix;
pub mod quicksort;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fibonacci::{FibonacciWorkload, MAX_FIBONACCI_INDEX, fibonacci};
pub use matrix::{Matrix, MatrixWorkload, multiply_naive};
pub use quicksort::{QuicksortWorkload, quicksort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    Quicksort,
    Fibonacci,
    #[serde(rename = "matrix_mult", alias = "matrix")]
    Matrix,
}

impl WorkloadKind {
    /// Suite order.
    pub const ALL: [WorkloadKind; 3] = [WorkloadKind::Quicksort, WorkloadKind::Fibonacci, WorkloadKind::Matrix];

    /// Stable identifier used in file names and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            WorkloadKind::Quicksort => "quicksort",
            WorkloadKind::Fibonacci => "fibonacci",
            WorkloadKind::Matrix => "matrix_mult",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WorkloadKind::Quicksort => "QuickSort",
            WorkloadKind::Fibonacci => "Fibonacci",
            WorkloadKind::Matrix => "Matrix Multiplication",
        }
    }

    /// Human label for one size, e.g. `Fibonacci(30)`.
    pub fn describe_size(self, size: usize) -> String {
        match self {
            WorkloadKind::Quicksort => format!("QuickSort with array size {}", size),
            WorkloadKind::Fibonacci => format!("Fibonacci({})", size),
            WorkloadKind::Matrix => format!("Matrix multiplication {0}x{0}", size),
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quicksort" | "sort" => Ok(WorkloadKind::Quicksort),
            "fibonacci" | "fib" => Ok(WorkloadKind::Fibonacci),
            "matrix_mult" | "matrix" | "matmul" => Ok(WorkloadKind::Matrix),
            other => Err(format!(
                "unknown workload '{}' (expected quicksort, fibonacci or matrix_mult)",
                other
            )),
        }
    }
}
