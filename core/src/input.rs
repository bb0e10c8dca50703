//! Random input generation for the sorting and matrix workloads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BenchError;
use crate::workloads::Matrix;

pub const DEFAULT_MIN_VALUE: i64 = 1;
pub const DEFAULT_MAX_VALUE: i64 = 1000;

/// Owns the pseudorandom source so callers can inject a seeded one.
#[derive(Debug, Clone)]
pub struct InputGenerator {
    rng: StdRng,
}

impl InputGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// `size` integers uniform in `[min_val, max_val]`.
    pub fn random_array(&mut self, size: usize, min_val: i64, max_val: i64) -> Result<Vec<i64>, BenchError> {
        if min_val > max_val {
            return Err(BenchError::invalid_input(format!(
                "value range is empty: min {} > max {}",
                min_val, max_val
            )));
        }
        Ok((0..size).map(|_| self.rng.gen_range(min_val..=max_val)).collect())
    }

    /// `n x n` matrix with entries uniform in `[0.0, 1.0]`.
    pub fn random_matrix(&mut self, n: usize) -> Matrix {
        Matrix::from_fn(n, |_, _| self.rng.gen_range(0.0..=1.0))
    }
}
