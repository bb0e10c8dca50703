use std::hint::black_box;

use anyhow::Result;

use crate::error::BenchError;
use crate::harness::Workload;
use crate::input::InputGenerator;

/// Dense square matrix of `f64`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Builds a matrix from rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, BenchError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(BenchError::invalid_input(format!(
                    "row {} has {} columns, expected {}",
                    idx,
                    row.len(),
                    n
                )));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    pub(crate) fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.n.max(1))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Textbook i-j-k multiply. No blocking, no transposition.
pub fn multiply_naive(a: &Matrix, b: &Matrix) -> Result<Matrix, BenchError> {
    if a.n != b.n {
        return Err(BenchError::invalid_input(format!(
            "cannot multiply {0}x{0} by {1}x{1}",
            a.n, b.n
        )));
    }
    let n = a.n;
    let mut c = Matrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            let mut acc = 0.0;
            for k in 0..n {
                acc += a.data[i * n + k] * b.data[k * n + j];
            }
            c.data[i * n + j] = acc;
        }
    }
    Ok(c)
}

/// Multiplies two random `size x size` operands generated once per size.
pub struct MatrixWorkload {
    generator: InputGenerator,
    operands: Option<(Matrix, Matrix)>,
}

impl MatrixWorkload {
    pub fn new(generator: InputGenerator) -> Self {
        Self {
            generator,
            operands: None,
        }
    }
}

impl Workload for MatrixWorkload {
    fn prepare(&mut self, size: usize) -> Result<()> {
        let a = self.generator.random_matrix(size);
        let b = self.generator.random_matrix(size);
        self.operands = Some((a, b));
        Ok(())
    }

    fn run(&mut self, size: usize) -> Result<()> {
        let (a, b) = self
            .operands
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("matrix operands for size {} were not prepared", size))?;
        black_box(multiply_naive(a, b)?);
        Ok(())
    }
}
