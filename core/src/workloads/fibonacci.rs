use std::hint::black_box;

use anyhow::{Result, bail};

use crate::harness::Workload;

/// Largest index whose Fibonacci number fits in a `u64`.
pub const MAX_FIBONACCI_INDEX: usize = 93;

/// Naive exponential recursion, deliberately unmemoized.
///
/// `n` must not exceed [`MAX_FIBONACCI_INDEX`]; larger indices overflow `u64`.
pub fn fibonacci(n: u32) -> u64 {
    debug_assert!(
        n as usize <= MAX_FIBONACCI_INDEX,
        "fibonacci({}) overflows u64 (max index {})",
        n,
        MAX_FIBONACCI_INDEX
    );
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// Computes `fibonacci(size)`; needs no generated input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FibonacciWorkload;

impl Workload for FibonacciWorkload {
    fn run(&mut self, size: usize) -> Result<()> {
        if size > MAX_FIBONACCI_INDEX {
            bail!("fibonacci({}) overflows u64 (max index {})", size, MAX_FIBONACCI_INDEX);
        }
        black_box(fibonacci(black_box(size as u32)));
        Ok(())
    }
}
