use anyhow::Result;

use crate::harness::Workload;
use crate::input::{DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, InputGenerator};

/// In-place quicksort with a Lomuto partition around the last element.
///
/// Recurses into the smaller partition and loops on the larger one, so stack
/// depth stays logarithmic even when long runs of equal values degrade the
/// split to `n - 1` and `0`.
pub fn quicksort<T: PartialOrd>(mut arr: &mut [T]) {
    while arr.len() > 1 {
        let pivot = partition(arr);
        let (left, right) = std::mem::take(&mut arr).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left);
            arr = right;
        } else {
            quicksort(right);
            arr = left;
        }
    }
}

/// Returns the final index of the pivot; `arr` must be non-empty.
fn partition<T: PartialOrd>(arr: &mut [T]) -> usize {
    let high = arr.len() - 1;
    let mut store = 0;
    for j in 0..high {
        if arr[j] <= arr[high] {
            arr.swap(store, j);
            store += 1;
        }
    }
    arr.swap(store, high);
    store
}

/// Sorts a fresh copy of the same unsorted array on every run.
pub struct QuicksortWorkload {
    generator: InputGenerator,
    min_value: i64,
    max_value: i64,
    pristine: Vec<i64>,
    scratch: Vec<i64>,
}

impl QuicksortWorkload {
    pub fn new(generator: InputGenerator) -> Self {
        Self::with_range(generator, DEFAULT_MIN_VALUE, DEFAULT_MAX_VALUE)
    }

    pub fn with_range(generator: InputGenerator, min_value: i64, max_value: i64) -> Self {
        Self {
            generator,
            min_value,
            max_value,
            pristine: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Unsorted input for the current size.
    pub fn input(&self) -> &[i64] {
        &self.pristine
    }

    /// Output of the most recent run.
    pub fn sorted(&self) -> &[i64] {
        &self.scratch
    }
}

impl Workload for QuicksortWorkload {
    fn prepare(&mut self, size: usize) -> Result<()> {
        self.pristine = self.generator.random_array(size, self.min_value, self.max_value)?;
        Ok(())
    }

    fn reset(&mut self, _size: usize) -> Result<()> {
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.pristine);
        Ok(())
    }

    fn run(&mut self, _size: usize) -> Result<()> {
        quicksort(&mut self.scratch);
        Ok(())
    }
}
