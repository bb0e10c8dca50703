#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::error::BenchError;
    use crate::harness::{Workload, run_benchmark};
    use crate::input::InputGenerator;
    use crate::workloads::{
        FibonacciWorkload, Matrix, MatrixWorkload, QuicksortWorkload, WorkloadKind, fibonacci, multiply_naive,
        quicksort,
    };

    #[test]
    fn test_fibonacci_base_cases() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(10), 55);
        assert_eq!(fibonacci(20), 6_765);
    }

    #[test]
    fn test_fibonacci_recurrence() {
        for n in 2..25 {
            assert_eq!(fibonacci(n), fibonacci(n - 1) + fibonacci(n - 2), "n = {}", n);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflows u64")]
    fn test_fibonacci_past_limit_panics_in_debug() {
        fibonacci(94);
    }

    #[test]
    fn test_fibonacci_workload_rejects_overflowing_index() {
        let mut workload = FibonacciWorkload;
        let err = workload.run(94).unwrap_err();
        assert!(err.to_string().contains("overflows u64"));
    }

    #[test]
    fn test_fibonacci_timings_grow_with_index() -> Result<()> {
        let result = run_benchmark(&mut FibonacciWorkload, &[10, 20, 28], 3)?;
        let times: Vec<f64> = result.iter().map(|e| e.average_secs).collect();
        assert!(times[0] < times[1] && times[1] < times[2], "times not increasing: {:?}", times);
        Ok(())
    }

    #[test]
    #[ignore = "fibonacci(40) takes seconds per run"]
    fn test_fibonacci_default_sizes_are_monotonic() -> Result<()> {
        let result = run_benchmark(&mut FibonacciWorkload, &[20, 30, 40], 5)?;
        assert_eq!(result.len(), 3);
        let times: Vec<f64> = result.iter().map(|e| e.average_secs).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]), "times not increasing: {:?}", times);
        Ok(())
    }

    #[test]
    fn test_quicksort_matches_std_sort() -> Result<()> {
        let mut generator = InputGenerator::seeded(7);
        for size in [0, 1, 2, 3, 10, 257, 5_000] {
            let mut data = generator.random_array(size, 1, 1000)?;
            let mut expected = data.clone();
            expected.sort();
            quicksort(&mut data);
            assert_eq!(data, expected, "size {}", size);
        }
        Ok(())
    }

    #[test]
    fn test_quicksort_handles_sorted_reversed_and_equal_input() {
        let mut ascending: Vec<i32> = (0..200).collect();
        quicksort(&mut ascending);
        assert!(ascending.windows(2).all(|w| w[0] <= w[1]));

        let mut descending: Vec<i32> = (0..200).rev().collect();
        quicksort(&mut descending);
        assert_eq!(descending, (0..200).collect::<Vec<_>>());

        let mut equal = vec![4u8; 64];
        quicksort(&mut equal);
        assert_eq!(equal, vec![4u8; 64]);

        let mut floats = vec![0.5, -1.25, 3.0, 0.0];
        quicksort(&mut floats);
        assert_eq!(floats, vec![-1.25, 0.0, 0.5, 3.0]);
    }

    #[test]
    fn test_quicksort_equal_values_keep_stack_shallow() -> Result<()> {
        // All-equal input splits n - 1 / 0 on every step.
        let sorter = std::thread::Builder::new().stack_size(128 * 1024).spawn(|| {
            let mut equal = vec![7i64; 20_000];
            quicksort(&mut equal);
            equal.iter().all(|&v| v == 7) && equal.len() == 20_000
        })?;
        let intact = sorter.join().map_err(|_| anyhow::anyhow!("sorting thread panicked"))?;
        assert!(intact);
        Ok(())
    }

    #[test]
    fn test_quicksort_single_value_range_through_harness() -> Result<()> {
        let mut workload = QuicksortWorkload::with_range(InputGenerator::seeded(13), 7, 7);
        let result = run_benchmark(&mut workload, &[10, 5_000], 2)?;
        assert_eq!(result.sizes(), vec![10, 5_000]);
        assert!(result.iter().all(|e| e.average_secs.is_finite()));
        assert!(workload.sorted().iter().all(|&v| v == 7));
        assert_eq!(workload.sorted().len(), 5_000);
        Ok(())
    }

    #[test]
    fn test_quicksort_narrow_range_large_input() -> Result<()> {
        let mut generator = InputGenerator::seeded(21);
        let mut data = generator.random_array(50_000, 1, 10)?;
        let mut expected = data.clone();
        expected.sort();
        quicksort(&mut data);
        assert_eq!(data, expected);
        Ok(())
    }

    #[test]
    fn test_quicksort_workload_sorts_pristine_copy_every_run() -> Result<()> {
        let mut workload = QuicksortWorkload::new(InputGenerator::seeded(11));
        workload.prepare(500)?;
        let pristine = workload.input().to_vec();
        let mut expected = pristine.clone();
        expected.sort();

        for _ in 0..3 {
            workload.reset(500)?;
            assert_eq!(workload.sorted(), pristine.as_slice(), "reset must restore the unsorted input");
            workload.run(500)?;
            assert_eq!(workload.sorted(), expected.as_slice());
        }
        assert_eq!(workload.input(), pristine.as_slice(), "pristine input must never be sorted in place");
        Ok(())
    }

    #[test]
    fn test_quicksort_size_one_through_harness() -> Result<()> {
        let mut workload = QuicksortWorkload::new(InputGenerator::seeded(3));
        let result = run_benchmark(&mut workload, &[1], 5)?;
        assert_eq!(result.sizes(), vec![1]);
        assert_eq!(workload.sorted().len(), 1);
        Ok(())
    }

    #[test]
    fn test_identity_times_b_is_b() -> Result<()> {
        let mut generator = InputGenerator::seeded(5);
        for n in [1, 2, 7, 16] {
            let b = generator.random_matrix(n);
            let c = multiply_naive(&Matrix::identity(n), &b)?;
            assert_eq!(c.dim(), n);
            for i in 0..n {
                for j in 0..n {
                    assert!((c.get(i, j) - b.get(i, j)).abs() <= f64::EPSILON, "({}, {})", i, j);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_small_product() -> Result<()> {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
        let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]])?;
        let c = multiply_naive(&a, &b)?;
        let rows: Vec<Vec<f64>> = c.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
        assert_eq!(c.get(0, 1), 22.0);
        assert_eq!(c.get(1, 0), 43.0);
        Ok(())
    }

    #[test]
    fn test_dimension_mismatch_is_invalid_input() {
        let err = multiply_naive(&Matrix::zeros(2), &Matrix::zeros(3)).unwrap_err();
        assert!(err.is_invalid_input());
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, BenchError::InvalidInput(_)));
    }

    #[test]
    fn test_matrix_workload_requires_prepare() {
        let mut workload = MatrixWorkload::new(InputGenerator::seeded(1));
        assert!(workload.run(4).is_err());
    }

    #[test]
    fn test_matrix_workload_through_harness() -> Result<()> {
        let mut workload = MatrixWorkload::new(InputGenerator::seeded(9));
        let result = run_benchmark(&mut workload, &[4, 8], 2)?;
        assert_eq!(result.sizes(), vec![4, 8]);
        Ok(())
    }

    #[test]
    fn test_workload_kind_names_round_trip() {
        for kind in WorkloadKind::ALL {
            assert_eq!(kind.name().parse::<WorkloadKind>(), Ok(kind));
        }
        assert_eq!("matrix".parse::<WorkloadKind>(), Ok(WorkloadKind::Matrix));
        assert!("bubble".parse::<WorkloadKind>().is_err());
    }
}
