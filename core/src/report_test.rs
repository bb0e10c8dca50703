#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    use crate::error::BenchError;
    use crate::harness::{BenchmarkResult, SizeTiming};
    use crate::report::{
        CSV_HEADER, CategoryRecord, RunRecord, compare, read_csv, write_csv, write_json, write_or_remove,
    };
    use crate::workloads::WorkloadKind;

    fn table(rows: &[(usize, f64)]) -> BenchmarkResult {
        BenchmarkResult::from_entries(
            rows.iter()
                .map(|&(size, average_secs)| SizeTiming { size, average_secs })
                .collect(),
        )
    }

    #[test]
    fn test_csv_layout_and_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.csv");
        let result = table(&[(100, 0.001234), (300, 0.05)]);
        write_csv(&result, &path)?;

        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 3);

        let (size, secs) = lines[1].split_once(',').expect("two columns");
        assert_eq!(size.parse::<usize>()?, 100);
        assert!((secs.parse::<f64>()? - 0.001234).abs() < 1e-12);

        let back = read_csv(&path)?;
        assert_eq!(back, result);
        Ok(())
    }

    #[test]
    fn test_write_creates_missing_directories_and_overwrites() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("deeper").join("r.csv");
        write_csv(&table(&[(1, 1.0), (2, 2.0)]), &path)?;
        write_csv(&table(&[(3, 0.5)]), &path)?;
        let back = read_csv(&path)?;
        assert_eq!(back.sizes(), vec![3]);
        Ok(())
    }

    #[test]
    fn test_write_failure_reports_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file in the way")?;
        let path = blocker.join("r.csv");
        let err = write_csv(&table(&[(1, 1.0)]), &path).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }), "unexpected {:?}", err);
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() -> Result<()> {
        use std::io::Write;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("partial.csv");
        write_csv(&table(&[(1, 0.5)]), &path)?;

        let err = write_or_remove(&path, |writer| {
            writeln!(writer, "{}", CSV_HEADER)?;
            writer.flush()?;
            Err(std::io::Error::other("disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, BenchError::Io { .. }), "{}", err);
        assert!(err.to_string().contains("disk full"), "{}", err);
        assert!(!path.exists(), "truncated file left behind");
        Ok(())
    }

    #[test]
    fn test_read_rejects_bad_rows_with_line_number() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.csv");
        fs::write(&path, format!("{}\n10,0.5\nabc,0.1\n", CSV_HEADER))?;
        match read_csv(&path) {
            Err(BenchError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }

        fs::write(&path, "size,time\n1,2\n")?;
        assert!(matches!(read_csv(&path), Err(BenchError::Parse { line: 1, .. })));

        fs::write(&path, "")?;
        assert!(matches!(read_csv(&path), Err(BenchError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn test_read_accepts_crlf_and_scientific_notation() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("py.csv");
        fs::write(&path, format!("{}\r\n20,1.5e-3\r\n30,0.25\r\n", CSV_HEADER))?;
        let back = read_csv(&path)?;
        assert_eq!(back, table(&[(20, 0.0015), (30, 0.25)]));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_csv(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }

    #[test]
    fn test_compare_matches_shared_sizes() {
        let baseline = table(&[(10, 2.0), (20, 4.0), (30, 1.0)]);
        let candidate = table(&[(20, 1.0), (10, 1.0), (40, 9.0), (30, 0.0)]);
        let rows = compare(&baseline, &candidate);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].size, 10);
        assert_eq!(rows[0].speedup, Some(2.0));
        assert_eq!(rows[1].speedup, Some(4.0));
        assert_eq!(rows[2].speedup, None);
    }

    #[test]
    fn test_run_record_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("run.json");
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut record = RunRecord::new(timestamp, 5, Some(7));
        record.categories.push(CategoryRecord {
            workload: WorkloadKind::Matrix,
            results: table(&[(100, 0.5)]),
        });
        write_json(&path, &record)?;

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"matrix_mult\""));
        assert!(raw.contains("2024-05-01T12:00:00Z"));
        let back: RunRecord = serde_json::from_str(&raw)?;
        assert_eq!(back, record);
        Ok(())
    }
}
