//! CSV/JSON export of benchmark tables, plus the reader used by `show` and
//! `compare`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BenchError;
use crate::harness::{BenchmarkResult, SizeTiming};
use crate::workloads::WorkloadKind;

pub const CSV_HEADER: &str = "Input Size,Execution Time (seconds)";

/// Writes `result` to `path`, replacing any existing file and creating
/// missing parent directories. On failure no file is left at `path`.
pub fn write_csv(result: &BenchmarkResult, path: &Path) -> Result<(), BenchError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    write_or_remove(path, |writer| write_rows(writer, result))
}

/// Creates `path`, lets `fill` write it, and deletes the partial file if
/// writing or flushing fails.
pub(crate) fn write_or_remove<F>(path: &Path, fill: F) -> Result<(), BenchError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| BenchError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let written = fill(&mut writer).and_then(|()| writer.flush());
    drop(writer);
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "could not remove partial file");
        }
        return Err(BenchError::io(path, e));
    }
    Ok(())
}

fn write_rows<W: Write>(writer: &mut W, result: &BenchmarkResult) -> std::io::Result<()> {
    let mut ints = itoa::Buffer::new();
    let mut floats = ryu::Buffer::new();
    writeln!(writer, "{}", CSV_HEADER)?;
    for entry in result {
        writeln!(
            writer,
            "{},{}",
            ints.format(entry.size),
            floats.format(entry.average_secs)
        )?;
    }
    Ok(())
}

/// Reads a table written by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<BenchmarkResult, BenchError> {
    let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
    let reader = BufReader::new(file);
    let parse_err = |line: usize, message: String| BenchError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut entries = Vec::new();
    let mut saw_header = false;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| BenchError::io(path, e))?;
        let trimmed = line.trim();
        if line_no == 1 {
            if trimmed != CSV_HEADER {
                return Err(parse_err(line_no, format!("expected header '{}'", CSV_HEADER)));
            }
            saw_header = true;
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        let (size, secs) = trimmed
            .split_once(',')
            .ok_or_else(|| parse_err(line_no, "expected two comma separated columns".to_string()))?;
        let size: usize = size
            .trim()
            .parse()
            .map_err(|_| parse_err(line_no, format!("'{}' is not an input size", size.trim())))?;
        let average_secs: f64 = secs
            .trim()
            .parse()
            .map_err(|_| parse_err(line_no, format!("'{}' is not a duration in seconds", secs.trim())))?;
        entries.push(SizeTiming { size, average_secs });
    }

    if !saw_header {
        return Err(parse_err(1, "file is empty".to_string()));
    }
    Ok(BenchmarkResult::from_entries(entries))
}

/// Renders a fixed-width console table.
pub fn format_table(result: &BenchmarkResult) -> String {
    let mut out = format!("{:>12}  {:>18}\n", "Input Size", "Seconds");
    for entry in result {
        out.push_str(&format!("{:>12}  {:>18.6}\n", entry.size, entry.average_secs));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub workload: WorkloadKind,
    pub results: BenchmarkResult,
}

/// JSON snapshot of one suite invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub generated_at: String,
    pub num_runs: usize,
    pub seed: Option<u64>,
    pub categories: Vec<CategoryRecord>,
}

impl RunRecord {
    pub fn new(timestamp: DateTime<Utc>, num_runs: usize, seed: Option<u64>) -> Self {
        Self {
            generated_at: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            num_runs,
            seed,
            categories: Vec::new(),
        }
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).with_context(|| format!("write {}", path.display()))?;
    writer.flush().with_context(|| format!("flush {}", path.display()))
}

/// Per-size timing of two tables side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub size: usize,
    pub baseline_secs: f64,
    pub candidate_secs: f64,
    /// `baseline / candidate`; above 1.0 means the candidate is faster.
    pub speedup: Option<f64>,
}

/// Pairs up sizes present in both tables, in baseline order.
pub fn compare(baseline: &BenchmarkResult, candidate: &BenchmarkResult) -> Vec<Comparison> {
    baseline
        .iter()
        .filter_map(|base| {
            let candidate_secs = candidate.average_for(base.size)?;
            let speedup = (candidate_secs > 0.0).then(|| base.average_secs / candidate_secs);
            Some(Comparison {
                size: base.size,
                baseline_secs: base.average_secs,
                candidate_secs,
                speedup,
            })
        })
        .collect()
}

pub fn format_comparison(rows: &[Comparison]) -> String {
    let mut out = format!(
        "{:>12}  {:>14}  {:>14}  {:>9}\n",
        "Input Size", "Baseline (s)", "Candidate (s)", "Speedup"
    );
    for row in rows {
        let speedup = row
            .speedup
            .map(|s| format!("{:.2}x", s))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{:>12}  {:>14.6}  {:>14.6}  {:>9}\n",
            row.size, row.baseline_secs, row.candidate_secs, speedup
        ));
    }
    out
}
