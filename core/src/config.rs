use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::harness::{DEFAULT_NUM_RUNS, validate_plan};
use crate::input::{DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE};
use crate::workloads::{MAX_FIBONACCI_INDEX, WorkloadKind};

/// Everything one suite invocation needs. Missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub num_runs: usize,
    pub seed: Option<u64>,
    pub write_json: bool,
    pub quicksort: QuicksortConfig,
    pub fibonacci: SizesConfig,
    pub matrix: SizesConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            file_prefix: "rust".to_string(),
            num_runs: DEFAULT_NUM_RUNS,
            seed: None,
            write_json: false,
            quicksort: QuicksortConfig::default(),
            fibonacci: SizesConfig::new(vec![20, 30, 40]),
            matrix: SizesConfig::new(vec![100, 300, 500]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuicksortConfig {
    pub enabled: bool,
    pub sizes: Vec<usize>,
    pub min_value: i64,
    pub max_value: i64,
}

impl Default for QuicksortConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sizes: vec![1_000, 100_000, 1_000_000],
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizesConfig {
    pub enabled: bool,
    pub sizes: Vec<usize>,
}

impl SizesConfig {
    pub fn new(sizes: Vec<usize>) -> Self {
        Self { enabled: true, sizes }
    }
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SuiteConfig {
    /// Loads a config file; the format follows the extension
    /// (`.toml`, `.yaml`/`.yml` or `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let config: SuiteConfig = match ext.as_str() {
            "toml" => toml::from_str(&raw).map_err(|e| anyhow!(e)),
            "yaml" | "yml" => serde_yaml::from_str(&raw).map_err(|e| anyhow!(e)),
            "json" => serde_json::from_str(&raw).map_err(|e| anyhow!(e)),
            other => Err(anyhow!("unsupported config format '{}' (use toml, yaml or json)", other)),
        }
        .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn sizes_for(&self, kind: WorkloadKind) -> &[usize] {
        match kind {
            WorkloadKind::Quicksort => &self.quicksort.sizes,
            WorkloadKind::Fibonacci => &self.fibonacci.sizes,
            WorkloadKind::Matrix => &self.matrix.sizes,
        }
    }

    pub fn sizes_for_mut(&mut self, kind: WorkloadKind) -> &mut Vec<usize> {
        match kind {
            WorkloadKind::Quicksort => &mut self.quicksort.sizes,
            WorkloadKind::Fibonacci => &mut self.fibonacci.sizes,
            WorkloadKind::Matrix => &mut self.matrix.sizes,
        }
    }

    pub fn is_enabled(&self, kind: WorkloadKind) -> bool {
        match kind {
            WorkloadKind::Quicksort => self.quicksort.enabled,
            WorkloadKind::Fibonacci => self.fibonacci.enabled,
            WorkloadKind::Matrix => self.matrix.enabled,
        }
    }

    /// Enables exactly the listed workloads.
    pub fn restrict_to(&mut self, kinds: &[WorkloadKind]) {
        self.quicksort.enabled = kinds.contains(&WorkloadKind::Quicksort);
        self.fibonacci.enabled = kinds.contains(&WorkloadKind::Fibonacci);
        self.matrix.enabled = kinds.contains(&WorkloadKind::Matrix);
    }

    pub fn enabled_workloads(&self) -> Vec<WorkloadKind> {
        WorkloadKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }

    pub fn csv_path(&self, kind: WorkloadKind) -> PathBuf {
        let name = format!("{}_{}_results.csv", self.file_prefix, kind.name());
        self.output_dir.join(sanitize_filename::sanitize(name))
    }

    pub fn json_path(&self) -> PathBuf {
        let name = format!("{}_run.json", self.file_prefix);
        self.output_dir.join(sanitize_filename::sanitize(name))
    }

    /// Checks every enabled workload's plan up front.
    pub fn validate(&self) -> Result<(), BenchError> {
        let enabled = self.enabled_workloads();
        if enabled.is_empty() {
            return Err(BenchError::invalid_input("no workloads enabled"));
        }
        for kind in enabled {
            validate_plan(self.sizes_for(kind), self.num_runs)
                .map_err(|e| BenchError::invalid_input(format!("{}: {}", kind, strip_kind(e))))?;
        }
        if self.quicksort.enabled && self.quicksort.min_value > self.quicksort.max_value {
            return Err(BenchError::invalid_input(format!(
                "quicksort: min_value {} exceeds max_value {}",
                self.quicksort.min_value, self.quicksort.max_value
            )));
        }
        if self.fibonacci.enabled
            && let Some(&n) = self.fibonacci.sizes.iter().find(|&&n| n > MAX_FIBONACCI_INDEX)
        {
            return Err(BenchError::invalid_input(format!(
                "fibonacci: index {} exceeds {} and would overflow u64",
                n, MAX_FIBONACCI_INDEX
            )));
        }
        Ok(())
    }
}

fn strip_kind(err: BenchError) -> String {
    match err {
        BenchError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

/// Parses a comma separated size list such as `100,300,500`.
pub fn parse_size_list(raw: &str) -> Result<Vec<usize>, BenchError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.replace('_', "")
                .parse::<usize>()
                .map_err(|_| BenchError::invalid_input(format!("'{}' is not a valid size", s)))
        })
        .collect()
}
