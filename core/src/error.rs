use std::fmt;
use std::path::PathBuf;

/// Errors raised by the harness and its collaborators.
///
/// Workload failures are not represented here; they travel as
/// `anyhow::Error` and abort the benchmark that triggered them.
#[derive(Debug)]
pub enum BenchError {
    /// Bad size/run-count configuration, detected before any timing starts.
    InvalidInput(String),
    /// A results file could not be created or written.
    Io { path: PathBuf, source: std::io::Error },
    /// A results file exists but does not follow the CSV layout.
    Parse { path: PathBuf, line: usize, message: String },
}

impl BenchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BenchError::InvalidInput(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, BenchError::InvalidInput(_))
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::InvalidInput(message) => write!(f, "invalid input: {}", message),
            BenchError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            BenchError::Parse { path, line, message } => {
                write!(f, "{}:{}: {}", path.display(), line, message)
            }
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
