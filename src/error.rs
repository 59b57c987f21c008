use std::path::PathBuf;

/// Errors raised by task creation and edit-form submission.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task text must not be empty")]
    EmptyText,

    #[error("invalid {field} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("task not found: {0}")]
    NotFound(String),
}

/// Errors raised while loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {field} in {path}")]
    Invalid { path: PathBuf, field: &'static str },
}

/// Errors from the external schedule-analysis collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no analysis command configured")]
    NotConfigured,

    #[error("analysis worker stopped without a report")]
    WorkerLost,

    #[error("failed to start analysis command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("analysis command I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("analysis command exited with {0}")]
    Status(std::process::ExitStatus),

    #[error("malformed analysis report: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("analysis score {0} is outside 0-100")]
    InvalidScore(f64),
}
