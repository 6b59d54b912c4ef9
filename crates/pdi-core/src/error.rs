//! Workspace-level error type.
//!
//! Every failure carries a stable numeric code and a category, and maps
//! onto a CLI [`ExitCode`]. Errors serialize for JSON output as:
//! ```json
//! { "code": 30, "category": "estimation", "message": "degenerate sample: ..." }
//! ```

use crate::config::ConfigError;
use crate::diagram::DiagramError;
use crate::estimate::EstimationError;
use crate::exit_codes::ExitCode;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for pdi-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration files and settings.
    Config,
    /// Diagram files.
    Input,
    /// Point estimation and grid search.
    Estimation,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Estimation => write!(f, "estimation"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid diagram: {0}")]
    Diagram(#[from] DiagramError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable error code, grouped by category:
    /// - 10-19: configuration
    /// - 20-29: diagram input
    /// - 30-39: estimation
    /// - 60-69: I/O
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(ConfigError::NotFound { .. }) => 10,
            Error::Config(ConfigError::ParseJson { .. } | ConfigError::ParseToml { .. }) => 11,
            Error::Config(ConfigError::Validation(_)) => 12,
            Error::Config(ConfigError::IoError { .. }) => 13,
            Error::Diagram(DiagramError::Parse { .. }) => 20,
            Error::Diagram(DiagramError::Io { .. }) => 21,
            Error::Estimation(EstimationError::DegenerateSample { .. }) => 30,
            Error::Estimation(EstimationError::InvalidParameter { .. }) => 31,
            Error::Estimation(EstimationError::EmptyGrid) => 32,
            Error::Estimation(EstimationError::InvalidSetting { .. }) => 33,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Estimation(EstimationError::InvalidSetting { .. }) => {
                ErrorCategory::Config
            }
            Error::Diagram(_) => ErrorCategory::Input,
            Error::Estimation(_) => ErrorCategory::Estimation,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// CLI exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Config(ConfigError::IoError { .. }) => ExitCode::IoError,
            Error::Config(_) => ExitCode::ArgsError,
            Error::Diagram(DiagramError::Io { .. }) => ExitCode::IoError,
            Error::Diagram(_) => ExitCode::InputError,
            Error::Estimation(EstimationError::InvalidSetting { .. }) => ExitCode::ArgsError,
            Error::Estimation(EstimationError::DegenerateSample { .. }) => ExitCode::InputError,
            Error::Estimation(_) => ExitCode::EstimationError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }

    /// Structured form for JSON error output.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            category: self.category(),
            message: self.to_string(),
        }
    }
}

/// Serializable error summary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
}
