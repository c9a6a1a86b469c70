use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::asset::TransportMode;

/// Reference data that cannot be used for a run.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("invalid parameter {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("pipeline tiers are not contiguous: {0}")]
    NonContiguousTiers(String),

    #[error("no parameters for country '{0}' and no fallback country defined")]
    MissingCountry(String),

    #[error("invalid sampling frequency '{0}'")]
    InvalidFrequency(String),
}

/// Failure reported by the LP solving backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("solver failed: {0}")]
    Failed(String),
}

/// Fatal error for a single hexagon / demand center / transport mode evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),

    #[error("no renewable profile for hexagon {0}")]
    MissingProfile(String),

    #[error("renewable profile for hexagon {hexagon} does not cover {timestamp}")]
    ProfileMismatch {
        hexagon: String,
        timestamp: NaiveDateTime,
    },

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// A fatal evaluation error together with the cell it belongs to.
#[derive(Debug)]
pub struct EvaluationFailure {
    pub hexagon_id: String,
    pub demand_center: String,
    pub mode: TransportMode,
    pub error: EvaluationError,
}

impl std::fmt::Display for EvaluationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hexagon {} / {} / {}: {}",
            self.hexagon_id, self.demand_center, self.mode, self.error
        )
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {field} in row {row}: {reason}")]
    InvalidField {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
