//! Error types for the occupancy table pipeline and plotting.

use thiserror::Error;

/// Pipeline and plotting errors.
///
/// Every validation variant is raised before any transformation or rendering
/// side effect, so a failed call leaves no partial output behind.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("column name '{0}' not found in the table")]
    ColumnNotFound(String),

    #[error("column name '{0}' is not a datetime")]
    ColumnNotDatetime(String),

    #[error("y-axis limit {0} outside [0, 100]")]
    Limit(f64),

    #[error("confidence interval {0} outside (0, 1)")]
    ConfidenceInterval(f64),

    #[error("unknown trend mode '{0}', expected 'interval' or 'spaghetti'")]
    UnknownMode(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for pipeline operations.
pub type TrendResult<T> = Result<T, TrendError>;
