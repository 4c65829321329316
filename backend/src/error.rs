//! Error types for the waste aggregation pipeline.
//!
//! - [`LoadError`] - reading, decoding and validating the raw dataset
//! - [`AggregateError`] - undefined province averages
//! - [`ChartError`] - SVG rendering failures
//! - [`PipelineError`] - start-up orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading and validating the raw dataset.
///
/// Any of these aborts start-up: no partially loaded dataset is ever exposed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded with the detected encoding.
    #[error("Failed to decode dataset: {0}")]
    Encoding(String),

    /// Header or record width differs from the fixed five-column schema.
    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A field could not be coerced to its declared type.
    #[error("Line {line}, column '{column}' (value '{value}'): {message}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
        message: String,
    },

    /// Malformed delimited text.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// No data rows after the header and footnote rows.
    #[error("Dataset contains no data rows")]
    EmptyDataset,
}

// =============================================================================
// Aggregation Errors
// =============================================================================

/// Errors while reducing totals to averages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregateError {
    /// The province has no retained yearly totals, so its mean is undefined.
    #[error("Province '{0}' has no retained observations; its average is undefined")]
    EmptyProvince(String),
}

// =============================================================================
// Chart Errors
// =============================================================================

/// Errors while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The drawing backend rejected an operation.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// Requested chart name does not exist.
    #[error("Unknown chart: {0}")]
    UnknownChart(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Start-up orchestration errors.
///
/// This is the error returned by [`crate::transform::pipeline::WasteReport::load`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dataset could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Every observation was removed by the exclusion rule.
    #[error("No observations remain after excluding year {excluded_year} ({excluded} rows removed)")]
    NoRetainedObservations { excluded_year: i32, excluded: usize },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The dataset could not be turned into a report at start-up.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Socket error.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
