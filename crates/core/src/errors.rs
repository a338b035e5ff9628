//! Core error types for the Dealscope analysis pipeline.
//!
//! Row-level and group-level problems are *data*, not errors: they travel
//! through the report as skip records. The types here cover the fatal cases
//! only: a request that cannot be validated, a file that cannot be ingested
//! at all, or an export that cannot be produced.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Errors raised while reading an input workbook or CSV file.
///
/// Any of these is fatal for the whole request: no partial report is
/// produced when the input file itself is malformed.
#[derive(Error, Debug)]
pub enum IngestError {
    /// No sheet carries the full required column set.
    #[error("no sheet contains the required columns (missing: {})", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The workbook could not be opened or a sheet could not be read.
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    /// The CSV stream could not be read.
    #[error("failed to read CSV: {0}")]
    Csv(String),

    /// The input contains no data rows at all.
    #[error("input file is empty or contains no data rows")]
    Empty,
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// === From implementations for common error types ===

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(err.to_string())
    }
}
