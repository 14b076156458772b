//! FILENAME: core/engine/src/error.rs
//! PURPOSE: The error surface of the sheet API.
//! CONTEXT: These are caller-facing failures: each one aborts a single
//! operation and leaves the sheet untouched. Evaluation errors (#REF! and
//! friends) are not here; they are ordinary `CellValue`s.

use parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SpreadsheetError {
    #[error("Invalid cell position")]
    InvalidPosition,

    #[error("Formula error: {0}")]
    Formula(#[from] ParseError),

    #[error("Circular dependency detected")]
    CircularDependency,
}
