//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod dependency_graph;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod position;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellValue, FormulaError, ESCAPE_SIGN, FORMULA_SIGN};
pub use dependency_graph::DependencyGraph;
pub use error::SpreadsheetError;
pub use evaluator::{EvalResult, Evaluator};
pub use formula::Formula;
pub use position::{Position, Size, MAX_COLS, MAX_ROWS};
pub use sheet::Sheet;
