//! FILENAME: core/engine/src/sheet.rs
//! PURPOSE: Manages the collection of cells (The Spreadsheet Sheet).
//! CONTEXT: This file defines the `Sheet` struct which owns all cell data
//! and the dependency graph between formula cells. It uses a sparse
//! storage strategy (HashMap) so only populated positions take memory.
//! Every edit runs a commit protocol that rejects cycles before touching
//! any state and invalidates stale caches afterwards.

use crate::cell::{Cell, CellValue};
use crate::dependency_graph::DependencyGraph;
use crate::error::SpreadsheetError;
use crate::position::{Position, Size};
use std::collections::HashMap;
use std::io::Write;

/// The Sheet struct holds the state of the spreadsheet.
/// It uses a sparse representation (HashMap) mapping positions to Cells.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Sparse storage: only positions that were written to, or that a
    /// formula references, appear here.
    cells: HashMap<Position, Cell>,

    /// Reference edges between the cells, keyed by position.
    deps: DependencyGraph,
}

impl Sheet {
    /// Creates a new, empty Sheet.
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            deps: DependencyGraph::new(),
        }
    }

    /// Sets the cell at `pos` from its raw input text.
    ///
    /// The edit is all-or-nothing. In order:
    /// 1. The candidate state is built from `text`; a malformed formula
    ///    fails here.
    /// 2. The candidate's references are checked against the existing
    ///    graph; an edit that would close a cycle fails here.
    /// 3. Referenced positions that do not exist yet are materialised as
    ///    empty cells, so every graph edge points at a real cell.
    /// 4. The graph edges are rewired and the state replaced.
    /// 5. The caches of the cell and of everything that transitively
    ///    depends on it are dropped.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SpreadsheetError> {
        if !pos.is_valid() {
            return Err(SpreadsheetError::InvalidPosition);
        }

        let candidate = Cell::from_input(text)?;

        let new_precedents = candidate.referenced_cells().iter().copied().collect();
        if self.deps.would_create_cycle(pos, &new_precedents) {
            return Err(SpreadsheetError::CircularDependency);
        }

        // Materialise referenced positions so the back edges have a home
        for &target in candidate.referenced_cells() {
            self.cells.entry(target).or_default();
        }

        self.deps.set_dependencies(pos, new_precedents);
        self.cells.insert(pos, candidate);

        for dirty in self.deps.collect_dirty(pos) {
            if let Some(cell) = self.cells.get(&dirty) {
                cell.invalidate_cache();
            }
        }

        Ok(())
    }

    /// Returns the cell at `pos`, or None if nothing is stored there.
    /// Positions a formula referenced are present as empty cells.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SpreadsheetError> {
        if !pos.is_valid() {
            return Err(SpreadsheetError::InvalidPosition);
        }

        Ok(self.cells.get(&pos))
    }

    /// Clears the cell at `pos`.
    ///
    /// Clearing runs the same commit protocol as setting empty text, so
    /// dependent caches are invalidated. The entry is then removed from
    /// storage unless some formula still references it, in which case an
    /// empty cell lingers to keep the graph's edges resolvable.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SpreadsheetError> {
        if !pos.is_valid() {
            return Err(SpreadsheetError::InvalidPosition);
        }

        if self.cells.contains_key(&pos) {
            self.set_cell(pos, "")?;
            if !self.deps.is_referenced(pos) {
                self.cells.remove(&pos);
            }
        }

        Ok(())
    }

    /// Convenience read: the observable value at `pos`. Absent cells read
    /// as empty. Formula caches may be populated as a side effect.
    pub fn value(&self, pos: Position) -> Result<CellValue, SpreadsheetError> {
        Ok(self
            .get_cell(pos)?
            .map(|cell| cell.value(self))
            .unwrap_or(CellValue::Empty))
    }

    /// True if any formula cell currently references `pos`.
    pub fn is_referenced(&self, pos: Position) -> bool {
        self.deps.is_referenced(pos)
    }

    /// Internal unchecked lookup used during evaluation, where positions
    /// are already known to be valid.
    pub(crate) fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Returns the minimal bounding rectangle covering every cell whose
    /// text is non-empty, or (0, 0) when there is none. Cells that exist
    /// only because a formula references them do not count.
    pub fn printable_size(&self) -> Size {
        let mut result = Size::default();

        for (pos, cell) in &self.cells {
            if !cell.text().is_empty() {
                result.rows = result.rows.max(pos.row + 1);
                result.cols = result.cols.max(pos.col + 1);
            }
        }

        result
    }

    /// Writes the computed values of the printable region: tab between
    /// columns, newline after each row, absent cells as empty fields.
    pub fn print_values<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        self.print_with(output, |cell| cell.value(self).to_string())
    }

    /// Writes the raw texts of the printable region, in the same shape as
    /// `print_values`. Formula cells print their canonical text, escaped
    /// text keeps its escape character.
    pub fn print_texts<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        self.print_with(output, |cell| cell.text())
    }

    fn print_with<W, F>(&self, output: &mut W, render: F) -> std::io::Result<()>
    where
        W: Write,
        F: Fn(&Cell) -> String,
    {
        let size = self.printable_size();

        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(output, "\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    write!(output, "{}", render(cell))?;
                }
            }
            writeln!(output)?;
        }

        Ok(())
    }
}
