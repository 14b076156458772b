//! FILENAME: core/engine/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions to compute formula values.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree and computes the numeric result. Cell references are resolved
//! through the sheet, which may in turn evaluate further formula cells;
//! the dependency graph keeps that recursion finite.
//!
//! Evaluation errors travel through the `Result` channel and `?` until the
//! formula boundary collapses them into the cell's value:
//! - #REF!    for references outside the sheet
//! - #VALUE!  for text that is not a full numeric literal
//! - #ARITHM! for division by zero or any non-finite result

use crate::cell::{CellValue, FormulaError};
use crate::position::Position;
use crate::sheet::Sheet;
use parser::{BinaryOperator, Expression, UnaryOperator};

/// The result of evaluating an expression node.
pub type EvalResult = Result<f64, FormulaError>;

/// The formula evaluator.
/// Holds a reference to the sheet for cell lookups.
pub struct Evaluator<'a> {
    sheet: &'a Sheet,
}

impl<'a> Evaluator<'a> {
    /// Creates a new Evaluator with a reference to the sheet.
    pub fn new(sheet: &'a Sheet) -> Self {
        Evaluator { sheet }
    }

    /// Evaluates an AST expression and returns the numeric result.
    pub fn eval(&self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::Literal(n) => Ok(*n),
            Expression::CellRef { col, row } => self.eval_cell_ref(col, *row),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, *op, right),
            Expression::UnaryOp { op, operand } => self.eval_unary_op(*op, operand),
        }
    }

    /// Resolves a cell reference to a number.
    ///
    /// - a reference outside the sheet bounds is a #REF! error;
    /// - an absent cell, or one whose text is empty, counts as 0;
    /// - a text value must parse as a complete numeric literal, otherwise
    ///   it is a #VALUE! error;
    /// - an error value propagates unchanged.
    fn eval_cell_ref(&self, col: &str, row: u32) -> EvalResult {
        let pos = Position::from_a1_parts(col, row).ok_or(FormulaError::Ref)?;

        let cell = match self.sheet.cell(pos) {
            Some(cell) => cell,
            None => return Ok(0.0),
        };
        if cell.text().is_empty() {
            return Ok(0.0);
        }

        match cell.value(self.sheet) {
            CellValue::Empty => Ok(0.0),
            CellValue::Number(n) => Ok(n),
            CellValue::Error(e) => Err(e),
            CellValue::Text(s) => s.parse::<f64>().map_err(|_| FormulaError::Value),
        }
    }

    fn eval_binary_op(
        &self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> EvalResult {
        let left = self.eval(left)?;
        let right = self.eval(right)?;

        let result = match op {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => {
                if right == 0.0 {
                    return Err(FormulaError::Arithmetic);
                }
                left / right
            }
        };

        // Overflow to infinity counts as an arithmetic error too
        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Arithmetic)
        }
    }

    fn eval_unary_op(&self, op: UnaryOperator, operand: &Expression) -> EvalResult {
        let value = self.eval(operand)?;

        match op {
            UnaryOperator::Plus => Ok(value),
            UnaryOperator::Negate => Ok(-value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(sheet: &Sheet, src: &str) -> EvalResult {
        let expr = parser::parse(src).unwrap();
        Evaluator::new(sheet).eval(&expr)
    }

    fn pos(s: &str) -> Position {
        Position::from_a1(s).unwrap()
    }

    #[test]
    fn evaluates_arithmetic() {
        let sheet = Sheet::new();
        assert_eq!(eval_str(&sheet, "1+2*3"), Ok(7.0));
        assert_eq!(eval_str(&sheet, "(1+2)*3"), Ok(9.0));
        assert_eq!(eval_str(&sheet, "-2*3"), Ok(-6.0));
        assert_eq!(eval_str(&sheet, "+5"), Ok(5.0));
        assert_eq!(eval_str(&sheet, "7/2"), Ok(3.5));
    }

    #[test]
    fn division_by_zero_is_arithmetic_error() {
        let sheet = Sheet::new();
        assert_eq!(eval_str(&sheet, "1/0"), Err(FormulaError::Arithmetic));
        assert_eq!(eval_str(&sheet, "1/(2-2)"), Err(FormulaError::Arithmetic));
    }

    #[test]
    fn absent_cells_count_as_zero() {
        let sheet = Sheet::new();
        assert_eq!(eval_str(&sheet, "A1+5"), Ok(5.0));
    }

    #[test]
    fn numeric_text_is_coerced() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "2.5").unwrap();
        assert_eq!(eval_str(&sheet, "A1*2"), Ok(5.0));
    }

    #[test]
    fn non_numeric_text_is_value_error() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "hello").unwrap();
        sheet.set_cell(pos("A2"), "12oz").unwrap();

        assert_eq!(eval_str(&sheet, "A1+1"), Err(FormulaError::Value));
        assert_eq!(eval_str(&sheet, "A2+1"), Err(FormulaError::Value));
    }

    #[test]
    fn escaped_text_coerces_after_stripping() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "'7").unwrap();
        // The value of A1 is "7", which parses as a number
        assert_eq!(eval_str(&sheet, "A1+1"), Ok(8.0));
    }

    #[test]
    fn out_of_bounds_reference_is_ref_error() {
        let sheet = Sheet::new();
        assert_eq!(eval_str(&sheet, "A16385"), Err(FormulaError::Ref));
        assert_eq!(eval_str(&sheet, "A0"), Err(FormulaError::Ref));
    }

    #[test]
    fn errors_propagate_through_referencing_formulas() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "text").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();

        // B1's value is #VALUE!; reading it from another formula keeps it
        assert_eq!(eval_str(&sheet, "B1+1"), Err(FormulaError::Value));
    }

    #[test]
    fn left_operand_error_wins() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "text").unwrap();

        assert_eq!(eval_str(&sheet, "A1+1/0"), Err(FormulaError::Value));
    }
}
