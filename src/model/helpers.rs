//! Summation helpers.
//!
//! Every helper starts from an empty linear expression, so the result is
//! linear (or quadratic, if a quadratic term is summed) even when every input
//! is a constant.

use nalgebra::DVector;
use tracing::error;

use super::{
    error::ExprError, expression::ScalarExpression, scalar_linear::ScalarLinearExpr,
    var_vector::VarVector, variable::Variable,
};

fn empty() -> ScalarExpression {
    ScalarExpression::Linear(ScalarLinearExpr::default())
}

/// Sum of scalar expressions
pub fn sum<I, E>(exprs: I) -> ScalarExpression
where
    I: IntoIterator<Item = E>,
    E: Into<ScalarExpression>,
{
    exprs
        .into_iter()
        .fold(empty(), |acc, expr| acc.plus(&expr.into()))
}

/// Sum of variables
pub fn sum_vars(vars: &[Variable]) -> ScalarExpression {
    sum(vars.iter().copied())
}

/// Sum of one row of a variable matrix
pub fn sum_row(vars: &[Vec<Variable>], row: usize) -> Result<ScalarExpression, ExprError> {
    let cells = vars
        .get(row)
        .ok_or_else(|| ExprError::dimension("row index vs. matrix rows", vars.len(), row))?;
    Ok(sum_vars(cells))
}

/// Sum of one column of a variable matrix
///
/// Every row must have a cell in that column.
pub fn sum_col(vars: &[Vec<Variable>], col: usize) -> Result<ScalarExpression, ExprError> {
    let cells = vars
        .iter()
        .map(|cells| {
            cells
                .get(col)
                .copied()
                .ok_or_else(|| ExprError::dimension("column index vs. row length", cells.len(), col))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sum_vars(&cells))
}

/// `coeffs' * vars`
///
/// # Panics
///
/// If `vars` and `coeffs` differ in length. Both come from the same caller,
/// so a mismatch is a programming error.
pub fn dot(vars: &[Variable], coeffs: &[f64]) -> ScalarExpression {
    if vars.len() != coeffs.len() {
        error!(
            num_vars = vars.len(),
            num_coeffs = coeffs.len(),
            "number of vars and coeffs mismatch"
        );
        panic!(
            "dot: {} variables but {} coefficients",
            vars.len(),
            coeffs.len()
        );
    }

    let linear = ScalarLinearExpr::from_parts(
        VarVector::from(vars),
        DVector::from_column_slice(coeffs),
        0.0,
    );
    empty().plus(&ScalarExpression::Linear(linear))
}
