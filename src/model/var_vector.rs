//! Ordered collections of variables.
//!
//! A [`VarVector`] is both the basis every coefficient structure is indexed
//! against and, on its own, a vector expression with an identity coefficient
//! matrix and a zero offset.

use itertools::Itertools;
use nalgebra::{DMatrix, DVector};

use super::{
    ConstraintSense,
    constraint::VectorConstraint,
    error::ExprError,
    expression::VectorExpression,
    variable::Variable,
    vector_linear::VectorLinearExpr,
};

/// Ordered sequence of variables
///
/// Duplicates are allowed in the sequence; [`VarVector::ids`] and
/// [`VarVector::unique`] deduplicate by id, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarVector {
    elements: Vec<Variable>,
}

impl VarVector {
    pub fn new(elements: Vec<Variable>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The variable at slot `index`, if any
    pub fn at(&self, index: usize) -> Option<Variable> {
        self.elements.get(index).copied()
    }

    pub fn elements(&self) -> &[Variable] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.elements.iter()
    }

    pub fn push(&mut self, variable: Variable) {
        self.elements.push(variable);
    }

    /// Unique ids in first-occurrence order
    pub fn ids(&self) -> Vec<u64> {
        self.elements.iter().map(Variable::id).unique().collect()
    }

    /// Number of unique variables
    pub fn num_vars(&self) -> usize {
        self.ids().len()
    }

    /// Deduplicated copy, first occurrence wins
    pub fn unique(&self) -> VarVector {
        VarVector {
            elements: self.elements.iter().copied().unique_by(Variable::id).collect(),
        }
    }

    /// Slot of the first element with this id
    pub fn position(&self, id: u64) -> Option<usize> {
        self.elements.iter().position(|v| v.id() == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    /// Offset of the vector expression, always zero
    pub fn constant(&self) -> DVector<f64> {
        DVector::zeros(self.len())
    }

    /// Coefficient matrix of the vector expression, always the identity
    pub fn linear_coeff(&self) -> DMatrix<f64> {
        DMatrix::identity(self.len(), self.len())
    }

    /// Add a vector expression; the output length must match
    pub fn plus(&self, other: impl Into<VectorExpression>) -> Result<VectorExpression, ExprError> {
        VectorExpression::Variables(self.clone()).plus(&other.into())
    }

    /// Scale every component, giving a vector linear expression `c * I * x`
    pub fn mult(&self, c: f64) -> VectorLinearExpr {
        VectorLinearExpr::from(self.clone()).mult(c)
    }

    pub fn less_eq(
        &self,
        rhs: impl Into<VectorExpression>,
    ) -> Result<VectorConstraint, ExprError> {
        self.comparison(rhs, ConstraintSense::LessEqual)
    }

    pub fn greater_eq(
        &self,
        rhs: impl Into<VectorExpression>,
    ) -> Result<VectorConstraint, ExprError> {
        self.comparison(rhs, ConstraintSense::GreaterEqual)
    }

    pub fn equals(&self, rhs: impl Into<VectorExpression>) -> Result<VectorConstraint, ExprError> {
        self.comparison(rhs, ConstraintSense::Equal)
    }

    pub fn comparison(
        &self,
        rhs: impl Into<VectorExpression>,
        sense: ConstraintSense,
    ) -> Result<VectorConstraint, ExprError> {
        VectorConstraint::new(self.clone(), rhs, sense)
    }
}

impl From<Vec<Variable>> for VarVector {
    fn from(elements: Vec<Variable>) -> Self {
        Self::new(elements)
    }
}

impl From<&[Variable]> for VarVector {
    fn from(elements: &[Variable]) -> Self {
        Self::new(elements.to_vec())
    }
}

impl FromIterator<Variable> for VarVector {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VarVector {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariableType;

    fn vars(n: u64) -> Vec<Variable> {
        (0..n)
            .map(|id| Variable::new(id, 0.0, 1.0, VariableType::Binary))
            .collect()
    }

    #[test]
    fn test_ids_deduplicate_in_first_occurrence_order() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let vv = VarVector::new(vec![y, x, y, x, x]);

        assert_eq!(vv.len(), 5);
        assert_eq!(vv.ids(), vec![1, 0]);
        assert_eq!(vv.num_vars(), 2);
        assert_eq!(vv.unique(), VarVector::new(vec![y, x]));
    }

    #[test]
    fn test_at_and_position() {
        let vv: VarVector = vars(3).into_iter().collect();

        assert_eq!(vv.at(2).map(|v| v.id()), Some(2));
        assert_eq!(vv.at(3), None);
        assert_eq!(vv.position(1), Some(1));
        assert!(!vv.contains(9));
    }

    #[test]
    fn test_constant_is_zero_for_every_slot() {
        let v = vars(2);
        let vv = VarVector::new(vec![v[0], v[1], v[0], v[1], v[0], v[1]]);

        let c = vv.constant();
        assert_eq!(c.len(), 6);
        assert!(c.iter().all(|&value| value == 0.0));
        assert_eq!(vv.linear_coeff(), DMatrix::identity(6, 6));
    }
}
