//! Vector-valued constants.

use nalgebra::{DMatrix, DVector};

use super::{
    ConstraintSense,
    constant::K,
    constraint::VectorConstraint,
    error::ExprError,
    expression::VectorExpression,
};

/// A constant vector, one value per output row
#[derive(Debug, Clone, PartialEq)]
pub struct KVector(pub DVector<f64>);

impl KVector {
    pub fn new(values: DVector<f64>) -> Self {
        Self(values)
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    /// `len` copies of `value`
    pub fn broadcast(value: K, len: usize) -> Self {
        Self(DVector::from_element(len, value.0))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Row `index` as a scalar constant
    pub fn at_vec(&self, index: usize) -> Option<K> {
        self.0.get(index).copied().map(K)
    }

    pub fn constant(&self) -> &DVector<f64> {
        &self.0
    }

    /// A constant references no variables, so this is `len×0`
    pub fn linear_coeff(&self) -> DMatrix<f64> {
        DMatrix::zeros(self.len(), 0)
    }

    pub fn num_vars(&self) -> usize {
        0
    }

    pub fn ids(&self) -> Vec<u64> {
        Vec::new()
    }

    pub fn plus(&self, other: impl Into<VectorExpression>) -> Result<VectorExpression, ExprError> {
        VectorExpression::Constant(self.clone()).plus(&other.into())
    }

    /// Add `value` to every row
    pub fn plus_scalar(&self, value: K) -> KVector {
        Self(self.0.add_scalar(value.0))
    }

    pub fn mult(&self, c: f64) -> KVector {
        Self(&self.0 * c)
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

impl From<Vec<f64>> for KVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<DVector<f64>> for KVector {
    fn from(values: DVector<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VariableType, var_vector::VarVector, variable::Variable};

    #[test]
    fn test_at_vec_and_shape() {
        let k = KVector::from_vec(vec![1.0, 2.0, 3.0]);

        assert_eq!(k.len(), 3);
        assert_eq!(k.at_vec(1), Some(K(2.0)));
        assert_eq!(k.at_vec(3), None);
        assert_eq!(k.linear_coeff().shape(), (3, 0));
        assert_eq!(k.num_vars(), 0);
    }

    #[test]
    fn test_plus_scalar_broadcasts() {
        let k = KVector::from_vec(vec![1.0, 2.0]).plus_scalar(K(0.5));

        assert_eq!(k.0.as_slice(), &[1.5, 2.5]);
        assert_eq!(KVector::broadcast(K(4.0), 2).0.as_slice(), &[4.0, 4.0]);
    }

    #[test]
    fn test_plus_constant_stays_constant() {
        let a = KVector::from_vec(vec![1.0, 2.0]);
        let b = KVector::from_vec(vec![10.0, 20.0]);

        let sum = a.plus(b).unwrap();

        assert_eq!(
            sum,
            VectorExpression::Constant(KVector::from_vec(vec![11.0, 22.0]))
        );
    }

    #[test]
    fn test_comparison_rejects_length_mismatch() {
        let k = KVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let x: VarVector = (0..3)
            .map(|id| Variable::new(id, 0.0, 1.0, VariableType::Binary))
            .collect();

        let err = k.less_eq(x).unwrap_err();

        assert!(
            matches!(
                err,
                ExprError::DimensionMismatch {
                    expected: 4,
                    found: 3,
                    ..
                }
            ),
            "unexpected error: {}",
            err
        );
    }
}
