//! Scalar constants, the zero-variable base case of the algebra.

use super::{ConstraintSense, constraint::ScalarConstraint, expression::ScalarExpression};

/// A constant expression
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct K(pub f64);

impl K {
    pub const ZERO: K = K(0.0);
    pub const ONE: K = K(1.0);

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn num_vars(&self) -> usize {
        0
    }

    pub fn ids(&self) -> Vec<u64> {
        Vec::new()
    }

    pub fn coeffs(&self) -> Vec<f64> {
        Vec::new()
    }

    pub fn constant(&self) -> f64 {
        self.0
    }

    /// Add any scalar expression; `K + K` stays a constant
    pub fn plus(&self, other: impl Into<ScalarExpression>) -> ScalarExpression {
        ScalarExpression::Constant(*self).plus(&other.into())
    }

    pub fn mult(&self, c: f64) -> K {
        K(self.0 * c)
    }

    pub fn less_eq(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::LessEqual)
    }

    pub fn greater_eq(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::GreaterEqual)
    }

    pub fn equals(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::Equal)
    }

    pub fn comparison(
        &self,
        rhs: impl Into<ScalarExpression>,
        sense: ConstraintSense,
    ) -> ScalarConstraint {
        ScalarConstraint::new(*self, rhs, sense)
    }
}

impl From<f64> for K {
    fn from(value: f64) -> Self {
        K(value)
    }
}

impl std::fmt::Display for K {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
