//! Operator overloading for scalar expressions
//!
//! Every scalar expression kind supports natural arithmetic notation. The
//! result is always a [`ScalarExpression`], promoted to the degree of the
//! highest-degree operand:
//!
//! ```rust
//! use optim::model::{K, Model};
//!
//! let mut model = Model::new();
//! let x = model.add_continuous_variable();
//! let y = model.add_continuous_variable();
//!
//! let _expr1 = x + y;             // Addition
//! let _expr2 = x - y;             // Subtraction
//! let _expr3 = 2.0 * x;           // Scalar multiplication (left)
//! let _expr4 = x * 2.0;           // Scalar multiplication (right)
//! let _expr5 = x + 2.0 * y + K(5.0);
//! let _expr6 = -(x + y) * 3.0;    // Parentheses and negation
//! ```
//!
//! Vector expressions have no operators: their Plus can fail on a length
//! mismatch, so they only offer the fallible `plus` method.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use super::{
    constant::K, expression::ScalarExpression, scalar_linear::ScalarLinearExpr,
    scalar_quadratic::ScalarQuadraticExpr, variable::Variable,
};

macro_rules! scalar_ops {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<R: Into<ScalarExpression>> Add<R> for $ty {
                type Output = ScalarExpression;

                fn add(self, other: R) -> Self::Output {
                    ScalarExpression::from(self).plus(&other.into())
                }
            }

            impl<R: Into<ScalarExpression>> Sub<R> for $ty {
                type Output = ScalarExpression;

                fn sub(self, other: R) -> Self::Output {
                    let other: ScalarExpression = other.into();
                    ScalarExpression::from(self).plus(&other.mult(-1.0))
                }
            }

            impl Mul<f64> for $ty {
                type Output = ScalarExpression;

                fn mul(self, other: f64) -> Self::Output {
                    ScalarExpression::from(self).mult(other)
                }
            }

            impl Neg for $ty {
                type Output = ScalarExpression;

                fn neg(self) -> Self::Output {
                    ScalarExpression::from(self).mult(-1.0)
                }
            }

            impl Add<$ty> for f64 {
                type Output = ScalarExpression;

                fn add(self, other: $ty) -> Self::Output {
                    ScalarExpression::from(self).plus(&other.into())
                }
            }

            impl Sub<$ty> for f64 {
                type Output = ScalarExpression;

                fn sub(self, other: $ty) -> Self::Output {
                    ScalarExpression::from(self).plus(&ScalarExpression::from(other).mult(-1.0))
                }
            }

            impl Mul<$ty> for f64 {
                type Output = ScalarExpression;

                fn mul(self, other: $ty) -> Self::Output {
                    other * self
                }
            }
        )+
    };
}

scalar_ops!(
    K,
    Variable,
    ScalarLinearExpr,
    ScalarQuadraticExpr,
    ScalarExpression
);

impl<R: Into<ScalarExpression>> AddAssign<R> for ScalarExpression {
    fn add_assign(&mut self, other: R) {
        *self = self.plus(&other.into());
    }
}

impl<R: Into<ScalarExpression>> SubAssign<R> for ScalarExpression {
    fn sub_assign(&mut self, other: R) {
        let other: ScalarExpression = other.into();
        *self = self.plus(&other.mult(-1.0));
    }
}

impl std::iter::Sum for ScalarExpression {
    fn sum<I: Iterator<Item = ScalarExpression>>(iter: I) -> Self {
        iter.fold(ScalarExpression::default(), |acc, e| acc.plus(&e))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{K, Model, ScalarExpression};

    #[test]
    fn test_expression_operations() {
        let mut model = Model::new();
        let x = model.add_continuous_variable();
        let y = model.add_continuous_variable();

        let expr = 2.0 * x + 3.0 * y + 5.0;
        assert_eq!(expr.constant(), 5.0);
        assert_eq!(expr.coeffs(), vec![2.0, 3.0]);

        assert_eq!((x + y).coeffs(), vec![1.0, 1.0]);
        assert_eq!((x - y).coeffs(), vec![1.0, -1.0]);
        assert_eq!((2.0 * x).coeffs(), vec![2.0]);
        assert_eq!((x * 2.0).coeffs(), vec![2.0]);
        assert_eq!((-x).coeffs(), vec![-1.0]);
        assert_eq!((10.0 - x).constant(), 10.0);
        assert_eq!((10.0 - x).coeffs(), vec![-1.0]);
    }

    #[test]
    fn test_subtracting_self_leaves_zero_slot() {
        let mut model = Model::new();
        let x = model.add_binary_variable();

        let expr = x - x;

        // The variable stays in the basis with a zero coefficient
        assert_eq!(expr.ids(), vec![x.id()]);
        assert_eq!(expr.coeffs(), vec![0.0]);
    }

    #[test]
    fn test_constants_stay_constant() {
        let sum = K(1.0) + K(2.0) - 0.5;

        assert!(matches!(sum, ScalarExpression::Constant(K(v)) if v == 2.5));
        assert_eq!((3.0 * K(2.0)).constant(), 6.0);
    }

    #[test]
    fn test_add_assign_and_sum() {
        let mut model = Model::new();
        let v = model.add_binary_variable_vector(3);

        let mut acc = ScalarExpression::default();
        for x in v.iter() {
            acc += *x;
        }
        acc -= 1.0;
        let summed: ScalarExpression = v.iter().map(|&x| ScalarExpression::from(x)).sum();

        assert_eq!(acc.coeffs(), vec![1.0, 1.0, 1.0]);
        assert_eq!(acc.constant(), -1.0);
        assert_eq!(summed.ids(), v.ids());
    }
}
