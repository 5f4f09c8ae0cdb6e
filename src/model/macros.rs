//! Macros for building constraints
//!
//! This module provides convenient comparison syntax on top of
//! [`ScalarConstraint::new`](crate::model::ScalarConstraint::new) and
//! [`VectorConstraint::new`](crate::model::VectorConstraint::new).

/// Create constraints using natural comparison syntax
///
/// The left-hand side must be in parentheses for a scalar constraint, which
/// cannot fail, and in brackets for a vector constraint, which returns a
/// `Result` because both sides must have the same length.
///
/// # Examples
///
/// ```rust
/// use optim::constraint;
/// use optim::model::{KVector, Model};
///
/// let mut model = Model::new();
/// let x = model.add_continuous_variable();
/// let y = model.add_continuous_variable();
/// let v = model.add_binary_variable_vector(2);
///
/// let c1 = constraint!((x + y) == 10.0);
/// let c2 = constraint!((2.0 * x) <= y);
/// let c3 = constraint!((x - y) >= 0.0);
/// let c4 = constraint!([v.clone()] <= KVector::from_vec(vec![1.0, 1.0]));
/// assert!(c4.is_ok());
///
/// model.add_constraint(c1);
/// model.add_constraint(c4);
/// ```
#[macro_export]
macro_rules! constraint {
    (($lhs:expr) == $rhs:expr) => {
        $crate::model::ScalarConstraint::new($lhs, $rhs, $crate::model::ConstraintSense::Equal)
    };
    (($lhs:expr) <= $rhs:expr) => {
        $crate::model::ScalarConstraint::new(
            $lhs,
            $rhs,
            $crate::model::ConstraintSense::LessEqual,
        )
    };
    (($lhs:expr) >= $rhs:expr) => {
        $crate::model::ScalarConstraint::new(
            $lhs,
            $rhs,
            $crate::model::ConstraintSense::GreaterEqual,
        )
    };
    ([$lhs:expr] == $rhs:expr) => {
        $crate::model::VectorConstraint::new($lhs, $rhs, $crate::model::ConstraintSense::Equal)
    };
    ([$lhs:expr] <= $rhs:expr) => {
        $crate::model::VectorConstraint::new(
            $lhs,
            $rhs,
            $crate::model::ConstraintSense::LessEqual,
        )
    };
    ([$lhs:expr] >= $rhs:expr) => {
        $crate::model::VectorConstraint::new(
            $lhs,
            $rhs,
            $crate::model::ConstraintSense::GreaterEqual,
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::model::{ConstraintSense, KVector, Model, ScalarExpression};

    #[test]
    fn test_constraint_macro() {
        let mut model = Model::new();
        let x = model.add_continuous_variable();
        let y = model.add_continuous_variable();

        let c = constraint!((x + y) == 10.0);
        assert_eq!(c.sense(), ConstraintSense::Equal);
        assert_eq!(c.rhs(), &ScalarExpression::from(10.0));

        let c = constraint!((2.0 * x) <= 5.0);
        assert_eq!(c.sense(), ConstraintSense::LessEqual);

        let c = constraint!((x - y) >= y);
        assert_eq!(c.sense(), ConstraintSense::GreaterEqual);
        assert_eq!(c.rhs(), &ScalarExpression::Variable(y));
    }

    #[test]
    fn test_vector_constraint_macro_checks_length() {
        let mut model = Model::new();
        let v = model.add_binary_variable_vector(3);

        let ok = constraint!([v.clone()] >= KVector::from_vec(vec![0.0; 3]));
        let err = constraint!([v] == KVector::from_vec(vec![0.0; 2]));

        assert_eq!(ok.map(|c| c.len()), Ok(3));
        assert!(err.is_err());
    }

    #[test]
    fn test_constraints_added_to_model() {
        let mut model = Model::new();
        let x = model.add_continuous_variable();
        let y = model.add_continuous_variable();

        model.add_constraint(constraint!((x + y) == 10.0));
        model.add_constraint(constraint!((x) <= 5.0));

        assert_eq!(model.constraints().len(), 2);
    }
}
