//! Decision variables.

use super::{
    ConstraintSense, VariableType,
    constraint::ScalarConstraint,
    expression::ScalarExpression,
    scalar_linear::ScalarLinearExpr,
};

/// Handle to a decision variable of a [`Model`](super::Model)
///
/// Identity is the `id` alone: two handles compare equal (and hash the same)
/// iff their ids match, whatever their bounds say. Handles are only minted by
/// the model, which hands out ids sequentially.
#[derive(Clone, Copy)]
pub struct Variable {
    id: u64,
    lower: f64,
    upper: f64,
    var_type: VariableType,
}

impl Variable {
    pub(crate) fn new(id: u64, lower: f64, upper: f64, var_type: VariableType) -> Self {
        Self {
            id,
            lower,
            upper,
            var_type,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    /// A variable is a one-term expression, so this is always 1
    pub fn num_vars(&self) -> usize {
        1
    }

    pub fn ids(&self) -> Vec<u64> {
        vec![self.id]
    }

    pub fn coeffs(&self) -> Vec<f64> {
        vec![1.0]
    }

    pub fn constant(&self) -> f64 {
        0.0
    }

    /// Add another scalar expression to this variable
    ///
    /// The result is expressed over `{self} ∪ other`, with `self` first. Adding
    /// a variable to itself folds into a single slot with coefficient 2.
    pub fn plus(&self, other: impl Into<ScalarExpression>) -> ScalarExpression {
        ScalarExpression::Variable(*self).plus(&other.into())
    }

    /// Scale the variable, giving `c * self`
    pub fn mult(&self, c: f64) -> ScalarLinearExpr {
        ScalarLinearExpr::from_variable(*self).mult(c)
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

// Manual trait implementations so that identity depends on the id only
impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("id", &self.id)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("var_type", &self.var_type)
            .finish()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_bounds() {
        let a = Variable::new(4, 0.0, 1.0, VariableType::Binary);
        let b = Variable::new(4, -10.0, 10.0, VariableType::Continuous);
        let c = Variable::new(5, 0.0, 1.0, VariableType::Binary);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_plus_self_folds_into_one_slot() {
        let x = Variable::new(0, 0.0, 1.0, VariableType::Binary);

        let sum = x.plus(x);

        assert_eq!(sum.ids(), vec![0]);
        assert_eq!(sum.coeffs(), vec![2.0]);
        assert_eq!(sum.constant(), 0.0);
    }

    #[test]
    fn test_plus_keeps_self_first() {
        let x = Variable::new(0, 0.0, 1.0, VariableType::Binary);
        let y = Variable::new(1, 0.0, 1.0, VariableType::Binary);
        let z = Variable::new(2, 0.0, 1.0, VariableType::Binary);

        let sum = z.plus(x.plus(y));

        assert_eq!(sum.ids(), vec![2, 0, 1]);
        assert_eq!(sum.coeffs(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mult_gives_single_slot() {
        let x = Variable::new(7, 0.0, 10.0, VariableType::Integer);

        let expr = x.mult(3.5);

        assert_eq!(expr.ids(), vec![7]);
        assert_eq!(expr.coeffs(), &[3.5]);
        assert_eq!(expr.constant(), 0.0);
    }

    #[test]
    fn test_comparison_is_not_normalised() {
        let x = Variable::new(0, 0.0, 1.0, VariableType::Binary);

        let c = x.less_eq(3.0);

        assert_eq!(c.sense(), ConstraintSense::LessEqual);
        assert!(matches!(c.lhs(), ScalarExpression::Variable(v) if *v == x));
        assert_eq!(c.rhs().constant(), 3.0);
    }
}
