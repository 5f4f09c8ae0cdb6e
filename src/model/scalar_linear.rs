//! Scalar linear expressions `coeffs' * x + constant`.

use nalgebra::DVector;

use super::{
    ConstraintSense,
    align::{self, Union},
    constraint::ScalarConstraint,
    error::ExprError,
    expression::ScalarExpression,
    var_vector::VarVector,
    variable::Variable,
};

/// A linear expression over a variable basis
///
/// `coeffs` has one slot per element of `vars` (not per unique id), so a basis
/// holding the same variable twice carries two coefficients for it until the
/// expression is folded or aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLinearExpr {
    vars: VarVector,
    coeffs: DVector<f64>,
    constant: f64,
}

impl ScalarLinearExpr {
    /// Create a linear expression, checking that every slot has a coefficient
    pub fn new(
        vars: impl Into<VarVector>,
        coeffs: impl Into<Vec<f64>>,
        constant: f64,
    ) -> Result<Self, ExprError> {
        let vars = vars.into();
        let coeffs = coeffs.into();
        if coeffs.len() != vars.len() {
            return Err(ExprError::dimension(
                "linear coefficients vs. variables",
                vars.len(),
                coeffs.len(),
            ));
        }
        Ok(Self {
            vars,
            coeffs: DVector::from_vec(coeffs),
            constant,
        })
    }

    /// An expression with no variables, only a constant
    pub fn from_constant(constant: f64) -> Self {
        Self {
            vars: VarVector::default(),
            coeffs: DVector::zeros(0),
            constant,
        }
    }

    /// `1.0 * variable`
    pub fn from_variable(variable: Variable) -> Self {
        Self {
            vars: VarVector::new(vec![variable]),
            coeffs: DVector::from_element(1, 1.0),
            constant: 0.0,
        }
    }

    pub(crate) fn from_parts(vars: VarVector, coeffs: DVector<f64>, constant: f64) -> Self {
        debug_assert_eq!(vars.len(), coeffs.len());
        Self {
            vars,
            coeffs,
            constant,
        }
    }

    pub fn vars(&self) -> &VarVector {
        &self.vars
    }

    /// Unique ids of the basis
    pub fn ids(&self) -> Vec<u64> {
        self.vars.ids()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.num_vars()
    }

    /// Per-slot coefficients, parallel to [`ScalarLinearExpr::vars`]
    pub fn coeffs(&self) -> &[f64] {
        self.coeffs.as_slice()
    }

    pub(crate) fn coeff_vector(&self) -> &DVector<f64> {
        &self.coeffs
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// `(id, coefficient)` per slot
    pub fn terms(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.vars
            .iter()
            .zip(self.coeffs.iter())
            .map(|(v, &c)| (v.id(), c))
    }

    /// Add a scalar expression, promoting to quadratic if `other` is quadratic
    pub fn plus(&self, other: impl Into<ScalarExpression>) -> ScalarExpression {
        ScalarExpression::Linear(self.clone()).plus(&other.into())
    }

    /// Add another linear expression
    ///
    /// Identical bases are added slot by slot. Otherwise both sides are
    /// rewritten into `unique(self.vars ++ other.vars)` first.
    pub fn plus_linear(&self, other: &ScalarLinearExpr) -> ScalarLinearExpr {
        if self.vars == other.vars {
            return Self::from_parts(
                self.vars.clone(),
                &self.coeffs + &other.coeffs,
                self.constant + other.constant,
            );
        }

        let Union {
            basis,
            lhs_map,
            rhs_map,
        } = align::union(&self.vars, &other.vars);
        let width = basis.len();
        let coeffs = align::remap_vector(&self.coeffs, &lhs_map, width)
            + align::remap_vector(&other.coeffs, &rhs_map, width);

        Self::from_parts(basis, coeffs, self.constant + other.constant)
    }

    /// Scale every coefficient and the constant; the basis is untouched
    pub fn mult(&self, c: f64) -> ScalarLinearExpr {
        Self::from_parts(self.vars.clone(), &self.coeffs * c, self.constant * c)
    }

    /// Rewrite this expression over `new_vars`, which must contain every
    /// variable of the current basis
    pub fn rewrite_in_terms_of(&self, new_vars: &VarVector) -> Result<ScalarLinearExpr, ExprError> {
        let map = align::slot_map(&self.vars, new_vars)?;
        let coeffs = align::remap_vector(&self.coeffs, &map, new_vars.len());
        Ok(Self::from_parts(new_vars.clone(), coeffs, self.constant))
    }

    /// The same expression over its deduplicated basis
    pub fn folded(&self) -> ScalarLinearExpr {
        let (basis, map) = align::fold(&self.vars);
        let coeffs = align::remap_vector(&self.coeffs, &map, basis.len());
        Self::from_parts(basis, coeffs, self.constant)
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
        ScalarConstraint::new(self.clone(), rhs, sense)
    }
}

impl Default for ScalarLinearExpr {
    fn default() -> Self {
        Self::from_constant(0.0)
    }
}

impl From<Variable> for ScalarLinearExpr {
    fn from(variable: Variable) -> Self {
        Self::from_variable(variable)
    }
}

impl std::fmt::Display for ScalarLinearExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (variable, coeff) in self.vars.iter().zip(self.coeffs.iter()) {
            write!(f, "{} {} + ", coeff, variable)?;
        }
        write!(f, "{}", self.constant)
    }
}
