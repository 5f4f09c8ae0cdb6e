//! Scalar quadratic expressions `x' Q x + L' x + C`.

use nalgebra::{DMatrix, DVector};

use super::{
    ConstraintSense,
    align::{self, Union},
    constraint::ScalarConstraint,
    error::ExprError,
    expression::ScalarExpression,
    scalar_linear::ScalarLinearExpr,
    var_vector::VarVector,
};

/// A quadratic expression over a variable basis
///
/// `q` is `n×n` and `l` has length `n`, where `n == vars.len()`. `q` need not
/// be symmetric; the coefficient of an unordered pair `(i, j)` with `i != j`
/// is `q[(i, j)] + q[(j, i)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarQuadraticExpr {
    vars: VarVector,
    q: DMatrix<f64>,
    l: DVector<f64>,
    constant: f64,
}

impl ScalarQuadraticExpr {
    /// Create a quadratic expression, validating the shapes of `q` and `l`
    /// against the basis
    pub fn new(
        q: DMatrix<f64>,
        l: DVector<f64>,
        constant: f64,
        vars: impl Into<VarVector>,
    ) -> Result<Self, ExprError> {
        let expr = Self {
            vars: vars.into(),
            q,
            l,
            constant,
        };
        expr.check()?;
        Ok(expr)
    }

    /// `x' Q x` with no linear part and no offset
    pub fn from_quadratic(q: DMatrix<f64>, vars: impl Into<VarVector>) -> Result<Self, ExprError> {
        let vars = vars.into();
        let n = vars.len();
        Self::new(q, DVector::zeros(n), 0.0, vars)
    }

    /// Embed a linear expression with an all-zero `Q` block
    pub fn from_linear(linear: &ScalarLinearExpr) -> Self {
        let n = linear.vars().len();
        Self {
            vars: linear.vars().clone(),
            q: DMatrix::zeros(n, n),
            l: linear.coeff_vector().clone(),
            constant: linear.constant(),
        }
    }

    /// Validate the dimension invariants
    pub fn check(&self) -> Result<(), ExprError> {
        let n = self.vars.len();
        if self.q.nrows() != n {
            return Err(ExprError::dimension("Q rows vs. variables", n, self.q.nrows()));
        }
        if self.q.ncols() != n {
            return Err(ExprError::dimension("Q columns vs. variables", n, self.q.ncols()));
        }
        if self.l.len() != n {
            return Err(ExprError::dimension("L length vs. variables", n, self.l.len()));
        }
        Ok(())
    }

    pub fn vars(&self) -> &VarVector {
        &self.vars
    }

    pub fn quadratic_coeff(&self) -> &DMatrix<f64> {
        &self.q
    }

    pub fn linear_coeff(&self) -> &DVector<f64> {
        &self.l
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn ids(&self) -> Vec<u64> {
        self.vars.ids()
    }

    /// Number of unique variables
    pub fn num_vars(&self) -> usize {
        self.vars.num_vars()
    }

    /// The `L' x + C` part
    pub fn linear_part(&self) -> ScalarLinearExpr {
        ScalarLinearExpr::from_parts(self.vars.clone(), self.l.clone(), self.constant)
    }

    /// Quadratic coefficients of every unordered pair of the unique basis
    ///
    /// Upper-triangle, row-major: `x0x0, x0x1, .., x0xn, x1x1, .., xnxn`.
    /// Off-diagonal entries are symmetrised.
    pub fn coeffs(&self) -> Vec<f64> {
        let folded = self.folded();
        let n = folded.vars.len();
        let mut out = Vec::with_capacity(n * (n + 1) / 2);
        for i in 0..n {
            out.push(folded.q[(i, i)]);
            for j in (i + 1)..n {
                out.push(folded.q[(i, j)] + folded.q[(j, i)]);
            }
        }
        out
    }

    /// Add any scalar expression; the result stays quadratic
    pub fn plus(&self, other: impl Into<ScalarExpression>) -> ScalarExpression {
        ScalarExpression::Quadratic(self.clone()).plus(&other.into())
    }

    /// Add another quadratic expression over the union of both bases
    pub fn plus_quadratic(&self, other: &ScalarQuadraticExpr) -> ScalarQuadraticExpr {
        if self.vars == other.vars {
            return Self {
                vars: self.vars.clone(),
                q: &self.q + &other.q,
                l: &self.l + &other.l,
                constant: self.constant + other.constant,
            };
        }

        let Union {
            basis,
            lhs_map,
            rhs_map,
        } = align::union(&self.vars, &other.vars);
        let width = basis.len();

        Self {
            q: align::remap_square(&self.q, &lhs_map, width)
                + align::remap_square(&other.q, &rhs_map, width),
            l: align::remap_vector(&self.l, &lhs_map, width)
                + align::remap_vector(&other.l, &rhs_map, width),
            constant: self.constant + other.constant,
            vars: basis,
        }
    }

    /// Add a linear expression, embedding it with a zero `Q` block
    pub fn plus_linear(&self, other: &ScalarLinearExpr) -> ScalarQuadraticExpr {
        self.plus_quadratic(&Self::from_linear(other))
    }

    /// Scale `Q`, `L` and the constant
    pub fn mult(&self, c: f64) -> ScalarQuadraticExpr {
        Self {
            vars: self.vars.clone(),
            q: &self.q * c,
            l: &self.l * c,
            constant: self.constant * c,
        }
    }

    /// Rewrite over `new_vars`, remapping both axes of `Q`
    pub fn rewrite_in_terms_of(
        &self,
        new_vars: &VarVector,
    ) -> Result<ScalarQuadraticExpr, ExprError> {
        let map = align::slot_map(&self.vars, new_vars)?;
        let width = new_vars.len();
        Ok(Self {
            vars: new_vars.clone(),
            q: align::remap_square(&self.q, &map, width),
            l: align::remap_vector(&self.l, &map, width),
            constant: self.constant,
        })
    }

    /// The same expression over its deduplicated basis
    pub fn folded(&self) -> ScalarQuadraticExpr {
        let (basis, map) = align::fold(&self.vars);
        let width = basis.len();
        Self {
            q: align::remap_square(&self.q, &map, width),
            l: align::remap_vector(&self.l, &map, width),
            constant: self.constant,
            vars: basis,
        }
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

impl From<&ScalarLinearExpr> for ScalarQuadraticExpr {
    fn from(linear: &ScalarLinearExpr) -> Self {
        Self::from_linear(linear)
    }
}
