//! Vector linear expressions `L x + C`.

use nalgebra::{DMatrix, DVector};

use super::{
    ConstraintSense,
    align::{self, Union},
    constraint::VectorConstraint,
    error::ExprError,
    expression::VectorExpression,
    scalar_linear::ScalarLinearExpr,
    var_vector::VarVector,
    vector_constant::KVector,
};

/// `m` linear expressions sharing one variable basis
///
/// `l` is `m×n` with `n == vars.len()`, `c` has length `m`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLinearExpr {
    vars: VarVector,
    l: DMatrix<f64>,
    c: DVector<f64>,
}

impl VectorLinearExpr {
    pub fn new(
        l: DMatrix<f64>,
        vars: impl Into<VarVector>,
        c: DVector<f64>,
    ) -> Result<Self, ExprError> {
        let expr = Self {
            vars: vars.into(),
            l,
            c,
        };
        expr.check()?;
        Ok(expr)
    }

    /// Validate the shape of `L` against the basis and the offset
    pub fn check(&self) -> Result<(), ExprError> {
        if self.l.ncols() != self.vars.len() {
            return Err(ExprError::dimension(
                "L columns vs. variables",
                self.vars.len(),
                self.l.ncols(),
            ));
        }
        if self.l.nrows() != self.c.len() {
            return Err(ExprError::dimension(
                "L rows vs. C length",
                self.c.len(),
                self.l.nrows(),
            ));
        }
        Ok(())
    }

    pub(crate) fn from_parts(vars: VarVector, l: DMatrix<f64>, c: DVector<f64>) -> Self {
        debug_assert_eq!(l.shape(), (c.len(), vars.len()));
        Self { vars, l, c }
    }

    /// A constant vector as an expression over an empty basis
    pub fn from_constant(k: &KVector) -> Self {
        Self {
            vars: VarVector::default(),
            l: DMatrix::zeros(k.len(), 0),
            c: k.constant().clone(),
        }
    }

    /// Output length
    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    pub fn vars(&self) -> &VarVector {
        &self.vars
    }

    pub fn ids(&self) -> Vec<u64> {
        self.vars.ids()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.num_vars()
    }

    pub fn linear_coeff(&self) -> &DMatrix<f64> {
        &self.l
    }

    pub fn constant(&self) -> &DVector<f64> {
        &self.c
    }

    /// Row `index` as a scalar linear expression
    pub fn at_vec(&self, index: usize) -> Result<ScalarLinearExpr, ExprError> {
        if index >= self.len() {
            return Err(ExprError::dimension(
                "row index vs. output length",
                self.len(),
                index,
            ));
        }
        let coeffs = self.l.row(index).transpose();
        Ok(ScalarLinearExpr::from_parts(
            self.vars.clone(),
            coeffs,
            self.c[index],
        ))
    }

    pub fn plus(&self, other: impl Into<VectorExpression>) -> Result<VectorExpression, ExprError> {
        VectorExpression::Linear(self.clone()).plus(&other.into())
    }

    /// Add another vector linear expression
    ///
    /// The output lengths must match; the bases are aligned onto their union
    /// by remapping the columns of both `L` matrices.
    pub fn plus_linear(&self, other: &VectorLinearExpr) -> Result<VectorLinearExpr, ExprError> {
        if self.len() != other.len() {
            return Err(ExprError::dimension(
                "vector expression lengths",
                self.len(),
                other.len(),
            ));
        }

        if self.vars == other.vars {
            return Ok(Self {
                vars: self.vars.clone(),
                l: &self.l + &other.l,
                c: &self.c + &other.c,
            });
        }

        let Union {
            basis,
            lhs_map,
            rhs_map,
        } = align::union(&self.vars, &other.vars);
        let width = basis.len();

        Ok(Self {
            l: align::remap_columns(&self.l, &lhs_map, width)
                + align::remap_columns(&other.l, &rhs_map, width),
            c: &self.c + &other.c,
            vars: basis,
        })
    }

    /// Scale `L` and `C`
    pub fn mult(&self, c: f64) -> VectorLinearExpr {
        Self {
            vars: self.vars.clone(),
            l: &self.l * c,
            c: &self.c * c,
        }
    }

    /// Rewrite over `new_vars`, which must contain every variable of the basis
    pub fn rewrite_in_terms_of(&self, new_vars: &VarVector) -> Result<VectorLinearExpr, ExprError> {
        let map = align::slot_map(&self.vars, new_vars)?;
        Ok(Self {
            vars: new_vars.clone(),
            l: align::remap_columns(&self.l, &map, new_vars.len()),
            c: self.c.clone(),
        })
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

impl From<VarVector> for VectorLinearExpr {
    fn from(vars: VarVector) -> Self {
        let n = vars.len();
        Self {
            vars,
            l: DMatrix::identity(n, n),
            c: DVector::zeros(n),
        }
    }
}

impl From<&KVector> for VectorLinearExpr {
    fn from(k: &KVector) -> Self {
        Self::from_constant(k)
    }
}
