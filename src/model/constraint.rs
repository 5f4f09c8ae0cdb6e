//! Constraints built by comparing expressions.

use super::{
    ConstraintSense,
    error::ExprError,
    expression::{Expression, ScalarExpression, VectorExpression},
};

/// `lhs <sense> rhs` over scalar expressions
///
/// Both sides are kept as given; no alignment happens until a solver asks
/// for the [`LinearRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarConstraint {
    lhs: ScalarExpression,
    rhs: ScalarExpression,
    sense: ConstraintSense,
}

/// A scalar constraint normalised to `coeffs' x <sense> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRow {
    pub ids: Vec<u64>,
    pub coeffs: Vec<f64>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl ScalarConstraint {
    pub fn new(
        lhs: impl Into<ScalarExpression>,
        rhs: impl Into<ScalarExpression>,
        sense: ConstraintSense,
    ) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
            sense,
        }
    }

    pub fn lhs(&self) -> &ScalarExpression {
        &self.lhs
    }

    pub fn rhs(&self) -> &ScalarExpression {
        &self.rhs
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// Highest degree on either side
    pub fn degree(&self) -> u8 {
        self.lhs.degree().max(self.rhs.degree())
    }

    /// Move every variable to the left and every constant to the right
    ///
    /// Fails for quadratic constraints.
    pub fn linear_row(&self) -> Result<LinearRow, ExprError> {
        let difference = self.lhs.plus(&self.rhs.mult(-1.0));
        let linear = difference.as_linear().ok_or_else(|| {
            ExprError::unsupported("LinearRow", self.lhs.kind_name(), self.rhs.kind_name())
        })?;
        let linear = linear.folded();

        Ok(LinearRow {
            ids: linear.vars().iter().map(|v| v.id()).collect(),
            coeffs: linear.coeffs().to_vec(),
            sense: self.sense,
            rhs: -linear.constant(),
        })
    }
}

impl std::fmt::Display for ScalarConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.lhs.kind_name(),
            self.sense,
            self.rhs.kind_name()
        )
    }
}

/// `lhs <sense> rhs` row by row over vector expressions of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct VectorConstraint {
    lhs: VectorExpression,
    rhs: VectorExpression,
    sense: ConstraintSense,
}

impl VectorConstraint {
    /// Fails with a dimension mismatch unless both sides have the same length
    pub fn new(
        lhs: impl Into<VectorExpression>,
        rhs: impl Into<VectorExpression>,
        sense: ConstraintSense,
    ) -> Result<Self, ExprError> {
        let lhs = lhs.into();
        let rhs = rhs.into();
        if lhs.len() != rhs.len() {
            return Err(ExprError::dimension(
                "vector comparison lengths",
                lhs.len(),
                rhs.len(),
            ));
        }
        Ok(Self { lhs, rhs, sense })
    }

    pub fn lhs(&self) -> &VectorExpression {
        &self.lhs
    }

    pub fn rhs(&self) -> &VectorExpression {
        &self.rhs
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn len(&self) -> usize {
        self.lhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty()
    }

    /// One scalar constraint per output row
    pub fn rows(&self) -> Result<Vec<ScalarConstraint>, ExprError> {
        (0..self.len())
            .map(|i| {
                Ok(ScalarConstraint::new(
                    self.lhs.at_vec(i)?,
                    self.rhs.at_vec(i)?,
                    self.sense,
                ))
            })
            .collect()
    }
}

/// A constraint of either shape, as stored by the model
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Scalar(ScalarConstraint),
    Vector(VectorConstraint),
}

impl Constraint {
    /// Scalar rows the solver sees
    pub fn rows(&self) -> Result<Vec<ScalarConstraint>, ExprError> {
        match self {
            Constraint::Scalar(c) => Ok(vec![c.clone()]),
            Constraint::Vector(c) => c.rows(),
        }
    }
}

impl From<ScalarConstraint> for Constraint {
    fn from(c: ScalarConstraint) -> Self {
        Constraint::Scalar(c)
    }
}

impl From<VectorConstraint> for Constraint {
    fn from(c: VectorConstraint) -> Self {
        Constraint::Vector(c)
    }
}

/// Anything [`Model::add_constraint`](super::Model::add_constraint) accepts:
/// a built constraint, or the result of trying to build one
pub trait ConstraintInput {
    fn into_constraint(self) -> Result<Constraint, ExprError>;
}

impl ConstraintInput for ScalarConstraint {
    fn into_constraint(self) -> Result<Constraint, ExprError> {
        Ok(Constraint::Scalar(self))
    }
}

impl ConstraintInput for VectorConstraint {
    fn into_constraint(self) -> Result<Constraint, ExprError> {
        Ok(Constraint::Vector(self))
    }
}

impl ConstraintInput for Constraint {
    fn into_constraint(self) -> Result<Constraint, ExprError> {
        Ok(self)
    }
}

impl<C: Into<Constraint>> ConstraintInput for Result<C, ExprError> {
    fn into_constraint(self) -> Result<Constraint, ExprError> {
        self.map(Into::into)
    }
}

/// Compare any two expressions
pub fn comparison(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
    sense: ConstraintSense,
) -> Result<Constraint, ExprError> {
    let lhs: Expression = lhs.into();
    lhs.comparison(rhs, sense)
}

pub fn less_eq(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
) -> Result<Constraint, ExprError> {
    comparison(lhs, rhs, ConstraintSense::LessEqual)
}

pub fn greater_eq(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
) -> Result<Constraint, ExprError> {
    comparison(lhs, rhs, ConstraintSense::GreaterEqual)
}

pub fn equals(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
) -> Result<Constraint, ExprError> {
    comparison(lhs, rhs, ConstraintSense::Equal)
}
