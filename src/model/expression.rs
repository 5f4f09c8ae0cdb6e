//! Closed sum types over every expression kind.
//!
//! Plus, Mult and Comparison dispatch by exhaustive `match` over these
//! enums. Scalar operands always combine (promoting to the higher degree), so
//! scalar Plus is infallible. Vector operands must agree in output length,
//! and a scalar can only meet a vector as a broadcast constant.

use nalgebra::DVector;

use super::{
    ConstraintSense,
    constant::K,
    constraint::{Constraint, ScalarConstraint, VectorConstraint},
    error::ExprError,
    scalar_linear::ScalarLinearExpr,
    scalar_quadratic::ScalarQuadraticExpr,
    var_vector::VarVector,
    variable::Variable,
    vector_constant::KVector,
    vector_linear::VectorLinearExpr,
};

/// Any scalar-valued expression
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpression {
    Constant(K),
    Variable(Variable),
    Linear(ScalarLinearExpr),
    Quadratic(ScalarQuadraticExpr),
}

impl ScalarExpression {
    /// Add two scalar expressions
    ///
    /// `K + K` stays a constant, anything involving a quadratic is quadratic,
    /// and every other combination is linear over `unique(self ++ other)`.
    pub fn plus(&self, other: &ScalarExpression) -> ScalarExpression {
        if let (ScalarExpression::Constant(a), ScalarExpression::Constant(b)) = (self, other) {
            return ScalarExpression::Constant(K(a.0 + b.0));
        }

        match (self.as_linear(), other.as_linear()) {
            (Some(a), Some(b)) => ScalarExpression::Linear(a.plus_linear(&b)),
            _ => ScalarExpression::Quadratic(
                self.to_quadratic().plus_quadratic(&other.to_quadratic()),
            ),
        }
    }

    pub fn mult(&self, c: f64) -> ScalarExpression {
        match self {
            ScalarExpression::Constant(k) => ScalarExpression::Constant(k.mult(c)),
            ScalarExpression::Variable(v) => ScalarExpression::Linear(v.mult(c)),
            ScalarExpression::Linear(e) => ScalarExpression::Linear(e.mult(c)),
            ScalarExpression::Quadratic(e) => ScalarExpression::Quadratic(e.mult(c)),
        }
    }

    /// The expression as a linear one, unless it is quadratic
    pub fn as_linear(&self) -> Option<ScalarLinearExpr> {
        match self {
            ScalarExpression::Constant(k) => Some(ScalarLinearExpr::from_constant(k.0)),
            ScalarExpression::Variable(v) => Some(ScalarLinearExpr::from_variable(*v)),
            ScalarExpression::Linear(e) => Some(e.clone()),
            ScalarExpression::Quadratic(_) => None,
        }
    }

    /// The expression as a quadratic one, embedding lower degrees with a zero `Q`
    pub fn to_quadratic(&self) -> ScalarQuadraticExpr {
        match self {
            ScalarExpression::Quadratic(e) => e.clone(),
            ScalarExpression::Constant(k) => {
                ScalarQuadraticExpr::from_linear(&ScalarLinearExpr::from_constant(k.0))
            }
            ScalarExpression::Variable(v) => {
                ScalarQuadraticExpr::from_linear(&ScalarLinearExpr::from_variable(*v))
            }
            ScalarExpression::Linear(e) => ScalarQuadraticExpr::from_linear(e),
        }
    }

    /// 0 for constants, 1 for variables and linear expressions, 2 for quadratics
    pub fn degree(&self) -> u8 {
        match self {
            ScalarExpression::Constant(_) => 0,
            ScalarExpression::Variable(_) | ScalarExpression::Linear(_) => 1,
            ScalarExpression::Quadratic(_) => 2,
        }
    }

    pub fn vars(&self) -> VarVector {
        match self {
            ScalarExpression::Constant(_) => VarVector::default(),
            ScalarExpression::Variable(v) => VarVector::new(vec![*v]),
            ScalarExpression::Linear(e) => e.vars().clone(),
            ScalarExpression::Quadratic(e) => e.vars().clone(),
        }
    }

    /// Unique variable ids, first occurrence first
    pub fn ids(&self) -> Vec<u64> {
        match self {
            ScalarExpression::Constant(k) => k.ids(),
            ScalarExpression::Variable(v) => v.ids(),
            ScalarExpression::Linear(e) => e.ids(),
            ScalarExpression::Quadratic(e) => e.ids(),
        }
    }

    /// Coefficients over the unique basis
    ///
    /// Linear kinds give one coefficient per id, parallel to
    /// [`ScalarExpression::ids`]. Quadratics give the symmetrised upper
    /// triangle of `Q` (see [`ScalarQuadraticExpr::coeffs`]).
    pub fn coeffs(&self) -> Vec<f64> {
        match self {
            ScalarExpression::Constant(k) => k.coeffs(),
            ScalarExpression::Variable(v) => v.coeffs(),
            ScalarExpression::Linear(e) => e.folded().coeffs().to_vec(),
            ScalarExpression::Quadratic(e) => e.coeffs(),
        }
    }

    pub fn constant(&self) -> f64 {
        match self {
            ScalarExpression::Constant(k) => k.constant(),
            ScalarExpression::Variable(v) => v.constant(),
            ScalarExpression::Linear(e) => e.constant(),
            ScalarExpression::Quadratic(e) => e.constant(),
        }
    }

    pub fn num_vars(&self) -> usize {
        match self {
            ScalarExpression::Constant(k) => k.num_vars(),
            ScalarExpression::Variable(v) => v.num_vars(),
            ScalarExpression::Linear(e) => e.num_vars(),
            ScalarExpression::Quadratic(e) => e.num_vars(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarExpression::Constant(_) => "Constant",
            ScalarExpression::Variable(_) => "Variable",
            ScalarExpression::Linear(_) => "ScalarLinearExpr",
            ScalarExpression::Quadratic(_) => "ScalarQuadraticExpr",
        }
    }

    pub fn less_eq(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        ScalarConstraint::new(self.clone(), rhs, ConstraintSense::LessEqual)
    }

    pub fn greater_eq(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        ScalarConstraint::new(self.clone(), rhs, ConstraintSense::GreaterEqual)
    }

    pub fn equals(&self, rhs: impl Into<ScalarExpression>) -> ScalarConstraint {
        ScalarConstraint::new(self.clone(), rhs, ConstraintSense::Equal)
    }
}

impl Default for ScalarExpression {
    fn default() -> Self {
        ScalarExpression::Constant(K::ZERO)
    }
}

impl From<K> for ScalarExpression {
    fn from(k: K) -> Self {
        ScalarExpression::Constant(k)
    }
}

impl From<f64> for ScalarExpression {
    fn from(value: f64) -> Self {
        ScalarExpression::Constant(K(value))
    }
}

impl From<Variable> for ScalarExpression {
    fn from(variable: Variable) -> Self {
        ScalarExpression::Variable(variable)
    }
}

impl From<&Variable> for ScalarExpression {
    fn from(variable: &Variable) -> Self {
        ScalarExpression::Variable(*variable)
    }
}

impl From<ScalarLinearExpr> for ScalarExpression {
    fn from(expr: ScalarLinearExpr) -> Self {
        ScalarExpression::Linear(expr)
    }
}

impl From<ScalarQuadraticExpr> for ScalarExpression {
    fn from(expr: ScalarQuadraticExpr) -> Self {
        ScalarExpression::Quadratic(expr)
    }
}

/// Any vector-valued expression
#[derive(Debug, Clone, PartialEq)]
pub enum VectorExpression {
    Constant(KVector),
    Variables(VarVector),
    Linear(VectorLinearExpr),
}

impl VectorExpression {
    /// Output length
    pub fn len(&self) -> usize {
        match self {
            VectorExpression::Constant(k) => k.len(),
            VectorExpression::Variables(v) => v.len(),
            VectorExpression::Linear(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add two vector expressions of equal length
    pub fn plus(&self, other: &VectorExpression) -> Result<VectorExpression, ExprError> {
        if self.len() != other.len() {
            return Err(ExprError::dimension(
                "vector expression lengths",
                self.len(),
                other.len(),
            ));
        }

        match (self, other) {
            (VectorExpression::Constant(a), VectorExpression::Constant(b)) => {
                Ok(VectorExpression::Constant(KVector(&a.0 + &b.0)))
            }
            _ => self
                .to_linear()
                .plus_linear(&other.to_linear())
                .map(VectorExpression::Linear),
        }
    }

    /// Add `k` to every output row
    pub fn plus_scalar(&self, k: K) -> VectorExpression {
        match self {
            VectorExpression::Constant(c) => VectorExpression::Constant(c.plus_scalar(k)),
            _ => {
                let linear = self.to_linear();
                let offset = linear.constant().add_scalar(k.0);
                VectorExpression::Linear(VectorLinearExpr::from_parts(
                    linear.vars().clone(),
                    linear.linear_coeff().clone(),
                    offset,
                ))
            }
        }
    }

    pub fn mult(&self, c: f64) -> VectorExpression {
        match self {
            VectorExpression::Constant(k) => VectorExpression::Constant(k.mult(c)),
            VectorExpression::Variables(v) => VectorExpression::Linear(v.mult(c)),
            VectorExpression::Linear(e) => VectorExpression::Linear(e.mult(c)),
        }
    }

    /// Output row `index` as a scalar expression
    pub fn at_vec(&self, index: usize) -> Result<ScalarExpression, ExprError> {
        let out_of_range = || ExprError::dimension("row index vs. output length", self.len(), index);
        match self {
            VectorExpression::Constant(k) => k
                .at_vec(index)
                .map(ScalarExpression::Constant)
                .ok_or_else(out_of_range),
            VectorExpression::Variables(v) => v
                .at(index)
                .map(ScalarExpression::Variable)
                .ok_or_else(out_of_range),
            VectorExpression::Linear(e) => e.at_vec(index).map(ScalarExpression::Linear),
        }
    }

    /// The expression as `L x + C`
    pub fn to_linear(&self) -> VectorLinearExpr {
        match self {
            VectorExpression::Constant(k) => VectorLinearExpr::from_constant(k),
            VectorExpression::Variables(v) => VectorLinearExpr::from(v.clone()),
            VectorExpression::Linear(e) => e.clone(),
        }
    }

    pub fn ids(&self) -> Vec<u64> {
        match self {
            VectorExpression::Constant(k) => k.ids(),
            VectorExpression::Variables(v) => v.ids(),
            VectorExpression::Linear(e) => e.ids(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.ids().len()
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            VectorExpression::Constant(_) => "VectorConstant",
            VectorExpression::Variables(_) => "VarVector",
            VectorExpression::Linear(_) => "VectorLinearExpr",
        }
    }
}

impl From<KVector> for VectorExpression {
    fn from(k: KVector) -> Self {
        VectorExpression::Constant(k)
    }
}

impl From<Vec<f64>> for VectorExpression {
    fn from(values: Vec<f64>) -> Self {
        VectorExpression::Constant(KVector::from_vec(values))
    }
}

impl From<DVector<f64>> for VectorExpression {
    fn from(values: DVector<f64>) -> Self {
        VectorExpression::Constant(KVector(values))
    }
}

impl From<VarVector> for VectorExpression {
    fn from(vars: VarVector) -> Self {
        VectorExpression::Variables(vars)
    }
}

impl From<Vec<Variable>> for VectorExpression {
    fn from(vars: Vec<Variable>) -> Self {
        VectorExpression::Variables(VarVector::new(vars))
    }
}

impl From<VectorLinearExpr> for VectorExpression {
    fn from(expr: VectorLinearExpr) -> Self {
        VectorExpression::Linear(expr)
    }
}

/// Any expression, scalar or vector
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Scalar(ScalarExpression),
    Vector(VectorExpression),
}

impl Expression {
    /// Add two expressions
    ///
    /// A vector and a scalar constant add by broadcasting the constant; any
    /// other scalar/vector mix is rejected.
    pub fn plus(&self, other: &Expression) -> Result<Expression, ExprError> {
        match (self, other) {
            (Expression::Scalar(a), Expression::Scalar(b)) => Ok(Expression::Scalar(a.plus(b))),
            (Expression::Vector(a), Expression::Vector(b)) => a.plus(b).map(Expression::Vector),
            (Expression::Vector(v), Expression::Scalar(ScalarExpression::Constant(k)))
            | (Expression::Scalar(ScalarExpression::Constant(k)), Expression::Vector(v)) => {
                Ok(Expression::Vector(v.plus_scalar(*k)))
            }
            _ => Err(ExprError::unsupported(
                "Plus",
                self.kind_name(),
                other.kind_name(),
            )),
        }
    }

    pub fn mult(&self, c: f64) -> Expression {
        match self {
            Expression::Scalar(e) => Expression::Scalar(e.mult(c)),
            Expression::Vector(e) => Expression::Vector(e.mult(c)),
        }
    }

    /// Build `self <sense> rhs`
    ///
    /// Scalar comparisons never fail. Vector comparisons check output
    /// lengths; a scalar constant on either side is broadcast first.
    pub fn comparison(
        &self,
        rhs: impl Into<Expression>,
        sense: ConstraintSense,
    ) -> Result<Constraint, ExprError> {
        let rhs = rhs.into();
        match (self, &rhs) {
            (Expression::Scalar(l), Expression::Scalar(r)) => Ok(Constraint::Scalar(
                ScalarConstraint::new(l.clone(), r.clone(), sense),
            )),
            (Expression::Vector(l), Expression::Vector(r)) => {
                VectorConstraint::new(l.clone(), r.clone(), sense).map(Constraint::Vector)
            }
            (Expression::Vector(l), Expression::Scalar(ScalarExpression::Constant(k))) => {
                VectorConstraint::new(l.clone(), KVector::broadcast(*k, l.len()), sense)
                    .map(Constraint::Vector)
            }
            (Expression::Scalar(ScalarExpression::Constant(k)), Expression::Vector(r)) => {
                VectorConstraint::new(KVector::broadcast(*k, r.len()), r.clone(), sense)
                    .map(Constraint::Vector)
            }
            _ => Err(ExprError::unsupported(
                "Comparison",
                self.kind_name(),
                rhs.kind_name(),
            )),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Scalar(e) => e.kind_name(),
            Expression::Vector(e) => e.kind_name(),
        }
    }
}

macro_rules! impl_into_expression {
    ($variant:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::$variant(value.into())
                }
            }
        )+
    };
}

impl_into_expression!(Scalar: K, f64, Variable, ScalarLinearExpr, ScalarQuadraticExpr, ScalarExpression);
impl_into_expression!(Vector: KVector, VarVector, VectorLinearExpr, VectorExpression);
