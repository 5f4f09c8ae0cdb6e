//! Symbolic optimisation models
//!
//! This module lets callers declare decision variables, combine them into
//! linear and quadratic expressions, compare expressions into constraints and
//! hand the assembled [`Model`] to a [`Solver`].
//!
//! # Expression kinds
//!
//! | kind                    | shape      | degree |
//! |-------------------------|------------|--------|
//! | [`K`]                   | scalar     | 0      |
//! | [`Variable`]            | scalar     | 1      |
//! | [`ScalarLinearExpr`]    | scalar     | 1      |
//! | [`ScalarQuadraticExpr`] | scalar     | 2      |
//! | [`KVector`]             | vector     | 0      |
//! | [`VarVector`]           | vector     | 1      |
//! | [`VectorLinearExpr`]    | vector     | 1      |
//!
//! The closed sum types [`ScalarExpression`], [`VectorExpression`] and
//! [`Expression`] wrap them so that Plus, Mult and Comparison can dispatch by
//! exhaustive `match`.
//!
//! # Variable bases and alignment
//!
//! Every coefficient structure is stored against its own ordered
//! [`VarVector`]. Adding two expressions over different bases first rewrites
//! both of them into `unique(a ++ b)`, the deduplicated concatenation of the
//! two bases, and then adds them slot by slot. See [`align`] for the details.
//!
//! ```rust
//! use optim::model::{Model, ScalarExpression};
//!
//! let mut model = Model::new();
//! let a = model.add_binary_variable();
//! let b = model.add_binary_variable();
//! let c = model.add_binary_variable();
//!
//! // (a + b + 2) + (3b + 3c + 5)
//! let sle1 = a + b + 2.0;
//! let sle2 = 3.0 * b + 3.0 * c + 5.0;
//! let sum = sle1 + sle2;
//!
//! assert_eq!(sum.ids(), vec![a.id(), b.id(), c.id()]);
//! assert_eq!(sum.coeffs(), vec![1.0, 4.0, 3.0]);
//! assert_eq!(sum.constant(), 7.0);
//! assert!(matches!(sum, ScalarExpression::Linear(_)));
//! ```
//!
//! # Building constraints
//!
//! Scalar comparisons never fail and are stored as written. Vector
//! comparisons check that both sides have the same length and return a
//! `Result`, which [`Model::add_constraint`] accepts directly: a failed
//! comparison is logged and dropped rather than stored.
//!
//! ```rust
//! use optim::constraint;
//! use optim::model::{KVector, Model};
//!
//! let mut model = Model::new();
//! let x = model.add_binary_variable();
//! let y = model.add_binary_variable();
//! let row = model.add_binary_variable_vector(3);
//!
//! model.add_constraint(constraint!((x + y) <= 1.0));
//! model.add_constraint(x.greater_eq(y));
//! model.add_constraint(row.less_eq(KVector::from_vec(vec![1.0, 1.0, 0.0])));
//!
//! // Length mismatch: rejected, nothing stored
//! assert!(model.add_constraint(row.equals(vec![1.0, 1.0])).is_none());
//! assert_eq!(model.constraints().len(), 3);
//! ```
//!
//! # Solver selection
//!
//! [`Model::optimize`] takes an explicit [`Solver`]. [`Model::solve`] picks a
//! compiled-in backend from the `OPTIM_SOLVER` environment variable:
//! - `"gurobi"` - Gurobi (requires the `gurobi` feature)
//! - `"coin_cbc"`, `"coin-cbc"` or `"cbc"` - COIN-OR CBC (requires the
//!   `coin_cbc` feature)
//!
//! If not set, it defaults to Gurobi if available, otherwise CBC.

use std::{collections::HashMap, env, time::Duration};

use anyhow::{Result, anyhow, bail};
use tracing::{debug, error, info};

/// Variable types supported by the solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Continuous variable (can take any real value)
    Continuous,
    /// Integer variable (can only take integer values)
    Integer,
    /// Binary variable (can only take values 0 or 1)
    Binary,
}

/// Comparison operator of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    /// Less than or equal to (≤)
    LessEqual,
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (≥)
    GreaterEqual,
}

impl std::fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::Equal => "==",
            ConstraintSense::GreaterEqual => ">=",
        })
    }
}

/// Optimisation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimisationSense {
    /// Minimise the objective function
    Minimise,
    /// Maximise the objective function
    Maximise,
}

/// Status reported by the solver at the end of an optimisation
///
/// Codes follow the Gurobi status numbering, which the other backends are
/// mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimisationStatus {
    Loaded,
    Optimal,
    Infeasible,
    InfeasibleOrUnbounded,
    Unbounded,
    Cutoff,
    IterationLimit,
    NodeLimit,
    TimeLimit,
    SolutionLimit,
    Interrupted,
    Numeric,
    Suboptimal,
    InProgress,
    UserObjectiveLimit,
    WorkLimit,
}

impl OptimisationStatus {
    const ALL: [OptimisationStatus; 16] = [
        OptimisationStatus::Loaded,
        OptimisationStatus::Optimal,
        OptimisationStatus::Infeasible,
        OptimisationStatus::InfeasibleOrUnbounded,
        OptimisationStatus::Unbounded,
        OptimisationStatus::Cutoff,
        OptimisationStatus::IterationLimit,
        OptimisationStatus::NodeLimit,
        OptimisationStatus::TimeLimit,
        OptimisationStatus::SolutionLimit,
        OptimisationStatus::Interrupted,
        OptimisationStatus::Numeric,
        OptimisationStatus::Suboptimal,
        OptimisationStatus::InProgress,
        OptimisationStatus::UserObjectiveLimit,
        OptimisationStatus::WorkLimit,
    ];

    /// Stable numeric code, 1 through 16
    pub fn code(&self) -> i32 {
        match self {
            OptimisationStatus::Loaded => 1,
            OptimisationStatus::Optimal => 2,
            OptimisationStatus::Infeasible => 3,
            OptimisationStatus::InfeasibleOrUnbounded => 4,
            OptimisationStatus::Unbounded => 5,
            OptimisationStatus::Cutoff => 6,
            OptimisationStatus::IterationLimit => 7,
            OptimisationStatus::NodeLimit => 8,
            OptimisationStatus::TimeLimit => 9,
            OptimisationStatus::SolutionLimit => 10,
            OptimisationStatus::Interrupted => 11,
            OptimisationStatus::Numeric => 12,
            OptimisationStatus::Suboptimal => 13,
            OptimisationStatus::InProgress => 14,
            OptimisationStatus::UserObjectiveLimit => 15,
            OptimisationStatus::WorkLimit => 16,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

impl std::fmt::Display for OptimisationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
enum SolverBackend {
    #[cfg(feature = "gurobi")]
    /// Gurobi commercial solver
    Gurobi,
    #[cfg(feature = "coin_cbc")]
    /// Coin CBC open-source solver
    CoinCbc,
}

impl SolverBackend {
    /// Get the solver backend from environment variable or use fallback logic
    fn from_env_or_default() -> Result<Self> {
        if let Ok(solver_name) = env::var("OPTIM_SOLVER") {
            match solver_name.to_lowercase().as_str() {
                "gurobi" => {
                    #[cfg(feature = "gurobi")]
                    return Ok(SolverBackend::Gurobi);
                    #[cfg(not(feature = "gurobi"))]
                    return Err(anyhow!(
                        "Gurobi solver requested via OPTIM_SOLVER but gurobi feature not enabled"
                    ));
                }
                "coin_cbc" | "coin-cbc" | "cbc" => {
                    #[cfg(feature = "coin_cbc")]
                    return Ok(SolverBackend::CoinCbc);
                    #[cfg(not(feature = "coin_cbc"))]
                    return Err(anyhow!(
                        "Coin CBC solver requested via OPTIM_SOLVER but coin_cbc feature not enabled"
                    ));
                }
                _ => {
                    return Err(anyhow!(
                        "Invalid solver '{}' in OPTIM_SOLVER. Valid options: gurobi, coin_cbc",
                        solver_name
                    ));
                }
            }
        }

        // Prefer gurobi if available, then coin_cbc
        #[cfg(feature = "gurobi")]
        return Ok(SolverBackend::Gurobi);

        #[allow(unreachable_code)]
        #[cfg(feature = "coin_cbc")]
        return Ok(SolverBackend::CoinCbc);

        #[cfg(not(any(feature = "gurobi", feature = "coin_cbc")))]
        Err(anyhow!(
            "No solver backend available. Please enable a solver feature (e.g., 'gurobi' or 'coin_cbc')"
        ))
    }
}

/// Index of a constraint in its model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

impl ConstraintId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The expression to optimise and its direction
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expression: ScalarExpression,
    pub sense: OptimisationSense,
}

impl Objective {
    pub fn new(expression: impl Into<ScalarExpression>, sense: OptimisationSense) -> Self {
        Self {
            expression: expression.into(),
            sense,
        }
    }

    /// Degree of the objective expression; solvers branch on this to build a
    /// linear or a quadratic native objective
    pub fn degree(&self) -> u8 {
        self.expression.degree()
    }

    pub fn num_vars(&self) -> usize {
        self.expression.num_vars()
    }
}

/// Result of an optimisation
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: HashMap<u64, f64>,
    pub objective: f64,
    pub status: OptimisationStatus,
}

impl Solution {
    /// Value assigned to a variable, if the solver reported one
    pub fn value(&self, variable: &Variable) -> Option<f64> {
        self.values.get(&variable.id()).copied()
    }

    /// Whether an integer or binary variable was set to one
    ///
    /// Values above 0.01 count as one. Continuous variables are never one.
    pub fn is_one(&self, variable: &Variable) -> bool {
        matches!(
            variable.var_type(),
            VariableType::Integer | VariableType::Binary
        ) && self.value(variable).is_some_and(|value| value > 0.01)
    }
}

/// Variables, constraints and an objective, ready to hand to a [`Solver`]
///
/// Variables and constraints are append-only; ids are handed out
/// sequentially and never reused.
#[derive(Debug, Clone, Default)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    show_log: bool,
    time_limit: Duration,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable with the next sequential id
    pub fn add_variable(&mut self, lower: f64, upper: f64, var_type: VariableType) -> Variable {
        let variable = Variable::new(self.variables.len() as u64, lower, upper, var_type);
        self.variables.push(variable);
        variable
    }

    /// Unbounded continuous variable
    pub fn add_continuous_variable(&mut self) -> Variable {
        self.add_variable(f64::NEG_INFINITY, f64::INFINITY, VariableType::Continuous)
    }

    pub fn add_binary_variable(&mut self) -> Variable {
        self.add_variable(0.0, 1.0, VariableType::Binary)
    }

    /// `n` unbounded continuous variables
    pub fn add_variable_vector(&mut self, n: usize) -> VarVector {
        self.add_variable_vector_with(
            n,
            f64::NEG_INFINITY,
            f64::INFINITY,
            VariableType::Continuous,
        )
    }

    pub fn add_variable_vector_with(
        &mut self,
        n: usize,
        lower: f64,
        upper: f64,
        var_type: VariableType,
    ) -> VarVector {
        (0..n)
            .map(|_| self.add_variable(lower, upper, var_type))
            .collect()
    }

    pub fn add_binary_variable_vector(&mut self, n: usize) -> VarVector {
        self.add_variable_vector_with(n, 0.0, 1.0, VariableType::Binary)
    }

    /// A `rows×cols` grid of variables, allocated row by row
    pub fn add_variable_matrix(
        &mut self,
        rows: usize,
        cols: usize,
        lower: f64,
        upper: f64,
        var_type: VariableType,
    ) -> Vec<Vec<Variable>> {
        (0..rows)
            .map(|_| {
                self.add_variable_vector_with(cols, lower, upper, var_type)
                    .elements()
                    .to_vec()
            })
            .collect()
    }

    pub fn add_binary_variable_matrix(&mut self, rows: usize, cols: usize) -> Vec<Vec<Variable>> {
        self.add_variable_matrix(rows, cols, 0.0, 1.0, VariableType::Binary)
    }

    /// Store a constraint
    ///
    /// Accepts built constraints as well as the `Result` of a fallible
    /// comparison. A failed comparison is logged and dropped, and `None` is
    /// returned.
    pub fn add_constraint(&mut self, constraint: impl ConstraintInput) -> Option<ConstraintId> {
        match constraint.into_constraint() {
            Ok(constraint) => {
                let id = ConstraintId(self.constraints.len());
                self.constraints.push(constraint);
                Some(id)
            }
            Err(err) => {
                error!(code = err.code(), "dropping constraint: {}", err);
                None
            }
        }
    }

    /// Set the objective, replacing any previous one
    pub fn set_objective(&mut self, expression: impl Into<ScalarExpression>, sense: OptimisationSense) {
        self.objective = Some(Objective::new(expression, sense));
    }

    /// Forward the solver's own log output
    pub fn show_log(&mut self, show: bool) {
        self.show_log = show;
    }

    /// Solver time limit; zero means no limit
    pub fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = limit;
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Push the model into `solver` and run it
    ///
    /// The solver is released exactly once whatever happens. Any status other
    /// than [`OptimisationStatus::Optimal`] is an error.
    pub fn optimize<S: Solver>(&self, solver: S) -> Result<Solution> {
        if self.variables.is_empty() {
            bail!("no variables in model");
        }

        let mut solver = SolverGuard::new(solver);

        solver.show_log(self.show_log)?;
        if !self.time_limit.is_zero() {
            solver.set_time_limit(self.time_limit.as_secs_f64())?;
        }

        solver.add_variables(&self.variables)?;

        let mut rows = 0;
        for constraint in &self.constraints {
            for row in constraint.rows()? {
                solver.add_constraint(&row)?;
                rows += 1;
            }
        }

        info!(
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            rows,
            objective_vars = self.objective.as_ref().map_or(0, Objective::num_vars),
            "optimising model"
        );

        if let Some(objective) = &self.objective {
            solver.set_objective(objective)?;
        }

        let solution = solver.optimize()?;
        solver.release()?;

        debug!(status = %solution.status, objective = solution.objective, "solver finished");

        if solution.status != OptimisationStatus::Optimal {
            bail!("solver finished with status {}", solution.status);
        }

        Ok(solution)
    }

    /// Optimise with the backend selected by `OPTIM_SOLVER`
    pub fn solve(&self) -> Result<Solution> {
        let backend = SolverBackend::from_env_or_default()?;

        match backend {
            #[cfg(feature = "gurobi")]
            SolverBackend::Gurobi => self.optimize(gurobi::GurobiSolver::new()?),

            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => self.optimize(coin_cbc::CbcSolver::new()),
        }
    }
}

pub mod align;
mod constant;
mod constraint;
mod error;
mod expression;
pub mod helpers;
pub mod macros;
mod ops;
mod scalar_linear;
mod scalar_quadratic;
mod solver;
mod var_vector;
mod variable;
mod vector_constant;
mod vector_linear;

#[cfg(any(feature = "gurobi", feature = "coin_cbc"))]
mod output_suppression;

#[cfg(feature = "gurobi")]
pub mod gurobi;

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc;

pub use constant::K;
pub use constraint::{
    Constraint, ConstraintInput, LinearRow, ScalarConstraint, VectorConstraint, comparison,
    equals, greater_eq, less_eq,
};
pub use error::ExprError;
pub use expression::{Expression, ScalarExpression, VectorExpression};
pub use helpers::{dot, sum, sum_col, sum_row, sum_vars};
pub use scalar_linear::ScalarLinearExpr;
pub use scalar_quadratic::ScalarQuadraticExpr;
pub use solver::{Solver, SolverGuard};
pub use var_vector::VarVector;
pub use variable::Variable;
pub use vector_constant::KVector;
pub use vector_linear::VectorLinearExpr;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint;

    #[test]
    fn test_ids_are_sequential() {
        let mut model = Model::new();
        let x = model.add_binary_variable();
        let v = model.add_variable_vector(3);
        let m = model.add_binary_variable_matrix(2, 2);

        assert_eq!(x.id(), 0);
        assert_eq!(v.ids(), vec![1, 2, 3]);
        assert_eq!(m[0][0].id(), 4);
        assert_eq!(m[1][1].id(), 7);
        assert_eq!(model.variables().len(), 8);
        assert_eq!(v.at(0).map(|v| v.var_type()), Some(VariableType::Continuous));
        assert_eq!(v.at(0).map(|v| v.lower()), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_add_constraint_drops_failed_comparisons() {
        let mut model = Model::new();
        let x = model.add_binary_variable();
        let v = model.add_binary_variable_vector(3);

        let first = model.add_constraint(constraint!((x) <= 1.0));
        let dropped = model.add_constraint(v.less_eq(KVector::from_vec(vec![1.0; 4])));
        let second = model.add_constraint(v.less_eq(KVector::from_vec(vec![1.0; 3])));

        assert_eq!(first.map(|id| id.index()), Some(0));
        assert_eq!(dropped, None);
        assert_eq!(second.map(|id| id.index()), Some(1));
        assert_eq!(model.constraints().len(), 2);
    }

    #[test]
    fn test_set_objective_replaces_previous() {
        let mut model = Model::new();
        let x = model.add_binary_variable();
        let y = model.add_binary_variable();

        model.set_objective(x, OptimisationSense::Minimise);
        model.set_objective(x + 2.0 * y, OptimisationSense::Maximise);

        let objective = model.objective().unwrap();
        assert_eq!(objective.sense, OptimisationSense::Maximise);
        assert_eq!(objective.num_vars(), 2);
        assert_eq!(objective.degree(), 1);
    }

    #[test]
    fn test_optimize_rejects_empty_model() {
        struct Unreachable;

        impl Solver for Unreachable {
            fn show_log(&mut self, _: bool) -> Result<()> {
                unreachable!()
            }
            fn set_time_limit(&mut self, _: f64) -> Result<()> {
                unreachable!()
            }
            fn add_variable(&mut self, _: &Variable) -> Result<()> {
                unreachable!()
            }
            fn add_constraint(&mut self, _: &ScalarConstraint) -> Result<()> {
                unreachable!()
            }
            fn set_objective(&mut self, _: &Objective) -> Result<()> {
                unreachable!()
            }
            fn optimize(&mut self) -> Result<Solution> {
                unreachable!()
            }
            fn delete_solver(&mut self) -> Result<()> {
                unreachable!()
            }
        }

        let err = Model::new().optimize(Unreachable).unwrap_err();
        assert_eq!(err.to_string(), "no variables in model");
    }

    #[test]
    fn test_status_codes_round_trip() {
        assert_eq!(OptimisationStatus::Loaded.code(), 1);
        assert_eq!(OptimisationStatus::WorkLimit.code(), 16);
        assert_eq!(
            OptimisationStatus::from_code(9),
            Some(OptimisationStatus::TimeLimit)
        );
        assert_eq!(OptimisationStatus::from_code(17), None);
    }

    #[test]
    fn test_is_one_needs_integer_variable() {
        let mut model = Model::new();
        let b = model.add_binary_variable();
        let c = model.add_continuous_variable();
        let solution = Solution {
            values: HashMap::from([(b.id(), 0.99), (c.id(), 1.0)]),
            objective: 0.0,
            status: OptimisationStatus::Optimal,
        };

        assert!(solution.is_one(&b));
        assert!(!solution.is_one(&c));
        assert_eq!(solution.value(&c), Some(1.0));
    }
}
