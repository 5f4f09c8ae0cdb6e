//! Symbolic optimisation modelling
//!
//! `optim` lets you describe a mathematical program in code: declare decision
//! variables, combine them with constants into linear and quadratic
//! expressions, compare expressions into constraints and hand the assembled
//! [`Model`] to a numerical [`Solver`].
//!
//! # Usage Example
//!
//! ```rust
//! use optim::constraint;
//! use optim::model::{Model, OptimisationSense, sum_vars};
//!
//! let mut model = Model::new();
//! let picks = model.add_binary_variable_vector(4);
//!
//! // Choose at most two items
//! model.add_constraint(constraint!((sum_vars(picks.elements())) <= 2.0));
//! model.set_objective(
//!     optim::model::dot(picks.elements(), &[3.0, 1.0, 4.0, 1.0]),
//!     OptimisationSense::Maximise,
//! );
//!
//! assert_eq!(model.variables().len(), 4);
//! assert_eq!(model.objective().map(|o| o.degree()), Some(1));
//! ```
//!
//! Solving requires a backend feature (`gurobi` or `coin_cbc`), see
//! [`Model::solve`].
//!
//! # Modules
//!
//! - **[`model`]**: expression kinds, constraints, the model and the solver
//!   boundary
//! - **[`logging`]**: opt-in `tracing` subscriber setup

pub mod logging;
pub mod model;

pub use logging::init_logging;
pub use model::{
    Constraint, ConstraintSense, ExprError, Expression, K, KVector, Model, OptimisationSense,
    OptimisationStatus, ScalarExpression, ScalarLinearExpr, ScalarQuadraticExpr, Solution,
    Solver, VarVector, Variable, VariableType, VectorExpression, VectorLinearExpr,
};
