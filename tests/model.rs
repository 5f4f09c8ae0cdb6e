use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, bail};
use optim::constraint;
use optim::model::{
    Model, Objective, OptimisationSense, OptimisationStatus, ScalarConstraint, Solution, Solver,
    Variable,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ShowLog(bool),
    TimeLimit(f64),
    Variable(u64),
    Constraint(String),
    Objective(u8),
    Optimize,
    Delete,
}

/// Records every call and answers `optimize` with a canned status
struct Recorder {
    calls: Vec<Call>,
    status: OptimisationStatus,
    fail_on_constraint: bool,
}

impl Recorder {
    fn new(status: OptimisationStatus) -> Self {
        Self {
            calls: Vec::new(),
            status,
            fail_on_constraint: false,
        }
    }

    fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Solver for Recorder {
    fn show_log(&mut self, show: bool) -> Result<()> {
        self.calls.push(Call::ShowLog(show));
        Ok(())
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<()> {
        self.calls.push(Call::TimeLimit(seconds));
        Ok(())
    }

    fn add_variable(&mut self, variable: &Variable) -> Result<()> {
        self.calls.push(Call::Variable(variable.id()));
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &ScalarConstraint) -> Result<()> {
        if self.fail_on_constraint {
            bail!("row rejected");
        }
        self.calls.push(Call::Constraint(constraint.to_string()));
        Ok(())
    }

    fn set_objective(&mut self, objective: &Objective) -> Result<()> {
        self.calls.push(Call::Objective(objective.degree()));
        Ok(())
    }

    fn optimize(&mut self) -> Result<Solution> {
        self.calls.push(Call::Optimize);
        Ok(Solution {
            values: HashMap::new(),
            objective: 42.0,
            status: self.status,
        })
    }

    fn delete_solver(&mut self) -> Result<()> {
        self.calls.push(Call::Delete);
        Ok(())
    }
}

fn small_model() -> Model {
    let mut model = Model::new();
    let x = model.add_binary_variable();
    let v = model.add_binary_variable_vector(2);
    model.add_constraint(constraint!((x) <= 1.0));
    model.add_constraint(v.greater_eq(vec![0.0, 1.0]));
    model.set_objective(x + v.elements()[0], OptimisationSense::Minimise);
    model
}

#[test]
fn test_optimize_call_order() {
    let model = small_model();
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    let solution = model.optimize(&mut solver).unwrap();

    assert_eq!(solution.objective, 42.0);
    let kinds: Vec<_> = solver
        .calls
        .iter()
        .map(|call| match call {
            Call::ShowLog(_) => "log",
            Call::TimeLimit(_) => "time",
            Call::Variable(_) => "var",
            Call::Constraint(_) => "row",
            Call::Objective(_) => "obj",
            Call::Optimize => "optimize",
            Call::Delete => "delete",
        })
        .collect();
    assert_eq!(
        kinds,
        ["log", "var", "var", "var", "row", "row", "row", "obj", "optimize", "delete"]
    );
    assert_eq!(solver.calls[0], Call::ShowLog(false));
    assert_eq!(solver.calls[7], Call::Objective(1));
}

#[test]
fn test_time_limit_only_when_set() {
    let mut model = small_model();
    model.show_log(true);
    model.set_time_limit(Duration::from_millis(1500));
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    model.optimize(&mut solver).unwrap();

    assert_eq!(solver.calls[0], Call::ShowLog(true));
    assert_eq!(solver.calls[1], Call::TimeLimit(1.5));
}

#[test]
fn test_vector_constraint_reaches_solver_as_rows() {
    let model = small_model();
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    model.optimize(&mut solver).unwrap();

    let rows: Vec<_> = solver
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::Constraint(row) => Some(row.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].contains(">="));
    assert!(rows[2].contains(">="));
}

#[test]
fn test_non_optimal_status_is_an_error() {
    let model = small_model();
    let mut solver = Recorder::new(OptimisationStatus::Infeasible);

    let err = model.optimize(&mut solver).unwrap_err();

    assert!(err.to_string().contains("Infeasible (3)"));
    assert_eq!(solver.count(&Call::Delete), 1);
}

#[test]
fn test_solver_error_still_deletes_once() {
    let model = small_model();
    let mut solver = Recorder::new(OptimisationStatus::Optimal);
    solver.fail_on_constraint = true;

    let err = model.optimize(&mut solver).unwrap_err();

    assert_eq!(err.to_string(), "row rejected");
    assert_eq!(solver.count(&Call::Optimize), 0);
    assert_eq!(solver.count(&Call::Delete), 1);
}

#[test]
fn test_model_without_objective_skips_set_objective() {
    let mut model = Model::new();
    let x = model.add_binary_variable();
    model.add_constraint(constraint!((x) >= 0.0));
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    model.optimize(&mut solver).unwrap();

    assert!(
        !solver
            .calls
            .iter()
            .any(|call| matches!(call, Call::Objective(_)))
    );
}

#[test]
fn test_empty_model_never_touches_solver() {
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    let err = Model::new().optimize(&mut solver).unwrap_err();

    assert_eq!(err.to_string(), "no variables in model");
    assert!(solver.calls.is_empty());
}

#[test]
fn test_quadratic_objective_degree_reaches_solver() {
    let mut model = Model::new();
    let v = model.add_variable_vector(2);
    let q = optim::model::ScalarQuadraticExpr::from_quadratic(
        nalgebra::DMatrix::identity(2, 2),
        v.clone(),
    )
    .unwrap();
    model.set_objective(q, OptimisationSense::Minimise);
    let mut solver = Recorder::new(OptimisationStatus::Optimal);

    model.optimize(&mut solver).unwrap();

    assert_eq!(solver.count(&Call::Objective(2)), 1);
}
