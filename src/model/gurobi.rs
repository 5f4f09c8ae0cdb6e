//! Gurobi backend (linear and quadratic objectives)

use std::collections::HashMap;

use ::gurobi::{
    ConstrSense, Env, LinExpr, Model, ModelSense, QuadExpr, Var, VarType, attr, param,
};
use anyhow::{Context, Result, anyhow};
use tracing::warn;

use super::{
    ConstraintSense, Objective, OptimisationSense, OptimisationStatus, ScalarExpression, Solution,
    VariableType, constraint::ScalarConstraint, output_suppression::silence_unless,
    variable::Variable,
};

/// A Gurobi model under construction
///
/// `model` is `None` once the solver has been deleted.
pub struct GurobiSolver {
    model: Option<Model>,
    vars: HashMap<u64, Var>,
    rows: usize,
    show_log: bool,
}

impl GurobiSolver {
    pub fn new() -> Result<Self> {
        let env = Env::new("")?;
        let mut model = Model::new("optim", &env)?;
        model.get_env_mut().set(param::OutputFlag, 0)?;

        Ok(Self {
            model: Some(model),
            vars: HashMap::new(),
            rows: 0,
            show_log: false,
        })
    }

    fn model(&mut self) -> Result<&mut Model> {
        self.model
            .as_mut()
            .ok_or_else(|| anyhow!("Gurobi solver used after it was deleted"))
    }

    fn var(&self, id: u64) -> Result<Var> {
        self.vars
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("Variable x{} not found in model", id))
    }

    fn linear_expr(&self, ids: &[u64], coeffs: &[f64], constant: f64) -> Result<LinExpr> {
        let mut expr = LinExpr::new();
        for (&id, &coeff) in ids.iter().zip(coeffs) {
            expr = expr.add_term(coeff, self.var(id)?);
        }
        Ok(expr.add_constant(constant))
    }

    fn quadratic_expr(&self, expression: &ScalarExpression) -> Result<QuadExpr> {
        let quadratic = expression.to_quadratic().folded();
        let ids = quadratic.ids();
        let q = quadratic.quadratic_coeff();

        let mut expr = QuadExpr::new();
        for (i, &id) in ids.iter().enumerate() {
            let coeff = quadratic.linear_coeff()[i];
            if coeff != 0.0 {
                expr = expr.add_term(coeff, self.var(id)?);
            }
        }

        // x'Qx over the upper triangle
        for i in 0..ids.len() {
            for j in i..ids.len() {
                let coeff = if i == j {
                    q[(i, i)]
                } else {
                    q[(i, j)] + q[(j, i)]
                };
                if coeff != 0.0 {
                    expr = expr.add_qterm(coeff, self.var(ids[i])?, self.var(ids[j])?);
                }
            }
        }

        Ok(expr.add_constant(quadratic.constant()))
    }
}

impl super::Solver for GurobiSolver {
    fn show_log(&mut self, show: bool) -> Result<()> {
        self.show_log = show;
        self.model()?
            .get_env_mut()
            .set(param::OutputFlag, if show { 1 } else { 0 })?;
        Ok(())
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<()> {
        self.model()?.get_env_mut().set(param::TimeLimit, seconds)?;
        Ok(())
    }

    fn add_variable(&mut self, variable: &Variable) -> Result<()> {
        let vtype = match variable.var_type() {
            VariableType::Continuous => VarType::Continuous,
            VariableType::Integer => VarType::Integer,
            VariableType::Binary => VarType::Binary,
        };

        let var = self.model()?.add_var(
            &format!("x{}", variable.id()),
            vtype,
            0.0,
            variable.lower(),
            variable.upper(),
            &[],
            &[],
        )?;
        self.vars.insert(variable.id(), var);
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &ScalarConstraint) -> Result<()> {
        let row = constraint
            .linear_row()
            .context("quadratic constraints are not supported")?;
        let expr = self.linear_expr(&row.ids, &row.coeffs, 0.0)?;

        let sense = match row.sense {
            ConstraintSense::LessEqual => ConstrSense::Less,
            ConstraintSense::Equal => ConstrSense::Equal,
            ConstraintSense::GreaterEqual => ConstrSense::Greater,
        };

        let name = format!("c{}", self.rows);
        self.model()?.add_constr(&name, expr, sense, row.rhs)?;
        self.rows += 1;
        Ok(())
    }

    fn set_objective(&mut self, objective: &Objective) -> Result<()> {
        let sense = match objective.sense {
            OptimisationSense::Minimise => ModelSense::Minimize,
            OptimisationSense::Maximise => ModelSense::Maximize,
        };

        // Variables must be visible before the objective refers to them
        self.model()?.update()?;

        match objective.expression.as_linear() {
            Some(linear) => {
                let linear = linear.folded();
                let expr = self.linear_expr(&linear.ids(), linear.coeffs(), linear.constant())?;
                self.model()?.set_objective(expr, sense)?;
            }
            None => {
                let expr = self.quadratic_expr(&objective.expression)?;
                self.model()?.set_objective(expr, sense)?;
            }
        }
        Ok(())
    }

    fn optimize(&mut self) -> Result<Solution> {
        let _gag = silence_unless(self.show_log)?;
        let model = self
            .model
            .as_mut()
            .ok_or_else(|| anyhow!("Gurobi solver used after it was deleted"))?;

        model.optimize()?;

        let native = model.status()?;
        let status = OptimisationStatus::from_code(native as i32).unwrap_or_else(|| {
            warn!(status = ?native, "unknown Gurobi status");
            OptimisationStatus::Interrupted
        });

        let (values, objective) = match status {
            OptimisationStatus::Optimal => {
                let mut values = HashMap::with_capacity(self.vars.len());
                for (&id, var) in &self.vars {
                    values.insert(id, var.get(model, attr::X)?);
                }
                (values, model.get(attr::ObjVal)?)
            }
            _ => (HashMap::new(), 0.0),
        };

        Ok(Solution {
            values,
            objective,
            status,
        })
    }

    fn delete_solver(&mut self) -> Result<()> {
        self.model = None;
        self.vars.clear();
        self.rows = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint;
    use crate::model::Model as OptimModel;

    #[test]
    fn test_solve_small_lp() {
        let mut model = OptimModel::new();
        let x = model.add_variable(0.0, 10.0, VariableType::Continuous);
        let y = model.add_variable(0.0, 10.0, VariableType::Continuous);
        model.add_constraint(constraint!((x + y) <= 4.0));
        model.add_constraint(constraint!((y) <= 3.0));
        model.set_objective(x + 2.0 * y, OptimisationSense::Maximise);

        let Ok(solver) = GurobiSolver::new() else {
            // No licence on this machine
            return;
        };
        let solution = model.optimize(solver).unwrap();

        assert!((solution.objective - 7.0).abs() < 1e-6);
        assert!((solution.value(&y).unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_solve_quadratic_objective() {
        // min x^2 + y^2 - 2x - 4y  s.t.  x + y <= 1
        let mut model = OptimModel::new();
        let x = model.add_variable(-10.0, 10.0, VariableType::Continuous);
        let y = model.add_variable(-10.0, 10.0, VariableType::Continuous);
        let q = crate::model::ScalarQuadraticExpr::from_quadratic(
            nalgebra::DMatrix::identity(2, 2),
            vec![x, y],
        )
        .unwrap();
        model.add_constraint(constraint!((x + y) <= 1.0));
        model.set_objective(
            ScalarExpression::from(q) + (-2.0) * x + (-4.0) * y,
            OptimisationSense::Minimise,
        );

        let Ok(solver) = GurobiSolver::new() else {
            return;
        };
        let solution = model.optimize(solver).unwrap();

        // Optimum on x + y = 1 at x = 0, y = 1
        assert!((solution.value(&x).unwrap() - 0.0).abs() < 1e-4);
        assert!((solution.value(&y).unwrap() - 1.0).abs() < 1e-4);
        assert!((solution.objective + 3.0).abs() < 1e-4);
    }
}
