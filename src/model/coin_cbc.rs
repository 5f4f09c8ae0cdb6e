//! COIN-OR CBC backend (linear objectives only)

use std::collections::HashMap;

use ::coin_cbc::{Col, Model, Sense};
use anyhow::{Context, Result, anyhow, bail};

use super::{
    ConstraintSense, Objective, OptimisationSense, OptimisationStatus, Solution, VariableType,
    constraint::ScalarConstraint, output_suppression::silence_unless, variable::Variable,
};

/// Round a floating-point number to a specified number of significant digits
/// This is an workaround to mask floating point errors in CBC.
fn round_to_sig_digits(value: f64, digits: u32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(digits as i32 - magnitude - 1);
    (value * scale).round() / scale
}

/// A CBC model under construction
///
/// `model` is `None` once the solver has been deleted.
pub struct CbcSolver {
    model: Option<Model>,
    columns: HashMap<u64, Col>,
    objective: Option<(Vec<(Col, f64)>, f64)>,
    show_log: bool,
}

impl CbcSolver {
    pub fn new() -> Self {
        let mut model = Model::default();
        model.set_parameter("log", "0");
        Self {
            model: Some(model),
            columns: HashMap::new(),
            objective: None,
            show_log: false,
        }
    }

    fn model(&mut self) -> Result<&mut Model> {
        self.model
            .as_mut()
            .ok_or_else(|| anyhow!("CBC solver used after it was deleted"))
    }

    fn column(&self, id: u64) -> Result<Col> {
        self.columns
            .get(&id)
            .copied()
            .ok_or_else(|| anyhow!("Variable x{} not found in model", id))
    }
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Solver for CbcSolver {
    fn show_log(&mut self, show: bool) -> Result<()> {
        self.show_log = show;
        self.model()?.set_parameter("log", if show { "1" } else { "0" });
        Ok(())
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<()> {
        self.model()?.set_parameter("sec", &seconds.to_string());
        Ok(())
    }

    fn add_variable(&mut self, variable: &Variable) -> Result<()> {
        let model = self.model()?;
        let col = match variable.var_type() {
            VariableType::Continuous => {
                let col = model.add_col();
                model.set_col_lower(col, variable.lower());
                model.set_col_upper(col, variable.upper());
                col
            }
            VariableType::Integer => {
                let col = model.add_integer();
                model.set_col_lower(col, variable.lower());
                model.set_col_upper(col, variable.upper());
                col
            }
            VariableType::Binary => model.add_binary(),
        };
        self.columns.insert(variable.id(), col);
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &ScalarConstraint) -> Result<()> {
        let row = constraint
            .linear_row()
            .context("CBC only accepts linear constraints")?;
        let weights = row
            .ids
            .iter()
            .zip(&row.coeffs)
            .map(|(&id, &coeff)| Ok((self.column(id)?, coeff)))
            .collect::<Result<Vec<_>>>()?;

        let model = self.model()?;
        let native = model.add_row();
        for (col, coeff) in weights {
            model.set_weight(native, col, coeff);
        }

        match row.sense {
            ConstraintSense::LessEqual => model.set_row_upper(native, row.rhs),
            ConstraintSense::Equal => model.set_row_equal(native, row.rhs),
            ConstraintSense::GreaterEqual => model.set_row_lower(native, row.rhs),
        }
        Ok(())
    }

    fn set_objective(&mut self, objective: &Objective) -> Result<()> {
        if objective.degree() > 1 {
            bail!("CBC does not support quadratic objectives");
        }

        let linear = objective
            .expression
            .as_linear()
            .ok_or_else(|| anyhow!("CBC does not support quadratic objectives"))?
            .folded();
        let terms = linear
            .terms()
            .map(|(id, coeff)| Ok((self.column(id)?, coeff)))
            .collect::<Result<Vec<_>>>()?;

        let model = self.model()?;
        for &(col, coeff) in &terms {
            model.set_obj_coeff(col, coeff);
        }
        model.set_obj_sense(match objective.sense {
            OptimisationSense::Minimise => Sense::Minimize,
            OptimisationSense::Maximise => Sense::Maximize,
        });

        self.objective = Some((terms, linear.constant()));
        Ok(())
    }

    fn optimize(&mut self) -> Result<Solution> {
        let _gag = silence_unless(self.show_log)?;
        let solution = self.model()?.solve();

        let raw = solution.raw();
        let status = if raw.is_proven_optimal() {
            OptimisationStatus::Optimal
        } else if raw.is_proven_infeasible() {
            OptimisationStatus::Infeasible
        } else if raw.is_continuous_unbounded() {
            OptimisationStatus::Unbounded
        } else if raw.is_seconds_limit_reached() {
            OptimisationStatus::TimeLimit
        } else if raw.is_node_limit_reached() {
            OptimisationStatus::NodeLimit
        } else if raw.is_solution_limit_reached() {
            OptimisationStatus::SolutionLimit
        } else if raw.is_abandoned() {
            OptimisationStatus::Numeric
        } else {
            OptimisationStatus::Interrupted
        };

        let values: HashMap<u64, f64> = self
            .columns
            .iter()
            .map(|(&id, &col)| (id, round_to_sig_digits(solution.col(col), 8)))
            .collect();

        let objective = match &self.objective {
            Some((terms, constant)) => {
                let value = terms
                    .iter()
                    .fold(*constant, |acc, &(col, coeff)| acc + coeff * solution.col(col));
                round_to_sig_digits(value, 8)
            }
            None => 0.0,
        };

        Ok(Solution {
            values,
            objective,
            status,
        })
    }

    fn delete_solver(&mut self) -> Result<()> {
        self.model = None;
        self.columns.clear();
        self.objective = None;
        Ok(())
    }
}
