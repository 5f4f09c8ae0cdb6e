//! The boundary between a [`Model`](super::Model) and a numerical solver.

use std::ops::{Deref, DerefMut};

use anyhow::Result;
use tracing::warn;

use super::{Objective, Solution, constraint::ScalarConstraint, variable::Variable};

/// A numerical solver backend
///
/// The model pushes its variables, then its constraints (vector constraints
/// already expanded into scalar rows), then the objective, and finally calls
/// [`Solver::optimize`]. Backends keep their own map from variable id to
/// native column.
///
/// [`Solver::delete_solver`] releases native resources. It is called exactly
/// once per solver by [`SolverGuard`], on every exit path.
pub trait Solver {
    fn show_log(&mut self, show: bool) -> Result<()>;

    /// Time limit in seconds
    fn set_time_limit(&mut self, seconds: f64) -> Result<()>;

    fn add_variable(&mut self, variable: &Variable) -> Result<()>;

    fn add_variables(&mut self, variables: &[Variable]) -> Result<()> {
        for variable in variables {
            self.add_variable(variable)?;
        }
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &ScalarConstraint) -> Result<()>;

    /// Backends branch on [`Objective::degree`] to build a linear or a
    /// quadratic native objective
    fn set_objective(&mut self, objective: &Objective) -> Result<()>;

    fn optimize(&mut self) -> Result<Solution>;

    fn delete_solver(&mut self) -> Result<()>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn show_log(&mut self, show: bool) -> Result<()> {
        (**self).show_log(show)
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<()> {
        (**self).set_time_limit(seconds)
    }

    fn add_variable(&mut self, variable: &Variable) -> Result<()> {
        (**self).add_variable(variable)
    }

    fn add_variables(&mut self, variables: &[Variable]) -> Result<()> {
        (**self).add_variables(variables)
    }

    fn add_constraint(&mut self, constraint: &ScalarConstraint) -> Result<()> {
        (**self).add_constraint(constraint)
    }

    fn set_objective(&mut self, objective: &Objective) -> Result<()> {
        (**self).set_objective(objective)
    }

    fn optimize(&mut self) -> Result<Solution> {
        (**self).optimize()
    }

    fn delete_solver(&mut self) -> Result<()> {
        (**self).delete_solver()
    }
}

/// Owns a solver and deletes it exactly once
///
/// [`SolverGuard::release`] deletes the solver and reports the outcome. If the
/// guard is dropped without being released (an early return or `?`), the
/// solver is deleted on drop and a failure is only logged.
pub struct SolverGuard<S: Solver> {
    solver: S,
    released: bool,
}

impl<S: Solver> SolverGuard<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            released: false,
        }
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.solver.delete_solver()
    }
}

impl<S: Solver> Deref for SolverGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.solver
    }
}

impl<S: Solver> DerefMut for SolverGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.solver
    }
}

impl<S: Solver> Drop for SolverGuard<S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.solver.delete_solver() {
            warn!("failed to delete solver: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[derive(Default)]
    struct Counting {
        deletes: usize,
        fail_delete: bool,
    }

    impl Solver for Counting {
        fn show_log(&mut self, _: bool) -> Result<()> {
            Ok(())
        }
        fn set_time_limit(&mut self, _: f64) -> Result<()> {
            Ok(())
        }
        fn add_variable(&mut self, _: &Variable) -> Result<()> {
            Ok(())
        }
        fn add_constraint(&mut self, _: &ScalarConstraint) -> Result<()> {
            Ok(())
        }
        fn set_objective(&mut self, _: &Objective) -> Result<()> {
            Ok(())
        }
        fn optimize(&mut self) -> Result<Solution> {
            bail!("not a real solver")
        }
        fn delete_solver(&mut self) -> Result<()> {
            self.deletes += 1;
            if self.fail_delete {
                bail!("delete failed");
            }
            Ok(())
        }
    }

    #[test]
    fn test_release_deletes_once() {
        let mut solver = Counting::default();

        SolverGuard::new(&mut solver).release().unwrap();

        assert_eq!(solver.deletes, 1);
    }

    #[test]
    fn test_drop_deletes_once() {
        let mut solver = Counting::default();

        {
            let mut guard = SolverGuard::new(&mut solver);
            assert!(guard.optimize().is_err());
        }

        assert_eq!(solver.deletes, 1);
    }

    #[test]
    fn test_release_reports_delete_failure() {
        let mut solver = Counting {
            fail_delete: true,
            ..Default::default()
        };

        let err = SolverGuard::new(&mut solver).release().unwrap_err();

        assert_eq!(err.to_string(), "delete failed");
        assert_eq!(solver.deletes, 1);
    }
}
