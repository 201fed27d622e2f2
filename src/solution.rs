use crate::error::Error;
use crate::model::{LinearProgram, Relation, Sense};
use crate::options::SolverOptions;
use crate::simplex::has_artificial_residue;
use crate::tableau::Tableau;
use serde::Serialize;
use std::fmt;

/// Outcome kind reported to callers that do not inspect the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Optimal,
    Infeasible,
    Unbounded,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Optimal => write!(f, "Optimal"),
            Status::Infeasible => write!(f, "Infeasible"),
            Status::Unbounded => write!(f, "Unbounded"),
            Status::Failed => write!(f, "Failed"),
        }
    }
}

pub fn status(result: &Result<Solution, Error>) -> Status {
    match result {
        Ok(_) => Status::Optimal,
        Err(err) => err.status(),
    }
}

/// An optimal vertex of a [`LinearProgram`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    values: Vec<f64>,
    objective_value: f64,
    slacks: Vec<f64>,
    iterations: usize,
}

impl Solution {
    /// Reads the structural values off the final tableau. Fails with
    /// `Infeasible` if an artificial variable is still basic at a positive
    /// level, since then no point satisfies the original constraints.
    pub(crate) fn extract(
        tableau: &Tableau,
        program: &LinearProgram,
        iterations: usize,
        options: &SolverOptions,
    ) -> Result<Self, Error> {
        if has_artificial_residue(tableau, options) {
            return Err(Error::Infeasible);
        }

        let n = tableau.form().n;
        let mut values = vec![0.0; n];
        for (i, &j) in tableau.basis().iter().enumerate() {
            if j < n {
                debug_assert_eq!(tableau.basic_row_by_scan(j, options.tolerance), Some(i));
                values[j] = clamp_to_zero(tableau.rhs(i), options.tolerance);
            }
        }

        let objective_value = match program.sense() {
            Sense::Maximize => tableau.objective_rhs(),
            Sense::Minimize => -tableau.objective_rhs(),
        };

        let slacks = program
            .constraints()
            .iter()
            .map(|c| match c.relation {
                Relation::Ge => c.lhs(&values) - c.rhs,
                Relation::Le | Relation::Eq => c.rhs - c.lhs(&values),
            })
            .collect();

        Ok(Self {
            values,
            objective_value: clamp_to_zero(objective_value, 0.0),
            slacks,
            iterations,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Pivots performed to reach the optimum.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Per-constraint slack, oriented so that a satisfied constraint is
    /// non-negative (and zero for a satisfied equality).
    pub fn slacks(&self) -> &[f64] {
        &self.slacks
    }

    pub fn binding_constraints(&self, tol: f64) -> Vec<usize> {
        self.slacks
            .iter()
            .enumerate()
            .filter(|(_, s)| s.abs() <= tol)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_feasible_for(&self, program: &LinearProgram, tol: f64) -> bool {
        self.values.len() == program.num_variables()
            && self.values.iter().all(|&x| x >= -tol)
            && program
                .constraints()
                .iter()
                .all(|c| c.relation.holds(c.lhs(&self.values), c.rhs, tol))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z = {:.2}", self.objective_value)?;
        for (k, v) in self.values.iter().enumerate() {
            write!(f, " | X{}={:.2}", k + 1, v)?;
        }
        Ok(())
    }
}

/// Maps round-off noise around zero, including `-0.0`, to `0.0`.
fn clamp_to_zero(x: f64, tol: f64) -> f64 {
    if x.abs() <= tol {
        0.0
    } else {
        x
    }
}
