use crate::error::Error;
use crate::model::{LinearProgram, Sense};
use crate::options::{PivotRule, SolverOptions};
use crate::solution::Solution;
use crate::standard_form::StandardForm;
use crate::tableau::Tableau;
use log::{debug, trace};

/// Solve `program` with the default [`SolverOptions`].
pub fn solve(program: &LinearProgram) -> Result<Solution, Error> {
    solve_with(program, &SolverOptions::default())
}

/// How [`optimize`] stopped when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// No column is left to enter.
    Optimal { iterations: usize },
    /// `column` can enter but has no positive entry in any constraint row.
    Ray { column: usize, iterations: usize },
}

/// Big-M simplex. `Ok` is always an optimal vertex; every other outcome,
/// including hitting the iteration cap, is an `Err`.
///
/// A ray along which some artificial variable grows only shows that the
/// penalty was too small. The solve is then repeated with a larger penalty,
/// at most `big_m_retries` times.
pub fn solve_with(program: &LinearProgram, options: &SolverOptions) -> Result<Solution, Error> {
    let mut big_m =
        options.penalty_for(program.largest_magnitude(), program.smallest_coefficient());
    let mut feasible = None;
    let mut retries = 0;
    loop {
        let mut tableau = Tableau::build(StandardForm::standardize(program), big_m)?;
        debug!(
            "initialized tableau: vars: {}, constraints: {}, artificials: {}, M: {}, rule: {:?}",
            tableau.form().n,
            tableau.m(),
            tableau.form().a,
            tableau.big_m(),
            options.pivot_rule,
        );

        let column = match optimize(&mut tableau, options)? {
            Outcome::Optimal { iterations } => {
                return Solution::extract(&tableau, program, iterations, options)
            }
            Outcome::Ray { column, .. } => column,
        };

        // A ray found before the artificials are driven out says nothing about
        // whether the constraints can be met at all.
        if has_artificial_residue(&tableau, options) {
            if feasible.is_none() {
                feasible = Some(has_feasible_point(program, options)?);
            }
            if feasible == Some(false) {
                return Err(Error::Infeasible);
            }
        }
        if !ray_grows_artificial(&tableau, column, options.tolerance) {
            return Err(Error::Unbounded);
        }

        match options.escalate(big_m) {
            Some(next) if retries < options.big_m_retries => {
                debug!(
                    "column {} is a ray only under M = {}, retrying with M = {}",
                    column, big_m, next
                );
                big_m = next;
                retries += 1;
            }
            _ => return Err(Error::PenaltyTooSmall { big_m }),
        }
    }
}

/// Minimizes the sum of the artificial variables alone, with unit weight.
/// The constraints admit a point exactly when that sum reaches zero.
fn has_feasible_point(program: &LinearProgram, options: &SolverOptions) -> Result<bool, Error> {
    debug!("ray with artificials in the basis, checking feasibility");
    let zero = LinearProgram::new(
        Sense::Minimize,
        vec![0.0; program.num_variables()],
        program.constraints().to_vec(),
    )?;
    let mut tableau = Tableau::build(StandardForm::standardize(&zero), 1.0)?;
    match optimize(&mut tableau, options)? {
        Outcome::Optimal { .. } => Ok(!has_artificial_residue(&tableau, options)),
        // The sum is bounded below by zero, so only rounding gets here.
        Outcome::Ray { iterations, .. } => Err(Error::NumericInstability { iteration: iterations }),
    }
}

/// Whether moving along `column` increases some basic artificial variable.
/// Such a ray leaves the feasible region of the original constraints.
fn ray_grows_artificial(tableau: &Tableau, column: usize, tol: f64) -> bool {
    tableau
        .basis()
        .iter()
        .enumerate()
        .any(|(i, &j)| tableau.form().is_artificial(j) && tableau.get(i, column) < -tol)
}

/// Whether any artificial variable is basic at a value above the feasibility
/// tolerance.
pub(crate) fn has_artificial_residue(tableau: &Tableau, options: &SolverOptions) -> bool {
    tableau
        .basis()
        .iter()
        .enumerate()
        .any(|(i, &j)| {
            tableau.form().is_artificial(j) && tableau.rhs(i) > options.feasibility_tolerance
        })
}

/// Runs pivots until no column outside the artificial block has a reduced
/// cost below `-tolerance`.
pub(crate) fn optimize(tableau: &mut Tableau, options: &SolverOptions) -> Result<Outcome, Error> {
    let tol = options.tolerance;
    for iteration in 0..options.max_iterations {
        let column = match entering(tableau.entering_costs(), options.pivot_rule, tol) {
            None => {
                debug!(
                    "found optimum in {} iterations, obj.: {}",
                    iteration,
                    tableau.objective_rhs()
                );
                return Ok(Outcome::Optimal {
                    iterations: iteration,
                });
            }
            Some(column) => column,
        };

        let (row, ratio) = match leaving(tableau, column, options.pivot_rule, tol) {
            None => {
                debug!("column {} is unbounded at iteration {}", column, iteration);
                return Ok(Outcome::Ray {
                    column,
                    iterations: iteration,
                });
            }
            Some(pair) => pair,
        };

        trace!(
            "iter {}: entering: {}, leaving: {} (row {}), ratio: {}",
            iteration,
            column,
            tableau.basis()[row],
            row,
            ratio
        );
        tableau.pivot(row, column);

        if !tableau.is_finite() {
            return Err(Error::NumericInstability {
                iteration: iteration + 1,
            });
        }
    }

    if entering(tableau.entering_costs(), options.pivot_rule, tol).is_none() {
        return Ok(Outcome::Optimal {
            iterations: options.max_iterations,
        });
    }
    debug!(
        "iteration limit {} reached, obj.: {}",
        options.max_iterations,
        tableau.objective_rhs()
    );
    Err(Error::IterationLimitExceeded {
        iterations: options.max_iterations,
    })
}

/// `None` when every reduced cost is at least `-tol`, i.e. the tableau is optimal.
fn entering(costs: &[f64], rule: PivotRule, tol: f64) -> Option<usize> {
    match rule {
        PivotRule::Bland => costs.iter().position(|&c| c < -tol),
        PivotRule::Dantzig => costs
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c < -tol)
            .fold(None, |best: Option<(usize, f64)>, (j, &c)| match best {
                Some((_, b)) if b <= c => best,
                _ => Some((j, c)),
            })
            .map(|(j, _)| j),
    }
}

/// Ratio test over rows with a pivot-column entry above `tol`. Returns the
/// pivot row and its ratio, or `None` when the column is unbounded.
fn leaving(tableau: &Tableau, column: usize, rule: PivotRule, tol: f64) -> Option<(usize, f64)> {
    let basis = tableau.basis();
    let mut best: Option<(usize, f64)> = None;
    for i in 0..tableau.m() {
        let entry = tableau.get(i, column);
        if entry <= tol {
            continue;
        }
        let ratio = tableau.rhs(i) / entry;
        best = match best {
            None => Some((i, ratio)),
            Some((_, r)) if ratio < r - tol => Some((i, ratio)),
            // Bland: near-ties leave by the smallest basic column.
            Some((b, r)) if rule == PivotRule::Bland && ratio <= r + tol && basis[i] < basis[b] => {
                Some((i, ratio))
            }
            Some((_, r)) if rule == PivotRule::Dantzig && ratio < r => Some((i, ratio)),
            _ => best,
        };
    }
    best
}
