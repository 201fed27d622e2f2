use crate::error::{Error, MalformedInput};
use crate::model::LinearProgram;
use crate::options::SolverOptions;
use crate::simplex::solve_with;
use crate::solution::Solution;
use log::debug;

/// Re-solves `program` once per value, with the rhs of constraint `row`
/// replaced by that value. Each solve is independent of the others.
///
/// Fails up front only if `row` does not name a constraint; per-value
/// outcomes, including malformed values, are reported in the returned list.
pub fn rhs_sweep<I>(
    program: &LinearProgram,
    row: usize,
    values: I,
    options: &SolverOptions,
) -> Result<Vec<(f64, Result<Solution, Error>)>, Error>
where
    I: IntoIterator<Item = f64>,
{
    if row >= program.num_constraints() {
        return Err(MalformedInput::RowOutOfRange {
            row,
            rows: program.num_constraints(),
        }
        .into());
    }

    let results = values
        .into_iter()
        .map(|rhs| {
            let result = program
                .with_rhs(row, rhs)
                .and_then(|p| solve_with(&p, options));
            (rhs, result)
        })
        .collect::<Vec<_>>();

    debug!("swept rhs of constraint {} over {} values", row, results.len());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relation, Sense};
    use crate::solution::{status, Status};
    use approx::assert_abs_diff_eq;

    fn program() -> LinearProgram {
        LinearProgram::builder(Sense::Maximize, vec![3.0, 5.0])
            .constraint(vec![1.0, 0.0], Relation::Le, 4.0)
            .constraint(vec![0.0, 2.0], Relation::Le, 12.0)
            .constraint(vec![3.0, 2.0], Relation::Le, 18.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_sweep() {
        let results = rhs_sweep(&program(), 2, [12.0, 18.0, 24.0], &SolverOptions::default())
            .unwrap();
        let objectives = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().objective_value())
            .collect::<Vec<_>>();

        // 3x1 + 2x2 <= b with x2 = 6 binding: x1 = (b - 12) / 3 until x1 hits 4.
        assert_abs_diff_eq!(objectives[0], 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(objectives[1], 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(objectives[2], 42.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_matches_single_solve() {
        let options = SolverOptions::default();
        let results = rhs_sweep(&program(), 0, [1.0, 2.0], &options).unwrap();
        for (rhs, result) in results {
            let single = solve_with(&program().with_rhs(0, rhs).unwrap(), &options);
            assert_eq!(result, single);
        }
    }

    #[test]
    fn test_sweep_statuses() {
        let program = LinearProgram::builder(Sense::Maximize, vec![1.0, 1.0])
            .constraint(vec![1.0, 1.0], Relation::Le, 2.0)
            .constraint(vec![1.0, 1.0], Relation::Ge, 1.0)
            .build()
            .unwrap();
        let results = rhs_sweep(&program, 1, [1.0, 5.0, f64::NAN], &SolverOptions::default())
            .unwrap();
        let statuses = results.iter().map(|(_, r)| status(r)).collect::<Vec<_>>();
        assert_eq!(statuses, &[Status::Optimal, Status::Infeasible, Status::Failed]);
    }

    #[test]
    fn test_sweep_bad_row() {
        let err = rhs_sweep(&program(), 3, [1.0], &SolverOptions::default()).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput(MalformedInput::RowOutOfRange { row: 3, rows: 3 })
        );
    }
}
