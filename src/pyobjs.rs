use crate::error::Error;
use crate::model::{from_form, FormRow, LinearProgram};
use crate::options::SolverOptions;
use crate::simplex;
use crate::solution::{status, Solution};
use crate::sweep::rhs_sweep;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// `(coefficients, relation symbol, rhs)` with `None` standing for an empty field.
type PyConstraint = (Vec<Option<f64>>, String, Option<f64>);

#[pyclass(module = "bigm", name = "Solution")]
pub(crate) struct PySolution {
    #[pyo3(get)]
    status: String,
    #[pyo3(get)]
    values: Option<Vec<f64>>,
    #[pyo3(get)]
    objective_value: Option<f64>,
    #[pyo3(get)]
    iterations: Option<usize>,
    #[pyo3(get)]
    message: Option<String>,
}

#[pymethods]
impl PySolution {
    fn __repr__(&self) -> String {
        match self.objective_value {
            Some(z) => format!("Solution(status={}, objective_value={})", self.status, z),
            None => format!("Solution(status={})", self.status),
        }
    }
}

impl From<Result<Solution, Error>> for PySolution {
    fn from(result: Result<Solution, Error>) -> Self {
        let status = status(&result).to_string();
        match result {
            Ok(solution) => Self {
                status,
                values: Some(solution.values().to_vec()),
                objective_value: Some(solution.objective_value()),
                iterations: Some(solution.iterations()),
                message: None,
            },
            Err(err) => Self {
                status,
                values: None,
                objective_value: None,
                iterations: None,
                message: Some(err.to_string()),
            },
        }
    }
}

fn to_program(
    sense: &str,
    objective: &[Option<f64>],
    constraints: &[PyConstraint],
) -> PyResult<LinearProgram> {
    let rows = constraints.iter().map(|(coeffs, relation, rhs)| FormRow {
        coeffs,
        relation,
        rhs: *rhs,
    });
    from_form(sense, objective, rows).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Malformed input raises `ValueError`; every other outcome comes back as a
/// `Solution` with its status set.
#[pyfunction]
pub(crate) fn solve(
    sense: &str,
    objective: Vec<Option<f64>>,
    constraints: Vec<PyConstraint>,
) -> PyResult<PySolution> {
    let program = to_program(sense, &objective, &constraints)?;
    Ok(PySolution::from(simplex::solve(&program)))
}

#[pyfunction]
pub(crate) fn sweep(
    sense: &str,
    objective: Vec<Option<f64>>,
    constraints: Vec<PyConstraint>,
    row: usize,
    values: Vec<f64>,
) -> PyResult<Vec<(f64, PySolution)>> {
    let program = to_program(sense, &objective, &constraints)?;
    let results = rhs_sweep(&program, row, values, &SolverOptions::default())
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    Ok(results
        .into_iter()
        .map(|(rhs, result)| (rhs, PySolution::from(result)))
        .collect())
}
