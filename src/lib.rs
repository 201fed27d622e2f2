mod error;
mod linalg;
mod model;
mod options;
#[cfg(feature = "python")]
mod pyobjs;
mod simplex;
mod solution;
mod standard_form;
mod sweep;
mod tableau;

pub use crate::error::{Error, MalformedInput};
pub use crate::model::{
    field_or_zero, from_form, missing_as_zero, Constraint, FormRow, LinearProgram,
    LinearProgramBuilder, Relation, Sense,
};
pub use crate::options::{PivotRule, SolverOptions};
pub use crate::simplex::{solve, solve_with};
pub use crate::solution::{status, Solution, Status};
pub use crate::sweep::rhs_sweep;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn bigm(_: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<pyobjs::PySolution>()?;
    m.add_function(wrap_pyfunction!(pyobjs::solve, m)?)?;
    m.add_function(wrap_pyfunction!(pyobjs::sweep, m)?)?;
    Ok(())
}
