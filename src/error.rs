use crate::solution::Status;
use thiserror::Error;

/// Reasons a `LinearProgram` is rejected before any pivoting happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    #[error("objective must have at least one term")]
    EmptyObjective,
    #[error("constraint {constraint} has {found} coefficients, expected {expected}")]
    DimensionMismatch {
        constraint: usize,
        expected: usize,
        found: usize,
    },
    #[error("non-finite value in {location}")]
    NonFiniteCoefficient { location: String },
    #[error("constraint row {row} out of range for a model with {rows} constraints")]
    RowOutOfRange { row: usize, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),
    #[error("unrecognized relation {0:?}")]
    ParseRelation(String),
    #[error("unrecognized sense {0:?}")]
    ParseSense(String),
    #[error("the objective is unbounded")]
    Unbounded,
    #[error("the model is infeasible")]
    Infeasible,
    #[error("no optimum after {iterations} iterations")]
    IterationLimitExceeded { iterations: usize },
    #[error("tableau became non-finite at iteration {iteration}")]
    NumericInstability { iteration: usize },
    #[error("penalty {big_m:e} is too small to separate the artificial variables")]
    PenaltyTooSmall { big_m: f64 },
}

impl Error {
    /// Collapses the error into the status reported to callers that only
    /// distinguish the four outcome kinds.
    pub fn status(&self) -> Status {
        match self {
            Error::Unbounded => Status::Unbounded,
            Error::Infeasible => Status::Infeasible,
            Error::MalformedInput(_)
            | Error::ParseRelation(_)
            | Error::ParseSense(_)
            | Error::IterationLimitExceeded { .. }
            | Error::NumericInstability { .. }
            | Error::PenaltyTooSmall { .. } => Status::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(Error::Unbounded.status(), Status::Unbounded);
        assert_eq!(Error::Infeasible.status(), Status::Infeasible);
        assert_eq!(
            Error::IterationLimitExceeded { iterations: 100 }.status(),
            Status::Failed
        );
        assert_eq!(
            Error::from(MalformedInput::EmptyObjective).status(),
            Status::Failed
        );
        assert_eq!(
            Error::NumericInstability { iteration: 0 }.status(),
            Status::Failed
        );
        assert_eq!(Error::PenaltyTooSmall { big_m: 1e6 }.status(), Status::Failed);
    }

    #[test]
    fn test_display() {
        let err = Error::from(MalformedInput::DimensionMismatch {
            constraint: 1,
            expected: 2,
            found: 3,
        });
        assert_eq!(
            err.to_string(),
            "malformed input: constraint 1 has 3 coefficients, expected 2"
        );
    }
}
