use crate::error::{Error, MalformedInput};
use crate::linalg::dot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Maximize,
    Minimize,
}

impl FromStr for Sense {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" | "maximize" | "maximise" | "maximizar" => Ok(Sense::Maximize),
            "min" | "minimize" | "minimise" | "minimizar" => Ok(Sense::Minimize),
            _ => Err(Error::ParseSense(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "=")]
    Eq,
}

impl Relation {
    /// The relation obtained by multiplying both sides by -1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }

    pub fn needs_artificial(self) -> bool {
        matches!(self, Relation::Ge | Relation::Eq)
    }

    pub fn holds(self, lhs: f64, rhs: f64, tol: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tol,
            Relation::Ge => lhs >= rhs - tol,
            Relation::Eq => (lhs - rhs).abs() <= tol,
        }
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" => Ok(Relation::Le),
            ">=" | "≥" => Ok(Relation::Ge),
            "=" | "==" => Ok(Relation::Eq),
            _ => Err(Error::ParseRelation(s.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub coeffs: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(coeffs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coeffs,
            relation,
            rhs,
        }
    }

    pub fn lhs(&self, x: &[f64]) -> f64 {
        dot(&self.coeffs, x)
    }
}

/// An immutable linear program over implicitly non-negative variables.
///
/// Construct through [`LinearProgram::builder`] or [`LinearProgram::new`];
/// both validate, so every `LinearProgram` in circulation is well formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearProgram {
    sense: Sense,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    pub fn new(
        sense: Sense,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, Error> {
        validate(&objective, &constraints)?;
        Ok(Self {
            sense,
            objective,
            constraints,
        })
    }

    pub fn builder(sense: Sense, objective: Vec<f64>) -> LinearProgramBuilder {
        LinearProgramBuilder {
            sense,
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Copy of the model with the right-hand side of constraint `row` replaced.
    pub fn with_rhs(&self, row: usize, rhs: f64) -> Result<Self, Error> {
        if row >= self.constraints.len() {
            return Err(MalformedInput::RowOutOfRange {
                row,
                rows: self.constraints.len(),
            }
            .into());
        }
        if !rhs.is_finite() {
            return Err(MalformedInput::NonFiniteCoefficient {
                location: format!("rhs of constraint {row}"),
            }
            .into());
        }
        let mut constraints = self.constraints.clone();
        constraints[row].rhs = rhs;
        Ok(Self {
            constraints,
            ..self.clone()
        })
    }

    /// Largest absolute value among all objective, constraint and rhs entries.
    pub(crate) fn largest_magnitude(&self) -> f64 {
        self.objective
            .iter()
            .chain(self.constraints.iter().flat_map(|c| c.coeffs.iter()))
            .chain(self.constraints.iter().map(|c| &c.rhs))
            .fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    /// Smallest nonzero absolute constraint coefficient, or 1 when every
    /// coefficient is zero.
    pub(crate) fn smallest_coefficient(&self) -> f64 {
        self.constraints
            .iter()
            .flat_map(|c| c.coeffs.iter())
            .map(|x| x.abs())
            .filter(|&x| x > 0.0)
            .reduce(f64::min)
            .unwrap_or(1.0)
    }
}

impl<'de> Deserialize<'de> for LinearProgram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            sense: Sense,
            objective: Vec<f64>,
            #[serde(default)]
            constraints: Vec<Constraint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        LinearProgram::new(raw.sense, raw.objective, raw.constraints)
            .map_err(serde::de::Error::custom)
    }
}

pub struct LinearProgramBuilder {
    sense: Sense,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl LinearProgramBuilder {
    pub fn constraint(mut self, coeffs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        self.constraints.push(Constraint::new(coeffs, relation, rhs));
        self
    }

    pub fn build(self) -> Result<LinearProgram, Error> {
        LinearProgram::new(self.sense, self.objective, self.constraints)
    }
}

fn validate(objective: &[f64], constraints: &[Constraint]) -> Result<(), MalformedInput> {
    let n = objective.len();
    if n == 0 {
        return Err(MalformedInput::EmptyObjective);
    }
    if let Some(j) = objective.iter().position(|x| !x.is_finite()) {
        return Err(MalformedInput::NonFiniteCoefficient {
            location: format!("objective term {j}"),
        });
    }
    for (i, constraint) in constraints.iter().enumerate() {
        if constraint.coeffs.len() != n {
            return Err(MalformedInput::DimensionMismatch {
                constraint: i,
                expected: n,
                found: constraint.coeffs.len(),
            });
        }
        if let Some(j) = constraint.coeffs.iter().position(|x| !x.is_finite()) {
            return Err(MalformedInput::NonFiniteCoefficient {
                location: format!("coefficient {j} of constraint {i}"),
            });
        }
        if !constraint.rhs.is_finite() {
            return Err(MalformedInput::NonFiniteCoefficient {
                location: format!("rhs of constraint {i}"),
            });
        }
    }
    Ok(())
}

/// Form fields left empty are read as zero. Callers feeding user input into a
/// `LinearProgram` go through this so the convention is applied in one place.
pub fn field_or_zero(field: Option<f64>) -> f64 {
    field.unwrap_or(0.0)
}

pub fn missing_as_zero(fields: &[Option<f64>]) -> Vec<f64> {
    fields.iter().copied().map(field_or_zero).collect()
}

/// One constraint row as entered in a form: possibly empty numeric fields and
/// the relation symbol as typed.
#[derive(Debug, Clone, Copy)]
pub struct FormRow<'a> {
    pub coeffs: &'a [Option<f64>],
    pub relation: &'a str,
    pub rhs: Option<f64>,
}

/// Builds a validated `LinearProgram` from raw form input, applying
/// [`field_or_zero`] to every numeric field.
pub fn from_form<'a, I>(
    sense: &str,
    objective: &[Option<f64>],
    rows: I,
) -> Result<LinearProgram, Error>
where
    I: IntoIterator<Item = FormRow<'a>>,
{
    let constraints = rows
        .into_iter()
        .map(|row| {
            Ok(Constraint::new(
                missing_as_zero(row.coeffs),
                row.relation.parse()?,
                field_or_zero(row.rhs),
            ))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    LinearProgram::new(sense.parse()?, missing_as_zero(objective), constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relation() {
        assert_eq!("<=".parse::<Relation>().unwrap(), Relation::Le);
        assert_eq!("≤".parse::<Relation>().unwrap(), Relation::Le);
        assert_eq!(" ≥ ".parse::<Relation>().unwrap(), Relation::Ge);
        assert_eq!("=".parse::<Relation>().unwrap(), Relation::Eq);
        assert_eq!(
            "<".parse::<Relation>().unwrap_err(),
            Error::ParseRelation("<".to_string())
        );
    }

    #[test]
    fn test_parse_sense() {
        assert_eq!("Maximize".parse::<Sense>().unwrap(), Sense::Maximize);
        assert_eq!("min".parse::<Sense>().unwrap(), Sense::Minimize);
        assert_eq!("Maximizar".parse::<Sense>().unwrap(), Sense::Maximize);
        assert_eq!("Minimizar".parse::<Sense>().unwrap(), Sense::Minimize);
        assert_eq!(
            "optimize".parse::<Sense>().unwrap_err(),
            Error::ParseSense("optimize".to_string())
        );
    }

    #[test]
    fn test_builder() {
        let lp = LinearProgram::builder(Sense::Maximize, vec![3.0, 5.0])
            .constraint(vec![1.0, 0.0], Relation::Le, 4.0)
            .constraint(vec![0.0, 2.0], Relation::Le, 12.0)
            .build()
            .unwrap();
        assert_eq!(lp.num_variables(), 2);
        assert_eq!(lp.num_constraints(), 2);
        assert_eq!(lp.constraints()[1].rhs, 12.0);
    }

    #[test]
    fn test_empty_objective() {
        let err = LinearProgram::new(Sense::Minimize, vec![], vec![]).unwrap_err();
        assert_eq!(err, Error::MalformedInput(MalformedInput::EmptyObjective));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = LinearProgram::builder(Sense::Minimize, vec![1.0, 1.0])
            .constraint(vec![1.0, 1.0], Relation::Ge, 1.0)
            .constraint(vec![1.0], Relation::Ge, 1.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput(MalformedInput::DimensionMismatch {
                constraint: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_non_finite() {
        let result = LinearProgram::builder(Sense::Minimize, vec![1.0])
            .constraint(vec![f64::NAN], Relation::Le, 1.0)
            .build();
        assert!(matches!(
            result,
            Err(Error::MalformedInput(MalformedInput::NonFiniteCoefficient { .. }))
        ));

        let result = LinearProgram::new(Sense::Minimize, vec![f64::INFINITY], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_rhs() {
        let lp = LinearProgram::builder(Sense::Maximize, vec![1.0])
            .constraint(vec![1.0], Relation::Le, 4.0)
            .build()
            .unwrap();
        let changed = lp.with_rhs(0, 10.0).unwrap();
        assert_eq!(changed.constraints()[0].rhs, 10.0);
        assert_eq!(lp.constraints()[0].rhs, 4.0);
        assert_eq!(
            lp.with_rhs(1, 10.0).unwrap_err(),
            Error::MalformedInput(MalformedInput::RowOutOfRange { row: 1, rows: 1 })
        );
    }

    #[test]
    fn test_largest_magnitude() {
        let lp = LinearProgram::builder(Sense::Maximize, vec![1.0, -7.0])
            .constraint(vec![2.0, 3.0], Relation::Le, -40.0)
            .build()
            .unwrap();
        assert_eq!(lp.largest_magnitude(), 40.0);
        assert_eq!(lp.smallest_coefficient(), 2.0);

        let lp = LinearProgram::builder(Sense::Maximize, vec![100.0, 0.0])
            .constraint(vec![-1e-5, 1.0], Relation::Eq, 1.0)
            .constraint(vec![0.0, 0.0], Relation::Le, 2.0)
            .build()
            .unwrap();
        assert_eq!(lp.smallest_coefficient(), 1e-5);

        let lp = LinearProgram::new(Sense::Maximize, vec![1.0], vec![]).unwrap();
        assert_eq!(lp.smallest_coefficient(), 1.0);
    }

    #[test]
    fn test_deserialize() {
        let lp: LinearProgram = toml::from_str(
            r#"
            sense = "minimize"
            objective = [2.0, 3.0]

            [[constraints]]
            coeffs = [1.0, 1.0]
            relation = "="
            rhs = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(lp.sense(), Sense::Minimize);
        assert_eq!(lp.constraints()[0].relation, Relation::Eq);

        let malformed = toml::from_str::<LinearProgram>(
            r#"
            sense = "maximize"
            objective = [1.0]

            [[constraints]]
            coeffs = [1.0, 1.0]
            relation = "<="
            rhs = 4.0
            "#,
        );
        assert!(malformed.is_err());
    }

    #[test]
    fn test_missing_as_zero() {
        assert_eq!(missing_as_zero(&[Some(1.5), None, Some(-2.0)]), &[1.5, 0.0, -2.0]);
    }

    #[test]
    fn test_from_form() {
        let coeffs = [Some(1.0), None];
        let lp = from_form(
            "Maximizar",
            &[Some(3.0), None],
            [FormRow {
                coeffs: &coeffs,
                relation: "≤",
                rhs: None,
            }],
        )
        .unwrap();
        assert_eq!(lp.objective(), &[3.0, 0.0]);
        assert_eq!(lp.constraints()[0], Constraint::new(vec![1.0, 0.0], Relation::Le, 0.0));
    }

    #[test]
    fn test_from_form_errors() {
        let coeffs = [Some(1.0)];
        let row = FormRow {
            coeffs: &coeffs,
            relation: "<>",
            rhs: Some(1.0),
        };
        assert_eq!(
            from_form("max", &[Some(1.0)], [row]).unwrap_err(),
            Error::ParseRelation("<>".to_string())
        );
        let eq = FormRow { relation: "=", ..row };
        assert!(from_form("max", &[Some(1.0), Some(2.0)], [eq]).is_err());
        assert_eq!(
            from_form("best", &[Some(1.0)], []).unwrap_err(),
            Error::ParseSense("best".to_string())
        );
    }

    #[test]
    fn test_relation_holds() {
        assert!(Relation::Le.holds(4.0, 4.0, 1e-9));
        assert!(!Relation::Le.holds(4.1, 4.0, 1e-9));
        assert!(Relation::Ge.holds(5.0, 4.0, 1e-9));
        assert!(Relation::Eq.holds(4.0 + 1e-12, 4.0, 1e-9));
    }
}
