use crate::model::{LinearProgram, Relation, Sense};

/// One constraint after normalization: non-negative rhs and the extension
/// columns it contributes to the tableau.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub(crate) coeffs: Vec<f64>,
    pub(crate) relation: Relation,
    pub(crate) rhs: f64,
    /// Offset into the artificial block, if this row needs one.
    pub(crate) artificial: Option<usize>,
}

impl Row {
    /// Coefficient of this row's own slack/surplus column.
    pub(crate) fn slack_coef(&self) -> f64 {
        match self.relation {
            Relation::Le => 1.0,
            Relation::Ge => -1.0,
            Relation::Eq => 0.0,
        }
    }
}

/// Column layout `[structural (n) | slack/surplus (m) | artificial (a) | rhs]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StandardForm {
    pub(crate) sense: Sense,
    pub(crate) objective: Vec<f64>,
    pub(crate) rows: Vec<Row>,
    pub(crate) n: usize,
    pub(crate) a: usize,
}

impl StandardForm {
    /// Rows with a negative rhs are negated and their relation flipped so the
    /// initial basis (slacks and artificials) is feasible.
    pub(crate) fn standardize(program: &LinearProgram) -> Self {
        let n = program.num_variables();
        let mut a = 0;
        let rows = program
            .constraints()
            .iter()
            .map(|c| {
                let (coeffs, relation, rhs) = if c.rhs < 0.0 {
                    (
                        c.coeffs.iter().map(|x| -x).collect(),
                        c.relation.flipped(),
                        -c.rhs,
                    )
                } else {
                    (c.coeffs.clone(), c.relation, c.rhs)
                };
                let artificial = relation.needs_artificial().then(|| {
                    a += 1;
                    a - 1
                });
                Row {
                    coeffs,
                    relation,
                    rhs,
                    artificial,
                }
            })
            .collect();

        Self {
            sense: program.sense(),
            objective: program.objective().to_vec(),
            rows,
            n,
            a,
        }
    }

    pub(crate) fn m(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn slack_column(&self, i: usize) -> usize {
        self.n + i
    }

    pub(crate) fn artificial_column(&self, k: usize) -> usize {
        self.n + self.m() + k
    }

    pub(crate) fn is_artificial(&self, column: usize) -> bool {
        (self.n + self.m()..self.width()).contains(&column)
    }

    /// Number of variable columns, excluding the rhs.
    pub(crate) fn width(&self) -> usize {
        self.n + self.m() + self.a
    }
}
