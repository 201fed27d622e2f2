use crate::error::Error;
use crate::linalg::Matrix;
use crate::model::Sense;
use crate::standard_form::StandardForm;

/// Augmented simplex tableau with the Big-M objective row stored last.
///
/// The basic column of every constraint row is tracked in `basis` and updated
/// on each pivot, so the solution can be read without rescanning columns.
pub(crate) struct Tableau {
    form: StandardForm,
    matrix: Matrix,
    basis: Vec<usize>,
    big_m: f64,
}

impl Tableau {
    /// Fails with `NumericInstability` at iteration 0 when the penalty
    /// overflows against the model's coefficients.
    pub(crate) fn build(form: StandardForm, big_m: f64) -> Result<Self, Error> {
        let m = form.m();
        let width = form.width();

        let mut matrix = Matrix::with_capacity(m + 1);
        let mut basis = Vec::with_capacity(m);
        for (i, row) in form.rows.iter().enumerate() {
            let mut data = vec![0.0; width + 1];
            data[..form.n].copy_from_slice(&row.coeffs);
            data[form.slack_column(i)] = row.slack_coef();
            match row.artificial {
                Some(k) => {
                    data[form.artificial_column(k)] = 1.0;
                    basis.push(form.artificial_column(k));
                }
                None => basis.push(form.slack_column(i)),
            }
            data[width] = row.rhs;
            matrix.push(data);
        }

        // Maximization is carried out as minimization of the negated objective.
        let mut z: Vec<f64> = match form.sense {
            Sense::Maximize => form.objective.iter().map(|x| -x).collect(),
            Sense::Minimize => form.objective.clone(),
        };
        z.resize(form.n + m, 0.0);
        z.resize(width, big_m);
        z.push(0.0);
        matrix.push(z);

        let mut tableau = Self {
            form,
            matrix,
            basis,
            big_m,
        };
        tableau.precondition();
        if !tableau.is_finite() {
            return Err(Error::NumericInstability { iteration: 0 });
        }
        Ok(tableau)
    }

    /// Artificials start in the basis, so their M entries in the objective row
    /// have to be eliminated before reduced costs mean anything.
    fn precondition(&mut self) {
        let objective = self.objective_row();
        let rows = self
            .form
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.artificial.is_some())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        for i in rows {
            self.matrix.row_operation(objective, i, self.big_m);
        }
    }

    pub(crate) fn form(&self) -> &StandardForm {
        &self.form
    }

    pub(crate) fn big_m(&self) -> f64 {
        self.big_m
    }

    pub(crate) fn m(&self) -> usize {
        self.form.m()
    }

    pub(crate) fn objective_row(&self) -> usize {
        self.form.m()
    }

    pub(crate) fn rhs_column(&self) -> usize {
        self.form.width()
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    pub(crate) fn rhs(&self, i: usize) -> f64 {
        self.matrix[(i, self.rhs_column())]
    }

    /// Reduced costs of the columns allowed to enter. Artificial columns are
    /// excluded: once an artificial leaves the basis it stays at zero.
    pub(crate) fn entering_costs(&self) -> &[f64] {
        &self.matrix.row(self.objective_row())[..self.form.n + self.form.m()]
    }

    pub(crate) fn objective_rhs(&self) -> f64 {
        self.rhs(self.objective_row())
    }

    pub(crate) fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.matrix.is_finite()
    }

    /// Gauss-Jordan pivot on `(row, column)`. The caller guarantees the pivot
    /// entry is larger than the tolerance.
    pub(crate) fn pivot(&mut self, row: usize, column: usize) {
        let pivot = self.matrix[(row, column)];
        self.matrix.scale_row(row, 1.0 / pivot);
        for i in 0..self.matrix.m() {
            if i != row {
                let factor = self.matrix[(i, column)];
                if factor != 0.0 {
                    self.matrix.row_operation(i, row, factor);
                }
                self.matrix[(i, column)] = 0.0;
            }
        }
        self.matrix[(row, column)] = 1.0;
        self.basis[row] = column;
    }

    /// Finds the row in which `column` is a unit vector: exactly one entry
    /// within `tol` of 1 and every other entry within `tol` of 0.
    pub(crate) fn basic_row_by_scan(&self, column: usize, tol: f64) -> Option<usize> {
        let mut found = None;
        for i in 0..self.m() {
            let x = self.matrix[(i, column)];
            if (x - 1.0).abs() <= tol {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            } else if x.abs() > tol {
                return None;
            }
        }
        found
    }
}
