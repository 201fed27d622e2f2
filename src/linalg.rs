use std::ops::{Index, IndexMut};

/// Dense row-major matrix. Rows are kept as separate vectors so that whole-row
/// operations, which is all Gauss-Jordan elimination needs, stay cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(data: Vec<Vec<f64>>) -> Self {
        Self { data }
    }

    pub fn m(&self) -> usize {
        self.data.len()
    }

    pub fn n(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub(crate) fn push(&mut self, row: Vec<f64>) {
        debug_assert!(self.data.is_empty() || row.len() == self.n());
        self.data.push(row)
    }

    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub(crate) fn scale_row(&mut self, i: usize, scalar: f64) {
        self.data[i].iter_mut().for_each(|x| *x *= scalar);
    }

    /// `target -= scalar * row`
    ///
    /// Overflow is not checked here. Callers test [`Matrix::is_finite`] after
    /// a batch of row operations.
    pub(crate) fn row_operation(&mut self, target: usize, row: usize, scalar: f64) {
        let result = self.data[target]
            .iter()
            .zip(&self.data[row])
            .map(|(x, y)| x - scalar * y)
            .collect();
        self.data[target] = result;
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.data[i][j]
    }
}

pub(crate) fn dot(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}
