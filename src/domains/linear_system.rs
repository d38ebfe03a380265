use smallvec::SmallVec;
use std::{
    fmt::{Display, Write},
    ops::{Index, IndexMut},
    slice::Chunks,
};

use super::float::{is_zero, EPS};
use crate::error::LinearSolverError;

/// A dense row-major matrix of `f64`. Systems of up to 5x5 live on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub shape: (u32, u32),
    pub data: SmallVec<[f64; 25]>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    pub fn new(rows: u32, cols: u32) -> Matrix {
        Matrix {
            shape: (rows, cols),
            data: (0..rows as usize * cols as usize).map(|_| 0.).collect(),
        }
    }

    /// Create a matrix from a list of equally long rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix, LinearSolverError> {
        let ncols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = SmallVec::with_capacity(rows.len() * ncols);

        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != ncols {
                return Err(LinearSolverError::RaggedRows {
                    row: i,
                    expected: ncols,
                    found: r.len(),
                });
            }
            data.extend_from_slice(r);
        }

        Ok(Matrix {
            shape: (rows.len() as u32, ncols as u32),
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.shape.0 as usize
    }

    pub fn cols(&self) -> usize {
        self.shape.1 as usize
    }

    pub fn row_iter(&self) -> Chunks<'_, f64> {
        self.data.chunks(self.shape.1.max(1) as usize)
    }

    fn swap_rows(&mut self, a: u32, b: u32) {
        if a == b {
            return;
        }
        for l in 0..self.shape.1 {
            self.data.swap(
                (a * self.shape.1 + l) as usize,
                (b * self.shape.1 + l) as usize,
            );
        }
    }

    /// Compute `A * x`.
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, LinearSolverError> {
        if x.len() != self.cols() {
            return Err(LinearSolverError::DimensionMismatch {
                rows: self.rows(),
                rhs: x.len(),
            });
        }

        Ok(self
            .row_iter()
            .take(self.rows())
            .map(|r| r.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect())
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = f64;

    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.shape.1 + index.1) as usize]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    fn index_mut(&mut self, index: (u32, u32)) -> &mut f64 {
        &mut self.data[(index.0 * self.shape.1 + index.1) as usize]
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (ri, r) in self.row_iter().enumerate() {
            f.write_char('{')?;
            for (ci, c) in r.iter().enumerate() {
                write!(f, "{}", c)?;
                if ci + 1 < self.shape.1 as usize {
                    f.write_char(',')?;
                }
            }
            f.write_char('}')?;
            if ri + 1 < self.shape.0 as usize {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

impl Matrix {
    /// Solves `A * x = b` for `x`, where `A` is `self`, using Gaussian
    /// elimination with partial pivoting followed by back substitution.
    ///
    /// Singular systems are not an error. A pivot with magnitude below
    /// [EPS] leaves its column uneliminated, and a variable whose diagonal
    /// entry is below [EPS] after elimination is set to `0`. The result is then
    /// a best-effort partial answer.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, LinearSolverError> {
        let (neqs, nvars) = self.shape;

        if neqs != nvars {
            return Err(LinearSolverError::NotSquare {
                rows: neqs as usize,
                cols: nvars as usize,
            });
        }
        if b.len() != neqs as usize {
            return Err(LinearSolverError::DimensionMismatch {
                rows: neqs as usize,
                rhs: b.len(),
            });
        }

        let n = nvars;

        // Create the augmented matrix.
        let mut m = Matrix::new(n, n + 1);
        for r in 0..n {
            for c in 0..n {
                m[(r, c)] = self[(r, c)];
            }
            m[(r, n)] = b[r as usize];
        }

        for i in 0..n {
            // Select the row with the largest pivot; ties keep the upper row.
            let mut max_row = i;
            for k in i + 1..n {
                if m[(k, i)].abs() > m[(max_row, i)].abs() {
                    max_row = k;
                }
            }
            m.swap_rows(i, max_row);

            if is_zero(m[(i, i)]) {
                continue;
            }

            for k in i + 1..n {
                let s = m[(k, i)] / m[(i, i)];
                for l in i..n + 1 {
                    let v = m[(i, l)];
                    m[(k, l)] -= s * v;
                }
            }
        }

        // Now, do back substitution.
        let mut x = vec![0.; n as usize];
        for i in (0..n).rev() {
            if m[(i, i)].abs() < EPS {
                continue;
            }

            let mut v = m[(i, n)];
            for j in i + 1..n {
                v -= m[(i, j)] * x[j as usize];
            }
            x[i as usize] = v / m[(i, i)];
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_solve_trivial() {
        let a = Matrix::from_rows(&[[12.]]).unwrap();
        let r = a.solve(&[6.]).unwrap();
        assert_close(&r, &[0.5]);
    }

    #[test]
    fn test_solve_easy() {
        let a = Matrix::from_rows(&[[1., 0.], [0., 1.]]).unwrap();
        let r = a.solve(&[5., 6.]).unwrap();
        assert_close(&r, &[5., 6.]);
    }

    #[test]
    fn test_solve() {
        let a = Matrix::from_rows(&[[1., 1., 2.], [3., 4., 3.], [16., 5., 5.]]).unwrap();
        let r = a.solve(&[3., 15., 8.]).unwrap();
        assert_close(&r, &[-5. / 6., 47. / 10., -13. / 30.]);
    }

    #[test]
    fn test_solve_needs_pivoting() {
        // the first pivot is zero
        let a = Matrix::from_rows(&[[0., 1.], [1., 1.]]).unwrap();
        let r = a.solve(&[2., 5.]).unwrap();
        assert_close(&r, &[3., 2.]);
    }

    #[test]
    fn test_solve_4x4() {
        let a = Matrix::from_rows(&[
            [1., 0., 1., 0.],
            [0., 1., 0., 1.],
            [3., 0., 2., 0.],
            [0., 3., 0., 2.],
        ])
        .unwrap();
        let r = a.solve(&[0., 0., 0., 1.]).unwrap();
        assert_close(&r, &[0., 1., 0., -1.]);
    }

    #[test]
    fn test_solve_singular_assigns_zero() {
        let a = Matrix::from_rows(&[[1., 1.], [1., 1.]]).unwrap();
        let r = a.solve(&[2., 2.]).unwrap();
        assert!(r.iter().all(|v| v.is_finite()));
        // the second variable has no pivot left
        assert_close(&r, &[2., 0.]);
    }

    #[test]
    fn test_solve_zero_matrix() {
        let a = Matrix::new(3, 3);
        let r = a.solve(&[1., 2., 3.]).unwrap();
        assert_close(&r, &[0., 0., 0.]);
    }

    #[test]
    fn test_solve_bad_shape() {
        let a = Matrix::from_rows(&[[1., 1., 2.], [3., 4., 3.], [16., 5., 5.]]).unwrap();
        assert_eq!(
            a.solve(&[3., 15., 8., 1.]),
            Err(LinearSolverError::DimensionMismatch { rows: 3, rhs: 4 })
        );
    }

    #[test]
    fn test_solve_not_square() {
        let a = Matrix::from_rows(&[[1., 1., 2.], [3., 4., 3.]]).unwrap();
        assert!(matches!(
            a.solve(&[1., 2.]),
            Err(LinearSolverError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let rows: [&[f64]; 2] = [&[1., 2.], &[1.]];
        assert!(matches!(
            Matrix::from_rows(&rows),
            Err(LinearSolverError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn test_display() {
        let a = Matrix::from_rows(&[[1., 2.], [3., 4.5]]).unwrap();
        assert_eq!(a.to_string(), "{{1,2},{3,4.5}}");
    }
}
