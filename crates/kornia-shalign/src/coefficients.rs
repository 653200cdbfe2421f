use crate::{AlignError, Quaternion};

/// Spherical harmonics coefficients of a 3D object, stored as a 3xN matrix.
///
/// Row `i` holds the coefficients of the i-th spatial component (x, y, z) for
/// the N harmonic basis functions. Column `n` is therefore the 3D vector of the
/// n-th basis function.
///
/// The matrix is validated on construction: all rows have the same length and
/// every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    rows: [Vec<f64>; 3],
}

impl CoefficientMatrix {
    /// Create a new coefficient matrix from its three rows.
    ///
    /// # Errors
    ///
    /// * [`AlignError::RaggedRows`] if the rows have different lengths.
    /// * [`AlignError::NonFiniteCoefficient`] if any value is NaN or infinite.
    pub fn new(rows: [Vec<f64>; 3]) -> Result<Self, AlignError> {
        let expected = rows[0].len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(AlignError::RaggedRows {
                    row,
                    expected,
                    actual: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(AlignError::NonFiniteCoefficient { row, col });
            }
        }
        Ok(Self { rows })
    }

    /// Create a new coefficient matrix from a slice of rows.
    ///
    /// # Errors
    ///
    /// Same as [`CoefficientMatrix::new`], plus [`AlignError::InvalidRowCount`]
    /// if the slice does not hold exactly 3 rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, AlignError> {
        match rows {
            [x, y, z] => Self::new([x.clone(), y.clone(), z.clone()]),
            _ => Err(AlignError::InvalidRowCount(rows.len())),
        }
    }

    /// Shape of the matrix as `(rows, cols)`.
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        (3, self.num_coefficients())
    }

    /// Number of coefficients per row, i.e. the number of columns.
    #[inline]
    pub fn num_coefficients(&self) -> usize {
        self.rows[0].len()
    }

    /// Whether the matrix has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_coefficients() == 0
    }

    /// The coefficients of the i-th spatial component.
    ///
    /// PRECONDITION: `i < 3`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// All three rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<f64>; 3] {
        &self.rows
    }

    /// The 3D vector of the n-th basis function.
    ///
    /// PRECONDITION: `n < self.num_coefficients()`.
    #[inline]
    pub fn column(&self, n: usize) -> [f64; 3] {
        [self.rows[0][n], self.rows[1][n], self.rows[2][n]]
    }

    /// Arithmetic mean of each row.
    ///
    /// Returns zeros for an empty matrix.
    pub fn row_means(&self) -> [f64; 3] {
        let n = self.num_coefficients();
        if n == 0 {
            return [0.0; 3];
        }
        let mut means = [0.0; 3];
        for (mean, row) in means.iter_mut().zip(self.rows.iter()) {
            *mean = row.iter().sum::<f64>() / n as f64;
        }
        means
    }

    /// Rotate every column of the matrix by the given quaternion.
    ///
    /// The result is the coefficient matrix of the same object observed after
    /// applying the rotation, i.e. `to[:, n] = R * from[:, n]`.
    ///
    /// PRECONDITION: `q` has unit norm.
    pub fn rotated(&self, q: &Quaternion) -> Self {
        let r = q.to_rotation_matrix();
        let n = self.num_coefficients();

        let mut rows = [vec![0.0; n], vec![0.0; n], vec![0.0; n]];
        for col in 0..n {
            let v = self.column(col);
            for (i, row) in rows.iter_mut().enumerate() {
                row[col] = r[i][0] * v[0] + r[i][1] * v[1] + r[i][2] * v[2];
            }
        }

        Self { rows }
    }
}

impl TryFrom<Vec<Vec<f64>>> for CoefficientMatrix {
    type Error = AlignError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}
