use nalgebra::{Matrix3, Matrix4};

/// Build the symmetric 4x4 matrix whose dominant eigenvector is the optimal rotation.
///
/// This is Davenport's K-matrix written for the cross-covariance of the
/// coefficients, eq. (19) in Althloothi et al. 2013. Rows and columns are
/// ordered as the quaternion components `(w, x, y, z)`.
///
/// # Arguments
///
/// * `cov` - Cross-covariance between the `from` and `to` coefficients.
///
/// # Returns
///
/// The symmetric K-matrix.
pub fn k_matrix(cov: &Matrix3<f64>) -> Matrix4<f64> {
    let c = |i: usize, j: usize| cov[(i, j)];

    let k00 = c(0, 0) + c(1, 1) + c(2, 2);
    let k01 = c(1, 2) - c(2, 1);
    let k02 = c(2, 0) - c(0, 2);
    let k03 = c(0, 1) - c(1, 0);

    let k11 = c(0, 0) - c(1, 1) - c(2, 2);
    let k12 = c(0, 1) + c(1, 0);
    let k13 = c(2, 0) + c(0, 2);

    let k22 = -c(0, 0) + c(1, 1) - c(2, 2);
    let k23 = c(1, 2) + c(2, 1);

    let k33 = -c(0, 0) - c(1, 1) + c(2, 2);

    #[rustfmt::skip]
    let rows = [
        k00, k01, k02, k03,
        k01, k11, k12, k13,
        k02, k12, k22, k23,
        k03, k13, k23, k33,
    ];
    Matrix4::from_row_slice(&rows)
}
