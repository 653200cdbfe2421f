use crate::{AlignError, CoefficientMatrix};
use nalgebra::Matrix3;

/// Compute the cross-covariance matrix between two coefficient matrices.
///
/// `cov[(i, j)] = 1/N * Σ_n (from[i][n] - mean(from[i])) * (to[j][n] - mean(to[j]))`
///
/// See eq. (18) in Althloothi et al. 2013.
///
/// # Arguments
///
/// * `from` - Coefficients of the object to rotate.
/// * `to` - Coefficients of the target object.
///
/// # Errors
///
/// * [`AlignError::ShapeMismatch`] if the matrices have different number of columns.
/// * [`AlignError::EmptyCoefficients`] if the matrices have no columns.
/// * [`AlignError::NonFiniteCovariance`] if the products overflow.
pub fn cross_covariance(
    from: &CoefficientMatrix,
    to: &CoefficientMatrix,
) -> Result<Matrix3<f64>, AlignError> {
    let n = from.num_coefficients();
    if n != to.num_coefficients() {
        return Err(AlignError::ShapeMismatch {
            from: n,
            to: to.num_coefficients(),
        });
    }
    if n == 0 {
        return Err(AlignError::EmptyCoefficients);
    }

    let mu_from = from.row_means();
    let mu_to = to.row_means();

    let mut cov = Matrix3::<f64>::zeros();
    for i in 0..3 {
        for j in 0..3 {
            cov[(i, j)] = from
                .row(i)
                .iter()
                .zip(to.row(j).iter())
                .map(|(f, t)| (f - mu_from[i]) * (t - mu_to[j]))
                .sum::<f64>()
                / n as f64;
        }
    }

    if !cov.iter().all(|v| v.is_finite()) {
        return Err(AlignError::NonFiniteCovariance);
    }

    Ok(cov)
}
