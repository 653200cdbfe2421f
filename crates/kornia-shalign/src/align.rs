//! Rotation alignment of spherical harmonics coefficients.
//!
//! Paper: [Althloothi et al., IEEE TIP 2013](https://doi.org/10.1109/TIP.2013.2249080)

use crate::covariance::cross_covariance;
use crate::kmatrix::k_matrix;
use crate::{AlignError, CoefficientMatrix, Quaternion};
use nalgebra::SymmetricEigen;

/// Parameters controlling the alignment solver.
#[derive(Debug, Clone)]
pub struct AlignParams {
    /// Maximum number of iterations of the symmetric eigensolver.
    pub max_iterations: usize,
    /// Convergence tolerance of the symmetric eigensolver.
    pub eigen_eps: f64,
    /// Relative gap between the two largest eigenvalues below which the
    /// solution is reported as degenerate.
    pub degeneracy_tol: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            eigen_eps: f64::EPSILON,
            degeneracy_tol: 1e-10,
        }
    }
}

/// Result of the alignment.
#[derive(Debug, Clone)]
pub struct AlignResult {
    /// Unit quaternion rotating `from` onto `to`. The sign is not canonicalized.
    pub rotation: Quaternion,
    /// Eigenvalue associated with `rotation`, the largest one of the K-matrix.
    pub eigenvalue: f64,
    /// All the eigenvalues of the K-matrix, in solver order.
    pub eigenvalues: [f64; 4],
    /// Difference between the largest and the second largest eigenvalue.
    pub spectral_gap: f64,
    /// Whether the largest eigenvalue is repeated, in which case `rotation` is
    /// one of several equally optimal answers.
    pub degenerate: bool,
}

/// Find the largest eigenvalue with a linear scan.
///
/// Ties are resolved in favour of the first index. Returns `None` for an empty slice.
///
/// # Arguments
///
/// * `eigenvalues` - The eigenvalues in solver order.
///
/// # Returns
///
/// The index and value of the largest eigenvalue.
pub fn dominant_eigenvalue(eigenvalues: &[f64]) -> Option<(usize, f64)> {
    let (&first, rest) = eigenvalues.split_first()?;

    let mut idx = 0;
    let mut max = first;
    for (i, &val) in rest.iter().enumerate() {
        if val > max {
            max = val;
            idx = i + 1;
        }
    }

    Some((idx, max))
}

/// Estimate the rotation aligning two sets of spherical harmonics coefficients.
///
/// Uses the default [`AlignParams`]. See [`align_with_params`] for details.
///
/// # Arguments
///
/// * `from` - Coefficients of the object to rotate, shape *(3, N)*.
/// * `to` - Coefficients of the target object, shape *(3, N)*.
///
/// # Returns
///
/// The unit quaternion `(w, x, y, z)` rotating `from` onto `to`. Either the
/// quaternion or its negation may be returned.
pub fn align(from: &CoefficientMatrix, to: &CoefficientMatrix) -> Result<Quaternion, AlignError> {
    align_with_params(from, to, &AlignParams::default()).map(|res| res.rotation)
}

/// Estimate the rotation aligning two sets of spherical harmonics coefficients.
///
/// The rotation is the eigenvector of the largest eigenvalue of the K-matrix
/// built from the cross-covariance of the coefficients.
///
/// If the largest eigenvalue is repeated, e.g. for all-zero or rank deficient
/// coefficients, there is no unique optimal rotation. The eigenvector found
/// first is returned and the result is flagged as degenerate.
///
/// # Arguments
///
/// * `from` - Coefficients of the object to rotate, shape *(3, N)*.
/// * `to` - Coefficients of the target object, shape *(3, N)*.
/// * `params` - Solver parameters.
///
/// # Errors
///
/// * [`AlignError::ShapeMismatch`] if the matrices have different number of columns.
/// * [`AlignError::EmptyCoefficients`] if the matrices have no columns.
/// * [`AlignError::NonFiniteCovariance`] if the covariance or the K-matrix overflow.
/// * [`AlignError::EigenDecompositionFailed`] if the eigensolver does not converge
///   or returns non-finite eigenvalues.
/// * [`AlignError::DegenerateEigenvector`] if the eigenvector cannot be normalized.
pub fn align_with_params(
    from: &CoefficientMatrix,
    to: &CoefficientMatrix,
    params: &AlignParams,
) -> Result<AlignResult, AlignError> {
    let cov = cross_covariance(from, to)?;
    log::debug!("Num coefficients: {}", from.num_coefficients());
    log::debug!("Cross-covariance: {:?}", cov);

    // the trace and the sums of K can overflow even for a finite covariance
    let k = k_matrix(&cov);
    if !k.iter().all(|v| v.is_finite()) {
        return Err(AlignError::NonFiniteCovariance);
    }

    let eig = SymmetricEigen::try_new(k, params.eigen_eps, params.max_iterations).ok_or(
        AlignError::EigenDecompositionFailed {
            max_iterations: params.max_iterations,
        },
    )?;

    let eigenvalues = [
        eig.eigenvalues[0],
        eig.eigenvalues[1],
        eig.eigenvalues[2],
        eig.eigenvalues[3],
    ];
    log::debug!("Eigenvalues: {:?}", eigenvalues);

    if !eigenvalues.iter().all(|v| v.is_finite()) {
        return Err(AlignError::EigenDecompositionFailed {
            max_iterations: params.max_iterations,
        });
    }

    let Some((idx, eigenvalue)) = dominant_eigenvalue(&eigenvalues) else {
        return Err(AlignError::DegenerateEigenvector);
    };

    // eigenvectors are stored column-wise
    let v = eig.eigenvectors.column(idx);
    let rotation = Quaternion::new(v[0], v[1], v[2], v[3])
        .normalize()
        .ok_or(AlignError::DegenerateEigenvector)?;

    let second = eigenvalues
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, val)| *val)
        .fold(f64::NEG_INFINITY, f64::max);
    let spectral_gap = eigenvalue - second;
    let degenerate = spectral_gap <= params.degeneracy_tol * (eigenvalue.abs() + second.abs());

    if degenerate {
        log::warn!(
            "Largest eigenvalue {} is repeated (gap {}), the rotation is not unique",
            eigenvalue,
            spectral_gap
        );
    }
    log::debug!("Selected eigenvalue {} at index {}", eigenvalue, idx);

    Ok(AlignResult {
        rotation,
        eigenvalue,
        eigenvalues,
        spectral_gap,
        degenerate,
    })
}
