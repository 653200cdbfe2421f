#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia SH Align
//!
//! Closed-form rotation estimation between two objects described by their
//! spherical harmonics coefficients.
//!
//! Reference: Althloothi, Mahoor and Voyles, "A robust method for rotation
//! estimation using spherical harmonics representation", IEEE Transactions on
//! Image Processing 22.6 (2013): 2306-2316.
//!
//! ## Example
//!
//! ```rust
//! use kornia_shalign::{align, CoefficientMatrix, Quaternion};
//!
//! let from = CoefficientMatrix::new([
//!     vec![0.0, 0.0, 0.0, 1.0],
//!     vec![0.0, 2.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 4.0, 0.0],
//! ])?;
//! let to = CoefficientMatrix::new([
//!     vec![0.0, 0.0, 4.0, 0.0],
//!     vec![0.0, 0.0, 0.0, 1.0],
//!     vec![0.0, 2.0, 0.0, 0.0],
//! ])?;
//!
//! // 120 degrees around the (1, 1, 1) axis
//! let q = align(&from, &to)?.canonical();
//! assert!((q.w - 0.5).abs() < 1e-9);
//! # Ok::<(), kornia_shalign::AlignError>(())
//! ```

mod align;
pub use align::{align, align_with_params, dominant_eigenvalue, AlignParams, AlignResult};

/// Spherical harmonics coefficient matrices.
pub mod coefficients;
pub use coefficients::CoefficientMatrix;

/// Cross-covariance between two coefficient matrices.
pub mod covariance;

mod error;
pub use error::AlignError;

/// Symmetric 4x4 matrix encoding the optimal rotation.
pub mod kmatrix;

/// Quaternion type returned by the solver.
pub mod quaternion;
pub use quaternion::Quaternion;
