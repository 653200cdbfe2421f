/// An error type for the alignment module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    /// A coefficient matrix must have exactly one row per spatial component.
    #[error("Coefficient matrix must have 3 rows, got {0}")]
    InvalidRowCount(usize),

    /// All rows of a coefficient matrix must have the same length.
    #[error("Row {row} has {actual} coefficients, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },

    /// Both coefficient matrices must have the same number of columns.
    #[error("Mismatched number of coefficients: from ({from}) != to ({to})")]
    ShapeMismatch {
        /// Number of columns of the `from` matrix.
        from: usize,
        /// Number of columns of the `to` matrix.
        to: usize,
    },

    /// At least one coefficient per row is needed to compute the means.
    #[error("Coefficient matrices are empty")]
    EmptyCoefficients,

    /// The coefficient at the given position is NaN or infinite.
    #[error("Coefficient at ({row}, {col}) is not finite")]
    NonFiniteCoefficient {
        /// Row of the offending value.
        row: usize,
        /// Column of the offending value.
        col: usize,
    },

    /// The cross-covariance or the K-matrix overflowed to a non-finite value.
    #[error("Cross-covariance is not finite, the coefficients are too large")]
    NonFiniteCovariance,

    /// The symmetric eigensolver did not converge.
    #[error("Eigen decomposition did not converge after {max_iterations} iterations")]
    EigenDecompositionFailed {
        /// Iteration budget given to the solver.
        max_iterations: usize,
    },

    /// The dominant eigenvector has a zero or non-finite norm.
    #[error("Dominant eigenvector cannot be normalized")]
    DegenerateEigenvector,

    /// A rotation axis must have a non-zero length.
    #[error("Cannot compute a rotation from a zero axis")]
    ZeroRotationAxis,
}
