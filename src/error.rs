//! Error types shared across the library
//!
//! Construction problems surface as `BuildError`, storage-level problems as `CsrError`
//! and dense solver problems as `SolveError`. The app layer folds these into
//! `color_eyre` reports.

use miette::Diagnostic;

/// Top level error for model and operator construction
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum BuildError {
    /// Sparse storage construction or access failed
    #[error(transparent)]
    Csr(#[from] CsrError),
    /// Bloch expansion construction or assembly failed
    #[error(transparent)]
    Expansion(#[from] ExpansionError),
    /// The lattice definition is invalid
    #[error("{0}")]
    Lattice(String),
    /// Matrix or table dimensions are inconsistent
    #[error("{0}")]
    Dimension(String),
}

/// General error for Csr construction, patterns and element access problems
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum CsrError {
    /// A row index exceeded the number of rows
    #[error("row index {row} is out of bounds for a matrix with {nrows} rows")]
    Row {
        /// The offending row index
        row: usize,
        /// The number of rows in the matrix
        nrows: usize,
    },
    /// A column index exceeded the number of columns
    #[error("column index {column} is out of bounds for a matrix with {ncols} columns")]
    Column {
        /// The offending column index
        column: usize,
        /// The number of columns in the matrix
        ncols: usize,
    },
    /// The raw CSR arrays do not describe a valid matrix
    #[error("{0}")]
    Layout(String),
}

/// Error for the Bloch expansion kernel
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ExpansionError {
    /// The expansion counts are invalid
    #[error("each Bloch expansion count must be at least one, got {0:?}")]
    Empty([usize; 3]),
    /// The number of provided matrices does not match the expansion
    #[error("expected {expected} matrices for the expansion, got {found}")]
    MatrixCount {
        /// The number of matrices the expansion requires
        expected: usize,
        /// The number of matrices provided
        found: usize,
    },
    /// A provided matrix is not square, or disagrees with its siblings
    #[error("{0}")]
    Dimension(String),
}

/// Error for the dense eigensolves
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SolveError {
    /// Construction of the k-space operator failed
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The overlap matrix is not positive definite at this k-point
    #[error("the overlap matrix is not positive definite at k = {0:?}")]
    OverlapNotPositiveDefinite([f64; 3]),
    /// A triangular solve in the Cholesky reduction failed
    #[error("triangular reduction of the generalized problem failed at k = {0:?}")]
    Reduction([f64; 3]),
}

/// Error for IO events
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum IOError {
    /// The underlying filesystem operation failed
    #[error("IO Failure: {0}")]
    IO(#[from] std::io::Error),
}
