use thiserror::Error;

/// Error types for the autokmeans library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// A parameter is outside its valid range (k, k_max, delta threshold, empty input)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Empty-cluster recovery could not find a point to relocate
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A step of a partitioning or scoring run failed
    #[error("Computation failure: {0}")]
    ComputationFailure(String),

    /// Points in one run do not share the same dimensionality
    #[error("Dimension mismatch: expected {expected} coordinates, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the first point
        expected: usize,
        /// Dimensionality of the offending point
        found: usize,
    },
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, KMeansError>;
