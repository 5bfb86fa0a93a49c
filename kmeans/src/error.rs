use thiserror::Error;

/// Result alias for the scalar K-Means engine.
pub type Result<T> = std::result::Result<T, KmeansError>;

/// Pre-condition failures of a K-Means run.
///
/// Every variant is raised before the first assignment pass, so a failed run
/// never leaves partial output behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KmeansError {
    /// Fewer than two clusters were requested.
    #[error("invalid cluster count {k}: at least 2 clusters are required")]
    InvalidClusterCount {
        /// Requested cluster count.
        k: usize,
    },

    /// There are fewer points than clusters.
    #[error("insufficient data: {points} points cannot fill {k} clusters")]
    InsufficientData {
        /// Number of points supplied.
        points: usize,
        /// Requested cluster count.
        k: usize,
    },

    /// A model parameter is out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },

    /// A score is NaN or infinite.
    #[error("score at position {index} is not a finite number")]
    NonFiniteScore {
        /// Position of the offending point in the input slice.
        index: usize,
    },

    /// Distance metric name that the engine does not implement.
    #[error("unsupported distance metric '{0}' (only 'absolute' is available)")]
    UnsupportedMetric(String),
}
