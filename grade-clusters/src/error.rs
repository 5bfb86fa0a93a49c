use kmeans::KmeansError;
use thiserror::Error;

/// Result alias for the clustering pipeline.
pub type Result<T> = std::result::Result<T, ClusteringError>;

/// Errors that abort a clustering run.
///
/// A run either returns a complete [`ClusterReport`](crate::ClusterReport)
/// or one of these; partial assignments or profiles are never handed out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    /// Knowledge, skill and attitude weights must add up to 100.
    #[error("invalid weight configuration: {w_k} + {w_s} + {w_a} = {} (expected 100)", .w_k + .w_s + .w_a)]
    InvalidWeightConfiguration { w_k: f64, w_s: f64, w_a: f64 },

    /// Fewer students with usable features than requested clusters.
    #[error("insufficient data: {students} students with grades cannot fill {k} clusters")]
    InsufficientData { students: usize, k: usize },

    /// Cluster count outside `2..=10`.
    #[error("invalid cluster count {k}: expected a value between 2 and 10")]
    InvalidClusterCount { k: usize },

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Label thresholds are not finite or not strictly descending.
    #[error("invalid label table: {0}")]
    InvalidLabelTable(String),

    /// The external data collaborator failed.
    #[error("grade source error: {0}")]
    Source(String),

    #[error(transparent)]
    Engine(#[from] KmeansError),
}
