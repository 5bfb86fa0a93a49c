//! Scalar K-Means clustering
//!
//! Lloyd-style refinement over one-dimensional scores: random distinct
//! seeding, nearest-centroid assignment by absolute difference and mean
//! centroid updates that keep the previous value of empty clusters.

pub mod error;
pub mod scalar;
pub mod types;
mod init_random;
mod mean_centers;

pub use error::{KmeansError, Result};
pub use scalar::{DEFAULT_MAX_ITERATIONS, ScalarKmeans, assign_points, fit, fit_with_rng};
pub use types::{
    DistanceMetric, EmptyClusterEvent, FitResult, IterationTrace, KmeansState, PointAssignment, ScalarDistance,
};
