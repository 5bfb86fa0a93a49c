//! Type definitions and trait implementations for scalar K-Means clustering
//! Includes the distance metric, the run state machine and the result records
//! produced by a fit.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::KmeansError;

/// Distance metrics available for clustering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Absolute difference between two scalars
    #[default]
    Absolute,
}

impl DistanceMetric {
    /// Distance between a point and a centroid under this metric
    pub fn distance(&self, point: f64, centroid: f64) -> f64 {
        match self {
            DistanceMetric::Absolute => point.absolute_distance(&centroid),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = KmeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" => Ok(DistanceMetric::Absolute),
            other => Err(KmeansError::UnsupportedMetric(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Absolute => write!(f, "absolute"),
        }
    }
}

/// Trait for calculating the absolute distance between scalar values
pub trait ScalarDistance {
    /// Calculate |self - right|
    fn absolute_distance(&self, right: &Self) -> f64;
}

impl ScalarDistance for f64 {
    fn absolute_distance(&self, right: &Self) -> f64 {
        (self - right).abs()
    }
}

/// Life cycle of a single fit.
///
/// `Initialized → Iterating → Converged | ToleranceReached | MaxIterationsReached`.
/// Every terminal state carries a complete result; pre-condition failures are
/// reported as [`KmeansError`] before the model ever leaves `Initialized`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KmeansState {
    Initialized,
    Iterating,
    /// Centroid vector identical to the one of the previous iteration
    Converged,
    /// Every centroid moved by no more than the configured tolerance
    ToleranceReached,
    MaxIterationsReached,
}

impl KmeansState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            KmeansState::Converged | KmeansState::ToleranceReached | KmeansState::MaxIterationsReached
        )
    }
}

/// A cluster that received no member during one assignment pass.
/// The centroid of such a cluster keeps its previous value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyClusterEvent {
    /// 1-based iteration number
    pub iteration: usize,
    /// 0-based centroid index
    pub cluster: usize,
}

/// Final assignment of one input point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointAssignment<I> {
    pub id: I,
    /// 0-based index of the winning centroid
    pub cluster: usize,
    pub score: f64,
    /// Distance to the winning centroid, measured during the final assignment pass
    pub distance: f64,
}

/// Snapshot of one refinement iteration
#[derive(Clone, Debug, PartialEq)]
pub struct IterationTrace {
    /// 1-based iteration number
    pub iteration: usize,
    /// Centroids produced by the update step of this iteration
    pub centroids: Vec<f64>,
    /// Largest absolute centroid movement in this iteration
    pub max_shift: f64,
    pub elapsed: Duration,
}

/// Everything a fit produces
#[derive(Clone, Debug)]
pub struct FitResult<I> {
    /// One entry per input point, in input order
    pub assignments: Vec<PointAssignment<I>>,
    /// Centroid vector after the last update step
    pub centroids: Vec<f64>,
    /// Centroids chosen by the seeding step
    pub initial_centroids: Vec<f64>,
    pub iterations: usize,
    pub state: KmeansState,
    pub empty_clusters: Vec<EmptyClusterEvent>,
    pub trace: Vec<IterationTrace>,
    pub elapsed: Duration,
}

impl<I> FitResult<I> {
    /// Number of points assigned to each centroid index
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for assignment in self.assignments.iter() {
            sizes[assignment.cluster] += 1;
        }
        sizes
    }
}
