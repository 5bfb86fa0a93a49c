use std::collections::BTreeSet;

use kmeans::{DEFAULT_MAX_ITERATIONS, DistanceMetric, ScalarKmeans};
use serde::{Deserialize, Serialize};

use crate::{
    data_type::grade::GradeRecord,
    error::{ClusteringError, Result},
};

pub const MIN_CLUSTERS: usize = 2;
pub const MAX_CLUSTERS: usize = 10;

/// Parameters of one clustering run, as owned by the configuration collaborator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRunConfig {
    pub k: usize,
    pub max_iterations: usize,
    /// Explicit early-stop threshold on centroid movement. `None` keeps the
    /// exact centroid equality rule.
    pub tolerance: Option<f64>,
    pub distance_metric: DistanceMetric,
    /// Fixed seed for the initial centroid draw; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ClusterRunConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: None,
            distance_metric: DistanceMetric::Absolute,
            seed: None,
        }
    }
}

impl ClusterRunConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&self.k) {
            return Err(ClusteringError::InvalidClusterCount { k: self.k });
        }
        if self.max_iterations == 0 {
            return Err(ClusteringError::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(tolerance) = self.tolerance {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(ClusteringError::InvalidParameter {
                    name: "tolerance",
                    message: format!("{tolerance} is not a finite non-negative number"),
                });
            }
        }
        Ok(())
    }

    /// Engine model configured from this run configuration
    pub fn model(&self) -> ScalarKmeans {
        ScalarKmeans::new(
            self.k,
            Some(self.max_iterations),
            self.tolerance,
            Some(self.distance_metric),
            self.seed,
        )
    }
}

/// Restricts which grade records take part in a run.
/// An unset field does not restrict anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectFilter {
    pub subjects: Option<BTreeSet<u64>>,
    pub semester: Option<String>,
}

impl SubjectFilter {
    pub fn matches(&self, record: &GradeRecord) -> bool {
        let subject_ok = self
            .subjects
            .as_ref()
            .is_none_or(|subjects| subjects.contains(&record.subject_id));
        let semester_ok = self
            .semester
            .as_ref()
            .is_none_or(|semester| *semester == record.semester);
        subject_ok && semester_ok
    }
}
