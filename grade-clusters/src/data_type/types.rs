use std::collections::BTreeMap;

use kmeans::KmeansState;
use serde::{Deserialize, Serialize};

use crate::data_type::grade::StudentId;

/// Clustering input of one student, built fresh for every run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentFeature {
    pub student_id: StudentId,
    pub avg_knowledge: f64,
    pub avg_skill: f64,
    pub avg_attitude: f64,
    pub composite_score: f64,
}

/// Final cluster of one student. `cluster_id` is 1-based.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub student_id: StudentId,
    pub cluster_id: usize,
    pub composite_score: f64,
    pub distance_to_centroid: f64,
}

/// Labeled summary of one non-empty cluster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster_id: usize,
    pub label: String,
    pub description: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// A cluster got no member in one iteration and kept its previous centroid.
/// Observational only; the run carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyClusterWarning {
    pub iteration: usize,
    pub cluster_id: usize,
}

/// Complete output of a successful run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub assignments: Vec<ClusterAssignment>,
    pub profiles: Vec<ClusterProfile>,
    pub accuracy: f64,
    /// Final centroid of cluster id `i + 1` at index `i`
    pub centroids: Vec<f64>,
    pub iterations: usize,
    pub state: KmeansState,
    pub empty_clusters: Vec<EmptyClusterWarning>,
}

/// Member scores keyed by cluster id, in ascending id order.
/// Clusters without members do not appear.
pub fn group_by_cluster(assignments: &[ClusterAssignment]) -> BTreeMap<usize, Vec<f64>> {
    let mut groups: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for assignment in assignments.iter() {
        groups
            .entry(assignment.cluster_id)
            .or_default()
            .push(assignment.composite_score);
    }
    groups
}
