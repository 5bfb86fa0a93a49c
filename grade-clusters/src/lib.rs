//! Student achievement clustering
//!
//! Turns per-student grade averages into weighted composite scores, groups
//! the students with scalar K-Means and summarizes every resulting cluster
//! with a label and descriptive statistics.

pub mod clusterization;
pub mod context;
pub mod data_type;
pub mod error;
pub mod features;
pub mod metrics;
pub mod profile;
pub mod source;

pub use clusterization::{cluster_students, cluster_students_with_rng, run_clusterization, run_from_source};
pub use context::{ClusterRunConfig, SubjectFilter};
pub use data_type::{
    grade::{GradeAverages, GradeRecord, StudentId, WeightConfig},
    types::{ClusterAssignment, ClusterProfile, ClusterReport, EmptyClusterWarning, StudentFeature},
};
pub use error::{ClusteringError, Result};
pub use features::{average_grades, build_features, features_from_records};
pub use metrics::cohesion_accuracy;
pub use profile::{LabelRule, LabelTable, LabelText, generate_profiles};
pub use source::{ConfigId, GradeSource, InMemorySource, SourceEntry};

pub use kmeans::{DistanceMetric, KmeansState};
