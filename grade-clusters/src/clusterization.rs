//! Student clustering pipeline
//!
//! 1. Validates weights and run configuration
//! 2. Builds composite scores from grade averages
//! 3. Runs scalar K-Means over the scores
//! 4. Derives cohesion accuracy and labeled cluster profiles
//!
//! A run is all or nothing: any error is returned before a report exists.

use kmeans::{DEFAULT_MAX_ITERATIONS, fit, fit_with_rng};
use rand::Rng;
use tracing::info;

use crate::{
    context::ClusterRunConfig,
    data_type::{
        grade::{GradeAverages, WeightConfig},
        types::{ClusterAssignment, ClusterReport, EmptyClusterWarning, StudentFeature},
    },
    error::{ClusteringError, Result},
    features::build_features,
    metrics::cohesion_accuracy,
    profile::{LabelTable, generate_profiles},
    source::{ConfigId, GradeSource},
};

/// Cluster prepared features, seeding from `config.seed`
pub fn cluster_students(
    features: &[StudentFeature],
    config: &ClusterRunConfig,
    labels: &LabelTable,
) -> Result<ClusterReport> {
    run(features, config, labels, |data, model| fit(data, model))
}

/// Cluster prepared features, drawing the initial centroids from `rng`
pub fn cluster_students_with_rng<R>(
    features: &[StudentFeature],
    config: &ClusterRunConfig,
    labels: &LabelTable,
    rng: &mut R,
) -> Result<ClusterReport>
where
    R: Rng + ?Sized,
{
    run(features, config, labels, |data, model| fit_with_rng(data, model, rng))
}

/// Weights → features → clusters for averages already fetched by the caller
pub fn run_clusterization(
    averages: &[GradeAverages],
    weights: &WeightConfig,
    config: &ClusterRunConfig,
    labels: &LabelTable,
) -> Result<ClusterReport> {
    let features = build_features(averages, weights)?;
    cluster_students(&features, config, labels)
}

/// Full run for one configuration, pulling every input from `source`.
///
/// `base` supplies what the source does not own: tolerance, distance metric
/// and seed. Cluster count and iteration cap come from the source.
pub fn run_from_source<S>(
    source: &S,
    config_id: ConfigId,
    base: &ClusterRunConfig,
    labels: &LabelTable,
) -> Result<ClusterReport>
where
    S: GradeSource + ?Sized,
{
    // weights first, so a bad configuration is rejected before any data is pulled
    let weights = source.fetch_weight_config(config_id)?;
    weights.validate()?;

    let config = ClusterRunConfig {
        k: source.fetch_cluster_count(config_id)?,
        max_iterations: source
            .fetch_max_iterations(config_id)?
            .unwrap_or(DEFAULT_MAX_ITERATIONS),
        ..base.clone()
    };
    config.validate()?;

    let averages = source.fetch_student_grade_averages(config_id)?;
    info!(config_id, students = averages.len(), k = config.k, "clustering configuration");
    run_clusterization(&averages, &weights, &config, labels)
}

fn run<F>(
    features: &[StudentFeature],
    config: &ClusterRunConfig,
    labels: &LabelTable,
    fit_model: F,
) -> Result<ClusterReport>
where
    F: FnOnce(&[(u64, f64)], &mut kmeans::ScalarKmeans) -> kmeans::Result<kmeans::FitResult<u64>>,
{
    config.validate()?;
    labels.validate()?;
    if features.len() < config.k {
        return Err(ClusteringError::InsufficientData {
            students: features.len(),
            k: config.k,
        });
    }

    let data: Vec<(u64, f64)> = features
        .iter()
        .map(|feature| (feature.student_id, feature.composite_score))
        .collect();
    let mut model = config.model();
    let fitted = fit_model(&data, &mut model)?;

    // engine indexes are 0-based, cluster ids 1-based
    let assignments: Vec<ClusterAssignment> = fitted
        .assignments
        .iter()
        .map(|point| ClusterAssignment {
            student_id: point.id,
            cluster_id: point.cluster + 1,
            composite_score: point.score,
            distance_to_centroid: point.distance,
        })
        .collect();
    let empty_clusters = fitted
        .empty_clusters
        .iter()
        .map(|event| EmptyClusterWarning {
            iteration: event.iteration,
            cluster_id: event.cluster + 1,
        })
        .collect();

    let accuracy = cohesion_accuracy(&assignments);
    let profiles = generate_profiles(&assignments, labels);
    info!(
        students = assignments.len(),
        clusters = profiles.len(),
        accuracy,
        iterations = fitted.iterations,
        state = ?fitted.state,
        "clustering run finished"
    );

    Ok(ClusterReport {
        assignments,
        profiles,
        accuracy,
        centroids: fitted.centroids,
        iterations: fitted.iterations,
        state: fitted.state,
        empty_clusters,
    })
}
