//! Statistics over finished clusters
//! Population moments of member scores and the cohesion "accuracy" heuristic

use tracing::debug;

use crate::data_type::types::{ClusterAssignment, group_by_cluster};

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance: divides by `n`, not `n - 1`
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn population_stddev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Cohesion accuracy of a finished clustering
///
/// Sums the population variance of every cluster with more than one member
/// and maps it to `max(0, 100 - total_variance / 10)`, rounded to 2 decimals.
/// Tighter clusters give a higher value. This is a heuristic, not a
/// ground-truth quality measure.
pub fn cohesion_accuracy(assignments: &[ClusterAssignment]) -> f64 {
    let total_variance: f64 = group_by_cluster(assignments)
        .values()
        .filter(|scores| scores.len() > 1)
        .map(|scores| population_variance(scores))
        .sum();

    let accuracy = round2((100.0 - total_variance / 10.0).max(0.0));
    debug!(total_variance, accuracy, "cohesion accuracy");
    accuracy
}
