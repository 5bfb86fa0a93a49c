//! Cluster profiles: label and summary statistics per realized cluster
//!
//! Labels come from an ordered threshold table on the cluster mean. The
//! default table is the four-tier High / Medium-High / Medium / Low scheme.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    data_type::types::{ClusterAssignment, ClusterProfile, group_by_cluster},
    error::{ClusteringError, Result},
    metrics::{mean, population_stddev, round2},
};

/// Label and description attached to a cluster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelText {
    pub label: String,
    pub description: String,
}

impl LabelText {
    pub fn new(label: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Applies when the cluster mean is at least `min_mean`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    pub min_mean: f64,
    #[serde(flatten)]
    pub text: LabelText,
}

/// Ordered threshold table, highest threshold first.
/// `fallback` covers means below the last threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    rules: Vec<LabelRule>,
    fallback: LabelText,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            rules: vec![
                LabelRule { min_mean: 85.0, text: LabelText::new("High", "very good academic performance") },
                LabelRule { min_mean: 75.0, text: LabelText::new("Medium-High", "good academic performance") },
                LabelRule { min_mean: 65.0, text: LabelText::new("Medium", "adequate academic performance") },
            ],
            fallback: LabelText::new("Low", "requires additional attention"),
        }
    }
}

impl LabelTable {
    pub fn new(rules: Vec<LabelRule>, fallback: LabelText) -> Result<Self> {
        let table = Self { rules, fallback };
        table.validate()?;
        Ok(table)
    }

    /// Thresholds must be finite and strictly descending
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = self.rules.iter().find(|rule| !rule.min_mean.is_finite()) {
            return Err(ClusteringError::InvalidLabelTable(format!(
                "threshold of '{}' is not finite",
                rule.text.label
            )));
        }
        if let Some(pair) = self.rules.windows(2).find(|pair| pair[0].min_mean <= pair[1].min_mean) {
            return Err(ClusteringError::InvalidLabelTable(format!(
                "'{}' ({}) must have a higher threshold than '{}' ({})",
                pair[0].text.label, pair[0].min_mean, pair[1].text.label, pair[1].min_mean
            )));
        }
        Ok(())
    }

    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    pub fn classify(&self, mean: f64) -> &LabelText {
        self.rules
            .iter()
            .find(|rule| mean >= rule.min_mean)
            .map(|rule| &rule.text)
            .unwrap_or(&self.fallback)
    }
}

/// Build one profile per non-empty cluster, ordered by cluster id
///
/// # Arguments
/// * `assignments` - Final assignments of a run
/// * `labels` - Threshold table used for label and description
///
/// # Returns
/// * Profiles with `mean` and `stddev` rounded to 2 decimals; the label is
///   chosen on the unrounded mean
pub fn generate_profiles(assignments: &[ClusterAssignment], labels: &LabelTable) -> Vec<ClusterProfile> {
    group_by_cluster(assignments)
        .into_iter()
        .map(|(cluster_id, scores)| {
            let cluster_mean = mean(&scores);
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let text = labels.classify(cluster_mean);
            debug!(cluster_id, count = scores.len(), cluster_mean, label = %text.label, "cluster profiled");

            ClusterProfile {
                cluster_id,
                label: text.label.clone(),
                description: text.description.clone(),
                count: scores.len(),
                mean: round2(cluster_mean),
                min,
                max,
                stddev: round2(population_stddev(&scores)),
            }
        })
        .collect()
}
