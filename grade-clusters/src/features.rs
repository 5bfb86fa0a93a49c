//! Feature building: grade records → per-student averages → composite scores
//!
//! Students without a single matching grade record are left out of the run.
//! A student who is included but lacks values for one component gets 0 for
//! that component instead of being dropped.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    context::SubjectFilter,
    data_type::{
        grade::{GradeAverages, GradeRecord, StudentId, WeightConfig},
        types::StudentFeature,
    },
    error::Result,
};

#[derive(Default)]
struct ComponentSum {
    sum: f64,
    count: usize,
}

impl ComponentSum {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    // 0 when the component never occurred for this student
    fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.sum / self.count as f64 }
    }
}

#[derive(Default)]
struct StudentSums {
    knowledge: ComponentSum,
    skill: ComponentSum,
    attitude: ComponentSum,
}

/// Average every grade component per student over the records accepted by `filter`
///
/// # Returns
/// * One [`GradeAverages`] per student with at least one matching record,
///   ordered by student id
pub fn average_grades(records: &[GradeRecord], filter: &SubjectFilter) -> Vec<GradeAverages> {
    let mut seen: BTreeMap<StudentId, bool> = BTreeMap::new();
    let mut sums: BTreeMap<StudentId, StudentSums> = BTreeMap::new();

    for record in records.iter() {
        let matched = filter.matches(record);
        *seen.entry(record.student_id).or_default() |= matched;
        if !matched {
            continue;
        }
        let student = sums.entry(record.student_id).or_default();
        student.knowledge.add(record.knowledge);
        student.skill.add(record.skill);
        student.attitude.add(record.attitude);
    }

    let excluded = seen.values().filter(|matched| !**matched).count();
    if excluded > 0 {
        info!(excluded, "students without matching grade records left out");
    }
    debug!(students = sums.len(), records = records.len(), "grade averages computed");

    sums.into_iter()
        .map(|(student_id, student)| GradeAverages {
            student_id,
            avg_knowledge: student.knowledge.mean(),
            avg_skill: student.skill.mean(),
            avg_attitude: student.attitude.mean(),
        })
        .collect()
}

/// Weight the averages into composite scores, preserving input order
///
/// # Errors
/// * `InvalidWeightConfiguration` when the weights do not add up to 100;
///   nothing is computed in that case
pub fn build_features(averages: &[GradeAverages], weights: &WeightConfig) -> Result<Vec<StudentFeature>> {
    weights.validate()?;

    Ok(averages
        .par_iter()
        .map(|student| StudentFeature {
            student_id: student.student_id,
            avg_knowledge: student.avg_knowledge,
            avg_skill: student.avg_skill,
            avg_attitude: student.avg_attitude,
            composite_score: weights.composite(student),
        })
        .collect())
}

/// Records straight to features. Weights are checked before any averaging.
pub fn features_from_records(
    records: &[GradeRecord],
    filter: &SubjectFilter,
    weights: &WeightConfig,
) -> Result<Vec<StudentFeature>> {
    weights.validate()?;
    let averages = average_grades(records, filter);
    build_features(&averages, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusteringError;

    fn record(student_id: StudentId, subject_id: u64, semester: &str, k: Option<f64>, s: Option<f64>, a: Option<f64>) -> GradeRecord {
        GradeRecord {
            student_id,
            subject_id,
            semester: semester.to_string(),
            knowledge: k,
            skill: s,
            attitude: a,
        }
    }

    #[test]
    fn averages_per_component() {
        let records = vec![
            record(1, 10, "S1", Some(80.0), Some(70.0), Some(90.0)),
            record(1, 11, "S1", Some(90.0), Some(80.0), Some(80.0)),
            record(2, 10, "S1", Some(60.0), Some(65.0), Some(70.0)),
        ];
        let averages = average_grades(&records, &SubjectFilter::default());
        assert_eq!(
            averages,
            vec![
                GradeAverages { student_id: 1, avg_knowledge: 85.0, avg_skill: 75.0, avg_attitude: 85.0 },
                GradeAverages { student_id: 2, avg_knowledge: 60.0, avg_skill: 65.0, avg_attitude: 70.0 },
            ]
        );
    }

    #[test]
    fn students_without_matching_records_are_excluded() {
        let records = vec![
            record(1, 10, "S1", Some(80.0), Some(70.0), Some(90.0)),
            record(2, 10, "S2", Some(60.0), Some(65.0), Some(70.0)),
            record(3, 99, "S1", Some(50.0), Some(50.0), Some(50.0)),
        ];
        let filter = SubjectFilter {
            subjects: Some([10].into_iter().collect()),
            semester: Some("S1".to_string()),
        };
        let averages = average_grades(&records, &filter);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].student_id, 1);
    }

    #[test]
    fn missing_component_counts_as_zero() {
        let records = vec![
            record(7, 1, "S1", Some(80.0), None, None),
            record(7, 2, "S1", Some(90.0), Some(70.0), None),
        ];
        let averages = average_grades(&records, &SubjectFilter::default());
        assert_eq!(averages[0].avg_knowledge, 85.0);
        assert_eq!(averages[0].avg_skill, 70.0);
        assert_eq!(averages[0].avg_attitude, 0.0);

        let weights = WeightConfig::new(50.0, 30.0, 20.0).unwrap();
        let features = build_features(&averages, &weights).unwrap();
        assert!((features[0].composite_score - (85.0 * 0.5 + 70.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn invalid_weights_rejected_before_averaging() {
        let records = vec![record(1, 1, "S1", Some(80.0), Some(80.0), Some(80.0))];
        let weights = WeightConfig { w_k: 50.0, w_s: 30.0, w_a: 30.0 };
        assert_eq!(
            features_from_records(&records, &SubjectFilter::default(), &weights),
            Err(ClusteringError::InvalidWeightConfiguration { w_k: 50.0, w_s: 30.0, w_a: 30.0 })
        );
    }

    #[test]
    fn features_keep_input_order() {
        let averages: Vec<GradeAverages> = (0..50)
            .rev()
            .map(|id| GradeAverages { student_id: id, avg_knowledge: id as f64, avg_skill: 0.0, avg_attitude: 0.0 })
            .collect();
        let weights = WeightConfig::new(100.0, 0.0, 0.0).unwrap();
        let features = build_features(&averages, &weights).unwrap();
        let ids: Vec<StudentId> = features.iter().map(|f| f.student_id).collect();
        assert_eq!(ids, (0..50).rev().collect::<Vec<_>>());
        assert!(features.iter().all(|f| f.composite_score == f.avg_knowledge));
    }
}
