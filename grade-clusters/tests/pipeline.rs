use grade_clusters::{
    ClusterRunConfig, ClusteringError, GradeRecord, GradeSource, InMemorySource, KmeansState, LabelTable, SourceEntry,
    SubjectFilter, WeightConfig, cluster_students, features_from_records, run_from_source,
};
use proptest::prelude::*;

fn record(student_id: u64, subject_id: u64, semester: &str, k: f64, s: f64, a: f64) -> GradeRecord {
    GradeRecord {
        student_id,
        subject_id,
        semester: semester.to_string(),
        knowledge: Some(k),
        skill: Some(s),
        attitude: Some(a),
    }
}

fn class_records() -> Vec<GradeRecord> {
    let mut records = Vec::new();
    // (student, knowledge, skill, attitude) for two subjects each
    let students = [
        (1, 58.0, 62.0, 60.0),
        (2, 61.0, 60.0, 66.0),
        (3, 72.0, 78.0, 75.0),
        (4, 76.0, 74.0, 77.0),
        (5, 88.0, 91.0, 86.0),
        (6, 92.0, 89.0, 94.0),
        (7, 90.0, 93.0, 90.0),
    ];
    for (student, k, s, a) in students {
        records.push(record(student, 1, "2024-1", k, s, a));
        records.push(record(student, 2, "2024-1", k + 2.0, s - 2.0, a));
        // other semester, must not count
        records.push(record(student, 1, "2023-2", 10.0, 10.0, 10.0));
    }
    // only graded in another semester: excluded from the run
    records.push(record(8, 1, "2023-2", 99.0, 99.0, 99.0));
    records
}

fn semester_filter() -> SubjectFilter {
    SubjectFilter {
        subjects: None,
        semester: Some("2024-1".to_string()),
    }
}

#[test]
fn run_through_in_memory_source() {
    let mut source = InMemorySource::new();
    let weights = WeightConfig::new(40.0, 40.0, 20.0).unwrap();
    source.insert_records(1, &class_records(), &semester_filter(), weights, 3, None);

    let base = ClusterRunConfig { seed: Some(2024), ..Default::default() };
    let report = run_from_source(&source, 1, &base, &LabelTable::default()).unwrap();

    assert_eq!(report.assignments.len(), 7);
    assert!(report.assignments.iter().all(|a| a.student_id != 8));
    assert!(report.assignments.iter().all(|a| (1..=3).contains(&a.cluster_id)));
    assert_eq!(report.profiles.iter().map(|p| p.count).sum::<usize>(), 7);
    assert_eq!(report.centroids.len(), 3);
    assert!(report.state == KmeansState::Converged || report.state == KmeansState::MaxIterationsReached);
    assert!(report.iterations <= 100);

    // students 6 and 7 have the same composite score
    let cluster_of = |id: u64| report.assignments.iter().find(|a| a.student_id == id).unwrap().cluster_id;
    assert_eq!(cluster_of(6), cluster_of(7));

    // on a line, every cluster is one contiguous run of scores
    let mut by_score = report.assignments.clone();
    by_score.sort_by(|a, b| a.composite_score.total_cmp(&b.composite_score));
    let mut left = Vec::new();
    for pair in by_score.windows(2) {
        if pair[0].cluster_id != pair[1].cluster_id {
            left.push(pair[0].cluster_id);
            assert!(!left.contains(&pair[1].cluster_id));
        }
    }
}

#[test]
fn report_serializes_to_json() {
    let records = class_records();
    let weights = WeightConfig::new(50.0, 30.0, 20.0).unwrap();
    let features = features_from_records(&records, &semester_filter(), &weights).unwrap();
    let config = ClusterRunConfig { k: 2, seed: Some(1), ..Default::default() };
    let report = cluster_students(&features, &config, &LabelTable::default()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["assignments"].is_array());
    assert!(json["profiles"][0]["label"].is_string());
    assert!(json["state"].is_string());
}

#[test]
fn invalid_weights_from_source() {
    let mut source = InMemorySource::new();
    source.insert(
        9,
        SourceEntry {
            averages: Vec::new(),
            weights: WeightConfig { w_k: 50.0, w_s: 30.0, w_a: 30.0 },
            k: 2,
            max_iterations: None,
        },
    );
    let result = run_from_source(&source, 9, &ClusterRunConfig::default(), &LabelTable::default());
    assert!(matches!(result, Err(ClusteringError::InvalidWeightConfiguration { .. })));
}

#[test]
fn cluster_count_from_source_is_validated() {
    let mut source = InMemorySource::new();
    let weights = WeightConfig::new(40.0, 40.0, 20.0).unwrap();
    source.insert_records(2, &class_records(), &semester_filter(), weights, 11, None);
    let result = run_from_source(&source, 2, &ClusterRunConfig::default(), &LabelTable::default());
    assert_eq!(result.unwrap_err(), ClusteringError::InvalidClusterCount { k: 11 });
}

#[test]
fn not_enough_students_for_k() {
    let mut source = InMemorySource::new();
    let weights = WeightConfig::new(40.0, 40.0, 20.0).unwrap();
    let records = vec![record(1, 1, "2024-1", 70.0, 70.0, 70.0), record(2, 1, "2024-1", 80.0, 80.0, 80.0)];
    source.insert_records(3, &records, &SubjectFilter::default(), weights, 3, Some(10));
    assert_eq!(source.fetch_max_iterations(3).unwrap(), Some(10));

    let result = run_from_source(&source, 3, &ClusterRunConfig::default(), &LabelTable::default());
    assert_eq!(result.unwrap_err(), ClusteringError::InsufficientData { students: 2, k: 3 });
}

proptest! {
    #[test]
    fn counts_and_ids_hold(
        scores in prop::collection::vec(0.0f64..100.0, 10..80),
        k in 2usize..=10,
        seed in any::<u64>(),
    ) {
        let averages: Vec<grade_clusters::GradeAverages> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| grade_clusters::GradeAverages {
                student_id: i as u64,
                avg_knowledge: *score,
                avg_skill: *score,
                avg_attitude: *score,
            })
            .collect();
        let weights = WeightConfig::new(30.0, 30.0, 40.0).unwrap();
        let config = ClusterRunConfig { k, seed: Some(seed), ..Default::default() };
        let report = grade_clusters::run_clusterization(&averages, &weights, &config, &LabelTable::default()).unwrap();

        prop_assert_eq!(report.assignments.len(), scores.len());
        prop_assert!(report.assignments.iter().all(|a| a.cluster_id >= 1 && a.cluster_id <= k));
        prop_assert_eq!(report.profiles.iter().map(|p| p.count).sum::<usize>(), scores.len());
        prop_assert!(report.accuracy >= 0.0 && report.accuracy <= 100.0);

        let again = grade_clusters::run_clusterization(&averages, &weights, &config, &LabelTable::default()).unwrap();
        prop_assert_eq!(report.assignments, again.assignments);
    }
}
