use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use grade_clusters::{GradeRecord, LabelTable};
use tracing::debug;

/// Grade records from a JSON array file
pub async fn load_grades(path: &str) -> Result<Vec<GradeRecord>> {
    if !path.ends_with(".json") {
        bail!("grade data must be a .json file, got {path}");
    }
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading grade data from {path}"))?;
    let records = parse_grades(&contents).with_context(|| format!("parsing grade data from {path}"))?;
    debug!(path, records = records.len(), "grade data loaded");
    Ok(records)
}

pub fn parse_grades(contents: &str) -> Result<Vec<GradeRecord>> {
    Ok(serde_json::from_str(contents)?)
}

/// Label table override; validated before use
pub async fn load_label_table(path: &str) -> Result<LabelTable> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading label table from {path}"))?;
    let table: LabelTable = serde_json::from_str(&contents).with_context(|| format!("parsing label table from {path}"))?;
    table.validate()?;
    Ok(table)
}

/// "3, 5,8" → {3, 5, 8}
pub fn parse_subjects(list: &str) -> Result<BTreeSet<u64>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<u64>().with_context(|| format!("invalid subject id '{item}'")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grades_from_json() {
        let json = r#"[
            {"student_id": 1, "subject_id": 4, "semester": "2024-1", "knowledge": 80, "skill": 75.5, "attitude": 90},
            {"student_id": 2, "subject_id": 4, "semester": "2024-1", "knowledge": 60}
        ]"#;
        let records = parse_grades(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].skill, Some(75.5));
        assert_eq!(records[1].attitude, None);
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_grades(r#"{"student_id": 1}"#).is_err());
    }

    #[test]
    fn subjects_list() {
        assert_eq!(parse_subjects("3, 5,8,").unwrap(), [3, 5, 8].into_iter().collect());
        assert!(parse_subjects("3,x").is_err());
    }

    #[tokio::test]
    async fn wrong_extension() {
        assert!(load_grades("grades.csv").await.is_err());
    }
}
