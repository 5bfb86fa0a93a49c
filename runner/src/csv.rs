use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use grade_clusters::{ClusterAssignment, ClusterProfile, ClusterReport, ClusterRunConfig};
use serde::Serialize;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

/// Report file layout: the run report plus when and how it was produced
#[derive(Serialize)]
pub struct RunRecord<'a> {
    pub time: DateTime<Utc>,
    pub config: &'a ClusterRunConfig,
    #[serde(flatten)]
    pub report: &'a ClusterReport,
}

pub fn assignments_to_csv(assignments: &[ClusterAssignment]) -> String {
    let mut result = String::from("student_id;cluster_id;composite_score;distance_to_centroid\n");
    for assignment in assignments.iter() {
        result.push_str(&format!(
            "{};{};{};{}\n",
            assignment.student_id, assignment.cluster_id, assignment.composite_score, assignment.distance_to_centroid
        ));
    }
    result
}

pub fn profiles_to_csv(profiles: &[ClusterProfile]) -> String {
    let mut result = String::from("cluster_id;label;description;count;mean;min;max;stddev\n");
    for profile in profiles.iter() {
        result.push_str(&format!(
            "{};{};{};{};{};{};{};{}\n",
            profile.cluster_id,
            csv_field(&profile.label),
            csv_field(&profile.description),
            profile.count,
            profile.mean,
            profile.min,
            profile.max,
            profile.stddev
        ));
    }
    result
}

// Free text is quoted when it would break the row: `;`, quotes or line breaks
fn csv_field(text: &str) -> String {
    if text.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Write `content` to the sibling temp file of `path` and return that temp path.
async fn stage_file(path: &Path, content: &[u8]) -> Result<PathBuf> {
    let tmp_path = temp_path(path);
    let data_file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut data_file = BufWriter::new(data_file);
    data_file.write_all(content).await?;
    data_file.flush().await?;
    data_file.get_ref().sync_all().await?;
    Ok(tmp_path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write assignments, profiles and the JSON report of one run into `out_dir`.
///
/// All three files are staged as temp files before any target is touched, so a
/// failure while writing leaves the previous run's output intact. The staged
/// files are then renamed over their targets one by one; each rename is atomic.
pub async fn write_run(out_dir: &Path, config: &ClusterRunConfig, report: &ClusterReport, time: DateTime<Utc>) -> Result<()> {
    let record = RunRecord { time, config, report };
    let outputs = [
        ("assignments.csv", assignments_to_csv(&report.assignments).into_bytes()),
        ("profiles.csv", profiles_to_csv(&report.profiles).into_bytes()),
        ("report.json", serde_json::to_vec_pretty(&record)?),
    ];

    let mut staged = Vec::with_capacity(outputs.len());
    for (name, content) in outputs.iter() {
        let target = out_dir.join(name);
        match stage_file(&target, content).await {
            Ok(tmp_path) => staged.push((tmp_path, target)),
            Err(err) => {
                for (tmp_path, _) in staged.iter() {
                    let _ = tokio::fs::remove_file(tmp_path).await;
                }
                let _ = tokio::fs::remove_file(temp_path(&target)).await;
                return Err(err);
            }
        }
    }

    for (tmp_path, target) in staged.iter() {
        tokio::fs::rename(tmp_path, target)
            .await
            .with_context(|| format!("replacing {}", target.display()))?;
    }

    info!(out_dir = %out_dir.display(), "run written");
    Ok(())
}
