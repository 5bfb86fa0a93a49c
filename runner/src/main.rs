//! Student achievement clustering from the command line
//! Loads grade records from JSON, clusters students by weighted composite
//! score and writes assignments, profiles and a JSON report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use grade_clusters::{
    ClusterRunConfig, DistanceMetric, InMemorySource, LabelTable, SubjectFilter, WeightConfig, run_from_source,
};
use tracing::info;

use crate::csv::write_run;
use crate::loading::{load_grades, load_label_table, parse_subjects};

mod csv;
mod loading;

// The runner handles one configuration per invocation
const CONFIG_ID: u64 = 0;

/// Command-line arguments for the clustering run
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the JSON array of grade records
    #[arg(long)]
    pub data: String,
    /// Output directory for results
    #[arg(long)]
    pub outdir: String,
    /// Number of clusters, 2 to 10 (default: 3)
    #[arg(long)]
    pub k: Option<usize>,
    /// Knowledge weight in percent (default: 40)
    #[arg(long)]
    pub w_knowledge: Option<f64>,
    /// Skill weight in percent (default: 40)
    #[arg(long)]
    pub w_skill: Option<f64>,
    /// Attitude weight in percent (default: 20)
    #[arg(long)]
    pub w_attitude: Option<f64>,
    /// Maximum number of iterations (default: 100)
    #[arg(long)]
    pub max_iter: Option<usize>,
    /// Stop once no centroid moves more than this (default: exact convergence only)
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Random seed for reproducibility (default: drawn from entropy)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Distance metric (default: absolute)
    #[arg(long)]
    pub distance: Option<String>,
    /// Comma separated subject ids to include (default: all)
    #[arg(long)]
    pub subjects: Option<String>,
    /// Semester to include (default: all)
    #[arg(long)]
    pub semester: Option<String>,
    /// JSON label table replacing the default High / Medium-High / Medium / Low tiers
    #[arg(long)]
    pub labels: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Args = Args::parse();
    let time = Utc::now();

    let distance_metric = match &args.distance {
        Some(name) => name.parse::<DistanceMetric>()?,
        None => DistanceMetric::Absolute,
    };
    let config = ClusterRunConfig {
        k: args.k.unwrap_or(3),
        max_iterations: args.max_iter.unwrap_or(100),
        tolerance: args.tolerance,
        distance_metric,
        seed: args.seed,
    };
    config.validate()?;

    let weights = WeightConfig::new(
        args.w_knowledge.unwrap_or(40.0),
        args.w_skill.unwrap_or(40.0),
        args.w_attitude.unwrap_or(20.0),
    )?;

    let filter = SubjectFilter {
        subjects: args.subjects.as_deref().map(parse_subjects).transpose()?,
        semester: args.semester.clone(),
    };

    let labels = match &args.labels {
        Some(path) => load_label_table(path).await?,
        None => LabelTable::default(),
    };

    let records = load_grades(&args.data).await?;
    info!(records = records.len(), k = config.k, ?filter, "starting clustering run");

    let mut source = InMemorySource::new();
    source.insert_records(CONFIG_ID, &records, &filter, weights, config.k, Some(config.max_iterations));
    let report = run_from_source(&source, CONFIG_ID, &config, &labels)?;

    for profile in report.profiles.iter() {
        info!(
            cluster_id = profile.cluster_id,
            label = %profile.label,
            count = profile.count,
            mean = profile.mean,
            stddev = profile.stddev,
            "cluster profile"
        );
    }
    info!(accuracy = report.accuracy, iterations = report.iterations, state = ?report.state, "clustering done");

    let out_dir = Path::new(&args.outdir);
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    write_run(out_dir, &config, &report, time).await?;

    Ok(())
}

// Example command line usage:
// cargo run --release -p cluster_runner -- --data grades.json --outdir out --k 3 --seed 7 --semester 2024-1
