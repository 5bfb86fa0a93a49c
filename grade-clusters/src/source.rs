use std::collections::HashMap;

use crate::{
    context::SubjectFilter,
    data_type::grade::{GradeAverages, GradeRecord, WeightConfig},
    error::{ClusteringError, Result},
    features::average_grades,
};

/// Identifier of a clustering configuration owned by the caller
pub type ConfigId = u64;

/// Data the pipeline pulls from external collaborators for one configuration
pub trait GradeSource {
    fn fetch_student_grade_averages(&self, config: ConfigId) -> Result<Vec<GradeAverages>>;

    fn fetch_weight_config(&self, config: ConfigId) -> Result<WeightConfig>;

    fn fetch_cluster_count(&self, config: ConfigId) -> Result<usize>;

    /// `None` lets the pipeline use its default iteration cap
    fn fetch_max_iterations(&self, _config: ConfigId) -> Result<Option<usize>> {
        Ok(None)
    }
}

/// Everything [`InMemorySource`] knows about one configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SourceEntry {
    pub averages: Vec<GradeAverages>,
    pub weights: WeightConfig,
    pub k: usize,
    pub max_iterations: Option<usize>,
}

/// Source backed by preloaded data, keyed by configuration
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    entries: HashMap<ConfigId, SourceEntry>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, config: ConfigId, entry: SourceEntry) -> Option<SourceEntry> {
        self.entries.insert(config, entry)
    }

    /// Register raw grade records; averages are computed once, here
    pub fn insert_records(
        &mut self,
        config: ConfigId,
        records: &[GradeRecord],
        filter: &SubjectFilter,
        weights: WeightConfig,
        k: usize,
        max_iterations: Option<usize>,
    ) -> Option<SourceEntry> {
        let entry = SourceEntry {
            averages: average_grades(records, filter),
            weights,
            k,
            max_iterations,
        };
        self.insert(config, entry)
    }

    fn entry(&self, config: ConfigId) -> Result<&SourceEntry> {
        self.entries
            .get(&config)
            .ok_or_else(|| ClusteringError::Source(format!("unknown configuration {config}")))
    }
}

impl GradeSource for InMemorySource {
    fn fetch_student_grade_averages(&self, config: ConfigId) -> Result<Vec<GradeAverages>> {
        Ok(self.entry(config)?.averages.clone())
    }

    fn fetch_weight_config(&self, config: ConfigId) -> Result<WeightConfig> {
        Ok(self.entry(config)?.weights)
    }

    fn fetch_cluster_count(&self, config: ConfigId) -> Result<usize> {
        Ok(self.entry(config)?.k)
    }

    fn fetch_max_iterations(&self, config: ConfigId) -> Result<Option<usize>> {
        Ok(self.entry(config)?.max_iterations)
    }
}
