use serde::{Deserialize, Serialize};

use crate::error::{ClusteringError, Result};

pub type StudentId = u64;

// Representation slack when real-valued weights are summed
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// One per-subject grade row of a student.
/// A row may carry only some of the three components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub student_id: StudentId,
    pub subject_id: u64,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub knowledge: Option<f64>,
    #[serde(default)]
    pub skill: Option<f64>,
    #[serde(default)]
    pub attitude: Option<f64>,
}

/// Per-student component averages over the matching grade records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeAverages {
    pub student_id: StudentId,
    pub avg_knowledge: f64,
    pub avg_skill: f64,
    pub avg_attitude: f64,
}

/// Percentage weights of knowledge, skill and attitude in the composite score
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub w_k: f64,
    pub w_s: f64,
    pub w_a: f64,
}

impl WeightConfig {
    /// Checked constructor
    pub fn new(w_k: f64, w_s: f64, w_a: f64) -> Result<Self> {
        let weights = Self { w_k, w_s, w_a };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = self.w_k.is_finite() && self.w_s.is_finite() && self.w_a.is_finite();
        let sum = self.w_k + self.w_s + self.w_a;
        if !finite || !((sum - 100.0).abs() <= WEIGHT_SUM_EPSILON) {
            return Err(ClusteringError::InvalidWeightConfiguration {
                w_k: self.w_k,
                w_s: self.w_s,
                w_a: self.w_a,
            });
        }
        Ok(())
    }

    /// `(k*w_k + s*w_s + a*w_a) / 100`
    pub fn composite(&self, averages: &GradeAverages) -> f64 {
        (averages.avg_knowledge * self.w_k + averages.avg_skill * self.w_s + averages.avg_attitude * self.w_a) / 100.0
    }
}
