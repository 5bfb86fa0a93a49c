use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    error::{KmeansError, Result},
    init_random::set_centroid_by_data,
    mean_centers::mean_recalculate,
    types::{DistanceMetric, EmptyClusterEvent, FitResult, IterationTrace, KmeansState, PointAssignment},
};

/// Iteration cap used when the caller does not supply one
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Parameters of a K-Means run over one-dimensional scores, together with
/// its own seeded random source and the centroids of the last fit.
#[derive(Clone, Debug)]
pub struct ScalarKmeans {
    pub k: usize,
    pub max_iteration: usize,
    /// Opt-in early stop: halt once no centroid moved by more than this value.
    /// `None` keeps the exact-equality rule as the only convergence test.
    pub tolerance: Option<f64>,
    pub metric: DistanceMetric,
    pub centroid: Vec<f64>,
    pub rng: ChaCha20Rng,
    pub state: KmeansState,
}

impl ScalarKmeans {
    /// A seed makes the run reproducible; without one the generator is seeded from the thread RNG.
    pub fn new(
        k: usize,
        max_iteration: Option<usize>,
        tolerance: Option<f64>,
        metric: Option<DistanceMetric>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self {
            k,
            max_iteration: max_iteration.unwrap_or(DEFAULT_MAX_ITERATIONS),
            tolerance,
            metric: metric.unwrap_or_default(),
            centroid: Vec::new(),
            rng,
            state: KmeansState::Initialized,
        }
    }

    fn check(&self, points: usize) -> Result<()> {
        if self.k < 2 {
            return Err(KmeansError::InvalidClusterCount { k: self.k });
        }
        if points < self.k {
            return Err(KmeansError::InsufficientData { points, k: self.k });
        }
        if self.max_iteration == 0 {
            return Err(KmeansError::InvalidParameter {
                name: "max_iteration",
                message: "must be at least 1",
            });
        }
        if let Some(tolerance) = self.tolerance {
            if !(tolerance >= 0.0 && tolerance.is_finite()) {
                return Err(KmeansError::InvalidParameter {
                    name: "tolerance",
                    message: "must be a finite non-negative number",
                });
            }
        }
        Ok(())
    }
}

/// Fit the model using its own random source for seeding
pub fn fit<I>(data: &[(I, f64)], model: &mut ScalarKmeans) -> Result<FitResult<I>>
where
    I: Copy + Send + Sync,
{
    let mut rng = model.rng.clone();
    let result = fit_with_rng(data, model, &mut rng);
    model.rng = rng;
    result
}

/// Fit the model to scalar points, drawing the initial centroids from `rng`.
///
/// Each iteration assigns every point to its nearest centroid (ties go to the
/// lowest index) and then recomputes centroids as member means. The loop ends
/// when the centroid vector stops changing exactly, when the optional
/// tolerance stop triggers, or after `max_iteration` passes.
///
/// # Arguments
/// * `data` - Points as `(id, score)` pairs; output preserves this order
/// * `model` - Run parameters; receives the final centroids and state
/// * `rng` - Random source for the initial centroid draw
///
/// # Errors
/// Fails before any computation if `k < 2`, there are fewer points than `k`,
/// `max_iteration` is zero, the tolerance is negative, or a score is not finite.
pub fn fit_with_rng<I, R>(data: &[(I, f64)], model: &mut ScalarKmeans, rng: &mut R) -> Result<FitResult<I>>
where
    I: Copy + Send + Sync,
    R: Rng + ?Sized,
{
    model.state = KmeansState::Initialized;
    model.check(data.len())?;
    if let Some(index) = data.iter().position(|(_, score)| !score.is_finite()) {
        return Err(KmeansError::NonFiniteScore { index });
    }

    let fit_timer = Instant::now();
    let initial = set_centroid_by_data(data, model.k, rng).ok_or(KmeansError::InsufficientData {
        points: data.len(),
        k: model.k,
    })?;

    let mut centroids = initial.clone();
    let mut empty_clusters = Vec::new();
    let mut trace = Vec::new();
    let mut iteration = 0;
    model.state = KmeansState::Iterating;

    let assigned = loop {
        iteration += 1;
        let iteration_timer = Instant::now();

        // Assignment and update against the centroids of the previous iteration
        let assigned = assign_points(data, &centroids, model.metric);
        let clusters: Vec<usize> = assigned.iter().map(|(cluster, _)| *cluster).collect();
        let (next, empty) = mean_recalculate(data, &centroids, &clusters);

        for cluster in empty {
            warn!(iteration, cluster, centroid = centroids[cluster], "cluster received no members, centroid retained");
            empty_clusters.push(EmptyClusterEvent { iteration, cluster });
        }

        let max_shift = next
            .iter()
            .zip(centroids.iter())
            .map(|(new, old)| (new - old).abs())
            .fold(0.0, f64::max);
        debug!(iteration, ?next, max_shift, "iteration finished");
        trace.push(IterationTrace {
            iteration,
            centroids: next.clone(),
            max_shift,
            elapsed: iteration_timer.elapsed(),
        });

        if next == centroids {
            model.state = KmeansState::Converged;
            break assigned;
        }
        let within_tolerance = model.tolerance.is_some_and(|tolerance| max_shift <= tolerance);
        centroids = next;
        if within_tolerance {
            model.state = KmeansState::ToleranceReached;
            break assigned;
        }
        if iteration >= model.max_iteration {
            model.state = KmeansState::MaxIterationsReached;
            break assigned;
        }
    };

    info!(state = ?model.state, iterations = iteration, k = model.k, points = data.len(), "k-means finished");
    model.centroid = centroids.clone();

    let assignments = data
        .iter()
        .zip(assigned)
        .map(|((id, score), (cluster, distance))| PointAssignment {
            id: *id,
            cluster,
            score: *score,
            distance,
        })
        .collect();

    Ok(FitResult {
        assignments,
        centroids,
        initial_centroids: initial,
        iterations: iteration,
        state: model.state,
        empty_clusters,
        trace,
        elapsed: fit_timer.elapsed(),
    })
}

/// Nearest centroid of every point as `(centroid index, distance)`, in input order
pub fn assign_points<I>(data: &[(I, f64)], centroids: &[f64], metric: DistanceMetric) -> Vec<(usize, f64)>
where
    I: Sync,
{
    data.par_iter()
        .map(|(_, score)| nearest_centroid(*score, centroids, metric))
        .collect()
}

// Strict comparison keeps the first of equidistant centroids
fn nearest_centroid(score: f64, centroids: &[f64], metric: DistanceMetric) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_distance), (idx, centroid)| {
            let distance = metric.distance(score, *centroid);
            if distance < best_distance {
                (idx, distance)
            } else {
                (best, best_distance)
            }
        })
}
