//! Random initialization of cluster centroids
//! Picks k distinct data points uniformly at random (without replacement)
//! and uses their scores as the starting centroids.

use rand::{Rng, seq::index};
use tracing::debug;

/// Initialize cluster centroids by sampling k distinct points
///
/// The sampling is a pure function of the supplied random source: two calls
/// with generators in the same state over the same data return the same
/// centroids in the same order.
///
/// # Arguments
/// * `data` - Points to cluster as `(id, score)` pairs
/// * `k` - Number of centroids to draw
/// * `rng` - Random source used for the draw
///
/// # Returns
/// * `Some(Vec)` with k centroid values ordered by draw, or `None` if the data
///   holds fewer than k points
pub fn set_centroid_by_data<I, R>(data: &[(I, f64)], k: usize, rng: &mut R) -> Option<Vec<f64>>
where
    R: Rng + ?Sized,
{
    if k == 0 || data.len() < k {
        return None;
    }

    // Distinct positions, so the same point is never drawn twice
    let picked = index::sample(rng, data.len(), k);
    debug!(positions = ?picked, "initial centroids drawn");

    Some(picked.iter().map(|position| data[position].1).collect())
}
