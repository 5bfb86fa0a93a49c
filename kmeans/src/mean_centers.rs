//! Mean centroid calculation for scalar K-Means clustering
//! Recomputes every centroid as the arithmetic mean of the points assigned to it

/// Recalculate cluster centroids as the mean of their members
///
/// Produces a new centroid vector and leaves `previous` untouched.
///
/// # Arguments
/// * `data` - All points as `(id, score)` pairs
/// * `previous` - Centroid vector used by the assignment pass
/// * `assigned` - Centroid index of every point, in the same order as `data`
///
/// # Returns
/// * Tuple containing:
///   - New centroid vector, same length as `previous`
///   - Indexes of centroids that received no member and kept their previous value
///
/// # Algorithm
/// 1. Sum scores and count members per centroid
/// 2. Divide each sum by its count
/// 3. A centroid without members keeps its previous value
pub fn mean_recalculate<I>(
    data: &[(I, f64)],
    previous: &[f64],
    assigned: &[usize],
) -> (Vec<f64>, Vec<usize>) {
    // Step 1: per centroid (sum, count)
    let mut sums: Vec<(f64, usize)> = vec![(0.0, 0); previous.len()];
    for ((_, score), cluster) in data.iter().zip(assigned.iter()) {
        let slot = &mut sums[*cluster];
        slot.0 += score;
        slot.1 += 1;
    }

    // Steps 2 and 3
    let mut empty = Vec::new();
    let centroids = sums
        .iter()
        .zip(previous.iter())
        .enumerate()
        .map(|(cluster, ((sum, count), old))| {
            if *count == 0 {
                empty.push(cluster);
                *old
            } else {
                sum / (*count as f64)
            }
        })
        .collect();

    (centroids, empty)
}
