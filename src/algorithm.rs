use crate::config::KMeansConfig;
use crate::error::{KMeansError, Result};
use crate::observation::Observation;
use crate::partition::Partition;
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Result of the k-means algorithm
#[derive(Debug)]
pub struct KMeansResult<'a, P> {
    /// Final clusters, each holding references into the input
    pub partition: Partition<'a, P>,
    /// `labels[i]` is the cluster index of input point `i`
    pub labels: Vec<usize>,
    /// Number of Lloyd iterations performed
    pub n_iterations: usize,
    /// Number of times an empty cluster had to be repopulated
    pub recoveries: usize,
}

/// Per-iteration counters handed to an [`IterationObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationStats {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Points whose cluster changed in this iteration. Forced to the dataset
    /// size when an empty cluster was repopulated.
    pub changes: usize,
    /// Empty clusters repopulated in this iteration
    pub recovered: usize,
}

/// Receives the partition after every Lloyd iteration (progress reporting,
/// plotting). An error aborts the run.
pub trait IterationObserver<P> {
    fn observe(&mut self, partition: &Partition<'_, P>, stats: &IterationStats) -> Result<()>;
}

/// Check the partition preconditions and return the shared dimensionality.
pub fn validate_input<P: Observation>(points: &[P], k: usize) -> Result<usize> {
    if points.is_empty() {
        return Err(KMeansError::InvalidConfiguration(
            "the data set is empty".to_string(),
        ));
    }
    if k == 0 {
        return Err(KMeansError::InvalidConfiguration(
            "k must be greater than 0".to_string(),
        ));
    }
    if k > points.len() {
        return Err(KMeansError::InvalidConfiguration(format!(
            "the size of the data set ({}) must at least equal k ({})",
            points.len(),
            k
        )));
    }

    let dim = points[0].dim();
    if let Some(found) = points.iter().map(|p| p.dim()).find(|&d| d != dim) {
        return Err(KMeansError::DimensionMismatch {
            expected: dim,
            found,
        });
    }

    Ok(dim)
}

/// Run Lloyd's algorithm from k-means++ seeds.
///
/// Stops when the iteration cap is reached or when the fraction of points
/// that changed cluster falls below `config.delta_threshold`. Every cluster
/// of the returned partition is non-empty.
pub fn kmeans_lloyd<'a, P, R>(
    points: &'a [P],
    k: usize,
    config: &KMeansConfig,
    rng: &mut R,
    mut observer: Option<&mut dyn IterationObserver<P>>,
) -> Result<KMeansResult<'a, P>>
where
    P: Observation,
    R: Rng + ?Sized,
{
    config.validate()?;
    let n_features = validate_input(points, k)?;
    let n_samples = points.len();

    debug!(n_samples, n_features, k, "starting k-means");

    let mut partition = Partition::from_centers(initialize_centers_plus_plus(points, k, rng));

    // No point has a cluster yet, so the first pass always counts every point
    // as changed and the centroids are recomputed at least once.
    let mut labels = vec![usize::MAX; n_samples];
    let mut n_iterations = 0;
    let mut recoveries = 0;
    let mut converged = false;

    for iteration in 0..config.max_iters {
        let iter_start = config.verbose.then(Instant::now);
        n_iterations = iteration + 1;

        partition.reset();

        let mut changes = 0;
        for (i, point) in points.iter().enumerate() {
            let ci = partition.nearest(point);
            partition.append(ci, point);
            if labels[i] != ci {
                labels[i] = ci;
                changes += 1;
            }
        }

        let recovered =
            recover_empty_clusters(points, &mut partition, &mut labels, config, rng)?;
        if recovered > 0 {
            recoveries += recovered;
            // Forces at least one more iteration after a relocation.
            changes = n_samples;
        }

        if changes > 0 {
            partition.recenter();
        }

        let stats = IterationStats {
            iteration,
            changes,
            recovered,
        };

        if let Some(start) = iter_start {
            info!(
                iteration = iteration + 1,
                max_iters = config.max_iters,
                changes,
                recovered,
                elapsed_s = start.elapsed().as_secs_f64(),
                "k-means iteration"
            );
        } else {
            trace!(iteration = iteration + 1, changes, recovered, "k-means iteration");
        }

        if let Some(observer) = observer.as_mut() {
            observer.observe(&partition, &stats).map_err(|err| {
                KMeansError::ComputationFailure(format!(
                    "failed to observe iteration {iteration}: {err}"
                ))
            })?;
        }

        if (changes as f64) / (n_samples as f64) < config.delta_threshold {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(k, n_iterations, recoveries, "k-means converged");
    } else {
        debug!(k, n_iterations, recoveries, "k-means reached the iteration cap");
    }

    Ok(KMeansResult {
        partition,
        labels,
        n_iterations,
        recoveries,
    })
}

/// Choose `k` initial centers from the data with k-means++ weighting.
///
/// The first center is the point at index `len / 2`. Each further center is
/// drawn with probability proportional to the point's distance to its
/// nearest already-chosen center, scanning points in input order and taking
/// the first one whose running sum reaches the drawn target.
pub fn initialize_centers_plus_plus<P, R>(points: &[P], k: usize, rng: &mut R) -> Vec<Array1<f64>>
where
    P: Observation,
    R: Rng + ?Sized,
{
    let mut centers = Vec::with_capacity(k);
    if points.is_empty() || k == 0 {
        return centers;
    }

    centers.push(points[points.len() / 2].coordinates().to_owned());

    let mut min_dists = vec![f64::INFINITY; points.len()];
    while centers.len() < k {
        if let Some(latest) = centers.last() {
            let latest = latest.view();
            for (min_dist, point) in min_dists.iter_mut().zip(points) {
                let dist = point.distance(&latest);
                if dist < *min_dist {
                    *min_dist = dist;
                }
            }
        }

        let total: f64 = min_dists.iter().sum();
        let target = rng.gen::<f64>() * total;

        let mut cumulative = 0.0;
        let mut next = 0;
        for (j, &dist) in min_dists.iter().enumerate() {
            cumulative += dist;
            if cumulative >= target {
                next = j;
                break;
            }
        }

        centers.push(points[next].coordinates().to_owned());
    }

    centers
}

/// Give every empty cluster one point taken from a cluster that has more
/// than one member. Returns how many clusters were repopulated.
fn recover_empty_clusters<'a, P, R>(
    points: &'a [P],
    partition: &mut Partition<'a, P>,
    labels: &mut [usize],
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<usize>
where
    P: Observation,
    R: Rng + ?Sized,
{
    let mut recovered = 0;

    for ci in 0..partition.len() {
        if !partition[ci].is_empty() {
            continue;
        }

        let donor = draw_donor(partition, labels, config.max_recovery_attempts, rng)
            .ok_or_else(|| {
                KMeansError::DegenerateInput(format!(
                    "no point available to repopulate empty cluster {ci} of {}",
                    partition.len()
                ))
            })?;

        let from = labels[donor];
        partition.cluster_mut(from).remove(&points[donor]);
        partition.append(ci, &points[donor]);
        labels[donor] = ci;
        recovered += 1;

        trace!(cluster = ci, donor, from, "repopulated empty cluster");
    }

    Ok(recovered)
}

/// Pick a point whose cluster has more than one member. Random draws first,
/// then a uniform choice among all eligible points.
fn draw_donor<P, R>(
    partition: &Partition<'_, P>,
    labels: &[usize],
    max_attempts: usize,
    rng: &mut R,
) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let n = labels.len();
    let eligible = |i: usize| partition[labels[i]].len() > 1;

    for _ in 0..max_attempts {
        let candidate = rng.gen_range(0..n);
        if eligible(candidate) {
            return Some(candidate);
        }
    }

    let candidates: Vec<usize> = (0..n).filter(|&i| eligible(i)).collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_blobs() -> Vec<[f64; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [10.0, 10.0, 10.0],
            [10.0, 10.0, 10.0],
            [10.0, 10.0, 10.0],
        ]
    }

    #[test]
    fn test_first_center_is_midpoint() {
        let points: Vec<[f64; 1]> = (0..7).map(|i| [i as f64]).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let centers = initialize_centers_plus_plus(&points, 1, &mut rng);
        assert_eq!(centers, vec![array![3.0]]);
    }

    #[test]
    fn test_plus_plus_picks_the_other_blob() {
        let points = two_blobs();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let centers = initialize_centers_plus_plus(&points, 2, &mut rng);
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0], array![10.0, 10.0, 10.0]);
        // Only the far blob carries any weight
        assert_eq!(centers[1], array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_validate_input() {
        let points = two_blobs();
        assert_eq!(validate_input(&points, 2).unwrap(), 3);
        assert!(matches!(
            validate_input(&points, 0),
            Err(KMeansError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            validate_input(&points, 7),
            Err(KMeansError::InvalidConfiguration(_))
        ));

        let empty: Vec<[f64; 3]> = Vec::new();
        assert!(validate_input(&empty, 1).is_err());

        let mixed = vec![vec![0.0, 1.0], vec![0.0]];
        assert!(matches!(
            validate_input(&mixed, 1),
            Err(KMeansError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_kmeans_two_blobs() {
        let points = two_blobs();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = KMeansConfig::default();

        let result = kmeans_lloyd(&points, 2, &config, &mut rng, None).unwrap();

        assert_eq!(result.partition.sizes(), vec![3, 3]);
        assert!(result.n_iterations <= 2);
        assert_eq!(result.recoveries, 0);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_ne!(result.labels[0], result.labels[3]);

        let low = &result.partition[result.labels[0]];
        for (c, expected) in low.center().iter().zip([0.0, 0.0, 0.0]) {
            assert_relative_eq!(*c, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_cluster_recovery() {
        // Two distinct values: the third seed duplicates an existing one
        let points: Vec<[f64; 2]> = (0..20)
            .map(|i| if i % 2 == 0 { [0.0, 0.0] } else { [5.0, 5.0] })
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = KMeansConfig::default().with_max_iters(5);

        let result = kmeans_lloyd(&points, 3, &config, &mut rng, None).unwrap();

        assert!(result.recoveries >= 1);
        assert!(result.partition.iter().all(|c| !c.is_empty()));
        assert_eq!(result.partition.sizes().iter().sum::<usize>(), points.len());
    }

    #[test]
    fn test_draw_donor_falls_back_to_scan() {
        let points = [[0.0], [1.0], [2.0]];
        let mut partition: Partition<'_, [f64; 1]> =
            Partition::from_centers(vec![array![0.0], array![1.5], array![9.0]]);
        partition.append(0, &points[0]);
        partition.append(1, &points[1]);
        partition.append(1, &points[2]);
        let labels = [0, 1, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let donor = draw_donor(&partition, &labels, 0, &mut rng).unwrap();
        assert!(donor == 1 || donor == 2);
    }

    #[test]
    fn test_no_donor_is_degenerate() {
        // Every populated cluster is a singleton, so nothing can be moved
        let points = [[0.0], [1.0]];
        let mut partition: Partition<'_, [f64; 1]> =
            Partition::from_centers(vec![array![0.0], array![1.0], array![2.0]]);
        partition.append(0, &points[0]);
        partition.append(1, &points[1]);
        let mut labels = [0, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(draw_donor(&partition, &labels, 16, &mut rng), None);

        let config = KMeansConfig::default().with_max_recovery_attempts(16);
        let result = recover_empty_clusters(&points, &mut partition, &mut labels, &config, &mut rng);
        assert!(matches!(result, Err(KMeansError::DegenerateInput(_))));
        assert_eq!(partition.sizes(), vec![1, 1, 0]);
    }

    struct FailingObserver;

    impl<P> IterationObserver<P> for FailingObserver {
        fn observe(&mut self, _: &Partition<'_, P>, _: &IterationStats) -> Result<()> {
            Err(KMeansError::ComputationFailure("plot".to_string()))
        }
    }

    #[test]
    fn test_observer_error_aborts() {
        let points = two_blobs();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = KMeansConfig::default();
        let mut observer = FailingObserver;

        let result = kmeans_lloyd(&points, 2, &config, &mut rng, Some(&mut observer));
        assert!(matches!(result, Err(KMeansError::ComputationFailure(_))));
    }
}
