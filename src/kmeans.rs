use crate::algorithm::{kmeans_lloyd, IterationObserver, KMeansResult};
use crate::config::KMeansConfig;
use crate::error::Result;
use crate::observation::Observation;
use crate::partition::Partition;
use crate::silhouette::Partitioner;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// k-means partitioning engine with k-means++ seeding.
///
/// Each call to [`fit`](KMeans::fit) seeds a fresh `ChaCha8Rng` from the
/// configured seed, so repeated calls on the same input return the same
/// partition. Use [`fit_with_rng`](KMeans::fit_with_rng) to supply the random
/// source directly.
///
/// # Example
///
/// ```
/// use autokmeans_rs::KMeans;
///
/// let points = vec![
///     [0.0, 0.0],
///     [0.1, 0.1],
///     [10.0, 10.0],
///     [10.1, 10.1],
/// ];
///
/// let kmeans = KMeans::new();
/// let result = kmeans.fit(&points, 2).unwrap();
/// assert_eq!(result.labels[0], result.labels[1]);
/// assert_ne!(result.labels[0], result.labels[2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new KMeans instance with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the delta threshold is outside (0, 1)
    /// or the iteration cap is zero.
    pub fn with_config(config: KMeansConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Partition `points` into `k` clusters.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `k` is 0 or larger than the number of points
    /// - points have different dimensionality
    /// - an empty cluster cannot be repopulated
    pub fn fit<'a, P: Observation>(&self, points: &'a [P], k: usize) -> Result<KMeansResult<'a, P>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(points, k, &mut rng)
    }

    /// Partition `points` into `k` clusters, drawing randomness from `rng`.
    pub fn fit_with_rng<'a, P, R>(
        &self,
        points: &'a [P],
        k: usize,
        rng: &mut R,
    ) -> Result<KMeansResult<'a, P>>
    where
        P: Observation,
        R: Rng + ?Sized,
    {
        kmeans_lloyd(points, k, &self.config, rng, None)
    }

    /// Like [`fit_with_rng`](KMeans::fit_with_rng), reporting the partition to
    /// `observer` after every iteration.
    pub fn fit_observed<'a, P, R>(
        &self,
        points: &'a [P],
        k: usize,
        rng: &mut R,
        observer: &mut dyn IterationObserver<P>,
    ) -> Result<KMeansResult<'a, P>>
    where
        P: Observation,
        R: Rng + ?Sized,
    {
        kmeans_lloyd(points, k, &self.config, rng, Some(observer))
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

impl<P: Observation> Partitioner<P> for KMeans {
    fn partition<'a>(&self, points: &'a [P], k: usize) -> Result<Partition<'a, P>> {
        Ok(self.fit(points, k)?.partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::IterationStats;
    use crate::error::KMeansError;

    fn line(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, (i % 3) as f64]).collect()
    }

    #[test]
    fn test_kmeans_new() {
        let kmeans = KMeans::new();
        assert_eq!(kmeans.config().max_iters, 96);
    }

    #[test]
    fn test_with_config_rejects_bad_threshold() {
        let result = KMeans::with_config(KMeansConfig::new(1.0));
        assert!(matches!(result, Err(KMeansError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_fit_is_reproducible() {
        let points = line(50);
        let kmeans = KMeans::with_config(KMeansConfig::default().with_seed(9)).unwrap();

        let first = kmeans.fit(&points, 4).unwrap();
        let second = kmeans.fit(&points, 4).unwrap();

        assert_eq!(first.labels, second.labels);
        for (a, b) in first.partition.iter().zip(second.partition.iter()) {
            assert_eq!(a.center(), b.center());
        }
    }

    #[test]
    fn test_verbose_does_not_change_the_result() {
        let points = line(40);
        let quiet = KMeans::with_config(KMeansConfig::default().with_seed(4)).unwrap();
        let verbose =
            KMeans::with_config(KMeansConfig::default().with_seed(4).with_verbose(true)).unwrap();

        let a = quiet.fit(&points, 3).unwrap();
        let b = verbose.fit(&points, 3).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.n_iterations, b.n_iterations);
    }

    #[test]
    fn test_fit_k_too_large() {
        let points = line(3);
        let result = KMeans::new().fit(&points, 4);
        assert!(matches!(result, Err(KMeansError::InvalidConfiguration(_))));
    }

    #[derive(Default)]
    struct RecordingObserver {
        seen: Vec<IterationStats>,
    }

    impl IterationObserver<[f64; 2]> for RecordingObserver {
        fn observe(
            &mut self,
            partition: &Partition<'_, [f64; 2]>,
            stats: &IterationStats,
        ) -> Result<()> {
            assert_eq!(partition.len(), 3);
            self.seen.push(*stats);
            Ok(())
        }
    }

    #[test]
    fn test_fit_observed_sees_every_iteration() {
        let points = line(30);
        let kmeans = KMeans::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut observer = RecordingObserver::default();

        let result = kmeans
            .fit_observed(&points, 3, &mut rng, &mut observer)
            .unwrap();

        let iterations: Vec<usize> = observer.seen.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, (0..result.n_iterations).collect::<Vec<_>>());
        // The first pass assigns every point
        assert_eq!(observer.seen[0].changes, 30);
    }

    #[test]
    fn test_partitioner_impl() {
        let points = line(12);
        let partition = Partitioner::partition(&KMeans::new(), &points, 3).unwrap();
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.sizes().iter().sum::<usize>(), 12);
    }
}
