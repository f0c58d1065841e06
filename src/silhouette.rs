//! Silhouette analysis for choosing the number of clusters.
//!
//! For every candidate `k` in `[2, k_max]` the data is partitioned once and
//! scored by its mean silhouette index:
//!
//! ```text
//! a(p) = mean distance from p to the members of its own cluster
//! b(p) = min over other clusters C of the mean distance from p to C
//! s(p) = (b(p) - a(p)) / max(a(p), b(p))        (0 when both are 0)
//! ```
//!
//! Candidates are evaluated in parallel with rayon; the result order always
//! follows `k`. The highest mean wins, the lowest `k` on ties.

use crate::distance::average_distance;
use crate::error::{KMeansError, Result};
use crate::observation::Observation;
use crate::partition::Partition;
use rayon::prelude::*;
use tracing::{debug, info};

/// Anything that can split a set of observations into `k` clusters.
pub trait Partitioner<P> {
    fn partition<'a>(&self, points: &'a [P], k: usize) -> Result<Partition<'a, P>>;
}

/// Silhouette score of one candidate `k`, with the partition it was computed on.
#[derive(Debug)]
pub struct KScore<'a, P> {
    pub k: usize,
    pub partition: Partition<'a, P>,
    pub score: f64,
}

/// Outcome of [`estimate_k`].
#[derive(Debug)]
pub struct Estimate<'a, P> {
    /// One entry per candidate, ordered by `k` starting at 2
    pub scores: Vec<KScore<'a, P>>,
    pub best_k: usize,
    pub best_score: f64,
}

impl<'a, P> Estimate<'a, P> {
    /// The winning entry.
    pub fn best(&self) -> Option<&KScore<'a, P>> {
        self.scores.iter().find(|score| score.k == self.best_k)
    }
}

/// Silhouette index from cohesion `a` and separation `b`.
#[inline]
pub fn silhouette_index(a: f64, b: f64) -> f64 {
    let denom = a.max(b);
    if denom == 0.0 {
        0.0
    } else {
        (b - a) / denom
    }
}

/// Per-point silhouette indices, in cluster order then member order.
///
/// # Errors
///
/// `InvalidConfiguration` if the partition has fewer than two clusters;
/// `ComputationFailure` if a distance is NaN or a point has no populated
/// cluster to compare against.
pub fn point_silhouettes<P: Observation>(partition: &Partition<'_, P>) -> Result<Vec<f64>> {
    if partition.len() < 2 {
        return Err(KMeansError::InvalidConfiguration(format!(
            "silhouette analysis needs at least 2 clusters, got {}",
            partition.len()
        )));
    }

    let mut indices = Vec::with_capacity(partition.sizes().iter().sum());
    for (ci, cluster) in partition.iter().enumerate() {
        for &point in cluster.observations() {
            let a = average_distance(point, cluster.observations());
            let mut b = f64::INFINITY;
            for (cj, other) in partition.iter().enumerate() {
                if cj == ci || other.is_empty() {
                    continue;
                }
                let distance = average_distance(point, other.observations());
                if a.is_nan() || distance.is_nan() {
                    return Err(KMeansError::ComputationFailure(format!(
                        "non-finite distance between clusters {ci} and {cj}"
                    )));
                }
                b = b.min(distance);
            }

            if !b.is_finite() {
                return Err(KMeansError::ComputationFailure(format!(
                    "cluster {ci} has no populated neighbouring cluster"
                )));
            }

            indices.push(silhouette_index(a, b));
        }
    }

    Ok(indices)
}

/// Mean silhouette index over every point of the partition.
pub fn mean_silhouette<P: Observation>(partition: &Partition<'_, P>) -> Result<f64> {
    let indices = point_silhouettes(partition)?;
    if indices.is_empty() {
        return Err(KMeansError::ComputationFailure(
            "cannot score a partition without points".to_string(),
        ));
    }

    let score = indices.iter().sum::<f64>() / indices.len() as f64;
    if !score.is_finite() {
        return Err(KMeansError::ComputationFailure(format!(
            "silhouette score is not finite ({score})"
        )));
    }
    Ok(score)
}

/// Partition `points` into `k` clusters with `partitioner` and score the result.
pub fn score<'a, P, M>(points: &'a [P], k: usize, partitioner: &M) -> Result<KScore<'a, P>>
where
    P: Observation,
    M: Partitioner<P> + ?Sized,
{
    let partition = partitioner.partition(points, k)?;
    let score = mean_silhouette(&partition)?;
    debug!(k, score, "silhouette score computed");

    Ok(KScore {
        k,
        partition,
        score,
    })
}

/// Silhouette scores for every `k` in `[2, k_max]`, computed in parallel.
///
/// The returned vector is indexed by `k - 2`. If any candidate fails, the
/// error of the lowest failing `k` is returned and all other results are
/// dropped.
pub fn scores<'a, P, M>(points: &'a [P], k_max: usize, partitioner: &M) -> Result<Vec<KScore<'a, P>>>
where
    P: Observation + Sync,
    M: Partitioner<P> + Sync + ?Sized,
{
    if k_max < 2 {
        return Err(KMeansError::InvalidConfiguration(format!(
            "k_max must be at least 2, got {k_max}"
        )));
    }
    if k_max > points.len() {
        return Err(KMeansError::InvalidConfiguration(format!(
            "k_max ({k_max}) exceeds the number of points ({})",
            points.len()
        )));
    }

    let results: Vec<Result<KScore<'a, P>>> = (2..=k_max)
        .into_par_iter()
        .map(|k| score(points, k, partitioner))
        .collect();

    results.into_iter().collect()
}

/// Estimate the best number of clusters in `[2, k_max]` by silhouette score.
///
/// # Example
///
/// ```
/// use autokmeans_rs::{estimate_k, KMeans};
///
/// let points = vec![
///     [0.0, 0.0, 0.0],
///     [0.0, 0.0, 0.0],
///     [0.0, 0.0, 0.0],
///     [10.0, 10.0, 10.0],
///     [10.0, 10.0, 10.0],
///     [10.0, 10.0, 10.0],
/// ];
///
/// let estimate = estimate_k(&points, 4, &KMeans::new()).unwrap();
/// assert_eq!(estimate.best_k, 2);
/// assert_eq!(estimate.scores.len(), 3);
/// ```
pub fn estimate_k<'a, P, M>(points: &'a [P], k_max: usize, partitioner: &M) -> Result<Estimate<'a, P>>
where
    P: Observation + Sync,
    M: Partitioner<P> + Sync + ?Sized,
{
    let scores = scores(points, k_max, partitioner)?;

    let mut best: Option<(usize, f64)> = None;
    for entry in &scores {
        match best {
            Some((_, best_score)) if entry.score <= best_score => {}
            _ => best = Some((entry.k, entry.score)),
        }
    }

    let (best_k, best_score) = best.ok_or_else(|| {
        KMeansError::ComputationFailure("no candidate k was scored".to_string())
    })?;

    info!(best_k, best_score, candidates = scores.len(), "estimated number of clusters");

    Ok(Estimate {
        scores,
        best_k,
        best_score,
    })
}
