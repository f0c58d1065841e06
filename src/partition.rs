//! Groups and partitions built over a borrowed set of observations.

use crate::distance::mean_coordinates;
use crate::error::{KMeansError, Result};
use crate::observation::Observation;
use ndarray::{Array1, ArrayView1};
use std::ops::Index;

/// One cell of a partition: a centroid and the observations assigned to it.
#[derive(Debug)]
pub struct Cluster<'a, P> {
    center: Array1<f64>,
    observations: Vec<&'a P>,
}

impl<'a, P> Cluster<'a, P> {
    /// Create an empty cluster around `center`.
    pub fn new(center: Array1<f64>) -> Self {
        Self {
            center,
            observations: Vec::new(),
        }
    }

    pub fn center(&self) -> &Array1<f64> {
        &self.center
    }

    pub fn observations(&self) -> &[&'a P] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn append(&mut self, observation: &'a P) {
        self.observations.push(observation);
    }

    /// Remove `observation` (matched by identity, not value). Returns whether
    /// it was a member.
    pub fn remove(&mut self, observation: &P) -> bool {
        match self
            .observations
            .iter()
            .position(|member| std::ptr::eq(*member, observation))
        {
            Some(pos) => {
                self.observations.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<P: Observation> Cluster<'_, P> {
    /// Move the centroid to the mean of the current members. An empty
    /// cluster keeps its centroid.
    pub fn recenter(&mut self) {
        if let Some(mean) = mean_coordinates(&self.observations) {
            self.center = mean;
        }
    }
}

/// A fixed-size, ordered collection of `k` clusters.
#[derive(Debug)]
pub struct Partition<'a, P> {
    clusters: Vec<Cluster<'a, P>>,
}

impl<'a, P> Partition<'a, P> {
    /// Create a partition with one empty cluster per center.
    pub fn from_centers(centers: Vec<Array1<f64>>) -> Self {
        Self {
            clusters: centers.into_iter().map(Cluster::new).collect(),
        }
    }

    /// Number of clusters (k).
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[Cluster<'a, P>] {
        &self.clusters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster<'a, P>> {
        self.clusters.iter()
    }

    /// Member count of every cluster, in cluster order.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::len).collect()
    }

    /// Clear every cluster's members, keeping centroids.
    pub fn reset(&mut self) {
        for cluster in &mut self.clusters {
            cluster.observations.clear();
        }
    }

    pub fn append(&mut self, index: usize, observation: &'a P) {
        self.clusters[index].append(observation);
    }

    pub(crate) fn cluster_mut(&mut self, index: usize) -> &mut Cluster<'a, P> {
        &mut self.clusters[index]
    }
}

impl<'a, P: Observation> Partition<'a, P> {
    /// Index of the cluster whose centroid is nearest to `point`. Ties go to
    /// the lowest index.
    pub fn nearest<Q: Observation + ?Sized>(&self, point: &Q) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, cluster) in self.clusters.iter().enumerate() {
            let dist = point.distance(&cluster.center.view());
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Nearest cluster to `point` other than `exclude`, with its centroid
    /// distance.
    pub fn neighbour<Q: Observation + ?Sized>(
        &self,
        point: &Q,
        exclude: usize,
    ) -> Result<(usize, f64)> {
        if self.clusters.len() < 2 {
            return Err(KMeansError::InvalidConfiguration(
                "cannot compute a neighbouring cluster when k < 2".to_string(),
            ));
        }

        let mut best = None;
        for (i, cluster) in self.clusters.iter().enumerate() {
            if i == exclude {
                continue;
            }
            let dist = point.distance(&cluster.center.view());
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((i, dist)),
            }
        }

        best.ok_or_else(|| {
            KMeansError::ComputationFailure(format!("no cluster left after excluding {exclude}"))
        })
    }

    /// Index of the cluster whose centroid is nearest to `coordinates`
    /// under squared Euclidean distance. Ties go to the lowest index.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `coordinates` does not have the
    /// centroids' dimensionality, and `InvalidConfiguration` for a partition
    /// without clusters.
    pub fn predict(&self, coordinates: &ArrayView1<'_, f64>) -> Result<usize> {
        let expected = self
            .clusters
            .first()
            .map(|cluster| cluster.center.len())
            .ok_or_else(|| {
                KMeansError::InvalidConfiguration(
                    "cannot predict with an empty partition".to_string(),
                )
            })?;

        let found = coordinates.len();
        if found != expected {
            return Err(KMeansError::DimensionMismatch { expected, found });
        }

        Ok(self.nearest(coordinates))
    }

    /// Recompute every centroid from its current members.
    pub fn recenter(&mut self) {
        for cluster in &mut self.clusters {
            cluster.recenter();
        }
    }
}

impl<'a, P> Index<usize> for Partition<'a, P> {
    type Output = Cluster<'a, P>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clusters[index]
    }
}

impl<'p, 'a, P> IntoIterator for &'p Partition<'a, P> {
    type Item = &'p Cluster<'a, P>;
    type IntoIter = std::slice::Iter<'p, Cluster<'a, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}
