//! Point abstraction consumed by the partitioning engine.
//!
//! Anything with a fixed-length coordinate vector can be clustered. The
//! engine never copies or mutates observations; it only reads coordinates
//! and asks for distances to centroids.

use crate::distance::squared_euclidean;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// A clusterable point: coordinates plus a distance to an arbitrary
/// coordinate vector of the same length.
pub trait Observation {
    /// The point's coordinates.
    fn coordinates(&self) -> ArrayView1<'_, f64>;

    /// Distance from this point to `other`. Squared Euclidean by default.
    fn distance(&self, other: &ArrayView1<'_, f64>) -> f64 {
        squared_euclidean(&self.coordinates(), other)
    }

    /// Number of coordinates.
    fn dim(&self) -> usize {
        self.coordinates().len()
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        (**self).coordinates()
    }

    fn distance(&self, other: &ArrayView1<'_, f64>) -> f64 {
        (**self).distance(other)
    }
}

impl Observation for Array1<f64> {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        self.view()
    }
}

impl Observation for ArrayView1<'_, f64> {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        self.view()
    }
}

impl Observation for Vec<f64> {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.as_slice())
    }
}

impl Observation for [f64] {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self)
    }
}

impl<const N: usize> Observation for [f64; N] {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self[..])
    }
}

/// Recency / frequency / monetary profile of one customer.
///
/// The three values are expected to be scaled by the caller before
/// clustering; they are used as-is as coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmObservation {
    user_id: u64,
    values: [f64; 3],
}

impl RfmObservation {
    pub fn new(user_id: u64, recency: f64, frequency: f64, monetary: f64) -> Self {
        Self {
            user_id,
            values: [recency, frequency, monetary],
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn recency(&self) -> f64 {
        self.values[0]
    }

    pub fn frequency(&self) -> f64 {
        self.values[1]
    }

    pub fn monetary(&self) -> f64 {
        self.values[2]
    }
}

impl Observation for RfmObservation {
    fn coordinates(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.values[..])
    }
}

/// Turn each row of a `(n_samples, n_features)` matrix into an owned observation.
pub fn observations_from_rows(data: &ArrayView2<'_, f64>) -> Vec<Array1<f64>> {
    data.outer_iter().map(|row| row.to_owned()).collect()
}
