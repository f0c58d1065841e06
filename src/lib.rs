//! # autokmeans-rs
//!
//! k-means clustering with an automatic, data-driven choice of k.
//!
//! ## Features
//!
//! - **k-means++ seeding**: initial centers are spread out by
//!   distance-weighted sampling, starting from the point at the middle of
//!   the input
//! - **Lloyd iterations** with empty-cluster recovery and two stopping rules
//!   (iteration cap, fraction of points that changed cluster)
//! - **Silhouette analysis**: every candidate k in `[2, k_max]` is partitioned
//!   and scored in parallel with rayon; the best mean silhouette wins
//! - **Generic points**: anything implementing [`Observation`] can be
//!   clustered, including `ndarray::Array1<f64>`, `Vec<f64>` and `[f64; N]`
//! - **Reproducible**: randomness comes from a seeded `ChaCha8Rng` or a
//!   caller-supplied `Rng`
//!
//! ## Example
//!
//! ```rust
//! use autokmeans_rs::{estimate_k, KMeans, KMeansConfig};
//!
//! let points = vec![
//!     [0.0, 0.0],
//!     [0.2, 0.1],
//!     [0.1, 0.3],
//!     [8.0, 8.0],
//!     [8.2, 7.9],
//!     [7.9, 8.1],
//! ];
//!
//! let kmeans = KMeans::with_config(KMeansConfig::default().with_seed(42)).unwrap();
//!
//! // Fixed k
//! let result = kmeans.fit(&points, 2).unwrap();
//! assert_eq!(result.partition.len(), 2);
//!
//! // Let silhouette analysis pick k
//! let estimate = estimate_k(&points, 4, &kmeans).unwrap();
//! assert_eq!(estimate.best_k, 2);
//! ```
//!
//! ## ndarray input
//!
//! ```rust
//! use autokmeans_rs::{observations_from_rows, KMeans};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]];
//! let points = observations_from_rows(&data.view());
//! let result = KMeans::new().fit(&points, 2).unwrap();
//! assert_eq!(result.labels.len(), 4);
//! ```

mod algorithm;
mod config;
mod distance;
mod error;
mod kmeans;
mod observation;
mod partition;
mod silhouette;

pub use algorithm::{IterationObserver, IterationStats, KMeansResult};
pub use config::{KMeansConfig, DEFAULT_DELTA_THRESHOLD, DEFAULT_MAX_ITERS};
pub use distance::{average_distance, squared_euclidean};
pub use error::{KMeansError, Result};
pub use kmeans::KMeans;
pub use observation::{observations_from_rows, Observation, RfmObservation};
pub use partition::{Cluster, Partition};
pub use silhouette::{
    estimate_k, mean_silhouette, point_silhouettes, score, scores, silhouette_index, Estimate,
    KScore, Partitioner,
};
