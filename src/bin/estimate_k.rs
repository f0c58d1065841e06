//! Estimate the number of clusters in a dataset stored as a .npy matrix
//!
//! Each row of the input is one point. Runs silhouette analysis for every k
//! in `[2, k_max]` and prints the score of each candidate and the sizes of
//! the clusters of the best one.
//!
//! Usage: `estimate-k <input.npy> <k_max> [seed] [delta_threshold]`

use autokmeans_rs::{estimate_k, observations_from_rows, KMeans, KMeansConfig};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use std::env;
use std::fs::File;
use std::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 5 {
        eprintln!(
            "Usage: {} <input.npy> <k_max> [seed] [delta_threshold]",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let k_max: usize = args[2].parse()?;
    let seed: u64 = match args.get(3) {
        Some(seed) => seed.parse()?,
        None => 0,
    };
    let delta_threshold: f64 = match args.get(4) {
        Some(delta) => delta.parse()?,
        None => autokmeans_rs::DEFAULT_DELTA_THRESHOLD,
    };

    // Read input data
    let reader = BufReader::new(File::open(input_path)?);
    let data: Array2<f64> = Array2::read_npy(reader)?;

    info!(
        n_samples = data.nrows(),
        n_features = data.ncols(),
        k_max,
        seed,
        delta_threshold,
        "loaded data"
    );

    let points = observations_from_rows(&data.view());
    let config = KMeansConfig::new(delta_threshold).with_seed(seed);
    let kmeans = KMeans::with_config(config)?;

    let estimate = estimate_k(&points, k_max, &kmeans)?;

    for entry in &estimate.scores {
        println!("k = {:>2}  score = {:.6}", entry.k, entry.score);
    }
    println!("best k = {} (score {:.6})", estimate.best_k, estimate.best_score);

    if let Some(best) = estimate.best() {
        for (i, cluster) in best.partition.iter().enumerate() {
            let center: Vec<String> = cluster.center().iter().map(|c| format!("{c:.4}")).collect();
            println!(
                "  cluster {}: {} points, center [{}]",
                i,
                cluster.len(),
                center.join(", ")
            );
        }
    }

    Ok(())
}
