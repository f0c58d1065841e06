//! Basic example demonstrating autokmeans-rs usage
//!
//! Run with: cargo run --example basic --release

use autokmeans_rs::{estimate_k, KMeans, KMeansConfig, RfmObservation};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== autokmeans-rs example ===\n");

    // Synthetic, already-scaled RFM profiles around 3 customer segments
    let n_samples = 300;
    let centers = [[0.1f64, 0.2, 0.1], [0.5, 0.8, 0.4], [0.9, 0.3, 0.9]];

    let noise = Array2::random((n_samples, 3), Uniform::new(-0.05f64, 0.05));
    let customers: Vec<RfmObservation> = (0..n_samples)
        .map(|i| {
            let c = centers[i % 3];
            RfmObservation::new(
                i as u64,
                c[0] + noise[[i, 0]],
                c[1] + noise[[i, 1]],
                c[2] + noise[[i, 2]],
            )
        })
        .collect();

    println!("True segment centers:");
    for (i, center) in centers.iter().enumerate() {
        println!(
            "  Segment {}: ({:.2}, {:.2}, {:.2})",
            i, center[0], center[1], center[2]
        );
    }
    println!();

    let config = KMeansConfig::default().with_seed(42);
    let kmeans = KMeans::with_config(config).expect("valid configuration");

    println!("Running silhouette analysis for k in [2, 7]...\n");
    let estimate = estimate_k(&customers, 7, &kmeans).expect("estimation failed");

    println!("Silhouette scores:");
    for entry in &estimate.scores {
        println!("  k = {}: {:.4}", entry.k, entry.score);
    }
    println!(
        "\nBest k = {} (score {:.4})\n",
        estimate.best_k, estimate.best_score
    );

    let best = estimate.best().expect("best entry present");
    println!("Segments:");
    for (i, cluster) in best.partition.iter().enumerate() {
        let center = cluster.center();
        println!(
            "  Segment {}: {} customers, center ({:.3}, {:.3}, {:.3})",
            i,
            cluster.len(),
            center[0],
            center[1],
            center[2]
        );
    }
    println!();

    println!("First 5 customers of segment 0:");
    for customer in best.partition[0].observations().iter().take(5) {
        println!(
            "  user {} (R={:.2}, F={:.2}, M={:.2})",
            customer.user_id(),
            customer.recency(),
            customer.frequency(),
            customer.monetary()
        );
    }

    println!("\n=== Done! ===");
}
