use autokmeans_rs::{point_silhouettes, KMeans, KMeansConfig, Partitioner};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_kmeans_covers_every_point(
        data in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 2), 1..30),
        k in 1usize..6,
        seed in any::<u64>(),
    ) {
        // Skip if k > n
        if k <= data.len() {
            let kmeans = KMeans::with_config(KMeansConfig::default().with_seed(seed)).unwrap();
            let result = kmeans.fit(&data, k).unwrap();

            prop_assert_eq!(result.labels.len(), data.len());
            prop_assert_eq!(result.partition.len(), k);
            prop_assert_eq!(result.partition.sizes().iter().sum::<usize>(), data.len());
            for cluster in &result.partition {
                prop_assert!(!cluster.is_empty());
            }
            for (i, &label) in result.labels.iter().enumerate() {
                prop_assert!(label < k);
                prop_assert!(result.partition[label]
                    .observations()
                    .iter()
                    .any(|m| std::ptr::eq(*m, &data[i])));
            }
        }
    }

    #[test]
    fn prop_silhouette_within_bounds(
        data in prop::collection::vec(prop::collection::vec(0.0f64..1.0, 3), 2..25),
        k in 2usize..5,
    ) {
        if k <= data.len() {
            let partition = KMeans::new().partition(&data, k).unwrap();
            for s in point_silhouettes(&partition).unwrap() {
                prop_assert!((-1.0..=1.0).contains(&s));
            }
        }
    }
}
