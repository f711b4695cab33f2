use crate::forest::{Forest, ForestConfig};
use crate::partition::{dedup_and_partition, is_partitioned};
use crate::point::PointRecord;
use crate::r#type::Indexable;
use crate::rtree::{EuclideanDistance, HaversineDistance};
use crate::test::{brute_force_distances, random_points};

fn distinct_ids(points: &[PointRecord]) -> usize {
    let mut ids: Vec<u64> = points.iter().map(|p| p.id).collect();
    ids.sort();
    ids.dedup();
    ids.len()
}

#[test]
fn dedup_is_idempotent() {
    for seed in 0..5 {
        let points = random_points(seed, 2_000, 500);
        let once = dedup_and_partition(points);
        let twice = dedup_and_partition(once.clone());

        let as_tuples = |points: &[PointRecord]| -> Vec<(u64, i32, i32)> {
            points.iter().map(|p| (p.id, p.lon, p.lat)).collect()
        };
        assert_eq!(as_tuples(&once), as_tuples(&twice));
    }
}

#[test]
fn partition_orders_by_longitude() {
    let points = dedup_and_partition(random_points(7, 5_000, 4_000));
    assert!(is_partitioned(&points));
    assert!(points.windows(2).all(|w| w[0].lon <= w[1].lon));
}

#[test]
fn forest_holds_every_distinct_id_once() {
    let raw = random_points(11, 3_000, 1_000);
    let expected = distinct_ids(&raw);
    let points = dedup_and_partition(raw);

    for chunk_size in [1, 64, 1_000, 100_000] {
        let config = ForestConfig::new().with_chunk_size(chunk_size);
        let forest = Forest::try_new_with_config(&points, &config).unwrap();
        assert_eq!(forest.size(), expected);

        let mut ids: Vec<u64> = forest
            .subtrees()
            .iter()
            .flat_map(|s| s.items().iter().map(|p| p.id))
            .collect();
        ids.sort();
        let len = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), len, "no id in two subtrees");
    }
}

#[test]
fn results_do_not_depend_on_chunk_size() {
    let points = dedup_and_partition(random_points(3, 2_000, u64::MAX));
    let queries = random_points(4, 20, 1);
    let metric = PointRecord::metric();

    let reference = Forest::try_new(&points).unwrap();
    for chunk_size in [1, 7, 100, 1_999] {
        let config = ForestConfig::new()
            .with_chunk_size(chunk_size)
            .with_node_size(8);
        let forest = Forest::try_new_with_config(&points, &config).unwrap();

        for q in queries.iter() {
            let expected: Vec<f64> = reference
                .nearest_with_distance(q.lon, q.lat, 10, &metric)
                .into_iter()
                .map(|(_, d)| d)
                .collect();
            let found: Vec<f64> = forest
                .nearest_with_distance(q.lon, q.lat, 10, &metric)
                .into_iter()
                .map(|(_, d)| d)
                .collect();
            assert_eq!(found, expected, "chunk size {chunk_size}");
        }
    }
}

#[test]
fn merge_matches_brute_force_on_seven_points() {
    let degrees = [
        (1, 13.00, 52.00),
        (2, 13.40, 52.50),
        (3, 13.41, 52.52),
        (4, 13.60, 52.40),
        (5, 14.00, 53.00),
        (6, 12.50, 52.45),
        (7, 13.38, 52.49),
    ];
    let points: Vec<PointRecord> = degrees
        .iter()
        .map(|&(id, lon, lat)| PointRecord::from_degrees(id, lon, lat).unwrap())
        .collect();
    let points = dedup_and_partition(points);

    let config = ForestConfig::new().with_chunk_size(3);
    let forest = Forest::try_new_with_config(&points, &config).unwrap();
    assert_eq!(forest.num_subtrees(), 3);

    let q = PointRecord::from_degrees(0, 13.4075810, 52.5197930).unwrap();
    let metric = PointRecord::metric();
    let result = forest.nearest_with_distance(q.lon, q.lat, 3, &metric);

    let mut by_scan: Vec<(f64, u64)> = points
        .iter()
        .map(|p| (metric_distance(&metric, &q, p), p.id))
        .collect();
    by_scan.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ids: Vec<u64> = result.iter().map(|(p, _)| p.id).collect();
    let expected: Vec<u64> = by_scan[..3].iter().map(|(_, id)| *id).collect();
    assert_eq!(ids, expected);
    assert_eq!(ids, vec![3, 2, 7]);
}

fn metric_distance(metric: &HaversineDistance, a: &PointRecord, b: &PointRecord) -> f64 {
    use crate::rtree::DistanceMetric;
    metric.distance(a.lon, a.lat, b.lon, b.lat)
}

#[test]
fn matches_brute_force_on_random_points() {
    let points = dedup_and_partition(random_points(21, 4_000, u64::MAX));
    let config = ForestConfig::new().with_chunk_size(333).with_node_size(6);
    let forest = Forest::try_new_with_config(&points, &config).unwrap();

    for q in random_points(22, 25, 1) {
        let found: Vec<f64> = forest
            .nearest_with_distance(q.lon, q.lat, 12, &EuclideanDistance)
            .into_iter()
            .map(|(_, d)| d)
            .collect();
        let expected = brute_force_distances(&points, q.lon, q.lat, 12, &EuclideanDistance);
        assert_eq!(found, expected);

        let metric = PointRecord::metric();
        let found: Vec<f64> = forest
            .nearest_with_distance(q.lon, q.lat, 12, &metric)
            .into_iter()
            .map(|(_, d)| d)
            .collect();
        let expected = brute_force_distances(&points, q.lon, q.lat, 12, &metric);
        assert_eq!(found, expected);
    }
}

#[test]
fn empty_forest_answers_queries() {
    let forest = Forest::<PointRecord>::try_new(&[]).unwrap();
    assert_eq!(forest.size(), 0);
    assert!(forest.is_empty());
    assert!(forest.nearest(0, 0, 5).is_empty());
}

#[test]
fn concrete_scenario() {
    let points = vec![
        PointRecord::from_degrees(1, 13.0, 52.0).unwrap(),
        PointRecord::from_degrees(2, 13.1, 52.1).unwrap(),
        PointRecord::from_degrees(3, 13.5, 52.5).unwrap(),
    ];
    let forest = Forest::try_new(&dedup_and_partition(points)).unwrap();
    let q = PointRecord::from_degrees(0, 13.05, 52.05).unwrap();

    let ids: Vec<u64> = forest.nearest(q.lon, q.lat, 2).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn rebuild_after_clear() {
    let first = dedup_and_partition(random_points(31, 1_000, u64::MAX));
    let second = dedup_and_partition(random_points(32, 700, u64::MAX));
    let config = ForestConfig::new().with_chunk_size(128);

    let mut forest = Forest::try_new_with_config(&first, &config).unwrap();
    forest.clear();
    assert_eq!(forest.size(), 0);
    assert!(forest.is_empty());
    assert!(forest.nearest(0, 0, 3).is_empty());

    forest.rebuild(&second, &config).unwrap();
    let fresh = Forest::try_new_with_config(&second, &config).unwrap();
    assert_eq!(forest.size(), fresh.size());
    assert_eq!(forest.size(), second.len());

    let q = &second[0];
    let metric = PointRecord::metric();
    let rebuilt: Vec<f64> = forest
        .nearest_with_distance(q.lon, q.lat, 5, &metric)
        .into_iter()
        .map(|(_, d)| d)
        .collect();
    let expected: Vec<f64> = fresh
        .nearest_with_distance(q.lon, q.lat, 5, &metric)
        .into_iter()
        .map(|(_, d)| d)
        .collect();
    assert_eq!(rebuilt, expected);
    assert_eq!(rebuilt[0], 0.);
}
