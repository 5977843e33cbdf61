//! Partition clustering and silhouette scoring.
//!
//! k-means with random initial centroids (k distinct points sampled from the
//! input) runs until assignments stop changing or the iteration cap is hit.
//! Cost is O(n·k) per iteration for k-means and O(n²) for the silhouette.

use rand::seq::index::sample;
use rand::Rng;
use tracing::debug;

/// Euclidean distance between two equal-length vectors
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Result of a k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index per input point
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
}

impl Clustering {
    /// Number of clusters with at least one member
    pub fn non_empty_clusters(&self) -> usize {
        let mut seen = vec![false; self.centroids.len()];
        for &cluster in &self.assignments {
            seen[cluster] = true;
        }
        seen.into_iter().filter(|s| *s).count()
    }
}

/// k-means configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }

    /// Cluster `points`; k is kept within 1..=n
    pub fn fit<P, R>(&self, points: &[P], rng: &mut R) -> Clustering
    where
        P: AsRef<[f64]>,
        R: Rng + ?Sized,
    {
        let n = points.len();
        if n == 0 {
            return Clustering {
                assignments: Vec::new(),
                centroids: Vec::new(),
                iterations: 0,
            };
        }
        let k = self.k.clamp(1, n);

        let mut centroids: Vec<Vec<f64>> = sample(rng, n, k)
            .into_iter()
            .map(|i| points[i].as_ref().to_vec())
            .collect();
        let mut assignments = assign(points, &centroids);
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            recenter(points, &assignments, &mut centroids);

            let next = assign(points, &centroids);
            if next == assignments {
                break;
            }
            assignments = next;
        }

        debug!("k-means (k={}) settled after {} iterations", k, iterations);

        Clustering {
            assignments,
            centroids,
            iterations,
        }
    }
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, euclidean_distance(point, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn assign<P: AsRef<[f64]>>(points: &[P], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest(p.as_ref(), centroids))
        .collect()
}

/// Move each centroid to the mean of its members; empty clusters stay put
fn recenter<P: AsRef<[f64]>>(points: &[P], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    for (cluster, centroid) in centroids.iter_mut().enumerate() {
        let members: Vec<&[f64]> = points
            .iter()
            .zip(assignments)
            .filter(|(_, a)| **a == cluster)
            .map(|(p, _)| p.as_ref())
            .collect();
        if members.is_empty() {
            continue;
        }

        let count = members.len() as f64;
        for (dim, value) in centroid.iter_mut().enumerate() {
            *value = members.iter().map(|m| m[dim]).sum::<f64>() / count;
        }
    }
}

/// Mean silhouette coefficient over all points.
///
/// A point alone in its cluster scores 0. With fewer than two non-empty
/// clusters the coefficient is undefined and 0 is returned.
pub fn silhouette_score<P: AsRef<[f64]>>(points: &[P], assignments: &[usize]) -> f64 {
    let n = points.len();
    let clusters = assignments.iter().copied().max().map_or(0, |m| m + 1);

    let mut sizes = vec![0usize; clusters];
    for &a in assignments {
        sizes[a] += 1;
    }
    if sizes.iter().filter(|s| **s > 0).count() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = assignments[i];
        if sizes[own] <= 1 {
            continue;
        }

        let mut distance_sums = vec![0.0; clusters];
        for j in 0..n {
            if i != j {
                distance_sums[assignments[j]] +=
                    euclidean_distance(points[i].as_ref(), points[j].as_ref());
            }
        }

        let a = distance_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..clusters)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| distance_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denominator = a.max(b);
        if denominator > 0.0 && denominator.is_finite() {
            total += (b - a) / denominator;
        }
    }

    total / n as f64
}
