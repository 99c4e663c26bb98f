//! Point cloud generators.
//!
//! Random generators take an explicit seed so every test run sees the same data.

use blaze_common::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Points on a regular lattice, `spacing` pixels apart, starting at `(spacing/2, spacing/2)`.
///
/// # Example
///
/// ```
/// use test_utils::lattice_points;
///
/// let points = lattice_points(100, 50, 25.0);
/// assert_eq!(points.len(), 8); // 4 columns x 2 rows
/// assert_eq!(points[0].x, 12.5);
/// ```
pub fn lattice_points(width: u32, height: u32, spacing: f32) -> Vec<Point> {
    let cols = (width as f32 / spacing).floor() as usize;
    let rows = (height as f32 / spacing).floor() as usize;
    let mut points = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            points.push(Point::unit(
                (col as f32 + 0.5) * spacing,
                (row as f32 + 0.5) * spacing,
            ));
        }
    }
    points
}

/// `count` points uniformly scattered over the canvas with weights in [0.1, 1).
pub fn random_points(count: usize, width: u32, height: u32, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(0.0..width as f32),
                rng.gen_range(0.0..height as f32),
                rng.gen_range(0.1..1.0),
            )
        })
        .collect()
}

/// `clusters` groups of `per_cluster` unit points, each group within `spread` of its center.
pub fn clustered_points(
    clusters: usize,
    per_cluster: usize,
    spread: f32,
    width: u32,
    height: u32,
    seed: u64,
) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(clusters * per_cluster);
    for _ in 0..clusters {
        let cx = rng.gen_range(0.0..width as f32);
        let cy = rng.gen_range(0.0..height as f32);
        for _ in 0..per_cluster {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = rng.gen_range(0.0..=spread);
            points.push(Point::unit(cx + dist * angle.cos(), cy + dist * angle.sin()));
        }
    }
    points
}
