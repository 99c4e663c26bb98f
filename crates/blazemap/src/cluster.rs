//! Cluster weight estimation.
//!
//! Kernel output is normalized by the weight of the hottest cluster of points.
//! Finding the true maximum would mean evaluating every pixel; instead points are
//! binned into coarse cells about one falloff radius wide and the heaviest bin wins.
//!
//! The bin index multiplies the column and row numbers rather than hashing them,
//! so distinct cells can share a bin: cells (0, 3) and (3, 0) both land in bin 3.
//! The estimate can therefore overshoot the true local maximum, but never falls
//! below the sum of any single cell.

use std::collections::HashMap;

use blaze_common::{Extent, Point};

/// Inputs the estimate depends on besides the points themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub radius: f32,
    pub blur: f32,
    pub extent: Extent,
}

impl ClusterParams {
    pub fn new(radius: f32, blur: f32, extent: Extent) -> Self {
        Self { radius, blur, extent }
    }

    /// Edge length of one binning cell, never below one pixel.
    pub fn cell_diameter(&self) -> f32 {
        let diameter = 1.5 * (self.radius - 0.5 * self.blur);
        if diameter.is_finite() {
            diameter.max(1.0)
        } else {
            1.0
        }
    }
}

/// Approximate the maximum cluster weight.
///
/// Returns 1 for an empty point set, or when every bin sums to zero, so the
/// result is always a usable divisor.
pub fn estimate(points: &[Point], params: &ClusterParams) -> f32 {
    if points.is_empty() {
        return 1.0;
    }

    let cell = params.cell_diameter();
    let cols = (params.extent.width as f32 / cell).ceil().max(1.0) as usize;
    let rows = (params.extent.height as f32 / cell).ceil().max(1.0) as usize;

    // Only occupied bins are stored, so the cost follows the point count
    let mut bins: HashMap<usize, f32> = HashMap::with_capacity(points.len());

    for point in points.iter().filter(|p| !p.is_sentinel()) {
        let cx = (point.x / cell).floor().clamp(0.0, (cols - 1) as f32) as usize;
        let cy = (point.y / cell).floor().clamp(0.0, (rows - 1) as f32) as usize;
        let index = (cx + 1) * (cy + 1) - 1;
        *bins.entry(index).or_insert(0.0) += point.weight;
    }

    let max = bins.values().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        max.min(f32::MAX)
    } else {
        1.0
    }
}
