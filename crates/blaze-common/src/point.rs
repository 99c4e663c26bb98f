//! Weighted point sources.

use serde::{Deserialize, Serialize};

use crate::error::{BlazeError, BlazeResult};

/// A weighted 2D coordinate contributing heat.
///
/// Scene files may spell a point as `[x, y]`, `[x, y, weight]` or
/// `{ x, y, weight }`; an omitted weight defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub weight: f32,
}

impl Point {
    /// End-of-points marker for sentinel-terminated iteration.
    ///
    /// Valid points never carry a negative weight, so the marker cannot collide
    /// with stored data.
    pub const SENTINEL: Point = Point {
        x: -1.0,
        y: -1.0,
        weight: -1.0,
    };

    pub const fn new(x: f32, y: f32, weight: f32) -> Self {
        Self { x, y, weight }
    }

    /// Point with unit weight.
    pub const fn unit(x: f32, y: f32) -> Self {
        Self { x, y, weight: 1.0 }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.weight < 0.0
    }

    /// Euclidean distance from this point to `(px, py)`.
    #[inline(always)]
    pub fn distance_to(&self, px: f32, py: f32) -> f32 {
        let dx = self.x - px;
        let dy = self.y - py;
        (dx * dx + dy * dy).sqrt()
    }

    /// Check that the point can be stored: finite coordinates, finite non-negative weight.
    pub fn validate(&self) -> BlazeResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(BlazeError::invalid(
                "points",
                format!("coordinates must be finite, got ({}, {})", self.x, self.y),
            ));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(BlazeError::invalid(
                "points",
                format!(
                    "weight must be a finite non-negative number, got {} at ({}, {})",
                    self.weight, self.x, self.y
                ),
            ));
        }
        Ok(())
    }
}

impl From<(f32, f32, f32)> for Point {
    fn from((x, y, weight): (f32, f32, f32)) -> Self {
        Self { x, y, weight }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Weighted(f32, f32, f32),
    Unit(f32, f32),
    Named {
        x: f32,
        y: f32,
        #[serde(default = "default_weight")]
        weight: f32,
    },
}

fn default_weight() -> f32 {
    1.0
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Weighted(x, y, weight) => Point { x, y, weight },
            PointRepr::Unit(x, y) => Point::unit(x, y),
            PointRepr::Named { x, y, weight } => Point { x, y, weight },
        }
    }
}
