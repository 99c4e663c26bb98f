//! Live point set.
//!
//! The store is the only writer of point data. Every mutation validates its input
//! before touching anything, enforces the fixed capacity, and re-runs the cluster
//! estimate before returning, so [`PointStore::max_weight`] always matches the
//! stored points.

use blaze_common::{BlazeError, BlazeResult, OverflowPolicy, Point, PointTermination};
use tracing::{debug, warn};

use crate::cluster::{self, ClusterParams};

#[derive(Debug, Clone)]
pub struct PointStore {
    /// Stored points, followed by `Point::SENTINEL` in sentinel mode.
    buffer: Vec<Point>,
    len: usize,
    capacity: usize,
    overflow: OverflowPolicy,
    termination: PointTermination,
    params: ClusterParams,
    max_weight: f32,
}

impl PointStore {
    pub fn new(
        capacity: usize,
        overflow: OverflowPolicy,
        termination: PointTermination,
        params: ClusterParams,
    ) -> Self {
        let mut store = Self {
            buffer: Vec::with_capacity(capacity.saturating_add(1)),
            len: 0,
            capacity,
            overflow,
            termination,
            params,
            max_weight: 1.0,
        };
        store.commit(std::iter::empty());
        store
    }

    /// Replace every stored point with a copy of `points`.
    ///
    /// Returns the number of points stored.
    pub fn set_points(&mut self, points: &[Point]) -> BlazeResult<usize> {
        validate_all(points)?;
        let keep = self.admit(points.len(), 0)?;
        self.commit(points[..keep].iter().copied());
        Ok(self.len)
    }

    /// Append `points` after the stored ones.
    pub fn add_points(&mut self, points: &[Point]) -> BlazeResult<usize> {
        validate_all(points)?;
        let keep = self.admit(points.len(), self.len)?;
        let stored = self.points().to_vec();
        self.commit(stored.into_iter().chain(points[..keep].iter().copied()));
        Ok(self.len)
    }

    /// Apply `transform` to a snapshot of the stored points and commit the result.
    ///
    /// The store is untouched if the result is rejected.
    pub fn modify_points<F>(&mut self, transform: F) -> BlazeResult<usize>
    where
        F: FnOnce(Vec<Point>) -> Vec<Point>,
    {
        let next = transform(self.points().to_vec());
        self.set_points(&next)
    }

    pub fn clear_points(&mut self) {
        self.commit(std::iter::empty());
    }

    /// Update radius, blur or canvas size and recompute the estimate.
    pub fn reconfigure(&mut self, params: ClusterParams) {
        self.params = params;
        self.max_weight = cluster::estimate(self.points(), &self.params);
        debug!(max_weight = self.max_weight, "Re-estimated cluster weight");
    }

    /// Stored points, without any terminator.
    pub fn points(&self) -> &[Point] {
        &self.buffer[..self.len]
    }

    /// Iteration buffer for the kernel, laid out for the termination policy.
    pub fn snapshot(&self) -> &[Point] {
        &self.buffer
    }

    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn termination(&self) -> PointTermination {
        self.termination
    }

    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// How many of `incoming` points fit after `existing` ones.
    fn admit(&self, incoming: usize, existing: usize) -> BlazeResult<usize> {
        let available = self.capacity.saturating_sub(existing);
        if incoming <= available {
            return Ok(incoming);
        }

        match self.overflow {
            OverflowPolicy::Reject => Err(BlazeError::CapacityExceeded {
                requested: existing + incoming,
                capacity: self.capacity,
            }),
            OverflowPolicy::Truncate => {
                warn!(
                    requested = existing + incoming,
                    capacity = self.capacity,
                    dropped = incoming - available,
                    "Point capacity exceeded, truncating"
                );
                Ok(available)
            }
        }
    }

    fn commit<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        self.buffer.clear();
        self.buffer.extend(points);
        self.len = self.buffer.len();
        if self.termination == PointTermination::Sentinel {
            self.buffer.push(Point::SENTINEL);
        }
        self.max_weight = cluster::estimate(self.points(), &self.params);
        debug!(points = self.len, max_weight = self.max_weight, "Committed points");
    }
}

fn validate_all(points: &[Point]) -> BlazeResult<()> {
    points.iter().try_for_each(|p| p.validate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blaze_common::Extent;

    fn store(capacity: usize, overflow: OverflowPolicy) -> PointStore {
        PointStore::new(
            capacity,
            overflow,
            PointTermination::Count,
            ClusterParams::new(25.0, 15.0, Extent::new(200, 200)),
        )
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = store(4, OverflowPolicy::Reject);
        assert!(store.is_empty());
        assert_eq!(store.max_weight(), 1.0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_sentinel_layout() {
        let mut store = PointStore::new(
            4,
            OverflowPolicy::Reject,
            PointTermination::Sentinel,
            ClusterParams::new(25.0, 15.0, Extent::new(200, 200)),
        );
        store.set_points(&[Point::unit(1.0, 1.0), Point::unit(2.0, 2.0)]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot().len(), 3);
        assert!(store.snapshot()[2].is_sentinel());
        assert_eq!(store.points().len(), 2);
    }

    #[test]
    fn test_invalid_point_leaves_store_untouched() {
        let mut store = store(4, OverflowPolicy::Reject);
        store.set_points(&[Point::unit(1.0, 1.0)]).unwrap();
        let err = store
            .add_points(&[Point::unit(2.0, 2.0), Point::new(3.0, 3.0, -1.0)])
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(store.points(), &[Point::unit(1.0, 1.0)]);
    }
}
