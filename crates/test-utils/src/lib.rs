//! Shared test utilities for the blazemap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Point cloud generators (deterministic and seeded-random)
//! - Common gradients and point sets
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert two floats are within `eps` of each other.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        $crate::assert_close!($left, $right, 1e-5)
    };
    ($left:expr, $right:expr, $eps:expr) => {{
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $eps,
            "assertion failed: {} ≈ {} (eps {})",
            l,
            r,
            $eps
        );
    }};
}
