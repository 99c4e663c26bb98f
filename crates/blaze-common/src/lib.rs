//! Shared types for the blazemap workspace.
//!
//! Holds everything both the rendering engine and its front-ends need to agree on:
//! - Weighted points
//! - RGBA color encoding
//! - Color gradients and the built-in presets
//! - Heatmap options and their validation
//! - The error taxonomy

pub mod color;
pub mod error;
pub mod gradient;
pub mod options;
pub mod point;

pub use color::Rgba;
pub use error::{BlazeError, BlazeResult};
pub use gradient::{ColorGradient, GradientStop, StopColor};
pub use options::{Extent, HeatmapOptions, HeatmapUpdate, OverflowPolicy, PointTermination};
pub use point::Point;
