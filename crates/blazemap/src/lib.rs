//! Point-cloud heatmap rendering.
//!
//! Pipeline, leaves first:
//! - Color scale compilation (sparse gradient stops to a 256-entry table)
//! - Cluster estimation (normalization divisor)
//! - Per-pixel kernel (falloff accumulation and quantization)
//! - Point store and render orchestration
//! - PNG encoding of rendered frames

pub mod cluster;
pub mod color_scale;
pub mod context;
pub mod heatmap;
pub mod kernel;
pub mod png;
pub mod store;

pub use blaze_common::{
    BlazeError, BlazeResult, ColorGradient, Extent, HeatmapOptions, HeatmapUpdate,
    OverflowPolicy, Point, PointTermination, Rgba,
};
pub use color_scale::ColorScale;
pub use context::{Frame, PixelDispatch, SequentialDispatch, ThreadPoolDispatch};
pub use heatmap::Blazemap;
pub use store::PointStore;
