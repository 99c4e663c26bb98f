//! Heatmap configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BlazeError, BlazeResult};
use crate::gradient::ColorGradient;

/// Largest accepted canvas edge, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted point capacity.
pub const MAX_CAPACITY: usize = 1 << 20;

/// What to do when a mutation would push the point count past capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail with `CapacityExceeded` and leave the stored points untouched.
    #[default]
    Reject,
    /// Keep the first `capacity` points and drop the rest.
    Truncate,
}

/// How the kernel finds the end of the point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointTermination {
    /// Iterate exactly the stored count.
    #[default]
    Count,
    /// Iterate until the sentinel point that follows the stored points.
    Sentinel,
}

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn validate(&self) -> BlazeResult<()> {
        validate_dimension("width", self.width)?;
        validate_dimension("height", self.height)
    }
}

fn validate_dimension(option: &str, value: u32) -> BlazeResult<()> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(BlazeError::invalid(
            option,
            format!("must be in 1..={MAX_DIMENSION}, got {value}"),
        ));
    }
    Ok(())
}

/// Check radius and blur.
pub fn validate_falloff(radius: f32, blur: f32) -> BlazeResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(BlazeError::invalid(
            "radius",
            format!("must be a positive finite number, got {radius}"),
        ));
    }
    if !blur.is_finite() || blur < 0.0 {
        return Err(BlazeError::invalid(
            "blur",
            format!("must be a non-negative finite number, got {blur}"),
        ));
    }
    Ok(())
}

/// Full heatmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub width: u32,
    pub height: u32,
    pub radius: f32,
    pub blur: f32,
    pub colors: ColorGradient,
    /// Posterization band count; 0 keeps the smooth ramp.
    pub color_steps: u32,
    /// Maximum number of stored points.
    pub capacity: usize,
    pub overflow: OverflowPolicy,
    pub termination: PointTermination,
    /// Render worker threads; 0 lets rayon pick.
    pub threads: usize,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 260,
            radius: 25.0,
            blur: 15.0,
            colors: ColorGradient::default(),
            color_steps: 0,
            capacity: 1000,
            overflow: OverflowPolicy::default(),
            termination: PointTermination::default(),
            threads: 0,
        }
    }
}

impl HeatmapOptions {
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Validate every numeric option. The gradient is checked when it is compiled.
    pub fn validate(&self) -> BlazeResult<()> {
        self.extent().validate()?;
        validate_falloff(self.radius, self.blur)?;
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(BlazeError::invalid(
                "capacity",
                format!("must be in 1..={MAX_CAPACITY}, got {}", self.capacity),
            ));
        }
        Ok(())
    }
}

/// Partial option update; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapUpdate {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub radius: Option<f32>,
    pub blur: Option<f32>,
    pub colors: Option<ColorGradient>,
    pub color_steps: Option<u32>,
}

impl HeatmapUpdate {
    pub fn touches_extent(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    pub fn touches_heatmap(&self) -> bool {
        self.radius.is_some()
            || self.blur.is_some()
            || self.colors.is_some()
            || self.color_steps.is_some()
    }
}
