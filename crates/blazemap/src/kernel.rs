//! Per-pixel heat kernel.
//!
//! Everything here is a pure function of its arguments. A render pass calls
//! [`evaluate`] once per pixel, in any order and on any thread, with the same
//! [`KernelInputs`]; no invocation can fail.

use blaze_common::{Point, PointTermination};

use crate::color_scale::ColorScale;

/// Read-only inputs shared by every pixel of one frame.
#[derive(Debug, Clone, Copy)]
pub struct KernelInputs<'a> {
    pub points: &'a [Point],
    pub termination: PointTermination,
    pub radius: f32,
    pub blur: f32,
    pub scale: &'a ColorScale,
    pub max_weight: f32,
}

/// Distance-to-weight decay.
///
/// Full weight inside `radius - blur/2`, nothing from `radius + blur/2` outwards,
/// and a linear blend across the band in between. With zero blur the band is
/// empty and the function is a hard step at `radius`.
#[inline(always)]
pub fn falloff(d: f32, radius: f32, blur: f32) -> f32 {
    let half = blur * 0.5;
    let inner = radius - half;
    let outer = radius + half;

    if d < inner {
        return 1.0;
    }
    if d >= outer {
        return 0.0;
    }
    1.0 - ((outer / blur) * (d - inner) / outer).min(1.0)
}

/// Sum of `weight * falloff` over the points reachable under `termination`.
#[inline]
pub fn accumulate(
    px: f32,
    py: f32,
    points: &[Point],
    termination: PointTermination,
    radius: f32,
    blur: f32,
) -> f32 {
    let contribution = |p: &Point| p.weight * falloff(p.distance_to(px, py), radius, blur);

    match termination {
        PointTermination::Count => points.iter().map(contribution).sum(),
        PointTermination::Sentinel => points
            .iter()
            .take_while(|p| !p.is_sentinel())
            .map(contribution)
            .sum(),
    }
}

/// Quantize an accumulated weight to a color scale index.
///
/// NaN (from a zero divisor over zero heat) lands on index 0.
#[inline(always)]
pub fn quantize(weight: f32, max_weight: f32) -> u8 {
    let normalized = weight / max_weight;
    // `as` saturates and maps NaN to 0
    (normalized * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Color scale index for pixel `(px, py)`.
#[inline]
pub fn color_index(px: f32, py: f32, inputs: &KernelInputs<'_>) -> u8 {
    let weight = accumulate(
        px,
        py,
        inputs.points,
        inputs.termination,
        inputs.radius,
        inputs.blur,
    );
    quantize(weight, inputs.max_weight)
}

/// Color of pixel `(px, py)` with channels in [0, 1].
#[inline]
pub fn evaluate(px: f32, py: f32, inputs: &KernelInputs<'_>) -> [f32; 4] {
    inputs.scale.get(color_index(px, py, inputs) as usize).to_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_regions() {
        // radius 25, blur 15: inner edge 17.5, outer edge 32.5
        assert_eq!(falloff(0.0, 25.0, 15.0), 1.0);
        assert_eq!(falloff(17.4, 25.0, 15.0), 1.0);
        assert_eq!(falloff(32.5, 25.0, 15.0), 0.0);
        assert_eq!(falloff(100.0, 25.0, 15.0), 0.0);
    }

    #[test]
    fn test_falloff_band_is_linear() {
        let mid = falloff(25.0, 25.0, 15.0);
        assert!((mid - 0.5).abs() < 1e-6, "mid = {}", mid);
        let quarter = falloff(21.25, 25.0, 15.0);
        assert!((quarter - 0.75).abs() < 1e-6, "quarter = {}", quarter);
        assert_eq!(falloff(17.5, 25.0, 15.0), 1.0);
    }

    #[test]
    fn test_falloff_without_blur() {
        assert_eq!(falloff(9.99, 10.0, 0.0), 1.0);
        assert_eq!(falloff(10.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_quantize_is_total() {
        assert_eq!(quantize(0.0, 1.0), 0);
        assert_eq!(quantize(1.0, 1.0), 255);
        assert_eq!(quantize(10.0, 1.0), 255);
        assert_eq!(quantize(-3.0, 1.0), 0);
        assert_eq!(quantize(0.0, 0.0), 0);
        assert_eq!(quantize(f32::NAN, 1.0), 0);
        assert_eq!(quantize(0.5, 1.0), 128);
    }

    #[test]
    fn test_sentinel_stops_iteration() {
        let points = [
            Point::unit(0.0, 0.0),
            Point::SENTINEL,
            Point::new(0.0, 0.0, 5.0),
        ];
        assert_eq!(
            accumulate(0.0, 0.0, &points, PointTermination::Sentinel, 10.0, 0.0),
            1.0
        );
    }
}
