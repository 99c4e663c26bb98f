//! Color scale compilation.
//!
//! A [`ColorGradient`] holds a handful of sparse stops. Rendering needs a dense
//! lookup table instead: 256 RGBA entries indexed by quantized heat. Compilation
//! normalizes stop positions, interpolates every channel linearly between
//! neighbouring stops and optionally posterizes the result into bands.

use blaze_common::{BlazeResult, ColorGradient, Rgba};
use tracing::debug;

/// Number of entries in a compiled scale.
pub const SCALE_SIZE: usize = 256;

/// Dense 256-entry RGBA lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScale {
    entries: [Rgba; SCALE_SIZE],
}

impl ColorScale {
    /// Compile a gradient into a lookup table.
    ///
    /// # Arguments
    /// - `gradient`: at least two stops, positions in [0, 1], colors in [0, 0xFFFFFFFF]
    /// - `steps`: posterization band count, 0 for a smooth ramp
    ///
    /// # Errors
    /// `InvalidGradient` when the gradient fails validation.
    pub fn compile(gradient: &ColorGradient, steps: u32) -> BlazeResult<Self> {
        let mut stops = gradient.validate()?;

        // Stretch the observed key range onto [0, 1]
        let (min, max) = stops
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (pos, _)| {
                (lo.min(*pos), hi.max(*pos))
            });
        let span = if max > min { max - min } else { 1.0 };
        for (pos, _) in stops.iter_mut() {
            *pos = (*pos - min) / span;
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let first = stops[0].1;
        let last = stops[stops.len() - 1].1;

        // Only a degenerate gradient (every stop at one key) leaves slots unwritten
        let mut entries = [last; SCALE_SIZE];

        for range in stops.windows(2) {
            let (from_pos, from) = range[0];
            let (to_pos, to) = range[1];
            let start = (256.0 * from_pos).round() as usize;
            let end = (256.0 * to_pos).round() as usize;

            // Coincident stops produce an empty range
            let samples = tween(from, to, end.saturating_sub(start));
            for (slot, color) in entries.iter_mut().skip(start).zip(samples) {
                *slot = color;
            }
        }

        entries[0] = first;
        entries[SCALE_SIZE - 1] = last;

        if steps > 0 {
            posterize(&mut entries, steps);
        }

        debug!(stops = stops.len(), steps, "Compiled color scale");

        Ok(Self { entries })
    }

    /// Entry at `index`; indices past the end read the last entry.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Rgba {
        self.entries[index.min(SCALE_SIZE - 1)]
    }

    pub fn entries(&self) -> &[Rgba; SCALE_SIZE] {
        &self.entries
    }

    /// Packed `0xRRGGBBAA` values, in index order.
    pub fn to_hex_values(&self) -> Vec<u32> {
        self.entries.iter().map(|c| c.to_hex()).collect()
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        // The built-in gradient is known to validate.
        match Self::compile(&ColorGradient::default(), 0) {
            Ok(scale) => scale,
            Err(_) => Self {
                entries: [Rgba::TRANSPARENT; SCALE_SIZE],
            },
        }
    }
}

/// Linearly interpolate `steps` colors from `from` to `to`, both ends included.
///
/// Each channel is interpolated on its own and rounded half away from zero.
/// A single step yields `from`; zero steps yield nothing.
pub fn tween(from: Rgba, to: Rgba, steps: usize) -> Vec<Rgba> {
    let last = steps.saturating_sub(1).max(1) as f64;
    let from = from.to_array();
    let to = to.to_array();

    (0..steps)
        .map(|i| {
            let delta = i as f64 / last;
            let mut out = [0u8; 4];
            for c in 0..4 {
                let a = from[c] as f64;
                let b = to[c] as f64;
                out[c] = (a + (b - a) * delta).round() as u8;
            }
            Rgba::from_array(out)
        })
        .collect()
}

/// Collapse the ramp into roughly `steps` flat bands.
///
/// Walks from index 254 down to 1. Every `stride`-th index (counted from 255)
/// starts a new band with its own color; the indices in between take the color of
/// the band above them. Entries 0 and 255 are left alone.
fn posterize(entries: &mut [Rgba; SCALE_SIZE], steps: u32) {
    let stride = ((255.0 / steps as f64).round() as usize).max(1);
    let mut band = entries[SCALE_SIZE - 1];

    for i in (1..SCALE_SIZE - 1).rev() {
        if (SCALE_SIZE - 1 - i) % stride == 0 {
            band = entries[i];
        } else {
            entries[i] = band;
        }
    }
}
