//! Color gradients: sparse `(position, color)` stops defining a color ramp.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{BlazeError, BlazeResult};

/// Largest packed color value a stop may carry.
pub const MAX_STOP_VALUE: i64 = 0xFFFF_FFFF;

/// Color of a gradient stop.
///
/// Accepts a packed `0xRRGGBBAA` integer or a `#RRGGBBAA` / `#RRGGBB` string.
/// Integers are kept wide so out-of-range input survives until validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopColor {
    Packed(i64),
    Hex(String),
}

impl StopColor {
    pub fn resolve(&self) -> BlazeResult<Rgba> {
        match self {
            StopColor::Packed(value) => {
                if (0..=MAX_STOP_VALUE).contains(value) {
                    Ok(Rgba::from_hex(*value as u32))
                } else {
                    Err(BlazeError::InvalidGradient(format!(
                        "stop value {value:#x} outside [0, 0xFFFFFFFF]"
                    )))
                }
            }
            StopColor::Hex(text) => Rgba::parse_hex_str(text).ok_or_else(|| {
                BlazeError::InvalidGradient(format!("unparseable stop color '{text}'"))
            }),
        }
    }
}

impl From<u32> for StopColor {
    fn from(value: u32) -> Self {
        StopColor::Packed(value as i64)
    }
}

/// A single `(position, color)` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: StopColor,
}

/// Unsorted collection of gradient stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
}

impl ColorGradient {
    /// Build from `(position, packed value)` pairs.
    ///
    /// Nothing is validated here; out-of-range stops are reported by [`validate`].
    ///
    /// [`validate`]: ColorGradient::validate
    pub fn new<I>(stops: I) -> Self
    where
        I: IntoIterator<Item = (f64, i64)>,
    {
        Self {
            stops: stops
                .into_iter()
                .map(|(position, value)| GradientStop {
                    position,
                    color: StopColor::Packed(value),
                })
                .collect(),
        }
    }

    pub fn from_stops(stops: Vec<GradientStop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Check every stop and resolve its color.
    ///
    /// Requires at least two stops, every position inside [0, 1] and every color
    /// inside [0, 0xFFFFFFFF]. The returned stops keep input order.
    pub fn validate(&self) -> BlazeResult<Vec<(f64, Rgba)>> {
        if self.stops.len() < 2 {
            return Err(BlazeError::InvalidGradient(format!(
                "at least 2 stops required, got {}",
                self.stops.len()
            )));
        }

        self.stops
            .iter()
            .map(|stop| {
                if !(0.0..=1.0).contains(&stop.position) {
                    return Err(BlazeError::InvalidGradient(format!(
                        "stop position {} outside [0, 1]",
                        stop.position
                    )));
                }
                Ok((stop.position, stop.color.resolve()?))
            })
            .collect()
    }

    /// Look up a built-in gradient by name.
    pub fn preset(name: &str) -> Option<Self> {
        let stops: &[(f64, i64)] = match name.to_lowercase().as_str() {
            "default" => &DEFAULT[..],
            "hot" => &HOT[..],
            "warm" => &WARM[..],
            "cold" => &COLD[..],
            "grey" | "gray" => &GREY[..],
            "white" => &WHITE[..],
            _ => return None,
        };
        Some(Self::new(stops.iter().copied()))
    }

    /// Names accepted by [`ColorGradient::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["default", "hot", "warm", "cold", "grey", "white"]
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::new(DEFAULT.iter().copied())
    }
}

// Built-in ramps. All start fully transparent so empty regions stay see-through.

const DEFAULT: [(f64, i64); 4] = [
    (0.0, 0x0000ff00),
    (0.2, 0x0000ff22),
    (0.65, 0x00ff0066),
    (1.0, 0xff0000ee),
];

const HOT: [(f64, i64); 4] = [
    (0.0, 0x0000cc00),
    (0.4, 0x66009922),
    (0.75, 0xff000066),
    (1.0, 0xff8800cc),
];

const WARM: [(f64, i64); 4] = [
    (0.0, 0x0000cc00),
    (0.2, 0x0000cc22),
    (0.65, 0x88880066),
    (1.0, 0xff0000cc),
];

const COLD: [(f64, i64); 4] = [
    (0.0, 0x0000cc00),
    (0.4, 0x66009922),
    (0.75, 0x0066ff66),
    (1.0, 0xeeeeffcc),
];

const GREY: [(f64, i64); 4] = [
    (0.0, 0x33333300),
    (0.4, 0x66666622),
    (0.75, 0x99999966),
    (1.0, 0xddddddcc),
];

const WHITE: [(f64, i64); 3] = [(0.0, 0xffffff00), (0.6, 0xffffff66), (1.0, 0xffffffcc)];
