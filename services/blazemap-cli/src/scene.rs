//! Scene files.
//!
//! A scene bundles heatmap options, a gradient and the points to draw:
//!
//! ```yaml
//! options:
//!   width: 480
//!   height: 260
//!   radius: 25
//!   blur: 15
//! gradient: hot          # preset name, or a list of {position, color} stops
//! points:
//!   - [100, 100]
//!   - [145, 130, 2.0]
//!   - { x: 110, y: 150, weight: 0.5 }
//! ```
//!
//! Files ending in `.json` are parsed as JSON, everything else as YAML.

use std::path::Path;

use anyhow::{bail, Context, Result};
use blaze_common::{ColorGradient, HeatmapOptions, Point};
use serde::Deserialize;
use tracing::{debug, info};

/// Gradient given by preset name or explicit stops.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GradientSpec {
    Preset(String),
    Stops(ColorGradient),
}

impl GradientSpec {
    pub fn resolve(&self) -> Result<ColorGradient> {
        match self {
            GradientSpec::Preset(name) => match ColorGradient::preset(name) {
                Some(gradient) => Ok(gradient),
                None => bail!(
                    "Unknown gradient preset '{}' (available: {})",
                    name,
                    ColorGradient::preset_names().join(", ")
                ),
            },
            GradientSpec::Stops(gradient) => Ok(gradient.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub options: HeatmapOptions,
    pub gradient: Option<GradientSpec>,
    pub points: Vec<Point>,
}

impl Scene {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse YAML scene")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse JSON scene")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scene = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
        .with_context(|| format!("Invalid scene file {}", path.display()))?;

        info!(
            path = %path.display(),
            points = scene.points.len(),
            "Loaded scene"
        );
        Ok(scene)
    }

    /// Fold the gradient into the options and hand back the points.
    pub fn resolve(self) -> Result<(HeatmapOptions, Vec<Point>)> {
        let mut options = self.options;
        if let Some(spec) = &self.gradient {
            options.colors = spec.resolve()?;
            debug!(stops = options.colors.len(), "Resolved scene gradient");
        }
        Ok((options, self.points))
    }
}
