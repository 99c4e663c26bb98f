//! Blazemap command-line renderer.
//!
//! Loads a scene (options, gradient, points), renders it and writes a PNG.
//! Command-line flags override values from the scene file.

mod scene;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use blaze_common::{OverflowPolicy, Point};
use blazemap::png::{create_png, create_png_indexed};
use blazemap::Blazemap;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scene::{GradientSpec, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Palette PNG using the compiled color scale (smallest files)
    Indexed,
    /// Full RGBA PNG
    Rgba,
}

#[derive(Parser, Debug)]
#[command(name = "blazemap")]
#[command(about = "Render a point-cloud heatmap to PNG")]
struct Args {
    /// Scene file (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "BLAZEMAP_SCENE")]
    scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "heatmap.png")]
    output: PathBuf,

    /// Output encoding
    #[arg(long, value_enum, default_value = "indexed")]
    format: OutputFormat,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Full-weight radius around each point
    #[arg(long)]
    radius: Option<f32>,

    /// Width of the fade band centred on the radius
    #[arg(long)]
    blur: Option<f32>,

    /// Gradient preset (default, hot, warm, cold, grey, white)
    #[arg(short, long)]
    gradient: Option<String>,

    /// Posterize the gradient into this many bands (0 = smooth)
    #[arg(long)]
    steps: Option<u32>,

    /// Extra point as x,y or x,y,weight (repeatable)
    #[arg(short, long = "point", value_parser = parse_point)]
    points: Vec<Point>,

    /// Maximum number of points
    #[arg(long)]
    capacity: Option<usize>,

    /// Drop points past capacity instead of failing
    #[arg(long)]
    truncate: bool,

    /// Render threads (0 = one per core)
    #[arg(long, env = "BLAZEMAP_THREADS")]
    threads: Option<usize>,

    /// Log level
    #[arg(long, env = "BLAZEMAP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Layer command-line overrides onto the scene.
    fn apply(&self, scene: &mut Scene) {
        let options = &mut scene.options;
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(radius) = self.radius {
            options.radius = radius;
        }
        if let Some(blur) = self.blur {
            options.blur = blur;
        }
        if let Some(steps) = self.steps {
            options.color_steps = steps;
        }
        if let Some(threads) = self.threads {
            options.threads = threads;
        }
        if let Some(capacity) = self.capacity {
            options.capacity = capacity;
        }
        if self.truncate {
            options.overflow = OverflowPolicy::Truncate;
        }
        if let Some(name) = &self.gradient {
            scene.gradient = Some(GradientSpec::Preset(name.clone()));
        }
        scene.points.extend(self.points.iter().copied());
    }
}

fn parse_point(text: &str) -> Result<Point, String> {
    let parts: Vec<f32> = text
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in point '{}': {}", text, e))?;
    match parts.as_slice() {
        [x, y] => Ok(Point::unit(*x, *y)),
        [x, y, weight] => Ok(Point::new(*x, *y, *weight)),
        _ => Err(format!("expected x,y or x,y,weight, got '{}'", text)),
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json)?;

    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };
    args.apply(&mut scene);
    let (options, points) = scene.resolve()?;

    let mut map = Blazemap::new(options).context("Failed to create heatmap")?;
    let stored = map.set_points(&points).context("Failed to load points")?;

    let started = Instant::now();
    let extent = map.options()?.extent();
    let (width, height) = (extent.width as usize, extent.height as usize);
    let png = match args.format {
        OutputFormat::Indexed => {
            let indices = map.render_indexed()?;
            create_png_indexed(&indices, width, height, map.color_scale()?.entries())?
        }
        OutputFormat::Rgba => {
            let frame = map.render()?;
            create_png(&frame.to_rgba8(), width, height)?
        }
    };

    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    let max_weight = map.max_weight()?;

    info!(
        output = %args.output.display(),
        width,
        height,
        points = stored,
        max_weight,
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Wrote heatmap"
    );

    map.destroy()?;
    Ok(())
}
