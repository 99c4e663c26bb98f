//! Heatmap orchestration.
//!
//! [`Blazemap`] ties the pieces together: it owns the render context, the
//! compiled color scale and the point store, rebuilds whichever of them a
//! configuration change invalidates, and runs the kernel once per pixel on
//! `render()`.
//!
//! Every rebuild is staged first and swapped in only on success, so a rejected
//! change leaves the heatmap exactly as it was.

use std::time::Instant;

use blaze_common::options::validate_falloff;
use blaze_common::{
    BlazeError, BlazeResult, ColorGradient, Extent, HeatmapOptions, HeatmapUpdate, Point,
};
use tracing::{debug, info};

use crate::cluster::ClusterParams;
use crate::color_scale::ColorScale;
use crate::context::{Frame, PixelDispatch, RenderContext, ThreadPoolDispatch};
use crate::kernel::{self, KernelInputs};
use crate::store::PointStore;

#[derive(Debug)]
pub struct Blazemap {
    options: HeatmapOptions,
    scale: ColorScale,
    store: PointStore,
    /// `None` once destroyed.
    context: Option<RenderContext>,
}

impl Blazemap {
    /// Build a heatmap rendering on its own thread pool.
    ///
    /// # Errors
    /// - `InvalidConfiguration` / `InvalidGradient` for bad options
    /// - `ExecutionEnvironmentUnavailable` if the pool or frame cannot be acquired
    pub fn new(options: HeatmapOptions) -> BlazeResult<Self> {
        options.validate()?;
        let dispatch = ThreadPoolDispatch::new(options.threads)?;
        Self::with_dispatch(options, Box::new(dispatch))
    }

    /// Build a heatmap rendering through a caller-supplied dispatcher.
    pub fn with_dispatch(
        options: HeatmapOptions,
        dispatch: Box<dyn PixelDispatch>,
    ) -> BlazeResult<Self> {
        options.validate()?;
        let scale = ColorScale::compile(&options.colors, options.color_steps)?;
        let context = RenderContext::acquire(options.extent(), dispatch)?;
        let store = PointStore::new(
            options.capacity,
            options.overflow,
            options.termination,
            cluster_params(&options),
        );

        info!(
            width = options.width,
            height = options.height,
            radius = options.radius,
            blur = options.blur,
            capacity = options.capacity,
            dispatch = context.dispatch_name(),
            "Created heatmap"
        );

        Ok(Self {
            options,
            scale,
            store,
            context: Some(context),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Change radius and blur, and optionally the gradient and posterization.
    ///
    /// The color scale is recompiled only when `colors` or `color_steps` is given.
    pub fn set_heatmap(
        &mut self,
        radius: f32,
        blur: f32,
        colors: Option<ColorGradient>,
        color_steps: Option<u32>,
    ) -> BlazeResult<()> {
        self.ensure_alive()?;
        validate_falloff(radius, blur)?;

        let steps = color_steps.unwrap_or(self.options.color_steps);
        let scale = self.stage_scale(colors.as_ref(), color_steps)?;

        if let Some(scale) = scale {
            self.scale = scale;
        }
        if let Some(colors) = colors {
            self.options.colors = colors;
        }
        self.options.color_steps = steps;
        self.options.radius = radius;
        self.options.blur = blur;
        self.store.reconfigure(cluster_params(&self.options));

        debug!(radius, blur, steps, "Updated heatmap settings");
        Ok(())
    }

    /// Resize the output surface.
    pub fn resize(&mut self, width: u32, height: u32) -> BlazeResult<()> {
        self.ensure_alive()?;
        let extent = Extent::new(width, height);
        extent.validate()?;
        self.context_mut()?.resize(extent)?;

        self.options.width = width;
        self.options.height = height;
        self.store.reconfigure(cluster_params(&self.options));

        debug!(width, height, "Resized heatmap");
        Ok(())
    }

    /// Resize to match another surface or extent.
    pub fn resize_to(&mut self, target: impl Into<Extent>) -> BlazeResult<()> {
        let extent = target.into();
        self.resize(extent.width, extent.height)
    }

    /// Apply a partial update.
    ///
    /// Everything is validated and staged before anything is committed.
    pub fn set_options(&mut self, update: HeatmapUpdate) -> BlazeResult<()> {
        self.ensure_alive()?;

        let extent = Extent::new(
            update.width.unwrap_or(self.options.width),
            update.height.unwrap_or(self.options.height),
        );
        extent.validate()?;
        let radius = update.radius.unwrap_or(self.options.radius);
        let blur = update.blur.unwrap_or(self.options.blur);
        validate_falloff(radius, blur)?;

        let scale = self.stage_scale(update.colors.as_ref(), update.color_steps)?;
        let frame = if update.touches_extent() && extent != self.options.extent() {
            Some(Frame::new(extent)?)
        } else {
            None
        };

        if let Some(frame) = frame {
            self.context_mut()?.replace_frame(frame);
        }
        if let Some(scale) = scale {
            self.scale = scale;
        }
        if let Some(colors) = update.colors {
            self.options.colors = colors;
        }
        if let Some(steps) = update.color_steps {
            self.options.color_steps = steps;
        }
        self.options.width = extent.width;
        self.options.height = extent.height;
        self.options.radius = radius;
        self.options.blur = blur;
        self.store.reconfigure(cluster_params(&self.options));

        debug!("Applied option update");
        Ok(())
    }

    // ========================================================================
    // Points
    // ========================================================================

    /// Replace all points with a copy of `points`. Returns the stored count.
    pub fn set_points(&mut self, points: &[Point]) -> BlazeResult<usize> {
        self.ensure_alive()?;
        self.store.set_points(points)
    }

    pub fn add_point(&mut self, point: Point) -> BlazeResult<usize> {
        self.add_points(&[point])
    }

    pub fn add_points(&mut self, points: &[Point]) -> BlazeResult<usize> {
        self.ensure_alive()?;
        self.store.add_points(points)
    }

    /// Transform a snapshot of the points and commit the result atomically.
    pub fn modify_points<F>(&mut self, transform: F) -> BlazeResult<usize>
    where
        F: FnOnce(Vec<Point>) -> Vec<Point>,
    {
        self.ensure_alive()?;
        self.store.modify_points(transform)
    }

    pub fn clear_points(&mut self) -> BlazeResult<()> {
        self.ensure_alive()?;
        self.store.clear_points();
        Ok(())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Evaluate every pixel and return the finished frame.
    pub fn render(&mut self) -> BlazeResult<&Frame> {
        let context = self.context.as_mut().ok_or(BlazeError::Disposed)?;
        let inputs = KernelInputs {
            points: self.store.snapshot(),
            termination: self.store.termination(),
            radius: self.options.radius,
            blur: self.options.blur,
            scale: &self.scale,
            max_weight: self.store.max_weight(),
        };

        let started = Instant::now();
        let frame = context.render(&|x: u32, y: u32| {
            kernel::evaluate(x as f32, y as f32, &inputs)
        });
        debug!(
            points = self.store.len(),
            max_weight = inputs.max_weight,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Rendered frame"
        );
        Ok(frame)
    }

    /// Evaluate every pixel to a color scale index instead of a color.
    ///
    /// Pairs with [`ColorScale::entries`] as a palette for indexed output.
    pub fn render_indexed(&self) -> BlazeResult<Vec<u8>> {
        let context = self.context()?;
        let inputs = KernelInputs {
            points: self.store.snapshot(),
            termination: self.store.termination(),
            radius: self.options.radius,
            blur: self.options.blur,
            scale: &self.scale,
            max_weight: self.store.max_weight(),
        };
        Ok(context.render_indexed(&|x: u32, y: u32| {
            kernel::color_index(x as f32, y as f32, &inputs)
        }))
    }

    /// Release the frame and the render pool. Every later call fails with `Disposed`.
    pub fn destroy(&mut self) -> BlazeResult<()> {
        let context = self.context.take().ok_or(BlazeError::Disposed)?;
        drop(context);
        self.store.clear_points();
        info!("Destroyed heatmap");
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    // Accessors fail with `Disposed` once the heatmap is destroyed, like every
    // other operation.

    pub fn options(&self) -> BlazeResult<&HeatmapOptions> {
        self.ensure_alive()?;
        Ok(&self.options)
    }

    pub fn color_scale(&self) -> BlazeResult<&ColorScale> {
        self.ensure_alive()?;
        Ok(&self.scale)
    }

    pub fn max_weight(&self) -> BlazeResult<f32> {
        self.ensure_alive()?;
        Ok(self.store.max_weight())
    }

    pub fn point_count(&self) -> BlazeResult<usize> {
        self.ensure_alive()?;
        Ok(self.store.len())
    }

    pub fn points(&self) -> BlazeResult<&[Point]> {
        self.ensure_alive()?;
        Ok(self.store.points())
    }

    /// Most recently rendered frame.
    pub fn frame(&self) -> BlazeResult<&Frame> {
        Ok(self.context()?.frame())
    }

    pub fn is_destroyed(&self) -> bool {
        self.context.is_none()
    }

    fn ensure_alive(&self) -> BlazeResult<()> {
        self.context().map(|_| ())
    }

    fn context(&self) -> BlazeResult<&RenderContext> {
        self.context.as_ref().ok_or(BlazeError::Disposed)
    }

    fn context_mut(&mut self) -> BlazeResult<&mut RenderContext> {
        self.context.as_mut().ok_or(BlazeError::Disposed)
    }

    /// Compile a replacement scale if the gradient or step count changes.
    fn stage_scale(
        &self,
        colors: Option<&ColorGradient>,
        color_steps: Option<u32>,
    ) -> BlazeResult<Option<ColorScale>> {
        if colors.is_none() && color_steps.is_none() {
            return Ok(None);
        }
        let colors = colors.unwrap_or(&self.options.colors);
        let steps = color_steps.unwrap_or(self.options.color_steps);
        ColorScale::compile(colors, steps).map(Some)
    }
}

fn cluster_params(options: &HeatmapOptions) -> ClusterParams {
    ClusterParams::new(options.radius, options.blur, options.extent())
}
