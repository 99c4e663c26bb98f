//! Rendering resources: the raster surface and the pixel dispatcher.
//!
//! A [`RenderContext`] is owned by exactly one heatmap. It is acquired when the
//! heatmap is built, swapped piecewise on resize and released on destroy.

use blaze_common::{BlazeError, BlazeResult, Extent};
use rayon::prelude::*;
use tracing::debug;

/// Fixed-size RGBA surface, channels in [0, 1], row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    extent: Extent,
    pixels: Vec<[f32; 4]>,
}

impl Frame {
    /// Allocate a transparent frame.
    ///
    /// # Errors
    /// `ExecutionEnvironmentUnavailable` if the pixel storage cannot be allocated.
    pub fn new(extent: Extent) -> BlazeResult<Self> {
        let size = extent.pixel_count();
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(size).map_err(|e| {
            BlazeError::ExecutionEnvironmentUnavailable(format!(
                "cannot allocate {}x{} frame: {}",
                extent.width, extent.height, e
            ))
        })?;
        pixels.resize(size, [0.0; 4]);
        Ok(Self { extent, pixels })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn width(&self) -> u32 {
        self.extent.width
    }

    pub fn height(&self) -> u32 {
        self.extent.height
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [[f32; 4]] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.extent.width as usize + x as usize)
            .copied()
    }

    /// Write one pixel, clamping channels to [0, 1]. Out-of-bounds writes are ignored.
    pub fn write(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        if x >= self.extent.width || y >= self.extent.height {
            return;
        }
        let idx = y as usize * self.extent.width as usize + x as usize;
        self.pixels[idx] = rgba.map(|c| c.clamp(0.0, 1.0));
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Convert to 8-bit RGBA bytes (4 bytes per pixel).
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }
}

impl From<&Frame> for Extent {
    fn from(frame: &Frame) -> Self {
        frame.extent
    }
}

/// Per-pixel shader producing a color.
pub type ColorShader<'a> = dyn Fn(u32, u32) -> [f32; 4] + Sync + 'a;

/// Per-pixel shader producing a color scale index.
pub type IndexShader<'a> = dyn Fn(u32, u32) -> u8 + Sync + 'a;

/// Invokes a shader once per pixel and stores the results.
///
/// Invocation order is unspecified; shaders must not depend on it.
pub trait PixelDispatch: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fill `frame` with `shader(x, y)` for every pixel.
    fn dispatch(&self, frame: &mut Frame, shader: &ColorShader<'_>);

    /// Fill `out` (row-major, `width` per row) with `shader(x, y)`.
    fn dispatch_indexed(&self, width: u32, out: &mut [u8], shader: &IndexShader<'_>);
}

/// Row-parallel dispatch on a thread pool owned by the dispatcher.
pub struct ThreadPoolDispatch {
    pool: rayon::ThreadPool,
}

impl ThreadPoolDispatch {
    /// Build a dedicated pool; `threads == 0` lets rayon choose.
    ///
    /// # Errors
    /// `ExecutionEnvironmentUnavailable` when the pool cannot be started.
    pub fn new(threads: usize) -> BlazeResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("blazemap-render-{i}"))
            .build()
            .map_err(|e| BlazeError::ExecutionEnvironmentUnavailable(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "Started render pool");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl PixelDispatch for ThreadPoolDispatch {
    fn name(&self) -> &'static str {
        "thread-pool"
    }

    fn dispatch(&self, frame: &mut Frame, shader: &ColorShader<'_>) {
        let width = frame.width();
        self.pool
            .install(|| fill_rows_parallel(width, frame.pixels_mut(), shader));
    }

    fn dispatch_indexed(&self, width: u32, out: &mut [u8], shader: &IndexShader<'_>) {
        self.pool.install(|| fill_rows_parallel(width, out, shader));
    }
}

/// Single-threaded dispatch in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialDispatch;

impl PixelDispatch for SequentialDispatch {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn dispatch(&self, frame: &mut Frame, shader: &ColorShader<'_>) {
        let width = frame.width();
        fill_rows(width, frame.pixels_mut(), shader);
    }

    fn dispatch_indexed(&self, width: u32, out: &mut [u8], shader: &IndexShader<'_>) {
        fill_rows(width, out, shader);
    }
}

fn fill_rows<T, F>(width: u32, out: &mut [T], shader: &F)
where
    F: Fn(u32, u32) -> T + ?Sized,
{
    if width == 0 {
        return;
    }
    for (y, row) in out.chunks_mut(width as usize).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            *px = shader(x as u32, y as u32);
        }
    }
}

fn fill_rows_parallel<T, F>(width: u32, out: &mut [T], shader: &F)
where
    T: Send,
    F: Fn(u32, u32) -> T + Sync + ?Sized,
{
    if width == 0 {
        return;
    }
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = shader(x as u32, y as u32);
            }
        });
}

/// Rendering resources exclusively owned by one heatmap.
pub struct RenderContext {
    frame: Frame,
    dispatch: Box<dyn PixelDispatch>,
}

impl RenderContext {
    pub fn acquire(extent: Extent, dispatch: Box<dyn PixelDispatch>) -> BlazeResult<Self> {
        let frame = Frame::new(extent)?;
        debug!(
            width = extent.width,
            height = extent.height,
            dispatch = dispatch.name(),
            "Acquired render context"
        );
        Ok(Self { frame, dispatch })
    }

    /// Replace the frame with one of the new size.
    ///
    /// The current frame is kept if allocation fails.
    pub fn resize(&mut self, extent: Extent) -> BlazeResult<()> {
        let frame = Frame::new(extent)?;
        self.replace_frame(frame);
        Ok(())
    }

    /// Swap in an already allocated frame.
    pub fn replace_frame(&mut self, frame: Frame) {
        debug!(
            width = frame.width(),
            height = frame.height(),
            "Replaced render frame"
        );
        self.frame = frame;
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn dispatch_name(&self) -> &'static str {
        self.dispatch.name()
    }

    pub fn render(&mut self, shader: &ColorShader<'_>) -> &Frame {
        self.dispatch.dispatch(&mut self.frame, shader);
        &self.frame
    }

    pub fn render_indexed(&self, shader: &IndexShader<'_>) -> Vec<u8> {
        let mut out = vec![0u8; self.frame.extent().pixel_count()];
        self.dispatch
            .dispatch_indexed(self.frame.width(), &mut out, shader);
        out
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("extent", &self.frame.extent())
            .field("dispatch", &self.dispatch.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_write_and_read() {
        let mut frame = Frame::new(Extent::new(4, 3)).unwrap();
        frame.write(1, 2, [0.5, 2.0, -1.0, 1.0]);
        assert_eq!(frame.pixel(1, 2), Some([0.5, 1.0, 0.0, 1.0]));
        assert_eq!(frame.pixel(4, 0), None);
        frame.write(10, 10, [1.0; 4]);
        assert_eq!(frame.to_rgba8()[(2 * 4 + 1) * 4..(2 * 4 + 1) * 4 + 4], [128, 255, 0, 255]);
    }

    #[test]
    fn test_dispatchers_agree() {
        let shader = |x: u32, y: u32| [x as f32 / 10.0, y as f32 / 10.0, 0.0, 1.0];
        let mut a = Frame::new(Extent::new(7, 5)).unwrap();
        let mut b = Frame::new(Extent::new(7, 5)).unwrap();

        SequentialDispatch.dispatch(&mut a, &shader);
        ThreadPoolDispatch::new(2).unwrap().dispatch(&mut b, &shader);

        assert_eq!(a, b);
        assert_eq!(a.pixel(6, 4), Some([0.6, 0.4, 0.0, 1.0]));
    }

    #[test]
    fn test_indexed_dispatch() {
        let mut out = vec![0u8; 6];
        ThreadPoolDispatch::new(1)
            .unwrap()
            .dispatch_indexed(3, &mut out, &|x: u32, y: u32| (y * 3 + x) as u8);
        assert_eq!(out, vec![0, 1, 2, 3, 4, 5]);
    }
}
