use crate::{
    assets::store::PreparedImage,
    foundation::{
        core::{BezPath, Rect, Rgba8},
        error::CardResult,
    },
    template::model::Alignment,
};

/// One rendered frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Premultiplied RGBA of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// The drawing seam between the compositor and a concrete raster target.
///
/// The compositor is a stateless module of pure functions; everything it
/// knows about pixels goes through this trait. [`RasterSurface`] rasterizes
/// for real, [`RecordingSurface`] logs draw commands for inspection, and
/// embedders can supply their own target.
///
/// [`RasterSurface`]: crate::RasterSurface
/// [`RecordingSurface`]: crate::RecordingSurface
pub trait Surface {
    /// Surface dimensions as `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill an axis-aligned rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Fill an arbitrary closed path with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Blit an image stretched into `dest` (axis-aligned, no clipping mask).
    fn blit(&mut self, image: &PreparedImage, dest: Rect);

    /// Measure the rendered width of a single unwrapped line of text.
    fn measure_text(&mut self, text: &str, font_size: f64) -> CardResult<f64>;

    /// Draw one already-wrapped line of text.
    ///
    /// `(x, y)` is the alignment point on the baseline, canvas-`fillText`
    /// style: `Left` puts the line's left edge at `x`, `Center` centers it
    /// on `x`, `Right` puts the right edge at `x`.
    fn draw_text_line(
        &mut self,
        line: &str,
        x: f64,
        y: f64,
        font_size: f64,
        color: Rgba8,
        align: Alignment,
    ) -> CardResult<()>;
}
