use crate::{
    assets::store::PreparedImage,
    foundation::{
        core::{BezPath, Rect, Rgba8},
        error::CardResult,
    },
    render::surface::Surface,
    template::model::Alignment,
};

use kurbo::Shape as _;

/// Fixed per-character advance factor used by [`RecordingSurface`] text
/// measurement: width = chars x font_size x 0.6.
pub const RECORDING_CHAR_ADVANCE: f64 = 0.6;

/// One draw call captured by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle fill.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Filled path, captured by its bounding box and element count.
    FillPath {
        /// Bounding box of the path.
        bounds: Rect,
        /// Number of path elements.
        elements: usize,
        /// Fill color.
        color: Rgba8,
    },
    /// Stretched image blit.
    Blit {
        /// Destination rectangle.
        dest: Rect,
        /// Source image size as `(width, height)`.
        source_size: (u32, u32),
    },
    /// One line of text.
    TextLine {
        /// The line content.
        line: String,
        /// Baseline anchor x.
        x: f64,
        /// Baseline anchor y.
        y: f64,
        /// Font size.
        font_size: f64,
        /// Text color.
        color: Rgba8,
        /// Alignment against the anchor.
        align: Alignment,
    },
}

/// A [`Surface`] that records draw commands instead of producing pixels.
///
/// Text measurement uses a fixed [`RECORDING_CHAR_ADVANCE`] per-character
/// advance, so geometry derived from measurement is deterministic and needs
/// no font. Useful for tests and for callers that want a dry run of a
/// render pass.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    /// Commands in the order they were issued.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a recording surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Number of image blits recorded so far.
    pub fn blit_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Blit { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.commands.push(DrawCommand::FillPath {
            bounds: path.bounding_box(),
            elements: path.elements().len(),
            color,
        });
    }

    fn blit(&mut self, image: &PreparedImage, dest: Rect) {
        self.commands.push(DrawCommand::Blit {
            dest,
            source_size: (image.width, image.height),
        });
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> CardResult<f64> {
        Ok(text.chars().count() as f64 * font_size * RECORDING_CHAR_ADVANCE)
    }

    fn draw_text_line(
        &mut self,
        line: &str,
        x: f64,
        y: f64,
        font_size: f64,
        color: Rgba8,
        align: Alignment,
    ) -> CardResult<()> {
        self.commands.push(DrawCommand::TextLine {
            line: line.to_string(),
            x,
            y,
            font_size,
            color,
            align,
        });
        Ok(())
    }
}
