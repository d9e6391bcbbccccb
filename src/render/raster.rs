use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::{
        core::{BezPath, CanvasSize, Rect, Rgba8},
        error::{CardError, CardResult},
    },
    render::surface::{FrameRGBA, Surface},
    template::model::Alignment,
};

struct LoadedFont {
    data: vello_cpu::peniko::FontData,
    family: String,
}

/// CPU raster surface backed by `vello_cpu`, with `parley` text shaping.
///
/// All draw calls accumulate into a render context; [`into_frame`]
/// rasterizes and reads back the pixels. Font registration is lazy so a
/// surface that never draws text never touches the font bytes; invalid
/// font data surfaces as an error from the first text operation instead.
///
/// [`into_frame`]: RasterSurface::into_frame
pub struct RasterSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    font_bytes: Arc<Vec<u8>>,
    font: Option<LoadedFont>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl RasterSurface {
    /// Create a blank (transparent) surface of the given size.
    pub fn new(size: CanvasSize, font_bytes: Arc<Vec<u8>>) -> CardResult<Self> {
        size.validate()?;
        let width = size.width as u16;
        let height = size.height as u16;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            font_bytes,
            font: None,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// Rasterize everything drawn so far and read back the pixels.
    pub fn into_frame(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }

    fn ensure_font(&mut self) -> CardResult<()> {
        if self.font.is_some() {
            return Ok(());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(self.font_bytes.to_vec()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::validation("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from((*self.font_bytes).clone()),
            0,
        );
        self.font = Some(LoadedFont { data, family });
        Ok(())
    }

    /// Shape a single line at `font_size` without any width constraint.
    fn layout_line(&mut self, text: &str, font_size: f64) -> CardResult<parley::Layout<Rgba8>> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(CardError::validation("font_size must be finite and > 0"));
        }
        self.ensure_font()?;
        let family = self
            .font
            .as_ref()
            .map(|f| f.family.clone())
            .ok_or_else(|| CardError::render("font not loaded"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn blit(&mut self, image: &PreparedImage, dest: Rect) {
        if image.width == 0 || image.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let paint = match rgba_premul_to_image(&image.rgba8_premul, image.width, image.height) {
            Ok(paint) => paint,
            Err(error) => {
                tracing::warn!(%error, "blit skipped: image could not become a paint source");
                return;
            }
        };

        let scale = kurbo::Affine::scale_non_uniform(
            dest.width() / f64::from(image.width),
            dest.height() / f64::from(image.height),
        );
        let transform = kurbo::Affine::translate((dest.x0, dest.y0)) * scale;

        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> CardResult<f64> {
        let layout = self.layout_line(text, font_size)?;
        Ok(f64::from(layout.width()))
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
        if line.is_empty() {
            return Ok(());
        }

        let layout = self.layout_line(line, font_size)?;
        let Some(first_line) = layout.lines().next() else {
            return Ok(());
        };
        let baseline = f64::from(first_line.metrics().baseline);
        let width = f64::from(layout.width());
        let dx = match align {
            Alignment::Left => 0.0,
            Alignment::Center => -width / 2.0,
            Alignment::Right => -width,
        };

        // (x, y) is the baseline anchor; the layout's own origin is its
        // top-left corner.
        self.ctx.set_transform(affine_to_cpu(kurbo::Affine::translate((
            x + dx,
            y - baseline,
        ))));
        self.ctx.set_paint(color_to_cpu(color));

        let font = self
            .font
            .as_ref()
            .ok_or_else(|| CardError::render("font not loaded"))?;
        for layout_line in layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn color_to_cpu(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn rect_to_cpu(rect: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

fn affine_to_cpu(affine: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(affine.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16 pixmap limit"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16 pixmap limit"))?;
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if bytes.len() != expected {
        return Err(CardError::render("image byte length mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
