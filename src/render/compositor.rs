//! The layer compositor: one render pass over a mutable surface.
//!
//! Everything here is a pure function of its arguments; there is no hidden
//! drawing state and no change subscription. Callers re-invoke
//! [`render`] on a fresh surface whenever an input changes, and the full
//! frame is repainted from the background up.

use crate::{
    assets::store::PreparedAssetStore,
    foundation::{
        core::{Point, Rect, Rgba8},
        error::{CardError, CardResult},
    },
    layout::wrap::break_text_into_lines,
    render::{shapes::rounded_rect_path, surface::Surface},
    template::model::{Alignment, RenderInputs, Template},
};

/// Horizontal and vertical padding added around CTA text, per side.
pub const CTA_PADDING: f64 = 24.0;
/// Corner radius of the CTA box.
pub const CTA_CORNER_RADIUS: f64 = 15.0;

/// Composite one full card frame onto `surface`.
///
/// Layers are drawn in fixed z-order: background fill, pattern, mask,
/// stroke, user image (if present), caption, CTA. Image layers absent from
/// the store (decode failures, missing user image) are skipped without
/// aborting anything that follows.
///
/// Fails fast with a precondition error if the surface does not match the
/// template's canvas size; nothing is drawn in that case.
#[tracing::instrument(skip_all)]
pub fn render(
    surface: &mut dyn Surface,
    template: &Template,
    inputs: &RenderInputs,
    assets: &PreparedAssetStore,
) -> CardResult<()> {
    let (width, height) = surface.size();
    if width != template.canvas.width || height != template.canvas.height {
        return Err(CardError::render(format!(
            "surface is {width}x{height} but template canvas is {}x{}",
            template.canvas.width, template.canvas.height
        )));
    }

    let full_bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    surface.fill_rect(full_bounds, inputs.background_color);

    if let Some(pattern) = assets.pattern() {
        surface.blit(pattern, full_bounds);
    }

    let mask_rect = template.image_mask.to_rect();
    if let Some(mask) = assets.mask() {
        surface.blit(mask, mask_rect);
    }
    if let Some(stroke) = assets.stroke() {
        surface.blit(stroke, mask_rect);
    }
    if let Some(user_image) = assets.user_image() {
        surface.blit(user_image, mask_rect);
    }

    draw_caption(
        surface,
        &inputs.caption_text,
        template.caption.position.x,
        template.caption.position.y,
        template.caption.font_size,
        template.caption.text_color,
        template.caption.alignment,
        template.caption.max_characters_per_line,
    )?;

    draw_cta(
        surface,
        &inputs.cta_text,
        template.cta.position.x,
        template.cta.position.y,
        template.cta.font_size,
        template.cta.text_color,
        template.cta.background_color,
        template.cta.wrap_length,
    )?;

    Ok(())
}

/// Wrap `text` at `max_chars` and draw it line by line.
///
/// `(x, y)` anchors the first line's baseline; each following line sits one
/// `font_size` below the previous.
#[allow(clippy::too_many_arguments)]
pub fn draw_caption(
    surface: &mut dyn Surface,
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
    color: Rgba8,
    alignment: Alignment,
    max_chars: usize,
) -> CardResult<()> {
    for (index, line) in break_text_into_lines(text, max_chars).iter().enumerate() {
        surface.draw_text_line(line, x, y + index as f64 * font_size, font_size, color, alignment)?;
    }
    Ok(())
}

/// Draw the call-to-action: an auto-sized rounded box with centered text.
///
/// The box is sized from the *unwrapped* single-line measurement of `text`
/// (matching the reference behavior), so CTA text that wraps at
/// `wrap_length` may overflow the box. The text is drawn centered on the
/// anchor, nudged down by `font_size / 3` to sit visually centered in the
/// box.
#[allow(clippy::too_many_arguments)]
pub fn draw_cta(
    surface: &mut dyn Surface,
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
    text_color: Rgba8,
    box_color: Rgba8,
    wrap_length: usize,
) -> CardResult<()> {
    let text_width = surface.measure_text(text, font_size)?;
    let rect = cta_box(Point::new(x, y), text_width, font_size);
    surface.fill_path(&rounded_rect_path(rect, CTA_CORNER_RADIUS), box_color);

    draw_caption(
        surface,
        text,
        x,
        y + font_size / 3.0,
        font_size,
        text_color,
        Alignment::Center,
        wrap_length,
    )
}

/// Derive the CTA box rectangle from a measured text width.
///
/// The box is centered on `anchor`, `CTA_PADDING` wider than the text on
/// each side and `CTA_PADDING` taller than the font size on each side.
pub fn cta_box(anchor: Point, text_width: f64, font_size: f64) -> Rect {
    let x0 = anchor.x - text_width / 2.0 - CTA_PADDING;
    let y0 = anchor.y - font_size / 2.0 - CTA_PADDING;
    Rect::new(
        x0,
        y0,
        x0 + text_width + 2.0 * CTA_PADDING,
        y0 + font_size + 2.0 * CTA_PADDING,
    )
}
