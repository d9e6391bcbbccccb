use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::{CanvasSize, Rect, Rgba8},
    error::{CardError, CardResult},
};

/// Background color used before the user picks one (`#0369A1`).
pub const DEFAULT_BACKGROUND: Rgba8 = Rgba8::rgb(0x03, 0x69, 0xA1);

/// Wrap budget applied to CTA text when the template does not override it.
pub const DEFAULT_CTA_WRAP: usize = 20;

/// An immutable card template.
///
/// A template is a pure data record describing per-layer geometry and
/// default content: where the image sources live, where the mask rectangle
/// sits, and how the caption and call-to-action are styled. It is loaded
/// once (typically from JSON via [`Template::from_path`]) and stays
/// read-only for the lifetime of the session; the per-redraw state lives in
/// [`RenderInputs`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Output surface dimensions. Defaults to 1080x1080.
    #[serde(default)]
    pub canvas: CanvasSize,
    /// Source locations for the image-bearing layers and the text font.
    pub urls: TemplateUrls,
    /// The shared rectangle used by the mask, stroke and user-image layers.
    pub image_mask: MaskRect,
    /// Caption defaults and styling.
    pub caption: CaptionSpec,
    /// Call-to-action defaults and styling.
    pub cta: CtaSpec,
}

/// Relative source paths for template assets.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TemplateUrls {
    /// Full-surface decorative pattern image.
    pub design_pattern: String,
    /// Mask image drawn into the mask rectangle.
    pub mask: String,
    /// Stroke (outline) image drawn over the mask rectangle.
    pub stroke: String,
    /// Font file (TTF/OTF) used for caption and CTA text.
    pub font: String,
}

/// Axis-aligned rectangle shared by the mask, stroke and user-image layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl MaskRect {
    /// Convert to a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A 2D anchor point on the surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// The anchor is the left edge of each line.
    #[default]
    Left,
    /// The anchor is the horizontal center of each line.
    Center,
    /// The anchor is the right edge of each line.
    Right,
}

/// Caption layer configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CaptionSpec {
    /// Default caption text.
    pub text: String,
    /// Anchor point of the first line's baseline.
    pub position: Position,
    /// Font size in pixels; also the line advance for wrapped lines.
    pub font_size: f64,
    /// Text color.
    pub text_color: Rgba8,
    /// Horizontal alignment against the anchor.
    #[serde(default)]
    pub alignment: Alignment,
    /// Wrap budget in characters per line.
    pub max_characters_per_line: usize,
}

/// Call-to-action layer configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CtaSpec {
    /// Default CTA text.
    pub text: String,
    /// Center anchor of the CTA box.
    pub position: Position,
    /// Font size in pixels.
    #[serde(default = "default_cta_font_size")]
    pub font_size: f64,
    /// Text color.
    pub text_color: Rgba8,
    /// Fill color of the rounded box behind the text.
    pub background_color: Rgba8,
    /// Wrap budget in characters for the CTA text.
    #[serde(default = "default_cta_wrap_length")]
    pub wrap_length: usize,
}

fn default_cta_font_size() -> f64 {
    30.0
}

fn default_cta_wrap_length() -> usize {
    DEFAULT_CTA_WRAP
}

impl Template {
    /// Parse a template from a JSON string.
    pub fn from_json(json: &str) -> CardResult<Self> {
        let template: Self =
            serde_json::from_str(json).map_err(|e| CardError::serde(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    /// Load and validate a template from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Validate template invariants.
    pub fn validate(&self) -> CardResult<()> {
        self.canvas.validate()?;

        for (field, source) in [
            ("urls.design_pattern", &self.urls.design_pattern),
            ("urls.mask", &self.urls.mask),
            ("urls.stroke", &self.urls.stroke),
            ("urls.font", &self.urls.font),
        ] {
            validate_rel_source(source, field)?;
        }

        if !self.image_mask.width.is_finite()
            || !self.image_mask.height.is_finite()
            || self.image_mask.width <= 0.0
            || self.image_mask.height <= 0.0
        {
            return Err(CardError::validation(
                "image_mask width/height must be finite and > 0",
            ));
        }

        if !self.caption.font_size.is_finite() || self.caption.font_size <= 0.0 {
            return Err(CardError::validation(
                "caption font_size must be finite and > 0",
            ));
        }
        if self.caption.max_characters_per_line == 0 {
            return Err(CardError::validation(
                "caption max_characters_per_line must be >= 1",
            ));
        }

        if !self.cta.font_size.is_finite() || self.cta.font_size <= 0.0 {
            return Err(CardError::validation("cta font_size must be finite and > 0"));
        }
        if self.cta.wrap_length == 0 {
            return Err(CardError::validation("cta wrap_length must be >= 1"));
        }

        Ok(())
    }
}

fn validate_rel_source(source: &str, field: &str) -> CardResult<()> {
    if source.trim().is_empty() {
        return Err(CardError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CardError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    for part in s.split('/') {
        if part == ".." {
            return Err(CardError::validation(format!(
                "{field} must not contain '..'"
            )));
        }
    }
    Ok(())
}

/// The mutable external state consumed by one render pass.
///
/// Not owned by the core: the caller supplies it fresh on every redraw and
/// triggers a full re-render; nothing here survives between passes.
#[derive(Clone, Debug)]
pub struct RenderInputs {
    /// Background fill color.
    pub background_color: Rgba8,
    /// Optional user photo placed inside the mask rectangle.
    pub user_image: Option<ImageInput>,
    /// Caption text.
    pub caption_text: String,
    /// Call-to-action text.
    pub cta_text: String,
}

impl RenderInputs {
    /// Seed inputs from template defaults, as a fresh editing session would.
    pub fn from_template(template: &Template) -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND,
            user_image: None,
            caption_text: template.caption.text.clone(),
            cta_text: template.cta.text.clone(),
        }
    }
}

/// A user image as supplied by an external collaborator.
#[derive(Clone, Debug)]
pub enum ImageInput {
    /// A `data:<mime>;base64,<payload>` URI (e.g. from a file-upload widget).
    DataUri(String),
    /// Raw encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
}
