//! Snapcard is a template-driven social card compositor.
//!
//! It turns a JSON card template plus per-render inputs (background color,
//! user image, caption and call-to-action text) into a single premultiplied
//! RGBA8 frame.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: [`Template::from_json`] loads and validates the card template
//! 2. **Prepare**: [`PreparedAssetStore::prepare`] front-loads all IO and decoding
//! 3. **Render**: [`render`] composites the layer stack onto a [`Surface`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: a given template, inputs and asset store
//!   always composite the same frame.
//! - **No IO in renderers**: external IO is front-loaded in [`PreparedAssetStore`].
//! - **Premultiplied RGBA8** end-to-end: decoded images and rendered frames
//!   carry premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod layout;
mod render;
mod template;

pub use assets::decode::{decode_data_uri, decode_image};
pub use assets::store::{
    Layer, LayerFailure, PreparedAssetStore, PreparedImage, normalize_source_path,
};
pub use foundation::core::{BezPath, CanvasSize, Point, Rect, Rgba8};
pub use foundation::error::{CardError, CardResult};
pub use layout::wrap::break_text_into_lines;
pub use render::compositor::{
    CTA_CORNER_RADIUS, CTA_PADDING, cta_box, draw_caption, draw_cta, render,
};
pub use render::raster::RasterSurface;
pub use render::recording::{DrawCommand, RECORDING_CHAR_ADVANCE, RecordingSurface};
pub use render::shapes::rounded_rect_path;
pub use render::surface::{FrameRGBA, Surface};
pub use template::model::{
    Alignment, CaptionSpec, CtaSpec, DEFAULT_BACKGROUND, DEFAULT_CTA_WRAP, ImageInput, MaskRect,
    Position, RenderInputs, Template, TemplateUrls,
};
