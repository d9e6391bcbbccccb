use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::error::{CardError, CardResult},
    template::model::{ImageInput, RenderInputs, Template},
};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build a prepared image from already-premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> CardResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if bytes.len() != expected {
            return Err(CardError::validation(format!(
                "prepared image byte length {} does not match {width}x{height} rgba8",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Build a solid-color prepared image (mostly useful in tests and demos).
    pub fn solid(width: u32, height: u32, premul_rgba: [u8; 4]) -> Self {
        let px = (width as usize).saturating_mul(height as usize);
        let mut bytes = Vec::with_capacity(px * 4);
        for _ in 0..px {
            bytes.extend_from_slice(&premul_rgba);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}

/// An image-bearing layer of the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Full-surface decorative pattern.
    Pattern,
    /// Mask image inside the mask rectangle.
    Mask,
    /// Stroke outline over the mask rectangle.
    Stroke,
    /// Optional user photo inside the mask rectangle.
    UserImage,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Layer::Pattern => "pattern",
            Layer::Mask => "mask",
            Layer::Stroke => "stroke",
            Layer::UserImage => "user image",
        };
        f.write_str(name)
    }
}

/// A recorded per-layer preparation failure.
///
/// Failures never abort preparation; the layer is simply absent from the
/// store and the compositor skips it.
#[derive(Clone, Debug)]
pub struct LayerFailure {
    /// The layer that failed to prepare.
    pub layer: Layer,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Immutable store of decoded layer images and font bytes for one template.
///
/// All IO and decoding is front-loaded here so the compositor can blit
/// strictly in z-order without awaiting anything. A layer whose source
/// cannot be read or decoded is recorded in [`failures`](Self::failures)
/// and skipped; an unreadable font is a hard error because text layers
/// cannot be skipped the way decorative images can.
#[derive(Clone, Debug)]
pub struct PreparedAssetStore {
    pattern: Option<PreparedImage>,
    mask: Option<PreparedImage>,
    stroke: Option<PreparedImage>,
    user_image: Option<PreparedImage>,
    font: Arc<Vec<u8>>,
    failures: Vec<LayerFailure>,
}

impl PreparedAssetStore {
    /// Prepare all assets referenced by `template` and `inputs`, resolving
    /// relative sources against `root`.
    #[tracing::instrument(skip(template, inputs), fields(root = %root.as_ref().display()))]
    pub fn prepare(
        template: &Template,
        inputs: &RenderInputs,
        root: impl AsRef<Path> + std::fmt::Debug,
    ) -> CardResult<Self> {
        let root = root.as_ref();
        let mut failures = Vec::new();

        let pattern = load_layer(root, &template.urls.design_pattern, Layer::Pattern, &mut failures);
        let mask = load_layer(root, &template.urls.mask, Layer::Mask, &mut failures);
        let stroke = load_layer(root, &template.urls.stroke, Layer::Stroke, &mut failures);

        let user_image = match &inputs.user_image {
            None => None,
            Some(source) => match decode_user_image(source) {
                Ok(img) => Some(img),
                Err(e) => {
                    record_failure(&mut failures, Layer::UserImage, &e);
                    None
                }
            },
        };

        let font = Arc::new(read_source_bytes(root, &template.urls.font)?);

        Ok(Self {
            pattern,
            mask,
            stroke,
            user_image,
            font,
            failures,
        })
    }

    /// Build a store from already-decoded images, bypassing the filesystem.
    pub fn from_images(
        pattern: Option<PreparedImage>,
        mask: Option<PreparedImage>,
        stroke: Option<PreparedImage>,
        user_image: Option<PreparedImage>,
        font: Arc<Vec<u8>>,
    ) -> Self {
        Self {
            pattern,
            mask,
            stroke,
            user_image,
            font,
            failures: Vec::new(),
        }
    }

    /// Decoded pattern image, if it prepared successfully.
    pub fn pattern(&self) -> Option<&PreparedImage> {
        self.pattern.as_ref()
    }

    /// Decoded mask image, if it prepared successfully.
    pub fn mask(&self) -> Option<&PreparedImage> {
        self.mask.as_ref()
    }

    /// Decoded stroke image, if it prepared successfully.
    pub fn stroke(&self) -> Option<&PreparedImage> {
        self.stroke.as_ref()
    }

    /// Decoded user image, if one was supplied and decoded successfully.
    pub fn user_image(&self) -> Option<&PreparedImage> {
        self.user_image.as_ref()
    }

    /// Raw font bytes for text shaping.
    pub fn font_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.font)
    }

    /// Per-layer failures recorded during preparation.
    pub fn failures(&self) -> &[LayerFailure] {
        &self.failures
    }
}

fn load_layer(
    root: &Path,
    source: &str,
    layer: Layer,
    failures: &mut Vec<LayerFailure>,
) -> Option<PreparedImage> {
    let result = read_source_bytes(root, source).and_then(|bytes| decode::decode_image(&bytes));
    match result {
        Ok(img) => Some(img),
        Err(e) => {
            record_failure(failures, layer, &e);
            None
        }
    }
}

fn decode_user_image(source: &ImageInput) -> CardResult<PreparedImage> {
    match source {
        ImageInput::DataUri(uri) => decode::decode_image(&decode::decode_data_uri(uri)?),
        ImageInput::Bytes(bytes) => decode::decode_image(bytes),
    }
}

fn record_failure(failures: &mut Vec<LayerFailure>, layer: Layer, error: &CardError) {
    tracing::warn!(%layer, %error, "layer skipped: asset failed to prepare");
    failures.push(LayerFailure {
        layer,
        reason: error.to_string(),
    });
}

fn read_source_bytes(root: &Path, source: &str) -> CardResult<Vec<u8>> {
    let norm = normalize_source_path(source)?;
    let path: PathBuf = root.join(Path::new(&norm));
    std::fs::read(&path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(CardError::from)
}

/// Normalize and validate a template-relative asset path.
///
/// The result uses `/` separators with `.` segments removed; absolute paths
/// and parent traversals (`..`) are rejected.
pub fn normalize_source_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(CardError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(CardError::validation("asset paths must be relative"));
    }

    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("asset paths must not contain '..'"));
        }
        parts.push(part);
    }

    if parts.is_empty() {
        return Err(CardError::validation("asset path must contain a file name"));
    }

    Ok(parts.join("/"))
}
