use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{BezPath, Point, Rect};

/// Output surface dimensions in pixels.
///
/// The reference configuration is 1080x1080. Dimensions must fit `u16`
/// because the CPU rasterizer allocates pixmaps with 16-bit extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Construct a validated canvas size.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Check that both dimensions are positive and fit `u16`.
    pub fn validate(self) -> CardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CardError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(CardError::validation(format!(
                "canvas {}x{} exceeds the {} pixel-per-axis raster limit",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        Ok(())
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
        }
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serializes as a `#RRGGBB` (or `#RRGGBBAA` when translucent) hex string,
/// matching the template file format and the external color interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight, not premultiplied).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Construct an opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a `#RGB`, `#RRGGBB` or `#RRGGBBAA` hex color string.
    ///
    /// The leading `#` is required; hex digits are case-insensitive.
    pub fn from_hex(s: &str) -> CardResult<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| CardError::validation(format!("color '{s}' must start with '#'")))?;

        let nibble = |c: char| -> CardResult<u8> {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| CardError::validation(format!("color '{s}' has non-hex digit '{c}'")))
        };
        let byte = |hi: char, lo: char| -> CardResult<u8> { Ok(nibble(hi)? << 4 | nibble(lo)?) };

        let chars: Vec<char> = digits.chars().collect();
        match chars.len() {
            3 => Ok(Self {
                r: nibble(chars[0])? * 0x11,
                g: nibble(chars[1])? * 0x11,
                b: nibble(chars[2])? * 0x11,
                a: 255,
            }),
            6 => Ok(Self {
                r: byte(chars[0], chars[1])?,
                g: byte(chars[2], chars[3])?,
                b: byte(chars[4], chars[5])?,
                a: 255,
            }),
            8 => Ok(Self {
                r: byte(chars[0], chars[1])?,
                g: byte(chars[2], chars[3])?,
                b: byte(chars[4], chars[5])?,
                a: byte(chars[6], chars[7])?,
            }),
            n => Err(CardError::validation(format!(
                "color '{s}' has {n} hex digits; expected 3, 6 or 8"
            ))),
        }
    }

    /// Format as a hex string (`#RRGGBB`, or `#RRGGBBAA` when alpha < 255).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to premultiplied channel values.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
