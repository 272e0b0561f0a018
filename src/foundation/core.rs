use crate::foundation::error::{QuireError, QuireResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement unit shown to the user on rulers and size inputs.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Device pixels.
    #[default]
    Px,
    /// Millimeters, converted through the workspace DPI.
    Mm,
}

impl Unit {
    /// Convert a device-pixel length into this unit at `dpi`.
    pub fn from_px(self, px: f64, dpi: f64) -> f64 {
        match self {
            Unit::Px => px,
            Unit::Mm => px_to_mm(px, dpi),
        }
    }

    /// Convert a length in this unit into device pixels at `dpi`.
    pub fn to_px(self, value: f64, dpi: f64) -> f64 {
        match self {
            Unit::Px => value,
            Unit::Mm => mm_to_px(value, dpi),
        }
    }

    /// Short label used on ruler captions.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Mm => "mm",
        }
    }
}

/// Convert device pixels to millimeters.
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}

/// Convert millimeters to device pixels.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm * dpi / MM_PER_INCH
}

/// Straight-alpha RGBA8 paint color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> QuireResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| QuireError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(QuireError::validation(format!("invalid hex color '{s}'")));
        }
        let nib = |i: usize| -> QuireResult<u8> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map_err(|_| QuireError::validation(format!("invalid hex color '{s}'")))
        };
        let byte = |i: usize| -> QuireResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| QuireError::validation(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            3 => Ok(Self::rgb(nib(0)? * 17, nib(1)? * 17, nib(2)? * 17)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(QuireError::validation(format!("invalid hex color '{s}'"))),
        }
    }

    /// `#rrggbb` representation (alpha is emitted separately as an opacity).
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` opacity.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Horizontal anchor of an object's `left` coordinate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    /// `left` is the left edge.
    #[default]
    Left,
    /// `left` is the horizontal center.
    Center,
    /// `left` is the right edge.
    Right,
}

/// Vertical anchor of an object's `top` coordinate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    /// `top` is the top edge.
    #[default]
    Top,
    /// `top` is the vertical center.
    Center,
    /// `top` is the bottom edge.
    Bottom,
}

impl OriginX {
    /// Fraction of the width between the left edge and the anchor.
    pub fn factor(self) -> f64 {
        match self {
            OriginX::Left => 0.0,
            OriginX::Center => 0.5,
            OriginX::Right => 1.0,
        }
    }
}

impl OriginY {
    /// Fraction of the height between the top edge and the anchor.
    pub fn factor(self) -> f64 {
        match self {
            OriginY::Top => 0.0,
            OriginY::Center => 0.5,
            OriginY::Bottom => 1.0,
        }
    }
}

/// Approximate float comparison used by geometry invariants.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
