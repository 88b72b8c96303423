//! Core types shared across the Ripple drawing model.

use crate::error::SurfaceError;

/// Convenience alias for coordinates and dimensions.
pub type Scalar = f64;

/// 2-D point, re-exported from `kurbo`.
pub type Point = kurbo::Point;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from explicit components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from a slice of 3 or 4 scalar components in 0..=255.
    ///
    /// The alpha component defaults to 255 when omitted.
    pub fn from_components(components: &[Scalar]) -> Result<Self, SurfaceError> {
        if !(3..=4).contains(&components.len()) {
            return Err(SurfaceError::ColorComponentCount {
                count: components.len(),
            });
        }

        let mut bytes = [255u8; 4];
        for (slot, &value) in bytes.iter_mut().zip(components) {
            if !(0.0..=255.0).contains(&value) {
                return Err(SurfaceError::ColorComponentRange { value });
            }
            *slot = value as u8;
        }

        Ok(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }

    /// CSS `rgb(...)` form of the opaque part, for SVG attributes.
    #[must_use]
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Alpha as an opacity fraction in [0, 1].
    #[must_use]
    pub fn opacity(&self) -> Scalar {
        Scalar::from(self.a) / 255.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
