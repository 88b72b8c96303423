//! Error types for the drawing surface.

use thiserror::Error;

/// An error raised by surface operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// A drawing operation was attempted before the surface was initialized.
    #[error("the canvas has not been initialized")]
    Uninitialized,

    /// The requested surface dimensions are not drawable.
    #[error("the canvas must be at least one pixel big, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// A color component fell outside the 0..=255 range.
    #[error("color component {value} is outside the 0..=255 range")]
    ColorComponentRange {
        /// The offending component value.
        value: f64,
    },

    /// A color array had the wrong number of components.
    #[error("a color is made up of three to four numbers, got {count}")]
    ColorComponentCount {
        /// Number of components supplied.
        count: usize,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
