//! The drawing surface.
//!
//! A [`Surface`] starts out uninitialized; the `canvas` command gives it
//! dimensions (and optionally a background color) before anything can be
//! drawn. Drawing accumulates colored line segments in order; rasterization
//! is left to a renderer crate so the surface itself stays a plain value
//! owned by the driver — there is no global instance.

use crate::error::SurfaceError;
use crate::types::{Point, Rgba, Scalar};

/// A single colored line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Rgba,
}

/// The drawing surface scripts paint onto.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    /// Dimensions, set by [`Surface::initialize`]. `None` until then.
    size: Option<(Scalar, Scalar)>,
    /// Background fill, if any.
    background: Option<Rgba>,
    /// Current pen color; applied to segments drawn after it is set.
    pen: Rgba,
    /// Drawn segments, in draw order.
    segments: Vec<Segment>,
}

impl Surface {
    /// Create an uninitialized surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the surface its dimensions.
    ///
    /// Re-initializing resets the background and all drawn segments but
    /// keeps the current pen color.
    pub fn initialize(&mut self, width: Scalar, height: Scalar) -> Result<(), SurfaceError> {
        if width < 1.0 || height < 1.0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        self.size = Some((width, height));
        self.background = None;
        self.segments.clear();
        Ok(())
    }

    fn check_initialized(&self) -> Result<(Scalar, Scalar), SurfaceError> {
        self.size.ok_or(SurfaceError::Uninitialized)
    }

    /// Fill the whole surface with a background color.
    pub fn fill(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        self.check_initialized()?;
        self.background = Some(color);
        Ok(())
    }

    /// Set the current pen color.
    pub fn set_color(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        self.check_initialized()?;
        self.pen = color;
        Ok(())
    }

    /// Draw a line segment in the current pen color.
    pub fn line(&mut self, from: Point, to: Point) -> Result<(), SurfaceError> {
        self.check_initialized()?;
        self.segments.push(Segment {
            from,
            to,
            color: self.pen,
        });
        Ok(())
    }

    /// Surface dimensions, failing when uninitialized.
    pub fn dimensions(&self) -> Result<(Scalar, Scalar), SurfaceError> {
        self.check_initialized()
    }

    /// Whether [`Surface::initialize`] has been called.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.size.is_some()
    }

    /// Background color, if one was filled.
    #[must_use]
    pub const fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// Current pen color.
    #[must_use]
    pub const fn pen(&self) -> Rgba {
        self.pen
    }

    /// Drawn segments in draw order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_before_initialize_fails() {
        let mut surface = Surface::new();
        assert_eq!(
            surface.line(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            Err(SurfaceError::Uninitialized)
        );
        assert_eq!(surface.fill(Rgba::WHITE), Err(SurfaceError::Uninitialized));
        assert_eq!(
            surface.set_color(Rgba::WHITE),
            Err(SurfaceError::Uninitialized)
        );
    }

    #[test]
    fn initialize_rejects_degenerate_dimensions() {
        let mut surface = Surface::new();
        assert!(matches!(
            surface.initialize(0.0, 100.0),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            surface.initialize(100.0, -5.0),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn segments_carry_the_pen_color_at_draw_time() {
        let mut surface = Surface::new();
        surface.initialize(100.0, 100.0).unwrap();

        surface
            .line(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .unwrap();
        surface.set_color(Rgba::new(255, 0, 0, 255)).unwrap();
        surface
            .line(Point::new(0.0, 0.0), Point::new(0.0, 10.0))
            .unwrap();

        let segments = surface.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].color, Rgba::BLACK);
        assert_eq!(segments[1].color, Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn reinitialize_clears_content() {
        let mut surface = Surface::new();
        surface.initialize(10.0, 10.0).unwrap();
        surface.fill(Rgba::WHITE).unwrap();
        surface
            .line(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
            .unwrap();

        surface.initialize(20.0, 20.0).unwrap();
        assert!(surface.segments().is_empty());
        assert_eq!(surface.background(), None);
        assert_eq!(surface.dimensions(), Ok((20.0, 20.0)));
    }
}
