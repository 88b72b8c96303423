//! SVG renderer for Ripple drawing surfaces.
//!
//! Converts a [`Surface`] into an SVG [`Document`] using the `svg` crate.
//! The surface's coordinate system maps directly onto SVG user units with
//! the origin in the top-left corner, so no axis flip is needed. The
//! background becomes a full-size `<rect>`; each drawn segment becomes one
//! `<line>` element carrying its stroke color and opacity.

use svg::node::element::{Line, Rectangle};
use svg::Document;

use ripple_graphics::{Scalar, Surface, SurfaceError};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Options controlling SVG output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Number of decimal places for coordinates. Default: 4.
    pub precision: usize,
    /// Stroke width for line segments. Default: 1.0.
    pub stroke_width: Scalar,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            stroke_width: 1.0,
        }
    }
}

/// Render a [`Surface`] to an SVG [`Document`].
///
/// Fails with [`SurfaceError::Uninitialized`] when the surface was never
/// given dimensions.
pub fn render(surface: &Surface) -> Result<Document, SurfaceError> {
    render_with_options(surface, &RenderOptions::default())
}

/// Render a [`Surface`] to an SVG [`Document`] with custom options.
pub fn render_with_options(
    surface: &Surface,
    opts: &RenderOptions,
) -> Result<Document, SurfaceError> {
    let (width, height) = surface.dimensions()?;

    let mut document = Document::new()
        .set("width", fmt_scalar(width, opts.precision))
        .set("height", fmt_scalar(height, opts.precision))
        .set("viewBox", (0.0, 0.0, width, height));

    if let Some(background) = surface.background() {
        let rect = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", fmt_scalar(width, opts.precision))
            .set("height", fmt_scalar(height, opts.precision))
            .set("fill", background.css())
            .set("fill-opacity", background.opacity());
        document = document.add(rect);
    }

    for segment in surface.segments() {
        let line = Line::new()
            .set("x1", fmt_scalar(segment.from.x, opts.precision))
            .set("y1", fmt_scalar(segment.from.y, opts.precision))
            .set("x2", fmt_scalar(segment.to.x, opts.precision))
            .set("y2", fmt_scalar(segment.to.y, opts.precision))
            .set("stroke", segment.color.css())
            .set("stroke-opacity", segment.color.opacity())
            .set("stroke-width", opts.stroke_width);
        document = document.add(line);
    }

    Ok(document)
}

/// Render a [`Surface`] to an SVG string.
pub fn render_to_string(surface: &Surface) -> Result<String, SurfaceError> {
    Ok(render(surface)?.to_string())
}

/// Format a scalar with a fixed number of decimals, trimming trailing zeros.
fn fmt_scalar(value: Scalar, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_graphics::{Point, Rgba};

    fn sample_surface() -> Surface {
        let mut surface = Surface::new();
        surface.initialize(200.0, 100.0).unwrap();
        surface.fill(Rgba::WHITE).unwrap();
        surface.set_color(Rgba::new(255, 0, 0, 255)).unwrap();
        surface
            .line(Point::new(10.0, 20.0), Point::new(30.0, 40.0))
            .unwrap();
        surface
    }

    #[test]
    fn uninitialized_surface_fails() {
        let surface = Surface::new();
        assert_eq!(render(&surface).unwrap_err(), SurfaceError::Uninitialized);
    }

    #[test]
    fn document_has_viewbox_and_background() {
        let text = render_to_string(&sample_surface()).unwrap();
        assert!(text.contains("<svg"), "missing svg root: {text}");
        assert!(text.contains("viewBox"), "missing viewBox: {text}");
        assert!(
            text.contains("rect") && text.contains("rgb(255,255,255)"),
            "missing background rect: {text}"
        );
    }

    #[test]
    fn one_line_element_per_segment() {
        let text = render_to_string(&sample_surface()).unwrap();
        assert_eq!(text.matches("<line").count(), 1, "got: {text}");
        assert!(text.contains("rgb(255,0,0)"), "missing stroke color: {text}");
        assert!(text.contains("x1=\"10\""), "missing endpoint: {text}");
    }

    #[test]
    fn scalar_formatting_trims_zeros() {
        assert_eq!(fmt_scalar(10.0, 4), "10");
        assert_eq!(fmt_scalar(10.5, 4), "10.5");
        assert_eq!(fmt_scalar(1.0 / 3.0, 4), "0.3333");
    }
}
