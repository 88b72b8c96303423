//! Drawing surface model for the Ripple scripting language.
//!
//! This crate knows nothing about the language itself. It provides the
//! [`Surface`](surface::Surface) that scripts draw onto through the command
//! layer, together with the color and segment types the renderer consumes.

pub mod error;
pub mod surface;
pub mod types;

pub use error::SurfaceError;
pub use surface::{Segment, Surface};
pub use types::{Point, Rgba, Scalar};
