//! The `color` command: set the current pen color.

use ripple_core::{ArgKind, ArgSpec, CommandArgs, CommandHandler, RuntimeError};
use ripple_graphics::{Rgba, Surface};

use crate::args;

/// `builtin color [r, g, b]` (or `[r, g, b, a]`): every segment drawn
/// afterwards carries this color.
#[derive(Debug, Default)]
pub struct ColorCommand {
    color: Rgba,
}

impl CommandHandler for ColorCommand {
    fn label(&self) -> &'static str {
        "color"
    }

    fn arg_spec(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required("default", ArgKind::Array)]
    }

    fn preflight(&mut self, supplied: &CommandArgs, line: usize) -> Result<(), RuntimeError> {
        self.color = args::color(supplied, "default", self.label(), line)?;
        Ok(())
    }

    fn execute(
        &mut self,
        _supplied: &CommandArgs,
        surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError> {
        surface
            .set_color(self.color)
            .map_err(|e| args::surface_error(self.label(), line, &e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
