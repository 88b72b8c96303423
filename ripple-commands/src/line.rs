//! The `line` command: draw a segment in the current pen color.

use ripple_core::{ArgKind, ArgSpec, CommandArgs, CommandHandler, RuntimeError};
use ripple_graphics::{Point, Surface};

use crate::args;

/// `builtin line from: [x, y], to: [x, y]`.
#[derive(Debug, Default)]
pub struct LineCommand {
    from: Point,
    to: Point,
}

impl CommandHandler for LineCommand {
    fn label(&self) -> &'static str {
        "line"
    }

    fn arg_spec(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("from", ArgKind::Array),
            ArgSpec::required("to", ArgKind::Array),
        ]
    }

    fn preflight(&mut self, supplied: &CommandArgs, line: usize) -> Result<(), RuntimeError> {
        let from = args::number_array(supplied, "from", self.label(), line, 2..=2)?;
        let to = args::number_array(supplied, "to", self.label(), line, 2..=2)?;
        self.from = Point::new(from[0], from[1]);
        self.to = Point::new(to[0], to[1]);
        Ok(())
    }

    fn execute(
        &mut self,
        _supplied: &CommandArgs,
        surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError> {
        surface
            .line(self.from, self.to)
            .map_err(|e| args::surface_error(self.label(), line, &e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
