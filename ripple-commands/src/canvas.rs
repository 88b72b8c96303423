//! The `canvas` command: give the surface its dimensions and an optional
//! background fill.

use log::debug;
use ripple_core::{ArgKind, ArgSpec, CommandArgs, CommandHandler, RuntimeError};
use ripple_graphics::{Rgba, Surface};

use crate::args;

/// `builtin canvas width: w, height: h` with an optional `background`
/// color array. Non-positive dimensions are rejected in preflight.
#[derive(Debug, Default)]
pub struct CanvasCommand {
    width: f64,
    height: f64,
    background: Option<Rgba>,
}

impl CommandHandler for CanvasCommand {
    fn label(&self) -> &'static str {
        "canvas"
    }

    fn arg_spec(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("width", ArgKind::Literal),
            ArgSpec::required("height", ArgKind::Literal),
            ArgSpec::optional("background", ArgKind::Array),
        ]
    }

    fn preflight(&mut self, supplied: &CommandArgs, line: usize) -> Result<(), RuntimeError> {
        let width = args::number(supplied, "width", self.label(), line)?;
        let height = args::number(supplied, "height", self.label(), line)?;

        if width < 1.0 || height < 1.0 {
            return Err(args::command_error(
                self.label(),
                line,
                "the canvas must be at least one pixel big",
            ));
        }
        self.width = width;
        self.height = height;

        self.background = if supplied.contains_key("background") {
            Some(args::color(supplied, "background", self.label(), line)?)
        } else {
            None
        };
        Ok(())
    }

    fn execute(
        &mut self,
        _supplied: &CommandArgs,
        surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError> {
        debug!("canvas {}x{}", self.width, self.height);
        surface
            .initialize(self.width, self.height)
            .map_err(|e| args::surface_error(self.label(), line, &e))?;

        if let Some(background) = self.background {
            surface
                .fill(background)
                .map_err(|e| args::surface_error(self.label(), line, &e))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
