//! The `print` command: write a literal value to stdout.

use ripple_core::ast::ExprKind;
use ripple_core::{ArgKind, ArgSpec, CommandArgs, CommandHandler, RuntimeError};
use ripple_graphics::Surface;

use crate::args;

/// `builtin print <literal>`.
#[derive(Debug)]
pub struct PrintCommand;

impl CommandHandler for PrintCommand {
    fn label(&self) -> &'static str {
        "print"
    }

    fn arg_spec(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required("default", ArgKind::Literal)]
    }

    fn execute(
        &mut self,
        supplied: &CommandArgs,
        _surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError> {
        let value = args::argument(supplied, "default", self.label(), line)?;
        match &value.kind {
            ExprKind::Literal(lit) => {
                println!("{}", lit.to_text());
                Ok(())
            }
            _ => Err(args::command_error(
                self.label(),
                line,
                format!("cannot print a {}", value.kind_name()),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
