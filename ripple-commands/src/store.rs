//! The `store` command: render the surface to SVG and write it to a file.

use log::debug;
use ripple_core::{ArgKind, ArgSpec, CommandArgs, CommandHandler, RuntimeError};
use ripple_graphics::Surface;

use crate::args;

/// `builtin store file: "out.svg"`.
#[derive(Debug, Default)]
pub struct StoreCommand {
    file: String,
}

impl CommandHandler for StoreCommand {
    fn label(&self) -> &'static str {
        "store"
    }

    fn arg_spec(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required("file", ArgKind::Literal)]
    }

    fn preflight(&mut self, supplied: &CommandArgs, line: usize) -> Result<(), RuntimeError> {
        self.file = args::string(supplied, "file", self.label(), line)?;
        Ok(())
    }

    fn execute(
        &mut self,
        _supplied: &CommandArgs,
        surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError> {
        let document = ripple_svg::render(surface)
            .map_err(|e| args::surface_error(self.label(), line, &e))?;

        debug!("storing surface to {:?}", self.file);
        svg::save(&self.file, &document).map_err(|e| {
            args::command_error(self.label(), line, format!("cannot write {:?}: {e}", self.file))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::ast::Expr;

    fn store_args(path: &str) -> CommandArgs {
        std::iter::once(("file".to_owned(), Expr::string(path, 1))).collect()
    }

    #[test]
    fn preflight_requires_a_string_path() {
        let mut cmd = StoreCommand::default();
        cmd.preflight(&store_args("out.svg"), 1).unwrap();
        assert_eq!(cmd.file, "out.svg");

        let supplied: CommandArgs =
            std::iter::once(("file".to_owned(), Expr::number(3.0, 1))).collect();
        assert!(cmd.preflight(&supplied, 1).is_err());
    }

    #[test]
    fn storing_an_uninitialized_surface_fails() {
        let mut cmd = StoreCommand::default();
        cmd.preflight(&store_args("out.svg"), 2).unwrap();
        let mut surface = Surface::new();
        let err = cmd.execute(&store_args("out.svg"), &mut surface, 2).unwrap_err();
        let RuntimeError::Command { message, .. } = err else {
            panic!("expected a command error");
        };
        assert!(message.contains("not been initialized"), "got: {message}");
    }
}
