//! Built-in drawing commands for Ripple.
//!
//! Each handler implements the [`CommandHandler`] contract from
//! `ripple-core`: a stable label, a declared argument contract, a
//! `preflight` step that materializes arguments, and an `execute` step that
//! performs the side effect against the surface passed in by the evaluator.
//!
//! Handlers are wired up by an explicit [`register_defaults`] call at
//! startup; there is no runtime discovery.

mod args;
mod canvas;
mod color;
mod line;
mod print;
mod store;

pub use canvas::CanvasCommand;
pub use color::ColorCommand;
pub use line::LineCommand;
pub use print::PrintCommand;
pub use store::StoreCommand;

use ripple_core::{CommandRegistry, RuntimeError};

/// Register every built-in drawing command.
pub fn register_defaults(registry: &mut CommandRegistry) -> Result<(), RuntimeError> {
    registry.register(Box::new(CanvasCommand::default()))?;
    registry.register(Box::new(ColorCommand::default()))?;
    registry.register(Box::new(LineCommand::default()))?;
    registry.register(Box::new(PrintCommand))?;
    registry.register(Box::new(StoreCommand::default()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
