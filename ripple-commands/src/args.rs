//! Extraction helpers for fully-reduced command arguments.
//!
//! Argument *presence* and coarse node kinds are checked by the evaluator
//! against each handler's declared contract before `preflight` runs; the
//! helpers here do the finer checks a contract cannot express — element
//! kinds, array lengths, color component ranges — and produce command
//! errors carrying the handler's label and the call line.

use std::ops::RangeInclusive;

use ripple_core::ast::{Expr, ExprKind};
use ripple_core::{CommandArgs, RuntimeError};
use ripple_graphics::{Rgba, SurfaceError};

/// A command error with the standard label/line envelope.
pub(crate) fn command_error(
    command: &str,
    line: usize,
    message: impl Into<String>,
) -> RuntimeError {
    RuntimeError::Command {
        command: command.to_owned(),
        message: message.into(),
        line,
    }
}

/// Wrap a surface failure into a command error.
pub(crate) fn surface_error(command: &str, line: usize, err: &SurfaceError) -> RuntimeError {
    command_error(command, line, err.to_string())
}

/// Look up an argument the contract already guarantees to be present.
pub(crate) fn argument<'a>(
    args: &'a CommandArgs,
    label: &str,
    command: &str,
    line: usize,
) -> Result<&'a Expr, RuntimeError> {
    args.get(label).ok_or_else(|| {
        command_error(command, line, format!("argument \"{label}\" is missing"))
    })
}

/// A number array whose length falls within the given range.
pub(crate) fn number_array(
    args: &CommandArgs,
    label: &str,
    command: &str,
    line: usize,
    len: RangeInclusive<usize>,
) -> Result<Vec<f64>, RuntimeError> {
    let expr = argument(args, label, command, line)?;
    let numbers = match &expr.kind {
        ExprKind::Array { elems, .. } => elems
            .iter()
            .map(Expr::as_number)
            .collect::<Option<Vec<f64>>>(),
        _ => None,
    };

    match numbers {
        Some(values) if len.contains(&values.len()) => Ok(values),
        _ => Err(command_error(
            command,
            line,
            format!(
                "the \"{label}\" argument has to be a number array of length {} to {}",
                len.start(),
                len.end()
            ),
        )),
    }
}

/// A required literal number.
pub(crate) fn number(
    args: &CommandArgs,
    label: &str,
    command: &str,
    line: usize,
) -> Result<f64, RuntimeError> {
    argument(args, label, command, line)?.as_number().ok_or_else(|| {
        command_error(
            command,
            line,
            format!("the \"{label}\" argument is expected to be a number"),
        )
    })
}

/// A required literal string.
pub(crate) fn string(
    args: &CommandArgs,
    label: &str,
    command: &str,
    line: usize,
) -> Result<String, RuntimeError> {
    argument(args, label, command, line)?
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            command_error(
                command,
                line,
                format!("the \"{label}\" argument is expected to be a string"),
            )
        })
}

/// A 3-or-4 component color array.
pub(crate) fn color(
    args: &CommandArgs,
    label: &str,
    command: &str,
    line: usize,
) -> Result<Rgba, RuntimeError> {
    let components = number_array(args, label, command, line, 3..=4)?;
    Rgba::from_components(&components).map_err(|e| surface_error(command, line, &e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
