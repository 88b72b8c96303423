//! The command registry: the contract between the evaluator and the
//! drawing-primitive handlers that live outside this crate.
//!
//! A handler provides a stable label, a declared argument contract, a
//! `preflight` step (argument materialization, no surface effects) and an
//! `execute` step that receives the drawing surface explicitly — there is
//! no global surface and no runtime discovery: every handler is registered
//! with an explicit [`CommandRegistry::register`] call at startup, and a
//! duplicate label is rejected eagerly.
//!
//! The evaluator guarantees that every argument a handler sees is fully
//! atomic (no unresolved variable references or pending operations) before
//! validation runs.

use std::collections::{BTreeMap, HashMap};

use ripple_graphics::Surface;

use crate::ast::{Expr, ExprKind};
use crate::error::RuntimeError;

/// Fully-reduced command arguments, keyed by label. The single unlabeled
/// positional argument lives under the reserved label `"default"`.
pub type CommandArgs = BTreeMap<String, Expr>;

// ---------------------------------------------------------------------------
// Argument contract
// ---------------------------------------------------------------------------

/// Whether a declared argument must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// The node kind a declared argument must reduce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A number or string literal.
    Literal,
    /// An array.
    Array,
    /// Anything atomic.
    Any,
}

impl ArgKind {
    /// Whether the given atomic node satisfies this kind.
    #[must_use]
    pub const fn matches(self, expr: &Expr) -> bool {
        match self {
            Self::Literal => matches!(expr.kind, ExprKind::Literal(_)),
            Self::Array => matches!(expr.kind, ExprKind::Array { .. }),
            Self::Any => true,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Literal => "a literal",
            Self::Array => "an array",
            Self::Any => "any value",
        }
    }
}

/// One declared argument of a command.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub label: &'static str,
    pub presence: Presence,
    pub kind: ArgKind,
}

impl ArgSpec {
    /// A required argument.
    #[must_use]
    pub const fn required(label: &'static str, kind: ArgKind) -> Self {
        Self {
            label,
            presence: Presence::Required,
            kind,
        }
    }

    /// An optional argument.
    #[must_use]
    pub const fn optional(label: &'static str, kind: ArgKind) -> Self {
        Self {
            label,
            presence: Presence::Optional,
            kind,
        }
    }
}

/// Check the supplied arguments against a declared contract: unexpected
/// extras, kind mismatches and missing required arguments all fail.
pub fn validate_arguments(
    command: &str,
    line: usize,
    args: &CommandArgs,
    spec: &[ArgSpec],
) -> Result<(), RuntimeError> {
    for (label, value) in args {
        let Some(declared) = spec.iter().find(|s| s.label == label) else {
            return Err(RuntimeError::UnexpectedArgument {
                label: label.clone(),
                command: command.to_owned(),
                line,
            });
        };
        if !declared.kind.matches(value) {
            return Err(RuntimeError::ArgumentType {
                label: label.clone(),
                command: command.to_owned(),
                expected: declared.kind.name(),
                found: value.kind_name(),
                line,
            });
        }
    }

    for declared in spec {
        if declared.presence == Presence::Required && !args.contains_key(declared.label) {
            return Err(RuntimeError::MissingArgument {
                label: declared.label.to_owned(),
                command: command.to_owned(),
                line,
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// A drawing-primitive command handler.
pub trait CommandHandler {
    /// The stable label scripts invoke this handler by.
    fn label(&self) -> &'static str;

    /// The declared argument contract.
    fn arg_spec(&self) -> Vec<ArgSpec>;

    /// Materialize arguments and check preconditions. Must not touch the
    /// surface.
    fn preflight(&mut self, args: &CommandArgs, line: usize) -> Result<(), RuntimeError> {
        let _ = (args, line);
        Ok(())
    }

    /// Perform the side effect against the surface.
    fn execute(
        &mut self,
        args: &CommandArgs,
        surface: &mut Surface,
        line: usize,
    ) -> Result<(), RuntimeError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The label → handler mapping, populated explicitly at startup.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own label.
    ///
    /// Registering a label twice fails eagerly.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) -> Result<(), RuntimeError> {
        let label = handler.label();
        if self.handlers.contains_key(label) {
            return Err(RuntimeError::DuplicateCommand {
                label: label.to_owned(),
            });
        }
        self.handlers.insert(label.to_owned(), handler);
        Ok(())
    }

    /// Look up a handler by label.
    pub fn get_mut(&mut self, label: &str) -> Option<&mut (dyn CommandHandler + 'static)> {
        self.handlers.get_mut(label).map(|handler| &mut **handler)
    }

    /// Whether a handler is registered under the label.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.handlers.contains_key(label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
