//! Error types for the Ripple language core.
//!
//! Two fatal error kinds, both carrying a human-readable message and the
//! source line: [`SyntaxError`] covers scanning and parsing (the first one
//! aborts the parse, no partial tree is ever evaluated), [`RuntimeError`]
//! covers evaluation. Neither is recoverable for the current run; the
//! driver reports them and stops, leaving already-performed side effects in
//! place.

use thiserror::Error;

use crate::ast::{BinOp, UnOp};

// ---------------------------------------------------------------------------
// Syntax errors
// ---------------------------------------------------------------------------

/// An error raised while scanning or parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    /// The scanner found a character no token rule matches.
    #[error("could not scan a token starting with '{found}' on line {line}")]
    UnknownCharacter { found: char, line: usize },

    /// A specific token was required.
    #[error("expected {expected}, got {found} on line {line}")]
    Expected {
        expected: &'static str,
        found: String,
        line: usize,
    },

    /// No expression atom starts with the current token.
    #[error("unknown expression atom starting with {found} on line {line}")]
    UnknownAtom { found: String, line: usize },

    /// Array literals may not contain array literals.
    #[error("nested arrays are not allowed on line {line}")]
    NestedArray { line: usize },

    /// Interpolation endpoints must be the same node variant.
    #[error("the interpolation expression expects the same variants on both sides, got {from} and {to} on line {line}")]
    InterpolationMismatch {
        from: &'static str,
        to: &'static str,
        line: usize,
    },

    /// `default` is reserved for the single unlabeled command argument.
    #[error("a command argument may not be explicitly labeled \"default\" on line {line}")]
    ReservedArgumentLabel { line: usize },

    /// End of input inside a block.
    #[error("reached end of input while parsing the block starting on line {line}")]
    UnterminatedBlock { line: usize },
}

// ---------------------------------------------------------------------------
// Runtime errors
// ---------------------------------------------------------------------------

/// An error raised during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Referenced a variable with no visible binding.
    #[error("referenced unknown variable \"{name}\" on line {line}")]
    UnknownVariable { name: String, line: usize },

    /// Called a procedure that was never defined.
    #[error("attempted call to an undefined procedure \"{name}\" on line {line}")]
    UnknownFunction { name: String, line: usize },

    /// Invoked a command label with no registered handler.
    #[error("undefined command \"{label}\" on line {line}")]
    UnknownCommand { label: String, line: usize },

    /// Declared a name already visible in the scope chain.
    #[error("redeclaration of existing symbol \"{name}\" on line {line}; previous definition on line {original_line}")]
    Redeclaration {
        name: String,
        line: usize,
        original_line: usize,
    },

    /// Mutated a name with no visible declaration.
    #[error("attempted to mutate undeclared symbol \"{name}\" on line {line}")]
    MutateUndeclared { name: String, line: usize },

    /// Used a procedure name in variable context.
    #[error("attempted to treat procedure \"{name}\" as a variable on line {line}")]
    NotAVariable { name: String, line: usize },

    /// Redefined a procedure.
    #[error("redefinition of procedure \"{name}\" on line {line}; original definition on line {original_line}")]
    FunctionRedefinition {
        name: String,
        line: usize,
        original_line: usize,
    },

    /// A binary operator was applied to unsupported operand variants.
    #[error("illegal {op} operation on {left} and {right} on line {line}")]
    UnsupportedBinary {
        op: BinOp,
        left: &'static str,
        right: &'static str,
        line: usize,
    },

    /// A unary operator was applied to an unsupported operand variant.
    #[error("illegal {op} operation on {operand} on line {line}")]
    UnsupportedUnary {
        op: UnOp,
        operand: &'static str,
        line: usize,
    },

    /// A number literal was required.
    #[error("{what} must reduce to a number literal, got {found} on line {line}")]
    ExpectedNumber {
        what: &'static str,
        found: &'static str,
        line: usize,
    },

    /// An array mixed literal kinds.
    #[error("an array may only be made up of a single kind of element; error on line {line}")]
    HeterogeneousArray { line: usize },

    /// An array element did not reduce to a literal.
    #[error("array element at index {index} is not atomic enough on line {line}")]
    ArrayElementNotAtomic { index: usize, line: usize },

    /// Element-wise arithmetic on arrays of differing length.
    #[error("both arrays must be of the same length in an {op} operation, got {left_len} and {right_len} on line {line}")]
    ArrayLengthMismatch {
        op: BinOp,
        left_len: usize,
        right_len: usize,
        line: usize,
    },

    /// Array index outside `[0, len)`.
    #[error("cannot access item at index {index} of an array of length {len} on line {line}")]
    IndexOutOfRange {
        index: i64,
        len: usize,
        line: usize,
    },

    /// A lazily-bound variable may not hold an array value.
    #[error("the array-valued variable \"{name}\" on line {line} must be marked \"instant\"")]
    LazyArrayBinding { name: String, line: usize },

    /// A value-context block completed without `return`.
    #[error("a block in expression position must return a value; block starting on line {line}")]
    MissingReturn { line: usize },

    /// The repeat count did not reduce to a usable number.
    #[error("the repeat target must reduce to a non-negative number literal, got {found} on line {line}")]
    InvalidRepeatCount { found: String, line: usize },

    /// Interpolation endpoints no longer match after reduction.
    #[error("interpolation endpoints reduced to different variants, {from} and {to}, on line {line}")]
    InterpolationKindMismatch {
        from: &'static str,
        to: &'static str,
        line: usize,
    },

    /// `return` reduced inside an operand.
    #[error("\"return\" cannot be used as an operand on line {line}")]
    ReturnInExpression { line: usize },

    /// A required command argument was not supplied.
    #[error("required argument \"{label}\" not provided for command \"{command}\" on line {line}")]
    MissingArgument {
        label: String,
        command: String,
        line: usize,
    },

    /// A command received an argument its contract does not declare.
    #[error("unexpected argument \"{label}\" for command \"{command}\" on line {line}")]
    UnexpectedArgument {
        label: String,
        command: String,
        line: usize,
    },

    /// A command argument had the wrong node kind.
    #[error("the argument \"{label}\" of command \"{command}\" is expected to be {expected}, got {found} on line {line}")]
    ArgumentType {
        label: String,
        command: String,
        expected: &'static str,
        found: &'static str,
        line: usize,
    },

    /// Two handlers registered under the same label.
    #[error("command \"{label}\" is already registered; cannot overwrite")]
    DuplicateCommand { label: String },

    /// A handler failed in `preflight` or `execute`.
    #[error("command \"{command}\" failed on line {line}: {message}")]
    Command {
        command: String,
        message: String,
        line: usize,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_messages_carry_lines() {
        let err = SyntaxError::Expected {
            expected: "')' after expression",
            found: "'{'".into(),
            line: 7,
        };
        let text = err.to_string();
        assert!(text.contains("')' after expression"), "got: {text}");
        assert!(text.contains("line 7"), "got: {text}");
    }

    #[test]
    fn runtime_error_names_operator_and_operands() {
        let err = RuntimeError::UnsupportedBinary {
            op: BinOp::Mul,
            left: "array",
            right: "string literal",
            line: 3,
        };
        let text = err.to_string();
        assert!(text.contains("multiply"), "got: {text}");
        assert!(text.contains("array"), "got: {text}");
        assert!(text.contains("string literal"), "got: {text}");
        assert!(text.contains("line 3"), "got: {text}");
    }

    #[test]
    fn redeclaration_names_both_lines() {
        let err = RuntimeError::Redeclaration {
            name: "x".into(),
            line: 9,
            original_line: 2,
        };
        let text = err.to_string();
        assert!(text.contains("line 9") && text.contains("line 2"), "got: {text}");
    }
}
