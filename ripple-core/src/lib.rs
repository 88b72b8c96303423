//! Ripple language core: scanner, parser and tree-walking evaluator.
//!
//! Ripple is a small embeddable scripting language whose programs describe
//! step-by-step drawing instructions, evaluated against a
//! [`Surface`](ripple_graphics::Surface) owned by the embedding driver.
//! The pipeline is: source text → [`scanner`] → [`parser`] → AST (with
//! lexically scoped blocks) → [`eval::Evaluator`], which reduces expressions
//! and forwards fully-reduced command arguments to the handlers registered
//! in a [`command::CommandRegistry`].
//!
//! The drawing primitives themselves live outside this crate; the core only
//! defines the handler contract and the registry.

pub mod ast;
pub mod command;
pub mod error;
pub mod eval;
pub mod parser;
pub mod scanner;
pub mod token;

pub use ast::Script;
pub use command::{ArgKind, ArgSpec, CommandArgs, CommandHandler, CommandRegistry, Presence};
pub use error::{RuntimeError, SyntaxError};
pub use eval::Evaluator;
pub use parser::parse;
