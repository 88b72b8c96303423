//! The tree-walking evaluator.
//!
//! One [`Evaluator`] instance runs one script against one drawing surface.
//! The scope tables, the procedure table and the command registry are all
//! private to the instance — concurrent script execution needs one
//! evaluator per run.
//!
//! Evaluation is single-threaded, synchronous and depth-first; recursion
//! depth is bounded only by block/procedure nesting in the script, so an
//! unboundedly recursive procedure can exhaust the host stack. A run either
//! completes or stops at the first fatal [`RuntimeError`]; side effects
//! performed up to that point remain.
//!
//! A [`Yield`] value is threaded through every block-running call so that a
//! `return` inside nested blocks and loops travels up to the nearest
//! procedure call (which absorbs it) without any exception machinery.

mod reduce;
mod scope;

use std::collections::HashMap;

use log::debug;
use ripple_graphics::Surface;

use crate::ast::{Block, BlockRole, Expr, ExprKind, Script, ScopeId, VarMode};
use crate::command::{validate_arguments, CommandArgs, CommandRegistry};
use crate::error::RuntimeError;

pub use scope::{Scopes, Symbol};

// ---------------------------------------------------------------------------
// Yield kind
// ---------------------------------------------------------------------------

/// The result of running a node or block: an ordinary expression value, or
/// a `return` value propagating toward the nearest procedure call.
#[derive(Debug, Clone, PartialEq)]
pub enum Yield {
    Expression(Expr),
    Return(Expr),
}

impl Yield {
    /// The carried value, regardless of kind.
    #[must_use]
    pub fn into_value(self) -> Expr {
        match self {
            Self::Expression(value) | Self::Return(value) => value,
        }
    }
}

/// A defined procedure: its body block and the defining line.
#[derive(Debug, Clone)]
struct Procedure {
    body: Block,
    line: usize,
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// The Ripple evaluator.
pub struct Evaluator<'a> {
    registry: CommandRegistry,
    surface: &'a mut Surface,
    scopes: Scopes,
    procedures: HashMap<String, Procedure>,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over a registry and the driver-owned surface.
    pub fn new(registry: CommandRegistry, surface: &'a mut Surface) -> Self {
        Self {
            registry,
            surface,
            scopes: Scopes::default(),
            procedures: HashMap::new(),
        }
    }

    /// Run a parsed script to completion or to the first fatal error.
    ///
    /// A top-level `return` stops the script; its value is discarded.
    pub fn run(&mut self, script: &Script) -> Result<(), RuntimeError> {
        debug!(
            "running script: {} top-level nodes, {} scopes",
            script.root.nodes.len(),
            script.scope_parents.len()
        );
        self.scopes = Scopes::new(script.scope_parents.clone());
        self.procedures.clear();

        let _ = self.run_block(&script.root)?;
        Ok(())
    }

    // =======================================================================
    // Blocks and statements
    // =======================================================================

    /// Activate a block's scope and run its nodes.
    fn run_block(&mut self, block: &Block) -> Result<Yield, RuntimeError> {
        self.scopes.activate(block.scope);
        self.run_statements(block)
    }

    /// Run a block's nodes in an already-activated scope.
    fn run_statements(&mut self, block: &Block) -> Result<Yield, RuntimeError> {
        for node in &block.nodes {
            if let Yield::Return(value) = self.exec_node(node, block.scope)? {
                return Ok(Yield::Return(value));
            }
        }

        match block.role {
            BlockRole::Expression => Err(RuntimeError::MissingReturn { line: block.line }),
            _ => Ok(Yield::Expression(Expr::number(0.0, block.line))),
        }
    }

    /// Central dispatch for one statement.
    fn exec_node(&mut self, node: &Expr, scope: ScopeId) -> Result<Yield, RuntimeError> {
        if let ExprKind::Return(inner) = &node.kind {
            let value = self.eval_value(inner, scope)?;
            return Ok(Yield::Return(value));
        }
        self.process_expression(node, scope)
    }

    /// Evaluate any expression node, yielding either kind.
    pub(crate) fn process_expression(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
    ) -> Result<Yield, RuntimeError> {
        match &expr.kind {
            ExprKind::FnCall { name } => Ok(Yield::Expression(
                self.call_procedure(name, expr.line)?,
            )),
            ExprKind::Block(block) => self.run_block(block),
            ExprKind::Repeat { count, var, body } => {
                self.run_repeat(count, var, body, expr.line, scope)
            }
            ExprKind::VarOp {
                name,
                value,
                mode,
                strict,
            } => Ok(Yield::Expression(self.assign(
                name, value, *mode, *strict, expr.line, scope,
            )?)),
            ExprKind::FnDef { name, body } => {
                self.define_procedure(name, body, expr.line, scope)?;
                Ok(Yield::Expression(Expr::number(0.0, expr.line)))
            }
            ExprKind::Command { label, args } => {
                self.run_command(label, args, expr.line, scope)?;
                Ok(Yield::Expression(Expr::number(0.0, expr.line)))
            }
            ExprKind::Return(_) => Err(RuntimeError::ReturnInExpression { line: expr.line }),
            _ => Ok(Yield::Expression(self.atomic(expr, scope)?)),
        }
    }

    /// Evaluate an expression down to its value, whichever way it yields.
    fn eval_value(&mut self, expr: &Expr, scope: ScopeId) -> Result<Expr, RuntimeError> {
        Ok(self.process_expression(expr, scope)?.into_value())
    }

    // =======================================================================
    // Variable operations
    // =======================================================================

    /// Execute a declaration or mutation, returning the bound value.
    fn assign(
        &mut self,
        name: &str,
        value: &Expr,
        mode: VarMode,
        strict: bool,
        line: usize,
        scope: ScopeId,
    ) -> Result<Expr, RuntimeError> {
        let previous = self
            .scopes
            .lookup(scope, name)
            .map(|(symbol, _)| (symbol.line(), symbol.is_variable()));

        match (mode, previous) {
            (VarMode::Declare, Some((original_line, _))) => {
                return Err(RuntimeError::Redeclaration {
                    name: name.to_owned(),
                    line,
                    original_line,
                });
            }
            (VarMode::Mutate, None) => {
                return Err(RuntimeError::MutateUndeclared {
                    name: name.to_owned(),
                    line,
                });
            }
            (VarMode::Mutate, Some((_, false))) => {
                return Err(RuntimeError::NotAVariable {
                    name: name.to_owned(),
                    line,
                });
            }
            _ => {}
        }

        // The right-hand side is probed to full atomic form even for lazy
        // bindings, so undefined references and array values fail here.
        let probe = self.eval_value(value, scope)?;

        if !strict && matches!(probe.kind, ExprKind::Array { .. }) {
            return Err(RuntimeError::LazyArrayBinding {
                name: name.to_owned(),
                line,
            });
        }

        let stored = if strict { probe.clone() } else { value.clone() };
        self.scopes.insert(
            scope,
            name.to_owned(),
            Symbol::Variable {
                value: stored,
                strict,
                line,
            },
        );

        Ok(probe)
    }

    // =======================================================================
    // Procedures
    // =======================================================================

    fn define_procedure(
        &mut self,
        name: &str,
        body: &Block,
        line: usize,
        scope: ScopeId,
    ) -> Result<(), RuntimeError> {
        if let Some(existing) = self.procedures.get(name) {
            return Err(RuntimeError::FunctionRedefinition {
                name: name.to_owned(),
                line,
                original_line: existing.line,
            });
        }
        if let Some((symbol, _)) = self.scopes.lookup(scope, name) {
            return Err(RuntimeError::Redeclaration {
                name: name.to_owned(),
                line,
                original_line: symbol.line(),
            });
        }

        debug!("defining procedure {name:?} (line {line})");
        self.procedures.insert(
            name.to_owned(),
            Procedure {
                body: body.clone(),
                line,
            },
        );
        self.scopes
            .insert(scope, name.to_owned(), Symbol::Procedure { line });
        Ok(())
    }

    /// Run a procedure body from scratch: fresh scope activation, no
    /// parameters, no captured state. A `return` in the body is absorbed
    /// here; a body that never returns yields literal `0`.
    fn call_procedure(&mut self, name: &str, line: usize) -> Result<Expr, RuntimeError> {
        let Some(procedure) = self.procedures.get(name).cloned() else {
            return Err(RuntimeError::UnknownFunction {
                name: name.to_owned(),
                line,
            });
        };

        debug!("calling procedure {name:?} (line {line})");
        Ok(self.run_block(&procedure.body)?.into_value())
    }

    // =======================================================================
    // Repeat loops
    // =======================================================================

    /// Run a repeat loop. The counter is declared strictly in the body's own
    /// scope on every iteration, bound to the 0-based index; a `Return`
    /// yield stops the loop immediately and propagates.
    fn run_repeat(
        &mut self,
        count: &Expr,
        var: &str,
        body: &Block,
        line: usize,
        scope: ScopeId,
    ) -> Result<Yield, RuntimeError> {
        let count_value = self.eval_value(count, scope)?;
        let Some(target) = count_value.as_number() else {
            return Err(RuntimeError::InvalidRepeatCount {
                found: count_value.kind_name().to_owned(),
                line,
            });
        };
        if target < 0.0 {
            return Err(RuntimeError::InvalidRepeatCount {
                found: target.to_string(),
                line,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let iterations = target.trunc() as u64;

        for index in 0..iterations {
            #[allow(clippy::cast_precision_loss)]
            let counter = index as f64;

            self.scopes.activate(body.scope);
            self.scopes.insert(
                body.scope,
                var.to_owned(),
                Symbol::Variable {
                    value: Expr::number(counter, line),
                    strict: true,
                    line,
                },
            );

            if let Yield::Return(value) = self.run_statements(body)? {
                return Ok(Yield::Return(value));
            }
        }

        Ok(Yield::Expression(Expr::number(0.0, line)))
    }

    // =======================================================================
    // Commands
    // =======================================================================

    /// Dispatch a command: reduce every argument to atomic form, resolve the
    /// handler, check its argument contract, then preflight and execute.
    fn run_command(
        &mut self,
        label: &str,
        args: &[(String, Expr)],
        line: usize,
        scope: ScopeId,
    ) -> Result<(), RuntimeError> {
        debug!("dispatching command {label:?} (line {line})");

        let mut atomic_args = CommandArgs::new();
        for (arg_label, value) in args {
            let reduced = self.eval_value(value, scope)?;
            let reduced = self.atomic(&reduced, scope)?;
            atomic_args.insert(arg_label.clone(), reduced);
        }

        let Some(handler) = self.registry.get_mut(label) else {
            return Err(RuntimeError::UnknownCommand {
                label: label.to_owned(),
                line,
            });
        };

        let spec = handler.arg_spec();
        validate_arguments(label, line, &atomic_args, &spec)?;
        handler.preflight(&atomic_args, line)?;
        handler.execute(&atomic_args, self.surface, line)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgKind, ArgSpec, CommandHandler};
    use crate::parser::parse;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Handler that records the atomic `default` argument of every call.
    struct EmitHandler {
        seen: Rc<RefCell<Vec<Expr>>>,
    }

    impl CommandHandler for EmitHandler {
        fn label(&self) -> &'static str {
            "emit"
        }

        fn arg_spec(&self) -> Vec<ArgSpec> {
            vec![ArgSpec::required("default", ArgKind::Any)]
        }

        fn execute(
            &mut self,
            args: &CommandArgs,
            _surface: &mut Surface,
            _line: usize,
        ) -> Result<(), RuntimeError> {
            if let Some(value) = args.get("default") {
                self.seen.borrow_mut().push(value.clone());
            }
            Ok(())
        }
    }

    fn run_and_collect(source: &str) -> Result<Vec<Expr>, RuntimeError> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CommandRegistry::new();
        registry
            .register(Box::new(EmitHandler { seen: Rc::clone(&seen) }))
            .unwrap();

        let script = parse(source).expect("test source must parse");
        let mut surface = Surface::new();
        Evaluator::new(registry, &mut surface).run(&script)?;

        let collected = seen.borrow().clone();
        Ok(collected)
    }

    fn emitted_numbers(source: &str) -> Vec<f64> {
        run_and_collect(source)
            .unwrap()
            .iter()
            .map(|e| e.as_number().expect("expected a number"))
            .collect()
    }

    // -- variables and scoping --

    #[test]
    fn declared_values_are_visible() {
        assert_eq!(emitted_numbers("decl x = 41 builtin emit $x + 1"), vec![42.0]);
    }

    #[test]
    fn redeclaration_in_the_same_chain_fails() {
        let err = run_and_collect("decl x = 1 decl x = 2").unwrap_err();
        assert!(
            matches!(err, RuntimeError::Redeclaration { ref name, original_line: 1, .. } if name == "x"),
            "got {err:?}"
        );
    }

    #[test]
    fn redeclaration_from_an_inner_block_fails() {
        let err = run_and_collect("decl x = 1 : { decl x = 2 }").unwrap_err();
        assert!(matches!(err, RuntimeError::Redeclaration { .. }), "got {err:?}");
    }

    #[test]
    fn mutation_requires_a_declaration() {
        let err = run_and_collect("mut y = 1").unwrap_err();
        assert!(matches!(err, RuntimeError::MutateUndeclared { .. }), "got {err:?}");
    }

    #[test]
    fn mutation_of_a_procedure_fails() {
        let err = run_and_collect("proc f { return 1 } mut f = 2").unwrap_err();
        assert!(matches!(err, RuntimeError::NotAVariable { .. }), "got {err:?}");
    }

    #[test]
    fn mutation_updates_the_value() {
        assert_eq!(
            emitted_numbers("decl x = 1 mut x = $x + 10 builtin emit $x"),
            vec![11.0]
        );
    }

    #[test]
    fn lazy_bindings_see_later_mutations() {
        // `a` stores the raw expression and re-reduces on each reference.
        assert_eq!(
            emitted_numbers(
                "decl b = 1 decl a = $b + 1 builtin emit $a mut b = 10 builtin emit $a"
            ),
            vec![2.0, 11.0]
        );
    }

    #[test]
    fn instant_bindings_freeze_their_value() {
        assert_eq!(
            emitted_numbers(
                "decl b = 1 decl instant a = $b + 1 builtin emit $a mut b = 10 builtin emit $a"
            ),
            vec![2.0, 2.0]
        );
    }

    #[test]
    fn lazy_array_bindings_are_rejected() {
        let err = run_and_collect("decl a = [1, 2, 3]").unwrap_err();
        assert!(matches!(err, RuntimeError::LazyArrayBinding { .. }), "got {err:?}");
        // The strict form is fine.
        run_and_collect("decl instant a = [1, 2, 3]").unwrap();
    }

    #[test]
    fn undefined_variable_reference_fails() {
        let err = run_and_collect("builtin emit $nope").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownVariable { .. }), "got {err:?}");
    }

    // -- blocks --

    #[test]
    fn expression_block_must_return() {
        let err = run_and_collect("decl x = { decl y = 1 }").unwrap_err();
        assert!(matches!(err, RuntimeError::MissingReturn { .. }), "got {err:?}");
    }

    #[test]
    fn expression_block_yields_its_return_value() {
        assert_eq!(
            emitted_numbers("decl instant x = { return 2 + 3 } builtin emit $x"),
            vec![5.0]
        );
    }

    #[test]
    fn statement_block_needs_no_return() {
        assert_eq!(
            emitted_numbers(": { builtin emit 1 } builtin emit 2"),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn block_scope_is_cleared_between_activations() {
        // The same block declares `x` on both activations; if the scope
        // were not cleared, the second pass would be a redeclaration.
        assert_eq!(
            emitted_numbers("repeat i --> 2 { decl x = $i builtin emit $x }"),
            vec![0.0, 1.0]
        );
    }

    // -- procedures --

    #[test]
    fn procedure_call_yields_the_return_value() {
        assert_eq!(
            emitted_numbers("proc five { return 5 } builtin emit run five"),
            vec![5.0]
        );
    }

    #[test]
    fn non_returning_procedure_yields_zero() {
        assert_eq!(
            emitted_numbers("proc noop { decl x = 1 } builtin emit run noop"),
            vec![0.0]
        );
    }

    #[test]
    fn call_before_definition_fails() {
        let err = run_and_collect("run missing").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownFunction { .. }), "got {err:?}");
    }

    #[test]
    fn procedure_redefinition_names_the_original_line() {
        let err = run_and_collect("proc f { return 1 }\nproc f { return 2 }").unwrap_err();
        assert!(
            matches!(
                err,
                RuntimeError::FunctionRedefinition { original_line: 1, line: 2, .. }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn return_is_absorbed_by_the_nearest_call() {
        // The inner procedure's return must not propagate out of the outer
        // procedure's body.
        assert_eq!(
            emitted_numbers(
                "proc inner { return 1 } \
                 proc outer { decl x = run inner builtin emit $x return $x + 1 } \
                 builtin emit run outer"
            ),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn procedure_scope_is_fresh_per_call() {
        assert_eq!(
            emitted_numbers(
                "proc f { decl x = 1 return $x } builtin emit run f builtin emit run f"
            ),
            vec![1.0, 1.0]
        );
    }

    // -- repeat loops --

    #[test]
    fn repeat_binds_the_counter_in_order() {
        assert_eq!(
            emitted_numbers("repeat i --> 3 { builtin emit $i }"),
            vec![0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn repeat_zero_times_runs_nothing() {
        assert_eq!(emitted_numbers("repeat i --> 0 { builtin emit $i }"), Vec::<f64>::new());
    }

    #[test]
    fn repeat_count_may_be_an_expression() {
        assert_eq!(
            emitted_numbers("decl n = 2 repeat i --> $n + 1 { builtin emit $i }"),
            vec![0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn negative_repeat_count_fails() {
        let err = run_and_collect("repeat i --> 0 - 1 { builtin emit $i }").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidRepeatCount { .. }), "got {err:?}");
    }

    #[test]
    fn non_numeric_repeat_count_fails() {
        let err = run_and_collect("repeat i --> \"three\" { builtin emit $i }").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidRepeatCount { .. }), "got {err:?}");
    }

    #[test]
    fn return_stops_the_loop_and_propagates() {
        // Returns on iteration 1; iterations 2+ never run, and the value
        // propagates out of the enclosing procedure.
        assert_eq!(
            emitted_numbers(
                "proc f { repeat i --> 5 { builtin emit $i \
                 : { decl stop = $i } return $i * 10 } return 99 } \
                 builtin emit run f"
            ),
            vec![0.0, 0.0]
        );
    }

    // -- top level --

    #[test]
    fn top_level_return_stops_the_script() {
        assert_eq!(
            emitted_numbers("builtin emit 1 return 0 builtin emit 2"),
            vec![1.0]
        );
    }

    // -- commands --

    #[test]
    fn unknown_command_fails() {
        let err = run_and_collect("builtin bogus 1").unwrap_err();
        assert!(
            matches!(err, RuntimeError::UnknownCommand { ref label, .. } if label == "bogus"),
            "got {err:?}"
        );
    }

    #[test]
    fn command_arguments_arrive_atomic() {
        let values = run_and_collect("decl x = 4 builtin emit [$x, $x * 2]").unwrap();
        let ExprKind::Array { ref elems, .. } = values[0].kind else {
            panic!("expected an array argument, got {:?}", values[0]);
        };
        let numbers: Vec<f64> = elems.iter().map(|e| e.as_number().unwrap()).collect();
        assert_eq!(numbers, vec![4.0, 8.0]);
    }

    #[test]
    fn missing_required_argument_fails() {
        let err = run_and_collect("builtin emit").unwrap_err();
        assert!(matches!(err, RuntimeError::MissingArgument { .. }), "got {err:?}");
    }

    #[test]
    fn unexpected_argument_fails() {
        let err = run_and_collect("builtin emit bogus: 1").unwrap_err();
        assert!(matches!(err, RuntimeError::UnexpectedArgument { .. }), "got {err:?}");
    }
}
