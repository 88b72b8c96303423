//! The expression-reduction algebra.
//!
//! Every expression can be `reduce`d one step toward concreteness;
//! [`Evaluator::atomic`] applies exactly two reduction passes — a
//! deliberately approximate fixed point that scripts may rely on, kept
//! as-is rather than iterating to convergence.
//!
//! Operator behavior dispatches on the *left* operand's variant through a
//! single exhaustive match, so the compiler checks coverage of every
//! (operator, variant) pair; unsupported combinations fail with an error
//! naming the operator, both operand kinds and the line.

use crate::ast::{BinOp, Expr, ExprKind, Lit, ScopeId, UnOp};
use crate::error::RuntimeError;
use crate::eval::scope::Symbol;
use crate::eval::Evaluator;

impl Evaluator<'_> {
    /// Apply the two-pass reduction rule.
    pub(crate) fn atomic(&mut self, expr: &Expr, scope: ScopeId) -> Result<Expr, RuntimeError> {
        let once = self.reduce(expr, scope)?;
        self.reduce(&once, scope)
    }

    /// Reduce an expression one step toward atomic form.
    pub(crate) fn reduce(&mut self, expr: &Expr, scope: ScopeId) -> Result<Expr, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(_) => Ok(expr.clone()),
            ExprKind::Array { elems, .. } => self.reduce_array(elems, expr.line, scope),
            ExprKind::VarRef(name) => self.reduce_var_ref(name, expr.line, scope),
            ExprKind::Binary { op, left, right } => {
                let left = self.atomic(left, scope)?;
                let right = self.atomic(right, scope)?;
                let combined = apply_binary(*op, left, right, expr.line)?;
                self.atomic(&combined, scope)
            }
            ExprKind::Unary {
                op: UnOp::Magnitude,
                operand,
            } => {
                let operand = self.atomic(operand, scope)?;
                let composed = magnitude(operand, expr.line)?;
                self.atomic(&composed, scope)
            }
            ExprKind::Power { base, exponent } => {
                let base = self.atomic(base, scope)?;
                let Some(base_value) = base.as_number() else {
                    return Err(RuntimeError::ExpectedNumber {
                        what: "the exponentiation base",
                        found: base.kind_name(),
                        line: expr.line,
                    });
                };
                let exponent = self.atomic(exponent, scope)?;
                let Some(exponent_value) = exponent.as_number() else {
                    return Err(RuntimeError::ExpectedNumber {
                        what: "the exponent",
                        found: exponent.kind_name(),
                        line: expr.line,
                    });
                };
                Ok(Expr::number(base_value.powf(exponent_value), expr.line))
            }
            ExprKind::Interpolation { from, to } => {
                let from = self.atomic(from, scope)?;
                let to = self.atomic(to, scope)?;
                if from.variant_name() != to.variant_name() {
                    return Err(RuntimeError::InterpolationKindMismatch {
                        from: from.variant_name(),
                        to: to.variant_name(),
                        line: expr.line,
                    });
                }
                Ok(Expr {
                    line: expr.line,
                    kind: ExprKind::Interpolation {
                        from: Box::new(from),
                        to: Box::new(to),
                    },
                })
            }
            // Blocks, calls, loops, definitions and commands reduce through
            // the evaluator's statement machinery.
            _ => Ok(self.process_expression(expr, scope)?.into_value()),
        }
    }

    /// Reduce every element to atomic form and validate homogeneity; the
    /// result carries its element-kind tag.
    fn reduce_array(
        &mut self,
        elems: &[Expr],
        line: usize,
        scope: ScopeId,
    ) -> Result<Expr, RuntimeError> {
        let mut reduced = Vec::with_capacity(elems.len());
        for elem in elems {
            reduced.push(self.atomic(elem, scope)?);
        }
        validate_array(reduced, line)
    }

    /// Resolve `$name`: the stored expression is re-reduced in its
    /// declaring scope (strict bindings already hold their atomic value).
    fn reduce_var_ref(
        &mut self,
        name: &str,
        line: usize,
        scope: ScopeId,
    ) -> Result<Expr, RuntimeError> {
        let (stored, declaring_scope) = match self.scopes.lookup(scope, name) {
            None => {
                return Err(RuntimeError::UnknownVariable {
                    name: name.to_owned(),
                    line,
                });
            }
            Some((Symbol::Procedure { .. }, _)) => {
                return Err(RuntimeError::NotAVariable {
                    name: name.to_owned(),
                    line,
                });
            }
            Some((Symbol::Variable { value, .. }, found_in)) => (value.clone(), found_in),
        };

        self.atomic(&stored, declaring_scope)
    }
}

// ---------------------------------------------------------------------------
// Operator dispatch
// ---------------------------------------------------------------------------

fn apply_binary(op: BinOp, left: Expr, right: Expr, line: usize) -> Result<Expr, RuntimeError> {
    let left_name = left.kind_name();
    let right_name = right.kind_name();
    let left_line = left.line;
    let right_line = right.line;

    match (op, left.kind, right.kind) {
        // The string always dominates an addition.
        (BinOp::Add, ExprKind::Literal(Lit::Str(a)), ExprKind::Literal(b)) => {
            Ok(Expr::string(format!("{a}{}", b.to_text()), line))
        }
        (BinOp::Add, ExprKind::Literal(Lit::Number(a)), ExprKind::Literal(Lit::Str(b))) => {
            Ok(Expr::string(format!("{a}{b}"), line))
        }

        // IEEE double arithmetic.
        (BinOp::Add, ExprKind::Literal(Lit::Number(a)), ExprKind::Literal(Lit::Number(b))) => {
            Ok(Expr::number(a + b, line))
        }
        (BinOp::Sub, ExprKind::Literal(Lit::Number(a)), ExprKind::Literal(Lit::Number(b))) => {
            Ok(Expr::number(a - b, line))
        }
        (BinOp::Mul, ExprKind::Literal(Lit::Number(a)), ExprKind::Literal(Lit::Number(b))) => {
            Ok(Expr::number(a * b, line))
        }
        (BinOp::Div, ExprKind::Literal(Lit::Number(a)), ExprKind::Literal(Lit::Number(b))) => {
            Ok(Expr::number(a / b, line))
        }

        // `^` builds a deferred node that resolves on its own reduction.
        (
            BinOp::Power,
            base @ ExprKind::Literal(Lit::Number(_)),
            exponent @ ExprKind::Literal(Lit::Number(_)),
        ) => Ok(Expr {
            line,
            kind: ExprKind::Power {
                base: Box::new(Expr {
                    kind: base,
                    line: left_line,
                }),
                exponent: Box::new(Expr {
                    kind: exponent,
                    line: right_line,
                }),
            },
        }),

        // Element-wise array arithmetic; lengths must agree.
        (
            BinOp::Add | BinOp::Sub,
            ExprKind::Array { elems: left_elems, .. },
            ExprKind::Array {
                elems: right_elems, ..
            },
        ) => {
            if left_elems.len() != right_elems.len() {
                return Err(RuntimeError::ArrayLengthMismatch {
                    op,
                    left_len: left_elems.len(),
                    right_len: right_elems.len(),
                    line,
                });
            }
            let elems = left_elems
                .into_iter()
                .zip(right_elems)
                .map(|(a, b)| Expr {
                    line,
                    kind: ExprKind::Binary {
                        op,
                        left: Box::new(a),
                        right: Box::new(b),
                    },
                })
                .collect();
            Ok(Expr {
                line,
                kind: ExprKind::Array {
                    elems,
                    elem_kind: None,
                },
            })
        }

        // Array indexing with `@`.
        (BinOp::Index, ExprKind::Array { elems, .. }, index) => {
            array_index(elems, &index, right_name, line)
        }

        (_, _, _) => Err(RuntimeError::UnsupportedBinary {
            op,
            left: left_name,
            right: right_name,
            line,
        }),
    }
}

fn array_index(
    elems: Vec<Expr>,
    index: &ExprKind,
    index_name: &'static str,
    line: usize,
) -> Result<Expr, RuntimeError> {
    let ExprKind::Literal(Lit::Number(position)) = index else {
        return Err(RuntimeError::ExpectedNumber {
            what: "the evaluation point",
            found: index_name,
            line,
        });
    };

    let len = elems.len();
    #[allow(clippy::cast_possible_truncation)]
    let position = position.trunc() as i64;
    #[allow(clippy::cast_possible_wrap)]
    if position < 0 || position >= len as i64 {
        return Err(RuntimeError::IndexOutOfRange {
            index: position,
            len,
            line,
        });
    }

    #[allow(clippy::cast_sign_loss)]
    let offset = position as usize;
    match elems.into_iter().nth(offset) {
        Some(element) => Ok(element),
        None => Err(RuntimeError::IndexOutOfRange {
            index: position,
            len,
            line,
        }),
    }
}

/// The magnitude operator: absolute value, character count, or the
/// Euclidean norm of an array, built compositionally as `(Σ xᵢ^2)^(1/2)`
/// and resolved by reduction.
fn magnitude(value: Expr, line: usize) -> Result<Expr, RuntimeError> {
    let value_name = value.kind_name();

    match value.kind {
        #[allow(clippy::cast_precision_loss)]
        ExprKind::Literal(Lit::Str(s)) => Ok(Expr::number(s.chars().count() as f64, line)),
        ExprKind::Literal(Lit::Number(n)) => Ok(Expr::number(n.abs(), line)),
        ExprKind::Array { elems, .. } => {
            let mut iter = elems.into_iter();
            let Some(first) = iter.next() else {
                return Ok(Expr::number(0.0, line));
            };

            let mut sum = square(first, line);
            for elem in iter {
                sum = Expr {
                    line,
                    kind: ExprKind::Binary {
                        op: BinOp::Add,
                        left: Box::new(sum),
                        right: Box::new(square(elem, line)),
                    },
                };
            }

            Ok(Expr {
                line,
                kind: ExprKind::Power {
                    base: Box::new(sum),
                    exponent: Box::new(Expr::number(0.5, line)),
                },
            })
        }
        _ => Err(RuntimeError::UnsupportedUnary {
            op: UnOp::Magnitude,
            operand: value_name,
            line,
        }),
    }
}

fn square(expr: Expr, line: usize) -> Expr {
    Expr {
        line,
        kind: ExprKind::Power {
            base: Box::new(expr),
            exponent: Box::new(Expr::number(2.0, line)),
        },
    }
}

/// Check homogeneity of reduced elements and tag the array.
fn validate_array(elems: Vec<Expr>, line: usize) -> Result<Expr, RuntimeError> {
    let mut elem_kind = None;
    for (index, elem) in elems.iter().enumerate() {
        let ExprKind::Literal(lit) = &elem.kind else {
            return Err(RuntimeError::ArrayElementNotAtomic { index, line });
        };
        match elem_kind {
            None => elem_kind = Some(lit.kind()),
            Some(kind) if kind != lit.kind() => {
                return Err(RuntimeError::HeterogeneousArray { line });
            }
            _ => {}
        }
    }

    Ok(Expr {
        line,
        kind: ExprKind::Array { elems, elem_kind },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
