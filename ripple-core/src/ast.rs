//! The Ripple syntax tree.
//!
//! Every syntactic construct is one variant of [`ExprKind`]; each node
//! carries the source line it started on. Blocks double as the unit of
//! lexical scoping: the parser assigns every block a dense [`ScopeId`] and
//! records each scope's lexical parent in the [`Script`], while the symbol
//! tables themselves are owned by the evaluator (they are cleared on every
//! activation, so they are runtime state, not tree state).
//!
//! Nodes are fully constructed in one step — a block's role and an array's
//! element-kind tag are never patched in after the fact. Reduced arrays are
//! rebuilt with their tag set.

use std::fmt;

// ---------------------------------------------------------------------------
// Scopes and literals
// ---------------------------------------------------------------------------

/// Index of a lexical scope, assigned densely by the parser.
pub type ScopeId = usize;

/// The two literal kinds, used as the array homogeneity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Number,
    String,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Number(f64),
    Str(String),
}

impl Lit {
    /// The kind tag of this literal.
    #[must_use]
    pub const fn kind(&self) -> LitKind {
        match self {
            Self::Number(_) => LitKind::Number,
            Self::Str(_) => LitKind::String,
        }
    }

    /// Textual form used by string concatenation and `print`.
    ///
    /// Numbers render through `f64`'s `Display` (`5`, not `5.0`).
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Binary operators. `Index` is the `@` evaluate-at operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Power,
    Index,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::Sub => "subtract",
            Self::Mul => "multiply",
            Self::Div => "divide",
            Self::Power => "power",
            Self::Index => "evaluate-at",
        };
        write!(f, "{name}")
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// `|expr|`: absolute value, string length, or Euclidean norm.
    Magnitude,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Magnitude => write!(f, "magnitude"),
        }
    }
}

/// Whether a variable operation declares a new binding or mutates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarMode {
    Declare,
    Mutate,
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// What holds a block, fixed at parse time.
///
/// The role decides whether the block must yield a `return` value when it
/// runs: blocks in expression position must, all other roles may complete
/// without one (loops keep iterating, a non-returning procedure call
/// evaluates to literal `0`, statement blocks discard their value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
    /// Body of a `proc` definition.
    Procedure,
    /// Body of a `repeat` loop.
    Loop,
    /// Free-standing `: { ... }` statement block (no holder).
    Statement,
    /// `{ ... }` used in expression position; must yield a value.
    Expression,
}

/// A sequence of nodes that is simultaneously a lexical scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements/expressions in source order.
    pub nodes: Vec<Expr>,
    /// This block's scope.
    pub scope: ScopeId,
    /// The holder role, fixed at construction.
    pub role: BlockRole,
    /// Line of the opening brace.
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// A syntax-tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Source line the node started on.
    pub line: usize,
}

/// The tagged variants of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A number or string literal.
    Literal(Lit),
    /// `[a, b, c]`. `elem_kind` is `None` on freshly parsed arrays and on
    /// empty arrays; reduction rebuilds the node with the tag of its
    /// (homogeneous) elements.
    Array {
        elems: Vec<Expr>,
        elem_kind: Option<LitKind>,
    },
    /// `$name`.
    VarRef(String),
    /// A binary operation.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A unary operation.
    Unary { op: UnOp, operand: Box<Expr> },
    /// Deferred exponentiation, produced by reducing a `Binary` power node;
    /// resolves once both sides reduce to number literals.
    Power { base: Box<Expr>, exponent: Box<Expr> },
    /// `from -> to`; both endpoints must be the same node variant.
    Interpolation { from: Box<Expr>, to: Box<Expr> },
    /// A block (in any role).
    Block(Block),
    /// `proc name { ... }`.
    FnDef { name: String, body: Block },
    /// `run name`.
    FnCall { name: String },
    /// `decl`/`mut` with optional `instant` strictness.
    VarOp {
        name: String,
        value: Box<Expr>,
        mode: VarMode,
        strict: bool,
    },
    /// `repeat var --> count { ... }`.
    Repeat {
        count: Box<Expr>,
        var: String,
        body: Block,
    },
    /// `builtin label <args>`; argument order is preserved, `"default"` is
    /// the reserved label for a single unlabeled argument.
    Command {
        label: String,
        args: Vec<(String, Expr)>,
    },
    /// `return expr`.
    Return(Box<Expr>),
}

impl Expr {
    /// A number literal node.
    #[must_use]
    pub const fn number(value: f64, line: usize) -> Self {
        Self {
            kind: ExprKind::Literal(Lit::Number(value)),
            line,
        }
    }

    /// A string literal node.
    #[must_use]
    pub fn string(value: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ExprKind::Literal(Lit::Str(value.into())),
            line,
        }
    }

    /// The number carried by a number-literal node.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Literal(Lit::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// The text carried by a string-literal node.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Literal(Lit::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Coarse variant name: both literal kinds answer "literal". Used for
    /// the interpolation same-variant checks.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Array { .. } => "array",
            ExprKind::VarRef(_) => "variable reference",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Power { .. } => "exponentiation",
            ExprKind::Interpolation { .. } => "interpolation",
            ExprKind::Block(_) => "block",
            ExprKind::FnDef { .. } => "procedure definition",
            ExprKind::FnCall { .. } => "procedure call",
            ExprKind::VarOp { .. } => "variable operation",
            ExprKind::Repeat { .. } => "repeat loop",
            ExprKind::Command { .. } => "command",
            ExprKind::Return(_) => "return",
        }
    }

    /// Fine-grained kind name for operand diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(Lit::Number(_)) => "number literal",
            ExprKind::Literal(Lit::Str(_)) => "string literal",
            _ => self.variant_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// A parsed script: the root statement block plus the scope-parent table
/// the evaluator sizes its symbol storage from.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Top-level nodes, held in a root block with role [`BlockRole::Statement`].
    pub root: Block,
    /// Lexical parent of each scope, indexed by [`ScopeId`].
    pub scope_parents: Vec<Option<ScopeId>>,
}

impl Script {
    /// Render the tree as an indented dump, one node per line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for node in &self.root.nodes {
            node.write_tree(&mut out, 0);
        }
        out
    }
}

impl Expr {
    fn write_tree(&self, out: &mut String, indent: usize) {
        use std::fmt::Write;

        let pad = "    ".repeat(indent);
        match &self.kind {
            ExprKind::Literal(lit) => {
                let _ = writeln!(out, "{pad}Literal \"{}\"", lit.to_text());
            }
            ExprKind::Array { elems, .. } => {
                let _ = writeln!(out, "{pad}Array:");
                for elem in elems {
                    elem.write_tree(out, indent + 1);
                }
            }
            ExprKind::VarRef(name) => {
                let _ = writeln!(out, "{pad}Variable: {name}");
            }
            ExprKind::Binary { op, left, right } => {
                let _ = writeln!(out, "{pad}Binary operation ({op}):");
                left.write_tree(out, indent + 1);
                right.write_tree(out, indent + 1);
            }
            ExprKind::Unary { op, operand } => {
                let _ = writeln!(out, "{pad}Unary operation ({op}):");
                operand.write_tree(out, indent + 1);
            }
            ExprKind::Power { base, exponent } => {
                let _ = writeln!(out, "{pad}Power:");
                base.write_tree(out, indent + 1);
                exponent.write_tree(out, indent + 1);
            }
            ExprKind::Interpolation { from, to } => {
                let _ = writeln!(out, "{pad}Interpolation:");
                from.write_tree(out, indent + 1);
                to.write_tree(out, indent + 1);
            }
            ExprKind::Block(block) => {
                let _ = writeln!(out, "{pad}Block ({:?}):", block.role);
                for node in &block.nodes {
                    node.write_tree(out, indent + 1);
                }
            }
            ExprKind::FnDef { name, body } => {
                let _ = writeln!(out, "{pad}Procedure definition ({name}):");
                for node in &body.nodes {
                    node.write_tree(out, indent + 1);
                }
            }
            ExprKind::FnCall { name } => {
                let _ = writeln!(out, "{pad}Procedure call ({name})");
            }
            ExprKind::VarOp {
                name, value, mode, ..
            } => {
                let _ = writeln!(out, "{pad}Variable operation {mode:?} \"{name}\":");
                value.write_tree(out, indent + 1);
            }
            ExprKind::Repeat { count, var, body } => {
                let _ = writeln!(out, "{pad}Repeat ({var}):");
                count.write_tree(out, indent + 1);
                for node in &body.nodes {
                    node.write_tree(out, indent + 1);
                }
            }
            ExprKind::Command { label, args } => {
                let _ = writeln!(out, "{pad}Command \"{label}\":");
                for (arg_label, value) in args {
                    let _ = writeln!(out, "{pad}    {arg_label}:");
                    value.write_tree(out, indent + 2);
                }
            }
            ExprKind::Return(inner) => {
                let _ = writeln!(out, "{pad}Return:");
                inner.write_tree(out, indent + 1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_text_forms() {
        assert_eq!(Lit::Number(5.0).to_text(), "5");
        assert_eq!(Lit::Number(2.5).to_text(), "2.5");
        assert_eq!(Lit::Str("abc".into()).to_text(), "abc");
    }

    #[test]
    fn variant_names_merge_literal_kinds() {
        let number = Expr::number(1.0, 1);
        let string = Expr::string("a", 1);
        assert_eq!(number.variant_name(), string.variant_name());
        assert_ne!(number.kind_name(), string.kind_name());
    }

    #[test]
    fn accessors() {
        assert_eq!(Expr::number(3.0, 1).as_number(), Some(3.0));
        assert_eq!(Expr::number(3.0, 1).as_str(), None);
        assert_eq!(Expr::string("x", 1).as_str(), Some("x"));
    }

    #[test]
    fn dump_renders_nested_nodes() {
        let script = Script {
            root: Block {
                nodes: vec![Expr {
                    kind: ExprKind::Binary {
                        op: BinOp::Add,
                        left: Box::new(Expr::number(1.0, 1)),
                        right: Box::new(Expr::number(2.0, 1)),
                    },
                    line: 1,
                }],
                scope: 0,
                role: BlockRole::Statement,
                line: 1,
            },
            scope_parents: vec![None],
        };
        let dump = script.dump();
        assert!(dump.contains("Binary operation (add)"), "got: {dump}");
        assert!(dump.contains("Literal \"1\""), "got: {dump}");
    }
}
