//! Symbol storage for the evaluator.
//!
//! The parser assigns every block a dense [`ScopeId`] and records its
//! lexical parent; this module owns the actual symbol tables. A block's
//! table is cleared every time the block is activated — bindings never
//! persist across activations, only the tree structure is reused. Name
//! lookup walks from the requesting scope outward through the parent chain.

use std::collections::HashMap;

use crate::ast::{Expr, ScopeId};

/// A symbol bound in a scope: either a variable binding or a procedure name.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A variable binding. `value` holds the fully-reduced value for strict
    /// (`instant`) bindings and the raw right-hand expression otherwise.
    Variable {
        value: Expr,
        strict: bool,
        line: usize,
    },
    /// A procedure name; the body lives in the evaluator's procedure table.
    Procedure { line: usize },
}

impl Symbol {
    /// The line the symbol was declared on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Variable { line, .. } | Self::Procedure { line } => *line,
        }
    }

    /// Whether the symbol is a variable binding.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable { .. })
    }
}

/// All scope tables, indexed by [`ScopeId`].
#[derive(Debug, Default)]
pub struct Scopes {
    tables: Vec<HashMap<String, Symbol>>,
    parents: Vec<Option<ScopeId>>,
}

impl Scopes {
    /// Create storage for the given scope-parent table.
    #[must_use]
    pub fn new(parents: Vec<Option<ScopeId>>) -> Self {
        Self {
            tables: parents.iter().map(|_| HashMap::new()).collect(),
            parents,
        }
    }

    /// Clear a scope's table; called on every activation of its block.
    pub fn activate(&mut self, scope: ScopeId) {
        if let Some(table) = self.tables.get_mut(scope) {
            table.clear();
        }
    }

    /// Bind a name in the given scope, replacing any binding already there.
    pub fn insert(&mut self, scope: ScopeId, name: String, symbol: Symbol) {
        if let Some(table) = self.tables.get_mut(scope) {
            table.insert(name, symbol);
        }
    }

    /// Find a name, walking outward from `scope` through the parent chain.
    /// Returns the symbol together with the scope it was found in.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(&Symbol, ScopeId)> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(symbol) = self.tables.get(id).and_then(|t| t.get(name)) {
                return Some((symbol, id));
            }
            cursor = self.parents.get(id).copied().flatten();
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(line: usize) -> Symbol {
        Symbol::Variable {
            value: Expr::number(0.0, line),
            strict: true,
            line,
        }
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        // 0 ← 1 ← 2
        let mut scopes = Scopes::new(vec![None, Some(0), Some(1)]);
        scopes.insert(0, "x".into(), variable(1));

        let (symbol, found_in) = scopes.lookup(2, "x").unwrap();
        assert_eq!(found_in, 0);
        assert_eq!(symbol.line(), 1);
        assert!(scopes.lookup(2, "y").is_none());
    }

    #[test]
    fn inner_bindings_shadow_nothing_upward() {
        let mut scopes = Scopes::new(vec![None, Some(0)]);
        scopes.insert(1, "x".into(), variable(5));

        // Visible from the inner scope, invisible from the root.
        assert!(scopes.lookup(1, "x").is_some());
        assert!(scopes.lookup(0, "x").is_none());
    }

    #[test]
    fn activation_clears_only_that_scope() {
        let mut scopes = Scopes::new(vec![None, Some(0)]);
        scopes.insert(0, "outer".into(), variable(1));
        scopes.insert(1, "inner".into(), variable(2));

        scopes.activate(1);
        assert!(scopes.lookup(1, "inner").is_none());
        assert!(scopes.lookup(1, "outer").is_some());
    }

    #[test]
    fn procedure_symbols_are_not_variables() {
        let symbol = Symbol::Procedure { line: 3 };
        assert!(!symbol.is_variable());
        assert_eq!(symbol.line(), 3);
    }
}
