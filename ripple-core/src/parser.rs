//! Recursive-descent parser for Ripple.
//!
//! The parser holds the `current` token plus one token of lookahead and
//! builds the tree in a single pass; the first unexpected token aborts the
//! whole parse with a [`SyntaxError`] — there is no error recovery and no
//! partial tree.
//!
//! Operator precedence, lowest to highest:
//!
//! ```text
//! expression := simpleExpr ('->' simpleExpr)?
//! simpleExpr := mulExpr (('+' | '-') mulExpr)*
//! mulExpr    := atom (('*' | '/' | '^' | '@') atom)*
//! ```
//!
//! Every block the parser builds receives a dense [`ScopeId`] with its
//! lexical parent recorded in the resulting [`Script`].

use crate::ast::{
    BinOp, Block, BlockRole, Expr, ExprKind, Script, ScopeId, UnOp, VarMode,
};
use crate::error::SyntaxError;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Keywords that introduce an expression atom.
const KEYWORDS: &[&str] = &["decl", "mut", "run", "repeat", "builtin", "proc", "return"];

/// Parse a full script from source text.
pub fn parse(source: &str) -> Result<Script, SyntaxError> {
    Parser::new(source)?.parse_script()
}

/// The recursive-descent parser.
pub struct Parser {
    scanner: Scanner,
    current: Option<Token>,
    lookahead: Option<Token>,
    scope_parents: Vec<Option<ScopeId>>,
    scope_stack: Vec<ScopeId>,
    last_line: usize,
}

impl Parser {
    /// Create a parser over the given source, priming both token slots.
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut parser = Self {
            scanner: Scanner::new(source),
            current: None,
            lookahead: None,
            scope_parents: Vec::new(),
            scope_stack: Vec::new(),
            last_line: 1,
        };
        parser.advance()?;
        parser.advance()?;
        Ok(parser)
    }

    /// Parse the whole script.
    pub fn parse_script(&mut self) -> Result<Script, SyntaxError> {
        let root = self.push_scope();
        let mut nodes = Vec::new();

        while self.current.is_some() {
            nodes.push(self.parse_expression()?);
        }

        self.pop_scope();
        Ok(Script {
            root: Block {
                nodes,
                scope: root,
                role: BlockRole::Statement,
                line: 1,
            },
            scope_parents: std::mem::take(&mut self.scope_parents),
        })
    }

    // =======================================================================
    // Token plumbing
    // =======================================================================

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.current = self.lookahead.take();
        self.lookahead = self.scanner.next_token()?;
        Ok(())
    }

    /// Consume and return the current token.
    fn bump(&mut self) -> Result<Token, SyntaxError> {
        let Some(token) = self.current.take() else {
            return Err(SyntaxError::Expected {
                expected: "a token",
                found: "end of input".to_owned(),
                line: self.line(),
            });
        };
        self.last_line = token.line;
        self.advance()?;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, SyntaxError> {
        if self.current_is(kind) {
            self.bump()
        } else {
            Err(SyntaxError::Expected {
                expected,
                found: self.describe_current(),
                line: self.line(),
            })
        }
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.as_ref().is_some_and(|t| t.kind == kind)
    }

    fn current_is_keyword(&self, word: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_keyword(word))
    }

    fn line(&self) -> usize {
        self.current
            .as_ref()
            .map_or(self.last_line, |t| t.line)
    }

    fn describe_current(&self) -> String {
        self.current
            .as_ref()
            .map_or_else(|| "end of input".to_owned(), Token::describe)
    }

    // =======================================================================
    // Scope bookkeeping
    // =======================================================================

    fn push_scope(&mut self) -> ScopeId {
        let id = self.scope_parents.len();
        self.scope_parents.push(self.scope_stack.last().copied());
        self.scope_stack.push(id);
        id
    }

    fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    // =======================================================================
    // Expressions
    // =======================================================================

    /// `expression := simpleExpr ('->' simpleExpr)?`
    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_simple_expression()?;

        if !self.current_is(TokenKind::Arrow) {
            return Ok(expr);
        }
        self.bump()?; // '->'

        let to = self.parse_simple_expression()?;
        if expr.variant_name() != to.variant_name() {
            return Err(SyntaxError::InterpolationMismatch {
                from: expr.variant_name(),
                to: to.variant_name(),
                line: expr.line,
            });
        }

        Ok(Expr {
            line: expr.line,
            kind: ExprKind::Interpolation {
                from: Box::new(expr),
                to: Box::new(to),
            },
        })
    }

    /// `simpleExpr := mulExpr (('+' | '-') mulExpr)*`
    fn parse_simple_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = if self.current_is(TokenKind::Plus) {
                BinOp::Add
            } else if self.current_is(TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            self.bump()?;

            let right = self.parse_multiplicative_expression()?;
            left = Expr {
                line: left.line,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }

        Ok(left)
    }

    /// `mulExpr := atom (('*' | '/' | '^' | '@') atom)*`
    fn parse_multiplicative_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_atom()?;

        loop {
            let op = if self.current_is(TokenKind::Star) {
                BinOp::Mul
            } else if self.current_is(TokenKind::Slash) {
                BinOp::Div
            } else if self.current_is(TokenKind::Caret) {
                BinOp::Power
            } else if self.current_is(TokenKind::At) {
                BinOp::Index
            } else {
                break;
            };
            self.bump()?;

            let right = self.parse_atom()?;
            left = Expr {
                line: left.line,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }

        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Expr, SyntaxError> {
        let Some(current) = self.current.as_ref() else {
            return Err(SyntaxError::UnknownAtom {
                found: "end of input".to_owned(),
                line: self.line(),
            });
        };
        let kind = current.kind;
        let word = if kind == TokenKind::Identifier {
            current.text.clone()
        } else {
            String::new()
        };

        match kind {
            TokenKind::Str => {
                let token = self.bump()?;
                Ok(Expr::string(token.string_value(), token.line))
            }
            TokenKind::Number => {
                let token = self.bump()?;
                Ok(Expr::number(token.text.parse().unwrap_or(0.0), token.line))
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::Dollar => self.parse_variable_reference(),
            TokenKind::LParen => {
                self.bump()?; // '('
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' after expression")?;
                Ok(expr)
            }
            TokenKind::VBar => self.parse_magnitude(),
            TokenKind::LBrace => {
                let block = self.parse_block(BlockRole::Expression)?;
                Ok(Expr {
                    line: block.line,
                    kind: ExprKind::Block(block),
                })
            }
            TokenKind::Colon => self.parse_statement_block(),
            TokenKind::Identifier => match word.as_str() {
                "decl" => self.parse_variable_operation(VarMode::Declare),
                "mut" => self.parse_variable_operation(VarMode::Mutate),
                "run" => self.parse_function_call(),
                "repeat" => self.parse_repeat(),
                "builtin" => self.parse_command(),
                "proc" => self.parse_function_definition(),
                "return" => self.parse_return(),
                _ => Err(SyntaxError::UnknownAtom {
                    found: self.describe_current(),
                    line: self.line(),
                }),
            },
            _ => Err(SyntaxError::UnknownAtom {
                found: self.describe_current(),
                line: self.line(),
            }),
        }
    }

    // =======================================================================
    // Atoms
    // =======================================================================

    fn parse_array(&mut self) -> Result<Expr, SyntaxError> {
        let open = self.bump()?; // '['
        let mut elems = Vec::new();

        while !self.current_is(TokenKind::RBracket) {
            if self.current.is_none() {
                return Err(SyntaxError::Expected {
                    expected: "']' or more expressions",
                    found: "end of input".to_owned(),
                    line: self.line(),
                });
            }

            let expr = self.parse_expression()?;
            if matches!(expr.kind, ExprKind::Array { .. }) {
                return Err(SyntaxError::NestedArray { line: expr.line });
            }
            elems.push(expr);

            if self.current_is(TokenKind::Comma) {
                self.bump()?;
                continue;
            }
            if self.current_is(TokenKind::RBracket) {
                break;
            }
            return Err(SyntaxError::Expected {
                expected: "']' or ',' and more expressions",
                found: self.describe_current(),
                line: self.line(),
            });
        }

        self.bump()?; // ']'
        Ok(Expr {
            line: open.line,
            kind: ExprKind::Array {
                elems,
                elem_kind: None,
            },
        })
    }

    fn parse_variable_reference(&mut self) -> Result<Expr, SyntaxError> {
        let dollar = self.bump()?; // '$'
        let name = self.expect(TokenKind::Identifier, "an identifier after '$'")?;
        Ok(Expr {
            line: dollar.line,
            kind: ExprKind::VarRef(name.text),
        })
    }

    fn parse_magnitude(&mut self) -> Result<Expr, SyntaxError> {
        let open = self.bump()?; // '|'
        let operand = self.parse_expression()?;
        self.expect(
            TokenKind::VBar,
            "'|' at the end of a magnitude operation",
        )?;
        Ok(Expr {
            line: open.line,
            kind: ExprKind::Unary {
                op: UnOp::Magnitude,
                operand: Box::new(operand),
            },
        })
    }

    fn parse_variable_operation(&mut self, mode: VarMode) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'decl' / 'mut'

        let strict = if self.current_is_keyword("instant") {
            self.bump()?;
            true
        } else {
            false
        };

        let name = self.expect(TokenKind::Identifier, "a variable name")?;
        self.expect(TokenKind::Equals, "'=' after the variable name")?;
        let value = self.parse_expression()?;

        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::VarOp {
                name: name.text,
                value: Box::new(value),
                mode,
                strict,
            },
        })
    }

    fn parse_function_definition(&mut self) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'proc'
        let name = self.expect(TokenKind::Identifier, "a procedure name after 'proc'")?;
        let body = self.parse_block(BlockRole::Procedure)?;
        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::FnDef {
                name: name.text,
                body,
            },
        })
    }

    fn parse_function_call(&mut self) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'run'
        let name = self.expect(TokenKind::Identifier, "a procedure name after 'run'")?;
        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::FnCall { name: name.text },
        })
    }

    fn parse_repeat(&mut self) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'repeat'
        let var = self.expect(TokenKind::Identifier, "a loop variable after 'repeat'")?;
        self.expect(TokenKind::LongArrow, "'-->' after the loop variable")?;
        let count = self.parse_expression()?;
        let body = self.parse_block(BlockRole::Loop)?;
        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::Repeat {
                count: Box::new(count),
                var: var.text,
                body,
            },
        })
    }

    fn parse_return(&mut self) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'return'
        let inner = self.parse_expression()?;
        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::Return(Box::new(inner)),
        })
    }

    fn parse_statement_block(&mut self) -> Result<Expr, SyntaxError> {
        let colon = self.bump()?; // ':'
        if !self.current_is(TokenKind::LBrace) {
            return Err(SyntaxError::Expected {
                expected: "'{' after ':'",
                found: self.describe_current(),
                line: self.line(),
            });
        }
        let block = self.parse_block(BlockRole::Statement)?;
        Ok(Expr {
            line: colon.line,
            kind: ExprKind::Block(block),
        })
    }

    fn parse_block(&mut self, role: BlockRole) -> Result<Block, SyntaxError> {
        let open = self.expect(TokenKind::LBrace, "'{' at the beginning of a block")?;
        let scope = self.push_scope();
        let mut nodes = Vec::new();

        loop {
            if self.current_is(TokenKind::RBrace) {
                break;
            }
            if self.current.is_none() {
                return Err(SyntaxError::UnterminatedBlock { line: open.line });
            }
            nodes.push(self.parse_expression()?);
        }

        self.bump()?; // '}'
        self.pop_scope();
        Ok(Block {
            nodes,
            scope,
            role,
            line: open.line,
        })
    }

    // =======================================================================
    // Commands
    // =======================================================================

    fn parse_command(&mut self) -> Result<Expr, SyntaxError> {
        let keyword = self.bump()?; // 'builtin'
        let label = self.expect(TokenKind::Identifier, "a command label after 'builtin'")?;
        let args = self.parse_command_arguments()?;
        Ok(Expr {
            line: keyword.line,
            kind: ExprKind::Command {
                label: label.text,
                args,
            },
        })
    }

    /// Either `label: expr (',' label: expr)*`, a single unlabeled default
    /// argument, or nothing. The list ends at the first pair not followed
    /// by a comma.
    fn parse_command_arguments(&mut self) -> Result<Vec<(String, Expr)>, SyntaxError> {
        let mut args = Vec::new();

        let labeled = matches!(
            (&self.current, &self.lookahead),
            (Some(current), Some(next))
                if current.kind == TokenKind::Identifier && next.kind == TokenKind::Colon
        );

        if labeled {
            loop {
                let label = self.expect(TokenKind::Identifier, "an argument label")?;
                if label.text == "default" {
                    return Err(SyntaxError::ReservedArgumentLabel { line: label.line });
                }
                self.expect(TokenKind::Colon, "':' after the argument label")?;
                let value = self.parse_expression()?;
                args.push((label.text, value));

                if self.current_is(TokenKind::Comma) {
                    self.bump()?;
                } else {
                    break;
                }
            }
        } else if self.starts_expression() {
            args.push(("default".to_owned(), self.parse_expression()?));
        }

        Ok(args)
    }

    /// Whether the current token can begin an expression atom.
    fn starts_expression(&self) -> bool {
        let Some(token) = &self.current else {
            return false;
        };
        match token.kind {
            TokenKind::Str
            | TokenKind::Number
            | TokenKind::LBracket
            | TokenKind::Dollar
            | TokenKind::LParen
            | TokenKind::VBar
            | TokenKind::LBrace
            | TokenKind::Colon => true,
            TokenKind::Identifier => KEYWORDS.contains(&token.text.as_str()),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
