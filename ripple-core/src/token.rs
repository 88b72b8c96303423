//! Token types for the Ripple scanner.
//!
//! A token carries its kind, the raw lexeme exactly as consumed from the
//! source (string literals keep their quotes), and the line it started on.
//! Concatenating the raw lexemes of a token stream therefore reproduces the
//! source text minus skipped whitespace.

// ---------------------------------------------------------------------------
// Token kinds
// ---------------------------------------------------------------------------

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword: letter/underscore then letters/digits/underscores.
    Identifier,
    /// Run of decimal digits (integer lexical form, parsed as `f64`).
    Number,
    /// `"`-delimited string literal, no escape processing.
    Str,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,
    /// `@`
    At,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `|`
    VBar,
    /// `$`
    Dollar,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `->`
    Arrow,
    /// `-->`
    LongArrow,
}

/// The fixed symbol table, longest lexemes first so that prefix matching
/// never splits `-->` into `-` `->`.
pub const SYMBOLS: &[(&str, TokenKind)] = &[
    ("-->", TokenKind::LongArrow),
    ("->", TokenKind::Arrow),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("^", TokenKind::Caret),
    ("@", TokenKind::At),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("|", TokenKind::VBar),
    ("$", TokenKind::Dollar),
    (":", TokenKind::Colon),
    ("=", TokenKind::Equals),
];

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of the token.
    pub kind: TokenKind,
    /// The raw lexeme as consumed from the source.
    pub text: String,
    /// Source line the token started on (1-based).
    pub line: usize,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Returns `true` if this token is an identifier with the given text.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    /// The content of a string literal: the raw lexeme with its leading
    /// quote stripped and the trailing quote removed when present (an
    /// unterminated string reaches end of input without one).
    #[must_use]
    pub fn string_value(&self) -> &str {
        let inner = self.text.strip_prefix('"').unwrap_or(&self.text);
        inner.strip_suffix('"').unwrap_or(inner)
    }

    /// Human-readable description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier => format!("identifier \"{}\"", self.text),
            TokenKind::Number => format!("number {}", self.text),
            TokenKind::Str => "string literal".to_owned(),
            _ => format!("'{}'", self.text),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
