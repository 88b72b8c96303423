//! Lexical scanner for Ripple source code.
//!
//! The scanner is a lazy cursor over the source characters; the parser pulls
//! one token at a time. At each position the rules are tried in a fixed
//! order:
//!
//! 1. identifier — letter or underscore, then letters/digits/underscores
//! 2. number literal — a maximal run of decimal digits
//! 3. string literal — `"`-delimited, no escape processing; an unterminated
//!    string consumes to end of input without an error (long-standing quirk,
//!    kept deliberately)
//! 4. symbolic token — longest-prefix match against [`SYMBOLS`]
//!
//! Whitespace between tokens is skipped; every newline seen (including
//! inside string literals) advances the line counter used to tag tokens.

use crate::error::SyntaxError;
use crate::token::{Token, TokenKind, SYMBOLS};

/// The lexical scanner.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Scanner {
    /// Create a scanner over the given source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// The line the cursor is currently on (1-based).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Scan the next token; `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_whitespace();

        let Some(&first) = self.chars.get(self.pos) else {
            return Ok(None);
        };

        if is_identifier_start(first) {
            return Ok(Some(self.scan_identifier()));
        }
        if first.is_ascii_digit() {
            return Ok(Some(self.scan_number()));
        }
        if first == '"' {
            return Ok(Some(self.scan_string()));
        }
        if let Some(token) = self.scan_symbol() {
            return Ok(Some(token));
        }

        Err(SyntaxError::UnknownCharacter {
            found: first,
            line: self.line,
        })
    }

    /// Scan all remaining tokens.
    pub fn scan_all(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    // -- internal helpers --

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.get(self.pos) {
            if !matches!(c, ' ' | '\t' | '\r' | '\n') {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && predicate(self.chars[self.pos]) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn scan_identifier(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        text.push(self.chars[self.pos]);
        self.pos += 1;
        text.push_str(&self.take_while(is_identifier_continue));
        Token::new(TokenKind::Identifier, text, line)
    }

    fn scan_number(&mut self) -> Token {
        let line = self.line;
        let text = self.take_while(|c| c.is_ascii_digit());
        Token::new(TokenKind::Number, text, line)
    }

    /// Scan a string literal. The lexeme keeps the surrounding quotes; an
    /// unterminated string runs to end of input and the closing quote is
    /// simply absent from the lexeme.
    fn scan_string(&mut self) -> Token {
        let line = self.line;
        let mut text = String::from('"');
        self.pos += 1; // opening quote

        while let Some(&c) = self.chars.get(self.pos) {
            self.pos += 1;
            if c == '"' {
                text.push('"');
                return Token::new(TokenKind::Str, text, line);
            }
            if c == '\n' {
                self.line += 1;
            }
            text.push(c);
        }

        Token::new(TokenKind::Str, text, line)
    }

    /// Longest-prefix match against the symbol table, so `-->` never
    /// tokenizes as `-` followed by `->`.
    fn scan_symbol(&mut self) -> Option<Token> {
        let mut best: Option<(&'static str, TokenKind)> = None;

        for &(symbol, kind) in SYMBOLS {
            if self.remaining_starts_with(symbol)
                && best.map_or(true, |(current, _)| symbol.len() > current.len())
            {
                best = Some((symbol, kind));
            }
        }

        best.map(|(symbol, kind)| {
            self.pos += symbol.chars().count();
            Token::new(kind, symbol, self.line)
        })
    }

    fn remaining_starts_with(&self, symbol: &str) -> bool {
        symbol
            .chars()
            .enumerate()
            .all(|(offset, c)| self.chars.get(self.pos + offset) == Some(&c))
    }
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
