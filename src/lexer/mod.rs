//! # Lexer
//!
//! This module implements the tokenization stage of Elton. It transforms raw
//! source text into a flat sequence of [`Token`]s with line/column
//! provenance. String interpolation (`"${expr}"`) is resolved here by
//! recursively running the lexer on the embedded expression and splicing the
//! result into the surrounding string as a concatenation.

mod token;
mod tokens;

pub use token::*;
pub use tokens::*;

use std::{collections::HashSet, error::Error, fmt::Display, iter::Peekable, str::Chars};

use once_cell::sync::Lazy;

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "var", "func", "if", "else", "while", "for", "in", "return", "print", "true", "false",
        "and", "or", "not", "string", "int", "bool", "float", "array", "try", "catch", "throw",
        "lambda",
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LexError(String);

pub type LexResult<T> = Result<T, LexError>;

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Error for LexError {}

/// A piece of a string literal after splitting at interpolations.
enum Fragment {
    Text(String),
    Tokens(Vec<Token>),
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::new_at(input, 1, 1)
    }

    /// Create a lexer whose position bookkeeping starts somewhere inside a
    /// larger source. Used when re-entering the lexer for an interpolated
    /// expression, so its tokens point near their real origin.
    fn new_at(input: &'a str, line: usize, col: usize) -> Self {
        Self {
            tokens: vec![],
            iterator: input.chars().peekable(),
            line,
            col,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().copied()
    }

    fn peek_second(&mut self) -> Option<char> {
        let mut lookahead = self.iterator.clone();
        lookahead.next();
        lookahead.next()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.iterator.next()?;
        if next == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(next)
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        while let Some(next) = self.peek() {
            match next {
                c if c.is_whitespace() => self.eat_whitespace(),
                '/' if self.peek_second() == Some('/') => self.eat_comment(),
                '"' => self.lex_string()?,
                '0'..='9' => self.lex_numeric(),
                'a'..='z' | 'A'..='Z' | '_' => self.lex_alphanumeric(),
                _ => self.lex_special()?,
            }
        }

        Ok(self.tokens)
    }

    fn eat_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn eat_comment(&mut self) {
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.advance();
        }
    }

    fn lex_numeric(&mut self) {
        let (line, column) = (self.line, self.col);
        let mut stack = String::new();

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            stack.push(self.advance().unwrap());
        }

        // A '.' only belongs to the number when a digit follows; '..' is the
        // range operator and stays untouched.
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
            stack.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                stack.push(self.advance().unwrap());
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Number, stack, line, column));
    }

    fn lex_alphanumeric(&mut self) {
        let (line, column) = (self.line, self.col);
        let mut stack = String::new();

        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            stack.push(self.advance().unwrap());
        }

        let kind = if KEYWORDS.contains(stack.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        self.tokens.push(Token::new(kind, stack, line, column));
    }

    fn lex_special(&mut self) -> LexResult<()> {
        let (line, column) = (self.line, self.col);
        let Some(next) = self.advance() else {
            return Ok(());
        };

        let (kind, lexeme) = match next {
            '+' => (TokenKind::Plus, "+"),
            '-' => (TokenKind::Minus, "-"),
            '*' => (TokenKind::Multiply, "*"),
            '/' => (TokenKind::Divide, "/"),
            '%' => (TokenKind::Modulo, "%"),
            '=' if self.peek() == Some('=') => {
                self.advance();
                (TokenKind::Equals, "==")
            }
            '=' => (TokenKind::Assign, "="),
            '!' if self.peek() == Some('=') => {
                self.advance();
                (TokenKind::NotEquals, "!=")
            }
            '!' => (TokenKind::Not, "!"),
            '<' if self.peek() == Some('=') => {
                self.advance();
                (TokenKind::LessEqual, "<=")
            }
            '<' => (TokenKind::Less, "<"),
            '>' if self.peek() == Some('=') => {
                self.advance();
                (TokenKind::GreaterEqual, ">=")
            }
            '>' => (TokenKind::Greater, ">"),
            '&' if self.peek() == Some('&') => {
                self.advance();
                (TokenKind::And, "&&")
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                (TokenKind::Or, "||")
            }
            '.' if self.peek() == Some('.') => {
                self.advance();
                (TokenKind::Range, "..")
            }
            '.' => (TokenKind::Dot, "."),
            '(' => (TokenKind::LParen, "("),
            ')' => (TokenKind::RParen, ")"),
            '{' => (TokenKind::LBrace, "{"),
            '}' => (TokenKind::RBrace, "}"),
            '[' => (TokenKind::LBracket, "["),
            ']' => (TokenKind::RBracket, "]"),
            ',' => (TokenKind::Comma, ","),
            ':' => (TokenKind::Colon, ":"),
            ';' => (TokenKind::Semicolon, ";"),
            other => {
                return Err(LexError(format!(
                    "Invalid character '{other}' at line {line}, column {column}"
                )));
            }
        };

        self.tokens.push(Token::new(kind, lexeme, line, column));

        Ok(())
    }

    /// Scan a double quoted string literal, resolving escape sequences and
    /// splitting at `${...}` interpolations. The fragments are emitted
    /// interleaved with `+` tokens; interpolated expressions are wrapped in
    /// parentheses so their precedence cannot leak into the concatenation.
    fn lex_string(&mut self) -> LexResult<()> {
        let (line, start_col) = (self.line, self.col);
        self.advance(); // opening quote

        let mut fragments = vec![];
        let mut buffer = String::new();

        loop {
            let Some(next) = self.advance() else {
                return Err(LexError(format!(
                    "Unterminated string at line {line}, column {start_col}"
                )));
            };

            match next {
                '"' => break,
                '\\' => {
                    let Some(escaped) = self.advance() else {
                        return Err(LexError(format!(
                            "Unterminated string at line {line}, column {start_col}"
                        )));
                    };
                    buffer.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                '$' if self.peek() == Some('{') => {
                    self.advance(); // '{'
                    let (expr_line, expr_col) = (self.line, self.col);

                    let mut depth = 1usize;
                    let mut expression = String::new();
                    loop {
                        let Some(inner) = self.advance() else {
                            return Err(LexError(format!(
                                "Unterminated string interpolation at line {line}, column {start_col}"
                            )));
                        };
                        match inner {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        expression.push(inner);
                    }

                    if !buffer.is_empty() {
                        fragments.push(Fragment::Text(std::mem::take(&mut buffer)));
                    }

                    let inner_tokens =
                        Lexer::new_at(expression.trim(), expr_line, expr_col).lex()?;
                    if !inner_tokens.is_empty() {
                        fragments.push(Fragment::Tokens(inner_tokens));
                    }
                }
                _ => buffer.push(next),
            }
        }

        // A plain (possibly empty) string literal must still produce a token;
        // empty fragments around interpolations are dropped.
        if !buffer.is_empty() || fragments.is_empty() {
            fragments.push(Fragment::Text(buffer));
        }

        for (index, fragment) in fragments.into_iter().enumerate() {
            if index > 0 {
                self.tokens
                    .push(Token::new(TokenKind::Plus, "+", line, start_col));
            }
            match fragment {
                Fragment::Text(text) => {
                    self.tokens
                        .push(Token::new(TokenKind::String, text, line, start_col));
                }
                Fragment::Tokens(inner) => {
                    let (inner_line, inner_col) = inner
                        .first()
                        .map(|token| (token.line, token.column))
                        .unwrap_or((line, start_col));
                    self.tokens
                        .push(Token::new(TokenKind::LParen, "(", inner_line, inner_col));
                    self.tokens.extend(inner);
                    self.tokens
                        .push(Token::new(TokenKind::RParen, ")", inner_line, inner_col));
                }
            }
        }

        Ok(())
    }
}
