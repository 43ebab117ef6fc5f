use super::Token;

/// Cursor over the lexer's output, consumed by the parser.
///
/// Elton's grammar needs only bounded lookahead: one token to dispatch a
/// statement, a second one to tell `name = ...` apart from `name(...)` and
/// `name[...]`. The cursor therefore exposes `peek`/`peek_nth` and nothing
/// to save or restore a position with -- the parser never backtracks.
#[derive(Debug, Clone)]
pub struct Tokens {
    stream: Vec<Token>,
    cursor: usize,
}

impl Tokens {
    pub fn new(stream: Vec<Token>) -> Self {
        Self { stream, cursor: 0 }
    }

    /// Consume the token under the cursor.
    pub fn next(&mut self) -> Option<Token> {
        let token = self.stream.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    /// Look at the token under the cursor without consuming it.
    pub fn peek(&self) -> Option<Token> {
        self.peek_nth(0)
    }

    /// Look `n` tokens past the cursor (`peek_nth(0)` equals `peek`).
    pub fn peek_nth(&self, n: usize) -> Option<Token> {
        self.stream.get(self.cursor + n).cloned()
    }
}

impl From<Vec<Token>> for Tokens {
    fn from(stream: Vec<Token>) -> Self {
        Self::new(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn stream() -> Tokens {
        Tokens::new(vec![
            Token::new(TokenKind::Identifier, "a", 1, 1),
            Token::new(TokenKind::Assign, "=", 1, 3),
            Token::new(TokenKind::Number, "1", 1, 5),
        ])
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut tokens = stream();

        assert_eq!(tokens.peek().unwrap().lexeme, "a");
        assert_eq!(tokens.peek_nth(1).unwrap().kind, TokenKind::Assign);
        assert_eq!(tokens.next().unwrap().lexeme, "a");
    }

    #[test]
    fn test_next_drains_the_stream() {
        let mut tokens = stream();

        assert!(tokens.next().is_some());
        assert!(tokens.next().is_some());
        assert!(tokens.next().is_some());
        assert!(tokens.next().is_none());
        assert!(tokens.peek().is_none());
    }
}
