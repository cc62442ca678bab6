use std::collections::VecDeque;

use crate::{
    errors::errors::Diagnostic,
    lexer::{lexer::Lexer, tokens::Token},
    Position,
};

/// Pulls tokens from the lexer on demand and keeps the ones looked at but not
/// yet consumed.
///
/// The current token is always buffered, so it can be read without `&mut`.
/// At most one token past it is ever scanned ahead of time.
pub struct TokenCursor {
    lexer: Lexer,
    lookahead: VecDeque<Token>,
    previous_end: Position,
    consumed: usize,
}

impl TokenCursor {
    pub fn new(mut lexer: Lexer) -> Self {
        let mut lookahead = VecDeque::with_capacity(2);
        lookahead.push_back(lexer.next_token());

        TokenCursor {
            lexer,
            lookahead,
            previous_end: Position::start(),
            consumed: 0,
        }
    }

    pub fn current(&self) -> &Token {
        &self.lookahead[0]
    }

    /// The token after the current one.
    pub fn peek_next(&mut self) -> &Token {
        if self.lookahead.len() < 2 {
            let token = self.lexer.next_token();
            self.lookahead.push_back(token);
        }
        &self.lookahead[1]
    }

    /// Consumes the current token. At the end of input the `EOF` token is
    /// returned again and again.
    pub fn advance(&mut self) -> Token {
        let token = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };

        if self.lookahead.is_empty() {
            self.lookahead.push_back(self.lexer.next_token());
        }

        self.previous_end = token.span.end;
        self.consumed += 1;
        token
    }

    /// End of the most recently consumed token.
    pub fn previous_end(&self) -> Position {
        self.previous_end
    }

    /// Number of tokens consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn take_lexer_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.lexer.take_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokens::TokenKind;

    #[test]
    fn test_peek_does_not_consume() {
        let mut cursor = TokenCursor::new(Lexer::new("ifj.write"));

        assert_eq!(cursor.peek_next().kind, TokenKind::Dot);
        assert_eq!(cursor.peek_next().kind, TokenKind::Dot);
        assert_eq!(cursor.current().value, "ifj");
        assert_eq!(cursor.consumed(), 0);

        assert_eq!(cursor.advance().value, "ifj");
        assert_eq!(cursor.current().kind, TokenKind::Dot);
        assert_eq!(cursor.previous_end(), Position::new(3, 1, 4));
    }

    #[test]
    fn test_advance_past_end() {
        let mut cursor = TokenCursor::new(Lexer::new(""));

        assert_eq!(cursor.advance().kind, TokenKind::EOF);
        assert_eq!(cursor.advance().kind, TokenKind::EOF);
        assert_eq!(cursor.current().kind, TokenKind::EOF);
    }
}
