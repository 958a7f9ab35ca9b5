use super::{InnerParseError, ParseError, Result};
use crate::ast::NodeId;
use crate::lexer::{Position, PositionedToken, Token};

#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [PositionedToken],
    source: &'a str,
    position: usize,
    next_id: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [PositionedToken], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            position: 0,
            next_id: 0,
        }
    }

    pub fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position).map(PositionedToken::get_inner)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens
            .get(self.position + n)
            .map(PositionedToken::get_inner)
    }

    pub fn bump(&mut self) {
        self.position += 1;
    }

    pub fn bump_if(&mut self, t: &Token) -> bool {
        let condition = self.peek() == Some(t);
        if condition {
            self.bump();
        }
        condition
    }

    pub fn peek_is(&self, t: &Token) -> bool {
        self.peek() == Some(t)
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Position of the token under the cursor, or right after the last one at the end of input.
    pub fn get_position(&self) -> Position {
        match self.tokens.get(self.position) {
            Some(token) => token.get_position(),
            None => self.eof_position(),
        }
    }

    fn eof_position(&self) -> Position {
        let ln = self.source.lines().count().max(1);
        let col = self.source.lines().last().map_or(0, |l| l.chars().count()) + 1;
        Position {
            ln: ln as u64,
            col: col as u64,
        }
    }

    /// Attach the current position to an error.
    pub fn error(&self, inner: InnerParseError) -> ParseError {
        inner.set_position(self.get_position(), self.source)
    }

    pub fn error_at(&self, inner: InnerParseError, position: Position) -> ParseError {
        inner.set_position(position, self.source)
    }

    /// Attach the position of the previously consumed token to an error.
    pub fn error_at_previous(&self, inner: InnerParseError) -> ParseError {
        let position = self
            .position
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map_or_else(|| self.get_position(), PositionedToken::get_position);
        inner.set_position(position, self.source)
    }

    pub fn expect(&mut self, t: &Token) -> Result<()> {
        let next = self.next_or_error()?;
        if next == t {
            Ok(())
        } else {
            let err = InnerParseError::ExpectedButGot(t.clone(), next.clone());
            Err(self.error_at_previous(err))
        }
    }

    pub fn peek_or_error(&self) -> Result<&'a Token> {
        self.peek()
            .ok_or_else(|| self.error(InnerParseError::UnexpectedEof))
    }

    pub fn next_or_error(&mut self) -> Result<&'a Token> {
        let next = self.peek_or_error()?;
        self.position += 1;
        Ok(next)
    }
}
