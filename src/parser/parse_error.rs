use crate::lexer::{self, Position, Token};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InnerParseError {
    #[error("unexpected token {1}, expected {0}")]
    ExpectedButGot(Token, Token),
    #[error("unexpected token {0}, expected identifier")]
    ExpectedIdentifierButGot(Token),
    #[error("unexpected token {0}")]
    UnexpectedToken(Token),
    #[error("unexpected token {0}, expected a declaration")]
    ExpectedDeclaration(Token),
    #[error("unexpected token {0}, only calls can be used as statements")]
    ExpectedStatement(Token),
    #[error("unexpected end of input")]
    UnexpectedEof,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{}:{}: Parser error: {inner}\n{snippet}", .position.ln, .position.col)]
pub struct ParseError {
    inner: InnerParseError,
    position: Position,
    snippet: String,
}

impl ParseError {
    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_inner(&self) -> &InnerParseError {
        &self.inner
    }
}

impl InnerParseError {
    pub fn set_position(self, position: Position, source: &str) -> ParseError {
        let snippet = lexer::snippet(source, position);
        ParseError {
            inner: self,
            position,
            snippet,
        }
    }
}
