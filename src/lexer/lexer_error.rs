use super::token::Position;
use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InnerLexError {
    #[error("Illegal character '{0}'")]
    IllegalCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown escape sequence '\\{0}'")]
    BadEscape(char),
    #[error("number {0} does not fit into Int")]
    BadNumber(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{}:{}: Lexer error: {inner}\n{snippet}", .position.ln, .position.col)]
pub struct LexError {
    inner: InnerLexError,
    position: Position,
    snippet: String,
}

impl LexError {
    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_inner(&self) -> &InnerLexError {
        &self.inner
    }
}

impl InnerLexError {
    pub(super) fn set_position(self, position: Position, source: &str) -> LexError {
        let snippet = super::snippet(source, position);
        LexError {
            inner: self,
            position,
            snippet,
        }
    }
}
