use super::lexer_error::InnerLexError;
use std::fmt;
use std::ops::Deref;

/// 1-based line and column of a token or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub ln: u64,
    pub col: u64,
}

/// Token with its source position attached.
///
/// To get inner [Token] use [Token::from] to consume or [get_inner](PositionedToken::get_inner) to borrow.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    pub(crate) inner: Token,
    position: Position,
}

impl From<PositionedToken> for Token {
    fn from(value: PositionedToken) -> Self {
        value.inner
    }
}

/// Basic token type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// func keyword
    Func,
    /// import keyword
    Import,
    /// const keyword
    Const,
    /// struct keyword
    Struct,
    /// for keyword
    For,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// return keyword
    Return,
    /// any unknown word (variable names, function names, type names, ..)
    Identifier(String),
    /// decimal integer literal
    Number(i64),
    /// string literal with escapes already resolved
    Str(String),
    /// :=
    Declare,
    /// ::=
    StackDeclare,
    /// =
    Assign,
    /// ->
    Arrow,
    /// :
    Colon,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// (
    OpenParanth,
    /// )
    CloseParanth,
    /// {
    OpenCurly,
    /// }
    CloseCurly,
}

impl PositionedToken {
    pub fn new(t: Token, position: Position) -> Self {
        Self { inner: t, position }
    }

    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_inner(&self) -> &Token {
        &self.inner
    }
}

impl Deref for PositionedToken {
    type Target = Token;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Token {
    #[inline]
    pub fn is_declaration_op(&self) -> bool {
        matches!(self, Self::Declare | Self::StackDeclare | Self::Assign)
    }

    #[inline]
    pub fn is_statement_end(&self) -> bool {
        matches!(self, Self::Semicolon | Self::CloseCurly)
    }
}

impl TryFrom<char> for Token {
    type Error = InnerLexError;
    fn try_from(c: char) -> std::result::Result<Self, InnerLexError> {
        match c {
            ';' => Ok(Self::Semicolon),
            '(' => Ok(Self::OpenParanth),
            ')' => Ok(Self::CloseParanth),
            '{' => Ok(Self::OpenCurly),
            '}' => Ok(Self::CloseCurly),
            ',' => Ok(Self::Comma),
            ':' => Ok(Self::Colon),
            '=' => Ok(Self::Assign),
            _ => Err(InnerLexError::IllegalCharacter(c)),
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        match s {
            "func" => Self::Func,
            "import" => Self::Import,
            "const" => Self::Const,
            "struct" => Self::Struct,
            "for" => Self::For,
            "if" => Self::If,
            "else" => Self::Else,
            "return" => Self::Return,
            _ => Self::Identifier(s.to_owned()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Func => write!(f, "'func'"),
            Self::Import => write!(f, "'import'"),
            Self::Const => write!(f, "'const'"),
            Self::Struct => write!(f, "'struct'"),
            Self::For => write!(f, "'for'"),
            Self::If => write!(f, "'if'"),
            Self::Else => write!(f, "'else'"),
            Self::Return => write!(f, "'return'"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Declare => write!(f, "':='"),
            Self::StackDeclare => write!(f, "'::='"),
            Self::Assign => write!(f, "'='"),
            Self::Arrow => write!(f, "'->'"),
            Self::Colon => write!(f, "':'"),
            Self::Comma => write!(f, "','"),
            Self::Semicolon => write!(f, "';'"),
            Self::OpenParanth => write!(f, "'('"),
            Self::CloseParanth => write!(f, "')'"),
            Self::OpenCurly => write!(f, "'{{'"),
            Self::CloseCurly => write!(f, "'}}'"),
        }
    }
}
