mod cursor;
mod lexer_error;
mod token;

use cursor::Cursor;
pub use lexer_error::{InnerLexError, LexError};
pub use token::{Position, PositionedToken, Token};

pub type Result<T> = std::result::Result<T, LexError>;
type InnerResult<T> = std::result::Result<T, InnerLexError>;
pub type Tokens = Vec<PositionedToken>;

/// Source line at `position` followed by a caret under its column.
pub fn snippet(source: &str, position: Position) -> String {
    let index = usize::try_from(position.ln.saturating_sub(1)).unwrap_or(usize::MAX);
    let line = source.lines().nth(index).unwrap_or_default();
    let offset = usize::try_from(position.col.saturating_sub(1)).unwrap_or_default();
    let caret = " ".repeat(offset);
    format!("{line}\n{caret}^")
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex_identifier(cursor: &mut Cursor) -> Token {
    let word = cursor.take_while(is_identifier_part);
    Token::from(word.as_str())
}

fn lex_number(cursor: &mut Cursor) -> InnerResult<Token> {
    let digits = cursor.take_while(|c| c.is_ascii_digit());

    if let Some(c) = cursor.peek().filter(|&c| is_identifier_start(c)) {
        return Err(InnerLexError::IllegalCharacter(c));
    }

    digits
        .parse()
        .map(Token::Number)
        .map_err(|_| InnerLexError::BadNumber(digits))
}

fn lex_escape(cursor: &mut Cursor) -> InnerResult<char> {
    let escaped = cursor.take().ok_or(InnerLexError::UnterminatedString)?;
    match escaped {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        c => Err(InnerLexError::BadEscape(c)),
    }
}

fn lex_string(cursor: &mut Cursor) -> InnerResult<Token> {
    // opening quote
    cursor.take();
    let mut buf = String::new();
    loop {
        match cursor.take() {
            Some('"') => break,
            Some('\\') => buf.push(lex_escape(cursor)?),
            Some('\n') | None => return Err(InnerLexError::UnterminatedString),
            Some(c) => buf.push(c),
        }
    }
    Ok(Token::Str(buf))
}

fn lex_colon(cursor: &mut Cursor) -> Token {
    cursor.take();
    if cursor.peek() == Some(':') && cursor.peek_2nd() == Some('=') {
        cursor.take();
        cursor.take();
        Token::StackDeclare
    } else if cursor.skip_if(|c| c == '=') {
        Token::Declare
    } else {
        Token::Colon
    }
}

fn lex_hyphen(cursor: &mut Cursor) -> InnerResult<Token> {
    cursor.take();
    if cursor.skip_if(|c| c == '>') {
        Ok(Token::Arrow)
    } else {
        Err(InnerLexError::IllegalCharacter('-'))
    }
}

fn lex_token(cursor: &mut Cursor, c: char) -> InnerResult<Token> {
    match c {
        ':' => Ok(lex_colon(cursor)),
        '-' => lex_hyphen(cursor),
        '"' => lex_string(cursor),
        c if c.is_ascii_digit() => lex_number(cursor),
        c if is_identifier_start(c) => Ok(lex_identifier(cursor)),
        _ => {
            let token = Token::try_from(c)?;
            cursor.take();
            Ok(token)
        }
    }
}

pub fn lex(source: &str) -> Result<Tokens> {
    let mut tokens = Tokens::new();
    let mut cursor = Cursor::new(source);

    loop {
        cursor.skip_whitespaces();
        let Some(c) = cursor.peek() else {
            break;
        };
        if c == '#' {
            cursor.skip_line();
            continue;
        }

        let position = cursor.position();
        let token = lex_token(&mut cursor, c).map_err(|err| err.set_position(position, source))?;
        tokens.push(PositionedToken::new(token, position));
    }

    debug_assert!(cursor.is_eof());
    log::debug!("lexed {} tokens", tokens.len());
    Ok(tokens)
}
