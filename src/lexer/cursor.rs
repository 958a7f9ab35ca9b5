use super::token::Position;
use std::str::Chars;

#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        let chars = s.chars();
        let position = Position { ln: 1, col: 1 };
        Self { chars, position }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_2nd(&self) -> Option<char> {
        // cheap to clone
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    #[inline]
    pub fn skip_if(&mut self, p: impl FnOnce(char) -> bool) -> bool {
        let skipped = self.peek().filter(|&c| p(c)).is_some();
        if skipped {
            self.take();
        }
        skipped
    }

    pub fn skip_whitespaces(&mut self) {
        while self.skip_if(char::is_whitespace) {}
    }

    pub fn skip_line(&mut self) {
        while self.skip_if(|c| c != '\n') {}
    }

    pub fn take(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.position.ln += 1;
            self.position.col = 1;
        } else {
            self.position.col += 1;
        }
        Some(c)
    }

    pub fn take_while(&mut self, mut p: impl FnMut(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(c) = self.peek().filter(|&c| p(c)) {
            buf.push(c);
            self.take();
        }
        buf
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }
}
