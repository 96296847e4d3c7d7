use std::str::CharIndices;

use span::{SourceFile, Span};

pub struct Cursor<'lex> {
    chars: CharIndices<'lex>,
    start_chars: CharIndices<'lex>,
    fileid: u32,
}

impl<'lex> Cursor<'lex> {
    pub fn new(source: &'lex SourceFile) -> Self {
        Self {
            chars: source.contents.char_indices(),
            start_chars: source.contents.char_indices(),
            fileid: source.id,
        }
    }

    /// Moves the token start up to the current position.
    pub fn step(&mut self) {
        self.start_chars = self.chars.clone();
    }

    pub fn is_finished(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn current_lexem(&self) -> &'lex str {
        let n = self.chars.offset() - self.start_chars.offset();
        &self.start_chars.as_str()[..n]
    }

    pub fn current_span(&self) -> Span {
        Span::new(
            self.start_chars.offset(),
            self.chars.offset() - self.start_chars.offset(),
            self.fileid,
        )
    }

    pub fn end_span(&self) -> Span {
        Span::new(self.chars.offset(), 0, self.fileid)
    }

    pub fn advance(&mut self) -> char {
        self.chars.next().map_or('\0', |(_, c)| c)
    }

    pub fn peek(&self) -> char {
        self.chars.clone().next().map_or('\0', |(_, c)| c)
    }

    pub fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn advance_while<F>(&mut self, f: F)
    where
        F: Fn(char) -> bool,
    {
        while !self.is_finished() && f(self.peek()) {
            self.advance();
        }
    }
}
