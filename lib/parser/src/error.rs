use core::fmt;

use lexer::token::TokenKind;
use span::Span;

pub enum ParseErrorKind {
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    ExpectedConstruct {
        expected: &'static str,
        found: String,
    },
    /// The diagnostic was already delivered (by promotion or a
    /// semantic check); unwinding only stops the parse.
    Fatal,
}

pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl error_manager::Error for ParseError {
    fn get_span(&self) -> Span {
        self.span
    }

    fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::ExpectedToken { expected, found } => {
                write!(out, "expected '{expected}', got '{found}'")
            }
            ParseErrorKind::ExpectedConstruct { expected, found } => {
                write!(out, "expected {expected}, got '{found}'")
            }
            ParseErrorKind::Fatal => write!(out, "parse aborted"),
        }
    }
}
