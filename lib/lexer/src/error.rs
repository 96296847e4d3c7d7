use core::fmt;

use span::Span;

pub enum LexErrorKind {
    UnexpectedCharacter(char),
    UnterminatedString,
    UnterminatedComment,
    UnterminatedCharLiteral,
    EmptyCharLiteral,
    InvalidDigit { digit: char, radix: u8 },
}

pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl error_manager::Error for LexError {
    fn get_span(&self) -> Span {
        self.span
    }

    fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnexpectedCharacter(c) => write!(out, "unexpected character '{c}'"),
            LexErrorKind::UnterminatedString => write!(out, "unterminated string literal"),
            LexErrorKind::UnterminatedComment => write!(out, "unterminated comment block"),
            LexErrorKind::UnterminatedCharLiteral => {
                write!(out, "expected closing ' on character literal")
            }
            LexErrorKind::EmptyCharLiteral => write!(out, "empty character literal"),
            LexErrorKind::InvalidDigit { digit, radix } => {
                write!(out, "invalid digit '{digit}' for base {radix} literal")
            }
        }
    }
}
