mod cursor;
pub mod error;
pub mod token;
pub mod unescaped;

use std::collections::HashMap;

use delay_init::delay;
use error_manager::ErrorManager;
use span::SourceFile;

pub use cursor::Cursor;
use error::{LexError, LexErrorKind};
use token::{Token, TokenKind};

pub struct Lexer<'lex> {
    c: Cursor<'lex>,
}

delay! {
    static KEYWORDS : HashMap<&str,TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Fn);
        map.insert("local", TokenKind::Local);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("struct", TokenKind::Struct);
        map.insert("enum", TokenKind::Enum);
        map.insert("type", TokenKind::Type);
        map.insert("const", TokenKind::Const);
        map.insert("array", TokenKind::Array);
        map.insert("of", TokenKind::Of);
        map.insert("u8", TokenKind::U8);
        map.insert("u16", TokenKind::U16);
        map.insert("u32", TokenKind::U32);
        map.insert("u64", TokenKind::U64);
        map.insert("i8", TokenKind::I8);
        map.insert("i16", TokenKind::I16);
        map.insert("i32", TokenKind::I32);
        map.insert("i64", TokenKind::I64);
        map.insert("bool", TokenKind::Bool);
        map.insert("void", TokenKind::Void);
        map.insert("float", TokenKind::Float);
        map.insert("double", TokenKind::Double);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("nullptr", TokenKind::Nullptr);
        map
    };
}

impl<'lex> Lexer<'lex> {
    pub fn new(source: &'lex SourceFile) -> Self {
        Self { c: Cursor::new(source) }
    }

    /// Scans the whole file. The returned stream always ends with a
    /// single [`Eoi`](TokenKind::Eoi) token.
    pub fn tokenize(mut self, em: &mut ErrorManager) -> Box<[Token]> {
        let mut tokens = Vec::new();
        while !self.c.is_finished() {
            self.c.step();
            if let Some(t) = self.scan_token(em) {
                tokens.push(t);
            }
        }
        tokens.push(Token {
            kind: TokenKind::Eoi,
            span: self.c.end_span(),
        });
        tokens.into_boxed_slice()
    }

    fn token(&self, kind: TokenKind) -> Option<Token> {
        Some(Token {
            kind,
            span: self.c.current_span(),
        })
    }

    fn error(&self, em: &mut ErrorManager, kind: LexErrorKind) {
        em.emit_error(LexError {
            kind,
            span: self.c.current_span(),
        });
    }

    #[expect(clippy::too_many_lines)]
    fn scan_token(&mut self, em: &mut ErrorManager) -> Option<Token> {
        match self.c.advance() {
            '(' => self.token(TokenKind::LeftParen),
            ')' => self.token(TokenKind::RightParen),
            '{' => self.token(TokenKind::LeftBrace),
            '}' => self.token(TokenKind::RightBrace),
            '[' => self.token(TokenKind::LeftBracket),
            ']' => self.token(TokenKind::RightBracket),
            ',' => self.token(TokenKind::Comma),
            ';' => self.token(TokenKind::Semicolon),
            ':' => self.token(TokenKind::Colon),
            '?' => self.token(TokenKind::Question),
            '.' => {
                if self.c.match_next('.') {
                    if self.c.match_next('.') {
                        self.token(TokenKind::Ellipsis)
                    } else {
                        self.error(em, LexErrorKind::UnexpectedCharacter('.'));
                        None
                    }
                } else {
                    self.token(TokenKind::Dot)
                }
            }
            '+' => {
                if self.c.match_next('+') {
                    self.token(TokenKind::PlusPlus)
                } else if self.c.match_next('=') {
                    self.token(TokenKind::PlusEqual)
                } else {
                    self.token(TokenKind::Plus)
                }
            }
            '-' => {
                if self.c.match_next('-') {
                    self.token(TokenKind::MinusMinus)
                } else if self.c.match_next('=') {
                    self.token(TokenKind::MinusEqual)
                } else if self.c.match_next('>') {
                    self.token(TokenKind::Arrow)
                } else {
                    self.token(TokenKind::Minus)
                }
            }
            '*' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::AsteriskEqual)
                } else {
                    self.token(TokenKind::Asterisk)
                }
            }
            '%' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::PercentEqual)
                } else {
                    self.token(TokenKind::Percent)
                }
            }
            '=' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::EqualEqual)
                } else {
                    self.token(TokenKind::Equal)
                }
            }
            '!' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::BangEqual)
                } else {
                    self.token(TokenKind::Bang)
                }
            }
            '<' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::LessEqual)
                } else {
                    self.token(TokenKind::Less)
                }
            }
            '>' => {
                if self.c.match_next('=') {
                    self.token(TokenKind::GreaterEqual)
                } else {
                    self.token(TokenKind::Greater)
                }
            }
            '&' => {
                if self.c.match_next('&') {
                    self.token(TokenKind::AmpAmp)
                } else {
                    self.token(TokenKind::Ampersand)
                }
            }
            '|' => {
                if self.c.match_next('|') {
                    self.token(TokenKind::PipePipe)
                } else {
                    self.error(em, LexErrorKind::UnexpectedCharacter('|'));
                    None
                }
            }
            '/' => {
                if self.c.match_next('/') {
                    self.c.advance_while(|c| c != '\n');
                    None
                } else if self.c.match_next('*') {
                    self.block_comment(em)
                } else if self.c.match_next('=') {
                    self.token(TokenKind::SlashEqual)
                } else {
                    self.token(TokenKind::Slash)
                }
            }
            '\'' => self.char_literal(em),
            '"' => self.string(em),
            ' ' | '\n' | '\r' | '\t' => None, // Ignore whitespace.
            c => {
                if c.is_ascii_digit() {
                    self.number(c, em)
                } else if c.is_alphabetic() || c == '_' {
                    self.identifier()
                } else {
                    self.error(em, LexErrorKind::UnexpectedCharacter(c));
                    None
                }
            }
        }
    }

    fn block_comment(&mut self, em: &mut ErrorManager) -> Option<Token> {
        loop {
            if self.c.is_finished() {
                self.error(em, LexErrorKind::UnterminatedComment);
                return None;
            }
            if self.c.advance() == '*' && self.c.match_next('/') {
                return None;
            }
        }
    }

    fn char_literal(&mut self, em: &mut ErrorManager) -> Option<Token> {
        if self.c.peek() == '\'' {
            self.c.advance();
            self.error(em, LexErrorKind::EmptyCharLiteral);
            return None;
        }
        if self.c.advance() == '\\' {
            self.c.advance();
        }
        if !self.c.match_next('\'') {
            self.error(em, LexErrorKind::UnterminatedCharLiteral);
            return None;
        }
        self.token(TokenKind::CharLiteral)
    }

    fn string(&mut self, em: &mut ErrorManager) -> Option<Token> {
        loop {
            if self.c.is_finished() {
                self.error(em, LexErrorKind::UnterminatedString);
                return None;
            }
            match self.c.advance() {
                '"' => break,
                '\\' => {
                    self.c.advance();
                }
                _ => {}
            }
        }
        self.token(TokenKind::StringLiteral)
    }

    fn number(&mut self, first: char, em: &mut ErrorManager) -> Option<Token> {
        if first == '0' && (self.c.peek() == 'x' || self.c.peek() == 'X') {
            self.c.advance();
            self.c.advance_while(|c| c.is_ascii_hexdigit());
            return self.token(TokenKind::HexadecimalLiteral);
        }

        self.c.advance_while(|c| c.is_ascii_digit());

        if first == '0' && self.c.current_lexem().len() > 1 {
            if let Some(bad) = self.c.current_lexem().chars().find(|c| !('0'..='7').contains(c)) {
                self.error(em, LexErrorKind::InvalidDigit { digit: bad, radix: 8 });
                return None;
            }
            return self.token(TokenKind::OctalLiteral);
        }

        self.token(TokenKind::DecimalLiteral)
    }

    fn identifier(&mut self) -> Option<Token> {
        self.c.advance_while(|c| c.is_alphanumeric() || c == '_');
        let kind = KEYWORDS
            .get(self.c.current_lexem())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.token(kind)
    }
}
