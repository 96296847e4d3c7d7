//! Recursive-descent parser.
//!
//! Expressions fold through promotion as they are built, so the tree
//! this parser produces is fully typed. The first failing diagnostic
//! stops the parse: semantic errors emit on the spot and unwind with
//! [`ParseErrorKind::Fatal`](error::ParseErrorKind::Fatal).

pub mod error;
mod expr;
mod item;
mod stmt;
mod ty;

use ast::{Ast, TranslationUnit};
use error_manager::ErrorManager;
use lexer::token::{Token, TokenKind};
use semantic::{Ty, TypeCtx};
use session::Symbol;
use span::Span;
use symtab::Symtab;

use error::{ParseError, ParseErrorKind};

type Result<T> = std::result::Result<T, ParseError>;

pub fn parse<'a, 'cx>(
    tokens: &'a [Token],
    src: &'a str,
    ast: &'a Ast<'cx>,
    tcx: &'a TypeCtx<'cx>,
    em: &'a mut ErrorManager,
) -> Option<TranslationUnit<'cx>> {
    let mut parser = Parser {
        tokens,
        src,
        current: 0,
        ast,
        tcx,
        symtab: Symtab::new(),
        em,
        current_fn_ret: None,
    };

    match parser.translation_unit() {
        Ok(unit) => Some(unit),
        Err(err) => {
            if !matches!(err.kind, ParseErrorKind::Fatal) {
                parser.em.emit_error(err);
            }
            None
        }
    }
}

pub(crate) struct Parser<'a, 'cx> {
    tokens: &'a [Token],
    src: &'a str,
    current: usize,
    ast: &'a Ast<'cx>,
    tcx: &'a TypeCtx<'cx>,
    symtab: Symtab<'cx>,
    em: &'a mut ErrorManager,
    current_fn_ret: Option<&'cx Ty<'cx>>,
}

impl<'a, 'cx> Parser<'a, 'cx> {
    fn translation_unit(&mut self) -> Result<TranslationUnit<'cx>> {
        let mut items = Vec::new();
        while !self.is_finished() {
            items.push(self.item()?);
        }
        Ok(TranslationUnit { items })
    }

    /* token plumbing */

    pub(crate) fn peek(&self) -> Token {
        self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.peek().kind == TokenKind::Eoi
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.peek();
        if tok.kind != TokenKind::Eoi {
            self.current += 1;
        }
        tok
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_type(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(ParseError {
                kind: ParseErrorKind::ExpectedToken {
                    expected: kind,
                    found: found.kind,
                },
                span: found.span,
            })
        }
    }

    pub(crate) fn lexeme(&self, span: Span) -> &'a str {
        span.slice(self.src)
    }

    pub(crate) fn consume_ident(&mut self) -> Result<(Symbol, Span)> {
        let tok = self.consume(TokenKind::Identifier)?;
        let sym = session::intern(self.lexeme(tok.span));
        Ok((sym, tok.span))
    }

    /// Emits a semantic diagnostic at `span`.
    pub(crate) fn semantic_error(
        &mut self,
        kind: semantic::errors::SemanticErrorKind,
        span: Span,
    ) {
        self.em.emit_error(semantic::errors::SemanticError { kind, span });
    }

    /// Unwinds after a diagnostic has already been emitted.
    pub(crate) fn fatal<T>(&self, span: Span) -> Result<T> {
        Err(ParseError {
            kind: ParseErrorKind::Fatal,
            span,
        })
    }

    pub(crate) fn expected<T>(&self, expected: &'static str) -> Result<T> {
        let found = self.peek();
        let text = match found.kind {
            TokenKind::Eoi => "end of input".to_string(),
            _ => self.lexeme(found.span).to_string(),
        };
        Err(ParseError {
            kind: ParseErrorKind::ExpectedConstruct {
                expected,
                found: text,
            },
            span: found.span,
        })
    }
}
