use lexer::token::TokenKind;
use semantic::errors::{SemanticError, SemanticErrorKind};
use semantic::Ty;
use symtab::ScopePolicy;

use crate::{Parser, Result};

impl<'a, 'cx> Parser<'a, 'cx> {
    pub(crate) fn ty(&mut self) -> Result<&'cx Ty<'cx>> {
        if self.match_type(TokenKind::Const) {
            let inner = self.ty()?;
            return Ok(self.tcx.const_of(inner));
        }
        if self.match_type(TokenKind::Arrow) {
            let inner = self.ty()?;
            return Ok(self.tcx.pointer(inner));
        }
        if self.match_type(TokenKind::Array) {
            return self.array_type();
        }
        if self.check(TokenKind::Fn) {
            return self.fn_type();
        }

        let tok = self.peek();
        let ty = match tok.kind {
            TokenKind::U8 => self.tcx.unsigned(8),
            TokenKind::U16 => self.tcx.unsigned(16),
            TokenKind::U32 => self.tcx.unsigned(32),
            TokenKind::U64 => self.tcx.unsigned(64),
            TokenKind::I8 => self.tcx.signed(8),
            TokenKind::I16 => self.tcx.signed(16),
            TokenKind::I32 => self.tcx.signed(32),
            TokenKind::I64 => self.tcx.signed(64),
            TokenKind::Bool => self.tcx.bool(),
            TokenKind::Void => self.tcx.void(),
            TokenKind::Float => self.tcx.float(),
            TokenKind::Double => self.tcx.double(),
            TokenKind::Identifier => {
                let name = session::intern(self.lexeme(tok.span));
                let Some(ty) = self.symtab.lookup_type(name, ScopePolicy::Any) else {
                    self.em.emit_error(SemanticError {
                        kind: SemanticErrorKind::UnknownTypeName(name),
                        span: tok.span,
                    });
                    return self.fatal(tok.span);
                };
                ty
            }
            _ => return self.expected("type"),
        };
        self.advance();
        Ok(ty)
    }

    /// `array [ dim ] of T` — an empty dimension leaves the array
    /// unbound, to be patched by an initializer.
    fn array_type(&mut self) -> Result<&'cx Ty<'cx>> {
        self.consume(TokenKind::LeftBracket)?;
        let dim = if self.check(TokenKind::RightBracket) {
            0
        } else {
            let expr = self.expression()?;
            let Some(value) = expr.const_int_value(self.em) else {
                self.em.emit_error(SemanticError {
                    kind: SemanticErrorKind::ConstantExpected,
                    span: expr.span,
                });
                return self.fatal(expr.span);
            };
            u64::try_from(value).unwrap_or(0)
        };
        self.consume(TokenKind::RightBracket)?;
        self.consume(TokenKind::Of)?;
        let elem = self.ty()?;
        Ok(self.tcx.array(elem, dim))
    }

    /// `fn ( :T, name: T, ... ): R` in type position. Parameter names
    /// are allowed and ignored.
    fn fn_type(&mut self) -> Result<&'cx Ty<'cx>> {
        self.consume(TokenKind::Fn)?;
        self.consume(TokenKind::LeftParen)?;

        let mut params = Vec::new();
        let mut varg = false;
        let mut first = true;
        while !self.match_type(TokenKind::RightParen) {
            if !first {
                self.consume(TokenKind::Comma)?;
            }
            first = false;
            if self.match_type(TokenKind::Ellipsis) {
                varg = true;
                self.consume(TokenKind::RightParen)?;
                break;
            }
            if self.check(TokenKind::Identifier) {
                self.advance();
            }
            self.consume(TokenKind::Colon)?;
            params.push(self.ty()?);
        }

        let ret = if self.match_type(TokenKind::Colon) {
            self.ty()?
        } else {
            self.tcx.void()
        };
        Ok(self.tcx.function(ret, params, varg))
    }
}
