use ast::{Expression, LocalDecl, Statement, StatementKind};
use lexer::token::TokenKind;
use semantic::errors::SemanticErrorKind;
use span::Span;
use symtab::Storage;

use crate::{Parser, Result};

enum Init<'cx> {
    None,
    Expr(&'cx Expression<'cx>, Span),
    Vector(Vec<&'cx Expression<'cx>>, Span),
}

impl<'a, 'cx> Parser<'a, 'cx> {
    pub(crate) fn statement(&mut self) -> Result<Statement<'cx>> {
        match self.peek().kind {
            TokenKind::LeftBrace => self.block(true),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::Local => self.local_stmt(),
            TokenKind::Semicolon => {
                let span = self.advance().span;
                Ok(Statement { span, kind: StatementKind::Empty })
            }
            _ => {
                let expr = self.expression()?;
                let semi = self.consume(TokenKind::Semicolon)?.span;
                Ok(Statement {
                    span: expr.span.join(&semi),
                    kind: StatementKind::Expr(expr),
                })
            }
        }
    }

    pub(crate) fn block(&mut self, open_scope: bool) -> Result<Statement<'cx>> {
        let lbrace = self.consume(TokenKind::LeftBrace)?.span;
        if open_scope {
            self.symtab.open_scope();
        }

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_finished() {
            stmts.push(self.statement()?);
        }

        let rbrace = self.consume(TokenKind::RightBrace)?.span;
        if open_scope {
            self.symtab.close_scope();
        }
        Ok(Statement {
            span: lbrace.join(&rbrace),
            kind: StatementKind::Block(self.ast.alloc_stmts(stmts)),
        })
    }

    fn if_stmt(&mut self) -> Result<Statement<'cx>> {
        let kw = self.consume(TokenKind::If)?.span;
        self.consume(TokenKind::LeftParen)?;
        let cond = self.expression()?;
        self.consume(TokenKind::RightParen)?;

        let then_block = &*self.ast.alloc_stmt(self.block(true)?);
        let mut span = kw.join(&then_block.span);

        let else_block = if self.match_type(TokenKind::Else) {
            let blk = self.block(true)?;
            span = span.join(&blk.span);
            Some(&*self.ast.alloc_stmt(blk))
        } else {
            None
        };

        Ok(Statement {
            span,
            kind: StatementKind::If { cond, then_block, else_block },
        })
    }

    fn while_stmt(&mut self) -> Result<Statement<'cx>> {
        let kw = self.consume(TokenKind::While)?.span;
        self.consume(TokenKind::LeftParen)?;
        let cond = self.expression()?;
        self.consume(TokenKind::RightParen)?;

        let body = &*self.ast.alloc_stmt(self.block(true)?);
        Ok(Statement {
            span: kw.join(&body.span),
            kind: StatementKind::While { cond, body },
        })
    }

    fn for_stmt(&mut self) -> Result<Statement<'cx>> {
        let kw = self.consume(TokenKind::For)?.span;
        self.symtab.open_scope();
        self.consume(TokenKind::LeftParen)?;

        let init = if self.match_type(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Local) {
            /* consumes its own semicolon */
            Some(&*self.ast.alloc_stmt(self.local_stmt()?))
        } else {
            let expr = self.expression()?;
            let semi = self.consume(TokenKind::Semicolon)?.span;
            Some(&*self.ast.alloc_stmt(Statement {
                span: expr.span.join(&semi),
                kind: StatementKind::Expr(expr),
            }))
        };

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon)?;

        let update = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen)?;

        /* the for header's scope covers the body */
        let body = &*self.ast.alloc_stmt(self.block(false)?);
        self.symtab.close_scope();

        Ok(Statement {
            span: kw.join(&body.span),
            kind: StatementKind::For { init, cond, update, body },
        })
    }

    fn return_stmt(&mut self) -> Result<Statement<'cx>> {
        let kw = self.consume(TokenKind::Return)?.span;
        let ret_ty = self.current_fn_ret.unwrap_or_else(|| self.tcx.void());

        let expr = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        let semi = self.consume(TokenKind::Semicolon)?.span;

        let expr = match expr {
            Some(value) if ret_ty.is_void() => {
                self.semantic_error(
                    SemanticErrorKind::VoidReturn(value.ty.to_string()),
                    value.span,
                );
                return self.fatal(value.span);
            }
            Some(value) => {
                let Some(converted) = Expression::converted(value, ret_ty, self.ast, self.tcx)
                else {
                    self.semantic_error(
                        SemanticErrorKind::ReturnType {
                            expected: ret_ty.to_string(),
                            got: value.ty.to_string(),
                        },
                        value.span,
                    );
                    return self.fatal(value.span);
                };
                Some(converted)
            }
            None if !ret_ty.is_void() => {
                self.semantic_error(
                    SemanticErrorKind::ReturnType {
                        expected: ret_ty.to_string(),
                        got: "void".to_string(),
                    },
                    kw,
                );
                return self.fatal(kw);
            }
            None => None,
        };

        Ok(Statement {
            span: kw.join(&semi),
            kind: StatementKind::Return(expr),
        })
    }

    fn local_stmt(&mut self) -> Result<Statement<'cx>> {
        let (decl, span) = self.local_decl(Storage::Local)?;
        Ok(Statement { span, kind: StatementKind::Local(decl) })
    }

    /// `local name: T;` / `local name: T = init;` — shared by local
    /// statements and file-scope definitions. The initializer is a
    /// definition, not an assignment: it converts to the declared
    /// type and may target a read-only slot.
    pub(crate) fn local_decl(
        &mut self,
        storage: Storage,
    ) -> Result<(LocalDecl<'cx>, Span)> {
        let kw = self.consume(TokenKind::Local)?.span;
        let (name, nspan) = self.consume_ident()?;
        self.consume(TokenKind::Colon)?;
        let mut ty = self.ty()?;

        let init = if self.match_type(TokenKind::Equal) {
            let eq = self.tokens[self.current - 1].span;
            if self.check(TokenKind::LeftBrace) {
                let lbrace = self.advance().span;
                let mut elems = Vec::new();
                let mut first = true;
                while !self.match_type(TokenKind::RightBrace) {
                    if !first {
                        self.consume(TokenKind::Comma)?;
                    }
                    first = false;
                    elems.push(self.expression()?);
                }
                Init::Vector(elems, lbrace)
            } else {
                Init::Expr(self.expression()?, eq)
            }
        } else {
            Init::None
        };
        let semi = self.consume(TokenKind::Semicolon)?.span;
        let span = kw.join(&semi);

        if let Init::Vector(elems, _) = &init {
            ty = self.tcx.patch_unbound(ty, elems.len() as u64);
        }

        let Some(entry) = self.symtab.add(nspan, name, ty, storage) else {
            self.semantic_error(SemanticErrorKind::Redefined(name), nspan);
            return self.fatal(nspan);
        };

        let decl = |init| LocalDecl { name, internal: entry.internal, ty, init };

        match init {
            Init::None => Ok((decl(None), span)),
            Init::Expr(value, eq) => {
                if storage == Storage::Global && !value.is_const() {
                    self.semantic_error(SemanticErrorKind::ConstantExpected, value.span);
                    return self.fatal(value.span);
                }
                let Some(converted) = Expression::converted(value, ty, self.ast, self.tcx)
                else {
                    self.semantic_error(
                        SemanticErrorKind::InitializerType {
                            expected: ty.to_string(),
                            got: value.ty.to_string(),
                        },
                        eq.join(&value.span),
                    );
                    return self.fatal(value.span);
                };
                Ok((decl(Some(converted)), span))
            }
            Init::Vector(elems, lbrace) => {
                if !ty.is_array() {
                    self.semantic_error(
                        SemanticErrorKind::InitializerType {
                            expected: ty.to_string(),
                            got: "{...}".to_string(),
                        },
                        lbrace,
                    );
                    return self.fatal(lbrace);
                }
                if elems.len() as u64 > ty.dim() {
                    self.semantic_error(
                        SemanticErrorKind::InitializerTooLong {
                            expected: ty.dim(),
                            got: elems.len() as u64,
                        },
                        lbrace,
                    );
                    return self.fatal(lbrace);
                }

                let elem_ty = ty.ref_type().unwrap();
                let Some(vector) = Expression::expr_vector(
                    elems,
                    elem_ty,
                    Some(lbrace),
                    self.ast,
                    self.tcx,
                    self.em,
                ) else {
                    return self.fatal(lbrace);
                };
                if storage == Storage::Global && !vector.is_const() {
                    self.semantic_error(SemanticErrorKind::ConstantExpected, lbrace);
                    return self.fatal(lbrace);
                }
                Ok((decl(Some(vector)), span))
            }
        }
    }
}
