use ast::{Function, Item, ItemKind, ParamDecl};
use lexer::token::TokenKind;
use semantic::errors::SemanticErrorKind;
use semantic::{EnumConstant, Field, Ty};
use symtab::{ScopePolicy, Storage};

use crate::{Parser, Result};

impl<'a, 'cx> Parser<'a, 'cx> {
    pub(crate) fn item(&mut self) -> Result<Item<'cx>> {
        match self.peek().kind {
            TokenKind::Fn => self.function(),
            TokenKind::Struct => self.struct_decl(),
            TokenKind::Enum => self.enum_decl(),
            TokenKind::Type => self.type_alias(),
            TokenKind::Local => {
                let (decl, span) = self.local_decl(Storage::Global)?;
                Ok(Item { span, kind: ItemKind::Global(decl) })
            }
            _ => self.expected("declaration"),
        }
    }

    /// `fn name(params): ret;` declares; a `{` body defines. The
    /// parameter scope opens before the body block, which therefore
    /// does not open its own.
    fn function(&mut self) -> Result<Item<'cx>> {
        let kw = self.consume(TokenKind::Fn)?.span;
        let (name, nspan) = self.consume_ident()?;
        self.consume(TokenKind::LeftParen)?;
        self.symtab.open_scope();

        let mut param_tys = Vec::new();
        let mut params = Vec::new();
        let mut varg = false;
        let mut first = true;
        let mut anon = 0_usize;

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

            /* a declaration may leave parameters unnamed */
            let (pname, pspan) = if self.check(TokenKind::Identifier) {
                self.consume_ident()?
            } else {
                anon += 1;
                (session::intern(&format!(".param{anon}")), self.peek().span)
            };
            self.consume(TokenKind::Colon)?;
            let pty = self.ty()?;

            let Some(entry) = self.symtab.add(pspan, pname, pty, Storage::Param) else {
                self.semantic_error(SemanticErrorKind::Redefined(pname), pspan);
                return self.fatal(pspan);
            };
            params.push(ParamDecl { name: pname, internal: entry.internal });
            param_tys.push(pty);
        }

        let ret = if self.match_type(TokenKind::Colon) {
            self.ty()?
        } else {
            self.tcx.void()
        };
        let fn_ty = self.tcx.function(ret, param_tys, varg);

        match self.symtab.lookup(name, ScopePolicy::Root) {
            Some(entry) => {
                if !Ty::equals(entry.ty, fn_ty) {
                    self.semantic_error(
                        SemanticErrorKind::FunctionSignatureConflict {
                            name,
                            old: entry.ty.to_string(),
                            new: fn_ty.to_string(),
                        },
                        nspan,
                    );
                    return self.fatal(nspan);
                }
            }
            None => {
                if self
                    .symtab
                    .add_to_root_scope(nspan, name, fn_ty, Storage::Function)
                    .is_none()
                {
                    self.semantic_error(SemanticErrorKind::Redefined(name), nspan);
                    return self.fatal(nspan);
                }
            }
        }

        let mut end = nspan;
        let body = if self.match_type(TokenKind::Semicolon) {
            None
        } else {
            self.current_fn_ret = Some(ret);
            let block = self.block(false)?;
            self.current_fn_ret = None;
            end = block.span;
            Some(&*self.ast.alloc_stmt(block))
        };
        self.symtab.close_scope();

        Ok(Item {
            span: kw.join(&end),
            kind: ItemKind::Function(Function {
                name,
                ty: fn_ty,
                params: self.ast.alloc_params(params),
                body,
            }),
        })
    }

    /// `struct Name;` declares an incomplete struct; a `{ ... }` body
    /// completes it, exactly once.
    fn struct_decl(&mut self) -> Result<Item<'cx>> {
        let kw = self.consume(TokenKind::Struct)?.span;
        let (name, nspan) = self.consume_ident()?;

        if self.match_type(TokenKind::Semicolon) {
            let ty = match self.symtab.lookup_type(name, ScopePolicy::Current) {
                Some(ty) => ty,
                None => {
                    let ty = self.tcx.struct_incomplete(name);
                    self.symtab.add_type(name, ty);
                    ty
                }
            };
            return Ok(Item {
                span: kw.join(&nspan),
                kind: ItemKind::TypeDef { name, ty },
            });
        }

        self.consume(TokenKind::LeftBrace)?;

        /* a pointer member may name its own struct: the incomplete
         * type is registered before the members parse */
        let ty = match self.symtab.lookup_type(name, ScopePolicy::Current) {
            Some(ty) if ty.struct_def().is_some_and(|d| !d.is_complete()) => ty,
            Some(_) => {
                self.semantic_error(SemanticErrorKind::StructRedefinition(name), nspan);
                return self.fatal(nspan);
            }
            None => {
                let ty = self.tcx.struct_incomplete(name);
                self.symtab.add_type(name, ty);
                ty
            }
        };

        let mut fields: Vec<Field<'cx>> = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            let (fname, fspan) = self.consume_ident()?;
            self.consume(TokenKind::Colon)?;
            let fty = self.ty()?;
            self.consume(TokenKind::Semicolon)?;

            if fields.iter().any(|f| f.name == fname) {
                self.semantic_error(SemanticErrorKind::Redefined(fname), fspan);
                return self.fatal(fspan);
            }
            fields.push(Field { name: fname, ty: fty });
        }
        let rbrace = self.consume(TokenKind::RightBrace)?.span;
        self.consume(TokenKind::Semicolon)?;

        if self.tcx.complete_struct(ty, fields).is_none() {
            self.semantic_error(SemanticErrorKind::StructRedefinition(name), nspan);
            return self.fatal(nspan);
        }

        Ok(Item {
            span: kw.join(&rbrace),
            kind: ItemKind::TypeDef { name, ty },
        })
    }

    /// `enum Name: base { A, B = expr, ... };` — enumerators register
    /// as constants of the enum type.
    fn enum_decl(&mut self) -> Result<Item<'cx>> {
        let kw = self.consume(TokenKind::Enum)?.span;
        let (name, nspan) = self.consume_ident()?;

        let base = if self.match_type(TokenKind::Colon) {
            let base = self.ty()?;
            if !base.is_integer() {
                self.semantic_error(
                    SemanticErrorKind::IntegerExpected(base.to_string()),
                    nspan,
                );
                return self.fatal(nspan);
            }
            base
        } else {
            self.tcx.signed(32)
        };

        let ty = self.tcx.enum_incomplete(name, base);
        if !self.symtab.add_type(name, ty) {
            self.semantic_error(SemanticErrorKind::Redefined(name), nspan);
            return self.fatal(nspan);
        }

        self.consume(TokenKind::LeftBrace)?;
        let mut constants = Vec::new();
        let mut next = 0_i64;
        while !self.check(TokenKind::RightBrace) {
            let (cname, cspan) = self.consume_ident()?;
            if self.match_type(TokenKind::Equal) {
                let expr = self.expression()?;
                let Some(value) = expr.const_int_value(self.em) else {
                    self.semantic_error(SemanticErrorKind::ConstantExpected, expr.span);
                    return self.fatal(expr.span);
                };
                next = value as i64;
            }
            if self
                .symtab
                .add_enum_constant(cspan, cname, ty, next)
                .is_none()
            {
                self.semantic_error(SemanticErrorKind::Redefined(cname), cspan);
                return self.fatal(cspan);
            }
            constants.push(EnumConstant { name: cname, value: next });
            next += 1;

            if !self.match_type(TokenKind::Comma) {
                break;
            }
        }
        let rbrace = self.consume(TokenKind::RightBrace)?.span;
        self.consume(TokenKind::Semicolon)?;

        /* a freshly minted enum always completes */
        let _ = self.tcx.complete_enum(ty, constants);

        Ok(Item {
            span: kw.join(&rbrace),
            kind: ItemKind::TypeDef { name, ty },
        })
    }

    /// `type Name = T;` — `Name` answers every query as `T` but keeps
    /// its own spelling in diagnostics.
    fn type_alias(&mut self) -> Result<Item<'cx>> {
        let kw = self.consume(TokenKind::Type)?.span;
        let (name, nspan) = self.consume_ident()?;
        self.consume(TokenKind::Equal)?;
        let target = self.ty()?;
        let semi = self.consume(TokenKind::Semicolon)?.span;

        let alias = self.tcx.alias_of(name, target);
        if !self.symtab.add_type(name, alias) {
            self.semantic_error(SemanticErrorKind::Redefined(name), nspan);
            return self.fatal(nspan);
        }

        Ok(Item {
            span: kw.join(&semi),
            kind: ItemKind::TypeDef { name, ty: alias },
        })
    }
}
