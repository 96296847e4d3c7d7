//! Expression parsing: precedence climbing over a fixed
//! token-to-operator table, folding through promotion at every step.

use ast::{BinaryOp, Expression, IdentStorage, UnaryOp};
use lexer::token::TokenKind;
use lexer::unescaped::Unescaped;
use semantic::errors::{SemanticError, SemanticErrorKind};
use semantic::Ty;
use span::Span;
use symtab::{ScopePolicy, Storage};

use crate::{Parser, Result};

/// Binding power of a binary operator token. Assignments are not
/// here: they nest right-to-left through [`Parser::assignment`].
fn precedence(kind: TokenKind) -> Option<u8> {
    let prec = match kind {
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => 13,
        TokenKind::Plus | TokenKind::Minus => 11,
        TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual => 10,
        TokenKind::EqualEqual | TokenKind::BangEqual => 9,
        TokenKind::AmpAmp => 5,
        TokenKind::PipePipe => 4,
        _ => return None,
    };
    Some(prec)
}

fn binary_op(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Equal => BinaryOp::Assign,
        TokenKind::PlusEqual => BinaryOp::AddAssign,
        TokenKind::MinusEqual => BinaryOp::SubAssign,
        TokenKind::AsteriskEqual => BinaryOp::MulAssign,
        TokenKind::SlashEqual => BinaryOp::DivAssign,
        TokenKind::PercentEqual => BinaryOp::ModAssign,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::AmpAmp => BinaryOp::LogicalAnd,
        TokenKind::PipePipe => BinaryOp::LogicalOr,
        _ => unreachable!("not a binary operator: {kind}"),
    }
}

impl<'a, 'cx> Parser<'a, 'cx> {
    pub(crate) fn expression(&mut self) -> Result<&'cx Expression<'cx>> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<&'cx Expression<'cx>> {
        let left = self.conditional()?;
        if self.peek().kind.is_assignment() {
            let op_tok = self.advance();
            let right = self.assignment()?;
            return self
                .binary_fold(binary_op(op_tok.kind), left, right, op_tok.span);
        }
        Ok(left)
    }

    fn conditional(&mut self) -> Result<&'cx Expression<'cx>> {
        let cond = self.binary(1)?;
        if !self.match_type(TokenKind::Question) {
            return Ok(cond);
        }
        let qspan = self.tokens[self.current - 1].span;
        let then_expr = self.expression()?;
        self.consume(TokenKind::Colon)?;
        let else_expr = self.conditional()?;

        match Expression::conditional(
            cond,
            then_expr,
            else_expr,
            Some(qspan),
            self.ast,
            self.tcx,
            self.em,
        ) {
            Some(expr) => Ok(expr),
            None => self.fatal(qspan),
        }
    }

    fn binary(&mut self, min_prec: u8) -> Result<&'cx Expression<'cx>> {
        let mut left = self.unary()?;
        loop {
            let Some(prec) = precedence(self.peek().kind) else { break };
            if prec < min_prec {
                break;
            }
            let op_tok = self.advance();
            let right = self.binary(prec + 1)?;
            left = self.binary_fold(binary_op(op_tok.kind), left, right, op_tok.span)?;
        }
        Ok(left)
    }

    fn binary_fold(
        &mut self,
        op: BinaryOp,
        left: &'cx Expression<'cx>,
        right: &'cx Expression<'cx>,
        op_span: Span,
    ) -> Result<&'cx Expression<'cx>> {
        match Expression::binary(op, left, right, Some(op_span), self.ast, self.tcx, self.em) {
            Some(expr) => Ok(expr),
            None => self.fatal(op_span),
        }
    }

    fn unary(&mut self) -> Result<&'cx Expression<'cx>> {
        let op = match self.peek().kind {
            TokenKind::Ampersand => UnaryOp::Address,
            TokenKind::Asterisk => UnaryOp::Deref,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Bang => UnaryOp::LogicalNot,
            TokenKind::PlusPlus => UnaryOp::PrefixInc,
            TokenKind::MinusMinus => UnaryOp::PrefixDec,
            _ => return self.postfix(),
        };
        let op_tok = self.advance();
        let child = self.unary()?;
        match Expression::unary(op, child, Some(op_tok.span), self.ast, self.tcx, self.em) {
            Some(expr) => Ok(expr),
            None => self.fatal(op_tok.span),
        }
    }

    fn postfix(&mut self) -> Result<&'cx Expression<'cx>> {
        let mut expr = self.primary()?;
        loop {
            if self.match_type(TokenKind::LeftParen) {
                let lparen = self.tokens[self.current - 1].span;
                let mut args = Vec::new();
                let mut first = true;
                while !self.match_type(TokenKind::RightParen) {
                    if !first {
                        self.consume(TokenKind::Comma)?;
                    }
                    first = false;
                    args.push(self.expression()?);
                }
                expr = match Expression::call(
                    expr,
                    args,
                    Some(lparen),
                    self.ast,
                    self.tcx,
                    self.em,
                ) {
                    Some(e) => e,
                    None => return self.fatal(lparen),
                };
            } else if self.match_type(TokenKind::LeftBracket) {
                let bracket = self.tokens[self.current - 1].span;
                let index = self.expression()?;
                self.consume(TokenKind::RightBracket)?;
                expr = self.binary_fold(BinaryOp::Index, expr, index, bracket)?;
            } else if self.match_type(TokenKind::Dot) {
                let (field, fspan) = self.consume_ident()?;
                expr = self.member_fold(expr, field, fspan)?;
            } else if self.match_type(TokenKind::Arrow) {
                let arrow = self.tokens[self.current - 1].span;
                let (field, fspan) = self.consume_ident()?;
                let record = match Expression::unary(
                    UnaryOp::ArrowDeref,
                    expr,
                    Some(arrow),
                    self.ast,
                    self.tcx,
                    self.em,
                ) {
                    Some(e) => e,
                    None => return self.fatal(arrow),
                };
                expr = self.member_fold(record, field, fspan)?;
            } else if self.match_type(TokenKind::PlusPlus) {
                let span = self.tokens[self.current - 1].span;
                expr = self.postfix_fold(UnaryOp::PostfixInc, expr, span)?;
            } else if self.match_type(TokenKind::MinusMinus) {
                let span = self.tokens[self.current - 1].span;
                expr = self.postfix_fold(UnaryOp::PostfixDec, expr, span)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn member_fold(
        &mut self,
        record: &'cx Expression<'cx>,
        field: session::Symbol,
        field_span: Span,
    ) -> Result<&'cx Expression<'cx>> {
        match Expression::member(record, field, Some(field_span), self.ast, self.tcx, self.em) {
            Some(e) => Ok(e),
            None => self.fatal(field_span),
        }
    }

    fn postfix_fold(
        &mut self,
        op: UnaryOp,
        child: &'cx Expression<'cx>,
        span: Span,
    ) -> Result<&'cx Expression<'cx>> {
        match Expression::unary(op, child, Some(span), self.ast, self.tcx, self.em) {
            Some(e) => Ok(e),
            None => self.fatal(span),
        }
    }

    /// Whether the current token can open a type, which decides
    /// between `( type ) expr` and a parenthesized expression.
    pub(crate) fn type_starts(&self) -> bool {
        let kind = self.peek().kind;
        if kind.is_integer_type_keyword() {
            return true;
        }
        match kind {
            TokenKind::Bool
            | TokenKind::Void
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Const
            | TokenKind::Arrow
            | TokenKind::Fn
            | TokenKind::Array => true,
            TokenKind::Identifier => {
                let sym = session::intern(self.lexeme(self.peek().span));
                self.symtab.lookup_type(sym, ScopePolicy::Any).is_some()
            }
            _ => false,
        }
    }

    fn int_suffix(&mut self) -> Option<&'cx Ty<'cx>> {
        let kind = self.peek().kind;
        if !kind.is_integer_type_keyword() {
            return None;
        }
        self.advance();
        Some(match kind {
            TokenKind::U8 => self.tcx.unsigned(8),
            TokenKind::U16 => self.tcx.unsigned(16),
            TokenKind::U32 => self.tcx.unsigned(32),
            TokenKind::U64 => self.tcx.unsigned(64),
            TokenKind::I8 => self.tcx.signed(8),
            TokenKind::I16 => self.tcx.signed(16),
            TokenKind::I32 => self.tcx.signed(32),
            TokenKind::I64 => self.tcx.signed(64),
            _ => unreachable!(),
        })
    }

    fn primary(&mut self) -> Result<&'cx Expression<'cx>> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Identifier => {
                self.advance();
                let name = session::intern(self.lexeme(tok.span));
                let Some(entry) = self.symtab.lookup(name, ScopePolicy::Any) else {
                    self.em.emit_error(SemanticError {
                        kind: SemanticErrorKind::UndefinedIdentifier(name),
                        span: tok.span,
                    });
                    return self.fatal(tok.span);
                };
                if entry.storage == Storage::EnumConstant {
                    let value = entry.value.unwrap_or(0);
                    let raw = session::intern(&value.unsigned_abs().to_string());
                    let lit = Expression::literal_int(raw, 10, entry.ty, tok.span, self.ast);
                    if value >= 0 {
                        return Ok(lit);
                    }
                    return match Expression::unary(
                        UnaryOp::Minus,
                        lit,
                        Some(tok.span),
                        self.ast,
                        self.tcx,
                        self.em,
                    ) {
                        Some(e) => Ok(e),
                        None => self.fatal(tok.span),
                    };
                }
                let storage = match entry.storage {
                    Storage::Global => IdentStorage::Global,
                    Storage::Local => IdentStorage::Local,
                    Storage::Param => IdentStorage::Param,
                    Storage::Function => IdentStorage::Function,
                    Storage::EnumConstant => unreachable!(),
                };
                Ok(Expression::identifier(
                    name,
                    entry.internal,
                    storage,
                    entry.ty,
                    tok.span,
                    self.ast,
                ))
            }
            TokenKind::DecimalLiteral => {
                self.advance();
                let raw = session::intern(self.lexeme(tok.span));
                let ty = self.int_suffix().unwrap_or_else(|| self.tcx.signed(64));
                Ok(Expression::literal_int(raw, 10, ty, tok.span, self.ast))
            }
            TokenKind::HexadecimalLiteral => {
                self.advance();
                let digits = &self.lexeme(tok.span)[2..];
                let raw = session::intern(digits);
                let ty = self.int_suffix().unwrap_or_else(|| self.tcx.signed(64));
                Ok(Expression::literal_int(raw, 16, ty, tok.span, self.ast))
            }
            TokenKind::OctalLiteral => {
                self.advance();
                let digits = &self.lexeme(tok.span)[1..];
                let raw = session::intern(digits);
                let ty = self.int_suffix().unwrap_or_else(|| self.tcx.signed(64));
                Ok(Expression::literal_int(raw, 8, ty, tok.span, self.ast))
            }
            TokenKind::CharLiteral => {
                self.advance();
                let inner = self
                    .lexeme(tok.span)
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .unwrap_or("");
                let value = Unescaped::from(inner).next().unwrap_or('\0');
                let raw = session::intern(&u32::from(value).to_string());
                let ty = self.int_suffix().unwrap_or_else(|| self.tcx.char_type());
                Ok(Expression::literal_int(raw, 10, ty, tok.span, self.ast))
            }
            TokenKind::StringLiteral => {
                self.advance();
                let inner = self
                    .lexeme(tok.span)
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or("");
                let unescaped: String = Unescaped::from(inner).collect();
                let value = session::intern(&unescaped);
                let ty = self.tcx.pointer(self.tcx.unsigned(8));
                Ok(Expression::literal_str(value, ty, tok.span, self.ast))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                let raw = session::intern(if tok.kind == TokenKind::True { "1" } else { "0" });
                Ok(Expression::literal_int(raw, 10, self.tcx.bool(), tok.span, self.ast))
            }
            TokenKind::Nullptr => {
                self.advance();
                Ok(Expression::literal_null(self.tcx.null_pointer(), tok.span, self.ast))
            }
            TokenKind::LeftParen => {
                self.advance();
                if self.type_starts() {
                    let to = self.ty()?;
                    self.consume(TokenKind::RightParen)?;
                    let operand = self.unary()?;
                    let span = tok.span.join(&operand.span);
                    return match Expression::explicit_cast(
                        operand, to, span, self.ast, self.tcx, self.em,
                    ) {
                        Some(e) => Ok(e),
                        None => self.fatal(span),
                    };
                }
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => self.expected("expression"),
        }
    }
}
