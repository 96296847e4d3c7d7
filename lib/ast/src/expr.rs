use core::fmt::{self, Display};

use error_manager::ErrorManager;
use semantic::errors::{SemanticError, SemanticErrorKind, SemanticWarning, SemanticWarningKind};
use semantic::{Ty, TypeCtx};
use session::Symbol;
use span::Span;

use crate::promotion::{self, PromotionRule};
use crate::Ast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Address,
    /// `*p`
    Deref,
    /// the dereference half of `p->member`
    ArrowDeref,
    PrefixInc,
    PostfixInc,
    PrefixDec,
    PostfixDec,
    LogicalNot,
    Minus,
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Address => "&",
            UnaryOp::Deref => "*",
            UnaryOp::ArrowDeref => "->",
            UnaryOp::PrefixInc | UnaryOp::PostfixInc => "++",
            UnaryOp::PrefixDec | UnaryOp::PostfixDec => "--",
            UnaryOp::LogicalNot => "!",
            UnaryOp::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    /// `a[i]`
    Index,
}

impl BinaryOp {
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
        )
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub const fn as_str(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            LogicalAnd => "&&",
            LogicalOr => "||",
            Index => "[]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentStorage {
    /// Static storage, visible to the linker.
    Global,
    Local,
    Param,
    Function,
}

#[derive(Debug, Clone, Copy)]
pub enum LitKind {
    /// Raw digits (no radix prefix) plus the radix they are in.
    Int { raw: Symbol, radix: u8 },
    Str(Symbol),
    Null,
}

#[derive(Debug, Clone, Copy)]
pub enum ExpressionKind<'cx> {
    Literal(LitKind),
    Identifier {
        name: Symbol,
        internal: Symbol,
        storage: IdentStorage,
    },
    Unary {
        op: UnaryOp,
        child: &'cx Expression<'cx>,
    },
    Binary {
        op: BinaryOp,
        left: &'cx Expression<'cx>,
        right: &'cx Expression<'cx>,
    },
    /// The target type is the node's own type.
    Cast {
        expr: &'cx Expression<'cx>,
        implicit: bool,
    },
    Call {
        callee: &'cx Expression<'cx>,
        args: &'cx [&'cx Expression<'cx>],
    },
    Conditional {
        cond: &'cx Expression<'cx>,
        then_expr: &'cx Expression<'cx>,
        else_expr: &'cx Expression<'cx>,
    },
    Member {
        record: &'cx Expression<'cx>,
        field: Symbol,
    },
    /// Aggregate initializer.
    ExprVector(&'cx [&'cx Expression<'cx>]),
    /// Non-owning reference to a node owned elsewhere in the same
    /// tree; used to share a sub-expression.
    Proxy(&'cx Expression<'cx>),
}

#[derive(Debug, Clone, Copy)]
pub struct Expression<'cx> {
    pub ty: &'cx Ty<'cx>,
    pub span: Span,
    pub kind: ExpressionKind<'cx>,
}

impl<'cx> Expression<'cx> {
    pub fn literal_int(
        raw: Symbol,
        radix: u8,
        ty: &'cx Ty<'cx>,
        span: Span,
        ast: &Ast<'cx>,
    ) -> &'cx Expression<'cx> {
        ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Literal(LitKind::Int { raw, radix }),
        })
    }

    pub fn literal_str(
        value: Symbol,
        ty: &'cx Ty<'cx>,
        span: Span,
        ast: &Ast<'cx>,
    ) -> &'cx Expression<'cx> {
        ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Literal(LitKind::Str(value)),
        })
    }

    pub fn literal_null(ty: &'cx Ty<'cx>, span: Span, ast: &Ast<'cx>) -> &'cx Expression<'cx> {
        ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Literal(LitKind::Null),
        })
    }

    pub fn identifier(
        name: Symbol,
        internal: Symbol,
        storage: IdentStorage,
        ty: &'cx Ty<'cx>,
        span: Span,
        ast: &Ast<'cx>,
    ) -> &'cx Expression<'cx> {
        ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Identifier { name, internal, storage },
        })
    }

    pub fn proxy(target: &'cx Expression<'cx>, ast: &Ast<'cx>) -> &'cx Expression<'cx> {
        ast.alloc_expr(Expression {
            ty: target.ty,
            span: target.span,
            kind: ExpressionKind::Proxy(target),
        })
    }

    /// Wraps `expr` in an implicit cast to `to`. Promotion has
    /// already decided the cast is legal; a cast to the expression's
    /// own type is skipped.
    pub(crate) fn implicit_cast(
        expr: &'cx Expression<'cx>,
        to: &'cx Ty<'cx>,
        ast: &Ast<'cx>,
    ) -> &'cx Expression<'cx> {
        if Ty::equals(expr.ty, to) {
            return expr;
        }
        ast.alloc_expr(Expression {
            ty: to,
            span: expr.span,
            kind: ExpressionKind::Cast { expr, implicit: true },
        })
    }

    /// Converts `expr` to `to` under the implicit conversion rules.
    /// `None` when the conversion is illegal; the caller diagnoses.
    pub fn converted(
        expr: &'cx Expression<'cx>,
        to: &'cx Ty<'cx>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
    ) -> Option<&'cx Expression<'cx>> {
        tcx.convert(expr.ty, to)?;
        Some(Self::implicit_cast(expr, to, ast))
    }

    /// `( type ) expr`. More permissive than implicit conversion;
    /// the extra permissions warn.
    pub fn explicit_cast(
        expr: &'cx Expression<'cx>,
        to: &'cx Ty<'cx>,
        span: Span,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        if tcx.explicit_cast(expr.ty, to).is_none() {
            em.emit_error(SemanticError {
                kind: SemanticErrorKind::InvalidCast {
                    from: expr.ty.to_string(),
                    to: to.to_string(),
                },
                span,
            });
            return None;
        }

        if tcx.convert(expr.ty, to).is_none() {
            /* the cast is only legal because it is explicit */
            let kind = if expr.ty.is_pointer() != to.is_pointer() {
                SemanticWarningKind::PointerIntegerCast {
                    from: expr.ty.to_string(),
                    to: to.to_string(),
                }
            } else {
                SemanticWarningKind::PointerRefMismatch {
                    from: expr.ty.to_string(),
                    to: to.to_string(),
                }
            };
            em.emit_warning(SemanticWarning { kind, span });
        } else if expr.ty.has_const_flag() && !to.has_const_flag() && expr.ty.is_pointer() {
            em.emit_warning(SemanticWarning {
                kind: SemanticWarningKind::ConstDiscarded {
                    from: expr.ty.to_string(),
                    to: to.to_string(),
                },
                span,
            });
        }

        Some(ast.alloc_expr(Expression {
            ty: to,
            span,
            kind: ExpressionKind::Cast { expr, implicit: false },
        }))
    }

    /// Builds a unary expression, running promotion. With a location
    /// the failure path emits a diagnostic; without one it is a
    /// speculative query and just returns `None`.
    pub fn unary(
        op: UnaryOp,
        child: &'cx Expression<'cx>,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let (child, ty) = promotion::Unary { op, child, loc }.apply(ast, tcx, em)?;
        let span = loc.map_or(child.span, |l| l.join(&child.span));
        Some(ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Unary { op, child },
        }))
    }

    pub fn binary(
        op: BinaryOp,
        left: &'cx Expression<'cx>,
        right: &'cx Expression<'cx>,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let (left, right, ty) = promotion::Binary { op, left, right, loc }.apply(ast, tcx, em)?;
        Some(ast.alloc_expr(Expression {
            ty,
            span: left.span.join(&right.span),
            kind: ExpressionKind::Binary { op, left, right },
        }))
    }

    pub fn call(
        callee: &'cx Expression<'cx>,
        args: Vec<&'cx Expression<'cx>>,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let span = loc.unwrap_or(callee.span);
        let (callee, args, ty) = promotion::Call { callee, args, loc }.apply(ast, tcx, em)?;
        Some(ast.alloc_expr(Expression {
            ty,
            span,
            kind: ExpressionKind::Call { callee, args },
        }))
    }

    pub fn conditional(
        cond: &'cx Expression<'cx>,
        then_expr: &'cx Expression<'cx>,
        else_expr: &'cx Expression<'cx>,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let (then_expr, else_expr, ty) =
            promotion::Conditional { cond, then_expr, else_expr, loc }.apply(ast, tcx, em)?;
        Some(ast.alloc_expr(Expression {
            ty,
            span: cond.span.join(&else_expr.span),
            kind: ExpressionKind::Conditional { cond, then_expr, else_expr },
        }))
    }

    pub fn member(
        record: &'cx Expression<'cx>,
        field: Symbol,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let ty = promotion::Member { record, field, loc }.apply(ast, tcx, em)?;
        Some(ast.alloc_expr(Expression {
            ty,
            span: loc.map_or(record.span, |l| record.span.join(&l)),
            kind: ExpressionKind::Member { record, field },
        }))
    }

    /// `{ e, e, ... }` — every element is converted to `elem_ty`.
    pub fn expr_vector(
        elems: Vec<&'cx Expression<'cx>>,
        elem_ty: &'cx Ty<'cx>,
        loc: Option<Span>,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Option<&'cx Expression<'cx>> {
        let span = loc.unwrap_or_else(|| {
            elems
                .first()
                .map_or(Span::dummy(), |f| f.span.join(&elems.last().unwrap().span))
        });
        let elems = promotion::Vector { elems, elem_ty, loc }.apply(ast, tcx, em)?;
        let dim = elems.len() as u64;
        Some(ast.alloc_expr(Expression {
            ty: tcx.array(elem_ty, dim),
            span,
            kind: ExpressionKind::ExprVector(elems),
        }))
    }

    /// Whether the expression designates a memory location.
    pub fn has_address(&self) -> bool {
        match self.kind {
            ExpressionKind::Identifier { storage, .. } => storage != IdentStorage::Function,
            ExpressionKind::Unary { op: UnaryOp::Deref | UnaryOp::ArrowDeref, .. } => true,
            ExpressionKind::Member { record, .. } => record.has_address(),
            ExpressionKind::Binary { op: BinaryOp::Index | BinaryOp::Assign, .. } => true,
            ExpressionKind::Proxy(target) => target.has_address(),
            _ => false,
        }
    }

    /// Whether the expression may stand on the left of an assignment.
    pub fn is_lvalue(&self) -> bool {
        match self.kind {
            ExpressionKind::Identifier { storage, .. } => {
                storage != IdentStorage::Function && !self.ty.has_const_flag()
            }
            ExpressionKind::Unary { op: UnaryOp::Deref | UnaryOp::ArrowDeref, .. } => true,
            ExpressionKind::Binary { op: BinaryOp::Index, .. } => true,
            ExpressionKind::Member { record, .. } => record.is_lvalue(),
            ExpressionKind::Proxy(target) => target.is_lvalue(),
            _ => false,
        }
    }

    /// Whether the expression's value is known at compile time:
    /// either an arithmetic constant or an address constant.
    pub fn is_const(&self) -> bool {
        match self.kind {
            ExpressionKind::Literal(_) => true,
            ExpressionKind::Cast { expr, .. } => expr.is_const(),
            ExpressionKind::Proxy(target) => target.is_const(),
            ExpressionKind::Unary { op: UnaryOp::Minus | UnaryOp::LogicalNot, child } => {
                child.ty.is_integer() && child.is_const()
            }
            ExpressionKind::Unary { op: UnaryOp::Address, child } => {
                /* address constant: a static object's address */
                matches!(
                    child.kind,
                    ExpressionKind::Identifier { storage: IdentStorage::Global, .. }
                )
            }
            ExpressionKind::Binary { op, left, right } => {
                if op.is_assignment() {
                    return false;
                }
                let arithmetic = self.ty.is_integer()
                    && left.ty.is_integer()
                    && right.ty.is_integer()
                    && left.is_const()
                    && right.is_const();
                let address =
                    self.ty.is_pointer() && left.is_const() && right.is_const();
                arithmetic || address
            }
            ExpressionKind::ExprVector(elems) => elems.iter().all(|e| e.is_const()),
            ExpressionKind::Identifier { storage, .. } => storage == IdentStorage::Function,
            ExpressionKind::Call { .. }
            | ExpressionKind::Conditional { .. }
            | ExpressionKind::Member { .. }
            | ExpressionKind::Unary { .. } => false,
        }
    }
}

impl Display for Expression<'_> {
    /// Flat, source-like rendering, used by diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExpressionKind::Literal(LitKind::Int { raw, radix }) => match radix {
                16 => write!(f, "0x{raw}"),
                8 => write!(f, "0{raw}"),
                _ => write!(f, "{raw}"),
            },
            ExpressionKind::Literal(LitKind::Str(s)) => write!(f, "\"{s}\""),
            ExpressionKind::Literal(LitKind::Null) => write!(f, "nullptr"),
            ExpressionKind::Identifier { name, .. } => write!(f, "{name}"),
            ExpressionKind::Unary { op, child } => match op {
                UnaryOp::PostfixInc | UnaryOp::PostfixDec => {
                    write!(f, "{child}{}", op.as_str())
                }
                _ => write!(f, "{}{child}", op.as_str()),
            },
            ExpressionKind::Binary { op: BinaryOp::Index, left, right } => {
                write!(f, "{left}[{right}]")
            }
            ExpressionKind::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.as_str())
            }
            ExpressionKind::Cast { expr, implicit: true } => write!(f, "{expr}"),
            ExpressionKind::Cast { expr, implicit: false } => {
                write!(f, "({}) {expr}", self.ty)
            }
            ExpressionKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            ExpressionKind::Conditional { cond, then_expr, else_expr } => {
                write!(f, "{cond} ? {then_expr} : {else_expr}")
            }
            ExpressionKind::Member { record, field } => write!(f, "{record}.{field}"),
            ExpressionKind::ExprVector(elems) => {
                write!(f, "{{")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "}}")
            }
            ExpressionKind::Proxy(target) => write!(f, "{target}"),
        }
    }
}
