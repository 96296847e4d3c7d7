//! Promotion: given an operator and its untyped operands, decide the
//! result type, wrap operands in the implicit casts the operator
//! demands, and reject illegal combinations.
//!
//! Every rule runs in one of two modes. With a location it is
//! committed: failures emit a diagnostic. Without one it is
//! speculative: failures just return `None` and the caller picks
//! another rule.

use error_manager::ErrorManager;
use semantic::errors::{SemanticError, SemanticErrorKind, SemanticWarning, SemanticWarningKind};
use semantic::{Ty, TypeCtx};
use session::Symbol;
use span::Span;

use crate::expr::{BinaryOp, Expression, UnaryOp};
use crate::Ast;

pub(crate) trait PromotionRule<'cx> {
    type Result;

    fn apply(
        &self,
        ast: &Ast<'cx>,
        tcx: &TypeCtx<'cx>,
        em: &mut ErrorManager,
    ) -> Self::Result;
}

/// Emits `kind` at `span`, unless the rule runs speculatively.
fn emit(loc: Option<Span>, em: &mut ErrorManager, kind: SemanticErrorKind, span: Span) {
    if loc.is_some() {
        em.emit_error(SemanticError { kind, span });
    }
}

pub(crate) struct Unary<'cx> {
    pub op: UnaryOp,
    pub child: &'cx Expression<'cx>,
    pub loc: Option<Span>,
}

type UnaryResult<'cx> = Option<(&'cx Expression<'cx>, &'cx Ty<'cx>)>;

impl<'cx> Unary<'cx> {
    fn err(&self, em: &mut ErrorManager) -> UnaryResult<'cx> {
        emit(
            self.loc,
            em,
            SemanticErrorKind::UnaryOperands {
                op: self.op.as_str(),
                operand: self.child.to_string(),
                ty: self.child.ty.to_string(),
            },
            self.loc.unwrap_or(self.child.span),
        );
        None
    }
}

impl<'cx> PromotionRule<'cx> for Unary<'cx> {
    type Result = UnaryResult<'cx>;

    fn apply(&self, _ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        let child = self.child;
        match self.op {
            UnaryOp::Address => {
                if child.has_address() {
                    Some((child, tcx.pointer(child.ty)))
                } else {
                    self.err(em)
                }
            }
            UnaryOp::Deref | UnaryOp::ArrowDeref => {
                if child.ty.is_null_ptr() {
                    emit(self.loc, em, SemanticErrorKind::DerefNullPointer, child.span);
                    return None;
                }
                if child.ty.is_pointer() {
                    Some((child, child.ty.ref_type().unwrap()))
                } else {
                    self.err(em)
                }
            }
            UnaryOp::PrefixInc | UnaryOp::PostfixInc | UnaryOp::PrefixDec | UnaryOp::PostfixDec => {
                if child.ty.has_const_flag() {
                    let repr = child.to_string();
                    let kind = match self.op {
                        UnaryOp::PrefixInc | UnaryOp::PostfixInc => {
                            SemanticErrorKind::IncrementReadonly(repr)
                        }
                        _ => SemanticErrorKind::DecrementReadonly(repr),
                    };
                    emit(self.loc, em, kind, child.span);
                    return None;
                }
                if !child.is_lvalue() {
                    emit(
                        self.loc,
                        em,
                        SemanticErrorKind::NotAnLvalue(child.to_string()),
                        child.span,
                    );
                    return None;
                }
                if child.ty.is_integer() || child.ty.is_pointer() {
                    Some((child, child.ty))
                } else {
                    self.err(em)
                }
            }
            UnaryOp::LogicalNot => {
                if child.ty.is_integer() {
                    Some((child, child.ty))
                } else if child.ty.is_pointer() {
                    Some((child, tcx.bool()))
                } else {
                    self.err(em)
                }
            }
            UnaryOp::Minus => {
                if child.ty.is_integer() || child.ty.is_float_type() {
                    Some((child, child.ty))
                } else {
                    self.err(em)
                }
            }
        }
    }
}

pub(crate) struct Binary<'cx> {
    pub op: BinaryOp,
    pub left: &'cx Expression<'cx>,
    pub right: &'cx Expression<'cx>,
    pub loc: Option<Span>,
}

type BinaryResult<'cx> = Option<(&'cx Expression<'cx>, &'cx Expression<'cx>, &'cx Ty<'cx>)>;

impl<'cx> PromotionRule<'cx> for Binary<'cx> {
    type Result = BinaryResult<'cx>;

    fn apply(&self, ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        binary(self.op, self.left, self.right, self.loc, ast, tcx, em)
    }
}

/// Dispatch by operand shape, the most structured shape first.
fn binary<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    if left.ty.is_struct() || right.ty.is_struct() {
        binary_struct(op, left, right, loc, ast, tcx, em)
    } else if left.ty.is_array() || right.ty.is_array() {
        binary_array(op, left, right, loc, ast, tcx, em)
    } else if left.ty.is_pointer() || right.ty.is_pointer() {
        binary_ptr(op, left, right, loc, ast, tcx, em)
    } else if left.ty.is_integer() && right.ty.is_integer() {
        binary_int(op, left, right, loc, ast, tcx, em)
    } else {
        binary_err(op, left, right, loc, em)
    }
}

fn binary_err<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    emit(
        loc,
        em,
        SemanticErrorKind::BinaryOperands {
            op: op.as_str(),
            left: left.to_string(),
            left_ty: left.ty.to_string(),
            right: right.to_string(),
            right_ty: right.ty.to_string(),
        },
        loc.unwrap_or_else(|| left.span.join(&right.span)),
    );
    None
}

/// Assignment-target sanity shared by every assigning operator.
fn check_assign_target<'cx>(
    left: &'cx Expression<'cx>,
    loc: Option<Span>,
    em: &mut ErrorManager,
) -> bool {
    if left.ty.has_const_flag() {
        emit(
            loc,
            em,
            SemanticErrorKind::AssignToReadonly(left.to_string()),
            left.span,
        );
        return false;
    }
    if !left.is_lvalue() {
        emit(
            loc,
            em,
            SemanticErrorKind::NotAnLvalue(left.to_string()),
            left.span,
        );
        return false;
    }
    true
}

fn binary_int<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    debug_assert!(left.ty.is_integer() && right.ty.is_integer());

    /* when mixing signed and unsigned, unsigned wins */
    let common = tcx.common(left.ty, right.ty).unwrap();

    use BinaryOp::*;
    let (ty, new_left, new_right) = match op {
        Assign | AddAssign | SubAssign | MulAssign | DivAssign | ModAssign => {
            if !check_assign_target(left, loc, em) {
                return None;
            }
            (left.ty, left.ty, left.ty)
        }
        Add | Sub | Mul | Div | Mod => (common, common, common),
        Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
            (tcx.bool(), common, common)
        }
        LogicalAnd | LogicalOr => (tcx.bool(), tcx.bool(), tcx.bool()),
        Index => return binary_err(op, left, right, loc, em),
    };

    let left = Expression::implicit_cast(left, new_left, ast);
    let right = Expression::implicit_cast(right, new_right, ast);
    Some((left, right, ty))
}

fn binary_ptr<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    /* canonical form: the pointer of `ptr + int` goes left */
    let (left, right) = if op == BinaryOp::Add && !left.ty.is_pointer() {
        (right, left)
    } else {
        (left, right)
    };

    use BinaryOp::*;
    match op {
        Assign => {
            if !check_assign_target(left, loc, em) {
                return None;
            }
            if tcx.convert(right.ty, left.ty).is_none() {
                return binary_err(op, left, right, loc, em);
            }
            if loc.is_some()
                && let (Some(from_ref), Some(to_ref)) = (right.ty.ref_type(), left.ty.ref_type())
                && from_ref.has_const_flag()
                && !to_ref.has_const_flag()
            {
                em.emit_warning(SemanticWarning {
                    kind: SemanticWarningKind::ConstDiscarded {
                        from: right.ty.to_string(),
                        to: left.ty.to_string(),
                    },
                    span: loc.unwrap(),
                });
            }
            let right = Expression::implicit_cast(right, left.ty, ast);
            Some((left, right, left.ty))
        }
        Index => {
            if !right.ty.is_integer() {
                emit(
                    loc,
                    em,
                    SemanticErrorKind::IntegerExpected(right.ty.to_string()),
                    right.span,
                );
                return None;
            }
            if left.ty.is_null_ptr() {
                emit(loc, em, SemanticErrorKind::DerefNullPointer, left.span);
                return None;
            }
            let elem = left.ty.ref_type().unwrap();
            let right = Expression::implicit_cast(right, tcx.size_type(), ast);
            Some((left, right, elem))
        }
        AddAssign => {
            if !right.ty.is_integer() {
                return binary_err(op, left, right, loc, em);
            }
            if !check_assign_target(left, loc, em) {
                return None;
            }
            Some((left, right, left.ty))
        }
        SubAssign => {
            if !right.ty.is_integer() {
                return binary_err(op, left, right, loc, em);
            }
            if !check_assign_target(left, loc, em) {
                return None;
            }
            let right = Expression::implicit_cast(right, tcx.size_type(), ast);
            Some((left, right, left.ty))
        }
        Add => {
            if right.ty.is_integer() && left.ty.is_pointer() && !left.ty.is_null_ptr() {
                Some((left, right, left.ty))
            } else {
                binary_err(op, left, right, loc, em)
            }
        }
        Sub => {
            if right.ty.is_integer() && left.ty.is_pointer() && !left.ty.is_null_ptr() {
                return Some((left, right, left.ty));
            }
            if left.ty.is_pointer()
                && right.ty.is_pointer()
                && !left.ty.is_null_ptr()
                && !right.ty.is_null_ptr()
            {
                let le = left.ty.ref_type().unwrap();
                let re = right.ty.ref_type().unwrap();
                if Ty::equals(tcx.const_removed(le), tcx.const_removed(re)) {
                    return Some((left, right, tcx.signed(64)));
                }
            }
            binary_err(op, left, right, loc, em)
        }
        Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
            Some((left, right, tcx.bool()))
        }
        LogicalAnd | LogicalOr => {
            let left = Expression::implicit_cast(left, tcx.bool(), ast);
            let right = Expression::implicit_cast(right, tcx.bool(), ast);
            Some((left, right, tcx.bool()))
        }
        Mul | Div | Mod | MulAssign | DivAssign | ModAssign => {
            binary_err(op, left, right, loc, em)
        }
    }
}

fn binary_array<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    /*
     * Arrays in an expression decay to pointers, like in C.
     * One exception: assignment between equal array types copies.
     */
    use BinaryOp::*;
    match op {
        Index => {
            if !right.ty.is_integer() {
                emit(
                    loc,
                    em,
                    SemanticErrorKind::IntegerExpected(right.ty.to_string()),
                    right.span,
                );
                return None;
            }
            let Some(elem) = left.ty.ref_type() else {
                return binary_err(op, left, right, loc, em);
            };
            let right = Expression::implicit_cast(right, tcx.size_type(), ast);
            Some((left, right, elem))
        }
        Assign => {
            if left.ty.is_pointer() && right.ty.is_array() {
                let decayed = tcx.pointer(right.ty.ref_type().unwrap());
                let right = Expression::implicit_cast(right, decayed, ast);
                return binary(op, left, right, loc, ast, tcx, em);
            }
            if !left.ty.is_array() || !right.ty.is_array() {
                return binary_err(op, left, right, loc, em);
            }
            if !check_assign_target(left, loc, em) {
                return None;
            }
            if tcx.convert(right.ty, left.ty).is_none() {
                return binary_err(op, left, right, loc, em);
            }
            let right = Expression::implicit_cast(right, left.ty, ast);
            Some((left, right, left.ty))
        }
        _ => {
            let left = decay(left, ast, tcx);
            let right = decay(right, ast, tcx);
            binary(op, left, right, loc, ast, tcx, em)
        }
    }
}

/// Array-to-pointer decay. Idempotent: non-arrays pass through.
fn decay<'cx>(
    expr: &'cx Expression<'cx>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
) -> &'cx Expression<'cx> {
    if expr.ty.is_array() {
        let ptr = tcx.pointer(expr.ty.ref_type().unwrap());
        Expression::implicit_cast(expr, ptr, ast)
    } else {
        expr
    }
}

fn binary_struct<'cx>(
    op: BinaryOp,
    left: &'cx Expression<'cx>,
    right: &'cx Expression<'cx>,
    loc: Option<Span>,
    ast: &Ast<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> BinaryResult<'cx> {
    if op != BinaryOp::Assign {
        return binary_err(op, left, right, loc, em);
    }
    if !check_assign_target(left, loc, em) {
        return None;
    }
    if tcx.convert(right.ty, left.ty).is_none() {
        return binary_err(op, left, right, loc, em);
    }
    let right = Expression::implicit_cast(right, left.ty, ast);
    Some((left, right, left.ty))
}

pub(crate) struct Call<'cx> {
    pub callee: &'cx Expression<'cx>,
    pub args: Vec<&'cx Expression<'cx>>,
    pub loc: Option<Span>,
}

type CallResult<'cx> =
    Option<(&'cx Expression<'cx>, &'cx [&'cx Expression<'cx>], &'cx Ty<'cx>)>;

impl<'cx> PromotionRule<'cx> for Call<'cx> {
    type Result = CallResult<'cx>;

    fn apply(&self, ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        let callee = self.callee;

        let Some((params, ret, varg)) = callee.ty.as_function_type() else {
            emit(
                self.loc,
                em,
                SemanticErrorKind::NotAFunction(callee.ty.to_string()),
                callee.span,
            );
            return None;
        };

        if self.args.len() < params.len() {
            emit(
                self.loc,
                em,
                SemanticErrorKind::TooFewArguments,
                self.loc.unwrap_or(callee.span),
            );
            return None;
        }
        if self.args.len() > params.len() && !varg {
            emit(
                self.loc,
                em,
                SemanticErrorKind::TooManyArguments,
                self.loc.unwrap_or(callee.span),
            );
            return None;
        }

        let mut failed = false;
        let mut out = Vec::with_capacity(self.args.len());
        for (i, &arg) in self.args.iter().enumerate() {
            if let Some(&param_ty) = params.get(i) {
                if tcx.convert(arg.ty, param_ty).is_none() {
                    emit(
                        self.loc,
                        em,
                        SemanticErrorKind::ArgumentType {
                            expected: param_ty.to_string(),
                            got: arg.ty.to_string(),
                        },
                        arg.span,
                    );
                    failed = true;
                    continue;
                }
                out.push(Expression::implicit_cast(arg, param_ty, ast));
            } else {
                /* A varg array always decays: callees only see a
                 * pointer. */
                out.push(decay(arg, ast, tcx));
            }
        }
        if failed {
            return None;
        }

        Some((callee, ast.alloc_expr_refs(out), ret))
    }
}

pub(crate) struct Conditional<'cx> {
    pub cond: &'cx Expression<'cx>,
    pub then_expr: &'cx Expression<'cx>,
    pub else_expr: &'cx Expression<'cx>,
    pub loc: Option<Span>,
}

type CondResult<'cx> =
    Option<(&'cx Expression<'cx>, &'cx Expression<'cx>, &'cx Ty<'cx>)>;

impl<'cx> PromotionRule<'cx> for Conditional<'cx> {
    type Result = CondResult<'cx>;

    fn apply(&self, ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        if !self.cond.ty.is_scalar() {
            emit(
                self.loc,
                em,
                SemanticErrorKind::UnaryOperands {
                    op: "?",
                    operand: self.cond.to_string(),
                    ty: self.cond.ty.to_string(),
                },
                self.cond.span,
            );
            return None;
        }

        let then_expr = decay(self.then_expr, ast, tcx);
        let else_expr = decay(self.else_expr, ast, tcx);

        let Some(common) = tcx.common(then_expr.ty, else_expr.ty) else {
            emit(
                self.loc,
                em,
                SemanticErrorKind::ConditionalTypes {
                    left: then_expr.ty.to_string(),
                    right: else_expr.ty.to_string(),
                },
                self.loc.unwrap_or_else(|| then_expr.span.join(&else_expr.span)),
            );
            return None;
        };

        let then_expr = Expression::implicit_cast(then_expr, common, ast);
        let else_expr = Expression::implicit_cast(else_expr, common, ast);
        Some((then_expr, else_expr, common))
    }
}

pub(crate) struct Member<'cx> {
    pub record: &'cx Expression<'cx>,
    pub field: Symbol,
    pub loc: Option<Span>,
}

impl<'cx> PromotionRule<'cx> for Member<'cx> {
    type Result = Option<&'cx Ty<'cx>>;

    fn apply(&self, _ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        let rty = self.record.ty;
        let Some(def) = rty.struct_def() else {
            emit(
                self.loc,
                em,
                SemanticErrorKind::MemberOfNonStruct(rty.to_string()),
                self.record.span,
            );
            return None;
        };
        if !def.is_complete() {
            emit(
                self.loc,
                em,
                SemanticErrorKind::IncompleteStruct(def.name),
                self.record.span,
            );
            return None;
        }
        let Some(member_ty) = def.member_type(self.field) else {
            emit(
                self.loc,
                em,
                SemanticErrorKind::NoSuchMember {
                    ty: rty.to_string(),
                    member: self.field,
                },
                self.loc.unwrap_or(self.record.span),
            );
            return None;
        };
        /* members of a read-only record are read-only */
        Some(if rty.has_const_flag() {
            tcx.const_of(member_ty)
        } else {
            member_ty
        })
    }
}

pub(crate) struct Vector<'cx> {
    pub elems: Vec<&'cx Expression<'cx>>,
    pub elem_ty: &'cx Ty<'cx>,
    pub loc: Option<Span>,
}

impl<'cx> PromotionRule<'cx> for Vector<'cx> {
    type Result = Option<&'cx [&'cx Expression<'cx>]>;

    fn apply(&self, ast: &Ast<'cx>, tcx: &TypeCtx<'cx>, em: &mut ErrorManager) -> Self::Result {
        let mut failed = false;
        let mut out = Vec::with_capacity(self.elems.len());
        for &elem in &self.elems {
            if tcx.convert(elem.ty, self.elem_ty).is_none() {
                emit(
                    self.loc,
                    em,
                    SemanticErrorKind::InitializerType {
                        expected: self.elem_ty.to_string(),
                        got: elem.ty.to_string(),
                    },
                    elem.span,
                );
                failed = true;
                continue;
            }
            out.push(Expression::implicit_cast(elem, self.elem_ty, ast));
        }
        if failed {
            return None;
        }
        Some(ast.alloc_expr_refs(out))
    }
}
