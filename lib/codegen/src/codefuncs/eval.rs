use ast::{BinaryOp, Expression, ExpressionKind, IdentStorage, LitKind, UnaryOp};
use ir::{AluOp, Callee, CondOp, IrType};
use semantic::Ty;
use session::with_symbol;

use super::{Address, Condition, Eval};
use crate::code_generator::{ir_type, CodeGen};

/// ALU opcode for an arithmetic operator; signedness comes from the
/// result type at the operation site.
pub(crate) fn alu_op(op: BinaryOp, ty: &Ty<'_>) -> AluOp {
    let signed = ty.is_signed_integer();
    match op {
        BinaryOp::Add | BinaryOp::AddAssign => AluOp::Add,
        BinaryOp::Sub | BinaryOp::SubAssign => AluOp::Sub,
        BinaryOp::Mul | BinaryOp::MulAssign => {
            if signed { AluOp::SMul } else { AluOp::UMul }
        }
        BinaryOp::Div | BinaryOp::DivAssign => {
            if signed { AluOp::SDiv } else { AluOp::UDiv }
        }
        BinaryOp::Mod | BinaryOp::ModAssign => {
            if signed { AluOp::SMod } else { AluOp::UMod }
        }
        _ => unreachable!("not an ALU operator: {op:?}"),
    }
}

/// Compare opcode; signedness comes from the operand type. Pointers
/// compare unsigned.
pub(crate) fn cond_op(op: BinaryOp, operand_ty: &Ty<'_>) -> CondOp {
    let signed = operand_ty.is_signed_integer();
    match op {
        BinaryOp::Equal => CondOp::Eq,
        BinaryOp::NotEqual => CondOp::Ne,
        BinaryOp::Less => {
            if signed { CondOp::SLt } else { CondOp::ULt }
        }
        BinaryOp::LessEqual => {
            if signed { CondOp::SLe } else { CondOp::ULe }
        }
        BinaryOp::Greater => {
            if signed { CondOp::SGt } else { CondOp::UGt }
        }
        BinaryOp::GreaterEqual => {
            if signed { CondOp::SGe } else { CondOp::UGe }
        }
        _ => unreachable!("not a comparison: {op:?}"),
    }
}

/// Whether values of this type live in memory and travel by address.
fn is_aggregate(ty: &Ty<'_>) -> bool {
    ty.is_array() || ty.is_struct()
}

impl Eval for Expression<'_> {
    #[expect(clippy::too_many_lines)]
    fn eval(&self, cg: &mut CodeGen<'_, '_>) -> ir::Value {
        match self.kind {
            ExpressionKind::Literal(LitKind::Int { .. }) => {
                let value = self.const_int_value(cg.em).unwrap_or(0);
                cg.builder.int_const(ir_type(self.ty), value)
            }
            ExpressionKind::Literal(LitKind::Null) => cg.builder.zero(IrType::Ptr),
            ExpressionKind::Literal(LitKind::Str(s)) => {
                with_symbol(s, |s| cg.builder.str_const(s))
            }
            ExpressionKind::Identifier { .. } => {
                if is_aggregate(self.ty) {
                    return self.address(cg);
                }
                let addr = self.address(cg);
                cg.builder.fetch(addr, ir_type(self.ty))
            }
            ExpressionKind::Unary { op, child } => eval_unary(self, op, child, cg),
            ExpressionKind::Binary { op, left, right } => eval_binary(self, op, left, right, cg),
            ExpressionKind::Cast { expr, .. } => {
                if self.ty.is_bool() && !expr.ty.is_bool() {
                    let v = expr.eval(cg);
                    let zero = cg.builder.zero(ir_type(expr.ty));
                    return cg.builder.cond(CondOp::Ne, v, zero);
                }
                if expr.ty.is_array() {
                    /* array decay: the array's address is the pointer */
                    return expr.eval(cg);
                }
                let v = expr.eval(cg);
                cg.builder.cast(v, ir_type(expr.ty), ir_type(self.ty))
            }
            ExpressionKind::Call { callee, args } => {
                let args: Vec<ir::Value> = args.iter().map(|a| a.eval(cg)).collect();
                let target = callee_of(callee, cg);
                let ret = self.ty;
                assert!(!ret.is_void(), "value of a void call");
                cg.builder
                    .call(target, args, Some(ir_type(ret)))
                    .unwrap()
            }
            ExpressionKind::Conditional { cond, then_expr, else_expr } => {
                let then_label = cg.builder.fresh_label("then");
                let else_label = cg.builder.fresh_label("else");
                let end_label = cg.builder.fresh_label("end");

                cond.condition(cg, then_label, else_label);

                cg.builder.emit_label(then_label);
                let v1 = then_expr.eval(cg);
                cg.builder.branch(end_label);

                cg.builder.emit_label(else_label);
                let v2 = else_expr.eval(cg);
                cg.builder.branch(end_label);

                cg.builder.emit_label(end_label);
                cg.builder.phi(v1, then_label, v2, else_label, ir_type(self.ty))
            }
            ExpressionKind::Member { .. } => {
                if is_aggregate(self.ty) {
                    return self.address(cg);
                }
                let addr = self.address(cg);
                cg.builder.fetch(addr, ir_type(self.ty))
            }
            ExpressionKind::ExprVector(_) => {
                unreachable!("aggregate initializer evaluated as a value")
            }
            ExpressionKind::Proxy(target) => target.eval(cg),
        }
    }
}

pub(crate) fn callee_of(callee: &Expression<'_>, cg: &mut CodeGen<'_, '_>) -> Callee {
    match callee.kind {
        ExpressionKind::Identifier { internal, storage: IdentStorage::Function, .. } => {
            with_symbol(internal, |s| Callee::Name(s.into()))
        }
        _ => Callee::Value(callee.eval(cg)),
    }
}

fn eval_unary<'cx>(
    this: &Expression<'cx>,
    op: UnaryOp,
    child: &Expression<'cx>,
    cg: &mut CodeGen<'_, '_>,
) -> ir::Value {
    match op {
        UnaryOp::Address => child.address(cg),
        UnaryOp::Deref | UnaryOp::ArrowDeref => {
            let ptr = child.eval(cg);
            if is_aggregate(this.ty) {
                ptr
            } else {
                cg.builder.fetch(ptr, ir_type(this.ty))
            }
        }
        UnaryOp::PrefixInc | UnaryOp::PostfixInc | UnaryOp::PrefixDec | UnaryOp::PostfixDec => {
            let addr = child.address(cg);
            let ty = ir_type(child.ty);
            let old = cg.builder.fetch(addr, ty);

            let increment = matches!(op, UnaryOp::PrefixInc | UnaryOp::PostfixInc);
            let new = if child.ty.is_pointer() {
                let elem = child.ty.ref_type().unwrap().to_string();
                let step = cg.builder.int_const(IrType::I64, if increment { 1 } else { -1 });
                cg.builder.ptr_inc(&elem, old, step)
            } else {
                let one = cg.builder.int_const(ty, 1);
                let alu = if increment { AluOp::Add } else { AluOp::Sub };
                cg.builder.binop(alu, old, one, ty)
            };
            cg.builder.store(new, addr, ty);

            let postfix = matches!(op, UnaryOp::PostfixInc | UnaryOp::PostfixDec);
            if postfix { old } else { new }
        }
        UnaryOp::LogicalNot => {
            let v = child.eval(cg);
            let zero = cg.builder.zero(ir_type(child.ty));
            let is_zero = cg.builder.cond(CondOp::Eq, v, zero);
            cg.builder.cast(is_zero, IrType::I1, ir_type(this.ty))
        }
        UnaryOp::Minus => {
            let ty = ir_type(this.ty);
            let zero = cg.builder.zero(ty);
            let v = child.eval(cg);
            cg.builder.binop(AluOp::Sub, zero, v, ty)
        }
    }
}

fn eval_binary<'cx>(
    this: &Expression<'cx>,
    op: BinaryOp,
    left: &Expression<'cx>,
    right: &Expression<'cx>,
    cg: &mut CodeGen<'_, '_>,
) -> ir::Value {
    use BinaryOp::*;
    match op {
        Assign => {
            let value = right.eval(cg);
            let addr = left.address(cg);
            cg.builder.store(value, addr, ir_type(this.ty));
            value
        }
        AddAssign | SubAssign | MulAssign | DivAssign | ModAssign => {
            let rhs = right.eval(cg);
            let addr = left.address(cg);
            let lty = ir_type(left.ty);
            let old = cg.builder.fetch(addr, lty);

            let new = if left.ty.is_pointer() {
                let elem = left.ty.ref_type().unwrap().to_string();
                let idx = if op == SubAssign {
                    let rt = ir_type(right.ty);
                    let zero = cg.builder.zero(rt);
                    cg.builder.binop(AluOp::Sub, zero, rhs, rt)
                } else {
                    rhs
                };
                cg.builder.ptr_inc(&elem, old, idx)
            } else {
                cg.builder.binop(alu_op(op, this.ty), old, rhs, lty)
            };
            cg.builder.store(new, addr, lty);
            new
        }
        Add | Sub | Mul | Div | Mod => {
            if op == Add && this.ty.is_pointer() {
                /* pointer + integer */
                debug_assert!(left.ty.is_pointer() && right.ty.is_integer());
                let elem = left.ty.ref_type().unwrap().to_string();
                let ptr = left.eval(cg);
                let idx = right.eval(cg);
                return cg.builder.ptr_inc(&elem, ptr, idx);
            }
            if op == Sub && left.ty.is_pointer() && right.ty.is_pointer() {
                /* pointer - pointer */
                debug_assert!(this.ty.is_integer());
                let elem = left.ty.ref_type().unwrap().to_string();
                let a = left.eval(cg);
                let b = right.eval(cg);
                return cg.builder.ptr_diff(&elem, a, b);
            }
            if op == Sub && this.ty.is_pointer() {
                /* pointer - integer */
                let elem = left.ty.ref_type().unwrap().to_string();
                let ptr = left.eval(cg);
                let idx = right.eval(cg);
                let rt = ir_type(right.ty);
                let zero = cg.builder.zero(rt);
                let neg = cg.builder.binop(AluOp::Sub, zero, idx, rt);
                return cg.builder.ptr_inc(&elem, ptr, neg);
            }
            let a = left.eval(cg);
            let b = right.eval(cg);
            cg.builder.binop(alu_op(op, this.ty), a, b, ir_type(this.ty))
        }
        Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
            let a = left.eval(cg);
            let b = right.eval(cg);
            cg.builder.cond(cond_op(op, left.ty), a, b)
        }
        LogicalAnd | LogicalOr => {
            let true_label = cg.builder.fresh_label("true");
            let false_label = cg.builder.fresh_label("false");
            let phi_label = cg.builder.fresh_label("phi");

            this.condition(cg, true_label, false_label);

            let ty = ir_type(this.ty);
            cg.builder.emit_label(true_label);
            let one = cg.builder.int_const(ty, 1);
            cg.builder.branch(phi_label);

            cg.builder.emit_label(false_label);
            let zero = cg.builder.int_const(ty, 0);
            cg.builder.branch(phi_label);

            cg.builder.emit_label(phi_label);
            cg.builder.phi(one, true_label, zero, false_label, ty)
        }
        Index => {
            if is_aggregate(this.ty) {
                return this.address(cg);
            }
            let addr = this.address(cg);
            cg.builder.fetch(addr, ir_type(this.ty))
        }
    }
}
