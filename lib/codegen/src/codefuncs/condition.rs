use ast::{BinaryOp, Expression, ExpressionKind};
use ir::CondOp;

use super::{Condition, Eval};
use crate::code_generator::{ir_type, CodeGen};
use crate::codefuncs::eval::cond_op;

impl Condition for Expression<'_> {
    fn condition(
        &self,
        cg: &mut CodeGen<'_, '_>,
        true_label: ir::Label,
        false_label: ir::Label,
    ) {
        match self.kind {
            ExpressionKind::Binary { op, left, right } if op.is_comparison() => {
                let a = left.eval(cg);
                let b = right.eval(cg);
                let cond = cg.builder.cond(cond_op(op, left.ty), a, b);
                cg.builder.cond_branch(cond, true_label, false_label);
            }
            ExpressionKind::Binary { op: BinaryOp::LogicalAnd, left, right } => {
                /* the false path leaves directly; only a true left
                 * operand reaches the right one */
                let chk_right = cg.builder.fresh_label("chkRight");
                left.condition(cg, chk_right, false_label);
                cg.builder.emit_label(chk_right);
                right.condition(cg, true_label, false_label);
            }
            ExpressionKind::Binary { op: BinaryOp::LogicalOr, left, right } => {
                let chk_right = cg.builder.fresh_label("chkRight");
                left.condition(cg, true_label, chk_right);
                cg.builder.emit_label(chk_right);
                right.condition(cg, true_label, false_label);
            }
            ExpressionKind::Proxy(target) => target.condition(cg, true_label, false_label),
            _ => {
                let v = self.eval(cg);
                let zero = cg.builder.zero(ir_type(self.ty));
                let cond = cg.builder.cond(CondOp::Ne, v, zero);
                cg.builder.cond_branch(cond, true_label, false_label);
            }
        }
    }
}
