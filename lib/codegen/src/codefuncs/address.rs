use ast::{BinaryOp, Expression, ExpressionKind, IdentStorage, UnaryOp};
use session::with_symbol;

use super::{Address, Eval};
use crate::code_generator::CodeGen;

impl Address for Expression<'_> {
    fn address(&self, cg: &mut CodeGen<'_, '_>) -> ir::Value {
        match self.kind {
            ExpressionKind::Identifier { internal, storage, .. } => match storage {
                IdentStorage::Global | IdentStorage::Function => {
                    with_symbol(internal, |s| cg.builder.global_addr(s))
                }
                IdentStorage::Local | IdentStorage::Param => cg.local(internal),
            },
            ExpressionKind::Unary { op: UnaryOp::Deref | UnaryOp::ArrowDeref, child } => {
                child.eval(cg)
            }
            ExpressionKind::Binary { op: BinaryOp::Index, left, right } => {
                let elem = left.ty.ref_type().unwrap().to_string();
                let base = if left.ty.is_array() {
                    left.address(cg)
                } else {
                    left.eval(cg)
                };
                let idx = right.eval(cg);
                cg.builder.ptr_inc(&elem, base, idx)
            }
            ExpressionKind::Binary { op: BinaryOp::Assign, left, .. } => {
                /* an assignment's address is its target's, after the
                 * store happened */
                self.eval(cg);
                left.address(cg)
            }
            ExpressionKind::Member { record, field } => {
                let def = record.ty.struct_def().unwrap();
                let index = def
                    .member_index(field)
                    .unwrap_or_else(|| unreachable!("member vanished after promotion"));
                let base = record.address(cg);
                let record_name = record.ty.to_string();
                cg.builder.ptr_member(&record_name, base, index)
            }
            ExpressionKind::Proxy(target) => target.address(cg),
            ExpressionKind::Literal(_)
            | ExpressionKind::Unary { .. }
            | ExpressionKind::Binary { .. }
            | ExpressionKind::Cast { .. }
            | ExpressionKind::Call { .. }
            | ExpressionKind::Conditional { .. }
            | ExpressionKind::ExprVector(_) => {
                unreachable!("expression has no address: {self}")
            }
        }
    }
}
