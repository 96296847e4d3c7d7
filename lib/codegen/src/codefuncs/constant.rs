use ast::{BinaryOp, Expression, ExpressionKind, IdentStorage, LitKind, UnaryOp};
use ir::ConstData;
use session::with_symbol;

use super::EvalConstant;
use crate::code_generator::{ir_type, CodeGen};

impl EvalConstant for Expression<'_> {
    fn constant(&self, cg: &mut CodeGen<'_, '_>) -> ConstData {
        debug_assert!(self.is_const(), "constant channel on a non-constant");

        if self.ty.is_integer() {
            let value = self.const_int_value(cg.em).unwrap_or(0);
            return ConstData::Int { ty: ir_type(self.ty), value };
        }

        match self.kind {
            ExpressionKind::Literal(LitKind::Null) => ConstData::Null,
            ExpressionKind::Literal(LitKind::Str(s)) => {
                with_symbol(s, |s| ConstData::Str(s.into()))
            }
            ExpressionKind::Unary { op: UnaryOp::Address, child } => match child.kind {
                ExpressionKind::Identifier { internal, storage: IdentStorage::Global, .. } => {
                    with_symbol(internal, |s| ConstData::GlobalRef(s.into()))
                }
                _ => unreachable!("address constant of a non-static object"),
            },
            ExpressionKind::Identifier { internal, storage: IdentStorage::Function, .. } => {
                with_symbol(internal, |s| ConstData::GlobalRef(s.into()))
            }
            ExpressionKind::Cast { expr, .. } => expr.constant(cg),
            ExpressionKind::Proxy(target) => target.constant(cg),
            ExpressionKind::ExprVector(elems) => {
                ConstData::Array(elems.iter().map(|e| e.constant(cg)).collect())
            }
            ExpressionKind::Binary { op: op @ (BinaryOp::Add | BinaryOp::Sub), left, right } => {
                /* address constant: static base plus integer offset */
                let base = left.constant(cg);
                let offset = right.const_int_value(cg.em).unwrap_or(0);
                ConstData::PtrOffset {
                    base: Box::new(base),
                    elem: left.ty.ref_type().map_or_else(
                        || "i8".into(),
                        |t| t.to_string().into_boxed_str(),
                    ),
                    offset: if op == BinaryOp::Sub { -offset } else { offset },
                }
            }
            _ => unreachable!("no constant representation for {self}"),
        }
    }
}
