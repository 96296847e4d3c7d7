//! Compile-time evaluation of integer constant expressions.
//!
//! Arithmetic happens in 128 bits and truncates to the node's type at
//! every step, so no precision is lost before the final cast. Signed
//! types wrap two's-complement, unsigned types wrap modulo 2^bits.

use error_manager::ErrorManager;
use semantic::errors::{SemanticError, SemanticErrorKind};
use semantic::Ty;
use session::with_symbol;

use crate::expr::{BinaryOp, Expression, ExpressionKind, LitKind, UnaryOp};

/// Reduces `value` to the range of `ty`.
pub fn wrap_to_type(ty: &Ty<'_>, value: i128) -> i128 {
    let bits = u32::from(ty.num_bits());
    if bits == 0 {
        return value;
    }
    if bits == 1 {
        return i128::from(value != 0);
    }

    let mask = if bits >= 128 { u128::MAX } else { (1u128 << bits) - 1 };
    let masked = (value as u128) & mask;

    if ty.is_signed_integer() {
        let sign_bit = 1u128 << (bits - 1);
        if masked & sign_bit != 0 {
            (masked | !mask) as i128
        } else {
            masked as i128
        }
    } else {
        masked as i128
    }
}

impl Expression<'_> {
    /// The value of an integer constant expression, reduced to the
    /// expression's type. `None` when the expression is not an
    /// integer constant, or on a division by zero (which is also
    /// diagnosed).
    pub fn const_int_value(&self, em: &mut ErrorManager) -> Option<i128> {
        if !self.ty.is_integer() {
            return None;
        }
        self.eval(em)
    }

    fn eval(&self, em: &mut ErrorManager) -> Option<i128> {
        let value = match self.kind {
            ExpressionKind::Literal(LitKind::Int { raw, radix }) => {
                let parsed = with_symbol(raw, |digits| {
                    u128::from_str_radix(digits, u32::from(radix))
                })
                .ok()?;
                parsed as i128
            }
            ExpressionKind::Literal(_) => return None,
            ExpressionKind::Proxy(target) => return target.eval(em),
            ExpressionKind::Cast { expr, .. } => expr.eval(em)?,
            ExpressionKind::Unary { op, child } => {
                let v = child.eval(em)?;
                match op {
                    UnaryOp::Minus => -v,
                    UnaryOp::LogicalNot => i128::from(v == 0),
                    _ => return None,
                }
            }
            ExpressionKind::Binary { op, left, right } => {
                let l = left.eval(em)?;
                let r = right.eval(em)?;
                use BinaryOp::*;
                match op {
                    Add => l.wrapping_add(r),
                    Sub => l.wrapping_sub(r),
                    Mul => l.wrapping_mul(r),
                    Div | Mod => {
                        if r == 0 {
                            em.emit_error(SemanticError {
                                kind: SemanticErrorKind::DivisionByZero,
                                span: right.span,
                            });
                            return None;
                        }
                        if op == Div { l.wrapping_div(r) } else { l.wrapping_rem(r) }
                    }
                    Equal => i128::from(l == r),
                    NotEqual => i128::from(l != r),
                    Less => i128::from(l < r),
                    LessEqual => i128::from(l <= r),
                    Greater => i128::from(l > r),
                    GreaterEqual => i128::from(l >= r),
                    LogicalAnd => i128::from(l != 0 && r != 0),
                    LogicalOr => i128::from(l != 0 || r != 0),
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(wrap_to_type(self.ty, value))
    }
}
