use crate::code_generator::CodeGen;

mod address;
mod condition;
mod constant;
mod define;
mod eval;

/// Materialize the run-time value.
pub(crate) trait Eval {
    fn eval(&self, cg: &mut CodeGen<'_, '_>) -> ir::Value;
}

/// Materialize the address. Precondition: `has_address()`.
pub(crate) trait Address {
    fn address(&self, cg: &mut CodeGen<'_, '_>) -> ir::Value;
}

/// Short-circuit conditional branch: exactly one terminator on every
/// control path out of the expression.
pub(crate) trait Condition {
    fn condition(&self, cg: &mut CodeGen<'_, '_>, true_label: ir::Label, false_label: ir::Label);
}

/// Compile-time constant for the builder's constant channel.
/// Precondition: `is_const()`.
pub(crate) trait EvalConstant {
    fn constant(&self, cg: &mut CodeGen<'_, '_>) -> ir::ConstData;
}

/// Emit an item's code and storage.
pub(crate) trait Define {
    fn define(&self, cg: &mut CodeGen<'_, '_>);
}

/// Emit a statement's code.
pub(crate) trait Execute {
    fn execute(&self, cg: &mut CodeGen<'_, '_>);
}
