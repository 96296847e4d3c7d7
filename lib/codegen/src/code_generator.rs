use error_manager::ErrorManager;
use ir::{Builder, IrType, Value};
use rustc_hash::FxHashMap;
use semantic::{FloatKind, Ty, TypeCtx};
use session::Symbol;

pub struct CodeGen<'a, 'cx> {
    pub(crate) builder: Builder,
    pub(crate) tcx: &'a TypeCtx<'cx>,
    pub(crate) em: &'a mut ErrorManager,
    /// Storage slot of every local and parameter, by internal name.
    locals: FxHashMap<Symbol, Value>,
}

impl<'a, 'cx> CodeGen<'a, 'cx> {
    pub(crate) fn new(tcx: &'a TypeCtx<'cx>, em: &'a mut ErrorManager) -> Self {
        Self {
            builder: Builder::new(),
            tcx,
            em,
            locals: FxHashMap::default(),
        }
    }

    pub(crate) fn finish(self) -> ir::Module {
        self.builder.finish()
    }

    pub(crate) fn set_local(&mut self, internal: Symbol, slot: Value) {
        debug_assert!(!self.locals.contains_key(&internal));
        self.locals.insert(internal, slot);
    }

    pub(crate) fn local(&self, internal: Symbol) -> Value {
        *self
            .locals
            .get(&internal)
            .unwrap_or_else(|| unreachable!("unallocated local: {internal:?}"))
    }

    pub(crate) fn clear_locals(&mut self) {
        self.locals.clear();
    }
}

/// The IR-level type an expression of type `ty` materializes as.
/// Aggregates travel by address.
pub(crate) fn ir_type(ty: &Ty<'_>) -> IrType {
    if ty.is_pointer() || ty.is_array() || ty.is_struct() {
        return IrType::Ptr;
    }
    match ty.float_kind() {
        Some(FloatKind::Single) => return IrType::F32,
        Some(FloatKind::Double) => return IrType::F64,
        None => {}
    }
    match ty.num_bits() {
        1 => IrType::I1,
        8 => IrType::I8,
        16 => IrType::I16,
        32 => IrType::I32,
        64 => IrType::I64,
        _ => unreachable!("type without an IR representation: {ty}"),
    }
}
