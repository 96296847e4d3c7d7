//! The type registry.
//!
//! Types are interned: constructing the same type twice yields the
//! same `&Ty` allocation, so type equality is pointer equality. The
//! registry also owns the conversion rules shared by promotion and
//! the explicit-cast syntax.

mod __arena {
    use super::*;

    ::arena::define_arenas!([visibility = pub]
        types: Ty<'ctx>,
        fields: Field<'ctx>,
        structs: StructDef<'ctx>,
        enums: EnumDef<'ctx>,
        enum_constants: EnumConstant,
        type_refs: &'ctx Ty<'ctx>,
    );
}

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;
use session::Symbol;

pub mod types;
pub use types::*;
pub mod errors;

use __arena::Arena;

pub struct TypeCtx<'cx> {
    arena: Arena<'cx>,
    interned: RefCell<FxHashMap<(TypeKind<'cx>, bool), &'cx Ty<'cx>>>,
    next_type_id: Cell<usize>,
    next_struct_id: Cell<usize>,
}

impl Default for TypeCtx<'_> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            interned: RefCell::default(),
            next_type_id: Cell::new(0),
            next_struct_id: Cell::new(0),
        }
    }
}

impl<'cx> TypeCtx<'cx> {
    /// Canonical type for the given kind and constness. Every
    /// construction below funnels through here, which is what makes
    /// equal inputs produce identical references.
    fn intern(&self, kind: TypeKind<'cx>, is_const: bool) -> &'cx Ty<'cx> {
        if let Some(&ty) = self.interned.borrow().get(&(kind, is_const)) {
            return ty;
        }
        let id = TypeId(self.next_type_id.get());
        self.next_type_id.set(id.0 + 1);

        let ty = &*self.arena.alloc(Ty { kind, is_const, id });
        self.interned.borrow_mut().insert((kind, is_const), ty);
        ty
    }

    pub fn void(&self) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Void, false)
    }

    pub fn bool(&self) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Integer { bits: 1, signed: false }, false)
    }

    pub fn signed(&self, bits: u8) -> &'cx Ty<'cx> {
        debug_assert!(matches!(bits, 8 | 16 | 32 | 64));
        self.intern(TypeKind::Integer { bits, signed: true }, false)
    }

    pub fn unsigned(&self, bits: u8) -> &'cx Ty<'cx> {
        debug_assert!(matches!(bits, 8 | 16 | 32 | 64));
        self.intern(TypeKind::Integer { bits, signed: false }, false)
    }

    /// The type of array indexes and pointer offsets.
    pub fn size_type(&self) -> &'cx Ty<'cx> {
        self.unsigned(64)
    }

    pub fn float(&self) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Float(FloatKind::Single), false)
    }

    pub fn double(&self) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Float(FloatKind::Double), false)
    }

    /// The builtin `char` type: an alias of u8.
    pub fn char_type(&self) -> &'cx Ty<'cx> {
        self.alias_of(session::intern("char"), self.unsigned(8))
    }

    pub fn pointer(&self, to: &'cx Ty<'cx>) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Pointer(to), false)
    }

    pub fn null_pointer(&self) -> &'cx Ty<'cx> {
        self.intern(TypeKind::NullPtr, false)
    }

    pub fn array(&self, elem: &'cx Ty<'cx>, dim: u64) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Array(elem, dim), false)
    }

    pub fn function<I>(&self, ret: &'cx Ty<'cx>, params: I, varg: bool) -> &'cx Ty<'cx>
    where
        I: IntoIterator<Item = &'cx Ty<'cx>>,
    {
        let params = &*self.arena.alloc_iter(params);
        self.intern(TypeKind::Function { params, ret, varg }, false)
    }

    /// A fresh incomplete struct. Each call mints a new identity, so
    /// same-named structs in different scopes stay distinct types.
    pub fn struct_incomplete(&self, name: Symbol) -> &'cx Ty<'cx> {
        let id = self.next_struct_id.get();
        self.next_struct_id.set(id + 1);

        let def = &*self.arena.alloc(StructDef::new(id, name));
        self.intern(TypeKind::Struct(def), false)
    }

    pub fn enum_incomplete(&self, name: Symbol, base: &'cx Ty<'cx>) -> &'cx Ty<'cx> {
        debug_assert!(base.is_integer());
        let id = self.next_struct_id.get();
        self.next_struct_id.set(id + 1);

        let def = &*self.arena.alloc(EnumDef::new(id, name, base));
        self.intern(TypeKind::Enum(def), false)
    }

    /// One-shot completion. Because the member table lives on the
    /// shared definition, the const flavor of the struct completes in
    /// lock-step.
    pub fn complete_struct<I>(&self, ty: &'cx Ty<'cx>, members: I) -> Option<&'cx Ty<'cx>>
    where
        I: IntoIterator<Item = Field<'cx>>,
    {
        let def = ty.struct_def()?;
        let members = &*self.arena.alloc_iter(members);
        def.complete(members).then_some(ty)
    }

    pub fn complete_enum<I>(&self, ty: &'cx Ty<'cx>, constants: I) -> Option<&'cx Ty<'cx>>
    where
        I: IntoIterator<Item = EnumConstant>,
    {
        let def = ty.enum_def()?;
        let constants = &*self.arena.alloc_iter(constants);
        def.complete(constants).then_some(ty)
    }

    pub fn alias_of(&self, name: Symbol, target: &'cx Ty<'cx>) -> &'cx Ty<'cx> {
        self.intern(TypeKind::Alias { name, target }, false)
    }

    /// The const flavor of `ty`. Idempotent. Const propagates into
    /// array elements and alias targets; everything else carries the
    /// flag itself.
    pub fn const_of(&self, ty: &'cx Ty<'cx>) -> &'cx Ty<'cx> {
        match ty.kind {
            TypeKind::Alias { name, target } => {
                self.intern(TypeKind::Alias { name, target: self.const_of(target) }, false)
            }
            TypeKind::Array(elem, dim) => {
                self.intern(TypeKind::Array(self.const_of(elem), dim), false)
            }
            _ => self.intern(ty.kind, true),
        }
    }

    pub fn const_removed(&self, ty: &'cx Ty<'cx>) -> &'cx Ty<'cx> {
        match ty.kind {
            TypeKind::Alias { name, target } => {
                self.intern(TypeKind::Alias { name, target: self.const_removed(target) }, false)
            }
            TypeKind::Array(elem, dim) => {
                self.intern(TypeKind::Array(self.const_removed(elem), dim), false)
            }
            _ => self.intern(ty.kind, false),
        }
    }

    /// Gives an unbound array a concrete dimension. Any other type
    /// passes through unchanged.
    pub fn patch_unbound(&self, ty: &'cx Ty<'cx>, dim: u64) -> &'cx Ty<'cx> {
        if ty.is_unbound_array() {
            let elem = ty.ref_type().unwrap();
            self.array(elem, dim)
        } else {
            ty
        }
    }

    /// Whether `ty` may be stored to.
    pub fn assignable(&self, ty: &'cx Ty<'cx>) -> bool {
        !ty.has_const_flag()
    }

    /// The type both operands of a symmetric binary operator get
    /// promoted to, if any.
    pub fn common(&self, a: &'cx Ty<'cx>, b: &'cx Ty<'cx>) -> Option<&'cx Ty<'cx>> {
        let (mut a, mut b) = (a, b);
        /* keep a float operand on the left */
        if a.is_integer() && b.is_float_type() {
            core::mem::swap(&mut a, &mut b);
        }

        if Ty::equals(self.const_removed(a), self.const_removed(b)) {
            return Some(if a.has_const_flag() || b.has_const_flag() {
                self.const_of(a)
            } else {
                a
            });
        }
        if a.is_array() && b.is_array() {
            let elem = a.ref_type()?;
            return Ty::equals(elem, b.ref_type()?).then(|| self.pointer(elem));
        }
        if a.is_float_type() && b.is_integer() {
            return Some(a);
        }
        if a.is_float_type() && b.is_float_type() {
            let wider = if a.float_kind() == Some(FloatKind::Double)
                || b.float_kind() == Some(FloatKind::Double)
            {
                self.double()
            } else {
                self.float()
            };
            return Some(wider);
        }
        if a.is_integer() && b.is_integer() {
            let bits = a.num_bits().max(b.num_bits());
            return Some(if a.is_unsigned_integer() || b.is_unsigned_integer() {
                self.unsigned(bits)
            } else {
                self.signed(bits)
            });
        }
        if a.is_pointer() && b.is_null_ptr() && !a.is_null_ptr() {
            return Some(a);
        }
        if a.is_null_ptr() && b.is_pointer() && !b.is_null_ptr() {
            return Some(b);
        }
        None
    }

    /// Implicit conversion legality. Returns the type the cast
    /// produces, or `None` when the conversion is illegal. Discarding
    /// constness is legal here; callers that care warn about it.
    pub fn convert(&self, from: &'cx Ty<'cx>, to: &'cx Ty<'cx>) -> Option<&'cx Ty<'cx>> {
        self.convert_impl(from, to, false)
    }

    fn convert_impl(
        &self,
        from: &'cx Ty<'cx>,
        to: &'cx Ty<'cx>,
        check_const: bool,
    ) -> Option<&'cx Ty<'cx>> {
        if check_const && from.has_const_flag() && !to.has_const_flag() {
            return None;
        }
        if Ty::equals(self.const_removed(from), self.const_removed(to)) {
            return Some(to);
        }
        if to.is_bool() {
            return (from.is_integer() || from.is_pointer()).then_some(to);
        }
        if to.is_integer() {
            return (from.is_integer() || from.is_float_type()).then_some(to);
        }
        if to.is_float_type() {
            return (from.is_integer() || from.is_float_type()).then_some(to);
        }
        if to.is_pointer() && !to.is_null_ptr() {
            if from.is_null_ptr() {
                return Some(to);
            }
            if from.is_array() {
                /* array decay; the decayed expression keeps its array
                 * type until codegen takes its address */
                let from_elem = from.ref_type().unwrap();
                let to_elem = to.ref_type().unwrap();
                if from_elem.is_void() || to_elem.is_void() {
                    return Some(from);
                }
                return self.convert_impl(from_elem, to_elem, true).map(|_| from);
            }
            if from.is_pointer() {
                let from_elem = from.ref_type().unwrap();
                let to_elem = to.ref_type().unwrap();
                if from_elem.is_void() || to_elem.is_void() {
                    return Some(to);
                }
                return Ty::equals(
                    self.const_removed(from_elem),
                    self.const_removed(to_elem),
                )
                .then_some(to);
            }
            return None;
        }
        if to.is_array() && from.is_array() {
            if to.dim() != from.dim() && !to.is_unbound_array() {
                return None;
            }
            return self
                .convert_impl(from.ref_type()?, to.ref_type()?, check_const)
                .map(|_| to);
        }
        /* struct-to-struct only when equal, which the equality check
         * above already covered */
        None
    }

    /// Explicit-cast legality: everything `convert` allows, plus
    /// const casts, pointer reinterpretation and pointer/integer
    /// round trips.
    pub fn explicit_cast(&self, from: &'cx Ty<'cx>, to: &'cx Ty<'cx>) -> Option<&'cx Ty<'cx>> {
        let from_cr = self.const_removed(from);
        let to_cr = self.const_removed(to);
        if self.convert(from_cr, to_cr).is_some() {
            return Some(to);
        }
        if from.is_pointer() && to.is_pointer() && !to.is_null_ptr() {
            return Some(to);
        }
        if from.is_pointer() && to.is_integer() {
            return Some(to);
        }
        if from.is_integer() && to.is_pointer() && !to.is_null_ptr() {
            return Some(to);
        }
        None
    }
}
