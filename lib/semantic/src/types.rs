use std::cell::OnceCell;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use session::Symbol;

/// A `TypeId` uniquely identifies a type
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct TypeId(pub(crate) usize);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum FloatKind {
    Single,
    Double,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Field<'cx> {
    pub name: Symbol,
    pub ty: &'cx Ty<'cx>,
}

/// Identity of a struct type, shared by its const and non-const
/// flavors. Identity is the numeric id, not the name: two structs
/// with the same name in different scopes stay distinct.
#[derive(Debug)]
pub struct StructDef<'cx> {
    pub id: usize,
    pub name: Symbol,
    members: OnceCell<&'cx [Field<'cx>]>,
}

impl<'cx> StructDef<'cx> {
    pub(crate) fn new(id: usize, name: Symbol) -> Self {
        Self {
            id,
            name,
            members: OnceCell::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.members.get().is_some()
    }

    pub fn members(&self) -> Option<&'cx [Field<'cx>]> {
        self.members.get().copied()
    }

    /// Sets the member table. Completion happens at most once: a
    /// second call fails and leaves the first table in place.
    pub(crate) fn complete(&self, members: &'cx [Field<'cx>]) -> bool {
        self.members.set(members).is_ok()
    }

    pub fn member_index(&self, name: Symbol) -> Option<usize> {
        self.members()?.iter().position(|f| f.name == name)
    }

    pub fn member_type(&self, name: Symbol) -> Option<&'cx Ty<'cx>> {
        self.members()?
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ty)
    }
}

impl PartialEq for StructDef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StructDef<'_> {}

impl Hash for StructDef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct EnumConstant {
    pub name: Symbol,
    pub value: i64,
}

#[derive(Debug)]
pub struct EnumDef<'cx> {
    pub id: usize,
    pub name: Symbol,
    pub base: &'cx Ty<'cx>,
    constants: OnceCell<&'cx [EnumConstant]>,
}

impl<'cx> EnumDef<'cx> {
    pub(crate) fn new(id: usize, name: Symbol, base: &'cx Ty<'cx>) -> Self {
        Self {
            id,
            name,
            base,
            constants: OnceCell::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.constants.get().is_some()
    }

    pub fn constants(&self) -> Option<&'cx [EnumConstant]> {
        self.constants.get().copied()
    }

    pub(crate) fn complete(&self, constants: &'cx [EnumConstant]) -> bool {
        self.constants.set(constants).is_ok()
    }
}

impl PartialEq for EnumDef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EnumDef<'_> {}

impl Hash for EnumDef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum TypeKind<'cx> {
    Void,
    /// `bits == 1` is bool.
    Integer {
        bits: u8,
        signed: bool,
    },
    Float(FloatKind),
    Pointer(&'cx Ty<'cx>),
    /// The type of `nullptr`. A singleton: it points at nothing and
    /// converts to every pointer type.
    NullPtr,
    /// `dim == 0` is an unbound array.
    Array(&'cx Ty<'cx>, u64),
    Function {
        params: &'cx [&'cx Ty<'cx>],
        ret: &'cx Ty<'cx>,
        varg: bool,
    },
    Struct(&'cx StructDef<'cx>),
    Enum(&'cx EnumDef<'cx>),
    /// Behaves as `target` for every query except printing.
    Alias {
        name: Symbol,
        target: &'cx Ty<'cx>,
    },
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Ty<'cx> {
    pub kind: TypeKind<'cx>,
    pub is_const: bool,
    pub id: TypeId,
}

impl<'cx> Ty<'cx> {
    /// Two interned types are the same type iff they are the same
    /// allocation.
    #[inline]
    pub fn equals(a: &Ty<'cx>, b: &Ty<'cx>) -> bool {
        core::ptr::eq(a, b)
    }

    /// The kind behind any chain of aliases.
    pub fn unalias_kind(&self) -> TypeKind<'cx> {
        let mut kind = self.kind;
        while let TypeKind::Alias { target, .. } = kind {
            kind = target.kind;
        }
        kind
    }

    #[inline]
    pub fn is_alias(&self) -> bool {
        matches!(self.kind, TypeKind::Alias { .. })
    }

    pub fn alias_name(&self) -> Option<Symbol> {
        match self.kind {
            TypeKind::Alias { name, .. } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Void)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Integer { bits: 1, .. })
    }

    /// Integers proper, bool, and enums (which answer integer queries
    /// through their base type).
    pub fn is_integer(&self) -> bool {
        matches!(
            self.unalias_kind(),
            TypeKind::Integer { .. } | TypeKind::Enum(_)
        )
    }

    pub fn is_signed_integer(&self) -> bool {
        match self.unalias_kind() {
            TypeKind::Integer { signed, .. } => signed,
            TypeKind::Enum(def) => def.base.is_signed_integer(),
            _ => false,
        }
    }

    pub fn is_unsigned_integer(&self) -> bool {
        match self.unalias_kind() {
            TypeKind::Integer { signed, .. } => !signed,
            TypeKind::Enum(def) => def.base.is_unsigned_integer(),
            _ => false,
        }
    }

    pub fn num_bits(&self) -> u8 {
        match self.unalias_kind() {
            TypeKind::Integer { bits, .. } => bits,
            TypeKind::Enum(def) => def.base.num_bits(),
            _ => 0,
        }
    }

    #[inline]
    pub fn is_float_type(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Float(_))
    }

    pub fn float_kind(&self) -> Option<FloatKind> {
        match self.unalias_kind() {
            TypeKind::Float(fk) => Some(fk),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(
            self.unalias_kind(),
            TypeKind::Pointer(_) | TypeKind::NullPtr
        )
    }

    #[inline]
    pub fn is_null_ptr(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::NullPtr)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Array(..))
    }

    pub fn is_unbound_array(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Array(_, 0))
    }

    /// The referenced type of a pointer, or the element type of an
    /// array. The null pointer type refers to nothing.
    pub fn ref_type(&self) -> Option<&'cx Ty<'cx>> {
        match self.unalias_kind() {
            TypeKind::Pointer(to) => Some(to),
            TypeKind::Array(elem, _) => Some(elem),
            _ => None,
        }
    }

    pub fn dim(&self) -> u64 {
        match self.unalias_kind() {
            TypeKind::Array(_, dim) => dim,
            _ => 0,
        }
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Function { .. })
    }

    pub fn as_function_type(&self) -> Option<(&'cx [&'cx Ty<'cx>], &'cx Ty<'cx>, bool)> {
        match self.unalias_kind() {
            TypeKind::Function { params, ret, varg } => Some((params, ret, varg)),
            _ => None,
        }
    }

    pub fn ret_type(&self) -> Option<&'cx Ty<'cx>> {
        self.as_function_type().map(|(_, ret, _)| ret)
    }

    #[inline]
    pub fn is_struct(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Struct(_))
    }

    pub fn struct_def(&self) -> Option<&'cx StructDef<'cx>> {
        match self.unalias_kind() {
            TypeKind::Struct(def) => Some(def),
            _ => None,
        }
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self.unalias_kind(), TypeKind::Enum(_))
    }

    pub fn enum_def(&self) -> Option<&'cx EnumDef<'cx>> {
        match self.unalias_kind() {
            TypeKind::Enum(def) => Some(def),
            _ => None,
        }
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_struct()
    }

    /// Whether stores through this type are forbidden. An array is
    /// const iff its element type is const.
    pub fn has_const_flag(&self) -> bool {
        match self.kind {
            TypeKind::Alias { target, .. } => target.has_const_flag(),
            TypeKind::Array(elem, _) => elem.has_const_flag(),
            _ => self.is_const,
        }
    }
}

impl Display for Ty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        match self.kind {
            TypeKind::Void => write!(f, "void"),
            TypeKind::Integer { bits: 1, .. } => write!(f, "bool"),
            TypeKind::Integer { bits, signed: true } => write!(f, "i{bits}"),
            TypeKind::Integer { bits, signed: false } => write!(f, "u{bits}"),
            TypeKind::Float(FloatKind::Single) => write!(f, "float"),
            TypeKind::Float(FloatKind::Double) => write!(f, "double"),
            TypeKind::Pointer(to) => write!(f, "-> {to}"),
            TypeKind::NullPtr => write!(f, "nullptr_t"),
            TypeKind::Array(elem, 0) => write!(f, "array[] of {elem}"),
            TypeKind::Array(elem, dim) => write!(f, "array[{dim}] of {elem}"),
            TypeKind::Function { params, ret, varg } => {
                write!(f, "fn(")?;
                let mut first = true;
                for param in params {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, ":{param}")?;
                }
                if varg {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, "): {ret}")
            }
            TypeKind::Struct(def) => write!(f, "struct {}", def.name),
            TypeKind::Enum(def) => write!(f, "enum {}", def.name),
            TypeKind::Alias { name, target } => write!(f, "{name} (aka '{target}')"),
        }
    }
}
