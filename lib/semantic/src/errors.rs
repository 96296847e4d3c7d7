use core::fmt;

use session::Symbol;
use span::Span;

pub enum SemanticErrorKind {
    UndefinedIdentifier(Symbol),
    Redefined(Symbol),
    FunctionSignatureConflict { name: Symbol, old: String, new: String },
    StructRedefinition(Symbol),
    UnknownTypeName(Symbol),
    UnaryOperands { op: &'static str, operand: String, ty: String },
    BinaryOperands { op: &'static str, left: String, left_ty: String, right: String, right_ty: String },
    NotAFunction(String),
    TooFewArguments,
    TooManyArguments,
    ArgumentType { expected: String, got: String },
    IntegerExpected(String),
    DerefNullPointer,
    NotAnLvalue(String),
    AssignToReadonly(String),
    IncrementReadonly(String),
    DecrementReadonly(String),
    MemberOfNonStruct(String),
    NoSuchMember { ty: String, member: Symbol },
    IncompleteStruct(Symbol),
    ConditionalTypes { left: String, right: String },
    InvalidCast { from: String, to: String },
    ConstantExpected,
    DivisionByZero,
    InitializerTooLong { expected: u64, got: u64 },
    InitializerType { expected: String, got: String },
    VoidReturn(String),
    ReturnType { expected: String, got: String },
}

pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

impl error_manager::Error for SemanticError {
    fn get_span(&self) -> Span {
        self.span
    }

    fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        use SemanticErrorKind::*;
        match &self.kind {
            UndefinedIdentifier(name) => write!(out, "undefined identifier '{name}'"),
            Redefined(name) => write!(out, "'{name}' already defined"),
            FunctionSignatureConflict { name, old, new } => {
                write!(out, "conflicting declaration of '{name}': was '{old}', now '{new}'")
            }
            StructRedefinition(name) => write!(out, "redefinition of 'struct {name}'"),
            UnknownTypeName(name) => write!(out, "unknown type name '{name}'"),
            UnaryOperands { op, operand, ty } => {
                write!(
                    out,
                    "operator '{op}' can not be applied to operand '{operand}' of type '{ty}'"
                )
            }
            BinaryOperands { op, left, left_ty, right, right_ty } => {
                write!(
                    out,
                    "operator '{op}' can not be applied to operand '{left}' of type \
                     '{left_ty}' and operand '{right}' of type '{right_ty}'"
                )
            }
            NotAFunction(ty) => {
                write!(out, "not a function or function pointer. Operand has type '{ty}'")
            }
            TooFewArguments => write!(out, "too few arguments to function"),
            TooManyArguments => write!(out, "too many arguments to function"),
            ArgumentType { expected, got } => {
                write!(out, "expected argument of type '{expected}', got '{got}'")
            }
            IntegerExpected(ty) => {
                write!(out, "integer expression expected, got type '{ty}'")
            }
            DerefNullPointer => write!(out, "dereferencing nullptr"),
            NotAnLvalue(expr) => write!(out, "'{expr}' is not an lvalue"),
            AssignToReadonly(expr) => {
                write!(out, "assignment of read-only variable '{expr}'")
            }
            IncrementReadonly(expr) => {
                write!(out, "increment of read-only variable '{expr}'")
            }
            DecrementReadonly(expr) => {
                write!(out, "decrement of read-only variable '{expr}'")
            }
            MemberOfNonStruct(ty) => {
                write!(out, "member access on non-struct type '{ty}'")
            }
            NoSuchMember { ty, member } => {
                write!(out, "'{ty}' has no member named '{member}'")
            }
            IncompleteStruct(name) => {
                write!(out, "'struct {name}' is incomplete here")
            }
            ConditionalTypes { left, right } => {
                write!(
                    out,
                    "operands of ':' have incompatible types '{left}' and '{right}'"
                )
            }
            InvalidCast { from, to } => write!(out, "invalid cast from '{from}' to '{to}'"),
            ConstantExpected => write!(out, "constant expression expected"),
            DivisionByZero => write!(out, "division by zero in constant expression"),
            InitializerTooLong { expected, got } => {
                write!(out, "too many initializers: expected {expected}, got {got}")
            }
            InitializerType { expected, got } => {
                write!(out, "initializer of type '{got}' for element type '{expected}'")
            }
            VoidReturn(ty) => {
                write!(out, "returning a value of type '{ty}' from a void function")
            }
            ReturnType { expected, got } => {
                write!(out, "mismatched return type: expected '{expected}', got '{got}'")
            }
        }
    }
}

pub enum SemanticWarningKind {
    ConstDiscarded { from: String, to: String },
    PointerIntegerCast { from: String, to: String },
    PointerRefMismatch { from: String, to: String },
}

pub struct SemanticWarning {
    pub kind: SemanticWarningKind,
    pub span: Span,
}

impl error_manager::Error for SemanticWarning {
    fn get_span(&self) -> Span {
        self.span
    }

    fn severity(&self) -> error_manager::Severity {
        error_manager::Severity::Warning
    }

    fn write_msg(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        use SemanticWarningKind::*;
        match &self.kind {
            ConstDiscarded { from, to } => {
                write!(out, "cast from '{from}' to '{to}' discards constness")
            }
            PointerIntegerCast { from, to } => {
                write!(out, "cast between pointer and integer ('{from}' to '{to}')")
            }
            PointerRefMismatch { from, to } => {
                write!(
                    out,
                    "pointer cast between unrelated referenced types ('{from}' to '{to}')"
                )
            }
        }
    }
}
