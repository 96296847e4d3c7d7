use semantic::Ty;
use session::Symbol;
use span::Span;

use crate::stmt::{LocalDecl, Statement};

#[derive(Debug, Clone, Copy)]
pub struct ParamDecl {
    pub name: Symbol,
    pub internal: Symbol,
}

#[derive(Debug, Clone, Copy)]
pub struct Function<'cx> {
    pub name: Symbol,
    pub ty: &'cx Ty<'cx>,
    pub params: &'cx [ParamDecl],
    /// `None` for a plain declaration.
    pub body: Option<&'cx Statement<'cx>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ItemKind<'cx> {
    Function(Function<'cx>),
    /// A file-scope variable: static storage.
    Global(LocalDecl<'cx>),
    /// A struct, enum or alias declaration. Carries no code; kept for
    /// printing and tooling.
    TypeDef {
        name: Symbol,
        ty: &'cx Ty<'cx>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Item<'cx> {
    pub span: Span,
    pub kind: ItemKind<'cx>,
}

#[derive(Debug, Default)]
pub struct TranslationUnit<'cx> {
    pub items: Vec<Item<'cx>>,
}
