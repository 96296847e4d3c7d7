//! The typed expression tree.
//!
//! Nodes are allocated on an arena and never mutated after
//! construction: the constructors run promotion, which decides the
//! result type and wraps operands in implicit casts before the node
//! exists. A node's children are therefore always type-consistent
//! with its operator.

mod __arena {
    use super::*;

    ::arena::define_arenas!([visibility = pub]
        exprs: Expression<'ctx>,
        expr_refs: &'ctx Expression<'ctx>,
        stmts: Statement<'ctx>,
        params: ParamDecl,
    );
}

pub mod expr;
pub use expr::{BinaryOp, Expression, ExpressionKind, IdentStorage, LitKind, UnaryOp};
pub mod consteval;
mod promotion;
pub mod stmt;
pub use stmt::{LocalDecl, Statement, StatementKind};
pub mod item;
pub use item::{Function, Item, ItemKind, ParamDecl, TranslationUnit};

use __arena::Arena;

pub struct Ast<'cx> {
    arena: Arena<'cx>,
}

impl Default for Ast<'_> {
    fn default() -> Self {
        Self { arena: Arena::new() }
    }
}

impl<'cx> Ast<'cx> {
    pub fn alloc_expr(&self, expr: Expression<'cx>) -> &'cx Expression<'cx> {
        &*self.arena.alloc(expr)
    }

    pub fn alloc_expr_refs<I>(&self, it: I) -> &'cx [&'cx Expression<'cx>]
    where
        I: IntoIterator<Item = &'cx Expression<'cx>>,
    {
        &*self.arena.alloc_iter(it)
    }

    pub fn alloc_stmt(&self, stmt: Statement<'cx>) -> &'cx Statement<'cx> {
        &*self.arena.alloc(stmt)
    }

    pub fn alloc_stmts<I>(&self, it: I) -> &'cx [Statement<'cx>]
    where
        I: IntoIterator<Item = Statement<'cx>>,
    {
        &*self.arena.alloc_iter(it)
    }

    pub fn alloc_params<I>(&self, it: I) -> &'cx [ParamDecl]
    where
        I: IntoIterator<Item = ParamDecl>,
    {
        &*self.arena.alloc_iter(it)
    }
}
