//! Lowers the typed expression tree into the IR builder's
//! operations.
//!
//! Every expression answers four code-generation queries: its value,
//! its address, its compile-time constant, and a short-circuit
//! conditional branch. The queries have preconditions (`has_address`,
//! `is_const`) that promotion already established; violating them
//! here is a front-end bug and aborts.

mod code_generator;
mod codefuncs;

use ast::TranslationUnit;
use codefuncs::Define;
use error_manager::ErrorManager;
use semantic::TypeCtx;

pub use code_generator::CodeGen;

pub fn lower<'cx>(
    unit: &TranslationUnit<'cx>,
    tcx: &TypeCtx<'cx>,
    em: &mut ErrorManager,
) -> ir::Module {
    let mut cg = CodeGen::new(tcx, em);
    unit.define(&mut cg);
    cg.finish()
}
