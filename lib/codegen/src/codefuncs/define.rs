use ast::{
    Expression, ExpressionKind, Function, Item, ItemKind, Statement, StatementKind,
    TranslationUnit,
};
use ir::ConstData;
use session::with_symbol;

use super::{Condition, Define, Eval, EvalConstant, Execute};
use crate::code_generator::{ir_type, CodeGen};

impl Define for TranslationUnit<'_> {
    fn define(&self, cg: &mut CodeGen<'_, '_>) {
        for item in &self.items {
            item.define(cg);
        }
    }
}

impl Define for Item<'_> {
    fn define(&self, cg: &mut CodeGen<'_, '_>) {
        match &self.kind {
            ItemKind::Function(f) => f.define(cg),
            ItemKind::Global(decl) => {
                let init = match decl.init {
                    Some(value) => value.constant(cg),
                    None => ConstData::Zero,
                };
                with_symbol(decl.internal, |name| {
                    cg.builder.def_global(name, decl.ty.to_string(), init);
                });
            }
            /* type declarations carry no code */
            ItemKind::TypeDef { .. } => {}
        }
    }
}

impl Define for Function<'_> {
    fn define(&self, cg: &mut CodeGen<'_, '_>) {
        let Some(body) = self.body else {
            /* a plain declaration emits nothing; calls bind by name */
            return;
        };

        let (param_tys, _, _) = self.ty.as_function_type().unwrap();

        let ir_params = self
            .params
            .iter()
            .zip(param_tys)
            .map(|(p, ty)| {
                (
                    with_symbol(p.internal, |s| Box::<str>::from(s)),
                    ir_type(ty),
                )
            })
            .collect();

        let name = with_symbol(self.name, ToOwned::to_owned);
        let values = cg.builder.function_definition_begin(&name, ir_params);

        /* params spill into addressable slots */
        for ((p, ty), value) in self.params.iter().zip(param_tys).zip(values) {
            let slot = with_symbol(p.internal, |s| {
                cg.builder.alloc_local(s, &ty.to_string())
            });
            cg.builder.store(value, slot, ir_type(ty));
            cg.set_local(p.internal, slot);
        }

        body.execute(cg);

        cg.builder.function_definition_end();
        cg.clear_locals();
    }
}

/// Closes the current block with a jump, unless a `return` inside
/// the block already terminated it.
fn jump(cg: &mut CodeGen<'_, '_>, label: ir::Label) {
    if cg.builder.block_open() {
        cg.builder.branch(label);
    }
}

impl Execute for Statement<'_> {
    fn execute(&self, cg: &mut CodeGen<'_, '_>) {
        /* statements behind a terminator are unreachable */
        if !cg.builder.block_open() {
            return;
        }
        match self.kind {
            StatementKind::Empty => {}
            StatementKind::Expr(expr) => discard_eval(expr, cg),
            StatementKind::Block(stmts) => {
                for stmt in stmts {
                    stmt.execute(cg);
                }
            }
            StatementKind::Local(decl) => {
                let slot = with_symbol(decl.internal, |s| {
                    cg.builder.alloc_local(s, &decl.ty.to_string())
                });
                cg.set_local(decl.internal, slot);
                match decl.init {
                    Some(init) => {
                        if let ExpressionKind::ExprVector(elems) = init.kind {
                            store_vector(slot, init.ty, elems, cg);
                        } else {
                            let value = init.eval(cg);
                            cg.builder.store(value, slot, ir_type(decl.ty));
                        }
                    }
                    None => {}
                }
            }
            StatementKind::If { cond, then_block, else_block } => {
                let then_label = cg.builder.fresh_label("then");
                let else_label = cg.builder.fresh_label("else");
                let end_label = cg.builder.fresh_label("end");

                cond.condition(cg, then_label, else_label);

                cg.builder.emit_label(then_label);
                then_block.execute(cg);
                jump(cg, end_label);

                /* connect with 'end' even when 'else' is empty */
                cg.builder.emit_label(else_label);
                if let Some(else_block) = else_block {
                    else_block.execute(cg);
                }
                jump(cg, end_label);

                cg.builder.emit_label(end_label);
            }
            StatementKind::While { cond, body } => {
                let cond_label = cg.builder.fresh_label("cond");
                let loop_label = cg.builder.fresh_label("loop");
                let end_label = cg.builder.fresh_label("end");

                cg.builder.branch(cond_label);

                cg.builder.emit_label(cond_label);
                cond.condition(cg, loop_label, end_label);

                cg.builder.emit_label(loop_label);
                body.execute(cg);
                jump(cg, cond_label);

                cg.builder.emit_label(end_label);
            }
            StatementKind::For { init, cond, update, body } => {
                if let Some(init) = init {
                    init.execute(cg);
                }

                let cond_label = cg.builder.fresh_label("cond");
                let loop_label = cg.builder.fresh_label("loop");
                let end_label = cg.builder.fresh_label("end");

                cg.builder.branch(cond_label);

                cg.builder.emit_label(cond_label);
                match cond {
                    Some(cond) => cond.condition(cg, loop_label, end_label),
                    /* no condition: loop forever */
                    None => cg.builder.branch(loop_label),
                }

                cg.builder.emit_label(loop_label);
                body.execute(cg);
                if cg.builder.block_open()
                    && let Some(update) = update
                {
                    discard_eval(update, cg);
                }
                jump(cg, cond_label);

                cg.builder.emit_label(end_label);
            }
            StatementKind::Return(expr) => {
                let value = expr.map(|e| e.eval(cg));
                cg.builder.ret(value);
            }
        }
    }
}

/// Element-wise store of an aggregate initializer into `base`.
fn store_vector<'cx>(
    base: ir::Value,
    vec_ty: &semantic::Ty<'cx>,
    elems: &[&Expression<'cx>],
    cg: &mut CodeGen<'_, '_>,
) {
    let elem_ty = vec_ty.ref_type().unwrap();
    let elem_name = elem_ty.to_string();

    for (i, elem) in elems.iter().enumerate() {
        let value = elem.eval(cg);
        let idx = cg.builder.int_const(ir::IrType::I64, i as i128);
        let slot = cg.builder.ptr_inc(&elem_name, base, idx);
        cg.builder.store(value, slot, ir_type(elem_ty));
    }
}

/// Evaluates an expression for its effects. Void-typed expressions
/// never materialize a value.
fn discard_eval(expr: &Expression<'_>, cg: &mut CodeGen<'_, '_>) {
    if !expr.ty.is_void() {
        expr.eval(cg);
        return;
    }
    match expr.kind {
        ExpressionKind::Call { callee, args } => {
            let args: Vec<ir::Value> = args.iter().map(|a| a.eval(cg)).collect();
            let target = super::eval::callee_of(callee, cg);
            cg.builder.call(target, args, None);
        }
        ExpressionKind::Conditional { cond, then_expr, else_expr } => {
            let then_label = cg.builder.fresh_label("then");
            let else_label = cg.builder.fresh_label("else");
            let end_label = cg.builder.fresh_label("end");

            cond.condition(cg, then_label, else_label);
            cg.builder.emit_label(then_label);
            discard_eval(then_expr, cg);
            cg.builder.branch(end_label);
            cg.builder.emit_label(else_label);
            discard_eval(else_expr, cg);
            cg.builder.branch(end_label);
            cg.builder.emit_label(end_label);
        }
        _ => unreachable!("void expression without a void producer"),
    }
}
