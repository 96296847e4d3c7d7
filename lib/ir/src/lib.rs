//! SSA-style IR builder.
//!
//! The front-end lowers expressions through this interface: typed
//! values, labels, constants, ALU/compare/cast operations, pointer
//! arithmetic, memory traffic and phi nodes. Instructions append to
//! the function under construction; the builder checks that every
//! basic block terminates exactly once.

mod display;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrType {
    I1,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Ptr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    SMul,
    UMul,
    SDiv,
    UDiv,
    SMod,
    UMod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Eq,
    Ne,
    SLt,
    SLe,
    SGt,
    SGe,
    ULt,
    ULe,
    UGt,
    UGe,
}

/// A value id, unique within its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value(u32);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A label id, unique within its function. Carries a naming hint for
/// readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(u32);

#[derive(Debug, Clone)]
pub enum Callee {
    Name(Box<str>),
    Value(Value),
}

/// A compile-time constant, as accepted by the builder's constant
/// channel: global initializers and constant operands.
#[derive(Debug, Clone)]
pub enum ConstData {
    Int { ty: IrType, value: i128 },
    Null,
    /// The address of a global object.
    GlobalRef(Box<str>),
    /// An address constant offset from a static base.
    PtrOffset {
        base: Box<ConstData>,
        elem: Box<str>,
        offset: i128,
    },
    Array(Vec<ConstData>),
    Str(Box<str>),
    Zero,
}

#[derive(Debug, Clone)]
pub enum Inst {
    IntConst { dst: Value, ty: IrType, value: i128 },
    Zero { dst: Value, ty: IrType },
    StrConst { dst: Value, value: Box<str> },
    GlobalAddr { dst: Value, name: Box<str> },
    Binop { dst: Value, op: AluOp, a: Value, b: Value, ty: IrType },
    PtrInc { dst: Value, elem: Box<str>, ptr: Value, idx: Value },
    PtrDiff { dst: Value, elem: Box<str>, a: Value, b: Value },
    PtrMember { dst: Value, record: Box<str>, ptr: Value, index: usize },
    Cond { dst: Value, op: CondOp, a: Value, b: Value },
    Cast { dst: Value, v: Value, from: IrType, to: IrType },
    Fetch { dst: Value, addr: Value, ty: IrType },
    Store { val: Value, addr: Value, ty: IrType },
    AllocLocal { dst: Value, name: Box<str>, ty: Box<str> },
    Phi { dst: Value, a: Value, la: Label, b: Value, lb: Label, ty: IrType },
    Call { dst: Option<Value>, callee: Callee, args: Vec<Value> },
    Label(Label),
    Jmp(Label),
    CondJmp { cond: Value, then_label: Label, else_label: Label },
    Ret(Option<Value>),
}

#[derive(Debug)]
pub struct IrFunction {
    pub name: Box<str>,
    pub params: Vec<(Box<str>, IrType)>,
    pub insts: Vec<Inst>,
    label_hints: Vec<Box<str>>,
}

#[derive(Debug)]
pub struct IrGlobal {
    pub name: Box<str>,
    pub ty: Box<str>,
    pub init: ConstData,
}

#[derive(Debug, Default)]
pub struct Module {
    pub globals: Vec<IrGlobal>,
    pub functions: Vec<IrFunction>,
}

/// Per-module builder. One function is open at a time, between
/// [`function_definition_begin`](Builder::function_definition_begin)
/// and [`function_definition_end`](Builder::function_definition_end).
pub struct Builder {
    module: Module,
    current: Option<IrFunction>,
    next_value: u32,
    /// Whether the instruction stream sits inside an unterminated
    /// basic block.
    block_open: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            module: Module::default(),
            current: None,
            next_value: 0,
            block_open: false,
        }
    }

    pub fn finish(self) -> Module {
        assert!(self.current.is_none(), "unterminated function definition");
        self.module
    }

    /// Whether the instruction stream currently sits inside an
    /// unterminated basic block.
    pub fn block_open(&self) -> bool {
        self.block_open
    }

    pub fn def_global(&mut self, name: &str, ty: impl Into<Box<str>>, init: ConstData) {
        self.module.globals.push(IrGlobal {
            name: name.into(),
            ty: ty.into(),
            init,
        });
    }

    pub fn function_definition_begin(
        &mut self,
        name: &str,
        params: Vec<(Box<str>, IrType)>,
    ) -> Vec<Value> {
        assert!(self.current.is_none(), "nested function definition");
        self.next_value = 0;

        let values = (0..params.len()).map(|_| self.fresh_value()).collect();
        self.current = Some(IrFunction {
            name: name.into(),
            params,
            insts: Vec::new(),
            label_hints: Vec::new(),
        });
        self.block_open = true;
        values
    }

    pub fn function_definition_end(&mut self) {
        if self.block_open {
            self.ret(None);
        }
        let f = self.current.take().expect("no open function definition");
        self.module.functions.push(f);
    }

    fn fresh_value(&mut self) -> Value {
        let v = Value(self.next_value);
        self.next_value += 1;
        v
    }

    fn current_fn(&mut self) -> &mut IrFunction {
        self.current.as_mut().expect("no open function definition")
    }

    /// Appends a non-terminator instruction. Must land inside an open
    /// basic block.
    fn push(&mut self, inst: Inst) {
        assert!(self.block_open, "instruction after block terminator");
        self.current_fn().insts.push(inst);
    }

    /* labels */

    pub fn fresh_label(&mut self, hint: &str) -> Label {
        let f = self.current_fn();
        let l = Label(u32::try_from(f.label_hints.len()).unwrap());
        f.label_hints.push(hint.into());
        l
    }

    /// Starts the block `l`. The previous block must have terminated.
    pub fn emit_label(&mut self, l: Label) {
        assert!(!self.block_open, "label drops into an unterminated block");
        self.current_fn().insts.push(Inst::Label(l));
        self.block_open = true;
    }

    /// Unconditional branch; terminates the current block.
    pub fn branch(&mut self, l: Label) {
        self.push(Inst::Jmp(l));
        self.block_open = false;
    }

    /// Conditional branch; terminates the current block.
    pub fn cond_branch(&mut self, cond: Value, then_label: Label, else_label: Label) {
        self.push(Inst::CondJmp { cond, then_label, else_label });
        self.block_open = false;
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.push(Inst::Ret(value));
        self.block_open = false;
    }

    /* constants */

    pub fn int_const(&mut self, ty: IrType, value: i128) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::IntConst { dst, ty, value });
        dst
    }

    pub fn zero(&mut self, ty: IrType) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::Zero { dst, ty });
        dst
    }

    pub fn str_const(&mut self, value: &str) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::StrConst { dst, value: value.into() });
        dst
    }

    pub fn global_addr(&mut self, name: &str) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::GlobalAddr { dst, name: name.into() });
        dst
    }

    /* ALU */

    pub fn binop(&mut self, op: AluOp, a: Value, b: Value, ty: IrType) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::Binop { dst, op, a, b, ty });
        dst
    }

    /* pointer arithmetic */

    pub fn ptr_inc(&mut self, elem: &str, ptr: Value, idx: Value) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::PtrInc { dst, elem: elem.into(), ptr, idx });
        dst
    }

    pub fn ptr_diff(&mut self, elem: &str, a: Value, b: Value) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::PtrDiff { dst, elem: elem.into(), a, b });
        dst
    }

    pub fn ptr_member(&mut self, record: &str, ptr: Value, index: usize) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::PtrMember { dst, record: record.into(), ptr, index });
        dst
    }

    /* compare */

    pub fn cond(&mut self, op: CondOp, a: Value, b: Value) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::Cond { dst, op, a, b });
        dst
    }

    /* cast */

    pub fn cast(&mut self, v: Value, from: IrType, to: IrType) -> Value {
        if from == to {
            return v;
        }
        let dst = self.fresh_value();
        self.push(Inst::Cast { dst, v, from, to });
        dst
    }

    /* memory */

    pub fn fetch(&mut self, addr: Value, ty: IrType) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::Fetch { dst, addr, ty });
        dst
    }

    pub fn store(&mut self, val: Value, addr: Value, ty: IrType) {
        self.push(Inst::Store { val, addr, ty });
    }

    pub fn alloc_local(&mut self, name: &str, ty: &str) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::AllocLocal { dst, name: name.into(), ty: ty.into() });
        dst
    }

    pub fn phi(&mut self, a: Value, la: Label, b: Value, lb: Label, ty: IrType) -> Value {
        let dst = self.fresh_value();
        self.push(Inst::Phi { dst, a, la, b, lb, ty });
        dst
    }

    /* calls */

    pub fn call(&mut self, callee: Callee, args: Vec<Value>, ret: Option<IrType>) -> Option<Value> {
        let dst = ret.map(|_| self.fresh_value());
        self.push(Inst::Call { dst, callee, args });
        dst
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_terminators_are_enforced() {
        let mut b = Builder::new();
        b.function_definition_begin("f", Vec::new());

        let end = b.fresh_label("end");
        b.branch(end);
        b.emit_label(end);
        b.ret(None);

        b.function_definition_end();
        let module = b.finish();
        assert_eq!(module.functions.len(), 1);
    }

    #[test]
    #[should_panic(expected = "after block terminator")]
    fn instruction_after_terminator_panics() {
        let mut b = Builder::new();
        b.function_definition_begin("f", Vec::new());
        b.ret(None);
        b.int_const(IrType::I32, 1);
    }

    #[test]
    #[should_panic(expected = "unterminated block")]
    fn label_inside_open_block_panics() {
        let mut b = Builder::new();
        b.function_definition_begin("f", Vec::new());
        let l = b.fresh_label("l");
        b.emit_label(l);
    }

    #[test]
    fn implicit_return_on_end() {
        let mut b = Builder::new();
        b.function_definition_begin("f", Vec::new());
        b.function_definition_end();
        let module = b.finish();
        assert!(matches!(module.functions[0].insts.last(), Some(Inst::Ret(None))));
    }
}
