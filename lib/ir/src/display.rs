//! Textual rendering of a [`Module`](crate::Module).

use core::fmt::{self, Display};

use crate::{Callee, ConstData, Inst, IrFunction, IrType, Label, Module};

impl Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrType::I1 => "i1",
            IrType::I8 => "i8",
            IrType::I16 => "i16",
            IrType::I32 => "i32",
            IrType::I64 => "i64",
            IrType::F32 => "f32",
            IrType::F64 => "f64",
            IrType::Ptr => "ptr",
        };
        write!(f, "{s}")
    }
}

impl Display for ConstData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstData::Int { ty, value } => write!(f, "{ty} {value}"),
            ConstData::Null => write!(f, "null"),
            ConstData::GlobalRef(name) => write!(f, "@{name}"),
            ConstData::PtrOffset { base, elem, offset } => {
                write!(f, "ptr_offset({elem}, {base}, {offset})")
            }
            ConstData::Array(elems) => {
                write!(f, "[")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "]")
            }
            ConstData::Str(s) => write!(f, "{s:?}"),
            ConstData::Zero => write!(f, "zeroinit"),
        }
    }
}

struct LabelName<'a>(&'a IrFunction, Label);

impl Display for LabelName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let LabelName(func, label) = self;
        let hint = &func.label_hints()[label.index()];
        write!(f, "{hint}.{}", label.index())
    }
}

impl Label {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl IrFunction {
    pub(crate) fn label_hints(&self) -> &[Box<str>] {
        &self.label_hints
    }
}

impl Display for IrFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn @{}(", self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "%{i} {name}: {ty}")?;
        }
        writeln!(f, ") {{")?;

        let lbl = |l: &Label| LabelName(self, *l);

        for inst in &self.insts {
            match inst {
                Inst::Label(l) => {
                    writeln!(f, "{}:", lbl(l))?;
                    continue;
                }
                _ => write!(f, "  ")?,
            }
            match inst {
                Inst::IntConst { dst, ty, value } => writeln!(f, "{dst} = const {ty} {value}")?,
                Inst::Zero { dst, ty } => writeln!(f, "{dst} = zero {ty}")?,
                Inst::StrConst { dst, value } => writeln!(f, "{dst} = string {value:?}")?,
                Inst::GlobalAddr { dst, name } => writeln!(f, "{dst} = addr @{name}")?,
                Inst::Binop { dst, op, a, b, ty } => {
                    let op = format!("{op:?}").to_lowercase();
                    writeln!(f, "{dst} = {op} {ty} {a}, {b}")?;
                }
                Inst::PtrInc { dst, elem, ptr, idx } => {
                    writeln!(f, "{dst} = ptr_inc({elem}, {ptr}, {idx})")?;
                }
                Inst::PtrDiff { dst, elem, a, b } => {
                    writeln!(f, "{dst} = ptr_diff({elem}, {a}, {b})")?;
                }
                Inst::PtrMember { dst, record, ptr, index } => {
                    writeln!(f, "{dst} = ptr_member({record}, {ptr}, {index})")?;
                }
                Inst::Cond { dst, op, a, b } => {
                    let op = format!("{op:?}").to_lowercase();
                    writeln!(f, "{dst} = cmp {op} {a}, {b}")?;
                }
                Inst::Cast { dst, v, from, to } => {
                    writeln!(f, "{dst} = cast {v}: {from} -> {to}")?;
                }
                Inst::Fetch { dst, addr, ty } => writeln!(f, "{dst} = fetch {ty}, {addr}")?,
                Inst::Store { val, addr, ty } => writeln!(f, "store {ty} {val}, {addr}")?,
                Inst::AllocLocal { dst, name, ty } => {
                    writeln!(f, "{dst} = alloc_local {name}: {ty}")?;
                }
                Inst::Phi { dst, a, la, b, lb, ty } => {
                    writeln!(f, "{dst} = phi {ty} [{a}, {}], [{b}, {}]", lbl(la), lbl(lb))?;
                }
                Inst::Call { dst, callee, args } => {
                    if let Some(dst) = dst {
                        write!(f, "{dst} = ")?;
                    }
                    match callee {
                        Callee::Name(name) => write!(f, "call @{name}(")?,
                        Callee::Value(v) => write!(f, "call {v}(")?,
                    }
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    writeln!(f, ")")?;
                }
                Inst::Jmp(l) => writeln!(f, "br {}", lbl(l))?,
                Inst::CondJmp { cond, then_label, else_label } => {
                    writeln!(f, "br {cond}, {}, {}", lbl(then_label), lbl(else_label))?;
                }
                Inst::Ret(None) => writeln!(f, "ret")?,
                Inst::Ret(Some(v)) => writeln!(f, "ret {v}")?,
                Inst::Label(_) => unreachable!(),
            }
        }
        writeln!(f, "}}")
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for g in &self.globals {
            writeln!(f, "@{}: {} = {}", g.name, g.ty, g.init)?;
        }
        if !self.globals.is_empty() && !self.functions.is_empty() {
            writeln!(f)?;
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}
