//! Scope-stack symbol table.
//!
//! The root scope holds file-level declarations; every block opens a
//! nested scope on top of it. Each entry gets a unique internal
//! identifier so later phases never have to care about shadowing.

use rustc_hash::FxHashMap;
use semantic::Ty;
use session::Symbol;
use span::Span;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    Current,
    Any,
    Root,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Storage {
    /// Static storage: file-scope variables.
    Global,
    /// A function-local slot.
    Local,
    /// A function parameter.
    Param,
    /// A function itself.
    Function,
    /// An enumerator; carries no storage at all.
    EnumConstant,
}

#[derive(Clone, Copy)]
pub struct SymEntry<'cx> {
    pub name: Symbol,
    /// Unique mangled form of `name`, stable across shadowing.
    pub internal: Symbol,
    pub ty: &'cx Ty<'cx>,
    pub span: Span,
    pub storage: Storage,
    /// Set for enumerators only.
    pub value: Option<i64>,
}

struct Scope<'cx> {
    vars: FxHashMap<Symbol, SymEntry<'cx>>,
    types: FxHashMap<Symbol, &'cx Ty<'cx>>,
}

impl Scope<'_> {
    fn new() -> Self {
        Self {
            vars: FxHashMap::default(),
            types: FxHashMap::default(),
        }
    }
}

pub struct Symtab<'cx> {
    scopes: Vec<Scope<'cx>>,
    counter: usize,
}

impl<'cx> Symtab<'cx> {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
            counter: 0,
        }
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn close_scope(&mut self) {
        assert!(self.scopes.len() > 1, "attempt to close the root scope");
        self.scopes.pop();
    }

    pub fn in_root_scope(&self) -> bool {
        self.scopes.len() == 1
    }

    fn mangle(&mut self, name: Symbol, storage: Storage) -> Symbol {
        match storage {
            /* Functions and globals keep their source name: they are
             * visible to the linker. */
            Storage::Function | Storage::Global | Storage::EnumConstant => name,
            Storage::Local | Storage::Param => {
                self.counter += 1;
                let n = self.counter;
                /* resolve first: interning inside the resolve closure
                 * would re-enter the session interner */
                let base = session::with_symbol(name, ToOwned::to_owned);
                session::intern(&format!("{base}.{n}"))
            }
        }
    }

    /// Declares `name` in the innermost scope. Fails when the scope
    /// already has an entry by that name.
    pub fn add(
        &mut self,
        span: Span,
        name: Symbol,
        ty: &'cx Ty<'cx>,
        storage: Storage,
    ) -> Option<SymEntry<'cx>> {
        if self.scopes.last().unwrap().vars.contains_key(&name) {
            return None;
        }
        let entry = SymEntry {
            name,
            internal: self.mangle(name, storage),
            ty,
            span,
            storage,
            value: None,
        };
        self.scopes.last_mut().unwrap().vars.insert(name, entry);
        Some(entry)
    }

    pub fn add_to_root_scope(
        &mut self,
        span: Span,
        name: Symbol,
        ty: &'cx Ty<'cx>,
        storage: Storage,
    ) -> Option<SymEntry<'cx>> {
        if self.scopes[0].vars.contains_key(&name) {
            return None;
        }
        let entry = SymEntry {
            name,
            internal: name,
            ty,
            span,
            storage,
            value: None,
        };
        self.scopes[0].vars.insert(name, entry);
        Some(entry)
    }

    pub fn add_enum_constant(
        &mut self,
        span: Span,
        name: Symbol,
        ty: &'cx Ty<'cx>,
        value: i64,
    ) -> Option<SymEntry<'cx>> {
        let mut entry = self.add(span, name, ty, Storage::EnumConstant)?;
        entry.value = Some(value);
        self.scopes.last_mut().unwrap().vars.insert(name, entry);
        Some(entry)
    }

    pub fn lookup(&self, name: Symbol, policy: ScopePolicy) -> Option<SymEntry<'cx>> {
        match policy {
            ScopePolicy::Current => self.scopes.last().unwrap().vars.get(&name).copied(),
            ScopePolicy::Root => self.scopes[0].vars.get(&name).copied(),
            ScopePolicy::Any => self
                .scopes
                .iter()
                .rev()
                .find_map(|s| s.vars.get(&name).copied()),
        }
    }

    /// Registers a named type (struct, enum or alias) in the
    /// innermost scope.
    pub fn add_type(&mut self, name: Symbol, ty: &'cx Ty<'cx>) -> bool {
        let types = &mut self.scopes.last_mut().unwrap().types;
        if types.contains_key(&name) {
            return false;
        }
        types.insert(name, ty);
        true
    }

    pub fn lookup_type(&self, name: Symbol, policy: ScopePolicy) -> Option<&'cx Ty<'cx>> {
        match policy {
            ScopePolicy::Current => self.scopes.last().unwrap().types.get(&name).copied(),
            ScopePolicy::Root => self.scopes[0].types.get(&name).copied(),
            ScopePolicy::Any => self
                .scopes
                .iter()
                .rev()
                .find_map(|s| s.types.get(&name).copied()),
        }
    }
}

impl Default for Symtab<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use semantic::TypeCtx;

    #[test]
    fn shadowing_and_policies() {
        let tcx = TypeCtx::default();
        let mut tab = Symtab::new();
        let a = session::intern("a");
        let span = Span::dummy();

        let root = tab
            .add_to_root_scope(span, a, tcx.unsigned(16), Storage::Global)
            .unwrap();
        assert!(tab.add_to_root_scope(span, a, tcx.unsigned(16), Storage::Global).is_none());

        tab.open_scope();
        let inner = tab.add(span, a, tcx.signed(32), Storage::Local).unwrap();
        assert!(tab.add(span, a, tcx.signed(32), Storage::Local).is_none());

        assert_ne!(root.internal, inner.internal);
        let found = tab.lookup(a, ScopePolicy::Any).unwrap();
        assert_eq!(found.internal, inner.internal);
        let found = tab.lookup(a, ScopePolicy::Root).unwrap();
        assert_eq!(found.internal, root.internal);

        tab.close_scope();
        let found = tab.lookup(a, ScopePolicy::Any).unwrap();
        assert_eq!(found.internal, root.internal);
    }

    #[test]
    fn named_types_per_scope() {
        let tcx = TypeCtx::default();
        let mut tab = Symtab::new();
        let name = session::intern("vec");

        let outer = tcx.struct_incomplete(name);
        assert!(tab.add_type(name, outer));
        assert!(!tab.add_type(name, outer));

        tab.open_scope();
        let inner = tcx.struct_incomplete(name);
        assert!(tab.add_type(name, inner));
        let found = tab.lookup_type(name, ScopePolicy::Any).unwrap();
        assert!(semantic::Ty::equals(found, inner));
        assert!(!semantic::Ty::equals(found, outer));
        tab.close_scope();
    }
}
