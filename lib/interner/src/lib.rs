use rustc_hash::FxHashMap;

/// An interned string.
///
/// Two symbols compare equal iff they were interned from equal
/// strings, so equality is a single integer comparison.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct Symbol(u32);

pub struct Interner {
    strings: Vec<&'static str>,
    owned: Vec<Box<str>>,
    set: FxHashMap<&'static str, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            owned: Vec::new(),
            set: FxHashMap::default(),
        }
    }

    pub fn get_or_intern(&mut self, src: &str) -> Symbol {
        if let Some(sym) = self.set.get(src) {
            return *sym;
        }

        let boxed: Box<str> = src.into();
        /* SAFETY: the box's heap allocation has a stable address for as
           long as the interner lives, and `resolve` never hands the
           `'static` reference out beyond a borrow of the interner. */
        let stable: &'static str = unsafe { &*(&*boxed as *const str) };

        let sym = Symbol(u32::try_from(self.strings.len()).unwrap());
        self.strings.push(stable);
        self.owned.push(boxed);
        self.set.insert(stable, sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.0 as usize).copied()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut interner = Interner::new();

        let a = interner.get_or_intern("offset");
        let b = interner.get_or_intern("length");
        let c = interner.get_or_intern("offset");

        assert_eq!(a, c);
        assert_ne!(a, b);

        assert_eq!(interner.resolve(a), Some("offset"));
        assert_eq!(interner.resolve(b), Some("length"));
    }

    #[test]
    fn symbols_work_as_map_keys() {
        let mut interner = Interner::new();
        let mut map = FxHashMap::default();

        let a = interner.get_or_intern("x");
        let b = interner.get_or_intern("y");
        map.insert(a, 1);
        map.insert(b, 2);

        let again = interner.get_or_intern("x");
        assert_eq!(map.get(&again), Some(&1));
    }
}
