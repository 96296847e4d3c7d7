//! Process-wide compilation session.
//!
//! The session owns the state that outlives any single phase: for now,
//! the string interner. It is created lazily on first use and lives
//! for the rest of the process.

use std::cell::RefCell;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Copy, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct Symbol(interner::Symbol);

impl Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        try_with_symbol(*self, |sym| match sym {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "{:?}", self.0),
        })
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_symbol(*self, |s| write!(f, "{s}"))
    }
}

pub struct Interner(RefCell<interner::Interner>);

impl Interner {
    pub fn get_or_intern(&self, src: &str) -> Symbol {
        Symbol(self.0.borrow_mut().get_or_intern(src))
    }

    pub fn resolve<R>(&self, sym: Symbol, f: impl FnOnce(Option<&str>) -> R) -> R {
        f(self.0.borrow().resolve(sym.0))
    }

    pub fn resolve_unchecked<R>(&self, sym: Symbol, f: impl FnOnce(&str) -> R) -> R {
        let i = self.0.borrow();
        let s = i.resolve(sym.0).unwrap_or_else(|| {
            /* Symbols only come out of this same interner, so a miss
             * means someone forged one. */
            panic!("attempt to resolve unknown symbol: {:?}", sym.0)
        });
        f(s)
    }
}

pub struct Session {
    pub string_interner: Interner,
}

impl Session {
    fn new() -> Self {
        Self {
            string_interner: Interner(RefCell::new(interner::Interner::new())),
        }
    }
}

thread_local! {
    static SESSION: Session = Session::new();
}

pub fn with_session<R>(f: impl FnOnce(&Session) -> R) -> R {
    SESSION.with(|sess| f(sess))
}

pub fn with_session_interner<R>(f: impl FnOnce(&Interner) -> R) -> R {
    with_session(|sess| f(&sess.string_interner))
}

pub fn intern(src: &str) -> Symbol {
    with_session_interner(|i| i.get_or_intern(src))
}

pub fn try_with_symbol<R>(sym: Symbol, f: impl FnOnce(Option<&str>) -> R) -> R {
    with_session_interner(|i| i.resolve(sym, f))
}

pub fn with_symbol<R>(sym: Symbol, f: impl FnOnce(&str) -> R) -> R {
    with_session_interner(|i| i.resolve_unchecked(sym, f))
}
