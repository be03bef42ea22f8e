//! Interned symbol names.
//!
//! Symbols appear as record heads, alist keys and hook names; interning makes
//! them `Copy` and turns equality into an integer compare.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static INTERNER: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// A symbol name interned in the process-wide table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(DefaultSymbol);

impl Symbol {
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER.write().unwrap_or_else(PoisonError::into_inner);
        Symbol(interner.get_or_intern(name))
    }

    /// Owned copy of the symbol's name
    pub fn name(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Run `f` against the name without allocating
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let interner = INTERNER.read().unwrap_or_else(PoisonError::into_inner);
        // Every Symbol was produced by this interner, which never removes entries.
        f(interner.resolve(self.0).unwrap_or_default())
    }

    pub fn is(&self, name: &str) -> bool {
        self.with_str(|s| s == name)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}
