use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static INTERNER: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// An identifier interned in the process-wide string table.
///
/// Two symbols with the same name are the same handle, so comparing and
/// hashing them never touches the string data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(DefaultSymbol);

impl Symbol {
    /// Intern `name` and return its handle
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER.write().unwrap_or_else(|e| e.into_inner());
        Symbol(interner.get_or_intern(name))
    }

    /// Resolve the symbol back to an owned name
    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Run `f` against the symbol's name without allocating
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let interner = INTERNER.read().unwrap_or_else(|e| e.into_inner());
        // Handles are only minted by `Symbol::new`, so resolution cannot miss.
        f(interner.resolve(self.0).unwrap_or_default())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{s}"))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "Symbol({s})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_interns_to_same_symbol() {
        assert_eq!(Symbol::new("foo"), Symbol::new("foo"));
    }

    #[test]
    fn test_different_names_intern_to_different_symbols() {
        assert_ne!(Symbol::new("foo"), Symbol::new("bar"));
    }

    #[test]
    fn test_resolve_returns_name() {
        assert_eq!(Symbol::new("hello").resolve(), "hello");
    }

    #[test]
    fn test_with_str() {
        let len = Symbol::new("test").with_str(|s| s.len());
        assert_eq!(len, 4);
    }

    #[test]
    fn test_display_and_debug() {
        let sym = Symbol::new("display-test");
        assert_eq!(format!("{sym}"), "display-test");
        assert_eq!(format!("{sym:?}"), "Symbol(display-test)");
    }
}
