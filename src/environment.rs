//! Environment for variable bindings
//!
//! An Environment is one binding frame plus an optional parent. Lookups walk
//! outward to the root; `define` only ever touches the current frame.
//! Frames are shared (`Rc<RefCell<_>>`), so a closure capturing an
//! environment sees definitions added to it after the capture.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{LispError, Result};
use crate::interner::Symbol;
use crate::language::Value;

// ============================================================================
// Environment
// ============================================================================

struct Frame {
    bindings: FxHashMap<Symbol, Value>,
    parent: Option<Environment>,
}

/// A chain of binding frames. Cloning shares the frame, it does not copy it.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new, empty global environment
    pub fn new() -> Self {
        Self::with_frame(FxHashMap::default(), None)
    }

    fn with_frame(bindings: FxHashMap<Symbol, Value>, parent: Option<Environment>) -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame { bindings, parent })),
        }
    }

    /// Create a child frame holding `bindings` that falls back to `self`
    pub fn extend<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, Value)>,
    {
        Self::with_frame(bindings.into_iter().collect(), Some(self.clone()))
    }

    /// Bind `name` in the current frame. Shadowing a parent's binding is
    /// fine; rebinding a name this frame already holds is not.
    pub fn define(&self, name: Symbol, value: Value) -> Result<()> {
        let mut frame = self.frame.borrow_mut();
        if frame.bindings.contains_key(&name) {
            return Err(LispError::AlreadyDefined(name));
        }
        frame.bindings.insert(name, value);
        Ok(())
    }

    /// Look up a variable, walking up the parent chain
    pub fn lookup(&self, name: Symbol) -> Result<Value> {
        let frame = self.frame.borrow();
        if let Some(value) = frame.bindings.get(&name) {
            return Ok(value.clone());
        }
        match &frame.parent {
            Some(parent) => parent.lookup(name),
            None => Err(LispError::UndefinedSymbol(name)),
        }
    }

    /// Whether this frame itself, ignoring parents, binds `name`
    pub fn is_bound_locally(&self, name: Symbol) -> bool {
        self.frame.borrow().bindings.contains_key(&name)
    }

    /// Number of bindings in this frame, ignoring parents
    pub fn bindings_len(&self) -> usize {
        self.frame.borrow().bindings.len()
    }

    /// Whether `self` and `other` are the same frame
    pub fn same_frame(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        f.debug_struct("Environment")
            .field("bindings", &frame.bindings.len())
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn test_define_then_lookup() {
        let env = Environment::new();
        env.define(sym("x"), Value::Integer(10)).unwrap();
        assert_eq!(env.lookup(sym("x")), Ok(Value::Integer(10)));
    }

    #[test]
    fn test_lookup_unbound() {
        let env = Environment::new();
        assert_eq!(
            env.lookup(sym("nope")),
            Err(LispError::UndefinedSymbol(sym("nope")))
        );
    }

    #[test]
    fn test_redefine_in_same_frame_fails() {
        let env = Environment::new();
        env.define(sym("x"), Value::Integer(1)).unwrap();
        assert_eq!(
            env.define(sym("x"), Value::Integer(2)),
            Err(LispError::AlreadyDefined(sym("x")))
        );
        assert_eq!(env.lookup(sym("x")), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_child_falls_back_to_parent() {
        let parent = Environment::new();
        parent.define(sym("a"), Value::Integer(1)).unwrap();
        let child = parent.extend([(sym("b"), Value::Integer(2))]);
        assert_eq!(child.lookup(sym("a")), Ok(Value::Integer(1)));
        assert_eq!(child.lookup(sym("b")), Ok(Value::Integer(2)));
    }

    #[test]
    fn test_extend_leaves_parent_untouched() {
        let parent = Environment::new();
        let child = parent.extend([(sym("b"), Value::Integer(2))]);
        child.define(sym("c"), Value::Integer(3)).unwrap();
        assert!(parent.lookup(sym("b")).is_err());
        assert!(parent.lookup(sym("c")).is_err());
        assert_eq!(parent.bindings_len(), 0);
        assert_eq!(child.bindings_len(), 2);
    }

    #[test]
    fn test_child_may_shadow_parent() {
        let parent = Environment::new();
        parent.define(sym("x"), Value::Integer(1)).unwrap();
        let child = parent.extend([]);
        child.define(sym("x"), Value::Integer(2)).unwrap();
        assert_eq!(child.lookup(sym("x")), Ok(Value::Integer(2)));
        assert_eq!(parent.lookup(sym("x")), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_parent_definitions_visible_after_extend() {
        let parent = Environment::new();
        let child = parent.extend([]);
        parent.define(sym("late"), Value::Boolean(true)).unwrap();
        assert_eq!(child.lookup(sym("late")), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_clone_shares_frame() {
        let env = Environment::new();
        let alias = env.clone();
        alias.define(sym("shared"), Value::Integer(7)).unwrap();
        assert!(env.is_bound_locally(sym("shared")));
        assert!(env.same_frame(&alias));
    }
}
