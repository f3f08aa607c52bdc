use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::forms::Form;
use crate::interner::Symbol;

// ============================================================================
// Core Type System
// ============================================================================

/// A user-defined function produced by `lambda`.
///
/// The environment is shared with the defining scope, not copied, so
/// bindings added to that scope later are visible to the body.
#[derive(Clone)]
pub struct Closure {
    pub env: Environment,
    pub params: Vec<Symbol>,
    pub body: Value,
}

// Environment is a shared mutable frame chain; printing it would recurse
// through every closure stored in it.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("env", &"<environment>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Symbol(Symbol),
    List(Rc<[Value]>),
    Closure(Rc<Closure>),
    /// The value a form name evaluates to; also what `source` returns for it
    Builtin(Form),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Closures are only equal to themselves
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// Constructors and Classification
// ============================================================================

impl Value {
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(Symbol::new(name))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(items.into())
    }

    pub fn empty_list() -> Value {
        Value::list(Vec::new())
    }

    /// Integers, booleans and symbols are atoms; lists, closures and
    /// builtin forms are not.
    pub fn is_atom(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Boolean(_) | Value::Symbol(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_closure(&self) -> bool {
        matches!(self, Value::Closure(_))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(s) => Some(*s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Closure(closure) => write!(f, "<closure/{}>", closure.params.len()),
            Value::Builtin(form) => write!(f, "<form:{form}>"),
        }
    }
}

// ============================================================================
// Primitive Operations
// ============================================================================

/// Prepend `head` to `tail`, producing a new list
pub fn cons(head: Value, tail: &[Value]) -> Value {
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(head);
    items.extend_from_slice(tail);
    Value::list(items)
}

/// Atom equality: false whenever either side is not an atom
pub fn eq(a: &Value, b: &Value) -> bool {
    a.is_atom() && b.is_atom() && a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_classification() {
        assert!(Value::Integer(1).is_atom());
        assert!(Value::Boolean(false).is_atom());
        assert!(Value::symbol("x").is_atom());
        assert!(!Value::empty_list().is_atom());
        assert!(!Value::Builtin(Form::Quote).is_atom());
    }

    #[test]
    fn test_predicates_are_exclusive() {
        let v = Value::list(vec![Value::Integer(1)]);
        assert!(v.is_list());
        assert!(!v.is_symbol());
        assert!(!v.is_integer());
        assert!(!v.is_boolean());
        assert!(!v.is_closure());
    }

    #[test]
    fn test_display() {
        let v = Value::list(vec![
            Value::symbol("+"),
            Value::Integer(-2),
            Value::list(vec![Value::Boolean(true), Value::Boolean(false)]),
            Value::empty_list(),
        ]);
        assert_eq!(v.to_string(), "(+ -2 (#t #f) ())");
        assert_eq!(Value::Builtin(Form::Mod).to_string(), "<form:mod>");
    }

    #[test]
    fn test_cons_leaves_tail_untouched() {
        let tail = vec![Value::Integer(2), Value::Integer(3)];
        let result = cons(Value::Integer(1), &tail);
        assert_eq!(result.to_string(), "(1 2 3)");
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn test_eq_rejects_lists() {
        let a = Value::list(vec![Value::Integer(1)]);
        assert!(!eq(&a, &a.clone()));
        assert!(eq(&Value::symbol("a"), &Value::symbol("a")));
        assert!(!eq(&Value::Integer(1), &Value::Boolean(true)));
    }
}
