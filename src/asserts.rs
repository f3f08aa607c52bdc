//! Validation helpers shared by the evaluator and the special forms.
//!
//! The pure checks take a call expression as the slice of its elements
//! (form name first) so messages can render the whole offending call.

use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{LispError, Result};
use crate::forms::Form;
use crate::interner::Symbol;
use crate::interpreter::Interpreter;
use crate::language::Value;

pub(crate) fn render(call: &[Value]) -> String {
    Value::list(call.to_vec()).to_string()
}

/// Require `call` to carry exactly `args` arguments after its name
pub fn assert_exp_length(call: &[Value], args: usize) -> Result<()> {
    let expected = args + 1;
    if call.len() > expected {
        Err(LispError::TooManyArguments(render(call)))
    } else if call.len() < expected {
        Err(LispError::TooFewArguments(render(call)))
    } else {
        Ok(())
    }
}

/// Check the shape of a `define` call and return the symbol it binds.
///
/// The name must be a symbol that is not a form name and is not yet bound in
/// `env`'s own frame; this is checked before the value expression runs.
pub fn assert_valid_definition(call: &[Value], env: &Environment) -> Result<Symbol> {
    assert_exp_length(call, 2)?;
    let name = call[1].as_symbol().ok_or_else(|| {
        LispError::TypeMismatch(format!(
            "Attempted to define non-symbol as variable: {}",
            render(call)
        ))
    })?;
    assert_bindable(name, call)?;
    if env.is_bound_locally(name) {
        return Err(LispError::AlreadyDefined(name));
    }
    Ok(name)
}

/// Form names always resolve to the form, so a binding under one could
/// never be read back
pub fn assert_bindable(name: Symbol, call: &[Value]) -> Result<Symbol> {
    match Form::lookup(name) {
        Some(form) => Err(LispError::TypeMismatch(format!(
            "Cannot bind reserved form name '{form}': {}",
            render(call)
        ))),
        None => Ok(name),
    }
}

fn offending(exp: Option<&[Value]>) -> String {
    match exp {
        Some(exp) => format!(" Offending expression: {}", render(exp)),
        None => String::new(),
    }
}

pub fn assert_boolean(value: &Value, exp: Option<&[Value]>) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(LispError::TypeMismatch(format!(
            "Boolean required, got '{other}'.{}",
            offending(exp)
        ))),
    }
}

pub fn assert_symbol(value: &Value, exp: Option<&[Value]>) -> Result<Symbol> {
    match value {
        Value::Symbol(s) => Ok(*s),
        other => Err(LispError::TypeMismatch(format!(
            "Symbol required, got '{other}'.{}",
            offending(exp)
        ))),
    }
}

/// Evaluate `expr` and require an integer result
pub fn assert_integer(interp: &mut Interpreter, expr: &Value, env: &Environment) -> Result<i64> {
    match interp.eval(expr, env)? {
        Value::Integer(n) => Ok(n),
        other => Err(LispError::TypeMismatch(format!(
            "Expected integer but got: {other}"
        ))),
    }
}

/// Evaluate `expr` and require a list result
pub fn assert_list(
    interp: &mut Interpreter,
    expr: &Value,
    env: &Environment,
) -> Result<Rc<[Value]>> {
    match interp.eval(expr, env)? {
        Value::List(items) => Ok(items),
        other => Err(LispError::TypeMismatch(format!(
            "Expected list but got: {other}"
        ))),
    }
}
