use std::rc::Rc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::asserts::{
    assert_bindable, assert_boolean, assert_exp_length, assert_integer, assert_list,
    assert_symbol, assert_valid_definition, render,
};
use crate::config::EvalConfig;
use crate::environment::Environment;
use crate::error::{LispError, Result};
use crate::forms::Form;
use crate::language::{Closure, Value, cons, eq};
use crate::parser::parse_multiple_with_limit;
use crate::stack::ensure_sufficient_stack;

/// Evaluate `expr` in `env` with the default configuration
pub fn evaluate(expr: &Value, env: &Environment) -> Result<Value> {
    Interpreter::default().eval(expr, env)
}

// ============================================================================
// Interpreter
// ============================================================================

/// Tree-walking evaluator.
///
/// Holds no bindings of its own: the environment is threaded through every
/// call. The only state is the current nesting depth, checked against
/// `config.max_depth` so runaway recursion fails with `StackExhausted`.
#[derive(Debug, Default)]
pub struct Interpreter {
    config: EvalConfig,
    depth: usize,
}

impl Interpreter {
    pub fn new(config: EvalConfig) -> Self {
        Interpreter { config, depth: 0 }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn eval(&mut self, expr: &Value, env: &Environment) -> Result<Value> {
        if self.depth >= self.config.max_depth {
            return Err(LispError::StackExhausted {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_inner(expr, env));
        self.depth -= 1;
        result
    }

    /// Parse every top-level expression in `source` and evaluate them in
    /// order, returning the last value (`None` for empty input). Input nested
    /// deeper than `max_depth` is rejected by the reader.
    pub fn eval_source(&mut self, source: &str, env: &Environment) -> Result<Option<Value>> {
        let mut last = None;
        for expr in parse_multiple_with_limit(source, self.config.max_depth)? {
            last = Some(self.eval(&expr, env)?);
        }
        Ok(last)
    }

    fn eval_inner(&mut self, expr: &Value, env: &Environment) -> Result<Value> {
        match expr {
            // Self-evaluating forms
            Value::Integer(_) | Value::Boolean(_) => Ok(expr.clone()),

            // Evaluated values re-enter here when a call is retried with a
            // resolved head
            Value::Closure(_) | Value::Builtin(_) => Ok(expr.clone()),

            Value::Symbol(name) => match Form::lookup(*name) {
                Some(form) => Ok(Value::Builtin(form)),
                None => env.lookup(*name),
            },

            Value::List(items) => match items.split_first() {
                None => Ok(expr.clone()),
                Some((head, args)) => self.eval_call(items, head, args, env),
            },
        }
    }

    fn eval_call(
        &mut self,
        call: &[Value],
        head: &Value,
        args: &[Value],
        env: &Environment,
    ) -> Result<Value> {
        let callee = self.eval(head, env)?;
        match callee {
            Value::Builtin(form) => {
                trace!(form = form.name(), "dispatch form");
                self.apply_form(form, call, env)
            }
            Value::Closure(closure) => self.apply(&closure, args, env),
            // A list in call position is itself an expression producing the
            // callee; resolve it and retry the call
            Value::List(ref items) if !items.is_empty() => {
                let resolved = self.eval(&callee, env)?;
                self.eval(&cons(resolved, args), env)
            }
            other => Err(LispError::NotCallable(other.to_string())),
        }
    }

    /// Call a closure: arguments are evaluated in the caller's environment,
    /// the body in a child of the closure's captured environment.
    pub fn apply(&mut self, closure: &Closure, args: &[Value], env: &Environment) -> Result<Value> {
        if args.len() != closure.params.len() {
            return Err(LispError::ArityMismatch {
                expected: closure.params.len(),
                actual: args.len(),
            });
        }
        trace!(params = closure.params.len(), "apply closure");

        let values = args
            .iter()
            .map(|arg| self.eval(arg, env))
            .collect::<Result<Vec<_>>>()?;
        let frame = closure.env.extend(closure.params.iter().copied().zip(values));
        self.eval(&closure.body, &frame)
    }

    // ========================================================================
    // Special Forms
    // ========================================================================

    fn apply_form(&mut self, form: Form, call: &[Value], env: &Environment) -> Result<Value> {
        // `define` reports its own shape errors
        if form != Form::Define {
            assert_exp_length(call, form.arity())?;
        }
        let args = &call[1..];

        match form {
            Form::Quote => Ok(args[0].clone()),
            Form::Atom => {
                let value = self.eval(&args[0], env)?;
                Ok(Value::Boolean(value.is_atom()))
            }
            Form::Eq => {
                let a = self.eval(&args[0], env)?;
                let b = self.eval(&args[1], env)?;
                Ok(Value::Boolean(eq(&a, &b)))
            }
            Form::If => {
                let condition = self.eval(&args[0], env)?;
                let branch = if assert_boolean(&condition, Some(call))? {
                    &args[1]
                } else {
                    &args[2]
                };
                self.eval(branch, env)
            }
            Form::Define => self.define(call, env),
            Form::Lambda => self.lambda(call, env),
            Form::Add | Form::Sub | Form::Mul | Form::Div | Form::Mod => {
                let a = assert_integer(self, &args[0], env)?;
                let b = assert_integer(self, &args[1], env)?;
                arithmetic(form, a, b, call).map(Value::Integer)
            }
            Form::Gt => {
                let a = assert_integer(self, &args[0], env)?;
                let b = assert_integer(self, &args[1], env)?;
                Ok(Value::Boolean(a > b))
            }
            Form::Cons => {
                let head = self.eval(&args[0], env)?;
                let tail = assert_list(self, &args[1], env)?;
                Ok(cons(head, &tail))
            }
            Form::Head => {
                let list = assert_list(self, &args[0], env)?;
                list.first()
                    .cloned()
                    .ok_or_else(|| LispError::EmptyList(render(call)))
            }
            Form::Tail => {
                let list = assert_list(self, &args[0], env)?;
                Ok(Value::list(list.get(1..).unwrap_or_default().to_vec()))
            }
            Form::Empty => {
                let list = assert_list(self, &args[0], env)?;
                Ok(Value::Boolean(list.is_empty()))
            }
            Form::Source => source(call, env),
        }
    }

    fn define(&mut self, call: &[Value], env: &Environment) -> Result<Value> {
        let name = assert_valid_definition(call, env)?;
        let value = self.eval(&call[2], env)?;
        debug!(%name, %value, "define");
        env.define(name, value)?;
        Ok(Value::Symbol(name))
    }

    fn lambda(&mut self, call: &[Value], env: &Environment) -> Result<Value> {
        let params = call[1].as_list().ok_or_else(|| {
            LispError::TypeMismatch(format!("Parameters must be a list, got: {}", call[1]))
        })?;

        let mut seen = FxHashSet::default();
        let mut names = Vec::with_capacity(params.len());
        for param in params {
            let name = assert_bindable(assert_symbol(param, Some(call))?, call)?;
            if !seen.insert(name) {
                return Err(LispError::TypeMismatch(format!(
                    "Duplicate parameter {name} in: {}",
                    render(call)
                )));
            }
            names.push(name);
        }

        Ok(Value::Closure(Rc::new(Closure {
            env: env.clone(),
            params: names,
            body: call[2].clone(),
        })))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Fixed-width integer arithmetic. Division truncates toward zero and `mod`
/// takes the sign of the dividend.
fn arithmetic(form: Form, a: i64, b: i64, call: &[Value]) -> Result<i64> {
    let result = match form {
        Form::Add => a.checked_add(b),
        Form::Sub => a.checked_sub(b),
        Form::Mul => a.checked_mul(b),
        Form::Div | Form::Mod if b == 0 => {
            return Err(LispError::DivisionByZero(render(call)));
        }
        Form::Div => a.checked_div(b),
        Form::Mod => a.checked_rem(b),
        _ => unreachable!("{form} is not an arithmetic form"),
    };
    result.ok_or_else(|| LispError::IntegerOverflow(render(call)))
}

/// `source`: forms yield their descriptor, closures yield `(params body)`,
/// anything else is returned as bound
fn source(call: &[Value], env: &Environment) -> Result<Value> {
    let name = assert_symbol(&call[1], Some(call))?;
    if let Some(form) = Form::lookup(name) {
        return Ok(Value::Builtin(form));
    }
    match env.lookup(name)? {
        Value::Closure(closure) => {
            let params = closure.params.iter().copied().map(Value::Symbol).collect();
            Ok(Value::list(vec![Value::list(params), closure.body.clone()]))
        }
        other => Ok(other),
    }
}
