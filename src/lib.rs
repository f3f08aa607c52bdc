//! Evaluation core of a minimal Lisp.
//!
//! [`evaluate`] takes an already-parsed expression and an [`Environment`]
//! and computes its value: special forms are dispatched by name, closures
//! capture their defining environment, and every failure is a [`LispError`].

pub mod asserts;
pub mod config;
pub mod environment;
pub mod error;
pub mod forms;
pub mod interner;
pub mod interpreter;
pub mod language;
pub mod parser;
pub mod stack;

// Re-export commonly used items for convenience
pub use config::EvalConfig;
pub use environment::Environment;
pub use error::{LispError, Result};
pub use forms::Form;
pub use interner::Symbol;
pub use interpreter::{Interpreter, evaluate};
pub use language::{Closure, Value, cons};
pub use parser::{parse, parse_multiple, parse_multiple_with_limit, parse_with_limit};
