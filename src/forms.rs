//! Special and builtin forms
//!
//! Forms are dispatched by name in call position and receive their
//! arguments unevaluated; each form decides what (if anything) to evaluate.
//! The set is closed, so it is an enum resolved once through a static
//! Symbol-keyed table rather than a table of boxed callbacks.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::interner::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Quote,
    Atom,
    Eq,
    If,
    Define,
    Lambda,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Cons,
    Head,
    Tail,
    Empty,
    Source,
}

impl Form {
    pub const ALL: [Form; 17] = [
        Form::Quote,
        Form::Atom,
        Form::Eq,
        Form::If,
        Form::Define,
        Form::Lambda,
        Form::Add,
        Form::Sub,
        Form::Mul,
        Form::Div,
        Form::Mod,
        Form::Gt,
        Form::Cons,
        Form::Head,
        Form::Tail,
        Form::Empty,
        Form::Source,
    ];

    /// The name the form is written with in source text
    pub fn name(self) -> &'static str {
        match self {
            Form::Quote => "quote",
            Form::Atom => "atom",
            Form::Eq => "eq",
            Form::If => "if",
            Form::Define => "define",
            Form::Lambda => "lambda",
            Form::Add => "+",
            Form::Sub => "-",
            Form::Mul => "*",
            Form::Div => "/",
            Form::Mod => "mod",
            Form::Gt => ">",
            Form::Cons => "cons",
            Form::Head => "head",
            Form::Tail => "tail",
            Form::Empty => "empty",
            Form::Source => "source",
        }
    }

    /// Number of arguments the form takes, not counting its name
    pub fn arity(self) -> usize {
        match self {
            Form::Quote
            | Form::Atom
            | Form::Head
            | Form::Tail
            | Form::Empty
            | Form::Source => 1,
            Form::Eq
            | Form::Define
            | Form::Lambda
            | Form::Add
            | Form::Sub
            | Form::Mul
            | Form::Div
            | Form::Mod
            | Form::Gt
            | Form::Cons => 2,
            Form::If => 3,
        }
    }

    /// Look up the form a symbol names, if any
    pub fn lookup(symbol: Symbol) -> Option<Form> {
        FORMS.get(&symbol).copied()
    }
}

static FORMS: Lazy<FxHashMap<Symbol, Form>> = Lazy::new(|| {
    Form::ALL
        .iter()
        .map(|form| (Symbol::new(form.name()), *form))
        .collect()
});

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
