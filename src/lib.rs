//! Subscheme - an interpreter for a small Scheme-dialect expression language.
//!
//! This crate provides a minimalistic expression interpreter for a proper
//! subset of Scheme: integer arithmetic, numeric comparison, boolean logic,
//! quotation, and pair/list primitives, dispatched over a fixed table of
//! built-in procedures. There are no variable bindings, no user-defined
//! procedures, and no conditionals.
//!
//! ```scheme
//! (+ 1 2 3)                     ; => 6
//! (and 1 2 3)                   ; => 3
//! (list-ref (list 10 20 30) 1)  ; => 20
//! (pair? '(1 . 2))              ; => #t
//! ```
//!
//! Source text flows strictly forward through three stages:
//!
//! - `tokenizer`: a streaming scanner with one token of lookahead
//! - `reader`: recursive-descent construction of the S-expression tree
//! - `evaluator`: tree-walking reduction over the built-in table
//!
//! The [`interpreter::run`] facade glues the stages together: it reads up
//! to two top-level forms from a source string, evaluates them, and
//! returns their concatenated printed forms.
//!
//! ## Modules
//!
//! - `ast`: the shared value/AST type and its printed form
//! - `tokenizer`: lexeme recognition over a character stream
//! - `reader`: token stream to S-expression trees
//! - `builtinops`: the built-in procedure table
//! - `evaluator`: tree-walking evaluation
//! - `interpreter`: the `run` driver

use std::fmt;

/// Maximum reader nesting depth, to keep pathologically nested input from
/// overflowing the stack. The language has no user-defined recursion, so
/// evaluation depth is bounded by parse depth and needs no separate limit.
pub const MAX_PARSE_DEPTH: usize = 128;

/// Error type for the interpreter, one variant per failing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Tokenizer or reader failure: unrecognized character, unexpected end
    /// of input, malformed list, quote without datum
    SyntaxError(String),
    /// Operator-position symbol with no entry in the builtin table
    NameError(String),
    /// Evaluation failure: arity mismatch, type mismatch, `car`/`cdr` on
    /// empty, index out of range, invalid structure
    RuntimeError(String),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Error::SyntaxError(message.into())
    }

    pub(crate) fn name(message: impl Into<String>) -> Self {
        Error::NameError(message.into())
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Error::RuntimeError(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SyntaxError(msg) => write!(f, "SyntaxError: {msg}"),
            Error::NameError(msg) => write!(f, "NameError: {msg}"),
            Error::RuntimeError(msg) => write!(f, "RuntimeError: {msg}"),
        }
    }
}

pub mod ast;
pub mod builtinops;
pub mod evaluator;
pub mod interpreter;
pub mod reader;
pub mod tokenizer;

pub use interpreter::run;
