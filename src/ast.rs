//! This module defines the core S-expression value type shared by the
//! reader and the evaluator. The main enum, [`Value`], is both the AST
//! produced by the reader and the runtime value produced by evaluation.
//! Pairs are the sole compound constructor: proper lists, improper lists,
//! and the empty list are all chains of reference-counted [`Pair`] nodes.
//! Display logic matches Scheme surface syntax, so fully literal data
//! round-trips through parsing and printing.

use std::fmt;
use std::rc::Rc;

use crate::builtinops::BuiltinOp;

/// Type alias for number values in the interpreter
pub(crate) type NumberType = i64;

/// Core AST and runtime value type.
///
/// A dotted pair `(a . b)` is kept in the three-node marker encoding
/// `Pair(a, Pair(Dot, Pair(b, Null)))`, produced uniformly by the reader
/// and by `cons`. Proper lists are pair chains terminated by `Null` and
/// never contain `Dot`. Inside quoted data the empty list is the explicit
/// node `Pair(Null, Null)` so it survives as a datum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numbers (64-bit signed integers only)
    Number(NumberType),
    /// Boolean values, printed as `#t` / `#f`
    Boolean(bool),
    /// Symbols (identifiers), compared by name
    Symbol(String),
    /// A cons cell; see the type-level note on encodings
    Pair(Rc<Pair>),
    /// The empty list / absent value; terminates proper lists
    Null,
    /// Marker for the `.` lexeme inside the dotted-pair encoding
    Dot,
    /// The captured printed form of a quoted datum
    Text(String),
    /// A built-in procedure resolved from operator position
    Builtin(&'static BuiltinOp),
}

/// A single cons cell. Components hold [`Value::Null`] when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub first: Value,
    pub second: Value,
}

/// Helper for creating symbols, handy in the reader and in tests.
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::Symbol(name.as_ref().to_owned())
}

impl Value {
    pub(crate) fn pair(first: Value, second: Value) -> Value {
        Value::Pair(Rc::new(Pair { first, second }))
    }

    /// The explicit `()` node used inside quoted data and as the result of
    /// emptying a list.
    pub(crate) fn empty_list() -> Value {
        Value::pair(Value::Null, Value::Null)
    }

    /// Build the three-node marker encoding of the dotted pair
    /// `(first . second)`.
    pub(crate) fn dotted(first: Value, second: Value) -> Value {
        Value::pair(
            first,
            Value::pair(Value::Dot, Value::pair(second, Value::Null)),
        )
    }

    /// Build a proper list; zero elements produce the empty-list node.
    pub(crate) fn list_of(elements: Vec<Value>) -> Value {
        if elements.is_empty() {
            return Value::empty_list();
        }
        elements
            .into_iter()
            .rev()
            .fold(Value::Null, |tail, element| Value::pair(element, tail))
    }

    /// True for the `Pair(Null, _)` empty-list node.
    pub(crate) fn is_empty_list(&self) -> bool {
        matches!(self, Value::Pair(cell) if cell.first == Value::Null)
    }
}

impl Pair {
    /// Walk the `second` spine, collecting one value per pair plus any
    /// non-null terminus. For an application this is the argument list;
    /// the `Dot` marker of a dotted pair is not filtered out.
    pub(crate) fn tail_values(&self) -> Vec<Value> {
        let mut values = Vec::new();
        let mut cursor = &self.second;
        while let Value::Pair(cell) = cursor {
            values.push(cell.first.clone());
            cursor = &cell.second;
        }
        if !matches!(cursor, Value::Null) {
            values.push(cursor.clone());
        }
        values
    }

    /// Full linearization: the head slot (skipped when Null) followed by
    /// the `second` spine.
    pub(crate) fn elements(&self) -> Vec<Value> {
        let mut values = Vec::new();
        if self.first != Value::Null {
            values.push(self.first.clone());
        }
        values.extend(self.tail_values());
        values
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Symbol(name) => write!(f, "{name}"),
            Value::Null => Ok(()),
            Value::Dot => write!(f, "."),
            Value::Text(text) => write!(f, "{text}"),
            Value::Builtin(op) => write!(f, "#<builtin {}>", op.name),
            Value::Pair(cell) => {
                write!(f, "(")?;
                if cell.first != Value::Null {
                    write!(f, "{}", cell.first)?;
                }
                for value in cell.tail_values() {
                    write!(f, " {value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        let test_cases: Vec<(Value, &str)> = vec![
            (Value::Number(42), "42"),
            (Value::Number(-7), "-7"),
            (Value::Boolean(true), "#t"),
            (Value::Boolean(false), "#f"),
            (sym("list-ref"), "list-ref"),
            (Value::Null, ""),
            (Value::Dot, "."),
            (Value::Text("(1 2)".to_owned()), "(1 2)"),
            (Value::empty_list(), "()"),
            (
                Value::list_of(vec![Value::Number(1), Value::Number(2), Value::Number(3)]),
                "(1 2 3)",
            ),
            (Value::dotted(Value::Number(1), Value::Number(2)), "(1 . 2)"),
            (
                Value::list_of(vec![
                    sym("a"),
                    Value::empty_list(),
                    Value::dotted(Value::Number(1), sym("b")),
                ]),
                "(a () (1 . b))",
            ),
        ];

        for (value, expected) in test_cases {
            assert_eq!(value.to_string(), expected, "display of {value:?}");
        }
    }

    #[test]
    fn test_linearization() {
        // (1 2 3): the spine holds the arguments, elements adds the head
        let list = Value::list_of(vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
        let Value::Pair(cell) = list else {
            panic!("list_of must build a pair");
        };
        assert_eq!(
            cell.tail_values(),
            vec![Value::Number(2), Value::Number(3)]
        );
        assert_eq!(
            cell.elements(),
            vec![Value::Number(1), Value::Number(2), Value::Number(3)]
        );

        // (1 . 2): the marker encoding linearizes to [1, ., 2]
        let dotted = Value::dotted(Value::Number(1), Value::Number(2));
        let Value::Pair(cell) = dotted else {
            panic!("dotted must build a pair");
        };
        assert_eq!(cell.tail_values(), vec![Value::Dot, Value::Number(2)]);
        assert_eq!(
            cell.elements(),
            vec![Value::Number(1), Value::Dot, Value::Number(2)]
        );

        // (): the head slot is skipped, nothing remains
        let Value::Pair(cell) = Value::empty_list() else {
            panic!("empty_list must build a pair");
        };
        assert_eq!(cell.elements(), Vec::<Value>::new());
    }

    #[test]
    fn test_empty_list_node() {
        assert!(Value::empty_list().is_empty_list());
        assert!(!Value::Null.is_empty_list());
        assert!(!Value::pair(Value::Number(1), Value::Null).is_empty_list());
        assert_eq!(Value::list_of(vec![]), Value::empty_list());
    }

    #[test]
    fn test_improper_terminus_is_linearized() {
        // A raw pair chain ending in a non-null terminus keeps it as the
        // final element.
        let improper = Value::pair(Value::Number(1), Value::Number(2));
        let Value::Pair(cell) = improper else {
            panic!("pair must build a pair");
        };
        assert_eq!(cell.tail_values(), vec![Value::Number(2)]);
    }
}
