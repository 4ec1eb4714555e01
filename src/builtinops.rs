//! Built-in procedure registry.
//!
//! Every procedure the language recognizes in operator position is defined
//! here, in one static table indexed by name. Each entry carries an
//! [`Arity`] that the evaluator validates before dispatch, so
//! implementations may index the arguments they are guaranteed.
//!
//! Builtins receive their arguments **unevaluated** and are responsible
//! for evaluating them. Most evaluate everything eagerly before acting;
//! `and` and `or` short-circuit, and `quote` never evaluates at all. This
//! contract is part of each builtin's definition.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use crate::Error;
use crate::ast::{NumberType, Pair, Value};
use crate::evaluator::eval;

/// How many arguments a built-in accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    /// Check an argument count against this arity.
    pub(crate) fn validate(&self, name: &str, got: usize) -> Result<(), Error> {
        let ok = match self {
            Arity::Exact(n) => got == *n,
            Arity::AtLeast(n) => got >= *n,
            Arity::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::runtime(format!(
                "{name}: expected {self} arguments, got {got}"
            )))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// Definition of a built-in procedure.
pub struct BuiltinOp {
    /// The symbol that names this procedure in operator position
    pub name: &'static str,
    /// Expected number of arguments, validated before dispatch
    pub arity: Arity,
    /// The implementation
    pub run: fn(&[Value]) -> Result<Value, Error>,
}

impl fmt::Debug for BuiltinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinOp({})", self.name)
    }
}

impl PartialEq for BuiltinOp {
    fn eq(&self, other: &Self) -> bool {
        // Names uniquely identify operations in the table
        self.name == other.name
    }
}

//
// Shared argument helpers
//

/// Evaluate every argument eagerly, left to right.
fn eval_all(args: &[Value]) -> Result<Vec<Value>, Error> {
    args.iter().map(eval).collect()
}

/// Evaluate every argument and require numbers throughout.
fn numbers_only(args: &[Value]) -> Result<Vec<NumberType>, Error> {
    args.iter()
        .map(|arg| match eval(arg)? {
            Value::Number(n) => Ok(n),
            other => Err(Error::runtime(format!("expected a number, got {other:?}"))),
        })
        .collect()
}

/// Evaluate a single argument and require a pair.
fn eval_pair_arg(arg: &Value) -> Result<Rc<Pair>, Error> {
    match eval(arg)? {
        Value::Pair(cell) => Ok(cell),
        other => Err(Error::runtime(format!("expected a pair, got {other:?}"))),
    }
}

/// Evaluate a single argument and require a number.
fn eval_number_arg(arg: &Value) -> Result<NumberType, Error> {
    match eval(arg)? {
        Value::Number(n) => Ok(n),
        other => Err(Error::runtime(format!("expected a number, got {other:?}"))),
    }
}

//
// Arithmetic
//

fn builtin_add(args: &[Value]) -> Result<Value, Error> {
    let mut sum: NumberType = 0;
    for n in numbers_only(args)? {
        sum = sum
            .checked_add(n)
            .ok_or_else(|| Error::runtime("integer overflow in +"))?;
    }
    Ok(Value::Number(sum))
}

fn builtin_mul(args: &[Value]) -> Result<Value, Error> {
    let mut product: NumberType = 1;
    for n in numbers_only(args)? {
        product = product
            .checked_mul(n)
            .ok_or_else(|| Error::runtime("integer overflow in *"))?;
    }
    Ok(Value::Number(product))
}

fn builtin_sub(args: &[Value]) -> Result<Value, Error> {
    let nums = numbers_only(args)?;
    // Arity::AtLeast(2) is validated before dispatch
    let mut result = nums[0];
    for n in &nums[1..] {
        result = result
            .checked_sub(*n)
            .ok_or_else(|| Error::runtime("integer overflow in -"))?;
    }
    Ok(Value::Number(result))
}

fn builtin_div(args: &[Value]) -> Result<Value, Error> {
    let nums = numbers_only(args)?;
    let mut result = nums[0];
    for n in &nums[1..] {
        result = result
            .checked_div(*n)
            .ok_or_else(|| Error::runtime("division by zero in /"))?;
    }
    Ok(Value::Number(result))
}

//
// Numeric predicates
//

// Pairwise comparison over the evaluated arguments; vacuously true with
// fewer than two, but every argument must still be a number.
macro_rules! numeric_comparison {
    ($name:ident, $op:tt) => {
        fn $name(args: &[Value]) -> Result<Value, Error> {
            let nums = numbers_only(args)?;
            let holds = nums.windows(2).all(|pair| pair[0] $op pair[1]);
            Ok(Value::Boolean(holds))
        }
    };
}

numeric_comparison!(builtin_num_eq, ==);
numeric_comparison!(builtin_lt, <);
numeric_comparison!(builtin_gt, >);
numeric_comparison!(builtin_le, <=);
numeric_comparison!(builtin_ge, >=);

fn builtin_is_number(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Boolean(matches!(eval(&args[0])?, Value::Number(_))))
}

fn builtin_max(args: &[Value]) -> Result<Value, Error> {
    let nums = numbers_only(args)?;
    let mut best = nums[0];
    for n in &nums[1..] {
        best = best.max(*n);
    }
    Ok(Value::Number(best))
}

fn builtin_min(args: &[Value]) -> Result<Value, Error> {
    let nums = numbers_only(args)?;
    let mut best = nums[0];
    for n in &nums[1..] {
        best = best.min(*n);
    }
    Ok(Value::Number(best))
}

fn builtin_abs(args: &[Value]) -> Result<Value, Error> {
    let n = eval_number_arg(&args[0])?;
    n.checked_abs()
        .map(Value::Number)
        .ok_or_else(|| Error::runtime("integer overflow in abs"))
}

//
// Boolean logic
//

fn builtin_not(args: &[Value]) -> Result<Value, Error> {
    let value = eval(&args[0])?;
    Ok(Value::Boolean(value == Value::Boolean(false)))
}

/// Short-circuit on `#f`; otherwise return the last evaluated value, or
/// `#t` with no arguments.
fn builtin_and(args: &[Value]) -> Result<Value, Error> {
    let mut last = Value::Boolean(true);
    for arg in args {
        last = eval(arg)?;
        if last == Value::Boolean(false) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(last)
}

/// Short-circuit on the first value that is not the boolean `#f`; `#f`
/// with no arguments or when every argument evaluated to `#f`.
fn builtin_or(args: &[Value]) -> Result<Value, Error> {
    for arg in args {
        let value = eval(arg)?;
        if value != Value::Boolean(false) {
            return Ok(value);
        }
    }
    Ok(Value::Boolean(false))
}

fn builtin_is_boolean(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Boolean(matches!(eval(&args[0])?, Value::Boolean(_))))
}

//
// Quotation
//

/// Capture the printed form of the argument without evaluating it.
fn builtin_quote(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Text(args[0].to_string()))
}

//
// Pairs and lists
//

/// True for the marker encoding of a dotted pair: a linearization of
/// exactly `[a, Dot, b]`. A non-pair argument is false without evaluation.
fn builtin_is_pair(args: &[Value]) -> Result<Value, Error> {
    if !matches!(args[0], Value::Pair(_)) {
        return Ok(Value::Boolean(false));
    }
    let Value::Pair(cell) = eval(&args[0])? else {
        return Ok(Value::Boolean(false));
    };
    let elements = cell.elements();
    Ok(Value::Boolean(
        elements.len() == 3 && elements[1] == Value::Dot,
    ))
}

fn builtin_is_null(args: &[Value]) -> Result<Value, Error> {
    if args[0] == Value::Null {
        return Ok(Value::Boolean(true));
    }
    Ok(Value::Boolean(match eval(&args[0])? {
        Value::Null => true,
        Value::Pair(cell) => cell.first == Value::Null,
        _ => false,
    }))
}

/// True for a proper list: a pair whose linearization is free of dot
/// markers and null slots.
fn builtin_is_list(args: &[Value]) -> Result<Value, Error> {
    let Value::Pair(cell) = eval(&args[0])? else {
        return Ok(Value::Boolean(false));
    };
    let proper = cell
        .elements()
        .iter()
        .all(|element| !matches!(element, Value::Dot | Value::Null));
    Ok(Value::Boolean(proper))
}

fn builtin_cons(args: &[Value]) -> Result<Value, Error> {
    let first = eval(&args[0])?;
    let second = eval(&args[1])?;
    Ok(Value::dotted(first, second))
}

fn builtin_car(args: &[Value]) -> Result<Value, Error> {
    let cell = eval_pair_arg(&args[0])?;
    if cell.first == Value::Null {
        return Err(Error::runtime("car of an empty list"));
    }
    Ok(cell.first.clone())
}

fn builtin_cdr(args: &[Value]) -> Result<Value, Error> {
    let cell = eval_pair_arg(&args[0])?;
    if cell.first == Value::Null {
        return Err(Error::runtime("cdr of an empty list"));
    }
    match &cell.second {
        Value::Null => Ok(Value::empty_list()),
        Value::Pair(rest) if rest.first == Value::Dot => {
            // A dotted pair: skip past the marker to the payload
            match &rest.second {
                Value::Pair(payload) => Ok(payload.first.clone()),
                other => Ok(other.clone()),
            }
        }
        second => Ok(second.clone()),
    }
}

fn builtin_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::list_of(eval_all(args)?))
}

fn builtin_list_ref(args: &[Value]) -> Result<Value, Error> {
    let cell = eval_pair_arg(&args[0])?;
    let index = eval_number_arg(&args[1])?;
    let elements = cell.elements();
    let position = usize::try_from(index)
        .ok()
        .filter(|i| *i < elements.len())
        .ok_or_else(|| {
            Error::runtime(format!(
                "list index {index} out of range for a list of {} elements",
                elements.len()
            ))
        })?;
    Ok(elements[position].clone())
}

fn builtin_list_tail(args: &[Value]) -> Result<Value, Error> {
    let cell = eval_pair_arg(&args[0])?;
    let count = eval_number_arg(&args[1])?;
    let mut cursor = Value::Pair(cell);
    for _ in 0..count {
        match cursor {
            Value::Pair(cell) => cursor = cell.second.clone(),
            _ => return Err(Error::runtime("list-tail ran past the end of the list")),
        }
    }
    if cursor == Value::Null {
        return Ok(Value::empty_list());
    }
    Ok(cursor)
}

/// Every procedure recognized in operator position. Symbols outside this
/// table are a NameError.
static BUILTIN_OPS: &[BuiltinOp] = &[
    // Arithmetic
    BuiltinOp {
        name: "+",
        arity: Arity::Any,
        run: builtin_add,
    },
    BuiltinOp {
        name: "-",
        arity: Arity::AtLeast(2),
        run: builtin_sub,
    },
    BuiltinOp {
        name: "*",
        arity: Arity::Any,
        run: builtin_mul,
    },
    BuiltinOp {
        name: "/",
        arity: Arity::AtLeast(2),
        run: builtin_div,
    },
    // Numeric predicates
    BuiltinOp {
        name: "=",
        arity: Arity::Any,
        run: builtin_num_eq,
    },
    BuiltinOp {
        name: "<",
        arity: Arity::Any,
        run: builtin_lt,
    },
    BuiltinOp {
        name: ">",
        arity: Arity::Any,
        run: builtin_gt,
    },
    BuiltinOp {
        name: "<=",
        arity: Arity::Any,
        run: builtin_le,
    },
    BuiltinOp {
        name: ">=",
        arity: Arity::Any,
        run: builtin_ge,
    },
    BuiltinOp {
        name: "number?",
        arity: Arity::Exact(1),
        run: builtin_is_number,
    },
    BuiltinOp {
        name: "max",
        arity: Arity::AtLeast(1),
        run: builtin_max,
    },
    BuiltinOp {
        name: "min",
        arity: Arity::AtLeast(1),
        run: builtin_min,
    },
    BuiltinOp {
        name: "abs",
        arity: Arity::Exact(1),
        run: builtin_abs,
    },
    // Boolean logic
    BuiltinOp {
        name: "not",
        arity: Arity::Exact(1),
        run: builtin_not,
    },
    BuiltinOp {
        name: "and",
        arity: Arity::Any,
        run: builtin_and,
    },
    BuiltinOp {
        name: "or",
        arity: Arity::Any,
        run: builtin_or,
    },
    BuiltinOp {
        name: "boolean?",
        arity: Arity::Exact(1),
        run: builtin_is_boolean,
    },
    // Quotation
    BuiltinOp {
        name: "quote",
        arity: Arity::Exact(1),
        run: builtin_quote,
    },
    // Pairs and lists
    BuiltinOp {
        name: "pair?",
        arity: Arity::Exact(1),
        run: builtin_is_pair,
    },
    BuiltinOp {
        name: "null?",
        arity: Arity::Exact(1),
        run: builtin_is_null,
    },
    BuiltinOp {
        name: "list?",
        arity: Arity::Exact(1),
        run: builtin_is_list,
    },
    BuiltinOp {
        name: "cons",
        arity: Arity::Exact(2),
        run: builtin_cons,
    },
    BuiltinOp {
        name: "car",
        arity: Arity::Exact(1),
        run: builtin_car,
    },
    BuiltinOp {
        name: "cdr",
        arity: Arity::Exact(1),
        run: builtin_cdr,
    },
    BuiltinOp {
        name: "list",
        arity: Arity::Any,
        run: builtin_list,
    },
    BuiltinOp {
        name: "list-ref",
        arity: Arity::Exact(2),
        run: builtin_list_ref,
    },
    BuiltinOp {
        name: "list-tail",
        arity: Arity::Exact(2),
        run: builtin_list_tail,
    },
];

/// Lazy index from name to table entry.
static BUILTIN_INDEX: LazyLock<HashMap<&'static str, &'static BuiltinOp>> =
    LazyLock::new(|| BUILTIN_OPS.iter().map(|op| (op.name, op)).collect());

/// Look up a built-in procedure by the symbol that names it.
pub(crate) fn find_op(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_INDEX.get(name).copied()
}
