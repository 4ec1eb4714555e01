//! Tree-walking evaluation of S-expressions.
//!
//! Atoms are self-evaluating, with one exception: the symbols `#t` and
//! `#f` become booleans. Any other symbol in value position evaluates to
//! itself; symbols only carry meaning in operator position, where they
//! resolve against the builtin table. Pairs are applications.

use crate::Error;
use crate::ast::{Pair, Value};
use crate::builtinops::find_op;

/// Evaluate a form to a value.
pub fn eval(form: &Value) -> Result<Value, Error> {
    match form {
        Value::Number(_)
        | Value::Boolean(_)
        | Value::Text(_)
        | Value::Null
        | Value::Dot
        | Value::Builtin(_) => Ok(form.clone()),
        Value::Symbol(name) => Ok(match name.as_str() {
            "#t" => Value::Boolean(true),
            "#f" => Value::Boolean(false),
            _ => form.clone(),
        }),
        Value::Pair(cell) => apply(cell),
    }
}

/// Apply the form `(operator . arguments)`.
///
/// The operator is evaluated first and must yield a symbol. `quote` is
/// handled before table dispatch: its datum is returned untouched. For
/// every other name the pair chain is linearized into the argument
/// sequence and handed, unevaluated, to the resolved builtin.
fn apply(cell: &Pair) -> Result<Value, Error> {
    let operator = eval(&cell.first)?;
    if let Value::Symbol(name) = &operator {
        if name == "quote" {
            return Ok(cell.second.clone());
        }
    }
    let procedure = resolve_operator(&operator)?;
    let arguments = cell.tail_values();
    match procedure {
        Value::Builtin(op) => {
            op.arity.validate(op.name, arguments.len())?;
            log::debug!("applying {} to {} argument(s)", op.name, arguments.len());
            (op.run)(&arguments)
        }
        other => Err(Error::runtime(format!("cannot apply {other:?}"))),
    }
}

/// Resolve an evaluated operator to a procedure value. Only symbols can
/// denote procedures; an unknown symbol is a name error, while a
/// non-symbol operator is a structural error.
fn resolve_operator(operator: &Value) -> Result<Value, Error> {
    match operator {
        Value::Symbol(name) => find_op(name)
            .map(Value::Builtin)
            .ok_or_else(|| Error::name(format!("unknown procedure {name}"))),
        other => Err(Error::runtime(format!(
            "operator position does not name a procedure: {other:?}"
        ))),
    }
}
