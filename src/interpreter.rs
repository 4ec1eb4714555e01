//! The facade that glues tokenizer, reader and evaluator together.

use crate::Error;
use crate::evaluator::eval;
use crate::reader::read;
use crate::tokenizer::Tokenizer;

/// Interpret a source string.
///
/// Reads one top-level form, and a second when tokens remain after the
/// first; evaluates each in order and returns their concatenated printed
/// forms. Tokens after the second form are silently ignored. Any failure
/// terminates the run with no partial output.
pub fn run(source: &str) -> Result<String, Error> {
    let mut tokens = Tokenizer::new(source)?;
    let first = read(&mut tokens)?;
    let second = if tokens.at_end() {
        None
    } else {
        Some(read(&mut tokens)?)
    };

    let mut printed = eval(&first)?.to_string();
    if let Some(second) = second {
        printed.push_str(&eval(&second)?.to_string());
    }
    log::debug!("run {source:?} produced {printed:?}");
    Ok(printed)
}
