//! Recursive-descent construction of S-expression trees from tokens.
//!
//! Two readers cooperate. The top-level reader produces operator-position
//! forms: the empty list collapses to `Null`, and a form whose head is the
//! symbol `quote` (or the `'` shorthand) wraps a datum read by the quoted
//! reader. The quoted reader preserves datum structure literally: empty
//! lists stay as explicit `(Null, Null)` nodes and dotted pairs keep the
//! marker encoding at any depth, so quoted data round-trips through
//! printing.

use crate::ast::{Value, sym};
use crate::tokenizer::{Token, Tokenizer};
use crate::{Error, MAX_PARSE_DEPTH};

/// Read one top-level form from the token stream.
pub fn read(tokens: &mut Tokenizer) -> Result<Value, Error> {
    let form = read_form(tokens, 0)?;
    log::debug!("read produced {form:?}");
    Ok(form)
}

fn unexpected_end() -> Error {
    Error::syntax("unexpected end of input")
}

/// Clone the lookahead token, failing at end of stream.
fn peek_or_error(tokens: &Tokenizer) -> Result<Token, Error> {
    tokens.peek().cloned().ok_or_else(unexpected_end)
}

/// Consume and return the lookahead token.
fn take(tokens: &mut Tokenizer) -> Result<Token, Error> {
    let token = peek_or_error(tokens)?;
    tokens.advance()?;
    Ok(token)
}

/// Consume the `)` that must terminate the current form.
fn expect_close(tokens: &mut Tokenizer) -> Result<(), Error> {
    match peek_or_error(tokens)? {
        Token::CloseParen => tokens.advance(),
        token => Err(Error::syntax(format!("expected ')', found {token:?}"))),
    }
}

fn check_depth(depth: usize) -> Result<(), Error> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(Error::syntax(format!(
            "form nested deeper than {MAX_PARSE_DEPTH} levels"
        )));
    }
    Ok(())
}

fn read_form(tokens: &mut Tokenizer, depth: usize) -> Result<Value, Error> {
    check_depth(depth)?;
    match take(tokens)? {
        Token::Number(n) => Ok(Value::Number(n)),
        Token::Symbol(name) => Ok(Value::Symbol(name)),
        Token::OpenParen => {
            if matches!(tokens.peek(), Some(Token::Symbol(name)) if name == "quote") {
                tokens.advance()?;
                let datum = read_quoted(tokens, depth + 1)?;
                expect_close(tokens)?;
                return Ok(Value::pair(sym("quote"), datum));
            }
            read_list(tokens, depth + 1)
        }
        Token::Quote => {
            let datum = read_quoted(tokens, depth + 1)?;
            Ok(Value::pair(sym("quote"), datum))
        }
        token @ (Token::CloseParen | Token::Dot) => {
            Err(Error::syntax(format!("unexpected token {token:?}")))
        }
    }
}

/// Read the elements of a parenthesized form after its `(`. An immediate
/// `)` yields `Null`; a `.` before the final datum builds the three-node
/// dotted encoding.
fn read_list(tokens: &mut Tokenizer, depth: usize) -> Result<Value, Error> {
    if matches!(peek_or_error(tokens)?, Token::CloseParen) {
        tokens.advance()?;
        return Ok(Value::Null);
    }
    let first = read_form(tokens, depth)?;
    if matches!(peek_or_error(tokens)?, Token::Dot) {
        tokens.advance()?;
        let tail = read_form(tokens, depth)?;
        expect_close(tokens)?;
        return Ok(Value::dotted(first, tail));
    }
    let rest = read_list(tokens, depth)?;
    Ok(Value::pair(first, rest))
}

/// Read one datum inside a quoted context, preserving structure literally.
/// The `'` shorthand is not accepted inside quoted data.
fn read_quoted(tokens: &mut Tokenizer, depth: usize) -> Result<Value, Error> {
    check_depth(depth)?;
    match take(tokens)? {
        Token::Number(n) => Ok(Value::Number(n)),
        Token::Symbol(name) => Ok(Value::Symbol(name)),
        Token::OpenParen => read_quoted_list(tokens, depth + 1),
        token => Err(Error::syntax(format!(
            "unexpected token {token:?} in quoted datum"
        ))),
    }
}

/// Read the elements of a quoted list after its `(`. The empty list is
/// kept as an explicit node; a dotted tail that is itself a pair chain is
/// spliced, and `(a . ())` collapses to the one-element proper list.
fn read_quoted_list(tokens: &mut Tokenizer, depth: usize) -> Result<Value, Error> {
    if matches!(peek_or_error(tokens)?, Token::CloseParen) {
        tokens.advance()?;
        return Ok(Value::empty_list());
    }
    let first = read_quoted(tokens, depth)?;
    if matches!(peek_or_error(tokens)?, Token::Dot) {
        tokens.advance()?;
        let tail = read_quoted(tokens, depth)?;
        expect_close(tokens)?;
        return Ok(match tail {
            Value::Pair(cell) if cell.first == Value::Null => Value::pair(first, Value::Null),
            tail @ Value::Pair(_) => Value::pair(first, tail),
            tail => Value::dotted(first, tail),
        });
    }
    let rest = read_quoted_list(tokens, depth)?;
    if rest.is_empty_list() {
        return Ok(Value::pair(first, Value::Null));
    }
    Ok(Value::pair(first, rest))
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;

    fn read_source(source: &str) -> Result<Value, Error> {
        let mut tokens = Tokenizer::new(source)?;
        read(&mut tokens)
    }

    fn num(n: i64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_reader_atoms_and_lists() {
        let test_cases: Vec<(&str, Value)> = vec![
            ("42", num(42)),
            ("-5", num(-5)),
            ("foo", sym("foo")),
            ("#t", sym("#t")),
            ("()", Value::Null),
            (
                "(+ 1 2)",
                Value::pair(sym("+"), Value::pair(num(1), Value::pair(num(2), Value::Null))),
            ),
            (
                "(* (+ 1) 2)",
                Value::pair(
                    sym("*"),
                    Value::pair(
                        Value::pair(sym("+"), Value::pair(num(1), Value::Null)),
                        Value::pair(num(2), Value::Null),
                    ),
                ),
            ),
            // Dotted tail at top level uses the marker encoding
            ("(1 . 2)", Value::dotted(num(1), num(2))),
            (
                "(1 2 . 3)",
                Value::pair(num(1), Value::dotted(num(2), num(3))),
            ),
            // A nested empty list at this level collapses to Null
            ("(())", Value::pair(Value::Null, Value::Null)),
        ];

        for (i, (source, expected)) in test_cases.iter().enumerate() {
            let actual = read_source(source)
                .unwrap_or_else(|e| panic!("read test #{}: {source:?} failed: {e}", i + 1));
            assert_eq!(actual, *expected, "read test #{}: {source:?}", i + 1);
        }
    }

    #[test]
    fn test_reader_quoted_data() {
        let test_cases: Vec<(&str, Value)> = vec![
            ("'x", Value::pair(sym("quote"), sym("x"))),
            ("'42", Value::pair(sym("quote"), num(42))),
            // Empty lists survive as explicit nodes inside quoted data
            ("'()", Value::pair(sym("quote"), Value::empty_list())),
            (
                "'(1 2)",
                Value::pair(
                    sym("quote"),
                    Value::pair(num(1), Value::pair(num(2), Value::Null)),
                ),
            ),
            (
                "'(1 ())",
                Value::pair(
                    sym("quote"),
                    Value::pair(num(1), Value::pair(Value::empty_list(), Value::Null)),
                ),
            ),
            ("'(1 . 2)", Value::pair(sym("quote"), Value::dotted(num(1), num(2)))),
            // A pair-chain tail splices into the enclosing list
            (
                "'(1 . (2 3))",
                Value::pair(
                    sym("quote"),
                    Value::pair(num(1), Value::pair(num(2), Value::pair(num(3), Value::Null))),
                ),
            ),
            // `(a . ())` collapses to the one-element proper list
            (
                "'(1 . ())",
                Value::pair(sym("quote"), Value::pair(num(1), Value::Null)),
            ),
            (
                "'(1 (2 . 3))",
                Value::pair(
                    sym("quote"),
                    Value::pair(
                        num(1),
                        Value::pair(Value::dotted(num(2), num(3)), Value::Null),
                    ),
                ),
            ),
        ];

        for (i, (source, expected)) in test_cases.iter().enumerate() {
            let actual = read_source(source)
                .unwrap_or_else(|e| panic!("quoted read test #{}: {source:?} failed: {e}", i + 1));
            assert_eq!(actual, *expected, "quoted read test #{}: {source:?}", i + 1);
        }
    }

    #[test]
    fn test_quote_shorthand_matches_longhand() {
        for (shorthand, longhand) in [
            ("'x", "(quote x)"),
            ("'()", "(quote ())"),
            ("'(1 2 3)", "(quote (1 2 3))"),
            ("'(1 . 2)", "(quote (1 . 2))"),
        ] {
            assert_eq!(
                read_source(shorthand).unwrap(),
                read_source(longhand).unwrap(),
                "{shorthand} and {longhand} must read identically"
            );
        }
    }

    #[test]
    fn test_reader_errors() {
        let error_cases = [
            "",
            "   ",
            ")",
            "(",
            "(1",
            "(1 2",
            "((1 2)",
            "(1 .",
            "(1 . 2",
            "(1 . 2 3)",
            "(. 2)",
            "'",
            "(quote)",
            "(quote 1 2)",
            // The `'` shorthand is rejected inside quoted data
            "''x",
            "'(a 'b)",
        ];

        for source in error_cases {
            let result = read_source(source);
            assert!(
                matches!(result, Err(Error::SyntaxError(_))),
                "expected SyntaxError for {source:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_reader_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_PARSE_DEPTH), ")".repeat(MAX_PARSE_DEPTH));
        assert!(
            matches!(read_source(&deep), Err(Error::SyntaxError(_))),
            "nesting at the limit must be rejected"
        );

        let shallow = format!(
            "{}1{}",
            "(".repeat(MAX_PARSE_DEPTH / 2),
            ")".repeat(MAX_PARSE_DEPTH / 2)
        );
        assert!(
            read_source(&shallow).is_ok(),
            "nesting under the limit must parse"
        );
    }

    #[test]
    fn test_trailing_tokens_are_left_in_stream() {
        let mut tokens = Tokenizer::new("1 2").unwrap();
        assert_eq!(read(&mut tokens).unwrap(), num(1));
        assert!(!tokens.at_end());
        assert_eq!(read(&mut tokens).unwrap(), num(2));
        assert!(tokens.at_end());
    }
}
