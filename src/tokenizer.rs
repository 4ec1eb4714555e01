//! Streaming scanner over a source string.
//!
//! The tokenizer keeps exactly one token of lookahead: construction reads
//! the first token, [`Tokenizer::peek`] inspects it, and
//! [`Tokenizer::advance`] replaces it with the next one. Individual
//! lexemes are recognized with `nom` combinators over the unconsumed tail
//! of the input; whitespace between tokens is discarded and there are no
//! comments.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, one_of, satisfy},
    combinator::{opt, recognize, value},
    sequence::pair,
};

use crate::Error;
use crate::ast::NumberType;

/// Characters besides ASCII letters that may start a symbol
pub(crate) const SYMBOL_START_CHARS: &str = "<>=*#/";
/// Characters besides ASCII alphanumerics that may continue a symbol
pub(crate) const SYMBOL_CONTINUE_CHARS: &str = "<>=*#/?!-";

/// A single lexeme of the source language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    OpenParen,
    CloseParen,
    /// A standalone `.`, denoting a dotted pair
    Dot,
    /// The `'` quotation shorthand
    Quote,
    Number(NumberType),
    Symbol(String),
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || SYMBOL_START_CHARS.contains(c)
}

fn is_symbol_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || SYMBOL_CONTINUE_CHARS.contains(c)
}

/// Lex a decimal number with an optional sign. Out-of-range literals are
/// rejected rather than silently wrapped.
fn lex_number(input: &str) -> IResult<&str, Token> {
    let (rest, digits) = recognize(pair(
        opt(one_of("+-")),
        take_while1(|c: char| c.is_ascii_digit()),
    ))
    .parse(input)?;

    match digits.parse::<NumberType>() {
        Ok(n) => Ok((rest, Token::Number(n))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

/// Lex a bare `+` or `-`, which is a symbol when no digit follows.
fn lex_sign_symbol(input: &str) -> IResult<&str, Token> {
    let (rest, sign) = one_of("+-").parse(input)?;
    Ok((rest, Token::Symbol(sign.to_string())))
}

fn lex_symbol(input: &str) -> IResult<&str, Token> {
    let (rest, name) = recognize(pair(
        satisfy(is_symbol_start),
        take_while(is_symbol_continue),
    ))
    .parse(input)?;
    Ok((rest, Token::Symbol(name.to_owned())))
}

/// Recognize the next token at the start of `input`. `lex_number` runs
/// before `lex_sign_symbol` so a signed digit run is one number token.
fn lex_token(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::OpenParen, char('(')),
        value(Token::CloseParen, char(')')),
        value(Token::Quote, char('\'')),
        lex_number,
        lex_sign_symbol,
        value(Token::Dot, char('.')),
        lex_symbol,
    ))
    .parse(input)
}

/// A token stream with exactly one token of lookahead.
pub struct Tokenizer<'a> {
    rest: &'a str,
    lookahead: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Wrap a source string and read the first token, so [`Self::peek`] is
    /// meaningful before the first [`Self::advance`] by the caller.
    pub fn new(source: &'a str) -> Result<Self, Error> {
        let mut tokenizer = Tokenizer {
            rest: source,
            lookahead: None,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    /// The current lookahead token, or `None` at end of input.
    pub fn peek(&self) -> Option<&Token> {
        self.lookahead.as_ref()
    }

    /// True when no further token is available.
    pub fn at_end(&self) -> bool {
        self.lookahead.is_none()
    }

    /// Discard leading whitespace, then read the next token into the
    /// lookahead slot, or mark end of input.
    pub fn advance(&mut self) -> Result<(), Error> {
        let rest = self
            .rest
            .trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() {
            self.rest = rest;
            self.lookahead = None;
            return Ok(());
        }
        match lex_token(rest) {
            Ok((rest, token)) => {
                self.rest = rest;
                self.lookahead = Some(token);
                Ok(())
            }
            Err(_) => {
                let found = rest.chars().next().unwrap_or_default();
                Err(Error::syntax(format!("unrecognized character {found:?}")))
            }
        }
    }
}
