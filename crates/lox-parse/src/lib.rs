#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod parser;
mod scanner;

pub use error::{location, LexError, ParseError};
pub use parser::{Parser, MAX_NESTING_DEPTH, MAX_RECURSION_DEPTH};
pub use scanner::Scanner;

use anyhow::{anyhow, Result};
use lox_ast::ast::Expr;
use lox_ast::token::Token;

/// Scan a source unit into tokens (ending with `Eof`) and lexical errors.
pub fn scan(src: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    Scanner::new(src).scan_tokens()
}

/// Scan and parse `src` as one expression.
///
/// Lexical errors stop the pipeline before parsing. The error text is the
/// diagnostic lines joined with newlines.
pub fn parse_str(src: &str) -> Result<Expr<'_>> {
    let (tokens, lex_errors) = scan(src);
    if !lex_errors.is_empty() {
        return Err(anyhow!(join_lines(&lex_errors)));
    }
    Parser::new(&tokens)
        .parse()
        .map_err(|errors| anyhow!(join_lines(&errors)))
}

fn join_lines<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
