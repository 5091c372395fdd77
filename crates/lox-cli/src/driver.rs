//! Scan → parse → evaluate for one source unit.

use crate::eval::{evaluate, Value};
use lox_parse::{Parser, Scanner};

/// Why a source unit produced no value.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// Lexical or parse diagnostics, one rendered line each
    Syntax(Vec<String>),
    /// The single runtime error that stopped evaluation
    Runtime(String),
}

impl RunError {
    /// sysexits codes: 65 (data error) for bad input, 70 for runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Syntax(_) => 65,
            RunError::Runtime(_) => 70,
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Syntax(lines) => write!(f, "{}", lines.join("\n")),
            RunError::Runtime(line) => write!(f, "{}", line),
        }
    }
}

impl std::error::Error for RunError {}

/// Run one source unit through the whole pipeline. A stage never sees the
/// output of a stage that reported errors.
pub fn run_source(src: &str) -> Result<Value, RunError> {
    let (tokens, lex_errors) = Scanner::new(src).scan_tokens();
    if !lex_errors.is_empty() {
        return Err(RunError::Syntax(
            lex_errors.iter().map(|e| e.to_string()).collect(),
        ));
    }

    let expr = Parser::new(&tokens)
        .parse()
        .map_err(|errors| RunError::Syntax(errors.iter().map(|e| e.to_string()).collect()))?;

    evaluate(&expr).map_err(|e| RunError::Runtime(e.to_string()))
}
