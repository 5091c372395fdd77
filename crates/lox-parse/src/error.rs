use lox_ast::token::{Token, TokenKind};

/// Location suffix for a token-anchored diagnostic: ` at end` for the EOF
/// token, ` at '<lexeme>'` otherwise.
pub fn location(token: &Token<'_>) -> String {
    if token.kind == TokenKind::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Lexical error. Recorded by the scanner, which keeps going.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] Error: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

/// Parse error. Fatal to the parse attempt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError<'src> {
    pub token: Token<'src>,
    pub message: String,
}

impl std::fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Error{}: {}",
            self.token.line,
            location(&self.token),
            self.message
        )
    }
}

impl std::error::Error for ParseError<'_> {}
