use crate::error::LexError;
use lox_ast::ast::Lit;
use lox_ast::token::{keyword, Token, TokenKind};

/// Single-pass scanner over one source unit.
///
/// Token boundaries always fall on ASCII bytes, so every lexeme is a valid
/// `str` slice of the source.
pub struct Scanner<'src> {
    src: &'src str,
    bytes: &'src [u8],
    tokens: Vec<Token<'src>>,
    errors: Vec<LexError>,
    start: usize,
    pos: usize,
    line: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            pos: 0,
            line: 1,
        }
    }

    /// Scan the whole source. The token list always ends with `Eof`.
    pub fn scan_tokens(mut self) -> (Vec<Token<'src>>, Vec<LexError>) {
        while !self.is_at_end() {
            self.start = self.pos;
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.line));
        (self.tokens, self.errors)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    /// Consume the next byte only if it is `expected`.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'src str {
        &self.src[self.start..self.pos]
    }

    fn add(&mut self, kind: TokenKind) {
        self.add_literal(kind, None);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Option<Lit>) {
        let token = Token::new(kind, self.lexeme(), literal, self.line);
        self.tokens.push(token);
    }

    fn error(&mut self, message: &str) {
        self.errors.push(LexError {
            line: self.line,
            message: message.to_string(),
        });
    }

    fn scan_token(&mut self) {
        let Some(b) = self.bump() else {
            return;
        };

        match b {
            b'(' => self.add(TokenKind::LeftParen),
            b')' => self.add(TokenKind::RightParen),
            b'{' => self.add(TokenKind::LeftBrace),
            b'}' => self.add(TokenKind::RightBrace),
            b',' => self.add(TokenKind::Comma),
            b'.' => self.add(TokenKind::Dot),
            b'-' => self.add(TokenKind::Minus),
            b'+' => self.add(TokenKind::Plus),
            b';' => self.add(TokenKind::Semicolon),
            b'*' => self.add(TokenKind::Star),
            b'?' => self.add(TokenKind::Question),
            b':' => self.add(TokenKind::Colon),

            // one or two characters
            b'!' => {
                let kind = if self.eat(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add(kind);
            }
            b'=' => {
                let kind = if self.eat(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add(kind);
            }
            b'<' => {
                let kind = if self.eat(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add(kind);
            }
            b'>' => {
                let kind = if self.eat(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add(kind);
            }

            b'/' => {
                if self.eat(b'/') {
                    // line comment: the newline itself is left for the main loop
                    while matches!(self.peek(), Some(c) if c != b'\n') {
                        self.bump();
                    }
                } else {
                    self.add(TokenKind::Slash);
                }
            }

            b' ' | b'\t' | b'\r' => {}
            b'\n' => self.line += 1,

            b'"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),

            _ => {
                // skip the rest of a multi-byte character so it is reported once
                while !self.src.is_char_boundary(self.pos) {
                    self.pos += 1;
                }
                self.error("Unexpected character");
            }
        }
    }

    fn string(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'"' {
                break;
            }
            if c == b'\n' {
                self.line += 1;
            }
            self.bump();
        }

        let content_end = if self.is_at_end() {
            self.error("Unterminated string");
            self.pos
        } else {
            // closing quote
            self.bump();
            self.pos - 1
        };

        let value = self.src[self.start + 1..content_end].to_string();
        self.add_literal(TokenKind::String, Some(Lit::Str(value)));
    }

    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }

        // a fraction needs at least one digit after the dot
        if self.peek() == Some(b'.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        // digits with an optional fraction always parse
        let n = self.lexeme().parse::<f64>().unwrap_or_default();
        self.add_literal(TokenKind::Number, Some(Lit::Number(n)));
    }

    fn identifier(&mut self) {
        while matches!(self.peek(), Some(c) if is_alpha(c) || c.is_ascii_digit()) {
            self.bump();
        }
        let kind = keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add(kind);
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Scanner::new(src).scan_tokens();
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn eof_sits_on_the_last_line() {
        let (tokens, _) = Scanner::new("1\n2\n").scan_tokens();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.line, 3);
        assert_eq!(eof.lexeme, "");
    }

    #[test]
    fn every_number_lexeme_yields_a_literal() {
        let long = "9".repeat(400);
        for src in ["007.50", "0", long.as_str()] {
            let (tokens, errors) = Scanner::new(src).scan_tokens();
            assert!(errors.is_empty());
            assert_eq!(tokens[0].kind, TokenKind::Number);
            assert_eq!(tokens[0].lexeme, src);
            assert!(matches!(tokens[0].literal, Some(Lit::Number(_))));
        }
    }

    #[test]
    fn two_char_lookahead_falls_back_to_single() {
        assert_eq!(
            kinds("!!==="),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn multibyte_character_reported_once() {
        let (tokens, errors) = Scanner::new("1 é 2").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unexpected character");
        assert_eq!(tokens.len(), 3);
    }
}
