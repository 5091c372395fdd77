use crate::error::ParseError;
use lox_ast::ast::{Expr, Lit};
use lox_ast::token::{Token, TokenKind};

/// Maximum depth of an accepted expression tree. Every node counts one level,
/// except a grouping around a node that already renders inside parentheses,
/// so the rendering of any accepted tree parses back within the same limit.
pub const MAX_NESTING_DEPTH: usize = 50;

/// Maximum recursion of the parser itself through parentheses, unary operators
/// and conditional branches. Rendering a tree spends at most two of these per
/// level of depth.
pub const MAX_RECURSION_DEPTH: usize = 2 * MAX_NESTING_DEPTH;

const TOO_DEEP: &str = "Expression nesting too deep.";

type PResult<'src, T> = Result<T, ParseError<'src>>;

/// A parsed subtree and its depth, so limits are checked without re-walking it.
struct Node<'src> {
    expr: Expr<'src>,
    depth: usize,
}

impl<'src> Node<'src> {
    fn leaf(expr: Expr<'src>) -> Self {
        Self { expr, depth: 1 }
    }
}

/// Recursive-descent parser over a borrowed token slice.
pub struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    current: usize,
    recursion: usize,
    /// Returned by `peek` once the cursor runs past the slice.
    eof: Token<'src>,
}

impl<'t, 'src> Parser<'t, 'src> {
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        let eof = match tokens.last() {
            Some(t) if t.kind == TokenKind::Eof => t.clone(),
            Some(t) => Token::eof(t.line),
            None => Token::eof(1),
        };
        Self {
            tokens,
            current: 0,
            recursion: 0,
            eof,
        }
    }

    /// Parse a single expression spanning the rest of the input.
    ///
    /// Parsing stops at the first error; the returned list then holds that
    /// one error and no tree is produced.
    pub fn parse(&mut self) -> Result<Expr<'src>, Vec<ParseError<'src>>> {
        let node = self.expression().map_err(|e| vec![e])?;
        if !self.is_at_end() {
            return Err(vec![self.error_at_current("Expect end of expression.")]);
        }
        Ok(node.expr)
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.current
    }

    /// Skip tokens until the start of what looks like a new independent
    /// unit: just past a `;`, or just before a statement keyword.
    pub fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ======= cursor =======

    fn peek(&self) -> &Token<'src> {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token<'src> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token<'src> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn at(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consume the current token if its kind is one of `kinds`.
    fn eat(&mut self, kinds: &[TokenKind]) -> Option<Token<'src>> {
        if kinds.iter().any(|k| self.at(*k)) {
            Some(self.advance().clone())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<'src, Token<'src>> {
        if self.at(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn error_at_current(&self, message: &str) -> ParseError<'src> {
        ParseError {
            token: self.peek().clone(),
            message: message.to_string(),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<'src, T>) -> PResult<'src, T> {
        if self.recursion >= MAX_RECURSION_DEPTH {
            return Err(self.error_at_current(TOO_DEEP));
        }
        self.recursion += 1;
        let result = f(self);
        self.recursion -= 1;
        result
    }

    /// Wrap `expr` as a node one level above its deepest child.
    fn node(&self, expr: Expr<'src>, children: &[usize]) -> PResult<'src, Node<'src>> {
        let depth = 1 + children.iter().copied().max().unwrap_or(0);
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error_at_current(TOO_DEEP));
        }
        Ok(Node { expr, depth })
    }

    // ======= grammar =======
    //
    // Precedence (low -> high):
    //   ternary      ?:        right-assoc
    //   equality     == !=
    //   comparison   > >= < <=
    //   term         + -
    //   factor       * /
    //   unary        ! -       prefix

    fn expression(&mut self) -> PResult<'src, Node<'src>> {
        self.nested(Self::ternary)
    }

    fn ternary(&mut self) -> PResult<'src, Node<'src>> {
        let condition = self.equality()?;
        if self.eat(&[TokenKind::Question]).is_none() {
            return Ok(condition);
        }
        let then_branch = self.expression()?;
        self.expect(
            TokenKind::Colon,
            "Expect ':' after then branch of conditional expression.",
        )?;
        let else_branch = self.expression()?;
        let depths = [condition.depth, then_branch.depth, else_branch.depth];
        self.node(
            Expr::ternary(condition.expr, then_branch.expr, else_branch.expr),
            &depths,
        )
    }

    fn equality(&mut self) -> PResult<'src, Node<'src>> {
        self.left_assoc(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> PResult<'src, Node<'src>> {
        self.left_assoc(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> PResult<'src, Node<'src>> {
        self.left_assoc(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    fn factor(&mut self) -> PResult<'src, Node<'src>> {
        self.left_assoc(&[TokenKind::Slash, TokenKind::Star], Self::unary)
    }

    /// `operand ( op operand )*`, folded to the left. Each fold deepens the
    /// tree by one level even though the parser itself does not recurse.
    fn left_assoc(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> PResult<'src, Node<'src>>,
    ) -> PResult<'src, Node<'src>> {
        let mut node = operand(self)?;
        while let Some(operator) = self.eat(ops) {
            let right = operand(self)?;
            let depths = [node.depth, right.depth];
            node = self.node(Expr::binary(node.expr, operator, right.expr), &depths)?;
        }
        Ok(node)
    }

    fn unary(&mut self) -> PResult<'src, Node<'src>> {
        if let Some(operator) = self.eat(&[TokenKind::Bang, TokenKind::Minus]) {
            let operand = self.nested(Self::unary)?;
            let depth = operand.depth;
            return self.node(Expr::unary(operator, operand.expr), &[depth]);
        }
        self.primary()
    }

    fn primary(&mut self) -> PResult<'src, Node<'src>> {
        if self.eat(&[TokenKind::False]).is_some() {
            return Ok(Node::leaf(Expr::Literal(Lit::Bool(false))));
        }
        if self.eat(&[TokenKind::True]).is_some() {
            return Ok(Node::leaf(Expr::Literal(Lit::Bool(true))));
        }
        if self.eat(&[TokenKind::Nil]).is_some() {
            return Ok(Node::leaf(Expr::Literal(Lit::Nil)));
        }

        if let Some(token) = self.eat(&[TokenKind::Number, TokenKind::String]) {
            return match token.literal {
                Some(lit) => Ok(Node::leaf(Expr::Literal(lit))),
                None => Err(ParseError {
                    token,
                    message: "Expect expression.".to_string(),
                }),
            };
        }

        if self.eat(&[TokenKind::LeftParen]).is_some() {
            let inner = self.expression()?;
            self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
            // only a literal renders without parentheses of its own
            let counted = matches!(inner.expr, Expr::Literal(_));
            let depth = inner.depth;
            let grouping = Expr::Grouping(Box::new(inner.expr));
            return if counted {
                self.node(grouping, &[depth])
            } else {
                Ok(Node {
                    expr: grouping,
                    depth,
                })
            };
        }

        Err(self.error_at_current("Expect expression."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scanner;

    #[test]
    fn parser_tolerates_missing_eof_token() {
        let (mut tokens, _) = Scanner::new("1 +").scan_tokens();
        tokens.pop();
        let errs = Parser::new(&tokens).parse().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].token.kind, TokenKind::Eof);
        assert_eq!(errs[0].message, "Expect expression.");
    }

    #[test]
    fn parser_over_empty_slice_reports_expect_expression() {
        let errs = Parser::new(&[]).parse().unwrap_err();
        assert_eq!(errs[0].to_string(), "[1] Error at end: Expect expression.");
    }

    #[test]
    fn synchronize_stops_after_semicolon() {
        let (tokens, _) = Scanner::new("1 + ; 2").scan_tokens();
        let mut p = Parser::new(&tokens);
        let errs = p.parse().unwrap_err();
        assert_eq!(errs[0].token.kind, TokenKind::Semicolon);

        p.synchronize();
        assert_eq!(p.position(), 3);
        let expr = p.parse().expect("second unit parses");
        assert_eq!(expr, Expr::Literal(Lit::Number(2.0)));
    }

    #[test]
    fn synchronize_stops_before_statement_keyword() {
        let (tokens, _) = Scanner::new("1 2 3 var x").scan_tokens();
        let mut p = Parser::new(&tokens);
        p.synchronize();
        assert_eq!(p.position(), 3);
        assert_eq!(p.peek().kind, TokenKind::Var);
    }

    #[test]
    fn synchronize_runs_to_eof_without_a_boundary() {
        let (tokens, _) = Scanner::new("1 2 3").scan_tokens();
        let mut p = Parser::new(&tokens);
        p.synchronize();
        assert!(p.is_at_end());
        p.synchronize();
        assert!(p.is_at_end());
    }
}
