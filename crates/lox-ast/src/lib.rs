pub mod token {
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum TokenKind {
        // single-character punctuation
        LeftParen,
        RightParen,
        LeftBrace,
        RightBrace,
        Comma,
        Dot,
        Minus,
        Plus,
        Semicolon,
        Slash,
        Star,
        Question,
        Colon,
        // one or two character operators
        Bang,
        BangEqual,
        Equal,
        EqualEqual,
        Greater,
        GreaterEqual,
        Less,
        LessEqual,
        // literals
        Identifier,
        String,
        Number,
        // keywords
        And,
        Class,
        Else,
        False,
        Fun,
        For,
        If,
        Nil,
        Or,
        Print,
        Return,
        Super,
        This,
        True,
        Var,
        While,
        // end of input
        Eof,
    }

    /// Reserved words, matched exactly against scanned identifier text.
    pub const KEYWORDS: &[(&str, TokenKind)] = &[
        ("and", TokenKind::And),
        ("class", TokenKind::Class),
        ("else", TokenKind::Else),
        ("false", TokenKind::False),
        ("for", TokenKind::For),
        ("fun", TokenKind::Fun),
        ("if", TokenKind::If),
        ("nil", TokenKind::Nil),
        ("or", TokenKind::Or),
        ("print", TokenKind::Print),
        ("return", TokenKind::Return),
        ("super", TokenKind::Super),
        ("this", TokenKind::This),
        ("true", TokenKind::True),
        ("var", TokenKind::Var),
        ("while", TokenKind::While),
    ];

    pub fn keyword(text: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == text)
            .map(|(_, kind)| *kind)
    }

    /// A scanned token. `lexeme` borrows the source buffer it came from.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Token<'src> {
        pub kind: TokenKind,
        pub lexeme: &'src str,
        /// Parsed value for `Number` and `String` tokens.
        pub literal: Option<super::ast::Lit>,
        /// 1-based source line
        pub line: usize,
    }

    impl<'src> Token<'src> {
        pub fn new(
            kind: TokenKind,
            lexeme: &'src str,
            literal: Option<super::ast::Lit>,
            line: usize,
        ) -> Self {
            Self {
                kind,
                lexeme,
                literal,
                line,
            }
        }

        pub fn eof(line: usize) -> Self {
            Self::new(TokenKind::Eof, "", None, line)
        }
    }

    impl std::fmt::Display for Token<'_> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.kind)?;
            if !self.lexeme.is_empty() {
                write!(f, " {}", self.lexeme)?;
            }
            if let Some(lit) = &self.literal {
                write!(f, " {}", lit)?;
            }
            Ok(())
        }
    }
}

pub mod ast {
    use super::token::Token;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Lit {
        Number(f64),
        Str(String),
        Bool(bool),
        Nil,
    }

    /// Expression tree. Children are exclusively owned, so the tree has no
    /// sharing and no back-references.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Expr<'src> {
        Literal(Lit),
        Grouping(Box<Expr<'src>>),
        Unary {
            operator: Token<'src>,
            operand: Box<Expr<'src>>,
        },
        Binary {
            left: Box<Expr<'src>>,
            operator: Token<'src>,
            right: Box<Expr<'src>>,
        },
        Ternary {
            condition: Box<Expr<'src>>,
            then_branch: Box<Expr<'src>>,
            else_branch: Box<Expr<'src>>,
        },
    }

    impl<'src> Expr<'src> {
        pub fn unary(operator: Token<'src>, operand: Expr<'src>) -> Self {
            Expr::Unary {
                operator,
                operand: Box::new(operand),
            }
        }

        pub fn binary(left: Expr<'src>, operator: Token<'src>, right: Expr<'src>) -> Self {
            Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }
        }

        pub fn ternary(
            condition: Expr<'src>,
            then_branch: Expr<'src>,
            else_branch: Expr<'src>,
        ) -> Self {
            Expr::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }
        }
    }

    // Rendering is fully parenthesized and re-parses to an equivalent tree.
    // A grouping only adds parentheses around a literal; any other node
    // already prints its own, so re-parsing does not stack extra levels.

    impl std::fmt::Display for Lit {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Lit::Number(n) => write!(f, "{n}"),
                Lit::Str(s) => write!(f, "\"{s}\""),
                Lit::Bool(b) => write!(f, "{b}"),
                Lit::Nil => write!(f, "nil"),
            }
        }
    }

    impl std::fmt::Display for Expr<'_> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Expr::Literal(lit) => write!(f, "{lit}"),
                Expr::Grouping(inner) => match **inner {
                    Expr::Literal(_) => write!(f, "({inner})"),
                    _ => write!(f, "{inner}"),
                },
                Expr::Unary { operator, operand } => {
                    write!(f, "({}{})", operator.lexeme, operand)
                }
                Expr::Binary {
                    left,
                    operator,
                    right,
                } => write!(f, "({} {} {})", left, operator.lexeme, right),
                Expr::Ternary {
                    condition,
                    then_branch,
                    else_branch,
                } => write!(f, "({condition} ? {then_branch} : {else_branch})"),
            }
        }
    }
}
