//! Tree-walking evaluator for Lox expressions.
//!
//! Evaluation is a plain recursive match over `Expr`. The first runtime error
//! aborts the whole evaluation and is returned to the caller.

use lox_ast::ast::{Expr, Lit};
use lox_ast::token::{Token, TokenKind};
use lox_parse::location;

/// Runtime values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl Value {
    /// `nil` and `false` are falsy; every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

impl From<&Lit> for Value {
    fn from(lit: &Lit) -> Self {
        match lit {
            Lit::Number(n) => Value::Number(*n),
            Lit::Str(s) => Value::Str(s.clone()),
            Lit::Bool(b) => Value::Bool(*b),
            Lit::Nil => Value::Nil,
        }
    }
}

/// Operand type error, anchored at the operator token.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError<'src> {
    pub token: Token<'src>,
    pub message: String,
}

impl<'src> RuntimeError<'src> {
    fn new(token: &Token<'src>, message: &str) -> Self {
        Self {
            token: token.clone(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for RuntimeError<'_> {
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

impl std::error::Error for RuntimeError<'_> {}

const NUMBER_OPERANDS: &str = "Operands must be numbers.";
const PLUS_OPERANDS: &str = "Operands must be two numbers or two strings";

/// Evaluate an expression
pub fn evaluate<'src>(expr: &Expr<'src>) -> Result<Value, RuntimeError<'src>> {
    match expr {
        Expr::Literal(lit) => Ok(Value::from(lit)),
        Expr::Grouping(inner) => evaluate(inner),
        Expr::Unary { operator, operand } => eval_unary(operator, operand),
        Expr::Binary {
            left,
            operator,
            right,
        } => eval_binary(left, operator, right),
        Expr::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            // only the taken branch is evaluated
            if evaluate(condition)?.is_truthy() {
                evaluate(then_branch)
            } else {
                evaluate(else_branch)
            }
        }
    }
}

fn eval_unary<'src>(
    operator: &Token<'src>,
    operand: &Expr<'src>,
) -> Result<Value, RuntimeError<'src>> {
    let v = evaluate(operand)?;
    match (operator.kind, v) {
        (TokenKind::Bang, v) => Ok(Value::Bool(!v.is_truthy())),
        (TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
        (TokenKind::Minus, _) => Err(RuntimeError::new(operator, NUMBER_OPERANDS)),
        (kind, _) => Err(RuntimeError::new(
            operator,
            &format!("Unknown unary operator {:?}.", kind),
        )),
    }
}

/// Evaluate a binary operation. Both operands are evaluated, left first,
/// before any type check.
fn eval_binary<'src>(
    left: &Expr<'src>,
    operator: &Token<'src>,
    right: &Expr<'src>,
) -> Result<Value, RuntimeError<'src>> {
    use TokenKind::*;

    let l = evaluate(left)?;
    let r = evaluate(right)?;

    match operator.kind {
        Plus => match (l, r) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            _ => Err(RuntimeError::new(operator, PLUS_OPERANDS)),
        },

        Minus | Star | Slash => {
            let (a, b) = number_operands(operator, l, r)?;
            let result = match operator.kind {
                Minus => a - b,
                Star => a * b,
                _ => a / b,
            };
            Ok(Value::Number(result))
        }

        Greater | GreaterEqual | Less | LessEqual => {
            let (a, b) = number_operands(operator, l, r)?;
            let result = match operator.kind {
                Greater => a > b,
                GreaterEqual => a >= b,
                Less => a < b,
                _ => a <= b,
            };
            Ok(Value::Bool(result))
        }

        EqualEqual => Ok(Value::Bool(l == r)),
        BangEqual => Ok(Value::Bool(l != r)),

        kind => Err(RuntimeError::new(
            operator,
            &format!("Unknown binary operator {:?}.", kind),
        )),
    }
}

fn number_operands<'src>(
    operator: &Token<'src>,
    l: Value,
    r: Value,
) -> Result<(f64, f64), RuntimeError<'src>> {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::new(operator, NUMBER_OPERANDS)),
    }
}
