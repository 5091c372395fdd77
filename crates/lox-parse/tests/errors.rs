use lox_ast::token::TokenKind;
use lox_parse::{parse_str, scan, Parser};

#[test]
fn missing_close_paren_is_reported_at_end() {
    let err = parse_str("(1 + 2").unwrap_err().to_string();
    assert_eq!(err, "[1] Error at end: Expect ')' after expression.");
}

#[test]
fn missing_operand_reports_expect_expression_at_token() {
    let err = parse_str("1 + )").unwrap_err().to_string();
    assert_eq!(err, "[1] Error at ')': Expect expression.");
}

#[test]
fn empty_input_expects_expression() {
    let err = parse_str("").unwrap_err().to_string();
    assert_eq!(err, "[1] Error at end: Expect expression.");
}

#[test]
fn identifiers_are_not_expressions() {
    let err = parse_str("foo").unwrap_err().to_string();
    assert_eq!(err, "[1] Error at 'foo': Expect expression.");
}

#[test]
fn ternary_requires_colon() {
    let err = parse_str("true ? 1 2").unwrap_err().to_string();
    assert_eq!(
        err,
        "[1] Error at '2': Expect ':' after then branch of conditional expression."
    );
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = parse_str("1 2").unwrap_err().to_string();
    assert_eq!(err, "[1] Error at '2': Expect end of expression.");
}

#[test]
fn parse_stops_at_first_error() {
    let (tokens, lex_errors) = scan("(1 +\n) * (");
    assert!(lex_errors.is_empty());
    let errors = Parser::new(&tokens).parse().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token.kind, TokenKind::RightParen);
    assert_eq!(errors[0].token.line, 2);
    assert_eq!(errors[0].message, "Expect expression.");
}

#[test]
fn lex_errors_stop_before_parsing() {
    let err = parse_str("1 @ $").unwrap_err().to_string();
    assert_eq!(
        err,
        "[1] Error: Unexpected character\n[1] Error: Unexpected character"
    );
}
