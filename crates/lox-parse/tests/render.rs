use lox_ast::ast::Expr;
use lox_parse::{parse_str, MAX_NESTING_DEPTH};

/// Drop grouping nodes; rendering adds parentheses that re-parse as groupings.
fn strip_groupings(e: Expr<'_>) -> Expr<'_> {
    match e {
        Expr::Grouping(inner) => strip_groupings(*inner),
        Expr::Literal(lit) => Expr::Literal(lit),
        Expr::Unary { operator, operand } => Expr::unary(operator, strip_groupings(*operand)),
        Expr::Binary {
            left,
            operator,
            right,
        } => Expr::binary(strip_groupings(*left), operator, strip_groupings(*right)),
        Expr::Ternary {
            condition,
            then_branch,
            else_branch,
        } => Expr::ternary(
            strip_groupings(*condition),
            strip_groupings(*then_branch),
            strip_groupings(*else_branch),
        ),
    }
}

#[test]
fn rendering_is_fully_parenthesized() {
    assert_eq!(
        parse_str("1 + 2 * 3 - 4 / 5").unwrap().to_string(),
        "((1 + (2 * 3)) - (4 / 5))"
    );
    assert_eq!(
        parse_str("!(1 >= 2) ? \"yes\" : nil").unwrap().to_string(),
        "((!(1 >= 2)) ? \"yes\" : nil)"
    );
}

#[test]
fn groupings_do_not_double_parentheses() {
    assert_eq!(parse_str("(1)").unwrap().to_string(), "(1)");
    assert_eq!(parse_str("((1))").unwrap().to_string(), "(1)");
    assert_eq!(parse_str("((1 + 2))").unwrap().to_string(), "(1 + 2)");
    assert_eq!(parse_str("-(-1)").unwrap().to_string(), "(-(-1))");
}

#[test]
fn numbers_render_without_trailing_zeroes() {
    assert_eq!(parse_str("7.0").unwrap().to_string(), "7");
    assert_eq!(parse_str("0.5").unwrap().to_string(), "0.5");
}

#[test]
fn rendering_reparses_to_an_equivalent_tree() {
    let sources = [
        "1 + 2 * 3",
        "(1 + 2) * 3",
        "-(-3) - -4",
        "1 < 2 == true != false",
        "true ? \"a\" + \"b\" : nil",
        "false ? 1 : true ? 2 : 3",
        "!nil == !false",
        "12.75 / 0.25 >= 3",
    ];
    for src in sources {
        let original = parse_str(src).expect("source parses");
        let rendered = original.to_string();
        let reparsed = parse_str(&rendered)
            .unwrap_or_else(|e| panic!("rendering {rendered:?} does not re-parse: {e}"));
        assert_eq!(
            strip_groupings(original),
            strip_groupings(reparsed),
            "source {src:?}"
        );
    }
}

#[test]
fn rendering_at_the_depth_limit_reparses() {
    let deepest = MAX_NESTING_DEPTH - 1;
    let sources = [
        format!("1{}", " + 1".repeat(deepest)),
        format!("{}1", "-".repeat(deepest)),
        format!("{}(1)", "!".repeat(deepest - 1)),
        format!("{}1", "false ? 0 : ".repeat(deepest)),
        format!("{}1{}", "2 * (".repeat(deepest / 2), ")".repeat(deepest / 2)),
    ];
    for src in &sources {
        let original = parse_str(src).expect("source at the limit parses");
        let rendered = original.to_string();
        let reparsed = parse_str(&rendered)
            .unwrap_or_else(|e| panic!("rendering of {src:?} does not re-parse: {e}"));
        assert_eq!(rendered, reparsed.to_string());
        assert_eq!(strip_groupings(original), strip_groupings(reparsed));
    }
}
