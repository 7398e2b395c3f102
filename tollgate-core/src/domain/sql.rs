// tollgate-core/src/domain/sql.rs

// Small SQL helpers shared by the rule catalog and the quality checks.

use regex::Regex;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};
use std::sync::LazyLock;

use crate::domain::error::ConfigurationError;

#[allow(clippy::expect_used)]
static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Single-quotes a string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn validate_identifier(ident: &str) -> Result<(), ConfigurationError> {
    if RE_IDENTIFIER.is_match(ident) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidIdentifier(ident.to_string()))
    }
}

/// Checks that `expr` is one complete SQL expression (no trailing tokens,
/// no statement separators, no comments). Returns the parser message on failure.
pub fn check_expression(expr: &str) -> Result<(), String> {
    let dialect = GenericDialect {};

    // A `--` comment would swallow the closing parenthesis of `WHERE NOT (...)`.
    let tokens = Tokenizer::new(&dialect, expr)
        .tokenize()
        .map_err(|e| e.to_string())?;
    if tokens.iter().any(|t| {
        matches!(
            t,
            Token::Whitespace(Whitespace::SingleLineComment { .. } | Whitespace::MultiLineComment(_))
        )
    }) {
        return Err("comments are not allowed in expressions".to_string());
    }

    let mut parser = Parser::new(&dialect)
        .try_with_sql(expr)
        .map_err(|e| e.to_string())?;

    parser.parse_expr().map_err(|e| e.to_string())?;

    let next = parser.peek_token();
    if next.token != Token::EOF {
        return Err(format!("unexpected trailing input near '{}'", next.token));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("order_id"), "\"order_id\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_identifiers() {
        assert!(validate_identifier("customer_id").is_ok());
        assert!(validate_identifier("_tmp1").is_ok());
        assert!(matches!(
            validate_identifier("id; DROP TABLE orders"),
            Err(ConfigurationError::InvalidIdentifier(_))
        ));
        assert!(validate_identifier("1st").is_err());
    }

    #[test]
    fn test_check_expression() {
        assert!(check_expression("amount >= 0 AND status <> 'returned'").is_ok());
        assert!(check_expression("customer_id IN (SELECT customer_id FROM \"main\".\"customers\")").is_ok());
        assert!(check_expression("amount > 0; DROP TABLE orders").is_err());
        assert!(check_expression("amount >").is_err());
    }

    #[test]
    fn test_check_expression_rejects_comments() {
        assert!(check_expression("amount > 0 -- note").is_err());
        assert!(check_expression("amount > 0 /* x */").is_err());
        assert!(check_expression("status = '-- not a comment'").is_ok());
    }
}
