//! Generic dialect transpilation via `sqlparser`.
//!
//! The statement is parsed with the reading dialect's grammar and
//! re-rendered from the AST in canonical form, which both engines accept
//! for the constructs it can represent. Constructs the parser rejects are
//! the caller's problem; `Querier::execute` recovers by falling back to
//! the original text.

use sqlparser::parser::{Parser, ParserError};
use tracing::debug;

use super::Dialect;

/// Transpilation failure. Never escapes `Querier::execute`, which treats
/// any failure as "send the original text".
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),

    #[error("statement is empty")]
    Empty,
}

/// Parse `sql` with the `read` dialect and re-render it canonically.
///
/// Only the first statement of a multi-statement input is returned.
pub fn transpile(
    sql: &str,
    read: Dialect,
    write: Dialect,
) -> Result<String, TranspileError> {
    let statements = Parser::parse_sql(read.parser_dialect(), sql)?;
    if statements.len() > 1 {
        debug!(
            read = %read,
            write = %write,
            dropped = statements.len() - 1,
            "multi-statement input, keeping first statement only"
        );
    }
    let first = statements.into_iter().next().ok_or(TranspileError::Empty)?;
    Ok(first.to_string())
}
