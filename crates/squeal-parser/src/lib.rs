//! SQL front-end for Squeal: a streaming lexer and a predictive,
//! backtracking recursive-descent parser producing the `squeal-ast` tree.
//!
//! The usual entry points are [`parse`] for a single statement and
//! [`parse_all`] for a semicolon-separated script:
//!
//! ```
//! let stmt = squeal_parser::parse("SELECT id FROM users WHERE age >= 18")?;
//! println!("{stmt}");
//! # Ok::<(), squeal_parser::ParseError>(())
//! ```

pub mod ddl;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::{
    parse_metrics_snapshot, reset_parse_metrics, ParseError, ParseErrorKind, ParseMetricsSnapshot,
    Parser, MAX_PARSE_DEPTH,
};
pub use token::{is_keyword, Lexeme, LexemeKind};

use squeal_ast::Statement;

/// Parse a single SQL statement, allowing a trailing semicolon.
pub fn parse(sql: &str) -> Result<Statement, ParseError> {
    Parser::from_sql(sql)?.parse()
}

/// Parse a semicolon-separated script. The first diagnostic aborts the
/// parse; no partial result is returned.
pub fn parse_all(sql: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::from_sql(sql)?.parse_all()
}
