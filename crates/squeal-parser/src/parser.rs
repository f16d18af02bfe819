// SQL parser.
//
// Hand-written recursive descent over the lexeme stream. Expression parsing
// lives in expr.rs, DDL statement parsing in ddl.rs. The parser is
// predictive with bounded look-ahead; speculative parses run under
// save_state/restore_state and the try_parse combinator.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use squeal_ast::{
    Assignment, BaseTableRef, ColumnRef, DeleteStatement, Expr, GrantObjectType, GrantOperation,
    GrantRevokeStatement, GroupByClause, InsertSource, InsertStatement, Join, JoinCondition,
    JoinKind, MergeAction, MergeMatch, MergeStatement, MergeWhen, NullsOrder, OrderByItem,
    Privilege, PrivilegeKind, SelectStatement, Span, Statement, TableRef, TruncateStatement,
    UpdateStatement, WithClause,
};

use crate::lexer::Lexer;
use crate::token::{Lexeme, LexemeKind};

// ---------------------------------------------------------------------------
// Parse metrics
// ---------------------------------------------------------------------------

/// Monotonic counter of successfully parsed statements.
static PARSE_STATEMENTS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Monotonic counter of statements rejected with a diagnostic.
static PARSE_REJECTED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Point-in-time parse metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseMetricsSnapshot {
    /// Total statements successfully parsed.
    pub parse_statements_total: u64,
    /// Total statements rejected with a diagnostic.
    pub parse_rejected_total: u64,
}

/// Take a point-in-time snapshot of parse metrics.
#[must_use]
pub fn parse_metrics_snapshot() -> ParseMetricsSnapshot {
    ParseMetricsSnapshot {
        parse_statements_total: PARSE_STATEMENTS_TOTAL.load(Ordering::Relaxed),
        parse_rejected_total: PARSE_REJECTED_TOTAL.load(Ordering::Relaxed),
    }
}

/// Reset parse metrics (used by tests and diagnostics).
pub fn reset_parse_metrics() {
    PARSE_STATEMENTS_TOTAL.store(0, Ordering::Relaxed);
    PARSE_REJECTED_TOTAL.store(0, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Classification of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed input at the lexical level (unterminated string literal).
    Lexical,
    /// The current lexeme did not satisfy an expectation.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// Description of the lexeme actually found.
        found: String,
    },
    /// A syntactic rule was violated (duplicate clause, HAVING without
    /// GROUP BY, VARCHAR without a length, ...).
    Grammar,
    /// A construct this front-end deliberately rejects.
    Unsupported,
}

/// A parse diagnostic anchored to a source position.
///
/// The first error terminates the parse; no partial AST is returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{line}:{col}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Byte-offset span of the offending lexeme.
    pub span: Span,
    /// 1-based line of the offending lexeme.
    pub line: u32,
    /// 1-based column of the offending lexeme.
    pub col: u32,
}

/// Short human description of a lexeme, for diagnostics.
fn describe(lexeme: &Lexeme) -> String {
    match lexeme.kind {
        LexemeKind::EndOfInput => "end of input".to_owned(),
        LexemeKind::Keyword => format!("keyword {}", lexeme.text.to_ascii_uppercase()),
        LexemeKind::Identifier => format!("identifier '{}'", lexeme.text),
        LexemeKind::Number => format!("number {}", lexeme.text),
        LexemeKind::StringLiteral => "string literal".to_owned(),
        _ => format!("'{}'", lexeme.text),
    }
}

impl ParseError {
    pub(crate) fn lexical(message: impl Into<String>, span: Span, line: u32, col: u32) -> Self {
        Self {
            kind: ParseErrorKind::Lexical,
            message: message.into(),
            span,
            line,
            col,
        }
    }

    pub(crate) fn unexpected(expected: impl Into<String>, at: &Lexeme) -> Self {
        let expected = expected.into();
        let found = describe(at);
        Self {
            message: format!("expected {expected}, found {found}"),
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span: at.span,
            line: at.line,
            col: at.col,
        }
    }

    pub(crate) fn grammar(message: impl Into<String>, at: &Lexeme) -> Self {
        Self {
            kind: ParseErrorKind::Grammar,
            message: message.into(),
            span: at.span,
            line: at.line,
            col: at.col,
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>, at: &Lexeme) -> Self {
        Self {
            kind: ParseErrorKind::Unsupported,
            message: message.into(),
            span: at.span,
            line: at.line,
            col: at.col,
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Maximum expression/statement nesting before the parser bails out.
pub const MAX_PARSE_DEPTH: u32 = 200;

/// Recursive-descent SQL parser over a pre-lexed buffer.
///
/// The lexeme buffer always ends with the end-of-input sentinel, so
/// `current()` is total and look-ahead saturates at the end.
pub struct Parser {
    pub(crate) lexemes: Vec<Lexeme>,
    pub(crate) pos: usize,
    /// Saved positions for speculative parsing. The first entry is the
    /// baseline and is never popped.
    state_stack: Vec<usize>,
    pub(crate) depth: u32,
}

impl Parser {
    /// Build a parser over an already tokenized buffer.
    #[must_use]
    pub fn new(lexemes: Vec<Lexeme>) -> Self {
        debug_assert!(
            lexemes.last().is_some_and(|l| l.kind == LexemeKind::EndOfInput),
            "lexeme buffer must end with the end-of-input sentinel"
        );
        Self {
            lexemes,
            pos: 0,
            state_stack: vec![0],
            depth: 0,
        }
    }

    /// Tokenize `sql` and build a parser. Fails on lexical errors.
    pub fn from_sql(sql: &str) -> Result<Self, ParseError> {
        Ok(Self::new(Lexer::tokenize(sql)?))
    }

    /// Parse exactly one statement, allowing a trailing semicolon.
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        let stmt = match self.parse_statement() {
            Ok(stmt) => stmt,
            Err(err) => {
                PARSE_REJECTED_TOTAL.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };
        while self.eat_op(";") {}
        if !self.at_eof() {
            PARSE_REJECTED_TOTAL.fetch_add(1, Ordering::Relaxed);
            return Err(ParseError::unexpected("end of input", self.current()));
        }
        PARSE_STATEMENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
        Ok(stmt)
    }

    /// Parse a semicolon-separated script. Stops at the first diagnostic.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>, ParseError> {
        let span = tracing::debug_span!(
            target: "squeal.parse",
            "parse",
            statements = tracing::field::Empty,
        );
        let _guard = span.enter();

        let mut statements = Vec::new();
        loop {
            while self.eat_op(";") {}
            if self.at_eof() {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => {
                    PARSE_STATEMENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
                    statements.push(stmt);
                    if !self.at_eof() && !self.eat_op(";") {
                        let err = ParseError::unexpected("';' or end of input", self.current());
                        PARSE_REJECTED_TOTAL.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(target: "squeal.parse", error = %err, "parse failed");
                        return Err(err);
                    }
                }
                Err(err) => {
                    PARSE_REJECTED_TOTAL.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(target: "squeal.parse", error = %err, "parse failed");
                    return Err(err);
                }
            }
        }
        span.record("statements", statements.len() as u64);
        Ok(statements)
    }

    // -----------------------------------------------------------------------
    // Lexeme navigation
    // -----------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Lexeme {
        &self.lexemes[self.pos]
    }

    /// Look `n` lexemes ahead without consuming; saturates at end of input.
    pub(crate) fn peek(&self, n: usize) -> &Lexeme {
        let last = self.lexemes.len() - 1;
        &self.lexemes[(self.pos + n).min(last)]
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current().kind == LexemeKind::EndOfInput
    }

    /// Consume the current lexeme. At end of input this is a no-op, so the
    /// sentinel stays current forever.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.lexemes.len() - 1 {
            self.pos += 1;
        }
    }

    /// Rewind by one lexeme. Only legal when something has been consumed.
    pub(crate) fn backup(&mut self) {
        assert!(self.pos > 0, "backup requires a previous lexeme");
        self.pos -= 1;
    }

    /// Span of the most recently consumed lexeme.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.lexemes[self.pos - 1].span
        } else {
            Span::ZERO
        }
    }

    // -----------------------------------------------------------------------
    // Match / expect
    // -----------------------------------------------------------------------

    pub(crate) fn at_kw(&self, kw: &str) -> bool {
        self.current().is_keyword(kw)
    }

    pub(crate) fn eat_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_kw(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            Err(ParseError::unexpected(kw, self.current()))
        }
    }

    pub(crate) fn at_op(&self, op: &str) -> bool {
        self.current().is_operator(op)
    }

    pub(crate) fn eat_op(&mut self, op: &str) -> bool {
        if self.at_op(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_op(&mut self, op: &str) -> Result<(), ParseError> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(ParseError::unexpected(format!("'{op}'"), self.current()))
        }
    }

    /// Consume an identifier lexeme and return its text.
    pub(crate) fn parse_identifier(&mut self) -> Result<String, ParseError> {
        if self.current().kind == LexemeKind::Identifier {
            let text = self.current().text.clone();
            self.advance();
            Ok(text)
        } else {
            Err(ParseError::unexpected("identifier", self.current()))
        }
    }

    /// Consume a number lexeme and parse it as an unsigned integer.
    pub(crate) fn parse_unsigned(&mut self) -> Result<u64, ParseError> {
        if self.current().kind == LexemeKind::Number {
            let lexeme = self.current().clone();
            let value = lexeme
                .text
                .parse::<u64>()
                .map_err(|_| ParseError::grammar("expected an integer", &lexeme))?;
            self.advance();
            Ok(value)
        } else {
            Err(ParseError::unexpected("number", self.current()))
        }
    }

    /// Consume a string literal lexeme and return its decoded text.
    pub(crate) fn parse_string(&mut self) -> Result<String, ParseError> {
        if self.current().kind == LexemeKind::StringLiteral {
            let text = self.current().text.clone();
            self.advance();
            Ok(text)
        } else {
            Err(ParseError::unexpected("string literal", self.current()))
        }
    }

    // -----------------------------------------------------------------------
    // Speculation
    // -----------------------------------------------------------------------

    /// Save the current parser state. Returns an id for `restore_state`.
    pub(crate) fn save_state(&mut self) -> usize {
        self.state_stack.push(self.pos);
        self.state_stack.len() - 1
    }

    /// Restore a previously saved state, popping it and all of its
    /// descendants.
    pub(crate) fn restore_state(&mut self, id: usize) {
        assert!(
            id >= 1 && id < self.state_stack.len(),
            "invalid parser state id"
        );
        self.pos = self.state_stack[id];
        self.state_stack.truncate(id);
    }

    /// Run `f` speculatively: on success commit and return the value, on
    /// failure rewind to the state before the call and return `None`.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        let id = self.save_state();
        match f(self) {
            Ok(value) => {
                self.state_stack.truncate(id);
                Some(value)
            }
            Err(_) => {
                self.restore_state(id);
                None
            }
        }
    }

    pub(crate) fn enter_recursion(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::grammar(
                format!("statement is nested too deeply (maximum depth {MAX_PARSE_DEPTH})"),
                self.current(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Statement dispatch
    // -----------------------------------------------------------------------

    /// Parse one statement, dispatching on the leading keyword.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if self.eat_kw("WITH") {
            let with = self.parse_with_clause()?;
            self.expect_kw("SELECT")?;
            return Ok(Statement::Select(self.parse_select(Some(with))?));
        }
        if self.eat_kw("SELECT") {
            Ok(Statement::Select(self.parse_select(None)?))
        } else if self.eat_kw("INSERT") {
            Ok(Statement::Insert(self.parse_insert()?))
        } else if self.eat_kw("UPDATE") {
            Ok(Statement::Update(self.parse_update()?))
        } else if self.eat_kw("DELETE") {
            Ok(Statement::Delete(self.parse_delete()?))
        } else if self.eat_kw("MERGE") {
            Ok(Statement::Merge(self.parse_merge()?))
        } else if self.eat_kw("CREATE") {
            Ok(Statement::Create(self.parse_create()?))
        } else if self.eat_kw("ALTER") {
            Ok(Statement::AlterTable(self.parse_alter()?))
        } else if self.eat_kw("DROP") {
            Ok(Statement::Drop(self.parse_drop()?))
        } else if self.eat_kw("TRUNCATE") {
            Ok(Statement::Truncate(self.parse_truncate()?))
        } else if self.eat_kw("GRANT") {
            Ok(Statement::GrantRevoke(
                self.parse_grant_revoke(GrantOperation::Grant)?,
            ))
        } else if self.eat_kw("REVOKE") {
            Ok(Statement::GrantRevoke(
                self.parse_grant_revoke(GrantOperation::Revoke)?,
            ))
        } else {
            Err(ParseError::unexpected(
                "a statement keyword",
                self.current(),
            ))
        }
    }

    // -----------------------------------------------------------------------
    // WITH
    // -----------------------------------------------------------------------

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        let recursive = self.eat_kw("RECURSIVE");
        let mut ctes = Vec::new();
        loop {
            let name = self.parse_identifier()?;
            let columns = if self.at_op("(") {
                self.parse_paren_ident_list()?
            } else {
                vec![]
            };
            self.expect_kw("AS")?;
            self.expect_op("(")?;
            self.expect_kw("SELECT")?;
            let query = self.parse_select(None)?;
            self.expect_op(")")?;
            ctes.push(squeal_ast::Cte {
                name,
                columns,
                query: Box::new(query),
            });
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(WithClause { recursive, ctes })
    }

    /// `( ident [, ident]* )`
    pub(crate) fn parse_paren_ident_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect_op("(")?;
        let mut names = Vec::new();
        loop {
            names.push(self.parse_identifier()?);
            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;
        Ok(names)
    }

    // -----------------------------------------------------------------------
    // SELECT
    // -----------------------------------------------------------------------

    /// Parse a SELECT statement; the SELECT keyword is already consumed.
    pub(crate) fn parse_select(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStatement, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_select_inner(with);
        self.leave_recursion();
        result
    }

    fn parse_select_inner(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStatement, ParseError> {
        let distinct = self.eat_kw("DISTINCT");
        let columns = self.parse_column_list()?;

        if !self.eat_kw("FROM") {
            return Err(ParseError::grammar(
                "SELECT requires a FROM clause",
                self.current(),
            ));
        }
        let from = self.parse_table_references()?;

        let mut where_clause: Option<Box<Expr>> = None;
        let mut group_by: Option<GroupByClause> = None;
        let mut order_by: Vec<OrderByItem> = Vec::new();
        let mut limit: Option<u64> = None;
        let mut offset: Option<u64> = None;
        let mut seen_order_by = false;

        loop {
            if self.at_kw("WHERE") {
                if where_clause.is_some() {
                    return Err(ParseError::grammar("duplicate WHERE clause", self.current()));
                }
                self.advance();
                where_clause = Some(Box::new(self.parse_expr()?));
            } else if self.at_kw("GROUP") {
                if group_by.is_some() {
                    return Err(ParseError::grammar(
                        "duplicate GROUP BY clause",
                        self.current(),
                    ));
                }
                self.advance();
                self.expect_kw("BY")?;
                group_by = Some(GroupByClause {
                    columns: self.parse_column_ref_list()?,
                    having: None,
                });
            } else if self.at_kw("HAVING") {
                let Some(ref mut group) = group_by else {
                    return Err(ParseError::grammar(
                        "HAVING clause without GROUP BY",
                        self.current(),
                    ));
                };
                if group.having.is_some() {
                    return Err(ParseError::grammar(
                        "duplicate HAVING clause",
                        self.current(),
                    ));
                }
                self.advance();
                group.having = Some(Box::new(self.parse_expr()?));
            } else if self.at_kw("ORDER") {
                if seen_order_by {
                    return Err(ParseError::grammar(
                        "duplicate ORDER BY clause",
                        self.current(),
                    ));
                }
                self.advance();
                self.expect_kw("BY")?;
                order_by = self.parse_order_by_list()?;
                seen_order_by = true;
            } else if self.at_kw("LIMIT") {
                if limit.is_some() {
                    return Err(ParseError::grammar("duplicate LIMIT clause", self.current()));
                }
                self.advance();
                limit = Some(self.parse_unsigned()?);
                if self.eat_kw("OFFSET") {
                    offset = Some(self.parse_unsigned()?);
                }
            } else {
                break;
            }
        }

        Ok(SelectStatement {
            with,
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            order_by,
            limit,
            offset,
        })
    }

    /// The SELECT result column list. A bare `*` is the whole list.
    fn parse_column_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        if self.at_op("*") {
            let star = self.current().clone();
            self.advance();
            return Ok(vec![Expr::Column(ColumnRef::bare("*"), star.span)]);
        }
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_expression()?);
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(columns)
    }

    /// One result column: an expression with an optional `AS` alias. The
    /// alias is only representable on column references; anything else is
    /// rejected.
    fn parse_column_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if self.at_kw("AS") {
            let as_lexeme = self.current().clone();
            self.advance();
            let alias = self.parse_identifier()?;
            return match expr {
                Expr::Column(mut col, span) => {
                    col.alias = Some(alias);
                    Ok(Expr::Column(col, span))
                }
                _ => Err(ParseError::grammar(
                    "alias can only be applied to column references",
                    &as_lexeme,
                )),
            };
        }
        Ok(expr)
    }

    // -----------------------------------------------------------------------
    // FROM clause & JOINs
    // -----------------------------------------------------------------------

    pub(crate) fn parse_table_references(&mut self) -> Result<Vec<TableRef>, ParseError> {
        let mut tables = Vec::new();
        loop {
            tables.push(self.parse_table_reference()?);
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(tables)
    }

    /// One FROM-list entry: a table factor followed by any number of JOIN
    /// clauses, folded into a left-deep join tree.
    fn parse_table_reference(&mut self) -> Result<TableRef, ParseError> {
        let mut table = self.parse_table_factor()?;

        loop {
            let natural = self.eat_kw("NATURAL");
            let kind = if self.eat_kw("JOIN") {
                Some(JoinKind::Inner)
            } else if self.eat_kw("INNER") {
                self.expect_kw("JOIN")?;
                Some(JoinKind::Inner)
            } else if self.eat_kw("LEFT") {
                let _ = self.eat_kw("OUTER");
                self.expect_kw("JOIN")?;
                Some(JoinKind::Left)
            } else if self.eat_kw("RIGHT") {
                let _ = self.eat_kw("OUTER");
                self.expect_kw("JOIN")?;
                Some(JoinKind::Right)
            } else if self.eat_kw("FULL") {
                let _ = self.eat_kw("OUTER");
                self.expect_kw("JOIN")?;
                Some(JoinKind::Full)
            } else if self.eat_kw("CROSS") {
                self.expect_kw("JOIN")?;
                Some(JoinKind::Cross)
            } else {
                None
            };

            let Some(kind) = kind else {
                if natural {
                    return Err(ParseError::unexpected("JOIN after NATURAL", self.current()));
                }
                break;
            };

            let right = self.parse_table_factor()?;
            let condition = self.parse_join_condition(kind, natural)?;
            table = TableRef::Join(Box::new(Join {
                kind,
                natural,
                left: table,
                right,
                condition,
            }));
        }

        Ok(table)
    }

    fn parse_join_condition(
        &mut self,
        kind: JoinKind,
        natural: bool,
    ) -> Result<Option<JoinCondition>, ParseError> {
        if natural || kind == JoinKind::Cross {
            if self.at_kw("ON") || self.at_kw("USING") {
                return Err(ParseError::grammar(
                    if natural {
                        "NATURAL JOIN does not take a join condition"
                    } else {
                        "CROSS JOIN does not take a join condition"
                    },
                    self.current(),
                ));
            }
            return Ok(None);
        }
        if self.eat_kw("ON") {
            Ok(Some(JoinCondition::On(self.parse_expr()?)))
        } else if self.eat_kw("USING") {
            Ok(Some(JoinCondition::Using(self.parse_paren_ident_list()?)))
        } else {
            Err(ParseError::grammar(
                "expected ON or USING after JOIN",
                self.current(),
            ))
        }
    }

    /// A base table or a parenthesized derived table.
    pub(crate) fn parse_table_factor(&mut self) -> Result<TableRef, ParseError> {
        if self.eat_op("(") {
            self.expect_kw("SELECT")?;
            let query = self.parse_select(None)?;
            self.expect_op(")")?;
            let alias = self.parse_optional_alias()?;
            return Ok(TableRef::Derived {
                query: Box::new(query),
                alias,
            });
        }
        Ok(TableRef::Base(self.parse_base_table_ref()?))
    }

    /// `[schema .] table [AS alias | alias]`
    pub(crate) fn parse_base_table_ref(&mut self) -> Result<BaseTableRef, ParseError> {
        let first = self.parse_identifier()?;
        let (schema, name) = if self.at_op(".") && self.peek(1).kind == LexemeKind::Identifier {
            self.advance();
            (Some(first), self.parse_identifier()?)
        } else {
            (None, first)
        };
        let alias = self.parse_optional_alias()?;
        Ok(BaseTableRef {
            schema,
            name,
            alias,
        })
    }

    /// Explicit (`AS name`) or implicit (bare identifier) alias.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_kw("AS") {
            return Ok(Some(self.parse_identifier()?));
        }
        if self.current().kind == LexemeKind::Identifier {
            return Ok(Some(self.parse_identifier()?));
        }
        Ok(None)
    }

    // -----------------------------------------------------------------------
    // Column references, ORDER BY
    // -----------------------------------------------------------------------

    /// `[table .] column`, where column may be `*`.
    pub(crate) fn parse_column_ref(&mut self) -> Result<ColumnRef, ParseError> {
        let first = self.parse_identifier()?;
        if self.at_op(".") {
            self.advance();
            let column = if self.eat_op("*") {
                "*".to_owned()
            } else {
                self.parse_identifier()?
            };
            return Ok(ColumnRef::qualified(first, column));
        }
        Ok(ColumnRef::bare(first))
    }

    pub(crate) fn parse_column_ref_list(&mut self) -> Result<Vec<ColumnRef>, ParseError> {
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_ref()?);
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(columns)
    }

    pub(crate) fn parse_order_by_list(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            items.push(self.parse_order_by_item()?);
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByItem, ParseError> {
        let column = self.parse_column_ref()?;
        let ascending = if self.eat_kw("DESC") {
            false
        } else {
            let _ = self.eat_kw("ASC");
            true
        };
        let nulls = if self.eat_kw("NULLS") {
            if self.eat_kw("FIRST") {
                Some(NullsOrder::First)
            } else {
                self.expect_kw("LAST")?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(OrderByItem {
            column,
            ascending,
            nulls,
        })
    }

    // -----------------------------------------------------------------------
    // INSERT
    // -----------------------------------------------------------------------

    fn parse_insert(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_kw("INTO")?;
        let table = self.parse_identifier()?;

        let columns = if self.at_op("(") {
            self.parse_paren_ident_list()?
        } else {
            vec![]
        };

        let source = if self.eat_kw("VALUES") {
            let mut rows = Vec::new();
            loop {
                self.expect_op("(")?;
                let mut row = Vec::new();
                loop {
                    row.push(self.parse_expr()?);
                    if !self.eat_op(",") {
                        break;
                    }
                }
                self.expect_op(")")?;
                rows.push(row);
                if !self.eat_op(",") {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.eat_kw("SELECT") {
            InsertSource::Select(Box::new(self.parse_select(None)?))
        } else {
            return Err(ParseError::unexpected("VALUES or SELECT", self.current()));
        };

        let on_duplicate = if self.eat_kw("ON") {
            self.expect_kw("DUPLICATE")?;
            self.expect_kw("KEY")?;
            self.expect_kw("UPDATE")?;
            self.parse_assignments()?
        } else {
            vec![]
        };

        Ok(InsertStatement {
            table,
            columns,
            source,
            on_duplicate,
        })
    }

    pub(crate) fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParseError> {
        let mut assignments = Vec::new();
        loop {
            let column = self.parse_identifier()?;
            self.expect_op("=")?;
            let value = self.parse_expr()?;
            assignments.push(Assignment { column, value });
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(assignments)
    }

    // -----------------------------------------------------------------------
    // UPDATE / DELETE
    // -----------------------------------------------------------------------

    fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        let table = self.parse_base_table_ref()?;
        self.expect_kw("SET")?;
        let assignments = self.parse_assignments()?;

        let where_clause = if self.eat_kw("WHERE") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let order_by = if self.eat_kw("ORDER") {
            self.expect_kw("BY")?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };
        let limit = if self.eat_kw("LIMIT") {
            Some(self.parse_unsigned()?)
        } else {
            None
        };

        Ok(UpdateStatement {
            table,
            assignments,
            where_clause,
            order_by,
            limit,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_kw("FROM")?;
        let table = self.parse_base_table_ref()?;

        let using = if self.eat_kw("USING") {
            self.parse_table_references()?
        } else {
            vec![]
        };
        let where_clause = if self.eat_kw("WHERE") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let order_by = if self.eat_kw("ORDER") {
            self.expect_kw("BY")?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };
        let limit = if self.eat_kw("LIMIT") {
            Some(self.parse_unsigned()?)
        } else {
            None
        };

        Ok(DeleteStatement {
            table,
            using,
            where_clause,
            order_by,
            limit,
        })
    }

    // -----------------------------------------------------------------------
    // TRUNCATE
    // -----------------------------------------------------------------------

    fn parse_truncate(&mut self) -> Result<TruncateStatement, ParseError> {
        let _ = self.eat_kw("TABLE");
        let table = self.parse_identifier()?;
        Ok(TruncateStatement { table })
    }

    // -----------------------------------------------------------------------
    // MERGE
    // -----------------------------------------------------------------------

    fn parse_merge(&mut self) -> Result<MergeStatement, ParseError> {
        self.expect_kw("INTO")?;
        let target = self.parse_base_table_ref()?;
        self.expect_kw("USING")?;
        let source = self.parse_table_factor()?;
        self.expect_kw("ON")?;
        let condition = Box::new(self.parse_expr()?);

        let mut clauses = Vec::new();
        while self.eat_kw("WHEN") {
            clauses.push(self.parse_merge_when()?);
        }
        if clauses.is_empty() {
            return Err(ParseError::grammar(
                "MERGE requires at least one WHEN clause",
                self.current(),
            ));
        }

        Ok(MergeStatement {
            target,
            source,
            condition,
            clauses,
        })
    }

    fn parse_merge_when(&mut self) -> Result<MergeWhen, ParseError> {
        let not = self.eat_kw("NOT");
        self.expect_kw("MATCHED")?;
        let matched = if not {
            if self.eat_kw("BY") {
                if self.eat_kw("SOURCE") {
                    MergeMatch::NotMatchedBySource
                } else {
                    self.expect_kw("TARGET")?;
                    MergeMatch::NotMatchedByTarget
                }
            } else {
                MergeMatch::NotMatchedByTarget
            }
        } else {
            if self.eat_kw("BY") {
                self.expect_kw("TARGET")?;
            }
            MergeMatch::Matched
        };

        let condition = if self.eat_kw("AND") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_kw("THEN")?;

        let action = if self.eat_kw("UPDATE") {
            self.expect_kw("SET")?;
            MergeAction::Update {
                assignments: self.parse_assignments()?,
            }
        } else if self.eat_kw("INSERT") {
            let columns = if self.at_op("(") {
                self.parse_paren_ident_list()?
            } else {
                vec![]
            };
            self.expect_kw("VALUES")?;
            self.expect_op("(")?;
            let mut values = Vec::new();
            loop {
                values.push(self.parse_expr()?);
                if !self.eat_op(",") {
                    break;
                }
            }
            self.expect_op(")")?;
            MergeAction::Insert { columns, values }
        } else if self.eat_kw("DELETE") {
            MergeAction::Delete
        } else {
            return Err(ParseError::unexpected(
                "UPDATE, INSERT, or DELETE",
                self.current(),
            ));
        };

        Ok(MergeWhen {
            matched,
            condition,
            action,
        })
    }

    // -----------------------------------------------------------------------
    // GRANT / REVOKE
    // -----------------------------------------------------------------------

    fn parse_grant_revoke(
        &mut self,
        operation: GrantOperation,
    ) -> Result<GrantRevokeStatement, ParseError> {
        let mut privileges = Vec::new();
        loop {
            privileges.push(self.parse_privilege()?);
            if !self.eat_op(",") {
                break;
            }
        }

        self.expect_kw("ON")?;
        let object_type = if self.eat_kw("TABLE") {
            GrantObjectType::Table
        } else if self.eat_kw("VIEW") {
            GrantObjectType::View
        } else if self.eat_kw("PROCEDURE") {
            GrantObjectType::Procedure
        } else if self.eat_kw("FUNCTION") {
            GrantObjectType::Function
        } else if self.eat_kw("DATABASE") {
            GrantObjectType::Database
        } else {
            GrantObjectType::Table
        };

        let mut objects = Vec::new();
        loop {
            objects.push(self.parse_identifier()?);
            if !self.eat_op(",") {
                break;
            }
        }

        if operation == GrantOperation::Grant {
            self.expect_kw("TO")?;
        } else {
            self.expect_kw("FROM")?;
        }
        let mut grantees = Vec::new();
        loop {
            grantees.push(self.parse_identifier()?);
            if !self.eat_op(",") {
                break;
            }
        }

        let mut with_grant_option = false;
        let mut cascade = false;
        if operation == GrantOperation::Grant && self.eat_kw("WITH") {
            self.expect_kw("GRANT")?;
            self.expect_kw("OPTION")?;
            with_grant_option = true;
        }
        if operation == GrantOperation::Revoke {
            if self.eat_kw("CASCADE") {
                cascade = true;
            } else {
                let _ = self.eat_kw("RESTRICT");
            }
        }

        Ok(GrantRevokeStatement {
            operation,
            privileges,
            object_type,
            objects,
            grantees,
            with_grant_option,
            cascade,
        })
    }

    fn parse_privilege(&mut self) -> Result<Privilege, ParseError> {
        let kind = if self.eat_kw("SELECT") {
            PrivilegeKind::Select
        } else if self.eat_kw("INSERT") {
            PrivilegeKind::Insert
        } else if self.eat_kw("UPDATE") {
            PrivilegeKind::Update
        } else if self.eat_kw("DELETE") {
            PrivilegeKind::Delete
        } else if self.eat_kw("TRUNCATE") {
            PrivilegeKind::Truncate
        } else if self.eat_kw("REFERENCES") {
            PrivilegeKind::References
        } else if self.eat_kw("TRIGGER") {
            PrivilegeKind::Trigger
        } else if self.eat_kw("ALL") {
            let _ = self.eat_kw("PRIVILEGES");
            PrivilegeKind::All
        } else {
            return Err(ParseError::unexpected("a privilege", self.current()));
        };

        let columns = if self.at_op("(") {
            self.parse_paren_ident_list()?
        } else {
            vec![]
        };

        Ok(Privilege { kind, columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squeal_ast::{BinaryOperator, Literal};

    fn parse_one(sql: &str) -> Statement {
        Parser::from_sql(sql)
            .expect("lex")
            .parse()
            .expect("parse")
    }

    fn parse_err(sql: &str) -> ParseError {
        match Parser::from_sql(sql) {
            Ok(mut parser) => parser.parse().unwrap_err(),
            Err(err) => err,
        }
    }

    fn select(sql: &str) -> SelectStatement {
        match parse_one(sql) {
            Statement::Select(s) => s,
            other => panic!("expected SELECT, got {other:?}"),
        }
    }

    // -- SELECT ------------------------------------------------------------

    #[test]
    fn test_select_basic() {
        let s = select("SELECT id, name FROM users WHERE age >= 18");
        assert!(!s.distinct);
        assert_eq!(s.columns.len(), 2);
        let Expr::Column(ref col, _) = s.columns[0] else {
            panic!("expected column");
        };
        assert_eq!(col.column, "id");
        assert_eq!(s.from.len(), 1);
        assert!(matches!(s.from[0], TableRef::Base(ref t) if t.name == "users"));

        let cond = s.where_clause.expect("where");
        let Expr::Binary { op, left, right, .. } = *cond else {
            panic!("expected binary condition");
        };
        assert_eq!(op, BinaryOperator::Ge);
        assert!(matches!(*left, Expr::Column(ref c, _) if c.column == "age"));
        assert!(matches!(*right, Expr::Literal(Literal::Integer(18), _)));

        assert!(s.group_by.is_none());
        assert!(s.order_by.is_empty());
        assert_eq!(s.limit, None);
    }

    #[test]
    fn test_select_star() {
        let s = select("SELECT * FROM t");
        assert_eq!(s.columns.len(), 1);
        assert!(matches!(s.columns[0], Expr::Column(ref c, _) if c.column == "*"));
    }

    #[test]
    fn test_select_distinct_and_alias() {
        let s = select("SELECT DISTINCT u.name AS n FROM users u");
        assert!(s.distinct);
        let Expr::Column(ref col, _) = s.columns[0] else {
            panic!("expected column");
        };
        assert_eq!(col.table.as_deref(), Some("u"));
        assert_eq!(col.alias.as_deref(), Some("n"));
        assert!(matches!(s.from[0], TableRef::Base(ref t) if t.alias.as_deref() == Some("u")));
    }

    #[test]
    fn test_alias_on_non_column_is_rejected() {
        let err = parse_err("SELECT max(age) AS m FROM users");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
        assert!(err.message.contains("alias"));
    }

    #[test]
    fn test_select_group_by_having_order_limit() {
        let s = select(
            "SELECT dept, COUNT(*) FROM emp GROUP BY dept HAVING COUNT(*) > 3 \
             ORDER BY dept DESC NULLS LAST LIMIT 10 OFFSET 20",
        );
        let group = s.group_by.expect("group by");
        assert_eq!(group.columns.len(), 1);
        assert!(group.having.is_some());
        assert_eq!(s.order_by.len(), 1);
        assert!(!s.order_by[0].ascending);
        assert_eq!(s.order_by[0].nulls, Some(NullsOrder::Last));
        assert_eq!(s.limit, Some(10));
        assert_eq!(s.offset, Some(20));
    }

    #[test]
    fn test_select_missing_from_is_grammar_error() {
        let err = parse_err("SELECT id");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
        assert!(err.message.contains("FROM"));
    }

    #[test]
    fn test_select_duplicate_clauses_rejected() {
        for sql in [
            "SELECT * FROM t WHERE a = 1 WHERE b = 2",
            "SELECT * FROM t GROUP BY a GROUP BY b",
            "SELECT * FROM t ORDER BY a ORDER BY b",
            "SELECT * FROM t LIMIT 1 LIMIT 2",
        ] {
            let err = parse_err(sql);
            assert_eq!(err.kind, ParseErrorKind::Grammar, "{sql}");
            assert!(err.message.contains("duplicate"), "{sql}");
        }
    }

    #[test]
    fn test_having_without_group_by() {
        let err = parse_err("SELECT * FROM t HAVING a > 1");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
        assert!(err.message.contains("GROUP BY"));
    }

    #[test]
    fn test_select_derived_table() {
        let s = select("SELECT * FROM (SELECT id FROM users) AS u");
        let TableRef::Derived { ref alias, .. } = s.from[0] else {
            panic!("expected derived table");
        };
        assert_eq!(alias.as_deref(), Some("u"));
    }

    #[test]
    fn test_select_schema_qualified_table() {
        let s = select("SELECT * FROM app.users");
        let TableRef::Base(ref t) = s.from[0] else {
            panic!("expected base table");
        };
        assert_eq!(t.schema.as_deref(), Some("app"));
        assert_eq!(t.name, "users");
    }

    #[test]
    fn test_with_clause() {
        let s = select(
            "WITH RECURSIVE nums (n) AS (SELECT one FROM dual) SELECT n FROM nums",
        );
        let with = s.with.expect("with clause");
        assert!(with.recursive);
        assert_eq!(with.ctes.len(), 1);
        assert_eq!(with.ctes[0].name, "nums");
        assert_eq!(with.ctes[0].columns, vec!["n".to_owned()]);
    }

    // -- JOINs -------------------------------------------------------------

    #[test]
    fn test_inner_join_on() {
        let s = select(
            "SELECT u.id, o.order_id FROM users u INNER JOIN orders o ON u.id = o.user_id",
        );
        assert_eq!(s.from.len(), 1);
        let TableRef::Join(ref join) = s.from[0] else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Inner);
        assert!(!join.natural);
        assert!(matches!(join.left, TableRef::Base(ref t) if t.name == "users"));
        assert!(matches!(join.right, TableRef::Base(ref t) if t.name == "orders"));
        let Some(JoinCondition::On(ref cond)) = join.condition else {
            panic!("expected ON condition");
        };
        assert!(matches!(cond, Expr::Binary { op: BinaryOperator::Eq, .. }));
    }

    #[test]
    fn test_left_join_using() {
        let s = select("SELECT * FROM users LEFT JOIN orders USING (id)");
        let TableRef::Join(ref join) = s.from[0] else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Left);
        assert!(!join.natural);
        assert_eq!(
            join.condition,
            Some(JoinCondition::Using(vec!["id".to_owned()]))
        );
    }

    #[test]
    fn test_natural_join() {
        let s = select("SELECT * FROM users NATURAL JOIN orders");
        let TableRef::Join(ref join) = s.from[0] else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Inner);
        assert!(join.natural);
        assert!(join.condition.is_none());
    }

    #[test]
    fn test_cross_join_has_no_condition() {
        let s = select("SELECT * FROM a CROSS JOIN b");
        let TableRef::Join(ref join) = s.from[0] else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Cross);
        assert!(join.condition.is_none());

        let err = parse_err("SELECT * FROM a CROSS JOIN b ON a.id = b.id");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
    }

    #[test]
    fn test_join_requires_on_or_using() {
        let err = parse_err("SELECT * FROM t JOIN s");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
        assert!(err.message.contains("ON or USING"));
    }

    #[test]
    fn test_join_chain_is_left_deep() {
        let s = select("SELECT * FROM a JOIN b ON x = y JOIN c ON p = q");
        let TableRef::Join(ref outer) = s.from[0] else {
            panic!("expected join");
        };
        assert!(matches!(outer.left, TableRef::Join(_)));
        assert!(matches!(outer.right, TableRef::Base(ref t) if t.name == "c"));
    }

    #[test]
    fn test_natural_without_join_fails() {
        let err = parse_err("SELECT * FROM a NATURAL b");
        assert!(err.message.contains("JOIN after NATURAL"));
    }

    // -- Window functions --------------------------------------------------

    #[test]
    fn test_count_star_over_window() {
        let s = select(
            "SELECT COUNT(*) OVER (PARTITION BY dept ORDER BY hired \
             ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM emp",
        );
        assert_eq!(s.columns.len(), 1);
        let Expr::FunctionCall {
            ref name,
            ref args,
            star,
            ref over,
            ..
        } = s.columns[0]
        else {
            panic!("expected function call");
        };
        assert!(name.eq_ignore_ascii_case("COUNT"));
        assert!(star);
        assert!(args.is_empty());

        let win = over.as_ref().expect("window");
        assert_eq!(win.partition_by.len(), 1);
        assert_eq!(win.partition_by[0].column, "dept");
        assert_eq!(win.order_by.len(), 1);
        assert!(win.order_by[0].ascending);

        let frame = win.frame.as_ref().expect("frame");
        assert_eq!(frame.kind, squeal_ast::FrameKind::Rows);
        assert_eq!(frame.start, squeal_ast::FrameBound::UnboundedPreceding);
        assert_eq!(frame.end, squeal_ast::FrameBound::CurrentRow);
    }

    // -- INSERT ------------------------------------------------------------

    #[test]
    fn test_insert_values_with_escaped_string() {
        let Statement::Insert(insert) =
            parse_one("INSERT INTO t (a, b) VALUES (1, 'x''y'), (2, 'z')")
        else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.table, "t");
        assert_eq!(insert.columns, vec!["a".to_owned(), "b".to_owned()]);
        let InsertSource::Values(ref rows) = insert.source else {
            panic!("expected VALUES");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert!(matches!(
            rows[0][1],
            Expr::Literal(Literal::String(ref s), _) if s == "x'y"
        ));
    }

    #[test]
    fn test_insert_select() {
        let Statement::Insert(insert) = parse_one("INSERT INTO t SELECT a FROM s") else {
            panic!("expected INSERT");
        };
        assert!(matches!(insert.source, InsertSource::Select(_)));
        assert!(insert.on_duplicate.is_empty());
    }

    #[test]
    fn test_insert_on_duplicate_key_update() {
        let Statement::Insert(insert) =
            parse_one("INSERT INTO t (a) VALUES (1) ON DUPLICATE KEY UPDATE a = 2, b = 3")
        else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.on_duplicate.len(), 2);
        assert_eq!(insert.on_duplicate[0].column, "a");
    }

    // -- UPDATE / DELETE ---------------------------------------------------

    #[test]
    fn test_update() {
        let Statement::Update(update) =
            parse_one("UPDATE users SET age = age + 1, active = TRUE WHERE id = 7 LIMIT 1")
        else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.table.name, "users");
        assert_eq!(update.assignments.len(), 2);
        assert!(update.where_clause.is_some());
        assert_eq!(update.limit, Some(1));
    }

    #[test]
    fn test_delete_with_using() {
        let Statement::Delete(delete) = parse_one(
            "DELETE FROM logs USING sessions s WHERE logs.sid = s.id ORDER BY ts LIMIT 100",
        ) else {
            panic!("expected DELETE");
        };
        assert_eq!(delete.table.name, "logs");
        assert_eq!(delete.using.len(), 1);
        assert!(delete.where_clause.is_some());
        assert_eq!(delete.order_by.len(), 1);
        assert_eq!(delete.limit, Some(100));
    }

    // -- TRUNCATE ----------------------------------------------------------

    #[test]
    fn test_truncate() {
        let Statement::Truncate(t) = parse_one("TRUNCATE TABLE audit") else {
            panic!("expected TRUNCATE");
        };
        assert_eq!(t.table, "audit");
        // The TABLE keyword is optional.
        assert!(matches!(parse_one("TRUNCATE audit"), Statement::Truncate(_)));
    }

    // -- MERGE -------------------------------------------------------------

    #[test]
    fn test_merge() {
        let Statement::Merge(merge) = parse_one(
            "MERGE INTO tgt USING src ON tgt.id = src.id \
             WHEN MATCHED AND src.flag = 1 THEN UPDATE SET v = src.v \
             WHEN NOT MATCHED THEN INSERT (id, v) VALUES (src.id, src.v) \
             WHEN NOT MATCHED BY SOURCE THEN DELETE",
        ) else {
            panic!("expected MERGE");
        };
        assert_eq!(merge.target.name, "tgt");
        assert!(matches!(merge.source, TableRef::Base(ref t) if t.name == "src"));
        assert_eq!(merge.clauses.len(), 3);

        assert_eq!(merge.clauses[0].matched, MergeMatch::Matched);
        assert!(merge.clauses[0].condition.is_some());
        assert!(matches!(merge.clauses[0].action, MergeAction::Update { .. }));

        assert_eq!(merge.clauses[1].matched, MergeMatch::NotMatchedByTarget);
        let MergeAction::Insert { ref columns, ref values } = merge.clauses[1].action else {
            panic!("expected insert action");
        };
        assert_eq!(columns.len(), 2);
        assert_eq!(values.len(), 2);

        assert_eq!(merge.clauses[2].matched, MergeMatch::NotMatchedBySource);
        assert!(matches!(merge.clauses[2].action, MergeAction::Delete));
    }

    #[test]
    fn test_merge_requires_when_clause() {
        let err = parse_err("MERGE INTO t USING s ON t.id = s.id");
        assert_eq!(err.kind, ParseErrorKind::Grammar);
    }

    // -- GRANT / REVOKE ----------------------------------------------------

    #[test]
    fn test_grant() {
        let Statement::GrantRevoke(stmt) = parse_one(
            "GRANT SELECT (id, name), UPDATE ON users, orders TO alice, bob WITH GRANT OPTION",
        ) else {
            panic!("expected GRANT");
        };
        assert_eq!(stmt.operation, GrantOperation::Grant);
        assert_eq!(stmt.privileges.len(), 2);
        assert_eq!(stmt.privileges[0].kind, PrivilegeKind::Select);
        assert_eq!(stmt.privileges[0].columns.len(), 2);
        assert_eq!(stmt.object_type, GrantObjectType::Table);
        assert_eq!(stmt.objects, vec!["users".to_owned(), "orders".to_owned()]);
        assert_eq!(stmt.grantees, vec!["alice".to_owned(), "bob".to_owned()]);
        assert!(stmt.with_grant_option);
        assert!(!stmt.cascade);
    }

    #[test]
    fn test_revoke() {
        let Statement::GrantRevoke(stmt) =
            parse_one("REVOKE ALL PRIVILEGES ON DATABASE app FROM carol CASCADE")
        else {
            panic!("expected REVOKE");
        };
        assert_eq!(stmt.operation, GrantOperation::Revoke);
        assert_eq!(stmt.privileges[0].kind, PrivilegeKind::All);
        assert_eq!(stmt.object_type, GrantObjectType::Database);
        assert!(stmt.cascade);
    }

    // -- Dispatch and errors -----------------------------------------------

    #[test]
    fn test_unknown_leading_keyword() {
        let err = parse_err("VACUUM users");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unterminated_string_is_lexical_error() {
        let err = parse_err("SELECT * FROM t WHERE a = 'oops");
        assert_eq!(err.kind, ParseErrorKind::Lexical);
    }

    #[test]
    fn test_error_carries_position() {
        let err = parse_err("SELECT *\nFROM t WHERE");
        assert_eq!(err.line, 2);
        assert!(err.col > 1);
        assert!(err.to_string().starts_with("2:"));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse_err("SELECT * FROM t garbage more");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parse_all_multiple_statements() {
        let statements = Parser::from_sql("SELECT a FROM t; DELETE FROM t WHERE a = 1;")
            .expect("lex")
            .parse_all()
            .expect("parse");
        assert_eq!(statements.len(), 2);
    }

    // -- Parser state primitives -------------------------------------------

    #[test]
    fn test_save_restore_round_trips() {
        let mut parser = Parser::from_sql("SELECT a FROM t").expect("lex");
        let before = parser.pos;
        let id = parser.save_state();
        parser.advance();
        parser.advance();
        assert_ne!(parser.pos, before);
        parser.restore_state(id);
        assert_eq!(parser.pos, before);
    }

    #[test]
    fn test_restore_pops_descendants() {
        let mut parser = Parser::from_sql("a b c d e").expect("lex");
        let outer = parser.save_state();
        parser.advance();
        let _inner = parser.save_state();
        parser.advance();
        parser.restore_state(outer);
        assert_eq!(parser.pos, 0);
        // The next save must reuse the slot freed by the restore.
        assert_eq!(parser.save_state(), outer);
    }

    #[test]
    fn test_try_parse_rewinds_on_failure() {
        let mut parser = Parser::from_sql("a b c").expect("lex");
        let before = parser.pos;
        let result: Option<()> = parser.try_parse(|p| {
            p.advance();
            Err(ParseError::grammar("forced failure", p.current()))
        });
        assert!(result.is_none());
        assert_eq!(parser.pos, before);

        let ident = parser.try_parse(Parser::parse_identifier);
        assert_eq!(ident.as_deref(), Some("a"));
        assert_ne!(parser.pos, before);
    }

    #[test]
    fn test_backup_rewinds_one_lexeme() {
        let mut parser = Parser::from_sql("a b").expect("lex");
        parser.advance();
        parser.backup();
        assert_eq!(parser.current().text, "a");
    }

    #[test]
    fn test_parse_metrics_count_statements() {
        reset_parse_metrics();
        let _ = parse_one("SELECT a FROM t");
        let _ = parse_err("SELECT a");
        let snapshot = parse_metrics_snapshot();
        assert!(snapshot.parse_statements_total >= 1);
        assert!(snapshot.parse_rejected_total >= 1);
    }
}
