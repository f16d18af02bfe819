//! SQL Abstract Syntax Tree node types for Squeal.
//!
//! This crate defines the complete AST type hierarchy produced by
//! `squeal-parser`. Every SQL statement parses to a tree of these nodes.
//! Ownership is strictly tree-shaped: a parent owns its children, there are
//! no back-references and no cycles, and dropping the root drops the tree.
//!
//! Each family of nodes is a tagged enum ([`Statement`], [`Expr`],
//! [`TableRef`]), so downstream consumers dispatch with exhaustive pattern
//! matching instead of downcasting. The canonical SQL rendering of every
//! node lives in [`display`] as `fmt::Display` implementations.

mod display;

use std::fmt;

// ---------------------------------------------------------------------------
// Span — source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the original SQL source text.
///
/// Expression nodes carry a `Span` so diagnostics and debugging tools can
/// point back at the exact source location.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive).
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-length placeholder span.
    pub const ZERO: Self = Self { start: 0, end: 0 };

    /// Merge two spans into one covering both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end { self.end } else { other.end };
        Self { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Top-level statement
// ---------------------------------------------------------------------------

/// A single parsed SQL statement. The root node of every parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    // DML
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Merge(MergeStatement),

    // DDL
    Create(CreateStatement),
    AlterTable(AlterTableStatement),
    Drop(DropStatement),
    Truncate(TruncateStatement),

    // DCL
    GrantRevoke(GrantRevokeStatement),
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// A literal constant in SQL source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The keyword `NULL`.
    Null,
    /// Integer literal.
    Integer(i64),
    /// Floating-point literal.
    Float(f64),
    /// String literal. Holds the decoded contents: quote doubling and
    /// backslash escapes are resolved, the surrounding quotes are not stored.
    String(String),
    /// The keywords `TRUE` / `FALSE`.
    Boolean(bool),
}

// ---------------------------------------------------------------------------
// Column references
// ---------------------------------------------------------------------------

/// A reference to a column, optionally table-qualified and aliased.
///
/// `SELECT *` and `t.*` are represented as column references whose column
/// name is `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Optional table (or alias) qualifier.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
    /// Optional `AS` alias. Only column references carry aliases; the
    /// parser rejects aliases on other expressions.
    pub alias: Option<String>,
}

impl ColumnRef {
    /// Create an unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
            alias: None,
        }
    }

    /// Create a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
            alias: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Binary operators, lowest to highest precedence class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
    In,

    // Additive
    Add,
    Subtract,

    // Multiplicative
    Multiply,
    Divide,
    Modulo,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        })
    }
}

/// Unary operators. `IsNull` / `IsNotNull` render postfix, the rest prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Exists,
    IsNull,
    IsNotNull,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression node. Every variant carries a [`Span`].
///
/// Equality is structural: two expressions parsed from different source
/// locations compare equal when their shapes and values match. This is
/// what makes the print-then-reparse round-trip testable.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal constant.
    Literal(Literal, Span),

    /// A column reference (possibly qualified, possibly aliased).
    Column(ColumnRef, Span),

    /// `left op right`. Both children are always present.
    Binary {
        op: BinaryOperator,
        left: Box<Self>,
        right: Box<Self>,
        span: Span,
    },

    /// `op expr` (or `expr IS [NOT] NULL` for the postfix forms).
    Unary {
        op: UnaryOperator,
        operand: Box<Self>,
        span: Span,
    },

    /// A function call, optionally with DISTINCT, `COUNT(*)`, and a window
    /// specification. `star` is set only for `COUNT(*)`, with no arguments.
    FunctionCall {
        name: String,
        args: Vec<Self>,
        distinct: bool,
        star: bool,
        over: Option<WindowSpec>,
        span: Span,
    },

    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    Case {
        operand: Option<Box<Self>>,
        when_then: Vec<(Self, Self)>,
        else_expr: Option<Box<Self>>,
        span: Span,
    },

    /// A scalar subquery `(SELECT ...)`.
    Subquery {
        query: Box<SelectStatement>,
        alias: Option<String>,
        span: Span,
    },

    /// A parenthesized expression list `(a, b, c)`. Produced as the
    /// right-hand side of `IN (...)`.
    Tuple(Vec<Self>, Span),
}

impl Expr {
    /// The source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, s) | Self::Column(_, s) | Self::Tuple(_, s) => *s,
            Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::FunctionCall { span, .. }
            | Self::Case { span, .. }
            | Self::Subquery { span, .. } => *span,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a, _), Self::Literal(b, _)) => a == b,
            (Self::Column(a, _), Self::Column(b, _)) => a == b,
            (
                Self::Binary {
                    op: a_op,
                    left: a_left,
                    right: a_right,
                    ..
                },
                Self::Binary {
                    op: b_op,
                    left: b_left,
                    right: b_right,
                    ..
                },
            ) => a_op == b_op && a_left == b_left && a_right == b_right,
            (
                Self::Unary {
                    op: a_op,
                    operand: a_operand,
                    ..
                },
                Self::Unary {
                    op: b_op,
                    operand: b_operand,
                    ..
                },
            ) => a_op == b_op && a_operand == b_operand,
            (
                Self::FunctionCall {
                    name: a_name,
                    args: a_args,
                    distinct: a_distinct,
                    star: a_star,
                    over: a_over,
                    ..
                },
                Self::FunctionCall {
                    name: b_name,
                    args: b_args,
                    distinct: b_distinct,
                    star: b_star,
                    over: b_over,
                    ..
                },
            ) => {
                a_name == b_name
                    && a_args == b_args
                    && a_distinct == b_distinct
                    && a_star == b_star
                    && a_over == b_over
            }
            (
                Self::Case {
                    operand: a_operand,
                    when_then: a_when,
                    else_expr: a_else,
                    ..
                },
                Self::Case {
                    operand: b_operand,
                    when_then: b_when,
                    else_expr: b_else,
                    ..
                },
            ) => a_operand == b_operand && a_when == b_when && a_else == b_else,
            (
                Self::Subquery {
                    query: a_query,
                    alias: a_alias,
                    ..
                },
                Self::Subquery {
                    query: b_query,
                    alias: b_alias,
                    ..
                },
            ) => a_query == b_query && a_alias == b_alias,
            (Self::Tuple(a, _), Self::Tuple(b, _)) => a == b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Window specifications
// ---------------------------------------------------------------------------

/// The `OVER (...)` clause of a window function call.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Named window reference (`OVER w`), mutually exclusive with the
    /// inline clauses below.
    pub reference: Option<String>,
    /// PARTITION BY columns.
    pub partition_by: Vec<ColumnRef>,
    /// ORDER BY terms within the window.
    pub order_by: Vec<OrderByItem>,
    /// Frame clause.
    pub frame: Option<Frame>,
}

/// Window frame clause: which rows are visible to the function at each row.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    pub start: FrameBound,
    pub end: FrameBound,
    pub exclude: Option<FrameExclude>,
}

/// Frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Rows,
    Range,
    Groups,
}

/// Window frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    UnboundedFollowing,
    /// `expr PRECEDING`.
    Preceding(Box<Expr>),
    /// `expr FOLLOWING`.
    Following(Box<Expr>),
}

/// Window frame EXCLUDE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameExclude {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

// ---------------------------------------------------------------------------
// Table references and joins
// ---------------------------------------------------------------------------

/// A table source in a FROM clause (or USING list).
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A named table.
    Base(BaseTableRef),
    /// A derived table: `(SELECT ...) [alias]`.
    Derived {
        query: Box<SelectStatement>,
        alias: Option<String>,
    },
    /// A join tree rooted at this reference.
    Join(Box<Join>),
}

/// A named table with optional schema qualifier and alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseTableRef {
    pub schema: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

impl BaseTableRef {
    /// Create an unqualified, unaliased table reference.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }
}

/// A JOIN between two table references.
///
/// When `natural` is set, or `kind` is [`JoinKind::Cross`], `condition`
/// is always `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub natural: bool,
    pub left: TableRef,
    pub right: TableRef,
    pub condition: Option<JoinCondition>,
}

/// The kind of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// Join condition: ON expression or USING column list.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
}

// ---------------------------------------------------------------------------
// Clause nodes
// ---------------------------------------------------------------------------

/// GROUP BY clause with its optional HAVING condition.
///
/// HAVING lives here rather than on the statement so that the grammar rule
/// "HAVING requires GROUP BY" is unrepresentable when violated.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub columns: Vec<ColumnRef>,
    pub having: Option<Box<Expr>>,
}

/// One term of an ORDER BY list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub column: ColumnRef,
    /// `true` unless DESC was written.
    pub ascending: bool,
    /// NULLS FIRST / NULLS LAST.
    pub nulls: Option<NullsOrder>,
}

/// NULLS placement in ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// WITH clause prefix: `WITH [RECURSIVE] cte [, cte]*`.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// A single common table expression: `name [(columns)] AS (query)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<SelectStatement>,
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

/// A SELECT statement.
///
/// Invariants maintained by the parser: `columns` and `from` are never
/// empty, and `group_by` is present whenever a HAVING condition was given.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Optional WITH prefix. Stored but not resolved by the front-end.
    pub with: Option<WithClause>,
    pub distinct: bool,
    /// Result columns: column references, function calls, CASE expressions,
    /// or arbitrary expressions.
    pub columns: Vec<Expr>,
    /// FROM list; each entry may be a join tree.
    pub from: Vec<TableRef>,
    pub where_clause: Option<Box<Expr>>,
    pub group_by: Option<GroupByClause>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// ---------------------------------------------------------------------------
// INSERT / UPDATE / DELETE
// ---------------------------------------------------------------------------

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    /// Optional explicit column list.
    pub columns: Vec<String>,
    pub source: InsertSource,
    /// `ON DUPLICATE KEY UPDATE` assignments; empty when absent.
    pub on_duplicate: Vec<Assignment>,
}

/// Source of inserted rows.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (row), (row), ...`
    Values(Vec<Vec<Expr>>),
    /// A nested SELECT.
    Select(Box<SelectStatement>),
}

/// A SET assignment: `column = expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: BaseTableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Box<Expr>>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<u64>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: BaseTableRef,
    /// Multi-table `USING` list; empty when absent.
    pub using: Vec<TableRef>,
    pub where_clause: Option<Box<Expr>>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<u64>,
}

// ---------------------------------------------------------------------------
// MERGE
// ---------------------------------------------------------------------------

/// A MERGE statement: `MERGE INTO target USING source ON condition WHEN ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatement {
    pub target: BaseTableRef,
    pub source: TableRef,
    pub condition: Box<Expr>,
    pub clauses: Vec<MergeWhen>,
}

/// One `WHEN [NOT] MATCHED ... THEN action` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeWhen {
    pub matched: MergeMatch,
    /// Extra `AND` condition on the clause.
    pub condition: Option<Expr>,
    pub action: MergeAction,
}

/// Match discriminator of a WHEN clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeMatch {
    Matched,
    NotMatchedByTarget,
    NotMatchedBySource,
}

/// Action taken by a WHEN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeAction {
    Update { assignments: Vec<Assignment> },
    Insert { columns: Vec<String>, values: Vec<Expr> },
    Delete,
}

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A column data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub base: BaseType,
    /// Length for CHAR / VARCHAR.
    pub length: Option<u32>,
    /// Precision for DECIMAL / NUMERIC.
    pub precision: Option<u32>,
    /// Scale for DECIMAL / NUMERIC.
    pub scale: Option<u32>,
    /// Character set for string types.
    pub charset: Option<String>,
    /// Collation for string types.
    pub collation: Option<String>,
}

impl DataType {
    /// A bare type with no parameters.
    #[must_use]
    pub const fn simple(base: BaseType) -> Self {
        Self {
            base,
            length: None,
            precision: None,
            scale: None,
            charset: None,
            collation: None,
        }
    }
}

/// The closed set of base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Integer,
    BigInt,
    SmallInt,
    Decimal,
    Numeric,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Date,
    Time,
    Timestamp,
    Boolean,
    Blob,
    Json,
}

// ---------------------------------------------------------------------------
// Foreign keys and constraints
// ---------------------------------------------------------------------------

/// A `REFERENCES` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyReference {
    pub table: String,
    pub columns: Vec<String>,
    pub match_type: Option<FkMatchType>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    /// `ENFORCED` / `NOT ENFORCED`.
    pub enforced: Option<bool>,
}

/// `MATCH SIMPLE | PARTIAL | FULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FkMatchType {
    Simple,
    Partial,
    Full,
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
    /// Optional `CONSTRAINT name`.
    pub name: Option<String>,
    pub kind: TableConstraintKind,
    pub deferrable: bool,
    pub initially: Option<ConstraintTiming>,
}

/// Table constraint variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraintKind {
    PrimaryKey { columns: Vec<String> },
    ForeignKey {
        columns: Vec<String>,
        reference: ForeignKeyReference,
    },
    Unique { columns: Vec<String> },
    Check(Box<Expr>),
}

/// INITIALLY IMMEDIATE / INITIALLY DEFERRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintTiming {
    Immediate,
    Deferred,
}

// ---------------------------------------------------------------------------
// CREATE TABLE
// ---------------------------------------------------------------------------

/// A column definition inside CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// `false` when NOT NULL was written.
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub default: Option<Box<Expr>>,
    pub check: Option<Box<Expr>>,
    pub references: Option<ForeignKeyReference>,
    pub comment: Option<String>,
    pub collation: Option<String>,
    /// Generated-column spec. Host-supplied; the parser does not produce it.
    pub generated: Option<GeneratedColumn>,
}

impl ColumnDef {
    /// A plain nullable column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default: None,
            check: None,
            references: None,
            comment: None,
            collation: None,
            generated: None,
        }
    }
}

/// A generated column: `AS (expr) [STORED | VIRTUAL]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedColumn {
    pub expr: Box<Expr>,
    pub storage: Option<GeneratedStorage>,
}

/// Storage class of a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedStorage {
    Stored,
    Virtual,
}

/// MySQL-flavored table options following the column list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    pub engine: Option<String>,
    pub auto_increment: Option<u64>,
    pub charset: Option<String>,
    pub collate: Option<String>,
    pub comment: Option<String>,
    pub row_format: Option<String>,
    pub key_block_size: Option<u64>,
    pub max_rows: Option<u64>,
    pub min_rows: Option<u64>,
    pub tablespace: Option<String>,
}

impl TableOptions {
    /// Whether any option was given.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.engine.is_none()
            && self.auto_increment.is_none()
            && self.charset.is_none()
            && self.collate.is_none()
            && self.comment.is_none()
            && self.row_format.is_none()
            && self.key_block_size.is_none()
            && self.max_rows.is_none()
            && self.min_rows.is_none()
            && self.tablespace.is_none()
    }
}

/// `PARTITION BY (RANGE | LIST | HASH) (columns) [PARTITIONS n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec {
    pub kind: PartitionKind,
    pub columns: Vec<String>,
    pub partitions: Option<u64>,
}

/// Partitioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    Range,
    List,
    Hash,
}

/// The body of CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    pub options: TableOptions,
    pub partition: Option<PartitionSpec>,
}

// ---------------------------------------------------------------------------
// CREATE INDEX / VIEW / SEQUENCE / TRIGGER / routines
// ---------------------------------------------------------------------------

/// The body of CREATE INDEX.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexDef {
    pub name: String,
    pub table: String,
    pub columns: Vec<IndexColumn>,
    pub unique: bool,
    /// `USING <type>` (BTREE, HASH, ...).
    pub index_type: Option<String>,
}

/// One indexed column with optional prefix length and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    /// Prefix length for string columns.
    pub length: Option<u32>,
    pub ascending: bool,
}

/// The body of CREATE VIEW.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewDef {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<SelectStatement>,
    pub with_check_option: bool,
}

/// The body of CREATE SEQUENCE. Host-supplied; not produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSequenceDef {
    pub name: String,
    pub start: Option<i64>,
    pub increment: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub cycle: bool,
}

/// The body of CREATE TRIGGER. Host-supplied; not produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTriggerDef {
    pub name: String,
    pub table: String,
    pub timing: TriggerTiming,
    pub event: TriggerEvent,
    pub for_each_row: bool,
    pub when: Option<Box<Expr>>,
    pub body: Vec<Statement>,
}

/// When the trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

/// The event a trigger fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
}

/// The body of CREATE PROCEDURE / FUNCTION. Host-supplied; not produced by
/// the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRoutineDef {
    pub kind: RoutineKind,
    pub name: String,
    pub parameters: Vec<RoutineParameter>,
    /// Return type, for functions.
    pub returns: Option<DataType>,
    pub body: Vec<Statement>,
}

/// Procedure or function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    Procedure,
    Function,
}

/// One routine parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineParameter {
    pub direction: Option<ParameterDirection>,
    pub name: String,
    pub data_type: DataType,
}

/// IN / OUT / INOUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

// ---------------------------------------------------------------------------
// CREATE wrapper
// ---------------------------------------------------------------------------

/// A CREATE statement with its object-specific body.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStatement {
    pub if_not_exists: bool,
    pub or_replace: bool,
    pub body: CreateBody,
}

/// The object created.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateBody {
    Table(CreateTableDef),
    Index(CreateIndexDef),
    View(CreateViewDef),
    Sequence(CreateSequenceDef),
    Trigger(CreateTriggerDef),
    Routine(CreateRoutineDef),
}

// ---------------------------------------------------------------------------
// ALTER TABLE
// ---------------------------------------------------------------------------

/// An ALTER TABLE statement carrying a single alteration.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    pub table: String,
    pub if_exists: bool,
    /// `ONLY` — do not recurse into inheriting tables.
    pub only: bool,
    pub action: AlterAction,
}

/// The alteration performed.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn {
        column: ColumnDef,
        position: Option<ColumnPosition>,
    },
    DropColumn { name: String, cascade: bool },
    ModifyColumn { column: ColumnDef },
    AddConstraint(TableConstraint),
    DropConstraint { name: String, cascade: bool },
    RenameColumn { old_name: String, new_name: String },
    RenameTable { new_name: String },
}

/// Placement of an added column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    First,
    After(String),
}

// ---------------------------------------------------------------------------
// DROP / TRUNCATE
// ---------------------------------------------------------------------------

/// A DROP statement over one or more named objects.
#[derive(Debug, Clone, PartialEq)]
pub struct DropStatement {
    pub object: DropObject,
    pub if_exists: bool,
    pub names: Vec<String>,
    pub behavior: Option<DropBehavior>,
}

/// Object kind being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropObject {
    Table,
    Index,
    View,
    Trigger,
}

/// Trailing CASCADE / RESTRICT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

/// A TRUNCATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateStatement {
    pub table: String,
}

// ---------------------------------------------------------------------------
// GRANT / REVOKE
// ---------------------------------------------------------------------------

/// A GRANT or REVOKE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantRevokeStatement {
    pub operation: GrantOperation,
    pub privileges: Vec<Privilege>,
    pub object_type: GrantObjectType,
    pub objects: Vec<String>,
    pub grantees: Vec<String>,
    /// `WITH GRANT OPTION` (GRANT only).
    pub with_grant_option: bool,
    /// `CASCADE` (REVOKE only).
    pub cascade: bool,
}

/// Grant or revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantOperation {
    Grant,
    Revoke,
}

/// One privilege, possibly column-restricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privilege {
    pub kind: PrivilegeKind,
    /// Column list for column-level privileges; empty when absent.
    pub columns: Vec<String>,
}

/// The privilege kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeKind {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    All,
}

/// Object class a privilege applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantObjectType {
    Table,
    View,
    Procedure,
    Function,
    Database,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Expr {
        Expr::Column(ColumnRef::bare(name), Span::ZERO)
    }

    fn int(value: i64) -> Expr {
        Expr::Literal(Literal::Integer(value), Span::ZERO)
    }

    #[test]
    fn test_span_merge_covers_both() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
        assert_eq!(b.merge(a), Span::new(3, 12));
    }

    #[test]
    fn test_expr_equality_ignores_spans() {
        let a = Expr::Literal(Literal::Integer(1), Span::new(0, 1));
        let b = Expr::Literal(Literal::Integer(1), Span::new(40, 41));
        assert_eq!(a, b);
        assert_ne!(a, Expr::Literal(Literal::Integer(2), Span::new(0, 1)));
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Null.to_string(), "NULL");
        assert_eq!(Literal::Integer(42).to_string(), "42");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::Float(3.25).to_string(), "3.25");
        assert_eq!(Literal::Boolean(true).to_string(), "TRUE");
        assert_eq!(Literal::String("it's".to_owned()).to_string(), "'it''s'");
        assert_eq!(
            Literal::String("a\\b".to_owned()).to_string(),
            "'a\\\\b'"
        );
    }

    #[test]
    fn test_column_ref_display() {
        assert_eq!(ColumnRef::bare("id").to_string(), "id");
        assert_eq!(ColumnRef::qualified("t", "id").to_string(), "t.id");
        let mut aliased = ColumnRef::bare("name");
        aliased.alias = Some("n".to_owned());
        assert_eq!(aliased.to_string(), "name AS n");
    }

    #[test]
    fn test_binary_display_parenthesizes_compound_operands() {
        let sum = Expr::Binary {
            op: BinaryOperator::Add,
            left: Box::new(column("a")),
            right: Box::new(column("b")),
            span: Span::ZERO,
        };
        let cmp = Expr::Binary {
            op: BinaryOperator::Gt,
            left: Box::new(sum),
            right: Box::new(int(0)),
            span: Span::ZERO,
        };
        assert_eq!(cmp.to_string(), "(a + b) > 0");
    }

    #[test]
    fn test_unary_display_forms() {
        let operand = Box::new(column("x"));
        assert_eq!(
            Expr::Unary {
                op: UnaryOperator::Not,
                operand: operand.clone(),
                span: Span::ZERO,
            }
            .to_string(),
            "NOT x"
        );
        assert_eq!(
            Expr::Unary {
                op: UnaryOperator::IsNotNull,
                operand,
                span: Span::ZERO,
            }
            .to_string(),
            "x IS NOT NULL"
        );
    }

    #[test]
    fn test_join_display() {
        let join = Join {
            kind: JoinKind::Left,
            natural: false,
            left: TableRef::Base(BaseTableRef::bare("a")),
            right: TableRef::Base(BaseTableRef::bare("b")),
            condition: Some(JoinCondition::Using(vec!["id".to_owned()])),
        };
        assert_eq!(join.to_string(), "a LEFT JOIN b USING (id)");

        let natural = Join {
            kind: JoinKind::Inner,
            natural: true,
            left: TableRef::Base(BaseTableRef::bare("a")),
            right: TableRef::Base(BaseTableRef::bare("b")),
            condition: None,
        };
        assert_eq!(natural.to_string(), "a NATURAL JOIN b");
    }

    #[test]
    fn test_frame_display_collapses_mirrored_bounds() {
        let frame = Frame {
            kind: FrameKind::Rows,
            start: FrameBound::CurrentRow,
            end: FrameBound::CurrentRow,
            exclude: None,
        };
        assert_eq!(frame.to_string(), "ROWS CURRENT ROW");

        let between = Frame {
            kind: FrameKind::Range,
            start: FrameBound::UnboundedPreceding,
            end: FrameBound::CurrentRow,
            exclude: Some(FrameExclude::Ties),
        };
        assert_eq!(
            between.to_string(),
            "RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW EXCLUDE TIES"
        );
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::simple(BaseType::Integer).to_string(), "INTEGER");
        let mut varchar = DataType::simple(BaseType::Varchar);
        varchar.length = Some(64);
        assert_eq!(varchar.to_string(), "VARCHAR(64)");
        let mut decimal = DataType::simple(BaseType::Decimal);
        decimal.precision = Some(10);
        decimal.scale = Some(2);
        assert_eq!(decimal.to_string(), "DECIMAL(10, 2)");
    }

    #[test]
    fn test_table_options_is_empty() {
        let mut options = TableOptions::default();
        assert!(options.is_empty());
        options.engine = Some("InnoDB".to_owned());
        assert!(!options.is_empty());
    }

    #[test]
    fn test_host_supplied_nodes_display() {
        // Trigger and routine bodies are never produced by the parser but
        // still have a total, deterministic rendering.
        let trigger = CreateTriggerDef {
            name: "trg".to_owned(),
            table: "t".to_owned(),
            timing: TriggerTiming::Before,
            event: TriggerEvent::Insert,
            for_each_row: true,
            when: None,
            body: vec![],
        };
        assert_eq!(
            trigger.to_string(),
            "TRIGGER trg BEFORE INSERT ON t FOR EACH ROW BEGIN END"
        );

        let sequence = CreateSequenceDef {
            name: "seq".to_owned(),
            start: Some(1),
            increment: Some(2),
            min_value: None,
            max_value: None,
            cycle: true,
        };
        assert_eq!(
            sequence.to_string(),
            "SEQUENCE seq START WITH 1 INCREMENT BY 2 CYCLE"
        );
    }
}
