//! Canonical SQL rendering via `fmt::Display` for AST nodes.
//!
//! Every node type renders to valid SQL text, so that parsing the printed
//! form of a parsed statement yields a structurally equal AST. Keywords are
//! uppercased, lists are comma-and-space separated, and compound operands
//! are parenthesized so operator grouping survives a re-parse.

#[allow(clippy::wildcard_imports)]
use crate::*;
use std::fmt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn ident_list(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(item)?;
    }
    Ok(())
}

/// Write an expression, parenthesized when it is itself an operator node.
/// Keeps grouping unambiguous through a re-parse.
fn write_paren_if_compound(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if matches!(expr, Expr::Binary { .. } | Expr::Unary { .. }) {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    // Backslash first, then quote doubling.
    let escaped = s.replace('\\', "\\\\").replace('\'', "''");
    write!(f, "'{escaped}'")
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => write!(f, "{s}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::Merge(s) => write!(f, "{s}"),
            Self::Create(s) => write!(f, "{s}"),
            Self::AlterTable(s) => write!(f, "{s}"),
            Self::Drop(s) => write!(f, "{s}"),
            Self::Truncate(s) => write!(f, "{s}"),
            Self::GrantRevoke(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Literals and column references
// ---------------------------------------------------------------------------

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(v) => {
                // Keep a decimal point so the value re-lexes as a float.
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::String(s) => write_string_literal(f, s),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref t) = self.table {
            write!(f, "{t}.")?;
        }
        f.write_str(&self.column)?;
        if let Some(ref a) = self.alias {
            write!(f, " AS {a}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit, _) => write!(f, "{lit}"),
            Self::Column(col, _) => write!(f, "{col}"),
            Self::Binary {
                op, left, right, ..
            } => {
                write_paren_if_compound(f, left)?;
                write!(f, " {op} ")?;
                write_paren_if_compound(f, right)
            }
            Self::Unary { op, operand, .. } => match op {
                UnaryOperator::Not => {
                    f.write_str("NOT ")?;
                    write_paren_if_compound(f, operand)
                }
                UnaryOperator::Exists => {
                    f.write_str("EXISTS ")?;
                    write!(f, "{operand}")
                }
                UnaryOperator::IsNull => {
                    write_paren_if_compound(f, operand)?;
                    f.write_str(" IS NULL")
                }
                UnaryOperator::IsNotNull => {
                    write_paren_if_compound(f, operand)?;
                    f.write_str(" IS NOT NULL")
                }
            },
            Self::FunctionCall {
                name,
                args,
                distinct,
                star,
                over,
                ..
            } => {
                write!(f, "{name}(")?;
                if *star {
                    f.write_str("*")?;
                } else {
                    if *distinct {
                        f.write_str("DISTINCT ")?;
                    }
                    comma_list(f, args)?;
                }
                f.write_str(")")?;
                if let Some(win) = over {
                    write!(f, " OVER {win}")?;
                }
                Ok(())
            }
            Self::Case {
                operand,
                when_then,
                else_expr,
                ..
            } => {
                f.write_str("CASE")?;
                if let Some(op) = operand {
                    write!(f, " {op}")?;
                }
                for (when, then) in when_then {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(el) = else_expr {
                    write!(f, " ELSE {el}")?;
                }
                f.write_str(" END")
            }
            Self::Subquery { query, alias, .. } => {
                write!(f, "({query})")?;
                if let Some(a) = alias {
                    write!(f, " AS {a}")?;
                }
                Ok(())
            }
            Self::Tuple(items, _) => {
                f.write_str("(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Window specifications
// ---------------------------------------------------------------------------

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.reference {
            return f.write_str(name);
        }
        f.write_str("(")?;
        let mut need_space = false;
        if !self.partition_by.is_empty() {
            f.write_str("PARTITION BY ")?;
            comma_list(f, &self.partition_by)?;
            need_space = true;
        }
        if !self.order_by.is_empty() {
            if need_space {
                f.write_str(" ")?;
            }
            f.write_str("ORDER BY ")?;
            comma_list(f, &self.order_by)?;
            need_space = true;
        }
        if let Some(ref frame) = self.frame {
            if need_space {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            FrameKind::Rows => "ROWS",
            FrameKind::Range => "RANGE",
            FrameKind::Groups => "GROUPS",
        })?;
        if self.start == self.end {
            write!(f, " {}", self.start)?;
        } else {
            write!(f, " BETWEEN {} AND {}", self.start, self.end)?;
        }
        if let Some(ex) = self.exclude {
            write!(f, " EXCLUDE {ex}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
            Self::Preceding(e) => write!(f, "{e} PRECEDING"),
            Self::Following(e) => write!(f, "{e} FOLLOWING"),
        }
    }
}

impl fmt::Display for FrameExclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CurrentRow => "CURRENT ROW",
            Self::Group => "GROUP",
            Self::Ties => "TIES",
            Self::NoOthers => "NO OTHERS",
        })
    }
}

// ---------------------------------------------------------------------------
// Table references
// ---------------------------------------------------------------------------

impl fmt::Display for BaseTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref s) = self.schema {
            write!(f, "{s}.")?;
        }
        f.write_str(&self.name)?;
        if let Some(ref a) = self.alias {
            write!(f, " AS {a}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(t) => write!(f, "{t}"),
            Self::Derived { query, alias } => {
                write!(f, "({query})")?;
                if let Some(a) = alias {
                    write!(f, " AS {a}")?;
                }
                Ok(())
            }
            Self::Join(j) => write!(f, "{j}"),
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.left)?;
        if self.natural {
            f.write_str("NATURAL ")?;
        }
        f.write_str(match self.kind {
            // NATURAL JOIN is the canonical spelling of a natural inner join.
            JoinKind::Inner if self.natural => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        })?;
        write!(f, " {}", self.right)?;
        match &self.condition {
            Some(JoinCondition::On(expr)) => write!(f, " ON {expr}"),
            Some(JoinCondition::Using(cols)) => {
                f.write_str(" USING (")?;
                ident_list(f, cols)?;
                f.write_str(")")
            }
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Clause nodes
// ---------------------------------------------------------------------------

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column)?;
        if !self.ascending {
            f.write_str(" DESC")?;
        }
        match self.nulls {
            Some(NullsOrder::First) => f.write_str(" NULLS FIRST")?,
            Some(NullsOrder::Last) => f.write_str(" NULLS LAST")?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        comma_list(f, &self.ctes)
    }
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.query)
    }
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref with) = self.with {
            write!(f, "{with} ")?;
        }
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        comma_list(f, &self.columns)?;
        f.write_str(" FROM ")?;
        comma_list(f, &self.from)?;
        if let Some(ref w) = self.where_clause {
            write!(f, " WHERE {w}")?;
        }
        if let Some(ref g) = self.group_by {
            f.write_str(" GROUP BY ")?;
            comma_list(f, &g.columns)?;
            if let Some(ref h) = g.having {
                write!(f, " HAVING {h}")?;
            }
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(n) = self.limit {
            write!(f, " LIMIT {n}")?;
        }
        if let Some(n) = self.offset {
            write!(f, " OFFSET {n}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// INSERT / UPDATE / DELETE
// ---------------------------------------------------------------------------

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.table)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match &self.source {
            InsertSource::Values(rows) => {
                f.write_str(" VALUES ")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str("(")?;
                    comma_list(f, row)?;
                    f.write_str(")")?;
                }
            }
            InsertSource::Select(query) => write!(f, " {query}")?,
        }
        if !self.on_duplicate.is_empty() {
            f.write_str(" ON DUPLICATE KEY UPDATE ")?;
            comma_list(f, &self.on_duplicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        comma_list(f, &self.assignments)?;
        if let Some(ref w) = self.where_clause {
            write!(f, " WHERE {w}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(n) = self.limit {
            write!(f, " LIMIT {n}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if !self.using.is_empty() {
            f.write_str(" USING ")?;
            comma_list(f, &self.using)?;
        }
        if let Some(ref w) = self.where_clause {
            write!(f, " WHERE {w}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(n) = self.limit {
            write!(f, " LIMIT {n}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MERGE
// ---------------------------------------------------------------------------

impl fmt::Display for MergeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MERGE INTO {} USING {} ON {}",
            self.target, self.source, self.condition
        )?;
        for clause in &self.clauses {
            write!(f, " {clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for MergeWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.matched {
            MergeMatch::Matched => "WHEN MATCHED",
            MergeMatch::NotMatchedByTarget => "WHEN NOT MATCHED",
            MergeMatch::NotMatchedBySource => "WHEN NOT MATCHED BY SOURCE",
        })?;
        if let Some(ref cond) = self.condition {
            write!(f, " AND {cond}")?;
        }
        write!(f, " THEN {}", self.action)
    }
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update { assignments } => {
                f.write_str("UPDATE SET ")?;
                comma_list(f, assignments)
            }
            Self::Insert { columns, values } => {
                f.write_str("INSERT ")?;
                if !columns.is_empty() {
                    f.write_str("(")?;
                    ident_list(f, columns)?;
                    f.write_str(") ")?;
                }
                f.write_str("VALUES (")?;
                comma_list(f, values)?;
                f.write_str(")")
            }
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.base {
            BaseType::Integer => "INTEGER",
            BaseType::BigInt => "BIGINT",
            BaseType::SmallInt => "SMALLINT",
            BaseType::Decimal => "DECIMAL",
            BaseType::Numeric => "NUMERIC",
            BaseType::Float => "FLOAT",
            BaseType::Double => "DOUBLE",
            BaseType::Char => "CHAR",
            BaseType::Varchar => "VARCHAR",
            BaseType::Text => "TEXT",
            BaseType::Date => "DATE",
            BaseType::Time => "TIME",
            BaseType::Timestamp => "TIMESTAMP",
            BaseType::Boolean => "BOOLEAN",
            BaseType::Blob => "BLOB",
            BaseType::Json => "JSON",
        })?;
        if let Some(len) = self.length {
            write!(f, "({len})")?;
        }
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => write!(f, "({p}, {s})")?,
            (Some(p), None) => write!(f, "({p})")?,
            _ => {}
        }
        if let Some(ref cs) = self.charset {
            write!(f, " CHARACTER SET {cs}")?;
        }
        if let Some(ref c) = self.collation {
            write!(f, " COLLATE {c}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Foreign keys and constraints
// ---------------------------------------------------------------------------

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        })
    }
}

impl fmt::Display for ForeignKeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REFERENCES {}", self.table)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match self.match_type {
            Some(FkMatchType::Simple) => f.write_str(" MATCH SIMPLE")?,
            Some(FkMatchType::Partial) => f.write_str(" MATCH PARTIAL")?,
            Some(FkMatchType::Full) => f.write_str(" MATCH FULL")?,
            None => {}
        }
        if let Some(act) = self.on_delete {
            write!(f, " ON DELETE {act}")?;
        }
        if let Some(act) = self.on_update {
            write!(f, " ON UPDATE {act}")?;
        }
        match self.enforced {
            Some(true) => f.write_str(" ENFORCED")?,
            Some(false) => f.write_str(" NOT ENFORCED")?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.name {
            write!(f, "CONSTRAINT {name} ")?;
        }
        match &self.kind {
            TableConstraintKind::PrimaryKey { columns } => {
                f.write_str("PRIMARY KEY (")?;
                ident_list(f, columns)?;
                f.write_str(")")?;
            }
            TableConstraintKind::ForeignKey { columns, reference } => {
                f.write_str("FOREIGN KEY (")?;
                ident_list(f, columns)?;
                write!(f, ") {reference}")?;
            }
            TableConstraintKind::Unique { columns } => {
                f.write_str("UNIQUE (")?;
                ident_list(f, columns)?;
                f.write_str(")")?;
            }
            TableConstraintKind::Check(expr) => write!(f, "CHECK ({expr})")?,
        }
        if self.deferrable {
            f.write_str(" DEFERRABLE")?;
        }
        match self.initially {
            Some(ConstraintTiming::Immediate) => f.write_str(" INITIALLY IMMEDIATE")?,
            Some(ConstraintTiming::Deferred) => f.write_str(" INITIALLY DEFERRED")?,
            None => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CREATE TABLE
// ---------------------------------------------------------------------------

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        if self.primary_key {
            f.write_str(" PRIMARY KEY")?;
        }
        if self.unique {
            f.write_str(" UNIQUE")?;
        }
        if self.auto_increment {
            f.write_str(" AUTO_INCREMENT")?;
        }
        if let Some(ref d) = self.default {
            write!(f, " DEFAULT {d}")?;
        }
        if let Some(ref c) = self.check {
            write!(f, " CHECK ({c})")?;
        }
        if let Some(ref r) = self.references {
            write!(f, " {r}")?;
        }
        if let Some(ref c) = self.comment {
            f.write_str(" COMMENT ")?;
            write_string_literal(f, c)?;
        }
        if let Some(ref c) = self.collation {
            write!(f, " COLLATE {c}")?;
        }
        if let Some(ref g) = self.generated {
            write!(f, " AS ({})", g.expr)?;
            match g.storage {
                Some(GeneratedStorage::Stored) => f.write_str(" STORED")?,
                Some(GeneratedStorage::Virtual) => f.write_str(" VIRTUAL")?,
                None => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(" ")
            }
        };
        if let Some(ref v) = self.engine {
            sep(f)?;
            write!(f, "ENGINE = {v}")?;
        }
        if let Some(v) = self.auto_increment {
            sep(f)?;
            write!(f, "AUTO_INCREMENT = {v}")?;
        }
        if let Some(ref v) = self.charset {
            sep(f)?;
            write!(f, "CHARSET = {v}")?;
        }
        if let Some(ref v) = self.collate {
            sep(f)?;
            write!(f, "COLLATE = {v}")?;
        }
        if let Some(ref v) = self.comment {
            sep(f)?;
            f.write_str("COMMENT = ")?;
            write_string_literal(f, v)?;
        }
        if let Some(ref v) = self.row_format {
            sep(f)?;
            write!(f, "ROW_FORMAT = {v}")?;
        }
        if let Some(v) = self.key_block_size {
            sep(f)?;
            write!(f, "KEY_BLOCK_SIZE = {v}")?;
        }
        if let Some(v) = self.max_rows {
            sep(f)?;
            write!(f, "MAX_ROWS = {v}")?;
        }
        if let Some(v) = self.min_rows {
            sep(f)?;
            write!(f, "MIN_ROWS = {v}")?;
        }
        if let Some(ref v) = self.tablespace {
            sep(f)?;
            write!(f, "TABLESPACE = {v}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PartitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PARTITION BY ")?;
        f.write_str(match self.kind {
            PartitionKind::Range => "RANGE",
            PartitionKind::List => "LIST",
            PartitionKind::Hash => "HASH",
        })?;
        f.write_str(" (")?;
        ident_list(f, &self.columns)?;
        f.write_str(")")?;
        if let Some(n) = self.partitions {
            write!(f, " PARTITIONS {n}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateTableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TABLE {} (", self.name)?;
        let mut wrote = false;
        for col in &self.columns {
            if wrote {
                f.write_str(", ")?;
            }
            write!(f, "{col}")?;
            wrote = true;
        }
        for con in &self.constraints {
            if wrote {
                f.write_str(", ")?;
            }
            write!(f, "{con}")?;
            wrote = true;
        }
        f.write_str(")")?;
        if !self.options.is_empty() {
            write!(f, " {}", self.options)?;
        }
        if let Some(ref p) = self.partition {
            write!(f, " {p}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CREATE INDEX / VIEW / SEQUENCE / TRIGGER / routines
// ---------------------------------------------------------------------------

impl fmt::Display for IndexColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(len) = self.length {
            write!(f, "({len})")?;
        }
        if !self.ascending {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateIndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        write!(f, "INDEX {} ON {} (", self.name, self.table)?;
        comma_list(f, &self.columns)?;
        f.write_str(")")?;
        if let Some(ref t) = self.index_type {
            write!(f, " USING {t}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateViewDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VIEW {}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS {}", self.query)?;
        if self.with_check_option {
            f.write_str(" WITH CHECK OPTION")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateSequenceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SEQUENCE {}", self.name)?;
        if let Some(n) = self.start {
            write!(f, " START WITH {n}")?;
        }
        if let Some(n) = self.increment {
            write!(f, " INCREMENT BY {n}")?;
        }
        if let Some(n) = self.min_value {
            write!(f, " MINVALUE {n}")?;
        }
        if let Some(n) = self.max_value {
            write!(f, " MAXVALUE {n}")?;
        }
        if self.cycle {
            f.write_str(" CYCLE")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateTriggerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRIGGER {} ", self.name)?;
        f.write_str(match self.timing {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        })?;
        f.write_str(match self.event {
            TriggerEvent::Insert => " INSERT",
            TriggerEvent::Update => " UPDATE",
            TriggerEvent::Delete => " DELETE",
        })?;
        write!(f, " ON {}", self.table)?;
        if self.for_each_row {
            f.write_str(" FOR EACH ROW")?;
        }
        if let Some(ref w) = self.when {
            write!(f, " WHEN ({w})")?;
        }
        f.write_str(" BEGIN")?;
        for stmt in &self.body {
            write!(f, " {stmt};")?;
        }
        f.write_str(" END")
    }
}

impl fmt::Display for RoutineParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(ParameterDirection::In) => f.write_str("IN ")?,
            Some(ParameterDirection::Out) => f.write_str("OUT ")?,
            Some(ParameterDirection::InOut) => f.write_str("INOUT ")?,
            None => {}
        }
        write!(f, "{} {}", self.name, self.data_type)
    }
}

impl fmt::Display for CreateRoutineDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            RoutineKind::Procedure => "PROCEDURE ",
            RoutineKind::Function => "FUNCTION ",
        })?;
        write!(f, "{}(", self.name)?;
        comma_list(f, &self.parameters)?;
        f.write_str(")")?;
        if let Some(ref ret) = self.returns {
            write!(f, " RETURNS {ret}")?;
        }
        f.write_str(" BEGIN")?;
        for stmt in &self.body {
            write!(f, " {stmt};")?;
        }
        f.write_str(" END")
    }
}

impl fmt::Display for CreateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        match &self.body {
            CreateBody::Table(def) => write!(f, "{def}"),
            CreateBody::Index(def) => write!(f, "{def}"),
            CreateBody::View(def) => {
                // OR REPLACE follows the VIEW keyword in this dialect.
                if self.or_replace {
                    write!(f, "VIEW OR REPLACE {}", ViewTail(def))
                } else {
                    write!(f, "{def}")
                }
            }
            CreateBody::Sequence(def) => write!(f, "{def}"),
            CreateBody::Trigger(def) => write!(f, "{def}"),
            CreateBody::Routine(def) => write!(f, "{def}"),
        }
    }
}

/// View definition without its leading `VIEW ` keyword, for the
/// `VIEW OR REPLACE name` ordering.
struct ViewTail<'a>(&'a CreateViewDef);

impl fmt::Display for ViewTail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.0;
        f.write_str(&def.name)?;
        if !def.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &def.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS {}", def.query)?;
        if def.with_check_option {
            f.write_str(" WITH CHECK OPTION")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ALTER TABLE
// ---------------------------------------------------------------------------

impl fmt::Display for AlterTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ALTER TABLE ")?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        if self.only {
            f.write_str("ONLY ")?;
        }
        write!(f, "{} {}", self.table, self.action)
    }
}

impl fmt::Display for AlterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddColumn { column, position } => {
                write!(f, "ADD COLUMN {column}")?;
                match position {
                    Some(ColumnPosition::First) => f.write_str(" FIRST")?,
                    Some(ColumnPosition::After(c)) => write!(f, " AFTER {c}")?,
                    None => {}
                }
                Ok(())
            }
            Self::DropColumn { name, cascade } => {
                write!(f, "DROP COLUMN {name}")?;
                if *cascade {
                    f.write_str(" CASCADE")?;
                }
                Ok(())
            }
            Self::ModifyColumn { column } => write!(f, "MODIFY COLUMN {column}"),
            Self::AddConstraint(con) => write!(f, "ADD {con}"),
            Self::DropConstraint { name, cascade } => {
                write!(f, "DROP CONSTRAINT {name}")?;
                if *cascade {
                    f.write_str(" CASCADE")?;
                }
                Ok(())
            }
            Self::RenameColumn { old_name, new_name } => {
                write!(f, "RENAME COLUMN {old_name} TO {new_name}")
            }
            Self::RenameTable { new_name } => write!(f, "RENAME TO {new_name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DROP / TRUNCATE
// ---------------------------------------------------------------------------

impl fmt::Display for DropStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DROP ")?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        f.write_str(match self.object {
            DropObject::Table => "TABLE ",
            DropObject::Index => "INDEX ",
            DropObject::View => "VIEW ",
            DropObject::Trigger => "TRIGGER ",
        })?;
        ident_list(f, &self.names)?;
        match self.behavior {
            Some(DropBehavior::Cascade) => f.write_str(" CASCADE")?,
            Some(DropBehavior::Restrict) => f.write_str(" RESTRICT")?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for TruncateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRUNCATE TABLE {}", self.table)
    }
}

// ---------------------------------------------------------------------------
// GRANT / REVOKE
// ---------------------------------------------------------------------------

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            PrivilegeKind::Select => "SELECT",
            PrivilegeKind::Insert => "INSERT",
            PrivilegeKind::Update => "UPDATE",
            PrivilegeKind::Delete => "DELETE",
            PrivilegeKind::Truncate => "TRUNCATE",
            PrivilegeKind::References => "REFERENCES",
            PrivilegeKind::Trigger => "TRIGGER",
            PrivilegeKind::All => "ALL",
        })?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for GrantRevokeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grant = self.operation == GrantOperation::Grant;
        f.write_str(if grant { "GRANT " } else { "REVOKE " })?;
        comma_list(f, &self.privileges)?;
        f.write_str(" ON ")?;
        match self.object_type {
            // A bare object list means TABLE.
            GrantObjectType::Table => {}
            GrantObjectType::View => f.write_str("VIEW ")?,
            GrantObjectType::Procedure => f.write_str("PROCEDURE ")?,
            GrantObjectType::Function => f.write_str("FUNCTION ")?,
            GrantObjectType::Database => f.write_str("DATABASE ")?,
        }
        ident_list(f, &self.objects)?;
        f.write_str(if grant { " TO " } else { " FROM " })?;
        ident_list(f, &self.grantees)?;
        if self.with_grant_option {
            f.write_str(" WITH GRANT OPTION")?;
        }
        if self.cascade {
            f.write_str(" CASCADE")?;
        }
        Ok(())
    }
}
