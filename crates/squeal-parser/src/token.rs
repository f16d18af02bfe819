// SQL lexeme model.
//
// The lexer classifies coarsely: one Keyword kind for every keyword, one
// Operator kind for every operator and punctuation character. The parser
// decides roles (and keyword identity) by context, matching on kind + text.

use squeal_ast::Span;

/// Classification of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    /// Default state; never produced by the lexer.
    Undefined,
    /// A word matching the keyword table, any casing.
    Keyword,
    /// A word not in the keyword table: `[A-Za-z_][A-Za-z0-9_]*`.
    Identifier,
    /// Digits, optionally a dot and more digits. No sign, no exponent.
    Number,
    /// A single-quoted string. `text` holds the decoded contents.
    StringLiteral,
    /// Operators and punctuation, including `( ) , . * ;`.
    Operator,
    /// Reserved for hosts that re-tokenize with whitespace; never emitted.
    Punctuation,
    /// Reserved for hosts that re-tokenize with whitespace; never emitted.
    Whitespace,
    /// End of input. Produced repeatedly once the input is exhausted.
    EndOfInput,
}

/// A single classified lexeme with its source coordinates.
///
/// `line` and `col` are 1-based and point at the lexeme's first character.
/// For string literals `text` is the decoded content, never the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    /// Byte-offset span into the source.
    pub span: Span,
    pub line: u32,
    pub col: u32,
}

impl Lexeme {
    /// The end-of-input sentinel at the given position.
    #[must_use]
    pub fn end_of_input(span: Span, line: u32, col: u32) -> Self {
        Self {
            kind: LexemeKind::EndOfInput,
            text: String::new(),
            span,
            line,
            col,
        }
    }

    /// Whether this lexeme is a keyword equal to `kw` (case-insensitive).
    /// `kw` must be given uppercase.
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        debug_assert!(kw.chars().all(|c| !c.is_ascii_lowercase()));
        self.kind == LexemeKind::Keyword && self.text.eq_ignore_ascii_case(kw)
    }

    /// Whether this lexeme is an operator with exactly the given text.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == LexemeKind::Operator && self.text == op
    }
}

/// The fixed keyword table. Matching is case-insensitive; the lexeme keeps
/// the source casing.
///
/// Sorted so membership is a binary search.
pub(crate) static KEYWORDS: &[&str] = &[
    "ACTION",
    "ADD",
    "AFTER",
    "ALL",
    "ALTER",
    "AND",
    "AS",
    "ASC",
    "AUTO_INCREMENT",
    "BETWEEN",
    "BY",
    "CASCADE",
    "CASE",
    "CHARACTER",
    "CHARSET",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMENT",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT",
    "DATABASE",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "DUPLICATE",
    "ELSE",
    "END",
    "ENFORCED",
    "ENGINE",
    "EXCLUDE",
    "EXISTS",
    "FALSE",
    "FETCH",
    "FIRST",
    "FOLLOWING",
    "FOREIGN",
    "FROM",
    "FULL",
    "FUNCTION",
    "GRANT",
    "GROUP",
    "GROUPS",
    "HASH",
    "HAVING",
    "IF",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "KEY_BLOCK_SIZE",
    "LAST",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LIST",
    "MATCH",
    "MATCHED",
    "MAX_ROWS",
    "MERGE",
    "MIN_ROWS",
    "MODIFY",
    "NATURAL",
    "NEXT",
    "NO",
    "NOT",
    "NULL",
    "NULLS",
    "OFFSET",
    "ON",
    "ONLY",
    "OPTION",
    "OR",
    "ORDER",
    "OTHERS",
    "OUTER",
    "OVER",
    "PARTIAL",
    "PARTITION",
    "PARTITIONS",
    "PRECEDING",
    "PRIMARY",
    "PRIVILEGES",
    "PROCEDURE",
    "RANGE",
    "RECURSIVE",
    "REFERENCES",
    "RENAME",
    "REPLACE",
    "RESTRICT",
    "REVOKE",
    "RIGHT",
    "ROW",
    "ROWS",
    "ROW_FORMAT",
    "SELECT",
    "SEQUENCE",
    "SET",
    "SIMPLE",
    "SOURCE",
    "TABLE",
    "TABLESPACE",
    "TARGET",
    "THEN",
    "TIES",
    "TO",
    "TRIGGER",
    "TRUE",
    "TRUNCATE",
    "UNBOUNDED",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WITH",
    "WITHOUT",
];

/// Whether `word` (any casing) is a keyword.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    let upper = word.to_ascii_uppercase();
    KEYWORDS.binary_search(&upper.as_str()).is_ok()
}
