//! Print-parse round-trip and input-perturbation properties.
//!
//! Every statement the parser accepts must print to SQL text that parses
//! back to a structurally equal AST. Whitespace runs between lexemes and
//! the casing of keywords must not affect the result.

use proptest::prelude::*;
use squeal_parser::{parse, Lexeme, LexemeKind, Lexer};

/// Statements covering the accepted SQL surface.
static CORPUS: &[&str] = &[
    // SELECT
    "SELECT id, name FROM users WHERE age >= 18",
    "SELECT * FROM t",
    "SELECT DISTINCT u.name AS n FROM users u",
    "SELECT dept, COUNT(*) FROM emp GROUP BY dept HAVING COUNT(*) > 3 \
     ORDER BY dept DESC NULLS LAST LIMIT 10 OFFSET 20",
    "SELECT * FROM app.users",
    "SELECT * FROM (SELECT id FROM users) AS u",
    "WITH RECURSIVE nums (n) AS (SELECT one FROM dual) SELECT n FROM nums",
    // Joins
    "SELECT u.id, o.order_id FROM users u INNER JOIN orders o ON u.id = o.user_id",
    "SELECT * FROM users LEFT JOIN orders USING (id)",
    "SELECT * FROM users NATURAL JOIN orders",
    "SELECT * FROM a CROSS JOIN b",
    "SELECT * FROM a RIGHT OUTER JOIN b ON a.x = b.y FULL JOIN c ON b.y = c.z",
    "SELECT * FROM a, b, c",
    // Expressions
    "SELECT * FROM t WHERE id IN (1, 2, 3) AND name LIKE 'a%' OR flag IS NULL",
    "SELECT * FROM t WHERE a + b * c - d / e % f > 0",
    "SELECT * FROM t WHERE NOT a = 1 AND b IS NOT NULL",
    "SELECT * FROM t WHERE NOT EXISTS (SELECT id FROM s)",
    "SELECT * FROM t WHERE a = (SELECT max(b) FROM s)",
    "SELECT * FROM t WHERE id IN (SELECT id FROM s)",
    "SELECT CASE WHEN a > 1 THEN 'big' ELSE 'small' END FROM t",
    "SELECT CASE status WHEN 1 THEN 'on' WHEN 0 THEN 'off' END FROM t",
    "SELECT t.* FROM t",
    "SELECT 'it''s' FROM t",
    // Window functions
    "SELECT COUNT(*) OVER (PARTITION BY dept ORDER BY hired \
     ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM emp",
    "SELECT sum(x) OVER w FROM t",
    "SELECT avg(x) OVER (RANGE 2 PRECEDING EXCLUDE TIES) FROM t",
    "SELECT COUNT(DISTINCT dept) FROM emp",
    // DML
    "INSERT INTO t (a, b) VALUES (1, 'x''y'), (2, 'z')",
    "INSERT INTO t SELECT a FROM s",
    "INSERT INTO t (a) VALUES (1) ON DUPLICATE KEY UPDATE a = 2, b = 3",
    "UPDATE users SET age = age + 1, active = TRUE WHERE id = 7 ORDER BY id LIMIT 1",
    "DELETE FROM logs USING sessions s WHERE logs.sid = s.id ORDER BY ts LIMIT 100",
    "MERGE INTO tgt USING src ON tgt.id = src.id \
     WHEN MATCHED AND src.flag = 1 THEN UPDATE SET v = src.v \
     WHEN NOT MATCHED THEN INSERT (id, v) VALUES (src.id, src.v) \
     WHEN NOT MATCHED BY SOURCE THEN DELETE",
    // DDL
    "CREATE TABLE users (id INTEGER PRIMARY KEY AUTO_INCREMENT, \
     name VARCHAR(64) NOT NULL, bio TEXT, balance DECIMAL(10, 2) DEFAULT 0)",
    "CREATE IF NOT EXISTS TABLE t (a INTEGER)",
    "CREATE TABLE orders (id INTEGER, user_id INTEGER, PRIMARY KEY (id), \
     CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users (id) \
     MATCH FULL ON DELETE CASCADE ON UPDATE SET NULL, UNIQUE (user_id), CHECK (id > 0))",
    "CREATE TABLE t (a INTEGER) ENGINE = InnoDB AUTO_INCREMENT = 100 \
     CHARSET = utf8mb4 COMMENT = 'audit log' KEY_BLOCK_SIZE = 8",
    "CREATE TABLE metrics (day DATE) PARTITION BY RANGE (day) PARTITIONS 12",
    "CREATE TABLE t (a INTEGER REFERENCES u (id) NOT ENFORCED NOT NULL)",
    "CREATE UNIQUE INDEX idx_name ON users (name(16) DESC, id) USING btree",
    "CREATE VIEW adults (id, age) AS SELECT id, age FROM users WHERE age >= 18 \
     WITH CHECK OPTION",
    "CREATE VIEW OR REPLACE v AS SELECT a FROM t",
    "ALTER TABLE users ADD COLUMN age INTEGER NOT NULL AFTER name",
    "ALTER TABLE t ADD CONSTRAINT pk PRIMARY KEY (id)",
    "ALTER TABLE t DROP COLUMN a CASCADE",
    "ALTER TABLE IF EXISTS ONLY t RENAME TO u",
    "ALTER TABLE t MODIFY COLUMN a BIGINT NOT NULL",
    "ALTER TABLE t RENAME COLUMN a TO b",
    "DROP TABLE a, b CASCADE",
    "DROP IF EXISTS VIEW v RESTRICT",
    "TRUNCATE TABLE audit",
    // DCL
    "GRANT SELECT (id, name), UPDATE ON users, orders TO alice, bob WITH GRANT OPTION",
    "REVOKE ALL ON DATABASE app FROM carol CASCADE",
];

#[test]
fn test_print_parse_round_trip() {
    for sql in CORPUS {
        let ast = parse(sql).unwrap_or_else(|e| panic!("parse `{sql}`: {e}"));
        let printed = ast.to_string();
        let reparsed =
            parse(&printed).unwrap_or_else(|e| panic!("reparse of `{printed}`: {e}"));
        assert_eq!(ast, reparsed, "round-trip changed the AST for `{sql}`");
    }
}

#[test]
fn test_second_round_trip_is_fixed_point() {
    // print(parse(print(parse(x)))) must equal print(parse(x)).
    for sql in CORPUS {
        let printed = parse(sql).expect("parse").to_string();
        let reprinted = parse(&printed).expect("reparse").to_string();
        assert_eq!(printed, reprinted, "printer is not a fixed point for `{sql}`");
    }
}

#[test]
fn test_parse_is_deterministic() {
    for sql in CORPUS {
        assert_eq!(parse(sql).expect("a"), parse(sql).expect("b"), "{sql}");
    }
}

// ---------------------------------------------------------------------------
// Perturbation helpers
// ---------------------------------------------------------------------------

/// Re-encode a lexeme as SQL text.
fn render_lexeme(lexeme: &Lexeme) -> String {
    match lexeme.kind {
        LexemeKind::StringLiteral => {
            format!(
                "'{}'",
                lexeme.text.replace('\\', "\\\\").replace('\'', "''")
            )
        }
        _ => lexeme.text.clone(),
    }
}

/// Rebuild source text from lexemes with the given separators between them.
fn rebuild(lexemes: &[Lexeme], separator_for: impl Fn(usize) -> String) -> String {
    let mut out = String::new();
    for (i, lexeme) in lexemes.iter().enumerate() {
        if lexeme.kind == LexemeKind::EndOfInput {
            break;
        }
        if i > 0 {
            out.push_str(&separator_for(i));
        }
        out.push_str(&render_lexeme(lexeme));
    }
    out
}

fn toggle_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

proptest! {
    /// Inserting arbitrary whitespace runs between lexemes yields the
    /// same AST.
    #[test]
    fn prop_whitespace_invariance(
        idx in 0..CORPUS.len(),
        seps in prop::collection::vec(
            prop::sample::select(vec![" ", "  ", "\t", "\n", " \n\t  "]),
            0..160,
        ),
    ) {
        let sql = CORPUS[idx];
        let lexemes = Lexer::tokenize(sql).expect("tokenize");
        let perturbed = rebuild(&lexemes, |i| {
            (*seps.get(i).unwrap_or(&" ")).to_owned()
        });
        prop_assert_eq!(
            parse(sql).expect("original"),
            parse(&perturbed).expect("perturbed")
        );
    }

    /// Flipping the case of any subset of keywords yields the same AST.
    #[test]
    fn prop_keyword_case_invariance(
        idx in 0..CORPUS.len(),
        flips in prop::collection::vec(any::<bool>(), 0..160),
    ) {
        let sql = CORPUS[idx];
        let mut lexemes = Lexer::tokenize(sql).expect("tokenize");
        for (i, lexeme) in lexemes.iter_mut().enumerate() {
            if lexeme.kind == LexemeKind::Keyword && flips.get(i).copied().unwrap_or(false) {
                lexeme.text = toggle_case(&lexeme.text);
            }
        }
        let perturbed = rebuild(&lexemes, |_| " ".to_owned());
        prop_assert_eq!(
            parse(sql).expect("original"),
            parse(&perturbed).expect("perturbed")
        );
    }

    /// Any printable-ASCII string content survives an encode-parse-print
    /// cycle.
    #[test]
    fn prop_string_escape_round_trip(content in "[ -~]{0,40}") {
        let encoded = content.replace('\\', "\\\\").replace('\'', "''");
        let sql = format!("SELECT '{encoded}' FROM t");
        let ast = parse(&sql).expect("parse");

        let squeal_ast::Statement::Select(ref select) = ast else {
            panic!("expected SELECT");
        };
        let squeal_ast::Expr::Literal(squeal_ast::Literal::String(ref decoded), _) =
            select.columns[0]
        else {
            panic!("expected string literal");
        };
        prop_assert_eq!(decoded, &content);

        // And the printed form re-parses to the same AST.
        let reparsed = parse(&ast.to_string()).expect("reparse");
        prop_assert_eq!(ast, reparsed);
    }

    /// Lexeme coordinates never move backwards (line, column ordering).
    #[test]
    fn prop_positions_monotonic(idx in 0..CORPUS.len()) {
        let lexemes = Lexer::tokenize(CORPUS[idx]).expect("tokenize");
        for pair in lexemes.windows(2) {
            prop_assert!((pair[1].line, pair[1].col) >= (pair[0].line, pair[0].col));
        }
    }
}
