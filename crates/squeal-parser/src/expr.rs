// Expression parsing.
//
// Pratt precedence climbing with the ladder (loosest to tightest):
//
//   OR
//   AND
//   NOT (prefix)
//   = <> != < > <= >= LIKE IN, IS [NOT] NULL (postfix)
//   + -
//   * / %
//
// All binary operators are left-associative. Window specifications and
// CASE expressions are parsed here as well, since they only occur in
// expression position.

use squeal_ast::{
    BinaryOperator, ColumnRef, Expr, Frame, FrameBound, FrameExclude, FrameKind, Literal, Span,
    UnaryOperator, WindowSpec,
};

use crate::parser::{ParseError, Parser};
use crate::token::{Lexeme, LexemeKind};

// Binding powers: higher binds tighter. Left BP is compared against the
// minimum; right BP is passed down for the right operand.
mod bp {
    pub const OR: (u8, u8) = (1, 2);
    pub const AND: (u8, u8) = (3, 4);
    /// Prefix NOT right binding power.
    pub const NOT_PREFIX: u8 = 5;
    pub const COMPARISON: (u8, u8) = (7, 8);
    pub const ADDITIVE: (u8, u8) = (9, 10);
    pub const MULTIPLICATIVE: (u8, u8) = (11, 12);
}

impl Parser {
    /// Parse a single expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_expr_bp(0);
        self.leave_recursion();
        result
    }

    // ── Pratt core ──────────────────────────────────────────────────────

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Postfix IS [NOT] NULL sits at comparison precedence.
            if self.at_kw("IS") {
                if bp::COMPARISON.0 < min_bp {
                    break;
                }
                self.advance();
                let not = self.eat_kw("NOT");
                self.expect_kw("NULL")?;
                let span = lhs.span();
                lhs = Expr::Unary {
                    op: if not {
                        UnaryOperator::IsNotNull
                    } else {
                        UnaryOperator::IsNull
                    },
                    operand: Box::new(lhs),
                    span,
                };
                continue;
            }

            let Some((op, l_bp, r_bp)) = self.peek_infix_op() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();

            let rhs = if op == BinaryOperator::In {
                self.parse_in_rhs()?
            } else {
                self.parse_expr_bp(r_bp)?
            };
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
                span,
            };
        }

        Ok(lhs)
    }

    /// The infix operator starting at the current lexeme, if any.
    fn peek_infix_op(&self) -> Option<(BinaryOperator, u8, u8)> {
        let lexeme = self.current();
        let (op, (l, r)) = match lexeme.kind {
            LexemeKind::Operator => match lexeme.text.as_str() {
                "=" => (BinaryOperator::Eq, bp::COMPARISON),
                "<>" | "!=" => (BinaryOperator::Ne, bp::COMPARISON),
                "<" => (BinaryOperator::Lt, bp::COMPARISON),
                ">" => (BinaryOperator::Gt, bp::COMPARISON),
                "<=" => (BinaryOperator::Le, bp::COMPARISON),
                ">=" => (BinaryOperator::Ge, bp::COMPARISON),
                "+" => (BinaryOperator::Add, bp::ADDITIVE),
                "-" => (BinaryOperator::Subtract, bp::ADDITIVE),
                "*" => (BinaryOperator::Multiply, bp::MULTIPLICATIVE),
                "/" => (BinaryOperator::Divide, bp::MULTIPLICATIVE),
                "%" => (BinaryOperator::Modulo, bp::MULTIPLICATIVE),
                _ => return None,
            },
            LexemeKind::Keyword => {
                if lexeme.is_keyword("OR") {
                    (BinaryOperator::Or, bp::OR)
                } else if lexeme.is_keyword("AND") {
                    (BinaryOperator::And, bp::AND)
                } else if lexeme.is_keyword("LIKE") {
                    (BinaryOperator::Like, bp::COMPARISON)
                } else if lexeme.is_keyword("IN") {
                    (BinaryOperator::In, bp::COMPARISON)
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        Some((op, l, r))
    }

    // ── Prefix ──────────────────────────────────────────────────────────

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let lexeme = self.current().clone();
        match lexeme.kind {
            LexemeKind::Number => {
                self.advance();
                Ok(Expr::Literal(parse_number(&lexeme)?, lexeme.span))
            }
            LexemeKind::StringLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::String(lexeme.text), lexeme.span))
            }
            LexemeKind::Keyword if lexeme.is_keyword("NULL") => {
                self.advance();
                Ok(Expr::Literal(Literal::Null, lexeme.span))
            }
            LexemeKind::Keyword if lexeme.is_keyword("TRUE") => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true), lexeme.span))
            }
            LexemeKind::Keyword if lexeme.is_keyword("FALSE") => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false), lexeme.span))
            }
            LexemeKind::Keyword if lexeme.is_keyword("NOT") => {
                self.advance();
                let operand = self.parse_expr_bp(bp::NOT_PREFIX)?;
                let span = lexeme.span.merge(operand.span());
                Ok(Expr::Unary {
                    op: UnaryOperator::Not,
                    operand: Box::new(operand),
                    span,
                })
            }
            LexemeKind::Keyword if lexeme.is_keyword("EXISTS") => {
                self.advance();
                let operand = self.parse_parenthesized_subquery()?;
                let span = lexeme.span.merge(operand.span());
                Ok(Expr::Unary {
                    op: UnaryOperator::Exists,
                    operand: Box::new(operand),
                    span,
                })
            }
            LexemeKind::Keyword if lexeme.is_keyword("CASE") => {
                self.advance();
                self.parse_case_expr(lexeme.span)
            }
            LexemeKind::Operator if lexeme.text == "(" => {
                if self.peek(1).is_keyword("SELECT") {
                    return self.parse_parenthesized_subquery();
                }
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_op(")")?;
                Ok(inner)
            }
            LexemeKind::Identifier => {
                self.advance();
                self.parse_identifier_expr(lexeme)
            }
            _ => Err(ParseError::unexpected("an expression", &lexeme)),
        }
    }

    /// `name(args)`, `name.column`, `name.*`, or a bare column.
    fn parse_identifier_expr(&mut self, name: Lexeme) -> Result<Expr, ParseError> {
        if self.at_op("(") {
            return self.parse_function_call(name);
        }
        if self.at_op(".") {
            self.advance();
            let column_lexeme = self.current().clone();
            let column = if self.eat_op("*") {
                "*".to_owned()
            } else if column_lexeme.kind == LexemeKind::Identifier {
                self.advance();
                column_lexeme.text.clone()
            } else {
                return Err(ParseError::unexpected(
                    "column name after '.'",
                    &column_lexeme,
                ));
            };
            let span = name.span.merge(column_lexeme.span);
            return Ok(Expr::Column(ColumnRef::qualified(name.text, column), span));
        }
        Ok(Expr::Column(ColumnRef::bare(name.text), name.span))
    }

    /// `( SELECT ... )` as an expression.
    fn parse_parenthesized_subquery(&mut self) -> Result<Expr, ParseError> {
        let open = self.current().clone();
        self.expect_op("(")?;
        self.expect_kw("SELECT")?;
        let query = self.parse_select(None)?;
        let close = self.current().clone();
        self.expect_op(")")?;
        Ok(Expr::Subquery {
            query: Box::new(query),
            alias: None,
            span: open.span.merge(close.span),
        })
    }

    // ── Function calls and windows ──────────────────────────────────────

    /// Parse a call; the name lexeme is consumed, the current lexeme is `(`.
    fn parse_function_call(&mut self, name: Lexeme) -> Result<Expr, ParseError> {
        self.expect_op("(")?;

        let mut star = false;
        let mut distinct = false;
        let mut args = Vec::new();

        // COUNT(*) is the one star-form call.
        if name.text.eq_ignore_ascii_case("COUNT") && self.at_op("*") {
            self.advance();
            star = true;
            self.expect_op(")")?;
        } else {
            if self.eat_kw("DISTINCT") {
                distinct = true;
            }
            if !self.eat_op(")") {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.eat_op(",") {
                        break;
                    }
                }
                self.expect_op(")")?;
            }
        }

        let over = if self.eat_kw("OVER") {
            Some(self.parse_window_spec()?)
        } else {
            None
        };

        let span = name.span.merge(self.prev_span());
        Ok(Expr::FunctionCall {
            name: name.text,
            args,
            distinct,
            star,
            over,
            span,
        })
    }

    /// The specification after OVER: a window name or a parenthesized spec.
    pub(crate) fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        if self.current().kind == LexemeKind::Identifier {
            let reference = self.parse_identifier()?;
            return Ok(WindowSpec {
                reference: Some(reference),
                partition_by: vec![],
                order_by: vec![],
                frame: None,
            });
        }

        self.expect_op("(")?;
        let mut spec = WindowSpec {
            reference: None,
            partition_by: vec![],
            order_by: vec![],
            frame: None,
        };
        loop {
            if self.eat_kw("PARTITION") {
                self.expect_kw("BY")?;
                spec.partition_by = self.parse_column_ref_list()?;
            } else if self.eat_kw("ORDER") {
                self.expect_kw("BY")?;
                spec.order_by = self.parse_order_by_list()?;
            } else if self.at_kw("ROWS") || self.at_kw("RANGE") || self.at_kw("GROUPS") {
                let kind = if self.eat_kw("ROWS") {
                    FrameKind::Rows
                } else if self.eat_kw("RANGE") {
                    FrameKind::Range
                } else {
                    self.advance();
                    FrameKind::Groups
                };
                spec.frame = Some(self.parse_frame(kind)?);
            } else {
                break;
            }
        }
        self.expect_op(")")?;
        Ok(spec)
    }

    fn parse_frame(&mut self, kind: FrameKind) -> Result<Frame, ParseError> {
        let (start, end) = if self.eat_kw("BETWEEN") {
            let start = self.parse_frame_bound()?;
            self.expect_kw("AND")?;
            let end = self.parse_frame_bound()?;
            (start, end)
        } else {
            // A single bound describes both edges.
            let start = self.parse_frame_bound()?;
            let end = start.clone();
            (start, end)
        };

        let exclude = if self.eat_kw("EXCLUDE") {
            Some(if self.eat_kw("CURRENT") {
                self.expect_kw("ROW")?;
                FrameExclude::CurrentRow
            } else if self.eat_kw("GROUP") {
                FrameExclude::Group
            } else if self.eat_kw("TIES") {
                FrameExclude::Ties
            } else if self.eat_kw("NO") {
                self.expect_kw("OTHERS")?;
                FrameExclude::NoOthers
            } else {
                return Err(ParseError::unexpected(
                    "CURRENT ROW, GROUP, TIES, or NO OTHERS",
                    self.current(),
                ));
            })
        } else {
            None
        };

        Ok(Frame {
            kind,
            start,
            end,
            exclude,
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_kw("CURRENT") {
            self.expect_kw("ROW")?;
            return Ok(FrameBound::CurrentRow);
        }
        if self.eat_kw("UNBOUNDED") {
            if self.eat_kw("PRECEDING") {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_kw("FOLLOWING")?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        // An offset expression; parsed above AND so the BETWEEN separator
        // is not swallowed.
        let offset = self.parse_expr_bp(bp::ADDITIVE.0)?;
        if self.eat_kw("PRECEDING") {
            Ok(FrameBound::Preceding(Box::new(offset)))
        } else {
            self.expect_kw("FOLLOWING")?;
            Ok(FrameBound::Following(Box::new(offset)))
        }
    }

    // ── CASE ────────────────────────────────────────────────────────────

    /// CASE is consumed; `start` is its span.
    fn parse_case_expr(&mut self, start: Span) -> Result<Expr, ParseError> {
        let operand = if self.at_kw("WHEN") {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut when_then = Vec::new();
        while self.eat_kw("WHEN") {
            let when = self.parse_expr()?;
            self.expect_kw("THEN")?;
            let then = self.parse_expr()?;
            when_then.push((when, then));
        }
        if when_then.is_empty() {
            return Err(ParseError::grammar(
                "CASE requires at least one WHEN arm",
                self.current(),
            ));
        }

        let else_expr = if self.eat_kw("ELSE") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = self.current().span;
        self.expect_kw("END")?;

        Ok(Expr::Case {
            operand,
            when_then,
            else_expr,
            span: start.merge(end),
        })
    }

    // ── IN ──────────────────────────────────────────────────────────────

    /// The right-hand side of IN: `(subquery)` or `(expr [, expr]*)`.
    fn parse_in_rhs(&mut self) -> Result<Expr, ParseError> {
        if self.peek(1).is_keyword("SELECT") {
            return self.parse_parenthesized_subquery();
        }
        let open = self.current().clone();
        self.expect_op("(")?;
        let mut items = Vec::new();
        loop {
            items.push(self.parse_expr()?);
            if !self.eat_op(",") {
                break;
            }
        }
        let close = self.current().clone();
        self.expect_op(")")?;
        Ok(Expr::Tuple(items, open.span.merge(close.span)))
    }
}

/// Classify a number lexeme: a dot makes it floating, otherwise integer.
fn parse_number(lexeme: &Lexeme) -> Result<Literal, ParseError> {
    if lexeme.text.contains('.') {
        lexeme
            .text
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| ParseError::grammar("invalid numeric literal", lexeme))
    } else {
        lexeme
            .text
            .parse::<i64>()
            .map(Literal::Integer)
            .map_err(|_| ParseError::grammar("integer literal out of range", lexeme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squeal_ast::Expr;

    fn expr(sql: &str) -> Expr {
        let mut parser = Parser::from_sql(sql).expect("lex");
        let expr = parser.parse_expr().expect("parse");
        assert!(parser.at_eof(), "expression did not consume all input");
        expr
    }

    fn binary_op(e: &Expr) -> BinaryOperator {
        match e {
            Expr::Binary { op, .. } => *op,
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let e = expr("a + b * c");
        let Expr::Binary { op, left, right, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(*left, Expr::Column(_, _)));
        assert_eq!(binary_op(&right), BinaryOperator::Multiply);
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let e = expr("a + b >= c * 2");
        let Expr::Binary { op, left, right, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Ge);
        assert_eq!(binary_op(&left), BinaryOperator::Add);
        assert_eq!(binary_op(&right), BinaryOperator::Multiply);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let e = expr("a = 1 OR b = 2 AND c = 3");
        let Expr::Binary { op, left, right, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Or);
        assert_eq!(binary_op(&left), BinaryOperator::Eq);
        assert_eq!(binary_op(&right), BinaryOperator::And);
    }

    #[test]
    fn test_left_associativity() {
        let e = expr("a - b - c");
        let Expr::Binary { op, left, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Subtract);
        assert_eq!(binary_op(&left), BinaryOperator::Subtract);
    }

    #[test]
    fn test_not_binds_between_and_and_comparison() {
        let e = expr("NOT a = 1 AND b = 2");
        // NOT captures the comparison, AND combines the two sides.
        let Expr::Binary { op, left, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::And);
        let Expr::Unary { op, operand, .. } = *left else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::Not);
        assert_eq!(binary_op(&operand), BinaryOperator::Eq);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let e = expr("(a + b) * c");
        let Expr::Binary { op, left, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Multiply);
        assert_eq!(binary_op(&left), BinaryOperator::Add);
    }

    #[test]
    fn test_literals() {
        assert!(matches!(
            expr("42"),
            Expr::Literal(Literal::Integer(42), _)
        ));
        assert!(matches!(expr("3.5"), Expr::Literal(Literal::Float(_), _)));
        assert!(matches!(expr("NULL"), Expr::Literal(Literal::Null, _)));
        assert!(matches!(
            expr("TRUE"),
            Expr::Literal(Literal::Boolean(true), _)
        ));
        assert!(matches!(
            expr("'abc'"),
            Expr::Literal(Literal::String(s), _) if s == "abc"
        ));
    }

    #[test]
    fn test_qualified_column_and_star() {
        let Expr::Column(col, _) = expr("t.name") else {
            panic!("expected column");
        };
        assert_eq!(col.table.as_deref(), Some("t"));
        assert_eq!(col.column, "name");

        let Expr::Column(col, _) = expr("t.*") else {
            panic!("expected column");
        };
        assert_eq!(col.column, "*");
    }

    #[test]
    fn test_is_null_postfix() {
        let Expr::Unary { op, operand, .. } = expr("a IS NULL") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::IsNull);
        assert!(matches!(*operand, Expr::Column(_, _)));

        let Expr::Unary { op, .. } = expr("a IS NOT NULL") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::IsNotNull);
    }

    #[test]
    fn test_like_and_in() {
        assert_eq!(binary_op(&expr("name LIKE 'a%'")), BinaryOperator::Like);

        let Expr::Binary { op, right, .. } = expr("id IN (1, 2, 3)") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::In);
        let Expr::Tuple(items, _) = *right else {
            panic!("expected tuple");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_in_subquery() {
        let Expr::Binary { op, right, .. } = expr("id IN (SELECT id FROM t)") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::In);
        assert!(matches!(*right, Expr::Subquery { .. }));
    }

    #[test]
    fn test_exists_and_not_exists() {
        let Expr::Unary { op, operand, .. } = expr("EXISTS (SELECT id FROM t)") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::Exists);
        assert!(matches!(*operand, Expr::Subquery { .. }));

        let Expr::Unary { op, operand, .. } = expr("NOT EXISTS (SELECT id FROM t)") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOperator::Not);
        assert!(matches!(
            *operand,
            Expr::Unary {
                op: UnaryOperator::Exists,
                ..
            }
        ));
    }

    #[test]
    fn test_function_call_count_star() {
        let Expr::FunctionCall {
            name, args, star, ..
        } = expr("COUNT(*)")
        else {
            panic!("expected function call");
        };
        assert!(name.eq_ignore_ascii_case("COUNT"));
        assert!(star);
        assert!(args.is_empty());
    }

    #[test]
    fn test_function_call_distinct() {
        let Expr::FunctionCall {
            distinct, args, star, ..
        } = expr("COUNT(DISTINCT dept)")
        else {
            panic!("expected function call");
        };
        assert!(distinct);
        assert!(!star);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_star_only_for_count() {
        // SUM(*) is not a thing; the star does not parse as an argument.
        let mut parser = Parser::from_sql("SUM(*)").expect("lex");
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_case_expression() {
        let Expr::Case {
            operand,
            when_then,
            else_expr,
            ..
        } = expr("CASE WHEN a > 1 THEN 'big' ELSE 'small' END")
        else {
            panic!("expected case");
        };
        assert!(operand.is_none());
        assert_eq!(when_then.len(), 1);
        assert!(else_expr.is_some());
    }

    #[test]
    fn test_case_with_operand() {
        let Expr::Case { operand, when_then, .. } =
            expr("CASE status WHEN 1 THEN 'on' WHEN 0 THEN 'off' END")
        else {
            panic!("expected case");
        };
        assert!(operand.is_some());
        assert_eq!(when_then.len(), 2);
    }

    #[test]
    fn test_case_requires_when() {
        let mut parser = Parser::from_sql("CASE ELSE 1 END").expect("lex");
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_window_specification() {
        let Expr::FunctionCall { over, .. } =
            expr("rank() OVER (PARTITION BY dept ORDER BY salary DESC)")
        else {
            panic!("expected function call");
        };
        let win = over.expect("window spec");
        assert!(win.reference.is_none());
        assert_eq!(win.partition_by.len(), 1);
        assert_eq!(win.order_by.len(), 1);
        assert!(!win.order_by[0].ascending);
        assert!(win.frame.is_none());
    }

    #[test]
    fn test_named_window_reference() {
        let Expr::FunctionCall { over, .. } = expr("sum(x) OVER w") else {
            panic!("expected function call");
        };
        assert_eq!(over.expect("window").reference.as_deref(), Some("w"));
    }

    #[test]
    fn test_frame_between_bounds() {
        let Expr::FunctionCall { over, .. } =
            expr("sum(x) OVER (ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)")
        else {
            panic!("expected function call");
        };
        let frame = over.expect("window").frame.expect("frame");
        assert_eq!(frame.kind, FrameKind::Rows);
        assert!(matches!(frame.start, FrameBound::Preceding(_)));
        assert_eq!(frame.end, FrameBound::CurrentRow);
        assert!(frame.exclude.is_none());
    }

    #[test]
    fn test_frame_single_bound_mirrors() {
        let Expr::FunctionCall { over, .. } = expr("sum(x) OVER (ROWS CURRENT ROW)") else {
            panic!("expected function call");
        };
        let frame = over.expect("window").frame.expect("frame");
        assert_eq!(frame.start, FrameBound::CurrentRow);
        assert_eq!(frame.end, FrameBound::CurrentRow);
    }

    #[test]
    fn test_frame_exclude() {
        let Expr::FunctionCall { over, .. } =
            expr("sum(x) OVER (GROUPS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING EXCLUDE NO OTHERS)")
        else {
            panic!("expected function call");
        };
        let frame = over.expect("window").frame.expect("frame");
        assert_eq!(frame.kind, FrameKind::Groups);
        assert_eq!(frame.exclude, Some(FrameExclude::NoOthers));
    }

    #[test]
    fn test_unexpected_token_in_expression() {
        let mut parser = Parser::from_sql("WHERE").expect("lex");
        let err = parser.parse_expr().unwrap_err();
        assert!(err.message.contains("expected an expression"));
    }
}
