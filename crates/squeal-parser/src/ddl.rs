// DDL statement parsing: CREATE, ALTER TABLE, DROP, and the shared pieces
// (data types, column definitions, constraints, foreign keys, MySQL-style
// table options, partitioning).

use squeal_ast::{
    AlterAction, AlterTableStatement, BaseType, ColumnDef, ColumnPosition, CreateBody,
    CreateIndexDef, CreateStatement, CreateTableDef, CreateViewDef, DataType, DropBehavior,
    DropObject, DropStatement, FkMatchType, ForeignKeyReference, IndexColumn, PartitionKind,
    PartitionSpec, ReferentialAction, TableConstraint, TableConstraintKind, TableOptions,
};

use crate::parser::{ParseError, Parser};

impl Parser {
    // -----------------------------------------------------------------------
    // CREATE
    // -----------------------------------------------------------------------

    /// Parse a CREATE statement; the CREATE keyword is already consumed.
    pub(crate) fn parse_create(&mut self) -> Result<CreateStatement, ParseError> {
        let if_not_exists = if self.eat_kw("IF") {
            self.expect_kw("NOT")?;
            self.expect_kw("EXISTS")?;
            true
        } else {
            false
        };

        let mut or_replace = false;
        let body = if self.eat_kw("TABLE") {
            CreateBody::Table(self.parse_create_table()?)
        } else if self.eat_kw("UNIQUE") {
            self.expect_kw("INDEX")?;
            CreateBody::Index(self.parse_create_index(true)?)
        } else if self.eat_kw("INDEX") {
            CreateBody::Index(self.parse_create_index(false)?)
        } else if self.eat_kw("VIEW") {
            if self.eat_kw("OR") {
                self.expect_kw("REPLACE")?;
                or_replace = true;
            }
            CreateBody::View(self.parse_create_view()?)
        } else if self.at_kw("SEQUENCE")
            || self.at_kw("TRIGGER")
            || self.at_kw("PROCEDURE")
            || self.at_kw("FUNCTION")
        {
            let what = self.current().text.to_ascii_uppercase();
            return Err(ParseError::unsupported(
                format!("CREATE {what} is not supported by this front-end"),
                self.current(),
            ));
        } else {
            return Err(ParseError::unexpected("TABLE, INDEX, or VIEW", self.current()));
        };

        Ok(CreateStatement {
            if_not_exists,
            or_replace,
            body,
        })
    }

    // -----------------------------------------------------------------------
    // CREATE TABLE
    // -----------------------------------------------------------------------

    fn parse_create_table(&mut self) -> Result<CreateTableDef, ParseError> {
        let name = self.parse_identifier()?;
        self.expect_op("(")?;

        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        loop {
            if self.at_kw("CONSTRAINT")
                || self.at_kw("PRIMARY")
                || self.at_kw("FOREIGN")
                || self.at_kw("UNIQUE")
                || self.at_kw("CHECK")
            {
                constraints.push(self.parse_table_constraint()?);
            } else {
                columns.push(self.parse_column_def()?);
            }
            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;

        let options = self.parse_table_options()?;
        let partition = if self.at_kw("PARTITION") {
            Some(self.parse_partition_spec()?)
        } else {
            None
        };

        Ok(CreateTableDef {
            name,
            columns,
            constraints,
            options,
            partition,
        })
    }

    /// One column definition: name, data type, then constraints in any order.
    pub(crate) fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_identifier()?;
        let data_type = self.parse_data_type()?;
        let mut column = ColumnDef::new(name, data_type);

        loop {
            if self.eat_kw("NOT") {
                self.expect_kw("NULL")?;
                column.nullable = false;
            } else if self.eat_kw("NULL") {
                column.nullable = true;
            } else if self.eat_kw("DEFAULT") {
                column.default = Some(Box::new(self.parse_expr()?));
            } else if self.eat_kw("PRIMARY") {
                self.expect_kw("KEY")?;
                column.primary_key = true;
            } else if self.eat_kw("UNIQUE") {
                column.unique = true;
            } else if self.eat_kw("CHECK") {
                self.expect_op("(")?;
                column.check = Some(Box::new(self.parse_expr()?));
                self.expect_op(")")?;
            } else if self.eat_kw("REFERENCES") {
                column.references = Some(self.parse_fk_reference()?);
            } else if self.eat_kw("AUTO_INCREMENT") {
                column.auto_increment = true;
            } else if self.eat_kw("COMMENT") {
                column.comment = Some(self.parse_string()?);
            } else if self.eat_kw("COLLATE") {
                column.collation = Some(self.parse_identifier()?);
            } else {
                break;
            }
        }

        Ok(column)
    }

    // -----------------------------------------------------------------------
    // Data types
    // -----------------------------------------------------------------------

    /// Parse a data type name with its parameters. Type names lex as
    /// identifiers; the spelling is matched case-insensitively.
    pub(crate) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let lexeme = self.current().clone();
        let name = self.parse_identifier()?.to_ascii_uppercase();

        let mut data_type = match name.as_str() {
            "INT" | "INTEGER" => DataType::simple(BaseType::Integer),
            "BIGINT" => DataType::simple(BaseType::BigInt),
            "SMALLINT" => DataType::simple(BaseType::SmallInt),
            "DECIMAL" | "NUMERIC" => {
                let mut dt = DataType::simple(if name == "DECIMAL" {
                    BaseType::Decimal
                } else {
                    BaseType::Numeric
                });
                if self.eat_op("(") {
                    dt.precision = Some(self.parse_u32()?);
                    if self.eat_op(",") {
                        dt.scale = Some(self.parse_u32()?);
                    }
                    self.expect_op(")")?;
                }
                dt
            }
            "FLOAT" => DataType::simple(BaseType::Float),
            "DOUBLE" => {
                // Accept DOUBLE PRECISION as a spelling of DOUBLE.
                if self.current().text.eq_ignore_ascii_case("PRECISION") {
                    self.advance();
                }
                DataType::simple(BaseType::Double)
            }
            "CHAR" | "VARCHAR" => {
                let base = if name == "CHAR" {
                    BaseType::Char
                } else {
                    BaseType::Varchar
                };
                let mut dt = DataType::simple(base);
                if self.eat_op("(") {
                    dt.length = Some(self.parse_u32()?);
                    self.expect_op(")")?;
                } else if base == BaseType::Varchar {
                    return Err(ParseError::grammar(
                        "VARCHAR requires a length specification",
                        self.current(),
                    ));
                }
                dt
            }
            "TEXT" => DataType::simple(BaseType::Text),
            "DATE" => DataType::simple(BaseType::Date),
            "TIME" => DataType::simple(BaseType::Time),
            "TIMESTAMP" => DataType::simple(BaseType::Timestamp),
            "BOOLEAN" | "BOOL" => DataType::simple(BaseType::Boolean),
            "BLOB" => DataType::simple(BaseType::Blob),
            "JSON" => DataType::simple(BaseType::Json),
            _ => {
                return Err(ParseError::grammar(
                    format!("unknown data type: {name}"),
                    &lexeme,
                ));
            }
        };

        // Character set on string types.
        if self.eat_kw("CHARACTER") {
            self.expect_kw("SET")?;
            data_type.charset = Some(self.parse_identifier()?);
        } else if self.eat_kw("CHARSET") {
            data_type.charset = Some(self.parse_identifier()?);
        }

        Ok(data_type)
    }

    fn parse_u32(&mut self) -> Result<u32, ParseError> {
        let lexeme = self.current().clone();
        let value = self.parse_unsigned()?;
        u32::try_from(value)
            .map_err(|_| ParseError::grammar("length is out of range", &lexeme))
    }

    // -----------------------------------------------------------------------
    // Foreign keys
    // -----------------------------------------------------------------------

    /// Parse the clause after REFERENCES (already consumed).
    pub(crate) fn parse_fk_reference(&mut self) -> Result<ForeignKeyReference, ParseError> {
        let table = self.parse_identifier()?;
        let columns = if self.at_op("(") {
            self.parse_paren_ident_list()?
        } else {
            vec![]
        };

        let match_type = if self.eat_kw("MATCH") {
            Some(if self.eat_kw("SIMPLE") {
                FkMatchType::Simple
            } else if self.eat_kw("PARTIAL") {
                FkMatchType::Partial
            } else if self.eat_kw("FULL") {
                FkMatchType::Full
            } else {
                return Err(ParseError::unexpected(
                    "SIMPLE, PARTIAL, or FULL after MATCH",
                    self.current(),
                ));
            })
        } else {
            None
        };

        let mut on_delete = None;
        if self.eat_kw("ON") {
            if self.eat_kw("DELETE") {
                on_delete = Some(self.parse_referential_action()?);
            } else {
                // The ON opens an ON UPDATE clause; put it back.
                self.backup();
            }
        }
        let mut on_update = None;
        if self.eat_kw("ON") {
            self.expect_kw("UPDATE")?;
            on_update = Some(self.parse_referential_action()?);
        }

        let enforced = if self.eat_kw("ENFORCED") {
            Some(true)
        } else if self.at_kw("NOT") && self.peek(1).is_keyword("ENFORCED") {
            self.advance();
            self.advance();
            Some(false)
        } else {
            None
        };

        Ok(ForeignKeyReference {
            table,
            columns,
            match_type,
            on_delete,
            on_update,
            enforced,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        if self.eat_kw("RESTRICT") {
            Ok(ReferentialAction::Restrict)
        } else if self.eat_kw("CASCADE") {
            Ok(ReferentialAction::Cascade)
        } else if self.eat_kw("SET") {
            if self.eat_kw("NULL") {
                Ok(ReferentialAction::SetNull)
            } else if self.eat_kw("DEFAULT") {
                Ok(ReferentialAction::SetDefault)
            } else {
                Err(ParseError::unexpected(
                    "NULL or DEFAULT after SET",
                    self.current(),
                ))
            }
        } else if self.eat_kw("NO") {
            self.expect_kw("ACTION")?;
            Ok(ReferentialAction::NoAction)
        } else {
            Err(ParseError::unexpected(
                "RESTRICT, CASCADE, SET NULL, SET DEFAULT, or NO ACTION",
                self.current(),
            ))
        }
    }

    // -----------------------------------------------------------------------
    // Table constraints
    // -----------------------------------------------------------------------

    pub(crate) fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let name = if self.eat_kw("CONSTRAINT") {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        let kind = if self.eat_kw("PRIMARY") {
            self.expect_kw("KEY")?;
            TableConstraintKind::PrimaryKey {
                columns: self.parse_paren_ident_list()?,
            }
        } else if self.eat_kw("FOREIGN") {
            self.expect_kw("KEY")?;
            let columns = self.parse_paren_ident_list()?;
            self.expect_kw("REFERENCES")?;
            TableConstraintKind::ForeignKey {
                columns,
                reference: self.parse_fk_reference()?,
            }
        } else if self.eat_kw("UNIQUE") {
            TableConstraintKind::Unique {
                columns: self.parse_paren_ident_list()?,
            }
        } else if self.eat_kw("CHECK") {
            self.expect_op("(")?;
            let expr = self.parse_expr()?;
            self.expect_op(")")?;
            TableConstraintKind::Check(Box::new(expr))
        } else {
            return Err(ParseError::unexpected("a table constraint", self.current()));
        };

        Ok(TableConstraint {
            name,
            kind,
            deferrable: false,
            initially: None,
        })
    }

    // -----------------------------------------------------------------------
    // Table options & partitioning
    // -----------------------------------------------------------------------

    /// MySQL-flavored options after the column list. The `=` is optional,
    /// and options may be comma-separated.
    fn parse_table_options(&mut self) -> Result<TableOptions, ParseError> {
        let mut options = TableOptions::default();
        loop {
            if self.eat_kw("ENGINE") {
                let _ = self.eat_op("=");
                options.engine = Some(self.parse_identifier()?);
            } else if self.eat_kw("AUTO_INCREMENT") {
                let _ = self.eat_op("=");
                options.auto_increment = Some(self.parse_unsigned()?);
            } else if self.eat_kw("CHARACTER") {
                self.expect_kw("SET")?;
                let _ = self.eat_op("=");
                options.charset = Some(self.parse_identifier()?);
            } else if self.eat_kw("CHARSET") {
                let _ = self.eat_op("=");
                options.charset = Some(self.parse_identifier()?);
            } else if self.eat_kw("COLLATE") {
                let _ = self.eat_op("=");
                options.collate = Some(self.parse_identifier()?);
            } else if self.eat_kw("COMMENT") {
                let _ = self.eat_op("=");
                options.comment = Some(self.parse_string()?);
            } else if self.eat_kw("ROW_FORMAT") {
                let _ = self.eat_op("=");
                options.row_format = Some(self.parse_identifier()?);
            } else if self.eat_kw("KEY_BLOCK_SIZE") {
                let _ = self.eat_op("=");
                options.key_block_size = Some(self.parse_unsigned()?);
            } else if self.eat_kw("MAX_ROWS") {
                let _ = self.eat_op("=");
                options.max_rows = Some(self.parse_unsigned()?);
            } else if self.eat_kw("MIN_ROWS") {
                let _ = self.eat_op("=");
                options.min_rows = Some(self.parse_unsigned()?);
            } else if self.eat_kw("TABLESPACE") {
                let _ = self.eat_op("=");
                options.tablespace = Some(self.parse_identifier()?);
            } else {
                break;
            }
            let _ = self.eat_op(",");
        }
        Ok(options)
    }

    fn parse_partition_spec(&mut self) -> Result<PartitionSpec, ParseError> {
        self.expect_kw("PARTITION")?;
        self.expect_kw("BY")?;
        let kind = if self.eat_kw("RANGE") {
            PartitionKind::Range
        } else if self.eat_kw("LIST") {
            PartitionKind::List
        } else if self.eat_kw("HASH") {
            PartitionKind::Hash
        } else {
            return Err(ParseError::unexpected(
                "RANGE, LIST, or HASH",
                self.current(),
            ));
        };
        let columns = self.parse_paren_ident_list()?;
        let partitions = if self.eat_kw("PARTITIONS") {
            Some(self.parse_unsigned()?)
        } else {
            None
        };
        Ok(PartitionSpec {
            kind,
            columns,
            partitions,
        })
    }

    // -----------------------------------------------------------------------
    // CREATE INDEX
    // -----------------------------------------------------------------------

    fn parse_create_index(&mut self, unique: bool) -> Result<CreateIndexDef, ParseError> {
        let name = self.parse_identifier()?;
        self.expect_kw("ON")?;
        let table = self.parse_identifier()?;

        self.expect_op("(")?;
        let mut columns = Vec::new();
        loop {
            let col_name = self.parse_identifier()?;
            let length = if self.eat_op("(") {
                let len = self.parse_u32()?;
                self.expect_op(")")?;
                Some(len)
            } else {
                None
            };
            let ascending = if self.eat_kw("DESC") {
                false
            } else {
                let _ = self.eat_kw("ASC");
                true
            };
            columns.push(IndexColumn {
                name: col_name,
                length,
                ascending,
            });
            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;

        let index_type = if self.eat_kw("USING") {
            Some(self.parse_identifier()?)
        } else {
            None
        };

        Ok(CreateIndexDef {
            name,
            table,
            columns,
            unique,
            index_type,
        })
    }

    // -----------------------------------------------------------------------
    // CREATE VIEW
    // -----------------------------------------------------------------------

    fn parse_create_view(&mut self) -> Result<CreateViewDef, ParseError> {
        let name = self.parse_identifier()?;
        let columns = if self.at_op("(") {
            self.parse_paren_ident_list()?
        } else {
            vec![]
        };
        self.expect_kw("AS")?;
        self.expect_kw("SELECT")?;
        let query = self.parse_select(None)?;

        let with_check_option = if self.eat_kw("WITH") {
            self.expect_kw("CHECK")?;
            self.expect_kw("OPTION")?;
            true
        } else {
            false
        };

        Ok(CreateViewDef {
            name,
            columns,
            query: Box::new(query),
            with_check_option,
        })
    }

    // -----------------------------------------------------------------------
    // ALTER TABLE
    // -----------------------------------------------------------------------

    /// Parse an ALTER statement; the ALTER keyword is already consumed.
    pub(crate) fn parse_alter(&mut self) -> Result<AlterTableStatement, ParseError> {
        if !self.eat_kw("TABLE") {
            return Err(ParseError::unsupported(
                "only ALTER TABLE is supported",
                self.current(),
            ));
        }

        let if_exists = if self.eat_kw("IF") {
            self.expect_kw("EXISTS")?;
            true
        } else {
            false
        };
        let only = self.eat_kw("ONLY");
        let table = self.parse_identifier()?;

        // Trailing `*` means "including inheriting tables", which is the
        // default; it conflicts with ONLY.
        if self.at_op("*") {
            if only {
                return Err(ParseError::grammar(
                    "cannot specify both ONLY and *",
                    self.current(),
                ));
            }
            self.advance();
        }

        let action = self.parse_alter_action()?;

        Ok(AlterTableStatement {
            table,
            if_exists,
            only,
            action,
        })
    }

    fn parse_alter_action(&mut self) -> Result<AlterAction, ParseError> {
        if self.eat_kw("ADD") {
            if self.at_kw("CONSTRAINT")
                || self.at_kw("PRIMARY")
                || self.at_kw("FOREIGN")
                || self.at_kw("UNIQUE")
                || self.at_kw("CHECK")
            {
                return Ok(AlterAction::AddConstraint(self.parse_table_constraint()?));
            }
            let _ = self.eat_kw("COLUMN");
            let column = self.parse_column_def()?;
            let position = if self.eat_kw("FIRST") {
                Some(ColumnPosition::First)
            } else if self.eat_kw("AFTER") {
                Some(ColumnPosition::After(self.parse_identifier()?))
            } else {
                None
            };
            return Ok(AlterAction::AddColumn { column, position });
        }

        if self.eat_kw("DROP") {
            if self.eat_kw("COLUMN") {
                let name = self.parse_identifier()?;
                let cascade = self.eat_kw("CASCADE");
                return Ok(AlterAction::DropColumn { name, cascade });
            }
            if self.eat_kw("CONSTRAINT") {
                let name = self.parse_identifier()?;
                let cascade = self.eat_kw("CASCADE");
                return Ok(AlterAction::DropConstraint { name, cascade });
            }
            return Err(ParseError::unexpected(
                "COLUMN or CONSTRAINT after DROP",
                self.current(),
            ));
        }

        if self.eat_kw("MODIFY") {
            let _ = self.eat_kw("COLUMN");
            return Ok(AlterAction::ModifyColumn {
                column: self.parse_column_def()?,
            });
        }

        if self.eat_kw("RENAME") {
            if self.eat_kw("COLUMN") {
                let old_name = self.parse_identifier()?;
                self.expect_kw("TO")?;
                let new_name = self.parse_identifier()?;
                return Ok(AlterAction::RenameColumn { old_name, new_name });
            }
            self.expect_kw("TO")?;
            return Ok(AlterAction::RenameTable {
                new_name: self.parse_identifier()?,
            });
        }

        Err(ParseError::unexpected(
            "ADD, DROP, MODIFY, or RENAME",
            self.current(),
        ))
    }

    // -----------------------------------------------------------------------
    // DROP
    // -----------------------------------------------------------------------

    /// Parse a DROP statement; the DROP keyword is already consumed.
    pub(crate) fn parse_drop(&mut self) -> Result<DropStatement, ParseError> {
        let if_exists = if self.eat_kw("IF") {
            self.expect_kw("EXISTS")?;
            true
        } else {
            false
        };

        let object = if self.eat_kw("TABLE") {
            DropObject::Table
        } else if self.eat_kw("INDEX") {
            DropObject::Index
        } else if self.eat_kw("VIEW") {
            DropObject::View
        } else if self.eat_kw("TRIGGER") {
            DropObject::Trigger
        } else if self.at_kw("SEQUENCE") {
            return Err(ParseError::unsupported(
                "DROP SEQUENCE is not supported by this front-end",
                self.current(),
            ));
        } else {
            return Err(ParseError::unexpected(
                "TABLE, INDEX, VIEW, or TRIGGER",
                self.current(),
            ));
        };

        let mut names = Vec::new();
        loop {
            names.push(self.parse_identifier()?);
            if !self.eat_op(",") {
                break;
            }
        }

        let behavior = if self.eat_kw("CASCADE") {
            Some(DropBehavior::Cascade)
        } else if self.eat_kw("RESTRICT") {
            Some(DropBehavior::Restrict)
        } else {
            None
        };

        Ok(DropStatement {
            object,
            if_exists,
            names,
            behavior,
        })
    }
}
