/// Command parser - converts tokens into a `Command`
use super::ast::{ColumnSpec, Command};
use super::token::{Token, TokenType};
use crate::error::{DbError, Result};
use crate::query::Condition;
use crate::types::Value;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.token_type == TokenType::Eof) {
            let column = tokens.last().map_or(1, |t| t.column + 1);
            tokens.push(Token::new(TokenType::Eof, column));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse exactly one command; trailing tokens are an error
    pub fn parse(&mut self) -> Result<Command> {
        let keyword = match &self.current().token_type {
            TokenType::Word(w) => w.to_ascii_lowercase(),
            _ => return Err(self.error("a command")),
        };
        self.advance();

        let command = match keyword.as_str() {
            "create_table" => self.parse_create_table()?,
            "list_tables" => Command::ListTables,
            "drop_table" => Command::DropTable {
                name: self.expect_word("table name")?,
            },
            "insert" => self.parse_insert()?,
            "select" => self.parse_select()?,
            "update" => self.parse_update()?,
            "delete" => self.parse_delete()?,
            "info" => Command::Info {
                table: self.expect_word("table name")?,
            },
            "help" => Command::Help,
            "exit" => Command::Exit,
            other => {
                return Err(DbError::Parse(format!("unknown command '{}'", other)));
            }
        };

        if !matches!(self.current().token_type, TokenType::Eof) {
            return Err(self.error("end of input"));
        }

        Ok(command)
    }

    /// create_table <name> <col>:<type> ...
    fn parse_create_table(&mut self) -> Result<Command> {
        let name = self.expect_word("table name")?;

        let mut columns = Vec::new();
        while !matches!(self.current().token_type, TokenType::Eof) {
            let column = self.expect_word("column name")?;
            self.expect(TokenType::Colon, "':' after column name")?;
            let type_name = self.expect_word("column type")?;
            columns.push(ColumnSpec::new(column, type_name));
        }

        Ok(Command::CreateTable { name, columns })
    }

    /// insert into <table> values ( <lit>, ... )
    fn parse_insert(&mut self) -> Result<Command> {
        self.expect_keyword("into")?;
        let table = self.expect_word("table name")?;
        self.expect_keyword("values")?;
        self.expect(TokenType::LParen, "'('")?;

        let mut values = Vec::new();
        if !matches!(self.current().token_type, TokenType::RParen) {
            loop {
                values.push(self.parse_literal()?);
                if matches!(self.current().token_type, TokenType::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenType::RParen, "')'")?;

        Ok(Command::Insert { table, values })
    }

    /// select from <table> [where <col> = <lit>]
    fn parse_select(&mut self) -> Result<Command> {
        self.expect_keyword("from")?;
        let table = self.expect_word("table name")?;

        let condition = if self.current().is_keyword("where") {
            self.advance();
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(Command::Select { table, condition })
    }

    /// update <table> set <col> = <lit> where <col> = <lit>
    fn parse_update(&mut self) -> Result<Command> {
        let table = self.expect_word("table name")?;
        self.expect_keyword("set")?;
        let assignment = self.parse_condition()?;
        self.expect_keyword("where")?;
        let condition = self.parse_condition()?;

        Ok(Command::Update {
            table,
            set_column: assignment.column,
            set_value: assignment.value,
            condition,
        })
    }

    /// delete from <table> where <col> = <lit>
    fn parse_delete(&mut self) -> Result<Command> {
        self.expect_keyword("from")?;
        let table = self.expect_word("table name")?;
        self.expect_keyword("where")?;
        let condition = self.parse_condition()?;

        Ok(Command::Delete { table, condition })
    }

    /// <col> = <lit>
    fn parse_condition(&mut self) -> Result<Condition> {
        let column = self.expect_word("column name")?;
        self.expect(TokenType::Eq, "'='")?;
        let value = self.parse_literal()?;
        Ok(Condition::new(column, value))
    }

    /// Integer, quoted string, `true`/`false`, or a bare word taken as text
    fn parse_literal(&mut self) -> Result<Value> {
        let value = match &self.current().token_type {
            TokenType::Integer(n) => Value::Int(*n),
            TokenType::Str(s) => Value::Str(s.clone()),
            TokenType::Word(w) if w.eq_ignore_ascii_case("true") => Value::Bool(true),
            TokenType::Word(w) if w.eq_ignore_ascii_case("false") => Value::Bool(false),
            TokenType::Word(w) => Value::Str(w.clone()),
            _ => return Err(self.error("a value")),
        };
        self.advance();
        Ok(value)
    }

    // ==================== Token Helpers ====================

    fn current(&self) -> &Token {
        // new() guarantees a trailing Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: TokenType, what: &str) -> Result<()> {
        if self.current().token_type == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(what))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.current().is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("'{}'", keyword)))
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<String> {
        match &self.current().token_type {
            TokenType::Word(w) => {
                let word = w.clone();
                self.advance();
                Ok(word)
            }
            _ => Err(self.error(what)),
        }
    }

    fn error(&self, expected: &str) -> DbError {
        let token = self.current();
        DbError::Parse(format!(
            "expected {}, found {} at column {}",
            expected, token.token_type, token.column
        ))
    }
}
