/// TableDB command language
///
/// - Lexer: splits one input line into tokens
/// - Parser: builds a `Command` from tokens
///
/// Literal parsing (quoted strings, integers, booleans) happens here; the
/// database still checks every value against the table schema.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{ColumnSpec, Command};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenType};

use crate::error::Result;

/// Parse one command line
pub fn parse_command(line: &str) -> Result<Command> {
    let mut lexer = Lexer::new(line);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}
