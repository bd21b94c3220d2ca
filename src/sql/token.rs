/// Token types for the command lexer
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    /// Bare word: keyword, identifier, `true`/`false`, or unquoted text
    Word(String),
    /// Integer literal (optionally negative)
    Integer(i64),
    /// Quoted string literal, escapes resolved
    Str(String),

    // Delimiters
    LParen,
    RParen,
    Comma,
    Eq,
    Colon,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    /// 1-based character offset in the input line
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, column: usize) -> Self {
        Self { token_type, column }
    }

    /// Whether this is the bare word `keyword` (case-insensitive)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.token_type, TokenType::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Word(w) => write!(f, "'{}'", w),
            TokenType::Integer(n) => write!(f, "{}", n),
            TokenType::Str(s) => write!(f, "{:?}", s),
            TokenType::LParen => f.write_str("'('"),
            TokenType::RParen => f.write_str("')'"),
            TokenType::Comma => f.write_str("','"),
            TokenType::Eq => f.write_str("'='"),
            TokenType::Colon => f.write_str("':'"),
            TokenType::Eof => f.write_str("end of input"),
        }
    }
}
