/// Command lexer - converts one input line into tokens
use super::token::{Token, TokenType};
use crate::error::{DbError, Result};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | ',' | '=' | ':' | '"' | '\'')
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let column = self.position + 1;
        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenType::Eof, column));
        };

        let token_type = match ch {
            '"' | '\'' => self.read_string(ch)?,
            '(' => self.single(TokenType::LParen),
            ')' => self.single(TokenType::RParen),
            ',' => self.single(TokenType::Comma),
            '=' => self.single(TokenType::Eq),
            ':' => self.single(TokenType::Colon),
            _ => self.read_word()?,
        };

        Ok(Token::new(token_type, column))
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn single(&mut self, token_type: TokenType) -> TokenType {
        self.position += 1;
        token_type
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    /// Read a quoted string; `\x` escapes `x`, a doubled quote is a literal quote
    fn read_string(&mut self, quote: char) -> Result<TokenType> {
        let start = self.position + 1;
        self.position += 1;
        let mut value = String::new();

        loop {
            match self.current_char() {
                None => {
                    return Err(DbError::Parse(format!(
                        "unterminated string starting at column {}",
                        start
                    )))
                }
                Some('\\') => {
                    self.position += 1;
                    match self.current_char() {
                        Some(escaped) => {
                            value.push(escaped);
                            self.position += 1;
                        }
                        None => {
                            return Err(DbError::Parse(format!(
                                "unterminated string starting at column {}",
                                start
                            )))
                        }
                    }
                }
                Some(c) if c == quote => {
                    self.position += 1;
                    if self.current_char() == Some(quote) {
                        value.push(quote);
                        self.position += 1;
                    } else {
                        return Ok(TokenType::Str(value));
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.position += 1;
                }
            }
        }
    }

    /// Read a run of non-delimiter characters; all-digit runs are integers
    fn read_word(&mut self) -> Result<TokenType> {
        let start = self.position;
        while matches!(self.current_char(), Some(c) if !is_delimiter(c)) {
            self.position += 1;
        }
        let word: String = self.input[start..self.position].iter().collect();

        let digits = word.strip_prefix('-').unwrap_or(&word);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return word
                .parse::<i64>()
                .map(TokenType::Integer)
                .map_err(|_| DbError::Parse(format!("integer out of range: {}", word)));
        }

        Ok(TokenType::Word(word))
    }
}
