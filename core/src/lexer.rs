use crate::error::{Error, Result};
use crate::language::is_delimiter;
use crate::numeric::NumericType;

// ============================================================================
// Token Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Quote,
    /// A lone `.` separating the tail of a dotted list
    Dot,
    /// Unescaped `nil`
    Nil,
    /// Unescaped `t`
    T,
    Symbol(String),
    Number(NumericType),
    String(String),
    Eof,
}

/// 1-based line and column of a token's first character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

// ============================================================================
// Lexer
// ============================================================================

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> char {
        self.input.get(self.position).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if let Some(&c) = self.input.get(self.position) {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            while !self.is_eof() && self.current_char().is_whitespace() {
                self.advance();
            }

            if self.current_char() == ';' {
                while !self.is_eof() && self.current_char() != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    // ========================================================================
    // String Parsing
    // ========================================================================

    fn read_string(&mut self) -> Result<Token> {
        // Opening quote
        self.advance();
        let mut content = String::new();

        while self.current_char() != '"' {
            if self.is_eof() {
                return Err(self.error("Unterminated string"));
            }
            if self.current_char() == '\\' {
                self.advance();
                content.push(self.read_escape_sequence()?);
            } else {
                content.push(self.current_char());
                self.advance();
            }
        }

        // Closing quote
        self.advance();
        Ok(Token::String(content))
    }

    fn read_escape_sequence(&mut self) -> Result<char> {
        if self.is_eof() {
            return Err(self.error("Unterminated string"));
        }
        let c = self.current_char();
        self.advance();

        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '\\' | '"' | '\'' => Ok(c),
            _ => Err(self.error(format!("Unknown escape sequence: \\{c}"))),
        }
    }

    // ========================================================================
    // Number and Symbol Parsing
    // ========================================================================

    /// Read an atom up to the next unescaped delimiter. Text that parses as a
    /// number is a number unless some character was escaped, which forces a
    /// symbol (`\12` is the symbol named "12").
    fn read_atom(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut escaped = false;

        while !self.is_eof() {
            let ch = self.current_char();
            if ch == '\\' {
                self.advance();
                if self.is_eof() {
                    return Err(self.error("Escape at end of input"));
                }
                text.push(self.current_char());
                self.advance();
                escaped = true;
            } else if is_delimiter(ch) {
                break;
            } else {
                text.push(ch);
                self.advance();
            }
        }

        if escaped {
            return Ok(Token::Symbol(text));
        }
        Ok(match text.as_str() {
            "." => Token::Dot,
            "nil" => Token::Nil,
            "t" => Token::T,
            "##" => Token::Symbol(String::new()),
            _ => match NumericType::parse(&text) {
                Some(n) => Token::Number(n),
                None => Token::Symbol(text),
            },
        })
    }

    // ========================================================================
    // Main Tokenization
    // ========================================================================

    pub fn next_token(&mut self) -> Result<(Token, Position)> {
        self.skip_whitespace();
        let start = self.position();

        if self.is_eof() {
            return Ok((Token::Eof, start));
        }

        let token = match self.current_char() {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '[' => {
                self.advance();
                Token::LBracket
            }
            ']' => {
                self.advance();
                Token::RBracket
            }
            '\'' => {
                self.advance();
                Token::Quote
            }
            '"' => self.read_string()?,
            _ => self.read_atom()?,
        };

        Ok((token, start))
    }
}
