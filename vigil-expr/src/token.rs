// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

use vigil_core::{Result, VigilError};

/// One lexical token of the rule grammar.
///
/// `&&`/`AND` and `||`/`OR` are folded into [`Token::And`] / [`Token::Or`]
/// at lex time (the keyword spellings are exact-case, per the grammar).
/// Aggregation keywords and time units stay [`Token::Ident`]s; the parser
/// resolves them case-insensitively from context.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `[a-zA-Z_][a-zA-Z0-9_]*`
    Ident(String),
    /// `[0-9]+("."[0-9]+)?`
    Number(f64),
    /// `&&` or `AND`
    And,
    /// `||` or `OR`
    Or,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "{name}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// A token plus the byte offset it starts at, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Character-level lexer over the rule text.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<f64> {
        let start = self.position;
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && !seen_dot && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                seen_dot = true;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        text.parse::<f64>()
            .map_err(|_| VigilError::syntax(start, format!("invalid number `{text}`")))
    }

    fn read_ident(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace();
        let position = self.position;

        let Some(ch) = self.current else {
            return Ok(SpannedToken {
                token: Token::Eof,
                position,
            });
        };

        if ch.is_ascii_digit() {
            let n = self.read_number()?;
            return Ok(SpannedToken {
                token: Token::Number(n),
                position,
            });
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let ident = self.read_ident();
            let token = match ident.as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                _ => Token::Ident(ident),
            };
            return Ok(SpannedToken { token, position });
        }

        let token = match ch {
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Token::And
                } else {
                    return Err(VigilError::syntax(position, "expected `&&`"));
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Token::Or
                } else {
                    return Err(VigilError::syntax(position, "expected `||`"));
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Eq
                } else {
                    return Err(VigilError::syntax(position, "expected `==`"));
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Ne
                } else {
                    return Err(VigilError::syntax(position, "expected `!=`"));
                }
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            other => {
                return Err(VigilError::syntax(
                    position,
                    format!("unexpected character `{other}`"),
                ));
            }
        };
        self.advance();

        Ok(SpannedToken { token, position })
    }
}

/// Tokenize the full input, ending with a [`Token::Eof`] sentinel.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let spanned = lexer.next_token()?;
        let done = spanned.token == Token::Eof;
        tokens.push(spanned);
        if done {
            return Ok(tokens);
        }
    }
}
