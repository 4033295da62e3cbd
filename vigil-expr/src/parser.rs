// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recursive-descent parser for the rule grammar.
//!
//! ```text
//! expression      = orExpr ;
//! orExpr          = andExpr , { ("||" | "OR") , andExpr } ;
//! andExpr         = condition , { ("&&" | "AND") , condition } ;
//! condition       = aggCondition | simpleCondition | "(" , expression , ")" ;
//! aggCondition    = aggType , "(" , ident , "," , timeWindow , ")" , op , threshold ;
//! simpleCondition = ident , op , threshold ;
//! aggType         = "avg" | "sum" | "max" | "min" (case-insensitive) ;
//! timeWindow      = NUMBER , ("s" | "m" | "h") (unit case-insensitive) ;
//! op              = ">" | ">=" | "<" | "<=" | "==" | "!=" ;
//! threshold       = arith ;
//! arith           = mulDiv , { ("+" | "-") , mulDiv } ;
//! mulDiv          = primary , { ("*" | "/") , primary } ;
//! primary         = NUMBER | ident | "(" , arith , ")" ;
//! ```
//!
//! Whether an identifier opens an aggregation condition is decided by one
//! token of lookahead: `ident (` is an aggregation call, bare `ident` a
//! simple condition, so metrics named `avg` remain usable.

use std::str::FromStr;
use std::time::Duration;

use vigil_core::{AggregateKind, LogicalOp, Result, VigilError};

use crate::arith::{ArithExpr, ArithOp};
use crate::ast::{ComparisonOp, Condition, Expr};
use crate::token::{tokenize, SpannedToken, Token};

/// Parse rule text into an expression tree.
///
/// # Errors
///
/// `VigilError::Syntax` with the character offset of the first offending
/// token.
pub fn parse(text: &str) -> Result<Expr> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression()?;
    parser.expect(&Token::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> &SpannedToken {
        // tokenize always appends Eof, so the last token is a stable sentinel
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        let next = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[next].token
    }

    fn advance(&mut self) -> SpannedToken {
        let spanned = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        spanned
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        let current = self.current();
        if &current.token == expected {
            self.advance();
            Ok(())
        } else {
            Err(VigilError::syntax(
                current.position,
                format!("expected `{expected}`, found `{}`", current.token),
            ))
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut left = self.and_expr()?;
        while self.current().token == Token::Or {
            self.advance();
            let right = self.and_expr()?;
            left = Expr::binary(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut left = self.condition()?;
        while self.current().token == Token::And {
            self.advance();
            let right = self.condition()?;
            left = Expr::binary(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn condition(&mut self) -> Result<Expr> {
        let current = self.current().clone();
        match current.token {
            Token::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Token::Ident(name) => {
                if *self.peek() == Token::LParen {
                    self.aggregation_condition(&name, current.position)
                } else {
                    self.simple_condition(&name)
                }
            }
            other => Err(VigilError::syntax(
                current.position,
                format!("expected a condition, found `{other}`"),
            )),
        }
    }

    fn aggregation_condition(&mut self, kind_text: &str, kind_position: usize) -> Result<Expr> {
        let kind = AggregateKind::from_str(kind_text).map_err(|_| {
            VigilError::syntax(
                kind_position,
                format!("unknown aggregation kind `{kind_text}`"),
            )
        })?;
        self.advance(); // aggregation keyword
        self.expect(&Token::LParen)?;
        let metric = self.ident("metric name")?;
        self.expect(&Token::Comma)?;
        let window = self.time_window()?;
        self.expect(&Token::RParen)?;
        let op = self.comparison_op()?;
        let threshold = self.arith()?;
        Ok(Expr::condition(Condition::aggregation(
            kind, metric, window, op, threshold,
        )))
    }

    fn simple_condition(&mut self, metric: &str) -> Result<Expr> {
        self.advance(); // metric name
        let op = self.comparison_op()?;
        let threshold = self.arith()?;
        Ok(Expr::condition(Condition::simple(metric, op, threshold)))
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        let current = self.current().clone();
        match current.token {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(VigilError::syntax(
                current.position,
                format!("expected {what}, found `{other}`"),
            )),
        }
    }

    fn time_window(&mut self) -> Result<Duration> {
        let current = self.current().clone();
        let Token::Number(amount) = current.token else {
            return Err(VigilError::syntax(
                current.position,
                format!("expected a window length, found `{}`", current.token),
            ));
        };
        self.advance();

        let unit = self.current().clone();
        let Token::Ident(unit_text) = &unit.token else {
            return Err(VigilError::syntax(
                unit.position,
                format!("expected a time unit (s, m or h), found `{}`", unit.token),
            ));
        };
        let seconds_per_unit = match unit_text.to_ascii_lowercase().as_str() {
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3_600.0,
            other => {
                return Err(VigilError::syntax(
                    unit.position,
                    format!("unknown time unit `{other}` (expected s, m or h)"),
                ));
            }
        };
        self.advance();

        Ok(Duration::from_millis(
            (amount * seconds_per_unit * 1_000.0).round() as u64,
        ))
    }

    fn comparison_op(&mut self) -> Result<ComparisonOp> {
        let current = self.current().clone();
        let op = match current.token {
            Token::Gt => ComparisonOp::Gt,
            Token::Ge => ComparisonOp::Ge,
            Token::Lt => ComparisonOp::Lt,
            Token::Le => ComparisonOp::Le,
            Token::Eq => ComparisonOp::Eq,
            Token::Ne => ComparisonOp::Ne,
            other => {
                return Err(VigilError::syntax(
                    current.position,
                    format!("expected a comparison operator, found `{other}`"),
                ));
            }
        };
        self.advance();
        Ok(op)
    }

    fn arith(&mut self) -> Result<ArithExpr> {
        let mut left = self.mul_div()?;
        loop {
            let op = match self.current().token {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.mul_div()?;
            left = ArithExpr::binary(op, left, right);
        }
    }

    fn mul_div(&mut self) -> Result<ArithExpr> {
        let mut left = self.primary()?;
        loop {
            let op = match self.current().token {
                Token::Star => ArithOp::Mul,
                Token::Slash => ArithOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.primary()?;
            left = ArithExpr::binary(op, left, right);
        }
    }

    fn primary(&mut self) -> Result<ArithExpr> {
        let current = self.current().clone();
        match current.token {
            Token::Number(value) => {
                self.advance();
                Ok(ArithExpr::constant(value))
            }
            Token::Ident(name) => {
                self.advance();
                Ok(ArithExpr::variable(name))
            }
            Token::LParen => {
                self.advance();
                let inner = self.arith()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(VigilError::syntax(
                current.position,
                format!("expected a number, variable or `(`, found `{other}`"),
            )),
        }
    }
}
