//! Parameter expressions.
//!
//! OpenQASM 2.0 gate parameters are constant real expressions, so they are
//! evaluated while parsing rather than kept as a tree.

use std::f64::consts::PI;

use super::Parser;
use crate::error::QasmResult;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
        }
    }
}

impl Parser {
    /// Parse and evaluate an expression; the result must be finite.
    pub(super) fn parse_expression(&mut self) -> QasmResult<f64> {
        let value = self.parse_binary_expr(0)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.error(format!("parameter evaluates to {value}")))
        }
    }

    /// Precedence climbing over left-associative operators.
    fn parse_binary_expr(&mut self, min_prec: u8) -> QasmResult<f64> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = self.parse_binary_expr(prec + 1)?;
            left = op.apply(left, right);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> QasmResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary_expr()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> QasmResult<f64> {
        let value = match self.peek() {
            Some(Token::Int(v)) => *v as f64,
            Some(Token::Real(v)) => *v,
            Some(Token::Pi) => PI,
            Some(Token::LParen) => {
                self.advance();
                let value = self.parse_binary_expr(0)?;
                self.expect(Token::RParen)?;
                return Ok(value);
            }
            Some(other) => return Err(self.error(format!("expected expression, found '{other}'"))),
            None => return Err(self.error("expected expression, found end of input")),
        };
        self.advance();
        Ok(value)
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Parse a parenthesized, comma-separated parameter list.
    pub(super) fn parse_parameters(&mut self) -> QasmResult<Vec<f64>> {
        if !self.consume(&Token::LParen) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            params.push(self.parse_expression()?);
            while self.consume(&Token::Comma) {
                params.push(self.parse_expression()?);
            }
        }
        self.expect(Token::RParen)?;
        Ok(params)
    }
}
