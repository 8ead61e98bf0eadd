//! Pratt expression parser: assignment (right-assoc, lowest) over binary
//! operators by precedence, unary prefix, postfix call/`++`/`--`, primary.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{Error, Result};
use crate::token::TokenKind;

use super::core::Parser;

fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::PipePipe => (BinaryOp::Or, 1),
        TokenKind::AmpAmp => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::Eq, 3),
        TokenKind::BangEq => (BinaryOp::Ne, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::LtEq => (BinaryOp::Le, 4),
        TokenKind::GtEq => (BinaryOp::Ge, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Slash => (BinaryOp::Div, 6),
        _ => return None,
    })
}

fn prefix_unary_op(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::PlusPlus => UnaryOp::PreIncrement,
        TokenKind::MinusMinus => UnaryOp::PreDecrement,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Minus,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Amp => UnaryOp::AddressOf,
        TokenKind::Star => UnaryOp::Deref,
        _ => return None,
    })
}

impl<'s> Parser<'s> {
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assignment_expr()
    }

    /// `=` is right-associative and binds looser than every binary operator.
    pub(super) fn parse_assignment_expr(&mut self) -> Result<Expr> {
        let lhs = self.parse_binary_expr(1)?;
        if self.eat(TokenKind::Eq).is_some() {
            let value = self.parse_assignment_expr()?;
            return Ok(Expr::Assign { target: Box::new(lhs), value: Box::new(value) });
        }
        Ok(lhs)
    }

    fn parse_binary_expr(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let Some((op, bp)) = binary_op(self.kind()) else { break };
            if bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary_expr(bp + 1)?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        if let Some(op) = prefix_unary_op(self.kind()) {
            self.advance();
            let operand = Box::new(self.parse_unary_expr()?);
            return Ok(Expr::Unary { op, operand });
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            match self.kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    expr = Expr::Call { callee: Box::new(expr), args };
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expr::PostfixUnary { op: UnaryOp::PostIncrement, operand: Box::new(expr) };
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expr::PostfixUnary { op: UnaryOp::PostDecrement, operand: Box::new(expr) };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(TokenKind::RParen).is_some() {
            return Ok(args);
        }
        loop {
            args.push(self.parse_assignment_expr()?);
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            break;
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        match self.kind() {
            TokenKind::IntLiteral => {
                let tok = self.advance();
                let text = self.text(tok);
                let value: i64 = text.parse().unwrap_or(0);
                Ok(Expr::IntLiteral(value))
            }
            TokenKind::FloatLiteral => {
                let tok = self.advance();
                let text = self.text(tok).trim_end_matches(['f', 'F']);
                let value: f64 = text.parse().unwrap_or(0.0);
                Ok(Expr::FloatLiteral(value))
            }
            TokenKind::String => {
                let tok = self.advance();
                let text = self.text(tok);
                let cooked = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text);
                Ok(Expr::StringLiteral(cooked.to_string()))
            }
            TokenKind::KwNull => {
                self.advance();
                Ok(Expr::NullLiteral)
            }
            TokenKind::Identifier => {
                let tok = self.advance();
                Ok(Expr::Ident(self.text(tok).to_string()))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(Error::PrimaryExpressionExpected { span: self.current().span }),
        }
    }
}
