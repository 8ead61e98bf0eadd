//! Statements, including the local-declaration-vs-expression disambiguation
//! used at the head of a compound statement and inside `for`'s init clause.

use crate::ast::{BlockItem, ForInit, Stmt, VarDecl};
use crate::error::Result;
use crate::token::TokenKind;

use super::core::Parser;

impl<'s> Parser<'s> {
    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.kind() {
            TokenKind::KwReturn => {
                self.advance();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Return(value))
            }
            TokenKind::LBrace => Ok(Stmt::Compound(self.parse_compound()?)),
            TokenKind::KwIf => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(TokenKind::KwElse).is_some() {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(Stmt::If { cond, then_branch, else_branch })
            }
            TokenKind::KwWhile => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While { cond, body })
            }
            TokenKind::KwFor => self.parse_for_stmt(),
            TokenKind::KwBreak => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Break)
            }
            TokenKind::KwContinue => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Continue)
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt> {
        self.advance(); // 'for'
        self.expect(TokenKind::LParen, "'('")?;

        let init = if self.eat(TokenKind::Semicolon).is_some() {
            None
        } else if let Some(decl) = self.try_parse_local_decl()? {
            Some(Box::new(ForInit::Decl(decl)))
        } else {
            let e = self.parse_expr()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            Some(Box::new(ForInit::Expr(e)))
        };

        let cond = if self.at(TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::Semicolon, "';'")?;

        let post = if self.at(TokenKind::RParen) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::RParen, "')'")?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For { init, cond, post, body })
    }

    pub fn parse_compound(&mut self) -> Result<Vec<BlockItem>> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.eof() {
            if let Some(decl) = self.try_parse_local_decl()? {
                items.push(BlockItem::Decl(decl));
            } else {
                items.push(BlockItem::Stmt(self.parse_stmt()?));
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(items)
    }

    /// Tries `ParseTypeRef` at the head of a statement/for-init position.
    /// Bounded by the recursion-fuel guard so this attempt-and-rewind can
    /// never be used to backtrack across a statement boundary.
    fn try_parse_local_decl(&mut self) -> Result<Option<VarDecl>> {
        self.enter_recursion()?;
        let mark = self.mark();
        let ty = self.parse_type_ref();
        let result = match ty {
            None => {
                self.reset(mark);
                None
            }
            Some(ty) => {
                let name_tok = self.expect(TokenKind::Identifier, "variable name")?;
                let init = if self.eat(TokenKind::Eq).is_some() {
                    Some(self.parse_assignment_expr()?)
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "';'")?;
                Some(VarDecl { ty, name: self.text(name_tok).to_string(), init })
            }
        };
        self.exit_recursion();
        Ok(result)
    }
}
