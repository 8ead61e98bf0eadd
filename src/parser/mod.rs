//! Declaration parser: recursive descent + Pratt expressions over the
//! macro-projected token stream, producing the C declaration AST.

pub(crate) mod core;
mod decl;
mod expr;
mod stmt;
mod types;

#[cfg(test)]
mod tests;

pub use core::{Parser, ParserLimits};

use crate::ast::TranslationUnit;
use crate::error::Result;
use crate::token::Token;

/// Parses a projected token stream into a [`TranslationUnit`].
pub fn parse(source: &str, tokens: &[Token]) -> Result<TranslationUnit> {
    parse_with_limits(source, tokens, ParserLimits::default())
}

pub fn parse_with_limits(source: &str, tokens: &[Token], limits: ParserLimits) -> Result<TranslationUnit> {
    let mut parser = Parser::with_limits(source, tokens, limits);
    let mut decls = Vec::new();
    while !parser.eof() {
        decls.extend(parser.parse_external_decl()?);
    }
    Ok(TranslationUnit { decls })
}
