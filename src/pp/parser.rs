//! Parses a flat token stream into a [`PpTranslationUnit`], grouping
//! directives (including nested conditional sections) without evaluating
//! them.

use crate::error::{Error, Result};
use crate::token::{PpKind, Token, TokenKind, Trivia, TriviaKind};

use super::ast::{PpDefineDirective, PpGroupPart, PpIfBranch, PpIfKind, PpTranslationUnit};

pub struct PpParser<'t> {
    source: &'t str,
    tokens: &'t [Token],
    trivia: &'t [Trivia],
    pos: usize,
}

impl<'t> PpParser<'t> {
    pub fn new(source: &'t str, tokens: &'t [Token], trivia: &'t [Trivia]) -> Self {
        Self { source, tokens, trivia, pos: 0 }
    }

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let tok = self.current();
        if !self.at_eof() {
            self.pos += 1;
        }
        tok
    }

    fn starts_line(&self, tok: Token) -> bool {
        self.trivia[tok.leading_trivia.start as usize..tok.leading_trivia.end as usize]
            .iter()
            .any(|t| t.kind == TriviaKind::Newline)
            || tok.kind == TokenKind::Eof
    }

    /// Accumulates tokens until the next token begins a new line (its
    /// leading trivia contains a Newline) or EOF is reached. The terminating
    /// token is not consumed.
    fn collect_rest_of_line(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while !self.at_eof() && !self.starts_line(self.current()) {
            out.push(self.advance());
        }
        out
    }

    /// True if `self.current()` is a `#` at the start of a directive line
    /// whose keyword's `pp_kind` is one of `kinds`. Does not consume.
    fn at_directive(&self, kinds: &[PpKind]) -> bool {
        if self.current().kind != TokenKind::DirectiveHash {
            return false;
        }
        let Some(keyword) = self.tokens.get(self.pos + 1) else {
            return false;
        };
        kinds.contains(&keyword.pp_kind)
    }

    fn at_any_directive(&self) -> bool {
        self.current().kind == TokenKind::DirectiveHash
    }

    fn directive_keyword_pp_kind(&self) -> PpKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.pp_kind)
            .unwrap_or(PpKind::Other)
    }

    /// Parses group parts until EOF, or until a directive whose `pp_kind` is
    /// in `stop_kinds` is seen (left unconsumed for the caller). A bare
    /// `#elif`/`#else`/`#endif` encountered with an empty `stop_kinds` (i.e.
    /// no enclosing `#if` section) is a fatal unmatched-directive error.
    fn parse_group_until(&mut self, stop_kinds: &[PpKind]) -> Result<Vec<PpGroupPart>> {
        let mut parts = Vec::new();
        loop {
            if self.at_eof() {
                return Ok(parts);
            }
            if self.at_directive(stop_kinds) {
                return Ok(parts);
            }
            if !self.at_any_directive() {
                parts.push(self.parse_text_run());
                continue;
            }

            match self.directive_keyword_pp_kind() {
                PpKind::Elif => return Err(self.unmatched("elif")),
                PpKind::Else => return Err(self.unmatched("else")),
                PpKind::Endif => return Err(self.unmatched("endif")),
                PpKind::Include => parts.push(self.parse_include()?),
                PpKind::Define => parts.push(self.parse_define()?),
                PpKind::Undef => parts.push(self.parse_undef()?),
                PpKind::If => parts.push(self.parse_if_section(PpIfKind::If)?),
                PpKind::Ifdef => parts.push(self.parse_if_section(PpIfKind::Ifdef)?),
                PpKind::Ifndef => parts.push(self.parse_if_section(PpIfKind::Ifndef)?),
                PpKind::Other => parts.push(self.parse_simple_directive()),
            }
        }
    }

    fn unmatched(&self, directive: &'static str) -> Error {
        Error::UnmatchedDirective {
            span: self.current().span,
            directive,
        }
    }

    fn parse_text_run(&mut self) -> PpGroupPart {
        let mut tokens = Vec::new();
        while !self.at_eof() && !self.at_any_directive() {
            tokens.push(self.advance());
        }
        PpGroupPart::Text(tokens)
    }

    fn parse_include(&mut self) -> Result<PpGroupPart> {
        self.advance(); // '#'
        self.advance(); // 'include'
        let raw_tokens = self.collect_rest_of_line();
        Ok(PpGroupPart::Include { raw_tokens })
    }

    fn parse_undef(&mut self) -> Result<PpGroupPart> {
        self.advance(); // '#'
        self.advance(); // 'undef'
        let rest = self.collect_rest_of_line();
        let name = rest.first().map(|t| self.text(*t).to_string()).unwrap_or_default();
        Ok(PpGroupPart::Undef { name })
    }

    fn parse_simple_directive(&mut self) -> PpGroupPart {
        self.advance(); // '#'
        let keyword = self.advance();
        let rest_of_line = self.collect_rest_of_line();
        PpGroupPart::Simple { keyword, rest_of_line }
    }

    /// `ParseDefine`: name, optional adjacent `(` parameter list (function-
    /// like iff the `(` is adjacent to the name), then the replacement list
    /// to end-of-line.
    fn parse_define(&mut self) -> Result<PpGroupPart> {
        self.advance(); // '#'
        self.advance(); // 'define'
        let name_tok = self.advance();
        let name = self.text(name_tok).to_string();

        let mut is_function_like = false;
        let mut parameters = Vec::new();
        let mut is_variadic = false;

        if self.current().kind == TokenKind::LParen && name_tok.adjacent_to(&self.current()) {
            is_function_like = true;
            self.advance(); // '('
            loop {
                if self.current().kind == TokenKind::RParen {
                    break;
                }
                if self.is_ellipsis_here() {
                    self.advance();
                    self.advance();
                    self.advance();
                    is_variadic = true;
                    break;
                }
                if self.current().kind != TokenKind::Identifier {
                    return Err(Error::MalformedMacroParams { span: self.current().span });
                }
                let p = self.advance();
                parameters.push(self.text(p).to_string());
                if self.current().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.current().kind != TokenKind::RParen {
                return Err(Error::MalformedMacroParams { span: self.current().span });
            }
            self.advance(); // ')'
        }

        let replacement_tokens = self.collect_rest_of_line();
        Ok(PpGroupPart::Define(PpDefineDirective {
            name,
            is_function_like,
            parameters,
            is_variadic,
            replacement_tokens,
        }))
    }

    /// Three pairwise-adjacent `Dot` tokens starting at the cursor.
    fn is_ellipsis_here(&self) -> bool {
        let a = self.tokens.get(self.pos);
        let b = self.tokens.get(self.pos + 1);
        let c = self.tokens.get(self.pos + 2);
        match (a, b, c) {
            (Some(a), Some(b), Some(c)) => {
                a.kind == TokenKind::Dot
                    && b.kind == TokenKind::Dot
                    && c.kind == TokenKind::Dot
                    && a.adjacent_to(b)
                    && b.adjacent_to(c)
            }
            _ => false,
        }
    }

    fn parse_if_section(&mut self, kind: PpIfKind) -> Result<PpGroupPart> {
        self.advance(); // '#'
        self.advance(); // 'if' | 'ifdef' | 'ifndef'
        let condition = self.collect_rest_of_line();
        let body = self.parse_group_until(&[PpKind::Elif, PpKind::Else, PpKind::Endif])?;
        let if_branch = PpIfBranch { kind, condition, body };

        let mut elifs = Vec::new();
        while self.at_directive(&[PpKind::Elif]) {
            self.advance(); // '#'
            self.advance(); // 'elif'
            let condition = self.collect_rest_of_line();
            let body = self.parse_group_until(&[PpKind::Elif, PpKind::Else, PpKind::Endif])?;
            elifs.push(PpIfBranch { kind: PpIfKind::Elif, condition, body });
        }

        let else_branch = if self.at_directive(&[PpKind::Else]) {
            self.advance(); // '#'
            self.advance(); // 'else'
            let _ = self.collect_rest_of_line();
            Some(self.parse_group_until(&[PpKind::Endif])?)
        } else {
            None
        };

        if !self.at_directive(&[PpKind::Endif]) {
            return Err(Error::MissingEndif { span: self.current().span });
        }
        self.advance(); // '#'
        self.advance(); // 'endif'
        let _ = self.collect_rest_of_line();

        Ok(PpGroupPart::IfSection { if_branch, elifs, else_branch })
    }

    fn text(&self, tok: Token) -> &'t str {
        tok.lexeme(self.source)
    }
}

/// Parses `tokens` (with their originating `trivia` arena and `source`) into
/// a [`PpTranslationUnit`].
pub fn pp_parse(source: &str, tokens: &[Token], trivia: &[Trivia]) -> Result<PpTranslationUnit> {
    let mut parser = PpParser::new(source, tokens, trivia);
    let parts = parser.parse_group_until(&[])?;
    Ok(PpTranslationUnit { parts })
}
