//! Byte-oriented scanner producing tokens with leading trivia.
//!
//! The lexer never copies source text: every [`Token`] and [`Trivia`] is a
//! `(start, length)` slice into the buffer it was constructed from, and the
//! buffer must outlive every token derived from it.

use crate::error::{Error, Result};
use crate::span::Span;
use crate::token::{classify_identifier, PpKind, Token, TokenKind, Trivia, TriviaKind, TriviaRange};

pub struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    at_bol: bool,
    trivia: Vec<Trivia>,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            at_bol: true,
            trivia: Vec::new(),
        }
    }

    /// Trivia accumulated so far, indexable by the [`TriviaRange`]s on
    /// returned tokens.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Consumes leading trivia, pushing each piece into the shared arena, and
    /// returns the `TriviaRange` covering what was pushed for the upcoming
    /// token. Flips `at_bol` on every newline.
    fn collect_trivia(&mut self) -> Result<TriviaRange> {
        let start = self.trivia.len() as u32;
        loop {
            match self.peek() {
                Some(b'\n') => {
                    let s = self.pos;
                    self.pos += 1;
                    self.push_trivia(TriviaKind::Newline, s);
                    self.at_bol = true;
                }
                Some(b'\r') if self.peek_at(1) == Some(b'\n') => {
                    let s = self.pos;
                    self.pos += 2;
                    self.push_trivia(TriviaKind::Newline, s);
                    self.at_bol = true;
                }
                Some(b' ' | b'\t' | 0x0b | 0x0c) => {
                    let s = self.pos;
                    while matches!(self.peek(), Some(b' ' | b'\t' | 0x0b | 0x0c)) {
                        self.pos += 1;
                    }
                    self.push_trivia(TriviaKind::Space, s);
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    let s = self.pos;
                    self.pos += 2;
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                    self.push_trivia(TriviaKind::LineComment, s);
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let s = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                return Err(Error::UnterminatedComment {
                                    span: Span::new(s as u32, (self.pos - s) as u32),
                                });
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            _ => self.pos += 1,
                        }
                    }
                    self.push_trivia(TriviaKind::BlockComment, s);
                }
                _ => break,
            }
        }
        Ok(TriviaRange {
            start,
            end: self.trivia.len() as u32,
        })
    }

    fn push_trivia(&mut self, kind: TriviaKind, start: usize) {
        self.trivia.push(Trivia {
            kind,
            span: Span::new(start as u32, (self.pos - start) as u32),
        });
    }

    /// Produces the next token, including its leading trivia. Returns an EOF
    /// token (length 0) once the buffer is exhausted, and keeps returning it
    /// on every subsequent call.
    pub fn next_token(&mut self) -> Result<Token> {
        let leading_trivia = self.collect_trivia()?;
        let was_bol = self.at_bol;
        let start = self.pos;

        let Some(first) = self.peek() else {
            return Ok(self.finish(TokenKind::Eof, PpKind::Other, start, leading_trivia));
        };

        self.at_bol = false;

        if first == b'#' && was_bol {
            self.pos += 1;
            return Ok(self.finish(TokenKind::DirectiveHash, PpKind::Other, start, leading_trivia));
        }

        if first.is_ascii_digit() || (first == b'.' && self.peek_at(1).is_some_and(|b| b.is_ascii_digit())) {
            return self.scan_number(start, leading_trivia);
        }

        if first == b'_' || first.is_ascii_alphabetic() {
            return self.scan_identifier(start, leading_trivia);
        }

        if first == b'"' {
            return self.scan_string(start, leading_trivia);
        }

        self.scan_punctuation(first, start, leading_trivia)
    }

    fn finish(&self, kind: TokenKind, pp_kind: PpKind, start: usize, leading_trivia: TriviaRange) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, (self.pos - start) as u32),
            pp_kind,
            leading_trivia,
        }
    }

    fn scan_identifier(&mut self, start: usize, leading_trivia: TriviaRange) -> Result<Token> {
        while matches!(self.peek(), Some(b) if b == b'_' || b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        let (kind, pp_kind) = classify_identifier(word);
        Ok(self.finish(kind, pp_kind, start, leading_trivia))
    }

    fn scan_string(&mut self, start: usize, leading_trivia: TriviaRange) -> Result<Token> {
        self.pos += 1; // opening quote
        loop {
            match self.bump() {
                None => {
                    return Err(Error::UnterminatedString {
                        span: Span::new(start as u32, (self.pos - start) as u32),
                    });
                }
                Some(b'\\') => {
                    // escape: consume one more byte unconditionally (raw, uncooked)
                    if self.bump().is_none() {
                        return Err(Error::UnterminatedString {
                            span: Span::new(start as u32, (self.pos - start) as u32),
                        });
                    }
                }
                Some(b'"') => break,
                Some(_) => {}
            }
        }
        Ok(self.finish(TokenKind::String, PpKind::Other, start, leading_trivia))
    }

    /// `digits (. digits)? ([eE][+-]? digits)? [fF]?` with rollback of a
    /// bare trailing dot and of an exponent marker missing its digits.
    fn scan_number(&mut self, start: usize, leading_trivia: TriviaRange) -> Result<Token> {
        let mut is_float = false;

        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }

        if self.peek() == Some(b'.') {
            if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                self.pos += 1;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else if self.pos == start {
                // lone dot with no digits at all: not a number, just `Dot`.
                self.pos += 1;
                return Ok(self.finish(TokenKind::Dot, PpKind::Other, start, leading_trivia));
            }
            // a dot with no following digit, but preceded by digits (`1.`):
            // still consumed as part of the float above only if digit followed;
            // otherwise a bare trailing dot after digits is not consumed here,
            // left for the next token.
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                is_float = true;
                while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                // no digits after e/E (or sign): roll back, exponent wasn't real.
                self.pos = mark;
            }
        }

        if matches!(self.peek(), Some(b'f' | b'F')) {
            is_float = true;
            self.pos += 1;
        }

        let kind = if is_float { TokenKind::FloatLiteral } else { TokenKind::IntLiteral };
        Ok(self.finish(kind, PpKind::Other, start, leading_trivia))
    }

    fn scan_punctuation(&mut self, first: u8, start: usize, leading_trivia: TriviaRange) -> Result<Token> {
        macro_rules! two {
            ($second:literal, $two_kind:expr, $one_kind:expr) => {{
                self.pos += 1;
                if self.peek() == Some($second) {
                    self.pos += 1;
                    $two_kind
                } else {
                    $one_kind
                }
            }};
        }

        let kind = match first {
            b'(' => {
                self.pos += 1;
                TokenKind::LParen
            }
            b')' => {
                self.pos += 1;
                TokenKind::RParen
            }
            b'{' => {
                self.pos += 1;
                TokenKind::LBrace
            }
            b'}' => {
                self.pos += 1;
                TokenKind::RBrace
            }
            b',' => {
                self.pos += 1;
                TokenKind::Comma
            }
            b';' => {
                self.pos += 1;
                TokenKind::Semicolon
            }
            b'.' => {
                self.pos += 1;
                TokenKind::Dot
            }
            b'+' => two!(b'+', TokenKind::PlusPlus, TokenKind::Plus),
            b'-' => two!(b'-', TokenKind::MinusMinus, TokenKind::Minus),
            b'*' => {
                self.pos += 1;
                TokenKind::Star
            }
            b'/' => {
                self.pos += 1;
                TokenKind::Slash
            }
            b'!' => two!(b'=', TokenKind::BangEq, TokenKind::Bang),
            b'=' => two!(b'=', TokenKind::EqEq, TokenKind::Eq),
            b'<' => two!(b'=', TokenKind::LtEq, TokenKind::Lt),
            b'>' => two!(b'=', TokenKind::GtEq, TokenKind::Gt),
            b'&' => two!(b'&', TokenKind::AmpAmp, TokenKind::Amp),
            b'|' => two!(b'|', TokenKind::PipePipe, TokenKind::Pipe),
            other => {
                let ch = self.source[self.pos..].chars().next().unwrap_or(other as char);
                self.pos += ch.len_utf8();
                return Err(Error::UnexpectedChar {
                    span: Span::new(start as u32, (self.pos - start) as u32),
                    found: ch,
                });
            }
        };

        Ok(self.finish(kind, PpKind::Other, start, leading_trivia))
    }
}

/// Lexes `source` to completion, collecting every token (including the
/// trailing EOF) and the trivia arena they reference.
pub fn lex(source: &str) -> Result<(Vec<Token>, Vec<Trivia>)> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let is_eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    Ok((tokens, lexer.trivia))
}

#[cfg(test)]
mod lexer_tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_single_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn directive_hash_only_at_bol() {
        let (tokens, _) = lex("#define A 1\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DirectiveHash);

        // a `#` that isn't at the start of a line is not a directive marker
        // and isn't otherwise valid punctuation, so it's a fatal lex error.
        assert!(lex("x # y").is_err());
    }

    #[test]
    fn crlf_is_one_newline_trivia() {
        let mut lexer = Lexer::new("a\r\nb");
        let _ = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        let trivia = &lexer.trivia()[b.leading_trivia.start as usize..b.leading_trivia.end as usize];
        assert_eq!(trivia.len(), 1);
        assert_eq!(trivia[0].kind, TriviaKind::Newline);
        assert_eq!(trivia[0].span.length, 2);
    }

    #[test]
    fn float_requires_exponent_digits() {
        // `1e` has no exponent digits: exponent is rolled back, leaving an
        // int literal `1` followed by identifier `e`.
        assert_eq!(kinds("1e"), vec![TokenKind::IntLiteral, TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("1e5"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn lone_dot_is_not_a_number() {
        assert_eq!(kinds("."), vec![TokenKind::Dot, TokenKind::Eof]);
        assert_eq!(kinds("..."), vec![TokenKind::Dot, TokenKind::Dot, TokenKind::Dot, TokenKind::Eof]);
    }

    #[test]
    fn keyword_and_pp_keyword_are_independent() {
        let (tokens, _) = lex("if define").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::KwIf);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].pp_kind, PpKind::Define);
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        assert!(lex("/* oops").is_err());
    }

    #[test]
    fn adjacency_detects_function_like_macro_paren() {
        let (tokens, _) = lex("NAME(x)").unwrap();
        assert!(tokens[0].adjacent_to(&tokens[1]));
        let (tokens, _) = lex("NAME (x)").unwrap();
        assert!(!tokens[0].adjacent_to(&tokens[1]));
    }
}
