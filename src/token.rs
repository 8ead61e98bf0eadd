//! Token and trivia kinds shared by every pipeline stage.

use crate::span::Span;

/// Trivia: whitespace and comments that precede a token. Never owned —
/// always sliced from the source buffer via its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Space,
    Newline,
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}

/// Closed tag set of token kinds. Punctuation and keywords are distinct
/// variants rather than a string payload so downstream matching is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Identifier,
    IntLiteral,
    FloatLiteral,
    String,
    Dot,
    DirectiveHash,

    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Amp,
    Pipe,
    Eq,
    Lt,
    Gt,
    PlusPlus,
    MinusMinus,
    EqEq,
    BangEq,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,

    // keywords
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,
    KwExtern,
    KwTypedef,
    KwStruct,
    KwConst,
    KwVolatile,
    KwRestrict,
    KwUnsigned,
    KwAttribute,
    KwNull,
}

/// Preprocessor-keyword classification, attached to identifier-like tokens
/// so the PP parser never needs to re-inspect a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpKind {
    Other,
    If,
    Else,
    Define,
    Undef,
    Include,
    Ifdef,
    Ifndef,
    Elif,
    Endif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pp_kind: PpKind,
    /// Index range into the lexer's trivia arena; see [`crate::lexer::Lexer`].
    pub leading_trivia: TriviaRange,
}

/// A half-open range of indices into a shared trivia arena. Kept index-based
/// (rather than `Vec<Trivia>` per token) so tokens stay small and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriviaRange {
    pub start: u32,
    pub end: u32,
}

impl TriviaRange {
    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Token {
    pub fn lexeme<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }

    /// Two tokens are adjacent when they share a source and no bytes (hence no
    /// trivia) separate the end of `self` from the start of `other`.
    pub fn adjacent_to(&self, other: &Token) -> bool {
        self.span.end() == other.span.start
    }
}

fn c_keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "return" => TokenKind::KwReturn,
        "if" => TokenKind::KwIf,
        "else" => TokenKind::KwElse,
        "while" => TokenKind::KwWhile,
        "for" => TokenKind::KwFor,
        "break" => TokenKind::KwBreak,
        "continue" => TokenKind::KwContinue,
        "extern" => TokenKind::KwExtern,
        "typedef" => TokenKind::KwTypedef,
        "struct" => TokenKind::KwStruct,
        "const" => TokenKind::KwConst,
        "volatile" => TokenKind::KwVolatile,
        "restrict" => TokenKind::KwRestrict,
        "unsigned" => TokenKind::KwUnsigned,
        "__attribute__" => TokenKind::KwAttribute,
        "NULL" => TokenKind::KwNull,
        _ => return None,
    })
}

fn pp_keyword(word: &str) -> PpKind {
    match word {
        "if" => PpKind::If,
        "else" => PpKind::Else,
        "define" => PpKind::Define,
        "undef" => PpKind::Undef,
        "include" => PpKind::Include,
        "ifdef" => PpKind::Ifdef,
        "ifndef" => PpKind::Ifndef,
        "elif" => PpKind::Elif,
        "endif" => PpKind::Endif,
        _ => PpKind::Other,
    }
}

/// Classifies an identifier-like lexeme into its (possibly keyword) token
/// kind and its independent preprocessor-keyword kind.
pub fn classify_identifier(word: &str) -> (TokenKind, PpKind) {
    let kind = c_keyword(word).unwrap_or(TokenKind::Identifier);
    (kind, pp_keyword(word))
}

/// Built-in C type names and Khronos-style fixed-width aliases that seed a
/// fresh parser's `typedef_names` table.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "void", "char", "int", "float", "double", "long", "short", "size_t", "ssize_t", "ptrdiff_t",
    "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t",
    "intptr_t", "uintptr_t", "wchar_t", "bool",
];
