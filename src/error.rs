//! Typed, fatal errors for every pipeline stage.
//!
//! Every stage returns `Result<T, Error>`; there is no recovery mode. Each
//! variant carries the offending [`Span`] as a structured field (not only
//! baked into the message) so a caller can act on error *shape* without
//! parsing text, and so [`crate::diagnostics`] can render a caret under it.

use crate::span::Span;
use crate::token::TokenKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unexpected character {found:?}")]
    UnexpectedChar { span: Span, found: char },

    #[error("unmatched #{directive} with no open #if section")]
    UnmatchedDirective { span: Span, directive: &'static str },

    #[error("missing #endif before end of file")]
    MissingEndif { span: Span },

    #[error("malformed parameter list in #define")]
    MalformedMacroParams { span: Span },

    #[error("expected {expected}, found {found:?}")]
    ExpectedToken {
        span: Span,
        expected: &'static str,
        found: TokenKind,
    },

    #[error("expected a type specifier")]
    TypeSpecifierExpected { span: Span },

    #[error("expected a primary expression")]
    PrimaryExpressionExpected { span: Span },

    #[error("recursion limit exceeded while parsing")]
    RecursionLimitExceeded { span: Span },
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::UnterminatedComment { span }
            | Error::UnterminatedString { span }
            | Error::UnexpectedChar { span, .. }
            | Error::UnmatchedDirective { span, .. }
            | Error::MissingEndif { span }
            | Error::MalformedMacroParams { span }
            | Error::ExpectedToken { span, .. }
            | Error::TypeSpecifierExpected { span }
            | Error::PrimaryExpressionExpected { span }
            | Error::RecursionLimitExceeded { span } => *span,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
