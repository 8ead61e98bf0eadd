//! A trivia-preserving lexer, preprocessor tree, macro projector, and
//! C-subset declaration parser for a C-like front end.
//!
//! The pipeline is four stages, each consuming the previous stage's output:
//!
//! ```
//! use cparse::{lexer, macros, parser, pp};
//!
//! let source = "#define SIZE 4\nint size = SIZE;\nint main(int argc){ return 0; }";
//! let (tokens, trivia) = lexer::lex(source).expect("lex");
//! let pp_tu = pp::pp_parse(source, &tokens, &trivia).expect("pp parse");
//! let mut env = macros::MacroEnv::new();
//! let projected = macros::project(source, &pp_tu, &mut env);
//! let tu = parser::parse(source, &projected).expect("parse");
//! assert_eq!(tu.decls.len(), 2);
//! ```
//!
//! Every stage returns `Result<T, Error>`; there is no recovery mode — the
//! first error aborts the whole pipeline. Use [`diagnostics::DiagnosticsPrinter`]
//! to render a fatal error as an annotated source excerpt.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod pp;
pub mod span;
pub mod token;

pub use error::{Error, Result};

/// Runs the full pipeline over one translation unit's source text and
/// returns the parsed declaration AST, without exposing the intermediate
/// token/PP-tree/macro-environment plumbing. Equivalent to driving
/// [`lexer::lex`], [`pp::pp_parse`], [`macros::project`], and [`parser::parse`]
/// by hand.
pub fn compile(source: &str) -> Result<ast::TranslationUnit> {
    let (tokens, trivia) = lexer::lex(source)?;
    let pp_tu = pp::pp_parse(source, &tokens, &trivia)?;
    let mut env = macros::MacroEnv::new();
    let projected = macros::project(source, &pp_tu, &mut env);
    parser::parse(source, &projected)
}
