//! Macro environment and projector: folds `#define`/`#undef` effects into an
//! ordered mapping and flattens the preprocessor tree into a single token
//! stream with object-like macro expansion applied.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::pp::{PpDefineDirective, PpGroupPart, PpTranslationUnit};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub enum Macro {
    Object {
        name: String,
        replacement_tokens: Vec<Token>,
    },
    Function {
        name: String,
        parameters: Vec<String>,
        is_variadic: bool,
        replacement_tokens: Vec<Token>,
    },
}

impl Macro {
    pub fn name(&self) -> &str {
        match self {
            Macro::Object { name, .. } => name,
            Macro::Function { name, .. } => name,
        }
    }

    fn from_define(d: &PpDefineDirective) -> Self {
        if d.is_function_like {
            Macro::Function {
                name: d.name.clone(),
                parameters: d.parameters.clone(),
                is_variadic: d.is_variadic,
                replacement_tokens: d.replacement_tokens.clone(),
            }
        } else {
            Macro::Object {
                name: d.name.clone(),
                replacement_tokens: d.replacement_tokens.clone(),
            }
        }
    }
}

/// Ordered `name -> Macro` mapping. `define` overwrites an existing entry of
/// the same name; `undef` of an undefined name is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MacroEnv {
    macros: IndexMap<String, Macro>,
}

impl MacroEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, macro_: Macro) {
        self.macros.insert(macro_.name().to_string(), macro_);
    }

    pub fn undef(&mut self, name: &str) {
        self.macros.shift_remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// Walks `pp_tu` in document order, folding macro definitions into `env` and
/// returning the flattened, object-macro-expanded token stream.
///
/// `#if` sections unconditionally descend into their `If` branch only; the
/// `#elif`/`#else` branches are structurally available but never emitted
/// (there is no conditional-expression evaluator in this revision).
pub fn project(source: &str, pp_tu: &PpTranslationUnit, env: &mut MacroEnv) -> Vec<Token> {
    let mut out = Vec::new();
    project_parts(source, &pp_tu.parts, env, &mut out);
    // `PpText` runs never include the lexer's trailing EOF token (they stop
    // at end-of-input or the next directive), so the declaration parser
    // would otherwise never see one. Append a synthetic EOF at source end.
    out.push(Token {
        kind: TokenKind::Eof,
        span: crate::span::Span::at(source.len()),
        pp_kind: crate::token::PpKind::Other,
        leading_trivia: crate::token::TriviaRange::empty(),
    });
    out
}

fn project_parts(source: &str, parts: &[PpGroupPart], env: &mut MacroEnv, out: &mut Vec<Token>) {
    for part in parts {
        match part {
            PpGroupPart::Text(tokens) => {
                for &tok in tokens {
                    expand_token(source, tok, env, &mut HashSet::new(), out);
                }
            }
            PpGroupPart::Define(d) => env.define(Macro::from_define(d)),
            PpGroupPart::Undef { name } => env.undef(name),
            PpGroupPart::IfSection { if_branch, .. } => {
                project_parts(source, &if_branch.body, env, out);
            }
            PpGroupPart::Include { .. } | PpGroupPart::Simple { .. } => {}
        }
    }
}

/// Expands one token into `out`. Object-like macro identifiers expand
/// recursively; `expanding` guards against any cycle (direct or mutual) by
/// dropping the inner occurrence of a name already being expanded.
/// Function-like macro names, and plain identifiers with no matching macro,
/// pass through unchanged.
fn expand_token(
    source: &str,
    tok: Token,
    env: &MacroEnv,
    expanding: &mut HashSet<String>,
    out: &mut Vec<Token>,
) {
    if tok.kind != TokenKind::Identifier {
        out.push(tok);
        return;
    }

    let name = tok.lexeme(source);
    if expanding.contains(name) {
        return;
    }

    match env.get(name) {
        Some(Macro::Object { replacement_tokens, .. }) => {
            expanding.insert(name.to_string());
            for &rep in replacement_tokens {
                expand_token(source, rep, env, expanding, out);
            }
            expanding.remove(name);
        }
        _ => out.push(tok),
    }
}
