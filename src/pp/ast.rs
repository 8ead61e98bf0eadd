//! The preprocessor tree: a structural (non-evaluating) view of a token
//! stream as directives and raw text runs.

use crate::token::Token;

/// Which directive kind opened an `#if`-family branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpIfKind {
    If,
    Ifdef,
    Ifndef,
    Elif,
}

/// One branch of an `#if` section: its opening condition tokens (empty for
/// `#else`, which is represented separately) and its nested body.
#[derive(Debug, Clone)]
pub struct PpIfBranch {
    pub kind: PpIfKind,
    pub condition: Vec<Token>,
    pub body: Vec<PpGroupPart>,
}

#[derive(Debug, Clone)]
pub struct PpDefineDirective {
    pub name: String,
    pub is_function_like: bool,
    pub parameters: Vec<String>,
    pub is_variadic: bool,
    pub replacement_tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
pub enum PpGroupPart {
    /// A maximal run of non-directive tokens.
    Text(Vec<Token>),
    Include { raw_tokens: Vec<Token> },
    Define(PpDefineDirective),
    Undef { name: String },
    IfSection {
        if_branch: PpIfBranch,
        elifs: Vec<PpIfBranch>,
        else_branch: Option<Vec<PpGroupPart>>,
    },
    /// Catch-all for a directive whose keyword isn't one of the above.
    Simple { keyword: Token, rest_of_line: Vec<Token> },
}

/// A fully parsed preprocessor tree for one translation unit.
#[derive(Debug, Clone, Default)]
pub struct PpTranslationUnit {
    pub parts: Vec<PpGroupPart>,
}
