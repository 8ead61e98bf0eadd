//! The C declaration AST: tagged sum types produced by [`crate::parser`].

/// `__attribute__((dllimport|dllexport))`, or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attribute {
    #[default]
    None,
    Import,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub is_struct: bool,
    pub name: String,
    pub pointer_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncPtrTypeRef {
    pub return_type: Box<TypeRef>,
    pub parameters: Vec<Param>,
    pub pointer_depth_to_function: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Plus,
    Minus,
    Not,
    AddressOf,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    NullLiteral,
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Postfix `++`/`--`.
    PostfixUnary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    Compound(Vec<BlockItem>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<ForInit>>,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
    },
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Decl(VarDecl),
    Expr(Expr),
}

/// A statement or a local declaration, as may appear inside a compound
/// statement body.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Decl(VarDecl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub attribute: Attribute,
    pub is_extern: bool,
    pub return_type: TypeRef,
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for a declaration-only prototype; `Some` for a definition.
    pub body: Option<Vec<BlockItem>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedefTarget {
    Type(TypeRef),
    FuncPtr(FuncPtrTypeRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub target: TypedefTarget,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub ty: TypeRef,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub attribute: Attribute,
    pub is_extern: bool,
    pub name: String,
    /// `None` for a forward declaration (`struct Tag;`).
    pub fields: Option<Vec<StructField>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Func(FuncDecl),
    Typedef(TypedefDecl),
    Struct(StructDecl),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationUnit {
    pub decls: Vec<Decl>,
}

#[cfg(test)]
mod dump_helpers {
    use super::*;
    use std::fmt::Write;

    impl TranslationUnit {
        /// Indented tree dump used by snapshot tests in place of derived
        /// `Debug` output, which is too noisy for a readable inline snapshot.
        pub fn dump(&self) -> String {
            let mut out = String::new();
            writeln!(out, "TranslationUnit").unwrap();
            for decl in &self.decls {
                dump_decl(&mut out, decl, 1);
            }
            out.truncate(out.trim_end_matches('\n').len());
            out
        }
    }

    fn indent(out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
    }

    fn dump_decl(out: &mut String, decl: &Decl, depth: usize) {
        indent(out, depth);
        match decl {
            Decl::Var(v) => {
                write!(out, "Var {} {}", v.ty.name, v.name).unwrap();
                if let Some(init) = &v.init {
                    write!(out, " = ").unwrap();
                    writeln!(out).unwrap();
                    dump_expr(out, init, depth + 1);
                } else {
                    writeln!(out).unwrap();
                }
            }
            Decl::Typedef(t) => {
                let target = match &t.target {
                    TypedefTarget::Type(ty) => ty.name.clone(),
                    TypedefTarget::FuncPtr(_) => "fn-ptr".to_string(),
                };
                writeln!(out, "Typedef {} : {}", t.name, target).unwrap();
            }
            Decl::Struct(s) => {
                writeln!(out, "Struct {} extern={}", s.name, s.is_extern).unwrap();
            }
            Decl::Func(f) => {
                let params: Vec<String> = f.params.iter().map(|p| format!("{} {}", p.ty.name, p.name)).collect();
                writeln!(out, "Func {}({})", f.name, params.join(", ")).unwrap();
                if let Some(body) = &f.body {
                    for item in body {
                        dump_block_item(out, item, depth + 1);
                    }
                }
            }
        }
    }

    fn dump_block_item(out: &mut String, item: &BlockItem, depth: usize) {
        match item {
            BlockItem::Decl(v) => dump_decl(out, &Decl::Var(v.clone()), depth),
            BlockItem::Stmt(s) => dump_stmt(out, s, depth),
        }
    }

    fn dump_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
        indent(out, depth);
        match stmt {
            Stmt::Expr(e) => {
                writeln!(out, "ExprStmt").unwrap();
                dump_expr(out, e, depth + 1);
            }
            Stmt::Return(value) => {
                writeln!(out, "Return").unwrap();
                if let Some(e) = value {
                    dump_expr(out, e, depth + 1);
                }
            }
            Stmt::Compound(items) => {
                writeln!(out, "Compound").unwrap();
                for item in items {
                    dump_block_item(out, item, depth + 1);
                }
            }
            Stmt::If { cond, then_branch, else_branch } => {
                writeln!(out, "If").unwrap();
                dump_expr(out, cond, depth + 1);
                dump_stmt(out, then_branch, depth + 1);
                if let Some(e) = else_branch {
                    dump_stmt(out, e, depth + 1);
                }
            }
            Stmt::While { cond, body } => {
                writeln!(out, "While").unwrap();
                dump_expr(out, cond, depth + 1);
                dump_stmt(out, body, depth + 1);
            }
            Stmt::For { init, cond, post, body } => {
                writeln!(out, "For").unwrap();
                if let Some(init) = init {
                    indent(out, depth + 1);
                    match init.as_ref() {
                        ForInit::Decl(v) => {
                            writeln!(out, "InitDecl").unwrap();
                            dump_decl(out, &Decl::Var(v.clone()), depth + 2);
                        }
                        ForInit::Expr(e) => {
                            writeln!(out, "InitExpr").unwrap();
                            dump_expr(out, e, depth + 2);
                        }
                    }
                }
                if let Some(cond) = cond {
                    dump_expr(out, cond, depth + 1);
                }
                if let Some(post) = post {
                    dump_expr(out, post, depth + 1);
                }
                dump_stmt(out, body, depth + 1);
            }
            Stmt::Break => {
                writeln!(out, "Break").unwrap();
            }
            Stmt::Continue => {
                writeln!(out, "Continue").unwrap();
            }
        }
    }

    fn dump_expr(out: &mut String, expr: &Expr, depth: usize) {
        indent(out, depth);
        match expr {
            Expr::IntLiteral(v) => writeln!(out, "Int {v}").unwrap(),
            Expr::FloatLiteral(v) => writeln!(out, "Float {v}").unwrap(),
            Expr::StringLiteral(v) => writeln!(out, "String {v:?}").unwrap(),
            Expr::NullLiteral => writeln!(out, "Null").unwrap(),
            Expr::Ident(name) => writeln!(out, "Ident {name}").unwrap(),
            Expr::Unary { op, operand } => {
                writeln!(out, "Unary {op:?}").unwrap();
                dump_expr(out, operand, depth + 1);
            }
            Expr::PostfixUnary { op, operand } => {
                writeln!(out, "PostfixUnary {op:?}").unwrap();
                dump_expr(out, operand, depth + 1);
            }
            Expr::Binary { op, lhs, rhs } => {
                writeln!(out, "Binary {op:?}").unwrap();
                dump_expr(out, lhs, depth + 1);
                dump_expr(out, rhs, depth + 1);
            }
            Expr::Assign { target, value } => {
                writeln!(out, "Assign").unwrap();
                dump_expr(out, target, depth + 1);
                dump_expr(out, value, depth + 1);
            }
            Expr::Call { callee, args } => {
                writeln!(out, "Call").unwrap();
                dump_expr(out, callee, depth + 1);
                for arg in args {
                    dump_expr(out, arg, depth + 1);
                }
            }
        }
    }
}
