//! External declarations: `extern "C"` wrappers, `__attribute__`, typedefs
//! (including function-pointer typedefs), struct declarations, function
//! definitions/prototypes, and the global-variable fallback.

use crate::ast::{
    Attribute, Decl, FuncDecl, FuncPtrTypeRef, Param, StructDecl, StructField, TypedefDecl,
    TypedefTarget, VarDecl,
};
use crate::error::{Error, Result};
use crate::token::TokenKind;

use super::core::Parser;

impl<'s> Parser<'s> {
    /// One top-level declaration. An `extern "C"`/`extern "C++"` wrapper
    /// produces no AST node of its own; its contents splice directly into
    /// the caller's declaration list, each tagged `is_extern`.
    pub fn parse_external_decl(&mut self) -> Result<Vec<Decl>> {
        if self.at(TokenKind::KwExtern) && self.la(1).kind == TokenKind::String {
            self.advance(); // extern
            self.advance(); // "C" | "C++"
            self.expect(TokenKind::LBrace, "'{'")?;
            let mut decls = Vec::new();
            while !self.at(TokenKind::RBrace) && !self.eof() {
                decls.extend(self.parse_external_decl()?);
            }
            self.expect(TokenKind::RBrace, "'}'")?;
            for decl in &mut decls {
                mark_extern(decl);
            }
            return Ok(decls);
        }

        let attribute = self.parse_attribute()?;
        let is_extern = self.eat(TokenKind::KwExtern).is_some();

        if self.eat(TokenKind::KwTypedef).is_some() {
            return Ok(vec![Decl::Typedef(self.parse_typedef_decl()?)]);
        }

        if self.at(TokenKind::KwStruct) {
            if let Some(decl) = self.try_parse_struct_decl(attribute, is_extern)? {
                return Ok(vec![Decl::Struct(decl)]);
            }
        }

        let func_mark = self.mark();
        if let Some(func) = self.try_parse_func_def(attribute, is_extern)? {
            return Ok(vec![Decl::Func(func)]);
        }
        self.reset(func_mark);

        Ok(vec![Decl::Var(self.parse_global_var_decl()?)])
    }

    /// `__attribute__((dllimport|dllexport))`, or [`Attribute::None`].
    fn parse_attribute(&mut self) -> Result<Attribute> {
        if self.eat(TokenKind::KwAttribute).is_none() {
            return Ok(Attribute::None);
        }
        self.expect(TokenKind::LParen, "'('")?;
        self.expect(TokenKind::LParen, "'('")?;
        let ident_tok = self.expect(TokenKind::Identifier, "dllimport or dllexport")?;
        let attribute = match self.text(ident_tok) {
            "dllimport" => Attribute::Import,
            "dllexport" => Attribute::Export,
            _ => Attribute::None,
        };
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(attribute)
    }

    /// `struct Tag ;` or `struct Tag { fields } ;`. Returns `None` (resetting
    /// the reader) when `struct Tag` is not itself the whole declaration —
    /// i.e. it is being used as a type prefix for a function/variable, which
    /// the func-def/global-var fallback paths parse via `ParseTypeRef`.
    fn try_parse_struct_decl(&mut self, attribute: Attribute, is_extern: bool) -> Result<Option<StructDecl>> {
        let mark = self.mark();
        self.advance(); // 'struct'
        let Some(tag_tok) = self.eat(TokenKind::Identifier) else {
            self.reset(mark);
            return Ok(None);
        };
        let name = self.text(tag_tok).to_string();

        if self.eat(TokenKind::Semicolon).is_some() {
            self.struct_tags.insert(name.clone());
            return Ok(Some(StructDecl { attribute, is_extern, name, fields: None }));
        }

        if self.eat(TokenKind::LBrace).is_some() {
            self.struct_tags.insert(name.clone());
            let mut fields = Vec::new();
            while !self.at(TokenKind::RBrace) {
                let ty = self
                    .parse_type_ref()
                    .ok_or(Error::TypeSpecifierExpected { span: self.current().span })?;
                let field_name = self.expect(TokenKind::Identifier, "field name")?;
                self.expect(TokenKind::Semicolon, "';'")?;
                fields.push(StructField { ty, name: self.text(field_name).to_string() });
            }
            self.expect(TokenKind::RBrace, "'}'")?;
            self.expect(TokenKind::Semicolon, "';'")?;
            return Ok(Some(StructDecl { attribute, is_extern, name, fields: Some(fields) }));
        }

        self.reset(mark);
        Ok(None)
    }

    /// `typedef TYPE NAME ;` or the function-pointer form
    /// `typedef TYPE ( * NAME ) ( PARAMS ) ;`. Registers `NAME` in
    /// `typedef_names` on success.
    fn parse_typedef_decl(&mut self) -> Result<TypedefDecl> {
        let return_type = self
            .parse_type_ref()
            .ok_or(Error::TypeSpecifierExpected { span: self.current().span })?;

        if self.at(TokenKind::LParen) && self.la(1).kind == TokenKind::Star {
            self.advance(); // '('
            self.advance(); // '*'
            let name_tok = self.expect(TokenKind::Identifier, "typedef name")?;
            let name = self.text(name_tok).to_string();
            self.expect(TokenKind::RParen, "')'")?;
            self.expect(TokenKind::LParen, "'('")?;
            let parameters = self.parse_param_list()?;
            self.expect(TokenKind::Semicolon, "';'")?;

            self.typedef_names.insert(name.clone());
            return Ok(TypedefDecl {
                target: TypedefTarget::FuncPtr(FuncPtrTypeRef {
                    return_type: Box::new(return_type),
                    parameters,
                    pointer_depth_to_function: 1,
                }),
                name,
            });
        }

        let name_tok = self.expect(TokenKind::Identifier, "typedef name")?;
        let name = self.text(name_tok).to_string();
        self.expect(TokenKind::Semicolon, "';'")?;
        self.typedef_names.insert(name.clone());
        Ok(TypedefDecl { target: TypedefTarget::Type(return_type), name })
    }

    /// `ParseFuncDef`: type, name, `( params )`, then either `;` (prototype)
    /// or a compound body. Returns `None` (without guaranteeing the reader
    /// is reset — the caller resets to its own mark) when this isn't a
    /// function head at all.
    fn try_parse_func_def(&mut self, attribute: Attribute, is_extern: bool) -> Result<Option<FuncDecl>> {
        let Some(return_type) = self.parse_type_ref() else {
            return Ok(None);
        };
        let Some(name_tok) = self.eat(TokenKind::Identifier) else {
            return Ok(None);
        };
        if self.eat(TokenKind::LParen).is_none() {
            return Ok(None);
        }
        let params = self.parse_param_list()?;

        if self.eat(TokenKind::Semicolon).is_some() {
            return Ok(Some(FuncDecl {
                attribute,
                is_extern,
                return_type,
                name: self.text(name_tok).to_string(),
                params,
                body: None,
            }));
        }

        if self.at(TokenKind::LBrace) {
            let body = self.parse_compound()?;
            return Ok(Some(FuncDecl {
                attribute,
                is_extern,
                return_type,
                name: self.text(name_tok).to_string(),
                params,
                body: Some(body),
            }));
        }

        Ok(None)
    }

    /// `type name [= expr] ;`, the fallback when a declaration head is
    /// neither a typedef, struct, nor function definition.
    fn parse_global_var_decl(&mut self) -> Result<VarDecl> {
        let ty = self
            .parse_type_ref()
            .ok_or(Error::TypeSpecifierExpected { span: self.current().span })?;
        let name_tok = self.expect(TokenKind::Identifier, "variable name")?;
        let init = if self.eat(TokenKind::Eq).is_some() {
            Some(self.parse_assignment_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(VarDecl { ty, name: self.text(name_tok).to_string(), init })
    }

    /// Parameter list after the opening `(` has already been consumed.
    /// `(void)` collapses to an empty list; consumes the closing `)`.
    pub(super) fn parse_param_list(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();

        if self.eat(TokenKind::RParen).is_some() {
            return Ok(params);
        }

        let void_mark = self.mark();
        if let Some(ty) = self.parse_type_ref() {
            if ty.name == "void" && ty.pointer_depth == 0 && self.at(TokenKind::RParen) {
                self.advance();
                return Ok(params);
            }
        }
        self.reset(void_mark);

        loop {
            let ty = self
                .parse_type_ref()
                .ok_or(Error::TypeSpecifierExpected { span: self.current().span })?;
            let name_tok = self.expect(TokenKind::Identifier, "parameter name")?;
            params.push(Param { ty, name: self.text(name_tok).to_string() });
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            break;
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }
}

fn mark_extern(decl: &mut Decl) {
    match decl {
        Decl::Func(f) => f.is_extern = true,
        Decl::Struct(s) => s.is_extern = true,
        Decl::Var(_) | Decl::Typedef(_) => {}
    }
}
