//! `ParseTypeRef`: the primary backtracking point. A type reference is an
//! optional `struct` prefix, an optional fused `unsigned`, a name that must
//! already be a known type (or struct tag), and a run of `*` for pointer
//! depth. Failure resets the reader and returns `None`.

use crate::ast::TypeRef;
use crate::token::TokenKind;

use super::core::Parser;

impl<'s> Parser<'s> {
    pub fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let mark = self.mark();

        let is_struct = self.eat(TokenKind::KwStruct).is_some();

        let name = if is_struct {
            let Some(tag_tok) = self.eat(TokenKind::Identifier) else {
                self.reset(mark);
                return None;
            };
            let tag = self.text(tag_tok).to_string();
            if !self.struct_tags.contains(&tag) {
                self.reset(mark);
                return None;
            }
            tag
        } else {
            let unsigned = self.eat(TokenKind::KwUnsigned).is_some();

            if self.at(TokenKind::Identifier) {
                let ident = self.text(self.current()).to_string();
                if self.typedef_names.contains(&ident) {
                    self.advance();
                    if unsigned {
                        format!("unsigned {ident}")
                    } else {
                        ident
                    }
                } else if unsigned {
                    // bare `unsigned` with no following base type: implies `unsigned int`.
                    "unsigned int".to_string()
                } else {
                    self.reset(mark);
                    return None;
                }
            } else if unsigned {
                "unsigned int".to_string()
            } else {
                self.reset(mark);
                return None;
            }
        };

        let mut pointer_depth = 0u32;
        while self.eat(TokenKind::Star).is_some() {
            pointer_depth += 1;
        }

        Some(TypeRef { is_struct, name, pointer_depth })
    }
}
