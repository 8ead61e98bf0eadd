//! End-to-end pipeline scenarios and parser boundary behaviors.

use indoc::indoc;

use crate::ast::{BinaryOp, BlockItem, Decl, Expr, ForInit, Stmt, TypedefTarget};
use crate::compile;

#[test]
fn arithmetic_program_produces_call_expr() {
    let source = "int add(int a,int b){return a+b;} int main(int argc){return add(3,4);}";
    let tu = compile(source).unwrap();
    assert_eq!(tu.decls.len(), 2);

    let Decl::Func(main_fn) = &tu.decls[1] else { panic!("expected function") };
    let body = main_fn.body.as_ref().unwrap();
    let BlockItem::Stmt(Stmt::Return(Some(Expr::Call { callee, args }))) = &body[0] else {
        panic!("expected return of a call expression, got {:?}", body[0])
    };
    assert_eq!(**callee, Expr::Ident("add".to_string()));
    assert_eq!(args.len(), 2);
    assert_eq!(args[0], Expr::IntLiteral(3));
    assert_eq!(args[1], Expr::IntLiteral(4));
}

#[test]
fn for_loop_with_break_and_continue() {
    let source = indoc! {"
        int main(int argc){
            for(int i=0;i<10;i++){
                if(i==3) continue;
                if(i==7) break;
            }
            return 0;
        }
    "};
    let tu = compile(source).unwrap();
    let Decl::Func(main_fn) = &tu.decls[0] else { panic!("expected function") };
    let body = main_fn.body.as_ref().unwrap();
    let BlockItem::Stmt(Stmt::For { init, cond, post, body: for_body }) = &body[0] else {
        panic!("expected for statement, got {:?}", body[0])
    };

    let Some(init) = init else { panic!("expected for-init") };
    let ForInit::Decl(decl) = init.as_ref() else { panic!("expected declaration init") };
    assert_eq!(decl.name, "i");
    assert_eq!(decl.init, Some(Expr::IntLiteral(0)));

    assert!(matches!(cond, Some(Expr::Binary { op: BinaryOp::Lt, .. })));
    assert!(post.is_some());

    let Stmt::Compound(items) = for_body.as_ref() else { panic!("expected compound body") };
    assert_eq!(items.len(), 2);
    let BlockItem::Stmt(Stmt::If { then_branch, .. }) = &items[0] else { panic!("expected if") };
    assert_eq!(**then_branch, Stmt::Continue);
    let BlockItem::Stmt(Stmt::If { then_branch, .. }) = &items[1] else { panic!("expected if") };
    assert_eq!(**then_branch, Stmt::Break);
}

#[test]
fn typedef_disambiguates_from_expression() {
    let source = "typedef int my_int; my_int x = 5; int main(int argc){ my_int y = x + 1; return y; }";
    let tu = compile(source).unwrap();

    let Decl::Typedef(td) = &tu.decls[0] else { panic!("expected typedef") };
    assert_eq!(td.name, "my_int");
    assert_eq!(td.target, TypedefTarget::Type(crate::ast::TypeRef {
        is_struct: false,
        name: "int".to_string(),
        pointer_depth: 0,
    }));

    let Decl::Var(global) = &tu.decls[1] else { panic!("expected global var decl") };
    assert_eq!(global.ty.name, "my_int");

    let Decl::Func(main_fn) = &tu.decls[2] else { panic!("expected function") };
    let body = main_fn.body.as_ref().unwrap();
    let BlockItem::Decl(local) = &body[0] else { panic!("expected local decl, got {:?}", body[0]) };
    assert_eq!(local.ty.name, "my_int");
    assert_eq!(local.name, "y");
}

#[test]
fn function_like_macro_left_unexpanded_object_macro_expanded() {
    let source = "#define A 1\n#define B(x) x\nint f(int a){ return A; }";
    let tu = compile(source).unwrap();
    let Decl::Func(f) = &tu.decls[0] else { panic!("expected function") };
    let body = f.body.as_ref().unwrap();
    assert_eq!(body[0], BlockItem::Stmt(Stmt::Return(Some(Expr::IntLiteral(1)))));
}

#[test]
fn opaque_struct_and_pointer_typedef() {
    let source = "struct GLFWwindow; typedef struct GLFWwindow* GLFWwindowPtr;";
    let tu = compile(source).unwrap();

    let Decl::Struct(forward) = &tu.decls[0] else { panic!("expected struct forward decl") };
    assert_eq!(forward.name, "GLFWwindow");
    assert!(forward.fields.is_none());

    let Decl::Typedef(td) = &tu.decls[1] else { panic!("expected typedef") };
    assert_eq!(td.name, "GLFWwindowPtr");
    let TypedefTarget::Type(ty) = &td.target else { panic!("expected plain type target") };
    assert!(ty.is_struct);
    assert_eq!(ty.name, "GLFWwindow");
    assert_eq!(ty.pointer_depth, 1);
}

#[test]
fn nested_if_section_structure_survives_through_pp_and_macro_stages() {
    let source = indoc! {"
        #ifdef A
        int x;
        #elif defined B
        int y;
        #else
        int z;
        #endif
    "};
    let (tokens, trivia) = crate::lexer::lex(source).unwrap();
    let pp_tu = crate::pp::pp_parse(source, &tokens, &trivia).unwrap();
    assert_eq!(pp_tu.parts.len(), 1);

    // the projector always takes the `If` branch in this revision.
    let tu = compile(source).unwrap();
    assert_eq!(tu.decls.len(), 1);
    let Decl::Var(v) = &tu.decls[0] else { panic!("expected var decl") };
    assert_eq!(v.name, "x");
}

#[test]
fn empty_input_yields_empty_translation_unit() {
    let tu = compile("").unwrap();
    assert!(tu.decls.is_empty());
}

#[test]
fn redefinition_overwrites_and_undef_is_noop_through_full_pipeline() {
    let source = "#define A 1\n#define A 2\nint p = A;\n#undef A\n#undef A\nint q = 0;";
    let tu = compile(source).unwrap();
    let Decl::Var(p) = &tu.decls[0] else { panic!("expected var decl") };
    assert_eq!(p.init, Some(Expr::IntLiteral(2)));
}

#[test]
fn arithmetic_program_dump_snapshot() {
    let source = "int add(int a,int b){return a+b;} int main(int argc){return add(3,4);}";
    let tu = compile(source).unwrap();
    insta::assert_snapshot!(tu.dump(), @r"
    TranslationUnit
      Func add(int a, int b)
        Return
          Binary Add
            Ident a
            Ident b
      Func main(int argc)
        Return
          Call
            Ident add
            Int 3
            Int 4
    ");
}

#[test]
fn unterminated_comment_is_fatal() {
    assert!(compile("/* never closes").is_err());
}

#[test]
fn missing_semicolon_is_fatal_with_no_recovery() {
    assert!(compile("int x = 5").is_err());
}
