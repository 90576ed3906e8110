use super::*;
use crate::js_ast::{
    JsBinOp, JsDeclKind, JsDeclarator, JsExpr, JsExprKind, JsModule, JsPat, JsStmt, JsStmtKind,
};

fn print_stmts(stmts: Vec<JsStmt>) -> String {
    let mut module = JsModule { stmts };
    print_module(&mut module)
}

#[test]
fn test_const_decl() {
    let stmt = JsStmt::const_decl(JsPat::Ident("x".to_string()), JsExpr::num(42.0));
    assert_eq!(print_stmts(vec![stmt]), "const x = 42;\n");
}

#[test]
fn test_binary_spacing_and_precedence() {
    // a + b * c needs no parens; (a + b) * c does.
    let sum = JsExpr::binary(
        JsBinOp::Add,
        JsExpr::ident("a"),
        JsExpr::binary(JsBinOp::Mul, JsExpr::ident("b"), JsExpr::ident("c")),
    );
    assert_eq!(print_stmts(vec![JsStmt::expr(sum)]), "a + b * c;\n");

    let product = JsExpr::binary(
        JsBinOp::Mul,
        JsExpr::binary(JsBinOp::Add, JsExpr::ident("a"), JsExpr::ident("b")),
        JsExpr::ident("c"),
    );
    assert_eq!(print_stmts(vec![JsStmt::expr(product)]), "(a + b) * c;\n");
}

#[test]
fn test_guard_conjunction_prints_flat() {
    // tuple != null && tuple.length === 2
    let guard = JsExpr::binary(
        JsBinOp::And,
        JsExpr::binary(
            JsBinOp::LooseNotEq,
            JsExpr::ident("tuple"),
            JsExpr::new(JsExprKind::Null),
        ),
        JsExpr::binary(
            JsBinOp::StrictEq,
            JsExpr::member(JsExpr::ident("tuple"), "length"),
            JsExpr::num(2.0),
        ),
    );
    assert_eq!(
        print_stmts(vec![JsStmt::expr(guard)]),
        "tuple != null && tuple.length === 2;\n"
    );
}

#[test]
fn test_function_statement() {
    let body = vec![JsStmt::new(JsStmtKind::Return(Some(JsExpr::binary(
        JsBinOp::Add,
        JsExpr::ident("a"),
        JsExpr::ident("b"),
    ))))];
    let func = JsStmt::new(JsStmtKind::Func {
        name: "add".to_string(),
        params: vec![
            JsPat::Ident("a".to_string()),
            JsPat::Ident("b".to_string()),
        ],
        body,
        is_async: false,
        export: false,
    });
    assert_eq!(
        print_stmts(vec![func]),
        "function add(a, b) {\n  return a + b;\n}\n"
    );
}

#[test]
fn test_if_statement_with_destructuring() {
    let body = vec![JsStmt::const_decl(
        JsPat::Array {
            elems: vec![
                Some(JsPat::Ident("n".to_string())),
                Some(JsPat::Ident("s".to_string())),
            ],
            rest: None,
        },
        JsExpr::ident("tuple"),
    )];
    let stmt = JsStmt::new(JsStmtKind::If {
        test: JsExpr::ident("ok"),
        consequent: body,
        alternate: None,
    });
    assert_eq!(
        print_stmts(vec![stmt]),
        "if (ok) {\n  const [n, s] = tuple;\n}\n"
    );
}

#[test]
fn test_string_escaping() {
    let stmt = JsStmt::expr(JsExpr::str("he said \"hi\"\n"));
    assert_eq!(print_stmts(vec![stmt]), "\"he said \\\"hi\\\"\\n\";\n");
}

#[test]
fn test_number_formatting() {
    assert_eq!(print_stmts(vec![JsStmt::expr(JsExpr::num(5.0))]), "5;\n");
    assert_eq!(print_stmts(vec![JsStmt::expr(JsExpr::num(1.5))]), "1.5;\n");
    assert_eq!(
        print_stmts(vec![JsStmt::expr(JsExpr::num(0.25))]),
        "0.25;\n"
    );
    // Integral values print without a fractional part.
    assert_eq!(
        print_stmts(vec![JsStmt::expr(JsExpr::num(-3.0))]),
        "-3;\n"
    );
}

#[test]
fn test_import_statement() {
    let stmt = JsStmt::new(JsStmtKind::Import {
        specifiers: vec![
            ("jsx".to_string(), Some("_jsx".to_string())),
            ("Fragment".to_string(), Some("_Fragment".to_string())),
        ],
        path: "react/jsx-runtime".to_string(),
    });
    assert_eq!(
        print_stmts(vec![stmt]),
        "import { jsx as _jsx, Fragment as _Fragment } from \"react/jsx-runtime\";\n"
    );
}

#[test]
fn test_iife_callee_is_parenthesized() {
    let iife = JsExpr::call(
        JsExpr::new(JsExprKind::Arrow {
            params: Vec::new(),
            body: vec![JsStmt::new(JsStmtKind::Return(Some(JsExpr::num(1.0))))],
            is_async: false,
        }),
        Vec::new(),
    );
    assert_eq!(
        print_stmts(vec![JsStmt::expr(iife)]),
        "(() => {\n  return 1;\n})();\n"
    );
}

#[test]
fn test_span_backfill() {
    let mut module = JsModule {
        stmts: vec![
            JsStmt::const_decl(JsPat::Ident("x".to_string()), JsExpr::num(1.0)),
            JsStmt::const_decl(JsPat::Ident("y".to_string()), JsExpr::num(2.0)),
        ],
    };
    let _ = print_module(&mut module);
    let first = module.stmts[0].span.expect("span backfilled");
    let second = module.stmts[1].span.expect("span backfilled");
    assert_eq!(first.start_line, 0);
    assert_eq!(first.start_col, 0);
    assert_eq!(second.start_line, 1);
    // The init expr also carries its generated span.
    if let JsStmtKind::VarDecl { declarators, .. } = &module.stmts[0].kind {
        let init = declarators[0].init.as_ref().unwrap();
        let span = init.span.expect("expr span backfilled");
        assert_eq!((span.start_line, span.start_col), (0, 10));
    } else {
        panic!("expected var decl");
    }
}

#[test]
fn test_object_literal() {
    let obj = JsExpr::new(JsExprKind::Object {
        props: vec![
            crate::js_ast::JsObjProp::KeyValue {
                key: "className".to_string(),
                value: JsExpr::str("foo"),
            },
            crate::js_ast::JsObjProp::KeyValue {
                key: "children".to_string(),
                value: JsExpr::str("Hello"),
            },
        ],
    });
    let stmt = JsStmt::const_decl(JsPat::Ident("elem".to_string()), obj);
    assert_eq!(
        print_stmts(vec![stmt]),
        "const elem = { className: \"foo\", children: \"Hello\" };\n"
    );
}
