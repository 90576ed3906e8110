//! End-to-end pipeline tests: source AST in, JavaScript + source map +
//! `.d.ts` out.

use escalier::ast::builder::*;
use escalier::ast::{
    BinaryOp, Decl, FuncParam, FuncSig, Module, ModuleItem, Parser, Script, Source, Stmt,
};
use escalier::common::{CompilerOptions, Diagnostic};
use escalier::compile;

/// Parser fixture: pre-built declarations keyed by path.
#[derive(Default)]
struct FixtureParser {
    decls: Vec<(String, Vec<Decl>)>,
}

impl FixtureParser {
    fn with(mut self, path: &str, decls: Vec<Decl>) -> Self {
        self.decls.push((path.to_string(), decls));
        self
    }
}

impl Parser for FixtureParser {
    fn parse_script(&self, source: &Source) -> (Script, Vec<Diagnostic>) {
        let stmts = self
            .decls
            .iter()
            .find(|(path, _)| *path == source.path)
            .map(|(_, decls)| decls.iter().cloned().map(Stmt::Decl).collect())
            .unwrap_or_default();
        (Script { stmts }, Vec::new())
    }

    fn parse_module(&self, sources: &[Source]) -> (Module, Vec<Diagnostic>) {
        let items = sources
            .iter()
            .map(|source| ModuleItem {
                source_id: source.id,
                path: source.path.clone(),
                decls: self
                    .decls
                    .iter()
                    .find(|(path, _)| *path == source.path)
                    .map(|(_, decls)| decls.clone())
                    .unwrap_or_default(),
            })
            .collect();
        (Module { items }, Vec::new())
    }
}

fn no_maps() -> CompilerOptions {
    CompilerOptions {
        source_maps: false,
        declarations: false,
        ..CompilerOptions::default()
    }
}

#[test]
fn test_simple_arithmetic_function() {
    // fn add(a, b) { return a + b }
    let body = block(vec![return_stmt(Some(binary(
        BinaryOp::Add,
        ident("a"),
        ident("b"),
    )))]);
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![func_decl("add", vec![func_param("a"), func_param("b")], body)],
    );
    let sources = [source(0, "main.esc", "fn add(a, b) { return a + b }")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(!result.has_errors(), "{:?}", result.type_errors);
    assert_eq!(
        result.js,
        "function add(temp1, temp2) {\n  \
           const a = temp1;\n  \
           const b = temp2;\n  \
           return a + b;\n\
         }\n"
    );
}

#[test]
fn test_namespace_mounting() {
    // val x = 42 in foo/x.esc
    let parser = FixtureParser::default().with("foo/x.esc", vec![var_decl("x", num(42.0))]);
    let sources = [source(0, "foo/x.esc", "val x = 42")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(!result.has_errors(), "{:?}", result.type_errors);
    assert_eq!(
        result.js,
        "const foo = {};\nconst foo__x = 42;\nfoo.x = foo__x;\n"
    );
}

#[test]
fn test_tuple_pattern_guard_lowering() {
    // val tuple = [42, "hello"]; val [n, s] = tuple
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![
            var_decl("tuple", tuple(vec![num(42.0), str_("hello")])),
            var_decl_with_pattern(
                tuple_pattern(vec![ident_pattern("n"), ident_pattern("s")]),
                ident("tuple"),
            ),
        ],
    );
    let sources = [source(0, "main.esc", "val tuple = [42, \"hello\"]")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(!result.has_errors(), "{:?}", result.type_errors);
    assert!(result.js.contains("if (tuple != null && tuple.length === 2) {"));
    assert!(result.js.contains("const [n, s] = tuple;"));
}

#[test]
fn test_interface_merging() {
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![
            interface_decl("Foo", vec![prop_ann("a", type_ref("number"))]),
            interface_decl("Foo", vec![prop_ann("b", type_ref("string"))]),
        ],
    );
    let sources = [source(0, "main.esc", "interface Foo { a: number }")];

    let options = CompilerOptions {
        source_maps: false,
        ..CompilerOptions::default()
    };
    let result = compile(&sources, &parser, &options);
    assert!(!result.has_errors(), "{:?}", result.type_errors);
    let dts = result.dts.expect("declarations requested");
    assert_eq!(dts, "interface Foo {\n  a: number;\n  b: string;\n}\n");
}

#[test]
fn test_jsx_element() {
    use escalier::ast::{Expr, JsxAttr, JsxAttrValue, JsxChild, JsxElement, Literal};
    use escalier::common::Span;
    let elem = JsxElement {
        tag: Box::new(ident("div")),
        attrs: vec![JsxAttr {
            name: "className".to_string(),
            value: Some(JsxAttrValue::Lit(Literal::Str("foo".to_string()))),
            span: Span::dummy(),
        }],
        children: vec![JsxChild::Text {
            text: "Hello".to_string(),
            span: Span::dummy(),
        }],
        span: Span::dummy(),
    };
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![var_decl("elem", Expr::JsxElement(elem))],
    );
    let sources = [source(0, "main.esc", "val elem = <div/>")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(!result.has_errors(), "{:?}", result.type_errors);
    assert_eq!(
        result.js,
        "import { jsx as _jsx } from \"react/jsx-runtime\";\n\
         const elem = _jsx(\"div\", { className: \"foo\", children: \"Hello\" });\n"
    );
}

#[test]
fn test_overloaded_function_dispatch() {
    let sig = |ty: &str| FuncSig {
        type_params: Vec::new(),
        params: vec![
            FuncParam {
                pattern: ident_pattern("x"),
                type_ann: Some(type_ref(ty)),
                optional: false,
            },
            FuncParam {
                pattern: ident_pattern("y"),
                type_ann: Some(type_ref(ty)),
                optional: false,
            },
        ],
        return_type: Some(type_ref(ty)),
        throws: None,
    };
    let body = block(vec![return_stmt(Some(binary(
        BinaryOp::Add,
        ident("x"),
        ident("y"),
    )))]);
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![
            func_decl_with_sig("add", sig("number"), Some(body.clone())),
            func_decl_with_sig("add", sig("string"), Some(body)),
        ],
    );
    let sources = [source(0, "main.esc", "fn add")];

    let options = CompilerOptions {
        source_maps: false,
        ..CompilerOptions::default()
    };
    let result = compile(&sources, &parser, &options);
    assert!(!result.has_errors(), "{:?}", result.type_errors);

    // One JS function dispatching on runtime argument types.
    assert_eq!(result.js.matches("function add(").count(), 1);
    assert!(result
        .js
        .contains("if (typeof temp1 === \"number\" && typeof temp2 === \"number\") {"));
    assert!(result
        .js
        .contains("if (typeof temp1 === \"string\" && typeof temp2 === \"string\") {"));

    // The .d.ts carries both declarations.
    let dts = result.dts.expect("declarations requested");
    assert!(dts.contains("declare function add(x: number, y: number): number;"));
    assert!(dts.contains("declare function add(x: string, y: string): string;"));
}

#[test]
fn test_source_map_emission() {
    let parser =
        FixtureParser::default().with("main.esc", vec![var_decl("x", num(1.0))]);
    let sources = [source(0, "main.esc", "val x = 1")];

    let result = compile(&sources, &parser, &CompilerOptions::default());
    assert!(result.source_map_json().is_some());
    let map = result.source_map.expect("source map requested");
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "main.js");
    assert_eq!(map.sources, vec!["main.esc"]);
}

#[test]
fn test_multi_source_source_map() {
    use escalier::common::source_map::decode_segments;
    use escalier::common::{Location, Span};

    // Two input files compiled together; each file's declarations map
    // back through its own srcIndex (the Source.id).
    let spanned = |name: &str, value: f64| {
        let mut decl = var_decl(
            name,
            escalier::ast::Expr::Lit {
                lit: escalier::ast::Literal::Num(value),
                span: Span::new(Location::new(1, 9), Location::new(1, 10)),
            },
        );
        if let Decl::Var(var) = &mut decl {
            var.span = Span::new(Location::new(1, 1), Location::new(1, 10));
        }
        decl
    };
    let parser = FixtureParser::default()
        .with("main.esc", vec![spanned("a", 1.0)])
        .with("foo/x.esc", vec![spanned("x", 2.0)]);
    let sources = [
        source(0, "main.esc", "val a = 1"),
        source(1, "foo/x.esc", "val x = 2"),
    ];

    let result = compile(&sources, &parser, &CompilerOptions::default());
    assert!(!result.has_errors(), "{:?}", result.type_errors);

    let map = result.source_map.expect("source map requested");
    assert_eq!(map.sources, vec!["main.esc", "foo/x.esc"]);
    assert_eq!(
        map.sources_content,
        Some(vec!["val a = 1".to_string(), "val x = 2".to_string()])
    );

    let segments: Vec<_> = decode_segments(&map.mappings)
        .into_iter()
        .flatten()
        .collect();
    assert!(segments.iter().any(|s| s.src_index == 0));
    assert!(segments.iter().any(|s| s.src_index == 1));
}

#[test]
fn test_cycle_error_suppresses_emission() {
    // val a = b; val b = a
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![var_decl("a", ident("b")), var_decl("b", ident("a"))],
    );
    let sources = [source(0, "main.esc", "val a = b")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(result
        .type_errors
        .iter()
        .any(|d| d.code == escalier::common::codes::DEPENDENCY_CYCLE));
    // Declarations whose types could not be closed are not emitted.
    assert_eq!(result.js, "");
}

#[test]
fn test_best_effort_output_with_type_errors() {
    // A type error in one decl does not stop emission of the others.
    let parser = FixtureParser::default().with(
        "main.esc",
        vec![
            var_decl("ok", num(1.0)),
            var_decl("bad", binary(BinaryOp::Mul, str_("x"), num(2.0))),
        ],
    );
    let sources = [source(0, "main.esc", "val ok = 1")];

    let result = compile(&sources, &parser, &no_maps());
    assert!(result.has_errors());
    assert!(result.js.contains("const ok = 1;"));
    assert!(result.js.contains("const bad = \"x\" * 2;"));
}
