use super::*;
use crate::builder::build_module;
use crate::printer::print_module;
use esc_ast::builder::*;
use esc_ast::{Expr, Literal, ModuleItem};
use esc_binder::build_dep_graph;
use esc_common::source_map::decode_segments;
use esc_common::{CompilerOptions, Location, Span};

fn spanned_num(value: f64, line: u32, column: u32) -> Expr {
    Expr::Lit {
        lit: Literal::Num(value),
        span: Span::new(Location::new(line, column), Location::new(line, column + 2)),
    }
}

fn spanned_var_decl(name: &str, init: Expr, line: u32) -> esc_ast::Decl {
    let mut decl = var_decl(name, init);
    if let esc_ast::Decl::Var(var) = &mut decl {
        var.span = Span::new(Location::new(line, 1), Location::new(line, 11));
    }
    decl
}

#[test]
fn test_segments_point_back_to_source() {
    // val x = 42 at line 1, with the literal at column 9.
    let decl = spanned_var_decl("x", spanned_num(42.0, 1, 9), 1);
    let module = module(vec![module_item("main.esc", vec![decl])]);
    let sources = [source(0, "main.esc", "val x = 42")];

    let graph = build_dep_graph(&module);
    let mut js = build_module(&module, &graph, &CompilerOptions::default());
    let text = print_module(&mut js);
    assert_eq!(text, "const x = 42;\n");

    let map = generate_source_map(&sources, &js, "main.js");
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "main.js");
    assert_eq!(map.sources, vec!["main.esc"]);
    assert_eq!(map.sources_content, Some(vec!["val x = 42".to_string()]));

    let groups = decode_segments(&map.mappings);
    // Two segments on generated line 0: the statement and the literal.
    assert_eq!(groups.len(), 1);
    let line = &groups[0];
    assert_eq!(line.len(), 2);
    // Statement: generated col 0 -> source line 0, col 0 (0-based).
    assert_eq!((line[0].gen_col, line[0].src_line, line[0].src_col), (0, 0, 0));
    // Literal: generated col 10 -> source col 8.
    assert_eq!((line[1].gen_col, line[1].src_line, line[1].src_col), (10, 0, 8));
}

#[test]
fn test_multi_source_segments_carry_src_index() {
    // Two input files; each declaration's segments must point back into
    // its own file, with srcIndex equal to the Source.id.
    let main_decl = spanned_var_decl("a", spanned_num(1.0, 1, 9), 1);
    let foo_decl = spanned_var_decl("x", spanned_num(2.0, 1, 9), 1);
    let module = module(vec![
        ModuleItem {
            source_id: 0,
            path: "main.esc".to_string(),
            decls: vec![main_decl],
        },
        ModuleItem {
            source_id: 1,
            path: "foo/x.esc".to_string(),
            decls: vec![foo_decl],
        },
    ]);
    let sources = [
        source(0, "main.esc", "val a = 1"),
        source(1, "foo/x.esc", "val x = 2"),
    ];

    let graph = build_dep_graph(&module);
    let mut js = build_module(&module, &graph, &CompilerOptions::default());
    let _ = print_module(&mut js);

    let map = generate_source_map(&sources, &js, "main.js");
    assert_eq!(map.sources, vec!["main.esc", "foo/x.esc"]);
    assert_eq!(
        map.sources_content,
        Some(vec!["val a = 1".to_string(), "val x = 2".to_string()])
    );

    let segments: Vec<_> = decode_segments(&map.mappings).into_iter().flatten().collect();
    assert!(segments.iter().any(|s| s.src_index == 0));
    assert!(segments.iter().any(|s| s.src_index == 1));
    // The foo declaration's literal maps into file 1 at line 0.
    assert!(segments
        .iter()
        .any(|s| s.src_index == 1 && s.src_line == 0 && s.src_col == 8));
}

#[test]
fn test_segments_increase_monotonically() {
    let decls = vec![
        spanned_var_decl("a", spanned_num(1.0, 1, 9), 1),
        spanned_var_decl("b", spanned_num(2.0, 2, 9), 2),
    ];
    let module = module(vec![module_item("main.esc", decls)]);
    let sources = [source(0, "main.esc", "val a = 1\nval b = 2")];

    let graph = build_dep_graph(&module);
    let mut js = build_module(&module, &graph, &CompilerOptions::default());
    let _ = print_module(&mut js);
    let map = generate_source_map(&sources, &js, "main.js");

    let groups = decode_segments(&map.mappings);
    for group in &groups {
        let mut prev = -1;
        for segment in group {
            assert!(segment.gen_col > prev);
            prev = segment.gen_col;
        }
    }
}

#[test]
fn test_inline_source_map_comment() {
    let module = module(vec![module_item("main.esc", vec![var_decl("x", num(1.0))])]);
    let sources = [source(0, "main.esc", "val x = 1")];
    let graph = build_dep_graph(&module);
    let mut js = build_module(&module, &graph, &CompilerOptions::default());
    let _ = print_module(&mut js);
    let inline = generate_inline_source_map(&sources, &js, "main.js");
    assert!(inline.starts_with("//# sourceMappingURL=data:application/json;base64,"));
}
