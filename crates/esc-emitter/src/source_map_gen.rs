//! Source-map generation over a printed JS module.
//!
//! After printing, every JS node that carries a source back-pointer also
//! carries its generated span; walking the tree in print order yields one
//! segment per such node, in increasing generated (line, column). The
//! back-pointer's file id is a `Source.id`, which becomes the segment's
//! `srcIndex`: sources register in id order so index and id coincide.

use crate::js_ast::{JsExpr, JsExprKind, JsModule, JsObjProp, JsStmt, JsStmtKind, SourceRef};
use esc_ast::Source;
use esc_common::{SourceMap, SourceMapGenerator};
use rustc_hash::FxHashMap;

/// Generate a SourceMap v3 document for a printed module.
///
/// The module must have been printed already: segments come from the
/// generated spans the printer backfilled. One `sources[]` /
/// `sourcesContent[]` entry is emitted per input file.
pub fn generate_source_map(sources: &[Source], js: &JsModule, out_name: &str) -> SourceMap {
    build_generator(sources, js, out_name).generate()
}

/// Inline variant: the `sourceMappingURL` comment to append to the JS.
pub fn generate_inline_source_map(sources: &[Source], js: &JsModule, out_name: &str) -> String {
    build_generator(sources, js, out_name).generate_inline()
}

fn build_generator(sources: &[Source], js: &JsModule, out_name: &str) -> SourceMapGenerator {
    let mut generator = SourceMapGenerator::new(out_name.to_string());

    let mut ordered: Vec<&Source> = sources.iter().collect();
    ordered.sort_by_key(|source| source.id);
    let mut index_of: FxHashMap<u32, u32> = FxHashMap::default();
    for source in ordered {
        let index =
            generator.add_source_with_content(source.path.clone(), source.contents.clone());
        index_of.insert(source.id, index as u32);
    }

    for stmt in &js.stmts {
        visit_stmt(stmt, &index_of, &mut generator);
    }
    generator
}

fn add_segment(
    generator: &mut SourceMapGenerator,
    index_of: &FxHashMap<u32, u32>,
    source: SourceRef,
    span: crate::js_ast::GenSpan,
) {
    // A node from a file that was not part of this compilation (never the
    // case in practice) simply produces no segment.
    let Some(src_index) = index_of.get(&source.file).copied() else {
        return;
    };
    // Source positions are 1-based; the map wants 0-based.
    generator.add_simple_mapping(
        span.start_line,
        span.start_col,
        src_index,
        source.span.start.line.saturating_sub(1),
        source.span.start.column.saturating_sub(1),
    );
}

fn visit_stmt(
    stmt: &JsStmt,
    index_of: &FxHashMap<u32, u32>,
    generator: &mut SourceMapGenerator,
) {
    if let (Some(source), Some(span)) = (stmt.source, stmt.span) {
        add_segment(generator, index_of, source, span);
    }
    match &stmt.kind {
        JsStmtKind::Expr(expr) | JsStmtKind::Throw(expr) => {
            visit_expr(expr, index_of, generator);
        }
        JsStmtKind::VarDecl { declarators, .. } => {
            for declarator in declarators {
                if let Some(init) = &declarator.init {
                    visit_expr(init, index_of, generator);
                }
            }
        }
        JsStmtKind::Func { body, .. } => {
            for stmt in body {
                visit_stmt(stmt, index_of, generator);
            }
        }
        JsStmtKind::Return(arg) => {
            if let Some(arg) = arg {
                visit_expr(arg, index_of, generator);
            }
        }
        JsStmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            visit_expr(test, index_of, generator);
            for stmt in consequent {
                visit_stmt(stmt, index_of, generator);
            }
            if let Some(alternate) = alternate {
                for stmt in alternate {
                    visit_stmt(stmt, index_of, generator);
                }
            }
        }
        JsStmtKind::Block(stmts) => {
            for stmt in stmts {
                visit_stmt(stmt, index_of, generator);
            }
        }
        JsStmtKind::Import { .. } => {}
    }
}

fn visit_expr(
    expr: &JsExpr,
    index_of: &FxHashMap<u32, u32>,
    generator: &mut SourceMapGenerator,
) {
    if let (Some(source), Some(span)) = (expr.source, expr.span) {
        add_segment(generator, index_of, source, span);
    }
    match &expr.kind {
        JsExprKind::Num(_)
        | JsExprKind::Str(_)
        | JsExprKind::Bool(_)
        | JsExprKind::Null
        | JsExprKind::Raw(_)
        | JsExprKind::Ident(_) => {}
        JsExprKind::Member { obj, .. } => visit_expr(obj, index_of, generator),
        JsExprKind::Index { obj, index } => {
            visit_expr(obj, index_of, generator);
            visit_expr(index, index_of, generator);
        }
        JsExprKind::Call { callee, args } | JsExprKind::New { callee, args } => {
            visit_expr(callee, index_of, generator);
            for arg in args {
                visit_expr(arg, index_of, generator);
            }
        }
        JsExprKind::Unary { arg, .. }
        | JsExprKind::Await(arg)
        | JsExprKind::Spread(arg) => visit_expr(arg, index_of, generator),
        JsExprKind::Binary { left, right, .. } => {
            visit_expr(left, index_of, generator);
            visit_expr(right, index_of, generator);
        }
        JsExprKind::Assign { target, value } => {
            visit_expr(target, index_of, generator);
            visit_expr(value, index_of, generator);
        }
        JsExprKind::Cond { test, cons, alt } => {
            visit_expr(test, index_of, generator);
            visit_expr(cons, index_of, generator);
            visit_expr(alt, index_of, generator);
        }
        JsExprKind::Arrow { body, .. } => {
            for stmt in body {
                visit_stmt(stmt, index_of, generator);
            }
        }
        JsExprKind::Array { elems } => {
            for elem in elems {
                visit_expr(elem, index_of, generator);
            }
        }
        JsExprKind::Object { props } => {
            for prop in props {
                match prop {
                    JsObjProp::KeyValue { value, .. } => {
                        visit_expr(value, index_of, generator)
                    }
                    JsObjProp::Shorthand(_) => {}
                    JsObjProp::Spread(arg) => visit_expr(arg, index_of, generator),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/source_map_gen_tests.rs"]
mod tests;
