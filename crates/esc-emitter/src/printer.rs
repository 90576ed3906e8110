//! Deterministic JS AST serializer.
//!
//! Two-space indentation, LF newlines, a newline after every top-level
//! statement, spaces around binary operators, double-quoted strings, and
//! shortest round-trip number formatting. Generated spans are backfilled
//! onto every node as it is written.

use crate::js_ast::{
    GenSpan, JsBinOp, JsDeclarator, JsExpr, JsExprKind, JsModule, JsObjPatProp, JsObjProp, JsPat,
    JsStmt, JsStmtKind,
};
use crate::source_writer::SourceWriter;

/// Print a module, backfilling generated spans in place.
pub fn print_module(module: &mut JsModule) -> String {
    let mut printer = Printer::new();
    printer.print_module(module);
    printer.into_output()
}

/// The printer owns the cursor-tracking writer.
pub struct Printer {
    writer: SourceWriter,
}

impl Printer {
    #[must_use]
    pub fn new() -> Self {
        Printer {
            writer: SourceWriter::new(),
        }
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.writer.into_output()
    }

    pub fn print_module(&mut self, module: &mut JsModule) {
        for stmt in &mut module.stmts {
            self.print_stmt(stmt);
            self.writer.write_line();
        }
    }

    fn mark(&self) -> (u32, u32) {
        (self.writer.current_line(), self.writer.current_column())
    }

    fn close_span(&self, start: (u32, u32)) -> GenSpan {
        GenSpan {
            start_line: start.0,
            start_col: start.1,
            end_line: self.writer.current_line(),
            end_col: self.writer.current_column(),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn print_stmt(&mut self, stmt: &mut JsStmt) {
        let start = self.mark();
        match &mut stmt.kind {
            JsStmtKind::Expr(expr) => {
                self.print_expr(expr);
                self.writer.write(";");
            }
            JsStmtKind::VarDecl {
                kind,
                declarators,
                export,
            } => {
                if *export {
                    self.writer.write("export ");
                }
                self.writer.write(kind.as_str());
                self.writer.write_space();
                let count = declarators.len();
                for (index, declarator) in declarators.iter_mut().enumerate() {
                    self.print_declarator(declarator);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(";");
            }
            JsStmtKind::Func {
                name,
                params,
                body,
                is_async,
                export,
            } => {
                if *export {
                    self.writer.write("export ");
                }
                if *is_async {
                    self.writer.write("async ");
                }
                self.writer.write("function ");
                self.writer.write(name);
                self.writer.write("(");
                let count = params.len();
                for (index, param) in params.iter().enumerate() {
                    self.print_pat(param);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(") ");
                self.print_body(body);
            }
            JsStmtKind::Return(arg) => {
                match arg {
                    Some(arg) => {
                        self.writer.write("return ");
                        self.print_expr(arg);
                    }
                    None => self.writer.write("return"),
                }
                self.writer.write(";");
            }
            JsStmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.writer.write("if (");
                self.print_expr(test);
                self.writer.write(") ");
                self.print_body(consequent);
                if let Some(alternate) = alternate {
                    self.writer.write(" else ");
                    self.print_body(alternate);
                }
            }
            JsStmtKind::Throw(arg) => {
                self.writer.write("throw ");
                self.print_expr(arg);
                self.writer.write(";");
            }
            JsStmtKind::Block(stmts) => {
                self.print_body(stmts);
            }
            JsStmtKind::Import { specifiers, path } => {
                self.writer.write("import { ");
                let count = specifiers.len();
                for (index, (imported, local)) in specifiers.iter().enumerate() {
                    self.writer.write(imported);
                    if let Some(local) = local {
                        self.writer.write(" as ");
                        self.writer.write(local);
                    }
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(" } from ");
                self.write_str_lit(path);
                self.writer.write(";");
            }
        }
        stmt.span = Some(self.close_span(start));
    }

    fn print_declarator(&mut self, declarator: &mut JsDeclarator) {
        self.print_pat(&declarator.pattern);
        if let Some(init) = &mut declarator.init {
            self.writer.write(" = ");
            self.print_expr(init);
        }
    }

    /// Print a brace-delimited statement list.
    fn print_body(&mut self, stmts: &mut Vec<JsStmt>) {
        if stmts.is_empty() {
            self.writer.write("{}");
            return;
        }
        self.writer.write("{");
        self.writer.write_line();
        self.writer.increase_indent();
        for stmt in stmts.iter_mut() {
            self.print_stmt(stmt);
            self.writer.write_line();
        }
        self.writer.decrease_indent();
        self.writer.write("}");
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn print_expr(&mut self, expr: &mut JsExpr) {
        let start = self.mark();
        match &mut expr.kind {
            JsExprKind::Num(value) => self.write_num(*value),
            JsExprKind::Str(value) => {
                let value = value.clone();
                self.write_str_lit(&value);
            }
            JsExprKind::Bool(value) => {
                self.writer.write(if *value { "true" } else { "false" });
            }
            JsExprKind::Null => self.writer.write("null"),
            JsExprKind::Raw(text) => {
                let text = text.clone();
                self.writer.write(&text);
            }
            JsExprKind::Ident(name) => {
                let name = name.clone();
                self.writer.write(&name);
            }
            JsExprKind::Member {
                obj,
                prop,
                opt_chain,
            } => {
                let prop = prop.clone();
                let opt = *opt_chain;
                self.print_operand(obj);
                self.writer.write(if opt { "?." } else { "." });
                self.writer.write(&prop);
            }
            JsExprKind::Index { obj, index } => {
                self.print_operand(obj);
                self.writer.write("[");
                self.print_expr(index);
                self.writer.write("]");
            }
            JsExprKind::Call { callee, args } => {
                let needs_parens = matches!(callee.kind, JsExprKind::Arrow { .. });
                if needs_parens {
                    self.writer.write("(");
                }
                self.print_expr(callee);
                if needs_parens {
                    self.writer.write(")");
                }
                self.writer.write("(");
                let count = args.len();
                for (index, arg) in args.iter_mut().enumerate() {
                    self.print_expr(arg);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(")");
            }
            JsExprKind::New { callee, args } => {
                self.writer.write("new ");
                self.print_operand(callee);
                self.writer.write("(");
                let count = args.len();
                for (index, arg) in args.iter_mut().enumerate() {
                    self.print_expr(arg);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(")");
            }
            JsExprKind::Unary { op, arg } => {
                self.writer.write(op.as_str());
                self.print_operand(arg);
            }
            JsExprKind::Binary { op, left, right } => {
                let op = *op;
                self.print_binary_operand(left, op, false);
                self.writer.write_space();
                self.writer.write(op.as_str());
                self.writer.write_space();
                self.print_binary_operand(right, op, true);
            }
            JsExprKind::Assign { target, value } => {
                self.print_expr(target);
                self.writer.write(" = ");
                self.print_expr(value);
            }
            JsExprKind::Cond { test, cons, alt } => {
                self.print_operand(test);
                self.writer.write(" ? ");
                self.print_expr(cons);
                self.writer.write(" : ");
                self.print_expr(alt);
            }
            JsExprKind::Arrow {
                params,
                body,
                is_async,
            } => {
                if *is_async {
                    self.writer.write("async ");
                }
                self.writer.write("(");
                let count = params.len();
                for (index, param) in params.iter().enumerate() {
                    self.print_pat(param);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(") => ");
                self.print_body(body);
            }
            JsExprKind::Await(arg) => {
                self.writer.write("await ");
                self.print_operand(arg);
            }
            JsExprKind::Spread(arg) => {
                self.writer.write("...");
                self.print_expr(arg);
            }
            JsExprKind::Array { elems } => {
                self.writer.write("[");
                let count = elems.len();
                for (index, elem) in elems.iter_mut().enumerate() {
                    self.print_expr(elem);
                    if index + 1 < count {
                        self.writer.write(", ");
                    }
                }
                self.writer.write("]");
            }
            JsExprKind::Object { props } => {
                if props.is_empty() {
                    self.writer.write("{}");
                } else {
                    self.writer.write("{ ");
                    let count = props.len();
                    for (index, prop) in props.iter_mut().enumerate() {
                        match prop {
                            JsObjProp::KeyValue { key, value } => {
                                let key = key.clone();
                                self.write_prop_key(&key);
                                self.writer.write(": ");
                                self.print_expr(value);
                            }
                            JsObjProp::Shorthand(name) => {
                                let name = name.clone();
                                self.writer.write(&name);
                            }
                            JsObjProp::Spread(arg) => {
                                self.writer.write("...");
                                self.print_expr(arg);
                            }
                        }
                        if index + 1 < count {
                            self.writer.write(", ");
                        }
                    }
                    self.writer.write(" }");
                }
            }
        }
        expr.span = Some(self.close_span(start));
    }

    /// Print an operand that must bind tighter than its parent; wraps
    /// binaries, conditionals, assignments, and arrows in parentheses.
    fn print_operand(&mut self, expr: &mut JsExpr) {
        let needs_parens = matches!(
            expr.kind,
            JsExprKind::Binary { .. }
                | JsExprKind::Cond { .. }
                | JsExprKind::Assign { .. }
                | JsExprKind::Arrow { .. }
        );
        if needs_parens {
            self.writer.write("(");
            self.print_expr(expr);
            self.writer.write(")");
        } else {
            self.print_expr(expr);
        }
    }

    fn print_binary_operand(&mut self, expr: &mut JsExpr, parent: JsBinOp, is_right: bool) {
        let needs_parens = match &expr.kind {
            JsExprKind::Binary { op, .. } => {
                let child = precedence(*op);
                let parent = precedence(parent);
                child < parent || (child == parent && is_right)
            }
            JsExprKind::Cond { .. } | JsExprKind::Assign { .. } | JsExprKind::Arrow { .. } => true,
            _ => false,
        };
        if needs_parens {
            self.writer.write("(");
            self.print_expr(expr);
            self.writer.write(")");
        } else {
            self.print_expr(expr);
        }
    }

    // =========================================================================
    // Patterns and literals
    // =========================================================================

    pub fn print_pat(&mut self, pat: &JsPat) {
        match pat {
            JsPat::Ident(name) => self.writer.write(name),
            JsPat::Array { elems, rest } => {
                self.writer.write("[");
                let mut first = true;
                for elem in elems {
                    if !first {
                        self.writer.write(", ");
                    }
                    first = false;
                    if let Some(elem) = elem {
                        self.print_pat(elem);
                    }
                }
                if let Some(rest) = rest {
                    if !first {
                        self.writer.write(", ");
                    }
                    self.writer.write("...");
                    self.print_pat(rest);
                }
                self.writer.write("]");
            }
            JsPat::Object { props, rest } => {
                self.writer.write("{");
                let mut first = true;
                for prop in props {
                    if !first {
                        self.writer.write(", ");
                    }
                    first = false;
                    match prop {
                        JsObjPatProp::Shorthand(name) => self.writer.write(name),
                        JsObjPatProp::KeyValue { key, value } => {
                            self.writer.write(key);
                            self.writer.write(": ");
                            self.print_pat(value);
                        }
                    }
                }
                if let Some(rest) = rest {
                    if !first {
                        self.writer.write(", ");
                    }
                    self.writer.write("...");
                    self.print_pat(rest);
                }
                self.writer.write("}");
            }
        }
    }

    /// Shortest decimal form that round-trips.
    fn write_num(&mut self, value: f64) {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 {
            let as_int = value as i64;
            self.writer.write(&as_int.to_string());
        } else {
            self.writer.write(&value.to_string());
        }
    }

    fn write_prop_key(&mut self, key: &str) {
        if is_valid_ident(key) {
            self.writer.write(key);
        } else {
            self.write_str_lit(key);
        }
    }

    fn write_str_lit(&mut self, value: &str) {
        self.writer.write_char('"');
        for ch in value.chars() {
            match ch {
                '"' => self.writer.write("\\\""),
                '\\' => self.writer.write("\\\\"),
                '\n' => self.writer.write("\\n"),
                '\r' => self.writer.write("\\r"),
                '\t' => self.writer.write("\\t"),
                c if (c as u32) < 0x20 => {
                    let escaped = format!("\\u{{{:x}}}", c as u32);
                    self.writer.write(&escaped);
                }
                c => self.writer.write_char(c),
            }
        }
        self.writer.write_char('"');
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

fn precedence(op: JsBinOp) -> u8 {
    match op {
        JsBinOp::Or => 1,
        JsBinOp::And => 2,
        JsBinOp::StrictEq | JsBinOp::StrictNotEq | JsBinOp::LooseEq | JsBinOp::LooseNotEq => 3,
        JsBinOp::Lt
        | JsBinOp::LtEq
        | JsBinOp::Gt
        | JsBinOp::GtEq
        | JsBinOp::In
        | JsBinOp::InstanceOf => 4,
        JsBinOp::Add | JsBinOp::Sub => 5,
        JsBinOp::Mul | JsBinOp::Div | JsBinOp::Mod => 6,
    }
}

fn is_valid_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod tests;
