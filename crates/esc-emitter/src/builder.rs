//! Lowering from the source AST to the JS AST.
//!
//! Declarations are emitted in the scheduler's topological order.
//! Namespaced declarations fold to dunder-prefixed file-scope names with
//! mount assignments onto namespace objects; merged overload groups
//! compile to a single dispatching function.

use crate::js_ast::{
    JsBinOp, JsDeclKind, JsDeclarator, JsExpr, JsExprKind, JsModule, JsObjProp, JsPat, JsStmt,
    JsStmtKind, JsUnaryOp,
};
use esc_ast::{
    Block, Decl, Expr, FuncBody, FuncDecl, Literal, Module, ObjLitElem, Pattern, Stmt, TypeAnn,
    VarDecl, VarKind,
};
use esc_binder::{BindingKey, BindingKind, DepGraph};
use esc_common::{CompilerOptions, Span, Spanned};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Lower a checked module to a JS module.
pub fn build_module(module: &Module, graph: &DepGraph, options: &CompilerOptions) -> JsModule {
    JsBuilder::new(module, graph, options.clone()).build()
}

/// The JS builder. Pattern lowering lives in `patterns.rs` and JSX
/// lowering in `jsx.rs`, both as `impl JsBuilder` blocks.
pub struct JsBuilder<'a> {
    module: &'a Module,
    graph: &'a DepGraph,
    options: CompilerOptions,
    temps: u32,
    /// Set when an extractor pattern needs the runtime matcher helper.
    pub(crate) needs_matcher_import: bool,
    pub(crate) jsx_uses_jsx: bool,
    pub(crate) jsx_uses_jsxs: bool,
    pub(crate) jsx_uses_fragment: bool,
    /// Namespace prefixes whose init chain has been emitted.
    defined_namespaces: FxHashSet<String>,
    /// Keys whose binding type could not be closed; their declarations
    /// are not emitted.
    suppressed: FxHashSet<BindingKey>,
    /// Top-level names per namespace, for dunder folding of sibling refs.
    ns_names: FxHashMap<String, FxHashSet<String>>,
    current_namespace: String,
    /// Shadowing stack of locally bound names.
    locals: Vec<FxHashSet<String>>,
}

impl<'a> JsBuilder<'a> {
    pub fn new(module: &'a Module, graph: &'a DepGraph, options: CompilerOptions) -> Self {
        let mut ns_names: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for (key, namespace) in &graph.namespace {
            if key.kind == BindingKind::Value {
                ns_names
                    .entry(namespace.clone())
                    .or_default()
                    .insert(key.local_name().to_string());
            }
        }
        JsBuilder {
            module,
            graph,
            options,
            temps: 0,
            needs_matcher_import: false,
            jsx_uses_jsx: false,
            jsx_uses_jsxs: false,
            jsx_uses_fragment: false,
            defined_namespaces: FxHashSet::default(),
            suppressed: FxHashSet::default(),
            ns_names,
            current_namespace: String::new(),
            locals: vec![FxHashSet::default()],
        }
    }

    /// Suppress emission for declarations whose binding type could not be
    /// closed.
    pub fn suppress<I: IntoIterator<Item = BindingKey>>(&mut self, keys: I) {
        self.suppressed.extend(keys);
    }

    /// Build the whole module in schedule order, then prepend the imports
    /// the lowering recorded.
    pub fn build(&mut self) -> JsModule {
        let mut stmts: Vec<JsStmt> = Vec::new();
        let mut processed: FxHashSet<(usize, usize)> = FxHashSet::default();

        let components = self.graph.components.clone();
        for component in &components {
            for key in component {
                if key.kind == BindingKind::Type || self.suppressed.contains(key) {
                    continue;
                }
                let decl_refs = match self.graph.decls.get(key) {
                    Some(refs) => refs.clone(),
                    None => continue,
                };
                if decl_refs
                    .iter()
                    .all(|r| processed.contains(&(r.item, r.decl)))
                {
                    continue;
                }
                processed.extend(decl_refs.iter().map(|r| (r.item, r.decl)));

                let namespace = self
                    .graph
                    .namespace
                    .get(key)
                    .cloned()
                    .unwrap_or_default();
                self.current_namespace = namespace.clone();

                let stmts_before = stmts.len();
                if decl_refs.len() > 1 {
                    let funcs: Vec<&FuncDecl> = decl_refs
                        .iter()
                        .filter_map(|r| match self.graph.decl(self.module, *r) {
                            Decl::Func(func) => Some(func),
                            _ => None,
                        })
                        .collect();
                    self.lower_overload_group(key.local_name(), &funcs, &namespace, &mut stmts);
                } else {
                    let decl = self.graph.decl(self.module, decl_refs[0]);
                    self.lower_top_decl(decl, &namespace, &mut stmts);
                }

                // Attribute every node of this declaration to its source
                // file; the id becomes the srcIndex in emitted maps.
                let file = self.module.items[decl_refs[0].item].source_id;
                for stmt in &mut stmts[stmts_before..] {
                    crate::js_ast::stamp_source_file(stmt, file);
                }
            }
        }

        let mut out = Vec::new();
        self.prepend_imports(&mut out);
        out.extend(stmts);
        JsModule { stmts: out }
    }

    fn prepend_imports(&self, out: &mut Vec<JsStmt>) {
        if self.jsx_uses_jsx || self.jsx_uses_jsxs || self.jsx_uses_fragment {
            let mut specifiers = Vec::new();
            if self.jsx_uses_jsx {
                specifiers.push(("jsx".to_string(), Some("_jsx".to_string())));
            }
            if self.jsx_uses_jsxs {
                specifiers.push(("jsxs".to_string(), Some("_jsxs".to_string())));
            }
            if self.jsx_uses_fragment {
                specifiers.push(("Fragment".to_string(), Some("_Fragment".to_string())));
            }
            out.push(JsStmt::new(JsStmtKind::Import {
                specifiers,
                path: self.options.jsx_runtime_module.clone(),
            }));
        }
        if self.needs_matcher_import {
            out.push(JsStmt::new(JsStmtKind::Import {
                specifiers: vec![("invokeCustomMatcherOrThrow".to_string(), None)],
                path: "@escalier/runtime".to_string(),
            }));
        }
    }

    // =========================================================================
    // Scope and name folding helpers
    // =========================================================================

    pub(crate) fn fresh_temp(&mut self) -> String {
        self.temps += 1;
        format!("temp{}", self.temps)
    }

    fn reset_temps(&mut self) {
        self.temps = 0;
    }

    pub(crate) fn push_locals(&mut self) {
        self.locals.push(FxHashSet::default());
    }

    pub(crate) fn pop_locals(&mut self) {
        self.locals.pop();
    }

    pub(crate) fn declare_local(&mut self, name: &str) {
        if let Some(frame) = self.locals.last_mut() {
            frame.insert(name.to_string());
        }
    }

    fn is_local(&self, name: &str) -> bool {
        self.locals.iter().any(|frame| frame.contains(name))
    }

    /// Fold a dotted declaration name to its file-scope identifier.
    fn dunder(namespace: &str, name: &str) -> String {
        if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}__{name}", namespace.replace('.', "__"))
        }
    }

    /// Resolve an identifier: locals stay bare; top-level siblings in the
    /// current namespace fold to their dunder name; qualified references
    /// go through the mounted namespace objects.
    fn resolve_ident(&self, ident: &esc_ast::Ident) -> JsExpr {
        if let Some(namespace) = &ident.namespace {
            let mut expr = JsExpr::ident(namespace.split('.').next().unwrap_or_default());
            for segment in namespace.split('.').skip(1) {
                expr = JsExpr::member(expr, segment);
            }
            return JsExpr::with_source(
                JsExprKind::Member {
                    obj: Box::new(expr),
                    prop: ident.name.clone(),
                    opt_chain: false,
                },
                ident.span,
            );
        }
        if !self.is_local(&ident.name)
            && !self.current_namespace.is_empty()
            && self
                .ns_names
                .get(&self.current_namespace)
                .is_some_and(|names| names.contains(&ident.name))
        {
            return JsExpr::with_source(
                JsExprKind::Ident(Self::dunder(&self.current_namespace, &ident.name)),
                ident.span,
            );
        }
        JsExpr::with_source(JsExprKind::Ident(ident.name.clone()), ident.span)
    }

    /// Emit the `const a = {}; a.b = {};` chain for a namespace, once per
    /// prefix across the module.
    fn ensure_namespace_objects(&mut self, namespace: &str, out: &mut Vec<JsStmt>) {
        if namespace.is_empty() {
            return;
        }
        let segments: Vec<&str> = namespace.split('.').collect();
        let mut prefix = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if !self.defined_namespaces.insert(prefix.clone()) {
                continue;
            }
            let empty = JsExpr::new(JsExprKind::Object { props: Vec::new() });
            if index == 0 {
                out.push(JsStmt::const_decl(JsPat::Ident(segment.to_string()), empty));
            } else {
                let mut target = JsExpr::ident(segments[0]);
                for seg in &segments[1..=index] {
                    target = JsExpr::member(target, *seg);
                }
                out.push(JsStmt::expr(JsExpr::new(JsExprKind::Assign {
                    target: Box::new(target),
                    value: Box::new(empty),
                })));
            }
        }
    }

    /// `a.b.x = a__b__x;`
    fn mount_assignment(namespace: &str, name: &str) -> JsStmt {
        let mut target = JsExpr::ident(namespace.split('.').next().unwrap_or_default());
        for segment in namespace.split('.').skip(1) {
            target = JsExpr::member(target, segment);
        }
        target = JsExpr::member(target, name);
        JsStmt::expr(JsExpr::new(JsExprKind::Assign {
            target: Box::new(target),
            value: Box::new(JsExpr::ident(Self::dunder(namespace, name))),
        }))
    }

    // =========================================================================
    // Top-level declarations
    // =========================================================================

    fn lower_top_decl(&mut self, decl: &Decl, namespace: &str, out: &mut Vec<JsStmt>) {
        match decl {
            Decl::Var(var) => self.lower_top_var(var, namespace, out),
            Decl::Func(func) => self.lower_top_func(func, namespace, out),
            Decl::TypeAlias(_) | Decl::Interface(_) => {}
            Decl::Class(_) | Decl::Enum(_) => {
                debug!("skipping unimplemented declaration in emit");
            }
            Decl::Namespace(ns) => {
                let nested = if namespace.is_empty() {
                    ns.name.clone()
                } else {
                    format!("{namespace}.{}", ns.name)
                };
                let saved = std::mem::replace(&mut self.current_namespace, nested.clone());
                for inner in &ns.decls {
                    self.lower_top_decl(inner, &nested, out);
                }
                self.current_namespace = saved;
            }
        }
    }

    fn lower_top_var(&mut self, var: &VarDecl, namespace: &str, out: &mut Vec<JsStmt>) {
        if var.declare {
            return;
        }
        let init = match &var.init {
            Some(init) => self.lower_expr(init),
            None => JsExpr::undefined(),
        };
        self.ensure_namespace_objects(namespace, out);

        let kind = match var.kind {
            VarKind::Val => JsDeclKind::Const,
            VarKind::Var => JsDeclKind::Let,
        };

        match &var.pattern {
            Pattern::Ident { name, .. } => {
                let folded = Self::dunder(namespace, name);
                out.push(JsStmt::with_source(
                    JsStmtKind::VarDecl {
                        kind,
                        declarators: vec![JsDeclarator {
                            pattern: JsPat::Ident(folded),
                            init: Some(init),
                        }],
                        export: var.export && namespace.is_empty(),
                    },
                    var.span,
                ));
                if !namespace.is_empty() {
                    out.push(Self::mount_assignment(namespace, name));
                }
            }
            pattern => {
                // Refutable or destructuring pattern: guard then bind.
                let (target, mut setup) = self.stable_target(init);
                let (pre, checks, mut bindings) = self.lower_pattern(pattern, &target);
                setup.extend(pre);

                if !namespace.is_empty() {
                    let mut names = Vec::new();
                    pattern.binding_names(&mut names);
                    for name in names {
                        let mut mount = JsExpr::ident(
                            namespace.split('.').next().unwrap_or_default(),
                        );
                        for segment in namespace.split('.').skip(1) {
                            mount = JsExpr::member(mount, segment);
                        }
                        mount = JsExpr::member(mount, &name);
                        bindings.push(JsStmt::expr(JsExpr::new(JsExprKind::Assign {
                            target: Box::new(mount),
                            value: Box::new(JsExpr::ident(name)),
                        })));
                    }
                }

                out.extend(setup);
                match conjoin(checks) {
                    Some(test) => out.push(JsStmt::with_source(
                        JsStmtKind::If {
                            test,
                            consequent: bindings,
                            alternate: None,
                        },
                        var.span,
                    )),
                    None => out.extend(bindings),
                }
            }
        }
    }

    /// Reuse simple targets directly; bind anything else to a temp so the
    /// guard does not re-evaluate it.
    fn stable_target(&mut self, init: JsExpr) -> (JsExpr, Vec<JsStmt>) {
        match &init.kind {
            JsExprKind::Ident(_) => (init, Vec::new()),
            _ => {
                let temp = self.fresh_temp();
                let stmt = JsStmt::const_decl(JsPat::Ident(temp.clone()), init);
                (JsExpr::ident(temp), vec![stmt])
            }
        }
    }

    fn lower_top_func(&mut self, func: &FuncDecl, namespace: &str, out: &mut Vec<JsStmt>) {
        if func.declare || func.body.is_none() {
            return;
        }
        self.ensure_namespace_objects(namespace, out);
        self.reset_temps();
        self.push_locals();

        let (params, body) = self.lower_func_params_and_body(
            &func.sig.params,
            func.body.as_ref().expect("checked above"),
        );

        self.pop_locals();
        out.push(JsStmt::with_source(
            JsStmtKind::Func {
                name: Self::dunder(namespace, &func.name),
                params,
                body,
                is_async: func.is_async,
                export: func.export && namespace.is_empty(),
            },
            func.span,
        ));
        if !namespace.is_empty() {
            out.push(Self::mount_assignment(namespace, &func.name));
        }
    }

    /// Parameters always lower to fresh temporaries; the original names
    /// bind in a destructuring preamble at the top of the body.
    pub(crate) fn lower_func_params_and_body(
        &mut self,
        params: &[esc_ast::FuncParam],
        body: &Block,
    ) -> (Vec<JsPat>, Vec<JsStmt>) {
        let mut js_params = Vec::new();
        let mut preamble = Vec::new();
        for param in params {
            let temp = self.fresh_temp();
            js_params.push(JsPat::Ident(temp.clone()));
            let target = JsExpr::ident(temp);
            let (pre, _checks, bindings) = self.lower_pattern(&param.pattern, &target);
            preamble.extend(pre);
            preamble.extend(bindings);
        }
        let mut stmts = preamble;
        stmts.extend(self.lower_stmts(&body.stmts));
        (js_params, stmts)
    }

    /// The overload group compiles to one function that dispatches on the
    /// runtime `typeof` of the distinguishing parameters.
    fn lower_overload_group(
        &mut self,
        name: &str,
        overloads: &[&FuncDecl],
        namespace: &str,
        out: &mut Vec<JsStmt>,
    ) {
        let with_bodies: Vec<&FuncDecl> = overloads
            .iter()
            .copied()
            .filter(|f| f.body.is_some() && !f.declare)
            .collect();
        if with_bodies.is_empty() {
            return;
        }
        if with_bodies.len() == 1 {
            self.lower_top_func(with_bodies[0], namespace, out);
            return;
        }

        self.ensure_namespace_objects(namespace, out);
        self.reset_temps();
        self.push_locals();

        let max_params = with_bodies
            .iter()
            .map(|f| f.sig.params.len())
            .max()
            .unwrap_or(0);
        let temps: Vec<String> = (0..max_params).map(|_| self.fresh_temp()).collect();

        let mut body: Vec<JsStmt> = Vec::new();
        for overload in &with_bodies {
            let mut checks: Vec<JsExpr> = Vec::new();
            for (index, param) in overload.sig.params.iter().enumerate() {
                if let Some(tag) = param.type_ann.as_ref().and_then(typeof_tag) {
                    checks.push(JsExpr::binary(
                        JsBinOp::StrictEq,
                        JsExpr::new(JsExprKind::Unary {
                            op: JsUnaryOp::TypeOf,
                            arg: Box::new(JsExpr::ident(&temps[index])),
                        }),
                        JsExpr::str(tag),
                    ));
                }
            }
            // Arity distinguishes overloads with fewer parameters.
            for temp in temps.iter().skip(overload.sig.params.len()) {
                checks.push(JsExpr::binary(
                    JsBinOp::StrictEq,
                    JsExpr::ident(temp),
                    JsExpr::undefined(),
                ));
            }

            self.push_locals();
            let mut arm: Vec<JsStmt> = Vec::new();
            for (index, param) in overload.sig.params.iter().enumerate() {
                let target = JsExpr::ident(&temps[index]);
                let (pre, _checks, bindings) = self.lower_pattern(&param.pattern, &target);
                arm.extend(pre);
                arm.extend(bindings);
            }
            let block = overload.body.as_ref().expect("filtered above");
            arm.extend(self.lower_stmts(&block.stmts));
            self.pop_locals();

            match conjoin(checks) {
                Some(test) => body.push(JsStmt::new(JsStmtKind::If {
                    test,
                    consequent: arm,
                    alternate: None,
                })),
                None => body.extend(arm),
            }
        }
        body.push(JsStmt::new(JsStmtKind::Throw(JsExpr::new(
            JsExprKind::New {
                callee: Box::new(JsExpr::ident("TypeError")),
                args: vec![JsExpr::str("no overload matches this call")],
            },
        ))));

        self.pop_locals();
        let span = with_bodies[0].span;
        out.push(JsStmt::with_source(
            JsStmtKind::Func {
                name: Self::dunder(namespace, name),
                params: temps.into_iter().map(JsPat::Ident).collect(),
                body,
                is_async: false,
                export: with_bodies.iter().any(|f| f.export) && namespace.is_empty(),
            },
            span,
        ));
        if !namespace.is_empty() {
            out.push(Self::mount_assignment(namespace, name));
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn lower_stmts(&mut self, stmts: &[Stmt]) -> Vec<JsStmt> {
        let mut out = Vec::new();
        for stmt in stmts {
            self.lower_stmt(stmt, &mut out);
        }
        out
    }

    fn lower_stmt(&mut self, stmt: &Stmt, out: &mut Vec<JsStmt>) {
        match stmt {
            Stmt::Expr { expr, span } => {
                let lowered = self.lower_expr(expr);
                out.push(JsStmt::with_source(JsStmtKind::Expr(lowered), *span));
            }
            Stmt::Decl(decl) => self.lower_local_decl(decl, out),
            Stmt::Return { arg, span } => {
                let lowered = arg.as_ref().map(|arg| self.lower_expr(arg));
                out.push(JsStmt::with_source(JsStmtKind::Return(lowered), *span));
            }
            Stmt::Block(block) => {
                self.push_locals();
                let stmts = self.lower_stmts(&block.stmts);
                self.pop_locals();
                out.push(JsStmt::with_source(JsStmtKind::Block(stmts), block.span));
            }
            Stmt::If {
                cond,
                consequent,
                alternate,
                span,
            } => {
                let test = self.lower_expr(cond);
                self.push_locals();
                let consequent = self.lower_stmts(&consequent.stmts);
                self.pop_locals();
                let alternate = alternate.as_ref().map(|block| {
                    self.push_locals();
                    let stmts = self.lower_stmts(&block.stmts);
                    self.pop_locals();
                    stmts
                });
                out.push(JsStmt::with_source(
                    JsStmtKind::If {
                        test,
                        consequent,
                        alternate,
                    },
                    *span,
                ));
            }
            Stmt::Throw { arg, span } => {
                let lowered = self.lower_expr(arg);
                out.push(JsStmt::with_source(JsStmtKind::Throw(lowered), *span));
            }
            Stmt::Import {
                specifiers,
                path,
                span,
            } => {
                for spec in specifiers {
                    let local = spec.alias.as_deref().unwrap_or(&spec.name);
                    self.declare_local(local);
                }
                out.push(JsStmt::with_source(
                    JsStmtKind::Import {
                        specifiers: specifiers
                            .iter()
                            .map(|s| (s.name.clone(), s.alias.clone()))
                            .collect(),
                        path: path.clone(),
                    },
                    *span,
                ));
            }
        }
    }

    fn lower_local_decl(&mut self, decl: &Decl, out: &mut Vec<JsStmt>) {
        match decl {
            Decl::Var(var) => {
                if var.declare {
                    return;
                }
                let init = match &var.init {
                    Some(init) => self.lower_expr(init),
                    None => JsExpr::undefined(),
                };
                let kind = match var.kind {
                    VarKind::Val => JsDeclKind::Const,
                    VarKind::Var => JsDeclKind::Let,
                };
                match &var.pattern {
                    Pattern::Ident { name, .. } => {
                        self.declare_local(name);
                        out.push(JsStmt::with_source(
                            JsStmtKind::VarDecl {
                                kind,
                                declarators: vec![JsDeclarator {
                                    pattern: JsPat::Ident(name.clone()),
                                    init: Some(init),
                                }],
                                export: false,
                            },
                            var.span,
                        ));
                    }
                    pattern => {
                        let (target, setup) = self.stable_target(init);
                        let (pre, checks, bindings) = self.lower_pattern(pattern, &target);
                        out.extend(setup);
                        out.extend(pre);
                        match conjoin(checks) {
                            Some(test) => out.push(JsStmt::with_source(
                                JsStmtKind::If {
                                    test,
                                    consequent: bindings,
                                    alternate: None,
                                },
                                var.span,
                            )),
                            None => out.extend(bindings),
                        }
                    }
                }
            }
            Decl::Func(func) => {
                if func.declare || func.body.is_none() {
                    return;
                }
                self.declare_local(&func.name);
                self.push_locals();
                let (params, body) = self.lower_func_params_and_body(
                    &func.sig.params,
                    func.body.as_ref().expect("checked above"),
                );
                self.pop_locals();
                out.push(JsStmt::with_source(
                    JsStmtKind::Func {
                        name: func.name.clone(),
                        params,
                        body,
                        is_async: func.is_async,
                        export: false,
                    },
                    func.span,
                ));
            }
            Decl::TypeAlias(_) | Decl::Interface(_) => {}
            _ => {}
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> JsExpr {
        match expr {
            Expr::Lit { lit, span } => lower_literal(lit, *span),
            Expr::Ident(ident) => self.resolve_ident(ident),
            Expr::Member {
                obj,
                prop,
                opt_chain,
                span,
            } => {
                let obj = self.lower_expr(obj);
                JsExpr::with_source(
                    JsExprKind::Member {
                        obj: Box::new(obj),
                        prop: prop.clone(),
                        opt_chain: *opt_chain,
                    },
                    *span,
                )
            }
            Expr::Index {
                obj, index, span, ..
            } => {
                let obj = self.lower_expr(obj);
                let index = self.lower_expr(index);
                JsExpr::with_source(
                    JsExprKind::Index {
                        obj: Box::new(obj),
                        index: Box::new(index),
                    },
                    *span,
                )
            }
            Expr::Call {
                callee, args, span, ..
            } => {
                let callee = self.lower_expr(callee);
                let args = args.iter().map(|arg| self.lower_expr(arg)).collect();
                JsExpr::with_source(
                    JsExprKind::Call {
                        callee: Box::new(callee),
                        args,
                    },
                    *span,
                )
            }
            Expr::Unary { op, arg, span } => {
                let arg = self.lower_expr(arg);
                let op = match op {
                    esc_ast::UnaryOp::Minus => JsUnaryOp::Minus,
                    esc_ast::UnaryOp::Not => JsUnaryOp::Not,
                };
                JsExpr::with_source(
                    JsExprKind::Unary {
                        op,
                        arg: Box::new(arg),
                    },
                    *span,
                )
            }
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                JsExpr::with_source(
                    JsExprKind::Binary {
                        op: lower_bin_op(*op),
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    *span,
                )
            }
            Expr::Func {
                params,
                body,
                is_async,
                span,
                ..
            } => {
                self.push_locals();
                let block;
                let body_block = match body {
                    FuncBody::Block(b) => b,
                    FuncBody::Expr(expr) => {
                        block = Block {
                            stmts: vec![Stmt::Return {
                                arg: Some((**expr).clone()),
                                span: expr.span(),
                            }],
                            span: expr.span(),
                        };
                        &block
                    }
                };
                let (js_params, js_body) =
                    self.lower_func_params_and_body(params, body_block);
                self.pop_locals();
                JsExpr::with_source(
                    JsExprKind::Arrow {
                        params: js_params,
                        body: js_body,
                        is_async: *is_async,
                    },
                    *span,
                )
            }
            Expr::Tuple { elems, span } => {
                let elems = elems
                    .iter()
                    .map(|elem| match elem {
                        Expr::Spread { arg, span } => JsExpr::with_source(
                            JsExprKind::Spread(Box::new(self.lower_expr(arg))),
                            *span,
                        ),
                        _ => self.lower_expr(elem),
                    })
                    .collect();
                JsExpr::with_source(JsExprKind::Array { elems }, *span)
            }
            Expr::Spread { arg, span } => JsExpr::with_source(
                JsExprKind::Spread(Box::new(self.lower_expr(arg))),
                *span,
            ),
            Expr::Object { elems, span } => {
                let props = elems
                    .iter()
                    .map(|elem| match elem {
                        ObjLitElem::KeyValue { key, value, .. } => JsObjProp::KeyValue {
                            key: key.clone(),
                            value: self.lower_expr(value),
                        },
                        ObjLitElem::Shorthand { key, .. } => JsObjProp::Shorthand(key.clone()),
                        ObjLitElem::Spread { arg, .. } => JsObjProp::Spread(self.lower_expr(arg)),
                    })
                    .collect();
                JsExpr::with_source(JsExprKind::Object { props }, *span)
            }
            Expr::If {
                cond,
                consequent,
                alternate,
                span,
            } => self.lower_if_expr(cond, consequent, alternate.as_deref(), *span),
            Expr::Match {
                target,
                cases,
                span,
            } => self.lower_match_expr(target, cases, *span),
            Expr::Await { arg, span } => {
                let arg = self.lower_expr(arg);
                JsExpr::with_source(JsExprKind::Await(Box::new(arg)), *span)
            }
            Expr::Throw { arg, span } => {
                let arg = self.lower_expr(arg);
                let body = vec![JsStmt::new(JsStmtKind::Throw(arg))];
                JsExpr::with_source(iife(body), *span)
            }
            Expr::Do { body, span } => {
                if let Some(single) = single_expr(body) {
                    return self.lower_expr(single);
                }
                self.push_locals();
                let stmts = self.lower_block_value(body);
                self.pop_locals();
                JsExpr::with_source(iife(stmts), *span)
            }
            Expr::JsxElement(elem) => self.lower_jsx_element(elem),
            Expr::JsxFragment(frag) => self.lower_jsx_fragment(frag),
        }
    }

    fn lower_if_expr(
        &mut self,
        cond: &Expr,
        consequent: &Block,
        alternate: Option<&Expr>,
        span: Span,
    ) -> JsExpr {
        let test = self.lower_expr(cond);

        // Simple branches fold to a conditional expression.
        let cons_simple = single_expr(consequent);
        let alt_simple = match alternate {
            Some(Expr::Do { body, .. }) => single_expr(body),
            Some(other) if !matches!(other, Expr::If { .. } | Expr::Match { .. }) => Some(other),
            _ => None,
        };
        if let (Some(cons), Some(alt)) = (cons_simple, alt_simple) {
            let cons = self.lower_expr(cons);
            let alt = self.lower_expr(alt);
            return JsExpr::with_source(
                JsExprKind::Cond {
                    test: Box::new(test),
                    cons: Box::new(cons),
                    alt: Box::new(alt),
                },
                span,
            );
        }

        self.push_locals();
        let cons_stmts = self.lower_block_value(consequent);
        self.pop_locals();
        let alt_stmts = alternate.map(|alt| {
            let lowered = self.lower_expr(alt);
            vec![JsStmt::new(JsStmtKind::Return(Some(lowered)))]
        });
        let body = vec![JsStmt::new(JsStmtKind::If {
            test,
            consequent: cons_stmts,
            alternate: alt_stmts,
        })];
        JsExpr::with_source(iife(body), span)
    }

    fn lower_match_expr(
        &mut self,
        target: &Expr,
        cases: &[esc_ast::MatchCase],
        span: Span,
    ) -> JsExpr {
        let lowered_target = self.lower_expr(target);
        let mut body: Vec<JsStmt> = Vec::new();
        let (subject, setup) = self.stable_target(lowered_target);
        body.extend(setup);

        for case in cases {
            self.push_locals();
            let (pre, checks, mut arm) = self.lower_pattern(&case.pattern, &subject);
            body.extend(pre);

            let result = self.lower_expr(&case.body);
            match &case.guard {
                Some(guard) => {
                    let guard = self.lower_expr(guard);
                    arm.push(JsStmt::new(JsStmtKind::If {
                        test: guard,
                        consequent: vec![JsStmt::new(JsStmtKind::Return(Some(result)))],
                        alternate: None,
                    }));
                }
                None => arm.push(JsStmt::new(JsStmtKind::Return(Some(result)))),
            }
            self.pop_locals();

            match conjoin(checks) {
                Some(test) => body.push(JsStmt::new(JsStmtKind::If {
                    test,
                    consequent: arm,
                    alternate: None,
                })),
                None => body.extend(arm),
            }
        }
        body.push(JsStmt::new(JsStmtKind::Throw(JsExpr::new(
            JsExprKind::New {
                callee: Box::new(JsExpr::ident("TypeError")),
                args: vec![JsExpr::str("no case matched the subject")],
            },
        ))));
        JsExpr::with_source(iife(body), span)
    }

    /// Lower a block whose value is its trailing expression; the trailing
    /// expression becomes a `return`.
    pub(crate) fn lower_block_value(&mut self, block: &Block) -> Vec<JsStmt> {
        let mut out = Vec::new();
        let count = block.stmts.len();
        for (index, stmt) in block.stmts.iter().enumerate() {
            if index + 1 == count {
                if let Stmt::Expr { expr, span } = stmt {
                    let lowered = self.lower_expr(expr);
                    out.push(JsStmt::with_source(
                        JsStmtKind::Return(Some(lowered)),
                        *span,
                    ));
                    continue;
                }
            }
            self.lower_stmt(stmt, &mut out);
        }
        out
    }
}

/// Conjoin checks with short-circuit `&&`, left-to-right.
pub(crate) fn conjoin(checks: Vec<JsExpr>) -> Option<JsExpr> {
    let mut iter = checks.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, check| {
        JsExpr::binary(JsBinOp::And, acc, check)
    }))
}

/// An immediately-invoked arrow returning its body's value.
fn iife(body: Vec<JsStmt>) -> JsExprKind {
    JsExprKind::Call {
        callee: Box::new(JsExpr::new(JsExprKind::Arrow {
            params: Vec::new(),
            body,
            is_async: false,
        })),
        args: Vec::new(),
    }
}

fn single_expr(block: &Block) -> Option<&Expr> {
    match block.stmts.as_slice() {
        [Stmt::Expr { expr, .. }] => Some(expr),
        _ => None,
    }
}

pub(crate) fn lower_literal(lit: &Literal, span: Span) -> JsExpr {
    let kind = match lit {
        Literal::Num(n) => JsExprKind::Num(*n),
        Literal::Str(s) => JsExprKind::Str(s.clone()),
        Literal::Bool(b) => JsExprKind::Bool(*b),
        Literal::Null => JsExprKind::Null,
        Literal::Undefined => JsExprKind::Ident("undefined".to_string()),
        Literal::BigInt(v) => JsExprKind::Raw(format!("{v}n")),
        Literal::Regex { pattern, flags } => JsExprKind::Raw(format!("/{pattern}/{flags}")),
    };
    JsExpr::with_source(kind, span)
}

fn lower_bin_op(op: esc_ast::BinaryOp) -> JsBinOp {
    use esc_ast::BinaryOp as B;
    match op {
        B::Add => JsBinOp::Add,
        B::Sub => JsBinOp::Sub,
        B::Mul => JsBinOp::Mul,
        B::Div => JsBinOp::Div,
        B::Mod => JsBinOp::Mod,
        B::Eq => JsBinOp::StrictEq,
        B::NotEq => JsBinOp::StrictNotEq,
        B::Lt => JsBinOp::Lt,
        B::LtEq => JsBinOp::LtEq,
        B::Gt => JsBinOp::Gt,
        B::GtEq => JsBinOp::GtEq,
        B::And => JsBinOp::And,
        B::Or => JsBinOp::Or,
    }
}

/// The `typeof` tag for a primitive type annotation, if the annotation
/// names one.
fn typeof_tag(ann: &TypeAnn) -> Option<&'static str> {
    match ann {
        TypeAnn::Ref { name, .. } => match name.as_str() {
            "number" => Some("number"),
            "string" => Some("string"),
            "boolean" => Some("boolean"),
            "bigint" => Some("bigint"),
            "symbol" => Some("symbol"),
            _ => None,
        },
        TypeAnn::Lit { lit, .. } => match lit {
            Literal::Num(_) => Some("number"),
            Literal::Str(_) => Some("string"),
            Literal::Bool(_) => Some("boolean"),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
