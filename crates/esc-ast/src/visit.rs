//! Read-only AST traversal.
//!
//! Override the `visit_*` hooks you care about; each default forwards to
//! the matching `walk_*` function, which descends into children in source
//! order.

use crate::decl::{Decl, FuncSig};
use crate::expr::{Block, Expr, FuncBody, ObjLitElem};
use crate::jsx::{JsxAttrValue, JsxChild, JsxElement, JsxFragment};
use crate::pattern::{ObjPatElem, Pattern};
use crate::stmt::Stmt;
use crate::type_ann::{ObjTypeAnnElem, TypeAnn, TypeParam};

pub trait Visitor: Sized {
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    fn visit_type_ann(&mut self, type_ann: &TypeAnn) {
        walk_type_ann(self, type_ann);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Lit { .. } | Expr::Ident(_) => {}
        Expr::Member { obj, .. } => visitor.visit_expr(obj),
        Expr::Index { obj, index, .. } => {
            visitor.visit_expr(obj);
            visitor.visit_expr(index);
        }
        Expr::Call { callee, args, .. } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Unary { arg, .. } => visitor.visit_expr(arg),
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Func {
            params,
            body,
            return_type,
            throws,
            ..
        } => {
            for param in params {
                visitor.visit_pattern(&param.pattern);
                if let Some(ann) = &param.type_ann {
                    visitor.visit_type_ann(ann);
                }
            }
            if let Some(ret) = return_type {
                visitor.visit_type_ann(ret);
            }
            if let Some(throws) = throws {
                visitor.visit_type_ann(throws);
            }
            match body {
                FuncBody::Block(block) => visitor.visit_block(block),
                FuncBody::Expr(expr) => visitor.visit_expr(expr),
            }
        }
        Expr::Tuple { elems, .. } => {
            for elem in elems {
                visitor.visit_expr(elem);
            }
        }
        Expr::Spread { arg, .. } => visitor.visit_expr(arg),
        Expr::Object { elems, .. } => {
            for elem in elems {
                match elem {
                    ObjLitElem::KeyValue { value, .. } => visitor.visit_expr(value),
                    ObjLitElem::Shorthand { .. } => {}
                    ObjLitElem::Spread { arg, .. } => visitor.visit_expr(arg),
                }
            }
        }
        Expr::If {
            cond,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(cond);
            visitor.visit_block(consequent);
            if let Some(alt) = alternate {
                visitor.visit_expr(alt);
            }
        }
        Expr::Match { target, cases, .. } => {
            visitor.visit_expr(target);
            for case in cases {
                visitor.visit_pattern(&case.pattern);
                if let Some(guard) = &case.guard {
                    visitor.visit_expr(guard);
                }
                visitor.visit_expr(&case.body);
            }
        }
        Expr::Await { arg, .. } | Expr::Throw { arg, .. } => visitor.visit_expr(arg),
        Expr::Do { body, .. } => visitor.visit_block(body),
        Expr::JsxElement(elem) => walk_jsx_element(visitor, elem),
        Expr::JsxFragment(frag) => walk_jsx_fragment(visitor, frag),
    }
}

pub fn walk_jsx_element<V: Visitor>(visitor: &mut V, elem: &JsxElement) {
    if !elem.is_intrinsic() {
        visitor.visit_expr(&elem.tag);
    }
    for attr in &elem.attrs {
        if let Some(JsxAttrValue::Expr(expr)) = &attr.value {
            visitor.visit_expr(expr);
        }
    }
    for child in &elem.children {
        walk_jsx_child(visitor, child);
    }
}

pub fn walk_jsx_fragment<V: Visitor>(visitor: &mut V, frag: &JsxFragment) {
    for child in &frag.children {
        walk_jsx_child(visitor, child);
    }
}

fn walk_jsx_child<V: Visitor>(visitor: &mut V, child: &JsxChild) {
    match child {
        JsxChild::Text { .. } => {}
        JsxChild::Expr { expr, .. } => visitor.visit_expr(expr),
        JsxChild::Element(elem) => walk_jsx_element(visitor, elem),
        JsxChild::Fragment(frag) => walk_jsx_fragment(visitor, frag),
    }
}

pub fn walk_pattern<V: Visitor>(visitor: &mut V, pattern: &Pattern) {
    match pattern {
        Pattern::Ident {
            default, type_ann, ..
        } => {
            if let Some(default) = default {
                visitor.visit_expr(default);
            }
            if let Some(ann) = type_ann {
                visitor.visit_type_ann(ann);
            }
        }
        Pattern::Lit { .. } | Pattern::Wildcard { .. } => {}
        Pattern::Object { elems, .. } => {
            for elem in elems {
                match elem {
                    ObjPatElem::KeyValue { value, default, .. } => {
                        visitor.visit_pattern(value);
                        if let Some(default) = default {
                            visitor.visit_expr(default);
                        }
                    }
                    ObjPatElem::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            visitor.visit_expr(default);
                        }
                    }
                    ObjPatElem::Rest { inner, .. } => visitor.visit_pattern(inner),
                }
            }
        }
        Pattern::Tuple { elems, .. } => {
            for elem in elems {
                visitor.visit_pattern(elem);
            }
        }
        Pattern::Rest { inner, .. } => visitor.visit_pattern(inner),
        Pattern::Extractor { args, .. } => {
            for arg in args {
                visitor.visit_pattern(arg);
            }
        }
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Expr { expr, .. } => visitor.visit_expr(expr),
        Stmt::Decl(decl) => visitor.visit_decl(decl),
        Stmt::Return { arg, .. } => {
            if let Some(arg) = arg {
                visitor.visit_expr(arg);
            }
        }
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::If {
            cond,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(cond);
            visitor.visit_block(consequent);
            if let Some(alt) = alternate {
                visitor.visit_block(alt);
            }
        }
        Stmt::Throw { arg, .. } => visitor.visit_expr(arg),
        Stmt::Import { .. } => {}
    }
}

pub fn walk_func_sig<V: Visitor>(visitor: &mut V, sig: &FuncSig) {
    walk_type_params(visitor, &sig.type_params);
    for param in &sig.params {
        visitor.visit_pattern(&param.pattern);
        if let Some(ann) = &param.type_ann {
            visitor.visit_type_ann(ann);
        }
    }
    if let Some(ret) = &sig.return_type {
        visitor.visit_type_ann(ret);
    }
    if let Some(throws) = &sig.throws {
        visitor.visit_type_ann(throws);
    }
}

fn walk_type_params<V: Visitor>(visitor: &mut V, type_params: &[TypeParam]) {
    for tp in type_params {
        if let Some(constraint) = &tp.constraint {
            visitor.visit_type_ann(constraint);
        }
        if let Some(default) = &tp.default {
            visitor.visit_type_ann(default);
        }
    }
}

pub fn walk_decl<V: Visitor>(visitor: &mut V, decl: &Decl) {
    match decl {
        Decl::Var(var) => {
            visitor.visit_pattern(&var.pattern);
            if let Some(ann) = &var.type_ann {
                visitor.visit_type_ann(ann);
            }
            if let Some(init) = &var.init {
                visitor.visit_expr(init);
            }
        }
        Decl::Func(func) => {
            walk_func_sig(visitor, &func.sig);
            if let Some(body) = &func.body {
                visitor.visit_block(body);
            }
        }
        Decl::TypeAlias(alias) => {
            walk_type_params(visitor, &alias.type_params);
            visitor.visit_type_ann(&alias.type_ann);
        }
        Decl::Interface(iface) => {
            walk_type_params(visitor, &iface.type_params);
            for extends in &iface.extends {
                visitor.visit_type_ann(extends);
            }
            for elem in &iface.body {
                walk_obj_type_ann_elem(visitor, elem);
            }
        }
        Decl::Class(_) | Decl::Enum(_) => {}
        Decl::Namespace(ns) => {
            for decl in &ns.decls {
                visitor.visit_decl(decl);
            }
        }
    }
}

pub fn walk_obj_type_ann_elem<V: Visitor>(visitor: &mut V, elem: &ObjTypeAnnElem) {
    match elem {
        ObjTypeAnnElem::Property { type_ann, .. } => visitor.visit_type_ann(type_ann),
        ObjTypeAnnElem::Method {
            type_params,
            params,
            ret,
            ..
        }
        | ObjTypeAnnElem::Callable {
            type_params,
            params,
            ret,
            ..
        }
        | ObjTypeAnnElem::Constructor {
            type_params,
            params,
            ret,
            ..
        } => {
            walk_type_params(visitor, type_params);
            for param in params {
                visitor.visit_type_ann(&param.type_ann);
            }
            visitor.visit_type_ann(ret);
        }
        ObjTypeAnnElem::Getter { ret, .. } => visitor.visit_type_ann(ret),
        ObjTypeAnnElem::Setter { param, .. } => visitor.visit_type_ann(&param.type_ann),
        ObjTypeAnnElem::Mapped {
            constraint,
            name_remap,
            value,
            ..
        } => {
            visitor.visit_type_ann(constraint);
            if let Some(remap) = name_remap {
                visitor.visit_type_ann(remap);
            }
            visitor.visit_type_ann(value);
        }
        ObjTypeAnnElem::Spread { arg, .. } => visitor.visit_type_ann(arg),
    }
}

pub fn walk_type_ann<V: Visitor>(visitor: &mut V, type_ann: &TypeAnn) {
    match type_ann {
        TypeAnn::Lit { .. } | TypeAnn::Infer { .. } | TypeAnn::Wildcard { .. } => {}
        TypeAnn::Ref { type_args, .. } => {
            for arg in type_args {
                visitor.visit_type_ann(arg);
            }
        }
        TypeAnn::Func {
            type_params,
            params,
            ret,
            throws,
            ..
        } => {
            walk_type_params(visitor, type_params);
            for param in params {
                visitor.visit_type_ann(&param.type_ann);
            }
            visitor.visit_type_ann(ret);
            if let Some(throws) = throws {
                visitor.visit_type_ann(throws);
            }
        }
        TypeAnn::Object { elems, .. } => {
            for elem in elems {
                walk_obj_type_ann_elem(visitor, elem);
            }
        }
        TypeAnn::Tuple { elems, .. } | TypeAnn::Union { types: elems, .. }
        | TypeAnn::Intersection { types: elems, .. } => {
            for elem in elems {
                visitor.visit_type_ann(elem);
            }
        }
        TypeAnn::Rest { inner, .. }
        | TypeAnn::KeyOf { inner, .. }
        | TypeAnn::Mutable { inner, .. } => visitor.visit_type_ann(inner),
        TypeAnn::IndexedAccess { target, index, .. } => {
            visitor.visit_type_ann(target);
            visitor.visit_type_ann(index);
        }
        TypeAnn::Cond {
            check,
            extends,
            then_ty,
            else_ty,
            ..
        } => {
            visitor.visit_type_ann(check);
            visitor.visit_type_ann(extends);
            visitor.visit_type_ann(then_ty);
            visitor.visit_type_ann(else_ty);
        }
        TypeAnn::TemplateLit { types, .. } => {
            for ty in types {
                visitor.visit_type_ann(ty);
            }
        }
    }
}
