//! Programmatic AST construction.
//!
//! Convenience constructors used by parser collaborators and tests.
//! Nodes get dummy spans unless a span is set explicitly.

use crate::decl::{Decl, FuncDecl, FuncSig, InterfaceDecl, TypeDecl, VarDecl, VarKind};
use crate::expr::{BinaryOp, Block, Expr, FuncBody, FuncParam, Ident, Literal, MatchCase};
use crate::pattern::Pattern;
use crate::source::{Module, ModuleItem, Source};
use crate::stmt::Stmt;
use crate::type_ann::{ObjTypeAnnElem, TypeAnn, TypeParam};
use esc_common::Span;

pub fn ident(name: &str) -> Expr {
    Expr::Ident(Ident::new(name, Span::dummy()))
}

pub fn namespaced_ident(namespace: &str, name: &str) -> Expr {
    Expr::Ident(Ident {
        name: name.to_string(),
        namespace: Some(namespace.to_string()),
        span: Span::dummy(),
    })
}

pub fn num(value: f64) -> Expr {
    Expr::Lit {
        lit: Literal::Num(value),
        span: Span::dummy(),
    }
}

pub fn str_(value: &str) -> Expr {
    Expr::Lit {
        lit: Literal::Str(value.to_string()),
        span: Span::dummy(),
    }
}

pub fn bool_(value: bool) -> Expr {
    Expr::Lit {
        lit: Literal::Bool(value),
        span: Span::dummy(),
    }
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::dummy(),
    }
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
        opt_chain: false,
        span: Span::dummy(),
    }
}

pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member {
        obj: Box::new(obj),
        prop: prop.to_string(),
        opt_chain: false,
        span: Span::dummy(),
    }
}

pub fn tuple(elems: Vec<Expr>) -> Expr {
    Expr::Tuple {
        elems,
        span: Span::dummy(),
    }
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: Span::dummy(),
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr {
        expr,
        span: Span::dummy(),
    }
}

pub fn return_stmt(arg: Option<Expr>) -> Stmt {
    Stmt::Return {
        arg,
        span: Span::dummy(),
    }
}

pub fn ident_pattern(name: &str) -> Pattern {
    Pattern::Ident {
        name: name.to_string(),
        default: None,
        type_ann: None,
        span: Span::dummy(),
    }
}

pub fn annotated_pattern(name: &str, type_ann: TypeAnn) -> Pattern {
    Pattern::Ident {
        name: name.to_string(),
        default: None,
        type_ann: Some(type_ann),
        span: Span::dummy(),
    }
}

pub fn tuple_pattern(elems: Vec<Pattern>) -> Pattern {
    Pattern::Tuple {
        elems,
        span: Span::dummy(),
    }
}

pub fn wildcard_pattern() -> Pattern {
    Pattern::Wildcard { span: Span::dummy() }
}

pub fn func_param(name: &str) -> FuncParam {
    FuncParam {
        pattern: ident_pattern(name),
        type_ann: None,
        optional: false,
    }
}

pub fn annotated_param(name: &str, type_ann: TypeAnn) -> FuncParam {
    FuncParam {
        pattern: ident_pattern(name),
        type_ann: Some(type_ann),
        optional: false,
    }
}

pub fn func_expr(params: Vec<FuncParam>, body: FuncBody) -> Expr {
    Expr::Func {
        type_params: Vec::new(),
        params,
        body,
        return_type: None,
        throws: None,
        is_async: false,
        span: Span::dummy(),
    }
}

pub fn match_case(pattern: Pattern, body: Expr) -> MatchCase {
    MatchCase {
        pattern,
        guard: None,
        body,
        span: Span::dummy(),
    }
}

pub fn type_ref(name: &str) -> TypeAnn {
    TypeAnn::Ref {
        name: name.to_string(),
        type_args: Vec::new(),
        span: Span::dummy(),
    }
}

pub fn type_ref_with_args(name: &str, type_args: Vec<TypeAnn>) -> TypeAnn {
    TypeAnn::Ref {
        name: name.to_string(),
        type_args,
        span: Span::dummy(),
    }
}

pub fn prop_ann(name: &str, type_ann: TypeAnn) -> ObjTypeAnnElem {
    ObjTypeAnnElem::Property {
        name: name.to_string(),
        optional: false,
        readonly: false,
        type_ann,
        span: Span::dummy(),
    }
}

pub fn var_decl(name: &str, init: Expr) -> Decl {
    Decl::Var(VarDecl {
        kind: VarKind::Val,
        pattern: ident_pattern(name),
        type_ann: None,
        init: Some(init),
        export: false,
        declare: false,
        span: Span::dummy(),
    })
}

pub fn var_decl_with_pattern(pattern: Pattern, init: Expr) -> Decl {
    Decl::Var(VarDecl {
        kind: VarKind::Val,
        pattern,
        type_ann: None,
        init: Some(init),
        export: false,
        declare: false,
        span: Span::dummy(),
    })
}

pub fn func_decl(name: &str, params: Vec<FuncParam>, body: Block) -> Decl {
    Decl::Func(FuncDecl {
        name: name.to_string(),
        sig: FuncSig {
            type_params: Vec::new(),
            params,
            return_type: None,
            throws: None,
        },
        body: Some(body),
        export: false,
        declare: false,
        is_async: false,
        span: Span::dummy(),
    })
}

pub fn func_decl_with_sig(name: &str, sig: FuncSig, body: Option<Block>) -> Decl {
    Decl::Func(FuncDecl {
        name: name.to_string(),
        sig,
        body,
        export: false,
        declare: false,
        is_async: false,
        span: Span::dummy(),
    })
}

pub fn type_decl(name: &str, type_ann: TypeAnn) -> Decl {
    Decl::TypeAlias(TypeDecl {
        name: name.to_string(),
        type_params: Vec::new(),
        type_ann,
        export: false,
        declare: false,
        span: Span::dummy(),
    })
}

pub fn type_decl_with_params(name: &str, type_params: Vec<TypeParam>, type_ann: TypeAnn) -> Decl {
    Decl::TypeAlias(TypeDecl {
        name: name.to_string(),
        type_params,
        type_ann,
        export: false,
        declare: false,
        span: Span::dummy(),
    })
}

pub fn type_param(name: &str) -> TypeParam {
    TypeParam {
        name: name.to_string(),
        constraint: None,
        default: None,
        span: Span::dummy(),
    }
}

pub fn interface_decl(name: &str, body: Vec<ObjTypeAnnElem>) -> Decl {
    Decl::Interface(InterfaceDecl {
        name: name.to_string(),
        type_params: Vec::new(),
        extends: Vec::new(),
        body,
        export: false,
        span: Span::dummy(),
    })
}

pub fn module_item(path: &str, decls: Vec<Decl>) -> ModuleItem {
    ModuleItem {
        source_id: 0,
        path: path.to_string(),
        decls,
    }
}

pub fn module(items: Vec<ModuleItem>) -> Module {
    Module { items }
}

pub fn source(id: u32, path: &str, contents: &str) -> Source {
    Source::new(id, path, contents)
}
