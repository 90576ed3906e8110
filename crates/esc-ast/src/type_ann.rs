//! Type annotation syntax, as written in source.
//!
//! The checker converts annotations into semantic types; the `.d.ts`
//! emitter renders semantic types back out. Annotations never carry
//! resolved aliases.

use crate::expr::Literal;
use crate::pattern::Pattern;
use esc_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// A declared type parameter: `T extends U = D`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeAnn>,
    pub default: Option<TypeAnn>,
    pub span: Span,
}

/// A parameter inside a function type annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAnnFuncParam {
    pub pattern: Pattern,
    pub type_ann: TypeAnn,
    pub optional: bool,
}

/// Mapped-type modifier spelling (`+?` / `-?` / `+readonly` / `-readonly`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappedModifierAnn {
    Add,
    Remove,
}

/// Object type annotation element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjTypeAnnElem {
    Property {
        name: String,
        optional: bool,
        readonly: bool,
        type_ann: TypeAnn,
        span: Span,
    },
    Method {
        name: String,
        type_params: Vec<TypeParam>,
        params: Vec<TypeAnnFuncParam>,
        ret: TypeAnn,
        span: Span,
    },
    Getter {
        name: String,
        ret: TypeAnn,
        span: Span,
    },
    Setter {
        name: String,
        param: TypeAnnFuncParam,
        span: Span,
    },
    Callable {
        type_params: Vec<TypeParam>,
        params: Vec<TypeAnnFuncParam>,
        ret: TypeAnn,
        span: Span,
    },
    Constructor {
        type_params: Vec<TypeParam>,
        params: Vec<TypeAnnFuncParam>,
        ret: TypeAnn,
        span: Span,
    },
    Mapped {
        type_param: String,
        /// The `in` clause: the keys being mapped over.
        constraint: TypeAnn,
        /// The `as` clause, if present.
        name_remap: Option<TypeAnn>,
        value: TypeAnn,
        optional: Option<MappedModifierAnn>,
        readonly: Option<MappedModifierAnn>,
        span: Span,
    },
    Spread {
        arg: TypeAnn,
        span: Span,
    },
}

/// Type annotation nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeAnn {
    Lit {
        lit: Literal,
        span: Span,
    },
    /// A named type reference: primitives, aliases, interfaces, and type
    /// parameters all parse to this and are resolved by the checker.
    Ref {
        name: String,
        type_args: Vec<TypeAnn>,
        span: Span,
    },
    Func {
        type_params: Vec<TypeParam>,
        params: Vec<TypeAnnFuncParam>,
        ret: Box<TypeAnn>,
        throws: Option<Box<TypeAnn>>,
        span: Span,
    },
    Object {
        elems: Vec<ObjTypeAnnElem>,
        span: Span,
    },
    Tuple {
        elems: Vec<TypeAnn>,
        span: Span,
    },
    Rest {
        inner: Box<TypeAnn>,
        span: Span,
    },
    Union {
        types: Vec<TypeAnn>,
        span: Span,
    },
    Intersection {
        types: Vec<TypeAnn>,
        span: Span,
    },
    KeyOf {
        inner: Box<TypeAnn>,
        span: Span,
    },
    IndexedAccess {
        target: Box<TypeAnn>,
        index: Box<TypeAnn>,
        span: Span,
    },
    Cond {
        check: Box<TypeAnn>,
        extends: Box<TypeAnn>,
        then_ty: Box<TypeAnn>,
        else_ty: Box<TypeAnn>,
        span: Span,
    },
    Infer {
        name: String,
        span: Span,
    },
    TemplateLit {
        quasis: Vec<String>,
        types: Vec<TypeAnn>,
        span: Span,
    },
    Mutable {
        inner: Box<TypeAnn>,
        span: Span,
    },
    Wildcard {
        span: Span,
    },
}

impl Spanned for TypeAnn {
    fn span(&self) -> Span {
        match self {
            TypeAnn::Lit { span, .. }
            | TypeAnn::Ref { span, .. }
            | TypeAnn::Func { span, .. }
            | TypeAnn::Object { span, .. }
            | TypeAnn::Tuple { span, .. }
            | TypeAnn::Rest { span, .. }
            | TypeAnn::Union { span, .. }
            | TypeAnn::Intersection { span, .. }
            | TypeAnn::KeyOf { span, .. }
            | TypeAnn::IndexedAccess { span, .. }
            | TypeAnn::Cond { span, .. }
            | TypeAnn::Infer { span, .. }
            | TypeAnn::TemplateLit { span, .. }
            | TypeAnn::Mutable { span, .. }
            | TypeAnn::Wildcard { span } => *span,
        }
    }
}
