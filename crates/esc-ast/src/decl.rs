//! Declaration nodes.

use crate::expr::{Block, Expr, FuncParam};
use crate::pattern::Pattern;
use crate::type_ann::{ObjTypeAnnElem, TypeAnn, TypeParam};
use esc_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// `val` introduces an immutable binding, `var` a mutable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Val,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: VarKind,
    pub pattern: Pattern,
    pub type_ann: Option<TypeAnn>,
    pub init: Option<Expr>,
    pub export: bool,
    pub declare: bool,
    pub span: Span,
}

/// A function signature shared by declarations and interface members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncSig {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<FuncParam>,
    pub return_type: Option<TypeAnn>,
    pub throws: Option<TypeAnn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub sig: FuncSig,
    pub body: Option<Block>,
    pub export: bool,
    pub declare: bool,
    pub is_async: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub type_ann: TypeAnn,
    pub export: bool,
    pub declare: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeAnn>,
    pub body: Vec<ObjTypeAnnElem>,
    pub export: bool,
    pub span: Span,
}

/// Classes are accepted by the parser but deliberately rejected by the
/// checker (`Unimplemented`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub export: bool,
    pub declare: bool,
    pub span: Span,
}

/// Enums are accepted by the parser but deliberately rejected by the
/// checker (`Unimplemented`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub export: bool,
    pub span: Span,
}

/// An explicit `namespace N { ... }` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub decls: Vec<Decl>,
    pub export: bool,
    pub span: Span,
}

/// Declaration nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Var(VarDecl),
    Func(FuncDecl),
    TypeAlias(TypeDecl),
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Namespace(NamespaceDecl),
}

impl Decl {
    /// The names this declaration introduces at its level.
    pub fn binding_names(&self, out: &mut Vec<String>) {
        match self {
            Decl::Var(var) => var.pattern.binding_names(out),
            Decl::Func(func) => out.push(func.name.clone()),
            Decl::TypeAlias(alias) => out.push(alias.name.clone()),
            Decl::Interface(iface) => out.push(iface.name.clone()),
            Decl::Class(class) => out.push(class.name.clone()),
            Decl::Enum(en) => out.push(en.name.clone()),
            Decl::Namespace(ns) => out.push(ns.name.clone()),
        }
    }

    #[must_use]
    pub fn is_export(&self) -> bool {
        match self {
            Decl::Var(var) => var.export,
            Decl::Func(func) => func.export,
            Decl::TypeAlias(alias) => alias.export,
            Decl::Interface(iface) => iface.export,
            Decl::Class(class) => class.export,
            Decl::Enum(en) => en.export,
            Decl::Namespace(ns) => ns.export,
        }
    }
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Var(var) => var.span,
            Decl::Func(func) => func.span,
            Decl::TypeAlias(alias) => alias.span,
            Decl::Interface(iface) => iface.span,
            Decl::Class(class) => class.span,
            Decl::Enum(en) => en.span,
            Decl::Namespace(ns) => ns.span,
        }
    }
}
