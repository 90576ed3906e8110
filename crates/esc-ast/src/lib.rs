//! Source AST for the Escalier compiler.
//!
//! The AST is produced by the parser collaborator and consumed by the
//! dependency-graph builder, the type checker, and the JS builder. Nodes
//! are immutable after construction; every node carries a `Span`.

pub mod expr;
pub use expr::{
    BinaryOp, Block, Expr, FuncBody, FuncParam, Ident, Literal, MatchCase, ObjLitElem, UnaryOp,
};

pub mod pattern;
pub use pattern::{ObjPatElem, Pattern};

pub mod type_ann;
pub use type_ann::{MappedModifierAnn, ObjTypeAnnElem, TypeAnn, TypeAnnFuncParam, TypeParam};

pub mod stmt;
pub use stmt::{ImportSpecifier, Stmt};

pub mod decl;
pub use decl::{
    ClassDecl, Decl, EnumDecl, FuncDecl, FuncSig, InterfaceDecl, NamespaceDecl, TypeDecl, VarDecl,
    VarKind,
};

pub mod jsx;
pub use jsx::{JsxAttr, JsxAttrValue, JsxChild, JsxElement, JsxFragment};

pub mod source;
pub use source::{Module, ModuleItem, Script, Source};

pub mod visit;
pub use visit::Visitor;

pub mod collaborators;
pub use collaborators::{Parser, TypesResolver};

pub mod builder;
