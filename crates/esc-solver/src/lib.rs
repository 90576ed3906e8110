//! Structural type system and unification engine for the Escalier compiler.
//!
//! Types live in a flat per-compilation arena indexed by `TypeId`; bound
//! type variables form a union-find-like forest through their `instance`
//! pointers, collapsed by `prune` with path compression. All structural
//! operations begin by pruning their operands.

pub mod types;
pub use types::{
    FuncParam, FuncType, LitValue, MappedElem, MappedModifier, ObjElem, ObjectFlags, ObjectType,
    Primitive, Scheme, Type, TypeAlias, TypeArena, TypeId, TypeList, TypeParamDef,
};

pub mod visitor;
pub use visitor::{fold, occurs_in, prune, resolve, TypeFolder};

pub mod display;
pub use display::TypeDisplay;

pub mod instantiate;
pub use instantiate::{generalize, instantiate, instantiate_func, substitute};

pub mod unify;
pub use unify::{unify, Unifier};
