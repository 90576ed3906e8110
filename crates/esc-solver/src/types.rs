//! Core type definitions for the type system.
//!
//! This module contains the main `Type` enum, the per-compilation
//! `TypeArena`, and the well-known interned constants.

use bitflags::bitflags;
use smallvec::SmallVec;
use std::sync::Arc;

// =============================================================================
// Type ID
// =============================================================================

/// Unique identifier for a type in the type arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Small hot list of type ids: type arguments, tuple elements, and
/// union/intersection members rarely exceed a handful of entries.
pub type TypeList = SmallVec<[TypeId; 4]>;

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Primitives and literal values
// =============================================================================

/// A primitive type kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Num,
    Str,
    Bool,
    BigInt,
    Symbol,
}

impl Primitive {
    /// The source-level name of this primitive.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Num => "number",
            Primitive::Str => "string",
            Primitive::Bool => "boolean",
            Primitive::BigInt => "bigint",
            Primitive::Symbol => "symbol",
        }
    }

    /// The `typeof` tag a value of this primitive carries at runtime.
    #[must_use]
    pub fn typeof_tag(self) -> &'static str {
        match self {
            Primitive::Num => "number",
            Primitive::Str => "string",
            Primitive::Bool => "boolean",
            Primitive::BigInt => "bigint",
            Primitive::Symbol => "symbol",
        }
    }
}

/// A literal value for literal types.
#[derive(Clone, Debug, PartialEq)]
pub enum LitValue {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
    // Stored as text for precision
    BigInt(String),
}

impl LitValue {
    /// The primitive this literal widens to, if any.
    #[must_use]
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            LitValue::Num(_) => Some(Primitive::Num),
            LitValue::Str(_) => Some(Primitive::Str),
            LitValue::Bool(_) => Some(Primitive::Bool),
            LitValue::BigInt(_) => Some(Primitive::BigInt),
            LitValue::Null | LitValue::Undefined => None,
        }
    }
}

impl std::fmt::Display for LitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LitValue::Num(n) => write!(f, "{n}"),
            LitValue::Str(s) => write!(f, "\"{s}\""),
            LitValue::Bool(b) => write!(f, "{b}"),
            LitValue::Null => write!(f, "null"),
            LitValue::Undefined => write!(f, "undefined"),
            LitValue::BigInt(v) => write!(f, "{v}n"),
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

/// A declared type parameter on a function or alias.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamDef {
    pub name: String,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
}

/// One function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncParam {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl FuncParam {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        FuncParam {
            name: name.into(),
            ty,
            optional: false,
            rest: false,
        }
    }
}

/// A function type.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncType {
    /// Explicitly declared type parameters. Inferred quantifiers live on
    /// the binding's `Scheme`, not here.
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<FuncParam>,
    pub ret: TypeId,
    pub throws: Option<TypeId>,
}

impl FuncType {
    /// Number of parameters a caller must supply.
    #[must_use]
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .take_while(|p| !p.optional && !p.rest)
            .count()
    }

    #[must_use]
    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }
}

// =============================================================================
// Objects
// =============================================================================

bitflags! {
    /// Flags on an object type.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// Produced by an interface declaration.
        const INTERFACE = 1 << 0;
        /// Nominal identity (by object id) rather than structural.
        const NOMINAL = 1 << 1;
        /// Exact: no extra properties allowed.
        const EXACT = 1 << 2;
        /// All properties readonly.
        const IMMUTABLE = 1 << 3;
        /// All properties writable and invariant.
        const MUTABLE = 1 << 4;
    }
}

/// Modifier on a mapped-type `?` or `readonly` clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappedModifier {
    Add,
    Remove,
}

/// A mapped object element: `[K in keyof T as R]: V`.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedElem {
    pub type_param: String,
    /// The keys being mapped over (the `in` clause).
    pub constraint: TypeId,
    /// The `as` clause, if present.
    pub name_remap: Option<TypeId>,
    pub value: TypeId,
    pub optional: Option<MappedModifier>,
    pub readonly: Option<MappedModifier>,
}

/// One element of an object type.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjElem {
    Callable(TypeId),
    Constructor(TypeId),
    Method { name: String, func: TypeId },
    Getter { name: String, ret: TypeId },
    Setter { name: String, param: TypeId },
    Prop {
        name: String,
        optional: bool,
        readonly: bool,
        ty: TypeId,
    },
    Mapped(MappedElem),
    Spread(TypeId),
}

impl ObjElem {
    /// The member name, if this element has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            ObjElem::Method { name, .. }
            | ObjElem::Getter { name, .. }
            | ObjElem::Setter { name, .. }
            | ObjElem::Prop { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// An object type: interfaces, object literals, and mapped types.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectType {
    pub elems: Vec<ObjElem>,
    /// Resolved parent interfaces.
    pub extends: Vec<TypeId>,
    pub flags: ObjectFlags,
    /// Identity for nominal comparisons; assigned at construction.
    pub id: u32,
}

impl ObjectType {
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ObjectFlags::INTERFACE)
    }

    #[must_use]
    pub fn is_nominal(&self) -> bool {
        self.flags.contains(ObjectFlags::NOMINAL)
    }
}

// =============================================================================
// Aliases and schemes
// =============================================================================

/// A named type alias: `type Name<TP> = T`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAlias {
    pub type_params: Vec<TypeParamDef>,
    pub ty: TypeId,
}

impl TypeAlias {
    #[must_use]
    pub fn mono(ty: TypeId) -> Self {
        TypeAlias {
            type_params: Vec::new(),
            ty,
        }
    }
}

/// A possibly-polymorphic binding type. `type_params` are the quantifiers
/// introduced by generalization; instantiation replaces them with fresh
/// type variables at each use site.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub type_params: Vec<String>,
    pub ty: TypeId,
}

impl Scheme {
    #[must_use]
    pub fn mono(ty: TypeId) -> Self {
        Scheme {
            type_params: Vec::new(),
            ty,
        }
    }
}

// =============================================================================
// Type
// =============================================================================

/// A type in the arena. Variants holding children store `TypeId`s.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// A unification variable. `instance` is set at most once, by binding.
    Var {
        id: u32,
        instance: Option<TypeId>,
    },
    Prim(Primitive),
    Lit(LitValue),
    Unknown,
    Never,
    Any,
    GlobalThis,
    UniqueSymbol { id: u32 },
    Wildcard,
    /// A named reference. `alias == None` means an unresolved reference or
    /// a type parameter; otherwise the alias's arity equals `args.len()`.
    Ref {
        name: String,
        alias: Option<Arc<TypeAlias>>,
        args: TypeList,
    },
    Func(FuncType),
    Object(ObjectType),
    Tuple(TypeList),
    /// A rest/spread element inside a tuple.
    Rest(TypeId),
    Union(TypeList),
    Intersection(TypeList),
    KeyOf(TypeId),
    IndexedAccess { target: TypeId, index: TypeId },
    Cond {
        check: TypeId,
        extends: TypeId,
        then_ty: TypeId,
        else_ty: TypeId,
    },
    Infer { name: String },
    TemplateLit {
        quasis: Vec<String>,
        types: Vec<TypeId>,
    },
    Intrinsic { name: String },
    Mutable(TypeId),
}

// =============================================================================
// Type arena
// =============================================================================

/// The per-compilation flat arena of type nodes.
///
/// Slots `0..WELL_KNOWN_COUNT` hold the interned constants; everything
/// else is freshly allocated during inference.
#[derive(Clone, Debug)]
pub struct TypeArena {
    types: Vec<Type>,
    next_var: u32,
    next_object: u32,
}

impl TypeArena {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const NUM: TypeId = TypeId(3);
    pub const STR: TypeId = TypeId(4);
    pub const BOOL: TypeId = TypeId(5);
    pub const BIGINT: TypeId = TypeId(6);
    pub const SYMBOL: TypeId = TypeId(7);
    pub const GLOBAL_THIS: TypeId = TypeId(8);
    pub const WILDCARD: TypeId = TypeId(9);
    pub const NULL: TypeId = TypeId(10);
    pub const UNDEFINED: TypeId = TypeId(11);
    pub const TRUE: TypeId = TypeId(12);
    pub const FALSE: TypeId = TypeId(13);

    const WELL_KNOWN_COUNT: usize = 14;

    #[must_use]
    pub fn new() -> Self {
        let types = vec![
            Type::Any,
            Type::Unknown,
            Type::Never,
            Type::Prim(Primitive::Num),
            Type::Prim(Primitive::Str),
            Type::Prim(Primitive::Bool),
            Type::Prim(Primitive::BigInt),
            Type::Prim(Primitive::Symbol),
            Type::GlobalThis,
            Type::Wildcard,
            Type::Lit(LitValue::Null),
            Type::Lit(LitValue::Undefined),
            Type::Lit(LitValue::Bool(true)),
            Type::Lit(LitValue::Bool(false)),
        ];
        debug_assert_eq!(types.len(), Self::WELL_KNOWN_COUNT);
        TypeArena {
            types,
            next_var: 0,
            next_object: 0,
        }
    }

    /// Allocate a new type node.
    pub fn alloc(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Allocate a fresh, unbound type variable.
    pub fn fresh_var(&mut self) -> TypeId {
        let id = self.next_var;
        self.next_var += 1;
        self.alloc(Type::Var { id, instance: None })
    }

    /// Next nominal object identity.
    pub fn fresh_object_id(&mut self) -> u32 {
        let id = self.next_object;
        self.next_object += 1;
        id
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn lit_num(&mut self, value: f64) -> TypeId {
        self.alloc(Type::Lit(LitValue::Num(value)))
    }

    pub fn lit_str(&mut self, value: impl Into<String>) -> TypeId {
        self.alloc(Type::Lit(LitValue::Str(value.into())))
    }

    pub fn lit_bool(&mut self, value: bool) -> TypeId {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    pub fn reference(&mut self, name: impl Into<String>, args: Vec<TypeId>) -> TypeId {
        self.alloc(Type::Ref {
            name: name.into(),
            alias: None,
            args: args.into(),
        })
    }

    pub fn resolved_reference(
        &mut self,
        name: impl Into<String>,
        alias: Arc<TypeAlias>,
        args: Vec<TypeId>,
    ) -> TypeId {
        self.alloc(Type::Ref {
            name: name.into(),
            alias: Some(alias),
            args: args.into(),
        })
    }

    pub fn func(&mut self, params: Vec<FuncParam>, ret: TypeId) -> TypeId {
        self.alloc(Type::Func(FuncType {
            type_params: Vec::new(),
            params,
            ret,
            throws: None,
        }))
    }

    pub fn object(&mut self, elems: Vec<ObjElem>, flags: ObjectFlags) -> TypeId {
        let id = self.fresh_object_id();
        self.alloc(Type::Object(ObjectType {
            elems,
            extends: Vec::new(),
            flags,
            id,
        }))
    }

    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.alloc(Type::Tuple(elems.into()))
    }

    /// Build a union, flattening nested unions and deduplicating by id.
    /// A single remaining member collapses to itself.
    pub fn union(&mut self, types: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat: TypeList = TypeList::new();
        let mut stack: Vec<TypeId> = types.into_iter().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            match self.get(id) {
                Type::Union(members) => {
                    for member in members.iter().rev() {
                        stack.push(*member);
                    }
                }
                Type::Never => {}
                _ => {
                    if !flat.contains(&id) {
                        flat.push(id);
                    }
                }
            }
        }
        match flat.len() {
            0 => Self::NEVER,
            1 => flat[0],
            _ => self.alloc(Type::Union(flat)),
        }
    }

    pub fn intersection(&mut self, types: impl IntoIterator<Item = TypeId>) -> TypeId {
        let types: TypeList = types.into_iter().collect();
        match types.len() {
            0 => Self::UNKNOWN,
            1 => types[0],
            _ => self.alloc(Type::Intersection(types)),
        }
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
