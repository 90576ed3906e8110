//! Checker context: the type arena, the scope stack, accumulated
//! diagnostics, and cooperative cancellation.

use esc_binder::Scopes;
use esc_common::{codes, CancellationToken, Diagnostic, Span};
use esc_solver::{unify, Scheme, TypeArena, TypeId, Unifier};

/// State threaded through one inference run.
pub struct Context {
    pub arena: TypeArena,
    pub scopes: Scopes,
    pub diags: Vec<Diagnostic>,
    pub cancel: CancellationToken,
    /// True once a cancellation diagnostic has been reported; later work
    /// short-circuits.
    pub cancelled: bool,
    /// Stack of `is_async` flags for nested function bodies.
    pub async_stack: Vec<bool>,
    /// Per-function collected `return` expression types.
    pub return_stack: Vec<Vec<TypeId>>,
    /// Binding keys whose types could not be closed (cycle errors); the
    /// emitter suppresses their declarations.
    pub failed_keys: Vec<esc_binder::BindingKey>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cancellation(CancellationToken::none())
    }

    #[must_use]
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        let mut ctx = Context {
            arena: TypeArena::new(),
            scopes: Scopes::new(),
            diags: Vec::new(),
            cancel,
            cancelled: false,
            async_stack: Vec::new(),
            return_stack: Vec::new(),
            failed_keys: Vec::new(),
        };
        crate::prelude::install_prelude(&mut ctx);
        ctx
    }

    pub fn fresh_var(&mut self) -> TypeId {
        self.arena.fresh_var()
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>, code: u32) {
        self.diags.push(Diagnostic::error(span, message, code));
    }

    pub fn warning(&mut self, span: Span, message: impl Into<String>, code: u32) {
        self.diags.push(Diagnostic::warning(span, message, code));
    }

    /// Poll for cancellation; reports one `cancelled` diagnostic.
    pub fn check_cancelled(&mut self, span: Span) -> bool {
        if self.cancelled {
            return true;
        }
        if self.cancel.is_cancelled() {
            self.cancelled = true;
            self.diags.push(Diagnostic::cancelled(span));
            return true;
        }
        false
    }

    /// Unify `a ⊑ b`, accumulating any failures at `span`.
    pub fn unify(&mut self, a: TypeId, b: TypeId, span: Span) -> bool {
        let diags = unify(&mut self.arena, a, b, span);
        let ok = diags.is_empty();
        self.diags.extend(diags);
        ok
    }

    /// Unify without recording failures (speculative check).
    pub fn unify_silent(&mut self, a: TypeId, b: TypeId, span: Span) -> bool {
        let mut unifier = Unifier::new(&mut self.arena, span);
        let ok = unifier.unify(a, b);
        let _ = unifier.into_diagnostics();
        ok
    }

    /// Look up a value binding and instantiate its scheme.
    pub fn lookup_value_type(&mut self, name: &str) -> Option<TypeId> {
        let scheme = self.scopes.lookup_value(name).map(|b| b.scheme.clone())?;
        Some(esc_solver::instantiate(&mut self.arena, &scheme))
    }

    /// Report an unresolved identifier and return a fresh recovery var.
    pub fn unresolved(&mut self, name: &str, span: Span) -> TypeId {
        self.error(
            span,
            format!("cannot find name `{name}`"),
            codes::UNRESOLVED_NAME,
        );
        self.fresh_var()
    }

    /// Record a monomorphic binding in the current scope.
    pub fn bind_mono(&mut self, name: &str, ty: TypeId, span: Span, mutable: bool) {
        self.scopes.set_value(
            name,
            esc_binder::Binding::new(span, Scheme::mono(ty), mutable),
        );
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diags)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
