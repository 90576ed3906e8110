//! Interfaces to external collaborators.
//!
//! The concrete-syntax parser and the `@types` package resolver live
//! outside the core; the core only depends on these traits.

use crate::source::{Module, Script, Source};
use esc_common::Diagnostic;

/// The concrete-syntax parser.
pub trait Parser {
    /// Parse a single source as a script (statement list).
    fn parse_script(&self, source: &Source) -> (Script, Vec<Diagnostic>);

    /// Parse a set of sources module-at-a-time, attributing each file's
    /// top-level declarations to it.
    fn parse_module(&self, sources: &[Source]) -> (Module, Vec<Diagnostic>);
}

/// Resolver for `@types/<pkg>` entry points.
///
/// Reads `package.json` fields in priority order
/// `exports` > `types` > `typings` > `main` (rewritten to `.d.ts`),
/// falling back to `index.d.ts`.
pub trait TypesResolver {
    /// Resolve the type-definition entry point for a package, returning
    /// the path of the `.d.ts` file to load.
    fn resolve_types_entry(&self, package: &str) -> Option<String>;
}
