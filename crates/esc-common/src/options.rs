//! Compiler options.

use serde::{Deserialize, Serialize};

/// Options controlling compilation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Emit a SourceMap v3 JSON alongside the generated JS.
    pub source_maps: bool,
    /// Append an inline `sourceMappingURL` comment instead of a separate map.
    pub inline_source_map: bool,
    /// Emit `.d.ts` type definitions.
    pub declarations: bool,
    /// Module specifier for the JSX runtime import.
    pub jsx_runtime_module: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            source_maps: true,
            inline_source_map: false,
            declarations: true,
            jsx_runtime_module: "react/jsx-runtime".to_string(),
        }
    }
}
