//! Language-server front-end for the Escalier compiler.
//!
//! The transport lives outside this crate; these are the operations it
//! dispatches to. Documents are cached with their parsed ASTs, and every
//! validation runs under a cancellable context with a one-second
//! deadline.

pub mod documents;
pub use documents::{Document, DocumentStore};

pub mod server;
pub use server::{LspError, LspServer, TextDocumentItem};
