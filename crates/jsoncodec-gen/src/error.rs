//! Errors produced while turning a schema [`jsoncodec_schema::File`] into
//! generated Rust source.

use thiserror::Error;

/// Errors from [`crate::generate`]/[`crate::generate_from_source`].
///
/// `spec.md` §7's **FormatError** is [`GenError::Format`]: the generator
/// builds every token stream itself, so a `syn::parse2` failure on its own
/// output is always a generator bug, never a user-input problem.
#[derive(Debug, Error)]
pub enum GenError {
    /// The `.jsonrec` source failed to parse. Only reachable via
    /// [`crate::generate_from_source`], which parses before generating.
    #[error(transparent)]
    Schema(#[from] jsoncodec_schema::SchemaError),
    /// The generator assembled a token stream that is not syntactically
    /// valid Rust.
    #[error("generator produced invalid rust source: {0}")]
    Format(#[from] syn::Error),
}
