//! Error type shared by the tagstream crates.
//!
//! Reaching the end of a document is not an error: lexers report it as
//! `Ok(None)`. Malformed character references are not errors either; they are
//! left unresolved in the text.

use thiserror::Error;

/// Result alias used throughout the tagstream crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the lexer, the node accessors and entity namespaces.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying character source failed. The lexer that returned this
    /// error is left mid-segment and must not be used again.
    #[error("failed to read from character source: {0}")]
    Io(#[from] std::io::Error),

    /// A tag-only accessor (name, type, attributes) was called on a node that
    /// is not a structurally parsed tag.
    #[error("{kind} node is not a tag")]
    NotATag {
        /// Display name of the offending node kind.
        kind: &'static str,
    },

    /// `put_entity` was called on a namespace that is frozen.
    #[error("cannot define entity `{name}` in an immutable namespace")]
    ImmutableNamespace {
        /// Name of the entity that was being defined.
        name: String,
    },
}

impl Error {
    /// Returns true if this error came from the character source.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
