//! The streaming lexer.
//!
//! The lexer alternates between two states, outside a tag and inside a tag,
//! and emits one [`crate::Node`] per segment between delimiters. It has no
//! notion of nesting; building a tree is left to the caller.

mod classify;
mod stream;
mod source;

pub use stream::{Lexer, Nodes};
pub use source::{CharSource, FallibleChars, Utf8Reader};
