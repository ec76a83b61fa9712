//! Streaming tokenizer for angle-bracket markup.
//!
//! # Scope
//!
//! This crate implements:
//! - **Lexer** - splits a character stream into alternating text and tag
//!   segments, one [`Node`] per segment
//! - **Classifier** - decides whether a tag segment is an ordinary tag, an
//!   XML header, unknown markup (comments, doctype, CDATA) or empty
//! - **Tag parser** - lazily extracts the tag type, name and ordered
//!   attribute list of a tag segment
//! - **Entities** - entity namespaces and the escape/unescape codec for named
//!   and numeric character references
//!
//! # Not Implemented
//!
//! - Well-formedness checks (the lexer has no notion of nesting)
//! - Namespace prefix resolution
//! - Character set detection (input is already-decoded characters)

/// Character classes from the XML grammar.
pub mod chars;
/// Entity namespaces and the escape codec.
pub mod entity;
/// The streaming lexer and its character sources.
pub mod lexer;
/// Nodes produced by the lexer.
pub mod node;

pub use entity::{
    DEFAULT_XML_NAMESPACE, EntityNamespace, HTML_NAMESPACE, NumericEntity, escape_attribute,
    escape_text, parse_numeric_entity, resolve_entity, unescape,
};
pub use lexer::{CharSource, FallibleChars, Lexer, Nodes, Utf8Reader};
pub use node::{Attribute, Node, NodeKind, TagNode, TagType, TextNode};
pub use tagstream_common::{Error, Result};
