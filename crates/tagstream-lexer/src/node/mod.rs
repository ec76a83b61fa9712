//! Nodes produced by the lexer.
//!
//! Every segment of the input becomes exactly one [`Node`]. Text segments
//! become [`Node::Text`]; tag segments are classified into the remaining
//! variants by [`crate::lexer`].

mod parse;
mod tag;

use core::fmt;
use std::borrow::Cow;

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};
use tagstream_common::{Error, Result};

use crate::chars::is_whitespace;
use crate::entity::{EntityNamespace, unescape};

pub use tag::{Attribute, TagNode, TagType};

/// The kind of a [`Node`], without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Character data between tags.
    Text,
    /// An ordinary tag.
    Tag,
    /// An XML header or processing instruction (`<?...?>`).
    XmlHeader,
    /// Markup that is not a tag: comments, doctype, CDATA.
    Unknown,
    /// The degenerate `<>` tag.
    Empty,
}

/// A segment of the input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw text between two tags.
    Text(TextNode),
    /// A tag whose name starts with an XML name-start character.
    Tag(TagNode),
    /// A `<?...?>` segment. Its content has the `?` delimiters removed and it
    /// always reports [`TagType::StartEnd`].
    XmlHeader(TagNode),
    /// A tag segment that is not structurally parsed, kept verbatim, e.g.
    /// `!-- comment --` or `!DOCTYPE html`.
    Unknown(String),
    /// The empty tag `<>`.
    Empty,
}

impl Node {
    /// The kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Text(_) => NodeKind::Text,
            Self::Tag(_) => NodeKind::Tag,
            Self::XmlHeader(_) => NodeKind::XmlHeader,
            Self::Unknown(_) => NodeKind::Unknown,
            Self::Empty => NodeKind::Empty,
        }
    }

    /// The raw content of this node, without any parsing or formatting.
    #[must_use]
    pub fn raw_content(&self) -> &str {
        match self {
            Self::Text(text) => text.text(),
            Self::Tag(tag) | Self::XmlHeader(tag) => tag.raw_content(),
            Self::Unknown(content) => content,
            Self::Empty => "",
        }
    }

    /// The segment exactly as it appeared between delimiters in the input.
    ///
    /// This differs from [`Node::raw_content`] only for XML headers, whose
    /// `?` delimiters are restored.
    #[must_use]
    pub fn segment(&self) -> Cow<'_, str> {
        match self {
            Self::XmlHeader(tag) => Cow::Owned(format!("?{}?", tag.raw_content())),
            _ => Cow::Borrowed(self.raw_content()),
        }
    }

    /// The node as markup: tag-like nodes are wrapped in `<` and `>`, text is
    /// returned as is.
    #[must_use]
    pub fn to_markup(&self) -> String {
        match self {
            Self::Text(text) => text.text().to_string(),
            _ => format!("<{}>", self.segment()),
        }
    }

    /// Returns true if this node was read from inside `<` and `>`.
    #[must_use]
    pub const fn is_tag_segment(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Returns true for nodes with a parsed structure ([`Node::Tag`] and
    /// [`Node::XmlHeader`]).
    #[must_use]
    pub const fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_) | Self::XmlHeader(_))
    }

    /// Returns true if this is a text node made of whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_blank())
    }

    /// The tag, if this node has a parsed structure.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Self::Tag(tag) | Self::XmlHeader(tag) => Some(tag),
            _ => None,
        }
    }

    /// The text, if this is a text node.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The tag, or [`Error::NotATag`] for any other kind of node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotATag`] if this node is not a tag.
    pub fn try_tag(&self) -> Result<&TagNode> {
        self.as_tag().ok_or_else(|| Error::NotATag {
            kind: self.kind().into(),
        })
    }

    /// See [`TagNode::tag_type`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotATag`] if this node is not a tag.
    pub fn tag_type(&self) -> Result<TagType> {
        self.try_tag().map(TagNode::tag_type)
    }

    /// See [`TagNode::tag_name`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotATag`] if this node is not a tag.
    pub fn tag_name(&self) -> Result<&str> {
        self.try_tag().map(TagNode::tag_name)
    }

    /// See [`TagNode::attributes`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotATag`] if this node is not a tag.
    pub fn attributes(&self) -> Result<&[Attribute]> {
        self.try_tag().map(TagNode::attributes)
    }

    /// Trim a text node in place; other nodes are left alone.
    pub(crate) fn trim_text(&mut self) {
        if let Self::Text(text) = self {
            text.trim();
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

/// Raw text between two tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    content: String,
}

impl TextNode {
    /// Create a text node from raw text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self { content }
    }

    /// The raw text. Character references are not resolved.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.content
    }

    /// The text with character references resolved against `entities`.
    /// Unresolvable references are kept verbatim.
    #[must_use]
    pub fn unescaped_text(&self, entities: &EntityNamespace) -> Cow<'_, str> {
        unescape(&self.content, entities)
    }

    /// Returns true if the text is empty or XML whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.chars().all(is_whitespace)
    }

    /// Strip leading and trailing XML whitespace in place.
    pub(crate) fn trim(&mut self) {
        let trimmed = self.content.trim_matches(is_whitespace);
        if trimmed.len() != self.content.len() {
            self.content = trimmed.to_string();
        }
    }
}
