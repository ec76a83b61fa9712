use core::fmt;
use std::cell::OnceCell;
use std::collections::HashMap;

use serde::Serialize;
use strum_macros::Display;

use super::parse::{ParsedTag, parse_tag};

/// The type of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    /// An opening tag such as `<p>`.
    Start,
    /// A closing tag such as `</p>`.
    End,
    /// A self-closing tag such as `<br/>`.
    StartEnd,
}

impl TagType {
    /// Returns true for [`TagType::StartEnd`] only.
    #[must_use]
    pub const fn is_start_and_end(self) -> bool {
        matches!(self, Self::StartEnd)
    }

    /// Returns true if the tag opens an element and may carry attributes
    /// ([`TagType::Start`] and [`TagType::StartEnd`]).
    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(self, Self::Start | Self::StartEnd)
    }

    /// Returns true if the tag closes an element ([`TagType::End`] and
    /// [`TagType::StartEnd`]).
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, Self::End | Self::StartEnd)
    }
}

/// An attribute of a tag, in source form.
///
/// Values are raw: character references inside them are not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Attribute {
    /// The attribute name. Never empty for attributes produced by the parser.
    pub key: String,
    /// The attribute value, or `None` for a boolean attribute such as
    /// `disabled` in `<input disabled>`.
    pub value: Option<String>,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub const fn new(key: String, value: Option<String>) -> Self {
        Self { key, value }
    }

    /// Returns true if the attribute was written without a value.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        self.value.is_none()
    }

    /// The value as XML would spell it: boolean attributes fall back to
    /// their key (`checked` means `checked="checked"`).
    #[must_use]
    pub fn xml_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.key)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}=\"{value}\"", self.key),
            None => write!(f, "{}", self.key),
        }
    }
}

/// A tag segment whose structure is parsed on first access.
///
/// The raw content excludes the enclosing `<` and `>`. The type, name and
/// attributes are computed together the first time any of them is requested
/// and cached for the lifetime of the node.
#[derive(Clone)]
pub struct TagNode {
    content: String,
    /// XML headers (`<?xml ...?>`) always report [`TagType::StartEnd`].
    header: bool,
    parsed: OnceCell<ParsedTag>,
}

impl TagNode {
    /// Create an ordinary tag from its raw content, e.g. `a href="x"`.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self {
            content,
            header: false,
            parsed: OnceCell::new(),
        }
    }

    /// Create an XML header tag from its content with the surrounding `?`
    /// already removed, e.g. `xml version="1.0"`.
    #[must_use]
    pub const fn new_header(content: String) -> Self {
        Self {
            content,
            header: true,
            parsed: OnceCell::new(),
        }
    }

    /// The raw content of the tag, without any parsing applied.
    #[must_use]
    pub fn raw_content(&self) -> &str {
        &self.content
    }

    /// Returns true if this is an XML header.
    #[must_use]
    pub const fn is_header(&self) -> bool {
        self.header
    }

    /// Returns true once the structure has been parsed.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }

    fn parsed(&self) -> &ParsedTag {
        self.parsed.get_or_init(|| parse_tag(&self.content))
    }

    /// The type of this tag.
    #[must_use]
    pub fn tag_type(&self) -> TagType {
        if self.header {
            return TagType::StartEnd;
        }
        self.parsed().tag_type
    }

    /// The unmodified name of this tag. Use [`TagNode::lowercase_tag_name`]
    /// for case-insensitive comparisons.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.parsed().name
    }

    /// The tag name in ASCII lowercase.
    #[must_use]
    pub fn lowercase_tag_name(&self) -> String {
        self.tag_name().to_ascii_lowercase()
    }

    /// All attributes of this tag, in the order they appear in the source.
    /// Duplicate keys are kept.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.parsed().attributes
    }

    /// The last attribute with the given key, if any.
    ///
    /// Last-wins matches [`TagNode::attribute_map`].
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes().iter().rev().find(|attr| attr.key == key)
    }

    /// Returns true if an attribute with the given key is present.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes().iter().any(|attr| attr.key == key)
    }

    /// The attributes as a map from key to value.
    ///
    /// When a key appears more than once the value of the last occurrence
    /// wins. The ordered list from [`TagNode::attributes`] stays canonical.
    #[must_use]
    pub fn attribute_map(&self) -> HashMap<&str, Option<&str>> {
        self.attributes()
            .iter()
            .map(|attr| (attr.key.as_str(), attr.value.as_deref()))
            .collect()
    }
}

impl fmt::Debug for TagNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagNode")
            .field("content", &self.content)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

// The parse cache is derived from the content, so it takes no part in
// equality.
impl PartialEq for TagNode {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.header == other.header
    }
}

impl Eq for TagNode {}
