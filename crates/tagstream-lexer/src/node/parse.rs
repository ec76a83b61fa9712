//! Structural parsing of tag content.
//!
//! The grammar is deliberately forgiving: every input produces a result, and
//! anything that does not fit the attribute micro-grammar is absorbed into a
//! key or a value rather than rejected.

use crate::chars::is_whitespace;

use super::tag::{Attribute, TagType};

/// The structure of a tag, computed once per [`super::TagNode`].
#[derive(Debug, Clone)]
pub(super) struct ParsedTag {
    pub(super) tag_type: TagType,
    pub(super) name: String,
    pub(super) attributes: Vec<Attribute>,
}

/// Parse the content of a tag (the text between `<` and `>`).
///
/// - A leading `/` makes an end tag. Otherwise a trailing `/` makes a
///   self-closing tag. The leading slash wins, so `/a/` is an end tag.
/// - The name runs up to the first whitespace, excluding the trailing `/` of
///   a self-closing tag.
/// - Attributes follow as `key`, `key=value`, `key="value"` or `key='value'`.
pub(super) fn parse_tag(content: &str) -> ParsedTag {
    let chars: Vec<char> = content.chars().collect();

    let tag_type = match (chars.first(), chars.last()) {
        (Some('/'), _) => TagType::End,
        (_, Some('/')) => TagType::StartEnd,
        _ => TagType::Start,
    };

    // The trailing slash of a self-closing tag belongs to neither the name
    // nor the attributes.
    let len = if tag_type == TagType::StartEnd {
        chars.len() - 1
    } else {
        chars.len()
    };

    let name_start = usize::from(tag_type == TagType::End);
    let mut i = name_start;
    while i < len && !is_whitespace(chars[i]) {
        i += 1;
    }
    let name = chars[name_start..i].iter().collect();

    let attributes = parse_attributes(&chars[..len], i);

    ParsedTag {
        tag_type,
        name,
        attributes,
    }
}

/// Scan `chars[pos..]` for attributes, in source order.
fn parse_attributes(chars: &[char], mut pos: usize) -> Vec<Attribute> {
    let len = chars.len();
    let mut attributes = Vec::new();

    while pos < len {
        while pos < len && is_whitespace(chars[pos]) {
            pos += 1;
        }

        let key_start = pos;
        while pos < len && !is_whitespace(chars[pos]) && chars[pos] != '=' {
            pos += 1;
        }
        let key: String = chars[key_start..pos].iter().collect();

        let value = if pos < len && chars[pos] == '=' {
            pos += 1;
            let quote = match chars.get(pos) {
                Some(&q @ ('"' | '\'')) => {
                    pos += 1;
                    Some(q)
                }
                _ => None,
            };

            let value_start = pos;
            while pos < len && !ends_value(chars[pos], quote) {
                pos += 1;
            }
            let value: String = chars[value_start..pos].iter().collect();

            if quote.is_some() && pos < len {
                pos += 1;
            }
            Some(value)
        } else {
            None
        };

        if !key.is_empty() {
            attributes.push(Attribute::new(key, value));
        }
    }

    attributes
}

/// Quoted values run to the matching quote; unquoted ones to whitespace.
const fn ends_value(c: char, quote: Option<char>) -> bool {
    match quote {
        Some(q) => c == q,
        None => is_whitespace(c),
    }
}
