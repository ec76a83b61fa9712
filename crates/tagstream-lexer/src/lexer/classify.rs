use crate::chars::is_name_start_char;
use crate::node::{Node, TagNode};

/// Decide what kind of node a tag segment (the text between `<` and `>`) is.
///
/// 1. An empty segment is [`Node::Empty`].
/// 2. The first character, or the second if the first is `/`, is checked
///    against the XML name-start characters; a match is a [`Node::Tag`].
/// 3. A segment longer than two characters that starts and ends with `?` is
///    a [`Node::XmlHeader`], stored without the `?` delimiters.
/// 4. Anything else (`!--`, `!DOCTYPE`, `![CDATA[`, stray punctuation) is
///    [`Node::Unknown`] and kept verbatim.
pub(super) fn classify_tag(segment: String) -> Node {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Node::Empty;
    };
    let lead = match (first, chars.next()) {
        ('/', Some(second)) => second,
        _ => first,
    };

    if is_name_start_char(lead) {
        return Node::Tag(TagNode::new(segment));
    }

    if segment.len() > 2 && segment.starts_with('?') && segment.ends_with('?') {
        let inner = segment[1..segment.len() - 1].to_string();
        return Node::XmlHeader(TagNode::new_header(inner));
    }

    Node::Unknown(segment)
}
