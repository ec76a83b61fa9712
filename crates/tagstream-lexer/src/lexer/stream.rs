use std::io::{BufReader, Read};
use std::str::Chars;

use tagstream_common::{Error, Result};

use super::classify::classify_tag;
use super::source::{CharSource, Utf8Reader};
use crate::node::{Node, TextNode};

/// Splits a character stream into alternating text and tag segments.
///
/// The sequence of nodes is lazy, finite and single-pass: each call to
/// [`Lexer::next_node`] reads just enough characters for one segment, and the
/// source cannot be rewound.
///
/// ```ignore
/// let mut lexer = Lexer::from_text("<p class=\"x\">hi</p>");
/// while let Some(node) = lexer.next_node()? {
///     println!("{}: {}", node.kind(), node.raw_content());
/// }
/// ```
#[derive(Debug)]
pub struct Lexer<S> {
    source: S,
    /// True between a `<` and the following `>`.
    inside_tag: bool,
    cleanup_whitespace: bool,
}

impl<S: CharSource> Lexer<S> {
    /// Create a lexer over `source`, starting outside any tag.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            inside_tag: false,
            cleanup_whitespace: false,
        }
    }

    /// Builder form of [`Lexer::set_cleanup_whitespace`].
    #[must_use]
    pub fn with_cleanup_whitespace(mut self, cleanup_whitespace: bool) -> Self {
        self.cleanup_whitespace = cleanup_whitespace;
        self
    }

    /// When enabled, text nodes are trimmed of leading and trailing XML
    /// whitespace, and text that is only whitespace is skipped entirely.
    /// Tags are never affected.
    pub const fn set_cleanup_whitespace(&mut self, cleanup_whitespace: bool) {
        self.cleanup_whitespace = cleanup_whitespace;
    }

    /// Whether whitespace cleanup is enabled.
    #[must_use]
    pub const fn cleanup_whitespace(&self) -> bool {
        self.cleanup_whitespace
    }

    /// Returns true if the next segment will be read as a tag.
    #[must_use]
    pub const fn is_inside_tag(&self) -> bool {
        self.inside_tag
    }

    /// Read the next node.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the character source fails. The lexer is left
    /// mid-segment and must not be used afterwards.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        loop {
            let Some(mut node) = self.next_segment()? else {
                return Ok(None);
            };
            if self.cleanup_whitespace {
                if node.is_blank() {
                    continue;
                }
                node.trim_text();
            }
            return Ok(Some(node));
        }
    }

    /// Read one segment up to the delimiter of the current state. The
    /// delimiter is consumed but not included.
    fn next_segment(&mut self) -> Result<Option<Node>> {
        let delimiter = if self.inside_tag { '>' } else { '<' };
        let mut segment = String::new();
        loop {
            match self.source.next_char()? {
                Some(c) if c == delimiter => break,
                Some(c) => segment.push(c),
                None if segment.is_empty() => return Ok(None),
                None => break,
            }
        }

        let node = if self.inside_tag {
            classify_tag(segment)
        } else {
            Node::Text(TextNode::new(segment))
        };
        self.inside_tag = !self.inside_tag;
        Ok(Some(node))
    }

    /// Iterate over the remaining nodes, stopping at the first error.
    ///
    /// The error, if any, is kept and can be retrieved with
    /// [`Nodes::take_error`].
    pub const fn nodes(&mut self) -> Nodes<'_, S> {
        Nodes {
            lexer: self,
            error: None,
            failed: false,
        }
    }

    /// Unwrap the character source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<'a> Lexer<Chars<'a>> {
    /// Create a lexer over in-memory text.
    #[must_use]
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.chars())
    }
}

impl<R: Read> Lexer<Utf8Reader<BufReader<R>>> {
    /// Create a lexer over a UTF-8 encoded byte stream.
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self::new(Utf8Reader::new(BufReader::new(reader)))
    }
}

impl<S: CharSource> Iterator for Lexer<S> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().transpose()
    }
}

/// Iterator over the nodes of a [`Lexer`] that treats an error as the end of
/// input. Returned by [`Lexer::nodes`].
#[derive(Debug)]
pub struct Nodes<'l, S> {
    lexer: &'l mut Lexer<S>,
    error: Option<Error>,
    failed: bool,
}

impl<S> Nodes<'_, S> {
    /// The error that ended iteration, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take the error that ended iteration. Iteration stays finished.
    pub const fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl<S: CharSource> Iterator for Nodes<'_, S> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.failed {
            return None;
        }
        match self.lexer.next_node() {
            Ok(node) => node,
            Err(err) => {
                self.failed = true;
                self.error = Some(err);
                None
            }
        }
    }
}
