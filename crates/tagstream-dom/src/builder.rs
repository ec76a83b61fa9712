//! Building a tree from a flat node stream.

use tagstream_common::Result;
use tagstream_common::warning::warn_once;
use tagstream_lexer::{CharSource, Lexer, Node, TagNode, TagType};

use crate::{DomTree, NodeId};

/// How an end tag decides which open element it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndTagPolicy {
    /// Close the nearest open element with the same name (ASCII
    /// case-insensitive), and everything opened after it. An end tag with no
    /// such element is ignored.
    #[default]
    ByName,
    /// Close exactly one level, whatever the name. Never closes the root.
    Strict,
}

/// Assembles a [`DomTree`] from lexed nodes.
///
/// Start tags are appended and become the insertion point. End tags close
/// open elements according to the [`EndTagPolicy`] and are not stored.
/// Everything else, including self-closing tags and XML headers, is
/// appended as a leaf.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: DomTree,
    /// Open elements, root first. Never empty.
    open: Vec<NodeId>,
    policy: EndTagPolicy,
}

impl TreeBuilder {
    /// Start a new tree with a synthetic root.
    #[must_use]
    pub fn new(policy: EndTagPolicy) -> Self {
        Self {
            tree: DomTree::new(),
            open: vec![NodeId::ROOT],
            policy,
        }
    }

    /// The node new children are appended to.
    #[must_use]
    pub fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// Number of open elements below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len() - 1
    }

    /// Add the next node of the stream.
    pub fn push(&mut self, node: Node) {
        match node.as_tag().map(TagNode::tag_type) {
            Some(TagType::Start) => {
                let id = self.tree.append_child(self.current(), node);
                self.open.push(id);
            }
            Some(TagType::End) => self.close(&node),
            _ => {
                let _ = self.tree.append_child(self.current(), node);
            }
        }
    }

    fn close(&mut self, end: &Node) {
        match self.policy {
            EndTagPolicy::Strict => {
                if self.open.len() > 1 {
                    let _ = self.open.pop();
                }
            }
            EndTagPolicy::ByName => {
                let name = end.tag_name().unwrap_or_default();
                let tree = &self.tree;
                let position = self.open.iter().rposition(|&id| {
                    tree.element(id)
                        .and_then(Node::as_tag)
                        .is_some_and(|open| open.tag_name().eq_ignore_ascii_case(name))
                });
                match position {
                    Some(index) => self.open.truncate(index),
                    None => warn_once("Dom", &format!("ignoring unmatched end tag </{name}>")),
                }
            }
        }
    }

    /// Finish building. Elements still open are left where they are.
    #[must_use]
    pub fn finish(self) -> DomTree {
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(EndTagPolicy::default())
    }
}

impl Extend<Node> for TreeBuilder {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, nodes: I) {
        for node in nodes {
            self.push(node);
        }
    }
}

impl DomTree {
    /// Drive `lexer` to the end and build a tree from its nodes.
    ///
    /// # Errors
    ///
    /// Returns the first error the lexer reports.
    pub fn parse<S: CharSource>(lexer: Lexer<S>, policy: EndTagPolicy) -> Result<Self> {
        let mut builder = TreeBuilder::new(policy);
        for node in lexer {
            builder.push(node?);
        }
        Ok(builder.finish())
    }

    /// Build a tree from nodes that have already been lexed.
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>, policy: EndTagPolicy) -> Self {
        let mut builder = TreeBuilder::new(policy);
        builder.extend(nodes);
        builder.finish()
    }
}
