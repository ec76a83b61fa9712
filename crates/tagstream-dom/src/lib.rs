//! A lightweight, caller-driven tree of lexed markup nodes.
//!
//! The lexer never nests anything; it only yields a flat stream of
//! [`Node`]s. This crate gives callers somewhere to put them:
//! - [`DomTree`] - an arena of [`DomNode`]s addressed by [`NodeId`]
//! - [`DomMatcher`] - predicates for bounded shallow or deep search
//! - [`TreeBuilder`] - the usual start-pushes, end-pops stack walk
//!
//! # Design
//!
//! All relationships are arena indices, so a child can point back at its
//! parent without reference counting. Nodes are only ever appended.

mod builder;
mod matcher;

use tagstream_lexer::{EntityNamespace, Node, TagNode};

pub use builder::{EndTagPolicy, TreeBuilder};
pub use matcher::{DomMatcher, attribute_equals, has_attribute, tag_named};

/// A type-safe index into a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node in the tree.
#[derive(Debug, Clone)]
pub struct DomNode {
    /// The lexed node this entry is about. `None` only for a synthetic root.
    pub element: Option<Node>,
    /// The parent, or `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
}

impl DomNode {
    const fn new(element: Option<Node>, parent: Option<NodeId>) -> Self {
        Self {
            element,
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-based tree with O(1) node access.
///
/// The root lives at [`NodeId::ROOT`]; every other node was added with
/// [`DomTree::append_child`] and is reachable from the root.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<DomNode>,
}

impl DomTree {
    /// Create a tree with a synthetic root that carries no element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode::new(None, None)],
        }
    }

    /// Create a tree whose root carries `element`.
    #[must_use]
    pub fn with_root(element: Node) -> Self {
        Self {
            nodes: vec![DomNode::new(Some(element), None)],
        }
    }

    /// The root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    /// A borrowed view of a node, for matching and traversal.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { tree: self, id })
    }

    /// The number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new node for `element` as the last child of `parent` and
    /// return its ID.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn append_child(&mut self, parent: NodeId, element: Node) -> NodeId {
        assert!(
            parent.0 < self.nodes.len(),
            "append_child: {parent:?} is not in this tree"
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode::new(Some(element), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The lexed node stored at `id`, if any.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Node> {
        self.get(id).and_then(|n| n.element.as_ref())
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The children of a node, in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and everything below it, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let stack = if self.get(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        DescendantIterator { tree: self, stack }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
#[derive(Debug)]
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, starting with its root.
#[derive(Debug)]
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// A node together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The ID of this node.
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub const fn tree(self) -> &'a DomTree {
        self.tree
    }

    /// The lexed node, or `None` for a synthetic root.
    #[must_use]
    pub fn element(self) -> Option<&'a Node> {
        self.tree.element(self.id)
    }

    /// The tag, if the element has a parsed structure.
    #[must_use]
    pub fn tag(self) -> Option<&'a TagNode> {
        self.element().and_then(Node::as_tag)
    }

    /// The parent node.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.tree.parent(self.id).and_then(|id| self.tree.node(id))
    }

    /// The direct children, in order.
    pub fn children(self) -> impl Iterator<Item = Self> + 'a {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .map(move |&id| Self { tree, id })
    }

    /// The unescaped text of every text node in this subtree, concatenated
    /// in document order.
    #[must_use]
    pub fn text_content(self, entities: &EntityNamespace) -> String {
        self.tree
            .descendants(self.id)
            .filter_map(|id| self.tree.element(id).and_then(Node::as_text))
            .map(|text| text.unescaped_text(entities))
            .collect()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}
