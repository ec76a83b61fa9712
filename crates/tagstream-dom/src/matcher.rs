//! Predicates over tree nodes and bounded search.

use crate::{DomTree, NodeId, NodeRef};

/// A predicate over tree nodes.
///
/// Implemented for any `Fn(NodeRef<'_>) -> bool`, so most matchers are
/// closures:
///
/// ```ignore
/// let paragraphs = tree.children_for_match(NodeId::ROOT, &tag_named("p"), 10, true);
/// let marked = tree.child_for_match(id, &|node: NodeRef<'_>| node.tag().is_some(), false);
/// ```
pub trait DomMatcher {
    /// Returns true if `node` matches.
    fn matches(&self, node: NodeRef<'_>) -> bool;
}

impl<F> DomMatcher for F
where
    F: Fn(NodeRef<'_>) -> bool,
{
    fn matches(&self, node: NodeRef<'_>) -> bool {
        self(node)
    }
}

/// Matches tags with at least one attribute `key` whose value is exactly
/// `value`. Boolean attributes have no value and never match.
#[must_use]
pub fn attribute_equals(key: impl Into<String>, value: impl Into<String>) -> impl DomMatcher {
    let key = key.into();
    let value = value.into();
    move |node: NodeRef<'_>| {
        node.tag().is_some_and(|tag| {
            tag.attributes()
                .iter()
                .any(|attr| attr.key == key && attr.value.as_deref() == Some(value.as_str()))
        })
    }
}

/// Matches tags that carry an attribute `key`, with or without a value.
#[must_use]
pub fn has_attribute(key: impl Into<String>) -> impl DomMatcher {
    let key = key.into();
    move |node: NodeRef<'_>| node.tag().is_some_and(|tag| tag.has_attribute(&key))
}

/// Matches tags named `name`, ignoring ASCII case.
#[must_use]
pub fn tag_named(name: impl Into<String>) -> impl DomMatcher {
    let name = name.into();
    move |node: NodeRef<'_>| {
        node.tag()
            .is_some_and(|tag| tag.tag_name().eq_ignore_ascii_case(&name))
    }
}

impl DomTree {
    /// Collect up to `limit` nodes matching `matcher`.
    ///
    /// A shallow search tests the direct children of `id` in order. A deep
    /// search walks the subtree in pre-order, testing `id` itself first, and
    /// stops as soon as `limit` matches are found. A `limit` of zero, or an
    /// `id` outside this tree, yields nothing.
    #[must_use]
    pub fn children_for_match<M>(&self, id: NodeId, matcher: &M, limit: usize, deep: bool) -> Vec<NodeId>
    where
        M: DomMatcher + ?Sized,
    {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }

        let candidates: Box<dyn Iterator<Item = NodeId> + '_> = if deep {
            Box::new(self.descendants(id))
        } else {
            Box::new(self.children(id).iter().copied())
        };

        for candidate in candidates {
            let Some(node) = self.node(candidate) else {
                continue;
            };
            if matcher.matches(node) {
                found.push(candidate);
                if found.len() == limit {
                    break;
                }
            }
        }
        found
    }

    /// The first node [`DomTree::children_for_match`] finds with a limit of
    /// one.
    #[must_use]
    pub fn child_for_match<M>(&self, id: NodeId, matcher: &M, deep: bool) -> Option<NodeId>
    where
        M: DomMatcher + ?Sized,
    {
        self.children_for_match(id, matcher, 1, deep).pop()
    }
}
