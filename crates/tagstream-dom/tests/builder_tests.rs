//! Tests for building trees from lexed nodes.

use std::io;

use tagstream_dom::{DomTree, EndTagPolicy, NodeId, TreeBuilder};
use tagstream_lexer::{FallibleChars, Lexer, Node, NodeKind};

fn build(input: &str, policy: EndTagPolicy) -> DomTree {
    DomTree::parse(Lexer::from_text(input).with_cleanup_whitespace(true), policy).unwrap()
}

/// Render the tree as `name(children)` for compact assertions
fn shape(tree: &DomTree, id: NodeId) -> String {
    let label = tree
        .element(id)
        .map_or_else(|| "#root".to_string(), |node| node.raw_content().to_string());
    let children: Vec<String> = tree.children(id).iter().map(|&c| shape(tree, c)).collect();
    if children.is_empty() {
        label
    } else {
        format!("{label}({})", children.join(","))
    }
}

#[test]
fn test_nesting_by_name() {
    let tree = build("<a><b>x</b><c/>y</a>z", EndTagPolicy::ByName);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(a(b(x),c/,y),z)");
}

#[test]
fn test_end_tags_are_not_stored() {
    let tree = build("<a></a>", EndTagPolicy::ByName);
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_by_name_closes_intermediate_elements() {
    let tree = build("<ul><li>one<li>two</ul>after", EndTagPolicy::ByName);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(ul(li(one,li(two))),after)");
}

#[test]
fn test_by_name_is_case_insensitive() {
    let tree = build("<DIV>x</div>y", EndTagPolicy::ByName);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(DIV(x),y)");
}

#[test]
fn test_by_name_ignores_unmatched_end_tag() {
    let tree = build("<a>x</b>y</a>", EndTagPolicy::ByName);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(a(x,y))");
}

#[test]
fn test_strict_pops_one_level() {
    let tree = build("<a><b>x</a>y</b>z", EndTagPolicy::Strict);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(a(b(x),y),z)");
}

#[test]
fn test_strict_never_closes_root() {
    let tree = build("</a></b>x", EndTagPolicy::Strict);
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(x)");
}

#[test]
fn test_headers_and_unknown_are_leaves() {
    let tree = build(
        "<?xml version=\"1.0\"?><!DOCTYPE r><r><!-- c --></r>",
        EndTagPolicy::ByName,
    );
    let kinds: Vec<NodeKind> = tree
        .descendants(NodeId::ROOT)
        .filter_map(|id| tree.element(id).map(Node::kind))
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::XmlHeader, NodeKind::Unknown, NodeKind::Tag, NodeKind::Unknown]
    );
    assert!(tree.children(NodeId(1)).is_empty());
}

#[test]
fn test_builder_tracks_depth() {
    let mut builder = TreeBuilder::default();
    assert_eq!(builder.depth(), 0);
    builder.extend(Lexer::from_text("<a><b>").map(Result::unwrap));
    assert_eq!(builder.depth(), 2);
    builder.extend(Lexer::from_text("</a>").map(Result::unwrap));
    assert_eq!(builder.depth(), 0);
    assert_eq!(builder.current(), NodeId::ROOT);
    assert_eq!(builder.finish().len(), 6);
}

#[test]
fn test_from_nodes() {
    let nodes: Vec<Node> = Lexer::from_text("<p>hi</p>").map(Result::unwrap).collect();
    let tree = DomTree::from_nodes(nodes, EndTagPolicy::default());
    assert_eq!(shape(&tree, NodeId::ROOT), "#root(,p(hi))");
}

#[test]
fn test_parse_propagates_io_errors() {
    let source = FallibleChars(vec![Ok('<'), Ok('a'), Err(io::Error::other("gone"))].into_iter());
    let err = DomTree::parse(Lexer::new(source), EndTagPolicy::ByName).unwrap_err();
    assert!(err.is_io());
}
