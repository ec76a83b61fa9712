//! Tests for bounded shallow and deep search.

use tagstream_dom::{
    DomMatcher, DomTree, EndTagPolicy, NodeId, NodeRef, attribute_equals, has_attribute,
    tag_named,
};
use tagstream_lexer::Lexer;

/// Helper to build a tree from markup
fn build(input: &str) -> DomTree {
    DomTree::parse(Lexer::from_text(input).with_cleanup_whitespace(true), EndTagPolicy::ByName)
        .unwrap()
}

fn names(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.element(id).unwrap().raw_content().to_string())
        .collect()
}

const DOC: &str = r#"
<div id="outer">
  <p class="a">one</p>
  <div id="inner">
    <p class="b">two</p>
    <p class="a">three</p>
  </div>
  <p class="a" hidden>four</p>
</div>
"#;

#[test]
fn test_zero_limit_is_empty() {
    let tree = build(DOC);
    assert!(tree.children_for_match(NodeId::ROOT, &tag_named("p"), 0, true).is_empty());
}

#[test]
fn test_deep_search_is_pre_order() {
    let tree = build(DOC);
    let found = tree.children_for_match(NodeId::ROOT, &tag_named("p"), 10, true);
    assert_eq!(
        names(&tree, &found),
        vec!["p class=\"a\"", "p class=\"b\"", "p class=\"a\"", "p class=\"a\" hidden"]
    );
}

#[test]
fn test_deep_search_respects_limit() {
    let tree = build(DOC);
    let found = tree.children_for_match(NodeId::ROOT, &attribute_equals("class", "a"), 2, true);
    assert_eq!(found.len(), 2);
    let parent = tree.parent(found[1]).unwrap();
    assert_eq!(names(&tree, &[parent]), vec!["div id=\"inner\""]);
}

#[test]
fn test_deep_search_includes_self() {
    let tree = build(DOC);
    let outer = tree.child_for_match(NodeId::ROOT, &tag_named("div"), true).unwrap();
    assert_eq!(tree.child_for_match(outer, &tag_named("DIV"), true), Some(outer));
}

#[test]
fn test_deep_limit_one_returns_first_match() {
    let tree = build(DOC);
    let class_a = attribute_equals("class", "a");
    let first = tree.child_for_match(NodeId::ROOT, &class_a, true).unwrap();
    let all = tree.children_for_match(NodeId::ROOT, &class_a, 10, true);
    assert_eq!(all.len(), 3);
    assert_eq!(first, all[0]);
}

#[test]
fn test_shallow_search_only_sees_direct_children() {
    let tree = build(DOC);
    let outer = tree.child_for_match(NodeId::ROOT, &tag_named("div"), false).unwrap();

    let found = tree.children_for_match(outer, &tag_named("p"), 10, false);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|&id| tree.parent(id) == Some(outer)));

    let inner = tree.child_for_match(outer, &tag_named("div"), false).unwrap();
    assert_eq!(tree.parent(inner), Some(outer));
    assert!(
        tree.children_for_match(outer, &attribute_equals("id", "outer"), 10, false)
            .is_empty()
    );
}

#[test]
fn test_shallow_search_respects_limit() {
    let tree = build(DOC);
    let outer = tree.child_for_match(NodeId::ROOT, &tag_named("div"), false).unwrap();
    assert_eq!(tree.children_for_match(outer, &tag_named("p"), 1, false).len(), 1);
}

#[test]
fn test_has_attribute_matches_boolean_attributes() {
    let tree = build(DOC);
    let found = tree.children_for_match(NodeId::ROOT, &has_attribute("hidden"), 10, true);
    assert_eq!(names(&tree, &found), vec!["p class=\"a\" hidden"]);
    let valued = attribute_equals("hidden", "hidden");
    assert!(tree.child_for_match(NodeId::ROOT, &valued, true).is_none());
}

#[test]
fn test_attribute_equals_checks_every_duplicate() {
    let tree = build("<a x=1 x=2>");
    assert!(tree.child_for_match(NodeId::ROOT, &attribute_equals("x", "1"), true).is_some());
    assert!(tree.child_for_match(NodeId::ROOT, &attribute_equals("x", "2"), true).is_some());
    assert!(tree.child_for_match(NodeId::ROOT, &attribute_equals("x", "3"), true).is_none());
}

#[test]
fn test_closure_matcher() {
    let tree = build(DOC);
    let texts = |node: NodeRef<'_>| node.element().is_some_and(|e| e.as_text().is_some());
    let found = tree.children_for_match(NodeId::ROOT, &texts, 10, true);
    let contents: Vec<String> = found
        .iter()
        .map(|&id| tree.element(id).unwrap().raw_content().to_string())
        .collect();
    assert_eq!(contents, vec!["one", "two", "three", "four"]);
}

#[test]
fn test_dyn_matcher() {
    let tree = build(DOC);
    let matchers: Vec<Box<dyn DomMatcher>> =
        vec![Box::new(tag_named("p")), Box::new(has_attribute("id"))];
    let counts: Vec<usize> = matchers
        .iter()
        .map(|m| tree.children_for_match(NodeId::ROOT, m.as_ref(), 10, true).len())
        .collect();
    assert_eq!(counts, vec![4, 2]);
}
