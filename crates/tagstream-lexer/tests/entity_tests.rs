//! Integration tests for entity namespaces and the escape codec.

use std::collections::HashMap;

use tagstream_lexer::{
    DEFAULT_XML_NAMESPACE, EntityNamespace, Error, HTML_NAMESPACE, Lexer, Node, NumericEntity,
    escape_attribute, escape_text, parse_numeric_entity, resolve_entity, unescape,
};
use tagstream_common::warning::warning_count;

#[test]
fn test_numeric_references() {
    assert_eq!(resolve_entity("#65", &DEFAULT_XML_NAMESPACE).as_deref(), Some("A"));
    assert_eq!(resolve_entity("#xA9", &DEFAULT_XML_NAMESPACE).as_deref(), Some("\u{A9}"));
    assert_eq!(resolve_entity("#XA9", &DEFAULT_XML_NAMESPACE).as_deref(), Some("\u{A9}"));
    assert_eq!(resolve_entity("#x1F600", &DEFAULT_XML_NAMESPACE).as_deref(), Some("😀"));
}

#[test]
fn test_named_references() {
    assert_eq!(resolve_entity("amp", &DEFAULT_XML_NAMESPACE).as_deref(), Some("&"));
    assert_eq!(resolve_entity("quot", &DEFAULT_XML_NAMESPACE).as_deref(), Some("\""));
    assert_eq!(resolve_entity("bogus", &DEFAULT_XML_NAMESPACE), None);
    assert_eq!(resolve_entity("copy", &DEFAULT_XML_NAMESPACE), None);
    assert_eq!(resolve_entity("copy", &HTML_NAMESPACE).as_deref(), Some("©"));
}

#[test]
fn test_malformed_numeric_references() {
    assert_eq!(parse_numeric_entity("amp"), NumericEntity::NotNumeric);
    assert_eq!(parse_numeric_entity("#"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#x"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#12a"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#+65"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#-1"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#xD800"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#x110000"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#99999999999"), NumericEntity::Invalid);
    assert_eq!(parse_numeric_entity("#60"), NumericEntity::Char('<'));
}

#[test]
fn test_malformed_numeric_is_not_looked_up_by_name() {
    let mut namespace = EntityNamespace::new();
    namespace.put_entity("#zz", "never").unwrap();
    assert_eq!(resolve_entity("#zz", &namespace), None);
}

#[test]
fn test_default_xml_namespace_is_immutable() {
    assert!(!DEFAULT_XML_NAMESPACE.is_mutable());
    assert_eq!(DEFAULT_XML_NAMESPACE.len(), 5);

    let mut frozen = EntityNamespace::xml();
    let err = frozen.put_entity("x", "y").unwrap_err();
    assert!(matches!(err, Error::ImmutableNamespace { ref name } if name == "x"));
    assert_eq!(frozen.get_entity("x"), None);
}

#[test]
fn test_clone_is_mutable_and_independent() {
    let mut copy = DEFAULT_XML_NAMESPACE.clone();
    assert!(copy.is_mutable());
    copy.put_entity("nbsp", "\u{A0}").unwrap();
    copy.put_entity("amp", "and").unwrap();

    assert_eq!(copy.get_entity("nbsp"), Some("\u{A0}"));
    assert_eq!(copy.get_entity("amp"), Some("and"));
    assert_eq!(DEFAULT_XML_NAMESPACE.get_entity("nbsp"), None);
    assert_eq!(DEFAULT_XML_NAMESPACE.get_entity("amp"), Some("&"));
}

#[test]
fn test_freeze() {
    let mut namespace = EntityNamespace::empty();
    assert!(namespace.is_empty());
    namespace.put_entity("a", "b").unwrap();
    namespace.freeze();
    assert!(namespace.put_entity("c", "d").is_err());
    assert_eq!(namespace.len(), 1);
    assert_eq!(namespace.iter().count(), 1);
}

#[test]
fn test_html_namespace() {
    let html = EntityNamespace::html();
    assert!(html.is_mutable());
    assert!(html.len() > DEFAULT_XML_NAMESPACE.len());
    assert_eq!(html.get_entity("nbsp"), Some("\u{A0}"));
    assert_eq!(html.get_entity("eacute"), Some("é"));
    assert_eq!(html.get_entity("yuml"), Some("ÿ"));
    assert_eq!(html.get_entity("mdash"), Some("—"));
    assert_eq!(html.get_entity("lt"), Some("<"));
}

#[test]
fn test_from_map() {
    let map = HashMap::from([("x".to_string(), "y".to_string())]);
    let namespace = EntityNamespace::from(map);
    assert_eq!(namespace.get_entity("x"), Some("y"));
    assert_eq!(namespace.get_entity("amp"), None);
    let names: Vec<&String> = (&namespace).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["x"]);
}

#[test]
fn test_unescape() {
    let ns = &*DEFAULT_XML_NAMESPACE;
    assert_eq!(unescape("a &lt;b&gt; &amp;amp;", ns), "a <b> &amp;");
    assert_eq!(unescape("&#65;&#x42;", ns), "AB");
    assert_eq!(unescape("&bogus; stays", ns), "&bogus; stays");
    assert_eq!(unescape("a & b", ns), "a & b");
    assert_eq!(unescape("trailing &", ns), "trailing &");
    assert_eq!(unescape("&#xZZ;", ns), "&#xZZ;");
}

#[test]
fn test_unescape_resumes_after_rejected_ampersand() {
    let ns = &*DEFAULT_XML_NAMESPACE;
    assert_eq!(unescape("& &lt;", ns), "& <");
    assert_eq!(unescape("&&amp;", ns), "&&");
}

#[test]
fn test_unescape_borrows_plain_text() {
    assert!(matches!(
        unescape("no references", &DEFAULT_XML_NAMESPACE),
        std::borrow::Cow::Borrowed(_)
    ));
}

#[test]
fn test_text_node_unescape() {
    let nodes: Vec<Node> = Lexer::from_text("<p>caf&eacute; &amp; more</p>")
        .map(Result::unwrap)
        .collect();
    let text = nodes[2].as_text().unwrap();
    assert_eq!(text.text(), "caf&eacute; &amp; more");
    assert_eq!(text.unescaped_text(&DEFAULT_XML_NAMESPACE), "caf&eacute; & more");
    assert_eq!(text.unescaped_text(&HTML_NAMESPACE), "café & more");
}

#[test]
fn test_escape() {
    assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    assert_eq!(escape_text("say \"hi\""), "say \"hi\"");
    assert_eq!(escape_attribute("it's \"x\""), "it&apos;s &quot;x&quot;");
    assert!(matches!(escape_text("plain"), std::borrow::Cow::Borrowed("plain")));
}

#[test]
fn test_escape_then_unescape() {
    let original = "<a href=\"x\">Tom & 'Jerry'</a>";
    let escaped = escape_attribute(original);
    assert_eq!(unescape(&escaped, &DEFAULT_XML_NAMESPACE), original);
}

#[test]
fn test_malformed_references_are_not_logged() {
    let ns = &DEFAULT_XML_NAMESPACE;
    let input = format!("{};", "&#".repeat(5000));
    assert_eq!(unescape(&input, ns), input);
    assert_eq!(resolve_entity("#xZZ", ns), None);
    assert_eq!(unescape("&#xZZ; &#-1; &#;", ns), "&#xZZ; &#-1; &#;");
    assert_eq!(warning_count(), 0);
}

#[test]
fn test_reference_body_stops_at_ampersand() {
    let ns = &DEFAULT_XML_NAMESPACE;
    assert_eq!(unescape("&foo&lt;", ns), "&foo<");
    assert_eq!(unescape("&#12&#x41;", ns), "&#12A");

    let input = format!("{};", "&".repeat(100_000));
    assert_eq!(unescape(&input, ns), input);
}
