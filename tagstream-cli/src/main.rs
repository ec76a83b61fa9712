//! tagstream CLI
//!
//! Lexes angle-bracket markup from a file or stdin and prints the node
//! stream, the assembled tree, or the result of a search.

use std::fs::File;
use std::io::{self, BufReader, Read};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tagstream_common::warning::{set_warnings_enabled, warn_once};
use tagstream_dom::{
    DomMatcher, DomTree, EndTagPolicy, NodeId, NodeRef, attribute_equals, tag_named,
};
use tagstream_lexer::{
    Attribute, DEFAULT_XML_NAMESPACE, HTML_NAMESPACE, Lexer, Node, NodeKind, NumericEntity,
    TagNode, TagType, Utf8Reader, parse_numeric_entity, unescape,
};

#[derive(Parser, Debug)]
#[command(name = "tagstream")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print every node of a document
    tagstream tokens page.html

    # Same, as one JSON object per line
    tagstream tokens --json page.html

    # Print the nested tree, ignoring whitespace-only text
    tagstream --trim tree page.xml

    # Find the first three links to example.com
    tagstream find --tag a --attr href=https://example.com --limit 3 page.html

    # Resolve character references
    tagstream unescape --html 'caf&eacute; &amp; cr&#xE8;me'
"#)]
struct Cli {
    /// Trim text nodes and drop text that is only whitespace
    #[arg(long, global = true)]
    trim: bool,

    /// Do not print warnings about recovered markup
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one line per lexed node
    Tokens {
        /// Markup file to read, or `-` for stdin
        #[arg(value_name = "FILE|-")]
        input: String,

        /// Print JSON objects instead of coloured text
        #[arg(long)]
        json: bool,
    },

    /// Print the tree assembled from the node stream
    Tree {
        /// Markup file to read, or `-` for stdin
        #[arg(value_name = "FILE|-")]
        input: String,

        /// Let every end tag close exactly one element, whatever its name
        #[arg(long)]
        strict: bool,
    },

    /// Print tags matching every given condition
    Find {
        /// Markup file to read, or `-` for stdin
        #[arg(value_name = "FILE|-")]
        input: String,

        /// Tag name, compared ignoring ASCII case
        #[arg(long, value_name = "NAME")]
        tag: Option<String>,

        /// Attribute with an exact value; may be repeated
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        attrs: Vec<(String, String)>,

        /// Maximum number of matches to print
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Only search the top level instead of the whole tree
        #[arg(long)]
        shallow: bool,
    },

    /// Resolve character references in TEXT
    Unescape {
        /// Text containing `&name;`, `&#N;` or `&#xH;` references
        text: String,

        /// Resolve HTML named entities as well as the XML ones
        #[arg(long)]
        html: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_warnings_enabled(!cli.quiet);

    match cli.command {
        Command::Tokens { input, json } => print_tokens(&input, cli.trim, json),
        Command::Tree { input, strict } => {
            let policy = if strict {
                EndTagPolicy::Strict
            } else {
                EndTagPolicy::ByName
            };
            let tree = DomTree::parse(open_lexer(&input, cli.trim)?, policy)?;
            print_tree(&tree, NodeId::ROOT, 0);
            Ok(())
        }
        Command::Find {
            input,
            tag,
            attrs,
            limit,
            shallow,
        } => {
            let tree = DomTree::parse(open_lexer(&input, cli.trim)?, EndTagPolicy::ByName)?;
            find(&tree, tag, attrs, limit, !shallow);
            Ok(())
        }
        Command::Unescape { text, html } => {
            let entities = if html {
                &*HTML_NAMESPACE
            } else {
                &*DEFAULT_XML_NAMESPACE
            };
            for body in malformed_numeric_references(&text) {
                warn_once(
                    "Entities",
                    &format!("left malformed numeric character reference `&{body};` as is"),
                );
            }
            println!("{}", unescape(&text, entities));
            Ok(())
        }
    }
}

type FileLexer = Lexer<Utf8Reader<BufReader<Box<dyn Read>>>>;

fn open_lexer(input: &str, trim: bool) -> Result<FileLexer> {
    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(input).with_context(|| format!("failed to open `{input}`"))?)
    };
    Ok(Lexer::from_reader(reader).with_cleanup_whitespace(trim))
}

fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("expected KEY=VALUE, got `{arg}`");
    };
    if key.is_empty() {
        bail!("attribute name must not be empty in `{arg}`");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Bodies of the `&#...;` references in `text` that are not valid code
/// points, delimited the way `unescape` delimits them.
fn malformed_numeric_references(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices("&#").filter_map(move |(start, _)| {
        let after = &text[start + 1..];
        let end = after.find([';', '&'])?;
        let body = &after[..end];
        (after[end..].starts_with(';') && parse_numeric_entity(body) == NumericEntity::Invalid)
            .then_some(body)
    })
}

/// One line of `tokens --json` output.
#[derive(Serialize)]
struct TokenRecord<'a> {
    kind: NodeKind,
    raw: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_type: Option<TagType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    attributes: &'a [Attribute],
}

impl<'a> TokenRecord<'a> {
    fn new(node: &'a Node) -> Self {
        let tag = node.as_tag();
        Self {
            kind: node.kind(),
            raw: node.raw_content(),
            tag_type: tag.map(TagNode::tag_type),
            name: tag.map(TagNode::tag_name),
            attributes: tag.map(TagNode::attributes).unwrap_or_default(),
        }
    }
}

fn print_tokens(input: &str, trim: bool, json: bool) -> Result<()> {
    for node in open_lexer(input, trim)? {
        let node = node?;
        if json {
            println!("{}", serde_json::to_string(&TokenRecord::new(&node))?);
            continue;
        }
        let kind = format!("{:<10}", node.kind());
        match node.as_tag() {
            Some(tag) => println!(
                "{} {:<9} {:?}",
                kind.cyan(),
                tag.tag_type().to_string().yellow(),
                node.segment()
            ),
            None => println!("{} {:<9} {:?}", kind.dimmed(), "", node.segment()),
        }
    }
    Ok(())
}

fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    match tree.element(id) {
        None => println!("{prefix}{}", "#root".bold()),
        Some(Node::Text(text)) => {
            let display = text.text().replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}\"{}\"", display.green());
        }
        Some(node @ Node::Tag(_)) => println!("{prefix}{}", node.to_markup().blue()),
        Some(node) => println!("{prefix}{}", node.to_markup().dimmed()),
    }
    for &child_id in tree.children(id) {
        print_tree(tree, child_id, indent + 1);
    }
}

fn find(
    tree: &DomTree,
    tag: Option<String>,
    attrs: Vec<(String, String)>,
    limit: usize,
    deep: bool,
) {
    let mut matchers: Vec<Box<dyn DomMatcher>> = Vec::new();
    if let Some(name) = tag {
        matchers.push(Box::new(tag_named(name)));
    }
    for (key, value) in attrs {
        matchers.push(Box::new(attribute_equals(key, value)));
    }
    let matcher = |node: NodeRef<'_>| {
        node.tag().is_some() && matchers.iter().all(|matcher| matcher.matches(node))
    };

    for id in tree.children_for_match(NodeId::ROOT, &matcher, limit, deep) {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let text = node.text_content(&DEFAULT_XML_NAMESPACE);
        match node.element() {
            Some(element) if text.is_empty() => println!("{}", element.to_markup().blue()),
            Some(element) => println!("{} {}", element.to_markup().blue(), text.trim()),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("href=a=b").unwrap(),
            ("href".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_key_value("x=").unwrap(), ("x".to_string(), String::new()));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=v").is_err());
    }

    #[test]
    fn test_malformed_numeric_references() {
        let found: Vec<&str> =
            malformed_numeric_references("&#65; &#xZZ; &#; &#12&#x41; &#-1;").collect();
        assert_eq!(found, vec!["#xZZ", "#", "#-1"]);
        assert_eq!(malformed_numeric_references("&#".repeat(1000).as_str()).count(), 0);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "tagstream", "--trim", "find", "-", "--attr", "id=x", "--attr", "class=y",
        ]);
        assert!(cli.trim);
        assert!(!cli.quiet);
        match cli.command {
            Command::Find {
                input,
                tag,
                attrs,
                limit,
                shallow,
            } => {
                assert_eq!(input, "-");
                assert_eq!(attrs.len(), 2);
                assert_eq!(limit, 10);
                assert!(!shallow);
                assert!(tag.is_none());
            }
            other => panic!("expected find, got {other:?}"),
        }
    }

    #[test]
    fn test_token_record_json() {
        let node = Lexer::from_text("<a href=x>").nth(1).unwrap().unwrap();
        let json = serde_json::to_string(&TokenRecord::new(&node)).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"tag","raw":"a href=x","tag_type":"start","name":"a","attributes":[{"key":"href","value":"x"}]}"#
        );

        let text = Lexer::from_text("hi").next().unwrap().unwrap();
        let json = serde_json::to_string(&TokenRecord::new(&text)).unwrap();
        assert_eq!(json, r#"{"kind":"text","raw":"hi"}"#);
    }
}
