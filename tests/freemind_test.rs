//! Tests for the FreeMind serializer
//!
//! The rendered document is parsed back with quick-xml to check it is
//! well-formed and that every leaf survives escaping intact.

use proptest::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use rstest::rstest;

use bookmind::domain::freemind::{escape, render, render_node};
use bookmind::domain::{Classifier, HierarchyBuilder, HierarchyParams, Node, RawLink};

/// (TEXT, LINK) of every `node` element, in document order.
fn parse_nodes(document: &str) -> Vec<(String, Option<String>)> {
    let mut reader = Reader::from_str(document);
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut nodes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open.push(e.name().as_ref().to_vec());
                if e.name().as_ref() == b"node" {
                    nodes.push(node_attributes(&e));
                }
            }
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"node" {
                    nodes.push(node_attributes(&e));
                }
            }
            Ok(Event::End(e)) => {
                let expected = open.pop().expect("end tag without start tag");
                assert_eq!(e.name().as_ref(), expected.as_slice(), "mismatched end tag");
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed document at {}: {e}", reader.buffer_position()),
        }
    }
    assert!(open.is_empty(), "unclosed elements: {open:?}");
    nodes
}

fn node_attributes(e: &quick_xml::events::BytesStart<'_>) -> (String, Option<String>) {
    let mut text = String::new();
    let mut link = None;
    for attr in e.attributes() {
        let attr = attr.expect("valid attribute");
        let value = attr.unescape_value().expect("valid escape").into_owned();
        match attr.key.as_ref() {
            b"TEXT" => text = value,
            b"LINK" => link = Some(value),
            _ => {}
        }
    }
    (text, link)
}

fn e2e_tree() -> Node {
    let links = vec![
        RawLink::new("GitHub - my repo", "https://github.com/x"),
        RawLink::new("Stack Overflow answer", "https://stackoverflow.com/q/1"),
    ];
    let records = Classifier::default().build_records(&links).records;
    HierarchyBuilder::new(HierarchyParams::default()).build(&records)
}

// ============================================================
// escape()
// ============================================================

#[rstest]
#[case("<a>&\"'", "&lt;a&gt;&amp;&quot;&apos;")]
#[case("Tom & Jerry", "Tom &amp; Jerry")]
#[case("https://x.org/?a=1&b=2", "https://x.org/?a=1&amp;b=2")]
#[case("plain", "plain")]
fn given_special_characters_when_escape_then_replaced_with_entities(
    #[case] input: &str,
    #[case] expected: &str,
) {
    assert_eq!(escape(input), expected);
}

// ============================================================
// render()
// ============================================================

#[test]
fn given_two_category_tree_when_render_then_exact_document() {
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0.1">
<attribute_registry/>
<node TEXT="Bookmarks">
  <node TEXT="Development &amp; Code (1)">
    <node TEXT="GitHub - my repo" LINK="https://github.com/x"/>
  </node>
  <node TEXT="Documentation &amp; Help (1)">
    <node TEXT="Stack Overflow answer" LINK="https://stackoverflow.com/q/1"/>
  </node>
</node>
</map>"#;

    assert_eq!(render(&e2e_tree()), expected);
}

#[test]
fn given_document_when_render_then_no_trailing_newline() {
    let document = render(&e2e_tree());
    assert!(document.ends_with("</map>"));
}

#[test]
fn given_empty_folder_at_depth_when_render_node_then_indented_self_closing() {
    let node = Node::folder("Q&A", vec![], 0);
    assert_eq!(render_node(&node, 2), "    <node TEXT=\"Q&amp;A\"/>");
}

#[test]
fn given_rendered_tree_when_parsed_then_leaves_round_trip() {
    let tree = e2e_tree();

    let nodes = parse_nodes(&render(&tree));

    let links: Vec<(String, String)> = nodes
        .into_iter()
        .filter_map(|(text, link)| link.map(|l| (text, l)))
        .collect();
    let expected: Vec<(String, String)> = tree
        .records()
        .iter()
        .map(|r| (r.title.clone(), r.url.clone()))
        .collect();
    assert_eq!(links, expected);
}

proptest! {
    #[test]
    fn rendered_document_is_well_formed_and_leaves_unescape_to_input(
        titles in prop::collection::vec("[a-zA-Z0-9 <>&\"'éß-]{1,24}", 1..40),
    ) {
        let links: Vec<RawLink> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| RawLink::new(t.clone(), format!("https://site{}.org/p?a={i}&b='x'", i % 5)))
            .collect();
        let records = Classifier::default().build_records(&links).records;
        let tree = HierarchyBuilder::new(HierarchyParams::new(3, 3).unwrap()).build(&records);

        let nodes = parse_nodes(&render(&tree));

        let leaves: Vec<(String, String)> = nodes
            .into_iter()
            .filter_map(|(text, link)| link.map(|l| (text, l)))
            .collect();
        let expected: Vec<(String, String)> = tree
            .records()
            .iter()
            .map(|r| (r.title.clone(), r.url.clone()))
            .collect();
        prop_assert_eq!(leaves, expected);
    }
}
