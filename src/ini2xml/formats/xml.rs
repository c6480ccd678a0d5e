//! XML serialization
//!
//! Lowers a [`Document`] into a small XML node tree, then writes that tree with
//! `quick_xml`.
//!
//! ## Format
//!
//! - Document → `<root>`
//! - Section → `<section name="...">`, its header comments written just before it
//! - Plain item → `<item name="key">value</item>`, its comments written just before it
//! - Array group → `<array name="prefix">` holding one unnamed `<item>` per element, each
//!   preceded by its own comments
//!
//! ## Example
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <root>
//!   <!-- Accounts-->
//!   <section name="user">
//!     <item name="age">30</item>
//!     <array name="role">
//!       <item>admin</item>
//!       <item>editor</item>
//!     </array>
//!   </section>
//! </root>
//! ```

use super::registry::{FormatError, Formatter};
use crate::ini2xml::ast::{Document, Entry, Item, Section};
use crate::ini2xml::config::XmlOutputConfig;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

/// A node of the output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Comment(String),
}

/// An element with attributes in insertion order, optional text and child nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build the `<root>` element for a document
pub fn build_tree(doc: &Document) -> XmlElement {
    let mut root = XmlElement::new("root");

    for section in doc.sections() {
        push_comments(&mut root, section.comments());
        root.children.push(XmlNode::Element(section_element(section)));
    }

    root
}

fn section_element(section: &Section) -> XmlElement {
    let mut element = XmlElement::new("section").with_attribute("name", section.name());

    for entry in section.entries() {
        match entry {
            Entry::Item(item) => {
                push_comments(&mut element, item.comments());
                element.children.push(XmlNode::Element(
                    XmlElement::new("item")
                        .with_attribute("name", item.key())
                        .with_text(item.value()),
                ));
            }
            Entry::Array { name, items } => {
                element
                    .children
                    .push(XmlNode::Element(array_element(name, &items)));
            }
        }
    }

    element
}

/// Array elements carry no `name`; the enclosing `<array>` does.
fn array_element(name: &str, items: &[&Item]) -> XmlElement {
    let mut array = XmlElement::new("array").with_attribute("name", name);

    for item in items {
        push_comments(&mut array, item.comments());
        array
            .children
            .push(XmlNode::Element(XmlElement::new("item").with_text(item.value())));
    }

    array
}

fn push_comments(parent: &mut XmlElement, comments: &[String]) {
    parent
        .children
        .extend(comments.iter().cloned().map(XmlNode::Comment));
}

/// Write a tree as an XML document string
pub fn write_tree(root: &XmlElement, options: &XmlOutputConfig) -> Result<String, FormatError> {
    let (indent_char, indent_size) = if options.indent_with_tabs {
        (b'\t', 1)
    } else {
        (b' ', options.indent_size)
    };
    let mut writer = Writer::new_with_indent(Vec::new(), indent_char, indent_size);

    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_error)?;
    }
    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), FormatError> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Comment(text) => {
            check_chars(text, "comment")?;
            writer
                .write_event(Event::Comment(BytesText::from_escaped(sanitize_comment(
                    text,
                ))))
                .map_err(xml_error)
        }
    }
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), FormatError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        check_chars(value, "attribute value")?;
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|text| !text.is_empty());
    if let Some(text) = text {
        check_chars(text, "text")?;
    }
    if text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}

fn xml_error(err: impl fmt::Display) -> FormatError {
    FormatError::Serialization(err.to_string())
}

/// The `Char` production of XML 1.0. Surrogates never occur in a `str`.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Rejects content no XML 1.0 parser would accept, naming the first offending character.
fn check_chars(content: &str, context: &str) -> Result<(), FormatError> {
    match content.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(FormatError::Serialization(format!(
            "character U+{:04X} is not allowed in XML {context} {content:?}",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

/// Make comment text legal inside `<!-- -->`.
///
/// XML forbids `--` within a comment and a `-` right before the closing `-->`, so a space is
/// inserted between consecutive hyphens and after a trailing one.
fn sanitize_comment(text: &str) -> Cow<'_, str> {
    if !text.contains("--") && !text.ends_with('-') {
        return Cow::Borrowed(text);
    }

    let mut sanitized = String::with_capacity(text.len() + 4);
    let mut previous = None;
    for c in text.chars() {
        if c == '-' && previous == Some('-') {
            sanitized.push(' ');
        }
        sanitized.push(c);
        previous = Some(c);
    }
    if sanitized.ends_with('-') {
        sanitized.push(' ');
    }

    log::warn!("comment {text:?} is not valid XML comment text, written as {sanitized:?}");
    Cow::Owned(sanitized)
}

/// Serialize a document to an XML string
pub fn serialize_document(
    doc: &Document,
    options: &XmlOutputConfig,
) -> Result<String, FormatError> {
    write_tree(&build_tree(doc), options)
}

/// Formatter implementation for the XML output
#[derive(Debug, Clone, Default)]
pub struct XmlFormatter {
    options: XmlOutputConfig,
}

impl XmlFormatter {
    pub fn new(options: XmlOutputConfig) -> Self {
        Self { options }
    }
}

impl Formatter for XmlFormatter {
    fn name(&self) -> &str {
        "xml"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serialize_document(doc, &self.options)
    }

    fn description(&self) -> &str {
        "XML document with section, item and array elements"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini2xml::parsing::parse_str;
    use rstest::rstest;

    fn child_elements(element: &XmlElement) -> Vec<&XmlElement> {
        element
            .children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Element(element) => Some(element),
                XmlNode::Comment(_) => None,
            })
            .collect()
    }

    fn to_xml(source: &str) -> String {
        let doc = parse_str(source).expect("failed to parse hardcoded document");
        serialize_document(&doc, &XmlOutputConfig::default()).expect("failed to serialize")
    }

    #[test]
    fn test_serialize_sections_items_and_arrays() {
        let xml =
            to_xml("name=Alice\n[user]\nage=30\n; role comment\nrole[]=admin\nrole[]=editor\n");

        insta::assert_snapshot!(xml, @r#"
        <?xml version="1.0" encoding="utf-8"?>
        <root>
          <section name="">
            <item name="name">Alice</item>
          </section>
          <section name="user">
            <item name="age">30</item>
            <array name="role">
              <!-- role comment-->
              <item>admin</item>
              <item>editor</item>
            </array>
          </section>
        </root>
        "#);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            to_xml("; only a comment\n\n"),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root/>"
        );
    }

    #[test]
    fn test_build_tree_places_section_comments_at_root_level() {
        let doc = parse_str("; about\n// user\n[user]\n; the key\nkey=value\n").unwrap();
        let root = build_tree(&doc);

        assert_eq!(root.name, "root");
        assert_eq!(
            root.children[..2],
            [
                XmlNode::Comment(" about".to_string()),
                XmlNode::Comment(" user".to_string()),
            ]
        );

        let section = match &root.children[2] {
            XmlNode::Element(element) => element,
            other => panic!("Expected section element, got {other:?}"),
        };
        assert_eq!(section.attribute("name"), Some("user"));
        assert_eq!(
            section.children,
            vec![
                XmlNode::Comment(" the key".to_string()),
                XmlNode::Element(
                    XmlElement::new("item")
                        .with_attribute("name", "key")
                        .with_text("value")
                ),
            ]
        );
    }

    #[test]
    fn test_build_tree_groups_interleaved_array_items() {
        let doc = parse_str("[s]\nlist[]=1\nplain=x\n; late\nlist[]=2\n").unwrap();
        let root = build_tree(&doc);

        let section = child_elements(&root)[0];
        let children = child_elements(section);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "array");
        assert_eq!(children[0].attribute("name"), Some("list"));
        assert_eq!(children[1].attribute("name"), Some("plain"));

        let array = children[0];
        assert_eq!(
            array.children,
            vec![
                XmlNode::Element(XmlElement::new("item").with_text("1")),
                XmlNode::Comment(" late".to_string()),
                XmlNode::Element(XmlElement::new("item").with_text("2")),
            ]
        );
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let xml = to_xml("[a&b]\nkey<1>=\"x\" & 'y'\n");

        assert!(xml.contains("<section name=\"a&amp;b\">"));
        assert!(xml.contains("name=\"key&lt;1&gt;\""));
        assert!(xml.contains("&amp;"));
        assert!(!xml.contains("& '"));
    }

    #[test]
    fn test_empty_value_and_empty_section_are_self_closing() {
        // The blank segment between the separators is the value
        let xml = to_xml("[empty]\n[s]\na =  = b\nlist[] = \t= x\n");

        assert!(xml.contains("<section name=\"empty\"/>"));
        assert!(xml.contains("<item name=\"a\"/>"));
        assert!(xml.contains("<array name=\"list\">\n      <item/>\n    </array>"));
    }

    #[rstest]
    #[case::value("[s]\nk=a\u{1}b\n", "U+0001")]
    #[case::key("[s]\nk\u{8}=v\n", "U+0008")]
    #[case::section_name("[s\u{1F}]\nk=v\n", "U+001F")]
    #[case::array_value("[s]\nk[]=v\u{B}w\n", "U+000B")]
    #[case::comment("; bell\u{7}\n[s]\nk=v\n", "U+0007")]
    #[case::noncharacter("[s]\nk=\u{FFFE}\n", "U+FFFE")]
    fn test_characters_outside_xml_are_rejected(#[case] source: &str, #[case] code: &str) {
        let doc = parse_str(source).unwrap();

        match serialize_document(&doc, &XmlOutputConfig::default()).unwrap_err() {
            FormatError::Serialization(message) => assert!(message.contains(code), "{message}"),
            other => panic!("Expected Serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_controls_are_allowed() {
        let xml = to_xml("[s]\nk=a\tb\n");
        assert!(xml.contains("<item name=\"k\">a\tb</item>"));
    }

    #[test]
    fn test_sanitize_comment() {
        assert_eq!(sanitize_comment(" plain"), " plain");
        assert_eq!(sanitize_comment(" a--b"), " a- -b");
        assert_eq!(sanitize_comment("----"), "- - - - ");
        assert_eq!(sanitize_comment(" trailing-"), " trailing- ");
        assert!(matches!(sanitize_comment(" a - b"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_options() {
        let doc = parse_str("[s]\nk=v\n").unwrap();

        let bare = XmlOutputConfig {
            declaration: false,
            indent_size: 4,
            indent_with_tabs: false,
        };
        assert_eq!(
            serialize_document(&doc, &bare).unwrap(),
            "<root>\n    <section name=\"s\">\n        <item name=\"k\">v</item>\n    </section>\n</root>"
        );

        let tabs = XmlOutputConfig {
            indent_with_tabs: true,
            ..bare
        };
        assert!(serialize_document(&doc, &tabs)
            .unwrap()
            .contains("\n\t<section name=\"s\">\n\t\t<item"));
    }

    #[test]
    fn test_formatter_trait() {
        let formatter = XmlFormatter::default();
        assert_eq!(formatter.name(), "xml");

        let output = formatter.serialize(&Document::new()).unwrap();
        assert!(output.ends_with("<root/>"));
    }
}
