//! In-memory model of a parsed INI document
//!
//! The parser produces a [`Document`]: an ordered list of [`Section`]s, each holding an
//! ordered list of [`Item`]s. Comments are attached to the node that follows them.
//!
//! Array keys (`name[]`) are stored as plain items. The grouping of items sharing an array
//! name is a derived view, see [`Section::entries`].

use serde::Serialize;
use std::collections::HashMap;

/// Suffix marking a key as an element of an array group.
pub const ARRAY_SUFFIX: &str = "[]";

/// Name of the implicit section holding items that precede any header.
pub const DEFAULT_SECTION: &str = "";

/// A parsed document: sections in first-discovery order, names unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn section_at_mut(&mut self, index: usize) -> &mut Section {
        &mut self.sections[index]
    }

    /// Appends a section unless one with the same name exists.
    ///
    /// Returns the index of the section carrying that name and whether it was inserted.
    pub(crate) fn insert_section(&mut self, section: Section) -> (usize, bool) {
        if let Some(index) = self.sections.iter().position(|s| s.name == section.name) {
            return (index, false);
        }
        self.sections.push(section);
        (self.sections.len() - 1, true)
    }

    pub(crate) fn remove_section(&mut self, name: &str) -> Option<Section> {
        let position = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(position))
    }
}

/// A named group of items introduced by a `[name]` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    name: String,
    comments: Vec<String>,
    items: Vec<Item>,
}

impl Section {
    pub fn new(name: impl Into<String>, comments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            comments,
            items: Vec::new(),
        }
    }

    pub fn with_items(name: impl Into<String>, comments: Vec<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            comments,
            items,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comment lines that preceded the section header.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_SECTION
    }

    pub(crate) fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Items grouped for output.
    ///
    /// Plain items and array groups appear in the order of their first occurrence. Each
    /// array group collects every item carrying its array name, in input order,
    /// no matter where they sit in the section.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        let mut entries = Vec::with_capacity(self.items.len());
        let mut groups: HashMap<&str, usize> = HashMap::new();

        for item in &self.items {
            match item.array_name() {
                Some(name) => match groups.get(name).copied() {
                    Some(index) => {
                        if let Entry::Array { items, .. } = &mut entries[index] {
                            items.push(item);
                        }
                    }
                    None => {
                        groups.insert(name, entries.len());
                        entries.push(Entry::Array {
                            name,
                            items: vec![item],
                        });
                    }
                },
                None => entries.push(Entry::Item(item)),
            }
        }

        entries
    }
}

/// A single `key=value` line with the comments that preceded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    key: String,
    value: String,
    comments: Vec<String>,
}

impl Item {
    pub fn new(key: impl Into<String>, value: impl Into<String>, comments: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comments,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The key without its `[]` suffix, for array elements only.
    pub fn array_name(&self) -> Option<&str> {
        self.key.strip_suffix(ARRAY_SUFFIX)
    }
}

/// Output unit of a section: a plain item or a whole array group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    Item(&'a Item),
    Array { name: &'a str, items: Vec<&'a Item> },
}
