//! # ini2xml
//!
//! Converts simple INI-style configuration text into an equivalent XML document,
//! preserving section and key order, repeated `key[]` array entries and comments.
//!
//! The conversion runs in two steps:
//!
//! - [parsing](ini2xml::parsing) turns lines into a [`Document`](ini2xml::ast::Document)
//! - a [formatter](ini2xml::formats) renders the document (XML by default)
//!
//! [`DocumentLoader`](ini2xml::loader::DocumentLoader) ties both steps to file I/O.

pub mod ini2xml;
