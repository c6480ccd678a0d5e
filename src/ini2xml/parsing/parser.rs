use crate::ini2xml::ast::{Document, Item, Section, DEFAULT_SECTION};
use crate::ini2xml::parsing::error::ParseError;
use crate::ini2xml::parsing::line_classification::{classify_line, split_item, LineType};

/// Represents an on-going parse.
#[derive(Debug)]
struct Parser {
    document: Document,
    /// Index of the section receiving items
    current_section: usize,
    pending_comments: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        let mut document = Document::new();
        // Holds items appearing before the first header; dropped in `finish` if unused.
        let (current_section, _) =
            document.insert_section(Section::new(DEFAULT_SECTION, Vec::new()));

        Self {
            document,
            current_section,
            pending_comments: Vec::new(),
        }
    }

    /// Feed one trimmed, non-blank line.
    fn process_line(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        match classify_line(line) {
            LineType::Comment(text) => self.pending_comments.push(text.to_string()),
            LineType::SectionHeader(name) => self.enter_section(name),
            LineType::Item(line) => self.push_item(line_number, line)?,
        }
        Ok(())
    }

    fn enter_section(&mut self, name: &str) {
        let comments = std::mem::take(&mut self.pending_comments);

        let (index, inserted) = self.document.insert_section(Section::new(name, comments));
        if inserted {
            log::debug!("section [{name}] discovered");
        } else {
            // Duplicate headers merge into the first occurrence, keeping its comments.
            log::debug!("section [{name}] reopened, merging items");
        }

        self.current_section = index;
    }

    fn push_item(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        let (key, value) = split_item(line).ok_or_else(|| ParseError::MalformedItemLine {
            line_number,
            line: line.to_string(),
        })?;
        let item = Item::new(key, value, std::mem::take(&mut self.pending_comments));

        self.document.section_at_mut(self.current_section).push(item);

        Ok(())
    }

    fn finish(mut self) -> Document {
        if !self.pending_comments.is_empty() {
            log::debug!(
                "dropping {} trailing comment line(s) with no following node",
                self.pending_comments.len()
            );
        }

        if self
            .document
            .section(DEFAULT_SECTION)
            .is_some_and(|section| section.items().is_empty())
        {
            self.document.remove_section(DEFAULT_SECTION);
        }

        self.document
    }
}

/// Parse an ordered sequence of raw lines into a [`Document`].
///
/// Lines are trimmed and blank lines skipped. Line numbers reported in errors are 1-based
/// positions within `lines`.
pub fn parse_lines<I, S>(lines: I) -> Result<Document, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        parser.process_line(index + 1, line)?;
    }

    Ok(parser.finish())
}

/// Parse source text, splitting it on `\r\n`, `\n` or a lone `\r`.
pub fn parse_str(source: &str) -> Result<Document, ParseError> {
    parse_lines(split_lines(source))
}

fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(source);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(['\r', '\n']) {
            Some(end) => {
                let skip = if text[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[end + skip..]);
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}
