//! Markdown heading extraction and outline construction.
//!
//! This module scans markdown text for ATX headings, assigns each one a
//! stable anchor id and nests the flat list into an outline tree.

mod document;
pub mod output;
pub mod slug;
pub mod utils;

pub use document::{Document, Heading, OutlineNode, ancestor_ids, build_tree};
pub use slug::Slugger;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling heading extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Ignore `#` lines inside fenced code blocks
    pub skip_code_fences: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_code_fences: true,
        }
    }
}

/// Parse a markdown file and extract its structure.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_file(path: &Path, options: ExtractOptions) -> std::io::Result<Document> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_markdown_with(&content, options))
}

/// Parse markdown content with default options.
pub fn parse_markdown(content: &str) -> Document {
    parse_markdown_with(content, ExtractOptions::default())
}

pub fn parse_markdown_with(content: &str, options: ExtractOptions) -> Document {
    Document::new(content.to_string(), extract_headings(content, options))
}

/// Extract headings in document order.
///
/// The document is parsed as CommonMark; a heading counts when its source
/// line is an ATX heading at column 0, so setext, indented and nested
/// (quote or list) headings are left out. The label is the heading's
/// rendered inline text: emphasis, code spans, link and image wrappers are
/// dropped and entities decoded. Every call allocates ids with its own
/// [`Slugger`], so parsing the same text twice yields identical ids.
pub fn extract_headings(content: &str, options: ExtractOptions) -> Vec<Heading> {
    let lines = LineIndex::new(content);
    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    // (line, level, label) of the heading being read
    let mut current: Option<(usize, usize, String)> = None;

    let mut push = |line: usize, level: usize, label: &str| {
        let text = label.trim();
        if text.is_empty() {
            return;
        }
        headings.push(Heading {
            id: slugger.slug(text),
            text: text.to_string(),
            level,
            line,
        });
    };

    for (event, range) in Parser::new_ext(content, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                let line = lines.line_of(range.start);
                current = utils::parse_heading_line(lines.line(line))
                    .map(|(level, _)| (line, level, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut label)) = current {
                    label.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((line, level, label)) = current.take() {
                    push(line, level, &label);
                }
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) if !options.skip_code_fences => {
                let first = lines.line_of(range.start);
                let last = lines.line_of(range.end.saturating_sub(1));
                for line in first..=last {
                    let source = lines.line(line);
                    if let Some((level, _)) = utils::parse_heading_line(source) {
                        push(line, level, &heading_label(source));
                    }
                }
            }
            _ => {}
        }
    }

    headings
}

fn markdown_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
}

/// Rendered text of a single heading line parsed on its own.
fn heading_label(line: &str) -> String {
    let mut label = String::new();
    let mut inside = false;
    for event in Parser::new_ext(line, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => inside = true,
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(text) | Event::Code(text) if inside => label.push_str(&text),
            _ => {}
        }
    }
    label
}

/// Maps byte offsets to zero-based line numbers.
struct LineIndex<'a> {
    content: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { content, starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// Source text of `line` without its line ending.
    fn line(&self, line: usize) -> &'a str {
        let Some(&start) = self.starts.get(line) else {
            return "";
        };
        let end = self
            .starts
            .get(line + 1)
            .map_or(self.content.len(), |next| next - 1);
        self.content[start..end].trim_end_matches('\r')
    }
}
