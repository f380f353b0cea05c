//! Markdown parsing shared by the HTML renderer and the PDF layout.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Render generated Markdown to an HTML fragment.
///
/// Raw HTML in the input is emitted as escaped text.
pub fn render_html(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events);
    output
}

/// A printable unit of a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: usize, text: String },
    Paragraph(String),
    /// List item; `depth` starts at 1.
    Item { depth: usize, text: String },
    Row { cells: Vec<String>, header: bool },
    Code(String),
    Rule,
}

/// Flatten a Markdown document into printable blocks. Inline emphasis is dropped.
pub fn blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut cells: Vec<String> = Vec::new();
    let mut list_depth = 0usize;

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::End(TagEnd::Heading(level)) => {
                let heading = std::mem::take(&mut text).trim().to_string();
                blocks.push(Block::Heading { level: level as usize, text: heading });
            }
            Event::End(TagEnd::Paragraph) => {
                if list_depth > 0 {
                    text.push(' ');
                } else {
                    push_paragraph(&mut blocks, &mut text);
                }
            }
            Event::Start(Tag::List(_)) => {
                if list_depth > 0 {
                    push_item(&mut blocks, &mut text, list_depth);
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::End(TagEnd::Item) => push_item(&mut blocks, &mut text, list_depth),
            Event::End(TagEnd::TableCell) => cells.push(std::mem::take(&mut text).trim().to_string()),
            Event::End(TagEnd::TableHead) => {
                blocks.push(Block::Row { cells: std::mem::take(&mut cells), header: true })
            }
            Event::End(TagEnd::TableRow) => {
                blocks.push(Block::Row { cells: std::mem::take(&mut cells), header: false })
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = std::mem::take(&mut text);
                blocks.push(Block::Code(code.trim_end_matches('\n').to_string()));
            }
            Event::Text(t) | Event::Code(t) | Event::Html(t) | Event::InlineHtml(t) => {
                text.push_str(&t)
            }
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::Rule => blocks.push(Block::Rule),
            _ => {}
        }
    }

    push_paragraph(&mut blocks, &mut text);
    blocks
}

fn push_paragraph(blocks: &mut Vec<Block>, text: &mut String) {
    let paragraph = std::mem::take(text);
    if !paragraph.trim().is_empty() {
        blocks.push(Block::Paragraph(paragraph.trim().to_string()));
    }
}

fn push_item(blocks: &mut Vec<Block>, text: &mut String, depth: usize) {
    let item = std::mem::take(text);
    if !item.trim().is_empty() {
        blocks.push(Block::Item { depth: depth.max(1), text: item.trim().to_string() });
    }
}
