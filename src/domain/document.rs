//! Generated documents: bullet normalization, table checks and export naming.

use serde::Serialize;

use super::error::ExportError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const GENERATED_BULLET: char = '•';
const MARKDOWN_BULLET: &str = "  * ";
const PLAIN_SUFFIX: &str = "-plain";

/// Rewrite the bullet glyph some models emit into a Markdown list marker.
pub fn normalize_bullets(text: &str) -> String {
    text.replace(GENERATED_BULLET, MARKDOWN_BULLET)
}

/// How a document was laid out when exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportLayout {
    /// Headings, lists and tables laid out from the Markdown structure.
    Structured,
    /// Raw text, line by line.
    Plain,
}

impl ExportLayout {
    pub fn file_name(&self, base_name: &str) -> String {
        match self {
            ExportLayout::Structured => format!("{}.pdf", base_name),
            ExportLayout::Plain => format!("{}{}.pdf", base_name, PLAIN_SUFFIX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub layout: ExportLayout,
    pub bytes: Vec<u8>,
}

/// Reject tables the structured layout cannot place.
///
/// A line beginning with `|` opens a table and must be followed by a
/// delimiter row. A line with inner pipes only (`A | B`) opens a table when
/// the next line is a delimiter row, and is prose otherwise. Every body row
/// must have as many cells as the header; the first line without a pipe ends
/// the table. Lines inside fenced code blocks are ignored.
pub fn check_tables(markdown: &str) -> Result<(), ExportError> {
    let lines: Vec<&str> = markdown.lines().map(str::trim).collect();
    let mut in_fence = false;
    let mut columns: Option<usize> = None;
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let line_no = index + 1;
        index += 1;

        if line.starts_with("```") || line.starts_with("~~~") {
            in_fence = !in_fence;
            columns = None;
            continue;
        }
        if in_fence {
            continue;
        }
        if !is_table_row(line) {
            columns = None;
            continue;
        }

        let cells = split_cells(line);
        if let Some(expected) = columns {
            if cells.len() != expected {
                return Err(ExportError::MalformedTable {
                    line: line_no,
                    reason: format!("row has {} cells, header has {}", cells.len(), expected),
                });
            }
            continue;
        }

        let delimiter = lines
            .get(index)
            .filter(|next| is_table_row(next))
            .map(|next| split_cells(next))
            .filter(|next| is_delimiter_row(next));
        match delimiter {
            Some(delimiter) => {
                if delimiter.len() != cells.len() {
                    return Err(ExportError::MalformedTable {
                        line: line_no + 1,
                        reason: format!(
                            "delimiter row has {} cells, header has {}",
                            delimiter.len(),
                            cells.len()
                        ),
                    });
                }
                columns = Some(cells.len());
                index += 1;
            }
            None if line.starts_with('|') => return Err(missing_delimiter(line_no)),
            None => {}
        }
    }
    Ok(())
}

/// A line that can belong to a table: a leading pipe or an unescaped inner one.
fn is_table_row(line: &str) -> bool {
    line.starts_with('|') || split_cells(line).len() > 1
}

fn missing_delimiter(line: usize) -> ExportError {
    ExportError::MalformedTable { line, reason: "header row has no delimiter row".to_string() }
}

/// Split a table row into cells, honoring `\|` escapes.
fn split_cells(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in inner.chars() {
        match ch {
            '|' if !escaped => cells.push(std::mem::take(&mut current).trim().to_string()),
            '\\' if !escaped => {
                escaped = true;
                current.push(ch);
                continue;
            }
            _ => current.push(ch),
        }
        escaped = false;
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_delimiter_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| {
        let body = cell.trim_start_matches(':').trim_end_matches(':');
        !body.is_empty() && body.chars().all(|ch| ch == '-')
    })
}
