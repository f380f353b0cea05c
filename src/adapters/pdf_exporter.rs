//! PDF export using printpdf's built-in fonts.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::domain::ExportError;
use crate::domain::document::check_tables;
use crate::ports::DocumentExporter;

use super::markdown::{Block, blocks};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LIST_INDENT_MM: f32 = 6.0;
const PT_TO_MM: f32 = 0.3528;
const LAYER_NAME: &str = "Layer 1";

/// A4 pages, 20 mm margins, Helvetica for prose and Courier for code.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    title: String,
}

impl PdfExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new("Guidia")
    }
}

impl DocumentExporter for PdfExporter {
    fn export_structured(&self, markdown: &str) -> Result<Vec<u8>, ExportError> {
        check_tables(markdown)?;
        let blocks = blocks(markdown);
        if blocks.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut writer = PageWriter::new(&self.title)?;
        for block in &blocks {
            match block {
                Block::Heading { level, text } => {
                    writer.gap(3.0);
                    writer.wrapped(text, heading_size(*level), Face::Bold, 0.0);
                    writer.gap(1.5);
                }
                Block::Paragraph(text) => {
                    writer.wrapped(text, BODY_SIZE, Face::Regular, 0.0);
                    writer.gap(2.0);
                }
                Block::Item { depth, text } => {
                    let indent = LIST_INDENT_MM * (*depth as f32 - 1.0);
                    writer.wrapped(&format!("- {}", text), BODY_SIZE, Face::Regular, indent);
                }
                Block::Row { cells, header } => {
                    let face = if *header { Face::Bold } else { Face::Regular };
                    writer.wrapped(&cells.join("  |  "), TABLE_SIZE, face, 0.0);
                    if *header {
                        writer.rule();
                    }
                }
                Block::Code(code) => {
                    for line in code.lines() {
                        writer.wrapped(line, TABLE_SIZE, Face::Mono, LIST_INDENT_MM);
                    }
                    writer.gap(2.0);
                }
                Block::Rule => writer.rule(),
            }
        }
        writer.finish()
    }

    fn export_plain(&self, text: &str) -> Result<Vec<u8>, ExportError> {
        if text.trim().is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut writer = PageWriter::new(&self.title)?;
        for line in text.lines() {
            if line.trim().is_empty() {
                writer.gap(line_height(PLAIN_SIZE));
            } else {
                writer.wrapped(line, PLAIN_SIZE, Face::Mono, 0.0);
            }
        }
        writer.finish()
    }
}

const BODY_SIZE: f32 = 11.0;
const TABLE_SIZE: f32 = 9.5;
const PLAIN_SIZE: f32 = 10.0;

fn heading_size(level: usize) -> f32 {
    match level {
        1 => 18.0,
        2 => 15.0,
        3 => 13.0,
        _ => 12.0,
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.4
}

#[derive(Debug, Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Mono,
}

impl Face {
    /// Average glyph width as a fraction of the font size.
    fn width_factor(&self) -> f32 {
        match self {
            Face::Regular => 0.5,
            Face::Bold => 0.55,
            Face::Mono => 0.6,
        }
    }
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(font_error)?;
        let mono = doc.add_builtin_font(BuiltinFont::Courier).map_err(font_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self { doc, layer, regular, bold, mono, y: PAGE_HEIGHT_MM - MARGIN_MM })
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Mono => &self.mono,
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN_MM {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        if self.y - height < MARGIN_MM {
            self.new_page();
        } else {
            self.y -= height;
        }
    }

    fn rule(&mut self) {
        let size = TABLE_SIZE;
        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let dashes = (width / (size * PT_TO_MM * Face::Mono.width_factor())) as usize;
        self.line(&"-".repeat(dashes), size, Face::Mono, 0.0);
    }

    fn wrapped(&mut self, text: &str, size: f32, face: Face, indent: f32) {
        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - indent;
        let max_chars = (width / (size * PT_TO_MM * face.width_factor())).max(1.0) as usize;
        for line in text.split('\n').flat_map(|part| wrap(part, max_chars)) {
            self.line(&line, size, face, indent);
        }
    }

    fn line(&mut self, text: &str, size: f32, face: Face, indent: f32) {
        let height = line_height(size);
        self.ensure_room(height);
        self.y -= height;
        let font = self.font(face).clone();
        self.layer.use_text(printable(text), size, Mm(MARGIN_MM + indent), Mm(self.y), &font);
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::ExportFailure(format!("Failed to write PDF: {:?}", e)))
    }
}

fn font_error(e: printpdf::Error) -> ExportError {
    ExportError::ExportFailure(format!("Failed to load font: {:?}", e))
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Built-in PDF fonts only carry ASCII reliably; fold accents and replace the rest.
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ç' => 'c',
            'Ç' => 'C',
            '¿' | '¡' => ' ',
            '•' | '–' | '—' => '-',
            '“' | '”' => '"',
            '‘' | '’' => '\'',
            '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}
