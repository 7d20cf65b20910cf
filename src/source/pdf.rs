//! PDF source: decodes page content streams into styled spans with lopdf.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::SpanSource;
use crate::analysis::lexicon::is_spaceless_script_char;
use crate::detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
use crate::error::{Error, Result};
use crate::model::{BBox, Span, SpanDocument, SpanLine, SpanPage, DEFAULT_INK};

/// Default page size (US Letter) when no MediaBox is found.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

/// Reads PDF files with lopdf.
///
/// Underline is drawn as separate path geometry in PDF and is not recovered;
/// spans from this source are never underlined.
#[derive(Debug, Default)]
pub struct PdfSource;

impl PdfSource {
    /// Create a new PDF source.
    pub fn new() -> Self {
        Self
    }
}

impl SpanSource for PdfSource {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn load(&self, path: &Path) -> Result<SpanDocument> {
        match detect_format_from_path(path)? {
            SourceFormat::Pdf { .. } => {}
            _ => return Err(Error::UnknownFormat),
        }
        let doc = LopdfDocument::load(path)?;
        extract_document(&doc)
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<SpanDocument> {
        match detect_format_from_bytes(bytes)? {
            SourceFormat::Pdf { .. } => {}
            _ => return Err(Error::UnknownFormat),
        }
        let doc = LopdfDocument::load_mem(bytes)?;
        extract_document(&doc)
    }
}

fn extract_document(doc: &LopdfDocument) -> Result<SpanDocument> {
    let mut out = SpanDocument::new();
    out.title = info_title(doc);

    for (&number, &page_id) in doc.get_pages().iter() {
        let (width, height) = page_dimensions(doc, page_id);
        let mut page = SpanPage::new(number, width, height);
        match extract_page_spans(doc, page_id) {
            Ok(spans) => page.lines = group_into_lines(spans, number, height),
            Err(e) => log::warn!("Failed to extract text from page {}: {}", number, e),
        }
        out.pages.push(page);
    }

    log::debug!(
        "Loaded {} pages, {} lines",
        out.page_count(),
        out.line_count()
    );
    Ok(out)
}

/// Title from the document information dictionary.
fn info_title(doc: &LopdfDocument) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let dict = match info {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    get_string_from_dict(dict, b"Title")
        .map(|t| t.trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string())
        .filter(|t| !t.is_empty())
}

/// Page size from the MediaBox, looked up through inherited attributes.
fn page_dimensions(doc: &LopdfDocument, page_id: ObjectId) -> (f32, f32) {
    let mut current = doc.get_dictionary(page_id).ok();
    let mut depth = 0;

    while let Some(dict) = current {
        if let Ok(array) = dict.get(b"MediaBox").and_then(Object::as_array) {
            if array.len() >= 4 {
                let coords: Vec<f32> = array.iter().take(4).filter_map(get_number).collect();
                if coords.len() == 4 {
                    return ((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs());
                }
            }
        }
        depth += 1;
        if depth > 32 {
            break;
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .ok()
            .and_then(|id| doc.get_dictionary(id).ok());
    }

    DEFAULT_PAGE_SIZE
}

/// Decompressed content stream of a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // A page without content is blank, not broken.
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Stream(s)) => s
                .decompressed_content()
                .map_err(|e| Error::PdfParse(e.to_string())),
            Ok(Object::Array(arr)) => Ok(concat_streams(doc, arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        },
        Object::Array(arr) => Ok(concat_streams(doc, arr)),
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

fn concat_streams(doc: &LopdfDocument, refs: &[Object]) -> Vec<u8> {
    let mut content = Vec::new();
    for obj in refs {
        if let Object::Reference(r) = obj {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                if let Ok(data) = s.decompressed_content() {
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
        }
    }
    content
}

/// A shown string before line grouping, in PDF user space (y up).
#[derive(Debug, Clone)]
struct RawSpan {
    text: String,
    x: f32,
    baseline: f32,
    width: f32,
    font_size: f32,
    bold: bool,
    color: u32,
}

fn extract_page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<RawSpan>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;
    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let content =
        lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut reader = ContentReader::new(doc, &fonts);
    for op in &content.operations {
        reader.apply(&op.operator, &op.operands);
    }
    Ok(reader.spans)
}

/// Interprets text, font and fill-color operators of one content stream.
struct ContentReader<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
    in_text: bool,
    fill: u32,
    fill_stack: Vec<u32>,
    spans: Vec<RawSpan>,
}

impl<'a> ContentReader<'a> {
    fn new(doc: &'a LopdfDocument, fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        Self {
            doc,
            fonts,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
            matrix: TextMatrix::default(),
            in_text: false,
            fill: DEFAULT_INK,
            fill_stack: Vec::new(),
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.fill_stack.push(self.fill),
            "Q" => {
                if let Some(fill) = self.fill_stack.pop() {
                    self.fill = fill;
                }
            }
            "g" | "rg" | "k" | "sc" | "scn" => {
                let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if let Some(color) = fill_color(&values) {
                    self.fill = color;
                }
            }
            "BT" => {
                self.in_text = true;
                self.matrix = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(key) = &operands[0] {
                        self.font_key = key.clone();
                        self.font_name = self
                            .fonts
                            .get(key)
                            .and_then(|f| f.get(b"BaseFont").ok())
                            .and_then(|o| o.as_name().ok())
                            .map(|n| String::from_utf8_lossy(n).to_string())
                            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                    }
                    self.font_size = get_number(&operands[1]).unwrap_or(12.0).abs();
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if operator == "TD" {
                        self.leading = -ty;
                    }
                    self.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let n: Vec<f32> = operands[..6]
                        .iter()
                        .map(|o| get_number(o).unwrap_or(0.0))
                        .collect();
                    self.matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            "'" | "\"" => {
                self.next_line();
                let idx = if operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(idx) {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.matrix.translate(0.0, -leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(&self.font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    /// TJ: strings interleaved with positioning adjustments in 1/1000 em.
    fn show_array(&mut self, items: &[Object]) {
        // Large negative adjustments are word spaces.
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        let mut adjust = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(bytes)),
                other => {
                    if let Some(n) = get_number(other) {
                        adjust += n;
                        if -n > SPACE_THRESHOLD
                            && !combined.is_empty()
                            && !combined.ends_with(char::is_whitespace)
                            && !combined.chars().last().map(is_spaceless_script_char).unwrap_or(false)
                        {
                            combined.push(' ');
                        }
                    }
                }
            }
        }
        self.show(combined, -adjust / 1000.0 * self.font_size);
    }

    /// Record a shown string and advance the text position past it.
    fn show(&mut self, text: String, extra_advance: f32) {
        if !self.in_text {
            return;
        }
        let advance = text.chars().count() as f32 * self.font_size * GLYPH_WIDTH + extra_advance;
        if !text.trim().is_empty() {
            let (x, baseline) = self.matrix.position();
            let font_size = self.font_size * self.matrix.scale();
            self.spans.push(RawSpan {
                width: text.trim_end().chars().count() as f32 * font_size * GLYPH_WIDTH,
                text,
                x,
                baseline,
                font_size,
                bold: is_bold_font(&self.font_name),
                color: self.fill,
            });
        }
        self.matrix.advance(advance);
    }
}

/// Group spans sharing a baseline into lines, top to bottom.
///
/// Spans within 30% of their font size of a line's first baseline join that
/// line. Output coordinates are flipped to top-down.
fn group_into_lines(mut spans: Vec<RawSpan>, page: u32, page_height: f32) -> Vec<SpanLine> {
    // PDF y grows upwards: sort descending for top-to-bottom, then by x.
    spans.sort_by(|a, b| {
        b.baseline
            .partial_cmp(&a.baseline)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut groups: Vec<Vec<RawSpan>> = Vec::new();
    let mut current_y: Option<f32> = None;
    for span in spans {
        let tolerance = span.font_size * 0.3;
        match (current_y, groups.last_mut()) {
            (Some(y), Some(group)) if (span.baseline - y).abs() <= tolerance => group.push(span),
            _ => {
                current_y = Some(span.baseline);
                groups.push(vec![span]);
            }
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            let spans = group
                .into_iter()
                .map(|raw| {
                    let top = page_height - (raw.baseline + raw.font_size * 0.8);
                    let bottom = page_height - (raw.baseline - raw.font_size * 0.2);
                    let mut span = Span::new(
                        raw.text,
                        raw.font_size,
                        BBox::new(raw.x, top, raw.x + raw.width, bottom),
                    )
                    .with_color(raw.color)
                    .on_page(page);
                    span.bold = raw.bold;
                    span
                })
                .collect();
            SpanLine::new(spans)
        })
        .collect()
}

/// Fill color operands (gray, RGB or CMYK) packed as `0xRRGGBB`.
fn fill_color(values: &[f32]) -> Option<u32> {
    match values {
        [gray] => Some(pack_rgb(*gray, *gray, *gray)),
        [r, g, b] => Some(pack_rgb(*r, *g, *b)),
        [c, m, y, k] => Some(pack_rgb(
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        )),
        _ => None,
    }
}

fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

fn is_bold_font(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    /// Advance along the baseline by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(utf16) = decode_utf16be(bytes) {
        return utf16;
    }
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }
    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// UTF-16BE with a byte order mark, as used for PDF text strings.
fn decode_utf16be(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 2 || bytes[0] != 0xFE || bytes[1] != 0xFF {
        return None;
    }
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            decode_utf16be(bytes).or_else(|| Some(decode_text_simple(bytes)))
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    fn raw(text: &str, x: f32, baseline: f32, size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            baseline,
            width: text.len() as f32 * size * GLYPH_WIDTH,
            font_size: size,
            bold: false,
            color: DEFAULT_INK,
        }
    }

    #[test]
    fn test_group_into_lines() {
        let spans = vec![
            raw("world", 130.0, 700.5, 12.0),
            raw("Second", 72.0, 680.0, 12.0),
            raw("Hello", 72.0, 700.0, 12.0),
        ];
        let lines = group_into_lines(spans, 1, 792.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "Hello");
        assert_eq!(lines[0].spans[1].text, "world");
        assert_eq!(lines[1].spans[0].text, "Second");
        // Top-down coordinates
        assert!(lines[0].spans[0].bbox.y0 < lines[1].spans[0].bbox.y0);
        assert_eq!(lines[0].spans[0].page, 1);
    }

    #[test]
    fn test_fill_color() {
        assert_eq!(fill_color(&[0.0]), Some(0x000000));
        assert_eq!(fill_color(&[1.0, 0.0, 0.0]), Some(0xFF0000));
        assert_eq!(fill_color(&[0.0, 1.0, 1.0, 0.0]), Some(0xFF0000));
        assert_eq!(fill_color(&[0.5, 0.5]), None);
    }

    #[test]
    fn test_text_matrix_lines() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 72.0, 700.0);
        m.advance(50.0);
        assert_eq!(m.position(), (122.0, 700.0));
        m.translate(0.0, -14.0);
        assert_eq!(m.position(), (72.0, 686.0));
    }

    #[test]
    fn test_bold_font_names() {
        assert!(is_bold_font("ABCDEF+Helvetica-Bold"));
        assert!(is_bold_font("Arial-BlackItalic"));
        assert!(!is_bold_font("Times-Roman"));
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"\xFE\xFF\x00H\x00i"), "Hi");
        assert_eq!(decode_text_simple(b"plain"), "plain");
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }

    fn build_pdf() -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => bold_id, "F2" => regular_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![200.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Annual Report")]),
                Operation::new("ET", vec![]),
                Operation::new("q", vec![]),
                Operation::new("rg", vec![1.into(), 0.into(), 0.into()]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F2".into(), 11.into()]),
                Operation::new("Td", vec![72.into(), 650.into()]),
                Operation::new("Tj", vec![Object::string_literal("Red body text")]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Metadata Title"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_load_pdf_bytes() {
        let doc = PdfSource::new().load_bytes(&build_pdf()).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Metadata Title"));
        assert_eq!(doc.page_count(), 1);

        let page = &doc.pages[0];
        assert_eq!((page.width, page.height), (595.0, 842.0));
        assert_eq!(page.lines.len(), 2);

        let heading = &page.lines[0].spans[0];
        assert!(heading.text.contains("Annual"));
        assert!(heading.bold);
        assert_eq!(heading.font_size, 24.0);
        assert_eq!(heading.color, DEFAULT_INK);

        let body = &page.lines[1].spans[0];
        assert!(!body.bold);
        assert_eq!(body.color, 0xFF0000);
        assert!(!body.underline);
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfSource::new().load_bytes(b"{\"pages\": []}").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}
