//! Section extraction: each heading plus the body text that follows it.

use std::collections::HashSet;

use super::options::SectionOptions;
use crate::model::{Heading, LineFeature, Section};

/// Build sections for one document.
///
/// A section's body is the run of lines after its heading, up to the next
/// heading or `window_lines` lines, skipping suppressed candidate lines
/// (running headers, duplicates, the title). The body is truncated to
/// `max_chars` characters.
pub fn extract_sections(
    document: &str,
    lines: &[LineFeature],
    headings: &[Heading],
    suppressed: &HashSet<usize>,
    options: &SectionOptions,
) -> Vec<Section> {
    let heading_lines: HashSet<usize> = headings.iter().map(|h| h.line_index).collect();

    headings
        .iter()
        .map(|heading| {
            let start = lines
                .iter()
                .position(|l| l.index == heading.line_index)
                .map(|p| p + 1)
                .unwrap_or(lines.len());

            let body_lines: Vec<&str> = lines[start..]
                .iter()
                .take_while(|l| !heading_lines.contains(&l.index))
                .filter(|l| !suppressed.contains(&l.index))
                .take(options.window_lines)
                .map(|l| l.text.as_str())
                .collect();

            let body = truncate_chars(&body_lines.join(" "), options.max_chars);
            Section::new(document, &heading.text, heading.level, heading.page, body)
        })
        .collect()
}

/// Truncate to at most `max` characters on a character boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
