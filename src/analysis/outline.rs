//! Level assignment and outline assembly.
//!
//! Candidates go through title extraction, first-seen deduplication and
//! noise filtering (running headers/footers, boilerplate labels) before
//! their rounded font sizes are mapped to levels and the tree is built.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use super::lexicon::{heading_key, normalize_text, Lexicon};
use super::options::OutlineOptions;
use crate::model::{Heading, HeadingLevel, HeadingNode, LineFeature, Outline};

/// Output of outline building for one document.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuild {
    /// Resolved document title
    pub title: String,
    /// The outline forest
    pub outline: Outline,
    /// Surviving headings, leveled, in (page, position) order
    pub headings: Vec<Heading>,
    /// Line indices of candidates that were consumed or discarded
    pub suppressed: HashSet<usize>,
    /// The consumed title line as an `H1` heading, kept out of the outline
    pub title_heading: Option<Heading>,
}

/// Builds the heading outline from scored candidates.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    lexicon: Arc<Lexicon>,
    options: OutlineOptions,
}

impl OutlineBuilder {
    /// Create a new outline builder.
    pub fn new(lexicon: Arc<Lexicon>, options: OutlineOptions) -> Self {
        Self { lexicon, options }
    }

    /// Run every stage on the candidates of one document.
    ///
    /// `candidates` must be in document order. `metadata_title` is the
    /// parser's title, `file_name` the source file name used as a last
    /// resort.
    pub fn build(
        &self,
        candidates: Vec<LineFeature>,
        metadata_title: Option<&str>,
        file_name: &str,
    ) -> OutlineBuild {
        let mut suppressed = HashSet::new();
        let mut candidates = candidates;

        let mut title_line = if self.options.consume_title_line {
            take_title_line(&mut candidates)
        } else {
            None
        };
        // A lone heading names the document and stays in the outline.
        let mut lone_heading = None;
        if candidates.is_empty() {
            if let Some(line) = title_line.take() {
                candidates.push(line.clone());
                lone_heading = Some(line);
            }
        }
        if let Some(line) = &title_line {
            suppressed.insert(line.index);
        }
        let title = self.resolve_title(
            metadata_title,
            title_line.as_ref().or(lone_heading.as_ref()),
            file_name,
        );
        let title_heading = title_line.as_ref().map(|line| Heading {
            text: line.text.clone(),
            level: HeadingLevel::H1,
            page: line.page,
            y: line.y,
            font_size: line.font_size,
            score: line.score,
            line_index: line.index,
            section_number: self.lexicon.section_number(&line.text),
        });

        let page_counts = page_frequency(&candidates);
        let unique = dedupe_first_seen(candidates, &mut suppressed);
        let kept = self.filter_noise(unique, &page_counts, &mut suppressed);

        let mut headings = assign_levels(&kept, &self.lexicon);
        headings.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
                .then(a.line_index.cmp(&b.line_index))
        });

        let outline = build_tree(&headings, &self.options.placeholder_title);
        log::debug!(
            "Outline '{}': {} headings, {} roots",
            title,
            headings.len(),
            outline.len()
        );

        OutlineBuild {
            title,
            outline,
            headings,
            suppressed,
            title_heading,
        }
    }

    /// Noise-filter stage: drop running headers/footers and boilerplate.
    pub fn filter_noise(
        &self,
        candidates: Vec<LineFeature>,
        page_counts: &HashMap<String, usize>,
        suppressed: &mut HashSet<usize>,
    ) -> Vec<LineFeature> {
        let threshold = self.options.running_header_pages;
        candidates
            .into_iter()
            .filter(|c| {
                let key = heading_key(&c.text);
                let running = page_counts.get(&key).copied().unwrap_or(0) >= threshold;
                let boilerplate = self.lexicon.is_boilerplate(&c.text);
                if running || boilerplate {
                    log::debug!(
                        "Dropping heading '{}' ({})",
                        c.text,
                        if running { "running header" } else { "boilerplate" }
                    );
                    suppressed.insert(c.index);
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    fn resolve_title(
        &self,
        metadata_title: Option<&str>,
        title_line: Option<&LineFeature>,
        file_name: &str,
    ) -> String {
        if let Some(title) = metadata_title.map(normalize_text) {
            if !title.is_empty() {
                return title;
            }
        }
        if let Some(line) = title_line {
            return line.text.clone();
        }
        Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.options.untitled.clone())
    }
}

/// Remove and return the typographic title line.
///
/// The title line is the largest-font scored candidate on the first page,
/// provided every other candidate in the document has a strictly smaller
/// rounded size. Fallback anchors never qualify.
pub fn take_title_line(candidates: &mut Vec<LineFeature>) -> Option<LineFeature> {
    let first_page = candidates.iter().map(|c| c.page).min()?;
    if first_page != 1 {
        return None;
    }
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if c.page != first_page || c.score <= 0.0 {
            continue;
        }
        match best {
            Some(b) if candidates[b].font_size >= c.font_size => {}
            _ => best = Some(i),
        }
    }
    let best = best?;
    let size = candidates[best].rounded_size();
    let tied_or_larger = candidates
        .iter()
        .enumerate()
        .any(|(i, c)| i != best && c.rounded_size() >= size);
    if tied_or_larger {
        return None;
    }
    Some(candidates.remove(best))
}

/// Number of distinct pages each normalized heading text appears on.
pub fn page_frequency(candidates: &[LineFeature]) -> HashMap<String, usize> {
    let mut pages: HashMap<String, BTreeSet<u32>> = HashMap::new();
    for c in candidates {
        pages.entry(heading_key(&c.text)).or_default().insert(c.page);
    }
    pages.into_iter().map(|(k, v)| (k, v.len())).collect()
}

/// Keep the first occurrence of each normalized heading text.
pub fn dedupe_first_seen(
    candidates: Vec<LineFeature>,
    suppressed: &mut HashSet<usize>,
) -> Vec<LineFeature> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            if seen.insert(heading_key(&c.text)) {
                true
            } else {
                suppressed.insert(c.index);
                false
            }
        })
        .collect()
}

/// Map rounded font sizes to levels, largest first.
pub fn assign_levels(candidates: &[LineFeature], lexicon: &Lexicon) -> Vec<Heading> {
    let sizes: BTreeSet<i32> = candidates.iter().map(|c| c.rounded_size()).collect();
    let level_map: HashMap<i32, HeadingLevel> = sizes
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, &size)| (size, HeadingLevel::from_rank(rank)))
        .collect();
    log::debug!("Heading size levels: {:?}", level_map);

    candidates
        .iter()
        .map(|c| Heading {
            text: c.text.clone(),
            level: level_map
                .get(&c.rounded_size())
                .copied()
                .unwrap_or(HeadingLevel::H3),
            page: c.page,
            y: c.y,
            font_size: c.font_size,
            score: c.score,
            line_index: c.index,
            section_number: lexicon.section_number(&c.text),
        })
        .collect()
}

/// Assemble the outline forest from ordered headings.
///
/// Tracks the latest H1 and H2: an H1 starts a new root, an H2 attaches to
/// the current H1 (a placeholder H1 is synthesized when there is none), an
/// H3 attaches to the current H2, else the current H1, else becomes a root.
/// Nodes are never re-parented.
pub fn build_tree(headings: &[Heading], placeholder_title: &str) -> Outline {
    struct Slot {
        node: Option<HeadingNode>,
        parent: Option<usize>,
    }

    let mut slots: Vec<Slot> = Vec::with_capacity(headings.len());
    let mut current_h1: Option<usize> = None;
    let mut current_h2: Option<usize> = None;

    for heading in headings {
        let node = HeadingNode::from_heading(heading);
        match heading.level {
            HeadingLevel::H1 => {
                slots.push(Slot {
                    node: Some(node),
                    parent: None,
                });
                current_h1 = Some(slots.len() - 1);
                current_h2 = None;
            }
            HeadingLevel::H2 => {
                let parent = match current_h1 {
                    Some(idx) => idx,
                    None => {
                        let placeholder =
                            HeadingNode::new(HeadingLevel::H1, placeholder_title, heading.page);
                        slots.push(Slot {
                            node: Some(placeholder),
                            parent: None,
                        });
                        let idx = slots.len() - 1;
                        current_h1 = Some(idx);
                        idx
                    }
                };
                slots.push(Slot {
                    node: Some(node),
                    parent: Some(parent),
                });
                current_h2 = Some(slots.len() - 1);
            }
            HeadingLevel::H3 => {
                slots.push(Slot {
                    node: Some(node),
                    parent: current_h2.or(current_h1),
                });
            }
        }
    }

    // Children always follow their parent, so a reverse sweep finishes each
    // subtree before handing it to its parent.
    let mut roots = Vec::new();
    for i in (0..slots.len()).rev() {
        let Some(mut node) = slots[i].node.take() else {
            continue;
        };
        node.children.reverse();
        match slots[i].parent {
            Some(p) => {
                if let Some(parent) = slots[p].node.as_mut() {
                    parent.children.push(node);
                }
            }
            None => roots.push(node),
        }
    }
    roots.reverse();

    Outline::from(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, size: f32, page: u32, index: usize) -> LineFeature {
        LineFeature {
            text: text.to_string(),
            page,
            font_size: size,
            bold: true,
            underlined: false,
            centered: false,
            all_caps: false,
            colored: false,
            y: 50.0 + index as f32 * 20.0,
            score: 1.0,
            index,
        }
    }

    fn heading(text: &str, level: HeadingLevel, page: u32) -> Heading {
        Heading {
            text: text.to_string(),
            level,
            page,
            y: 0.0,
            font_size: 12.0,
            score: 1.0,
            line_index: 0,
            section_number: None,
        }
    }

    fn builder() -> OutlineBuilder {
        OutlineBuilder::new(Arc::new(Lexicon::new()), OutlineOptions::default())
    }

    #[test]
    fn test_tree_attachment() {
        let headings = vec![
            heading("Part One", HeadingLevel::H1, 1),
            heading("Chapter A", HeadingLevel::H2, 1),
            heading("Detail", HeadingLevel::H3, 2),
            heading("Chapter B", HeadingLevel::H2, 3),
            heading("Part Two", HeadingLevel::H1, 4),
            heading("Direct detail", HeadingLevel::H3, 4),
        ];
        let outline = build_tree(&headings, "Miscellaneous");
        assert_eq!(outline.len(), 2);
        let part_one = &outline.items[0];
        assert_eq!(part_one.children.len(), 2);
        assert_eq!(part_one.children[0].text, "Chapter A");
        assert_eq!(part_one.children[0].children[0].text, "Detail");
        assert_eq!(part_one.children[1].text, "Chapter B");
        // H3 after a new H1 attaches to the H1, not the stale H2
        assert_eq!(outline.items[1].children[0].text, "Direct detail");
        assert_eq!(outline.total_items(), 6);
    }

    #[test]
    fn test_orphan_h2_gets_placeholder() {
        let headings = vec![
            heading("Orphan", HeadingLevel::H2, 2),
            heading("Sibling", HeadingLevel::H2, 2),
        ];
        let outline = build_tree(&headings, "Miscellaneous");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.items[0].text, "Miscellaneous");
        assert_eq!(outline.items[0].level, HeadingLevel::H1);
        assert_eq!(outline.items[0].page, 2);
        assert_eq!(outline.items[0].children.len(), 2);
    }

    #[test]
    fn test_leading_h3_is_root() {
        let headings = vec![
            heading("Loose", HeadingLevel::H3, 1),
            heading("Top", HeadingLevel::H1, 1),
        ];
        let outline = build_tree(&headings, "Miscellaneous");
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.items[0].text, "Loose");
        assert!(outline.items[0].children.is_empty());
    }

    #[test]
    fn test_levels_are_monotonic_in_size() {
        let lexicon = Lexicon::new();
        let candidates = vec![
            candidate("Small", 12.2, 1, 0),
            candidate("Huge", 24.0, 1, 1),
            candidate("Medium", 16.0, 1, 2),
            candidate("Tiny", 11.0, 1, 3),
        ];
        let headings = assign_levels(&candidates, &lexicon);
        let level_of = |t: &str| headings.iter().find(|h| h.text == t).unwrap().level;
        assert_eq!(level_of("Huge"), HeadingLevel::H1);
        assert_eq!(level_of("Medium"), HeadingLevel::H2);
        assert_eq!(level_of("Small"), HeadingLevel::H3);
        assert_eq!(level_of("Tiny"), HeadingLevel::H3);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut suppressed = HashSet::new();
        let candidates = vec![
            candidate("Overview", 16.0, 1, 0),
            candidate("overview ", 18.0, 3, 5),
        ];
        let unique = dedupe_first_seen(candidates, &mut suppressed);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].page, 1);
        assert!(suppressed.contains(&5));
    }

    #[test]
    fn test_running_headers_and_boilerplate_removed() {
        let candidates = vec![
            candidate("ACME Corp Confidential", 14.0, 2, 0),
            candidate("Findings", 16.0, 2, 1),
            candidate("ACME Corp Confidential", 14.0, 3, 2),
            candidate("ACME Corp Confidential", 14.0, 4, 3),
            candidate("Table of Contents", 16.0, 4, 4),
            candidate("Results", 14.0, 4, 5),
        ];
        let build = builder().build(candidates, Some("Report"), "report.pdf");
        let texts: Vec<_> = build.headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Findings", "Results"]);
        assert!(build.suppressed.contains(&0));
        assert!(build.suppressed.contains(&4));
    }

    #[test]
    fn test_title_line_consumed() {
        let candidates = vec![
            candidate("Annual Report 2024", 24.0, 1, 0),
            candidate("1. Introduction", 16.0, 2, 1),
        ];
        let build = builder().build(candidates, None, "annual.pdf");
        assert_eq!(build.title, "Annual Report 2024");
        assert_eq!(build.outline.len(), 1);
        assert_eq!(build.outline.items[0].text, "1. Introduction");
        assert_eq!(build.outline.items[0].level, HeadingLevel::H1);
        assert_eq!(
            build.outline.items[0].section_number.as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_title_line_keeps_its_text_as_relevance_heading() {
        let candidates = vec![
            candidate("Annual Report 2024", 24.0, 1, 0),
            candidate("1. Introduction", 16.0, 2, 1),
        ];
        let build = builder().build(candidates, None, "annual.pdf");
        let title = build.title_heading.expect("title heading");
        assert_eq!(title.text, "Annual Report 2024");
        assert_eq!(title.level, HeadingLevel::H1);
        assert_eq!(title.page, 1);
        assert!(build.suppressed.contains(&0));
    }

    #[test]
    fn test_lone_heading_names_document_and_stays_in_outline() {
        let build = builder().build(vec![candidate("Overview", 18.0, 1, 0)], None, "notes.pdf");
        assert_eq!(build.title, "Overview");
        assert_eq!(build.outline.len(), 1);
        assert_eq!(build.outline.items[0].text, "Overview");
        assert!(build.title_heading.is_none());
        assert!(build.suppressed.is_empty());
    }

    #[test]
    fn test_tied_chapter_is_not_taken_as_title() {
        let candidates = vec![
            candidate("1. Introduction", 16.0, 1, 0),
            candidate("2. Methods", 16.2, 2, 1),
        ];
        let build = builder().build(candidates, Some("Board Report"), "board.pdf");
        assert_eq!(build.title, "Board Report");
        let texts: Vec<_> = build.outline.flatten().iter().map(|n| n.text.clone()).collect();
        assert_eq!(texts, vec!["1. Introduction", "2. Methods"]);
        assert!(build.title_heading.is_none());
    }

    #[test]
    fn test_title_line_not_taken_when_larger_heading_later() {
        let mut candidates = vec![
            candidate("Cover note", 14.0, 1, 0),
            candidate("Big Chapter", 28.0, 2, 1),
        ];
        assert!(take_title_line(&mut candidates).is_none());
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_title_falls_back_to_metadata_then_file_stem() {
        let b = builder();
        let build = b.build(Vec::new(), Some("  Metadata   Title "), "x.pdf");
        assert_eq!(build.title, "Metadata Title");
        let build = b.build(Vec::new(), Some(""), "quarterly-report.pdf");
        assert_eq!(build.title, "quarterly-report");
        let build = b.build(Vec::new(), None, "");
        assert_eq!(build.title, "Untitled Document");
        assert!(build.outline.is_empty());
    }
}
