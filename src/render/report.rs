//! Assembly of the relevance-mode result.

use crate::model::{
    ExtractedSection, Query, RelevanceReport, ReportMetadata, Section, SubSection,
};

/// Current local time as an ISO-8601 string.
pub fn processing_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Build the report from ranked and enriched sections, in their given order.
pub fn assemble_report(
    input_documents: Vec<String>,
    query: &Query,
    sections: &[Section],
    timestamp: impl Into<String>,
) -> RelevanceReport {
    let extracted_sections: Vec<ExtractedSection> = sections
        .iter()
        .map(|section| ExtractedSection {
            document: section.document.clone(),
            page: section.page,
            section_title: section.title.clone(),
            importance_rank: section.importance_rank,
            keywords: section.keywords.clone(),
            summary: section.summary_text(),
            sub_sections: section
                .summary
                .iter()
                .map(|sentence| SubSection {
                    refined_text: sentence.clone(),
                    document: section.document.clone(),
                    page: section.page,
                })
                .collect(),
        })
        .collect();

    let subsection_analysis = extracted_sections
        .iter()
        .flat_map(|s| s.sub_sections.iter().cloned())
        .collect();

    RelevanceReport {
        metadata: ReportMetadata {
            input_documents,
            persona: query.persona.clone(),
            job_to_be_done: query.job.clone(),
            processing_timestamp: timestamp.into(),
        },
        global_summary: None,
        extracted_sections,
        subsection_analysis,
    }
}

/// One-paragraph digest of the sections that matched a domain keyword.
pub fn global_summary(query: &Query, sections: &[Section]) -> String {
    let parts: Vec<String> = sections
        .iter()
        .filter(|s| s.keyword_hit && !s.summary.is_empty())
        .map(|s| {
            format!(
                "[{}] (keywords: {}): {}",
                s.title,
                s.keywords.join(", "),
                s.summary_text()
            )
        })
        .collect();

    if parts.is_empty() {
        format!(
            "For persona '{}' (goal: {}), no highly relevant sections were found.",
            query.persona, query.job
        )
    } else {
        format!(
            "For persona '{}' (goal: {}), the most relevant sections are: {}",
            query.persona,
            query.job,
            parts.join(" ")
        )
    }
}
