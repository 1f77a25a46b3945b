#[cfg(test)]
mod tests;

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::corpus::FaqRecord;

/// Extract question/answer pairs from a FAQ page.
///
/// Every `h2`/`h3` whose text ends with `?` and has at least
/// `min_question_words` words becomes a record. Its answer is the text of the
/// next sibling element, or empty when the heading is the last child.
#[inline]
pub fn extract_faqs(
    html: &str,
    page_url: &Url,
    min_question_words: usize,
) -> Result<Vec<FaqRecord>> {
    let document = Html::parse_document(html);
    let heading_selector = Selector::parse("h2, h3")
        .map_err(|e| anyhow!("Failed to create CSS selector: {:?}", e))?;

    let records: Vec<FaqRecord> = document
        .select(&heading_selector)
        .filter_map(|heading| {
            let question = element_text(heading);
            if !is_question(&question, min_question_words) {
                return None;
            }

            let answer = heading
                .next_siblings()
                .find_map(ElementRef::wrap)
                .map(element_text)
                .unwrap_or_default();

            Some(FaqRecord::new(question, answer, page_url.as_str()))
        })
        .collect();

    debug!("Extracted {} FAQs from {}", records.len(), page_url);
    Ok(records)
}

/// Whether a heading's text reads as a question
#[inline]
pub fn is_question(text: &str, min_words: usize) -> bool {
    text.ends_with('?') && text.split_whitespace().count() >= min_words
}

/// Text content of an element with runs of whitespace collapsed to one space
#[inline]
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
