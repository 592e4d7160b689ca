//! Citation back-referencing
//!
//! The generated answer marks its evidence as `[Document N]`, referencing the
//! 1-based position within the prompt's citation block. Reconciliation maps
//! those markers back to the retrieved citations.

use regex::Regex;
use std::sync::OnceLock;

use straq_core::Citation;

fn marker_pattern() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\[Document (\d+)\]").expect("marker pattern is valid"))
}

/// Return the citations the answer actually referenced.
///
/// Distinct indices only, ordered by first appearance; indices outside
/// `1..=citations.len()` are ignored rather than treated as errors.
pub fn reconcile_citations(answer: &str, citations: &[Citation]) -> Vec<Citation> {
    let mut referenced: Vec<usize> = Vec::new();

    for capture in marker_pattern().captures_iter(answer) {
        let Ok(index) = capture[1].parse::<usize>() else {
            continue;
        };
        if index >= 1 && index <= citations.len() && !referenced.contains(&index) {
            referenced.push(index);
        }
    }

    referenced
        .into_iter()
        .map(|index| citations[index - 1].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citations(n: usize) -> Vec<Citation> {
        (1..=n)
            .map(|i| Citation {
                document_id: format!("doc-{i}"),
                title: format!("Title {i}"),
                excerpt: String::new(),
                page: 1,
                confidence: 0.6,
                source_uri: None,
            })
            .collect()
    }

    #[test]
    fn deduplicates_and_preserves_first_appearance_order() {
        let cited = reconcile_citations(
            "As noted [Document 1], and also [Document 3], see [Document 1] again.",
            &citations(3),
        );

        let ids: Vec<&str> = cited.iter().map(|c| c.document_id.as_str()).collect();
        assert_eq!(ids, vec!["doc-1", "doc-3"]);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let cited = reconcile_citations(
            "See [Document 2] and [Document 7] and [Document 0].",
            &citations(3),
        );

        let ids: Vec<&str> = cited.iter().map(|c| c.document_id.as_str()).collect();
        assert_eq!(ids, vec!["doc-2"]);
    }

    #[test]
    fn answer_without_markers_cites_nothing() {
        assert!(reconcile_citations("No references here.", &citations(3)).is_empty());
        assert!(reconcile_citations("", &citations(3)).is_empty());
    }

    #[test]
    fn malformed_markers_do_not_match() {
        let cited = reconcile_citations(
            "See [Document one] and [Doc 1] and Document 2.",
            &citations(3),
        );
        assert!(cited.is_empty());
    }
}
