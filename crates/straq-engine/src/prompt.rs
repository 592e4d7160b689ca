//! Grounded prompt assembly

use straq_core::{AnswerStyle, Citation, QueryContext};

/// Prompt size is bounded by the top citations in retrieval order
const MAX_PROMPT_CITATIONS: usize = 5;

const SYSTEM_INSTRUCTION: &str = "You are an expert assistant for Australian strata law and \
management. You help answer questions about strata schemes, by-laws, meeting procedures, and \
compliance requirements.";

fn style_instruction(style: AnswerStyle) -> &'static str {
    match style {
        AnswerStyle::Professional => {
            "Provide a professional response suitable for strata managers and committee members."
        }
        AnswerStyle::Simple => {
            "Provide a simple, easy-to-understand response for lot owners."
        }
        AnswerStyle::Detailed => {
            "Provide a comprehensive response with detailed legal references."
        }
    }
}

/// Build the grounded prompt for one query. Deterministic and pure.
///
/// The `[Document N]` citation convention stated in the instructions is what
/// the reconciler parses back out of the answer, so the numbering here must
/// match the citation block's 1-based order.
pub fn build_prompt(context: &QueryContext, citations: &[Citation]) -> String {
    let citation_block = citations
        .iter()
        .take(MAX_PROMPT_CITATIONS)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "Document {}: {}\nExcerpt: {}\nConfidence: {:.0}%",
                i + 1,
                c.title,
                c.excerpt,
                c.confidence * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{SYSTEM_INSTRUCTION}\n\n\
        IMPORTANT CONTEXT:\n\
        - You are answering questions for Australian strata properties\n\
        - Cite specific documents and clauses when possible\n\
        - Be aware of state-specific legislation (NSW, QLD, VIC, etc.)\n\
        - Use Australian spelling and terminology\n\n\
        QUESTION: {question}\n\n\
        RELEVANT DOCUMENTS:\n\
        {citation_block}\n\n\
        INSTRUCTIONS:\n\
        1. {style}\n\
        2. Base your answer on the provided documents\n\
        3. Include specific citations in [Document N] format\n\
        4. If information is unclear or missing, state this explicitly\n\
        5. Focus on practical, actionable advice\n\
        6. Mention relevant legislation if applicable\n\n\
        RESPONSE:",
        question = context.question,
        style = style_instruction(context.answer_style),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use straq_core::AnswerStyle;

    fn citation(i: usize, confidence: f32) -> Citation {
        Citation {
            document_id: format!("doc-{i}"),
            title: format!("Document Title {i}"),
            excerpt: format!("Excerpt text {i}"),
            page: 1,
            confidence,
            source_uri: None,
        }
    }

    #[test]
    fn prompt_contains_question_and_numbered_citations() {
        let ctx = QueryContext::new("What is the quorum for an AGM?", "T1");
        let citations = vec![citation(1, 0.8), citation(2, 0.6)];

        let prompt = build_prompt(&ctx, &citations);

        assert!(prompt.contains("QUESTION: What is the quorum for an AGM?"));
        assert!(prompt.contains("Document 1: Document Title 1"));
        assert!(prompt.contains("Confidence: 80%"));
        assert!(prompt.contains("Document 2: Document Title 2"));
        assert!(prompt.contains("Confidence: 60%"));
        assert!(prompt.contains("[Document N] format"));
    }

    #[test]
    fn prompt_uses_at_most_five_citations() {
        let ctx = QueryContext::new("q", "T1");
        let citations: Vec<Citation> = (1..=8).map(|i| citation(i, 0.5)).collect();

        let prompt = build_prompt(&ctx, &citations);

        assert!(prompt.contains("Document 5: Document Title 5"));
        assert!(!prompt.contains("Document 6: Document Title 6"));
    }

    #[test]
    fn style_selects_instruction() {
        let ctx = QueryContext::new("q", "T1").with_style(AnswerStyle::Simple);
        let prompt = build_prompt(&ctx, &[citation(1, 0.5)]);
        assert!(prompt.contains("easy-to-understand response for lot owners"));

        let ctx = ctx.with_style(AnswerStyle::Detailed);
        let prompt = build_prompt(&ctx, &[citation(1, 0.5)]);
        assert!(prompt.contains("detailed legal references"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let ctx = QueryContext::new("q", "T1");
        let citations = vec![citation(1, 0.95)];
        assert_eq!(build_prompt(&ctx, &citations), build_prompt(&ctx, &citations));
    }
}
