//! Citation extraction and confidence normalization
//!
//! Both backends funnel through the same two-stage mapping, raw signal to
//! bucket to scalar, so downstream consumers see directly comparable
//! confidence values regardless of which index served the query.

use tracing::warn;

use straq_core::{
    ATTR_PAGE_NUMBER, ATTR_SOURCE_URI, ATTR_TENANT_ID, Citation, ConfidenceBucket, QueryContext,
    RelevanceSignal, SearchHit,
};

/// Scalar confidence for a signal the backend could not classify
const UNKNOWN_CONFIDENCE: f32 = 0.5;

fn bucket_confidence(bucket: ConfidenceBucket) -> f32 {
    match bucket {
        ConfidenceBucket::Low => 0.3,
        ConfidenceBucket::Medium => 0.6,
        ConfidenceBucket::High => 0.8,
        ConfidenceBucket::VeryHigh => 0.95,
    }
}

/// Threshold ladder mapping an unbounded numeric score onto the bucket scale
fn bucket_for_score(score: f32) -> ConfidenceBucket {
    if score > 10.0 {
        ConfidenceBucket::VeryHigh
    } else if score > 5.0 {
        ConfidenceBucket::High
    } else if score > 2.0 {
        ConfidenceBucket::Medium
    } else {
        ConfidenceBucket::Low
    }
}

/// Normalize a backend relevance signal into a confidence in [0, 1]
pub fn confidence_for(signal: &RelevanceSignal) -> f32 {
    match signal {
        RelevanceSignal::Bucket(bucket) => bucket_confidence(*bucket),
        RelevanceSignal::Score(score) => bucket_confidence(bucket_for_score(*score)),
        RelevanceSignal::Unknown => UNKNOWN_CONFIDENCE,
    }
}

/// Convert backend hits into canonical citations, in retrieval rank order.
///
/// Never fails: malformed hits are skipped and logged. Hits whose `tenant_id`
/// attribute names a foreign tenant are dropped here even though the backend
/// query was already filtered; the isolation invariant does not rely on the
/// backend alone.
pub fn extract_citations(context: &QueryContext, hits: &[SearchHit]) -> Vec<Citation> {
    hits.iter()
        .filter_map(|hit| {
            if hit.document_id.is_empty() {
                warn!("skipping hit without a document id");
                return None;
            }

            if !context.all_tenants() {
                if let Some(owner) = hit.attribute(ATTR_TENANT_ID) {
                    if owner != context.tenant_id {
                        warn!(
                            document_id = %hit.document_id,
                            "dropping hit owned by another tenant"
                        );
                        return None;
                    }
                }
            }

            let page = hit
                .attribute(ATTR_PAGE_NUMBER)
                .and_then(|p| p.parse().ok())
                .unwrap_or(1);

            Some(Citation {
                document_id: hit.document_id.clone(),
                title: hit.title.clone(),
                excerpt: hit.excerpt.clone(),
                page,
                confidence: confidence_for(&hit.relevance),
                source_uri: hit.attribute(ATTR_SOURCE_URI).map(str::to_string),
            })
        })
        .collect()
}
