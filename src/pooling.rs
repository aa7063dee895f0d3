//! Span vector aggregation over document-pair batches.
//!
//! Downstream scoring consumes four dense inputs per batch: a vector per
//! referrer, per referrer head, per antecedent span, and per antecedent
//! head. Spans pool by elementwise mean over their member tokens' word
//! vectors; head lookups take the parent token's vector. Whenever the
//! requested vector does not exist (a span root with no parent, an empty
//! span) the fallback is an all-zero vector of the owning document's
//! embedding width, so batch rows always stay rectangular per document.
//!
//! All functions walk the batch in order and emit rows grouped by document,
//! matching the row order of the index structures in
//! [`DocumentPairInfo`](crate::DocumentPairInfo).

use crate::document::ParsedDocument;
use crate::pairs::DocumentPairInfo;

/// Elementwise mean of the span tokens' vectors.
///
/// An empty span yields an all-zero vector of the document's embedding
/// width.
#[must_use]
pub fn mean_pool(doc: &ParsedDocument, span: &[usize]) -> Vec<f32> {
    let width = doc.embedding_width();
    let mut pooled = vec![0.0; width];
    if span.is_empty() {
        return pooled;
    }
    for &index in span {
        for (slot, value) in pooled.iter_mut().zip(&doc.token(index).vector) {
            *slot += value;
        }
    }
    for slot in &mut pooled {
        *slot /= span.len() as f32;
    }
    pooled
}

/// The parent token's vector, or all zeros when `index` has no parent.
#[must_use]
pub fn head_vector(doc: &ParsedDocument, index: usize) -> Vec<f32> {
    match doc.token(index).parent {
        Some(parent) => doc.token(parent).vector.clone(),
        None => vec![0.0; doc.embedding_width()],
    }
}

/// One mean-pooled vector per referrer, across the batch.
///
/// A referrer is a single token, so its pooled vector is its own embedding.
#[must_use]
pub fn referrer_vectors(batch: &[DocumentPairInfo]) -> Vec<Vec<f32>> {
    batch
        .iter()
        .flat_map(|info| {
            info.referrers()
                .iter()
                .map(move |&referrer| mean_pool(info.doc(), &[referrer]))
        })
        .collect()
}

/// One head vector per referrer, across the batch.
///
/// The head of a referrer is its syntactic parent; sentence-root referrers
/// yield all zeros.
#[must_use]
pub fn referrer_head_vectors(batch: &[DocumentPairInfo]) -> Vec<Vec<f32>> {
    batch
        .iter()
        .flat_map(|info| {
            info.referrers()
                .iter()
                .map(move |&referrer| head_vector(info.doc(), referrer))
        })
        .collect()
}

/// One mean-pooled vector per unique antecedent span, across the batch.
#[must_use]
pub fn antecedent_vectors(batch: &[DocumentPairInfo]) -> Vec<Vec<f32>> {
    batch
        .iter()
        .flat_map(|info| {
            info.antecedents()
                .rows()
                .map(|span| mean_pool(info.doc(), span))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// One head vector per unique antecedent span, across the batch.
///
/// The head of a span is its root token's syntactic parent; spans rooted at
/// a sentence root yield all zeros.
#[must_use]
pub fn antecedent_head_vectors(batch: &[DocumentPairInfo]) -> Vec<Vec<f32>> {
    batch
        .iter()
        .flat_map(|info| {
            info.antecedents()
                .rows()
                .map(|span| match span.first() {
                    Some(&root) => head_vector(info.doc(), root),
                    None => vec![0.0; info.doc().embedding_width()],
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
