//! Hand-crafted position and compatibility feature blocks.
//!
//! These blocks sit next to the categorical multi-hot segments inside each
//! static feature row. Their widths are fixed constants so the rows stay
//! rectangular across a corpus; the member features capture tree position
//! and referrer-candidate locality/agreement.

use crate::document::ParsedDocument;
use std::collections::HashSet;

/// Width of one position block.
pub const POSITION_FEATURES: usize = 7;

/// Width of one referrer-candidate compatibility block.
pub const COMPATIBILITY_FEATURES: usize = 5;

/// Position block for the token at `index`.
///
/// Layout: `[offset within sentence, sentence index, tree depth,
/// left-of-parent flag, left-child count, right-child count,
/// sentence-root flag]`.
///
/// A mention span uses its root token's position block.
#[must_use]
pub fn position_map(doc: &ParsedDocument, index: usize) -> Vec<f32> {
    let sentence = doc.sentence_of(index);
    let token = doc.token(index);
    let left_of_parent = match token.parent {
        Some(parent) if index < parent => 1.0,
        _ => 0.0,
    };
    vec![
        (index - doc.sentence_start(sentence)) as f32,
        sentence as f32,
        doc.depth(index) as f32,
        left_of_parent,
        doc.left_children(index).len() as f32,
        doc.right_children(index).len() as f32,
        if token.parent.is_none() { 1.0 } else { 0.0 },
    ]
}

/// Compatibility block between a referrer and a candidate span root.
///
/// Layout: `[sentence distance, token distance, same-sentence flag,
/// shared-parent flag, shared morph-feature count]`. Distances are signed;
/// an antecedent to the left of its referrer yields positive values.
#[must_use]
pub fn compatibility_map(doc: &ParsedDocument, referrer: usize, candidate_root: usize) -> Vec<f32> {
    let referrer_sentence = doc.sentence_of(referrer);
    let candidate_sentence = doc.sentence_of(candidate_root);

    let referrer_token = doc.token(referrer);
    let candidate_token = doc.token(candidate_root);

    let shared_parent = match (referrer_token.parent, candidate_token.parent) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    let referrer_morphs: HashSet<&str> = referrer_token.morph_features().collect();
    let shared_morphs = candidate_token
        .morph_features()
        .filter(|f| referrer_morphs.contains(f))
        .count();

    vec![
        referrer_sentence as f32 - candidate_sentence as f32,
        referrer as f32 - candidate_root as f32,
        if referrer_sentence == candidate_sentence {
            1.0
        } else {
            0.0
        },
        if shared_parent { 1.0 } else { 0.0 },
        shared_morphs as f32,
    ]
}
