//! Coreference annotations carried alongside a parsed document.
//!
//! The upstream rules analysis decides *linguistic* questions: which tokens
//! are independent nouns, which are potential anaphors, and which earlier
//! mentions each anaphor could plausibly refer to. Those judgments arrive
//! here as an explicit side-table, index-aligned with the document, rather
//! than as attributes mutated onto parser tokens: the document stays
//! read-only and the annotation lifecycle is visible in the types.
//!
//! Numeric encoding is a separate, later step: once a [`FeatureTable`] has
//! been built over the corpus, [`AnnotatedDocument::encode`] fills the
//! feature/position/compatibility maps that pair construction concatenates.

use crate::document::ParsedDocument;
use crate::error::{Error, Result};
use crate::feature_table::FeatureTable;
use crate::maps;
use serde::{Deserialize, Serialize};

// =============================================================================
// MentionCandidate
// =============================================================================

/// One candidate antecedent proposed for a referring expression.
///
/// The span lists the member token indices in ascending order; the first
/// element is the span root (for a coordination like "Richard and the man"
/// the span is `[richard, man]` with the first conjunct as root).
///
/// The numeric maps are empty until [`AnnotatedDocument::encode`] runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionCandidate {
    /// Ascending token indices forming the candidate span; first is the root.
    pub span: Vec<usize>,
    /// Categorical multi-hot block for the span (feature-table width).
    pub feature_map: Vec<f32>,
    /// Position block for the span root ([`maps::POSITION_FEATURES`] wide).
    pub position_map: Vec<f32>,
    /// Referrer-candidate compatibility block
    /// ([`maps::COMPATIBILITY_FEATURES`] wide).
    pub compatibility_map: Vec<f32>,
    /// The span is subsumed by another gold annotation; training-mode pair
    /// construction excludes such candidates.
    pub covered_in_training: bool,
    /// Hand-labeled as the true antecedent of the owning referrer.
    pub gold_antecedent: bool,
}

impl MentionCandidate {
    /// Create a candidate for a span, with empty maps and training flags off.
    #[must_use]
    pub fn new(span: Vec<usize>) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }

    /// Root token index of the span.
    #[must_use]
    pub fn root(&self) -> Option<usize> {
        self.span.first().copied()
    }
}

// =============================================================================
// TokenAnnotation
// =============================================================================

/// Per-token coreference judgments and encoded maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenAnnotation {
    /// The token heads an independent noun phrase (a possible mention).
    pub independent_noun: bool,
    /// The token is a referring expression needing antecedent resolution.
    pub potential_anaphor: bool,
    /// Candidate antecedents, in the order the upstream analysis proposed
    /// them; only meaningful on potential anaphors.
    pub candidates: Vec<MentionCandidate>,
    /// Categorical multi-hot block for this token (feature-table width).
    pub feature_map: Vec<f32>,
    /// Position block for this token.
    pub position_map: Vec<f32>,
}

impl TokenAnnotation {
    /// Whether the token contributes to the feature vocabulary.
    #[must_use]
    pub fn is_mention(&self) -> bool {
        self.independent_noun || self.potential_anaphor
    }
}

// =============================================================================
// CorefAnnotations
// =============================================================================

/// The side-table: one [`TokenAnnotation`] per document token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorefAnnotations {
    tokens: Vec<TokenAnnotation>,
}

impl CorefAnnotations {
    /// Create an empty annotation table for a document of `len` tokens.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tokens: vec![TokenAnnotation::default(); len],
        }
    }

    /// Number of token records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the table covers zero tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The annotation record for token `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn token(&self, index: usize) -> &TokenAnnotation {
        &self.tokens[index]
    }

    /// Mutable annotation record for token `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn token_mut(&mut self, index: usize) -> &mut TokenAnnotation {
        &mut self.tokens[index]
    }

    /// Flag token `index` as an independent noun.
    pub fn mark_independent_noun(&mut self, index: usize) {
        self.tokens[index].independent_noun = true;
    }

    /// Flag token `index` as a potential anaphor.
    pub fn mark_potential_anaphor(&mut self, index: usize) {
        self.tokens[index].potential_anaphor = true;
    }

    /// Attach a candidate antecedent to the anaphor at `index`.
    pub fn add_candidate(&mut self, index: usize, candidate: MentionCandidate) {
        self.tokens[index].candidates.push(candidate);
    }
}

// =============================================================================
// AnnotatedDocument
// =============================================================================

/// A parsed document paired with its coreference side-table.
///
/// # Invariants
///
/// - The side-table has exactly one record per document token
/// - Candidate spans are non-empty, strictly ascending, in range, and only
///   attached to tokens flagged as potential anaphors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// The parsed document.
    pub doc: ParsedDocument,
    /// The coreference side-table, index-aligned with `doc`.
    pub coref: CorefAnnotations,
}

impl AnnotatedDocument {
    /// Pair a document with its annotations, validating alignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] when the table length disagrees
    /// with the document, or a candidate span is malformed.
    pub fn new(doc: ParsedDocument, coref: CorefAnnotations) -> Result<Self> {
        if doc.len() != coref.len() {
            return Err(Error::invalid_document(format!(
                "annotation table covers {} tokens but the document has {}",
                coref.len(),
                doc.len()
            )));
        }
        for (i, ann) in coref.tokens.iter().enumerate() {
            if !ann.candidates.is_empty() && !ann.potential_anaphor {
                return Err(Error::invalid_document(format!(
                    "token {i} carries candidate antecedents but is not a potential anaphor"
                )));
            }
            for candidate in &ann.candidates {
                if candidate.span.is_empty() {
                    return Err(Error::invalid_document(format!(
                        "token {i} has a candidate with an empty span"
                    )));
                }
                if !candidate.span.windows(2).all(|w| w[0] < w[1]) {
                    return Err(Error::invalid_document(format!(
                        "token {i} has a candidate span that is not strictly ascending"
                    )));
                }
                if let Some(&last) = candidate.span.last() {
                    if last >= doc.len() {
                        return Err(Error::invalid_document(format!(
                            "token {i} has a candidate span reaching token {last}, \
                             outside the document (length {})",
                            doc.len()
                        )));
                    }
                }
            }
        }
        Ok(Self { doc, coref })
    }

    /// Fill the numeric maps on every mention token and candidate.
    ///
    /// For a mention token: its multi-hot block against `table` plus its
    /// position block. For each candidate: the span's multi-hot block, the
    /// span root's position block, and the referrer-candidate compatibility
    /// block. Safe to call again after the table changes; maps are
    /// overwritten wholesale.
    pub fn encode(&mut self, table: &FeatureTable) {
        let doc = &self.doc;
        for (i, ann) in self.coref.tokens.iter_mut().enumerate() {
            if ann.is_mention() {
                ann.feature_map = table.token_features(doc, i);
                ann.position_map = maps::position_map(doc, i);
            }
            for candidate in &mut ann.candidates {
                candidate.feature_map = table.span_features(doc, &candidate.span);
                let root = candidate.span[0];
                candidate.position_map = maps::position_map(doc, root);
                candidate.compatibility_map = maps::compatibility_map(doc, i, root);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Token;

    fn small_doc() -> ParsedDocument {
        // "Ann slept. She woke."
        ParsedDocument::new(vec![
            Token::new("Ann", "NNP")
                .with_ent_type("PERSON")
                .with_dep("nsubj", 1),
            Token::new("slept", "VBD"),
            Token::new(".", ".").with_dep("punct", 1),
            Token::new("She", "PRP")
                .with_morph("Case=Nom|Gender=Fem")
                .with_dep("nsubj", 4),
            Token::new("woke", "VBD"),
            Token::new(".", ".").with_dep("punct", 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_alignment_validation() {
        let doc = small_doc();
        let result = AnnotatedDocument::new(doc, CorefAnnotations::new(2));
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_candidates_require_anaphor_flag() {
        let doc = small_doc();
        let mut coref = CorefAnnotations::new(doc.len());
        coref.add_candidate(3, MentionCandidate::new(vec![0]));
        let result = AnnotatedDocument::new(doc, coref);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_span_bounds_validation() {
        let doc = small_doc();
        let mut coref = CorefAnnotations::new(doc.len());
        coref.mark_potential_anaphor(3);
        coref.add_candidate(3, MentionCandidate::new(vec![0, 9]));
        let result = AnnotatedDocument::new(doc, coref);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_span_must_ascend() {
        let doc = small_doc();
        let mut coref = CorefAnnotations::new(doc.len());
        coref.mark_potential_anaphor(3);
        coref.add_candidate(3, MentionCandidate::new(vec![2, 0]));
        let result = AnnotatedDocument::new(doc, coref);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_encode_fills_maps() {
        let doc = small_doc();
        let mut coref = CorefAnnotations::new(doc.len());
        coref.mark_independent_noun(0);
        coref.mark_potential_anaphor(3);
        coref.add_candidate(3, MentionCandidate::new(vec![0]));
        let mut annotated = AnnotatedDocument::new(doc, coref).unwrap();

        let table = FeatureTable::build(std::slice::from_ref(&annotated)).unwrap();
        annotated.encode(&table);

        let referrer = annotated.coref.token(3);
        assert_eq!(referrer.feature_map.len(), table.len());
        assert_eq!(referrer.position_map.len(), maps::POSITION_FEATURES);

        let candidate = &referrer.candidates[0];
        assert_eq!(candidate.feature_map.len(), table.len());
        assert_eq!(candidate.position_map.len(), maps::POSITION_FEATURES);
        assert_eq!(
            candidate.compatibility_map.len(),
            maps::COMPATIBILITY_FEATURES
        );

        // Unannotated tokens stay untouched.
        assert!(annotated.coref.token(1).feature_map.is_empty());
    }
}
