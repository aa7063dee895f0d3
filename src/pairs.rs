//! Referrer/antecedent pair indexing for one document.
//!
//! [`DocumentPairInfo`] is the bridge between linguistic annotations and
//! numeric scoring: it lists the document's referring expressions, the
//! unique antecedent spans they could point to, the per-referrer candidate
//! groups, and one fixed-width static feature row per (referrer, candidate)
//! pair. Downstream code regroups the flattened pair-level rows back into
//! per-referrer groups through the pointer array, so every container here
//! keeps a deterministic, documented order.
//!
//! Construction is a pure transform of one document; batches of documents
//! can be built independently (and, from the caller's side, in parallel)
//! because nothing is shared beyond the read-only feature table.

use crate::annotations::AnnotatedDocument;
use crate::document::ParsedDocument;
use crate::error::{Error, Result};
use crate::feature_table::FeatureTable;
use crate::maps::{COMPATIBILITY_FEATURES, POSITION_FEATURES};
use crate::ragged::Ragged;
use std::collections::HashMap;

/// Pair-level index structures and static features for one document.
///
/// # Invariants
///
/// - `referrers` is strictly increasing with no duplicates
/// - `static_features.len() == pair_referrers.len() == candidates.flat_len()`
/// - `training_labels` is empty (inference) or one label per pair (training)
/// - every value in `candidates` indexes a row of `antecedents`; every value
///   in `pair_referrers` indexes `referrers`
#[derive(Debug, Clone)]
pub struct DocumentPairInfo<'a> {
    doc: &'a ParsedDocument,
    referrers: Vec<usize>,
    antecedents: Ragged<usize>,
    candidates: Ragged<usize>,
    pair_referrers: Vec<usize>,
    static_features: Vec<Vec<f32>>,
    training_labels: Vec<f32>,
}

impl<'a> DocumentPairInfo<'a> {
    /// Build the pair structures for one annotated, encoded document.
    ///
    /// In inference mode every candidate the upstream analysis proposed is
    /// admitted. In training mode candidates whose span is covered by
    /// another gold annotation are excluded first; filtering only removes,
    /// so training mode never yields more antecedents or pairs than
    /// inference mode on the same document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] when the document has no referring
    /// expression with at least one admitted candidate, or when the
    /// annotations were not encoded against `table` (map widths disagree).
    pub fn build(
        annotated: &'a AnnotatedDocument,
        table: &FeatureTable,
        train: bool,
    ) -> Result<Self> {
        let doc = &annotated.doc;
        let feature_width = table.len();

        let mut referrers = Vec::new();
        let mut antecedents: Ragged<usize> = Ragged::new();
        let mut candidates: Ragged<usize> = Ragged::new();
        let mut pair_referrers = Vec::new();
        let mut static_features = Vec::new();
        let mut training_labels = Vec::new();
        let mut span_rows: HashMap<&[usize], usize> = HashMap::new();

        for index in 0..doc.len() {
            let annotation = annotated.coref.token(index);
            let admitted: Vec<_> = annotation
                .candidates
                .iter()
                .filter(|c| !train || !c.covered_in_training)
                .collect();
            if admitted.is_empty() {
                continue;
            }

            check_width(
                "referrer feature map",
                index,
                annotation.feature_map.len(),
                feature_width,
            )?;
            check_width(
                "referrer position map",
                index,
                annotation.position_map.len(),
                POSITION_FEATURES,
            )?;

            let referrer_position = referrers.len();
            referrers.push(index);

            let mut candidate_row = Vec::with_capacity(admitted.len());
            for candidate in admitted {
                check_width(
                    "candidate feature map",
                    index,
                    candidate.feature_map.len(),
                    feature_width,
                )?;
                check_width(
                    "candidate position map",
                    index,
                    candidate.position_map.len(),
                    POSITION_FEATURES,
                )?;
                check_width(
                    "candidate compatibility map",
                    index,
                    candidate.compatibility_map.len(),
                    COMPATIBILITY_FEATURES,
                )?;

                // Antecedent rows are deduplicated by exact span identity in
                // first-appearance order across the whole document.
                let antecedent_row = match span_rows.get(candidate.span.as_slice()) {
                    Some(&row) => row,
                    None => {
                        let row = antecedents.num_rows();
                        span_rows.insert(&candidate.span, row);
                        antecedents.push_row(candidate.span.iter().copied());
                        row
                    }
                };
                candidate_row.push(antecedent_row);
                pair_referrers.push(referrer_position);

                let mut row = Vec::with_capacity(
                    2 * feature_width + 2 * POSITION_FEATURES + COMPATIBILITY_FEATURES,
                );
                row.extend_from_slice(&annotation.feature_map);
                row.extend_from_slice(&annotation.position_map);
                row.extend_from_slice(&candidate.feature_map);
                row.extend_from_slice(&candidate.position_map);
                row.extend_from_slice(&candidate.compatibility_map);
                static_features.push(row);

                if train {
                    training_labels.push(if candidate.gold_antecedent { 1.0 } else { 0.0 });
                }
            }
            candidates.push_row(candidate_row);
        }

        if referrers.is_empty() {
            return Err(Error::invalid_document(
                "document has no referring expression with an admitted candidate",
            ));
        }

        debug_assert_eq!(static_features.len(), pair_referrers.len());
        debug_assert_eq!(static_features.len(), candidates.flat_len());

        Ok(Self {
            doc,
            referrers,
            antecedents,
            candidates,
            pair_referrers,
            static_features,
            training_labels,
        })
    }

    /// The source document.
    #[must_use]
    pub fn doc(&self) -> &'a ParsedDocument {
        self.doc
    }

    /// Token indices of the referring expressions, ascending.
    #[must_use]
    pub fn referrers(&self) -> &[usize] {
        &self.referrers
    }

    /// Unique antecedent spans, one row each, in first-appearance order.
    #[must_use]
    pub fn antecedents(&self) -> &Ragged<usize> {
        &self.antecedents
    }

    /// Per-referrer candidate rows; values index rows of `antecedents`.
    #[must_use]
    pub fn candidates(&self) -> &Ragged<usize> {
        &self.candidates
    }

    /// For each flattened pair, the owning referrer's position in
    /// [`DocumentPairInfo::referrers`].
    #[must_use]
    pub fn pair_referrers(&self) -> &[usize] {
        &self.pair_referrers
    }

    /// One static feature row per flattened pair:
    /// `[referrer multi-hot | referrer position | candidate multi-hot |
    /// candidate position | compatibility]`.
    #[must_use]
    pub fn static_features(&self) -> &[Vec<f32>] {
        &self.static_features
    }

    /// Training labels, one per pair (1.0 = gold antecedent); empty in
    /// inference mode.
    #[must_use]
    pub fn training_labels(&self) -> &[f32] {
        &self.training_labels
    }

    /// Number of flattened (referrer, candidate) pairs.
    #[must_use]
    pub fn num_pairs(&self) -> usize {
        self.pair_referrers.len()
    }
}

fn check_width(what: &str, token: usize, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::invalid_document(format!(
            "{what} on token {token} has width {got}, expected {expected}; \
             was the document encoded against this feature table?"
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{CorefAnnotations, MentionCandidate};
    use crate::document::Token;

    /// "Kim met Lee. She waved. She left.": two anaphors sharing spans.
    fn annotated() -> AnnotatedDocument {
        let doc = ParsedDocument::new(vec![
            Token::new("Kim", "NNP")
                .with_ent_type("PERSON")
                .with_dep("nsubj", 1),
            Token::new("met", "VBD"),
            Token::new("Lee", "NNP")
                .with_ent_type("PERSON")
                .with_dep("dobj", 1),
            Token::new(".", ".").with_dep("punct", 1),
            Token::new("She", "PRP")
                .with_morph("Gender=Fem|PronType=Prs")
                .with_dep("nsubj", 5),
            Token::new("waved", "VBD"),
            Token::new(".", ".").with_dep("punct", 5),
            Token::new("She", "PRP")
                .with_morph("Gender=Fem|PronType=Prs")
                .with_dep("nsubj", 8),
            Token::new("left", "VBD"),
            Token::new(".", ".").with_dep("punct", 8),
        ])
        .unwrap();

        let mut coref = CorefAnnotations::new(doc.len());
        coref.mark_independent_noun(0);
        coref.mark_independent_noun(2);
        coref.mark_potential_anaphor(4);
        coref.mark_potential_anaphor(7);
        coref.add_candidate(4, MentionCandidate::new(vec![0]));
        coref.add_candidate(4, MentionCandidate::new(vec![2]));
        coref.add_candidate(7, MentionCandidate::new(vec![0]));
        coref.add_candidate(7, MentionCandidate::new(vec![2]));
        AnnotatedDocument::new(doc, coref).unwrap()
    }

    fn encoded() -> (AnnotatedDocument, FeatureTable) {
        let mut annotated = annotated();
        let table = FeatureTable::build(std::slice::from_ref(&annotated)).unwrap();
        annotated.encode(&table);
        (annotated, table)
    }

    #[test]
    fn test_shared_spans_deduplicate() {
        let (annotated, table) = encoded();
        let info = DocumentPairInfo::build(&annotated, &table, false).unwrap();

        assert_eq!(info.referrers(), &[4, 7]);
        // Both referrers reuse the same two antecedent rows.
        assert_eq!(info.antecedents().data(), &[0, 2]);
        assert_eq!(info.antecedents().lengths(), &[1, 1]);
        assert_eq!(info.candidates().data(), &[0, 1, 0, 1]);
        assert_eq!(info.candidates().lengths(), &[2, 2]);
        assert_eq!(info.pair_referrers(), &[0, 0, 1, 1]);
    }

    #[test]
    fn test_pair_count_invariant() {
        let (annotated, table) = encoded();
        let info = DocumentPairInfo::build(&annotated, &table, false).unwrap();

        assert_eq!(info.static_features().len(), info.num_pairs());
        assert_eq!(info.pair_referrers().len(), info.num_pairs());
        assert_eq!(info.candidates().flat_len(), info.num_pairs());
        assert!(info.training_labels().is_empty());
    }

    #[test]
    fn test_static_row_width() {
        let (annotated, table) = encoded();
        let info = DocumentPairInfo::build(&annotated, &table, false).unwrap();
        let expected = 2 * table.len() + 2 * POSITION_FEATURES + COMPATIBILITY_FEATURES;
        for row in info.static_features() {
            assert_eq!(row.len(), expected);
        }
    }

    #[test]
    fn test_training_filter_only_removes() {
        let (mut annotated, table) = encoded();
        {
            let ann = annotated.coref.token_mut(4);
            ann.candidates[1].covered_in_training = true;
            ann.candidates[0].gold_antecedent = true;
        }

        let inference = DocumentPairInfo::build(&annotated, &table, false).unwrap();
        let training = DocumentPairInfo::build(&annotated, &table, true).unwrap();

        assert!(training.num_pairs() <= inference.num_pairs());
        assert!(training.antecedents().num_rows() <= inference.antecedents().num_rows());

        assert_eq!(training.referrers(), &[4, 7]);
        assert_eq!(training.candidates().lengths(), &[1, 2]);
        assert_eq!(training.training_labels(), &[1.0, 0.0, 0.0]);
        assert_eq!(training.training_labels().len(), training.num_pairs());
    }

    #[test]
    fn test_referrer_dropped_when_all_candidates_filtered() {
        let (mut annotated, table) = encoded();
        for candidate in &mut annotated.coref.token_mut(4).candidates {
            candidate.covered_in_training = true;
        }

        let training = DocumentPairInfo::build(&annotated, &table, true).unwrap();
        assert_eq!(training.referrers(), &[7]);
        assert_eq!(training.pair_referrers(), &[0, 0]);
    }

    #[test]
    fn test_no_referrers_is_an_error() {
        let doc = ParsedDocument::new(vec![
            Token::new("Rain", "NN").with_dep("nsubj", 1),
            Token::new("fell", "VBD"),
        ])
        .unwrap();
        let mut coref = CorefAnnotations::new(doc.len());
        coref.mark_independent_noun(0);
        let annotated = AnnotatedDocument::new(doc, coref).unwrap();
        let table = FeatureTable::build(std::slice::from_ref(&annotated)).unwrap();

        let result = DocumentPairInfo::build(&annotated, &table, false);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_unencoded_document_is_an_error() {
        let annotated = annotated();
        let table = FeatureTable::build(std::slice::from_ref(&annotated)).unwrap();
        // encode() was never called; maps are empty.
        let result = DocumentPairInfo::build(&annotated, &table, false);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }
}
