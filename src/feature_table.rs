//! Corpus-level categorical feature vocabulary.
//!
//! A [`FeatureTable`] is built once over a corpus and then shared, read-only,
//! by every document encoding in that corpus. It records which categorical
//! values (tags, morphological features, entity types, directional dependency
//! labels, and the same recomputed for syntactic parents) occur anywhere on a
//! mention token, and fixes an order for them so that one-hot positions are
//! reproducible across runs.
//!
//! Only *mention* tokens contribute: tokens the upstream analysis flags as
//! independent nouns or potential anaphors. Their parents contribute the
//! parent-level fields even when the parents themselves are not mentions.
//!
//! The table is a per-corpus artifact: a model trained against one table can
//! only score documents encoded with that same table, so the table travels
//! with the model via [`FeatureTable::save`] / [`FeatureTable::load`].

use crate::annotations::AnnotatedDocument;
use crate::document::{ParsedDocument, Token};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

// =============================================================================
// FeatureTable
// =============================================================================

/// Ordered, deduplicated categorical vocabularies for one corpus.
///
/// # Invariants
///
/// - Each field is lexicographically sorted and duplicate-free
/// - [`FeatureTable::len`] equals the sum of the field lengths, the width of
///   one multi-hot block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTable {
    tags: Vec<String>,
    morphs: Vec<String>,
    ent_types: Vec<String>,
    lefthand_deps_to_children: Vec<String>,
    righthand_deps_to_children: Vec<String>,
    lefthand_deps_to_parents: Vec<String>,
    righthand_deps_to_parents: Vec<String>,
    parent_tags: Vec<String>,
    parent_morphs: Vec<String>,
    parent_lefthand_deps_to_children: Vec<String>,
    parent_righthand_deps_to_children: Vec<String>,
}

/// Working set of the eleven vocabularies during a corpus scan.
#[derive(Default)]
struct FieldSets {
    tags: BTreeSet<String>,
    morphs: BTreeSet<String>,
    ent_types: BTreeSet<String>,
    lefthand_deps_to_children: BTreeSet<String>,
    righthand_deps_to_children: BTreeSet<String>,
    lefthand_deps_to_parents: BTreeSet<String>,
    righthand_deps_to_parents: BTreeSet<String>,
    parent_tags: BTreeSet<String>,
    parent_morphs: BTreeSet<String>,
    parent_lefthand_deps_to_children: BTreeSet<String>,
    parent_righthand_deps_to_children: BTreeSet<String>,
}

impl FieldSets {
    fn collect(&mut self, doc: &ParsedDocument, index: usize) {
        let token = doc.token(index);

        self.tags.insert(token.tag.clone());
        for feature in token.morph_features() {
            self.morphs.insert(feature.to_string());
        }
        // The empty entity type is a meaningful value: "not in any entity".
        self.ent_types.insert(token.ent_type.clone());

        for child in doc.left_children(index) {
            self.lefthand_deps_to_children
                .insert(doc.token(child).dep.clone());
        }
        for child in doc.right_children(index) {
            self.righthand_deps_to_children
                .insert(doc.token(child).dep.clone());
        }

        if let Some(parent) = token.parent {
            if index < parent {
                self.lefthand_deps_to_parents.insert(token.dep.clone());
            } else {
                self.righthand_deps_to_parents.insert(token.dep.clone());
            }

            let parent_token = doc.token(parent);
            self.parent_tags.insert(parent_token.tag.clone());
            for feature in parent_token.morph_features() {
                self.parent_morphs.insert(feature.to_string());
            }
            for child in doc.left_children(parent) {
                self.parent_lefthand_deps_to_children
                    .insert(doc.token(child).dep.clone());
            }
            for child in doc.right_children(parent) {
                self.parent_righthand_deps_to_children
                    .insert(doc.token(child).dep.clone());
            }
        }
    }
}

impl From<FieldSets> for FeatureTable {
    fn from(sets: FieldSets) -> Self {
        Self {
            tags: sets.tags.into_iter().collect(),
            morphs: sets.morphs.into_iter().collect(),
            ent_types: sets.ent_types.into_iter().collect(),
            lefthand_deps_to_children: sets.lefthand_deps_to_children.into_iter().collect(),
            righthand_deps_to_children: sets.righthand_deps_to_children.into_iter().collect(),
            lefthand_deps_to_parents: sets.lefthand_deps_to_parents.into_iter().collect(),
            righthand_deps_to_parents: sets.righthand_deps_to_parents.into_iter().collect(),
            parent_tags: sets.parent_tags.into_iter().collect(),
            parent_morphs: sets.parent_morphs.into_iter().collect(),
            parent_lefthand_deps_to_children: sets
                .parent_lefthand_deps_to_children
                .into_iter()
                .collect(),
            parent_righthand_deps_to_children: sets
                .parent_righthand_deps_to_children
                .into_iter()
                .collect(),
        }
    }
}

impl FeatureTable {
    /// Build the vocabulary snapshot for a corpus.
    ///
    /// Scans every mention token (and its parent) in every document; each
    /// field ends up sorted and deduplicated, so the resulting one-hot
    /// positions are independent of document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCorpus`] for zero documents. A corpus whose
    /// documents contain no mention tokens yields an empty table.
    pub fn build(docs: &[AnnotatedDocument]) -> Result<Self> {
        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut sets = FieldSets::default();
        for annotated in docs {
            let doc = &annotated.doc;
            for index in 0..doc.len() {
                if annotated.coref.token(index).is_mention() {
                    sets.collect(doc, index);
                }
            }
        }
        Ok(sets.into())
    }

    /// Total width of one multi-hot block: the sum of all field lengths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields().map(|(_, field)| field.len()).sum()
    }

    /// Check whether no value was ever observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fields in block order, with their names.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("tags", self.tags.as_slice()),
            ("morphs", self.morphs.as_slice()),
            ("ent_types", self.ent_types.as_slice()),
            (
                "lefthand_deps_to_children",
                self.lefthand_deps_to_children.as_slice(),
            ),
            (
                "righthand_deps_to_children",
                self.righthand_deps_to_children.as_slice(),
            ),
            (
                "lefthand_deps_to_parents",
                self.lefthand_deps_to_parents.as_slice(),
            ),
            (
                "righthand_deps_to_parents",
                self.righthand_deps_to_parents.as_slice(),
            ),
            ("parent_tags", self.parent_tags.as_slice()),
            ("parent_morphs", self.parent_morphs.as_slice()),
            (
                "parent_lefthand_deps_to_children",
                self.parent_lefthand_deps_to_children.as_slice(),
            ),
            (
                "parent_righthand_deps_to_children",
                self.parent_righthand_deps_to_children.as_slice(),
            ),
        ]
        .into_iter()
    }

    /// Tag vocabulary.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Morphological-feature vocabulary.
    #[must_use]
    pub fn morphs(&self) -> &[String] {
        &self.morphs
    }

    /// Entity-type vocabulary (the empty string is a valid entry).
    #[must_use]
    pub fn ent_types(&self) -> &[String] {
        &self.ent_types
    }

    /// Dependency labels of children left of a mention token.
    #[must_use]
    pub fn lefthand_deps_to_children(&self) -> &[String] {
        &self.lefthand_deps_to_children
    }

    /// Dependency labels of children right of a mention token.
    #[must_use]
    pub fn righthand_deps_to_children(&self) -> &[String] {
        &self.righthand_deps_to_children
    }

    /// Dependency labels of mention tokens sitting left of their parent.
    #[must_use]
    pub fn lefthand_deps_to_parents(&self) -> &[String] {
        &self.lefthand_deps_to_parents
    }

    /// Dependency labels of mention tokens sitting right of their parent.
    #[must_use]
    pub fn righthand_deps_to_parents(&self) -> &[String] {
        &self.righthand_deps_to_parents
    }

    /// Tag vocabulary of mention-token parents.
    #[must_use]
    pub fn parent_tags(&self) -> &[String] {
        &self.parent_tags
    }

    /// Morphological-feature vocabulary of mention-token parents.
    #[must_use]
    pub fn parent_morphs(&self) -> &[String] {
        &self.parent_morphs
    }

    /// Dependency labels of left children of mention-token parents.
    #[must_use]
    pub fn parent_lefthand_deps_to_children(&self) -> &[String] {
        &self.parent_lefthand_deps_to_children
    }

    /// Dependency labels of right children of mention-token parents.
    #[must_use]
    pub fn parent_righthand_deps_to_children(&self) -> &[String] {
        &self.parent_righthand_deps_to_children
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    /// Multi-hot block for one token, segments in field order.
    ///
    /// Values absent from the vocabulary (a tag never seen at build time)
    /// simply leave their segment cold; the row width is always
    /// [`FeatureTable::len`].
    #[must_use]
    pub fn token_features(&self, doc: &ParsedDocument, index: usize) -> Vec<f32> {
        let mut row = vec![0.0; self.len()];
        let token = doc.token(index);
        let mut offset = 0;

        offset = mark(&mut row, offset, &self.tags, [token.tag.as_str()]);
        offset = mark(&mut row, offset, &self.morphs, token.morph_features());
        offset = mark(&mut row, offset, &self.ent_types, [token.ent_type.as_str()]);
        offset = mark(
            &mut row,
            offset,
            &self.lefthand_deps_to_children,
            child_deps(doc, doc.left_children(index)),
        );
        offset = mark(
            &mut row,
            offset,
            &self.righthand_deps_to_children,
            child_deps(doc, doc.right_children(index)),
        );
        offset = mark(
            &mut row,
            offset,
            &self.lefthand_deps_to_parents,
            dep_if(token, matches!(token.parent, Some(p) if index < p)),
        );
        offset = mark(
            &mut row,
            offset,
            &self.righthand_deps_to_parents,
            dep_if(token, matches!(token.parent, Some(p) if index > p)),
        );

        let parent = token.parent.map(|p| doc.token(p));
        offset = mark(
            &mut row,
            offset,
            &self.parent_tags,
            parent.iter().map(|t| t.tag.as_str()),
        );
        offset = mark(
            &mut row,
            offset,
            &self.parent_morphs,
            parent.iter().flat_map(|t| t.morph_features()),
        );
        offset = mark(
            &mut row,
            offset,
            &self.parent_lefthand_deps_to_children,
            token
                .parent
                .into_iter()
                .flat_map(|p| child_deps(doc, doc.left_children(p))),
        );
        offset = mark(
            &mut row,
            offset,
            &self.parent_righthand_deps_to_children,
            token
                .parent
                .into_iter()
                .flat_map(|p| child_deps(doc, doc.right_children(p))),
        );

        debug_assert_eq!(offset, row.len());
        row
    }

    /// Multi-hot block for a span: elementwise max over its tokens' blocks.
    ///
    /// A multi-token mention (e.g. a coordination) shows the union of its
    /// member tokens' categorical features.
    #[must_use]
    pub fn span_features(&self, doc: &ParsedDocument, span: &[usize]) -> Vec<f32> {
        let mut combined = vec![0.0; self.len()];
        for &index in span {
            for (slot, value) in combined.iter_mut().zip(self.token_features(doc, index)) {
                if value > *slot {
                    *slot = value;
                }
            }
        }
        combined
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the table as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Serialization`] on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a table previously written with [`FeatureTable::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Serialization`] on failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Set `row[offset + position]` for every value found in the sorted `field`;
/// returns the offset of the next segment.
fn mark<'a>(
    row: &mut [f32],
    offset: usize,
    field: &[String],
    values: impl IntoIterator<Item = &'a str>,
) -> usize {
    for value in values {
        if let Ok(position) = field.binary_search_by(|entry| entry.as_str().cmp(value)) {
            row[offset + position] = 1.0;
        }
    }
    offset + field.len()
}

fn child_deps(doc: &ParsedDocument, children: Vec<usize>) -> Vec<&str> {
    children.into_iter().map(|c| doc.token(c).dep.as_str()).collect()
}

fn dep_if(token: &Token, condition: bool) -> Option<&str> {
    condition.then_some(token.dep.as_str())
}

// =============================================================================
// Tests
// =============================================================================
