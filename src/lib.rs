//! # anaphora
//!
//! Coreference pair encoding for dependency-parsed documents.
//!
//! Given documents parsed by an upstream NLP pipeline and annotated by its
//! coreference rules analysis, this crate derives the numeric structures a
//! mention-ranking scorer consumes:
//!
//! - **[`FeatureTable`]**: a per-corpus categorical vocabulary (tags,
//!   morphology, entity types, directional dependency labels, and the same
//!   recomputed for syntactic parents), fixing reproducible one-hot positions
//! - **[`DocumentPairInfo`]**: per-document referrer/antecedent/candidate
//!   index structures plus one fixed-width static feature row per
//!   (referrer, candidate) pair, with an optional training-label vector
//! - **[`pooling`]**: mean-pooled span vectors and head vectors over batches,
//!   with all-zero fallbacks
//!
//! ## Pipeline
//!
//! ```text
//! parsed docs + annotations ──► FeatureTable::build   (once per corpus)
//!                 │                      │
//!                 ▼                      ▼
//!       AnnotatedDocument::encode  (fills numeric maps)
//!                 │
//!                 ▼
//!        DocumentPairInfo::build   (per document, inference or training)
//!                 │
//!                 ▼
//!        pooling::* / downstream scoring
//! ```
//!
//! ## Example
//!
//! ```rust
//! use anaphora::{
//!     AnnotatedDocument, CorefAnnotations, DocumentPairInfo, FeatureTable,
//!     MentionCandidate, ParsedDocument, Token,
//! };
//!
//! // "Ann slept. She woke.", where "She" may refer back to "Ann".
//! let doc = ParsedDocument::new(vec![
//!     Token::new("Ann", "NNP").with_ent_type("PERSON").with_dep("nsubj", 1),
//!     Token::new("slept", "VBD"),
//!     Token::new(".", ".").with_dep("punct", 1),
//!     Token::new("She", "PRP").with_morph("Gender=Fem").with_dep("nsubj", 4),
//!     Token::new("woke", "VBD"),
//!     Token::new(".", ".").with_dep("punct", 4),
//! ])?;
//!
//! let mut coref = CorefAnnotations::new(doc.len());
//! coref.mark_independent_noun(0);
//! coref.mark_potential_anaphor(3);
//! coref.add_candidate(3, MentionCandidate::new(vec![0]));
//!
//! let mut annotated = AnnotatedDocument::new(doc, coref)?;
//! let table = FeatureTable::build(std::slice::from_ref(&annotated))?;
//! annotated.encode(&table);
//!
//! let info = DocumentPairInfo::build(&annotated, &table, false)?;
//! assert_eq!(info.referrers(), &[3]);
//! assert_eq!(info.antecedents().data(), &[0]);
//! assert_eq!(info.num_pairs(), 1);
//! # Ok::<(), anaphora::Error>(())
//! ```
//!
//! ## Determinism
//!
//! Every transform is pure: vocabulary fields are sorted, referrers are
//! ascending, antecedent spans deduplicate in first-appearance order. The
//! resulting indices feed numeric code directly, so identical input always
//! produces identical structures. Documents share nothing but the read-only
//! feature table, so callers are free to process a corpus in parallel.

#![warn(missing_docs)]

mod annotations;
mod document;
mod error;
mod feature_table;
mod pairs;
mod ragged;

pub mod maps;
pub mod pipeline;
pub mod pooling;

pub use annotations::{AnnotatedDocument, CorefAnnotations, MentionCandidate, TokenAnnotation};
pub use document::{ParsedDocument, Token};
pub use error::{Error, Result};
pub use feature_table::FeatureTable;
pub use pairs::DocumentPairInfo;
pub use ragged::Ragged;
