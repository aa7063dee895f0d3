//! Parsed-document data structures.
//!
//! A [`ParsedDocument`] is the read-only view of one document as produced by
//! an upstream dependency parser: an ordered sequence of [`Token`]s, each
//! carrying a fine-grained part-of-speech tag, a morphology string, an entity
//! type, a dependency label, an optional parent link, and a dense word
//! vector.
//!
//! Documents are validated once at construction (parent links in range and
//! acyclic, embedding widths uniform); everything downstream can then rely on
//! those invariants without re-checking. Sentence membership and tree depth
//! are derived from the parent links at the same time: a token belongs to the
//! sentence of the root its parent chain terminates in, and sentences are
//! numbered in root order.
//!
//! # Example
//!
//! ```rust
//! use anaphora::{ParsedDocument, Token};
//!
//! // "She slept."
//! let doc = ParsedDocument::new(vec![
//!     Token::new("She", "PRP").with_dep("nsubj", 1),
//!     Token::new("slept", "VBD"),
//!     Token::new(".", ".").with_dep("punct", 1),
//! ]).unwrap();
//!
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.sentence_of(0), 0);
//! assert_eq!(doc.depth(0), 1);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Token
// =============================================================================

/// One parser token.
///
/// The morphology string uses the upstream parser's `|`-separated convention
/// (e.g. `"Case=Nom|Gender=Fem|Number=Sing"`); [`Token::morph_features`]
/// splits it into individual features. An empty `ent_type` means the token is
/// not part of a named entity and is itself a valid vocabulary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form.
    pub text: String,
    /// Fine-grained part-of-speech tag (e.g. "NNP", "PRP").
    pub tag: String,
    /// `|`-separated morphological features; may be empty.
    pub morph: String,
    /// Entity type; empty when the token is outside any entity.
    pub ent_type: String,
    /// Dependency label to the parent token.
    pub dep: String,
    /// Parent token index; `None` for a sentence root.
    pub parent: Option<usize>,
    /// Dense word vector.
    pub vector: Vec<f32>,
}

impl Token {
    /// Create a sentence-root token with text and tag.
    #[must_use]
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
            morph: String::new(),
            ent_type: String::new(),
            dep: "ROOT".to_string(),
            parent: None,
            vector: Vec::new(),
        }
    }

    /// Attach a dependency label and parent index.
    #[must_use]
    pub fn with_dep(mut self, dep: impl Into<String>, parent: usize) -> Self {
        self.dep = dep.into();
        self.parent = Some(parent);
        self
    }

    /// Attach a morphology string.
    #[must_use]
    pub fn with_morph(mut self, morph: impl Into<String>) -> Self {
        self.morph = morph.into();
        self
    }

    /// Attach an entity type.
    #[must_use]
    pub fn with_ent_type(mut self, ent_type: impl Into<String>) -> Self {
        self.ent_type = ent_type.into();
        self
    }

    /// Attach a word vector.
    #[must_use]
    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = vector;
        self
    }

    /// Individual morphological features, split from the morph string.
    pub fn morph_features(&self) -> impl Iterator<Item = &str> {
        self.morph.split('|').filter(|f| !f.is_empty())
    }
}

// =============================================================================
// ParsedDocument
// =============================================================================

/// A validated, read-only parsed document.
///
/// # Invariants
///
/// - Every parent index is in range and parent chains are acyclic
/// - All token vectors share one embedding width
/// - Sentence indices and tree depths are consistent with the parent links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Token>", into = "Vec<Token>")]
pub struct ParsedDocument {
    tokens: Vec<Token>,
    sentences: Vec<usize>,
    depths: Vec<usize>,
    sentence_starts: Vec<usize>,
}

impl ParsedDocument {
    /// Validate tokens and build a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] when a parent index is out of
    /// range, parent links form a cycle, or token vectors disagree on width.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let n = tokens.len();

        let width = tokens.first().map_or(0, |t| t.vector.len());
        for (i, token) in tokens.iter().enumerate() {
            if token.vector.len() != width {
                return Err(Error::invalid_document(format!(
                    "token {i} has embedding width {} but the document uses {width}",
                    token.vector.len()
                )));
            }
        }

        let mut roots = vec![0usize; n];
        let mut depths = vec![0usize; n];
        for i in 0..n {
            let mut current = i;
            let mut hops = 0usize;
            while let Some(parent) = tokens[current].parent {
                if parent >= n {
                    return Err(Error::invalid_document(format!(
                        "token {current} has parent {parent} outside the document (length {n})"
                    )));
                }
                current = parent;
                hops += 1;
                if hops > n {
                    return Err(Error::invalid_document(format!(
                        "parent links form a cycle through token {i}"
                    )));
                }
            }
            roots[i] = current;
            depths[i] = hops;
        }

        // Sentences are numbered by root order; a token belongs to the
        // sentence of the root its parent chain reaches. The first token
        // seen for a root is that sentence's start, since the scan ascends.
        let mut sentences = vec![0usize; n];
        let mut sentence_starts = Vec::new();
        let mut root_sentence: Vec<Option<usize>> = vec![None; n];
        for i in 0..n {
            let root = roots[i];
            let sentence = match root_sentence[root] {
                Some(s) => s,
                None => {
                    let s = sentence_starts.len();
                    root_sentence[root] = Some(s);
                    sentence_starts.push(i);
                    s
                }
            };
            sentences[i] = sentence;
        }

        Ok(Self {
            tokens,
            sentences,
            depths,
            sentence_starts,
        })
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the document has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; token indices held by this crate's
    /// own structures are validated at construction.
    #[must_use]
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// All tokens in document order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Sentence index of the token at `index`.
    #[must_use]
    pub fn sentence_of(&self, index: usize) -> usize {
        self.sentences[index]
    }

    /// Index of the first token of sentence `sentence`.
    #[must_use]
    pub fn sentence_start(&self, sentence: usize) -> usize {
        self.sentence_starts[sentence]
    }

    /// Number of sentences.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentence_starts.len()
    }

    /// Dependency-tree depth of the token at `index` (a root has depth 0).
    #[must_use]
    pub fn depth(&self, index: usize) -> usize {
        self.depths[index]
    }

    /// Children of token `index` that sit to its left, in document order.
    #[must_use]
    pub fn left_children(&self, index: usize) -> Vec<usize> {
        (0..index)
            .filter(|&c| self.tokens[c].parent == Some(index))
            .collect()
    }

    /// Children of token `index` that sit to its right, in document order.
    #[must_use]
    pub fn right_children(&self, index: usize) -> Vec<usize> {
        (index + 1..self.tokens.len())
            .filter(|&c| self.tokens[c].parent == Some(index))
            .collect()
    }

    /// Width of the token embeddings (0 for an empty document).
    #[must_use]
    pub fn embedding_width(&self) -> usize {
        self.tokens.first().map_or(0, |t| t.vector.len())
    }
}

impl TryFrom<Vec<Token>> for ParsedDocument {
    type Error = Error;

    fn try_from(tokens: Vec<Token>) -> Result<Self> {
        Self::new(tokens)
    }
}

impl From<ParsedDocument> for Vec<Token> {
    fn from(doc: ParsedDocument) -> Self {
        doc.tokens
    }
}

// =============================================================================
// Tests
// =============================================================================
