//! Error types for anaphora.

use thiserror::Error;

/// Result type for anaphora operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for anaphora operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A feature table was requested over zero documents.
    ///
    /// With no token ever observed there is no vocabulary to build, and
    /// downstream encoding cannot proceed with a zero-width table.
    #[error("Cannot build a feature table from an empty corpus")]
    EmptyCorpus,

    /// A document violated a construction contract.
    ///
    /// Raised for malformed parses (out-of-range or cyclic parent links,
    /// inconsistent embedding widths), for pair-info requests over documents
    /// with no referring expressions, and for documents whose annotations
    /// were never encoded against the feature table.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A requested language model/pipeline combination is unsupported.
    #[error("Model '{model}' is not supported; supported models: {supported}")]
    ModelNotSupported {
        /// The model name that was requested.
        model: String,
        /// Comma-separated list of supported model names.
        supported: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (feature table snapshots).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Error::InvalidDocument(msg.into())
    }

    /// Create a model-not-supported error.
    pub fn model_not_supported(model: impl Into<String>, supported: impl Into<String>) -> Self {
        Error::ModelNotSupported {
            model: model.into(),
            supported: supported.into(),
        }
    }
}
