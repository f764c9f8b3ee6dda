//! Error types for the rxnrag domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all rxnrag operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Tokenizer errors ---
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    // --- Embedding errors ---
    #[error("Embedding error: {0}")]
    Embed(#[from] EmbedError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Prompt errors ---
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum TokenizerError {
    #[error("Failed to read vocabulary file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Special token '{token}' ({role}) is not in the vocabulary")]
    MissingSpecialToken { role: &'static str, token: String },

    #[error("Incompatible input argument: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Error)]
pub enum EmbedError {
    #[error("Cannot embed an empty batch")]
    EmptyBatch,

    #[error("Tokenizer vocabulary has no pad token")]
    MissingPadToken,

    #[error("Device unavailable: {0}")]
    Device(String),

    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model returned {actual} rows for a batch of {expected}")]
    RowMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Failed to read record store {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Record format not implemented: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid embedding matrix: {0}")]
    InvalidMatrix(String),

    #[error("Embedding matrix has {rows} rows but the record store has {records} records")]
    RowCountMismatch { records: usize, rows: usize },

    #[error("Query dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index operation failed: {0}")]
    Index(String),
}

#[derive(Debug, Clone, Error)]
pub enum PromptError {
    #[error("Prompt variant '{variant}' has no section '{section}'")]
    UnknownSection { variant: String, section: String },

    #[error("Unknown prompt variant: {0}")]
    UnknownVariant(String),

    #[error("Unknown direction: {0} (expected 'forward' or 'backward')")]
    UnknownDirection(String),

    #[error("Invalid reaction table: {0}")]
    InvalidTable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_mismatch_displays_both_counts() {
        let err = Error::Retrieval(RetrievalError::RowCountMismatch {
            records: 10,
            rows: 12,
        });
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn missing_special_token_names_role() {
        let err = Error::Tokenizer(TokenizerError::MissingSpecialToken {
            role: "unknown",
            token: "?".into(),
        });
        assert!(err.to_string().contains("unknown"));
        assert!(err.to_string().contains("'?'"));
    }

    #[test]
    fn bounded_errors_convert_into_top_level() {
        fn fails() -> Result<()> {
            Err(EmbedError::EmptyBatch)?
        }
        assert!(matches!(fails(), Err(Error::Embed(EmbedError::EmptyBatch))));
    }
}
