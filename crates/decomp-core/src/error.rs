//! Error types for decomp-core.

use thiserror::Error;

/// Result type alias using decomp-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for decomp operations
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog or templates source is missing or malformed. Fatal at startup.
    #[error("catalog load error: {message}")]
    CatalogLoad { message: String },

    /// The embedding backend failed to load or to produce vectors
    #[error("embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    /// The index was built with a different model than the query embedder
    #[error("embedding model mismatch: index built with {index}, embedder is {embedder}")]
    ModelMismatch { index: String, embedder: String },

    /// Invalid configuration value
    #[error("invalid value for {field}: {message}")]
    Config { field: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a catalog load error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogLoad {
            message: message.into(),
        }
    }

    /// Create an embedding unavailable error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from the embedding backend
    pub fn is_embedding_unavailable(&self) -> bool {
        matches!(self, Self::EmbeddingUnavailable { .. })
    }

    /// Check if this error is a catalog load error
    pub fn is_catalog_load(&self) -> bool {
        matches!(self, Self::CatalogLoad { .. })
    }
}
