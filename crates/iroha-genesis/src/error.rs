//! Error types for genesis provisioning.
//!
//! Format and encoding errors are raised before any output is written.
//! Private key material is never included in error messages.

/// Errors raised while loading, generating, or writing provisioning data.
#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    #[error("Invalid registry format at line {line}: {reason}")]
    InputFormat { line: usize, reason: String },

    #[error("Invalid encoding for {field}: {reason}")]
    Encoding { field: String, reason: String },

    #[error("Invalid genesis document: {0}")]
    JsonShape(String),

    #[error("Key mismatch at line {line}: public key is not derived from private key")]
    KeyMismatch { line: usize },

    #[error("Key files for node{index} do not form a valid key pair")]
    KeyFileMismatch { index: usize },

    #[error("Peer {address} has no keys; run generate-peers-keys first")]
    MissingKeys { address: String },

    #[error("Output {path} is the input genesis file; choose a different output path")]
    SameOutput { path: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, GenesisError>;
