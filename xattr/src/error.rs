//! Error types for attribute construction, mutation and DER decoding.

use thiserror::Error;

use crate::tag::TypeTag;

/// Result type for attribute operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Undefined identifier or tag, or a malformed description
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Content octets are not a valid DER body for the tag
    #[error("invalid {tag} content: {source}")]
    InvalidEncoding {
        tag: TypeTag,
        #[source]
        source: xattr_asn1::error::Error,
    },

    #[error("index {index} out of range (count: {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("type mismatch: declared {declared}, got {actual}")]
    TypeMismatch { declared: TypeTag, actual: TypeTag },

    /// Identifier octet with no corresponding TypeTag
    #[error("unsupported tag 0x{0:02x}")]
    UnsupportedTag(u8),

    #[error("invalid attribute structure: {0}")]
    InvalidStructure(String),

    #[error("DER error: {0}")]
    Der(#[from] xattr_der::error::Error),
}
