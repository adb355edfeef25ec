//! Policy error types.

use castellan_core::error::CastellanError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown key algorithm: {name}")]
    UnknownKeyAlgorithm { name: String },

    #[error("key size {size} is not allowed for {algorithm}")]
    InvalidKeySize { algorithm: String, size: u32 },

    #[error("unknown signature algorithm: {name}")]
    UnknownSignatureAlgorithm { name: String },

    #[error("signature algorithm {signature} is not allowed for {key_algorithm} keys")]
    IncompatibleSignatureAlgorithm {
        key_algorithm: String,
        signature: String,
    },

    #[error("unknown certificate profile: {name}")]
    UnknownProfile { name: String },

    #[error("signing specification is incomplete: missing {field}")]
    IncompleteSpecification { field: String },

    #[error("signing key belongs to authority {key}, not {requested}")]
    AuthorityMismatch { key: String, requested: String },

    #[error("signature scheme {name} has no backend support")]
    UnsupportedSignatureScheme { name: String },

    #[error("invalid policy document: {message}")]
    InvalidDocument { message: String },
}

impl PolicyError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PolicyError::InvalidDocument {
            message: message.into(),
        }
    }
}

impl From<PolicyError> for CastellanError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::UnknownKeyAlgorithm { name } => CastellanError::UnknownKeyAlgorithm { name },
            PolicyError::InvalidKeySize { algorithm, size } => {
                CastellanError::InvalidKeySize { algorithm, size }
            }
            PolicyError::UnknownSignatureAlgorithm { name } => {
                CastellanError::UnknownSignatureAlgorithm { name }
            }
            PolicyError::IncompatibleSignatureAlgorithm {
                key_algorithm,
                signature,
            } => CastellanError::IncompatibleSignatureAlgorithm {
                key_algorithm,
                signature,
            },
            PolicyError::UnknownProfile { name } => CastellanError::UnknownProfile { name },
            PolicyError::IncompleteSpecification { field } => {
                CastellanError::IncompleteSpecification { field }
            }
            other @ PolicyError::AuthorityMismatch { .. } => CastellanError::InvalidRequest {
                message: other.to_string(),
            },
            other @ (PolicyError::UnsupportedSignatureScheme { .. }
            | PolicyError::InvalidDocument { .. }) => CastellanError::Validation {
                message: other.to_string(),
            },
        }
    }
}
