//! Signing error types.
//!
//! No variant carries key material or the message being signed.

use std::time::Duration;

use castellan_core::error::CastellanError;
use castellan_core::models::algorithm::{PublicKeyAlgorithm, SignatureAlgorithm};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("cannot hold a {algorithm} key of {size} bits locally")]
    UnsupportedKey {
        algorithm: PublicKeyAlgorithm,
        size: u32,
    },

    #[error("signature scheme {0:?} is not supported")]
    UnsupportedScheme(SignatureAlgorithm),

    #[error("{scheme:?} cannot be produced by a {key} key")]
    AlgorithmMismatch {
        key: PublicKeyAlgorithm,
        scheme: SignatureAlgorithm,
    },

    #[error("local signing failed: {0}")]
    Local(String),

    #[error("custodian for {authority_arn} failed: {message}")]
    Backend {
        authority_arn: String,
        message: String,
        transient: bool,
    },

    #[error("custodian for {authority_arn} did not answer within {timeout:?}")]
    Timeout {
        authority_arn: String,
        timeout: Duration,
    },
}

impl SignerError {
    pub fn is_transient(&self) -> bool {
        match self {
            SignerError::Backend { transient, .. } => *transient,
            SignerError::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<SignerError> for CastellanError {
    fn from(err: SignerError) -> Self {
        CastellanError::SigningBackend {
            transient: err.is_transient(),
            message: err.to_string(),
        }
    }
}
