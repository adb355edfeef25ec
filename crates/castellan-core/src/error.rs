//! Error types for the castellan issuance layer.

use thiserror::Error;

/// Which side of the boundary caused a failure.
///
/// `Caller` failures are 4xx-equivalent: the request itself is not
/// acceptable and retrying it unchanged will fail again. `Environment`
/// failures are 5xx-equivalent: configuration or a signing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Caller,
    Environment,
}

#[derive(Debug, Error)]
pub enum CastellanError {
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

    #[error("attestation evidence required for {mode} requests")]
    AttestationEvidenceMissing { mode: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("invalid certificate record: {message}")]
    InvalidRecord { message: String },

    #[error("certificate {serial_number} is already revoked")]
    AlreadyRevoked { serial_number: String },

    #[error("signing backend error: {message}")]
    SigningBackend { message: String, transient: bool },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {message}")]
    Validation { message: String },
}

impl CastellanError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CastellanError::UnknownKeyAlgorithm { .. }
            | CastellanError::InvalidKeySize { .. }
            | CastellanError::UnknownSignatureAlgorithm { .. }
            | CastellanError::IncompatibleSignatureAlgorithm { .. }
            | CastellanError::UnknownProfile { .. }
            | CastellanError::IncompleteSpecification { .. }
            | CastellanError::AttestationEvidenceMissing { .. }
            | CastellanError::InvalidRequest { .. }
            | CastellanError::InvalidRecord { .. }
            | CastellanError::AlreadyRevoked { .. } => ErrorClass::Caller,
            CastellanError::SigningBackend { .. }
            | CastellanError::Config(_)
            | CastellanError::Validation { .. } => ErrorClass::Environment,
        }
    }

    /// Whether the failure may succeed on a later attempt.
    ///
    /// Only backend failures flagged transient qualify; whether to retry
    /// is still the caller's decision.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CastellanError::SigningBackend {
                transient: true,
                ..
            }
        )
    }
}

pub type CastellanResult<T> = Result<T, CastellanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violations_are_caller_errors() {
        let err = CastellanError::IncompatibleSignatureAlgorithm {
            key_algorithm: "RSA".into(),
            signature: "SHA256WITHECDSA".into(),
        };
        assert_eq!(err.class(), ErrorClass::Caller);
        assert!(!err.is_transient());
    }

    #[test]
    fn backend_errors_are_environment_errors() {
        let err = CastellanError::SigningBackend {
            message: "throttled".into(),
            transient: true,
        };
        assert_eq!(err.class(), ErrorClass::Environment);
        assert!(err.is_transient());
    }
}
