//! Public-key and signature algorithm identities.
//!
//! These are the generic identities a request resolves to. Which of them
//! an organization allows, and under which names, is decided by the
//! policy registry, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Public-key algorithm family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicKeyAlgorithm {
    Rsa,
    Ecdsa,
}

impl PublicKeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicKeyAlgorithm::Rsa => "RSA",
            PublicKeyAlgorithm::Ecdsa => "ECDSA",
        }
    }

    /// Key sizes in bits that can be generated for this family.
    pub fn allows_size(&self, bits: u32) -> bool {
        match self {
            PublicKeyAlgorithm::Rsa => matches!(bits, 2048 | 3072 | 4096),
            PublicKeyAlgorithm::Ecdsa => matches!(bits, 256 | 384 | 521),
        }
    }
}

impl fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message digest used by a signature scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

/// Generic signature algorithm identity, independent of any backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    Sha256WithRsa,
    Sha384WithRsa,
    Sha512WithRsa,
    Sha256WithEcdsa,
    Sha384WithEcdsa,
    Sha512WithEcdsa,
    /// RSASSA-PSS. Known but not supported: no backend code exists for it
    /// and no key will sign with it.
    Sha256WithRsaPss,
}

impl SignatureAlgorithm {
    pub fn key_algorithm(&self) -> PublicKeyAlgorithm {
        match self {
            SignatureAlgorithm::Sha256WithRsa
            | SignatureAlgorithm::Sha384WithRsa
            | SignatureAlgorithm::Sha512WithRsa
            | SignatureAlgorithm::Sha256WithRsaPss => PublicKeyAlgorithm::Rsa,
            SignatureAlgorithm::Sha256WithEcdsa
            | SignatureAlgorithm::Sha384WithEcdsa
            | SignatureAlgorithm::Sha512WithEcdsa => PublicKeyAlgorithm::Ecdsa,
        }
    }

    pub fn hash(&self) -> HashAlgorithm {
        match self {
            SignatureAlgorithm::Sha256WithRsa
            | SignatureAlgorithm::Sha256WithEcdsa
            | SignatureAlgorithm::Sha256WithRsaPss => HashAlgorithm::Sha256,
            SignatureAlgorithm::Sha384WithRsa | SignatureAlgorithm::Sha384WithEcdsa => {
                HashAlgorithm::Sha384
            }
            SignatureAlgorithm::Sha512WithRsa | SignatureAlgorithm::Sha512WithEcdsa => {
                HashAlgorithm::Sha512
            }
        }
    }

    /// Whether any signing backend can produce this scheme.
    pub fn is_supported(&self) -> bool {
        !matches!(self, SignatureAlgorithm::Sha256WithRsaPss)
    }
}

/// Signing algorithm code understood by the private-CA backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendSigningCode {
    #[serde(rename = "SHA256WITHRSA")]
    Sha256WithRsa,
    #[serde(rename = "SHA384WITHRSA")]
    Sha384WithRsa,
    #[serde(rename = "SHA512WITHRSA")]
    Sha512WithRsa,
    #[serde(rename = "SHA256WITHECDSA")]
    Sha256WithEcdsa,
    #[serde(rename = "SHA384WITHECDSA")]
    Sha384WithEcdsa,
    #[serde(rename = "SHA512WITHECDSA")]
    Sha512WithEcdsa,
}

impl BackendSigningCode {
    /// The only code that produces `algorithm`, if a backend can produce
    /// it at all.
    pub fn for_algorithm(algorithm: SignatureAlgorithm) -> Option<Self> {
        match algorithm {
            SignatureAlgorithm::Sha256WithRsa => Some(BackendSigningCode::Sha256WithRsa),
            SignatureAlgorithm::Sha384WithRsa => Some(BackendSigningCode::Sha384WithRsa),
            SignatureAlgorithm::Sha512WithRsa => Some(BackendSigningCode::Sha512WithRsa),
            SignatureAlgorithm::Sha256WithEcdsa => Some(BackendSigningCode::Sha256WithEcdsa),
            SignatureAlgorithm::Sha384WithEcdsa => Some(BackendSigningCode::Sha384WithEcdsa),
            SignatureAlgorithm::Sha512WithEcdsa => Some(BackendSigningCode::Sha512WithEcdsa),
            SignatureAlgorithm::Sha256WithRsaPss => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendSigningCode::Sha256WithRsa => "SHA256WITHRSA",
            BackendSigningCode::Sha384WithRsa => "SHA384WITHRSA",
            BackendSigningCode::Sha512WithRsa => "SHA512WITHRSA",
            BackendSigningCode::Sha256WithEcdsa => "SHA256WITHECDSA",
            BackendSigningCode::Sha384WithEcdsa => "SHA384WITHECDSA",
            BackendSigningCode::Sha512WithEcdsa => "SHA512WITHECDSA",
        }
    }
}

impl fmt::Display for BackendSigningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved signature scheme: the generic identity together with the
/// code a backend needs to produce it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SigningScheme {
    pub algorithm: SignatureAlgorithm,
    pub backend_code: BackendSigningCode,
}
