//! Serializable form of the policy tables, as read from `[policy]`.

use std::collections::{HashMap, HashSet};

use castellan_config::{Validatable, ValidationError};
use castellan_core::models::algorithm::{
    BackendSigningCode, PublicKeyAlgorithm, SignatureAlgorithm,
};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::profile::{ExtendedKeyUsage, KeyUsage};

const TEMPLATE_PREFIX: &str = "arn:aws:acm-pca:::template";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeyAlgorithmEntry {
    pub name: String,
    pub algorithm: PublicKeyAlgorithm,
    pub key_sizes: Vec<u32>,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SignatureEntry {
    pub name: String,
    pub algorithm: SignatureAlgorithm,
    pub backend_code: BackendSigningCode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
    pub name: String,
    pub key_usage: Vec<KeyUsage>,
    pub extended_key_usage: Vec<ExtendedKeyUsage>,
    pub template: String,
}

/// The three policy tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    pub key_algorithms: Vec<KeyAlgorithmEntry>,
    pub signatures: Vec<SignatureEntry>,
    pub profiles: Vec<ProfileEntry>,
}

impl PolicyDocument {
    /// The tables castellan ships with.
    pub fn builtin() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        let signature = |name: &str, algorithm, backend_code| SignatureEntry {
            name: name.to_string(),
            algorithm,
            backend_code,
        };
        let profile = |name: &str, key_usage: Vec<KeyUsage>, eku: ExtendedKeyUsage| ProfileEntry {
            name: name.to_string(),
            key_usage,
            extended_key_usage: vec![eku],
            template: format!("{TEMPLATE_PREFIX}/{name}/V1"),
        };

        Self {
            key_algorithms: vec![
                KeyAlgorithmEntry {
                    name: "RSA".into(),
                    algorithm: PublicKeyAlgorithm::Rsa,
                    key_sizes: vec![2048, 4096],
                    signatures: names(&["SHA256WITHRSA", "SHA384WITHRSA", "SHA512WITHRSA"]),
                },
                KeyAlgorithmEntry {
                    name: "ECDSA".into(),
                    algorithm: PublicKeyAlgorithm::Ecdsa,
                    key_sizes: vec![256, 384, 521],
                    signatures: names(&["SHA256WITHECDSA", "SHA384WITHECDSA", "SHA512WITHECDSA"]),
                },
            ],
            // No RSASSA-PSS entry: see `SignatureAlgorithm::Sha256WithRsaPss`.
            signatures: vec![
                signature(
                    "SHA256WITHECDSA",
                    SignatureAlgorithm::Sha256WithEcdsa,
                    BackendSigningCode::Sha256WithEcdsa,
                ),
                signature(
                    "SHA384WITHECDSA",
                    SignatureAlgorithm::Sha384WithEcdsa,
                    BackendSigningCode::Sha384WithEcdsa,
                ),
                signature(
                    "SHA512WITHECDSA",
                    SignatureAlgorithm::Sha512WithEcdsa,
                    BackendSigningCode::Sha512WithEcdsa,
                ),
                signature(
                    "SHA256WITHRSA",
                    SignatureAlgorithm::Sha256WithRsa,
                    BackendSigningCode::Sha256WithRsa,
                ),
                signature(
                    "SHA384WITHRSA",
                    SignatureAlgorithm::Sha384WithRsa,
                    BackendSigningCode::Sha384WithRsa,
                ),
                signature(
                    "SHA512WITHRSA",
                    SignatureAlgorithm::Sha512WithRsa,
                    BackendSigningCode::Sha512WithRsa,
                ),
            ],
            profiles: vec![
                profile(
                    "EndEntityClientAuthCertificate",
                    vec![KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment],
                    ExtendedKeyUsage::ClientAuth,
                ),
                profile(
                    "EndEntityServerAuthCertificate",
                    vec![KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment],
                    ExtendedKeyUsage::ServerAuth,
                ),
                profile(
                    "CodeSigningCertificate",
                    vec![KeyUsage::DigitalSignature],
                    ExtendedKeyUsage::CodeSigning,
                ),
            ],
        }
    }

    /// Check the cross-table invariants a registry relies on.
    pub fn check(&self) -> Result<(), PolicyError> {
        if self.key_algorithms.is_empty() || self.signatures.is_empty() || self.profiles.is_empty() {
            return Err(PolicyError::invalid(
                "key_algorithms, signatures and profiles must all be non-empty",
            ));
        }

        let mut identities = HashSet::new();
        let mut backend_codes = HashSet::new();
        let mut signatures: HashMap<&str, SignatureAlgorithm> = HashMap::new();
        for entry in &self.signatures {
            if !entry.algorithm.is_supported() {
                return Err(PolicyError::UnsupportedSignatureScheme {
                    name: entry.name.clone(),
                });
            }
            if BackendSigningCode::for_algorithm(entry.algorithm) != Some(entry.backend_code) {
                return Err(PolicyError::invalid(format!(
                    "signature {} maps {:?} to backend code {}, which signs a different scheme",
                    entry.name, entry.algorithm, entry.backend_code
                )));
            }
            if signatures.insert(&entry.name, entry.algorithm).is_some() {
                return Err(PolicyError::invalid(format!(
                    "signature {} is defined twice",
                    entry.name
                )));
            }
            if !identities.insert(entry.algorithm) {
                return Err(PolicyError::invalid(format!(
                    "signature {} maps to {:?}, which another name already uses",
                    entry.name, entry.algorithm
                )));
            }
            if !backend_codes.insert(entry.backend_code) {
                return Err(PolicyError::invalid(format!(
                    "signature {} uses backend code {}, which another name already uses",
                    entry.name, entry.backend_code
                )));
            }
        }

        let mut key_names = HashSet::new();
        for entry in &self.key_algorithms {
            if !key_names.insert(entry.name.as_str()) {
                return Err(PolicyError::invalid(format!(
                    "key algorithm {} is defined twice",
                    entry.name
                )));
            }
            if entry.key_sizes.is_empty() || entry.signatures.is_empty() {
                return Err(PolicyError::invalid(format!(
                    "key algorithm {} needs at least one key size and one signature",
                    entry.name
                )));
            }
            if let Some(size) = entry.key_sizes.iter().find(|s| !entry.algorithm.allows_size(**s)) {
                return Err(PolicyError::invalid(format!(
                    "key algorithm {} allows {size}-bit keys, which {} keys cannot have",
                    entry.name, entry.algorithm
                )));
            }
            for name in &entry.signatures {
                let Some(algorithm) = signatures.get(name.as_str()) else {
                    return Err(PolicyError::invalid(format!(
                        "key algorithm {} allows unknown signature {name}",
                        entry.name
                    )));
                };
                if algorithm.key_algorithm() != entry.algorithm {
                    return Err(PolicyError::invalid(format!(
                        "key algorithm {} allows {name}, which signs with {} keys",
                        entry.name,
                        algorithm.key_algorithm()
                    )));
                }
            }
        }

        let mut profile_names = HashSet::new();
        for entry in &self.profiles {
            if !profile_names.insert(entry.name.as_str()) {
                return Err(PolicyError::invalid(format!(
                    "profile {} is defined twice",
                    entry.name
                )));
            }
            if entry.key_usage.is_empty() {
                return Err(PolicyError::invalid(format!(
                    "profile {} has no key usage",
                    entry.name
                )));
            }
            if entry.template.trim().is_empty() {
                return Err(PolicyError::invalid(format!(
                    "profile {} has no template",
                    entry.name
                )));
            }
        }

        Ok(())
    }
}

impl Validatable for PolicyDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        self.check().map_err(|e| ValidationError::new(e.to_string()))
    }
}
