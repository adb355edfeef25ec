//! The policy registry: named key algorithms, signature algorithms and
//! certificate profiles.
//!
//! A registry is built once from a checked [`PolicyDocument`] and is
//! immutable afterwards. Reloads produce a new registry behind a new `Arc`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use castellan_config::ConfigProvider;
use castellan_core::error::CastellanError;
use castellan_core::models::algorithm::{
    BackendSigningCode, PublicKeyAlgorithm, SignatureAlgorithm, SigningScheme,
};
use tracing::{info, warn};

use crate::document::PolicyDocument;
use crate::error::PolicyError;
use crate::profile::{CertificateProfile, TemplateId};

/// Config path of the optional policy section.
pub const POLICY_SECTION: &str = "policy";

/// Sizes and signatures allowed for one key algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAlgorithmPolicy {
    pub name: String,
    pub algorithm: PublicKeyAlgorithm,
    pub key_sizes: BTreeSet<u32>,
    pub signatures: BTreeSet<String>,
}

impl KeyAlgorithmPolicy {
    pub fn allows_size(&self, size: u32) -> bool {
        self.key_sizes.contains(&size)
    }

    pub fn allows_signature(&self, name: &str) -> bool {
        self.signatures.contains(name)
    }
}

/// A signature algorithm name and its identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureMapping {
    pub identity: SignatureAlgorithm,
    pub backend_code: BackendSigningCode,
}

impl SignatureMapping {
    pub fn scheme(&self) -> SigningScheme {
        SigningScheme {
            algorithm: self.identity,
            backend_code: self.backend_code,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    key_algorithms: HashMap<String, KeyAlgorithmPolicy>,
    signatures: HashMap<String, SignatureMapping>,
    profiles: HashMap<String, CertificateProfile>,
}

impl PolicyRegistry {
    pub fn builtin() -> Self {
        Self::assemble(PolicyDocument::builtin())
    }

    pub fn from_document(document: PolicyDocument) -> Result<Self, PolicyError> {
        document.check()?;
        Ok(Self::assemble(document))
    }

    fn assemble(document: PolicyDocument) -> Self {
        let key_algorithms = document
            .key_algorithms
            .into_iter()
            .map(|entry| {
                let policy = KeyAlgorithmPolicy {
                    name: entry.name.clone(),
                    algorithm: entry.algorithm,
                    key_sizes: entry.key_sizes.into_iter().collect(),
                    signatures: entry.signatures.into_iter().collect(),
                };
                (entry.name, policy)
            })
            .collect();

        let signatures = document
            .signatures
            .into_iter()
            .map(|entry| {
                let mapping = SignatureMapping {
                    identity: entry.algorithm,
                    backend_code: entry.backend_code,
                };
                (entry.name, mapping)
            })
            .collect();

        let profiles = document
            .profiles
            .into_iter()
            .map(|entry| {
                let profile = CertificateProfile {
                    name: entry.name.clone(),
                    key_usage: entry.key_usage.into_iter().collect(),
                    extended_key_usage: entry.extended_key_usage,
                    template: TemplateId::new(entry.template),
                };
                (entry.name, profile)
            })
            .collect();

        Self {
            key_algorithms,
            signatures,
            profiles,
        }
    }

    /// Load the `[policy]` section if present, otherwise the built-in
    /// tables. A failed load keeps `previous` when there is one.
    pub fn load_or_retain(
        provider: &impl ConfigProvider,
        previous: Option<Arc<PolicyRegistry>>,
    ) -> Result<Arc<PolicyRegistry>, CastellanError> {
        if !provider.exists(POLICY_SECTION) {
            info!("no policy section configured, using built-in policy");
            return Ok(Arc::new(Self::builtin()));
        }

        let loaded = provider
            .get_validated::<PolicyDocument>(POLICY_SECTION)
            .map(Self::assemble)
            .map_err(CastellanError::from);

        match (loaded, previous) {
            (Ok(registry), _) => {
                info!(
                    key_algorithms = registry.key_algorithms.len(),
                    signatures = registry.signatures.len(),
                    profiles = registry.profiles.len(),
                    "policy loaded"
                );
                Ok(Arc::new(registry))
            }
            (Err(e), Some(previous)) => {
                warn!(error = %e, "policy reload failed, keeping previous policy");
                Ok(previous)
            }
            (Err(e), None) => Err(e),
        }
    }

    pub fn key_policy(&self, name: &str) -> Result<&KeyAlgorithmPolicy, PolicyError> {
        self.key_algorithms
            .get(name)
            .ok_or_else(|| PolicyError::UnknownKeyAlgorithm {
                name: name.to_string(),
            })
    }

    pub fn signature_mapping(&self, name: &str) -> Result<&SignatureMapping, PolicyError> {
        self.signatures
            .get(name)
            .ok_or_else(|| PolicyError::UnknownSignatureAlgorithm {
                name: name.to_string(),
            })
    }

    pub fn profile(&self, name: &str) -> Result<&CertificateProfile, PolicyError> {
        self.profiles
            .get(name)
            .ok_or_else(|| PolicyError::UnknownProfile {
                name: name.to_string(),
            })
    }

    pub fn key_policies(&self) -> impl Iterator<Item = &KeyAlgorithmPolicy> {
        self.key_algorithms.values()
    }

    pub fn signatures(&self) -> impl Iterator<Item = (&str, &SignatureMapping)> {
        self.signatures.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn profiles(&self) -> impl Iterator<Item = &CertificateProfile> {
        self.profiles.values()
    }
}
