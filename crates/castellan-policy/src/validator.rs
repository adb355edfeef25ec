//! Key / signature compatibility checks.

use castellan_core::models::algorithm::{PublicKeyAlgorithm, SigningScheme};
use castellan_core::models::request::{CertificateRequest, DistinguishedName};

use crate::error::PolicyError;
use crate::registry::PolicyRegistry;

/// A request that passed every compatibility check, with its algorithm
/// names replaced by the identities they resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    common_name: String,
    subject_alternative_names: Vec<String>,
    distinguished_name: DistinguishedName,
    key_algorithm: PublicKeyAlgorithm,
    key_size: u32,
    scheme: SigningScheme,
    profile: String,
}

impl ValidatedRequest {
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    pub fn subject_alternative_names(&self) -> &[String] {
        &self.subject_alternative_names
    }

    pub fn distinguished_name(&self) -> &DistinguishedName {
        &self.distinguished_name
    }

    pub fn key_algorithm(&self) -> PublicKeyAlgorithm {
        self.key_algorithm
    }

    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// The requested profile name, for [`crate::ProfileResolver`].
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompatibilityValidator<'a> {
    registry: &'a PolicyRegistry,
}

impl<'a> CompatibilityValidator<'a> {
    pub fn new(registry: &'a PolicyRegistry) -> Self {
        Self { registry }
    }

    /// Checks run in a fixed order and stop at the first failure:
    /// key algorithm, key size, signature name, then whether the key
    /// algorithm allows that signature.
    pub fn validate(&self, request: &CertificateRequest) -> Result<ValidatedRequest, PolicyError> {
        let key_policy = self.registry.key_policy(&request.key_algorithm)?;

        if !key_policy.allows_size(request.key_size) {
            return Err(PolicyError::InvalidKeySize {
                algorithm: key_policy.name.clone(),
                size: request.key_size,
            });
        }

        let mapping = self
            .registry
            .signature_mapping(&request.signature_algorithm)?;

        // A globally known signature can still be wrong for this key family.
        if !key_policy.allows_signature(&request.signature_algorithm) {
            return Err(PolicyError::IncompatibleSignatureAlgorithm {
                key_algorithm: key_policy.name.clone(),
                signature: request.signature_algorithm.clone(),
            });
        }

        Ok(ValidatedRequest {
            common_name: request.common_name.clone(),
            subject_alternative_names: request.subject_alternative_names.clone(),
            distinguished_name: request.distinguished_name.clone(),
            key_algorithm: key_policy.algorithm,
            key_size: request.key_size,
            scheme: mapping.scheme(),
            profile: request.profile.clone(),
        })
    }
}
