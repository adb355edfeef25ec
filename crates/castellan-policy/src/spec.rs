//! Assembly of the backend-ready signing specification.

use castellan_core::models::algorithm::{
    BackendSigningCode, PublicKeyAlgorithm, SignatureAlgorithm,
};
use castellan_core::models::authority::{AuthorityTarget, KeyCustody, KeyIdentity};
use castellan_core::models::certificate::ValidityPeriod;
use castellan_core::models::request::DistinguishedName;
use castellan_signer::SigningKey;
use serde::Serialize;

use crate::error::PolicyError;
use crate::profile::{ExtendedKeyUsage, KeyUsageSet, ResolvedProfile, TemplateId};
use crate::validator::ValidatedRequest;

/// Subject of the certificate to be issued.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Subject {
    pub common_name: String,
    pub distinguished_name: DistinguishedName,
    pub subject_alternative_names: Vec<String>,
}

/// Everything a signing backend needs to issue one certificate.
///
/// Every field is already resolved; a backend must not re-derive or
/// override any of them. Consumed by value by
/// [`crate::SigningBackend::issue`].
#[derive(Debug, Serialize)]
pub struct SigningSpecification {
    subject: Subject,
    key_algorithm: PublicKeyAlgorithm,
    key_size: u32,
    signature_algorithm: SignatureAlgorithm,
    backend_code: BackendSigningCode,
    key_usage: KeyUsageSet,
    key_usage_bits: u16,
    extended_key_usage: Vec<ExtendedKeyUsage>,
    template: TemplateId,
    signing_key: KeyIdentity,
    key_custody: KeyCustody,
    authority: Option<AuthorityTarget>,
    validity: ValidityPeriod,
    is_root: bool,
}

impl SigningSpecification {
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn key_algorithm(&self) -> PublicKeyAlgorithm {
        self.key_algorithm
    }

    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn backend_code(&self) -> BackendSigningCode {
        self.backend_code
    }

    pub fn key_usage(&self) -> &KeyUsageSet {
        &self.key_usage
    }

    pub fn key_usage_bits(&self) -> u16 {
        self.key_usage_bits
    }

    pub fn extended_key_usage(&self) -> &[ExtendedKeyUsage] {
        &self.extended_key_usage
    }

    pub fn template(&self) -> &TemplateId {
        &self.template
    }

    pub fn signing_key(&self) -> &KeyIdentity {
        &self.signing_key
    }

    pub fn key_custody(&self) -> KeyCustody {
        self.key_custody
    }

    /// Target authority. Always present for custodian-backed keys.
    pub fn authority(&self) -> Option<&AuthorityTarget> {
        self.authority.as_ref()
    }

    pub fn validity(&self) -> ValidityPeriod {
        self.validity
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

/// Combine a validated request, its resolved profile and a key reference
/// into a [`SigningSpecification`].
///
/// No policy is checked here. This fails only when the inputs cannot
/// describe an issuance at all, or describe two different authorities.
/// `authority` defaults to the one the key signs for.
pub fn build_spec(
    validated: ValidatedRequest,
    profile: ResolvedProfile,
    signing_key: &impl SigningKey,
    authority: Option<AuthorityTarget>,
    validity: ValidityPeriod,
    is_root: bool,
) -> Result<SigningSpecification, PolicyError> {
    if validated.common_name().trim().is_empty() {
        return Err(incomplete("subject.common_name"));
    }
    if validity.is_empty() {
        return Err(incomplete("validity"));
    }

    let key_custody = signing_key.custody();
    if let Some(field) = authority.as_ref().and_then(AuthorityTarget::missing_field) {
        return Err(incomplete(field));
    }
    let authority = match (authority, signing_key.authority()) {
        (Some(requested), Some(held)) if !same_authority(&requested, held) => {
            return Err(PolicyError::AuthorityMismatch {
                key: held.authority_arn.clone(),
                requested: requested.authority_arn,
            });
        }
        (Some(requested), _) => Some(requested),
        (None, held) => held.cloned(),
    };
    match &authority {
        None if key_custody == KeyCustody::Custodian => return Err(incomplete("authority")),
        Some(target) => {
            if let Some(field) = target.missing_field() {
                return Err(incomplete(field));
            }
        }
        None => {}
    }

    let scheme = validated.scheme();
    Ok(SigningSpecification {
        subject: Subject {
            common_name: validated.common_name().to_string(),
            distinguished_name: validated.distinguished_name().clone(),
            subject_alternative_names: validated.subject_alternative_names().to_vec(),
        },
        key_algorithm: validated.key_algorithm(),
        key_size: validated.key_size(),
        signature_algorithm: scheme.algorithm,
        backend_code: scheme.backend_code,
        key_usage_bits: profile.key_usage.bits(),
        key_usage: profile.key_usage,
        extended_key_usage: profile.extended_key_usage,
        template: profile.template,
        signing_key: signing_key.identity(),
        key_custody,
        authority,
        validity,
        is_root,
    })
}

/// Same CA in the same region; the role used to reach it may differ.
fn same_authority(a: &AuthorityTarget, b: &AuthorityTarget) -> bool {
    a.region == b.region && a.authority_arn == b.authority_arn
}

fn incomplete(field: &str) -> PolicyError {
    PolicyError::IncompleteSpecification {
        field: field.to_string(),
    }
}
