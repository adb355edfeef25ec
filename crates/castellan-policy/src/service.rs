//! Issuance service: policy checks, specification assembly and the
//! hand-off to a signing backend.

use std::sync::Arc;

use castellan_core::error::{CastellanError, CastellanResult};
use castellan_core::models::attestation::{InstanceIdentityEvidence, NodeAttestationMode};
use castellan_core::models::authority::AuthorityTarget;
use castellan_core::models::certificate::{
    CertificateMetadata, NewCertificateMetadata, ValidityPeriod,
};
use castellan_core::models::request::CertificateRequest;
use castellan_signer::SigningKey;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{IssuedCertificate, SigningBackend};
use crate::profile::ProfileResolver;
use crate::registry::PolicyRegistry;
use crate::spec::build_spec;
use crate::validator::CompatibilityValidator;

/// Input for one issuance.
#[derive(Debug)]
pub struct IssueInput {
    pub request: CertificateRequest,
    /// Mode the caller was authenticated under.
    pub attestation: NodeAttestationMode,
    pub evidence: Option<InstanceIdentityEvidence>,
    /// Required when the signing key is custodian-backed.
    pub authority: Option<AuthorityTarget>,
    pub validity: ValidityPeriod,
    pub is_root: bool,
}

/// Successful issuance result.
#[derive(Debug)]
pub struct IssueOutput {
    pub certificate: IssuedCertificate,
    pub metadata: CertificateMetadata,
}

/// Issuance service.
///
/// Generic over the backend so the policy layer has no dependency on any
/// particular certificate authority.
pub struct IssuanceService<B: SigningBackend> {
    registry: Arc<PolicyRegistry>,
    backend: B,
}

impl<B: SigningBackend> IssuanceService<B> {
    pub fn new(registry: Arc<PolicyRegistry>, backend: B) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &Arc<PolicyRegistry> {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Install a registry produced by [`PolicyRegistry::load_or_retain`].
    pub fn replace_registry(&mut self, registry: Arc<PolicyRegistry>) {
        self.registry = registry;
    }

    /// Check `input` against policy, build its signing specification and
    /// have the backend issue it.
    pub async fn issue(
        &self,
        input: IssueInput,
        signing_key: &impl SigningKey,
    ) -> CastellanResult<IssueOutput> {
        let request_id = Uuid::new_v4();
        let registry = Arc::clone(&self.registry);

        // 1. Attestation evidence must accompany modes that require it.
        if input.attestation.requires_evidence()
            && input.evidence.as_ref().is_none_or(|e| e.is_empty())
        {
            warn!(%request_id, mode = %input.attestation, "attestation evidence missing");
            return Err(CastellanError::AttestationEvidenceMissing {
                mode: input.attestation.to_string(),
            });
        }

        // 2. Key / signature compatibility.
        let validated = CompatibilityValidator::new(&registry)
            .validate(&input.request)
            .inspect_err(|e| debug!(%request_id, error = %e, "request rejected by policy"))?;

        // 3. Profile.
        let profile = ProfileResolver::new(&registry).resolve(validated.profile())?;

        // 4. Specification.
        let spec = build_spec(
            validated,
            profile,
            signing_key,
            input.authority,
            input.validity,
            input.is_root,
        )?;
        let authority_arn = spec.authority().map(|a| a.authority_arn.clone());
        let common_name = spec.subject().common_name.clone();
        let sans = spec.subject().subject_alternative_names.clone();

        info!(
            %request_id,
            common_name = %common_name,
            backend_code = %spec.backend_code(),
            template = %spec.template(),
            key = %spec.signing_key(),
            "issuing certificate"
        );

        // 5. Hand off. The specification is consumed here.
        let certificate = self.backend.issue(spec).await.inspect_err(|e| {
            warn!(%request_id, error = %e, transient = e.is_transient(), "backend issuance failed")
        })?;

        // 6. Record.
        let metadata = CertificateMetadata::new(NewCertificateMetadata {
            serial_number: certificate.serial_number.clone(),
            common_name,
            subject_alternative_names: sans,
            issued_at: certificate.not_before,
            expires_at: certificate.not_after,
            ca_serial_number: certificate.issuer_serial_number.clone(),
            certificate_authority_arn: authority_arn,
        })?;

        info!(
            %request_id,
            serial_number = %metadata.serial_number(),
            expires_at = %metadata.expires_at(),
            "certificate issued"
        );

        Ok(IssueOutput {
            certificate,
            metadata,
        })
    }
}
