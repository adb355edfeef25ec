//! Configuration sections read at startup.

use std::time::Duration;

use castellan_core::models::attestation::NodeAttestationMode;
use castellan_core::models::authority::AuthorityTarget;
use castellan_core::models::certificate::ValidityPeriod;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::provider::{ConfigProvider, Validatable};

/// The private CA certificates are issued under (`[authority]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthorityConfig {
    pub region: String,
    pub authority_arn: String,
    /// Role ARN to assume before calling the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role: Option<String>,
    /// Default certificate validity in days.
    pub validity_days: u32,
    /// Whether the authority is a root CA rather than a subordinate.
    #[serde(default)]
    pub root_ca: bool,
}

impl AuthorityConfig {
    pub fn target(&self) -> AuthorityTarget {
        AuthorityTarget {
            region: self.region.clone(),
            authority_arn: self.authority_arn.clone(),
            assume_role: self.assume_role.clone(),
        }
    }

    pub fn validity(&self) -> ValidityPeriod {
        ValidityPeriod::days(self.validity_days)
    }
}

impl Validatable for AuthorityConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.region.trim().is_empty() {
            return Err(ValidationError::new("region must not be empty"));
        }
        if !self.authority_arn.starts_with("arn:") {
            return Err(ValidationError::new(format!(
                "authority_arn {:?} is not an ARN",
                self.authority_arn
            )));
        }
        if let Some(role) = &self.assume_role {
            if !role.starts_with("arn:") {
                return Err(ValidationError::new(format!(
                    "assume_role {role:?} is not an ARN"
                )));
            }
        }
        if self.validity_days == 0 {
            return Err(ValidationError::new("validity_days must be positive"));
        }
        Ok(())
    }
}

/// Signing call settings (`[signing]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SigningConfig {
    /// Upper bound for a single custodian signing call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl SigningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Validatable for SigningConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 {
            return Err(ValidationError::new("timeout_ms must be positive"));
        }
        Ok(())
    }
}

/// How callers are attested (`[attestation]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AttestationConfig {
    pub mode: NodeAttestationMode,
}

impl Validatable for AttestationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// All startup settings except the policy tables.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub authority: AuthorityConfig,
    pub signing: SigningConfig,
    pub attestation: AttestationConfig,
}

impl ServiceSettings {
    /// Load every section. `[authority]` is required; the other sections
    /// fall back to their defaults when absent.
    pub fn load(provider: &impl ConfigProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            authority: provider.get_validated("authority")?,
            signing: optional_section(provider, "signing")?,
            attestation: optional_section(provider, "attestation")?,
        })
    }
}

fn optional_section<T>(provider: &impl ConfigProvider, path: &str) -> Result<T, ConfigError>
where
    T: Default + serde::de::DeserializeOwned + Validatable,
{
    if provider.exists(path) {
        provider.get_validated(path)
    } else {
        Ok(T::default())
    }
}
