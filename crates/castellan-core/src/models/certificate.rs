//! Certificate bookkeeping records.
//!
//! A [`CertificateAuthority`] describes an authority castellan issues
//! under. A [`CertificateMetadata`] is created for every certificate that
//! was issued and is immutable afterwards, except for a single revocation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CastellanError, CastellanResult};
use crate::models::authority::{AuthorityTarget, KeyIdentity};

/// Requested certificate lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidityPeriod {
    pub days: u32,
}

impl ValidityPeriod {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::days(i64::from(self.days))
    }
}

/// An authority that certificates are issued under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateAuthority {
    /// PEM-encoded authority certificate.
    pub certificate_pem: String,
    /// Reference to the authority's signing key.
    pub key: KeyIdentity,
    pub serial_number: String,
    pub authority: AuthorityTarget,
}

/// Who revoked a certificate and when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revocation {
    pub revoked_by: String,
    pub revoked_at: DateTime<Utc>,
}

/// Fields required to record a newly issued certificate.
#[derive(Debug, Clone)]
pub struct NewCertificateMetadata {
    pub serial_number: String,
    pub common_name: String,
    pub subject_alternative_names: Vec<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Serial number of the issuing authority's certificate.
    pub ca_serial_number: String,
    pub certificate_authority_arn: Option<String>,
}

/// Record of an issued certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateMetadata {
    serial_number: String,
    common_name: String,
    subject_alternative_names: Vec<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    ca_serial_number: String,
    certificate_authority_arn: Option<String>,
    revocation: Option<Revocation>,
    recorded_at: DateTime<Utc>,
}

impl CertificateMetadata {
    /// Create a record. The expiry must fall strictly after the issue time.
    pub fn new(input: NewCertificateMetadata) -> CastellanResult<Self> {
        if input.serial_number.trim().is_empty() {
            return Err(CastellanError::InvalidRecord {
                message: "serial number is empty".into(),
            });
        }
        if input.expires_at <= input.issued_at {
            return Err(CastellanError::InvalidRecord {
                message: format!(
                    "certificate {} expires at {} which is not after its issue time {}",
                    input.serial_number, input.expires_at, input.issued_at
                ),
            });
        }

        Ok(Self {
            serial_number: input.serial_number,
            common_name: input.common_name,
            subject_alternative_names: input.subject_alternative_names,
            issued_at: input.issued_at,
            expires_at: input.expires_at,
            ca_serial_number: input.ca_serial_number,
            certificate_authority_arn: input.certificate_authority_arn,
            revocation: None,
            recorded_at: Utc::now(),
        })
    }

    /// Mark the certificate revoked.
    ///
    /// The revoked flag, revoker and timestamp are set together. A record
    /// can only be revoked once; later attempts fail and leave the
    /// first revocation in place.
    pub fn revoke(
        &mut self,
        revoked_by: impl Into<String>,
        revoked_at: DateTime<Utc>,
    ) -> CastellanResult<&Revocation> {
        if self.revocation.is_some() {
            return Err(CastellanError::AlreadyRevoked {
                serial_number: self.serial_number.clone(),
            });
        }
        Ok(&*self.revocation.insert(Revocation {
            revoked_by: revoked_by.into(),
            revoked_at,
        }))
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    pub fn subject_alternative_names(&self) -> &[String] {
        &self.subject_alternative_names
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn ca_serial_number(&self) -> &str {
        &self.ca_serial_number
    }

    pub fn certificate_authority_arn(&self) -> Option<&str> {
        self.certificate_authority_arn.as_deref()
    }

    pub fn is_revoked(&self) -> bool {
        self.revocation.is_some()
    }

    pub fn revocation(&self) -> Option<&Revocation> {
        self.revocation.as_ref()
    }

    /// When this record was created.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
