//! Interface to the service that turns a signing specification into a
//! certificate.

use castellan_core::error::CastellanResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::spec::SigningSpecification;

/// What a backend returns for a successful issuance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub certificate_pem: String,
    pub certificate_chain_pem: String,
    pub serial_number: String,
    /// Serial number of the certificate that signed this one.
    pub issuer_serial_number: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// A certificate-signing backend, such as a private CA.
///
/// Failures use [`castellan_core::CastellanError::SigningBackend`] and say
/// whether they are transient. Retrying is left to the caller.
pub trait SigningBackend: Send + Sync {
    fn issue(
        &self,
        spec: SigningSpecification,
    ) -> impl Future<Output = CastellanResult<IssuedCertificate>> + Send;
}
