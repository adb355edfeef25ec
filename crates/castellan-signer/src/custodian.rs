//! Keys held by an external custodian, such as a cloud private CA.
//!
//! Only a reference to the authority is held here. Signing is delegated
//! over the network and bounded by a timeout; dropping the returned
//! future cancels the call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use castellan_core::models::algorithm::{BackendSigningCode, SigningScheme};
use castellan_core::models::authority::{AuthorityTarget, KeyCustody, KeyIdentity};
use thiserror::Error;

use crate::error::SignerError;
use crate::key::SigningKey;

/// One signing call sent to a custodian.
#[derive(Debug, Clone, Copy)]
pub struct CustodianSignRequest<'a> {
    pub authority: &'a AuthorityTarget,
    pub backend_code: BackendSigningCode,
    pub message: &'a [u8],
}

/// Failure reported by a custodian.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CustodianError {
    pub message: String,
    /// Whether the same call may succeed later (throttling, network).
    pub transient: bool,
}

impl CustodianError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }
}

/// Client for the service that holds the key material. Role elevation,
/// if the authority asks for it, is the client's job.
pub trait KeyCustodian: Send + Sync {
    fn sign(
        &self,
        request: CustodianSignRequest<'_>,
    ) -> impl Future<Output = Result<Vec<u8>, CustodianError>> + Send;
}

/// A signing key that never leaves its custodian.
pub struct CustodianBackedKey<C> {
    custodian: Arc<C>,
    authority: AuthorityTarget,
    timeout: Duration,
}

impl<C: KeyCustodian> CustodianBackedKey<C> {
    pub fn new(custodian: Arc<C>, authority: AuthorityTarget, timeout: Duration) -> Self {
        Self {
            custodian,
            authority,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<C: KeyCustodian> SigningKey for CustodianBackedKey<C> {
    fn identity(&self) -> KeyIdentity {
        KeyIdentity::new(format!(
            "custodian:{}:{}",
            self.authority.region, self.authority.authority_arn
        ))
    }

    fn custody(&self) -> KeyCustody {
        KeyCustody::Custodian
    }

    fn authority(&self) -> Option<&AuthorityTarget> {
        Some(&self.authority)
    }

    async fn sign(&self, scheme: SigningScheme, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        if !scheme.algorithm.is_supported() {
            return Err(SignerError::UnsupportedScheme(scheme.algorithm));
        }

        let call = self.custodian.sign(CustodianSignRequest {
            authority: &self.authority,
            backend_code: scheme.backend_code,
            message,
        });

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(signature)) => Ok(signature),
            Ok(Err(err)) => Err(SignerError::Backend {
                authority_arn: self.authority.authority_arn.clone(),
                message: err.message,
                transient: err.transient,
            }),
            Err(_) => Err(SignerError::Timeout {
                authority_arn: self.authority.authority_arn.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

impl<C> fmt::Debug for CustodianBackedKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustodianBackedKey")
            .field("authority", &self.authority)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
