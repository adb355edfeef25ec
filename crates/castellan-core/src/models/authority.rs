//! References to signing authorities and the keys they hold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an issuance request is sent: a private CA in a given region,
/// optionally reached through an assumed role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorityTarget {
    pub region: String,
    /// ARN of the certificate authority.
    pub authority_arn: String,
    /// Role ARN to assume before calling the authority, if any.
    pub assume_role: Option<String>,
}

impl AuthorityTarget {
    pub fn new(region: impl Into<String>, authority_arn: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            authority_arn: authority_arn.into(),
            assume_role: None,
        }
    }

    pub fn with_assume_role(mut self, role_arn: impl Into<String>) -> Self {
        self.assume_role = Some(role_arn.into());
        self
    }

    /// Name of the first field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.region.trim().is_empty() {
            Some("authority.region")
        } else if self.authority_arn.trim().is_empty() {
            Some("authority.authority_arn")
        } else if self.assume_role.as_deref().is_some_and(|r| r.trim().is_empty()) {
            Some("authority.assume_role")
        } else {
            None
        }
    }
}

/// Opaque reference to a signing key.
///
/// Never carries key material: for local keys it is a fingerprint of the
/// public key, for custodian keys the authority reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct KeyIdentity(String);

impl KeyIdentity {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who holds the private key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyCustody {
    /// Held in process memory for the duration of one issuance.
    Local,
    /// Held by an external custodian; only a reference is known here.
    Custodian,
}
