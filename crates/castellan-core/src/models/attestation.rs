//! Node attestation modes.
//!
//! Attestation itself happens upstream; this crate only carries the mode a
//! request was authenticated under and the evidence that came with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CastellanError;

/// How the calling node proved its identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NodeAttestationMode {
    /// No attestation; the caller is trusted by other means.
    #[default]
    None,
    /// Cloud instance identity document, signed by the provider.
    #[serde(rename = "AWS", alias = "CloudAttested")]
    CloudAttested,
}

impl NodeAttestationMode {
    pub fn requires_evidence(&self) -> bool {
        match self {
            NodeAttestationMode::None => false,
            NodeAttestationMode::CloudAttested => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAttestationMode::None => "None",
            NodeAttestationMode::CloudAttested => "AWS",
        }
    }
}

impl fmt::Display for NodeAttestationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeAttestationMode {
    type Err = CastellanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(NodeAttestationMode::None),
            "AWS" | "CloudAttested" => Ok(NodeAttestationMode::CloudAttested),
            other => Err(CastellanError::Validation {
                message: format!("unknown node attestation mode: {other}"),
            }),
        }
    }
}

/// Signed instance identity document presented by a cloud-attested node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceIdentityEvidence {
    pub instance_identity_document: Vec<u8>,
    pub instance_identity_signature: Vec<u8>,
}

impl InstanceIdentityEvidence {
    pub fn is_empty(&self) -> bool {
        self.instance_identity_document.is_empty() || self.instance_identity_signature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cloud_attestation_requires_evidence() {
        assert!(!NodeAttestationMode::None.requires_evidence());
        assert!(NodeAttestationMode::CloudAttested.requires_evidence());
    }

    #[test]
    fn parses_configured_names() {
        assert_eq!(
            "AWS".parse::<NodeAttestationMode>().unwrap(),
            NodeAttestationMode::CloudAttested
        );
        assert_eq!(
            "None".parse::<NodeAttestationMode>().unwrap(),
            NodeAttestationMode::None
        );
        assert!("TPM".parse::<NodeAttestationMode>().is_err());
    }

    #[test]
    fn serde_accepts_both_spellings() {
        let a: NodeAttestationMode = serde_json::from_str("\"AWS\"").unwrap();
        let b: NodeAttestationMode = serde_json::from_str("\"CloudAttested\"").unwrap();
        assert_eq!(a, b);
    }
}
