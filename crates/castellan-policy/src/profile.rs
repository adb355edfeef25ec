//! Certificate profiles: the X.509 extensions and issuance template a
//! certificate is produced with.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::registry::PolicyRegistry;

/// X.509 key usage bits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyUsage {
    DigitalSignature,
    ContentCommitment,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    CertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsage {
    /// Bit position in the usage mask, `DigitalSignature` being the lowest.
    pub fn bit(&self) -> u16 {
        let position = match self {
            KeyUsage::DigitalSignature => 0,
            KeyUsage::ContentCommitment => 1,
            KeyUsage::KeyEncipherment => 2,
            KeyUsage::DataEncipherment => 3,
            KeyUsage::KeyAgreement => 4,
            KeyUsage::CertSign => 5,
            KeyUsage::CrlSign => 6,
            KeyUsage::EncipherOnly => 7,
            KeyUsage::DecipherOnly => 8,
        };
        1 << position
    }
}

/// A set of key usages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyUsageSet(BTreeSet<KeyUsage>);

impl KeyUsageSet {
    pub fn contains(&self, usage: KeyUsage) -> bool {
        self.0.contains(&usage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyUsage> + '_ {
        self.0.iter().copied()
    }

    /// The combined usage mask.
    pub fn bits(&self) -> u16 {
        self.0.iter().fold(0, |acc, usage| acc | usage.bit())
    }
}

impl FromIterator<KeyUsage> for KeyUsageSet {
    fn from_iter<I: IntoIterator<Item = KeyUsage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// X.509 extended key usages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtendedKeyUsage {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
}

impl ExtendedKeyUsage {
    pub fn oid(&self) -> &'static str {
        match self {
            ExtendedKeyUsage::ServerAuth => "1.3.6.1.5.5.7.3.1",
            ExtendedKeyUsage::ClientAuth => "1.3.6.1.5.5.7.3.2",
            ExtendedKeyUsage::CodeSigning => "1.3.6.1.5.5.7.3.3",
            ExtendedKeyUsage::EmailProtection => "1.3.6.1.5.5.7.3.4",
            ExtendedKeyUsage::TimeStamping => "1.3.6.1.5.5.7.3.8",
            ExtendedKeyUsage::OcspSigning => "1.3.6.1.5.5.7.3.9",
        }
    }
}

/// Backend reference to an issuance template. Opaque to castellan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named certificate profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateProfile {
    pub name: String,
    pub key_usage: KeyUsageSet,
    pub extended_key_usage: Vec<ExtendedKeyUsage>,
    pub template: TemplateId,
}

/// The extension set and template a profile name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub key_usage: KeyUsageSet,
    pub extended_key_usage: Vec<ExtendedKeyUsage>,
    pub template: TemplateId,
}

/// Looks up certificate profiles by name.
///
/// Kept apart from signature validation: profiles are added without
/// touching key or signature policy.
#[derive(Debug, Clone, Copy)]
pub struct ProfileResolver<'a> {
    registry: &'a PolicyRegistry,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(registry: &'a PolicyRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, profile_name: &str) -> Result<ResolvedProfile, PolicyError> {
        let profile = self.registry.profile(profile_name)?;
        Ok(ResolvedProfile {
            key_usage: profile.key_usage.clone(),
            extended_key_usage: profile.extended_key_usage.clone(),
            template: profile.template.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_bits_match_x509_positions() {
        let set: KeyUsageSet = [KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment]
            .into_iter()
            .collect();
        assert_eq!(set.bits(), 0b101);
        assert_eq!(KeyUsage::DecipherOnly.bit(), 0x100);
    }

    #[test]
    fn resolves_builtin_server_profile() {
        let registry = PolicyRegistry::builtin();
        let resolved = ProfileResolver::new(&registry)
            .resolve("EndEntityServerAuthCertificate")
            .unwrap();

        assert!(resolved.key_usage.contains(KeyUsage::DigitalSignature));
        assert!(resolved.key_usage.contains(KeyUsage::KeyEncipherment));
        assert_eq!(resolved.key_usage.iter().count(), 2);
        assert_eq!(resolved.extended_key_usage, vec![ExtendedKeyUsage::ServerAuth]);
        assert!(
            resolved
                .template
                .as_str()
                .ends_with("/EndEntityServerAuthCertificate/V1")
        );
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let registry = PolicyRegistry::builtin();
        let err = ProfileResolver::new(&registry)
            .resolve("NotARealProfile")
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownProfile {
                name: "NotARealProfile".into()
            }
        );
    }
}
