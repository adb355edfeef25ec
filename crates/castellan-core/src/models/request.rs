//! Certificate issuance requests.

use serde::{Deserialize, Serialize};

/// Distinguished-name attributes beyond the common name.
///
/// Each attribute may repeat, as X.509 allows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DistinguishedName {
    pub country: Vec<String>,
    pub province: Vec<String>,
    pub locality: Vec<String>,
    pub organization: Vec<String>,
    pub organizational_unit: Vec<String>,
}

/// A request for a certificate, as received from a client.
///
/// Algorithm, signature and profile are the raw names the client sent;
/// they mean nothing until validated against the policy registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateRequest {
    pub common_name: String,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    #[serde(default)]
    pub distinguished_name: DistinguishedName,
    /// Requested public-key algorithm name (e.g. `RSA`, `ECDSA`).
    pub key_algorithm: String,
    /// Requested key size in bits (curve size for ECDSA).
    pub key_size: u32,
    /// Requested signature algorithm name (e.g. `SHA256WITHRSA`).
    pub signature_algorithm: String,
    /// Requested certificate profile name.
    pub profile: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_subject_fields_default_to_empty() {
        let request: CertificateRequest = serde_json::from_str(
            r#"{
                "common_name": "web.example.com",
                "key_algorithm": "ECDSA",
                "key_size": 256,
                "signature_algorithm": "SHA256WITHECDSA",
                "profile": "EndEntityServerAuthCertificate"
            }"#,
        )
        .unwrap();

        assert!(request.subject_alternative_names.is_empty());
        assert_eq!(request.distinguished_name, DistinguishedName::default());
    }
}
