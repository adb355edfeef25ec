//! Integration tests for strict configuration loading.

use castellan_config::{
    AuthorityConfig, ConfigError, ConfigProvider, ServiceSettings, SigningConfig,
    TomlConfigProvider, Validatable, ValidationError,
};
use castellan_core::error::{CastellanError, ErrorClass};
use castellan_core::models::attestation::NodeAttestationMode;
use serde::Deserialize;

const VALID: &str = r#"
[authority]
region = "us-east-1"
authority_arn = "arn:aws:acm-pca:us-east-1:123456789012:certificate-authority/0a1b"
assume_role = "arn:aws:iam::123456789012:role/castellan-issuer"
validity_days = 30

[signing]
timeout_ms = 2500

[attestation]
mode = "AWS"
"#;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct Listener {
    host: String,
    port: u16,
    #[serde(default)]
    tags: Vec<String>,
}

impl Validatable for Listener {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::new("port must be non-zero"));
        }
        Ok(())
    }
}

#[test]
fn loads_all_sections() {
    let provider = TomlConfigProvider::from_toml_str(VALID).unwrap();
    let settings = ServiceSettings::load(&provider).unwrap();

    assert_eq!(settings.authority.region, "us-east-1");
    assert_eq!(
        settings.authority.target().assume_role.as_deref(),
        Some("arn:aws:iam::123456789012:role/castellan-issuer")
    );
    assert_eq!(settings.authority.validity().days, 30);
    assert!(!settings.authority.root_ca);
    assert_eq!(settings.signing.timeout().as_millis(), 2500);
    assert_eq!(settings.attestation.mode, NodeAttestationMode::CloudAttested);
}

#[test]
fn optional_sections_default() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [authority]
        region = "us-east-1"
        authority_arn = "arn:aws:acm-pca:us-east-1:1:certificate-authority/x"
        validity_days = 7
        "#,
    )
    .unwrap();
    let settings = ServiceSettings::load(&provider).unwrap();

    assert_eq!(settings.signing, SigningConfig::default());
    assert_eq!(settings.attestation.mode, NodeAttestationMode::None);
}

#[test]
fn unexpected_field_fails_before_populating() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [listener]
        host = "0.0.0.0"
        port = 8443
        protocol = "h2"
        "#,
    )
    .unwrap();

    let mut target = Listener {
        host: "keep".into(),
        port: 1,
        tags: vec![],
    };
    let err = provider.load_into("listener", &mut target).unwrap_err();

    match err {
        ConfigError::UnknownField { path, field } => {
            assert_eq!(path, "listener");
            assert_eq!(field, "protocol");
        }
        other => panic!("expected UnknownField, got {other:?}"),
    }
    assert_eq!(target.host, "keep");
    assert_eq!(target.port, 1);
}

#[test]
fn unexpected_nested_field_is_rejected() {
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Outer {
        inner: Listener,
    }

    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [outer.inner]
        host = "h"
        port = 1
        extra = true
        "#,
    )
    .unwrap();

    let err = provider.get::<Outer>("outer").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownField { ref path, ref field } if path == "outer" && field == "extra"
    ));
}

#[test]
fn aliased_and_skipped_fields_decode() {
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Upstream {
        #[serde(alias = "hostname")]
        host: String,
        #[serde(skip_serializing)]
        token: String,
    }

    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [upstream]
        hostname = "ca.internal"
        token = "t"
        "#,
    )
    .unwrap();

    let upstream = provider.get::<Upstream>("upstream").unwrap();
    assert_eq!(upstream.host, "ca.internal");
    assert_eq!(upstream.token, "t");
}

#[test]
fn unexpected_authority_field_is_rejected() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [authority]
        region = "us-east-1"
        authority_arn = "arn:aws:acm-pca:us-east-1:1:certificate-authority/x"
        validity_days = 7
        validity_dayz = 9
        "#,
    )
    .unwrap();

    let err = ServiceSettings::load(&provider).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownField { ref path, ref field } if path == "authority" && field == "validity_dayz"
    ));
}

#[test]
fn absent_path_fails_without_decoding() {
    let provider = TomlConfigProvider::from_toml_str(VALID).unwrap();
    assert!(!provider.exists("listener"));

    let err = provider.get::<Listener>("listener").unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { ref path } if path == "listener"));
}

#[test]
fn reload_replaces_every_field() {
    let first = TomlConfigProvider::from_toml_str(
        r#"
        [listener]
        host = "a"
        port = 1
        tags = ["old"]
        "#,
    )
    .unwrap();
    let second = TomlConfigProvider::from_toml_str(
        r#"
        [listener]
        host = "b"
        port = 2
        "#,
    )
    .unwrap();

    let mut target = Listener::default();
    first.load_into("listener", &mut target).unwrap();
    assert_eq!(target.tags, vec!["old".to_string()]);

    second.load_into("listener", &mut target).unwrap();
    assert_eq!(
        target,
        Listener {
            host: "b".into(),
            port: 2,
            tags: vec![],
        }
    );
}

#[test]
fn self_validation_runs_after_decoding() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [listener]
        host = "h"
        port = 0
        "#,
    )
    .unwrap();

    // Plain `get` does not validate.
    assert!(provider.get::<Listener>("listener").is_ok());

    let err = provider.get_validated::<Listener>("listener").unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

#[test]
fn invalid_authority_is_a_validation_error() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [authority]
        region = "us-east-1"
        authority_arn = "not-an-arn"
        validity_days = 30
        "#,
    )
    .unwrap();

    let err = provider
        .get_validated::<AuthorityConfig>("authority")
        .unwrap_err();
    let top: CastellanError = err.into();
    assert!(matches!(top, CastellanError::Validation { .. }));
    assert_eq!(top.class(), ErrorClass::Environment);
}

#[test]
fn type_mismatch_is_a_decode_error() {
    let provider = TomlConfigProvider::from_toml_str(
        r#"
        [signing]
        timeout_ms = "soon"
        "#,
    )
    .unwrap();
    let err = provider.get::<SigningConfig>("signing").unwrap_err();
    assert!(matches!(err, ConfigError::Decode { .. }));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = TomlConfigProvider::from_file("/nonexistent/castellan.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn env_override_feeds_strict_decoding() {
    let mut provider = TomlConfigProvider::from_toml_str(VALID).unwrap();
    provider.apply_env_overrides("CASTELLAN", [("CASTELLAN__SIGNING__TIMEOUT_MS", "750")]);

    let signing: SigningConfig = provider.get_validated("signing").unwrap();
    assert_eq!(signing.timeout_ms, 750);
}
