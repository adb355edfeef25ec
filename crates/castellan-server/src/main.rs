//! Castellan: resolves a certificate request read from stdin into the
//! signing specification a backend would receive.
//!
//! Stdout carries only the specification JSON. Logs go to stderr.

use std::process::ExitCode;

use castellan_config::{ConfigProvider, ServiceSettings, TomlConfigProvider};
use castellan_core::error::{CastellanError, CastellanResult};
use castellan_core::models::attestation::InstanceIdentityEvidence;
use castellan_core::models::request::CertificateRequest;
use castellan_policy::{CompatibilityValidator, PolicyRegistry, ProfileResolver, build_spec};
use castellan_signer::{LocallyHeldKey, SigningKey};
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "castellan.toml";
const ENV_PREFIX: &str = "CASTELLAN";

/// Body read from stdin.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResolveInput {
    request: CertificateRequest,
    #[serde(default)]
    evidence: Option<InstanceIdentityEvidence>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("castellan=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, class = ?e.class(), "castellan failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CastellanResult<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CASTELLAN_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let provider = TomlConfigProvider::from_file(&path)?.with_process_env(ENV_PREFIX);
    let settings = ServiceSettings::load(&provider)?;
    let registry = PolicyRegistry::load_or_retain(&provider, None)?;
    tracing::info!(
        region = %settings.authority.region,
        authority_arn = %settings.authority.authority_arn,
        attestation = %settings.attestation.mode,
        policy_configured = provider.exists("policy"),
        "configuration loaded"
    );

    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .map_err(|e| invalid_input(format!("failed to read stdin: {e}")))?;
    let input: ResolveInput = serde_json::from_str(&body)
        .map_err(|e| invalid_input(format!("malformed request: {e}")))?;

    let mode = settings.attestation.mode;
    if mode.requires_evidence() && input.evidence.as_ref().is_none_or(|e| e.is_empty()) {
        return Err(CastellanError::AttestationEvidenceMissing {
            mode: mode.to_string(),
        });
    }

    let validated = CompatibilityValidator::new(&registry).validate(&input.request)?;
    let profile = ProfileResolver::new(&registry).resolve(validated.profile())?;

    // The subject key for the CSR lives only as long as this call.
    let key = LocallyHeldKey::generate(validated.key_algorithm(), validated.key_size())?;
    tracing::debug!(key = %key.identity(), "generated subject key");

    let spec = build_spec(
        validated,
        profile,
        &key,
        Some(settings.authority.target()),
        settings.authority.validity(),
        settings.authority.root_ca,
    )?;

    let rendered = serde_json::to_string_pretty(&spec).map_err(|e| CastellanError::Validation {
        message: format!("failed to render specification: {e}"),
    })?;
    println!("{rendered}");
    Ok(())
}

fn invalid_input(message: String) -> CastellanError {
    CastellanError::InvalidRequest { message }
}
