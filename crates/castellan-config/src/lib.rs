//! Castellan Config: strict, path-addressed configuration loading.
//!
//! This crate provides:
//! - The [`ConfigProvider`] lookup interface and its TOML implementation
//! - The [`Validatable`] capability for self-checking sections
//! - The startup settings sections ([`ServiceSettings`])

mod error;
mod provider;
mod settings;

pub use error::{ConfigError, ValidationError};
pub use provider::{ConfigProvider, TomlConfigProvider, Validatable};
pub use settings::{AttestationConfig, AuthorityConfig, ServiceSettings, SigningConfig};
