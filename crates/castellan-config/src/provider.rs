//! Strict configuration lookup by dotted path.

use std::path::Path;

use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::{debug, info};

use crate::error::{ConfigError, ValidationError};

/// A configuration section that can check its own values after decoding.
pub trait Validatable {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Read access to a configuration tree.
///
/// `get` decodes strictly: a field in the source that the target type
/// does not know fails the whole lookup, and nothing is produced. Every
/// lookup builds a fresh value, so fields from an earlier load can never
/// survive into a later one.
pub trait ConfigProvider {
    /// The raw subtree at `path`, if present.
    fn subtree(&self, path: &str) -> Option<&Value>;

    fn exists(&self, path: &str) -> bool {
        self.subtree(path).is_some()
    }

    fn get<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let source = self.subtree(path).ok_or_else(|| ConfigError::NotFound {
            path: path.to_string(),
        })?;
        decode(path, source)
    }

    /// Like [`ConfigProvider::get`], then runs the section's own checks.
    fn get_validated<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Validatable,
    {
        let value: T = self.get(path)?;
        value.validate().map_err(|source| ConfigError::Validation {
            path: path.to_string(),
            source,
        })?;
        Ok(value)
    }

    /// Replace `target` with the validated section at `path`.
    ///
    /// `target` is left untouched when the lookup fails.
    fn load_into<T>(&self, path: &str, target: &mut T) -> Result<(), ConfigError>
    where
        T: DeserializeOwned + Validatable,
    {
        *target = self.get_validated(path)?;
        Ok(())
    }
}

/// [`ConfigProvider`] backed by a parsed TOML document.
#[derive(Debug, Clone, Default)]
pub struct TomlConfigProvider {
    root: Table,
}

impl TomlConfigProvider {
    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(config_path = %path.display(), "Loading configuration");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let root: Table = toml::from_str(contents)?;
        Ok(Self { root })
    }

    /// Override existing leaf values from environment-style variables.
    ///
    /// `PREFIX__SIGNING__TIMEOUT_MS=500` replaces `signing.timeout_ms`.
    /// Values are read as TOML scalars where possible and as strings
    /// otherwise. Variables naming a path that does not already exist are
    /// ignored. Returns the number of values replaced.
    pub fn apply_env_overrides<I, K, V>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let marker = format!("{prefix}__");
        let mut applied = 0;

        for (key, raw) in vars {
            let Some(rest) = key.as_ref().strip_prefix(&marker) else {
                continue;
            };
            let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
            if segments.iter().any(String::is_empty) {
                continue;
            }

            if let Some(slot) = leaf_mut(&mut self.root, &segments) {
                *slot = parse_scalar(raw.as_ref());
                applied += 1;
                debug!(path = %segments.join("."), "Applied environment override");
            }
        }

        applied
    }

    /// Apply overrides from the process environment.
    pub fn with_process_env(mut self, prefix: &str) -> Self {
        self.apply_env_overrides(prefix, std::env::vars());
        self
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn subtree(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

fn decode<T>(path: &str, source: &Value) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    source.clone().try_into().map_err(|e: toml::de::Error| {
        let message = e.message().to_string();
        match unknown_field_name(&message) {
            Some(field) => ConfigError::UnknownField {
                path: path.to_string(),
                field,
            },
            None => ConfigError::Decode {
                path: path.to_string(),
                message,
            },
        }
    })
}

/// Field name from serde's `deny_unknown_fields` rejection message.
fn unknown_field_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("unknown field `")?;
    rest.split_once('`').map(|(name, _)| name.to_string())
}

fn leaf_mut<'a>(root: &'a mut Table, segments: &[String]) -> Option<&'a mut Value> {
    let (last, parents) = segments.split_last()?;
    let mut table = root;
    for segment in parents {
        table = table.get_mut(segment)?.as_table_mut()?;
    }
    table.get_mut(last).filter(|v| !v.is_table())
}

fn parse_scalar(raw: &str) -> Value {
    toml::from_str::<Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
