//! Errors raised while reading, decoding or rewriting credential files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{CredentialKey, Ecosystem};

/// Failures surfaced by the parsers, the service-account loader and the
/// replacer
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Unknown language '{0}': expected one of python, ruby, dotnet, php, java")]
  UnknownEcosystem(String),

  #[error("Could not determine the home directory for the default config file")]
  NoHomeDir,

  #[error("Failed to read config file {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("XML syntax error in {}: {message}", path.display())]
  XmlSyntax { path: PathBuf, message: String },

  #[error("No private key path is configured for the service account")]
  MissingPrivateKeyPath,

  #[error("Failed to read service account key {}: {source}", path.display())]
  ServiceAccountRead { path: PathBuf, source: io::Error },

  #[error("Failed to decode service account key {}: {source}", path.display())]
  ServiceAccountDecode {
    path: PathBuf,
    source: serde_json::Error,
  },

  #[error("Cannot write {key} to a {ecosystem} config file: the value {reason}")]
  UnrepresentableValue {
    key: CredentialKey,
    ecosystem: Ecosystem,
    reason: &'static str,
  },

  #[error("Failed to back up {}: {source}", path.display())]
  Backup { path: PathBuf, source: io::Error },

  #[error("Failed to write config file {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
