//! Loads the JSON key bundle referenced by a record's private key path.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{ConfigError, Result};
use crate::model::{CredentialKey, CredentialRecord, ServiceAccountInfo};

/// Decode the service-account key at `private-key-path` into
/// `record.service_account`.
///
/// Read and decode failures are returned as-is; the record is only touched
/// when the key decodes cleanly.
pub fn load_service_account(record: &mut CredentialRecord) -> Result<()> {
  let raw_path = record.fields.get(CredentialKey::PrivateKeyPath);
  if raw_path.is_empty() {
    return Err(ConfigError::MissingPrivateKeyPath);
  }
  let path = PathBuf::from(raw_path);

  let content = fs::read_to_string(&path).map_err(|source| ConfigError::ServiceAccountRead {
    path: path.clone(),
    source,
  })?;
  let info: ServiceAccountInfo =
    serde_json::from_str(&content).map_err(|source| ConfigError::ServiceAccountDecode {
      path: path.clone(),
      source,
    })?;

  info!("Loaded service account key for {}", info.client_email);
  record.service_account = Some(info);
  Ok(())
}
