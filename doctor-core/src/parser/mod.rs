//! # Credential File Parsers
//!
//! Dispatches to the line-oriented or the XML parser based on the record's
//! ecosystem.

pub mod key_value;
pub mod xml;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::model::{ConfigLocation, CredentialRecord, Ecosystem, OAuthFlow};

/// Read a credential file as UTF-8 text
pub(crate) fn read_source(path: &Path) -> Result<String> {
  fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })
}

/// Fill an unpopulated record from the file it points at.
///
/// On failure the record keeps whatever was decoded before the error.
pub fn populate(record: &mut CredentialRecord) -> Result<()> {
  debug!("Parsing {} config at {}", record.ecosystem, record.location);
  if record.ecosystem.is_structured() {
    xml::populate(record)
  } else {
    key_value::populate(record)
  }
}

/// Parse the credential file at `location`
pub fn parse(ecosystem: Ecosystem, location: ConfigLocation, flow: OAuthFlow) -> Result<CredentialRecord> {
  let mut record = CredentialRecord::new(location, ecosystem, flow);
  populate(&mut record)?;
  Ok(record)
}
