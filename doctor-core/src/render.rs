//! Human-readable rendering of a credential record.
//!
//! Output goes to a caller-supplied writer so the CLI can print to stdout and
//! tests can capture into a buffer.

use std::io::{self, Write};

use crate::lexicon;
use crate::model::{CredentialKey, CredentialRecord, OAuthFlow, ServiceAccountInfo};

/// Replacement shown for sensitive values when PII is hidden
pub const MASK: &str = "******";

fn shown(value: &str, sensitive: bool, hide_pii: bool) -> &str {
  if hide_pii && sensitive && !value.is_empty() {
    MASK
  } else {
    value
  }
}

/// Write `record` to `out`, masking sensitive values when `hide_pii` is set
pub fn print_record<W: Write>(record: &CredentialRecord, hide_pii: bool, out: &mut W) -> io::Result<()> {
  let spec = lexicon::lookup(record.ecosystem);

  writeln!(out, "Config file: {} ({})", record.location, record.ecosystem)?;
  writeln!(out, "OAuth type: {}", record.flow)?;
  for key in CredentialKey::ALL {
    let value = record.fields.get(key);
    writeln!(
      out,
      "  {:<20} {:<40} {}",
      key.name(),
      spec.native_key(key),
      shown(value, key.is_sensitive(), hide_pii)
    )?;
  }

  if record.flow == OAuthFlow::ServiceAccount {
    match &record.service_account {
      Some(info) => print_service_account(info, hide_pii, out)?,
      None => writeln!(out, "Service account: key not loaded")?,
    }
  }

  Ok(())
}

fn print_service_account<W: Write>(info: &ServiceAccountInfo, hide_pii: bool, out: &mut W) -> io::Result<()> {
  let rows = [
    ("type", info.account_type.as_str(), false),
    ("project_id", info.project_id.as_str(), false),
    ("private_key_id", info.private_key_id.as_str(), true),
    ("private_key", info.private_key.as_str(), true),
    ("client_email", info.client_email.as_str(), false),
    ("client_id", info.client_id.as_str(), true),
    ("auth_uri", info.auth_uri.as_str(), false),
    ("token_uri", info.token_uri.as_str(), false),
    ("auth_provider_x509_cert_url", info.auth_provider_x509_cert_url.as_str(), false),
    ("client_x509_cert_url", info.client_x509_cert_url.as_str(), false),
  ];

  writeln!(out, "Service account:")?;
  for (name, value, sensitive) in rows {
    // Private keys span several lines
    let value = shown(value, sensitive, hide_pii).replace('\n', "\\n");
    writeln!(out, "  {name:<28} {value}")?;
  }
  Ok(())
}
