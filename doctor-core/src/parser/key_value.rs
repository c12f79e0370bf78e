//! Line-oriented parser for the YAML-ish, Ruby, INI and properties formats.
//!
//! The scan is best-effort: lines that do not assign a recognised key are
//! skipped so credential files can carry any amount of unrelated settings.
//! Only failing to read the file is an error.

use std::ops::Range;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;
use crate::lexicon::{self, LanguageSpec, Syntax};
use crate::model::{ConfigLocation, CredentialFields, CredentialKey, CredentialRecord, Ecosystem, OAuthFlow};
use crate::parser::read_source;

/// A recognised `key <sep> value` assignment within a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment<'a> {
  pub key: CredentialKey,
  /// The value with any surrounding quotes removed
  pub value: &'a str,
  /// Byte range of the value inside the line, quotes included
  pub raw_range: Range<usize>,
  pub quote: Option<char>,
}

/// Match a single line against every native key of `spec`.
///
/// The line may carry leading indentation and a trailing newline; the
/// returned ranges are relative to `line` itself. Commented-out lines never
/// match here, callers strip the comment marker first if they care.
pub(crate) fn match_assignment<'a>(spec: &LanguageSpec, line: &'a str) -> Option<Assignment<'a>> {
  let Syntax::KeyValue { separator, .. } = spec.syntax else {
    return None;
  };
  let quoted = spec.syntax.strips_quotes();

  let start = line.len() - line.trim_start().len();
  // Unquoted values keep trailing whitespace
  let body = if quoted {
    line[start..].trim_end()
  } else {
    line[start..].trim_end_matches(['\r', '\n'])
  };

  spec.native_keys().find_map(|(key, native)| {
    let rest = body.strip_prefix(native)?;
    let after_sep = rest.trim_start().strip_prefix(separator)?;
    let raw = after_sep.trim_start();
    let raw_start = start + body.len() - after_sep.trim_start().len();

    let quote = raw.chars().next().filter(|c| quoted && (*c == '"' || *c == '\''));
    let (value, raw_len) = match quote {
      Some(q) => match raw[1..].find(q) {
        Some(end) => (&raw[1..=end], end + 2),
        // Unterminated quote, keep what is there
        None => (&raw[1..], raw.len()),
      },
      None => (raw, raw.len()),
    };

    Some(Assignment {
      key,
      value,
      raw_range: raw_start..raw_start + raw_len,
      quote,
    })
  })
}

/// Scan `content` and store every recognised assignment in `fields`.
///
/// Later assignments of the same key win, mirroring how the client libraries
/// themselves read these files.
pub fn scan(ecosystem: Ecosystem, content: &str, fields: &mut CredentialFields) {
  let spec = lexicon::lookup(ecosystem);

  for line in content.lines() {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(spec.comment_prefix) {
      continue;
    }

    match match_assignment(spec, line) {
      Some(assignment) => {
        debug!("Found {} in {} config", assignment.key, ecosystem);
        fields.set(assignment.key, assignment.value);
      }
      None => trace!("Skipping unrecognized line: {trimmed}"),
    }
  }
}

/// Populate `record` from the key/value file it points at
pub fn populate(record: &mut CredentialRecord) -> Result<()> {
  let content = read_source(&record.path())?;
  scan(record.ecosystem, &content, &mut record.fields);
  Ok(())
}

/// Parse a key/value credential file into a fresh record
pub fn parse_key_value_file(ecosystem: Ecosystem, path: &Path, flow: OAuthFlow) -> Result<CredentialRecord> {
  let mut record = CredentialRecord::new(ConfigLocation::from_path(path), ecosystem, flow);
  populate(&mut record)?;
  Ok(record)
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use doctor_test_utils::ConfigFileGuard;

  use super::*;
  use crate::error::ConfigError;

  fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
  }

  #[test]
  fn test_parse_python_config() {
    let path = testdata("python_config");
    let record = parse_key_value_file(Ecosystem::Python, &path, OAuthFlow::InstalledApp).unwrap();

    assert_eq!(record.location.dir, testdata(""));
    assert_eq!(record.location.file_name, "python_config");
    assert_eq!(record.ecosystem, Ecosystem::Python);
    assert_eq!(record.flow, OAuthFlow::InstalledApp);
    assert_eq!(
      record.fields,
      CredentialFields {
        developer_token: "GoodDevToken".into(),
        client_id: "0123456789-GoodClientID.apps.googleusercontent.com".into(),
        client_secret: "GoodClientSecret".into(),
        refresh_token: "1/PG1Ap6P-Good_Refresh_Token".into(),
        delegated_account: "example@some.web.site.com".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_parse_ruby_config_with_comments_and_unsupported_settings() {
    let path = testdata("ruby_config");
    let record = parse_key_value_file(Ecosystem::Ruby, &path, OAuthFlow::InstalledApp).unwrap();

    assert_eq!(
      record.fields,
      CredentialFields {
        client_id: "GoodClientID".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_parse_php_config_strips_quotes() {
    let path = testdata("php_config");
    let record = parse_key_value_file(Ecosystem::Php, &path, OAuthFlow::InstalledApp).unwrap();

    assert_eq!(
      record.fields,
      CredentialFields {
        developer_token: "GoodDevToken".into(),
        client_id: "GoodClientID".into(),
        client_secret: "GoodClientSecret".into(),
        refresh_token: "GoodRefreshToken".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_parse_java_config() {
    let path = testdata("java_config");
    let record = parse_key_value_file(Ecosystem::Java, &path, OAuthFlow::InstalledApp).unwrap();

    assert_eq!(
      record.fields,
      CredentialFields {
        developer_token: "GoodDevToken".into(),
        client_id: "GoodClientID".into(),
        client_secret: "GoodClientSecret".into(),
        refresh_token: "GoodRefreshToken".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_parse_missing_file() {
    let err = parse_key_value_file(Ecosystem::Java, Path::new("/no/such/ads.properties"), OAuthFlow::InstalledApp)
      .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/no/such/ads.properties"));
  }

  #[test]
  fn test_malformed_lines_are_skipped() {
    let guard = ConfigFileGuard::new(
      "google-ads.yaml",
      "developer_token\n\
       client_id client_id\n\
       :::\n\
       refresh_token_backup: nope\n\
       use_proto_plus: True\n\
       login_customer_id: 1234567890\n",
    );
    let record = parse_key_value_file(Ecosystem::Python, guard.path(), OAuthFlow::InstalledApp).unwrap();

    assert_eq!(
      record.fields,
      CredentialFields {
        login_customer_id: "1234567890".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_match_assignment_ranges() {
    let spec = lexicon::lookup(Ecosystem::Ruby);
    let line = "  c.client_id = 'abc' # keep\n";
    let assignment = match_assignment(spec, line).unwrap();

    assert_eq!(assignment.key, CredentialKey::ClientId);
    assert_eq!(assignment.value, "abc");
    assert_eq!(assignment.quote, Some('\''));
    assert_eq!(&line[assignment.raw_range], "'abc'");
  }

  #[test]
  fn test_match_assignment_requires_separator_after_key() {
    let spec = lexicon::lookup(Ecosystem::Java);
    assert!(match_assignment(spec, "api.googleads.clientIdLegacy=abc").is_none());

    let assignment = match_assignment(spec, "api.googleads.clientId = abc").unwrap();
    assert_eq!(assignment.value, "abc");
    assert_eq!(assignment.quote, None);
  }

  #[test]
  fn test_java_values_keep_quotes() {
    let mut fields = CredentialFields::default();
    scan(Ecosystem::Java, "api.googleads.clientSecret=\"quoted\"\n", &mut fields);
    assert_eq!(fields.client_secret, "\"quoted\"");
  }

  #[test]
  fn test_java_values_keep_trailing_whitespace() {
    let mut fields = CredentialFields::default();
    scan(
      Ecosystem::Java,
      "api.googleads.clientSecret=padded  \r\napi.googleads.clientId=  spaced\n",
      &mut fields,
    );
    assert_eq!(fields.client_secret, "padded  ");
    assert_eq!(fields.client_id, "spaced");
  }

  #[test]
  fn test_later_assignment_wins() {
    let mut fields = CredentialFields::default();
    scan(
      Ecosystem::Php,
      "[OAUTH2]\nclientId = \"first\"\n; clientId = \"commented\"\nclientId = \"second\"\n",
      &mut fields,
    );
    assert_eq!(fields.client_id, "second");
  }
}
