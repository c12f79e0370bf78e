//! Parser for the XML-based (.NET `App.config`) credential format.
//!
//! Unlike the line-oriented formats, well-formedness is mandatory here: a
//! document that fails to decode is reported as an XML syntax error rather than
//! skipped. Values are applied as they are read, so fields that appear before
//! the failure point stay populated.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::lexicon;
use crate::model::{ConfigLocation, CredentialFields, CredentialRecord, Ecosystem, OAuthFlow};
use crate::parser::read_source;

/// Decode `content` and store every recognised `<add key=".." value=".."/>`
/// element in `fields`. The error is the parser's description of the first
/// syntax problem.
pub fn scan(content: &str, fields: &mut CredentialFields) -> std::result::Result<(), String> {
  let mut reader = Reader::from_str(content);
  let mut depth = 0usize;
  let mut saw_root = false;

  loop {
    match reader.read_event() {
      Ok(Event::Start(element)) => {
        depth += 1;
        saw_root = true;
        apply_element(&element, fields)?;
      }
      Ok(Event::Empty(element)) => {
        saw_root = true;
        apply_element(&element, fields)?;
      }
      Ok(Event::End(_)) => depth = depth.saturating_sub(1),
      Ok(Event::Eof) => break,
      Ok(_) => {}
      Err(err) => return Err(format!("{err} (at byte {})", reader.error_position())),
    }
  }

  if !saw_root {
    return Err("document has no root element".to_string());
  }
  if depth != 0 {
    return Err(format!("unexpected end of document with {depth} unclosed element(s)"));
  }

  Ok(())
}

fn apply_element(element: &BytesStart<'_>, fields: &mut CredentialFields) -> std::result::Result<(), String> {
  if element.local_name().as_ref() != b"add" {
    return Ok(());
  }

  let mut native = None;
  let mut value = None;
  for attr in element.attributes() {
    let attr = attr.map_err(|err| err.to_string())?;
    let decoded = attr.unescape_value().map_err(|err| err.to_string())?.into_owned();
    match attr.key.as_ref() {
      b"key" => native = Some(decoded),
      b"value" => value = Some(decoded),
      _ => {}
    }
  }

  let spec = lexicon::lookup(Ecosystem::Dotnet);
  if let (Some(native), Some(value)) = (native, value)
    && let Some(key) = spec.key_for_native(&native)
  {
    debug!("Found {} in dotnet config", key);
    fields.set(key, value);
  }

  Ok(())
}

/// Populate `record` from the XML file it points at
pub fn populate(record: &mut CredentialRecord) -> Result<()> {
  let path = record.path();
  let content = read_source(&path)?;
  scan(&content, &mut record.fields).map_err(|message| ConfigError::XmlSyntax { path, message })
}

/// Parse an XML credential file into a fresh record
pub fn parse_xml_file(path: &Path, flow: OAuthFlow) -> Result<CredentialRecord> {
  let mut record = CredentialRecord::new(ConfigLocation::from_path(path), Ecosystem::Dotnet, flow);
  populate(&mut record)?;
  Ok(record)
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
  }

  #[test]
  fn test_parse_dotnet_config() {
    let record = parse_xml_file(&testdata("dotnet_config1"), OAuthFlow::InstalledApp).unwrap();

    assert_eq!(record.location.file_name, "dotnet_config1");
    assert_eq!(record.ecosystem, Ecosystem::Dotnet);
    assert_eq!(
      record.fields,
      CredentialFields {
        developer_token: "GoodDevToken".into(),
        client_id: "0123456789-GoodClientID.apps.googleusercontent.com".into(),
        client_secret: "GoodClientSecret".into(),
        refresh_token: "1/PG1Ap6P-Good_Refresh_Token".into(),
        private_key_path: "GoodPath".into(),
        delegated_account: "example@some.website.com".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_malformed_xml_is_a_syntax_error() {
    let mut record = CredentialRecord::new(
      ConfigLocation::from_path(&testdata("dotnet_config2")),
      Ecosystem::Dotnet,
      OAuthFlow::InstalledApp,
    );

    let err = populate(&mut record).unwrap_err();
    assert!(matches!(err, ConfigError::XmlSyntax { .. }));
    assert!(err.to_string().contains("XML syntax error"), "{err}");
    assert!(err.to_string().contains("dotnet_config2"), "{err}");
    assert_eq!(record.fields, CredentialFields::default());
  }

  #[test]
  fn test_fields_before_the_failure_point_are_kept() {
    let mut fields = CredentialFields::default();
    let result = scan(
      "<configuration><GoogleAdsApi>\
       <add key=\"DeveloperToken\" value=\"early\"/>\
       </GoogleAdsAPI><add key=\"OAuth2ClientId\" value=\"late\"/></configuration>",
      &mut fields,
    );

    assert!(result.is_err());
    assert_eq!(fields.developer_token, "early");
    assert_eq!(fields.client_id, "");
  }

  #[test]
  fn test_unclosed_document_is_rejected() {
    let mut fields = CredentialFields::default();
    let err = scan("<configuration><GoogleAdsApi>", &mut fields).unwrap_err();
    assert!(err.contains("unclosed"), "{err}");

    let err = scan("", &mut fields).unwrap_err();
    assert!(err.contains("no root element"), "{err}");
  }

  #[test]
  fn test_values_are_unescaped_and_comments_ignored() {
    let mut fields = CredentialFields::default();
    scan(
      "<configuration>\n\
       <!--<add key=\"OAuth2ClientSecret\" value=\"commented\"/>-->\n\
       <add key=\"OAuth2ClientSecret\" value=\"a&amp;b\"/>\n\
       <add key=\"OAuth2Mode\" value=\"APPLICATION\"/>\n\
       </configuration>",
      &mut fields,
    )
    .unwrap();

    assert_eq!(
      fields,
      CredentialFields {
        client_secret: "a&b".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn test_missing_file_is_a_read_error() {
    let err = parse_xml_file(Path::new("/no/such/App.Config"), OAuthFlow::InstalledApp).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
