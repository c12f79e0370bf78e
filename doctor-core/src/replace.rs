//! # Replacer
//!
//! Edits a single credential assignment in place while leaving the rest of
//! the file as the user wrote it. An active assignment has its value swapped;
//! a commented-out example is kept as a marker and a live assignment is added
//! right after it; otherwise a new assignment is appended (or, for XML,
//! inserted into the settings section). Nothing is ever deleted.

use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::lexicon::{self, LanguageSpec, Syntax};
use crate::model::{ConfigLocation, CredentialKey, CredentialRecord};
use crate::parser::key_value::match_assignment;
use crate::parser::read_source;

/// An `<add ...>` tag; quoted attribute values may hold `>` and span lines
static ADD_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<add\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("Failed to compile add element regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Failed to compile attribute regex")
});

/// A comment, or an unterminated one running to the end of the document
static COMMENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("Failed to compile comment regex"));

/// Byte offsets of an `<add>` element within the whole document
struct AddElement {
  tag: Range<usize>,
  key: Option<String>,
  value: Option<Range<usize>>,
}

/// Split `text` into alternating plain and commented spans
fn spans(text: &str) -> Vec<(Range<usize>, bool)> {
  let mut spans = Vec::new();
  let mut cursor = 0;
  for comment in COMMENT.find_iter(text) {
    if cursor < comment.start() {
      spans.push((cursor..comment.start(), false));
    }
    spans.push((comment.range(), true));
    cursor = comment.end();
  }
  if cursor < text.len() {
    spans.push((cursor..text.len(), false));
  }
  spans
}

fn add_elements(text: &str, span: Range<usize>) -> Vec<AddElement> {
  ADD_ELEMENT
    .find_iter(&text[span.clone()])
    .map(|tag| {
      let start = span.start + tag.start();
      // Attributes follow the `<add` name
      let attrs_start = start + "<add".len();
      let mut element = AddElement {
        tag: start..span.start + tag.end(),
        key: None,
        value: None,
      };
      for caps in ATTRIBUTE.captures_iter(&text[attrs_start..element.tag.end]) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
          continue;
        };
        match name.as_str() {
          "key" => element.key = Some(value.as_str().to_string()),
          "value" => element.value = Some(attrs_start + value.start()..attrs_start + value.end()),
          _ => {}
        }
      }
      element
    })
    .collect()
}

/// Whether a commented-out line carries an example assignment for `key`
fn is_disabled_assignment(spec: &LanguageSpec, line: &str, key: CredentialKey) -> bool {
  spec
    .uncomment(line.trim())
    .and_then(|rest| match_assignment(spec, rest))
    .is_some_and(|a| a.key == key)
}

fn splice(line: &str, range: Range<usize>, replacement: &str) -> String {
  let mut out = String::with_capacity(line.len() + replacement.len());
  out.push_str(&line[..range.start]);
  out.push_str(replacement);
  out.push_str(&line[range.end..]);
  out
}

/// Insert `rendered` as a line of its own at byte offset `at`
fn insert_line_at(text: &str, at: usize, rendered: &str) -> String {
  let mut out = String::with_capacity(text.len() + rendered.len() + 2);
  out.push_str(&text[..at]);
  if !out.is_empty() && !out.ends_with('\n') {
    out.push('\n');
  }
  out.push_str(rendered);
  out.push('\n');
  out.push_str(&text[at..]);
  out
}

/// Insert `rendered` in front of the closing tag at `pos`, on its own line
fn insert_before_tag(text: &str, pos: usize, rendered: &str) -> String {
  let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
  let at = if text[line_start..pos].trim().is_empty() {
    line_start
  } else {
    pos
  };
  insert_line_at(text, at, rendered)
}

fn append_xml(containers: &[&str], text: &str, rendered: &str) -> String {
  for container in containers {
    if let Some(pos) = text.rfind(container) {
      return insert_before_tag(text, pos, rendered);
    }
  }
  if let Some(pos) = text.rfind("</configuration>") {
    return insert_before_tag(text, pos, &format!("<appSettings>\n{rendered}\n</appSettings>"));
  }
  insert_line_at(text, text.len(), rendered)
}

fn replace_lines(spec: &LanguageSpec, key: CredentialKey, value: &str, source: &str) -> String {
  let mut out = String::with_capacity(source.len() + value.len());
  let mut replaced = false;
  let mut disabled_end: Option<usize> = None;

  for line in source.split_inclusive('\n') {
    if line.trim_start().starts_with(spec.comment_prefix) {
      if disabled_end.is_none() && is_disabled_assignment(spec, line, key) {
        disabled_end = Some(out.len() + line.len());
      }
      out.push_str(line);
    } else if let Some(assignment) = match_assignment(spec, line).filter(|a| a.key == key) {
      debug!("Replacing active {} assignment", key);
      let encoded = spec.encode_value_lossy(assignment.quote, value);
      out.push_str(&splice(line, assignment.raw_range, &encoded));
      replaced = true;
    } else {
      out.push_str(line);
    }
  }

  if replaced {
    return out;
  }

  let rendered = spec.render(key, value);
  match disabled_end {
    Some(at) => {
      debug!("Adding {} after its commented-out example", key);
      insert_line_at(&out, at, &rendered)
    }
    None => {
      debug!("Appending new {} assignment", key);
      insert_line_at(&out, out.len(), &rendered)
    }
  }
}

fn replace_xml(
  spec: &LanguageSpec,
  containers: &[&str],
  key: CredentialKey,
  value: &str,
  source: &str,
) -> String {
  let native = spec.native_key(key);
  let escaped = spec.encode_value_lossy(None, value);

  let mut edits: Vec<(Range<usize>, String)> = Vec::new();
  let mut disabled_end: Option<usize> = None;
  for (span, commented) in spans(source) {
    let matching = add_elements(source, span.clone())
      .into_iter()
      .filter(|element| element.key.as_deref() == Some(native));
    for element in matching {
      if commented {
        if disabled_end.is_none() {
          disabled_end = Some(span.end);
        }
        continue;
      }
      match element.value {
        Some(range) => edits.push((range, escaped.clone())),
        None => {
          let close = if source[element.tag.clone()].ends_with("/>") { 2 } else { 1 };
          let at = element.tag.end - close;
          edits.push((at..at, format!(" value=\"{escaped}\"")));
        }
      }
    }
  }

  if !edits.is_empty() {
    debug!("Replacing {} active {} element(s)", edits.len(), key);
    let mut text = source.to_string();
    for (range, replacement) in edits.into_iter().rev() {
      text.replace_range(range, &replacement);
    }
    return text;
  }

  let rendered = spec.render(key, value);
  match disabled_end {
    Some(end) => {
      debug!("Adding {} after its commented-out example", key);
      let at = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);
      insert_line_at(source, at, &rendered)
    }
    None => {
      debug!("Appending new {} element", key);
      append_xml(containers, source, &rendered)
    }
  }
}

/// Compute the updated file content with `key` set to `value`.
///
/// This is a pure text transform and never fails; in the worst case the new
/// assignment is appended. Values the format cannot hold faithfully (see
/// [`LanguageSpec::encode_value`]) are still written on a single line.
pub fn replace(record: &CredentialRecord, key: CredentialKey, value: &str, source: &str) -> String {
  let spec = lexicon::lookup(record.ecosystem);
  match spec.syntax {
    Syntax::KeyValue { .. } => replace_lines(spec, key, value, source),
    Syntax::Xml { containers } => replace_xml(spec, containers, key, value, source),
  }
}

fn backup_error(location: &ConfigLocation, source: io::Error) -> ConfigError {
  ConfigError::Backup {
    path: location.path(),
    source,
  }
}

/// Copy `content` to a sibling backup named `<file>_<YYYY-MM-DD>_<random>`
fn write_backup(location: &ConfigLocation, content: &str) -> Result<PathBuf> {
  let prefix = format!("{}_{}_", location.file_name, Local::now().format("%Y-%m-%d"));
  let mut file = tempfile::Builder::new()
    .prefix(&prefix)
    .tempfile_in(&location.dir)
    .map_err(|err| backup_error(location, err))?;

  file
    .write_all(content.as_bytes())
    .and_then(|()| file.as_file().sync_all())
    .map_err(|err| backup_error(location, err))?;

  let (_, path) = file.keep().map_err(|err| backup_error(location, err.error))?;
  Ok(path)
}

/// Set `key` to `value` in the record's file, keeping a backup of the
/// previous content. Returns the backup path.
///
/// Values the format cannot hold are rejected before anything is touched.
/// The backup is fully written before the original is overwritten.
pub fn replace_in_file(record: &mut CredentialRecord, key: CredentialKey, value: &str) -> Result<PathBuf> {
  lexicon::lookup(record.ecosystem)
    .encode_value(None, value)
    .map_err(|reason| ConfigError::UnrepresentableValue {
      key,
      ecosystem: record.ecosystem,
      reason,
    })?;

  let path = record.path();
  let source = read_source(&path)?;
  let updated = replace(record, key, value, &source);

  let backup = write_backup(&record.location, &source)?;
  info!("Backed up {} to {}", path.display(), backup.display());

  fs::write(&path, updated).map_err(|source| ConfigError::Write {
    path: path.clone(),
    source,
  })?;
  info!("Updated {} in {}", key, path.display());

  record.fields.set(key, value);
  Ok(backup)
}
