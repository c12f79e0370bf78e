//! # Language Lexicon
//!
//! Static, table-driven description of every supported client-library
//! configuration format. Parsers and the replacer consult this table instead
//! of branching on the ecosystem themselves, so supporting a new library means
//! adding one row here (and a parser, if the format is not line oriented).

use std::borrow::Cow;

use crate::model::{CredentialKey, Ecosystem};

/// How values are quoted in a line-oriented format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
  /// The value runs to the end of the line and quotes are part of it
  Raw,
  /// Values may be wrapped in single or double quotes; new values are written
  /// bare unless they need quoting
  Optional,
  /// Values are wrapped in quotes, new values in the given one
  Always(char),
}

/// How assignments are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
  /// One `key <separator> value` assignment per line
  KeyValue { separator: char, quoting: Quoting },
  /// `<add key="..." value="..."/>` elements inside an XML document
  Xml {
    /// Closing tags a new element may be inserted in front of, in order of
    /// preference
    containers: &'static [&'static str],
  },
}

impl Syntax {
  /// Whether surrounding quotes are stripped from parsed values
  pub const fn strips_quotes(self) -> bool {
    matches!(
      self,
      Syntax::KeyValue {
        quoting: Quoting::Optional | Quoting::Always(_),
        ..
      }
    )
  }
}

/// Ecosystem-specific names of the credential keys
#[derive(Debug)]
pub struct NativeKeys {
  pub developer_token: &'static str,
  pub client_id: &'static str,
  pub client_secret: &'static str,
  pub refresh_token: &'static str,
  pub login_customer_id: &'static str,
  pub delegated_account: &'static str,
  pub private_key_path: &'static str,
}

impl NativeKeys {
  const fn get(&self, key: CredentialKey) -> &'static str {
    match key {
      CredentialKey::DeveloperToken => self.developer_token,
      CredentialKey::ClientId => self.client_id,
      CredentialKey::ClientSecret => self.client_secret,
      CredentialKey::RefreshToken => self.refresh_token,
      CredentialKey::LoginCustomerId => self.login_customer_id,
      CredentialKey::DelegatedAccount => self.delegated_account,
      CredentialKey::PrivateKeyPath => self.private_key_path,
    }
  }
}

/// One row of the lexicon
#[derive(Debug)]
pub struct LanguageSpec {
  pub ecosystem: Ecosystem,
  /// File name looked up in the home directory when no path is given
  pub default_file_name: &'static str,
  /// Marker that disables an assignment line
  pub comment_prefix: &'static str,
  pub syntax: Syntax,
  /// Rendering of an active assignment, with `{key}` and `{value}` holes.
  /// Quotes are added to the value, not written here.
  pub template: &'static str,
  native_keys: NativeKeys,
}

static PYTHON: LanguageSpec = LanguageSpec {
  ecosystem: Ecosystem::Python,
  default_file_name: "google-ads.yaml",
  comment_prefix: "#",
  syntax: Syntax::KeyValue {
    separator: ':',
    quoting: Quoting::Optional,
  },
  template: "{key}:{value}",
  native_keys: NativeKeys {
    developer_token: "developer_token",
    client_id: "client_id",
    client_secret: "client_secret",
    refresh_token: "refresh_token",
    login_customer_id: "login_customer_id",
    delegated_account: "delegated_account",
    private_key_path: "path_to_private_key_file",
  },
};

static RUBY: LanguageSpec = LanguageSpec {
  ecosystem: Ecosystem::Ruby,
  default_file_name: "google_ads_config.rb",
  comment_prefix: "#",
  syntax: Syntax::KeyValue {
    separator: '=',
    quoting: Quoting::Always('"'),
  },
  template: "{key}= {value}",
  native_keys: NativeKeys {
    developer_token: "c.developer_token",
    client_id: "c.client_id",
    client_secret: "c.client_secret",
    refresh_token: "c.refresh_token",
    login_customer_id: "c.login_customer_id",
    delegated_account: "c.impersonate",
    private_key_path: "c.keyfile",
  },
};

static DOTNET: LanguageSpec = LanguageSpec {
  ecosystem: Ecosystem::Dotnet,
  default_file_name: "App.Config",
  comment_prefix: "<!--",
  syntax: Syntax::Xml {
    containers: &["</GoogleAdsApi>", "</appSettings>"],
  },
  template: "<add key=\"{key}\" value=\"{value}\"/>",
  native_keys: NativeKeys {
    developer_token: "DeveloperToken",
    client_id: "OAuth2ClientId",
    client_secret: "OAuth2ClientSecret",
    refresh_token: "OAuth2RefreshToken",
    login_customer_id: "LoginCustomerId",
    delegated_account: "OAuth2PrnEmail",
    private_key_path: "OAuth2SecretsJsonPath",
  },
};

static PHP: LanguageSpec = LanguageSpec {
  ecosystem: Ecosystem::Php,
  default_file_name: "google_ads_php.ini",
  comment_prefix: ";",
  syntax: Syntax::KeyValue {
    separator: '=',
    quoting: Quoting::Always('"'),
  },
  template: "{key}= {value}",
  native_keys: NativeKeys {
    developer_token: "developerToken",
    client_id: "clientId",
    client_secret: "clientSecret",
    refresh_token: "refreshToken",
    login_customer_id: "loginCustomerId",
    delegated_account: "impersonatedEmail",
    private_key_path: "jsonKeyFilePath",
  },
};

static JAVA: LanguageSpec = LanguageSpec {
  ecosystem: Ecosystem::Java,
  default_file_name: "ads.properties",
  comment_prefix: "#",
  syntax: Syntax::KeyValue {
    separator: '=',
    quoting: Quoting::Raw,
  },
  template: "{key}={value}",
  native_keys: NativeKeys {
    developer_token: "api.googleads.developerToken",
    client_id: "api.googleads.clientId",
    client_secret: "api.googleads.clientSecret",
    refresh_token: "api.googleads.refreshToken",
    login_customer_id: "api.googleads.loginCustomerId",
    delegated_account: "api.googleads.serviceAccountUser",
    private_key_path: "api.googleads.serviceAccountSecretsPath",
  },
};

/// Look up the lexicon row for an ecosystem
pub fn lookup(ecosystem: Ecosystem) -> &'static LanguageSpec {
  match ecosystem {
    Ecosystem::Python => &PYTHON,
    Ecosystem::Ruby => &RUBY,
    Ecosystem::Dotnet => &DOTNET,
    Ecosystem::Php => &PHP,
    Ecosystem::Java => &JAVA,
  }
}

fn other_quote(quote: char) -> char {
  if quote == '"' { '\'' } else { '"' }
}

impl LanguageSpec {
  /// The ecosystem-specific name of a credential key
  pub const fn native_key(&self, key: CredentialKey) -> &'static str {
    self.native_keys.get(key)
  }

  /// Map a native key back to its generic credential key
  pub fn key_for_native(&self, native: &str) -> Option<CredentialKey> {
    self.native_keys().find_map(|(key, name)| (name == native).then_some(key))
  }

  /// Native keys in credential key order
  pub fn native_keys(&self) -> impl Iterator<Item = (CredentialKey, &'static str)> + '_ {
    CredentialKey::ALL.into_iter().map(|key| (key, self.native_key(key)))
  }

  /// Encode `value` the way it has to appear on disk so that parsing the
  /// file gives `value` back.
  ///
  /// `current_quote` is the quote an existing assignment already uses; it is
  /// kept whenever the value allows it. The error names what the format cannot
  /// represent.
  pub fn encode_value<'a>(&self, current_quote: Option<char>, value: &'a str) -> Result<Cow<'a, str>, &'static str> {
    if value.contains(['\r', '\n']) {
      return Err("contains a line break");
    }

    let quoting = match self.syntax {
      Syntax::Xml { .. } => return Ok(quick_xml::escape::escape(value)),
      Syntax::KeyValue { quoting, .. } => quoting,
    };

    let preferred = match quoting {
      Quoting::Raw => {
        if value.starts_with(char::is_whitespace) {
          return Err("starts with whitespace");
        }
        return Ok(Cow::Borrowed(value));
      }
      Quoting::Optional => {
        let needs_quotes = value.starts_with(['"', '\'']) || value.trim() != value;
        match current_quote {
          Some(quote) => quote,
          None if needs_quotes => '"',
          None => return Ok(Cow::Borrowed(value)),
        }
      }
      Quoting::Always(quote) => current_quote.unwrap_or(quote),
    };

    let quote = if !value.contains(preferred) {
      preferred
    } else if !value.contains(other_quote(preferred)) {
      other_quote(preferred)
    } else if quoting == Quoting::Optional && !value.starts_with(['"', '\'']) && value.trim() == value {
      return Ok(Cow::Borrowed(value));
    } else {
      return Err("contains both quote characters");
    };
    Ok(Cow::Owned(format!("{quote}{value}{quote}")))
  }

  /// Render an active assignment line for `key` in this ecosystem's syntax.
  ///
  /// Values [`Self::encode_value`] rejects are flattened onto one line and
  /// written as well as the format allows.
  pub fn render(&self, key: CredentialKey, value: &str) -> String {
    let encoded = self.encode_value_lossy(None, value);
    self
      .template
      .replace("{key}", self.native_key(key))
      .replace("{value}", &encoded)
  }

  /// [`Self::encode_value`], falling back to a single-line best effort
  pub fn encode_value_lossy(&self, current_quote: Option<char>, value: &str) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    match self.encode_value(current_quote, &flat) {
      Ok(encoded) => encoded.into_owned(),
      Err(_) => match (self.syntax, current_quote) {
        (
          Syntax::KeyValue {
            quoting: Quoting::Optional | Quoting::Always(_),
            ..
          },
          Some(quote),
        )
        | (
          Syntax::KeyValue {
            quoting: Quoting::Always(quote),
            ..
          },
          None,
        ) => format!("{quote}{flat}{quote}"),
        (
          Syntax::KeyValue {
            quoting: Quoting::Optional,
            ..
          },
          None,
        ) => format!("\"{flat}\""),
        _ => flat,
      },
    }
  }

  /// Strip this ecosystem's comment marker from an already trimmed line.
  ///
  /// Returns `None` when the line is not commented out.
  pub fn uncomment<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(self.comment_prefix)?;
    let rest = match self.syntax {
      Syntax::Xml { .. } => rest.trim_end().strip_suffix("-->").unwrap_or(rest),
      // `##key: value` and `# key: value` are both disabled examples
      Syntax::KeyValue { .. } => rest.trim_start_matches(self.comment_prefix),
    };
    Some(rest.trim())
  }
}
