//! # Credential Data Model
//!
//! Typed representation of a client-library credential file: where it lives,
//! which ecosystem wrote it, which OAuth flow it targets, and the credential
//! values recovered from it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Client-library ecosystems whose configuration files are understood
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
  /// `google-ads.yaml`
  Python,
  /// `google_ads_config.rb`
  Ruby,
  /// `App.Config`
  Dotnet,
  /// `google_ads_php.ini`
  Php,
  /// `ads.properties`
  Java,
}

impl Ecosystem {
  /// All supported ecosystems, in lexicon order
  pub const ALL: [Ecosystem; 5] = [
    Ecosystem::Python,
    Ecosystem::Ruby,
    Ecosystem::Dotnet,
    Ecosystem::Php,
    Ecosystem::Java,
  ];

  /// The lowercase tag used on the command line and in settings files
  pub const fn tag(self) -> &'static str {
    match self {
      Ecosystem::Python => "python",
      Ecosystem::Ruby => "ruby",
      Ecosystem::Dotnet => "dotnet",
      Ecosystem::Php => "php",
      Ecosystem::Java => "java",
    }
  }

  /// Whether the on-disk format is XML rather than line-oriented key/value text
  pub const fn is_structured(self) -> bool {
    matches!(self, Ecosystem::Dotnet)
  }
}

impl fmt::Display for Ecosystem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

impl FromStr for Ecosystem {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ecosystem::ALL
      .into_iter()
      .find(|eco| eco.tag().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| ConfigError::UnknownEcosystem(s.to_string()))
  }
}

/// OAuth authorization mode the credentials are meant for
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OAuthFlow {
  /// User-delegated installed application flow
  #[default]
  InstalledApp,
  /// Server-to-server service account flow
  ServiceAccount,
}

impl fmt::Display for OAuthFlow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OAuthFlow::InstalledApp => f.write_str("InstalledApp"),
      OAuthFlow::ServiceAccount => f.write_str("ServiceAccount"),
    }
  }
}

/// The fixed set of credential keys every ecosystem can express
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
  DeveloperToken,
  ClientId,
  ClientSecret,
  RefreshToken,
  LoginCustomerId,
  DelegatedAccount,
  PrivateKeyPath,
}

impl CredentialKey {
  pub const ALL: [CredentialKey; 7] = [
    CredentialKey::DeveloperToken,
    CredentialKey::ClientId,
    CredentialKey::ClientSecret,
    CredentialKey::RefreshToken,
    CredentialKey::LoginCustomerId,
    CredentialKey::DelegatedAccount,
    CredentialKey::PrivateKeyPath,
  ];

  /// Generic, ecosystem-independent name of the key
  pub const fn name(self) -> &'static str {
    match self {
      CredentialKey::DeveloperToken => "developer-token",
      CredentialKey::ClientId => "client-id",
      CredentialKey::ClientSecret => "client-secret",
      CredentialKey::RefreshToken => "refresh-token",
      CredentialKey::LoginCustomerId => "login-customer-id",
      CredentialKey::DelegatedAccount => "delegated-account",
      CredentialKey::PrivateKeyPath => "private-key-path",
    }
  }

  /// Values that must never be echoed when PII is hidden
  pub const fn is_sensitive(self) -> bool {
    matches!(
      self,
      CredentialKey::DeveloperToken | CredentialKey::ClientId | CredentialKey::ClientSecret | CredentialKey::RefreshToken
    )
  }
}

impl fmt::Display for CredentialKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Credential values keyed by [`CredentialKey`]; an empty string means unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFields {
  pub developer_token: String,
  pub client_id: String,
  pub client_secret: String,
  pub refresh_token: String,
  pub login_customer_id: String,
  pub delegated_account: String,
  pub private_key_path: String,
}

impl CredentialFields {
  pub fn get(&self, key: CredentialKey) -> &str {
    match key {
      CredentialKey::DeveloperToken => &self.developer_token,
      CredentialKey::ClientId => &self.client_id,
      CredentialKey::ClientSecret => &self.client_secret,
      CredentialKey::RefreshToken => &self.refresh_token,
      CredentialKey::LoginCustomerId => &self.login_customer_id,
      CredentialKey::DelegatedAccount => &self.delegated_account,
      CredentialKey::PrivateKeyPath => &self.private_key_path,
    }
  }

  pub fn set(&mut self, key: CredentialKey, value: impl Into<String>) {
    let slot = match key {
      CredentialKey::DeveloperToken => &mut self.developer_token,
      CredentialKey::ClientId => &mut self.client_id,
      CredentialKey::ClientSecret => &mut self.client_secret,
      CredentialKey::RefreshToken => &mut self.refresh_token,
      CredentialKey::LoginCustomerId => &mut self.login_customer_id,
      CredentialKey::DelegatedAccount => &mut self.delegated_account,
      CredentialKey::PrivateKeyPath => &mut self.private_key_path,
    };
    *slot = value.into();
  }

  /// Whether the key carries a non-empty value
  pub fn is_set(&self, key: CredentialKey) -> bool {
    !self.get(key).is_empty()
  }
}

/// Contents of a service-account JSON key bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccountInfo {
  #[serde(rename = "type")]
  pub account_type: String,
  pub project_id: String,
  pub private_key_id: String,
  pub private_key: String,
  pub client_email: String,
  pub client_id: String,
  pub auth_uri: String,
  pub token_uri: String,
  pub auth_provider_x509_cert_url: String,
  pub client_x509_cert_url: String,
}

/// Directory and file name of a credential file on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLocation {
  pub dir: PathBuf,
  pub file_name: String,
}

impl ConfigLocation {
  pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
    Self {
      dir: dir.into(),
      file_name: file_name.into(),
    }
  }

  /// Split a full path into its directory and file name
  pub fn from_path(path: &Path) -> Self {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    Self { dir, file_name }
  }

  /// The full path to the file
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.file_name)
  }
}

impl fmt::Display for ConfigLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.path().display())
  }
}

/// A credential file and everything recovered from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
  pub location: ConfigLocation,
  pub ecosystem: Ecosystem,
  pub flow: OAuthFlow,
  pub fields: CredentialFields,
  pub service_account: Option<ServiceAccountInfo>,
}

impl CredentialRecord {
  /// Create an unpopulated record for a file
  pub fn new(location: ConfigLocation, ecosystem: Ecosystem, flow: OAuthFlow) -> Self {
    Self {
      location,
      ecosystem,
      flow,
      fields: CredentialFields::default(),
      service_account: None,
    }
  }

  /// Full path of the backing file
  pub fn path(&self) -> PathBuf {
    self.location.path()
  }

  /// Boolean form of [`crate::validate::validate`]
  pub fn is_valid(&self) -> bool {
    crate::validate::validate(self).is_ok()
  }
}
