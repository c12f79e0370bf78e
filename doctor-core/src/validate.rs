//! # Field Validator
//!
//! Checks a parsed record for the fields each OAuth flow needs and for the
//! syntactic shape of the identifiers that have one. Rules run in a fixed
//! order and the first failure is reported.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{CredentialKey, CredentialRecord, OAuthFlow};

/// Template defaults shipped with the client libraries
pub const PLACEHOLDER_DEV_TOKENS: [&str; 2] = ["INSERT_DEV_TOKEN_HERE", "INSERT_DEVELOPER_TOKEN_HERE"];

static LOGIN_CUSTOMER_ID_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Failed to compile login customer ID regex"));

static CLIENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[0-9]+-[A-Za-z0-9]+\.apps\.googleusercontent\.com$").expect("Failed to compile client ID regex")
});

/// A credential field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("DevTokenError: developer token is missing")]
  MissingDevToken,
  #[error("DevTokenError: developer token '{0}' is a template placeholder")]
  PlaceholderDevToken(String),
  #[error("LoginCustomerIDError: login customer ID '{0}' must contain digits only, without dashes")]
  LoginCustomerId(String),
  #[error("ClientIDError: client ID '{0}' is not a valid OAuth client identifier")]
  ClientId(String),
  #[error("ClientSecretError: client secret is missing")]
  ClientSecret,
  #[error("RefreshTokenError: refresh token is missing")]
  RefreshToken,
  #[error("DelegatedAccountError: delegated account is missing")]
  DelegatedAccount,
  #[error("PrivateKeyPathError: private key path is missing")]
  PrivateKeyPath,
}

impl ValidationError {
  /// The credential field the error is about
  pub const fn key(&self) -> CredentialKey {
    match self {
      ValidationError::MissingDevToken | ValidationError::PlaceholderDevToken(_) => CredentialKey::DeveloperToken,
      ValidationError::LoginCustomerId(_) => CredentialKey::LoginCustomerId,
      ValidationError::ClientId(_) => CredentialKey::ClientId,
      ValidationError::ClientSecret => CredentialKey::ClientSecret,
      ValidationError::RefreshToken => CredentialKey::RefreshToken,
      ValidationError::DelegatedAccount => CredentialKey::DelegatedAccount,
      ValidationError::PrivateKeyPath => CredentialKey::PrivateKeyPath,
    }
  }
}

/// Validate a record, returning the first rule it breaks
pub fn validate(record: &CredentialRecord) -> Result<(), ValidationError> {
  let fields = &record.fields;

  if fields.is_set(CredentialKey::LoginCustomerId) && !LOGIN_CUSTOMER_ID_PATTERN.is_match(&fields.login_customer_id) {
    return Err(ValidationError::LoginCustomerId(fields.login_customer_id.clone()));
  }

  if !fields.is_set(CredentialKey::DeveloperToken) {
    return Err(ValidationError::MissingDevToken);
  }
  if PLACEHOLDER_DEV_TOKENS.contains(&fields.developer_token.as_str()) {
    return Err(ValidationError::PlaceholderDevToken(fields.developer_token.clone()));
  }

  match record.flow {
    OAuthFlow::InstalledApp => {
      if !CLIENT_ID_PATTERN.is_match(&fields.client_id) {
        return Err(ValidationError::ClientId(fields.client_id.clone()));
      }
      if !fields.is_set(CredentialKey::ClientSecret) {
        return Err(ValidationError::ClientSecret);
      }
      if !fields.is_set(CredentialKey::RefreshToken) {
        return Err(ValidationError::RefreshToken);
      }
    }
    OAuthFlow::ServiceAccount => {
      if !fields.is_set(CredentialKey::DelegatedAccount) {
        return Err(ValidationError::DelegatedAccount);
      }
      if !fields.is_set(CredentialKey::PrivateKeyPath) {
        return Err(ValidationError::PrivateKeyPath);
      }
    }
  }

  Ok(())
}
