//! # User Settings
//!
//! Optional per-user defaults for the command-line flags, read from
//! `settings.toml` in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use doctor_core::{Ecosystem, OAuthFlow};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Defaults applied when a flag is not given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorSettings {
  /// Ecosystem assumed when `--language` is omitted
  pub language: Option<Ecosystem>,
  /// OAuth flow assumed when `--oauth-type` is omitted
  pub oauth_type: Option<OAuthFlow>,
  /// Mask sensitive values when printing records
  pub hide_pii: bool,
}

impl DoctorSettings {
  /// Path of the settings file for the current user
  pub fn settings_path() -> Result<PathBuf> {
    let proj_dirs =
      ProjectDirs::from("com", "google", "oauth-doctor").context("Failed to determine project directories")?;
    Ok(proj_dirs.config_dir().join(SETTINGS_FILE_NAME))
  }

  /// Load the user's settings, or defaults when there is no settings file
  pub fn load() -> Result<Self> {
    Self::load_from_path(&Self::settings_path()?)
  }

  /// Load settings from `path`, or defaults when it does not exist
  pub fn load_from_path(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No settings file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    debug!("Loaded settings from {}", path.display());
    Ok(settings)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_missing_settings_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = DoctorSettings::load_from_path(&temp_dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, DoctorSettings::default());
    assert!(!settings.hide_pii);
  }

  #[test]
  fn test_load_full_settings() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(
      &path,
      "language = \"dotnet\"\noauth_type = \"service-account\"\nhide_pii = true\n",
    )
    .unwrap();

    let settings = DoctorSettings::load_from_path(&path).unwrap();
    assert_eq!(settings.language, Some(Ecosystem::Dotnet));
    assert_eq!(settings.oauth_type, Some(OAuthFlow::ServiceAccount));
    assert!(settings.hide_pii);
  }

  #[test]
  fn test_partial_settings_keep_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(&path, "language = \"java\"\n").unwrap();

    let settings = DoctorSettings::load_from_path(&path).unwrap();
    assert_eq!(settings.language, Some(Ecosystem::Java));
    assert_eq!(settings.oauth_type, None);
    assert!(!settings.hide_pii);
  }

  #[test]
  fn test_unknown_language_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(&path, "language = \"cobol\"\n").unwrap();

    let err = DoctorSettings::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse settings"), "{err}");
  }

  #[test]
  fn test_settings_round_trip_through_toml() {
    let settings = DoctorSettings {
      language: Some(Ecosystem::Php),
      oauth_type: Some(OAuthFlow::InstalledApp),
      hide_pii: true,
    };
    let content = toml::to_string_pretty(&settings).unwrap();
    assert!(content.contains("oauth_type = \"installed-app\""), "{content}");
    assert_eq!(toml::from_str::<DoctorSettings>(&content).unwrap(), settings);
  }
}
