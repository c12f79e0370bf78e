//! Resolves which credential file an ecosystem reads.

use std::path::Path;

use directories::BaseDirs;

use crate::error::{ConfigError, Result};
use crate::lexicon;
use crate::model::{ConfigLocation, Ecosystem};

/// Return the given path, or the ecosystem's conventional file in the home
/// directory when none is given
pub fn resolve(ecosystem: Ecosystem, path: Option<&Path>) -> Result<ConfigLocation> {
  match path {
    Some(path) => Ok(ConfigLocation::from_path(path)),
    None => {
      let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
      Ok(ConfigLocation::new(
        base_dirs.home_dir(),
        lexicon::lookup(ecosystem).default_file_name,
      ))
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use doctor_test_utils::HomeEnvTestGuard;
  use test_case::test_case;

  use super::*;

  #[test_case(Ecosystem::Python, "google-ads.yaml" ; "python")]
  #[test_case(Ecosystem::Ruby, "google_ads_config.rb" ; "ruby")]
  #[test_case(Ecosystem::Dotnet, "App.Config" ; "dotnet")]
  #[test_case(Ecosystem::Php, "google_ads_php.ini" ; "php")]
  #[test_case(Ecosystem::Java, "ads.properties" ; "java")]
  fn test_resolve_default_config_file(ecosystem: Ecosystem, file_name: &str) {
    let home = HomeEnvTestGuard::new();

    let location = resolve(ecosystem, None).unwrap();
    assert_eq!(location, ConfigLocation::new(home.home_dir(), file_name));
  }

  #[test]
  fn test_resolve_given_path() {
    let location = resolve(Ecosystem::Java, Some(Path::new("/random/config/filepath"))).unwrap();
    assert_eq!(location, ConfigLocation::new(PathBuf::from("/random/config"), "filepath"));
  }
}
