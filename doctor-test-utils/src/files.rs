//! Scratch credential files for tests that write to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for a credential file inside its own temporary directory.
///
/// Backups written next to the file land in the same directory and are
/// removed together with it when the guard is dropped.
pub struct ConfigFileGuard {
  temp_dir: TempDir,
  path: PathBuf,
}

impl ConfigFileGuard {
  /// Create `file_name` with `content` in a fresh temporary directory
  pub fn new(file_name: &str, content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join(file_name);
    fs::write(&path, content).expect("Failed to write test config file");

    Self { temp_dir, path }
  }

  /// Copy an existing fixture into a fresh temporary directory
  pub fn from_fixture(fixture: &Path) -> Self {
    let content = fs::read_to_string(fixture).expect("Failed to read fixture");
    let file_name = fixture
      .file_name()
      .expect("Fixture path has no file name")
      .to_string_lossy()
      .into_owned();
    Self::new(&file_name, &content)
  }

  /// Path to the credential file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Directory holding the file and any backups
  pub fn dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Current content of the credential file
  pub fn read(&self) -> String {
    fs::read_to_string(&self.path).expect("Failed to read test config file")
  }

  /// Names of every other file in the directory, sorted
  pub fn siblings(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.temp_dir.path())
      .expect("Failed to list temp directory")
      .filter_map(|entry| entry.ok())
      .map(|entry| entry.file_name().to_string_lossy().into_owned())
      .filter(|name| Some(name.as_str()) != self.path.file_name().and_then(|n| n.to_str()))
      .collect();
    names.sort();
    names
  }
}
