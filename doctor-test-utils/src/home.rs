//! HOME directory management for testing
//!
//! This module provides utilities for isolating the HOME directory during
//! testing so default config file lookups never touch the user's real files.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

/// HOME is process-wide; guards take turns
static HOME_LOCK: Mutex<()> = Mutex::new(());

/// A test environment that overrides the HOME directory to use a temporary
/// directory. Only one guard is alive at a time within a test binary.
pub struct HomeEnvTestGuard {
  /// The temporary directory that will be used as HOME
  pub temp_dir: TempDir,
  /// The original HOME value, if any
  original_home: Option<String>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl HomeEnvTestGuard {
  /// Create a new test environment with a temporary HOME directory
  pub fn new() -> Self {
    let lock = HOME_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    // Save original HOME environment variable
    let original_home = env::var("HOME").ok();

    // Override HOME to use the temporary directory
    unsafe {
      env::set_var("HOME", temp_dir.path());
    }

    Self {
      temp_dir,
      original_home,
      _lock: lock,
    }
  }

  /// Get the path to the temporary HOME directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to a file in the temporary HOME directory
  pub fn home_path(&self, relative_path: &str) -> PathBuf {
    self.temp_dir.path().join(relative_path)
  }
}

impl Drop for HomeEnvTestGuard {
  fn drop(&mut self) {
    // Restore original HOME environment variable
    match &self.original_home {
      Some(home) => unsafe {
        env::set_var("HOME", home);
      },
      None => unsafe {
        env::remove_var("HOME");
      },
    }
  }
}
