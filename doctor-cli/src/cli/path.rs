//! # Path Command
//!
//! Prints the resolved credential file location.

use anyhow::Result;
use clap::Args;

use super::TargetArgs;
use crate::config::DoctorSettings;
use crate::utils::output::print_warning;

/// Command for showing the credential file path
#[derive(Args)]
pub struct PathArgs {
  #[command(flatten)]
  pub target: TargetArgs,
}

/// Handle the path command
pub(crate) fn handle_path_command(args: PathArgs, settings: &DoctorSettings) -> Result<()> {
  let (ecosystem, location) = args.target.locate(settings)?;

  println!("{location}");
  if !location.path().exists() {
    print_warning(&format!("No {ecosystem} credential file exists there yet"));
  }
  Ok(())
}
