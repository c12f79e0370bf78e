//! # Set Command
//!
//! Replaces one credential field in place after backing up the file.

use anyhow::{Context, Result};
use clap::Args;
use doctor_core::{CredentialKey, CredentialRecord, replace_in_file};

use super::TargetArgs;
use crate::config::DoctorSettings;
use crate::utils::output::{format_field, format_path, print_info, print_success};

/// Command for setting a credential field
#[derive(Args)]
pub struct SetArgs {
  /// Field to set
  #[arg(value_enum)]
  pub field: CredentialKey,

  /// New value for the field
  pub value: String,

  #[command(flatten)]
  pub target: TargetArgs,
}

/// Handle the set command
pub(crate) fn handle_set_command(args: SetArgs, settings: &DoctorSettings) -> Result<()> {
  let (ecosystem, location) = args.target.locate(settings)?;
  let flow = settings.oauth_type.unwrap_or_default();

  let mut record = CredentialRecord::new(location, ecosystem, flow);
  let backup = replace_in_file(&mut record, args.field, &args.value)
    .with_context(|| format!("Failed to set {}", args.field.name()))?;

  print_success(&format!(
    "Set {} in {}",
    format_field(args.field.name()),
    format_path(&record.path().display().to_string())
  ));
  print_info(&format!("Backup written to {}", format_path(&backup.display().to_string())));
  Ok(())
}
