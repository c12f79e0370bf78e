//! # Check Command
//!
//! Parses a credential file, joins the service-account key when the flow
//! needs one, and reports the first field that fails validation.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use doctor_core::{CredentialKey, OAuthFlow, load_service_account, parse, print_record, validate};
use tracing::warn;

use super::TargetArgs;
use crate::config::DoctorSettings;
use crate::utils::output::{format_command, format_path, print_error, print_header, print_info, print_success};

/// Command for validating a credential file
#[derive(Args)]
pub struct CheckArgs {
  #[command(flatten)]
  pub target: TargetArgs,

  /// OAuth flow the credentials are meant for
  #[arg(long, value_enum, ignore_case = true)]
  pub oauth_type: Option<OAuthFlow>,

  /// Mask client secrets, tokens and private keys when printing
  #[arg(long)]
  pub hide_pii: bool,

  /// Print the credentials that were read
  #[arg(long)]
  pub print: bool,
}

/// Handle the check command
pub(crate) fn handle_check_command(args: CheckArgs, settings: &DoctorSettings) -> Result<()> {
  let (ecosystem, location) = args.target.locate(settings)?;
  let flow = args.oauth_type.or(settings.oauth_type).unwrap_or_default();
  let hide_pii = args.hide_pii || settings.hide_pii;

  let mut record =
    parse(ecosystem, location, flow).context("Failed to read credentials from the configuration file")?;

  if flow == OAuthFlow::ServiceAccount {
    if record.fields.is_set(CredentialKey::PrivateKeyPath) {
      load_service_account(&mut record).context("Failed to load the service account key")?;
    } else {
      warn!("No private key path configured, skipping service account key");
    }
  }

  if args.print {
    print_header("Credentials");
    let mut stdout = io::stdout().lock();
    print_record(&record, hide_pii, &mut stdout).context("Failed to print credentials")?;
    stdout.flush()?;
  }

  let path = record.path().display().to_string();
  match validate(&record) {
    Ok(()) => {
      print_success(&format!("{flow} credentials in {} look good", format_path(&path)));
      Ok(())
    }
    Err(err) => {
      let field = err.key();
      print_error(&err.to_string());
      print_info(&format!(
        "Fix it with {}",
        format_command(&format!("oauth-doctor set {} <value> --language {ecosystem}", field.name()))
      ));
      bail!("{} in {path} failed validation", field.name())
    }
  }
}
