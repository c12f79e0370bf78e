//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for oauth-doctor. Each
//! subcommand maps onto one step of the core credential pipeline.

mod check;
mod path;
mod set;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use doctor_core::{ConfigLocation, Ecosystem, resolve};

use crate::config::DoctorSettings;
use crate::utils::output::ColorMode;

/// Top-level CLI command for oauth-doctor
#[derive(Parser)]
#[command(name = "oauth-doctor")]
#[command(about = "Check and repair Ads API client library credential files")]
#[command(
  long_about = "OAuth Doctor reads the credential file of a Google Ads API client library\n\
        (Python, Ruby, .NET, PHP or Java), tells you which field is missing or\n\
        malformed, and can fix a field in place while keeping a dated backup."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for oauth-doctor
#[derive(Subcommand)]
pub enum Commands {
  /// Validate a credential file
  #[command(long_about = "Parses the credential file and checks every field the chosen OAuth flow needs.\n\n\
            The first problem found is reported by name and the command exits with a\n\
            non-zero status. For the service-account flow the JSON key file is loaded\n\
            as well. Use --print to show what was read.")]
  Check(check::CheckArgs),

  /// Show which credential file would be used
  #[command(long_about = "Prints the path of the credential file for a client library.\n\n\
            Without --config this is the library's conventional file name in your home\n\
            directory.")]
  Path(path::PathArgs),

  /// Set one credential field in place
  #[command(long_about = "Sets a single credential field in the credential file.\n\n\
            An existing assignment has its value replaced. A commented-out example is\n\
            left untouched and the live assignment is added right after it. Otherwise\n\
            the assignment is appended. A dated backup of the original file is written\n\
            next to it first.")]
  Set(set::SetArgs),
}

/// Arguments selecting which credential file to work on
#[derive(Args)]
pub struct TargetArgs {
  /// Client library whose file format to use
  #[arg(short, long, value_enum, ignore_case = true)]
  pub language: Option<Ecosystem>,

  /// Credential file to use instead of the default in the home directory
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,
}

impl TargetArgs {
  /// Settle the ecosystem and resolve the credential file location
  pub fn locate(&self, settings: &DoctorSettings) -> Result<(Ecosystem, ConfigLocation)> {
    let ecosystem = self
      .language
      .or(settings.language)
      .ok_or_else(|| anyhow!("No client library given; pass --language or set `language` in the settings file"))?;
    let location = resolve(ecosystem, self.config.as_deref())?;
    Ok((ecosystem, location))
  }
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let settings = DoctorSettings::load()?;

  match cli.command {
    Commands::Check(check) => check::handle_check_command(check, &settings),
    Commands::Path(path) => path::handle_path_command(path, &settings),
    Commands::Set(set) => set::handle_set_command(set, &settings),
  }
}
