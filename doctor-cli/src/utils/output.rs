//! # Output Formatting
//!
//! Colored, emoji-prefixed status lines for user-facing messages. Records
//! themselves are rendered by the core library; these helpers only frame them.

use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply the mode as the process-wide color override
  pub fn apply(self) {
    match self {
      ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
      ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
      // Leave terminal detection to owo_colors
      ColorMode::Auto => {}
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format a file path
pub fn format_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a credential field name
pub fn format_field(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}
