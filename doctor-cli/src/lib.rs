//! # OAuth Doctor CLI Library
//!
//! Command definitions, user settings and terminal output helpers for the
//! oauth-doctor command-line tool.

pub mod cli;
pub mod config;
pub mod utils;
