//! # Utility Functions
//!
//! Shared helpers for the oauth-doctor commands.

pub mod output;
