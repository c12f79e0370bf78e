//! Test utilities shared across the oauth-doctor workspace
//!
//! This crate provides common testing infrastructure including:
//! - HOME directory isolation ([`HomeEnvTestGuard`])
//! - Scratch credential files ([`ConfigFileGuard`])
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across crate
//! boundaries in development dependencies.

#![allow(dead_code)]

pub mod files;
pub mod home;

// Re-export commonly used items
pub use files::ConfigFileGuard;
pub use home::HomeEnvTestGuard;
