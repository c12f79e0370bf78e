//! # OAuth Doctor Core Library
//!
//! Locates, parses, validates and edits the credential configuration files of
//! the Ads API client libraries (Python, Ruby, .NET, PHP and Java). A record
//! moves through a linear pipeline: resolved, parsed, optionally joined with
//! its service-account key, validated, and optionally edited in place.

pub mod error;
pub mod lexicon;
pub mod model;
pub mod parser;
pub mod render;
pub mod replace;
pub mod resolve;
pub mod service_account;
pub mod validate;

// Re-export the pipeline surface
pub use error::{ConfigError, Result};
pub use model::{
  ConfigLocation, CredentialFields, CredentialKey, CredentialRecord, Ecosystem, OAuthFlow, ServiceAccountInfo,
};
pub use parser::key_value::parse_key_value_file;
pub use parser::parse;
pub use parser::xml::parse_xml_file;
pub use render::print_record;
pub use replace::{replace, replace_in_file};
pub use resolve::resolve;
pub use service_account::load_service_account;
pub use validate::{ValidationError, validate};
