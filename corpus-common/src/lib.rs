//! # Corpus Common Library
//!
//! Shared code for the corpus normalization tools:
//! - Error type
//! - Configuration loading (TOML + environment)
//! - Table name configuration
//! - Database connection and schema bootstrap

pub mod config;
pub mod db;
pub mod error;

pub use config::{ConfigSource, TableNames, TomlConfig};
pub use error::{Error, Result};
