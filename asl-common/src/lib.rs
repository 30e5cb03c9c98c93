//! # ASL TTS Common Library
//!
//! Shared code for the ASL TTS tools including:
//! - Error taxonomy (Error enum) and effect classification
//! - Configuration loading and validation (TOML)
//! - Lookup-key and cache-filename normalization
//! - Logging setup for the command-line tools

pub mod config;
pub mod error;
pub mod keys;
pub mod logging;

pub use config::{Config, OnMissing, Policy};
pub use error::{Error, ErrorEffect, Result};
