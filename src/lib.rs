//! reqlint - requirements.txt validator and resolver library
//!
//! This library provides the core functionality for checking pip
//! requirements manifests:
//! - PEP 440 version and specifier parsing
//! - requirements.txt line parsing with `-r` include expansion
//! - Validation findings (errors and advisories)
//! - Resolution against the PyPI JSON API

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod resolve;
pub mod validate;
