//! Parsers for requirements files
//!
//! This module provides:
//! - PEP 440 version specifier parsing
//! - Line-oriented requirements.txt parsing (comments, groups, options, includes)

mod requirements;
mod specifier;

pub use requirements::{parse_requirements, RequirementLine};
pub use specifier::{parse_clause, parse_specifier};
