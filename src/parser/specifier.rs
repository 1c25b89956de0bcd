//! PEP 440 version specifier parser
//!
//! Handles specifier formats:
//! - Exact: `==1.2.3`, `===1.2.3`
//! - Wildcard: `==1.2.*`, `!=1.2.*`
//! - Compatible release: `~=1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`, `!=1.2.3`
//! - Range: `>=1.0,<2.0` (any number of comma-separated clauses)

use crate::domain::{Clause, Comparator, Version, VersionSpec};
use crate::error::SpecifierError;
use regex::Regex;
use std::sync::LazyLock;

static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(===|==|!=|~=|>=|<=|>|<)\s*(\S+)$").unwrap());

/// Parse a comma-separated version specifier
///
/// An empty string is a valid specifier that admits any version.
pub fn parse_specifier(raw: &str) -> Result<VersionSpec, SpecifierError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(VersionSpec::any());
    }

    let clauses = trimmed
        .split(',')
        .map(|part| parse_clause(part).map_err(|e| rewrap(e, trimmed)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VersionSpec::new(trimmed, clauses))
}

/// Parse a single `<comparator><version>` clause
pub fn parse_clause(text: &str) -> Result<Clause, SpecifierError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SpecifierError::invalid_specifier(text, "empty clause"));
    }

    let caps = CLAUSE_RE.captures(trimmed).ok_or_else(|| {
        SpecifierError::invalid_specifier(trimmed, "expected a comparator followed by a version")
    })?;
    let token = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let operand = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let comparator = Comparator::from_token(token).ok_or_else(|| {
        SpecifierError::invalid_specifier(trimmed, format!("unknown comparator '{}'", token))
    })?;

    if let Some(prefix) = operand.strip_suffix(".*") {
        if !matches!(comparator, Comparator::Equal | Comparator::NotEqual) {
            return Err(SpecifierError::invalid_specifier(
                trimmed,
                format!("wildcard is not allowed with '{}'", comparator),
            ));
        }
        let version = parse_operand(prefix, trimmed)?;
        if version.is_prerelease() || version.is_postrelease() || version.local.is_some() {
            return Err(SpecifierError::invalid_specifier(
                trimmed,
                "wildcard must follow a release number",
            ));
        }
        return Ok(Clause::wildcard(comparator, version));
    }

    let version = parse_operand(operand, trimmed)?;

    if comparator == Comparator::Compatible && version.release.len() < 2 {
        return Err(SpecifierError::invalid_specifier(
            trimmed,
            "'~=' needs at least two release segments",
        ));
    }
    if version.local.is_some()
        && !matches!(
            comparator,
            Comparator::Equal | Comparator::NotEqual | Comparator::Arbitrary
        )
    {
        return Err(SpecifierError::invalid_specifier(
            trimmed,
            "local versions are only allowed with '==' and '!='",
        ));
    }

    Ok(Clause::new(comparator, version))
}

fn parse_operand(operand: &str, clause: &str) -> Result<Version, SpecifierError> {
    operand.parse::<Version>().map_err(|_| {
        SpecifierError::invalid_specifier(clause, format!("'{}' is not a valid version", operand))
    })
}

// Report the whole specifier rather than the failing clause
fn rewrap(error: SpecifierError, whole: &str) -> SpecifierError {
    match error {
        SpecifierError::InvalidSpecifier { message, .. } => {
            SpecifierError::invalid_specifier(whole, message)
        }
        other => other,
    }
}
