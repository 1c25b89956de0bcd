//! requirements.txt line parser
//!
//! Handles:
//! - `name`, `name<spec>`, `name[extra1,extra2]<spec>`
//! - environment markers after `;`
//! - direct references (`name @ url`)
//! - full-line comments, which title the following block until a blank line
//! - inline comments (` # ...`) and `\` line continuations
//! - `-r`/`--requirement` includes and other pip option lines

use super::specifier::parse_specifier;
use crate::domain::{Dependency, Directive, Issue, IssueKind, VersionSpec};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// A name runs until extras or a comparator; the specifier may be parenthesized (PEP 508)
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[^\[\]<>=!~;@(]*?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<spec>(?:[<>=!~(].*)?)$",
    )
    .unwrap()
});

// pip strips from the first `#` that starts the line or follows whitespace
static INLINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s+)#.*$").unwrap());

// Per-requirement options such as `--hash=sha256:...`
static REQUIREMENT_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+--[a-z][a-z-]*(?:[=\s]\S+)?").unwrap());

/// Option lines pip accepts in a requirements file
const KNOWN_OPTIONS: &[&str] = &[
    "-c",
    "--constraint",
    "-e",
    "--editable",
    "-i",
    "--index-url",
    "--extra-index-url",
    "--no-index",
    "-f",
    "--find-links",
    "--trusted-host",
    "--pre",
    "--prefer-binary",
    "--no-binary",
    "--only-binary",
    "--require-hashes",
    "--use-feature",
    "--config-settings",
];

/// One meaningful line of a requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementLine {
    /// A package requirement
    Entry(Dependency),
    /// A `-r` include, target relative to the including file
    Include { line: usize, target: PathBuf },
    /// A pip option line
    Directive(Directive),
    /// A line that could not be understood
    Issue(Issue),
}

/// Parse the contents of one requirements file
///
/// Lines are returned in file order. Include targets are not followed here.
pub fn parse_requirements(content: &str, origin: &Path) -> Vec<RequirementLine> {
    let mut parsed = Vec::new();
    let mut group: Option<String> = None;

    for (line, text) in logical_lines(content) {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            group = None;
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            let title = comment.trim_start_matches('#').trim();
            if !title.is_empty() {
                group = Some(title.to_string());
            }
            continue;
        }

        let body = INLINE_COMMENT_RE.replace(trimmed, "");
        let body = body.trim();
        if body.is_empty() {
            continue;
        }

        if body.starts_with('-') {
            parsed.extend(parse_option(body, origin, line));
        } else {
            parsed.push(parse_requirement(body, origin, line, group.clone()));
        }
    }

    parsed
}

/// Joins `\` continuations, yielding each logical line with its starting line number
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        // A comment line never continues, and it ends a pending continuation
        let is_comment = raw.trim_start().starts_with('#');
        let (start, mut text) = match pending.take() {
            Some((start, mut text)) => {
                if is_comment {
                    text.push(' ');
                }
                text.push_str(raw);
                (start, text)
            }
            None => (number, raw.to_string()),
        };

        if text.ends_with('\\') && !is_comment {
            text.pop();
            pending = Some((start, text));
        } else {
            lines.push((start, text));
        }
    }

    // A continuation on the last line just ends the file
    if let Some(last) = pending {
        lines.push(last);
    }

    lines
}

fn split_option(body: &str) -> (String, String) {
    if let Some(long) = body.strip_prefix("--") {
        let end = long
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(long.len());
        let value = long[end..].trim_start_matches('=').trim();
        (format!("--{}", &long[..end]), value.to_string())
    } else {
        // Short options take their value attached or separated: `-rbase.txt`, `-r base.txt`
        let mut chars = body.char_indices().skip(1);
        let end = chars.next().map(|(i, c)| i + c.len_utf8()).unwrap_or(body.len());
        (body[..end].to_string(), body[end..].trim().to_string())
    }
}

fn parse_option(body: &str, origin: &Path, line: usize) -> Vec<RequirementLine> {
    let (option, value) = split_option(body);

    if option == "-r" || option == "--requirement" {
        if value.is_empty() {
            return vec![RequirementLine::Issue(Issue::new(
                origin,
                line,
                IssueKind::MalformedLine {
                    message: format!("'{}' needs a file path", option),
                },
            ))];
        }
        return vec![RequirementLine::Include {
            line,
            target: PathBuf::from(value),
        }];
    }

    let known = KNOWN_OPTIONS.contains(&option.as_str());
    let mut parsed = vec![RequirementLine::Directive(Directive {
        origin: origin.to_path_buf(),
        line,
        option: option.clone(),
        value,
    })];
    if !known {
        parsed.push(RequirementLine::Issue(Issue::new(
            origin,
            line,
            IssueKind::UnsupportedDirective { directive: option },
        )));
    }
    parsed
}

fn parse_requirement(
    body: &str,
    origin: &Path,
    line: usize,
    group: Option<String>,
) -> RequirementLine {
    let body = REQUIREMENT_OPTION_RE.replace_all(body, "");
    let body = body.trim();

    if let Some((name_part, reference)) = body.split_once('@') {
        return parse_direct_reference(name_part, reference, origin, line, group);
    }

    let (requirement, marker) = match body.split_once(';') {
        Some((requirement, marker)) => (requirement.trim(), Some(marker.trim())),
        None => (body, None),
    };

    let Some(caps) = REQUIREMENT_RE.captures(requirement) else {
        return malformed(origin, line, format!("cannot parse requirement '{}'", requirement));
    };

    let name = caps.name("name").map(|m| m.as_str().trim()).unwrap_or_default();
    let spec_text = caps.name("spec").map(|m| m.as_str()).unwrap_or_default();
    let spec_text = strip_parens(spec_text);

    let version_spec = match parse_specifier(spec_text) {
        Ok(spec) => spec,
        Err(e) => {
            let issue = Issue::new(
                origin,
                line,
                IssueKind::InvalidSpecifier {
                    message: e.to_string(),
                },
            );
            let issue = if name.is_empty() {
                issue
            } else {
                issue.with_package(name)
            };
            return RequirementLine::Issue(issue);
        }
    };

    let mut dependency = Dependency::new(name, version_spec, origin, line)
        .with_extras(parse_extras(caps.name("extras").map(|m| m.as_str())))
        .with_group(group);
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        dependency = dependency.with_marker(marker);
    }

    RequirementLine::Entry(dependency)
}

fn parse_direct_reference(
    name_part: &str,
    reference: &str,
    origin: &Path,
    line: usize,
    group: Option<String>,
) -> RequirementLine {
    // URLs may contain `;`, so the marker separator needs whitespace before it
    let (url, marker) = match reference.find(" ;").or_else(|| reference.find("; ")) {
        Some(index) => (
            reference[..index].trim(),
            Some(reference[index..].trim_start_matches([' ', ';']).trim()),
        ),
        None => (reference.trim(), None),
    };

    if url.is_empty() {
        return malformed(origin, line, "direct reference has no URL");
    }

    let Some(caps) = REQUIREMENT_RE.captures(name_part.trim()) else {
        return malformed(origin, line, format!("cannot parse requirement '{}'", name_part.trim()));
    };
    if caps.name("spec").is_some_and(|m| !m.as_str().is_empty()) {
        return malformed(
            origin,
            line,
            "direct reference cannot also carry a version specifier",
        );
    }

    let name = caps.name("name").map(|m| m.as_str().trim()).unwrap_or_default();
    let mut dependency = Dependency::new(name, VersionSpec::any(), origin, line)
        .with_extras(parse_extras(caps.name("extras").map(|m| m.as_str())))
        .with_url(url)
        .with_group(group);
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        dependency = dependency.with_marker(marker);
    }

    RequirementLine::Entry(dependency)
}

fn parse_extras(extras: Option<&str>) -> Vec<String> {
    extras
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn strip_parens(spec: &str) -> &str {
    let trimmed = spec.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed)
}

fn malformed(origin: &Path, line: usize, message: impl Into<String>) -> RequirementLine {
    RequirementLine::Issue(Issue::new(
        origin,
        line,
        IssueKind::MalformedLine {
            message: message.into(),
        },
    ))
}
