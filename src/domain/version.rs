//! PEP 440 version numbers
//!
//! Handles versions like:
//! - Final releases: `1.2.3`, `2024.1`
//! - Epochs: `1!2.0`
//! - Pre-releases: `1.0a1`, `1.0b2`, `1.0rc1` (also `alpha`, `beta`, `c`, `pre`, `preview`)
//! - Post-releases: `1.0.post1`, `1.0-1`
//! - Dev releases: `1.0.dev3`
//! - Local labels: `1.0+ubuntu.1`

use crate::error::SpecifierError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^
        v?
        (?:(?P<epoch>\d+)!)?
        (?P<release>\d+(?:\.\d+)*)
        (?:[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>\d+)?)?
        (?:-(?P<post_n1>\d+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>\d+)?)?
        (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>\d+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .unwrap()
});

/// Pre-release phase, ordered `a < b < rc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreRelease {
    /// Alpha (`a`, `alpha`)
    Alpha,
    /// Beta (`b`, `beta`)
    Beta,
    /// Release candidate (`rc`, `c`, `pre`, `preview`)
    Rc,
}

impl PreRelease {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Some(PreRelease::Alpha),
            "b" | "beta" => Some(PreRelease::Beta),
            "rc" | "c" | "pre" | "preview" => Some(PreRelease::Rc),
            _ => None,
        }
    }

    /// Canonical spelling used when displaying a version
    pub fn as_str(&self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

/// A parsed PEP 440 version
///
/// Equality and ordering follow PEP 440, so `1.0` and `1.0.0` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Version {
    /// Epoch (`N!`), zero when absent
    pub epoch: u64,
    /// Release segments (`1.2.3` -> `[1, 2, 3]`)
    pub release: Vec<u64>,
    /// Pre-release phase and number
    pub pre: Option<(PreRelease, u64)>,
    /// Post-release number
    pub post: Option<u64>,
    /// Dev-release number
    pub dev: Option<u64>,
    /// Local version label, normalized to lowercase with `.` separators
    pub local: Option<String>,
}

/// Sort position of the pre-release component
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    /// A dev release of a final version (`1.0.dev1`) sorts before its pre-releases
    DevOnly,
    Pre(PreRelease, u64),
    Final,
}

impl Version {
    /// Creates a final release from its segments
    pub fn from_release(release: impl Into<Vec<u64>>) -> Self {
        Self {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Returns true for pre-releases and dev releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns true for post releases
    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Returns the release segment at `index`, treating missing segments as zero
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns this version without its local label
    pub fn without_local(&self) -> Version {
        Version {
            local: None,
            ..self.clone()
        }
    }

    /// Returns the final release this version belongs to (`1.0rc1.post2` -> `1.0`)
    pub fn base(&self) -> Version {
        Version {
            epoch: self.epoch,
            ..Version::from_release(self.release.clone())
        }
    }

    /// Returns true when `self` starts with the release segments of `prefix`
    ///
    /// Missing segments on either side are treated as zero, so `1` has the prefix `1.0`.
    pub fn has_release_prefix(&self, prefix: &Version) -> bool {
        self.epoch == prefix.epoch
            && (0..prefix.release.len()).all(|i| self.segment(i) == prefix.segment(i))
    }

    /// Returns the next release after the given prefix length
    ///
    /// `1.4.5` with `len = 2` becomes `1.5`, with `len = 1` becomes `2`.
    /// Returns `None` when the bumped segment is already `u64::MAX`.
    pub fn bump_prefix(&self, len: usize) -> Option<Version> {
        let len = len.max(1);
        let mut release: Vec<u64> = (0..len).map(|i| self.segment(i)).collect();
        if let Some(last) = release.last_mut() {
            *last = last.checked_add(1)?;
        }
        Some(Version {
            epoch: self.epoch,
            ..Version::from_release(release)
        })
    }

    fn trimmed_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|&segment| segment != 0)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }

    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (Some((phase, n)), _, _) => PreKey::Pre(phase, n),
            (None, None, Some(_)) => PreKey::DevOnly,
            _ => PreKey::Final,
        }
    }
}

impl FromStr for Version {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| SpecifierError::invalid_version(trimmed))?;

        let number = |name: &str| -> Result<Option<u64>, SpecifierError> {
            caps.name(name)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| SpecifierError::invalid_version(trimmed))
                })
                .transpose()
        };

        let release = caps
            .name("release")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| SpecifierError::invalid_version(trimmed))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let phase = PreRelease::from_label(label.as_str())
                    .ok_or_else(|| SpecifierError::invalid_version(trimmed))?;
                Some((phase, number("pre_n")?.unwrap_or(0)))
            }
            None => None,
        };

        let post = if caps.name("post_n1").is_some() {
            number("post_n1")?
        } else if caps.name("post_l").is_some() {
            Some(number("post_n2")?.unwrap_or(0))
        } else {
            None
        };

        // `dev` without a number is `dev0`
        let dev = if caps.name("dev_l").is_some() {
            Some(number("dev_n")?.unwrap_or(0))
        } else {
            None
        };

        let local = caps
            .name("local")
            .map(|m| m.as_str().to_ascii_lowercase().replace(['-', '_'], "."));

        Ok(Version {
            epoch: number("epoch")?.unwrap_or(0),
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = SpecifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.trimmed_release().cmp(other.trimmed_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            // a dev release sorts before the same version without one
            .then_with(|| {
                let dev_key = |v: &Version| (v.dev.is_none(), v.dev.unwrap_or(0));
                dev_key(self).cmp(&dev_key(other))
            })
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{}{}", phase.as_str(), n)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(ref local) = self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}
