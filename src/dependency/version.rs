//! Version comparison and selection.

use std::cmp::Ordering;
use std::fmt;

/// Which version of a dependency to upgrade to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Newest known release: `latest.release`.
    Latest,
    /// Newest known release whose leading components match: `4.X`, `4.9.X`.
    Wildcard(Vec<u64>),
    /// Exactly this version.
    Exact(String),
}

impl VersionSelector {
    /// Parses a selector string.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest.release") || s == "*" {
            return Self::Latest;
        }
        if let Some(prefix) = s.strip_suffix(".X").or_else(|| s.strip_suffix(".x")) {
            let parts: Option<Vec<u64>> = prefix.split('.').map(|p| p.parse().ok()).collect();
            if let Some(parts) = parts {
                return Self::Wildcard(parts);
            }
        }
        Self::Exact(s.to_string())
    }

    /// Returns true if `version` satisfies this selector.
    pub fn matches(&self, version: &str) -> bool {
        match self {
            Self::Latest => is_release(version),
            Self::Wildcard(prefix) => {
                is_release(version) && {
                    let parts = numeric_parts(version);
                    parts.len() >= prefix.len() && parts[..prefix.len()] == prefix[..]
                }
            }
            Self::Exact(v) => compare_versions(version, v) == Ordering::Equal,
        }
    }

    /// Picks the newest of `known` that satisfies this selector.
    pub fn select<'a>(&self, known: &'a [String]) -> Option<&'a str> {
        known
            .iter()
            .filter(|v| self.matches(v))
            .max_by(|a, b| compare_versions(a, b))
            .map(String::as_str)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest.release"),
            Self::Wildcard(prefix) => {
                for part in prefix {
                    write!(f, "{part}.")?;
                }
                f.write_str("X")
            }
            Self::Exact(v) => f.write_str(v),
        }
    }
}

/// Releases are plain dotted numbers; anything with a qualifier
/// (`-alpha.1`, `-SNAPSHOT`, `.RC1`) is a pre-release.
fn is_release(version: &str) -> bool {
    !version.is_empty() && version.split('.').all(|p| p.parse::<u64>().is_ok())
}

fn numeric_parts(version: &str) -> Vec<u64> {
    version
        .split(['.', '-'])
        .map_while(|p| p.parse().ok())
        .collect()
}

/// Compares two version strings component-wise.
///
/// Missing components count as zero, and a pre-release sorts before the
/// release with the same numbers.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts = numeric_parts(a);
    let b_parts = numeric_parts(b);

    for i in 0..a_parts.len().max(b_parts.len()) {
        let a_val = a_parts.get(i).copied().unwrap_or(0);
        let b_val = b_parts.get(i).copied().unwrap_or(0);
        match a_val.cmp(&b_val) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    is_release(a).cmp(&is_release(b))
}
