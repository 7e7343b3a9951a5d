use std::fmt;

use regex::Regex;

use crate::event::CommitRecord;

/// Semantic-version component to increment when no explicit target version
/// is declared. Precedence when inferring from commits: major > minor >
/// patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpStrategy {
    Major,
    Minor,
    Patch,
}

impl BumpStrategy {
    /// Flag understood by the package manager's version command.
    pub fn flag(self) -> &'static str {
        match self {
            BumpStrategy::Major => "--major",
            BumpStrategy::Minor => "--minor",
            BumpStrategy::Patch => "--patch",
        }
    }
}

impl fmt::Display for BumpStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpStrategy::Major => write!(f, "major"),
            BumpStrategy::Minor => write!(f, "minor"),
            BumpStrategy::Patch => write!(f, "patch"),
        }
    }
}

/// First explicit version declared by a commit message.
///
/// Scans in the supplied order and returns the pattern's single capturing
/// group from the first matching message. `None` is a legitimate result;
/// it means fall back to strategy inference.
pub fn extract_version(pattern: &Regex, commits: &[CommitRecord]) -> Option<String> {
    commits.iter().find_map(|commit| {
        pattern
            .captures(&commit.message)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str().to_string())
    })
}

/// Bump strategy inferred from the whole commit set.
///
/// A single qualifying commit anywhere in the set is sufficient for its
/// tier, and a higher tier anywhere beats a lower tier everywhere:
/// - major: message contains "BREAKING CHANGE" (case-sensitive) or "major"
///   (case-insensitive)
/// - minor: message starts with "feat" or contains "minor" (both
///   case-insensitive)
/// - patch: nothing qualified
pub fn infer_strategy(commits: &[CommitRecord]) -> BumpStrategy {
    let mut minor = false;

    for commit in commits {
        let lower = commit.message.to_lowercase();
        if commit.message.contains("BREAKING CHANGE") || lower.contains("major") {
            return BumpStrategy::Major;
        }
        if lower.starts_with("feat") || lower.contains("minor") {
            minor = true;
        }
    }

    if minor {
        BumpStrategy::Minor
    } else {
        BumpStrategy::Patch
    }
}

/// Strips the conventional leading prefix from a declared version, so that
/// `Release v1.2.3` and `Release 1.2.3` ask the bump tool for the same
/// thing.
pub fn normalize(version: &str) -> &str {
    version.trim_start_matches('v').trim_start_matches('V')
}
