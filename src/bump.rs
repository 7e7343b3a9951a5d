use std::path::Path;

use crate::command::CommandRunner;
use crate::config::ReleaseConfig;
use crate::error::{Error, Result};
use crate::event::CommitRecord;
use crate::manifest;
use crate::ui;
use crate::version;

/// Result of the version decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Authoritative version string, re-read from the manifest after the
    /// bump tool ran; the tool owns the final formatting.
    pub version: String,
    /// False when the bump tool reported it was already at this version,
    /// i.e. no automatic commit was created.
    pub bumped: bool,
}

/// "Already at this version": the bump tool signals the no-op with exit
/// code 1. Any other non-zero exit is a real failure.
fn already_at_version(err: &Error) -> bool {
    err.command_exit_code() == Some(1)
}

/// Decide the final version and apply it to the manifest.
///
/// Exactly one path runs: an explicit commit-declared version, or a
/// strategy-derived bump, never both. The manifest is re-read afterwards
/// for the authoritative version string.
pub fn resolve_version<R: CommandRunner>(
    runner: &R,
    dir: &Path,
    config: &ReleaseConfig,
    commits: &[CommitRecord],
) -> Result<ResolvedVersion> {
    let declared = version::extract_version(&config.commit_pattern, commits);

    let outcome = match &declared {
        Some(declared) => {
            let target = version::normalize(declared);
            ui::info(&format!("Version declared by commit: {}", target));
            runner.run(
                dir,
                "yarn",
                &["version", "--non-interactive", "--new-version", target],
            )
        }
        None => {
            let strategy = version::infer_strategy(commits);
            ui::info(&format!("No version commit found, bumping {}", strategy));
            runner.run(dir, "yarn", &["version", "--non-interactive", strategy.flag()])
        }
    };

    let bumped = match outcome {
        Ok(()) => true,
        Err(err) if already_at_version(&err) => {
            ui::info("Already at this version, nothing to bump");
            false
        }
        Err(err) => return Err(err),
    };

    let version = manifest::read_version(dir)?;
    ui::info(&format!("New version: {}", version));

    Ok(ResolvedVersion { version, bumped })
}
