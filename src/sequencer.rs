use std::path::Path;

use crate::bump::{self, ResolvedVersion};
use crate::command::CommandRunner;
use crate::config::ReleaseConfig;
use crate::error::{Error, Result, SkipReason};
use crate::event::CommitRecord;
use crate::ui;

/// Outcome of the full mutation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub tag: String,
}

/// Ordered, idempotent repository mutation.
///
/// [Sequencer::run] is the single driver: it executes the steps strictly
/// in order and halts on the first failure that no step recognizes as
/// benign. There is one instance per process invocation and no concurrent
/// writers; the sequential design is the concurrency control. No rollback
/// of already-applied local state is attempted.
pub struct Sequencer<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a ReleaseConfig,
    commits: &'a [CommitRecord],
    dir: &'a Path,
}

impl<'a, R: CommandRunner> Sequencer<'a, R> {
    pub fn new(runner: &'a R, config: &'a ReleaseConfig, commits: &'a [CommitRecord]) -> Self {
        Sequencer {
            runner,
            config,
            commits,
            dir: &config.working_dir,
        }
    }

    /// Execute the whole sequence and return the released version and tag.
    pub fn run(self) -> Result<Release> {
        self.configure_identity()?;
        self.stage_artifacts()?;
        let resolved = self.decide_version()?;
        let tag = self.push_tag(&resolved)?;
        self.rewrite_history(&resolved)?;
        self.push_branch()?;

        Ok(Release {
            version: resolved.version,
            tag,
        })
    }

    /// Step 1: set the local commit identity from the configured tag
    /// author. Safe to repeat.
    fn configure_identity(&self) -> Result<()> {
        let author = &self.config.tag_author;
        self.git(&["config", "user.name", &author.name])?;
        self.git(&["config", "user.email", &author.email])
    }

    /// Step 2: install dependencies, build, and force-add the build output
    /// so the release commit carries the artifact built from pre-bump
    /// source. Assumed repeat-safe.
    fn stage_artifacts(&self) -> Result<()> {
        self.yarn(&["install"])?;
        self.yarn(&["run", &self.config.build_command])?;
        self.git(&["add", "--force", &self.config.build_output])
    }

    /// Step 3: final version via the reconciler. Exactly one of the two
    /// decision paths runs inside.
    fn decide_version(&self) -> Result<ResolvedVersion> {
        bump::resolve_version(self.runner, self.dir, self.config, self.commits)
    }

    /// Step 4: make sure the tag exists locally, then push it.
    ///
    /// The probe is `git rev-parse -q --verify`: exit code 1 means the tag
    /// does not exist (see [tag_absent]) and it gets created from the
    /// templates. Exit 0 means it is already present, which is benign only
    /// when this run's bump just created it; otherwise a completed earlier
    /// run did, and the whole run ends as a benign skip. A push rejected
    /// because the remote already has the tag (see [rejected_as_existing])
    /// ends the run the same way, before the branch push.
    fn push_tag(&self, resolved: &ResolvedVersion) -> Result<String> {
        let tag = self.config.tag_name.render(&resolved.version);
        let tag_ref = format!("refs/tags/{}", tag);

        match self.git(&["rev-parse", "-q", "--verify", &tag_ref]) {
            Ok(()) => {
                if !(resolved.bumped && bump_created(&tag, &resolved.version)) {
                    return Err(Error::Skip(SkipReason::TagExists { tag }));
                }
            }
            Err(err) if tag_absent(&err) => {
                let message = self.config.tag_message.render(&resolved.version);
                self.git(&["tag", "-a", "-m", &message, &tag])?;
            }
            Err(err) => return Err(err),
        }

        match self.git(&["push", "origin", &tag_ref]) {
            Ok(()) => {}
            Err(err) if rejected_as_existing(&err) => {
                return Err(Error::Skip(SkipReason::TagExists { tag }));
            }
            Err(err) => return Err(err),
        }

        ui::success(&format!("Tag has been pushed: {}", tag));
        Ok(tag)
    }

    /// Step 5: fold the bump tool's automatic commit and the staged
    /// artifact into one authored release commit. Precondition: the bump
    /// actually committed. When it was an "already at this version" no-op
    /// there is nothing to undo, and resetting would rewrite the pushed
    /// commit itself.
    fn rewrite_history(&self, resolved: &ResolvedVersion) -> Result<()> {
        if !resolved.bumped {
            return Ok(());
        }

        self.git(&["reset", "--soft", "HEAD~1"])?;
        self.git(&["restore", "--staged", "."])?;

        let message = format!("Release {}", resolved.version);
        match self.git(&["commit", "-a", "-m", &message]) {
            Ok(()) => Ok(()),
            Err(err) if nothing_to_commit(&err) => {
                ui::info("Nothing to commit");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Step 6: publish the branch tip. Fatal on rejection.
    fn push_branch(&self) -> Result<()> {
        let refspec = format!("HEAD:refs/heads/{}", self.config.default_branch);
        self.git(&["push", "origin", &refspec])?;
        ui::success(&format!("Pushed {}", self.config.default_branch));
        Ok(())
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        self.runner.run(self.dir, "git", args)
    }

    fn yarn(&self, args: &[&str]) -> Result<()> {
        self.runner.run(self.dir, "yarn", args)
    }
}

/// Whether the bump tool's automatic tag is the tag about to be pushed.
/// Only then does a locally-present tag not mean a previous run already
/// released this version.
fn bump_created(tag: &str, version: &str) -> bool {
    tag == format!("v{}", version)
}

/// "Does not exist" from the tag probe. `git rev-parse -q --verify` exits
/// 1 for a missing ref; any other non-zero exit is a real failure.
fn tag_absent(err: &Error) -> bool {
    err.command_exit_code() == Some(1)
}

/// Push rejected because the remote already has the tag. Anything else the
/// remote refuses is fatal.
fn rejected_as_existing(err: &Error) -> bool {
    err.command_exit_code() == Some(1)
        && err
            .command_stderr()
            .is_some_and(|stderr| stderr.contains("already exists"))
}

/// Commit exit code 1 is "nothing to commit"; benign, the sequence
/// continues.
fn nothing_to_commit(err: &Error) -> bool {
    err.command_exit_code() == Some(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit(code: i32, stderr: &str) -> Error {
        Error::CommandFailed {
            program: "git".to_string(),
            code,
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_tag_absent_matches_exit_one_only() {
        assert!(tag_absent(&exit(1, "")));
        assert!(!tag_absent(&exit(128, "fatal: not a git repository")));
        assert!(!tag_absent(&Error::config("x")));
    }

    #[test]
    fn test_rejected_as_existing_needs_code_and_reason() {
        assert!(rejected_as_existing(&exit(
            1,
            "! [rejected] v1.2.3 -> v1.2.3 (already exists)"
        )));
        assert!(!rejected_as_existing(&exit(1, "remote: permission denied")));
        assert!(!rejected_as_existing(&exit(128, "already exists")));
    }

    #[test]
    fn test_bump_created_only_for_the_default_prefix() {
        assert!(bump_created("v1.5.0", "1.5.0"));
        assert!(!bump_created("widget-1.5.0", "1.5.0"));
        assert!(!bump_created("v1.5.0", "1.4.0"));
    }

    #[test]
    fn test_nothing_to_commit_is_exit_one() {
        assert!(nothing_to_commit(&exit(1, "nothing to commit, working tree clean")));
        assert!(!nothing_to_commit(&exit(129, "")));
    }
}
