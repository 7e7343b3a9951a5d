use crate::command::CommandRunner;
use crate::config::ReleaseConfig;
use crate::error::{Error, Result, SkipReason};
use crate::event::PushEvent;
use crate::manifest;
use crate::sequencer::Sequencer;
use crate::ui;

/// Terminal result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub version: String,
    pub tag: String,
}

/// Full pipeline: ref check, manifest read, git mutation, publish.
///
/// Strictly sequential, no retries. Every stage either returns a value or
/// raises exactly one error kind; benign stop conditions surface as
/// [Error::Skip] and collapse into the neutral exit status only at the
/// process boundary.
pub fn run<R: CommandRunner>(
    runner: &R,
    config: &ReleaseConfig,
    event: &PushEvent,
) -> Result<Outcome> {
    let expected = format!("refs/heads/{}", config.default_branch);
    if event.git_ref != expected {
        return Err(Error::Skip(SkipReason::RefMismatch {
            git_ref: event.git_ref.clone(),
            default_branch: config.default_branch.clone(),
        }));
    }

    let current = manifest::read_version(&config.working_dir)?;
    ui::info(&format!("Current version: {}", current));

    let release = Sequencer::new(runner, config, &event.commits).run()?;

    publish(runner, config, &release.version)?;

    ui::success("Done.");
    Ok(Outcome {
        version: release.version,
        tag: release.tag,
    })
}

/// Registry publish, a single opaque external call.
///
/// A rejection for a version the registry already has (see
/// [already_published]) ends the run as a benign skip; any other failure
/// is fatal.
fn publish<R: CommandRunner>(runner: &R, config: &ReleaseConfig, version: &str) -> Result<()> {
    let outcome = runner.run(
        &config.working_dir,
        "yarn",
        &["publish", "--non-interactive", "--new-version", version],
    );

    match outcome {
        Ok(()) => {
            ui::success(&format!("Version has been published: {}", version));
            Ok(())
        }
        Err(err) if already_published(&err) => Err(Error::Skip(SkipReason::VersionPublished {
            version: version.to_string(),
        })),
        Err(err) => Err(err),
    }
}

/// Registry refusal to overwrite an existing version.
fn already_published(err: &Error) -> bool {
    err.command_exit_code() == Some(1)
        && err
            .command_stderr()
            .is_some_and(|stderr| stderr.contains("previously published"))
}
