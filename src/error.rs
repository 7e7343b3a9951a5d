use std::fmt;

use thiserror::Error;

/// Exit status reported for benign skips, distinguishable by the calling CI
/// from both success (0) and failure (any other non-zero).
pub const NEUTRAL_EXIT_CODE: i32 = 78;

/// Expected, non-actionable stop conditions.
///
/// Reaching one of these means the run has nothing left to do: it is logged
/// at informational level and mapped to [NEUTRAL_EXIT_CODE], never treated
/// as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The push was not to the configured default branch
    RefMismatch {
        git_ref: String,
        default_branch: String,
    },
    /// No package manifest in the working directory
    ManifestMissing { path: String },
    /// A tag for the resolved version already exists
    TagExists { tag: String },
    /// The registry already has this version
    VersionPublished { version: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RefMismatch {
                git_ref,
                default_branch,
            } => {
                write!(
                    f,
                    "ref {} is not the default branch: {}",
                    git_ref, default_branch
                )
            }
            SkipReason::ManifestMissing { path } => {
                write!(f, "package file not found: {}", path)
            }
            SkipReason::TagExists { tag } => write!(f, "tag already exists: {}", tag),
            SkipReason::VersionPublished { version } => {
                write!(f, "version already published: {}", version)
            }
        }
    }
}

/// Unified error type for autorelease operations
#[derive(Error, Debug)]
pub enum Error {
    /// Benign stop condition, not a failure
    #[error("{0}")]
    Skip(SkipReason),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("event payload error: {0}")]
    Event(String),

    #[error("manifest error: {0}")]
    Manifest(String),

    /// A subprocess ran and exited non-zero. The runner reports the true
    /// outcome; whether a specific code is acceptable is the caller's call.
    #[error("command failed: {program} exited with code {code}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// A subprocess could not be launched at all
    #[error("command failed: {program}: {source}")]
    CommandLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in autorelease
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an event payload error with context
    pub fn event(msg: impl Into<String>) -> Self {
        Error::Event(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        Error::Manifest(msg.into())
    }

    /// True for the expected stop conditions that map to the neutral exit
    /// status at the process boundary.
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::Skip(_))
    }

    /// Exit code of a failed command, if that is what this error is.
    ///
    /// The idempotency predicates next to each git/yarn call site pattern
    /// match on this instead of treating every non-zero exit alike.
    pub fn command_exit_code(&self) -> Option<i32> {
        match self {
            Error::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Captured stderr of a failed command, if any.
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}
