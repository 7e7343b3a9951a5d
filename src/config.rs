use std::env;
use std::path::PathBuf;

use regex::Regex;

use crate::error::{Error, Result};
use crate::event::Owner;

/// Token replaced by the version string when rendering tag templates.
const PLACEHOLDER: &str = "%s";

const DEFAULT_WORKSPACE: &str = "/github/workspace";
const DEFAULT_EVENT_FILE: &str = "/github/workflow/event.json";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_COMMIT_PATTERN: &str = r"^(?:Release|Version) (\S+)";
const DEFAULT_TAG_NAME: &str = "v%s";
const DEFAULT_TAG_MESSAGE: &str = "v%s";
const DEFAULT_BUILD_COMMAND: &str = "build";
const DEFAULT_BUILD_OUTPUT: &str = "dist";

/// Tag-name or tag-message template carrying the `%s` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    /// Validates that `value` carries the placeholder. `name` is the
    /// environment variable the value came from, used in the error.
    pub fn new(name: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.contains(PLACEHOLDER) {
            Ok(Template(value))
        } else {
            Err(Error::config(format!(
                "missing placeholder in variable: {}",
                name
            )))
        }
    }

    fn from_env(name: &str, default: &str) -> Result<Self> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Self::new(name, value),
            _ => Ok(Template(default.to_string())),
        }
    }

    /// Replace the placeholder with the version string.
    pub fn render(&self, version: &str) -> String {
        self.0.replace(PLACEHOLDER, version)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity used for the release commit and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAuthor {
    pub name: String,
    pub email: String,
}

impl From<&Owner> for TagAuthor {
    fn from(owner: &Owner) -> Self {
        TagAuthor {
            name: owner.name.clone(),
            email: owner.email.clone(),
        }
    }
}

/// Immutable run configuration, built once at process start.
///
/// No later stage reads the environment; everything environment-sourced
/// flows through this value.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub working_dir: PathBuf,
    pub default_branch: String,
    /// Single-capture-group pattern matched against commit messages
    pub commit_pattern: Regex,
    pub tag_name: Template,
    pub tag_message: Template,
    pub tag_author: TagAuthor,
    /// Script name passed to `yarn run`
    pub build_command: String,
    /// Directory force-added to the index after the build
    pub build_output: String,
}

impl ReleaseConfig {
    /// Build the run configuration from the environment.
    ///
    /// `dir` overrides the workspace root; the tag author comes from the
    /// event payload's repository owner.
    pub fn from_env(dir: Option<PathBuf>, tag_author: TagAuthor) -> Result<Self> {
        Ok(ReleaseConfig {
            working_dir: dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE)),
            default_branch: env_or("DEFAULT_BRANCH", DEFAULT_BRANCH),
            commit_pattern: compile_commit_pattern(&env_or(
                "COMMIT_PATTERN",
                DEFAULT_COMMIT_PATTERN,
            ))?,
            tag_name: Template::from_env("TAG_NAME", DEFAULT_TAG_NAME)?,
            tag_message: Template::from_env("TAG_MESSAGE", DEFAULT_TAG_MESSAGE)?,
            tag_author,
            build_command: env_or("BUILD_COMMAND", DEFAULT_BUILD_COMMAND),
            build_output: env_or("BUILD_OUTPUT", DEFAULT_BUILD_OUTPUT),
        })
    }

    /// Configuration with every input at its default, for a given
    /// workspace. Used by tests; `from_env` produces the same value when
    /// no variables are set.
    pub fn with_defaults(working_dir: PathBuf, tag_author: TagAuthor) -> Self {
        ReleaseConfig {
            working_dir,
            default_branch: DEFAULT_BRANCH.to_string(),
            commit_pattern: Regex::new(DEFAULT_COMMIT_PATTERN)
                .expect("default commit pattern is valid"),
            tag_name: Template(DEFAULT_TAG_NAME.to_string()),
            tag_message: Template(DEFAULT_TAG_MESSAGE.to_string()),
            tag_author,
            build_command: DEFAULT_BUILD_COMMAND.to_string(),
            build_output: DEFAULT_BUILD_OUTPUT.to_string(),
        }
    }
}

/// Path of the event payload file. Read from the environment before the
/// configuration proper exists, since the payload supplies the tag author.
pub fn event_file_from_env() -> PathBuf {
    env::var("GITHUB_EVENT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_EVENT_FILE))
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn compile_commit_pattern(pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern)
        .map_err(|e| Error::config(format!("invalid commit pattern: {}", e)))?;
    if regex.captures_len() != 2 {
        return Err(Error::config(format!(
            "commit pattern must have exactly one capturing group: {}",
            pattern
        )));
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_requires_placeholder() {
        assert!(Template::new("TAG_NAME", "v%s").is_ok());
        let err = Template::new("TAG_NAME", "release").unwrap_err();
        assert!(err
            .to_string()
            .contains("missing placeholder in variable: TAG_NAME"));
    }

    #[test]
    fn test_template_render() {
        let template = Template::new("TAG_NAME", "v%s").unwrap();
        assert_eq!(template.render("1.2.3"), "v1.2.3");

        let template = Template::new("TAG_MESSAGE", "release %s (stable)").unwrap();
        assert_eq!(template.render("2.0.0"), "release 2.0.0 (stable)");
    }

    #[test]
    fn test_commit_pattern_group_count() {
        assert!(compile_commit_pattern(r"^(?:Release|Version) (\S+)").is_ok());
        assert!(compile_commit_pattern(r"^Release \S+").is_err());
        assert!(compile_commit_pattern(r"^(Release) (\S+)").is_err());
        assert!(compile_commit_pattern(r"^Release (").is_err());
    }

    #[test]
    fn test_with_defaults() {
        let author = TagAuthor {
            name: "CI".to_string(),
            email: "ci@example.com".to_string(),
        };
        let config = ReleaseConfig::with_defaults(PathBuf::from("/tmp/ws"), author);
        assert_eq!(config.default_branch, "master");
        assert_eq!(config.tag_name.render("1.0.0"), "v1.0.0");
        assert!(config.commit_pattern.is_match("Release 1.0.0"));
        assert!(config.commit_pattern.is_match("Version 2.0.0-beta.1"));
        assert!(!config.commit_pattern.is_match("feat: release tooling"));
    }
}
