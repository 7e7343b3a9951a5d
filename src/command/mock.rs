use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::CommandRunner;
use crate::error::{Error, Result};

/// One recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Rendered `program arg arg ...` line, convenient for assertions.
    pub fn line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

enum Failure {
    Exit { code: i32, stderr: String },
    Launch,
}

type Effect = Box<dyn Fn(&Path) + Send + Sync>;

/// Mock runner for testing the pipeline without git or yarn.
///
/// Every invocation succeeds unless a failure has been scripted for it, and
/// is recorded either way. Scripts match on a substring of the rendered
/// command line (see [Invocation::line]); the first matching script wins.
/// Side effects registered with [MockRunner::on_run] fire for each matching
/// invocation before its outcome is decided, which is how tests simulate
/// the bump tool rewriting the manifest.
#[derive(Default)]
pub struct MockRunner {
    failures: Mutex<Vec<(String, Failure)>>,
    effects: Mutex<Vec<(String, Effect)>>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a non-zero exit for invocations matching `fragment`.
    pub fn fail_on(&self, fragment: impl Into<String>, code: i32, stderr: impl Into<String>) {
        self.failures.lock().unwrap().push((
            fragment.into(),
            Failure::Exit {
                code,
                stderr: stderr.into(),
            },
        ));
    }

    /// Script a launch failure for invocations matching `fragment`.
    pub fn fail_launch_on(&self, fragment: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .push((fragment.into(), Failure::Launch));
    }

    /// Register a side effect for invocations matching `fragment`. The
    /// effect receives the working directory.
    pub fn on_run<F>(&self, fragment: impl Into<String>, effect: F)
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        self.effects
            .lock()
            .unwrap()
            .push((fragment.into(), Box::new(effect)));
    }

    /// All invocations recorded so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// True if any recorded invocation's line contains `fragment`.
    pub fn ran(&self, fragment: &str) -> bool {
        self.position(fragment).is_some()
    }

    /// Index of the first recorded invocation whose line contains
    /// `fragment`, for ordering assertions.
    pub fn position(&self, fragment: &str) -> Option<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .position(|call| call.line().contains(fragment))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let invocation = Invocation {
            dir: dir.to_path_buf(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        let line = invocation.line();
        self.calls.lock().unwrap().push(invocation);

        for (fragment, effect) in self.effects.lock().unwrap().iter() {
            if line.contains(fragment.as_str()) {
                effect(dir);
            }
        }

        let failures = self.failures.lock().unwrap();
        match failures.iter().find(|(fragment, _)| line.contains(fragment.as_str())) {
            Some((_, Failure::Exit { code, stderr })) => Err(Error::CommandFailed {
                program: program.to_string(),
                code: *code,
                stderr: stderr.clone(),
            }),
            Some((_, Failure::Launch)) => Err(Error::CommandLaunch {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted launch failure"),
            }),
            None => Ok(()),
        }
    }
}
