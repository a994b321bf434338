pub mod fake;

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use gmc_core::error::GmcError;
use gmc_core::sink::OutputSink;

/// The four git operations the cache needs. Each is reported purely as
/// succeeded or failed; the tool's stdout/stderr pass through unmodified.
pub trait GitClient {
    /// Read a named remote's URL from a working copy. `None` when the
    /// remote is not configured.
    fn remote_get_url(&self, repo: &Path, remote: &str) -> Result<Option<String>, GmcError>;

    /// Point a named remote at `url`. Idempotent.
    fn remote_set_url(&self, repo: &Path, remote: &str, url: &str) -> Result<(), GmcError>;

    /// Mirror-clone `source` into `dest`.
    fn clone_mirror(&self, source: &str, dest: &Path) -> Result<(), GmcError>;

    /// Fetch all refs into an existing mirror.
    fn fetch_all(&self, mirror: &Path) -> Result<(), GmcError>;
}

/// `GitClient` backed by the system `git` binary.
pub struct SystemGit {
    sink: OutputSink,
}

impl SystemGit {
    /// Probe for a usable git binary. A launch failure here is fatal to
    /// the whole run: no cache operation can succeed without git.
    pub fn locate(sink: OutputSink) -> Result<Self, GmcError> {
        let probe = Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match probe {
            Ok(status) if status.success() => Ok(Self { sink }),
            Ok(status) => Err(GmcError::GitNotFound {
                message: format!("`git --version` exited with {status}"),
            }),
            Err(e) => Err(GmcError::GitNotFound {
                message: format!("failed to run git: {e}"),
            }),
        }
    }

    /// Run a git command, streaming its stdout/stderr line-by-line to the
    /// console and the run log as they arrive. Blocks until the child
    /// exits; no timeout is applied.
    fn run(&self, args: &[&str]) -> Result<(), GmcError> {
        tracing::info!("running git {}", args.join(" "));
        let mut child = Command::new("git")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GmcError::GitCommand {
                message: format!("failed to run git {}: {e}", args.join(" ")),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain stderr on a helper thread so neither pipe can fill up and
        // stall the child.
        let status = std::thread::scope(|scope| {
            let err_sink = self.sink.clone();
            scope.spawn(move || {
                if let Some(stderr) = stderr {
                    for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                        err_sink.stderr_line(&line);
                    }
                }
            });
            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    self.sink.stdout_line(&line);
                }
            }
            child.wait()
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(GmcError::GitCommand {
                message: format!("git {} failed with {status}", args.join(" ")),
            })
        }
    }
}

impl GitClient for SystemGit {
    fn remote_get_url(&self, repo: &Path, remote: &str) -> Result<Option<String>, GmcError> {
        let repo_str = repo.to_string_lossy();
        let output = Command::new("git")
            .args(["-C", &repo_str, "remote", "get-url", remote])
            .output()
            .map_err(|e| GmcError::GitCommand {
                message: format!("failed to run git remote get-url: {e}"),
            })?;
        if output.status.success() {
            let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Some(url))
        } else {
            Ok(None)
        }
    }

    fn remote_set_url(&self, repo: &Path, remote: &str, url: &str) -> Result<(), GmcError> {
        let repo_str = repo.to_string_lossy();
        self.run(&["-C", &repo_str, "remote", "set-url", remote, url])
    }

    fn clone_mirror(&self, source: &str, dest: &Path) -> Result<(), GmcError> {
        let dest_str = dest.to_string_lossy();
        self.run(&["clone", "--mirror", source, &dest_str])
    }

    fn fetch_all(&self, mirror: &Path) -> Result<(), GmcError> {
        let mirror_str = mirror.to_string_lossy();
        self.run(&["-C", &mirror_str, "fetch", "--all"])
    }
}
