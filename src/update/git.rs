// file: src/update/git.rs
// version: 1.0.0
// guid: 5e0a7c29-b4d1-4f63-9a8e-c2d6f1b3e507

//! Source revision queries through the `git` binary

use crate::{error::XiToolError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// The project checkout the fixtures are committed in
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| XiToolError::git(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(XiToolError::git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Abbreviated hash of HEAD, or `None` outside a git checkout
    pub async fn current_revision(&self) -> Option<String> {
        match self.run(&["rev-parse", "--short=8", "HEAD"]).await {
            Ok(out) => {
                let rev = out.trim().to_string();
                (!rev.is_empty()).then_some(rev)
            }
            Err(e) => {
                debug!("No source revision available: {}", e);
                None
            }
        }
    }

    /// Files below `subdir` that differ between two revisions and still exist
    pub async fn changed_files(&self, from: &str, to: &str, subdir: &str) -> Result<Vec<PathBuf>> {
        let out = self
            .run(&["diff", "--name-only", "--relative", from, to, "--", subdir])
            .await?;

        let files = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.root.join(line))
            .filter(|path| path.exists())
            .collect();
        Ok(files)
    }
}
