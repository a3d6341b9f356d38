// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Thin wrapper over the `git` executable.
///
/// Commands run from the directory the service was discovered at, so
/// `stage_all` only covers that subtree.
pub struct GitService {
    repo: gix::Repository,
    cwd: PathBuf,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        Self::discover_at(Path::new("."))
    }

    pub fn discover_at(path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(|_| Error::NotAGitRepo)?;

        if repo.workdir().is_none() {
            return Err(Error::Git("Bare repository not supported".into()));
        }

        Ok(Self {
            repo,
            cwd: path.to_path_buf(),
        })
    }

    pub fn check_state(&self) -> Result<()> {
        let state = self.repo.state();
        if matches!(state, Some(gix::state::InProgress::Merge)) {
            return Err(Error::MergeInProgress);
        }
        Ok(())
    }

    /// `git add .` relative to the invocation directory.
    pub async fn stage_all(&self) -> Result<()> {
        self.run(&["add", "."]).await.map(drop)
    }

    /// Full `git diff --staged` output, untruncated.
    pub async fn staged_diff(&self) -> Result<String> {
        self.check_state()?;

        // --no-ext-diff: external diff drivers would change the text the model sees
        let diff = self.run(&["diff", "--staged", "--no-ext-diff"]).await?;

        if diff.trim().is_empty() {
            return Err(Error::NoStagedChanges);
        }

        debug!(bytes = diff.len(), lines = diff.lines().count(), "staged diff read");
        Ok(diff)
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await.map(drop)
    }

    pub async fn push(&self) -> Result<()> {
        self.run(&["push"]).await.map(drop)
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(args = ?args, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.cwd)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
