// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A `Vcs` implementation running the `git` binary

use crate::gateway::Vcs;
use crate::Result;

use cellar_command::{CommandBuilder, Output, Runner, RunnerBuilder};

use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------
// - Git:
// ----------------------------------------------------------------------

/// Run `git` to manage source caches and checkouts
#[derive(Debug)]
pub struct Git {
    git_binary: PathBuf,
    runner: Runner,
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Git {
    /// Create a `Git` gateway using `git_binary`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(git_binary: P) -> Self {
        Self {
            git_binary: git_binary.into(),
            runner: RunnerBuilder::new().add_environment("LC_ALL", "C").build(),
        }
    }

    fn git(&self, directory: &Path, args: &[&str]) -> Result<Output> {
        let command = args
            .iter()
            .fold(
                CommandBuilder::new(&self.git_binary).current_directory(directory),
                |builder, a| builder.add_argument(a),
            )
            .build();
        self.runner.run(&command)
    }
}

impl Vcs for Git {
    #[tracing::instrument(level = "debug", skip(self))]
    fn init(&self, repo_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(repo_dir)?;
        self.git(repo_dir, &["init", "--quiet"]).map(|_| ())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        if self.git(repo_dir, &["remote", "add", name, url]).is_err() {
            tracing::trace!("Remote \"{}\" exists, updating its URL.", name);
            self.git(repo_dir, &["remote", "set-url", name, url])?;
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn fetch(&self, repo_dir: &Path, fail_soft: bool) -> Result<()> {
        match self.git(repo_dir, &["fetch", "--all", "--quiet"]) {
            Ok(_) => Ok(()),
            Err(e) if fail_soft => {
                tracing::warn!(
                    "Fetching into \"{}\" failed, continuing with cached data: {}",
                    repo_dir.to_string_lossy(),
                    e
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn resolve_ref(&self, repo_dir: &Path, reference: &str) -> Result<String> {
        let spec = format!("{}^{{commit}}", reference);
        let output = self.git(repo_dir, &["rev-parse", "--verify", "--quiet", spec.as_str()])?;
        Ok(output.stdout.trim().to_string())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn current_commit(&self, work_dir: &Path) -> Result<String> {
        let output = self.git(work_dir, &["rev-parse", "--verify", "HEAD"])?;
        Ok(output.stdout.trim().to_string())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn checkout(&self, dest_dir: &Path, repo_dir: &Path, reference: &str) -> Result<()> {
        let commit = self.resolve_ref(repo_dir, reference)?;
        let repo_dir = repo_dir.canonicalize()?;
        let repo = repo_dir.to_string_lossy().to_string();
        self.git(
            dest_dir,
            &["clone", "--quiet", "--shared", "--no-checkout", repo.as_str(), "."],
        )?;
        self.git(dest_dir, &["checkout", "--quiet", "--detach", commit.as_str()])?;
        tracing::debug!(
            "Checked out {} into \"{}\".",
            commit,
            dest_dir.to_string_lossy()
        );
        Ok(())
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
