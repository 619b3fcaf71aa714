// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! The interfaces to version control and the shell that sources are handled with

use crate::Result;

use std::path::Path;
use std::sync::Arc;

// ----------------------------------------------------------------------
// - Vcs:
// ----------------------------------------------------------------------

/// Version control operations on a cache or build directory
pub trait Vcs: Send + Sync {
    /// Create `repo_dir` if necessary and initialize a repository in it
    ///
    /// # Errors
    /// Errors out if the repository could not be initialized.
    fn init(&self, repo_dir: &Path) -> Result<()>;

    /// Register the remote `name` pointing to `url`, updating the `url` if
    /// the remote already exists
    ///
    /// # Errors
    /// Errors out if the remote could neither be added nor updated.
    fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()>;

    /// Fetch from all remotes. With `fail_soft` set a failing fetch is only
    /// reported, not returned.
    ///
    /// # Errors
    /// Errors out if fetching failed and `fail_soft` is not set.
    fn fetch(&self, repo_dir: &Path, fail_soft: bool) -> Result<()>;

    /// Resolve `reference` to a commit id inside `repo_dir`
    ///
    /// # Errors
    /// Errors out if `reference` can not be resolved.
    fn resolve_ref(&self, repo_dir: &Path, reference: &str) -> Result<String>;

    /// The commit id currently checked out in `work_dir`
    ///
    /// # Errors
    /// Errors out if `work_dir` is not a valid checkout.
    fn current_commit(&self, work_dir: &Path) -> Result<String>;

    /// Check out `reference` from `repo_dir` into the (empty) `dest_dir`
    ///
    /// # Errors
    /// Errors out if the checkout fails.
    fn checkout(&self, dest_dir: &Path, repo_dir: &Path, reference: &str) -> Result<()>;
}

/// A shared `Vcs`
pub type BoxedVcs = Arc<dyn Vcs>;

// ----------------------------------------------------------------------
// - Shell:
// ----------------------------------------------------------------------

/// File system level operations on a build directory
pub trait Shell: Send + Sync {
    /// Unpack `archive` into `dest_dir`
    ///
    /// # Errors
    /// Errors out if the archive can not be unpacked.
    fn unpack(&self, archive: &Path, dest_dir: &Path) -> Result<()>;

    /// Apply the `patch` file to the tree in `work_dir`
    ///
    /// # Errors
    /// Errors out if the patch does not apply.
    fn apply_patch(&self, work_dir: &Path, patch: &Path) -> Result<()>;

    /// Set the modification time of `path` to now
    ///
    /// # Errors
    /// Errors out if the timestamp can not be updated.
    fn touch(&self, path: &Path) -> Result<()>;
}

/// A shared `Shell`
pub type BoxedShell = Arc<dyn Shell>;
