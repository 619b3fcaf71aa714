// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! The persistent per-recipe source cache shared by all `Source` strategies

use crate::gateway::BoxedVcs;
use crate::{Error, Result, SourceDescriptor};

// ----------------------------------------------------------------------
// - GitCache:
// ----------------------------------------------------------------------

/// Manage the version controlled cache directory of one recipe.
///
/// The cache directory is never removed: It is re-used by all builds.
pub struct GitCache {
    descriptor: SourceDescriptor,
    vcs: BoxedVcs,
}

impl GitCache {
    /// Constructor
    #[must_use]
    pub fn new(descriptor: SourceDescriptor, vcs: BoxedVcs) -> Self {
        Self { descriptor, vcs }
    }

    /// The `SourceDescriptor` of the recipe
    #[must_use]
    pub const fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    /// The `Vcs` used to manage the cache
    #[must_use]
    pub fn vcs(&self) -> &BoxedVcs {
        &self.vcs
    }

    /// Bring the cache up to date with all remotes.
    ///
    /// A failing fetch is tolerated so that builds can work from an existing
    /// cache, but the pinned reference must resolve afterwards.
    ///
    /// # Errors
    /// Returns `Error::Config` if the pinned reference can not be resolved.
    #[tracing::instrument(level = "debug", skip(self), fields(recipe = %self.descriptor.name))]
    pub fn fetch(&self) -> Result<()> {
        let repo_dir = &self.descriptor.repo_dir;

        if self.descriptor.supports_non_source_build {
            if !repo_dir.exists() {
                std::fs::create_dir_all(repo_dir)?;
            }
            tracing::debug!("No sources to fetch.");
            return Ok(());
        }

        if !repo_dir.exists() {
            tracing::info!(
                "Creating source cache in \"{}\".",
                repo_dir.to_string_lossy()
            );
            self.vcs.init(repo_dir)?;
        }
        for (remote, url) in &self.descriptor.remotes {
            self.vcs.add_remote(repo_dir, remote, url)?;
        }

        if let Err(e) = self.vcs.fetch(repo_dir, true) {
            tracing::warn!(
                "Failed to fetch sources of \"{}\", using cached data: {}",
                self.descriptor.name,
                e
            );
        }

        let commit = self.resolve_commit()?;
        tracing::info!(
            "Sources of \"{}\" pinned at {} ({}).",
            self.descriptor.name,
            self.descriptor.commit,
            commit
        );
        Ok(())
    }

    /// Resolve the pinned reference to a commit id inside the cache
    ///
    /// # Errors
    /// Returns `Error::Config` if the reference is not known in the cache.
    pub fn resolve_commit(&self) -> Result<String> {
        self.vcs
            .resolve_ref(&self.descriptor.repo_dir, &self.descriptor.commit)
            .map_err(|e| {
                Error::Config(format!(
                    "Can not resolve \"{}\" for recipe \"{}\": {}",
                    self.descriptor.commit, self.descriptor.name, e
                ))
            })
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, tempdir, FakeVcs};

    use std::sync::Arc;

    #[test]
    fn cache_fetch_is_idempotent() {
        let tmp = tempdir("cache-fetch-");
        let vcs = Arc::new(FakeVcs::default());
        vcs.set_ref("origin/sdk-1.0", "c0ffee");
        let cache = GitCache::new(descriptor(tmp.path(), "zlib"), vcs.clone());

        cache.fetch().unwrap();
        cache.fetch().unwrap();

        assert!(cache.descriptor().repo_dir.is_dir());
        let calls = vcs.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("init")).count(), 1);
        assert_eq!(calls.iter().filter(|c| c.starts_with("fetch")).count(), 2);
        assert_eq!(
            calls.iter().filter(|c| c.starts_with("add_remote origin")).count(),
            2
        );
    }

    #[test]
    fn cache_fetch_tolerates_offline_remotes() {
        let tmp = tempdir("cache-offline-");
        let vcs = Arc::new(FakeVcs::default());
        vcs.set_ref("origin/sdk-1.0", "c0ffee");
        vcs.set_offline(true);
        let cache = GitCache::new(descriptor(tmp.path(), "zlib"), vcs);

        cache.fetch().unwrap();
        assert_eq!(cache.resolve_commit().unwrap(), "c0ffee");
    }

    #[test]
    fn cache_fetch_fails_on_unknown_ref() {
        let tmp = tempdir("cache-unknown-");
        let vcs = Arc::new(FakeVcs::default());
        let cache = GitCache::new(descriptor(tmp.path(), "zlib"), vcs);

        assert!(matches!(cache.fetch(), Err(Error::Config(_))));
    }

    #[test]
    fn cache_non_source_build_only_creates_directory() {
        let tmp = tempdir("cache-nonsrc-");
        let vcs = Arc::new(FakeVcs::default());
        let mut d = descriptor(tmp.path(), "gstreamer-sdk-shell");
        d.supports_non_source_build = true;
        let cache = GitCache::new(d, vcs.clone());

        cache.fetch().unwrap();
        cache.fetch().unwrap();

        assert!(cache.descriptor().repo_dir.is_dir());
        assert!(vcs.calls().is_empty());
    }
}
