// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A `Source` checked out from the cache, re-created only when the pinned
//! commit changes

use crate::{GitCache, Result, Source, SourceDescriptor};

// ----------------------------------------------------------------------
// - LiveCheckoutSource:
// ----------------------------------------------------------------------

/// Check out the pinned reference from the cache into the build directory
pub struct LiveCheckoutSource {
    cache: GitCache,
}

impl LiveCheckoutSource {
    /// Constructor
    #[must_use]
    pub fn new(cache: GitCache) -> Self {
        Self { cache }
    }

    fn is_up_to_date(&self) -> Result<bool> {
        let wanted = self.cache.resolve_commit()?;
        let current = self
            .cache
            .vcs()
            .current_commit(&self.cache.descriptor().build_dir)?;
        tracing::trace!("Wanted commit {}, checked out commit {}.", wanted, current);
        Ok(wanted == current)
    }
}

impl Source for LiveCheckoutSource {
    fn descriptor(&self) -> &SourceDescriptor {
        self.cache.descriptor()
    }

    fn fetch(&self) -> Result<()> {
        self.cache.fetch()
    }

    #[tracing::instrument(level = "debug", skip(self), fields(recipe = %self.cache.descriptor().name))]
    fn extract(&self) -> Result<bool> {
        let descriptor = self.cache.descriptor();
        let build_dir = &descriptor.build_dir;

        if build_dir.exists() {
            match self.is_up_to_date() {
                Ok(true) => {
                    tracing::info!("Build directory of \"{}\" is up to date.", descriptor.name);
                    return Ok(false);
                }
                Ok(false) => {}
                Err(e) => tracing::debug!(
                    "Can not inspect \"{}\", rebuilding it: {}",
                    build_dir.to_string_lossy(),
                    e
                ),
            }
            std::fs::remove_dir_all(build_dir)?;
        }

        std::fs::create_dir_all(build_dir)?;
        tracing::info!(
            "Checking out {} into \"{}\".",
            descriptor.commit,
            build_dir.to_string_lossy()
        );
        self.cache
            .vcs()
            .checkout(build_dir, &descriptor.repo_dir, &descriptor.commit)?;
        Ok(true)
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
