// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A `Source` made from a release tarball and a set of patches kept in the cache

use crate::gateway::BoxedShell;
use crate::{Error, GitCache, PatchSet, Result, Source, SourceDescriptor};

use std::path::PathBuf;

// ----------------------------------------------------------------------
// - LocalTarballSource:
// ----------------------------------------------------------------------

/// Unpack the release tarball found in the cache and patch it.
///
/// Every `extract` unpacks and patches again, so it always reports a change.
pub struct LocalTarballSource {
    cache: GitCache,
    shell: BoxedShell,
}

impl LocalTarballSource {
    /// Constructor
    #[must_use]
    pub fn new(cache: GitCache, shell: BoxedShell) -> Self {
        Self { cache, shell }
    }

    /// Find the one tarball in the cache directory
    ///
    /// # Errors
    /// Returns `Error::Config` if there is no or more than one candidate.
    pub fn find_tarball(&self) -> Result<PathBuf> {
        let descriptor = self.cache.descriptor();
        let prefix = &descriptor.package_name;

        let mut candidates = std::fs::read_dir(&descriptor.repo_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(std::ffi::OsStr::to_str)
                        .map_or(false, |n| n.starts_with(prefix.as_str()) && !n.ends_with(".patch"))
            })
            .collect::<Vec<_>>();

        if candidates.len() == 1 {
            Ok(candidates.remove(0))
        } else {
            candidates.sort();
            Err(Error::Config(format!(
                "The local repository \"{}\" does not have a valid tarball starting with \"{}\" (found: {}).",
                descriptor.repo_dir.to_string_lossy(),
                prefix,
                candidates
                    .iter()
                    .map(|c| format!("\"{}\"", c.to_string_lossy()))
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

impl Source for LocalTarballSource {
    fn descriptor(&self) -> &SourceDescriptor {
        self.cache.descriptor()
    }

    fn fetch(&self) -> Result<()> {
        self.cache.fetch()
    }

    #[tracing::instrument(level = "debug", skip(self), fields(recipe = %self.cache.descriptor().name))]
    fn extract(&self) -> Result<bool> {
        let descriptor = self.cache.descriptor();

        std::fs::create_dir_all(&descriptor.build_dir)?;

        let tarball = self.find_tarball()?;
        tracing::info!("Unpacking \"{}\".", tarball.to_string_lossy());
        self.shell.unpack(&tarball, &descriptor.unpack_dir)?;

        let patches = PatchSet::collect(&descriptor.repo_dir, &descriptor.platform_patches_dir())?;
        tracing::debug!("Applying {} patches.", patches.len());
        for patch in &patches {
            self.shell.apply_patch(&descriptor.build_dir, patch)?;
        }

        Ok(true)
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
