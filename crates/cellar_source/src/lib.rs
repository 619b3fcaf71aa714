// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Acquire the sources of a recipe: Keep a local cache per recipe up to date
//! and materialize a build directory from that cache.

// Setup warnings/errors:
#![forbid(unsafe_code)]
#![deny(
    bare_trait_objects,
    unused_doc_comments,
    unused_import_braces,
    missing_docs
)]
// Clippy:
#![warn(clippy::all, clippy::nursery, clippy::pedantic)]
#![allow(clippy::non_ascii_literal, clippy::module_name_repetitions)]

use std::sync::Arc;

// ----------------------------------------------------------------------
// - Modules:
// ----------------------------------------------------------------------

mod cache;
pub(crate) mod deterministic_directory_iterator;
mod descriptor;
pub mod gateway;
mod git;
mod live_checkout;
mod local_tarball;
mod normalized_checkout;
mod patches;
mod shell;

#[cfg(test)]
pub(crate) mod testing;

// ----------------------------------------------------------------------
// - Exports:
// ----------------------------------------------------------------------

pub use cellar_core::{Error, Result};

pub use cache::GitCache;
pub use descriptor::{SourceDefinition, SourceDescriptor};
pub use gateway::{BoxedShell, BoxedVcs, Shell, Vcs};
pub use git::Git;
pub use live_checkout::LiveCheckoutSource;
pub use local_tarball::LocalTarballSource;
pub use normalized_checkout::NormalizedCheckoutSource;
pub use patches::PatchSet;
pub use shell::SystemShell;

// ----------------------------------------------------------------------
// - Source:
// ----------------------------------------------------------------------

/// A handler for the sources of one recipe
pub trait Source {
    /// The `SourceDescriptor` this `Source` works on
    fn descriptor(&self) -> &SourceDescriptor;

    /// Fetch the sources into the local cache directory
    ///
    /// # Errors
    /// Returns an `Error::Config` if the pinned reference can not be resolved
    /// after fetching, or other errors when the cache can not be set up.
    fn fetch(&self) -> Result<()>;

    /// Materialize the build directory from the local cache.
    ///
    /// Returns `true` if the build directory was (re-)created.
    ///
    /// # Errors
    /// Returns an error if the build directory can not be created.
    fn extract(&self) -> Result<bool>;
}

/// A boxed `Source`
pub type BoxedSource = Box<dyn Source + Send + Sync>;

// ----------------------------------------------------------------------
// - SourceKind:
// ----------------------------------------------------------------------

/// The different strategies to handle sources with
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A release tarball plus patches, stored in the cache
    LocalTarball,
    /// A plain checkout of the cache
    Git,
    /// A checkout of the cache with normalized timestamps on build system files
    GitTarball,
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::Git
    }
}

impl std::str::FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local_tarball" => Ok(Self::LocalTarball),
            "git" => Ok(Self::Git),
            "git_tarball" => Ok(Self::GitTarball),
            _ => Err(Error::Conversion {
                expression: s.to_string(),
                typename: "SourceKind".to_string(),
                message: "Unknown source kind".to_string(),
            }),
        }
    }
}

/// Create the `Source` of `kind` for `descriptor`
#[must_use]
pub fn create_source(
    kind: SourceKind,
    descriptor: SourceDescriptor,
    vcs: BoxedVcs,
    shell: BoxedShell,
) -> BoxedSource {
    tracing::debug!("Creating {:?} source for \"{}\".", kind, descriptor.name);
    let cache = GitCache::new(descriptor, vcs);
    match kind {
        SourceKind::LocalTarball => Box::new(LocalTarballSource::new(cache, shell)),
        SourceKind::Git => Box::new(LiveCheckoutSource::new(cache)),
        SourceKind::GitTarball => Box::new(NormalizedCheckoutSource::new(
            LiveCheckoutSource::new(cache),
            shell,
        )),
    }
}

/// Create the default `Vcs` and `Shell` gateways
#[must_use]
pub fn default_gateways() -> (BoxedVcs, BoxedShell) {
    (Arc::new(Git::default()), Arc::new(SystemShell::default()))
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
