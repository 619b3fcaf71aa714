// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Collect the patches to apply on top of a release tarball

use crate::Result;

use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------
// - Constants:
// ----------------------------------------------------------------------

const PATCH_EXTENSION: &str = ".patch";

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

fn patches_in(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        tracing::trace!(
            "No patch directory \"{}\".",
            directory.to_string_lossy()
        );
        return Ok(Vec::new());
    }

    let mut patches = std::fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(std::ffi::OsStr::to_str)
                    .map_or(false, |n| n.ends_with(PATCH_EXTENSION))
        })
        .collect::<Vec<_>>();
    patches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(patches)
}

// ----------------------------------------------------------------------
// - PatchSet:
// ----------------------------------------------------------------------

/// The ordered list of patches to apply: All common patches sorted by name,
/// followed by all platform specific patches sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchSet(Vec<PathBuf>);

impl PatchSet {
    /// Collect the patches from `common_dir` and `platform_dir`.
    ///
    /// Missing directories contribute no patches.
    ///
    /// # Errors
    /// Returns an error if an existing directory can not be read.
    pub fn collect(common_dir: &Path, platform_dir: &Path) -> Result<Self> {
        let mut patches = patches_in(common_dir)?;
        patches.append(&mut patches_in(platform_dir)?);
        Ok(Self(patches))
    }

    /// Check whether there are no patches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of patches
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the patches in application order
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PatchSet {
    type Item = &'a PathBuf;

    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tempdir;

    fn touch(path: &Path) {
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn patch_set_order() {
        let tmp = tempdir("patches-order-");
        let common = tmp.path();
        let platform = tmp.path().join("linux");
        std::fs::create_dir(&platform).unwrap();

        touch(&common.join("b.patch"));
        touch(&common.join("a.patch"));
        touch(&common.join("zlib-1.2.7.tar.gz"));
        touch(&platform.join("c.patch"));
        std::fs::create_dir(common.join("d.patch")).unwrap();

        let patches = PatchSet::collect(common, &platform).unwrap();
        let names = patches
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a.patch", "b.patch", "c.patch"]);
    }

    #[test]
    fn patch_set_platform_patches_come_last() {
        let tmp = tempdir("patches-platform-");
        let common = tmp.path().join("common");
        let platform = tmp.path().join("windows");
        std::fs::create_dir(&common).unwrap();
        std::fs::create_dir(&platform).unwrap();

        touch(&common.join("z.patch"));
        touch(&platform.join("a.patch"));

        let patches = PatchSet::collect(&common, &platform).unwrap();
        assert_eq!(
            patches.iter().cloned().collect::<Vec<_>>(),
            vec![common.join("z.patch"), platform.join("a.patch")]
        );
    }

    #[test]
    fn patch_set_missing_directories() {
        let tmp = tempdir("patches-missing-");
        let patches =
            PatchSet::collect(&tmp.path().join("nope"), &tmp.path().join("nope/linux")).unwrap();
        assert!(patches.is_empty());
        assert_eq!(patches.len(), 0);
    }
}
