// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A checkout with normalized timestamps on build system files.
//!
//! Version control does not preserve timestamps, so after a checkout generated
//! files like `configure` may look older than their inputs like `configure.ac`.
//! That makes the build regenerate them. Touching all of these files after
//! each checkout gives them one consistent timestamp.

use crate::deterministic_directory_iterator::{DeterministicDirectoryIterator, EntryKind};
use crate::gateway::BoxedShell;
use crate::{LiveCheckoutSource, Result, Source, SourceDescriptor};

use std::path::PathBuf;

// ----------------------------------------------------------------------
// - Constants:
// ----------------------------------------------------------------------

/// File name suffixes of build system files whose timestamps get normalized
pub const DEFAULT_MATCHES: &[&str] = &[".m4", ".in", "configure"];

/// A legacy build system input that is never touched
pub const EXCLUDED_FILE: &str = "configure.in";

const VCS_DIRECTORY: &str = ".git";

// ----------------------------------------------------------------------
// - NormalizedCheckoutSource:
// ----------------------------------------------------------------------

/// A `LiveCheckoutSource` that touches all build system files after a change
pub struct NormalizedCheckoutSource {
    checkout: LiveCheckoutSource,
    shell: BoxedShell,
    matches: Vec<String>,
    excluded: String,
}

impl NormalizedCheckoutSource {
    /// Constructor
    #[must_use]
    pub fn new(checkout: LiveCheckoutSource, shell: BoxedShell) -> Self {
        Self {
            checkout,
            shell,
            matches: DEFAULT_MATCHES.iter().map(|m| (*m).to_string()).collect(),
            excluded: EXCLUDED_FILE.to_string(),
        }
    }

    /// Replace the file name suffixes to normalize
    #[must_use]
    pub fn with_matches(mut self, matches: &[&str]) -> Self {
        self.matches = matches.iter().map(|m| (*m).to_string()).collect();
        self
    }

    fn is_match(&self, file_name: &str) -> bool {
        file_name != self.excluded && self.matches.iter().any(|m| file_name.ends_with(m.as_str()))
    }

    fn find_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in
            DeterministicDirectoryIterator::new(&self.descriptor().build_dir, &[VCS_DIRECTORY])?
        {
            let entry = entry?;
            if entry.kind == EntryKind::File && entry.file_name().map_or(false, |n| self.is_match(n))
            {
                files.push(entry.path);
            }
        }
        Ok(files)
    }
}

impl Source for NormalizedCheckoutSource {
    fn descriptor(&self) -> &SourceDescriptor {
        self.checkout.descriptor()
    }

    fn fetch(&self) -> Result<()> {
        self.checkout.fetch()
    }

    #[tracing::instrument(level = "debug", skip(self), fields(recipe = %self.descriptor().name))]
    fn extract(&self) -> Result<bool> {
        if !self.checkout.extract()? {
            return Ok(false);
        }

        let files = self.find_files()?;
        tracing::debug!("Normalizing timestamps of {} files.", files.len());
        for f in &files {
            self.shell.touch(f)?;
        }
        Ok(true)
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, tempdir, FakeShell, FakeVcs, ShellCall, OLD_MTIME};
    use crate::{GitCache, SystemShell};

    use std::sync::Arc;

    const TREE: &[(&str, &str)] = &[
        ("configure", "#!/bin/sh"),
        ("configure.ac", "AC_INIT"),
        ("configure.in", "AC_INIT"),
        ("Makefile.am", ""),
        ("Makefile.in", ""),
        ("m4/libtool.m4", ""),
        ("src/main.c", ""),
        ("src/config.h.in", ""),
        (".git/description.in", ""),
    ];

    fn setup(base: &std::path::Path, shell: BoxedShell) -> (NormalizedCheckoutSource, Arc<FakeVcs>) {
        let vcs = Arc::new(FakeVcs::default());
        vcs.set_ref("origin/sdk-1.0", "1111");
        vcs.set_tree(TREE);
        let checkout = LiveCheckoutSource::new(GitCache::new(descriptor(base, "gstreamer"), vcs.clone()));
        let source = NormalizedCheckoutSource::new(checkout, shell);
        source.fetch().unwrap();
        (source, vcs)
    }

    fn mtime(path: &std::path::Path) -> filetime::FileTime {
        filetime::FileTime::from_last_modification_time(&std::fs::metadata(path).unwrap())
    }

    #[test]
    fn normalized_checkout_touches_build_files() {
        let tmp = tempdir("normalized-touch-");
        let (source, _) = setup(tmp.path(), Arc::new(SystemShell::default()));
        let build_dir = source.descriptor().build_dir.clone();

        let start = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let start = filetime::FileTime::from_unix_time(i64::try_from(start).unwrap(), 0);

        assert!(source.extract().unwrap());

        for touched in &[
            "configure",
            "Makefile.in",
            "m4/libtool.m4",
            "src/config.h.in",
        ] {
            assert!(mtime(&build_dir.join(touched)) >= start, "{} not touched", touched);
        }
        let old = filetime::FileTime::from_unix_time(OLD_MTIME, 0);
        for untouched in &[
            "configure.in",
            "configure.ac",
            "Makefile.am",
            "src/main.c",
            ".git/description.in",
        ] {
            assert_eq!(mtime(&build_dir.join(untouched)), old, "{} touched", untouched);
        }
    }

    #[test]
    fn normalized_checkout_unchanged_touches_nothing() {
        let tmp = tempdir("normalized-unchanged-");
        let shell = Arc::new(FakeShell::default());
        let (source, _) = setup(tmp.path(), shell.clone());

        assert!(source.extract().unwrap());
        let touched = shell.calls().len();
        assert_eq!(touched, 4);

        assert!(!source.extract().unwrap());
        assert_eq!(shell.calls().len(), touched);
    }

    #[test]
    fn normalized_checkout_collects_files_per_extract() {
        let tmp = tempdir("normalized-reset-");
        let shell = Arc::new(FakeShell::default());
        let (source, vcs) = setup(tmp.path(), shell.clone());
        let build_dir = source.descriptor().build_dir.clone();

        assert!(source.extract().unwrap());
        vcs.set_ref("origin/sdk-1.0", "2222");
        assert!(source.extract().unwrap());

        let calls = shell.calls();
        assert_eq!(calls.len(), 8);
        assert_eq!(calls[0], ShellCall::Touch(build_dir.join("Makefile.in")));
        assert_eq!(calls[0], calls[4]);
    }

    #[test]
    fn normalized_checkout_custom_matches() {
        let tmp = tempdir("normalized-custom-");
        let shell = Arc::new(FakeShell::default());
        let (source, _) = setup(tmp.path(), shell.clone());
        let source = source.with_matches(&[".am"]);
        let build_dir = source.descriptor().build_dir.clone();

        assert!(source.extract().unwrap());
        assert_eq!(
            shell.calls(),
            vec![ShellCall::Touch(build_dir.join("Makefile.am"))]
        );
    }
}
