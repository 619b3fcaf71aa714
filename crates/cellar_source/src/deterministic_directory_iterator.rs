// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2021 Tobias Hunger <tobias.hunger@gmail.com>

use crate::{Error, Result};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

// - Helper:
// ----------------------------------------------------------------------

fn collect_contents(directory: &Path, ignored: &[OsString]) -> Result<Vec<std::fs::DirEntry>> {
    let mut contents = std::fs::read_dir(directory)?
        .map(|i| i.map_err(Into::into))
        .filter(|i: &Result<std::fs::DirEntry>| {
            i.as_ref()
                .map_or(true, |d| !ignored.iter().any(|n| *n == d.file_name()))
        })
        .collect::<Result<Vec<std::fs::DirEntry>>>()?;
    contents.sort_by_key(std::fs::DirEntry::file_name);
    contents.reverse(); // So that we can pop() in turn later!

    Ok(contents)
}

// ----------------------------------------------------------------------
// - Helper Types:
// ----------------------------------------------------------------------

/// The kind of a `TreeEntry`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Link,
}

/// One entry found while walking a directory tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// The full path to the entry
    pub path: PathBuf,
    /// The path relative to the top directory
    pub relative: PathBuf,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(std::ffi::OsStr::to_str)
    }
}

// ----------------------------------------------------------------------
// - DeterministicDirectoryIterator:
// ----------------------------------------------------------------------

/// Walk a directory tree depth first, visiting the entries of each
/// directory sorted by name. Symbolic links are reported, never followed.
pub struct DeterministicDirectoryIterator {
    stack: Vec<(Vec<std::fs::DirEntry>, PathBuf)>,
    ignored: Vec<OsString>,
}

impl DeterministicDirectoryIterator {
    /// Constructor, skipping all entries named like one of `ignored`
    pub fn new(directory: &Path, ignored: &[&str]) -> Result<Self> {
        if !directory.symlink_metadata()?.is_dir() {
            return Err(Error::Runtime {
                message: format!("\"{}\" is not a directory.", directory.to_string_lossy()),
            });
        }
        let ignored = ignored.iter().map(OsString::from).collect::<Vec<_>>();
        let contents = collect_contents(directory, &ignored)?;
        Ok(Self {
            stack: vec![(contents, PathBuf::new())],
            ignored,
        })
    }

    fn at_end(&self) -> bool {
        self.stack.is_empty()
    }

    fn find_iterator_value(&mut self) -> Option<Result<TreeEntry>> {
        let stack_frame = self.stack.last_mut()?;
        let entry = stack_frame.0.pop()?;
        let relative = stack_frame.1.join(entry.file_name());
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => return Some(Err(e.into())),
        };

        let kind = if file_type.is_symlink() {
            EntryKind::Link
        } else if file_type.is_dir() {
            match collect_contents(&path, &self.ignored) {
                Ok(contents) => self.stack.push((contents, relative.clone())),
                Err(e) => return Some(Err(e)),
            }
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        Some(Ok(TreeEntry {
            path,
            relative,
            kind,
        }))
    }

    fn clean_up(&mut self) {
        while let Some(v) = self.stack.last() {
            if v.0.is_empty() {
                // The top element is empty: pop it and its corresponding directory!
                self.stack.pop();
            } else {
                break;
            }
        }
    }
}

impl Iterator for DeterministicDirectoryIterator {
    type Item = Result<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.clean_up();
        if self.at_end() {
            return None;
        }

        self.find_iterator_value()
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
