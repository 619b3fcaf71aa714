// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2021 Tobias Hunger <tobias.hunger@gmail.com>

//! In-process gateways simulating version control and the shell for tests

use crate::gateway::{Shell, Vcs};
use crate::{Error, Result, SourceDefinition, SourceDescriptor};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ----------------------------------------------------------------------
// - Helpers:
// ----------------------------------------------------------------------

pub fn tempdir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .rand_bytes(8)
        .tempdir()
        .expect("Failed to create temporary directory.")
}

pub fn descriptor(base: &Path, name: &str) -> SourceDescriptor {
    let config = cellar_core::Config {
        local_sources: base.join("cache"),
        sources: base.join("build"),
        target_platform: cellar_core::Platform::Linux,
        ..cellar_core::Config::default()
    };
    SourceDescriptor::new(
        cellar_core::Name::new(name).unwrap(),
        "1.0",
        &SourceDefinition::default(),
        &config,
    )
}

pub const OLD_MTIME: i64 = 1_000_000;

fn command_error(command: &str, message: &str) -> Error {
    Error::Command {
        command: command.to_string(),
        message: message.to_string(),
    }
}

// ----------------------------------------------------------------------
// - FakeVcs:
// ----------------------------------------------------------------------

#[derive(Default)]
struct VcsState {
    refs: HashMap<String, String>,
    offline: bool,
    tree: Vec<(String, String)>,
    calls: Vec<String>,
}

/// A `Vcs` that keeps references in memory and "checks out" a fixed tree
#[derive(Default)]
pub struct FakeVcs {
    state: Mutex<VcsState>,
}

impl FakeVcs {
    pub fn set_ref(&self, reference: &str, commit: &str) {
        let mut state = self.state.lock().unwrap();
        state.refs.insert(reference.to_string(), commit.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn set_tree(&self, tree: &[(&str, &str)]) {
        self.state.lock().unwrap().tree = tree
            .iter()
            .map(|(p, c)| ((*p).to_string(), (*c).to_string()))
            .collect();
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl Vcs for FakeVcs {
    fn init(&self, repo_dir: &Path) -> Result<()> {
        self.record(format!("init {}", repo_dir.to_string_lossy()));
        std::fs::create_dir_all(repo_dir.join(".git"))?;
        Ok(())
    }

    fn add_remote(&self, _repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        self.record(format!("add_remote {} {}", name, url));
        Ok(())
    }

    fn fetch(&self, _repo_dir: &Path, _fail_soft: bool) -> Result<()> {
        self.record("fetch".to_string());
        if self.state.lock().unwrap().offline {
            Err(command_error("fetch", "remote unreachable"))
        } else {
            Ok(())
        }
    }

    fn resolve_ref(&self, _repo_dir: &Path, reference: &str) -> Result<String> {
        self.state
            .lock()
            .unwrap()
            .refs
            .get(reference)
            .cloned()
            .ok_or_else(|| command_error("rev-parse", "unknown revision"))
    }

    fn current_commit(&self, work_dir: &Path) -> Result<String> {
        std::fs::read_to_string(work_dir.join(".git/HEAD"))
            .map(|s| s.trim().to_string())
            .map_err(|_| command_error("rev-parse HEAD", "not a checkout"))
    }

    fn checkout(&self, dest_dir: &Path, repo_dir: &Path, reference: &str) -> Result<()> {
        let commit = self.resolve_ref(repo_dir, reference)?;
        self.record(format!("checkout {} {}", reference, commit));

        std::fs::create_dir_all(dest_dir.join(".git"))?;
        std::fs::write(dest_dir.join(".git/HEAD"), &commit)?;

        let tree = self.state.lock().unwrap().tree.clone();
        for (path, contents) in &tree {
            let full_path = dest_dir.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, contents)?;
            filetime::set_file_mtime(
                &full_path,
                filetime::FileTime::from_unix_time(OLD_MTIME, 0),
            )?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// - FakeShell:
// ----------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCall {
    Unpack(PathBuf, PathBuf),
    Patch(PathBuf, PathBuf),
    Touch(PathBuf),
}

/// A `Shell` that only records what it was asked to do
#[derive(Default)]
pub struct FakeShell {
    calls: Mutex<Vec<ShellCall>>,
}

impl FakeShell {
    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Shell for FakeShell {
    fn unpack(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ShellCall::Unpack(archive.to_path_buf(), dest_dir.to_path_buf()));
        Ok(())
    }

    fn apply_patch(&self, work_dir: &Path, patch: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ShellCall::Patch(work_dir.to_path_buf(), patch.to_path_buf()));
        Ok(())
    }

    fn touch(&self, path: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ShellCall::Touch(path.to_path_buf()));
        Ok(())
    }
}
