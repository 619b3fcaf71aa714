// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A `Shell` implementation using the tools installed on the system

use crate::gateway::Shell;
use crate::Result;

use cellar_command::{CommandBuilder, Runner, RunnerBuilder};

use std::path::Path;

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

fn is_zip(archive: &Path) -> bool {
    archive
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("zip"))
}

// ----------------------------------------------------------------------
// - SystemShell:
// ----------------------------------------------------------------------

/// Unpack archives with `tar` or `unzip` and apply patches with `patch`
#[derive(Debug)]
pub struct SystemShell {
    runner: Runner,
}

impl Default for SystemShell {
    fn default() -> Self {
        Self {
            runner: RunnerBuilder::new().add_environment("LC_ALL", "C").build(),
        }
    }
}

impl Shell for SystemShell {
    #[tracing::instrument(level = "debug", skip(self))]
    fn unpack(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        let command = if is_zip(archive) {
            CommandBuilder::new("unzip")
                .add_argument("-o")
                .add_argument("-q")
                .add_argument(archive)
                .add_argument("-d")
                .add_argument(dest_dir)
        } else {
            CommandBuilder::new("tar")
                .add_argument("-C")
                .add_argument(dest_dir)
                .add_argument("-xf")
                .add_argument(archive)
        };
        self.runner.run(&command.build()).map(|_| ())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn apply_patch(&self, work_dir: &Path, patch: &Path) -> Result<()> {
        tracing::info!("Applying patch \"{}\".", patch.to_string_lossy());
        let command = CommandBuilder::new("patch")
            .add_argument("-p1")
            .add_argument("-f")
            .add_argument("-d")
            .add_argument(work_dir)
            .add_argument("-i")
            .add_argument(patch)
            .build();
        self.runner.run(&command).map(|_| ())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn touch(&self, path: &Path) -> Result<()> {
        filetime::set_file_mtime(path, filetime::FileTime::now())?;
        Ok(())
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tempdir;

    #[test]
    fn shell_touch_updates_mtime() {
        let tmp = tempdir("shell-touch-");
        let file = tmp.path().join("configure");
        std::fs::write(&file, "#!/bin/sh").unwrap();
        let old = filetime::FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(&file, old).unwrap();

        SystemShell::default().touch(&file).unwrap();

        let meta = std::fs::metadata(&file).unwrap();
        assert!(filetime::FileTime::from_last_modification_time(&meta) > old);
    }

    #[test]
    fn shell_touch_missing_file() {
        let tmp = tempdir("shell-touch-missing-");
        assert!(SystemShell::default()
            .touch(&tmp.path().join("nothing"))
            .is_err());
    }

    #[test]
    fn shell_unpack_tarball() {
        let tmp = tempdir("shell-unpack-");
        let archive = tmp.path().join("zlib-1.2.7.tar");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut builder = tar::Builder::new(file);
            let data = b"int main() { return 0; }";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "zlib-1.2.7/main.c", &data[..])
                .unwrap();
            builder.finish().unwrap();
        }

        let dest = tmp.path().join("build");
        SystemShell::default().unpack(&archive, &dest).unwrap();
        assert!(dest.join("zlib-1.2.7/main.c").is_file());
    }

    #[test]
    fn shell_detects_zip() {
        assert!(is_zip(Path::new("/tmp/foo-1.0.ZIP")));
        assert!(!is_zip(Path::new("/tmp/foo-1.0.tar.gz")));
    }
}
