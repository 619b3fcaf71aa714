// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A `Command` that is supposed to get run
#[derive(Clone, Debug)]
pub struct Command {
    /// The command to run
    pub(crate) command: PathBuf,
    /// The arguments passed to the `command`
    pub(crate) arguments: Vec<OsString>,
    /// Additional environment variables to run the command with
    pub(crate) environment: Vec<(OsString, OsString)>,
    /// The directory to run the `command` in
    pub(crate) current_directory: Option<PathBuf>,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command.to_string_lossy())?;
        for a in &self.arguments {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

/// A builder for `Command`
#[derive(Clone)]
pub struct CommandBuilder {
    /// The `Command` that is getting build
    command: Command,
}

impl CommandBuilder {
    /// Create a `new` `CommandBuilder` that sets up `to_execute` as the command that will be run.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(to_execute: P) -> Self {
        let command = Command {
            command: to_execute.into(),
            arguments: Vec::new(),
            environment: Vec::new(),
            current_directory: None,
        };

        Self { command }
    }

    /// Add one argument
    #[must_use]
    pub fn add_argument<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.command.arguments.push(arg.into());
        self
    }

    /// Add one environment variable
    #[must_use]
    pub fn add_environment<K: Into<OsString>, V: Into<OsString>>(mut self, key: K, value: V) -> Self {
        self.command.environment.push((key.into(), value.into()));
        self
    }

    /// Run the command inside `directory`
    #[must_use]
    pub fn current_directory(mut self, directory: &Path) -> Self {
        self.command.current_directory = Some(directory.to_path_buf());
        self
    }

    /// Build the actual `Command`
    #[must_use]
    pub fn build(self) -> Command {
        self.command
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    use super::CommandBuilder;

    #[test]
    fn command_create() {
        let cmd = CommandBuilder::new("git")
            .add_argument("rev-parse")
            .add_argument("HEAD")
            .add_environment("LC_ALL", "C")
            .current_directory(Path::new("/tmp"))
            .build();
        assert_eq!(cmd.command, PathBuf::from("git"));
        assert_eq!(
            cmd.arguments,
            vec!(OsString::from("rev-parse"), OsString::from("HEAD"))
        );
        assert_eq!(
            cmd.environment,
            vec!((OsString::from("LC_ALL"), OsString::from("C")))
        );
        assert_eq!(cmd.current_directory, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.to_string(), "git rev-parse HEAD");
    }
}
