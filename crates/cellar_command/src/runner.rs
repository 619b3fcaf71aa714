// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

use crate::{Error, Result};

use std::ffi::OsString;

// ----------------------------------------------------------------------
// - Output:
// ----------------------------------------------------------------------

/// The captured `Output` of a successful `Command`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    /// Everything the command wrote to stdout
    pub stdout: String,
    /// Everything the command wrote to stderr
    pub stderr: String,
}

// ----------------------------------------------------------------------
// - Runner:
// ----------------------------------------------------------------------

/// The `Runner` that will run a `Command` on the local machine
#[derive(Debug, Default)]
pub struct Runner {
    environment: Vec<(OsString, OsString)>,
}

impl Runner {
    /// Run a `Command` to completion
    ///
    /// # Errors
    /// Returns an `Error::Command` if the command could not be started or
    /// exited unsuccessfully.
    #[tracing::instrument(level = "debug", skip(self, command), fields(command = %command))]
    pub fn run(&self, command: &crate::Command) -> Result<Output> {
        tracing::trace!("running...");

        let mut process = std::process::Command::new(&command.command);
        process
            .args(&command.arguments)
            .envs(
                self.environment
                    .iter()
                    .chain(command.environment.iter())
                    .map(|(k, v)| (k, v)),
            )
            .stdin(std::process::Stdio::null());
        if let Some(directory) = &command.current_directory {
            process.current_dir(directory);
        }

        let output = process.output().map_err(|e| Error::Command {
            command: command.to_string(),
            message: format!("Failed to start: {}", e),
        })?;

        let result = Output {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if output.status.success() {
            tracing::trace!("Command finished successfully.");
            Ok(result)
        } else {
            let reason = if result.stderr.trim().is_empty() {
                result.stdout.trim()
            } else {
                result.stderr.trim()
            };
            Err(Error::Command {
                command: command.to_string(),
                message: format!("{} ({})", reason, output.status),
            })
        }
    }
}

// ----------------------------------------------------------------------
// - RunnerBuilder:
// ----------------------------------------------------------------------

/// A builder for a `Runner`
#[derive(Default)]
pub struct RunnerBuilder {
    runner: Runner,
}

impl RunnerBuilder {
    /// Create a `RunnerBuilder`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one environment variable that is passed to all commands
    #[must_use]
    pub fn add_environment<K: Into<OsString>, V: Into<OsString>>(mut self, key: K, value: V) -> Self {
        self.runner.environment.push((key.into(), value.into()));
        self
    }

    /// Build the actual `Runner`
    #[must_use]
    pub fn build(self) -> Runner {
        self.runner
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
