// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Basic functionality shared by all `cellar` crates and binaries.

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

// ----------------------------------------------------------------------
// - Error Handling:
// ----------------------------------------------------------------------

/// `Error` type for the `cellar` libraries
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration Error: The recipe or package can not be processed as defined.
    #[error("Configuration Error: {}", .0)]
    Config(String),

    /// Conversion error.
    #[error("Conversion error: Can not convert \"{expression}\" to {typename}: {message}.")]
    Conversion {
        /// The `expression` that could not get converted.
        expression: String,
        /// The `typename` that the `expression` failed to convert into.
        typename: String,
        /// A `message` describing why the conversion failed.
        message: String,
    },

    /// An external command failed.
    #[error("Command \"{command}\" failed: {message}")]
    Command {
        /// The `command` line that was run.
        command: String,
        /// A `message` describing the failure, usually the captured stderr.
        message: String,
    },

    /// A recipe was not found in the cookbook.
    #[error("Recipe \"{}\" not found.", .0)]
    UnknownRecipe(String),

    /// A package was not found in the package store.
    #[error("Package \"{}\" not found.", .0)]
    UnknownPackage(String),

    /// Package dependencies form a cycle.
    #[error("Dependency cycle detected: {}.", .0)]
    DependencyCycle(String),

    /// IO Error
    #[error("IO Error: {source}")]
    Io {
        /// The `std::io::Error` triggering this
        #[from]
        source: std::io::Error,
    },

    /// Runtime Error
    #[error("Runtime Error: {message}")]
    Runtime {
        /// Error message.
        message: String,
    },
}

/// `Result` type for the `cellar` libraries
pub type Result<T> = std::result::Result<T, Error>;

// ----------------------------------------------------------------------
// - Functions:
// ----------------------------------------------------------------------

/// Return `true` if all characters are valid inside a recipe or package name:
/// ASCII letters, digits, '-', '_', '.' or '+'.
#[must_use]
pub fn all_name_chars(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '+')
}

/// Return `true` if the first character is an ASCII letter or digit
#[must_use]
pub fn start_alphanumerical_char(input: &str) -> bool {
    input.chars().take(1).all(|c| c.is_ascii_alphanumeric())
}

// ----------------------------------------------------------------------
// - Sub-Modules:
// ----------------------------------------------------------------------

pub mod config;
pub mod log;

mod name;
pub use name::{Name, Names};

mod platform;
pub use platform::{Architecture, Platform};

pub use config::Config;
