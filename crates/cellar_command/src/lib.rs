// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Functionality related to running external commands like `git` or `patch`

// Setup warnings/errors:
#![forbid(unsafe_code)]
#![deny(
    bare_trait_objects,
    unused_doc_comments,
    unused_import_braces,
    missing_docs
)]
// Clippy:
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::let_unit_value)]

// ----------------------------------------------------------------------
// - Error Handling:
// ----------------------------------------------------------------------

pub use cellar_core::{Error, Result};

// ----------------------------------------------------------------------
// - Modules:
// ----------------------------------------------------------------------

mod command;
pub use command::{Command, CommandBuilder};

mod runner;
pub use runner::{Output, Runner, RunnerBuilder};
