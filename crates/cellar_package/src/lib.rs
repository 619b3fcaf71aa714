// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Assemble packages: Decide which files of which recipes end up in a package
//! and which recipes and licenses a package depends on.

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
// - Constants:
// ----------------------------------------------------------------------

/// The category holding the libraries of a recipe
pub const LIBRARIES_CATEGORY: &str = "libs";

/// The category holding the development files of a recipe
pub const DEVEL_CATEGORY: &str = "devel";

// ----------------------------------------------------------------------
// - Modules:
// ----------------------------------------------------------------------

mod cookbook;
mod entry;
mod identity;
mod metapackage;
mod package;
mod platform_list;
mod store;

// ----------------------------------------------------------------------
// - Exports:
// ----------------------------------------------------------------------

pub use cellar_core::{Error, Result};

pub use cookbook::{
    CategoryDefinition, CategoryLicenses, Cookbook, Licenses, MemoryCookbook, MemoryRecipe,
    Recipe, RecipeDefinition, RecipeLicenses,
};
pub use entry::{RecipeFileEntry, RecipeFiles};
pub use identity::{Identity, PackageInfo, PackageMode};
pub use metapackage::{InstallKind, MetaPackage, MetaPackageDefinition, PackageReference};
pub use package::{Package, PackageDefinition};
pub use platform_list::effective_list;
pub use store::{PackageStore, StoreDefinition, StoredPackage};
