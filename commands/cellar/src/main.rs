// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! The `cellar` binary.

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
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;

use cellar_package::{PackageMode, RecipeLicenses, StoredPackage};

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};

mod definitions;

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Parser)]
#[clap(
    name = "cellar",
    about = "Fetch recipe sources and assemble packages from them."
)]
struct Args {
    /// configuration file to read
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// the directory holding the `recipes` and `packages` definitions
    #[clap(long, default_value = ".", value_name = "DIR")]
    definitions: PathBuf,

    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    logging: cellar_core::log::LogArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Update the source cache of a recipe
    Fetch {
        /// the recipe to fetch
        recipe: String,
    },
    /// Set up the build directory of a recipe from its source cache
    Extract {
        /// the recipe to extract
        recipe: String,
    },
    /// List the files of a package
    Files {
        /// the package to list files of
        package: String,
        /// list development files only
        #[clap(long, conflicts_with = "all")]
        devel: bool,
        /// list runtime and development files
        #[clap(long)]
        all: bool,
    },
    /// List all recipes a package needs
    Deps {
        /// the package to list recipes of
        package: String,
    },
    /// Print the licenses of a package as JSON
    Licenses {
        /// the package to list licenses of
        package: String,
        /// list licenses of the development files
        #[clap(long)]
        devel: bool,
    },
    /// Print the installer identity of a package as JSON
    Identity {
        /// the package to describe
        package: String,
        /// describe the development variant
        #[clap(long)]
        devel: bool,
    },
}

const fn mode(devel: bool) -> PackageMode {
    if devel {
        PackageMode::Devel
    } else {
        PackageMode::Runtime
    }
}

fn licenses_json(licenses: &RecipeLicenses) -> serde_json::Value {
    let recipes = licenses
        .iter()
        .map(|(recipe, categories)| {
            let categories = categories
                .iter()
                .map(|(category, l)| {
                    (
                        category
                            .clone()
                            .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
                        serde_json::json!(l),
                    )
                })
                .collect::<serde_json::Map<_, _>>();
            (recipe.to_string(), serde_json::Value::Object(categories))
        })
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(recipes)
}

fn identity_json(
    package: &StoredPackage,
    mode: PackageMode,
    config: &cellar_core::Config,
) -> serde_json::Value {
    let info = package.info();
    let mut result = serde_json::json!({
        "identity": package.identity(mode),
        "version": info.version,
        "vendor": info.vendor,
        "url": info.url,
        "license": info.license,
        "install_dir": info.get_install_dir(config),
        "sys_deps": info.get_sys_deps(config),
    });

    if let (Some(meta), Some(object)) = (package.as_meta_package(), result.as_object_mut()) {
        object.insert(
            "root_env_var".to_string(),
            serde_json::json!(meta.root_env_var(config.target_arch)),
        );
        match meta.upgrade_code(mode, config.target_arch) {
            Ok(code) => {
                object.insert("upgrade_code".to_string(), serde_json::json!(code));
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }
    result
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output.")?;
    println!("{}", text);
    Ok(())
}

// ----------------------------------------------------------------------
// - Entry Point:
// ----------------------------------------------------------------------

/// Entry point of the `cellar` binary.
fn main() -> Result<()> {
    let args = Args::parse();

    args.logging
        .setup_logging()
        .wrap_err("Failed to set up logging.")?;

    tracing::debug!("Command line arguments: {:#?}", args);

    let config = cellar_core::Config::load_or_default(&args.config)
        .wrap_err("Failed to load configuration.")?;
    let definitions = definitions::Definitions::load(&args.definitions, config)
        .wrap_err("Failed to load definitions.")?;

    match &args.command {
        Command::Fetch { recipe } => {
            let (kind, descriptor) = definitions.source(recipe)?;
            let (vcs, shell) = cellar_source::default_gateways();
            cellar_source::create_source(kind, descriptor, vcs, shell)
                .fetch()
                .wrap_err_with(|| format!("Failed to fetch \"{}\".", recipe))?;
        }
        Command::Extract { recipe } => {
            let (kind, descriptor) = definitions.source(recipe)?;
            let (vcs, shell) = cellar_source::default_gateways();
            let changed = cellar_source::create_source(kind, descriptor, vcs, shell)
                .extract()
                .wrap_err_with(|| format!("Failed to extract \"{}\".", recipe))?;
            println!("{}", if changed { "changed" } else { "unchanged" });
        }
        Command::Files {
            package,
            devel,
            all,
        } => {
            let store = definitions.store();
            let cookbook = definitions.cookbook();
            let files = if *all {
                store.all_files_list(package, cookbook)
            } else if *devel {
                store.devel_files_list(package, cookbook)
            } else {
                store.files_list(package, cookbook)
            }
            .wrap_err_with(|| format!("Failed to list files of \"{}\".", package))?;
            for f in files {
                println!("{}", f);
            }
        }
        Command::Deps { package } => {
            let recipes = definitions
                .store()
                .recipes_dependencies(package)
                .wrap_err_with(|| format!("Failed to resolve recipes of \"{}\".", package))?;
            for r in &recipes {
                println!("{}", r);
            }
        }
        Command::Licenses { package, devel } => {
            let store = definitions.store();
            let cookbook = definitions.cookbook();
            let licenses = if *devel {
                store.devel_recipes_licenses(package, cookbook)
            } else {
                store.recipes_licenses(package, cookbook)
            }
            .wrap_err_with(|| format!("Failed to collect licenses of \"{}\".", package))?;
            print_json(&licenses_json(&licenses))?;
        }
        Command::Identity { package, devel } => {
            let stored = definitions.store().get(package)?;
            print_json(&identity_json(stored, mode(*devel), definitions.config()))?;
        }
    }

    Ok(())
}
