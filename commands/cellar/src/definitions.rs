// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Read recipe and package definitions from a directory

use cellar_core::{Config, Name};
use cellar_package::{MemoryCookbook, PackageStore, RecipeDefinition, StoreDefinition};
use cellar_source::{SourceDefinition, SourceDescriptor, SourceKind};

use eyre::{eyre, Result, WrapErr};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

const RECIPES_DIR: &str = "recipes";
const PACKAGES_DIR: &str = "packages";

fn toml_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        tracing::debug!("\"{}\" does not exist, skipping.", directory.display());
        return Ok(Vec::new());
    }

    let mut result = Vec::new();
    for entry in std::fs::read_dir(directory)
        .wrap_err_with(|| format!("Failed to read directory \"{}\".", directory.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |e| e == "toml") {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}

fn read_toml<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read \"{}\".", file.display()))?;
    toml::from_str(&contents).wrap_err_with(|| format!("Failed to parse \"{}\".", file.display()))
}

// ----------------------------------------------------------------------
// - RecipeFile:
// ----------------------------------------------------------------------

/// The contents of one file in the recipes directory
#[derive(Clone, Debug, serde::Deserialize)]
pub struct RecipeFile {
    #[serde(flatten)]
    recipe: RecipeDefinition,
    #[serde(default)]
    source: SourceDefinition,
}

// ----------------------------------------------------------------------
// - Definitions:
// ----------------------------------------------------------------------

/// All recipes and packages known for the configured target
pub struct Definitions {
    config: Config,
    recipes: BTreeMap<Name, RecipeFile>,
    cookbook: MemoryCookbook,
    store: PackageStore,
}

impl Definitions {
    /// Read all definitions found in `directory`
    #[tracing::instrument(level = "debug", skip(config))]
    pub fn load(directory: &Path, config: Config) -> Result<Self> {
        let mut recipes = BTreeMap::new();
        let mut cookbook = MemoryCookbook::new(config.target_platform);
        for f in toml_files(&directory.join(RECIPES_DIR))? {
            let recipe: RecipeFile = read_toml(&f)?;
            tracing::trace!("Read recipe \"{}\" from \"{}\".", recipe.recipe.name, f.display());
            cookbook.add_recipe(&recipe.recipe);
            if let Some(previous) = recipes.insert(recipe.recipe.name.clone(), recipe) {
                return Err(eyre!(
                    "Recipe \"{}\" is defined more than once.",
                    previous.recipe.name
                ));
            }
        }

        let mut store = PackageStore::new(config.target_platform);
        for f in toml_files(&directory.join(PACKAGES_DIR))? {
            let package: StoreDefinition = read_toml(&f)?;
            if store.get(package.name().as_str()).is_ok() {
                return Err(eyre!(
                    "Package \"{}\" is defined more than once.",
                    package.name()
                ));
            }
            store.add(&package);
        }

        tracing::debug!(
            "Found {} recipes and {} packages.",
            recipes.len(),
            store.iter().count()
        );

        Ok(Self {
            config,
            recipes,
            cookbook,
            store,
        })
    }

    /// The configuration in use
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All recipes
    pub const fn cookbook(&self) -> &MemoryCookbook {
        &self.cookbook
    }

    /// All packages and meta packages
    pub const fn store(&self) -> &PackageStore {
        &self.store
    }

    /// The source handling of recipe `name`
    pub fn source(&self, name: &str) -> Result<(SourceKind, SourceDescriptor)> {
        let recipe = self
            .recipes
            .get(name)
            .ok_or_else(|| cellar_core::Error::UnknownRecipe(name.to_string()))?;
        Ok((
            recipe.source.kind,
            SourceDescriptor::new(
                recipe.recipe.name.clone(),
                &recipe.recipe.version,
                &recipe.source,
                &self.config,
            ),
        ))
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
