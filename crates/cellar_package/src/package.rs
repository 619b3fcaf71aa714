// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A package bundling files of several recipes

use crate::cookbook::{Cookbook, RecipeLicenses};
use crate::entry::{RecipeFileEntry, RecipeFiles};
use crate::identity::{Identity, PackageInfo, PackageMode};
use crate::platform_list::effective_list;
use crate::store::PackageStore;

use cellar_core::{Name, Names, Platform, Result};

use std::collections::BTreeMap;

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

fn list_licenses(files: &RecipeFiles, cookbook: &dyn Cookbook) -> Result<RecipeLicenses> {
    let mut result = RecipeLicenses::new();
    for (recipe, categories) in files.iter() {
        let licenses = cookbook
            .get_recipe(recipe.as_str())?
            .list_licenses_by_categories(categories)?;
        result.insert(recipe.clone(), licenses);
    }
    Ok(result)
}

// ----------------------------------------------------------------------
// - PackageDefinition:
// ----------------------------------------------------------------------

/// The definition of a package as found in a package file
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PackageDefinition {
    /// Descriptive data
    #[serde(flatten)]
    pub info: PackageInfo,
    /// Packages this package depends on
    #[serde(default)]
    pub deps: Vec<Name>,
    /// Runtime files on all platforms
    #[serde(default)]
    pub files: Vec<RecipeFileEntry>,
    /// Extra runtime files per `Platform`
    #[serde(default)]
    pub platform_files: BTreeMap<Platform, Vec<RecipeFileEntry>>,
    /// Development files on all platforms
    #[serde(default)]
    pub files_devel: Vec<RecipeFileEntry>,
    /// Extra development files per `Platform`
    #[serde(default)]
    pub platform_files_devel: BTreeMap<Platform, Vec<RecipeFileEntry>>,
}

impl PackageDefinition {
    /// Create an empty `PackageDefinition` called `name`
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            info: PackageInfo::new(name),
            deps: Vec::new(),
            files: Vec::new(),
            platform_files: BTreeMap::new(),
            files_devel: Vec::new(),
            platform_files_devel: BTreeMap::new(),
        }
    }
}

// ----------------------------------------------------------------------
// - Package:
// ----------------------------------------------------------------------

/// A package resolved for one `Platform`
#[derive(Clone, Debug)]
pub struct Package {
    info: PackageInfo,
    deps: Vec<Name>,
    files: Vec<RecipeFileEntry>,
    files_devel: Vec<RecipeFileEntry>,
    recipes_files: RecipeFiles,
    recipes_files_devel: RecipeFiles,
}

impl Package {
    /// Resolve a `PackageDefinition` for `platform`
    #[must_use]
    pub fn new(definition: &PackageDefinition, platform: Platform) -> Self {
        let files = effective_list(&definition.files, &definition.platform_files, platform);
        let files_devel = effective_list(
            &definition.files_devel,
            &definition.platform_files_devel,
            platform,
        );
        let recipes_files = RecipeFiles::from_entries(&files);
        let recipes_files_devel = RecipeFiles::from_entries(&files_devel);

        Self {
            info: definition.info.clone(),
            deps: definition.deps.clone(),
            files,
            files_devel,
            recipes_files,
            recipes_files_devel,
        }
    }

    /// Descriptive data
    #[must_use]
    pub const fn info(&self) -> &PackageInfo {
        &self.info
    }

    /// The package `Name`
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.info.name
    }

    /// The packages this package depends on
    #[must_use]
    pub fn deps(&self) -> &[Name] {
        &self.deps
    }

    /// The effective runtime file entries
    #[must_use]
    pub fn files(&self) -> &[RecipeFileEntry] {
        &self.files
    }

    /// The effective development file entries
    #[must_use]
    pub fn files_devel(&self) -> &[RecipeFileEntry] {
        &self.files_devel
    }

    /// The runtime files by recipe
    #[must_use]
    pub const fn recipes_files(&self) -> &RecipeFiles {
        &self.recipes_files
    }

    /// The development files by recipe
    #[must_use]
    pub const fn recipes_files_devel(&self) -> &RecipeFiles {
        &self.recipes_files_devel
    }

    /// The `Identity` of this package in `mode`
    #[must_use]
    pub fn identity(&self, mode: PackageMode) -> Identity {
        self.info.identity(mode)
    }

    /// The recipes this package takes files from directly
    #[must_use]
    pub fn own_recipes(&self) -> Names {
        self.recipes_files
            .recipes()
            .chain(self.recipes_files_devel.recipes())
            .cloned()
            .collect()
    }

    /// The sorted list of runtime files
    ///
    /// # Errors
    /// Fails if a recipe or one of its categories is unknown.
    #[tracing::instrument(level = "debug", skip(self, cookbook), fields(package = %self.info.name))]
    pub fn files_list(&self, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for (recipe, categories) in self.recipes_files.iter() {
            let recipe = cookbook.get_recipe(recipe.as_str())?;
            if categories.is_empty() {
                files.extend(recipe.dist_files_list());
            } else {
                files.extend(recipe.files_list_by_categories(categories)?);
            }
        }
        files.sort();
        Ok(files)
    }

    /// The sorted list of development files
    ///
    /// This includes the development files of all recipes whose libraries
    /// are part of the runtime files.
    ///
    /// # Errors
    /// Fails if a recipe or one of its categories is unknown.
    #[tracing::instrument(level = "debug", skip(self, cookbook), fields(package = %self.info.name))]
    pub fn devel_files_list(&self, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for recipe in self.recipes_files.with_libraries() {
            files.extend(cookbook.get_recipe(recipe.as_str())?.devel_files_list());
        }
        for (recipe, categories) in self.recipes_files_devel.iter() {
            let recipe = cookbook.get_recipe(recipe.as_str())?;
            if categories.is_empty() {
                files.extend(recipe.devel_files_list());
            } else {
                files.extend(recipe.files_list_by_categories(categories)?);
            }
        }
        files.sort();
        Ok(files)
    }

    /// The sorted union of runtime and development files
    ///
    /// # Errors
    /// Fails if a recipe or one of its categories is unknown.
    pub fn all_files_list(&self, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        let mut files = self.files_list(cookbook)?;
        files.extend(self.devel_files_list(cookbook)?);
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// All recipes this package and the packages it depends on take files from
    ///
    /// # Errors
    /// Fails if a dependency is unknown to `store` or the dependencies form a cycle.
    #[tracing::instrument(level = "debug", skip(self, store), fields(package = %self.info.name))]
    pub fn recipes_dependencies(&self, store: &PackageStore) -> Result<Names> {
        let mut result = self.own_recipes();
        for d in &self.deps {
            result.extend(store.recipes_dependencies(d.as_str())?);
        }
        Ok(result)
    }

    /// The licenses of the runtime files by recipe and category
    ///
    /// # Errors
    /// Fails if a recipe or one of its categories is unknown.
    pub fn recipes_licenses(&self, cookbook: &dyn Cookbook) -> Result<RecipeLicenses> {
        list_licenses(&self.recipes_files, cookbook)
    }

    /// The licenses of the development files by recipe and category
    ///
    /// Recipes whose libraries are part of the runtime files contribute
    /// their runtime licenses, too.
    ///
    /// # Errors
    /// Fails if a recipe or one of its categories is unknown.
    pub fn devel_recipes_licenses(&self, cookbook: &dyn Cookbook) -> Result<RecipeLicenses> {
        let mut result = list_licenses(&self.recipes_files_devel, cookbook)?;
        for recipe in self.recipes_files.with_libraries() {
            let categories = self.recipes_files.get(recipe.as_str()).unwrap_or_default();
            let licenses = cookbook
                .get_recipe(recipe.as_str())?
                .list_licenses_by_categories(categories)?;

            let entry = result.entry(recipe.clone()).or_default();
            for (category, l) in licenses {
                entry.entry(category).or_default().extend(l);
            }
        }
        Ok(result)
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
