// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! A meta package composed of other packages

use crate::cookbook::{Cookbook, RecipeLicenses};
use crate::identity::{Identity, PackageInfo, PackageMode};
use crate::package::Package;
use crate::platform_list::effective_list;
use crate::store::{PackageStore, StoredPackage};

use cellar_core::{Architecture, Error, Name, Names, Platform, Result};

use std::collections::BTreeMap;

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

const ARCH_PLACEHOLDER: &str = "{arch}";

fn default_root_env_var() -> String {
    format!("CELLAR_SDK_ROOT_{}", ARCH_PLACEHOLDER)
}

fn merge_licenses(target: &mut RecipeLicenses, licenses: RecipeLicenses) {
    for (recipe, categories) in licenses {
        let entry = target.entry(recipe).or_default();
        for (category, l) in categories {
            entry.entry(category).or_default().extend(l);
        }
    }
}

// ----------------------------------------------------------------------
// - InstallKind:
// ----------------------------------------------------------------------

/// How a member package gets offered by the installer
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallKind {
    /// Always installed
    Required,
    /// Installed unless deselected
    Recommended,
    /// Only installed when selected
    Optional,
}

impl Default for InstallKind {
    fn default() -> Self {
        Self::Required
    }
}

// ----------------------------------------------------------------------
// - PackageReference:
// ----------------------------------------------------------------------

/// A member of a meta package
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PackageReference {
    /// The name of the member package
    pub name: Name,
    /// How the member gets installed
    #[serde(default)]
    pub install: InstallKind,
}

// ----------------------------------------------------------------------
// - MetaPackageDefinition:
// ----------------------------------------------------------------------

/// The definition of a meta package as found in a package file
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MetaPackageDefinition {
    /// Descriptive data
    #[serde(flatten)]
    pub info: PackageInfo,
    /// Member packages on all platforms
    #[serde(default)]
    pub packages: Vec<PackageReference>,
    /// Extra member packages per `Platform`
    #[serde(default)]
    pub platform_packages: BTreeMap<Platform, Vec<PackageReference>>,
    /// Name template of the environment variable pointing to the install
    /// root, `{arch}` gets replaced by the architecture
    #[serde(default = "default_root_env_var")]
    pub root_env_var: String,
    /// Installer upgrade codes by mode and architecture
    #[serde(default)]
    pub upgrade_codes: BTreeMap<PackageMode, BTreeMap<Architecture, String>>,
}

impl MetaPackageDefinition {
    /// Create an empty `MetaPackageDefinition` called `name`
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            info: PackageInfo::new(name),
            packages: Vec::new(),
            platform_packages: BTreeMap::new(),
            root_env_var: default_root_env_var(),
            upgrade_codes: BTreeMap::new(),
        }
    }
}

// ----------------------------------------------------------------------
// - MetaPackage:
// ----------------------------------------------------------------------

/// A meta package resolved for one `Platform`
#[derive(Clone, Debug)]
pub struct MetaPackage {
    info: PackageInfo,
    packages: Vec<PackageReference>,
    root_env_var: String,
    upgrade_codes: BTreeMap<PackageMode, BTreeMap<Architecture, String>>,
}

impl MetaPackage {
    /// Resolve a `MetaPackageDefinition` for `platform`
    #[must_use]
    pub fn new(definition: &MetaPackageDefinition, platform: Platform) -> Self {
        Self {
            info: definition.info.clone(),
            packages: effective_list(
                &definition.packages,
                &definition.platform_packages,
                platform,
            ),
            root_env_var: definition.root_env_var.clone(),
            upgrade_codes: definition.upgrade_codes.clone(),
        }
    }

    /// Descriptive data
    #[must_use]
    pub const fn info(&self) -> &PackageInfo {
        &self.info
    }

    /// The meta package `Name`
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.info.name
    }

    /// The member packages
    #[must_use]
    pub fn list_packages(&self) -> &[PackageReference] {
        &self.packages
    }

    /// The names of the member packages
    #[must_use]
    pub fn package_names(&self) -> Vec<Name> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// The `Identity` of this meta package in `mode`
    #[must_use]
    pub fn identity(&self, mode: PackageMode) -> Identity {
        self.info.identity(mode)
    }

    /// The name of the environment variable pointing to the install root
    /// for `arch`
    #[must_use]
    pub fn root_env_var(&self, arch: Architecture) -> String {
        self.root_env_var
            .replace(ARCH_PLACEHOLDER, arch.as_str())
            .to_uppercase()
    }

    /// The installer upgrade code for `mode` and `arch`
    ///
    /// # Errors
    /// Returns `Error::Config` if no upgrade code is defined.
    pub fn upgrade_code(&self, mode: PackageMode, arch: Architecture) -> Result<&str> {
        self.upgrade_codes
            .get(&mode)
            .and_then(|codes| codes.get(&arch))
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Meta package \"{}\" has no upgrade code for {} on {}.",
                    self.info.name, mode, arch
                ))
            })
    }

    fn member_packages<'a>(&self, store: &'a PackageStore) -> Result<Vec<&'a Package>> {
        Ok(store
            .dependency_closure(self.name(), &self.package_names())?
            .into_iter()
            .filter_map(StoredPackage::as_package)
            .collect())
    }

    fn collect_files<F>(&self, store: &PackageStore, list: F) -> Result<Vec<String>>
    where
        F: Fn(&Package) -> Result<Vec<String>>,
    {
        let mut files = Vec::new();
        for p in self.member_packages(store)? {
            files.extend(list(p)?);
        }
        files.sort();
        Ok(files)
    }

    /// The sorted runtime files of all member packages
    ///
    /// # Errors
    /// Fails if a member package, a recipe or a category is unknown.
    #[tracing::instrument(level = "debug", skip(self, store, cookbook), fields(package = %self.info.name))]
    pub fn files_list(
        &self,
        store: &PackageStore,
        cookbook: &dyn Cookbook,
    ) -> Result<Vec<String>> {
        self.collect_files(store, |p| p.files_list(cookbook))
    }

    /// The sorted development files of all member packages
    ///
    /// # Errors
    /// Fails if a member package, a recipe or a category is unknown.
    #[tracing::instrument(level = "debug", skip(self, store, cookbook), fields(package = %self.info.name))]
    pub fn devel_files_list(
        &self,
        store: &PackageStore,
        cookbook: &dyn Cookbook,
    ) -> Result<Vec<String>> {
        self.collect_files(store, |p| p.devel_files_list(cookbook))
    }

    /// The sorted runtime and development files of all member packages
    ///
    /// # Errors
    /// Fails if a member package, a recipe or a category is unknown.
    pub fn all_files_list(
        &self,
        store: &PackageStore,
        cookbook: &dyn Cookbook,
    ) -> Result<Vec<String>> {
        let mut files = self.collect_files(store, |p| p.all_files_list(cookbook))?;
        files.dedup();
        Ok(files)
    }

    /// All recipes the member packages take files from
    ///
    /// # Errors
    /// Fails if a member package is unknown or the dependencies form a cycle.
    #[tracing::instrument(level = "debug", skip(self, store), fields(package = %self.info.name))]
    pub fn recipes_dependencies(&self, store: &PackageStore) -> Result<Names> {
        let mut result = Names::default();
        for p in self.member_packages(store)? {
            result.extend(p.own_recipes());
        }
        Ok(result)
    }

    /// The runtime licenses of all member packages
    ///
    /// # Errors
    /// Fails if a member package, a recipe or a category is unknown.
    pub fn recipes_licenses(
        &self,
        store: &PackageStore,
        cookbook: &dyn Cookbook,
    ) -> Result<RecipeLicenses> {
        let mut result = RecipeLicenses::new();
        for p in self.member_packages(store)? {
            merge_licenses(&mut result, p.recipes_licenses(cookbook)?);
        }
        Ok(result)
    }

    /// The development licenses of all member packages
    ///
    /// # Errors
    /// Fails if a member package, a recipe or a category is unknown.
    pub fn devel_recipes_licenses(
        &self,
        store: &PackageStore,
        cookbook: &dyn Cookbook,
    ) -> Result<RecipeLicenses> {
        let mut result = RecipeLicenses::new();
        for p in self.member_packages(store)? {
            merge_licenses(&mut result, p.devel_recipes_licenses(cookbook)?);
        }
        Ok(result)
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
