// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! All known packages and meta packages of one target platform

use crate::cookbook::{Cookbook, RecipeLicenses};
use crate::identity::{Identity, PackageInfo, PackageMode};
use crate::metapackage::{MetaPackage, MetaPackageDefinition};
use crate::package::{Package, PackageDefinition};

use cellar_core::{Error, Name, Names, Platform, Result};

use itertools::Itertools;

use std::collections::BTreeMap;

// ----------------------------------------------------------------------
// - StoreDefinition:
// ----------------------------------------------------------------------

/// A package or meta package definition as found in a package file
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreDefinition {
    /// A `Package`
    Package(PackageDefinition),
    /// A `MetaPackage`
    MetaPackage(MetaPackageDefinition),
}

impl StoreDefinition {
    /// The `Name` of the defined package
    #[must_use]
    pub const fn name(&self) -> &Name {
        match self {
            Self::Package(p) => &p.info.name,
            Self::MetaPackage(m) => &m.info.name,
        }
    }
}

// ----------------------------------------------------------------------
// - StoredPackage:
// ----------------------------------------------------------------------

/// An entry in the `PackageStore`
#[derive(Clone, Debug)]
pub enum StoredPackage {
    /// A `Package`
    Package(Package),
    /// A `MetaPackage`
    MetaPackage(MetaPackage),
}

impl StoredPackage {
    /// The `Name` of the entry
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.info().name
    }

    /// Descriptive data of the entry
    #[must_use]
    pub const fn info(&self) -> &PackageInfo {
        match self {
            Self::Package(p) => p.info(),
            Self::MetaPackage(m) => m.info(),
        }
    }

    /// The `Identity` of the entry in `mode`
    #[must_use]
    pub fn identity(&self, mode: PackageMode) -> Identity {
        self.info().identity(mode)
    }

    /// The `Package`, if this entry is one
    #[must_use]
    pub const fn as_package(&self) -> Option<&Package> {
        match self {
            Self::Package(p) => Some(p),
            Self::MetaPackage(_) => None,
        }
    }

    /// The `MetaPackage`, if this entry is one
    #[must_use]
    pub const fn as_meta_package(&self) -> Option<&MetaPackage> {
        match self {
            Self::Package(_) => None,
            Self::MetaPackage(m) => Some(m),
        }
    }

    /// The packages this entry depends on directly
    ///
    /// Meta packages depend on their members.
    #[must_use]
    pub fn dependency_names(&self) -> Vec<Name> {
        match self {
            Self::Package(p) => p.deps().to_vec(),
            Self::MetaPackage(m) => m.package_names(),
        }
    }
}

// ----------------------------------------------------------------------
// - PackageStore:
// ----------------------------------------------------------------------

/// Packages and meta packages by `Name`
#[derive(Clone, Debug)]
pub struct PackageStore {
    platform: Platform,
    packages: BTreeMap<Name, StoredPackage>,
}

impl PackageStore {
    /// Create an empty `PackageStore` for `platform`
    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self {
            platform,
            packages: BTreeMap::new(),
        }
    }

    /// The `Platform` all entries are resolved for
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Add a package or meta package, replacing any entry of the same name
    pub fn add(&mut self, definition: &StoreDefinition) {
        match definition {
            StoreDefinition::Package(p) => self.add_package(p),
            StoreDefinition::MetaPackage(m) => self.add_meta_package(m),
        }
    }

    /// Add a package, replacing any entry of the same name
    pub fn add_package(&mut self, definition: &PackageDefinition) {
        tracing::trace!("Adding package \"{}\" to store.", definition.info.name);
        self.packages.insert(
            definition.info.name.clone(),
            StoredPackage::Package(Package::new(definition, self.platform)),
        );
    }

    /// Add a meta package, replacing any entry of the same name
    pub fn add_meta_package(&mut self, definition: &MetaPackageDefinition) {
        tracing::trace!("Adding meta package \"{}\" to store.", definition.info.name);
        self.packages.insert(
            definition.info.name.clone(),
            StoredPackage::MetaPackage(MetaPackage::new(definition, self.platform)),
        );
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &StoredPackage> {
        self.packages.values()
    }

    /// Look up a package or meta package by `name`
    ///
    /// # Errors
    /// Returns `Error::UnknownPackage` if there is no such entry.
    pub fn get(&self, name: &str) -> Result<&StoredPackage> {
        self.packages
            .get(name)
            .ok_or_else(|| Error::UnknownPackage(name.to_string()))
    }

    /// Look up a package by `name`
    ///
    /// # Errors
    /// Returns `Error::UnknownPackage` if there is no such entry, or
    /// `Error::Config` if `name` is a meta package.
    pub fn get_package(&self, name: &str) -> Result<&Package> {
        self.get(name)?.as_package().ok_or_else(|| {
            Error::Config(format!("\"{}\" is a meta package, not a package.", name))
        })
    }

    /// Look up a meta package by `name`
    ///
    /// # Errors
    /// Returns `Error::UnknownPackage` if there is no such entry, or
    /// `Error::Config` if `name` is no meta package.
    pub fn get_meta_package(&self, name: &str) -> Result<&MetaPackage> {
        self.get(name)?.as_meta_package().ok_or_else(|| {
            Error::Config(format!("\"{}\" is a package, not a meta package.", name))
        })
    }

    /// The packages `name` depends on
    ///
    /// Meta packages always report all their members and everything those
    /// depend on. Other packages report their direct dependencies unless
    /// `recursive` is set. The result has no duplicates and is ordered by
    /// first visit.
    ///
    /// # Errors
    /// Fails if a package is unknown or the dependencies form a cycle.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_package_dependencies(
        &self,
        name: &str,
        recursive: bool,
    ) -> Result<Vec<&StoredPackage>> {
        let root = self.get(name)?;
        let direct = root.dependency_names();

        if recursive || root.as_meta_package().is_some() {
            self.dependency_closure(root.name(), &direct)
        } else {
            direct
                .iter()
                .unique()
                .map(|d| self.get(d.as_str()))
                .collect()
        }
    }

    /// `roots` and everything they depend on, ordered by first visit
    ///
    /// `origin` is the package asking, it must not be part of the closure.
    ///
    /// # Errors
    /// Fails if a package is unknown or the dependencies form a cycle.
    pub fn dependency_closure(
        &self,
        origin: &Name,
        roots: &[Name],
    ) -> Result<Vec<&StoredPackage>> {
        let mut path = vec![origin.clone()];
        let mut result = Vec::new();
        for r in roots {
            self.visit(r, &mut path, &mut result)?;
        }
        Ok(result)
    }

    fn visit<'a>(
        &'a self,
        name: &Name,
        path: &mut Vec<Name>,
        result: &mut Vec<&'a StoredPackage>,
    ) -> Result<()> {
        if path.contains(name) {
            return Err(Error::DependencyCycle(
                path.iter()
                    .chain(std::iter::once(name))
                    .map(Name::as_str)
                    .join(" -> "),
            ));
        }
        if result.iter().any(|p| p.name() == name) {
            return Ok(());
        }

        let entry = self.get(name.as_str())?;
        result.push(entry);

        path.push(name.clone());
        for d in entry.dependency_names() {
            self.visit(&d, path, result)?;
        }
        path.pop();

        Ok(())
    }

    /// The sorted runtime files of package or meta package `name`
    ///
    /// # Errors
    /// Fails if a package, recipe or category is unknown.
    pub fn files_list(&self, name: &str, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        match self.get(name)? {
            StoredPackage::Package(p) => p.files_list(cookbook),
            StoredPackage::MetaPackage(m) => m.files_list(self, cookbook),
        }
    }

    /// The sorted development files of package or meta package `name`
    ///
    /// # Errors
    /// Fails if a package, recipe or category is unknown.
    pub fn devel_files_list(&self, name: &str, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        match self.get(name)? {
            StoredPackage::Package(p) => p.devel_files_list(cookbook),
            StoredPackage::MetaPackage(m) => m.devel_files_list(self, cookbook),
        }
    }

    /// The sorted runtime and development files of package or meta package `name`
    ///
    /// # Errors
    /// Fails if a package, recipe or category is unknown.
    pub fn all_files_list(&self, name: &str, cookbook: &dyn Cookbook) -> Result<Vec<String>> {
        match self.get(name)? {
            StoredPackage::Package(p) => p.all_files_list(cookbook),
            StoredPackage::MetaPackage(m) => m.all_files_list(self, cookbook),
        }
    }

    /// All recipes package or meta package `name` needs, including those of
    /// the packages it depends on
    ///
    /// # Errors
    /// Fails if a package is unknown or the dependencies form a cycle.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn recipes_dependencies(&self, name: &str) -> Result<Names> {
        let mut result = self
            .get(name)?
            .as_package()
            .map(Package::own_recipes)
            .unwrap_or_default();
        for p in self.get_package_dependencies(name, true)? {
            if let Some(p) = p.as_package() {
                result.extend(p.own_recipes());
            }
        }
        Ok(result)
    }

    /// The runtime licenses of package or meta package `name`
    ///
    /// # Errors
    /// Fails if a package, recipe or category is unknown.
    pub fn recipes_licenses(&self, name: &str, cookbook: &dyn Cookbook) -> Result<RecipeLicenses> {
        match self.get(name)? {
            StoredPackage::Package(p) => p.recipes_licenses(cookbook),
            StoredPackage::MetaPackage(m) => m.recipes_licenses(self, cookbook),
        }
    }

    /// The development licenses of package or meta package `name`
    ///
    /// # Errors
    /// Fails if a package, recipe or category is unknown.
    pub fn devel_recipes_licenses(
        &self,
        name: &str,
        cookbook: &dyn Cookbook,
    ) -> Result<RecipeLicenses> {
        match self.get(name)? {
            StoredPackage::Package(p) => p.devel_recipes_licenses(cookbook),
            StoredPackage::MetaPackage(m) => m.devel_recipes_licenses(self, cookbook),
        }
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{PackageStore, StoreDefinition};

    use crate::cookbook::{MemoryCookbook, RecipeDefinition};

    use cellar_core::Platform;

    const RECIPES: &[&str] = &[
        "name = \"x\"\n[categories.libs]\nfiles = [\"lib/libx.so\"]\n[categories.devel]\nfiles = [\"include/x.h\"]",
        "name = \"y\"\n[categories.bins]\nfiles = [\"bin/y\"]\n[categories.devel]\nfiles = [\"include/y.h\"]",
        "name = \"z\"\n[categories.libs]\nfiles = [\"lib/libz.so\"]",
    ];

    const PACKAGES: &[&str] = &[
        "kind = \"package\"\nname = \"a\"\ndeps = [\"b\"]\nfiles = [\"x\", \"y:bins\"]",
        "kind = \"package\"\nname = \"b\"\nfiles = [\"x:libs\"]",
        "kind = \"package\"\nname = \"c\"\ndeps = [\"a\", \"b\"]\nfiles = [\"z\"]",
        "kind = \"meta_package\"\nname = \"sdk\"\npackages = [{ name = \"c\" }, { name = \"b\" }]",
        "kind = \"meta_package\"\nname = \"bundle\"\npackages = [{ name = \"sdk\" }]",
    ];

    fn cookbook() -> MemoryCookbook {
        let mut cookbook = MemoryCookbook::new(Platform::Linux);
        for r in RECIPES {
            let definition: RecipeDefinition = toml::from_str(r).unwrap();
            cookbook.add_recipe(&definition);
        }
        cookbook
    }

    fn store(extra: &[&str]) -> PackageStore {
        let mut store = PackageStore::new(Platform::Linux);
        for p in PACKAGES.iter().chain(extra.iter()) {
            let definition: StoreDefinition = toml::from_str(p).unwrap();
            store.add(&definition);
        }
        store
    }

    fn names(packages: &[&super::StoredPackage]) -> Vec<String> {
        packages.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn store_lookup() {
        let store = store(&[]);
        assert_eq!(store.iter().count(), 5);
        assert_eq!(store.platform(), Platform::Linux);

        let definition: StoreDefinition = toml::from_str(PACKAGES[3]).unwrap();
        assert_eq!(definition.name().as_str(), "sdk");

        assert_eq!(store.get_package("a").unwrap().name().as_str(), "a");
        assert_eq!(store.get_meta_package("sdk").unwrap().name().as_str(), "sdk");
        assert!(matches!(
            store.get("nope"),
            Err(cellar_core::Error::UnknownPackage(_))
        ));
        assert!(matches!(
            store.get_package("sdk"),
            Err(cellar_core::Error::Config(_))
        ));
        assert!(matches!(
            store.get_meta_package("a"),
            Err(cellar_core::Error::Config(_))
        ));
    }

    #[test]
    fn store_package_dependencies() {
        let store = store(&[]);

        assert_eq!(
            names(&store.get_package_dependencies("c", false).unwrap()),
            vec!["a", "b"]
        );
        assert_eq!(
            names(&store.get_package_dependencies("c", true).unwrap()),
            vec!["a", "b"]
        );
        assert_eq!(
            names(&store.get_package_dependencies("a", true).unwrap()),
            vec!["b"]
        );
        assert!(store.get_package_dependencies("b", true).unwrap().is_empty());
    }

    #[test]
    fn store_meta_package_dependencies() {
        let store = store(&[]);

        assert_eq!(
            names(&store.get_package_dependencies("sdk", false).unwrap()),
            vec!["c", "a", "b"]
        );
        assert_eq!(
            names(&store.get_package_dependencies("bundle", false).unwrap()),
            vec!["sdk", "c", "a", "b"]
        );
    }

    #[test]
    fn store_unknown_dependency() {
        let store = store(&["kind = \"package\"\nname = \"d\"\ndeps = [\"missing\"]"]);
        assert!(matches!(
            store.get_package_dependencies("d", true),
            Err(cellar_core::Error::UnknownPackage(_))
        ));
        assert!(matches!(
            store.recipes_dependencies("d"),
            Err(cellar_core::Error::UnknownPackage(_))
        ));
    }

    #[test]
    fn store_dependency_cycle() {
        let store = store(&[
            "kind = \"package\"\nname = \"p\"\ndeps = [\"q\"]",
            "kind = \"package\"\nname = \"q\"\ndeps = [\"r\"]",
            "kind = \"package\"\nname = \"r\"\ndeps = [\"p\"]",
        ]);

        match store.get_package_dependencies("p", true) {
            Err(cellar_core::Error::DependencyCycle(chain)) => {
                assert_eq!(chain, "p -> q -> r -> p");
            }
            _ => panic!("Cycle not detected"),
        }
        assert!(matches!(
            store.recipes_dependencies("q"),
            Err(cellar_core::Error::DependencyCycle(_))
        ));
        assert!(matches!(
            store
                .get_package("r")
                .unwrap()
                .recipes_dependencies(&store),
            Err(cellar_core::Error::DependencyCycle(_))
        ));
    }

    #[test]
    fn store_recipes_dependencies() {
        let store = store(&[]);

        assert_eq!(store.recipes_dependencies("b").unwrap().to_string(), "x");
        assert_eq!(store.recipes_dependencies("a").unwrap().to_string(), "x y");
        assert_eq!(
            store.recipes_dependencies("c").unwrap().to_string(),
            "x y z"
        );
        assert_eq!(
            store.recipes_dependencies("sdk").unwrap().to_string(),
            "x y z"
        );
        assert_eq!(
            store.recipes_dependencies("bundle").unwrap().to_string(),
            "x y z"
        );
    }

    #[test]
    fn package_recipes_dependencies_are_unique() {
        let store = store(&[]);
        let a = store.get_package("a").unwrap();

        let recipes = a.recipes_dependencies(&store).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(
            recipes
                .iter()
                .filter(|r| r.as_str() == "x")
                .count(),
            1
        );
    }

    #[test]
    fn store_files_list() {
        let store = store(&[]);
        let cookbook = cookbook();

        assert_eq!(
            store.files_list("a", &cookbook).unwrap(),
            vec!["bin/y".to_string(), "lib/libx.so".to_string()]
        );
        assert_eq!(
            store.files_list("sdk", &cookbook).unwrap(),
            vec![
                "bin/y".to_string(),
                "lib/libx.so".to_string(),
                "lib/libx.so".to_string(),
                "lib/libz.so".to_string(),
            ]
        );
        assert_eq!(
            store.devel_files_list("sdk", &cookbook).unwrap(),
            vec!["include/x.h".to_string(), "include/x.h".to_string()]
        );
        assert_eq!(
            store.all_files_list("bundle", &cookbook).unwrap(),
            vec![
                "bin/y".to_string(),
                "include/x.h".to_string(),
                "lib/libx.so".to_string(),
                "lib/libz.so".to_string(),
            ]
        );
    }

    #[test]
    fn store_licenses() {
        let store = store(&["kind = \"package\"\nname = \"e\"\nfiles = [\"y:bins\"]\nfiles_devel = [\"x\"]"]);
        let cookbook = cookbook();

        let licenses = store.recipes_licenses("sdk", &cookbook).unwrap();
        assert_eq!(
            licenses
                .keys()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["x", "y", "z"]
        );

        let licenses = store.devel_recipes_licenses("e", &cookbook).unwrap();
        assert_eq!(
            licenses
                .keys()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["x"]
        );
    }
}
