// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! The recipes packages take their files and licenses from

use crate::platform_list::effective_list;
use crate::DEVEL_CATEGORY;

use cellar_core::{Error, Name, Platform, Result};

use std::collections::{BTreeMap, BTreeSet};

// ----------------------------------------------------------------------
// - Types:
// ----------------------------------------------------------------------

/// A set of license names
pub type Licenses = BTreeSet<String>;

/// `Licenses` per category of a recipe
///
/// The `None` key holds the licenses of the recipe as a whole.
pub type CategoryLicenses = BTreeMap<Option<String>, Licenses>;

/// `CategoryLicenses` per recipe
pub type RecipeLicenses = BTreeMap<Name, CategoryLicenses>;

// ----------------------------------------------------------------------
// - Recipe:
// ----------------------------------------------------------------------

/// The files and licenses a recipe provides
pub trait Recipe {
    /// The `Name` of the recipe
    fn name(&self) -> &Name;

    /// All files to distribute at runtime
    fn dist_files_list(&self) -> Vec<String>;

    /// All development files
    fn devel_files_list(&self) -> Vec<String>;

    /// The files in the given `categories`
    ///
    /// # Errors
    /// Returns an `Error::Config` if a category is unknown to the recipe.
    fn files_list_by_categories(&self, categories: &[String]) -> Result<Vec<String>>;

    /// The licenses of the given `categories`, or of the whole recipe if no
    /// categories are given
    ///
    /// # Errors
    /// Returns an `Error::Config` if a category is unknown to the recipe.
    fn list_licenses_by_categories(&self, categories: &[String]) -> Result<CategoryLicenses>;
}

// ----------------------------------------------------------------------
// - Cookbook:
// ----------------------------------------------------------------------

/// A registry of recipes
pub trait Cookbook {
    /// Look up a recipe by `name`
    ///
    /// # Errors
    /// Returns an `Error::UnknownRecipe` if there is no such recipe.
    fn get_recipe(&self, name: &str) -> Result<&dyn Recipe>;
}

// ----------------------------------------------------------------------
// - RecipeDefinition:
// ----------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

/// The files and licenses of one category of a recipe
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CategoryDefinition {
    /// Files on all platforms
    #[serde(default)]
    pub files: Vec<String>,
    /// Extra files per `Platform`
    #[serde(default)]
    pub platform_files: BTreeMap<Platform, Vec<String>>,
    /// Licenses of the files in this category, if different from the recipe
    #[serde(default)]
    pub licenses: Vec<String>,
}

/// The definition of a recipe as found in a recipe file
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RecipeDefinition {
    /// The recipe name
    pub name: Name,
    /// The recipe version
    #[serde(default = "default_version")]
    pub version: String,
    /// The licenses of the recipe
    #[serde(default)]
    pub licenses: Vec<String>,
    /// The categories of files the recipe installs
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryDefinition>,
}

// ----------------------------------------------------------------------
// - MemoryRecipe:
// ----------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Category {
    files: Vec<String>,
    licenses: Licenses,
}

/// A `Recipe` resolved for one `Platform`
#[derive(Clone, Debug)]
pub struct MemoryRecipe {
    name: Name,
    version: String,
    licenses: Licenses,
    categories: BTreeMap<String, Category>,
}

impl MemoryRecipe {
    /// Resolve a `RecipeDefinition` for `platform`
    #[must_use]
    pub fn new(definition: &RecipeDefinition, platform: Platform) -> Self {
        let categories = definition
            .categories
            .iter()
            .map(|(name, cat)| {
                (
                    name.clone(),
                    Category {
                        files: effective_list(&cat.files, &cat.platform_files, platform),
                        licenses: cat.licenses.iter().cloned().collect(),
                    },
                )
            })
            .collect();

        Self {
            name: definition.name.clone(),
            version: definition.version.clone(),
            licenses: definition.licenses.iter().cloned().collect(),
            categories,
        }
    }

    /// The version of the recipe
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    fn category(&self, category: &str) -> Result<&Category> {
        self.categories.get(category).ok_or_else(|| {
            Error::Config(format!(
                "Recipe \"{}\" has no category \"{}\".",
                self.name, category
            ))
        })
    }
}

impl Recipe for MemoryRecipe {
    fn name(&self) -> &Name {
        &self.name
    }

    fn dist_files_list(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(n, _)| n.as_str() != DEVEL_CATEGORY)
            .flat_map(|(_, c)| c.files.iter().cloned())
            .collect()
    }

    fn devel_files_list(&self) -> Vec<String> {
        self.categories
            .get(DEVEL_CATEGORY)
            .map(|c| c.files.clone())
            .unwrap_or_default()
    }

    fn files_list_by_categories(&self, categories: &[String]) -> Result<Vec<String>> {
        let mut result = Vec::new();
        for c in categories {
            result.extend(self.category(c)?.files.iter().cloned());
        }
        Ok(result)
    }

    fn list_licenses_by_categories(&self, categories: &[String]) -> Result<CategoryLicenses> {
        let mut result = CategoryLicenses::new();
        if categories.is_empty() {
            result.insert(None, self.licenses.clone());
            return Ok(result);
        }

        for c in categories {
            let category = self.category(c)?;
            let licenses = if category.licenses.is_empty() {
                self.licenses.clone()
            } else {
                category.licenses.clone()
            };
            result.insert(Some(c.clone()), licenses);
        }
        Ok(result)
    }
}

// ----------------------------------------------------------------------
// - MemoryCookbook:
// ----------------------------------------------------------------------

/// A `Cookbook` holding `MemoryRecipe`s for one `Platform`
#[derive(Clone, Debug)]
pub struct MemoryCookbook {
    platform: Platform,
    recipes: BTreeMap<Name, MemoryRecipe>,
}

impl MemoryCookbook {
    /// Create an empty `MemoryCookbook` for `platform`
    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self {
            platform,
            recipes: BTreeMap::new(),
        }
    }

    /// Add a recipe, replacing any recipe of the same name
    pub fn add_recipe(&mut self, definition: &RecipeDefinition) {
        tracing::trace!("Adding recipe \"{}\" to cookbook.", definition.name);
        self.recipes.insert(
            definition.name.clone(),
            MemoryRecipe::new(definition, self.platform),
        );
    }

    /// Look up a `MemoryRecipe` by `name`
    #[must_use]
    pub fn recipe(&self, name: &str) -> Option<&MemoryRecipe> {
        self.recipes.get(name)
    }

    /// Iterate over all recipe `Name`s
    pub fn recipe_names(&self) -> impl Iterator<Item = &Name> {
        self.recipes.keys()
    }
}

impl Cookbook for MemoryCookbook {
    fn get_recipe(&self, name: &str) -> Result<&dyn Recipe> {
        self.recipes
            .get(name)
            .map(|r| r as &dyn Recipe)
            .ok_or_else(|| Error::UnknownRecipe(name.to_string()))
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{Cookbook, MemoryCookbook, RecipeDefinition};

    use cellar_core::Platform;

    const ZLIB: &str = r#"
name = "zlib"
version = "1.2.7"
licenses = ["BSD-like"]

[categories.libs]
files = ["lib/libz.so.1"]

[categories.libs.platform_files]
windows = ["bin/zlib1.dll"]

[categories.bins]
files = ["bin/minigzip"]
licenses = ["Public Domain"]

[categories.devel]
files = ["include/zlib.h", "lib/pkgconfig/zlib.pc"]
"#;

    fn cookbook(platform: Platform) -> MemoryCookbook {
        let definition: RecipeDefinition = toml::from_str(ZLIB).unwrap();
        let mut cookbook = MemoryCookbook::new(platform);
        cookbook.add_recipe(&definition);
        cookbook
    }

    fn strings(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn recipe_definition_parse() {
        let definition: RecipeDefinition = toml::from_str(ZLIB).unwrap();
        assert_eq!(definition.name.as_str(), "zlib");
        assert_eq!(definition.version, "1.2.7");
        assert_eq!(definition.categories.len(), 3);

        let definition: RecipeDefinition = toml::from_str("name = \"empty\"").unwrap();
        assert_eq!(definition.version, "1.0");
        assert!(definition.categories.is_empty());
    }

    #[test]
    fn cookbook_unknown_recipe() {
        let cookbook = cookbook(Platform::Linux);
        assert!(matches!(
            cookbook.get_recipe("glib"),
            Err(cellar_core::Error::UnknownRecipe(_))
        ));
        assert_eq!(cookbook.recipe("zlib").unwrap().version(), "1.2.7");
    }

    #[test]
    fn recipe_files() {
        let cookbook = cookbook(Platform::Linux);
        let recipe = cookbook.get_recipe("zlib").unwrap();

        assert_eq!(recipe.name().as_str(), "zlib");
        assert_eq!(
            recipe.dist_files_list(),
            strings(&["bin/minigzip", "lib/libz.so.1"])
        );
        assert_eq!(
            recipe.devel_files_list(),
            strings(&["include/zlib.h", "lib/pkgconfig/zlib.pc"])
        );
        assert_eq!(
            recipe
                .files_list_by_categories(&strings(&["libs"]))
                .unwrap(),
            strings(&["lib/libz.so.1"])
        );
        assert!(matches!(
            recipe.files_list_by_categories(&strings(&["lang"])),
            Err(cellar_core::Error::Config(_))
        ));
    }

    #[test]
    fn recipe_platform_files() {
        let cookbook = cookbook(Platform::Windows);
        let recipe = cookbook.get_recipe("zlib").unwrap();

        assert_eq!(
            recipe
                .files_list_by_categories(&strings(&["libs"]))
                .unwrap(),
            strings(&["lib/libz.so.1", "bin/zlib1.dll"])
        );
    }

    #[test]
    fn recipe_licenses() {
        let cookbook = cookbook(Platform::Linux);
        let recipe = cookbook.get_recipe("zlib").unwrap();

        let all = recipe.list_licenses_by_categories(&[]).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.get(&None).unwrap().contains("BSD-like"));

        let some = recipe
            .list_licenses_by_categories(&strings(&["libs", "bins"]))
            .unwrap();
        assert_eq!(some.len(), 2);
        assert!(some
            .get(&Some("libs".to_string()))
            .unwrap()
            .contains("BSD-like"));
        assert!(some
            .get(&Some("bins".to_string()))
            .unwrap()
            .contains("Public Domain"));
    }
}
