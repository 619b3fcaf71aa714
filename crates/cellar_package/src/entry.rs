// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! File list entries of the form `recipe[:category:category]`

use cellar_core::{Error, Name, Result};

fn malformed(entry: &str, message: &str) -> Error {
    Error::Config(format!("Malformed file list entry \"{}\": {}", entry, message))
}

// ----------------------------------------------------------------------
// - RecipeFileEntry:
// ----------------------------------------------------------------------

/// A reference to (parts of) the files of one recipe
///
/// An empty list of `categories` selects all files of the recipe.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeFileEntry {
    /// The recipe to take files from
    pub recipe: Name,
    /// The categories of files to take
    pub categories: Vec<String>,
}

impl RecipeFileEntry {
    /// Parse a `recipe[:category:category]` string
    ///
    /// # Errors
    /// Returns `Error::Config` if the recipe name or a category is empty or
    /// the recipe name is invalid.
    pub fn parse(entry: &str) -> Result<Self> {
        let mut tokens = entry.split(':');
        let recipe = tokens.next().unwrap_or_default();
        if recipe.is_empty() {
            return Err(malformed(entry, "No recipe name given"));
        }
        let recipe = Name::new(recipe).map_err(|e| malformed(entry, &e.to_string()))?;

        let categories = tokens.map(str::to_string).collect::<Vec<_>>();
        if categories.iter().any(String::is_empty) {
            return Err(malformed(entry, "Empty category"));
        }

        Ok(Self { recipe, categories })
    }

    /// Does this entry select all files of its recipe?
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.categories.is_empty()
    }
}

impl std::str::FromStr for RecipeFileEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::convert::TryFrom<String> for RecipeFileEntry {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl std::convert::From<RecipeFileEntry> for String {
    fn from(entry: RecipeFileEntry) -> Self {
        entry.to_string()
    }
}

impl std::fmt::Display for RecipeFileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.recipe)?;
        for c in &self.categories {
            write!(f, ":{}", c)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// - RecipeFiles:
// ----------------------------------------------------------------------

/// A mapping of recipe `Name` to the categories of files selected from it
///
/// Each recipe is contained once. An empty category list selects all files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecipeFiles(std::collections::BTreeMap<Name, Vec<String>>);

impl RecipeFiles {
    /// Merge a list of `RecipeFileEntry` into one `RecipeFiles` mapping
    ///
    /// Entries selecting all files win over entries restricted to categories,
    /// categories of the same recipe get merged.
    #[must_use]
    pub fn from_entries(entries: &[RecipeFileEntry]) -> Self {
        let mut result = std::collections::BTreeMap::<Name, Vec<String>>::new();
        for e in entries {
            match result.entry(e.recipe.clone()) {
                std::collections::btree_map::Entry::Vacant(v) => {
                    v.insert(e.categories.clone());
                }
                std::collections::btree_map::Entry::Occupied(mut o) => {
                    let categories = o.get_mut();
                    if categories.is_empty() || e.is_all() {
                        categories.clear();
                    } else {
                        for c in &e.categories {
                            if !categories.contains(c) {
                                categories.push(c.clone());
                            }
                        }
                    }
                }
            }
        }
        Self(result)
    }

    /// The categories selected for `recipe`, if the recipe is referenced
    #[must_use]
    pub fn get(&self, recipe: &str) -> Option<&[String]> {
        self.0.get(recipe).map(Vec::as_slice)
    }

    /// Iterate over recipe `Name`s and their categories
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &[String])> {
        self.0.iter().map(|(n, c)| (n, c.as_slice()))
    }

    /// Iterate over the recipe `Name`s
    pub fn recipes(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    /// Iterate over the recipes whose libraries are selected
    ///
    /// These are all recipes with all files selected plus those that select
    /// the libraries category explicitly.
    pub fn with_libraries(&self) -> impl Iterator<Item = &Name> {
        self.0
            .iter()
            .filter(|(_, c)| c.is_empty() || c.iter().any(|c| c == crate::LIBRARIES_CATEGORY))
            .map(|(n, _)| n)
    }

    /// Number of recipes referenced
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is no recipe referenced at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
