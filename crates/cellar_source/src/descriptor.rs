// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Describe where the sources of a recipe come from and where they go

use cellar_core::{Config, Name, Platform};

use std::collections::BTreeMap;
use std::path::PathBuf;

// ----------------------------------------------------------------------
// - Constants:
// ----------------------------------------------------------------------

/// The name of the remote every cache is required to have
pub const ORIGIN_REMOTE: &str = "origin";

/// Prefix of the branches recipes are pinned to by default
pub const BRANCH_PREFIX: &str = "sdk";

// ----------------------------------------------------------------------
// - SourceDefinition:
// ----------------------------------------------------------------------

/// The source settings of a recipe as found in a recipe definition file
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SourceDefinition {
    /// The strategy used to handle the sources
    pub kind: crate::SourceKind,
    /// Remote name to URL mapping
    pub remotes: BTreeMap<String, String>,
    /// The pinned reference, defaults to `origin/sdk-<version>`
    pub commit: Option<String>,
    /// Prefix of the release tarball in the cache, defaults to `<name>-<version>`
    pub package_name: Option<String>,
    /// The recipe has no upstream sources
    pub supports_non_source_build: bool,
    /// Override the cache directory, e.g. to share it with another recipe
    pub repo_dir: Option<PathBuf>,
    /// Override the build directory
    pub build_dir: Option<PathBuf>,
}

// ----------------------------------------------------------------------
// - SourceDescriptor:
// ----------------------------------------------------------------------

/// Everything needed to fetch and extract the sources of one recipe
#[derive(Clone, Debug, PartialEq)]
pub struct SourceDescriptor {
    /// The recipe `name`
    pub name: Name,
    /// The recipe `version`
    pub version: String,
    /// Remote name to URL mapping, always containing `origin`
    pub remotes: BTreeMap<String, String>,
    /// The pinned reference
    pub commit: String,
    /// The persistent cache directory of this recipe
    pub repo_dir: PathBuf,
    /// The build directory of this recipe, defaults to `<sources>/<package_name>`
    pub build_dir: PathBuf,
    /// Prefix of the release tarball in the `repo_dir`
    pub package_name: String,
    /// Where tarballs get unpacked into
    pub unpack_dir: PathBuf,
    /// The `Platform` used to select platform specific patches
    pub platform: Platform,
    /// The recipe has no upstream sources
    pub supports_non_source_build: bool,
}

impl SourceDescriptor {
    /// Create a `SourceDescriptor` for recipe `name` in `version`, filling in
    /// everything not set in `definition` from `config`
    #[must_use]
    pub fn new(name: Name, version: &str, definition: &SourceDefinition, config: &Config) -> Self {
        let mut remotes = definition.remotes.clone();
        remotes
            .entry(ORIGIN_REMOTE.to_string())
            .or_insert_with(|| format!("{}/{}.git", config.git_root, name));

        let commit = definition.commit.clone().unwrap_or_else(|| {
            format!("{}/{}-{}", ORIGIN_REMOTE, BRANCH_PREFIX, version)
        });
        let package_name = definition
            .package_name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", name, version));
        let repo_dir = definition
            .repo_dir
            .clone()
            .unwrap_or_else(|| config.local_sources.join(name.as_str()));
        let build_dir = definition
            .build_dir
            .clone()
            .unwrap_or_else(|| config.sources.join(&package_name));

        Self {
            name,
            version: version.to_string(),
            remotes,
            commit,
            repo_dir,
            build_dir,
            package_name,
            unpack_dir: config.sources.clone(),
            platform: config.target_platform,
            supports_non_source_build: definition.supports_non_source_build,
        }
    }

    /// The directory holding the patches specific to the target platform
    #[must_use]
    pub fn platform_patches_dir(&self) -> PathBuf {
        self.repo_dir.join(self.platform.as_str())
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            git_root: "https://git.example.org/sdk".to_string(),
            local_sources: PathBuf::from("/cache"),
            sources: PathBuf::from("/build"),
            target_platform: Platform::Windows,
            ..Config::default()
        }
    }

    #[test]
    fn descriptor_defaults() {
        let d = SourceDescriptor::new(
            Name::new("glib").unwrap(),
            "2.34.3",
            &SourceDefinition::default(),
            &config(),
        );
        assert_eq!(
            d.remotes.get("origin").unwrap(),
            "https://git.example.org/sdk/glib.git"
        );
        assert_eq!(d.remotes.len(), 1);
        assert_eq!(d.commit, "origin/sdk-2.34.3");
        assert_eq!(d.package_name, "glib-2.34.3");
        assert_eq!(d.repo_dir, PathBuf::from("/cache/glib"));
        assert_eq!(d.build_dir, PathBuf::from("/build/glib-2.34.3"));
        assert_eq!(d.unpack_dir, PathBuf::from("/build"));
        assert_eq!(d.platform_patches_dir(), PathBuf::from("/cache/glib/windows"));
        assert!(!d.supports_non_source_build);
    }

    #[test]
    fn descriptor_keeps_explicit_values() {
        let mut remotes = BTreeMap::new();
        remotes.insert(
            "origin".to_string(),
            "https://mirror.example.org/glib.git".to_string(),
        );
        remotes.insert(
            "upstream".to_string(),
            "git://git.gnome.org/glib".to_string(),
        );
        let definition = SourceDefinition {
            remotes,
            commit: Some("upstream/master".to_string()),
            package_name: Some("glib2".to_string()),
            repo_dir: Some(PathBuf::from("/shared/glib")),
            ..SourceDefinition::default()
        };
        let d = SourceDescriptor::new(Name::new("glib").unwrap(), "2.34.3", &definition, &config());
        assert_eq!(
            d.remotes.get("origin").unwrap(),
            "https://mirror.example.org/glib.git"
        );
        assert_eq!(d.remotes.len(), 2);
        assert_eq!(d.commit, "upstream/master");
        assert_eq!(d.package_name, "glib2");
        assert_eq!(d.repo_dir, PathBuf::from("/shared/glib"));
        assert_eq!(d.build_dir, PathBuf::from("/build/glib2"));
    }

    #[test]
    fn definition_from_toml() {
        let definition: SourceDefinition = toml::from_str(
            r#"
kind = "local_tarball"
supports_non_source_build = true

[remotes]
upstream = "git://example.org/foo"
"#,
        )
        .unwrap();
        assert_eq!(definition.kind, crate::SourceKind::LocalTarball);
        assert!(definition.supports_non_source_build);
        assert_eq!(definition.remotes.len(), 1);
        assert!(definition.commit.is_none());
    }
}
