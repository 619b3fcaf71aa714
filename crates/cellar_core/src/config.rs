// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! The build configuration shared by sources and packages

use crate::{Architecture, Error, Platform, Result};

use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------
// - Helpers:
// ----------------------------------------------------------------------

fn env_path(env_var: &str, default_prefix: &str, fallback: &str) -> PathBuf {
    std::env::var(env_var).map_or_else(
        |_| {
            std::env::var("HOME").map_or_else(
                |_| PathBuf::from(fallback),
                |p| PathBuf::from(p).join(default_prefix),
            )
        },
        PathBuf::from,
    )
}

fn config_path() -> PathBuf {
    env_path("XDG_CONFIG_HOME", ".config", "/etc")
}

fn cache_path() -> PathBuf {
    env_path("XDG_CACHE_HOME", ".cache", "/var/cache")
}

fn default_config_file_path() -> Option<PathBuf> {
    let config_file_path = config_path().join("cellar/cellar.toml");
    if config_file_path.exists() {
        Some(config_file_path)
    } else {
        None
    }
}

// ----------------------------------------------------------------------
// - Config:
// ----------------------------------------------------------------------

/// A Configuration object that can be read from a configuration file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// The root URL that default `origin` remotes are derived from
    pub git_root: String,
    /// The directory holding one source cache per recipe
    pub local_sources: PathBuf,
    /// The directory holding one build directory per recipe
    pub sources: PathBuf,
    /// The `Platform` to build for
    pub target_platform: Platform,
    /// The `Architecture` to build for
    pub target_arch: Architecture,
    /// The distribution to build for, if any
    pub target_distro: Option<String>,
    /// The version of the distribution to build for, if any
    pub target_distro_version: Option<String>,
    /// The default directory packages get installed into
    pub install_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_root: "git://anongit.freedesktop.org/gstreamer-sdk".to_string(),
            local_sources: cache_path().join("cellar/sources"),
            sources: cache_path().join("cellar/build"),
            target_platform: Platform::host(),
            target_arch: Architecture::host(),
            target_distro: None,
            target_distro_version: None,
            install_dir: PathBuf::from("/opt/cellar"),
        }
    }
}

impl Config {
    /// Parse a config file and create a `Config` object from it.
    ///
    /// # Errors
    /// May return an `Error::Config` if opening the `config_file` or parsing the necessary values fails.
    #[tracing::instrument(level = "debug")]
    pub fn load(config_file: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_file).map_err(|e| {
            Error::Config(format!(
                "Could not read configuration from \"{}\": {}",
                config_file.display(),
                e
            ))
        })?;
        Self::parse(&contents).map_err(|e| {
            Error::Config(format!(
                "Could not parse configuration in \"{}\": {}",
                config_file.display(),
                e
            ))
        })
    }

    /// Load `config_file` if given, otherwise the user's default configuration
    /// file if it exists, otherwise fall back to the default values.
    ///
    /// # Errors
    /// May return an `Error::Config` if a configuration file exists but can not be used.
    pub fn load_or_default(config_file: &Option<PathBuf>) -> Result<Self> {
        match config_file.clone().or_else(default_config_file_path) {
            Some(f) => Self::load(&f),
            None => {
                tracing::debug!("No configuration file found, using defaults.");
                Ok(Self::default())
            }
        }
    }

    /// Parse a `Config` from TOML text
    ///
    /// # Errors
    /// Returns an `Error::Config` if the text is not a valid configuration.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
