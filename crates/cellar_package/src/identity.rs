// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Package identity: Names, descriptions and installer ids of the runtime and
//! devel variants of a package

use cellar_core::{Config, Error, Name, Platform, Result};

use std::collections::BTreeMap;
use std::path::PathBuf;

// ----------------------------------------------------------------------
// - Helper:
// ----------------------------------------------------------------------

const DEVEL_NAME_SUFFIX: &str = "-devel";
const DEVEL_SHORTDESC_SUFFIX: &str = " (Development Files)";

fn default_shortdesc() -> String {
    "default".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_license() -> String {
    "GPL".to_string()
}

/// Derive the devel uuid from the runtime `uuid`
///
/// The first character becomes '1' if it was '0' and '0' otherwise.
fn devel_uuid(uuid: &str) -> String {
    let mut chars = uuid.chars();
    match chars.next() {
        Some(first) => {
            let toggled = if first == '0' { '1' } else { '0' };
            std::iter::once(toggled).chain(chars).collect()
        }
        None => String::new(),
    }
}

// ----------------------------------------------------------------------
// - PackageMode:
// ----------------------------------------------------------------------

/// The variant of a package to work with
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum PackageMode {
    /// The files needed at runtime
    Runtime,
    /// The files needed to develop against the package
    Devel,
}

impl PackageMode {
    /// The suffix appended to the package name in this mode
    #[must_use]
    pub const fn name_suffix(&self) -> &'static str {
        match self {
            Self::Runtime => "",
            Self::Devel => DEVEL_NAME_SUFFIX,
        }
    }

    /// The lowercase name of the `PackageMode`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Devel => "devel",
        }
    }
}

impl Default for PackageMode {
    fn default() -> Self {
        Self::Runtime
    }
}

impl std::str::FromStr for PackageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "runtime" => Ok(Self::Runtime),
            "devel" => Ok(Self::Devel),
            _ => Err(Error::Conversion {
                expression: s.to_string(),
                typename: "PackageMode".to_string(),
                message: "Must be \"runtime\" or \"devel\"".to_string(),
            }),
        }
    }
}

impl std::convert::TryFrom<String> for PackageMode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl std::convert::From<PackageMode> for String {
    fn from(mode: PackageMode) -> Self {
        mode.as_str().to_string()
    }
}

impl std::fmt::Display for PackageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ----------------------------------------------------------------------
// - Identity:
// ----------------------------------------------------------------------

/// The externally visible identity of a package in one `PackageMode`
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Identity {
    /// The package name
    pub name: String,
    /// The short description
    pub shortdesc: String,
    /// The installer id
    pub uuid: Option<String>,
}

// ----------------------------------------------------------------------
// - PackageInfo:
// ----------------------------------------------------------------------

/// Descriptive data shared by packages and meta packages
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PackageInfo {
    /// The package name
    pub name: Name,
    /// A one line description
    #[serde(default = "default_shortdesc")]
    pub shortdesc: String,
    /// A longer description
    #[serde(default)]
    pub longdesc: String,
    /// The version
    #[serde(default = "default_version")]
    pub version: String,
    /// A release code name
    #[serde(default)]
    pub codename: Option<String>,
    /// The organization (in reverse domain notation)
    #[serde(default)]
    pub org: String,
    /// The base installer id of the runtime variant
    #[serde(default)]
    pub uuid: Option<String>,
    /// The license of the package
    #[serde(default = "default_license")]
    pub license: String,
    /// The vendor
    #[serde(default)]
    pub vendor: String,
    /// The project URL
    #[serde(default)]
    pub url: String,
    /// Installation directories per `Platform`
    #[serde(default)]
    pub install_dir: BTreeMap<Platform, PathBuf>,
    /// System dependencies per distribution or distribution version
    #[serde(default)]
    pub sys_deps: BTreeMap<String, Vec<String>>,
}

impl PackageInfo {
    /// Create a `PackageInfo` with default values for everything but the `name`
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            name,
            shortdesc: default_shortdesc(),
            longdesc: String::new(),
            version: default_version(),
            codename: None,
            org: String::new(),
            uuid: None,
            license: default_license(),
            vendor: String::new(),
            url: String::new(),
            install_dir: BTreeMap::new(),
            sys_deps: BTreeMap::new(),
        }
    }

    /// Compute the `Identity` of the package in `mode`
    ///
    /// The devel identity is always derived from the runtime values.
    #[must_use]
    pub fn identity(&self, mode: PackageMode) -> Identity {
        match mode {
            PackageMode::Runtime => Identity {
                name: self.name.to_string(),
                shortdesc: self.shortdesc.clone(),
                uuid: self.uuid.clone(),
            },
            PackageMode::Devel => Identity {
                name: self.name.with_suffix(mode.name_suffix()),
                shortdesc: format!("{}{}", self.shortdesc, DEVEL_SHORTDESC_SUFFIX),
                uuid: self.uuid.as_deref().map(devel_uuid),
            },
        }
    }

    /// The directory to install into on the configured target platform
    #[must_use]
    pub fn get_install_dir(&self, config: &Config) -> PathBuf {
        self.install_dir
            .get(&config.target_platform)
            .cloned()
            .unwrap_or_else(|| config.install_dir.clone())
    }

    /// The system dependencies on the configured target distribution
    ///
    /// Dependencies listed for the distribution version win over those
    /// listed for the distribution.
    #[must_use]
    pub fn get_sys_deps(&self, config: &Config) -> Vec<String> {
        [
            config.target_distro_version.as_ref(),
            config.target_distro.as_ref(),
        ]
        .into_iter()
        .flatten()
        .find_map(|k| self.sys_deps.get(k))
        .cloned()
        .unwrap_or_default()
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{PackageInfo, PackageMode};

    use cellar_core::{Config, Name, Platform};

    fn info(uuid: Option<&str>) -> PackageInfo {
        let mut info = PackageInfo::new(Name::new("gstreamer-core").unwrap());
        info.shortdesc = "GStreamer core".to_string();
        info.uuid = uuid.map(str::to_string);
        info
    }

    #[test]
    fn identity_runtime() {
        let id = info(Some("0ABC")).identity(PackageMode::Runtime);
        assert_eq!(id.name, "gstreamer-core");
        assert_eq!(id.shortdesc, "GStreamer core");
        assert_eq!(id.uuid.as_deref(), Some("0ABC"));
    }

    #[test]
    fn identity_devel() {
        let id = info(Some("0ABC")).identity(PackageMode::Devel);
        assert_eq!(id.name, "gstreamer-core-devel");
        assert_eq!(id.shortdesc, "GStreamer core (Development Files)");
        assert_eq!(id.uuid.as_deref(), Some("1ABC"));

        let id = info(Some("1XYZ")).identity(PackageMode::Devel);
        assert_eq!(id.uuid.as_deref(), Some("0XYZ"));

        let id = info(Some("7XYZ")).identity(PackageMode::Devel);
        assert_eq!(id.uuid.as_deref(), Some("0XYZ"));

        assert_eq!(info(None).identity(PackageMode::Devel).uuid, None);
    }

    #[test]
    fn identity_devel_is_stable() {
        let info = info(Some("0ABC"));
        let first = info.identity(PackageMode::Devel);
        let second = info.identity(PackageMode::Devel);
        assert_eq!(first, second);
        assert_eq!(second.uuid.as_deref(), Some("1ABC"));
        assert_eq!(
            info.identity(PackageMode::Runtime).uuid.as_deref(),
            Some("0ABC")
        );
    }

    #[test]
    fn package_mode_parse() {
        assert_eq!("Devel".parse::<PackageMode>().unwrap(), PackageMode::Devel);
        assert_eq!(
            "runtime".parse::<PackageMode>().unwrap(),
            PackageMode::Runtime
        );
        assert!("debug".parse::<PackageMode>().is_err());
    }

    #[test]
    fn install_dir() {
        let mut config = Config::default();
        config.target_platform = Platform::Windows;
        config.install_dir = "/opt/default".into();

        let mut info = info(None);
        assert_eq!(
            info.get_install_dir(&config),
            std::path::PathBuf::from("/opt/default")
        );

        info.install_dir
            .insert(Platform::Windows, "C:\\cellar".into());
        assert_eq!(
            info.get_install_dir(&config),
            std::path::PathBuf::from("C:\\cellar")
        );
    }

    #[test]
    fn sys_deps() {
        let mut config = Config::default();
        let mut info = info(None);
        info.sys_deps
            .insert("debian".to_string(), vec!["libc6".to_string()]);
        info.sys_deps
            .insert("debian_squeeze".to_string(), vec!["libc6-old".to_string()]);

        assert!(info.get_sys_deps(&config).is_empty());

        config.target_distro = Some("debian".to_string());
        assert_eq!(info.get_sys_deps(&config), vec!["libc6".to_string()]);

        config.target_distro_version = Some("debian_squeeze".to_string());
        assert_eq!(info.get_sys_deps(&config), vec!["libc6-old".to_string()]);

        config.target_distro_version = Some("debian_wheezy".to_string());
        assert_eq!(info.get_sys_deps(&config), vec!["libc6".to_string()]);
    }

    #[test]
    fn package_info_defaults() {
        let info: PackageInfo = toml::from_str("name = \"gtk\"").unwrap();
        assert_eq!(info, PackageInfo::new(Name::new("gtk").unwrap()));
    }
}
