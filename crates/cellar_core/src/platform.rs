// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2020 Tobias Hunger <tobias.hunger@gmail.com>

//! Target platforms and architectures

// ----------------------------------------------------------------------
// - Platform:
// ----------------------------------------------------------------------

/// A target `Platform` to build for
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// macOS
    Darwin,
    /// Android
    Android,
    /// iOS
    Ios,
}

impl Platform {
    /// The `Platform` this binary was built for
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Darwin
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Linux
        }
    }

    /// The lowercase name of the `Platform`, also used as patch directory name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Darwin => "darwin",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "darwin" => Ok(Self::Darwin),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            _ => Err(crate::Error::Conversion {
                expression: s.to_string(),
                typename: "Platform".to_string(),
                message: "Unknown platform".to_string(),
            }),
        }
    }
}

impl std::convert::TryFrom<String> for Platform {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::convert::From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ----------------------------------------------------------------------
// - Architecture:
// ----------------------------------------------------------------------

/// A target `Architecture` to build for
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Architecture {
    /// 32bit Intel
    X86,
    /// 64bit Intel
    X86_64,
    /// Fat binaries
    Universal,
    /// 32bit ARM
    Arm,
    /// ARMv7
    Armv7,
    /// 64bit ARM
    Arm64,
}

impl Architecture {
    /// The `Architecture` this binary was built for
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_arch = "x86") {
            Self::X86
        } else if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else if cfg!(target_arch = "arm") {
            Self::Arm
        } else {
            Self::X86_64
        }
    }

    /// The lowercase name of the `Architecture`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Universal => "universal",
            Self::Arm => "arm",
            Self::Armv7 => "armv7",
            Self::Arm64 => "arm64",
        }
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::host()
    }
}

impl std::str::FromStr for Architecture {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::X86_64),
            "universal" => Ok(Self::Universal),
            "arm" => Ok(Self::Arm),
            "armv7" => Ok(Self::Armv7),
            "arm64" => Ok(Self::Arm64),
            _ => Err(crate::Error::Conversion {
                expression: s.to_string(),
                typename: "Architecture".to_string(),
                message: "Unknown architecture".to_string(),
            }),
        }
    }
}

impl std::convert::TryFrom<String> for Architecture {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::convert::From<Architecture> for String {
    fn from(arch: Architecture) -> Self {
        arch.as_str().to_string()
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ----------------------------------------------------------------------
// - Tests:
// ----------------------------------------------------------------------
