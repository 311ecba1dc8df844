use std::fmt;
use std::path::Path;

use bitflags::bitflags;
use semver::VersionReq;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::unit::error::UnitError;

/// Platforms a unit can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Android,
}

impl Platform {
    /// Name of the per-platform subdirectory inside a unit's folder.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Android => "android",
        }
    }

    /// The platform this build is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

bitflags! {
    /// Set of platforms a unit supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PlatformSet: u32 {
        const WINDOWS = 1 << 0;
        const LINUX   = 1 << 1;
        const MACOS   = 1 << 2;
        const ANDROID = 1 << 3;
    }
}

impl PlatformSet {
    pub fn supports(&self, platform: Platform) -> bool {
        self.contains(match platform {
            Platform::Windows => PlatformSet::WINDOWS,
            Platform::Linux => PlatformSet::LINUX,
            Platform::MacOs => PlatformSet::MACOS,
            Platform::Android => PlatformSet::ANDROID,
        })
    }
}

impl Default for PlatformSet {
    fn default() -> Self {
        PlatformSet::all()
    }
}

bitflags! {
    /// Kinds of content a unit carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ContentKinds: u32 {
        const CODE   = 1 << 0;
        const ASSETS = 1 << 1;
        const SCENES = 1 << 2;
    }
}

impl Default for ContentKinds {
    fn default() -> Self {
        ContentKinds::empty()
    }
}

/// A unit's descriptor file: identity, declared dependencies and the
/// content/platform bitsets. One descriptor file per unit; round-trips
/// losslessly on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModDescriptor {
    /// Unique identifier. Lower-cased by [`path_id`](Self::path_id) when
    /// deriving file names.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub description: String,

    /// Unit version string.
    pub version: String,

    /// Host version the unit was built against, interpreted as a semver
    /// requirement against the running host.
    pub host_version: String,

    /// Supported platforms.
    #[serde(default)]
    pub platforms: PlatformSet,

    /// Content kinds present in this unit.
    #[serde(default)]
    pub content: ContentKinds,

    /// Whether the unit is enabled; disabled units still resolve but are
    /// reported to their dependents.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ids of units this unit depends on. Flat satisfaction: present and
    /// enabled, or not. No version constraint.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl ModDescriptor {
    pub fn new(id: &str, name: &str, version: &str, host_version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            author: String::new(),
            description: String::new(),
            version: version.to_string(),
            host_version: host_version.to_string(),
            platforms: PlatformSet::all(),
            content: ContentKinds::empty(),
            enabled: true,
            dependencies: Vec::new(),
        }
    }

    /// Lower-cased id used to derive on-disk names (`<id>.assets`,
    /// `<id>.scenes`).
    pub fn path_id(&self) -> String {
        self.id.to_lowercase()
    }

    /// The host-version constraint this unit declares. A plain version
    /// string ("1.4.2") parses as the usual caret requirement.
    pub fn host_requirement(&self) -> Result<VersionReq, semver::Error> {
        VersionReq::parse(&self.host_version)
    }

    /// Read a descriptor from a file.
    pub async fn load(path: &Path) -> Result<Self, UnitError> {
        let data = fs::read_to_string(path)
            .await
            .map_err(|source| UnitError::DescriptorIo {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&data).map_err(|source| UnitError::DescriptorParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the descriptor back to a file, pretty-printed.
    pub async fn save(&self, path: &Path) -> Result<(), UnitError> {
        let data =
            serde_json::to_string_pretty(self).map_err(|source| UnitError::DescriptorParse {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, data)
            .await
            .map_err(|source| UnitError::DescriptorIo {
                path: path.to_path_buf(),
                source,
            })
    }
}
