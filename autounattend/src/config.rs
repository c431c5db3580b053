use crate::options::ConfigModel;
use anyhow::Result;
use clap::{ValueEnum, builder::PossibleValue};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use strum::EnumIter;
use tracing::debug;

/// Base name of configuration files discovered in a directory.
pub const CONFIG_NAME: &str = "autounattend";

/// Represents a generator configuration file. This mainly helps sort out the
/// various supported config formats.
#[derive(Clone, Debug, EnumIter, PartialEq, Eq)]
pub enum ConfigPath {
    Json(PathBuf),
    Ron(PathBuf),
    Toml(PathBuf),
    Yaml(PathBuf),
}

impl Default for ConfigPath {
    fn default() -> Self {
        ConfigPath::Json(PathBuf::from("./autounattend.json"))
    }
}

static VARIANTS: OnceLock<Vec<ConfigPath>> = OnceLock::new();

impl ValueEnum for ConfigPath {
    fn value_variants<'a>() -> &'a [Self] {
        VARIANTS.get_or_init(|| {
            vec![
                ConfigPath::Json(PathBuf::from("./autounattend.json")),
                ConfigPath::Ron(PathBuf::from("./autounattend.ron")),
                ConfigPath::Toml(PathBuf::from("./autounattend.toml")),
                ConfigPath::Yaml(PathBuf::from("./autounattend.yaml")),
            ]
        })
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match *self {
            ConfigPath::Json(_) => Some(PossibleValue::new("json")),
            ConfigPath::Ron(_) => Some(PossibleValue::new("ron")),
            ConfigPath::Toml(_) => Some(PossibleValue::new("toml")),
            ConfigPath::Yaml(_) => Some(PossibleValue::new("yaml")),
        }
    }
}

impl ConfigPath {
    /// Check for a configuration file in the given directory.
    pub fn from_dir(path: impl AsRef<Path>) -> Option<ConfigPath> {
        let path = path.as_ref();

        for extension in ["json", "ron", "toml", "yaml", "yml"] {
            let candidate = path.join(format!("{CONFIG_NAME}.{extension}"));
            if candidate.exists() {
                return ConfigPath::from_file(candidate);
            }
        }
        None
    }

    /// Determine the format of a configuration file from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Option<ConfigPath> {
        let path = path.as_ref().to_path_buf();
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "json" => Some(ConfigPath::Json(path)),
            "ron" => Some(ConfigPath::Ron(path)),
            "toml" => Some(ConfigPath::Toml(path)),
            "yaml" | "yml" => Some(ConfigPath::Yaml(path)),
            _ => None,
        }
    }

    /// Resolve a path given on the command line, which may be either a
    /// configuration file or a directory containing one.
    pub fn resolve(path: impl AsRef<Path>) -> Option<ConfigPath> {
        let path = path.as_ref();
        if path.is_dir() {
            ConfigPath::from_dir(path)
        } else {
            ConfigPath::from_file(path)
        }
    }

    /// The same format at a different location.
    pub fn with_path(&self, path: impl Into<PathBuf>) -> ConfigPath {
        let path = path.into();
        match self {
            ConfigPath::Json(_) => ConfigPath::Json(path),
            ConfigPath::Ron(_) => ConfigPath::Ron(path),
            ConfigPath::Toml(_) => ConfigPath::Toml(path),
            ConfigPath::Yaml(_) => ConfigPath::Yaml(path),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigPath::Json(path)
            | ConfigPath::Ron(path)
            | ConfigPath::Toml(path)
            | ConfigPath::Yaml(path) => path,
        }
    }

    /// Read the configuration.
    pub fn load(&self) -> Result<ConfigModel> {
        debug!(path = %self, "Loading configuration");
        Ok(match &self {
            Self::Json(path) => serde_json::from_slice(&std::fs::read(path)?)?,
            Self::Ron(path) => ron::de::from_bytes(&std::fs::read(path)?)?,
            Self::Toml(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            Self::Yaml(path) => serde_yaml::from_slice(&std::fs::read(path)?)?,
        })
    }

    /// Write a new configuration file.
    pub fn write(&self, config: &ConfigModel) -> Result<()> {
        match &self {
            Self::Json(path) => std::fs::write(path, serde_json::to_vec_pretty(config)?),
            Self::Ron(path) => std::fs::write(
                path,
                ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::new())?.into_bytes(),
            ),
            Self::Toml(path) => std::fs::write(path, toml::to_string_pretty(config)?.into_bytes()),
            Self::Yaml(path) => std::fs::write(path, serde_yaml::to_string(config)?.into_bytes()),
        }?;
        Ok(())
    }
}

impl Display for ConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.path().to_string_lossy().fmt(f)
    }
}
