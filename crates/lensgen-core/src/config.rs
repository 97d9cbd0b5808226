//! Configuration for lens binding generation.
//!
//! The configuration is handed to [`BindingEngine::new`](crate::engine::BindingEngine::new);
//! the engine never reads files or the environment itself. A config can be
//! created programmatically or loaded from a YAML or TOML file.
//!
//! # Examples
//!
//! ```no_run
//! use lensgen_core::config::{CollisionPolicy, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> lensgen_core::Result<()> {
//! // Create a config programmatically
//! let mut config = Config::default();
//! config.lens_spec_import = "org.http4k.format.Moshi.auto".to_string();
//! config.collision_policy = CollisionPolicy::Strict;
//!
//! // Or load it from a file
//! let config = Config::from_file("lensgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;
use tokio::fs;

/// What to do when two parameters produce the same declaration name but
/// different definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Later definition replaces the earlier one
    #[default]
    LastWins,
    /// Earlier definition is kept
    FirstWins,
    /// Conflicting definitions are an error
    Strict,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::LastWins => "last-wins",
            CollisionPolicy::FirstWins => "first-wins",
            CollisionPolicy::Strict => "strict",
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-wins" | "last_wins" => Ok(CollisionPolicy::LastWins),
            "first-wins" | "first_wins" => Ok(CollisionPolicy::FirstWins),
            "strict" => Ok(CollisionPolicy::Strict),
            _ => Err(format!(
                "unknown collision policy '{}', expected last-wins, first-wins or strict",
                s
            )),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for lens binding generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Import providing the `auto` body conversion
    #[serde(default = "default_lens_spec_import")]
    pub lens_spec_import: String,

    /// Imports emitted even when no parameter needs them
    #[serde(
        default = "default_base_imports",
        deserialize_with = "deserialize_imports"
    )]
    pub base_imports: Vec<String>,

    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lens_spec_import: default_lens_spec_import(),
            base_imports: default_base_imports(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file; `.toml` files are read as TOML, anything else as YAML
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a file, using the same format rules as [`Config::from_file`]
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string(self).map_err(|e| crate::Error::config(e.to_string()))?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Default location of the user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lensgen").join("config.yaml"))
    }

    /// Load the given file, or the user configuration file if it exists, or the defaults
    pub async fn load(path: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path).await;
        }
        match Self::default_path() {
            Some(path) if fs::try_exists(&path).await.unwrap_or(false) => {
                Self::from_file(path).await
            }
            _ => Ok(Self::default()),
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

fn default_lens_spec_import() -> String {
    "org.http4k.format.Jackson.auto".to_string()
}

fn default_base_imports() -> Vec<String> {
    vec!["org.http4k.routing.RoutingHttpHandler".to_string()]
}

/// Accept either a single import or a list of imports
fn deserialize_imports<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match SerdeValue::deserialize(deserializer)? {
        SerdeValue::String(s) => Ok(vec![s]),
        SerdeValue::Seq(seq) => seq
            .into_iter()
            .map(|item| match item {
                SerdeValue::String(s) => Ok(s),
                _ => Err(serde::de::Error::custom(
                    "Expected string or array of strings",
                )),
            })
            .collect(),
        _ => Err(serde::de::Error::custom(
            "Expected string or array of strings",
        )),
    }
}
