//! App configuration. Every field here has a matching CLI flag, and the flag
//! takes precedence. The config file just lets you change the defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use swagexpand_core::{ExpandOptions, SiblingPolicy, document::Format};
use swagexpand_util::{
    ResultTracedAnyhow,
    paths::{self, expand_home},
};
use tracing::info;

const PATH_ENV_VAR: &str = "SWAGEXPAND_CONFIG_PATH";
const FILE: &str = "config.yml";

/// Global configuration, loaded once at startup
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// What to do with `$ref` mappings that have other keys
    pub siblings: SiblingPolicy,
    /// Default output format
    pub format: Format,
}

impl Config {
    /// Path to the configuration file, in this precedence:
    /// - Value of `$SWAGEXPAND_CONFIG_PATH`
    /// - `$CONFIG_DIR/swagexpand/config.yml`, where `$CONFIG_DIR` is defined
    ///   by [dirs::config_dir]
    pub fn path() -> PathBuf {
        if let Ok(path) = env::var(PATH_ENV_VAR) {
            return expand_home(PathBuf::from(path)).into_owned();
        }
        paths::config_directory().join(FILE)
    }

    /// Load configuration from the default path. See [Self::load_file]
    pub fn load() -> anyhow::Result<Self> {
        Self::load_file(&Self::path())
    }

    /// Load configuration from a file, if present. If not, just return a
    /// default value. This only returns an error if the file exists but
    /// couldn't be read or deserialized. The config file is never created for
    /// you.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        info!(?path, "Loading configuration file");

        (|| {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    info!(?path, "No configuration file, using defaults");
                    return Ok(Self::default());
                }
                Err(error) => return Err(anyhow::Error::from(error)),
            };
            // An empty file is a valid (if pointless) config
            if text.trim().is_empty() {
                return Ok(Self::default());
            }
            let config = serde_yaml::from_str::<Self>(&text)?;
            Ok::<_, anyhow::Error>(config)
        })()
        .context(format!("Error loading configuration from {path:?}"))
        .traced()
    }

    /// Options to pass to the expander
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            siblings: self.siblings,
        }
    }
}
