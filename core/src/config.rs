//! Configuration loaded from `$CHATMARK_HOME/config.toml` and merged with
//! command-line overrides.
//!
//! Precedence, lowest to highest: built-in defaults, the config file, generic
//! `-c key=value` overrides, then typed [`ConfigOverrides`].

use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use toml::Table;
use toml::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::render::RenderOptions;

const CONFIG_FILE_NAME: &str = "config.toml";
const HOME_ENV_VAR: &str = "CHATMARK_HOME";

/// Application configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Options handed to the markdown renderer.
    pub render: RenderOptions,
}

/// Optional overrides for user configuration (e.g., from CLI flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub breaks: Option<bool>,
    pub gfm: Option<bool>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut Config) {
        let Self { breaks, gfm } = self;
        if let Some(breaks) = breaks {
            config.render.breaks = breaks;
        }
        if let Some(gfm) = gfm {
            config.render.gfm = gfm;
        }
    }
}

impl Config {
    /// Loads `config.toml` from [`chatmark_home`] and applies both kinds of
    /// overrides.
    pub fn load_with_cli_overrides(
        cli_overrides: Vec<(String, Value)>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let home = chatmark_home()?;
        Self::load_from_home(&home, cli_overrides, overrides)
    }

    /// Same as [`Config::load_with_cli_overrides`] but with an explicit home
    /// directory. A missing config file yields the defaults.
    pub fn load_from_home(
        home: &Path,
        cli_overrides: Vec<(String, Value)>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let config_path = home.join(CONFIG_FILE_NAME);
        let mut root = load_config_as_toml(&config_path)?;

        for (path, value) in cli_overrides {
            apply_toml_override(&mut root, &path, value);
        }

        let mut config: Config =
            Value::Table(root)
                .try_into()
                .map_err(|source| ConfigError::Parse {
                    path: config_path.clone(),
                    source,
                })?;
        overrides.apply(&mut config);

        debug!(path = %config_path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Serializes the effective configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// Returns the chatmark home directory: `$CHATMARK_HOME` when set and
/// non-empty, otherwise `~/.chatmark`. Does not verify that it exists.
pub fn chatmark_home() -> Result<PathBuf, ConfigError> {
    match std::env::var_os(HOME_ENV_VAR) {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => {
            let mut p = home_dir().ok_or(ConfigError::NoHomeDir)?;
            p.push(".chatmark");
            Ok(p)
        }
    }
}

fn load_config_as_toml(path: &Path) -> Result<Table, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Table::new())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Sets `value` at the dotted `path` inside `root`, creating intermediate
/// tables and replacing any non-table value found on the way.
fn apply_toml_override(root: &mut Table, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Value::Table(table) = entry else {
            return;
        };
        current = table;
    }
}
