//! Support for `-c key=value` overrides shared across chatmark CLI tools.
//!
//! [`CliConfigOverrides`] can be embedded into a `clap`-derived CLI struct
//! using `#[command(flatten)]`. Each occurrence of `-c key=value` (or
//! `--config key=value`) is collected as a raw string and only parsed when
//! [`CliConfigOverrides::parse_overrides`] is called.

use clap::ArgAction;
use clap::Args;
use serde::de::Error as _;
use toml::Value;

/// Key used to parse the right-hand side of an override as a TOML value.
const SENTINEL_KEY: &str = "_override_";

#[derive(Args, Debug, Default, Clone)]
pub struct CliConfigOverrides {
    /// Override a configuration value that would otherwise be loaded from
    /// `~/.chatmark/config.toml`. Use a dotted path (`render.breaks`) to
    /// override nested values. The `value` portion is parsed as TOML. If it
    /// fails to parse, the raw string is used as a literal.
    ///
    /// Examples:
    ///   - `-c render.breaks=false`
    ///   - `-c render.gfm=true`
    #[arg(
        short = 'c',
        long = "config",
        value_name = "key=value",
        action = ArgAction::Append,
        global = true,
    )]
    pub raw_overrides: Vec<String>,
}

impl CliConfigOverrides {
    /// Parses the raw strings captured from the CLI into `(path, value)`
    /// pairs, in the order they were given.
    pub fn parse_overrides(&self) -> Result<Vec<(String, Value)>, String> {
        self.raw_overrides
            .iter()
            .map(|s| {
                // Only split on the first '=' so values may contain it.
                let Some((key, value_str)) = s.split_once('=') else {
                    return Err(format!("Invalid override (missing '='): {s}"));
                };
                let key = key.trim();
                let value_str = value_str.trim();

                if key.is_empty() {
                    return Err(format!("Empty key in override: {s}"));
                }
                if key.split('.').any(str::is_empty) {
                    return Err(format!("Empty path segment in override: {s}"));
                }

                // Fall back to a plain string so `-c key=some text` works
                // without quoting.
                let value = parse_toml_value(value_str)
                    .unwrap_or_else(|_| Value::String(value_str.to_string()));

                Ok((key.to_string(), value))
            })
            .collect()
    }
}

fn parse_toml_value(raw: &str) -> Result<Value, toml::de::Error> {
    let wrapped = format!("{SENTINEL_KEY} = {raw}");
    let table: toml::Table = toml::from_str(&wrapped)?;
    table
        .get(SENTINEL_KEY)
        .cloned()
        .ok_or_else(|| toml::de::Error::custom("missing sentinel key"))
}
