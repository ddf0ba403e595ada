#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    AlertCooldown,
    AlertInterval,
    ApiToken,
    ApiUrl,
    BackendHealthCheckTimeout,
    ConfigFile,
    DataDir,
    EmailTo,
    EmailToken,
    EmailUrl,
    HighlightDelay,
}

impl ConfigKey {
    fn is_numeric(&self) -> bool {
        return matches!(
            self,
            ConfigKey::AlertCooldown
                | ConfigKey::AlertInterval
                | ConfigKey::BackendHealthCheckTimeout
                | ConfigKey::HighlightDelay
        );
    }

    fn is_secret(&self) -> bool {
        return matches!(self, ConfigKey::ApiToken | ConfigKey::EmailToken);
    }
}

fn app_dir(base: Option<path::PathBuf>) -> path::PathBuf {
    return base
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("filingsdesk");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn get_u64(key: ConfigKey) -> Result<u64> {
        let val = Config::get(key);
        return match val.trim().parse::<u64>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => bail!(format!("Config value for '{key}' must be a whole number, got '{val}'")),
        };
    }

    /// Seconds between alert checks.
    pub fn alert_interval() -> Result<Duration> {
        return Ok(Duration::from_secs(Config::get_u64(ConfigKey::AlertInterval)?));
    }

    /// Minutes an alert stays quiet after firing.
    pub fn alert_cooldown() -> Result<Duration> {
        return Ok(Duration::from_secs(
            Config::get_u64(ConfigKey::AlertCooldown)? * 60,
        ));
    }

    /// Milliseconds a highlighted chunk stays marked.
    pub fn highlight_delay() -> Result<Duration> {
        return Ok(Duration::from_millis(Config::get_u64(ConfigKey::HighlightDelay)?));
    }

    pub fn data_dir() -> path::PathBuf {
        return path::PathBuf::from(Config::get(ConfigKey::DataDir));
    }

    pub fn default(key: ConfigKey) -> String {
        let config_path = app_dir(dirs::config_dir()).join("config.toml");
        let data_dir = app_dir(dirs::data_dir());

        let res = match key {
            ConfigKey::AlertCooldown => "60",
            ConfigKey::AlertInterval => "60",
            ConfigKey::ApiToken => "",
            ConfigKey::ApiUrl => "http://localhost:8000",
            ConfigKey::BackendHealthCheckTimeout => "1000",
            ConfigKey::EmailTo => "",
            ConfigKey::EmailToken => "",
            ConfigKey::EmailUrl => "",
            ConfigKey::HighlightDelay => "5000",

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
            ConfigKey::DataDir => return data_dir.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if !cmd
                        .get_arguments()
                        .any(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        continue;
                    }

                    if let Some(val_int) = val.as_integer() {
                        if val_int < 0 {
                            bail!(format!("config.toml has a negative value for key '{key}': {val_int}"));
                        }
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::set(key, val_str);
                    } else {
                        bail!(format!("config.toml has an invalid value for key '{key}'"));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        for key in ConfigKey::iter().filter(ConfigKey::is_numeric) {
            Config::get_u64(key)?;
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiUrl),
            data_dir = Config::get(ConfigKey::DataDir),
            alert_interval = Config::get(ConfigKey::AlertInterval),
            alert_cooldown = Config::get(ConfigKey::AlertCooldown),
            highlight_delay = Config::get(ConfigKey::HighlightDelay),
            email_enabled = !Config::get(ConfigKey::EmailUrl).is_empty(),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();
                let description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let val = Config::default(key);
                let line = if val.is_empty() || key.is_secret() || key == ConfigKey::DataDir {
                    format!("# {key} = \"\"")
                } else if key.is_numeric() {
                    format!("{key} = {val}")
                } else {
                    format!("{key} = \"{val}\"")
                };

                return Some(format!("# {description}\n{line}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
