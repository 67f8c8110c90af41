use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub mod logging;

pub use logging::{LogLevel, LoggingConfig};

const CONFIG_ROOT_FOLDER: &str = "config/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't access configuration at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse configuration at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("couldn't serialize the default configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the menu library reads at startup. A plugin loads it once and
/// hands it to its `MenuContext`.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MenuConfiguration {
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    pub updater: UpdaterConfig,
    pub clicks: ClickConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Main thread ticks per second, used to convert tick delays into wall time.
    pub tps: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tps: 20.0 }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Default number of ticks between two refreshes of an updating menu.
    pub refresh_interval: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 10,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClickConfig {
    /// Clicks inside a menu are cancelled before handlers run. Handlers may un-cancel.
    pub cancel_by_default: bool,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            cancel_by_default: true,
        }
    }
}

pub trait LoadConfiguration {
    fn load(data_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = data_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir_all(&config_dir).map_err(|source| ConfigError::Io {
                path: config_dir.clone(),
                source,
            })?;
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&file_content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            let content = Self::default();
            if let Err(err) = fs::write(&path, toml::to_string(&content)?) {
                warn!(
                    "Couldn't write default config to {:?}. Reason: {}",
                    &path, err
                );
            }
            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadConfiguration for MenuConfiguration {
    fn get_path() -> &'static Path {
        Path::new("fastmenu.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scheduler.tps > 0.0 && self.scheduler.tps <= 1000.0) {
            return Err(ConfigError::Invalid(format!(
                "scheduler.tps must be in (0, 1000], got {}",
                self.scheduler.tps
            )));
        }
        if self.updater.refresh_interval == 0 {
            return Err(ConfigError::Invalid(
                "updater.refresh_interval must be at least 1 tick".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use crate::{ConfigError, LoadConfiguration, LogLevel, MenuConfiguration};

    #[test]
    fn test_load_writes_defaults() {
        let dir = tempdir().unwrap();

        let config = MenuConfiguration::load(dir.path()).unwrap();
        assert_eq!(config, MenuConfiguration::default());

        let written = dir.path().join("config/fastmenu.toml");
        assert!(written.exists());
        let reread = MenuConfiguration::load(dir.path()).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/fastmenu.toml"),
            "[logging]\nlevel = \"debug\"\n\n[updater]\nrefresh_interval = 40\n",
        )
        .unwrap();

        let config = MenuConfiguration::load(dir.path()).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.enabled);
        assert_eq!(config.updater.refresh_interval, 40);
        assert_eq!(config.scheduler.tps, 20.0);
        assert!(config.clicks.cancel_by_default);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/fastmenu.toml"),
            "[scheduler]\ntps = 0.0\n",
        )
        .unwrap();

        let err = MenuConfiguration::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/fastmenu.toml"), "[updater\n").unwrap();

        let err = MenuConfiguration::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
