use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::ControllerOptions;
use crate::error::{Error, Result};
use crate::sync::local::FileStore;
use crate::sync::rest::{DEFAULT_API_URL, RestConfig};

pub const APP_NAME: &str = "todolist";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_NAME)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join(APP_NAME)
        .join("config.json")
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The REST task API at `api_url`.
    #[default]
    Remote,
    /// A JSON file in `data_directory`.
    Local,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "rest" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            _ => Err(format!("unknown backend '{}'", s)),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub api_url: String,
    pub data_directory: PathBuf,
    /// Seconds before a request to the task API is abandoned; none waits forever.
    pub request_timeout_secs: Option<u64>,
    pub sequence_loads: bool,
    pub debug_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_url: default_api_url(),
            data_directory: default_data_dir(),
            request_timeout_secs: None,
            sequence_loads: false,
            debug_logging: false,
        }
    }
}

impl Config {
    /// Read the config at `path`. A missing file gives the defaults; a file
    /// that does not parse is reported and also gives the defaults.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    /// File store over the data directory, used by the local backend.
    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.data_directory.clone())
    }

    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.api_url.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            sequence_loads: self.sequence_loads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.backend, Backend::Remote);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend": "local", "sequence_loads": true}"#).unwrap();

        let config = Config::load(&path);
        assert_eq!(config.backend, Backend::Local);
        assert!(config.sequence_loads);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.controller_options().sequence_loads);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "backend = local").unwrap();
        assert_eq!(Config::load(&path), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            backend: Backend::Local,
            data_directory: dir.path().to_path_buf(),
            request_timeout_secs: Some(10),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path), config);
        assert_eq!(config.rest_config().timeout, Some(Duration::from_secs(10)));
        assert_eq!(
            config.file_store().path_for(crate::sync::local::TASKS_KEY),
            dir.path().join("tasks.json")
        );
    }

    #[test]
    fn backend_names() {
        assert_eq!("local".parse::<Backend>(), Ok(Backend::Local));
        assert_eq!("REST".parse::<Backend>(), Ok(Backend::Remote));
        assert!("cloud".parse::<Backend>().is_err());
    }
}
