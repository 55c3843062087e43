use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::ConfigError, utils};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Runtime settings for the plan manager and its default storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the `plans/` folder. Defaults to [`utils::app_data_dir`].
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_retry_limit")]
    pub code_retry_limit: u32,
    #[serde(default = "Config::default_retry_limit")]
    pub mutation_retry_limit: u32,
    /// Accepted payment methods. Empty accepts any non-blank method.
    #[serde(default = "Config::default_payment_methods")]
    pub payment_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            code_retry_limit: Self::default_retry_limit(),
            mutation_retry_limit: Self::default_retry_limit(),
            payment_methods: Self::default_payment_methods(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_retry_limit() -> u32 {
        5
    }

    pub fn default_payment_methods() -> Vec<String> {
        ["Bank Transfer", "Cash", "Mobile Money", "Card", "Other"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        self.data_root.clone().unwrap_or_else(utils::app_data_dir)
    }

    /// Retry budgets are at least one attempt.
    pub fn normalized(mut self) -> Self {
        self.code_retry_limit = self.code_retry_limit.max(1);
        self.mutation_retry_limit = self.mutation_retry_limit.max(1);
        self.payment_methods = self
            .payment_methods
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }
}

/// Loads and saves [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    /// Manager for `<app data dir>/config.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(utils::app_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config.normalized())
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.code_retry_limit, 5);
        assert!(config.payment_methods.contains(&"Mobile Money".to_string()));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            data_root: Some(dir.path().join("data")),
            mutation_retry_limit: 9,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_defaults_and_clamp_limits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "code_retry_limit": 0, "payment_methods": [" Cash ", ""] }"#)
            .unwrap();
        let config = ConfigManager::new(path).load().unwrap();
        assert_eq!(config.code_retry_limit, 1);
        assert_eq!(config.mutation_retry_limit, 5);
        assert_eq!(config.payment_methods, vec!["Cash".to_string()]);
    }
}
