use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "reminders.json";
const TMP_SUFFIX: &str = "tmp";

/// Handles persistence of [`Config`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager rooted at `base`, creating the directory when missing.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    /// Manager rooted at [`Config::resolve_base_dir`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(Config::resolve_base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads and validates the stored config; a missing file yields defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates then writes `config`, replacing the file in one rename.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Applies `edit` to the stored config and persists the result.
    pub fn update<F>(&self, edit: F) -> Result<Config, ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        edit(&mut config);
        self.save(&config)?;
        Ok(config)
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

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
