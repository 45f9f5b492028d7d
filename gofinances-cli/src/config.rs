use anyhow::{Context, Result};
use gofinances_core::DisplayContext;
use gofinances_store::MalformedPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySection,
    pub storage: StorageSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// "pt-BR" or "en-US"
    pub locale: String,
    /// IANA zone used for labels and for stored dates without an offset
    pub timezone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Empty means `<home>/data`
    pub data_dir: String,
    pub malformed: MalformedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            locale: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn display_context(&self) -> Result<DisplayContext> {
        DisplayContext::from_names(&self.display.locale, &self.display.timezone)
            .context("invalid [display] section in config.toml")
    }

    pub fn data_dir(&self, home: &Path) -> PathBuf {
        if self.storage.data_dir.trim().is_empty() {
            home.join("data")
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns whether it wrote.
pub fn init_config(home: &Path) -> Result<bool> {
    if config_path(home).exists() {
        return Ok(false);
    }
    save_config(home, &Config::default())?;
    Ok(true)
}
