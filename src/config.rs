use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const API_BASE_ENV: &str = "MEDCONSOLE_API_BASE";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Origin every `/api/{resource}` path is resolved against.
    pub api_base: Url,
    /// Ask before deleting a record.
    pub confirm_deletes: bool,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub log_filter: Option<String>,
}

/// `config.toml` as written on disk; every key is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
struct FileConfig {
    api_base: Option<Url>,
    confirm_deletes: Option<bool>,
    log_filter: Option<String>,
}

impl ConsoleConfig {
    /// Read `path` (or the per-user config file), then apply environment
    /// overrides. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => read_file(p)?,
            None => match default_path() {
                Some(p) if p.exists() => read_file(&p)?,
                _ => FileConfig::default(),
            },
        };
        let mut cfg = Self::resolve(file)?;
        cfg.apply_env(std::env::var(API_BASE_ENV).ok().as_deref())?;
        Ok(cfg)
    }

    /// Built-in settings, without reading any file or the environment.
    pub fn defaults() -> Result<Self> { Self::resolve(FileConfig::default()) }

    pub fn from_file(path: &Path) -> Result<Self> { Self::resolve(read_file(path)?) }

    fn resolve(file: FileConfig) -> Result<Self> {
        let api_base = match file.api_base {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_BASE).with_context(|| format!("default api base: {DEFAULT_API_BASE}"))?,
        };
        Ok(Self { api_base, confirm_deletes: file.confirm_deletes.unwrap_or(true), log_filter: file.log_filter })
    }

    fn apply_env(&mut self, api_base: Option<&str>) -> Result<()> {
        if let Some(raw) = api_base.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_base = Url::parse(raw).with_context(|| format!("{API_BASE_ENV} is not a valid url: {raw}"))?;
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
}

/// `config.toml` in the per-user config directory.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "medconsole", "medconsole").map(|p| p.config_dir().join("config.toml"))
}
