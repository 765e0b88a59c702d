use crate::storage::Profile;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "PORTFOLIO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration, read from TOML.
/// Every field has a default, so the file itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(rename = "static")]
    pub static_files: StaticConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Keep documents in memory instead of `data_path`
    pub in_memory: bool,
    /// Collection file
    pub data_path: PathBuf,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub public_dir: PathBuf,
    /// Served for `GET /`
    pub index_file: PathBuf,
}

/// Content of the profile inserted on first start
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            in_memory: false,
            data_path: PathBuf::from("data/portfolio.json"),
            database: "portfolio".to_string(),
            collection: "profile".to_string(),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            index_file: PathBuf::from("index.html"),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            title: "Software Developer".to_string(),
            location: "Earth".to_string(),
            email: "you@example.com".to_string(),
            bio: "Welcome to my portfolio.".to_string(),
            skills: vec![
                "Rust".to_string(),
                "JavaScript".to_string(),
                "HTML".to_string(),
                "CSS".to_string(),
            ],
            experience: "Building things for the web.".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$PORTFOLIO_CONFIG` (or `config.toml`), then apply `$PORT`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SeedConfig {
    pub fn to_profile(&self, now: DateTime<Utc>) -> Profile {
        Profile {
            name: self.name.clone(),
            title: self.title.clone(),
            location: self.location.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            experience: self.experience.clone(),
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
