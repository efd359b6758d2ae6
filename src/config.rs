use anyhow::{Context, Result};
use dirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT};

/// Environment variable consulted when no token has been saved.
pub const TOKEN_ENV_VAR: &str = "YANDEX_DISK_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub download_dir: Option<String>,
    pub decompress_zip: bool,
    pub page_limit: u32,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Default to the user's Downloads folder when the platform has one
        let download_dir = dirs::download_dir().and_then(|p| p.to_str().map(str::to_string));
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            download_dir,
            decompress_zip: true,
            page_limit: DEFAULT_PAGE_LIMIT,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("diskr");
        Self::with_dir(config_dir)
    }

    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let config_file = config_dir.join("diskr.toml");

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
        }

        let content: String =
            fs::read_to_string(&self.config_file).context("Failed to read config file")?;

        let mut config: AppConfig =
            toml::from_str(&content).context("Failed to parse config file")?;

        if config.page_limit == 0 {
            config.page_limit = DEFAULT_PAGE_LIMIT;
        }
        if config.api_base_url.trim().is_empty() {
            config.api_base_url = DEFAULT_BASE_URL.to_string();
        }

        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    pub fn log_dir(&self, config: &AppConfig) -> PathBuf {
        match &config.log_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.config_dir.join("logs"),
        }
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(self.config_dir.join("credentials.toml"))
    }
}

/// Persists the OAuth token between sessions.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    env_var: Option<&'static str>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            env_var: Some(TOKEN_ENV_VAR),
        }
    }

    /// Store that never falls back to the environment.
    pub fn file_only(path: PathBuf) -> Self {
        Self { path, env_var: None }
    }

    pub fn get(&self) -> Option<Credentials> {
        if self.path.exists() {
            match fs::read_to_string(&self.path)
                .context("Failed to read credentials file")
                .and_then(|c| toml::from_str::<Credentials>(&c).context("Failed to parse credentials file"))
            {
                Ok(creds) if !creds.access_token.trim().is_empty() => return Some(creds),
                Ok(_) => {}
                Err(e) => tracing::error!("{:#}", e),
            }
        }

        let var = self.env_var?;
        std::env::var(var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|access_token| {
                tracing::info!("Using token from {}", var);
                Credentials { access_token }
            })
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create credentials directory")?;
        }
        let toml = toml::to_string(credentials).context("Failed to serialize credentials")?;
        fs::write(&self.path, toml).context("Failed to write credentials file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .context("Failed to restrict credentials file permissions")?;
        }

        tracing::info!("Saved credentials to {:?}", self.path);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove credentials file")?;
            tracing::info!("Removed credentials file {:?}", self.path);
        }
        Ok(())
    }
}
