//! Client options. Loaded from env (HOME_GUILD_ID, DATABASE_URL, LOG_INFO, COMMAND_FORMAT, COMMANDS_DIR)
//! or built directly by the host.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use burger_core::{BurgerError, Result};

/// File format the manifest loader looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Json,
    Toml,
}

impl ManifestFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Toml => "toml",
        }
    }
}

impl FromStr for ManifestFormat {
    type Err = BurgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "toml" => Ok(ManifestFormat::Toml),
            other => Err(BurgerError::Config(format!(
                "COMMAND_FORMAT must be json or toml, got {}",
                other
            ))),
        }
    }
}

/// Construction-time options of [`crate::BurgerClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Home (test) guild that receives guild-scoped commands.
    pub home_guild_id: u64,
    /// Optional SQLite URL; when set, readiness also waits for the storage connection.
    pub database_url: Option<String>,
    /// Emit info-level lines.
    pub log_info: bool,
    pub manifest_format: ManifestFormat,
    /// Directory the host wants scanned for command manifests, if any.
    pub commands_dir: Option<PathBuf>,
}

impl ClientOptions {
    pub fn new(home_guild_id: u64) -> Self {
        Self {
            home_guild_id,
            database_url: None,
            log_info: true,
            manifest_format: ManifestFormat::default(),
            commands_dir: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let home_guild_id = parse_id("HOME_GUILD_ID", &required_env("HOME_GUILD_ID")?)?;
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let manifest_format = match env::var("COMMAND_FORMAT") {
            Ok(s) => s.parse()?,
            Err(_) => ManifestFormat::default(),
        };
        let commands_dir = env::var("COMMANDS_DIR").ok().map(PathBuf::from);
        Ok(Self {
            home_guild_id,
            database_url,
            log_info: env_flag("LOG_INFO", true),
            manifest_format,
            commands_dir,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.home_guild_id == 0 {
            return Err(BurgerError::Config(
                "HOME_GUILD_ID must be a non-zero snowflake".to_string(),
            ));
        }
        if let Some(dir) = &self.commands_dir {
            if dir.as_os_str().is_empty() {
                return Err(BurgerError::Config("COMMANDS_DIR is set but empty".to_string()));
            }
        }
        Ok(())
    }
}

pub(crate) fn required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| BurgerError::Config(format!("{} not set", key)))
}

pub(crate) fn parse_id(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| BurgerError::Config(format!("{} is not a valid id: {}", key, value)))
}

/// Reads a boolean env var; anything other than `0`/`false`/`no`/`off` counts as true.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        Err(_) => default,
    }
}
