//! famcal configuration.
//!
//! Lives at `~/.config/famcal/config.toml` (or the platform equivalent).
//! Every key is optional; a missing file means defaults everywhere.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FamCalError, FamCalResult};
use crate::event::Owner;

/// Where the event store listens when nothing is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4117";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the event store.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Read-only external feed to pull from, if any.
    #[serde(default)]
    pub feed_url: Option<String>,

    /// Household member that owns events when no owner is given.
    #[serde(default)]
    pub default_owner: Owner,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: default_server_url(),
            feed_url: None,
            default_owner: Owner::default(),
        }
    }
}

impl Config {
    pub fn config_path() -> FamCalResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            FamCalError::Config("could not determine config directory".to_string())
        })?;
        Ok(base.join("famcal").join("config.toml"))
    }

    /// Load the config, writing a commented default file on first run.
    pub fn load() -> FamCalResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::write_default_file(&path)?;
            log::info!("created default config at {}", path.display());
        }

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()
            .map_err(|e| FamCalError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| FamCalError::Config(e.to_string()))
    }

    fn write_default_file(path: &Path) -> FamCalResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let template = format!(
            "# famcal configuration\n\
             \n\
             # Base URL of the event store.\n\
             # server_url = \"{DEFAULT_SERVER_URL}\"\n\
             \n\
             # Read-only calendar feed for `famcal pull`.\n\
             # feed_url = \"https://example.com/family-feed.json\"\n\
             \n\
             # Household member that owns events when no owner is given.\n\
             # default_owner = \"nadia\"\n"
        );
        fs::write(path, template)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.feed_url, None);
        assert_eq!(config.default_owner, Owner::Nadia);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = toml::from_str(
            r#"
server_url = "http://calbox.local:4117"
feed_url = "https://example.com/family.json"
default_owner = "tariq"
"#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://calbox.local:4117");
        assert_eq!(
            config.feed_url.as_deref(),
            Some("https://example.com/family.json")
        );
        assert_eq!(config.default_owner, Owner::Tariq);
    }
}
