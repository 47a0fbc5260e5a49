//! Client configuration.
//!
//! Loaded from ~/.config/intrack/config.toml with `INTRACK_*` environment
//! overrides. Holds the connection details and the identity the engine
//! filters events against; the push-channel handshake is the server's
//! concern, the client only carries the token.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use intrack_core::UserId;

static DEFAULT_SERVER_URL: &str = "http://localhost:3000";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Which side of the hiring table the configured user sits on. Selects the
/// snapshot endpoint for the user's own schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Employer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Candidate => write!(f, "candidate"),
            Role::Employer => write!(f, "employer"),
        }
    }
}

/// Configuration at ~/.config/intrack/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Bearer token for the tracker service.
    pub token: String,
    /// The authenticated user's id; everything the engine accepts is scoped
    /// to this identity.
    pub user_id: UserId,
    pub role: Role,
}

impl TrackerConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("intrack");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            anyhow::bail!(
                "No configuration found. A template was written to {}; fill in token, user_id and role.",
                config_path.display()
            );
        }

        let config: TrackerConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("INTRACK"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Create a template config file with the fields to fill in.
    pub fn create_default_config(path: &std::path::Path) -> Result<()> {
        let contents = format!(
            "\
# intrack configuration

# Tracker service to talk to:
server_url = \"{DEFAULT_SERVER_URL}\"

# Your API token:
token = \"\"

# Your user id:
user_id = 0

# \"candidate\" or \"employer\":
role = \"candidate\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Could not write {}", path.display()))?;

        Ok(())
    }
}
