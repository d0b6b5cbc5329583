// ============================================================================
// Configuration
// ============================================================================
// Chargée depuis ~/.config/coinlist/config.toml si le fichier existe,
// valeurs par défaut sinon. Quelques variables d'environnement priment :
// - COINLIST_API_URL : URL de base de l'API
// - COINLIST_SOURCE : "http" ou "demo"
//
// CONCEPT RUST : #[serde(default = "...")]
// - Chaque champ absent du fichier prend sa valeur par défaut
// - Un fichier partiel reste valide
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::UserId;

pub const ENV_API_URL: &str = "COINLIST_API_URL";
pub const ENV_SOURCE: &str = "COINLIST_SOURCE";

/// D'où viennent les balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// API backend
    Http,
    /// Données de démonstration en mémoire
    Demo,
}

impl SourceKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Some(SourceKind::Http),
            "demo" => Some(SourceKind::Demo),
            _ => None,
        }
    }
}

/// Une entrée du sélecteur d'utilisateur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: UserId,
    pub label: String,
}

impl UserOption {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: UserId::new(id),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub default_user: UserId,

    #[serde(default = "default_source")]
    pub source: SourceKind,

    /// Délai artificiel de la source demo (ms)
    #[serde(default)]
    pub demo_latency_ms: u64,

    #[serde(default = "default_users")]
    pub users: Vec<UserOption>,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_source() -> SourceKind {
    SourceKind::Http
}

fn default_users() -> Vec<UserOption> {
    vec![UserOption::new("1", "User 1"), UserOption::new("2", "User 2")]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_user: UserId::default(),
            source: default_source(),
            demo_latency_ms: 0,
            users: default_users(),
        }
    }
}

impl Config {
    /// Charge la configuration depuis l'emplacement standard
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            None => {
                warn!("No config directory on this platform, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Lit et valide un fichier TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate(path)?;

        info!(
            path = %path.display(),
            source = ?config.source,
            users = config.users.len(),
            "Config loaded"
        );
        Ok(config)
    }

    /// ~/.config/coinlist/config.toml (selon la plateforme)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("coinlist").join("config.toml"))
    }

    /// Applique les variables d'environnement
    ///
    /// `lookup` est injecté pour garder les tests indépendants de l'environnement.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            debug!(url = %url, "API URL overridden from environment");
            self.api_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_SOURCE) {
            match SourceKind::parse(&raw) {
                Some(source) => self.source = source,
                None => warn!(value = %raw, "Ignoring unknown {}", ENV_SOURCE),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn demo_latency(&self) -> Duration {
        Duration::from_millis(self.demo_latency_ms)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| AppError::ConfigFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if self.users.is_empty() {
            return Err(invalid("at least one user must be listed"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}
