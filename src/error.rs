// ============================================================================
// Erreurs de la librairie
// ============================================================================
// Taxonomie :
// - Configuration : erreur de câblage (handle utilisé hors de son provider)
// - Network : échec du collaborateur de récupération (HTTP, timeout, JSON)
// - ConfigFile : fichier de configuration illisible ou invalide
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] définit le message Display
// - #[from] génère les conversions pour l'opérateur ?
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Message affiché quand le collaborateur ne fournit aucune description
pub const DEFAULT_LOAD_ERROR: &str = "Failed to load";

#[derive(Error, Debug)]
pub enum AppError {
    /// Erreur de programmation : jamais montrée à l'utilisateur final
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Échec de récupération des balances
    ///
    /// Le message est affiché tel quel dans la vue ("Error: <message>")
    #[error("{0}")]
    Network(String),

    #[error("invalid config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    /// Message destiné à la vue pour une erreur de récupération
    ///
    /// Un message vide retombe sur "Failed to load".
    pub fn display_message(&self) -> String {
        let message = match self {
            AppError::Network(message) => message.trim().to_string(),
            other => other.to_string(),
        };

        if message.is_empty() {
            DEFAULT_LOAD_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Alias pratique pour les résultats de la librairie
pub type Result<T> = std::result::Result<T, AppError>;
