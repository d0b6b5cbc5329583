// ============================================================================
// Coinlist - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Sources de balances (HTTP, demo)
pub mod app;        // État de l'application
pub mod config;     // Fichier de configuration
pub mod controller; // Machine à états du chargement
pub mod error;      // Erreurs typées
pub mod models;     // Structures de données
pub mod ui;         // Interface utilisateur
pub mod worker;     // Worker thread des requêtes

pub use error::{AppError, Result};
